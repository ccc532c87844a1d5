//! Error types shared by the graph model, the significance test and the expander.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, DiamondError>;

#[derive(Debug, Error)]
pub enum DiamondError {
    /// The interaction graph violates a construction-time invariant.
    #[error("invalid graph: {0}")]
    InvalidGraph(String),

    /// No seed survived validation against the graph.
    #[error("no usable seed genes: none of the seeds are present in the network")]
    EmptySeedSet,

    /// The hypergeometric tail cannot be evaluated for these parameters.
    #[error(
        "numeric instability in hypergeometric tail \
         (population={population}, successes={successes}, draws={draws}, observed={observed})"
    )]
    NumericInstability {
        population: usize,
        successes: usize,
        draws: usize,
        observed: usize,
    },

    /// Candidates were requested from a pool that was never seeded.
    #[error("candidate pool queried before it was seeded")]
    PoolNotSeeded,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Malformed line in a network or gene list file.
    #[error("parse error on line {line}: {message}")]
    Parse { line: usize, message: String },
}
