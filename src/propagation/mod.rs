//! Disease module detection by iterative seed expansion (DIAMOnD).
//!
//! Starting from a set of seed genes, each round adds the network neighbor whose
//! connectivity to the current module is the least likely to have arisen by chance
//! under a hypergeometric model. A run stops as soon as one of the following holds:
//!
//! - the module has no neighbors left ([`TerminationReason::NoCandidates`]),
//! - the best candidate has `p > 0.05` ([`TerminationReason::NotSignificant`]),
//! - 100 genes have been added ([`TerminationReason::SizeCapReached`]),
//! - 200 rounds have run ([`TerminationReason::RoundCapReached`]).
//!
//! The thresholds are fixed so that runs over the same network and seeds are
//! reproducible and comparable across analyses.
//!
//! ## Module Organization
//!
//! - **[`pool`]**: incremental frontier of the module with live connection counts
//! - **[`expander`]**: the round-by-round state machine
//! - **[`report`]**: the immutable result of a run
//! - **[`export`]**: CSV and plain-text output of a report

pub mod expander;
pub mod export;
pub mod pool;
pub mod report;

pub use expander::{DiamondExpander, ExpanderState, ScoredCandidate, select_candidate};
pub use export::{write_gene_list, write_results_table};
pub use pool::CandidatePool;
pub use report::{Addition, ModuleReport, TerminationReason};

/// A candidate is only added if its p-value does not exceed this value.
pub const SIGNIFICANCE_THRESHOLD: f64 = 0.05;

/// Maximum number of genes added to the seeds in one run.
pub const MAX_ADDITIONS: usize = 100;

/// Maximum number of rounds in one run.
pub const MAX_ROUNDS: usize = 200;
