//! Immutable record of a finished propagation run.

use std::fmt;

/// Why a run stopped. Every variant is a normal outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TerminationReason {
    /// The module has no neighbors left outside it.
    NoCandidates,
    /// The best candidate's p-value exceeded the significance threshold.
    NotSignificant,
    /// The maximum number of additions was committed.
    SizeCapReached,
    /// The maximum number of rounds was run.
    RoundCapReached,
    /// The cancellation flag was observed between two rounds.
    Cancelled,
}

impl fmt::Display for TerminationReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            TerminationReason::NoCandidates => "no candidates left",
            TerminationReason::NotSignificant => "best candidate not significant",
            TerminationReason::SizeCapReached => "addition limit reached",
            TerminationReason::RoundCapReached => "round limit reached",
            TerminationReason::Cancelled => "cancelled",
        };
        f.write_str(text)
    }
}

/// One node committed to the module.
#[derive(Debug, Clone, PartialEq)]
pub struct Addition<N> {
    pub node: N,
    /// 1-based round in which the node was added.
    pub round: usize,
    /// Hypergeometric p-value at selection time.
    pub p_value: f64,
    /// Edges from the node into the module at selection time.
    pub connectivity: usize,
    /// Module size (seeds included) right before this node joined.
    pub module_size_at_addition: usize,
}

/// Outcome of a DIAMOnD run: the ordered additions and the reason the run stopped.
#[derive(Debug, Clone, PartialEq)]
pub struct ModuleReport<N> {
    seeds: Vec<N>,
    excluded_seeds: Vec<N>,
    additions: Vec<Addition<N>>,
    reason: TerminationReason,
}

impl<N: Clone> ModuleReport<N> {
    pub(crate) fn new(
        seeds: Vec<N>,
        excluded_seeds: Vec<N>,
        additions: Vec<Addition<N>>,
        reason: TerminationReason,
    ) -> Self {
        ModuleReport {
            seeds,
            excluded_seeds,
            additions,
            reason,
        }
    }

    /// Additions in round order.
    pub fn additions(&self) -> &[Addition<N>] {
        &self.additions
    }

    /// Effective seeds (present in the network), in ascending order.
    pub fn seeds(&self) -> &[N] {
        &self.seeds
    }

    /// Seeds dropped because the network does not contain them.
    pub fn excluded_seeds(&self) -> &[N] {
        &self.excluded_seeds
    }

    pub fn reason(&self) -> TerminationReason {
        self.reason
    }

    /// Added genes in round order.
    pub fn added_genes(&self) -> Vec<N> {
        self.additions.iter().map(|a| a.node.clone()).collect()
    }

    /// The module as a gene set: seeds first, then additions in round order.
    pub fn module_genes(&self) -> Vec<N> {
        self.seeds
            .iter()
            .cloned()
            .chain(self.additions.iter().map(|a| a.node.clone()))
            .collect()
    }

    /// Number of additions.
    pub fn len(&self) -> usize {
        self.additions.len()
    }

    /// True when the run added no node.
    pub fn is_empty(&self) -> bool {
        self.additions.is_empty()
    }

    pub fn last_addition(&self) -> Option<&Addition<N>> {
        self.additions.last()
    }

    /// Final module size, seeds included.
    pub fn module_size(&self) -> usize {
        self.seeds.len() + self.additions.len()
    }
}
