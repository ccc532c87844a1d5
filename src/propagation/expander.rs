//! The DIAMOnD driver.
//!
//! Each round scores every pool member with the hypergeometric connectivity test,
//! picks the most significant one and commits it to the module. Scoring of a round
//! may fan out over the rayon thread pool; the choice of the winner is a single
//! sequential reduction afterwards, so the result does not depend on scheduling.

use crate::error::{DiamondError, Result};
use crate::network::{Graph, NodeIndex};
use crate::propagation::pool::CandidatePool;
use crate::propagation::report::{Addition, ModuleReport, TerminationReason};
use crate::propagation::{MAX_ADDITIONS, MAX_ROUNDS, SIGNIFICANCE_THRESHOLD};
use crate::testing::inference::connectivity_p_value;
use rayon::prelude::*;
use std::cmp::Ordering;
use std::collections::{BTreeSet, HashMap};
use std::fmt::Debug;
use std::hash::Hash;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering as AtomicOrdering};
use tracing::{debug, info, trace, warn};

/// Lifecycle of an expander. `Finished` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpanderState {
    Ready,
    Running,
    Finished(TerminationReason),
}

impl ExpanderState {
    pub fn is_finished(&self) -> bool {
        matches!(self, ExpanderState::Finished(_))
    }
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct StoppingRules {
    pub(crate) significance: f64,
    pub(crate) max_additions: usize,
    pub(crate) max_rounds: usize,
}

impl Default for StoppingRules {
    fn default() -> Self {
        StoppingRules {
            significance: SIGNIFICANCE_THRESHOLD,
            max_additions: MAX_ADDITIONS,
            max_rounds: MAX_ROUNDS,
        }
    }
}

/// A pool member together with its p-value for the current round.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoredCandidate {
    pub node: NodeIndex,
    pub connectivity: usize,
    pub p_value: f64,
}

/// Ranking used to pick a round's winner: lowest p-value, then most connections
/// into the module, then lowest node index (= lowest identifier).
fn rank(a: &ScoredCandidate, b: &ScoredCandidate) -> Ordering {
    a.p_value
        .total_cmp(&b.p_value)
        .then_with(|| b.connectivity.cmp(&a.connectivity))
        .then_with(|| a.node.cmp(&b.node))
}

/// Pick the best candidate of a round, or `None` when there are none.
pub fn select_candidate<I>(scored: I) -> Option<ScoredCandidate>
where
    I: IntoIterator<Item = ScoredCandidate>,
{
    scored.into_iter().min_by(rank)
}

/// Iterative seed expansion over a read-only network.
///
/// ```rust
/// use single_diamond::network::Graph;
/// use single_diamond::propagation::{DiamondExpander, TerminationReason};
///
/// let graph = Graph::from_edges(vec![(1, 2), (2, 3), (3, 4), (4, 5)]).unwrap();
/// let report = DiamondExpander::new(&graph, vec![1, 5]).unwrap().run().unwrap();
/// assert_eq!(report.reason(), TerminationReason::NotSignificant);
/// assert!(report.is_empty());
/// ```
#[derive(Debug)]
pub struct DiamondExpander<'g, N> {
    graph: &'g Graph<N>,
    seeds: Vec<NodeIndex>,
    excluded_seeds: Vec<N>,
    in_module: Vec<bool>,
    pool: CandidatePool,
    additions: Vec<Addition<N>>,
    round: usize,
    state: ExpanderState,
    rules: StoppingRules,
    parallel: bool,
    cancel: Option<Arc<AtomicBool>>,
}

impl<'g, N> DiamondExpander<'g, N>
where
    N: Ord + Hash + Clone + Debug,
{
    /// Validate `seeds` against `graph` and prepare a run.
    ///
    /// Seeds missing from the network are logged and excluded. Repeated seeds are
    /// counted once.
    ///
    /// # Errors
    ///
    /// [`DiamondError::EmptySeedSet`] if no seed is present in the network.
    pub fn new<I>(graph: &'g Graph<N>, seeds: I) -> Result<Self>
    where
        I: IntoIterator<Item = N>,
    {
        let requested: BTreeSet<N> = seeds.into_iter().collect();

        let mut effective = Vec::with_capacity(requested.len());
        let mut excluded_seeds = Vec::new();
        for seed in requested {
            match graph.index_of(&seed) {
                Some(idx) => effective.push(idx),
                None => {
                    warn!(seed = ?seed, "seed gene not present in the network, excluding it");
                    excluded_seeds.push(seed);
                }
            }
        }

        if effective.is_empty() {
            return Err(DiamondError::EmptySeedSet);
        }
        effective.sort_unstable();

        let mut in_module = vec![false; graph.node_count()];
        for &idx in &effective {
            in_module[idx] = true;
        }

        Ok(DiamondExpander {
            graph,
            seeds: effective,
            excluded_seeds,
            in_module,
            pool: CandidatePool::new(),
            additions: Vec::new(),
            round: 0,
            state: ExpanderState::Ready,
            rules: StoppingRules::default(),
            parallel: true,
            cancel: None,
        })
    }

    /// Score candidates on the rayon pool (default) or on the calling thread.
    pub fn with_parallel_scoring(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Stop at the next round boundary once `flag` is set.
    pub fn with_cancellation(mut self, flag: Arc<AtomicBool>) -> Self {
        self.cancel = Some(flag);
        self
    }

    #[cfg(test)]
    pub(crate) fn with_rules(mut self, rules: StoppingRules) -> Self {
        self.rules = rules;
        self
    }

    pub fn state(&self) -> ExpanderState {
        self.state
    }

    pub fn graph(&self) -> &'g Graph<N> {
        self.graph
    }

    pub fn pool(&self) -> &CandidatePool {
        &self.pool
    }

    pub fn additions(&self) -> &[Addition<N>] {
        &self.additions
    }

    /// Effective seed indices, ascending.
    pub fn seeds(&self) -> &[NodeIndex] {
        &self.seeds
    }

    pub fn excluded_seeds(&self) -> &[N] {
        &self.excluded_seeds
    }

    /// Whether `node` is in the module. Out-of-range indices are not members.
    pub fn is_member(&self, node: NodeIndex) -> bool {
        self.in_module.get(node).copied().unwrap_or(false)
    }

    /// Current module size, seeds included.
    pub fn module_size(&self) -> usize {
        self.seeds.len() + self.additions.len()
    }

    /// Advance by one round and return the resulting state.
    ///
    /// On a finished expander this is a no-op returning the same state.
    pub fn step(&mut self) -> Result<ExpanderState> {
        match self.state {
            ExpanderState::Finished(_) => return Ok(self.state),
            ExpanderState::Ready => self.start(),
            ExpanderState::Running => {}
        }

        if self.is_cancelled() {
            return Ok(self.finish(TerminationReason::Cancelled));
        }

        let scored = self.score_candidates()?;
        let best = match select_candidate(scored) {
            Some(best) => best,
            None => return Ok(self.finish(TerminationReason::NoCandidates)),
        };

        if best.p_value > self.rules.significance {
            debug!(
                node = ?self.graph.node(best.node),
                p_value = best.p_value,
                "best candidate is not significant"
            );
            return Ok(self.finish(TerminationReason::NotSignificant));
        }

        self.commit(best);

        if self.additions.len() >= self.rules.max_additions {
            return Ok(self.finish(TerminationReason::SizeCapReached));
        }
        if self.round >= self.rules.max_rounds {
            return Ok(self.finish(TerminationReason::RoundCapReached));
        }
        Ok(self.state)
    }

    /// Run to completion.
    pub fn run(mut self) -> Result<ModuleReport<N>> {
        loop {
            if let ExpanderState::Finished(reason) = self.step()? {
                return Ok(self.build_report(reason));
            }
        }
    }

    /// Snapshot of the finished run, or `None` while it is still in progress.
    pub fn report(&self) -> Option<ModuleReport<N>> {
        match self.state {
            ExpanderState::Finished(reason) => Some(self.build_report(reason)),
            _ => None,
        }
    }

    fn start(&mut self) {
        info!(
            nodes = self.graph.node_count(),
            edges = self.graph.edge_count(),
            seeds = self.seeds.len(),
            excluded = self.excluded_seeds.len(),
            "starting DIAMOnD expansion"
        );
        self.pool.seed(self.graph, &self.in_module, &self.seeds);
        self.state = ExpanderState::Running;
    }

    fn is_cancelled(&self) -> bool {
        self.cancel
            .as_ref()
            .is_some_and(|flag| flag.load(AtomicOrdering::Relaxed))
    }

    /// Score every pool member for the current module size.
    ///
    /// Candidates sharing `(degree, connectivity)` share a p-value, so only the
    /// distinct pairs are evaluated.
    fn score_candidates(&self) -> Result<Vec<ScoredCandidate>> {
        let n = self.graph.node_count();
        let s = self.module_size();

        let candidates: Vec<(NodeIndex, usize)> = self.pool.candidates()?.collect();
        let keys: Vec<(usize, usize)> = candidates
            .iter()
            .map(|&(node, connectivity)| (self.graph.degree(node), connectivity))
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        let p_values: Vec<f64> = if self.parallel {
            keys.par_iter()
                .map(|&(degree, connectivity)| connectivity_p_value(n, s, degree, connectivity))
                .collect::<Result<_>>()?
        } else {
            keys.iter()
                .map(|&(degree, connectivity)| connectivity_p_value(n, s, degree, connectivity))
                .collect::<Result<_>>()?
        };

        trace!(
            round = self.round + 1,
            candidates = candidates.len(),
            distinct = keys.len(),
            "scored candidate pool"
        );

        let table: HashMap<(usize, usize), f64> = keys.into_iter().zip(p_values).collect();

        Ok(candidates
            .into_iter()
            .map(|(node, connectivity)| ScoredCandidate {
                node,
                connectivity,
                p_value: table[&(self.graph.degree(node), connectivity)],
            })
            .collect())
    }

    fn commit(&mut self, best: ScoredCandidate) {
        self.round += 1;
        let module_size_at_addition = self.module_size();

        self.in_module[best.node] = true;
        self.pool.absorb(self.graph, &self.in_module, best.node);

        let node = self.graph.node(best.node).clone();
        if self.round <= 10 || self.round % 10 == 0 {
            debug!(
                round = self.round,
                node = ?node,
                p_value = best.p_value,
                connectivity = best.connectivity,
                "added gene to module"
            );
        }

        self.additions.push(Addition {
            node,
            round: self.round,
            p_value: best.p_value,
            connectivity: best.connectivity,
            module_size_at_addition,
        });
    }

    fn finish(&mut self, reason: TerminationReason) -> ExpanderState {
        info!(
            reason = %reason,
            additions = self.additions.len(),
            module_size = self.module_size(),
            "DIAMOnD expansion finished"
        );
        self.state = ExpanderState::Finished(reason);
        self.state
    }

    fn build_report(&self, reason: TerminationReason) -> ModuleReport<N> {
        let seeds = self
            .seeds
            .iter()
            .map(|&idx| self.graph.node(idx).clone())
            .collect();
        ModuleReport::new(
            seeds,
            self.excluded_seeds.clone(),
            self.additions.clone(),
            reason,
        )
    }
}
