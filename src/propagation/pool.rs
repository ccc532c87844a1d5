//! Incrementally maintained frontier of the module.
//!
//! For every node `v` outside the module but adjacent to it the pool stores
//! `|neighbors(v) ∩ module|`. After [`CandidatePool::seed`] the counts are exact;
//! each [`CandidatePool::absorb`] only touches the neighbors of the node that just
//! joined the module, which are the only nodes whose count can change.

use crate::error::{DiamondError, Result};
use crate::network::{Graph, NodeIndex};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default)]
pub struct CandidatePool {
    counts: BTreeMap<NodeIndex, usize>,
    seeded: bool,
}

impl CandidatePool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Initialize from the current module.
    ///
    /// `in_module` is indexed by node and must be `true` exactly for `members`.
    /// Runs in O(sum of member degrees); any previous content is discarded.
    pub fn seed<N>(&mut self, graph: &Graph<N>, in_module: &[bool], members: &[NodeIndex]) {
        self.counts.clear();
        for &member in members {
            for &neighbor in graph.neighbors(member) {
                if !in_module[neighbor] {
                    *self.counts.entry(neighbor).or_insert(0) += 1;
                }
            }
        }
        self.seeded = true;
    }

    /// Update the pool after `new_node` has been committed to the module.
    ///
    /// `in_module[new_node]` must already be `true`.
    pub fn absorb<N>(&mut self, graph: &Graph<N>, in_module: &[bool], new_node: NodeIndex) {
        self.counts.remove(&new_node);
        for &neighbor in graph.neighbors(new_node) {
            if in_module[neighbor] {
                continue;
            }
            *self.counts.entry(neighbor).or_insert(0) += 1;
        }
    }

    /// Current `(node, connection_count)` entries in ascending node order.
    ///
    /// # Errors
    ///
    /// [`DiamondError::PoolNotSeeded`] if [`CandidatePool::seed`] was never called.
    pub fn candidates(&self) -> Result<impl Iterator<Item = (NodeIndex, usize)> + '_> {
        if !self.seeded {
            return Err(DiamondError::PoolNotSeeded);
        }
        Ok(self.counts.iter().map(|(&node, &count)| (node, count)))
    }

    pub fn connection_count(&self, node: NodeIndex) -> Option<usize> {
        self.counts.get(&node).copied()
    }

    pub fn contains(&self, node: NodeIndex) -> bool {
        self.counts.contains_key(&node)
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn is_seeded(&self) -> bool {
        self.seeded
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use proptest::sample::Index;

    /// Recompute the frontier from scratch.
    fn frontier<N>(graph: &Graph<N>, in_module: &[bool]) -> BTreeMap<NodeIndex, usize> {
        let mut expected = BTreeMap::new();
        for v in 0..graph.node_count() {
            if in_module[v] {
                continue;
            }
            let count = graph.neighbors(v).iter().filter(|&&u| in_module[u]).count();
            if count > 0 {
                expected.insert(v, count);
            }
        }
        expected
    }

    fn entries(pool: &CandidatePool) -> BTreeMap<NodeIndex, usize> {
        pool.candidates().unwrap().collect()
    }

    #[test]
    fn test_candidates_before_seed_fails() {
        let pool = CandidatePool::new();
        assert!(matches!(pool.candidates(), Err(DiamondError::PoolNotSeeded)));
    }

    #[test]
    fn test_seed_and_absorb_on_path() {
        // 1 - 2 - 3 - 4 - 5 with module {1, 5}
        let graph = Graph::from_edges(vec![(1, 2), (2, 3), (3, 4), (4, 5)]).unwrap();
        let mut in_module = vec![false; 5];
        in_module[0] = true;
        in_module[4] = true;

        let mut pool = CandidatePool::new();
        pool.seed(&graph, &in_module, &[0, 4]);
        assert_eq!(entries(&pool), BTreeMap::from([(1, 1), (3, 1)]));
        assert!(!pool.contains(2));

        // Commit node 2 (index 1): node 3 (index 2) enters with one connection.
        in_module[1] = true;
        pool.absorb(&graph, &in_module, 1);
        assert_eq!(entries(&pool), BTreeMap::from([(2, 1), (3, 1)]));

        // Commit node 4 (index 3): node 3 now touches two module members.
        in_module[3] = true;
        pool.absorb(&graph, &in_module, 3);
        assert_eq!(entries(&pool), BTreeMap::from([(2, 2)]));
        assert_eq!(pool.connection_count(2), Some(2));
    }

    #[test]
    fn test_empty_frontier_is_seeded_and_empty() {
        let graph = Graph::new(vec![1, 2, 3], vec![(2, 3)]).unwrap();
        let in_module = vec![true, false, false];

        let mut pool = CandidatePool::new();
        pool.seed(&graph, &in_module, &[0]);
        assert!(pool.is_seeded());
        assert!(pool.is_empty());
        assert_eq!(pool.candidates().unwrap().count(), 0);
    }

    fn arb_graph() -> impl Strategy<Value = Graph<u32>> {
        prop::collection::vec((0u32..25, 0u32..25), 0..120).prop_map(|pairs| {
            let mut edges: Vec<(u32, u32)> = pairs
                .into_iter()
                .filter(|(a, b)| a != b)
                .map(|(a, b)| (a.min(b), a.max(b)))
                .collect();
            edges.sort();
            edges.dedup();
            Graph::new(0u32..25, edges).unwrap()
        })
    }

    proptest! {
        #[test]
        fn prop_counts_match_recomputation(
            graph in arb_graph(),
            seeds in prop::collection::btree_set(0usize..25, 1..6),
            picks in prop::collection::vec(any::<Index>(), 0..25),
        ) {
            let mut in_module = vec![false; graph.node_count()];
            let members: Vec<NodeIndex> = seeds.into_iter().collect();
            for &m in &members {
                in_module[m] = true;
            }

            let mut pool = CandidatePool::new();
            pool.seed(&graph, &in_module, &members);
            prop_assert_eq!(entries(&pool), frontier(&graph, &in_module));

            for pick in picks {
                let candidates: Vec<(NodeIndex, usize)> = pool.candidates().unwrap().collect();
                if candidates.is_empty() {
                    break;
                }
                let (node, _) = candidates[pick.index(candidates.len())];
                in_module[node] = true;
                pool.absorb(&graph, &in_module, node);

                prop_assert!(!pool.contains(node));
                prop_assert_eq!(entries(&pool), frontier(&graph, &in_module));
            }
        }
    }
}
