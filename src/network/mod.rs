//! In-memory gene interaction network.
//!
//! The network is undirected and unweighted. Adjacency is stored as a symmetric
//! sparse pattern in a `CsrMatrix`, so the neighbors of a node are a contiguous,
//! sorted slice of column indices and its degree is the row length.
//!
//! Node identifiers are kept in ascending order: the index of a node is its rank
//! under the identifier ordering. Any rule of the form "lowest identifier wins"
//! can therefore be evaluated on indices alone.

use crate::error::{DiamondError, Result};
use nalgebra_sparse::{CooMatrix, CsrMatrix};
use std::collections::{HashMap, HashSet};
use std::fmt::Debug;
use std::hash::Hash;

pub mod io;

/// Position of a node inside a [`Graph`].
pub type NodeIndex = usize;

/// Read-only, validated interaction graph.
#[derive(Debug, Clone)]
pub struct Graph<N> {
    nodes: Vec<N>,
    index: HashMap<N, NodeIndex>,
    adjacency: CsrMatrix<u8>,
    n_edges: usize,
}

impl<N> Graph<N>
where
    N: Ord + Hash + Clone + Debug,
{
    /// Build a graph from an explicit node list and an edge list.
    ///
    /// Nodes without edges are allowed and count towards the network size.
    ///
    /// # Errors
    ///
    /// Returns [`DiamondError::InvalidGraph`] if a node is listed twice, an edge
    /// references an unknown node, an edge is a self-loop, or the same pair of
    /// nodes is connected more than once (in either orientation).
    pub fn new<I, E>(nodes: I, edges: E) -> Result<Self>
    where
        I: IntoIterator<Item = N>,
        E: IntoIterator<Item = (N, N)>,
    {
        let mut nodes: Vec<N> = nodes.into_iter().collect();
        nodes.sort();
        if let Some(pair) = nodes.windows(2).find(|pair| pair[0] == pair[1]) {
            return Err(DiamondError::InvalidGraph(format!(
                "node {:?} is listed more than once",
                pair[0]
            )));
        }

        let index: HashMap<N, NodeIndex> = nodes
            .iter()
            .enumerate()
            .map(|(i, node)| (node.clone(), i))
            .collect();

        let mut seen: HashSet<(NodeIndex, NodeIndex)> = HashSet::new();
        let mut coo = CooMatrix::new(nodes.len(), nodes.len());

        for (a, b) in edges {
            let ia = *index.get(&a).ok_or_else(|| {
                DiamondError::InvalidGraph(format!("edge endpoint {:?} is not a node", a))
            })?;
            let ib = *index.get(&b).ok_or_else(|| {
                DiamondError::InvalidGraph(format!("edge endpoint {:?} is not a node", b))
            })?;

            if ia == ib {
                return Err(DiamondError::InvalidGraph(format!(
                    "self-loop on node {:?}",
                    a
                )));
            }

            let key = (ia.min(ib), ia.max(ib));
            if !seen.insert(key) {
                return Err(DiamondError::InvalidGraph(format!(
                    "duplicate edge {:?} - {:?}",
                    a, b
                )));
            }

            coo.push(ia, ib, 1u8);
            coo.push(ib, ia, 1u8);
        }

        Ok(Graph {
            nodes,
            index,
            adjacency: CsrMatrix::from(&coo),
            n_edges: seen.len(),
        })
    }

    /// Build a graph whose node set is exactly the set of edge endpoints.
    pub fn from_edges<E>(edges: E) -> Result<Self>
    where
        E: IntoIterator<Item = (N, N)>,
    {
        let edges: Vec<(N, N)> = edges.into_iter().collect();
        let mut nodes: Vec<N> = edges
            .iter()
            .flat_map(|(a, b)| [a.clone(), b.clone()])
            .collect();
        nodes.sort();
        nodes.dedup();
        Self::new(nodes, edges)
    }

    /// Index of `node`, if it belongs to the graph.
    pub fn index_of(&self, node: &N) -> Option<NodeIndex> {
        self.index.get(node).copied()
    }

    pub fn contains(&self, node: &N) -> bool {
        self.index.contains_key(node)
    }
}

impl<N> Graph<N> {
    /// Total number of nodes `N`.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Total number of undirected edges.
    pub fn edge_count(&self) -> usize {
        self.n_edges
    }

    /// Identifier of the node at `idx`.
    ///
    /// # Panics
    ///
    /// Panics if `idx` is out of bounds.
    pub fn node(&self, idx: NodeIndex) -> &N {
        &self.nodes[idx]
    }

    /// All node identifiers in ascending order.
    pub fn nodes(&self) -> &[N] {
        &self.nodes
    }

    /// Degree of the node at `idx` in the full graph.
    pub fn degree(&self, idx: NodeIndex) -> usize {
        self.adjacency.row(idx).nnz()
    }

    /// Neighbors of the node at `idx`, sorted by index.
    pub fn neighbors(&self, idx: NodeIndex) -> &[NodeIndex] {
        let offsets = self.adjacency.row_offsets();
        &self.adjacency.col_indices()[offsets[idx]..offsets[idx + 1]]
    }

    /// Whether `a` and `b` share an edge. O(log degree).
    pub fn has_edge(&self, a: NodeIndex, b: NodeIndex) -> bool {
        self.neighbors(a).binary_search(&b).is_ok()
    }
}
