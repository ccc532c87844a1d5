//! # single-diamond
//!
//! A Rust library for network-based disease module detection, part of the single-rust ecosystem.
//!
//! Given a gene interaction network and a set of seed genes (for example differentially expressed
//! genes), this crate grows the seeds into a topologically coherent module with the DIAMOnD
//! algorithm and reports the hypergeometric significance of every gene it adds.
//!
//! ## Core Features
//!
//! - **Network Model**: Validated, read-only undirected networks on a sparse adjacency pattern
//! - **Connectivity Significance**: Overflow-free hypergeometric right-tail p-values
//! - **Module Detection**: Deterministic DIAMOnD expansion with fixed stopping rules
//! - **Reporting**: Ordered additions with p-values and connectivity, exportable as CSV
//!
//! ## Quick Start
//!
//! Build a [`network::Graph`] (or load one with [`network::io::read_edge_list`]), create a
//! [`propagation::DiamondExpander`] with the seed genes and call `run()` to obtain a
//! [`propagation::ModuleReport`].
//!
//! ## Module Organization
//!
//! - **[`network`]**: Interaction network model and edge-list / gene-list loaders
//! - **[`testing`]**: Statistical tests, in particular the hypergeometric connectivity test
//! - **[`propagation`]**: DIAMOnD module expansion, run reports and their export
//! - **[`error`]**: Error types

pub mod error;
pub mod network;
pub mod propagation;
pub mod testing;

pub use error::{DiamondError, Result};
