//! Loaders for edge-list networks and seed gene lists.
//!
//! These sit outside the propagation core: they turn text files into a
//! [`Graph<String>`] and a list of seed identifiers that resolve against it.

use crate::error::{DiamondError, Result};
use crate::network::Graph;
use anyhow::Context;
use std::collections::{HashMap, HashSet};
use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

/// Options controlling how an edge list is parsed.
#[derive(Debug, Clone)]
pub struct EdgeListOptions {
    /// Lines starting with this prefix are skipped.
    pub comment_prefix: String,
    /// Collapse repeated interactions instead of rejecting the network.
    pub collapse_duplicates: bool,
}

impl Default for EdgeListOptions {
    fn default() -> Self {
        EdgeListOptions {
            comment_prefix: "#".to_string(),
            collapse_duplicates: false,
        }
    }
}

impl EdgeListOptions {
    pub fn with_comment_prefix(mut self, prefix: &str) -> Self {
        self.comment_prefix = prefix.to_string();
        self
    }

    pub fn with_collapse_duplicates(mut self, collapse: bool) -> Self {
        self.collapse_duplicates = collapse;
        self
    }
}

/// Parse a whitespace-delimited edge list.
///
/// The first two columns of each line are the interacting genes; further columns
/// (scores, evidence channels) are ignored. Blank lines and comment lines are
/// skipped.
pub fn read_edge_list<R: Read>(reader: R, options: &EdgeListOptions) -> Result<Graph<String>> {
    let mut edges: Vec<(String, String)> = Vec::new();
    let mut seen: HashSet<(String, String)> = HashSet::new();

    for (line_idx, line) in BufReader::new(reader).lines().enumerate() {
        let line = line?;
        let trimmed = line.trim();
        if trimmed.is_empty()
            || (!options.comment_prefix.is_empty() && trimmed.starts_with(&options.comment_prefix))
        {
            continue;
        }

        let mut fields = trimmed.split_whitespace();
        let (a, b) = match (fields.next(), fields.next()) {
            (Some(a), Some(b)) => (a.to_string(), b.to_string()),
            _ => {
                return Err(DiamondError::Parse {
                    line: line_idx + 1,
                    message: format!("expected two interacting genes, found '{}'", trimmed),
                });
            }
        };

        if options.collapse_duplicates {
            let key = if a <= b {
                (a.clone(), b.clone())
            } else {
                (b.clone(), a.clone())
            };
            if !seen.insert(key) {
                continue;
            }
        }
        edges.push((a, b));
    }

    Graph::from_edges(edges)
}

pub fn read_edge_list_from_path<P: AsRef<Path>>(
    path: P,
    options: &EdgeListOptions,
) -> anyhow::Result<Graph<String>> {
    let path = path.as_ref();
    let file = File::open(path)
        .with_context(|| format!("could not open network file {}", path.display()))?;
    read_edge_list(file, options)
        .with_context(|| format!("could not load network from {}", path.display()))
}

/// Parse a gene list separated by newlines and/or commas.
///
/// Identifiers are trimmed, blanks are skipped and only the first occurrence of a
/// repeated identifier is kept.
pub fn read_gene_list<R: Read>(reader: R) -> Result<Vec<String>> {
    let mut content = String::new();
    BufReader::new(reader).read_to_string(&mut content)?;

    let mut seen = HashSet::new();
    Ok(content
        .split(|c: char| c == ',' || c == '\n' || c == '\r')
        .map(str::trim)
        .filter(|gene| !gene.is_empty())
        .filter(|gene| seen.insert(gene.to_string()))
        .map(str::to_string)
        .collect())
}

pub fn read_gene_list_from_path<P: AsRef<Path>>(path: P) -> anyhow::Result<Vec<String>> {
    let path = path.as_ref();
    let file = File::open(path)
        .with_context(|| format!("could not open gene list {}", path.display()))?;
    read_gene_list(file).with_context(|| format!("could not read gene list {}", path.display()))
}

/// Outcome of matching raw gene identifiers against the network's node names.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SeedResolution {
    /// Network identifiers to use as seeds, sorted.
    pub matched: Vec<String>,
    /// Input genes that did not resolve to any node.
    pub unresolved: Vec<String>,
    /// Whether the prefix fallback was needed.
    pub used_prefix_fallback: bool,
}

/// Strip a trailing isoform suffix: `3702.AT1G01010.1` becomes `3702.AT1G01010`.
///
/// Identifiers with a single dot (e.g. `3702.AT1G01010`) are left untouched, since
/// the dot there separates the taxon prefix from the locus.
pub fn strip_isoform(id: &str) -> &str {
    if id.matches('.').count() > 1 {
        match id.rfind('.') {
            Some(pos) => &id[..pos],
            None => id,
        }
    } else {
        id
    }
}

/// Resolve seed genes against the network's identifiers.
///
/// Each gene is matched exactly first, then with isoform suffixes stripped on both
/// sides. If no gene matches at all, every node whose identifier starts with one of
/// the genes is taken instead.
pub fn resolve_seeds(graph: &Graph<String>, genes: &[String]) -> SeedResolution {
    let mut by_stripped: HashMap<&str, Vec<&String>> = HashMap::new();
    for node in graph.nodes() {
        by_stripped.entry(strip_isoform(node)).or_default().push(node);
    }

    let mut matched: Vec<String> = Vec::new();
    let mut unresolved: Vec<String> = Vec::new();

    for gene in genes {
        if graph.contains(gene) {
            matched.push(gene.clone());
        } else if let Some(nodes) = by_stripped.get(strip_isoform(gene)) {
            matched.extend(nodes.iter().map(|n| (*n).clone()));
        } else {
            unresolved.push(gene.clone());
        }
    }

    let mut used_prefix_fallback = false;
    if matched.is_empty() && !genes.is_empty() {
        used_prefix_fallback = true;
        unresolved.clear();
        for gene in genes {
            let hits: Vec<&String> = graph
                .nodes()
                .iter()
                .filter(|node| node.starts_with(gene.as_str()))
                .collect();
            if hits.is_empty() {
                unresolved.push(gene.clone());
            }
            matched.extend(hits.into_iter().cloned());
        }
    }

    matched.sort();
    matched.dedup();

    SeedResolution {
        matched,
        unresolved,
        used_prefix_fallback,
    }
}
