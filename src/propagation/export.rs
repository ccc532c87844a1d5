//! Tabular output of a finished run.

use crate::error::Result;
use crate::propagation::report::ModuleReport;
use anyhow::Context;
use serde::Serialize;
use std::fmt::Display;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

#[derive(Debug, Serialize)]
struct ResultRow {
    gene: String,
    kind: &'static str,
    round_added: Option<usize>,
    p_value: Option<f64>,
    connectivity: Option<usize>,
    module_size_at_addition: Option<usize>,
}

/// Write the module as CSV: one row per seed (statistics left empty), then one row
/// per addition in round order.
pub fn write_results_table<N, W>(report: &ModuleReport<N>, writer: W) -> Result<()>
where
    N: Clone + Display,
    W: Write,
{
    let mut wtr = csv::Writer::from_writer(writer);

    for seed in report.seeds() {
        wtr.serialize(ResultRow {
            gene: seed.to_string(),
            kind: "seed",
            round_added: None,
            p_value: None,
            connectivity: None,
            module_size_at_addition: None,
        })?;
    }

    for addition in report.additions() {
        wtr.serialize(ResultRow {
            gene: addition.node.to_string(),
            kind: "added",
            round_added: Some(addition.round),
            p_value: Some(addition.p_value),
            connectivity: Some(addition.connectivity),
            module_size_at_addition: Some(addition.module_size_at_addition),
        })?;
    }

    wtr.flush()?;
    Ok(())
}

/// Write every module gene on its own line, seeds first.
pub fn write_gene_list<N, W>(report: &ModuleReport<N>, mut writer: W) -> Result<()>
where
    N: Clone + Display,
    W: Write,
{
    for gene in report.module_genes() {
        writeln!(writer, "{}", gene)?;
    }
    writer.flush()?;
    Ok(())
}

pub fn write_results_table_to_path<N, P>(report: &ModuleReport<N>, path: P) -> anyhow::Result<()>
where
    N: Clone + Display,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let file = File::create(path)
        .with_context(|| format!("could not create results table {}", path.display()))?;
    write_results_table(report, BufWriter::new(file))
        .with_context(|| format!("could not write results table {}", path.display()))
}

pub fn write_gene_list_to_path<N, P>(report: &ModuleReport<N>, path: P) -> anyhow::Result<()>
where
    N: Clone + Display,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let file = File::create(path)
        .with_context(|| format!("could not create gene list {}", path.display()))?;
    write_gene_list(report, BufWriter::new(file))
        .with_context(|| format!("could not write gene list {}", path.display()))
}
