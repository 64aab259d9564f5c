//! Per-unit output artifacts.
//!
//! Each region unit produces three write-once files: the audit dump of the
//! extracted sequence, the raw count table, and the normalized frequency
//! table. Every file is staged in a temporary sibling and renamed into place
//! so a concurrent reader never sees a half-written table.

use crate::composition::{BaseCounts, Composition, FREQ_DECIMALS};
use crate::core::fs::atomic_write;
use anyhow::{Context, Result};
use std::path::Path;

/// Persist the raw extracted sequence for auditing, as a single line.
pub fn write_nucs_tab(path: &Path, seq: &[u8]) -> Result<()> {
    let mut contents = Vec::with_capacity(seq.len() + 1);
    contents.extend_from_slice(seq);
    contents.push(b'\n');
    atomic_write(path, &contents)
        .with_context(|| format!("Failed to write sequence dump {}", path.display()))
}

/// Persist the base-count table as `symbol<TAB>count` rows in byte order.
pub fn write_counts(path: &Path, counts: &BaseCounts) -> Result<()> {
    let mut writer = tsv_writer();
    for (symbol, count) in counts.iter() {
        writer
            .write_record([&(symbol as char).to_string(), &count.to_string()])
            .with_context(|| format!("Failed to encode counts for {}", path.display()))?;
    }
    atomic_write(path, &into_bytes(writer)?)
        .with_context(|| format!("Failed to write count table {}", path.display()))
}

/// Persist the normalized frequency table as `r{base}<TAB>percent` rows in
/// A, C, G, T order.
pub fn write_frequencies(path: &Path, composition: &Composition) -> Result<()> {
    let mut writer = tsv_writer();
    for (label, percent) in composition.iter() {
        writer
            .write_record([
                &label,
                &format!("{:.*}", FREQ_DECIMALS as usize, percent),
            ])
            .with_context(|| format!("Failed to encode frequencies for {}", path.display()))?;
    }
    atomic_write(path, &into_bytes(writer)?)
        .with_context(|| format!("Failed to write frequency table {}", path.display()))
}

fn tsv_writer() -> csv::Writer<Vec<u8>> {
    csv::WriterBuilder::new()
        .delimiter(b'\t')
        .has_headers(false)
        .from_writer(Vec::new())
}

fn into_bytes(writer: csv::Writer<Vec<u8>>) -> Result<Vec<u8>> {
    writer
        .into_inner()
        .map_err(|err| anyhow::anyhow!("Failed to flush table to memory: {}", err))
}
