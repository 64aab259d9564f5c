//! # Composition Engine
//!
//! Turns an extracted nucleotide sequence and a genome-wide background
//! frequency vector into background-corrected relative abundances.
//!
//! The normalization is a closed-form ratio correction: each base's observed
//! proportion is divided by its expected background frequency, and the four
//! resulting enrichment ratios are rescaled to sum to 100. The division order
//! (observed over background first, renormalize second) is the contract of
//! this module; reordering the steps changes the result.

use crate::errors::CompositionError;
use anyhow::{Context, Result};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// The canonical bases, in the fixed order used by every vector in this module.
pub const BASES: [u8; 4] = *b"ACGT";

/// Decimal places kept in reported percentages.
pub const FREQ_DECIMALS: i32 = 5;

/// Occurrence counts for every symbol observed in a raw sequence.
///
/// No filtering is applied: ambiguity codes and other non-ACGT symbols are
/// counted and included in the total, which means they suppress the apparent
/// frequency of the four canonical bases rather than being silently dropped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BaseCounts {
    counts: BTreeMap<u8, u64>,
    total: u64,
}

impl BaseCounts {
    /// Count every symbol in `seq`.
    pub fn from_seq(seq: &[u8]) -> Self {
        let mut counts: BTreeMap<u8, u64> = BTreeMap::new();
        for &symbol in seq {
            *counts.entry(symbol).or_insert(0) += 1;
        }
        let total = seq.len() as u64;
        Self { counts, total }
    }

    /// Build counts directly from (symbol, count) pairs.
    pub fn from_counts<I: IntoIterator<Item = (u8, u64)>>(pairs: I) -> Self {
        let counts: BTreeMap<u8, u64> = pairs.into_iter().collect();
        let total = counts.values().sum();
        Self { counts, total }
    }

    /// Occurrences of `symbol`, 0 when absent.
    pub fn get(&self, symbol: u8) -> u64 {
        self.counts.get(&symbol).copied().unwrap_or(0)
    }

    /// Sum of all counts, equal to the length of the counted sequence.
    pub fn total(&self) -> u64 {
        self.total
    }

    /// Iterate over (symbol, count) pairs in byte order.
    pub fn iter(&self) -> impl Iterator<Item = (u8, u64)> + '_ {
        self.counts.iter().map(|(&symbol, &count)| (symbol, count))
    }

    pub fn is_empty(&self) -> bool {
        self.total == 0
    }
}

/// Expected genome-wide frequency of A, C, G, T, in that order.
///
/// Loaded once per unit from a precomputed reference table and never mutated.
#[derive(Debug, Clone, PartialEq)]
pub struct Background([f64; 4]);

impl Background {
    /// Wrap four frequencies, rejecting non-positive entries.
    ///
    /// A zero frequency in a whole-genome background is a data-integrity
    /// problem, so it is refused here instead of surfacing later as a
    /// division by zero.
    pub fn new(freqs: [f64; 4]) -> Result<Self, CompositionError> {
        for (i, &value) in freqs.iter().enumerate() {
            if !(value > 0.0) {
                return Err(CompositionError::NonPositiveBackground {
                    base: BASES[i] as char,
                    value,
                });
            }
        }
        Ok(Self(freqs))
    }

    /// Load a background table.
    ///
    /// The table is one row per base in A, C, G, T order. Rows may be a bare
    /// frequency or `base<TAB>frequency`; the last whitespace-separated field
    /// of each non-empty line is taken as the value.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read background table {}", path.display()))?;

        let mut freqs = Vec::with_capacity(4);
        for (lineno, line) in text.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let field = match line.split_whitespace().last() {
                Some(field) => field,
                None => continue,
            };
            let value: f64 = field
                .parse()
                .map_err(|_| CompositionError::BackgroundParse {
                    path: path.to_path_buf(),
                    line: lineno + 1,
                    field: field.to_string(),
                })?;
            freqs.push(value);
        }

        let freqs: [f64; 4] =
            freqs
                .try_into()
                .map_err(|bad: Vec<f64>| CompositionError::BackgroundShape {
                    path: path.to_path_buf(),
                    found: bad.len(),
                })?;
        Ok(Self::new(freqs)?)
    }

    /// Expected frequency of the base at index `i` in [`BASES`] order.
    pub fn freq(&self, i: usize) -> f64 {
        self.0[i]
    }
}

/// Background-corrected relative abundances, in [`BASES`] order, summing to
/// 100 up to rounding at [`FREQ_DECIMALS`] places.
#[derive(Debug, Clone, PartialEq)]
pub struct Composition([f64; 4]);

impl Composition {
    /// Percentage for the base at index `i` in [`BASES`] order.
    pub fn percent(&self, i: usize) -> f64 {
        self.0[i]
    }

    /// Iterate over (label, percentage) pairs, labels `rA`..`rT`.
    pub fn iter(&self) -> impl Iterator<Item = (String, f64)> + '_ {
        BASES
            .iter()
            .zip(self.0.iter())
            .map(|(&base, &pct)| (format!("r{}", base as char), pct))
    }
}

/// Correct observed counts against the background and renormalize to 100.
///
/// For each canonical base: `observed = count / total`, `corrected = observed
/// / background`, `normalized = corrected / sum(corrected) * 100`, rounded to
/// [`FREQ_DECIMALS`] places. Fails on an empty sequence or when none of the
/// four canonical bases were observed.
pub fn normalize(
    counts: &BaseCounts,
    background: &Background,
) -> Result<Composition, CompositionError> {
    if counts.is_empty() {
        return Err(CompositionError::EmptySequence);
    }
    let total = counts.total() as f64;

    let mut corrected = [0.0f64; 4];
    for (i, &base) in BASES.iter().enumerate() {
        let observed = counts.get(base) as f64 / total;
        corrected[i] = observed / background.freq(i);
    }

    let denom: f64 = corrected.iter().sum();
    if denom == 0.0 {
        return Err(CompositionError::NoCanonicalBases);
    }

    let mut normalized = [0.0f64; 4];
    for i in 0..4 {
        normalized[i] = round_to(corrected[i] / denom * 100.0, FREQ_DECIMALS);
    }
    Ok(Composition(normalized))
}

fn round_to(value: f64, decimals: i32) -> f64 {
    let scale = 10f64.powi(decimals);
    (value * scale).round() / scale
}
