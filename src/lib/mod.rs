//! ribocomp: background-corrected nucleotide composition of ribonucleotide
//! incorporation sites.
//!
//! This library is the composition stage of a ribonucleotide sequencing
//! pipeline. Upstream stages have already mapped incorporation events to
//! genomic intervals; this stage extracts the nucleotides at those intervals,
//! counts them, and corrects the counts against a genome-wide background
//! frequency so that the reported percentages reflect enrichment rather than
//! raw genome composition.
//!
//! # Modules
//!
//! - [`config`]: the immutable pipeline configuration read at startup
//! - [`paths`]: per-unit input/output path resolution
//! - [`extract`]: invocation of the external interval-to-sequence extractor
//! - [`composition`]: base counting and background normalization
//! - [`report`]: the per-unit output artifacts
//! - [`par_units`]: parallel dispatch of independent region units
//! - [`pipeline`]: the per-unit extract/count/normalize/write pipeline

pub mod composition;
pub mod config;
pub mod core;
pub mod errors;
pub mod extract;
pub mod par_units;
pub mod paths;
pub mod pipeline;
pub mod report;
