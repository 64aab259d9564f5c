//! Typed errors for the composition stage.

use std::path::PathBuf;
use std::process::ExitStatus;
use thiserror::Error;

/// Failures that can end a single region unit's pipeline.
///
/// Data errors are deliberately fatal for the unit: a zero background
/// frequency or an empty extraction is a data-integrity signal, and reporting
/// `inf`/`NaN` percentages would hide it.
#[derive(Error, Debug)]
pub enum CompositionError {
    #[error("extracted sequence is empty")]
    EmptySequence,

    #[error("extracted sequence contains none of A, C, G, T")]
    NoCanonicalBases,

    #[error("background frequency for {base} must be positive, got {value}")]
    NonPositiveBackground { base: char, value: f64 },

    #[error("background table {path} has {found} entries, expected one per base (4)")]
    BackgroundShape { path: PathBuf, found: usize },

    #[error("background table {path}, line {line}: cannot parse '{field}' as a frequency")]
    BackgroundParse {
        path: PathBuf,
        line: usize,
        field: String,
    },

    #[error("{program} exited with {status}: {stderr}")]
    ExtractorFailed {
        program: String,
        status: ExitStatus,
        stderr: String,
    },
}
