//! Per-unit path resolution.
//!
//! Every file a region unit touches is derived here, in one place, from the
//! configuration and the optional unit label. The counting and normalization
//! stages both consume the same record, so the two can never disagree about
//! where a unit's files live.

use crate::config::Config;
use std::path::{Path, PathBuf};

/// All input and output locations for one region unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnitPaths {
    /// Interval set produced by the upstream coordinate stage.
    pub bed: PathBuf,
    /// Audit dump of the extracted raw sequence.
    pub nucs_tab: PathBuf,
    /// Raw base-count table.
    pub counts: PathBuf,
    /// Normalized frequency table.
    pub frequencies: PathBuf,
    /// Precomputed background frequency table for the reference (and unit).
    pub background: PathBuf,
}

impl UnitPaths {
    /// Resolve every path for `unit` (`None` for the whole-sample unit).
    pub fn resolve(config: &Config, unit: Option<&str>) -> Self {
        let stem = unit_stem(config.sample(), unit);
        let sample_dir = config.repository().join("results").join(config.sample());
        let coordinate_dir = sample_dir.join(format!("coordinate{}", config.quality()));
        let output_dir = output_dir(config);

        let fasta_stem = file_stem(config.fasta());
        let background_name = match unit {
            Some(unit) => format!("{}-{}.txt", fasta_stem, unit),
            None => format!("{}.txt", fasta_stem),
        };

        Self {
            bed: coordinate_dir.join(format!("{}.bed", stem)),
            nucs_tab: output_dir.join(format!("{}.nucs.tab", stem)),
            counts: output_dir.join(format!("{}.counts.txt", stem)),
            frequencies: output_dir.join(format!("{}.frequencies.txt", stem)),
            background: config.backgrounds().join(background_name),
        }
    }
}

/// Directory receiving every artifact this stage writes for the sample.
pub fn output_dir(config: &Config) -> PathBuf {
    config
        .repository()
        .join("results")
        .join(config.sample())
        .join(format!("composition{}", config.quality()))
}

/// File stem shared by a unit's artifacts: `sample` or `sample-unit`.
pub fn unit_stem(sample: &str, unit: Option<&str>) -> String {
    match unit {
        Some(unit) => format!("{}-{}", sample, unit),
        None => sample.to_owned(),
    }
}

fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default()
}
