//! Pipeline configuration.
//!
//! The configuration is read once at startup and passed by value into the
//! orchestrator and the per-unit pipeline; nothing in this crate reads
//! configuration from process-global state.

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Immutable settings shared by every pipeline stage, deserialized from the
/// TOML configuration file the wider pipeline maintains per run.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Space-separated region-unit labels; empty means a single whole-sample
    /// run without partitioning.
    #[serde(default)]
    units: String,
    /// Root of the pipeline results tree.
    repository: PathBuf,
    /// Sample identifier, used in every path this stage touches.
    sample: String,
    /// Quality suffix shared with the upstream coordinate stage, e.g. `30`.
    #[serde(default)]
    quality: String,
    /// Reference sequence handed to the extractor; its file stem also names
    /// the background tables.
    fasta: PathBuf,
    /// Directory holding the background frequency tables. Defaults to the
    /// repository root.
    backgrounds: Option<PathBuf>,
    /// Interval-to-sequence program. Defaults to `bedtools` on `PATH`.
    #[serde(default = "default_extractor")]
    extractor: PathBuf,
}

fn default_extractor() -> PathBuf {
    PathBuf::from("bedtools")
}

impl Config {
    /// Read and validate the configuration file at `path`.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read configuration file {}", path.display()))?;
        let config: Config = toml::from_str(&text)
            .with_context(|| format!("Failed to parse configuration file {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.sample.trim().is_empty() {
            bail!("Configuration key 'sample' must not be empty");
        }
        for unit in self.units() {
            if unit.contains('/') || unit.contains('\\') {
                bail!("Region unit label '{}' must not contain path separators", unit);
            }
        }
        Ok(())
    }

    /// The configured region-unit labels, in order. Empty when the run is not
    /// partitioned.
    pub fn units(&self) -> Vec<String> {
        self.units.split_whitespace().map(str::to_owned).collect()
    }

    pub fn repository(&self) -> &Path {
        &self.repository
    }

    pub fn sample(&self) -> &str {
        &self.sample
    }

    pub fn quality(&self) -> &str {
        &self.quality
    }

    pub fn fasta(&self) -> &Path {
        &self.fasta
    }

    /// Directory holding the background tables.
    pub fn backgrounds(&self) -> &Path {
        self.backgrounds.as_deref().unwrap_or(&self.repository)
    }

    pub fn extractor(&self) -> &Path {
        &self.extractor
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Parse a config from an in-memory TOML string; shared with other
    /// modules' tests.
    pub(crate) fn config_from_str(text: &str) -> Result<Config> {
        let config: Config = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    const MINIMAL: &str = r#"
        repository = "/data/ribose"
        sample = "FS1"
        fasta = "/refs/sacCer2.fa"
    "#;

    #[test]
    fn minimal_config_fills_defaults() {
        let config = config_from_str(MINIMAL).unwrap();
        assert!(config.units().is_empty());
        assert_eq!(config.quality(), "");
        assert_eq!(config.backgrounds(), Path::new("/data/ribose"));
        assert_eq!(config.extractor(), Path::new("bedtools"));
    }

    #[test]
    fn units_split_on_whitespace() {
        let config = config_from_str(&format!("{MINIMAL}\nunits = \"CDS  UTR tRNA\"")).unwrap();
        assert_eq!(config.units(), ["CDS", "UTR", "tRNA"]);
    }

    #[test]
    fn missing_required_key_is_fatal() {
        assert!(config_from_str("sample = \"FS1\"").is_err());
    }

    #[test]
    fn empty_sample_is_fatal() {
        let text = r#"
            repository = "/data"
            sample = "  "
            fasta = "ref.fa"
        "#;
        assert!(config_from_str(text).is_err());
    }

    #[test]
    fn unit_label_with_separator_is_fatal() {
        assert!(config_from_str(&format!("{MINIMAL}\nunits = \"CDS ../etc\"")).is_err());
    }

    #[test]
    fn from_path_reports_missing_file() {
        let err = Config::from_path("/nonexistent/config.toml").unwrap_err();
        assert!(err.to_string().contains("config.toml"));
    }
}
