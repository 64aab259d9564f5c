//! The per-unit composition pipeline.
//!
//! One call to [`CompositionPipeline::process_unit`] takes a region unit all
//! the way from its interval file to its two output tables: resolve paths,
//! extract the sequence, persist the audit dump, count, load the background,
//! normalize, write. Every step is tagged with the unit label so a failure
//! reads as "which unit, which stage, why".

use crate::composition::{self, BaseCounts, Background, BASES};
use crate::config::Config;
use crate::extract::RegionExtractor;
use crate::par_units::UnitProcessor;
use crate::paths::{self, UnitPaths};
use crate::report;
use anyhow::{ensure, Context, Result};
use log::info;
use std::path::PathBuf;

/// What one successful unit produced, for the final log summary.
#[derive(Debug, Clone)]
pub struct UnitSummary {
    /// File stem of the unit's artifacts, e.g. `FS1-CDS`.
    pub stem: String,
    /// Total number of counted symbols.
    pub total: u64,
    /// Counts of the four canonical bases, in A, C, G, T order.
    pub canonical: [u64; 4],
    /// Where the normalized frequencies landed.
    pub frequencies: PathBuf,
}

/// Drives the extract, count, normalize, and write steps for region units.
#[derive(Debug, Clone)]
pub struct CompositionPipeline {
    config: Config,
    extractor: RegionExtractor,
}

impl CompositionPipeline {
    pub fn new(config: Config) -> Self {
        let extractor = RegionExtractor::new(config.extractor(), config.fasta());
        Self { config, extractor }
    }

    fn run_unit(&self, unit: Option<&str>) -> Result<UnitSummary> {
        let paths = UnitPaths::resolve(&self.config, unit);

        // Check the two inputs up front so both problems surface at once in
        // the logs rather than one run apart.
        ensure!(
            paths.bed.is_file(),
            "Interval file {} not found; run the coordinate stage first",
            paths.bed.display()
        );
        ensure!(
            paths.background.is_file(),
            "Background table {} not found",
            paths.background.display()
        );

        let seq = self
            .extractor
            .extract(&paths.bed)
            .with_context(|| format!("Failed to extract {}", paths.bed.display()))?;
        report::write_nucs_tab(&paths.nucs_tab, &seq)?;

        let counts = BaseCounts::from_seq(&seq);
        let background = Background::from_path(&paths.background)?;
        let normalized = composition::normalize(&counts, &background).with_context(|| {
            format!("Failed to normalize counts from {}", paths.bed.display())
        })?;

        report::write_counts(&paths.counts, &counts)?;
        report::write_frequencies(&paths.frequencies, &normalized)?;

        let mut canonical = [0u64; 4];
        for (i, &base) in BASES.iter().enumerate() {
            canonical[i] = counts.get(base);
        }
        Ok(UnitSummary {
            stem: paths::unit_stem(self.config.sample(), unit),
            total: counts.total(),
            canonical,
            frequencies: paths.frequencies,
        })
    }
}

impl UnitProcessor for CompositionPipeline {
    type P = UnitSummary;

    fn process_unit(&self, unit: Option<&str>) -> Result<Self::P> {
        let summary = self
            .run_unit(unit)
            .with_context(|| format!("Unit '{}' failed", unit.unwrap_or("whole-sample")))?;
        info!(
            "Unit {}: {} sites, A/C/G/T = {}/{}/{}/{}",
            summary.stem,
            summary.total,
            summary.canonical[0],
            summary.canonical[1],
            summary.canonical[2],
            summary.canonical[3]
        );
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::tests::config_from_str;
    use crate::core::fs::make_parent_dirs;
    use std::fs;
    use std::os::unix::fs::PermissionsExt;
    use tempfile::TempDir;

    /// Lay out a minimal repository: coordinate bed, background table, and a
    /// stub extractor that prints a fixed FASTA stream.
    struct Fixture {
        _dir: TempDir,
        config: Config,
    }

    fn fixture(unit: Option<&str>, fasta_body: &str, background: &str) -> Fixture {
        let dir = TempDir::new().unwrap();
        let root = dir.path();

        let stem = match unit {
            Some(unit) => format!("FS1-{}", unit),
            None => "FS1".to_string(),
        };
        let bed = root.join(format!("results/FS1/coordinate30/{}.bed", stem));
        make_parent_dirs(&bed).unwrap();
        fs::write(&bed, "chrI\t10\t14\t.\t.\t+\n").unwrap();

        let bg_name = match unit {
            Some(unit) => format!("ref-{}.txt", unit),
            None => "ref.txt".to_string(),
        };
        fs::write(root.join(&bg_name), background).unwrap();

        let extractor = root.join("extractor.sh");
        fs::write(
            &extractor,
            format!("#!/bin/sh\nprintf '{}'\n", fasta_body),
        )
        .unwrap();
        fs::set_permissions(&extractor, fs::Permissions::from_mode(0o755)).unwrap();

        fs::create_dir_all(root.join("results/FS1/composition30")).unwrap();

        let config = config_from_str(&format!(
            r#"
            repository = "{root}"
            sample = "FS1"
            quality = "30"
            fasta = "{root}/ref.fa"
            units = "{units}"
            extractor = "{extractor}"
            "#,
            root = root.display(),
            units = unit.unwrap_or(""),
            extractor = extractor.display(),
        ))
        .unwrap();

        Fixture { _dir: dir, config }
    }

    const UNIFORM_BG: &str = "A\t0.25\nC\t0.25\nG\t0.25\nT\t0.25\n";

    #[test]
    fn whole_sample_unit_writes_all_three_artifacts() {
        let fx = fixture(None, ">chrI:10-14(+)\\nacgt\\n>x\\nAACC\\n", UNIFORM_BG);
        let pipeline = CompositionPipeline::new(fx.config.clone());
        let summary = pipeline.process_unit(None).unwrap();

        assert_eq!(summary.stem, "FS1");
        assert_eq!(summary.total, 8);
        assert_eq!(summary.canonical, [3, 3, 1, 1]);

        let out = UnitPaths::resolve(&fx.config, None);
        assert_eq!(fs::read(&out.nucs_tab).unwrap(), b"ACGTAACC\n");
        assert_eq!(
            fs::read_to_string(&out.counts).unwrap(),
            "A\t3\nC\t3\nG\t1\nT\t1\n"
        );
        assert_eq!(
            fs::read_to_string(&out.frequencies).unwrap(),
            "rA\t37.50000\nrC\t37.50000\nrG\t12.50000\nrT\t12.50000\n"
        );
    }

    #[test]
    fn labeled_unit_resolves_suffixed_inputs() {
        let fx = fixture(Some("CDS"), ">a\\nACGT\\n", UNIFORM_BG);
        let pipeline = CompositionPipeline::new(fx.config.clone());
        let summary = pipeline.process_unit(Some("CDS")).unwrap();
        assert_eq!(summary.stem, "FS1-CDS");
        assert!(UnitPaths::resolve(&fx.config, Some("CDS")).frequencies.is_file());
    }

    #[test]
    fn missing_background_table_fails_with_its_path() {
        let fx = fixture(None, ">a\\nACGT\\n", UNIFORM_BG);
        let pipeline = CompositionPipeline::new(fx.config.clone());
        let missing = UnitPaths::resolve(&fx.config, None).background;
        fs::remove_file(&missing).unwrap();
        let err = pipeline.process_unit(None).unwrap_err();
        assert!(format!("{:#}", err).contains("Background table"));
    }

    #[test]
    fn empty_extraction_fails_and_leaves_no_tables() {
        let fx = fixture(None, ">only-a-header\\n", UNIFORM_BG);
        let pipeline = CompositionPipeline::new(fx.config.clone());
        assert!(pipeline.process_unit(None).is_err());
        let out = UnitPaths::resolve(&fx.config, None);
        // The audit dump exists for debugging, but neither table was written.
        assert!(out.nucs_tab.is_file());
        assert!(!out.counts.exists());
        assert!(!out.frequencies.exists());
    }

    #[test]
    fn zero_background_entry_fails_the_unit() {
        let fx = fixture(None, ">a\\nACGT\\n", "A\t0.25\nC\t0\nG\t0.25\nT\t0.25\n");
        let pipeline = CompositionPipeline::new(fx.config.clone());
        let err = pipeline.process_unit(None).unwrap_err();
        assert!(format!("{:#}", err).contains("must be positive"));
    }
}
