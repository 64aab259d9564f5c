//! # Composition run
//!
//! Loads the pipeline configuration, then drives the extract/count/normalize
//! pipeline across every configured region unit in parallel. Each unit is
//! isolated: a unit that fails is logged with its label and cause and the
//! remaining units still complete. The process exits nonzero if any unit
//! failed.

use anyhow::{bail, Result};
use log::*;
use ribocomp_lib::config::Config;
use ribocomp_lib::core::concurrency;
use ribocomp_lib::par_units::{label, ParUnits, DEFAULT_THREADS_STR};
use ribocomp_lib::paths;
use ribocomp_lib::pipeline::CompositionPipeline;
use std::fs;
use std::path::PathBuf;
use structopt::StructOpt;

/// Compute background-corrected nucleotide composition per region unit.
#[derive(StructOpt)]
#[structopt(author, name = "ribocomp")]
pub struct CompositionArgs {
    /// Pipeline configuration file.
    #[structopt(long, short = "c", default_value = "config.toml")]
    config: PathBuf,

    /// The number of worker threads; capped at the number of region units.
    #[structopt(long, short = "t", default_value = DEFAULT_THREADS_STR.as_str())]
    threads: usize,
}

pub fn run_composition(args: CompositionArgs) -> Result<()> {
    let config = Config::from_path(&args.config)?;
    let threads = concurrency::determine_allowed_cpus(args.threads)?;
    info!(
        "Running composition for sample {} ({} region units)",
        config.sample(),
        config.units().len().max(1)
    );

    let output_dir = paths::output_dir(&config);
    fs::create_dir_all(&output_dir)?;

    let units = config.units();
    let sample = config.sample().to_string();
    let runner = ParUnits::new(units, Some(threads), CompositionPipeline::new(config))?;

    let mut failed: Vec<String> = Vec::new();
    let mut completed = 0usize;
    for outcome in runner.process() {
        match outcome.result {
            Ok(summary) => {
                completed += 1;
                info!(
                    "Unit {} done: frequencies at {}",
                    summary.stem,
                    summary.frequencies.display()
                );
            }
            Err(err) => {
                error!("Unit {}: {:#}", label(&outcome.unit), err);
                failed.push(label(&outcome.unit).to_string());
            }
        }
    }

    if !failed.is_empty() {
        failed.sort();
        bail!(
            "{} of {} region units failed: {}",
            failed.len(),
            completed + failed.len(),
            failed.join(", ")
        );
    }

    println!("Composition module for {} ran successfully.", sample);
    Ok(())
}
