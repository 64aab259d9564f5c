//! ribocomp - ribonucleotide composition analysis
//!
//! Computes the nucleotide composition of ribonucleotide incorporation sites
//! relative to the genome-wide background frequency and reports normalized
//! relative abundances per base, per region unit.
//!
//! # Usage
//!
//! ```bash
//! # Run against the pipeline configuration in the working directory
//! ribocomp
//!
//! # Explicit configuration and worker count
//! ribocomp --config /data/ribose/config.toml --threads 4
//! ```
//!
//! Inputs (interval files, reference, background tables) and outputs are all
//! resolved from the configuration file; see the library documentation.

pub mod commands;

use anyhow::Result;
use env_logger::Env;
use log::*;
use ribocomp_lib::core::errors;
use structopt::StructOpt;

fn main() -> Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();
    if let Err(err) = commands::run_composition(commands::CompositionArgs::from_args()) {
        if errors::is_broken_pipe(&err) {
            std::process::exit(0);
        }
        error!("{:#}", err);
        std::process::exit(1);
    }
    Ok(())
}
