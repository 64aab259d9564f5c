//! # ParUnits
//!
//! Runs independent region units in parallel.
//!
//! A region unit is a named partition of the sample's intervals (or the
//! implicit whole-sample partition when the run is not partitioned). Units
//! share no mutable state: each reads its own interval file, spawns its own
//! extractor process, and writes its own output files, so the scheduler's
//! only job is to dispatch them onto a bounded worker pool and collect one
//! outcome per unit.
//!
//! The main struct is [`ParUnits`], configured with a [`UnitProcessor`]
//! implementation that defines what processing a unit means. Outcomes are
//! delivered over a channel as each unit finishes; a failing unit surfaces as
//! an `Err` outcome and never prevents its siblings from completing.

use anyhow::Result;
use crossbeam::channel::{bounded, Receiver};
use lazy_static::lazy_static;
use log::*;
use rayon::prelude::*;
use std::thread;

lazy_static! {
    /// Available CPU count as a str, for CLI default values.
    pub static ref DEFAULT_THREADS_STR: String = num_cpus::get().to_string();
}

/// UnitProcessor defines how a single region unit is processed.
///
/// The associated type `P` is the per-unit summary produced on success; the
/// scheduler wraps it in a [`UnitOutcome`] together with the unit label.
pub trait UnitProcessor {
    /// Per-unit success value sent back to the caller.
    type P: 'static + Send + Sync;

    /// Process one region unit. `unit` is `None` for the implicit
    /// whole-sample unit.
    ///
    /// Errors returned here are captured in the unit's outcome; they must not
    /// panic the worker.
    fn process_unit(&self, unit: Option<&str>) -> Result<Self::P>;
}

/// The result of one unit's pipeline, tagged with its label.
#[derive(Debug)]
pub struct UnitOutcome<P> {
    /// The unit label, `None` for the whole-sample unit.
    pub unit: Option<String>,
    /// The unit's summary, or the error that ended its pipeline.
    pub result: Result<P>,
}

/// Holds the unit list, worker pool, and processor needed to launch
/// [`ParUnits::process`].
#[derive(Debug)]
pub struct ParUnits<R: 'static + UnitProcessor + Send + Sync> {
    units: Vec<Option<String>>,
    pool: rayon::ThreadPool,
    processor: R,
}

impl<R: UnitProcessor + Send + Sync> ParUnits<R> {
    /// Create a ParUnits runner.
    ///
    /// An empty `units` list becomes the single implicit whole-sample unit.
    /// `threads` defaults to the available CPUs and is capped at the number
    /// of units, since each worker holds at most one blocking extractor
    /// process.
    pub fn new(units: Vec<String>, threads: Option<usize>, processor: R) -> Result<Self> {
        let units: Vec<Option<String>> = if units.is_empty() {
            vec![None]
        } else {
            units.into_iter().map(Some).collect()
        };

        let threads = threads.unwrap_or_else(num_cpus::get).max(1).min(units.len());
        info!("Using {} worker threads for {} units.", threads, units.len());
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build()?;

        Ok(Self {
            units,
            pool,
            processor,
        })
    }

    /// Launch processing of every unit.
    ///
    /// Units are dispatched onto the pool and their outcomes sent back over
    /// the returned channel as they finish, in no guaranteed order. The
    /// channel is sized to hold every outcome, so workers never block on a
    /// slow consumer.
    pub fn process(self) -> Receiver<UnitOutcome<R::P>> {
        let ParUnits {
            units,
            pool,
            processor,
        } = self;

        let (sender, receiver) = bounded::<UnitOutcome<R::P>>(units.len());
        thread::spawn(move || {
            pool.install(move || {
                units.into_par_iter().for_each_with(sender, |sender, unit| {
                    debug!("Processing unit {}", label(&unit));
                    let result = processor.process_unit(unit.as_deref());
                    let outcome = UnitOutcome { unit, result };
                    if sender.send(outcome).is_err() {
                        warn!("Outcome channel closed, collector may have disconnected");
                    }
                });
            });
        });
        receiver
    }
}

/// Human-readable unit name for log lines.
pub fn label(unit: &Option<String>) -> &str {
    unit.as_deref().unwrap_or("whole-sample")
}
