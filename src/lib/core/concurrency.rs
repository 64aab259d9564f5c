use anyhow::{bail, Result};
use log::warn;

/// Validate and normalize a requested worker count.
///
/// Zero workers is a configuration error. Requests beyond the available CPUs
/// are honored with a warning since the work here is dominated by blocking on
/// an external process rather than computation.
pub fn determine_allowed_cpus(desired: usize) -> Result<usize> {
    if desired == 0 {
        bail!("Must select > 0 threads");
    }
    if desired > num_cpus::get() {
        warn!(
            "Specified more threads than are available, using {}",
            desired
        );
    }
    Ok(desired)
}
