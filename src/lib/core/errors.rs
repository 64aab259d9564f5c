use anyhow::Error;
use std::io;

/// Returns `true` when the root cause of `err` is a broken pipe.
///
/// Writing to a closed pager or `head` is a normal way for a run to end and
/// should not be reported as a failure.
#[inline]
pub fn is_broken_pipe(err: &Error) -> bool {
    matches!(
        err.root_cause().downcast_ref::<io::Error>(),
        Some(io_err) if io_err.kind() == io::ErrorKind::BrokenPipe
    )
}
