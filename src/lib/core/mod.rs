//! Shared helpers: filesystem, concurrency, and error inspection.

pub mod concurrency;
pub mod errors;
pub mod fs;
