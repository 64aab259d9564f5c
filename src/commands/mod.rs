pub mod composition;

pub use composition::{run_composition, CompositionArgs};
