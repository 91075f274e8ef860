//! The checkpoint-and-resume build driver.
//!
//! - `BuildEngine`: iterates dates, runs stages, classifies outcomes, and
//!   finalizes each date in strictly ascending order
//! - `RunSummary`: OK/SKIP/FAIL counts reported when a run completes

mod engine;
mod summary;

pub use engine::{resolve_range, BuildEngine};
pub use summary::RunSummary;
