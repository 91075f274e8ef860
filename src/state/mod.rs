//! Durable run state.
//!
//! - `CheckpointStore`: last-finalized-date marker for crash-safe resume
//! - `RunLog`: append-only NDJSON journal of per-date outcomes

mod checkpoint;
mod runlog;

pub use checkpoint::CheckpointStore;
pub use runlog::{RunLog, RunLogEntry};
