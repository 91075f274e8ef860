//! Per-day output tables and their accumulation.
//!
//! - `DayTable`: opaque header-plus-rows view of one day's output
//! - `SnapshotWriter`: immutable dated per-day artifacts
//! - `MasterAppender`: idempotent, schema-checked accumulation into the
//!   single master dataset

mod master;
mod snapshot;
mod table;

pub use master::{AppendStatus, MasterAppender};
pub use snapshot::SnapshotWriter;
pub use table::DayTable;
