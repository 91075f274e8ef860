//! Per-day pipeline execution.
//!
//! - `Stage`, `CommandStage`: the opaque external stage contract
//! - `StageRunner`: fixed-order execution with short-circuit on failure
//! - `DayOutcome`, `Classification`: per-date result classification

mod outcome;
mod runner;
mod stage;

pub use outcome::{classify, Classification, DayOutcome, StageResult};
pub use runner::StageRunner;
pub use stage::{CommandStage, Stage, StageSignal};
