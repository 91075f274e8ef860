pub mod builder;
pub mod cli;
pub mod config;
pub mod dataset;
pub mod error;
pub mod pipeline;
pub mod range;
pub mod state;

pub use builder::{BuildEngine, RunSummary};
pub use config::{BuildConfig, BuildPaths};
pub use dataset::{AppendStatus, DayTable, MasterAppender, SnapshotWriter};
pub use error::{BuildError, Result};
pub use pipeline::{Classification, CommandStage, DayOutcome, Stage, StageRunner, StageSignal};
pub use range::{DateCursor, RunRange};
pub use state::{CheckpointStore, RunLog};
