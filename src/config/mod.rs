//! Run-level configuration.
//!
//! - `BuildConfig`: TOML-backed settings for range, pacing, and stages
//! - `BuildPaths`: resolved output locations for a build run

mod paths;
mod settings;

pub use paths::BuildPaths;
pub use settings::{BuildConfig, PathsConfig, RunConfig, StageConfig, CONFIG_FILE};
