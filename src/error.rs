use std::path::PathBuf;

use chrono::NaiveDate;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BuildError {
    #[error("Invalid date range: start {start} is after end {end}")]
    InvalidRange { start: NaiveDate, end: NaiveDate },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Stage '{stage}' failed: {message}")]
    Stage { stage: String, message: String },

    #[error("Malformed day table at {path}: {message}")]
    MalformedDayTable { path: PathBuf, message: String },

    #[error("Schema mismatch: master has header '{expected}', day table has '{found}'")]
    SchemaMismatch { expected: String, found: String },

    #[error("Snapshot write failed for {date}: {message}")]
    Snapshot { date: NaiveDate, message: String },

    #[error("Persistence failed: {0}")]
    Persistence(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl BuildError {
    /// True for errors that abort the whole run rather than failing one date.
    /// A date whose finalization hit one of these must not be checkpointed.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::InvalidRange { .. } | Self::Config(_) | Self::Persistence(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, BuildError>;
