use std::path::PathBuf;

use async_trait::async_trait;
use chrono::NaiveDate;
use tracing::{debug, warn};

use crate::config::StageConfig;
use crate::error::Result;

/// Exit signal of one stage invocation for one date.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "signal", rename_all = "snake_case")]
pub enum StageSignal {
    Success,
    /// No source data exists for this date. Only meaningful for the first
    /// (fetch) stage; anywhere else it is treated as an error.
    NotFound,
    Error { message: String },
}

/// One opaque external step of the per-day pipeline.
///
/// A stage either leaves a well-formed artifact where the next stage expects
/// it and reports `Success`, reports `NotFound` when the archive has nothing
/// for the date, or reports `Error`. The orchestrator never looks inside.
#[async_trait]
pub trait Stage: Send + Sync {
    fn name(&self) -> &str;

    async fn run(&self, date: NaiveDate) -> Result<StageSignal>;
}

/// Environment variable carrying the current date to stage subprocesses.
pub const DATE_ENV_VAR: &str = "STORMSET_DATE";

/// Placeholder replaced with the ISO date in configured stage arguments.
const DATE_PLACEHOLDER: &str = "{date}";

/// Stage backed by a subprocess.
///
/// The date is passed explicitly, via argument substitution and an
/// environment variable; stages never read it from shared mutable state.
pub struct CommandStage {
    name: String,
    command: String,
    args: Vec<String>,
    not_found_exit_code: Option<i32>,
    working_dir: Option<PathBuf>,
}

impl CommandStage {
    pub fn new(config: &StageConfig) -> Self {
        Self {
            name: config.name.clone(),
            command: config.command.clone(),
            args: config.args.clone(),
            not_found_exit_code: config.not_found_exit_code,
            working_dir: None,
        }
    }

    pub fn with_working_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_dir = Some(dir.into());
        self
    }

    fn substituted_args(&self, date: NaiveDate) -> Vec<String> {
        let iso = date.format("%Y-%m-%d").to_string();
        self.args
            .iter()
            .map(|a| a.replace(DATE_PLACEHOLDER, &iso))
            .collect()
    }
}

#[async_trait]
impl Stage for CommandStage {
    fn name(&self) -> &str {
        &self.name
    }

    async fn run(&self, date: NaiveDate) -> Result<StageSignal> {
        let args = self.substituted_args(date);
        debug!(stage = self.name, command = self.command, ?args, %date, "Running stage");

        let mut cmd = tokio::process::Command::new(&self.command);
        cmd.args(&args)
            .env(DATE_ENV_VAR, date.format("%Y-%m-%d").to_string());
        if let Some(dir) = &self.working_dir {
            cmd.current_dir(dir);
        }

        let status = match cmd.status().await {
            Ok(status) => status,
            Err(e) => {
                warn!(stage = self.name, error = %e, "Failed to spawn stage command");
                return Ok(StageSignal::Error {
                    message: format!("failed to spawn '{}': {}", self.command, e),
                });
            }
        };

        let signal = match status.code() {
            Some(0) => StageSignal::Success,
            Some(code) if Some(code) == self.not_found_exit_code => StageSignal::NotFound,
            Some(code) => StageSignal::Error {
                message: format!("exit code {}", code),
            },
            None => StageSignal::Error {
                message: "terminated by signal".to_string(),
            },
        };
        Ok(signal)
    }
}
