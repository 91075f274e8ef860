use std::path::{Path, PathBuf};

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tokio::fs;
use tokio::io::AsyncWriteExt;

use crate::error::Result;
use crate::pipeline::DayOutcome;

/// One immutable run-log line.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "entry", rename_all = "snake_case")]
pub enum RunLogEntry {
    RunStarted {
        start: NaiveDate,
        end: NaiveDate,
        resumed_from: Option<NaiveDate>,
        at: DateTime<Utc>,
    },
    Day(DayOutcome),
}

/// Append-only NDJSON journal of per-date outcomes.
///
/// Purely observational: written during a run, never read back to make
/// decisions, never rewritten.
pub struct RunLog {
    path: PathBuf,
}

impl RunLog {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub async fn record_run_started(
        &self,
        start: NaiveDate,
        end: NaiveDate,
        resumed_from: Option<NaiveDate>,
    ) -> Result<()> {
        self.append(&RunLogEntry::RunStarted {
            start,
            end,
            resumed_from,
            at: Utc::now(),
        })
        .await
    }

    pub async fn record_day(&self, outcome: &DayOutcome) -> Result<()> {
        self.append(&RunLogEntry::Day(outcome.clone())).await
    }

    async fn append(&self, entry: &RunLogEntry) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).await?;
        }
        let mut line = serde_json::to_string(entry)?;
        line.push('\n');

        let mut file = fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await?;
        file.write_all(line.as_bytes()).await?;
        Ok(())
    }
}
