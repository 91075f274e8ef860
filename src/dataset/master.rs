use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use tokio::fs;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::{debug, info};

use crate::error::{BuildError, Result};

use super::table::DayTable;

/// Result of one append attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppendStatus {
    /// Rows were appended to the master dataset.
    Appended { rows: usize },
    /// The date was already merged in a prior run; nothing was written.
    AlreadyMerged,
}

/// Accumulates per-day tables into the single master dataset.
///
/// The master carries exactly one header no matter how many days have been
/// appended. A sidecar ledger records which dates are already merged, so a
/// date replayed after a crash between append and checkpoint is skipped
/// instead of double-counted.
pub struct MasterAppender {
    master_path: PathBuf,
    ledger_path: PathBuf,
}

impl MasterAppender {
    pub fn new(master_path: impl AsRef<Path>, ledger_path: impl AsRef<Path>) -> Self {
        Self {
            master_path: master_path.as_ref().to_path_buf(),
            ledger_path: ledger_path.as_ref().to_path_buf(),
        }
    }

    pub fn master_path(&self) -> &Path {
        &self.master_path
    }

    /// Dates already merged into the master, ascending.
    pub async fn merged_dates(&self) -> Result<BTreeSet<NaiveDate>> {
        if !self.ledger_path.exists() {
            return Ok(BTreeSet::new());
        }
        let content = fs::read_to_string(&self.ledger_path)
            .await
            .map_err(|e| BuildError::Persistence(format!("reading merged ledger: {}", e)))?;
        serde_json::from_str(&content)
            .map_err(|e| BuildError::Persistence(format!("merged ledger is corrupt: {}", e)))
    }

    /// Append one day's rows, exactly once per date.
    ///
    /// The ledger entry is written only after the rows are durable, so a
    /// crash in between replays as a (detected and skipped) re-append on
    /// the next run rather than losing rows.
    pub async fn append(&self, date: NaiveDate, table: &DayTable) -> Result<AppendStatus> {
        let mut merged = self.merged_dates().await?;
        if merged.contains(&date) {
            debug!(%date, "Date already merged into master, skipping append");
            return Ok(AppendStatus::AlreadyMerged);
        }

        if self.master_path.exists() {
            let existing = self.read_master_header().await?;
            if existing != table.header() {
                return Err(BuildError::SchemaMismatch {
                    expected: existing,
                    found: table.header().to_string(),
                });
            }
            self.append_rows(table).await?;
        } else {
            self.create_master(table).await?;
        }

        merged.insert(date);
        self.write_ledger(&merged).await?;

        info!(
            %date,
            rows = table.row_count(),
            master = %self.master_path.display(),
            "Appended day into master dataset"
        );
        Ok(AppendStatus::Appended {
            rows: table.row_count(),
        })
    }

    /// Remove the master and its ledger. Used by a fresh (restarted) build.
    pub async fn reset(&self) -> Result<()> {
        for path in [&self.master_path, &self.ledger_path] {
            if path.exists() {
                fs::remove_file(path)
                    .await
                    .map_err(|e| BuildError::Persistence(format!("removing {}: {}", path.display(), e)))?;
            }
        }
        Ok(())
    }

    async fn read_master_header(&self) -> Result<String> {
        let file = fs::File::open(&self.master_path)
            .await
            .map_err(|e| BuildError::Persistence(format!("opening master: {}", e)))?;
        let mut line = String::new();
        BufReader::new(file)
            .read_line(&mut line)
            .await
            .map_err(|e| BuildError::Persistence(format!("reading master header: {}", e)))?;
        Ok(line.trim_end_matches(['\r', '\n']).to_string())
    }

    async fn create_master(&self, table: &DayTable) -> Result<()> {
        if let Some(parent) = self.master_path.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| BuildError::Persistence(e.to_string()))?;
        }
        let temp = self.master_path.with_extension("csv.tmp");
        let write = async {
            let mut file = fs::File::create(&temp).await?;
            file.write_all(table.to_csv_string().as_bytes()).await?;
            file.sync_all().await?;
            fs::rename(&temp, &self.master_path).await
        };
        write.await.map_err(|e| {
            let _ = std::fs::remove_file(&temp);
            BuildError::Persistence(format!("creating master: {}", e))
        })
    }

    async fn append_rows(&self, table: &DayTable) -> Result<()> {
        if table.rows().is_empty() {
            return Ok(());
        }
        let mut data = String::new();
        for row in table.rows() {
            data.push_str(row);
            data.push('\n');
        }

        let append = async {
            let mut file = fs::OpenOptions::new()
                .append(true)
                .open(&self.master_path)
                .await?;
            file.write_all(data.as_bytes()).await?;
            file.sync_all().await
        };
        append
            .await
            .map_err(|e| BuildError::Persistence(format!("appending to master: {}", e)))
    }

    async fn write_ledger(&self, merged: &BTreeSet<NaiveDate>) -> Result<()> {
        let temp = self.ledger_path.with_extension("json.tmp");
        let json = serde_json::to_string_pretty(merged)?;
        let write = async {
            fs::write(&temp, json).await?;
            fs::rename(&temp, &self.ledger_path).await
        };
        write.await.map_err(|e| {
            let _ = std::fs::remove_file(&temp);
            BuildError::Persistence(format!("writing merged ledger: {}", e))
        })
    }
}
