use std::path::{Path, PathBuf};

use crate::error::Result;

use super::BuildConfig;

/// Resolved locations of every artifact a build run touches.
///
/// All paths hang off `data_dir` except the day table, whose location is the
/// contract between the final stage and the orchestrator.
#[derive(Debug, Clone)]
pub struct BuildPaths {
    pub data_dir: PathBuf,
    pub day_table: PathBuf,
    pub snapshots_dir: PathBuf,
    pub master: PathBuf,
    pub merged_ledger: PathBuf,
    pub checkpoint: PathBuf,
    pub run_log: PathBuf,
}

impl BuildPaths {
    pub fn new(root: impl AsRef<Path>, config: &BuildConfig) -> Self {
        let root = root.as_ref();
        let data_dir = root.join(&config.paths.data_dir);
        Self {
            day_table: root.join(&config.paths.day_table),
            snapshots_dir: data_dir.join("daily"),
            master: data_dir.join("train_master.csv"),
            merged_ledger: data_dir.join("train_master.merged.json"),
            checkpoint: data_dir.join(".checkpoint_last_date"),
            run_log: data_dir.join("logs").join("build_run.ndjson"),
            data_dir,
        }
    }

    pub async fn ensure_dirs(&self) -> Result<()> {
        tokio::fs::create_dir_all(&self.data_dir).await?;
        tokio::fs::create_dir_all(&self.snapshots_dir).await?;
        if let Some(log_dir) = self.run_log.parent() {
            tokio::fs::create_dir_all(log_dir).await?;
        }
        Ok(())
    }
}
