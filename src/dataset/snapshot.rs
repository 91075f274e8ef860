use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use tokio::fs;
use tracing::info;

use crate::error::{BuildError, Result};

use super::table::DayTable;

/// Persists each successful day's table as an immutable dated artifact.
///
/// Re-running a date fully replaces its snapshot; nothing is patched in
/// place, so an interrupted date leaves no partial state behind.
pub struct SnapshotWriter {
    dir: PathBuf,
}

impl SnapshotWriter {
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    pub fn snapshot_path(&self, date: NaiveDate) -> PathBuf {
        self.dir.join(format!("{}_day.csv", date.format("%Y%m%d")))
    }

    pub async fn write(&self, date: NaiveDate, table: &DayTable) -> Result<PathBuf> {
        let path = self.snapshot_path(date);
        let temp = path.with_extension("csv.tmp");

        // Atomic replace: write to temp, then rename over any prior snapshot.
        let write = async {
            fs::create_dir_all(&self.dir).await?;
            fs::write(&temp, table.to_csv_string()).await?;
            fs::rename(&temp, &path).await
        };

        if let Err(e) = write.await {
            let _ = std::fs::remove_file(&temp);
            return Err(BuildError::Snapshot {
                date,
                message: e.to_string(),
            });
        }

        info!(%date, path = %path.display(), rows = table.row_count(), "Snapshot written");
        Ok(path)
    }
}
