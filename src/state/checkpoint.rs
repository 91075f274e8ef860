use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use tokio::fs;
use tracing::{debug, warn};

use crate::error::{BuildError, Result};

/// Durable marker of the last date whose outcome is fully finalized.
///
/// Saved only after that date's snapshot and master append are durable, so a
/// crash before `save` reprocesses the date (idempotently) and a crash after
/// leaves nothing undone.
pub struct CheckpointStore {
    path: PathBuf,
}

impl CheckpointStore {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Last finalized date, or None when no checkpoint exists or the file is
    /// unreadable. Unparsable state means "start fresh", never a fatal error.
    pub async fn load(&self) -> Option<NaiveDate> {
        let content = match fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return None,
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "Could not read checkpoint, starting fresh");
                return None;
            }
        };

        match content.trim().parse::<NaiveDate>() {
            Ok(date) => {
                debug!(%date, "Loaded checkpoint");
                Some(date)
            }
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "Unparsable checkpoint, starting fresh");
                None
            }
        }
    }

    /// Atomically record `date` as the last finalized date.
    pub async fn save(&self, date: NaiveDate) -> Result<()> {
        let temp = self.path.with_extension("tmp");
        let write = async {
            if let Some(parent) = self.path.parent() {
                fs::create_dir_all(parent).await?;
            }
            fs::write(&temp, format!("{}\n", date.format("%Y-%m-%d"))).await?;
            fs::rename(&temp, &self.path).await
        };
        write.await.map_err(|e| {
            let _ = std::fs::remove_file(&temp);
            BuildError::Persistence(format!("saving checkpoint: {}", e))
        })?;
        debug!(%date, "Checkpoint saved");
        Ok(())
    }

    /// Discard any stored checkpoint. Used by a fresh (restarted) build.
    pub async fn clear(&self) -> Result<()> {
        match fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(BuildError::Persistence(format!(
                "clearing checkpoint: {}",
                e
            ))),
        }
    }
}
