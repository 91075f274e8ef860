use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Final accounting for one build run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunSummary {
    pub ok: usize,
    pub skipped: usize,
    pub failed: usize,
    pub rows_appended: usize,
    pub master_path: PathBuf,
    pub run_log_path: PathBuf,
}

impl RunSummary {
    pub fn dates_processed(&self) -> usize {
        self.ok + self.skipped + self.failed
    }

    /// A run with any FAILed date warrants a non-zero process exit.
    /// SKIPs are expected on sparse domains and do not.
    pub fn has_failures(&self) -> bool {
        self.failed > 0
    }
}
