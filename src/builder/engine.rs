use std::path::PathBuf;
use std::time::Duration;

use chrono::NaiveDate;
use tracing::{info, warn};

use crate::config::{BuildConfig, BuildPaths};
use crate::dataset::{AppendStatus, DayTable, MasterAppender, SnapshotWriter};
use crate::error::Result;
use crate::pipeline::{classify, Classification, CommandStage, DayOutcome, Stage, StageRunner};
use crate::range::RunRange;
use crate::state::{CheckpointStore, RunLog};

use super::RunSummary;

/// Drives the whole build: one date at a time, strictly ascending, each date
/// finalized (outcome logged, checkpoint saved) before the next begins.
pub struct BuildEngine {
    runner: StageRunner,
    pause: Duration,
    day_table_path: PathBuf,
    checkpoint: CheckpointStore,
    snapshots: SnapshotWriter,
    master: MasterAppender,
    run_log: RunLog,
}

impl BuildEngine {
    pub fn new(config: &BuildConfig, paths: &BuildPaths) -> Self {
        let stages: Vec<Box<dyn Stage>> = config
            .stages
            .iter()
            .map(|s| Box::new(CommandStage::new(s)) as Box<dyn Stage>)
            .collect();
        Self::with_stages(paths, stages, Duration::from_secs_f64(config.run.pause_secs))
    }

    /// Assemble an engine around explicit stages. Production uses
    /// `CommandStage`s from the config; tests inject scripted stages.
    pub fn with_stages(paths: &BuildPaths, stages: Vec<Box<dyn Stage>>, pause: Duration) -> Self {
        Self {
            runner: StageRunner::new(stages),
            pause,
            day_table_path: paths.day_table.clone(),
            checkpoint: CheckpointStore::new(&paths.checkpoint),
            snapshots: SnapshotWriter::new(&paths.snapshots_dir),
            master: MasterAppender::new(&paths.master, &paths.merged_ledger),
            run_log: RunLog::new(&paths.run_log),
        }
    }

    /// Discard checkpoint, master dataset, and merged ledger so the next run
    /// rebuilds from scratch. Snapshots and the run log are kept for audit.
    pub async fn reset(&self) -> Result<()> {
        self.checkpoint.clear().await?;
        self.master.reset().await?;
        info!("Cleared checkpoint and master dataset");
        Ok(())
    }

    /// Process every remaining date of `range`, resuming after any existing
    /// checkpoint. Per-date failures are contained; only configuration and
    /// persistence errors abort the run.
    pub async fn run(&self, range: RunRange) -> Result<RunSummary> {
        let resumed_from = self.checkpoint.load().await;
        if let Some(last) = resumed_from {
            info!(checkpoint = %last, "Resuming after checkpoint");
        }

        if let Err(e) = self
            .run_log
            .record_run_started(range.start(), range.end(), resumed_from)
            .await
        {
            warn!(error = %e, "Could not record run start in run log");
        }

        let mut summary = RunSummary {
            ok: 0,
            skipped: 0,
            failed: 0,
            rows_appended: 0,
            master_path: self.master.master_path().to_path_buf(),
            run_log_path: self.run_log.path().to_path_buf(),
        };

        let mut cursor = range.cursor(resumed_from).peekable();
        while let Some(date) = cursor.next() {
            let outcome = self.process_date(date, &mut summary).await?;

            match outcome.classification {
                Classification::Ok => summary.ok += 1,
                Classification::Skip => summary.skipped += 1,
                Classification::Fail => summary.failed += 1,
            }

            if let Err(e) = self.run_log.record_day(&outcome).await {
                warn!(%date, error = %e, "Could not record outcome in run log");
            }

            // The checkpoint is the last write for the date; everything else
            // for it is already durable.
            self.checkpoint.save(date).await?;

            if cursor.peek().is_some() && !self.pause.is_zero() {
                tokio::time::sleep(self.pause).await;
            }
        }

        info!(
            ok = summary.ok,
            skipped = summary.skipped,
            failed = summary.failed,
            "Build run finished"
        );
        Ok(summary)
    }

    /// Run the stages for one date and, on OK, persist its output.
    ///
    /// Non-fatal finalization errors (missing or malformed day table,
    /// snapshot write failure, schema mismatch) downgrade the date to FAIL.
    /// Fatal ones (master append, checkpoint) propagate so the date is never
    /// checkpointed as complete.
    async fn process_date(&self, date: NaiveDate, summary: &mut RunSummary) -> Result<DayOutcome> {
        info!(%date, "Processing date");

        let results = self.runner.run_day(date).await?;
        let classification = classify(&results, self.runner.stage_count());
        let outcome = DayOutcome::new(date, classification, results);

        if classification != Classification::Ok {
            return Ok(outcome);
        }

        match self.finalize_ok_date(date).await {
            Ok(rows) => {
                summary.rows_appended += rows;
                Ok(outcome)
            }
            Err(e) if e.is_fatal() => Err(e),
            Err(e) => {
                warn!(%date, error = %e, "Day output could not be persisted, reclassifying as FAIL");
                Ok(outcome.reclassify_failed("persist-output", e.to_string()))
            }
        }
    }

    /// Snapshot the day table, then merge it into the master. Returns the
    /// number of rows appended (zero when the ledger says the date was
    /// already merged by an interrupted earlier run).
    async fn finalize_ok_date(&self, date: NaiveDate) -> Result<usize> {
        let table = DayTable::load(&self.day_table_path).await?;

        self.snapshots.write(date, &table).await?;

        match self.master.append(date, &table).await? {
            AppendStatus::Appended { rows } => Ok(rows),
            AppendStatus::AlreadyMerged => {
                info!(%date, "Master already contains this date (replayed after interrupt)");
                Ok(0)
            }
        }
    }

    pub async fn last_checkpoint(&self) -> Option<NaiveDate> {
        self.checkpoint.load().await
    }
}

/// Build a `RunRange` from config, honoring CLI overrides.
pub fn resolve_range(
    config: &BuildConfig,
    start_override: Option<NaiveDate>,
    end_override: Option<NaiveDate>,
) -> Result<RunRange> {
    let start = start_override.unwrap_or(config.run.start_date);
    let end = end_override.unwrap_or(config.run.end_date);
    RunRange::new(start, end)
}
