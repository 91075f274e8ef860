use chrono::NaiveDate;
use tracing::{debug, info};

use crate::error::Result;

use super::outcome::StageResult;
use super::stage::{Stage, StageSignal};

/// Executes the declared stages in order for one date, stopping at the first
/// stage that does not report success.
pub struct StageRunner {
    stages: Vec<Box<dyn Stage>>,
}

impl StageRunner {
    pub fn new(stages: Vec<Box<dyn Stage>>) -> Self {
        Self { stages }
    }

    pub fn stage_count(&self) -> usize {
        self.stages.len()
    }

    pub async fn run_day(&self, date: NaiveDate) -> Result<Vec<StageResult>> {
        let mut results = Vec::with_capacity(self.stages.len());

        for stage in &self.stages {
            let signal = stage.run(date).await?;
            let stop = signal != StageSignal::Success;

            match &signal {
                StageSignal::Success => {
                    debug!(stage = stage.name(), %date, "Stage succeeded");
                }
                StageSignal::NotFound => {
                    info!(stage = stage.name(), %date, "Stage reported no source data");
                }
                StageSignal::Error { message } => {
                    info!(stage = stage.name(), %date, error = message, "Stage failed");
                }
            }

            results.push(StageResult {
                stage: stage.name().to_string(),
                signal,
            });

            if stop {
                break;
            }
        }

        Ok(results)
    }
}
