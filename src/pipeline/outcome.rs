use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::stage::StageSignal;

/// Result of one stage invocation, as recorded in the run log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageResult {
    pub stage: String,
    #[serde(flatten)]
    pub signal: StageSignal,
}

/// Terminal classification of one date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Classification {
    /// Every stage succeeded and the day's rows were persisted.
    Ok,
    /// No source data existed for the date. Expected on sparse domains.
    Skip,
    /// A stage broke, or the day's output could not be persisted.
    Fail,
}

impl std::fmt::Display for Classification {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Ok => "OK",
            Self::Skip => "SKIP",
            Self::Fail => "FAIL",
        };
        f.write_str(s)
    }
}

/// Immutable per-date record: classification plus the stage signals that
/// produced it, with enough detail to diagnose a FAIL without re-running.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DayOutcome {
    pub date: NaiveDate,
    pub classification: Classification,
    pub stages: Vec<StageResult>,
    pub recorded_at: DateTime<Utc>,
}

impl DayOutcome {
    pub fn new(
        date: NaiveDate,
        classification: Classification,
        stages: Vec<StageResult>,
    ) -> Self {
        Self {
            date,
            classification,
            stages,
            recorded_at: Utc::now(),
        }
    }

    /// Downgrade a provisional OK after a snapshot or append failure.
    pub fn reclassify_failed(mut self, stage: &str, message: String) -> Self {
        self.classification = Classification::Fail;
        self.stages.push(StageResult {
            stage: stage.to_string(),
            signal: StageSignal::Error { message },
        });
        self
    }
}

/// Classify a date from its ordered stage results.
///
/// NotFound from the first stage is an expected data gap (SKIP); from any
/// later stage it is a defect (FAIL). Only an unbroken chain of successes
/// across all `declared_stages` yields OK.
pub fn classify(results: &[StageResult], declared_stages: usize) -> Classification {
    for (index, result) in results.iter().enumerate() {
        match &result.signal {
            StageSignal::Success => continue,
            StageSignal::NotFound if index == 0 => return Classification::Skip,
            StageSignal::NotFound | StageSignal::Error { .. } => return Classification::Fail,
        }
    }
    if results.len() == declared_stages && declared_stages > 0 {
        Classification::Ok
    } else {
        Classification::Fail
    }
}
