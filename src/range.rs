//! Date range and cursor for the per-day build loop.

use chrono::{Days, NaiveDate};

use crate::error::{BuildError, Result};

/// Inclusive calendar date range for one build run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl RunRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self> {
        if start > end {
            return Err(BuildError::InvalidRange { start, end });
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    /// First date a resumed run should process.
    ///
    /// A checkpoint at or past the start fast-forwards to the day after it;
    /// a checkpoint before the range (or none) leaves the start untouched.
    /// Returns None when the whole range is already finalized.
    pub fn effective_start(&self, checkpoint: Option<NaiveDate>) -> Option<NaiveDate> {
        let start = match checkpoint {
            Some(last) if last >= self.start => last.checked_add_days(Days::new(1))?,
            _ => self.start,
        };
        (start <= self.end).then_some(start)
    }

    /// Cursor over every date left to process given an optional checkpoint.
    pub fn cursor(&self, checkpoint: Option<NaiveDate>) -> DateCursor {
        DateCursor {
            next: self.effective_start(checkpoint),
            end: self.end,
        }
    }
}

/// Lazy ascending iterator over calendar days, inclusive of both endpoints.
/// Never skips or repeats a date within a single pass.
#[derive(Debug, Clone)]
pub struct DateCursor {
    next: Option<NaiveDate>,
    end: NaiveDate,
}

impl Iterator for DateCursor {
    type Item = NaiveDate;

    fn next(&mut self) -> Option<NaiveDate> {
        let current = self.next?;
        self.next = current
            .checked_add_days(Days::new(1))
            .filter(|d| *d <= self.end);
        Some(current)
    }
}
