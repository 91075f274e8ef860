use std::path::Path;

use crate::error::{BuildError, Result};

/// One day's output table, as the final stage left it.
///
/// The orchestrator treats the content as opaque: one header line (the
/// schema marker) and zero or more data rows. Values are never inspected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayTable {
    header: String,
    rows: Vec<String>,
}

impl DayTable {
    pub fn new(header: impl Into<String>, rows: Vec<String>) -> Self {
        Self {
            header: header.into(),
            rows,
        }
    }

    pub async fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(BuildError::MalformedDayTable {
                path: path.to_path_buf(),
                message: "file does not exist".to_string(),
            });
        }

        let content = tokio::fs::read_to_string(path).await?;
        Self::parse(&content).map_err(|message| BuildError::MalformedDayTable {
            path: path.to_path_buf(),
            message,
        })
    }

    fn parse(content: &str) -> std::result::Result<Self, String> {
        let mut lines = content.lines();
        let header = match lines.next() {
            Some(line) if !line.trim().is_empty() => line.to_string(),
            _ => return Err("missing header line".to_string()),
        };

        let rows: Vec<String> = lines
            .filter(|l| !l.trim().is_empty())
            .map(str::to_string)
            .collect();

        Ok(Self { header, rows })
    }

    pub fn header(&self) -> &str {
        &self.header
    }

    pub fn rows(&self) -> &[String] {
        &self.rows
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Full table serialization, header first, trailing newline included.
    pub fn to_csv_string(&self) -> String {
        let mut out = String::with_capacity(
            self.header.len() + 1 + self.rows.iter().map(|r| r.len() + 1).sum::<usize>(),
        );
        out.push_str(&self.header);
        out.push('\n');
        for row in &self.rows {
            out.push_str(row);
            out.push('\n');
        }
        out
    }
}
