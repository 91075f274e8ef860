use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tokio::fs;

use crate::error::{BuildError, Result};

pub const CONFIG_FILE: &str = "stormset.toml";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildConfig {
    pub run: RunConfig,
    pub paths: PathsConfig,
    pub stages: Vec<StageConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    /// First date of the build range (inclusive).
    pub start_date: NaiveDate,
    /// Last date of the build range (inclusive).
    pub end_date: NaiveDate,
    /// Pause between dates, to stay polite to the upstream archive.
    pub pause_secs: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    /// Root for all build artifacts.
    pub data_dir: PathBuf,
    /// Where the final stage leaves the current day's table.
    pub day_table: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StageConfig {
    pub name: String,
    pub command: String,
    #[serde(default)]
    pub args: Vec<String>,
    /// Exit code this stage uses to signal "no source data for this date".
    /// Only meaningful for the first (fetch) stage.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub not_found_exit_code: Option<i32>,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            start_date: NaiveDate::from_ymd_opt(2015, 1, 1).expect("valid date"),
            end_date: NaiveDate::from_ymd_opt(2015, 12, 31).expect("valid date"),
            pause_secs: 0.5,
        }
    }
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            day_table: PathBuf::from("data/day_table.csv"),
        }
    }
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            run: RunConfig::default(),
            paths: PathsConfig::default(),
            stages: default_stages(),
        }
    }
}

fn default_stages() -> Vec<StageConfig> {
    let py = |script: &str| {
        vec![
            script.to_string(),
            "--date".to_string(),
            "{date}".to_string(),
        ]
    };
    vec![
        StageConfig {
            name: "fetch".into(),
            command: "python3".into(),
            args: py("pipeline/fetch_reports.py"),
            not_found_exit_code: Some(44),
        },
        StageConfig {
            name: "derive-points".into(),
            command: "python3".into(),
            args: py("pipeline/derive_points.py"),
            not_found_exit_code: None,
        },
        StageConfig {
            name: "grid-labels".into(),
            command: "python3".into(),
            args: py("pipeline/make_grid_labels.py"),
            not_found_exit_code: None,
        },
        StageConfig {
            name: "season-features".into(),
            command: "python3".into(),
            args: py("pipeline/season_features.py"),
            not_found_exit_code: None,
        },
    ]
}

impl BuildConfig {
    pub async fn load(dir: &Path) -> Result<Self> {
        let config_path = dir.join(CONFIG_FILE);
        let config: Self = if config_path.exists() {
            let content = fs::read_to_string(&config_path).await?;
            toml::from_str(&content)?
        } else {
            Self::default()
        };
        config.validate()?;
        Ok(config)
    }

    pub async fn save(&self, dir: &Path) -> Result<()> {
        self.validate()?;
        let config_path = dir.join(CONFIG_FILE);
        let content = toml::to_string_pretty(self).map_err(|e| BuildError::Config(e.to_string()))?;
        fs::write(&config_path, content).await?;
        Ok(())
    }

    /// Validate configuration values before any date is processed.
    pub fn validate(&self) -> Result<()> {
        let mut errors = Vec::new();

        if self.run.start_date > self.run.end_date {
            errors.push("start_date must not be after end_date".to_string());
        }
        if self.run.pause_secs < 0.0 || !self.run.pause_secs.is_finite() {
            errors.push("pause_secs must be a non-negative number".to_string());
        }

        if self.stages.is_empty() {
            errors.push("at least one stage must be declared".to_string());
        }
        for stage in &self.stages {
            if stage.name.trim().is_empty() {
                errors.push("stage name must not be empty".to_string());
            }
            if stage.command.trim().is_empty() {
                errors.push(format!("stage '{}' has an empty command", stage.name));
            }
        }
        for stage in self.stages.iter().skip(1) {
            if stage.not_found_exit_code.is_some() {
                errors.push(format!(
                    "stage '{}' declares not_found_exit_code but only the first stage may signal no-data",
                    stage.name
                ));
            }
        }

        if self.paths.data_dir.as_os_str().is_empty() {
            errors.push("paths.data_dir must not be empty".to_string());
        }
        if self.paths.day_table.as_os_str().is_empty() {
            errors.push("paths.day_table must not be empty".to_string());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(BuildError::Config(errors.join("; ")))
        }
    }
}
