use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "stormset")]
#[command(author, version, about = "Checkpoint-and-resume builder for per-day training datasets", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Project directory containing stormset.toml
    #[arg(short, long, global = true, default_value = ".", env = "STORMSET_PROJECT")]
    pub project_dir: PathBuf,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Write a default stormset.toml into the project directory
    Init,

    /// Run (or resume) the dataset build over the configured date range
    Build {
        /// Override the configured start date (YYYY-MM-DD)
        #[arg(long)]
        start: Option<NaiveDate>,

        /// Override the configured end date (YYYY-MM-DD)
        #[arg(long)]
        end: Option<NaiveDate>,

        /// Override the configured pause between dates, in seconds
        #[arg(long)]
        pause_secs: Option<f64>,

        /// Discard the checkpoint and master dataset and rebuild from scratch
        #[arg(long)]
        fresh: bool,
    },

    /// Show checkpoint position and master dataset progress
    Status,

    /// Show the tail of the run log
    Logs {
        /// Number of lines to show
        #[arg(short, long, default_value = "50")]
        lines: usize,
    },
}
