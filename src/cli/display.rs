use chrono::NaiveDate;
use console::style;

use crate::builder::RunSummary;
use crate::config::BuildPaths;

pub struct Display;

impl Display {
    pub fn new() -> Self {
        Self
    }

    pub fn print_header(&self, text: &str) {
        println!();
        println!("{}", style(text).bold().cyan());
        println!("{}", style("═".repeat(60)).dim());
        println!();
    }

    pub fn print_success(&self, message: &str) {
        println!("{} {}", style("✓").green().bold(), message);
    }

    pub fn print_error(&self, message: &str) {
        eprintln!("{} {}", style("✗").red().bold(), message);
    }

    pub fn print_warning(&self, message: &str) {
        println!("{} {}", style("!").yellow().bold(), message);
    }

    pub fn print_info(&self, message: &str) {
        println!("{} {}", style("→").cyan(), message);
    }

    pub fn print_run_summary(&self, summary: &RunSummary) {
        self.print_header("Build Summary");

        println!(
            "Dates:   {} processed  ({} OK, {} SKIP, {} FAIL)",
            summary.dates_processed(),
            style(summary.ok).green(),
            style(summary.skipped).dim(),
            if summary.failed > 0 {
                style(summary.failed).red().bold()
            } else {
                style(summary.failed).dim()
            }
        );
        println!("Rows:    {} appended", summary.rows_appended);
        println!("Master:  {}", style(summary.master_path.display()).dim());
        println!("Run log: {}", style(summary.run_log_path.display()).dim());
        println!();

        if summary.failed > 0 {
            self.print_warning("Some dates failed; inspect the run log before re-running.");
        }
    }

    pub fn print_status(
        &self,
        paths: &BuildPaths,
        checkpoint: Option<NaiveDate>,
        merged_days: usize,
    ) {
        self.print_header("Stormset Status");

        match checkpoint {
            Some(date) => println!("Checkpoint:  last finalized date {}", style(date).bold()),
            None => println!("Checkpoint:  {}", style("none (fresh start)").dim()),
        }

        if paths.master.exists() {
            println!(
                "Master:      {} ({} days merged)",
                paths.master.display(),
                style(merged_days).green()
            );
        } else {
            println!("Master:      {}", style("not created yet").dim());
        }

        println!("Snapshots:   {}", style(paths.snapshots_dir.display()).dim());
        println!("Run log:     {}", style(paths.run_log.display()).dim());
        println!();
    }
}

impl Default for Display {
    fn default() -> Self {
        Self::new()
    }
}
