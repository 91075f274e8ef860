use std::path::Path;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use stormset::builder::{resolve_range, BuildEngine};
use stormset::cli::{Cli, Commands, Display};
use stormset::config::{BuildConfig, BuildPaths, CONFIG_FILE};
use stormset::dataset::MasterAppender;
use stormset::error::Result;
use stormset::state::CheckpointStore;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            Display::new().print_error(&e.to_string());
            ExitCode::FAILURE
        }
    }
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("stormset=debug")
    } else {
        EnvFilter::new("stormset=info")
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).without_time())
        .with(filter)
        .init();
}

async fn run(cli: Cli) -> Result<ExitCode> {
    let display = Display::new();
    let project_dir = cli.project_dir;

    match cli.command {
        Commands::Init => {
            cmd_init(&display, &project_dir).await?;
            Ok(ExitCode::SUCCESS)
        }
        Commands::Build {
            start,
            end,
            pause_secs,
            fresh,
        } => cmd_build(&display, &project_dir, start, end, pause_secs, fresh).await,
        Commands::Status => {
            cmd_status(&display, &project_dir).await?;
            Ok(ExitCode::SUCCESS)
        }
        Commands::Logs { lines } => {
            cmd_logs(&display, &project_dir, lines).await?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

async fn cmd_init(display: &Display, project_dir: &Path) -> Result<()> {
    let config_path = project_dir.join(CONFIG_FILE);
    if config_path.exists() {
        display.print_warning("stormset is already initialized here.");
        return Ok(());
    }

    let config = BuildConfig::default();
    config.save(project_dir).await?;

    let paths = BuildPaths::new(project_dir, &config);
    paths.ensure_dirs().await?;

    display.print_success("Initialized stormset.");
    display.print_info(&format!("Configuration: {}", config_path.display()));
    display.print_info(&format!("Data directory: {}", paths.data_dir.display()));
    Ok(())
}

async fn cmd_build(
    display: &Display,
    project_dir: &Path,
    start: Option<chrono::NaiveDate>,
    end: Option<chrono::NaiveDate>,
    pause_secs: Option<f64>,
    fresh: bool,
) -> Result<ExitCode> {
    let mut config = BuildConfig::load(project_dir).await?;
    if let Some(pause) = pause_secs {
        config.run.pause_secs = pause;
    }
    config.validate()?;

    let range = resolve_range(&config, start, end)?;
    let paths = BuildPaths::new(project_dir, &config);
    paths.ensure_dirs().await?;

    let engine = BuildEngine::new(&config, &paths);

    if fresh {
        engine.reset().await?;
        display.print_info("Starting fresh: checkpoint and master dataset cleared.");
    }

    display.print_info(&format!(
        "Building dataset for {} .. {}",
        range.start(),
        range.end()
    ));

    let summary = engine.run(range).await?;
    display.print_run_summary(&summary);

    if summary.has_failures() {
        Ok(ExitCode::FAILURE)
    } else {
        Ok(ExitCode::SUCCESS)
    }
}

async fn cmd_status(display: &Display, project_dir: &Path) -> Result<()> {
    let config = BuildConfig::load(project_dir).await?;
    let paths = BuildPaths::new(project_dir, &config);

    let checkpoint = CheckpointStore::new(&paths.checkpoint).load().await;
    let merged = MasterAppender::new(&paths.master, &paths.merged_ledger)
        .merged_dates()
        .await
        .map(|dates| dates.len())
        .unwrap_or(0);

    display.print_status(&paths, checkpoint, merged);
    Ok(())
}

async fn cmd_logs(display: &Display, project_dir: &Path, lines: usize) -> Result<()> {
    let config = BuildConfig::load(project_dir).await?;
    let paths = BuildPaths::new(project_dir, &config);

    if !paths.run_log.exists() {
        display.print_warning("No run log yet.");
        return Ok(());
    }

    let content = tokio::fs::read_to_string(&paths.run_log).await?;
    let log_lines: Vec<_> = content.lines().collect();
    let start = log_lines.len().saturating_sub(lines);

    for line in &log_lines[start..] {
        println!("{}", line);
    }

    Ok(())
}
