//! clipmux - command-line entry point
//!
//! Parses arguments, loads settings, and hands the URLs to the core
//! driver. Prompting, table output and the tracing subscriber live here.

mod args;
mod prompt;
mod table;

use std::sync::Arc;

use anyhow::Context as _;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use clipmux_core::catalog::YtDlpCatalog;
use clipmux_core::config::{ConfigManager, RunOptions};
use clipmux_core::logging::LogLevel;
use clipmux_core::models::{StreamDescriptor, TimeWindow};
use clipmux_core::orchestrator::{Driver, ErrorCategory, RunSummary};
use clipmux_core::tools::SystemRunner;

use args::Args;
use prompt::Prompt;
use table::render_streams;

/// Initialize the global tracing subscriber on stderr.
///
/// `RUST_LOG` wins over the level chosen by the flags.
fn init_tracing(level: LogLevel) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.filter_directive()));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn main() {
    let args = Args::parse();
    let level = LogLevel::from_flags(args.verbose, args.quiet);
    init_tracing(level);

    let code = match run(args, level) {
        Ok(code) => code,
        Err(e) => {
            tracing::error!("{:#}", e);
            1
        }
    };
    std::process::exit(code);
}

fn run(args: Args, level: LogLevel) -> anyhow::Result<i32> {
    tracing::debug!(version = clipmux_core::version(), "starting clipmux");

    if let Some(path) = &args.init_config {
        let mut config = ConfigManager::new(path);
        config
            .load_or_create()
            .with_context(|| format!("writing settings to {}", path.display()))?;
        tracing::info!("Settings written to {}", path.display());
        return Ok(0);
    }

    let config = ConfigManager::from_optional_path(args.config.as_deref())
        .context("loading settings")?;
    if let Some(path) = config.path() {
        tracing::debug!("Loaded settings from {}", path.display());
    }
    let settings = config.into_settings();

    let window = match TimeWindow::parse(args.start.as_deref(), args.duration.as_deref()) {
        Ok(window) => window,
        Err(e) => {
            tracing::error!("{}", e);
            return Ok(ErrorCategory::Usage.exit_code());
        }
    };

    let options = RunOptions::from_settings(&settings)
        .with_stream_id(args.itag)
        .with_language(args.lang)
        .with_list_only(args.list)
        .with_window(window);

    let catalog = YtDlpCatalog::new();
    let input = Prompt::terminal();

    let driver = Driver::new(&settings, &options, &catalog, &SystemRunner, &input)
        .with_level(level)
        .with_console(Arc::new(|_: LogLevel, line: &str| println!("{}", line)))
        .with_listing_callback(Box::new(|url: &str, streams: &[StreamDescriptor]| {
            println!("Streams for {}:", url);
            println!("{}", render_streams(streams));
        }));

    match driver.run(&args.urls) {
        Ok(summary) => Ok(report(&summary)),
        Err(e) => {
            tracing::error!("{}", e);
            Ok(e.exit_code())
        }
    }
}

/// Log per-URL failures and return the run's exit code.
fn report(summary: &RunSummary) -> i32 {
    for job in &summary.jobs {
        match &job.error {
            Some(e) => tracing::error!(url = %job.url, "{}", e),
            None => tracing::debug!(url = %job.url, stage = %job.stage, "completed"),
        }
    }
    if summary.jobs.len() > 1 {
        tracing::info!(
            "{} of {} URL(s) completed",
            summary.jobs.len() - summary.failures(),
            summary.jobs.len()
        );
    }
    summary.exit_code()
}
