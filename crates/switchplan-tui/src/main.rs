//! `switchplan` — terminal UI for planning switch configurations.
//!
//! Built on [ratatui](https://ratatui.rs). Each configuration domain
//! (VLAN, ACL, routes, DHCP, …) is a screen with a record table, add/edit
//! forms, and a live preview of the vendor CLI script generated from the
//! records by `switchplan-core`.
//!
//! Logs are written to a file (default `/tmp/switchplan.log`) to avoid
//! corrupting the terminal UI.
//!
//! Entry point: CLI argument parsing, tracing setup, panic hooks, and app
//! launch.

mod action;
mod app;
mod component;
mod event;
mod screen;
mod screens;
mod theme;
mod tui;
mod widgets;

use std::path::PathBuf;

use clap::Parser;
use color_eyre::eyre::Result;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::app::App;

/// Terminal UI for planning switch configurations and generating CLI scripts.
#[derive(Parser, Debug)]
#[command(name = "switchplan", version, about)]
struct Cli {
    /// Settings file to load on startup (defaults to the platform config dir)
    #[arg(short = 'c', long, env = "SWITCHPLAN_SETTINGS")]
    settings: Option<PathBuf>,

    /// Log file path (defaults to /tmp/switchplan.log)
    #[arg(long, default_value = "/tmp/switchplan.log")]
    log_file: PathBuf,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

/// Set up file-based tracing. We MUST NOT log to stdout/stderr — that
/// would corrupt the TUI output. Returns a guard that must be held for
/// the lifetime of the application to ensure logs are flushed.
fn setup_tracing(cli: &Cli) -> WorkerGuard {
    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("switchplan={log_level}")));

    let log_dir = cli
        .log_file
        .parent()
        .unwrap_or(std::path::Path::new("/tmp"));
    let log_filename = cli
        .log_file
        .file_name()
        .unwrap_or(std::ffi::OsStr::new("switchplan.log"));

    let file_appender = tracing_appender::rolling::never(log_dir, log_filename);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false)
                .with_target(true),
        )
        .init();

    guard
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Install panic/error hooks BEFORE entering the terminal
    tui::install_hooks()?;

    // Tracing to file — hold the guard so logs flush on exit
    let _log_guard = setup_tracing(&cli);

    info!(
        settings = ?cli.settings,
        log_file = %cli.log_file.display(),
        "starting switchplan"
    );

    let mut app = App::new(cli.settings);
    app.run().await?;

    Ok(())
}
