//! Taskdeck - a terminal to-do list.
//!
//! # Commands
//!
//! - `taskdeck run`: Start the interactive task list (also the default)
//! - `taskdeck path`: Print the data directory and exit
//!
//! # Environment Variables
//!
//! See the [`config`](taskdeck::config) module for available configuration
//! options.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use taskdeck::config::Config;
use taskdeck::cues::TerminalCues;
use taskdeck::notifier::Notifier;
use taskdeck::settings::Settings;
use taskdeck::storage::Storage;
use taskdeck::store::TaskStore;
use taskdeck::tui::{install_panic_hook, App, Tui};

/// Log file name inside the data directory.
const LOG_FILE: &str = "taskdeck.log";

/// Taskdeck - a terminal to-do list.
///
/// Tasks, completion, reordering, and due-date reminders, persisted to a
/// per-user data directory.
#[derive(Parser, Debug)]
#[command(name = "taskdeck")]
#[command(author, version, about, long_about = None)]
#[command(after_help = "\
ENVIRONMENT VARIABLES:
    TASKDECK_DATA_DIR    Data directory (default: ~/.taskdeck)
    TASKDECK_TICK_SECS   Seconds between due-date scans (default: 60)

EXAMPLES:
    # Start the task list
    taskdeck

    # Keep state somewhere else
    taskdeck run --data-dir /tmp/scratch-tasks

    # Find where state lives
    taskdeck path
")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

/// CLI subcommands.
#[derive(Subcommand, Debug)]
enum Command {
    /// Start the interactive task list.
    Run {
        /// Data directory override (takes precedence over TASKDECK_DATA_DIR).
        #[arg(short, long)]
        data_dir: Option<PathBuf>,
    },

    /// Print the data directory path and exit.
    Path,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Some(Command::Path) => {
            let config = Config::from_env().context("Failed to load configuration")?;
            println!("{}", config.data_dir.display());
            Ok(())
        }
        Some(Command::Run { data_dir }) => run_app(data_dir),
        None => run_app(None),
    }
}

/// Starts the TUI, holding the terminal for the lifetime of the session.
fn run_app(data_dir_override: Option<PathBuf>) -> Result<()> {
    let mut config = Config::from_env().context("Failed to load configuration")?;
    if let Some(dir) = data_dir_override {
        config.data_dir = dir;
    }

    std::fs::create_dir_all(&config.data_dir).with_context(|| {
        format!(
            "Failed to create data directory {}",
            config.data_dir.display()
        )
    })?;

    // Logs go to a file: the terminal itself belongs to the TUI.
    let _log_guard = init_logging(&config.data_dir);

    info!(
        data_dir = %config.data_dir.display(),
        tick_secs = config.tick_secs,
        "Starting Taskdeck"
    );

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("Failed to create tokio runtime")?;

    runtime.block_on(run_tui(config))
}

/// Runs the interactive session to completion.
async fn run_tui(config: Config) -> Result<()> {
    let storage = Storage::new(config.data_dir.join("state"));
    let store = TaskStore::load(storage.clone());
    let settings = Settings::load(&storage);

    info!(tasks = store.len(), "State loaded");

    let notifier = Notifier::new(Box::new(TerminalCues::new()));
    let app = App::new(store, settings, notifier, storage, config.tick_secs);

    install_panic_hook();
    let mut tui = Tui::new().context("Failed to initialize terminal")?;

    let result = app.run(&mut tui).await;

    // Restore even when the loop failed, so the error prints to a sane
    // terminal.
    tui.restore().context("Failed to restore terminal")?;

    result.context("Session ended with an error")?;

    info!("Taskdeck stopped");
    Ok(())
}

/// Initializes file-based logging. The returned guard must be held for the
/// lifetime of the process so buffered lines are flushed on exit.
fn init_logging(data_dir: &std::path::Path) -> tracing_appender::non_blocking::WorkerGuard {
    let file_appender = tracing_appender::rolling::never(data_dir, LOG_FILE);
    let (writer, guard) = tracing_appender::non_blocking(file_appender);

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .with_target(true)
        .with_level(true)
        .init();

    guard
}
