//! Terminal demo for the dwell-click engine
//!
//! A grid of buttons is laid out on the terminal. The arrow keys move a
//! simulated head pointer; resting on a button for the configured hover time
//! activates it.
//!
//! Controls:
//! - Arrow keys: Move the pointer (Shift for larger steps)
//! - Space: Toggle pointer tracking (simulates a lost face)
//! - h: Show or hide the hidden button
//! - d: Enable or disable the locked button
//! - + / -: Lengthen or shorten the hover time
//! - Esc or Ctrl+Q: Quit
//!
//! Usage:
//!   dwell-demo                          # Use discovered settings
//!   dwell-demo --config dwell.toml      # Use an explicit settings file
//!   dwell-demo --print-config           # Show effective settings and exit

mod app;
mod feedback;
mod scene;
mod simulator;
mod ui;

use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use dwell_config::Settings;
use tracing_subscriber::EnvFilter;

use crate::app::DemoApp;

#[derive(Debug, Parser)]
#[command(name = "dwell-demo", version, about = "Dwell-to-click terminal demo")]
struct Args {
    /// Settings file; overrides DWELL_CLICK_CONFIG and the user config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Milliseconds between engine ticks
    #[arg(long)]
    tick_ms: Option<u64>,

    /// Log destination; the terminal is owned by the UI while running
    #[arg(long, default_value = "dwell-demo.log")]
    log_file: PathBuf,

    /// Print the effective settings as TOML and exit
    #[arg(long)]
    print_config: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let (mut settings, source) = Settings::discover(args.config.as_deref())?;
    if let Some(tick_ms) = args.tick_ms {
        settings.tick.interval_ms = tick_ms.max(1);
    }

    if args.print_config {
        print!("{}", settings.to_toml_string()?);
        return Ok(());
    }

    init_logging(&args.log_file, &settings.logging.filter)?;
    tracing::info!("Starting dwell-demo with settings from {:?}", source);

    let mut app = DemoApp::new(&settings)?
        .with_tick_rate(Duration::from_millis(settings.tick.interval_ms));
    app.run()?;

    let stats = app.stats();
    tracing::info!(
        "Exiting after {} ticks, {} activations ({} failed)",
        stats.ticks,
        stats.activations,
        app.failed_activations()
    );
    Ok(())
}

fn init_logging(path: &Path, default_filter: &str) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("failed to create log file {}", path.display()))?;
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_filter))
        .with_context(|| format!("invalid log filter '{}'", default_filter))?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}
