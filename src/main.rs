//! newyear-countdown - live countdown to New Year's Day across every timezone
//!
//! Terminal frontend (ratatui) on top of a frontend-agnostic core.

mod config;
mod core;
mod data;
mod frontend;
mod signals;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::{Parser as ClapParser, Subcommand};
use std::io::Write;
use std::path::PathBuf;
use std::time::Instant;

#[derive(ClapParser)]
#[command(name = "newyear-countdown")]
#[command(about = "Countdown to New Year's Day across every timezone", long_about = None)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Custom data directory (default: ~/.newyear-countdown)
    /// Can also be set via NEWYEAR_COUNTDOWN_DIR environment variable
    #[arg(long, value_name = "DIR")]
    data_dir: Option<PathBuf>,

    /// Start in 12-hour display mode
    #[arg(long)]
    twelve_hour: bool,

    /// Show the celebration right away
    #[arg(long)]
    celebrate: bool,

    /// Run the clock from this RFC 3339 instant (e.g. 2025-12-31T23:59:50Z)
    #[arg(long, value_name = "TIME", value_parser = parse_instant)]
    at: Option<DateTime<Utc>>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the countdown for every timezone and exit
    List,
}

fn parse_instant(s: &str) -> Result<DateTime<Utc>, String> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| format!("expected an RFC 3339 timestamp: {}", e))
}

fn init_logging() -> Result<()> {
    // TUI apps can't log to stdout, so we write to a file
    // (use RUST_LOG env var to control level, e.g. RUST_LOG=debug)
    let log_path = config::Config::log_path()?;
    if let Some(parent) = log_path.parent() {
        std::fs::create_dir_all(parent)
            .context(format!("Failed to create data directory: {:?}", parent))?;
    }
    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .context(format!("Failed to open log file: {:?}", log_path))?;

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::sync::Mutex::new(log_file))
        .with_ansi(false) // No color codes in log file
        .init();
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set custom data directory before anything resolves paths
    if let Some(data_dir) = &cli.data_dir {
        std::env::set_var(config::DATA_DIR_ENV, data_dir);
    }

    init_logging()?;
    tracing::info!("Starting newyear-countdown v{}", env!("CARGO_PKG_VERSION"));

    let mut config = if let Some(config_path) = &cli.config {
        config::Config::load_from_path(config_path)?
    } else {
        config::Config::load()?
    };
    if cli.twelve_hour {
        config.countdown.use_24_hour = false;
    }

    let zones = match &config.timezones_file {
        Some(path) => data::TimezoneList::load_from_file(path)?,
        None => data::TimezoneList::bundled()?,
    };
    tracing::info!("{} timezones loaded", zones.len());

    if let Some(Commands::List) = cli.command {
        let mut stdout = std::io::stdout().lock();
        return print_list(&mut stdout, &config, &zones, cli.at.unwrap_or_else(Utc::now));
    }

    run_tui(config, zones, &cli)
}

/// Plain-text countdown for every zone (no terminal UI)
fn print_list(
    out: &mut impl Write,
    config: &config::Config,
    zones: &data::TimezoneList,
    now: DateTime<Utc>,
) -> Result<()> {
    use crate::core::countdown::{format_local_time, time_until_new_year, HourFormat};

    let format = HourFormat::from_use_24_hour(config.countdown.use_24_hour);
    for tz in zones.iter() {
        let offset = tz.offset.fixed();
        writeln!(
            out,
            "{:<10} {:>11}  {:>16}  {}",
            tz.zone(),
            format_local_time(now, offset, format),
            time_until_new_year(now, offset).to_string(),
            tz.countries_label()
        )
        .context("Failed to write timezone list")?;
    }
    Ok(())
}

/// Run TUI frontend
fn run_tui(config: config::Config, zones: data::TimezoneList, cli: &Cli) -> Result<()> {
    // Single-threaded runtime: one tick timer, input and signals on one loop
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to build async runtime")?;
    runtime.block_on(async_run_tui(config, zones, cli.at, cli.celebrate))
}

/// Async TUI main loop
async fn async_run_tui(
    config: config::Config,
    zones: data::TimezoneList,
    simulate_from: Option<DateTime<Utc>>,
    celebrate: bool,
) -> Result<()> {
    use crate::core::AppCore;
    use crate::frontend::tui::palette::Palette;
    use crate::frontend::{Frontend, TuiFrontend};

    let mut app_core = AppCore::new(config, zones, Utc::now());
    if let Some(start) = simulate_from {
        app_core.simulate_from(start);
    }

    let mut signals = crate::signals::SignalBridge::new()?;
    tracing::info!("Send SIGUSR1 to pid {} to start the confetti", std::process::id());

    let palette = Palette::from_config(&app_core.config.ui);
    let mut frontend = TuiFrontend::new(palette)?;

    if celebrate {
        app_core.start_confetti(Instant::now());
    }

    let result = event_loop(&mut app_core, &mut frontend, &mut signals).await;

    frontend.cleanup()?;
    signals.close();
    tracing::info!("Shutdown complete");
    result
}

/// Draw a frame if state changed or an animation is running.
///
/// Returns whether animation frames must be scheduled before the next tick.
/// Read after rendering, since the render itself is what starts a burst.
fn draw_frame<F: crate::frontend::Frontend>(
    app_core: &mut crate::core::AppCore,
    frontend: &mut F,
    instant: Instant,
) -> Result<bool> {
    if app_core.needs_render || frontend.is_animating() {
        frontend.render(app_core, instant)?;
        app_core.needs_render = false;
    }
    Ok(frontend.is_animating())
}

async fn event_loop(
    app_core: &mut crate::core::AppCore,
    frontend: &mut crate::frontend::TuiFrontend,
    signals: &mut crate::signals::SignalBridge,
) -> Result<()> {
    use crate::signals::SignalAction;
    use tokio::time::{interval, MissedTickBehavior};

    let mut tick = interval(app_core.config.countdown.tick_interval());
    tick.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let mut frame = interval(app_core.config.celebration.frame_interval());
    frame.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let mut signals_open = true;

    while app_core.running {
        let animating = draw_frame(app_core, frontend, Instant::now())?;

        tokio::select! {
            _ = tick.tick() => {
                let now = app_core.wall_clock();
                app_core.tick(now, Instant::now());
            }
            _ = frame.tick(), if animating => {}
            event = frontend.next_event() => {
                app_core.handle_event(event?, Instant::now());
            }
            action = signals.next(), if signals_open => match action {
                Some(SignalAction::Celebrate) => app_core.start_confetti(Instant::now()),
                Some(SignalAction::Shutdown) => app_core.quit(),
                None => signals_open = false,
            },
        }
    }

    Ok(())
}
