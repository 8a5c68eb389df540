//! QuakeWatch TUI - A terminal seismic dashboard.
//!
//! Shows recent earthquakes around Bangladesh from the USGS feed on a map,
//! a list and a magnitude chart, refreshing every minute and falling back to
//! the last cached result when the network is unavailable.

mod app;
mod ui;

use std::io;
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use quakewatch_core::{live_feed_client, Config, DataOrigin, Earthquake, SourceRef};
use ratatui::{backend::CrosstermBackend, Terminal};
use serde::Serialize;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use app::{App, AppState};
use ui::input::handle_input;
use ui::render::render;

// ============================================================================
// Constants
// ============================================================================

/// Timeout for polling terminal events (in milliseconds)
const EVENT_POLL_TIMEOUT_MS: u64 = 100;

/// Log file written inside the cache directory
const LOG_FILE: &str = "quakewatch.log";

/// Initialize the tracing subscriber for logging.
///
/// The dashboard owns the terminal, so logs go to a file in `log_dir`.
/// Without a directory (CLI commands) they go to stderr.
/// Use RUST_LOG env var to control log level (e.g., RUST_LOG=debug).
fn init_tracing(log_dir: Option<&Path>) -> Option<WorkerGuard> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    match log_dir {
        Some(dir) => {
            let appender = tracing_appender::rolling::never(dir, LOG_FILE);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            tracing_subscriber::registry()
                .with(fmt::layer().with_writer(writer).with_ansi(false))
                .with(filter)
                .init();
            Some(guard)
        }
        None => {
            tracing_subscriber::registry()
                .with(fmt::layer().with_writer(io::stderr))
                .with(filter)
                .init();
            None
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let config = Config::load()?;

    // Check for CLI commands
    let args: Vec<String> = std::env::args().collect();
    if args.len() > 1 && args[1] == "--dump" {
        init_tracing(None);
        let force = args.iter().any(|a| a == "--force");
        return dump_feed(&config, force).await;
    }

    let cache_dir = config.cache_dir()?;
    std::fs::create_dir_all(&cache_dir)
        .with_context(|| format!("Failed to create cache directory {}", cache_dir.display()))?;
    let _log_guard = init_tracing(Some(&cache_dir));
    info!("QuakeWatch starting");

    let feed = live_feed_client(&config)?;
    let mut app = App::new(feed);

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Startup fetch (cache allowed) and the auto-refresh timer
    app.start();

    // Main loop
    let result = run_app(&mut terminal, &mut app);

    app.shutdown();

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(e) = result {
        eprintln!("Error: {}", e);
    }

    info!("QuakeWatch shutting down");
    Ok(())
}

/// Fetch the feed once and print it to stdout as JSON
async fn dump_feed(config: &Config, force: bool) -> Result<()> {
    #[derive(Serialize)]
    struct DumpOutput {
        origin: &'static str,
        count: usize,
        events: Vec<Earthquake>,
        sources: Vec<SourceRef>,
    }

    let feed = live_feed_client(config)?;
    eprintln!("Fetching earthquake feed from {}...", feed.source().base_url());

    let data = feed.fetch(force).await.context("Failed to fetch earthquake feed")?;

    let origin = match data.origin {
        DataOrigin::Cache => "cache",
        DataOrigin::Network => "network",
        DataOrigin::StaleCache => "stale-cache",
    };
    let output = DumpOutput {
        origin,
        count: data.events.len(),
        events: data.events,
        sources: data.sources,
    };

    let json = serde_json::to_string_pretty(&output)?;
    println!("{}", json);

    eprintln!("Done! {} events ({}).", output.count, origin);
    Ok(())
}

fn run_app(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, app: &mut App) -> Result<()> {
    loop {
        // Draw UI
        terminal.draw(|f| render(f, app))?;

        // Poll for events with timeout to allow background updates
        if event::poll(Duration::from_millis(EVENT_POLL_TIMEOUT_MS))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    // Ctrl+C to quit
                    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
                        return Ok(());
                    }

                    if handle_input(app, key) {
                        return Ok(());
                    }
                }
            }
        }

        // Apply finished fetches and timer ticks
        app.check_background_tasks();

        // Check if we should quit
        if matches!(app.state, AppState::Quitting) {
            return Ok(());
        }
    }
}
