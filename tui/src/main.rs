//! Bookrec TUI Entry Point
//!
//! Launches the terminal UI for browsing book recommendations.
//!
//! Usage:
//!   bookrec-tui [OPTIONS]
//!
//! Options:
//!   -c, --config <FILE>   Config file (default: <config dir>/bookrec/config.toml)
//!   --host <HOST>         Recommendation service host (default: 127.0.0.1)
//!   -p, --port <PORT>     Recommendation service port (default: 8000)
//!   -k, --limit <N>       Results per search (default: 1000)
//!   --completion-policy <POLICY>
//!                         latest-only (default) or last-writer-wins
//!   -q, --query <TEXT>    Search for TEXT on startup
//!
//! Logs are written to stderr, and only when stderr is redirected
//! (`bookrec-tui 2>bookrec.log`), so they never draw over the UI.

use std::io::{self, IsTerminal};
use std::panic;

use anyhow::Context;
use clap::Parser;
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use browser_core::{load_config, HttpBackend};
use bookrec_tui::{App, Args};

/// Log filter used when `RUST_LOG` is not set
const DEFAULT_LOG_FILTER: &str = "bookrec_tui=info,browser_core=info";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Set up logging
    if !io::stderr().is_terminal() {
        tracing_subscriber::registry()
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(false)
                    .with_writer(io::stderr),
            )
            .with(
                EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
            )
            .init();
    }

    // Check if we have a TTY before attempting initialization
    if !io::stdin().is_terminal() || !io::stdout().is_terminal() {
        eprintln!("Error: bookrec-tui requires a terminal (TTY)");
        eprintln!();
        eprintln!("This usually means:");
        eprintln!("  • Running in a non-interactive environment (CI, container)");
        eprintln!("  • SSH without -t flag");
        eprintln!("  • Piped stdin/stdout");
        std::process::exit(1);
    }

    let (config, source) =
        load_config(args.config.as_deref(), &args.overrides()).context("Failed to load config")?;
    tracing::info!(
        source = %source,
        host = %config.service.host,
        port = config.service.port,
        limit = config.search.limit,
        policy = %config.completion_policy,
        "Starting bookrec-tui"
    );

    let backend =
        HttpBackend::from_config(&config.service).context("Failed to build HTTP client")?;
    let mut app = App::new(backend, config).with_initial_query(args.query);

    // Set up panic hook to restore terminal
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        // Restore terminal before printing panic
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(panic_info);
    }));

    // Initialize terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout))?;
    terminal.clear()?;

    // Run the app
    let result = app.run(&mut terminal).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    // Propagate any errors
    result
}
