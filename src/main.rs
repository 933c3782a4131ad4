mod api;
mod app;
mod cli;
mod config;
mod error;
mod event;
mod export;
mod logging;
mod model;
mod report;
mod session;
mod snapshot;
mod ui;
mod util;

use std::io;
use std::panic;

use anyhow::Result;
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tokio::sync::mpsc;

use api::rest::RestClient;
use app::{Action, App};
use cli::Command;
use config::AppConfig;
use session::SessionStore;

#[tokio::main]
async fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let command = cli::parse_args(&args)?;

    // Load config
    let config = config::load_config()?;
    if let Err(e) = logging::init(&config.log) {
        eprintln!("Logging disabled: {e:#}");
    }

    match command {
        Command::Tui => run_tui(config).await,
        Command::Login { email, password } => cli::handle_login(&config, &email, password).await,
        Command::Logout => cli::handle_logout(),
        Command::Export {
            report,
            output,
            range,
        } => cli::handle_export(&config, report, output, range).await,
        Command::Help => {
            cli::print_help();
            Ok(())
        }
    }
}

async fn run_tui(config: AppConfig) -> Result<()> {
    let backend = RestClient::new(&config.api)?;
    log::info!("Starting dashboard against {}", config.api.base_url);

    // Set up action channel
    let (action_tx, mut action_rx) = mpsc::unbounded_channel::<Action>();

    // Create app
    let mut app = App::new(
        Box::new(backend),
        SessionStore::new(),
        config.export,
        action_tx.clone(),
    );

    // Set up terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let term_backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(term_backend)?;
    terminal.hide_cursor()?;

    // Set up panic hook to restore terminal
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(panic_info);
    }));

    // Spawn event reader
    let event_tx = action_tx.clone();
    tokio::spawn(async move {
        event::run_event_loop(event_tx).await;
    });

    // Initial fetch; without a session the login form is showing instead
    if app.session.is_some() {
        terminal.draw(|f| ui::render(f, &app))?;
        app.refresh().await;
    }

    // Main loop
    loop {
        // Render
        terminal.draw(|f| ui::render(f, &app))?;

        // Wait for action
        if let Some(action) = action_rx.recv().await {
            app.update(action).await;
            if app.should_quit {
                break;
            }
        } else {
            break;
        }
    }

    // Restore terminal
    terminal.show_cursor()?;
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    log::info!("Dashboard closed");

    Ok(())
}
