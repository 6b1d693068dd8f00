//! postboard - live message board
//!
//! `postboard serve` runs the board server, `postboard client` runs the
//! terminal client:
//! - UI Layer (Ratatui) - synchronous terminal rendering
//! - App Layer - post store and form state machine
//! - Network Layer (Tokio) - async HTTP and the push channel

use std::io;
use std::time::Duration;

use clap::{Parser, Subcommand};
use crossterm::{
    event::{self, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::prelude::*;
use tokio::sync::mpsc;

use postboard::constants::{DEFAULT_HOST, DEFAULT_LOG_FILE, DEFAULT_PORT, DEFAULT_SERVER_URL};
use postboard::messages::ui_events::key_to_ui_event;
use postboard::{AppActor, BoardState, NetworkActor, NetworkCommand, NetworkResponse, RenderState, UiEvent};

#[derive(Parser)]
#[command(name = "postboard", version, about = "Live message board")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the board server
    Serve {
        /// Address to bind
        #[arg(long, env = "HOST", default_value = DEFAULT_HOST)]
        host: String,
        /// Port to bind
        #[arg(long, env = "PORT", default_value_t = DEFAULT_PORT)]
        port: u16,
    },
    /// Run the terminal client
    Client {
        /// Board server base URL
        #[arg(long, env = "POSTBOARD_URL", default_value = DEFAULT_SERVER_URL)]
        url: String,
        /// File the client logs to
        #[arg(long, env = "POSTBOARD_LOG", default_value = DEFAULT_LOG_FILE)]
        log: String,
    },
}

/// Terminal cleanup guard
struct TerminalGuard;

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    match Cli::parse().command {
        Command::Serve { host, port } => {
            tracing_subscriber::fmt::init();
            postboard::server::serve(&host, port, BoardState::new()).await
        }
        Command::Client { url, log } => run_client(url, &log).await,
    }
}

async fn run_client(url: String, log: &str) -> anyhow::Result<()> {
    // Initialize logging to file
    let file_appender = tracing_appender::rolling::never(".", log);
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);
    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_ansi(false)
        .init();

    // Terminal setup
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let _terminal_guard = TerminalGuard;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Create channels
    let (ui_tx, ui_rx) = mpsc::unbounded_channel::<UiEvent>();
    let (net_cmd_tx, net_cmd_rx) = mpsc::unbounded_channel::<NetworkCommand>();
    let (net_resp_tx, net_resp_rx) = mpsc::unbounded_channel::<NetworkResponse>();
    let (render_tx, mut render_rx) = mpsc::unbounded_channel::<RenderState>();

    tracing::info!(url = %url, "Starting client");

    // Spawn network actor
    let network_actor = NetworkActor::new(url.clone(), net_resp_tx);
    let network = tokio::spawn(network_actor.run(net_cmd_rx));

    // Spawn app actor
    let app_actor = AppActor::new(url, net_cmd_tx, render_tx);
    let app = tokio::spawn(app_actor.run(ui_rx, net_resp_rx));

    // Run UI loop (synchronous with async polling)
    run_ui_loop(&mut terminal, ui_tx, &mut render_rx).await?;

    // Let the actors tear the push channel down before exiting
    let _ = app.await;
    let _ = network.await;

    Ok(())
}

/// Run the synchronous UI rendering loop
async fn run_ui_loop(
    terminal: &mut Terminal<impl Backend>,
    ui_tx: mpsc::UnboundedSender<UiEvent>,
    render_rx: &mut mpsc::UnboundedReceiver<RenderState>,
) -> anyhow::Result<()> {
    let mut current_state = RenderState::default();

    loop {
        // Draw with current state
        terminal.draw(|f| postboard::ui::draw(f, &current_state))?;

        // Poll for events with timeout
        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                if let Some(event) = key_to_ui_event(
                    key,
                    current_state.input_mode,
                    current_state.loaded,
                    current_state.show_help,
                ) {
                    let quit = matches!(event, UiEvent::Quit);
                    let _ = ui_tx.send(event);
                    if quit {
                        break;
                    }
                }
            }
        }

        // Check for state updates (non-blocking)
        while let Ok(state) = render_rx.try_recv() {
            current_state = state;
        }
    }

    Ok(())
}
