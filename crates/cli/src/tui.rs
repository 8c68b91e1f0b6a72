//! Terminal setup and the main event loop.

use crate::app::App;
use crate::ui;
use anyhow::Result;
use crossterm::{
    event::{self, Event as CrosstermEvent, KeyEvent, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use researchdesk::Controller;
use std::io::{self, Stdout};
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::info;

const TICK_RATE: Duration = Duration::from_millis(100);

/// Runs the interactive UI until the user quits.
pub async fn run(controller: Controller) -> Result<()> {
    enable_raw_mode()?;
    let _guard = TerminalGuard;
    let mut terminal = setup_terminal()?;

    let (key_tx, mut key_rx) = mpsc::channel::<KeyEvent>(256);
    spawn_input_reader(key_tx);

    // Both lists load in the background; the first frames show them empty.
    tokio::spawn({
        let controller = controller.clone();
        async move { controller.initialize().await }
    });

    let mut app = App::new(controller);
    let mut ticker = tokio::time::interval(TICK_RATE);
    info!("Terminal UI started.");

    while app.running {
        let page = app.controller.snapshot().await;
        terminal.draw(|f| ui::ui(f, &app, &page))?;

        tokio::select! {
            _ = ticker.tick() => {}
            Some(key) = key_rx.recv() => app.handle_key(key).await,
        }
    }

    info!("Terminal UI closed.");
    Ok(())
}

/// Enters the alternate screen. Raw mode must already be on.
fn setup_terminal() -> Result<Terminal<CrosstermBackend<Stdout>>> {
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    Ok(Terminal::new(backend)?)
}

struct TerminalGuard;

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let mut stdout = io::stdout();
        let _ = execute!(stdout, LeaveAlternateScreen);
    }
}

fn spawn_input_reader(sender: mpsc::Sender<KeyEvent>) {
    std::thread::spawn(move || loop {
        if let Ok(true) = event::poll(Duration::from_millis(200)) {
            if let Ok(CrosstermEvent::Key(key)) = event::read() {
                if key.kind == KeyEventKind::Press && sender.blocking_send(key).is_err() {
                    break;
                }
            }
        }
    });
}
