//! Terminal host for the dialog dock using ratatui
//!
//! Plays both collaborators of the dock: the windowing host that draws the
//! dock container, and the dialog-creation layer that opens, docks and
//! closes dialogs.

mod app;
mod dialogs;
mod events;
mod keys;

pub use app::App;
pub use events::{Event, EventHandler};
pub use keys::{Action, KeyMap};

use crate::config::Config;
use anyhow::Result;
use crossterm::execute;
use crossterm::terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use std::io;
use std::time::Duration;
use tracing::debug;

pub type Backend = CrosstermBackend<io::Stdout>;
pub type Frame<'a> = ratatui::Frame<'a>;

/// Initialize the terminal for TUI mode
pub fn init_terminal() -> Result<Terminal<Backend>> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

/// Restore the terminal to normal mode
pub fn restore_terminal(terminal: &mut Terminal<Backend>) -> Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}

/// Leave raw mode and the alternate screen without a terminal handle.
///
/// Used from the panic hook, where the terminal owned by [`run`] is out of
/// reach. Safe to call when the terminal was never set up.
pub fn reset_terminal() -> Result<()> {
    disable_raw_mode()?;
    execute!(io::stdout(), LeaveAlternateScreen)?;
    Ok(())
}

/// Main TUI entry point
pub async fn run(config: Config) -> Result<()> {
    let mut event_handler = EventHandler::new(Duration::from_millis(config.tick_rate_ms));
    let dock = crate::dock::dock();
    let mut app = App::new(config, dock, event_handler.dock_sender());

    let mut terminal = init_terminal()?;
    let result = run_app(&mut terminal, &mut app, &mut event_handler).await;

    restore_terminal(&mut terminal)?;
    result
}

/// Main application loop
async fn run_app(
    terminal: &mut Terminal<Backend>,
    app: &mut App,
    event_handler: &mut EventHandler,
) -> Result<()> {
    loop {
        terminal.draw(|frame| app.render(frame))?;

        match event_handler.next().await {
            Some(event) => {
                if app.handle_event(event)? {
                    break; // Exit requested
                }
            }
            None => {
                debug!("Event source closed");
                break;
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reset_terminal_outside_raw_mode() {
        assert!(reset_terminal().is_ok());
        assert!(reset_terminal().is_ok());
    }
}
