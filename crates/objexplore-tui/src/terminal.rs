//! Terminal setup and keyboard input

use crate::keymap::Keymap;
use anyhow::{Context, Result};
use crossterm::event::{self, Event};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use log::debug;
use objexplore::{EventSource, InputEvent};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use std::io::{self, Stdout};

/// Raw mode plus the alternate screen, restored on drop
pub struct TerminalSession {
    _private: (),
}

impl TerminalSession {
    /// Take over the terminal
    pub fn enter() -> Result<Self> {
        enable_raw_mode().context("failed to enable raw mode")?;
        if let Err(err) = execute!(io::stdout(), EnterAlternateScreen) {
            teardown_terminal();
            return Err(err).context("failed to enter the alternate screen");
        }
        debug!("terminal session started");
        Ok(Self { _private: () })
    }

    /// A ratatui terminal drawing to stdout
    pub fn terminal(&self) -> Result<Terminal<CrosstermBackend<Stdout>>> {
        let mut terminal = Terminal::new(CrosstermBackend::new(io::stdout()))
            .context("failed to create the terminal")?;
        terminal.clear().context("failed to clear the terminal")?;
        terminal.hide_cursor().context("failed to hide the cursor")?;
        Ok(terminal)
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        teardown_terminal();
        debug!("terminal session ended");
    }
}

fn teardown_terminal() {
    let _ = disable_raw_mode();
    let mut stdout = io::stdout();
    let _ = execute!(stdout, LeaveAlternateScreen, crossterm::cursor::Show);
}

/// Blocking keyboard input translated through a [`Keymap`]
pub struct KeyboardEvents {
    keymap: Keymap,
}

impl KeyboardEvents {
    pub fn new(keymap: Keymap) -> Self {
        Self { keymap }
    }
}

impl EventSource for KeyboardEvents {
    fn next_event(&mut self) -> Result<Option<InputEvent>> {
        loop {
            match event::read().context("failed to read a terminal event")? {
                Event::Key(key) => {
                    if let Some(event) = self.keymap.translate(key) {
                        return Ok(Some(event));
                    }
                }
                Event::Resize(width, height) => {
                    debug!("terminal resized to {}x{}", width, height);
                    return Ok(Some(InputEvent::Redraw));
                }
                _ => {}
            }
        }
    }
}
