use std::io::{self, Stdout, Write};
use std::time::Duration;

use crossterm::cursor::{Hide, MoveTo, Show};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::style::{Color, Print, ResetColor, SetForegroundColor};
use crossterm::terminal::{
    self, Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode,
    enable_raw_mode,
};
use crossterm::{execute, queue};
use log::{debug, warn};

use crate::drawing::{Key, ScreenBuffer, Surface};

/// Full-screen terminal surface. The terminal is restored when this is dropped.
pub struct TerminalSurface {
    out: Stdout,
}

impl TerminalSurface {
    pub fn open() -> io::Result<Self> {
        enable_raw_mode()?;
        let mut out = io::stdout();
        execute!(out, EnterAlternateScreen, Hide, Clear(ClearType::All))?;
        debug!("Terminal switched to raw mode");
        Ok(TerminalSurface { out })
    }
}

impl Drop for TerminalSurface {
    fn drop(&mut self) {
        if let Err(err) = execute!(self.out, ResetColor, Show, LeaveAlternateScreen) {
            warn!("Failed to restore the screen: {err}");
        }
        if let Err(err) = disable_raw_mode() {
            warn!("Failed to leave raw mode: {err}");
        }
        debug!("Terminal restored");
    }
}

impl Surface for TerminalSurface {
    fn size(&self) -> io::Result<(u16, u16)> {
        terminal::size()
    }

    fn present(&mut self, frame: &ScreenBuffer) -> io::Result<()> {
        queue!(self.out, SetForegroundColor(Color::Cyan))?;
        for (y, line) in frame.lines().iter().enumerate() {
            queue!(self.out, MoveTo(0, y as u16), Print(line))?;
        }
        queue!(self.out, ResetColor)?;
        self.out.flush()
    }

    fn poll_key(&mut self, timeout: Duration) -> io::Result<Option<Key>> {
        if !event::poll(timeout)? {
            return Ok(None);
        }
        match event::read()? {
            Event::Key(key) => Ok(map_key(&key)),
            _ => Ok(None),
        }
    }
}

/// Raw mode swallows the interrupt signal, so Ctrl-C is reported as Escape.
fn map_key(key: &KeyEvent) -> Option<Key> {
    if key.kind == KeyEventKind::Release {
        return None;
    }
    match key.code {
        KeyCode::Enter => Some(Key::Enter),
        KeyCode::Esc => Some(Key::Escape),
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => Some(Key::Escape),
        KeyCode::Up => Some(Key::ArrowUp),
        KeyCode::Down => Some(Key::ArrowDown),
        KeyCode::Left => Some(Key::ArrowLeft),
        KeyCode::Right => Some(Key::ArrowRight),
        _ => None,
    }
}
