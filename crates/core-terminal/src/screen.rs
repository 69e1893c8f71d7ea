//! crossterm-backed [`Screen`].
//!
//! Output is batched: `move_to`/`write`/`show_cursor` only append commands,
//! `flush` emits them in order and flushes stdout once per frame.
//!
//! Invariants:
//! * Commands preserve ordering; nothing reaches the terminal mid-frame.
//! * Color changes are emitted only when the style differs from the last
//!   one queued in the frame.

use std::io::{Stdout, Write, stdout};
use std::time::Duration;

use anyhow::Result;
use core_config::Palette;
use core_events::KeyEvent;
use core_text::{Point, StyleId};
use crossterm::{
    cursor::{Hide, MoveTo, Show},
    event::{self, Event as CEvent},
    queue,
    style::{Color, Print, SetBackgroundColor, SetForegroundColor},
    terminal,
};
use tracing::trace;

use crate::Screen;
use crate::backend::TerminalGuard;
use crate::keys::map_key_event;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Command {
    MoveTo(u16, u16),
    Style(StyleId),
    Print(String),
    Cursor(bool),
}

pub struct CrosstermScreen {
    out: Stdout,
    palette: Palette,
    size: Point,
    cmds: Vec<Command>,
    last_style: Option<StyleId>,
    guard: TerminalGuard,
}

impl CrosstermScreen {
    /// Enter raw mode and the alternate screen.
    pub fn enter(palette: Palette) -> Result<Self> {
        let guard = TerminalGuard::enter()?;
        let (w, h) = terminal::size()?;
        Ok(Self {
            out: stdout(),
            palette,
            size: Point::new(w as i32, h as i32),
            cmds: Vec::new(),
            last_style: None,
            guard,
        })
    }

    pub fn guard_mut(&mut self) -> &mut TerminalGuard {
        &mut self.guard
    }
}

impl Screen for CrosstermScreen {
    fn size(&self) -> Point {
        self.size
    }

    fn move_to(&mut self, p: Point) {
        let x = p.x.clamp(0, u16::MAX as i32) as u16;
        let y = p.y.clamp(0, u16::MAX as i32) as u16;
        self.cmds.push(Command::MoveTo(x, y));
    }

    fn write(&mut self, text: &str, style: StyleId) {
        if text.is_empty() {
            return;
        }
        if self.last_style != Some(style) {
            self.cmds.push(Command::Style(style));
            self.last_style = Some(style);
        }
        self.cmds.push(Command::Print(text.to_string()));
    }

    fn show_cursor(&mut self, visible: bool) {
        self.cmds.push(Command::Cursor(visible));
    }

    fn flush(&mut self) -> Result<()> {
        let count = self.cmds.len();
        for c in self.cmds.drain(..) {
            match c {
                Command::MoveTo(x, y) => queue!(self.out, MoveTo(x, y))?,
                Command::Style(style) => {
                    let pair = self.palette.get(style);
                    queue!(
                        self.out,
                        SetForegroundColor(Color::AnsiValue(pair.fg)),
                        SetBackgroundColor(Color::AnsiValue(pair.bg))
                    )?;
                }
                Command::Print(s) => queue!(self.out, Print(s))?,
                Command::Cursor(true) => queue!(self.out, Show)?,
                Command::Cursor(false) => queue!(self.out, Hide)?,
            }
        }
        self.out.flush()?;
        self.last_style = None;
        trace!(target: "runtime", commands = count, "frame_flushed");
        Ok(())
    }

    fn read_key(&mut self, timeout: Duration) -> Result<Option<KeyEvent>> {
        if !event::poll(timeout)? {
            return Ok(None);
        }
        match event::read()? {
            CEvent::Key(k) => Ok(map_key_event(&k)),
            CEvent::Resize(w, h) => {
                self.size = Point::new(w as i32, h as i32);
                trace!(target: "runtime", width = w, height = h, "terminal_resized");
                Ok(None)
            }
            _ => Ok(None),
        }
    }
}
