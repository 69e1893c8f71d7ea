//! Core event types for tabula.
//!
//! Two kinds of input reach the event loop:
//! * key presses read from the terminal (`KeyEvent`),
//! * results of external collaborators such as a highlighter or a build
//!   process (`ExternalMessage`), delivered through an [`ExternalQueue`] and
//!   drained between key reads.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use core_text::Highlight;
use crossbeam_channel::{Receiver, Sender, unbounded};
use thiserror::Error;
use tracing::trace;

/// Top-level event consumed by the central loop.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    Key(KeyEvent),
    Resize { width: u16, height: u16 },
    External(ExternalMessage),
    Shutdown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyEvent {
    pub code: KeyCode,
    pub mods: KeyModifiers,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    Char(char),
    Enter,
    Esc,
    Backspace,
    Tab,
    BackTab,
    Up,
    Down,
    Left,
    Right,
    Home,
    End,
    PageUp,
    PageDown,
    Insert,
    Delete,
    F(u8),
}

bitflags::bitflags! {
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct KeyModifiers: u8 {
        const CTRL = 0b0000_0001;
        const ALT  = 0b0000_0010;
        const SHIFT= 0b0000_0100;
    }
}

impl KeyEvent {
    pub fn new(code: KeyCode, mods: KeyModifiers) -> Self {
        Self { code, mods }
    }

    pub fn plain(code: KeyCode) -> Self {
        Self::new(code, KeyModifiers::empty())
    }

    pub fn ctrl(c: char) -> Self {
        Self::new(KeyCode::Char(c.to_ascii_lowercase()), KeyModifiers::CTRL)
    }

    /// Printable character carried by the event, if any. Shift is implied
    /// by the character itself; Ctrl or Alt chords are not printable.
    pub fn printable(&self) -> Option<char> {
        match self.code {
            KeyCode::Char(c)
                if !self.mods.intersects(KeyModifiers::CTRL | KeyModifiers::ALT)
                    && !c.is_control() =>
            {
                Some(c)
            }
            _ => None,
        }
    }

    /// Canonical chord name, e.g. `ctrl+s`, `shift+left`, `enter`.
    pub fn chord_name(&self) -> String {
        let mut out = String::new();
        if self.mods.contains(KeyModifiers::CTRL) {
            out.push_str("ctrl+");
        }
        if self.mods.contains(KeyModifiers::ALT) {
            out.push_str("alt+");
        }
        if self.mods.contains(KeyModifiers::SHIFT) {
            out.push_str("shift+");
        }
        match self.code {
            KeyCode::Char(' ') => out.push_str("space"),
            KeyCode::Char(c) => out.push(c.to_ascii_lowercase()),
            KeyCode::F(n) => {
                out.push('f');
                out.push_str(&n.to_string());
            }
            other => out.push_str(named_key(other)),
        }
        out
    }
}

fn named_key(code: KeyCode) -> &'static str {
    match code {
        KeyCode::Enter => "enter",
        KeyCode::Esc => "esc",
        KeyCode::Backspace => "backspace",
        KeyCode::Tab => "tab",
        KeyCode::BackTab => "backtab",
        KeyCode::Up => "up",
        KeyCode::Down => "down",
        KeyCode::Left => "left",
        KeyCode::Right => "right",
        KeyCode::Home => "home",
        KeyCode::End => "end",
        KeyCode::PageUp => "pageup",
        KeyCode::PageDown => "pagedown",
        KeyCode::Insert => "insert",
        KeyCode::Delete => "delete",
        KeyCode::Char(_) | KeyCode::F(_) => "",
    }
}

impl fmt::Display for KeyEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.chord_name())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseKeyError {
    #[error("empty key chord")]
    Empty,
    #[error("unknown modifier `{0}`")]
    UnknownModifier(String),
    #[error("unknown key `{0}`")]
    UnknownKey(String),
}

impl FromStr for KeyEvent {
    type Err = ParseKeyError;

    /// Parse a chord name such as `ctrl+s`, `Shift+Left` or `f5`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        if lower.is_empty() {
            return Err(ParseKeyError::Empty);
        }
        // "+" on its own (or as the last part, "ctrl++") names the plus key
        let (mods_part, key_part) = match lower.strip_suffix("++") {
            Some(prefix) => (Some(prefix), "+"),
            None if lower == "+" => (None, "+"),
            None => match lower.rsplit_once('+') {
                Some((m, k)) => (Some(m), k),
                None => (None, lower.as_str()),
            },
        };
        let mut mods = KeyModifiers::empty();
        for m in mods_part.into_iter().flat_map(|p| p.split('+')) {
            mods |= match m {
                "ctrl" | "control" => KeyModifiers::CTRL,
                "alt" | "meta" => KeyModifiers::ALT,
                "shift" => KeyModifiers::SHIFT,
                other => return Err(ParseKeyError::UnknownModifier(other.to_string())),
            };
        }
        let code = match key_part {
            "enter" | "return" => KeyCode::Enter,
            "esc" | "escape" => KeyCode::Esc,
            "backspace" => KeyCode::Backspace,
            "tab" => KeyCode::Tab,
            "backtab" => KeyCode::BackTab,
            "up" => KeyCode::Up,
            "down" => KeyCode::Down,
            "left" => KeyCode::Left,
            "right" => KeyCode::Right,
            "home" => KeyCode::Home,
            "end" => KeyCode::End,
            "pageup" | "pgup" => KeyCode::PageUp,
            "pagedown" | "pgdn" => KeyCode::PageDown,
            "insert" | "ins" => KeyCode::Insert,
            "delete" | "del" => KeyCode::Delete,
            "space" => KeyCode::Char(' '),
            k if k.len() > 1 && k.starts_with('f') && k[1..].parse::<u8>().is_ok() => {
                KeyCode::F(k[1..].parse().unwrap_or(1))
            }
            k => {
                let mut chars = k.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => KeyCode::Char(c),
                    _ => return Err(ParseKeyError::UnknownKey(k.to_string())),
                }
            }
        };
        Ok(KeyEvent { code, mods })
    }
}

/// Asynchronous result from an external collaborator. Messages naming a
/// path that is no longer open are dropped by the receiver.
#[derive(Debug, Clone, PartialEq)]
pub enum ExternalMessage {
    /// Semantic token ranges for one row of the document at `path`.
    SemanticHighlights {
        path: PathBuf,
        row: usize,
        ranges: Vec<Highlight>,
    },
    /// Forget every semantic range of the document at `path`.
    ClearHighlights { path: PathBuf },
    /// Text for the output pane (one or more lines).
    Output(String),
}

/// Producer side of the external message queue. Cloneable and `Send`.
#[derive(Debug, Clone)]
pub struct ExternalSender {
    tx: Sender<ExternalMessage>,
}

impl ExternalSender {
    /// Returns false when the editor side has gone away.
    pub fn send(&self, msg: ExternalMessage) -> bool {
        self.tx.send(msg).is_ok()
    }
}

/// Consumer side drained by the event loop.
#[derive(Debug)]
pub struct ExternalQueue {
    rx: Receiver<ExternalMessage>,
}

impl ExternalQueue {
    pub fn channel() -> (ExternalSender, ExternalQueue) {
        let (tx, rx) = unbounded();
        (ExternalSender { tx }, ExternalQueue { rx })
    }

    /// Take every pending message without blocking.
    pub fn drain(&self) -> Vec<ExternalMessage> {
        let pending: Vec<ExternalMessage> = self.rx.try_iter().collect();
        if !pending.is_empty() {
            trace!(target: "runtime", count = pending.len(), "external_drained");
        }
        pending
    }
}
