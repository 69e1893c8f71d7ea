//! Terminal abstraction and crossterm implementation.
//!
//! Everything above this crate draws through the [`Screen`] trait. The real
//! terminal is [`CrosstermScreen`]; tests use [`MemoryScreen`], a cell grid
//! that records what was written and replays scripted key presses.

use std::time::Duration;

use anyhow::Result;
use core_events::KeyEvent;
use core_text::{Point, StyleId};

pub mod backend;
pub mod keys;
pub mod memory;
pub mod screen;

pub use backend::TerminalGuard;
pub use memory::MemoryScreen;
pub use screen::CrosstermScreen;

/// Cell-addressed output surface plus key input.
pub trait Screen {
    /// Size in cells (width, height).
    fn size(&self) -> Point;
    fn move_to(&mut self, p: Point);
    /// Write `text` at the current position in `style`; the position
    /// advances by the display width of `text`.
    fn write(&mut self, text: &str, style: StyleId);
    fn show_cursor(&mut self, visible: bool);
    fn flush(&mut self) -> Result<()>;
    /// Wait up to `timeout` for a key press.
    fn read_key(&mut self, timeout: Duration) -> Result<Option<KeyEvent>>;
}
