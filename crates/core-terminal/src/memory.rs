//! In-memory [`Screen`] for tests: a grid of styled cells plus a queue of
//! scripted key presses.

use std::collections::VecDeque;
use std::time::Duration;

use anyhow::Result;
use core_events::KeyEvent;
use core_text::{Point, StyleId, char_width};

use crate::Screen;

/// Second half of a wide glyph.
const CONTINUATION: char = '\0';

#[derive(Debug, Clone)]
pub struct MemoryScreen {
    size: Point,
    cells: Vec<Vec<(char, StyleId)>>,
    pos: Point,
    cursor_visible: bool,
    keys: VecDeque<KeyEvent>,
    flushes: usize,
}

impl MemoryScreen {
    pub fn new(width: i32, height: i32) -> Self {
        let w = width.max(0) as usize;
        let h = height.max(0) as usize;
        Self {
            size: Point::new(width.max(0), height.max(0)),
            cells: vec![vec![(' ', StyleId::BACKGROUND); w]; h],
            pos: Point::origin(),
            cursor_visible: false,
            keys: VecDeque::new(),
            flushes: 0,
        }
    }

    pub fn resize(&mut self, width: i32, height: i32) {
        *self = Self {
            keys: std::mem::take(&mut self.keys),
            ..Self::new(width, height)
        };
    }

    pub fn push_key(&mut self, key: KeyEvent) {
        self.keys.push_back(key);
    }

    /// Visible text of row `y` (wide glyphs appear once).
    pub fn row_text(&self, y: i32) -> String {
        self.cells
            .get(y.max(0) as usize)
            .map(|row| row.iter().map(|c| c.0).filter(|c| *c != CONTINUATION).collect())
            .unwrap_or_default()
    }

    pub fn style_at(&self, x: i32, y: i32) -> Option<StyleId> {
        self.cells.get(y as usize)?.get(x as usize).map(|c| c.1)
    }

    pub fn char_at(&self, x: i32, y: i32) -> Option<char> {
        self.cells.get(y as usize)?.get(x as usize).map(|c| c.0)
    }

    /// Position of the last `move_to` or write.
    pub fn cursor(&self) -> Point {
        self.pos
    }

    pub fn cursor_visible(&self) -> bool {
        self.cursor_visible
    }

    pub fn flush_count(&self) -> usize {
        self.flushes
    }

    fn put(&mut self, x: i32, y: i32, c: char, style: StyleId) {
        if x < 0 || y < 0 || x >= self.size.x || y >= self.size.y {
            return;
        }
        self.cells[y as usize][x as usize] = (c, style);
    }
}

impl Screen for MemoryScreen {
    fn size(&self) -> Point {
        self.size
    }

    fn move_to(&mut self, p: Point) {
        self.pos = p;
    }

    fn write(&mut self, text: &str, style: StyleId) {
        for c in text.chars() {
            let w = char_width(c) as i32;
            if w == 0 {
                continue;
            }
            self.put(self.pos.x, self.pos.y, c, style);
            for i in 1..w {
                self.put(self.pos.x + i, self.pos.y, CONTINUATION, style);
            }
            self.pos.x += w;
        }
    }

    fn show_cursor(&mut self, visible: bool) {
        self.cursor_visible = visible;
    }

    fn flush(&mut self) -> Result<()> {
        self.flushes += 1;
        Ok(())
    }

    fn read_key(&mut self, _timeout: Duration) -> Result<Option<KeyEvent>> {
        Ok(self.keys.pop_front())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_events::KeyCode;

    #[test]
    fn writes_are_clipped_to_the_grid() {
        let mut s = MemoryScreen::new(5, 2);
        s.move_to(Point::new(3, 1));
        s.write("abcdef", StyleId::TEXT);
        assert_eq!(s.row_text(1), "   ab");
        assert_eq!(s.style_at(4, 1), Some(StyleId::TEXT));
        assert_eq!(s.row_text(0), "     ");
    }

    #[test]
    fn wide_glyph_takes_two_cells() {
        let mut s = MemoryScreen::new(4, 1);
        s.move_to(Point::origin());
        s.write("世x", StyleId::TEXT);
        assert_eq!(s.cursor(), Point::new(3, 0));
        assert_eq!(s.row_text(0), "世x ");
    }

    #[test]
    fn scripted_keys_are_replayed_in_order() {
        let mut s = MemoryScreen::new(1, 1);
        s.push_key(KeyEvent::plain(KeyCode::Enter));
        s.push_key(KeyEvent::ctrl('s'));
        let t = Duration::from_millis(0);
        assert_eq!(s.read_key(t).unwrap(), Some(KeyEvent::plain(KeyCode::Enter)));
        assert_eq!(s.read_key(t).unwrap(), Some(KeyEvent::ctrl('s')));
        assert_eq!(s.read_key(t).unwrap(), None);
    }
}
