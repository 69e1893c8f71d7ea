use core_text::{Cursor, Point, Range, is_word_char};
use tracing::trace;

use super::{Tab, View};

/// Cursor motions understood by [`View::move_cursor`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Motion {
    Left,
    Right,
    Up,
    Down,
    PageUp,
    PageDown,
    Home,
    End,
    WordLeft,
    WordRight,
    DocStart,
    DocEnd,
}

impl Motion {
    /// Vertical motions keep the sticky column, everything else resets it.
    pub fn is_vertical(self) -> bool {
        matches!(
            self,
            Motion::Up | Motion::Down | Motion::PageUp | Motion::PageDown
        )
    }
}

impl View {
    pub fn move_cursor(&mut self, motion: Motion, select: bool) {
        let cursor = self.cursor();
        let page = self.window.height().max(1);
        let doc = &self.tabs[self.active].doc;
        let row = cursor.row();
        let target = match motion {
            Motion::Left => cursor - Point::new(1, 0),
            Motion::Right => cursor + Point::new(1, 0),
            Motion::Up => cursor - Point::new(0, 1),
            Motion::Down => cursor + Point::new(0, 1),
            Motion::PageUp => cursor - Point::new(0, page),
            Motion::PageDown => cursor + Point::new(0, page),
            Motion::Home => Point::new(0, cursor.y),
            Motion::End => Cursor::at(doc.line_len(row), row),
            Motion::WordLeft => self.word_left(cursor),
            Motion::WordRight => self.word_right(cursor),
            Motion::DocStart => Point::origin(),
            Motion::DocEnd => doc.end(),
        };
        self.go(target, !motion.is_vertical(), select);
    }

    /// Move by `delta`; a non-zero horizontal component (or no movement at
    /// all) counts as a horizontal motion.
    pub fn process_movement(&mut self, delta: Point, select: bool) {
        let target = self.cursor() + delta;
        self.go(target, delta.x != 0 || delta.y == 0, select);
    }

    fn go(&mut self, target: Cursor, horizontal: bool, select: bool) {
        let last_x = self.last_x;
        let Tab { doc, state } = &mut self.tabs[self.active];
        if select {
            if state.selection.is_none() {
                state.selection = Some(Range::collapsed(state.cursor));
            }
        } else {
            state.selection = None;
        }
        let mut next = doc.clamp(target);
        if !horizontal && let Some(line) = doc.row(next.row()) {
            next = Cursor::at(line.logical_index(last_x), next.row());
        }
        if let Some(sel) = state.selection.as_mut() {
            sel.extend(next);
        }
        trace!(target: "model.view", from = ?state.cursor, to = ?next, select, "cursor_moved");
        state.cursor = next;
        if horizontal {
            self.sync_sticky();
        }
        self.ensure_visible();
    }

    fn word_left(&self, at: Cursor) -> Cursor {
        let doc = self.doc();
        let (col, row) = (at.col(), at.row());
        if col == 0 {
            return if row > 0 {
                Cursor::at(doc.line_len(row - 1), row - 1)
            } else {
                at
            };
        }
        let chars: Vec<char> = doc
            .row(row)
            .map(|l| l.logical_text().chars().collect())
            .unwrap_or_default();
        let mut i = col.min(chars.len());
        while i > 0 && !is_word_char(chars[i - 1]) {
            i -= 1;
        }
        while i > 0 && is_word_char(chars[i - 1]) {
            i -= 1;
        }
        Cursor::at(i, row)
    }

    fn word_right(&self, at: Cursor) -> Cursor {
        let doc = self.doc();
        let (col, row) = (at.col(), at.row());
        let len = doc.line_len(row);
        if col >= len {
            return if row + 1 < doc.row_count() {
                Cursor::at(0, row + 1)
            } else {
                at
            };
        }
        let chars: Vec<char> = doc
            .row(row)
            .map(|l| l.logical_text().chars().collect())
            .unwrap_or_default();
        let mut i = col;
        while i < chars.len() && !is_word_char(chars[i]) {
            i += 1;
        }
        while i < chars.len() && is_word_char(chars[i]) {
            i += 1;
        }
        Cursor::at(i, row)
    }

    /// Adjust the scroll offset so the cursor is inside the window. An axis
    /// that is out of view recenters the cursor on that axis.
    pub fn ensure_visible(&mut self) {
        let (w, h) = (self.window.width(), self.window.height());
        let Tab { doc, state } = &mut self.tabs[self.active];
        let cursor = state.cursor;
        let vx = doc
            .row(cursor.row())
            .map(|l| l.visual_index(cursor.col()))
            .unwrap_or(0) as i32;
        let local = Point::new(vx, cursor.y) - state.offset;
        let (in_x, in_y) = self.window.contains_axes(local);
        if !in_y {
            state.offset.y = (cursor.y - h / 2).max(0);
        }
        if !in_x {
            state.offset.x = (vx - w / 2).max(0);
        }
        if !in_x || !in_y {
            trace!(target: "model.view", offset = ?state.offset, "scrolled");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use super::*;

    #[test]
    fn horizontal_moves_clamp_at_line_edges() {
        let mut view = view_with("ab\ncd", 20, 5);
        view.move_cursor(Motion::Left, false);
        assert_eq!(view.cursor(), Point::origin());
        view.move_cursor(Motion::End, false);
        view.move_cursor(Motion::Right, false);
        assert_eq!(view.cursor(), Point::new(2, 0));
    }

    #[test]
    fn vertical_moves_use_sticky_visual_column() {
        let mut view = view_with("abcdefgh\n\tx\nabcdefgh", 20, 5);
        view.set_cursor(Point::new(5, 0));
        view.move_cursor(Motion::Down, false);
        // the tab covers cells 0..4, 'x' sits at cell 4, end of line at 5
        assert_eq!(view.cursor(), Point::new(2, 1));
        view.move_cursor(Motion::Down, false);
        assert_eq!(view.cursor(), Point::new(5, 2));
    }

    #[test]
    fn short_line_clamps_then_restores_column() {
        let mut view = view_with("abcdef\nab\nabcdef", 20, 5);
        view.set_cursor(Point::new(4, 0));
        view.move_cursor(Motion::Down, false);
        assert_eq!(view.cursor(), Point::new(2, 1));
        view.move_cursor(Motion::Down, false);
        assert_eq!(view.cursor(), Point::new(4, 2));
    }

    #[test]
    fn select_extends_and_plain_move_collapses() {
        let mut view = view_with("hello world", 20, 5);
        view.move_cursor(Motion::Right, true);
        view.move_cursor(Motion::Right, true);
        assert_eq!(
            view.selection(),
            Some(Range::new(Point::origin(), Point::new(2, 0)))
        );
        view.move_cursor(Motion::Right, false);
        assert_eq!(view.selection(), None);
        assert_eq!(view.cursor(), Point::new(3, 0));
    }

    #[test]
    fn word_motions_skip_separators_and_wrap() {
        let mut view = view_with("foo_bar, baz\nqux", 20, 5);
        view.move_cursor(Motion::WordRight, false);
        assert_eq!(view.cursor(), Point::new(7, 0));
        view.move_cursor(Motion::WordRight, false);
        assert_eq!(view.cursor(), Point::new(12, 0));
        view.move_cursor(Motion::WordRight, false);
        assert_eq!(view.cursor(), Point::new(0, 1));
        view.move_cursor(Motion::WordLeft, false);
        assert_eq!(view.cursor(), Point::new(12, 0));
        view.move_cursor(Motion::WordLeft, false);
        assert_eq!(view.cursor(), Point::new(9, 0));
        view.move_cursor(Motion::WordLeft, false);
        assert_eq!(view.cursor(), Point::new(0, 0));
    }

    #[test]
    fn document_start_and_end() {
        let mut view = view_with("one\ntwo\nthree", 20, 5);
        view.move_cursor(Motion::DocEnd, false);
        assert_eq!(view.cursor(), Point::new(5, 2));
        view.move_cursor(Motion::DocStart, true);
        assert_eq!(view.cursor(), Point::origin());
        assert_eq!(
            view.selection(),
            Some(Range::new(Point::new(5, 2), Point::origin()))
        );
    }

    #[test]
    fn page_moves_by_window_height_and_scrolls() {
        let text = (0..50).map(|i| i.to_string()).collect::<Vec<_>>().join("\n");
        let mut view = view_with(&text, 10, 10);
        view.move_cursor(Motion::PageDown, false);
        assert_eq!(view.cursor().y, 10);
        // row 10 is out of a 10-row window at offset 0: recenter
        assert_eq!(view.offset().y, 5);
        view.move_cursor(Motion::PageUp, false);
        view.move_cursor(Motion::PageUp, false);
        assert_eq!(view.cursor().y, 0);
        assert_eq!(view.offset().y, 0);
    }

    #[test]
    fn long_line_scrolls_horizontally_to_midcolumn() {
        let mut view = view_with(&"x".repeat(40), 10, 3);
        view.move_cursor(Motion::End, false);
        assert_eq!(view.offset().x, 35);
        view.move_cursor(Motion::Home, false);
        assert_eq!(view.offset().x, 0);
    }
}
