//! Operation-log undo.
//!
//! Every primitive document mutation records the exact inverse operation
//! together with the cursor the owning view had before the edit. Multi-step
//! edits are bracketed by compound markers so one `undo` reverts them all.
//!
//! Invariants:
//! * Markers are balanced whenever no edit is in progress.
//! * A compound closed immediately after it was opened leaves no trace:
//!   `stop` pops the dangling start instead of pushing a stop marker. This
//!   also applies to nested empty compounds, which collapse before the outer
//!   depth is counted.
//! * Replaying an entry never records anything (the document's undoing
//!   guard is set during replay).

use core_text::Cursor;
use tracing::trace;

/// Source and sink of the cursor position stored with undo entries.
pub trait CursorTracker {
    fn capture_cursor(&self) -> Cursor;
    fn restore_cursor(&mut self, cursor: Cursor);
}

impl CursorTracker for Cursor {
    fn capture_cursor(&self) -> Cursor {
        *self
    }

    fn restore_cursor(&mut self, cursor: Cursor) {
        *self = cursor;
    }
}

/// Primitive document operation. Columns are logical char indices.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditOp {
    /// Insert newline-free `text` at `at`.
    InsertText { at: Cursor, text: String },
    SplitLine { at: Cursor },
    JoinNextRow { row: usize },
    InsertLine { row: usize, text: String },
    DeleteLine { row: usize },
    /// Remove `[from, to)` of `row`; `to == None` means to end of line.
    DeleteBlock {
        row: usize,
        from: usize,
        to: Option<usize>,
    },
    /// Replace `count` chars at `at` with `text`.
    ReplaceText {
        at: Cursor,
        text: String,
        count: usize,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UndoEntry {
    Edit { cursor: Cursor, op: EditOp },
    CompoundStart { cursor: Cursor },
    CompoundStop,
}

#[derive(Debug, Default)]
pub struct UndoLog {
    entries: Vec<UndoEntry>,
}

impl UndoLog {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[UndoEntry] {
        &self.entries
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn record(&mut self, cursor: Cursor, op: EditOp) {
        trace!(target: "state.undo", depth = self.entries.len(), op = ?op, "record_edit");
        self.entries.push(UndoEntry::Edit { cursor, op });
    }

    pub fn start_compound(&mut self, cursor: Cursor) {
        self.entries.push(UndoEntry::CompoundStart { cursor });
        trace!(target: "state.undo", depth = self.entries.len(), "compound_start");
    }

    pub fn stop_compound(&mut self) {
        if matches!(self.entries.last(), Some(UndoEntry::CompoundStart { .. })) {
            self.entries.pop();
            trace!(target: "state.undo", depth = self.entries.len(), "compound_collapsed");
            return;
        }
        self.entries.push(UndoEntry::CompoundStop);
        trace!(target: "state.undo", depth = self.entries.len(), "compound_stop");
    }

    pub fn pop(&mut self) -> Option<UndoEntry> {
        self.entries.pop()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_compound_collapses() {
        let mut log = UndoLog::new();
        log.start_compound(Cursor::new(1, 1));
        log.stop_compound();
        assert!(log.is_empty());
    }

    #[test]
    fn nested_empty_compound_collapses_inside_outer() {
        let mut log = UndoLog::new();
        log.start_compound(Cursor::origin());
        log.start_compound(Cursor::origin());
        log.stop_compound();
        log.stop_compound();
        assert!(log.is_empty());
    }

    #[test]
    fn non_empty_compound_is_bracketed() {
        let mut log = UndoLog::new();
        log.start_compound(Cursor::origin());
        log.record(Cursor::origin(), EditOp::JoinNextRow { row: 0 });
        log.stop_compound();
        assert_eq!(log.len(), 3);
        assert_eq!(log.entries().last(), Some(&UndoEntry::CompoundStop));
    }

    #[test]
    fn point_tracks_itself() {
        let mut p = Cursor::new(2, 3);
        assert_eq!(p.capture_cursor(), Cursor::new(2, 3));
        p.restore_cursor(Cursor::new(0, 1));
        assert_eq!(p, Cursor::new(0, 1));
    }
}
