//! The text buffer model.
//!
//! A `Document` is a non-empty list of [`VisualLine`]s plus the bookkeeping
//! that makes edits reversible and observable:
//! * every primitive mutation goes through [`Document::perform`], which
//!   applies an [`EditOp`], records its inverse (unless replaying) and
//!   notifies listeners;
//! * `undo` replays inverses with the undoing guard set;
//! * semantic highlights reported by an external highlighter are kept per row
//!   and dropped when the row (or the structure) changes.
//!
//! Out-of-range coordinates never panic. Rows past the end make the operation
//! a no-op; columns clamp to the line.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use core_text::{Cursor, DEFAULT_TAB_WIDTH, Highlight, VisualLine};
use tracing::{debug, trace};

use crate::error::DocumentError;
use crate::io::{LineEnding, read_file, write_file};
use crate::undo::{CursorTracker, EditOp, UndoEntry, UndoLog};

/// Scope of a change reported to listeners.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowChange {
    /// Only this row's text changed.
    Row(usize),
    /// Rows were added, removed or reordered.
    All,
}

pub trait ModificationListener {
    fn on_modified(&mut self, doc: &Document, change: RowChange);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

pub struct Document {
    lines: Vec<VisualLine>,
    tab_width: usize,
    path: Option<PathBuf>,
    modified: bool,
    line_ending: LineEnding,
    undo: UndoLog,
    undoing: bool,
    listeners: Vec<(ListenerId, Box<dyn ModificationListener>)>,
    next_listener: u64,
    highlights: BTreeMap<usize, Vec<Highlight>>,
}

impl std::fmt::Debug for Document {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Document")
            .field("path", &self.path)
            .field("rows", &self.lines.len())
            .field("modified", &self.modified)
            .field("undo_depth", &self.undo.len())
            .finish()
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new(DEFAULT_TAB_WIDTH)
    }
}

impl Document {
    /// Empty untitled document.
    pub fn new(tab_width: usize) -> Self {
        Self {
            lines: vec![VisualLine::new("", tab_width)],
            tab_width: tab_width.max(1),
            path: None,
            modified: false,
            line_ending: LineEnding::Lf,
            undo: UndoLog::new(),
            undoing: false,
            listeners: Vec::new(),
            next_listener: 0,
            highlights: BTreeMap::new(),
        }
    }

    /// Untitled document holding `text` (split on `\n`). Not marked modified.
    pub fn from_text(text: &str, tab_width: usize) -> Self {
        let mut doc = Self::new(tab_width);
        doc.lines = text
            .split('\n')
            .map(|l| VisualLine::new(l, doc.tab_width))
            .collect();
        doc
    }

    pub fn open(path: impl AsRef<Path>, tab_width: usize) -> Result<Self, DocumentError> {
        let mut doc = Self::new(tab_width);
        doc.load(path.as_ref())?;
        Ok(doc)
    }

    /// Replace the content with the file at `path` and adopt the path.
    pub fn load(&mut self, path: &Path) -> Result<(), DocumentError> {
        let decoded = read_file(path)?;
        self.lines = decoded
            .lines
            .iter()
            .map(|l| VisualLine::new(l, self.tab_width))
            .collect();
        self.line_ending = decoded.ending;
        self.path = Some(path.to_path_buf());
        self.modified = false;
        self.undo.clear();
        self.highlights.clear();
        self.notify(RowChange::All);
        Ok(())
    }

    /// Write to `path`, or to the current path when `None`.
    pub fn save(&mut self, path: Option<&Path>) -> Result<(), DocumentError> {
        let target = match path {
            Some(p) => p.to_path_buf(),
            None => self.path.clone().ok_or(DocumentError::NoPath)?,
        };
        if !self.modified && self.path.as_deref() == Some(target.as_path()) {
            trace!(target: "state.io", path = %target.display(), "save_skipped_unmodified");
            return Ok(());
        }
        write_file(&target, self.lines.iter().map(|l| l.logical_text()))?;
        self.path = Some(target);
        self.modified = false;
        Ok(())
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn set_path(&mut self, path: Option<PathBuf>) {
        self.path = path;
    }

    /// File name for tab titles.
    pub fn title(&self) -> String {
        self.path
            .as_deref()
            .and_then(|p| p.file_name())
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "untitled".to_string())
    }

    pub fn line_ending(&self) -> LineEnding {
        self.line_ending
    }

    pub fn is_modified(&self) -> bool {
        self.modified
    }

    pub fn tab_width(&self) -> usize {
        self.tab_width
    }

    pub fn set_tab_width(&mut self, tab_width: usize) {
        self.tab_width = tab_width.max(1);
        for line in &mut self.lines {
            line.set_tab_width(self.tab_width);
        }
    }

    pub fn row_count(&self) -> usize {
        self.lines.len()
    }

    pub fn row(&self, i: usize) -> Option<&VisualLine> {
        self.lines.get(i)
    }

    pub fn rows(&self) -> impl Iterator<Item = &VisualLine> {
        self.lines.iter()
    }

    /// Logical length of row `i`; 0 for rows past the end.
    pub fn line_len(&self, i: usize) -> usize {
        self.lines.get(i).map(|l| l.logical_len()).unwrap_or(0)
    }

    /// Whole content joined with `\n`.
    pub fn text(&self) -> String {
        self.lines
            .iter()
            .map(|l| l.logical_text())
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn undo_depth(&self) -> usize {
        self.undo.len()
    }

    pub fn undo_entries(&self) -> &[UndoEntry] {
        self.undo.entries()
    }

    /// Nearest valid cursor: row in `[0, row_count)`, column in
    /// `[0, line_len(row)]`.
    pub fn clamp(&self, p: Cursor) -> Cursor {
        let mut c = p;
        c.clamp_y(0, self.lines.len() as i32);
        c.clamp_x(0, self.line_len(c.row()) as i32);
        c
    }

    /// Cursor just past the last character of the document.
    pub fn end(&self) -> Cursor {
        let row = self.lines.len() - 1;
        Cursor::at(self.line_len(row), row)
    }

    /// Reset to a single empty line, dropping history. Not an undoable edit.
    pub fn clear(&mut self) {
        self.lines = vec![VisualLine::new("", self.tab_width)];
        self.undo.clear();
        self.highlights.clear();
        self.modified = false;
        self.notify(RowChange::All);
    }

    pub fn add_listener(&mut self, listener: Box<dyn ModificationListener>) -> ListenerId {
        let id = ListenerId(self.next_listener);
        self.next_listener += 1;
        self.listeners.push((id, listener));
        id
    }

    pub fn remove_listener(&mut self, id: ListenerId) -> Option<Box<dyn ModificationListener>> {
        let idx = self.listeners.iter().position(|(lid, _)| *lid == id)?;
        Some(self.listeners.remove(idx).1)
    }

    fn notify(&mut self, change: RowChange) {
        match change {
            RowChange::Row(r) => {
                self.highlights.remove(&r);
            }
            RowChange::All => self.highlights.clear(),
        }
        let mut listeners = std::mem::take(&mut self.listeners);
        for (_, listener) in listeners.iter_mut() {
            listener.on_modified(self, change);
        }
        // listeners registered during notification are kept after the old ones
        listeners.append(&mut self.listeners);
        self.listeners = listeners;
    }

    // ---- semantic highlights -------------------------------------------------

    pub fn set_semantic_highlights(&mut self, row: usize, ranges: Vec<Highlight>) {
        if row >= self.lines.len() {
            return;
        }
        if ranges.is_empty() {
            self.highlights.remove(&row);
        } else {
            self.highlights.insert(row, ranges);
        }
    }

    /// Clear one row, or every row with `None`.
    pub fn clear_semantic_highlights(&mut self, row: Option<usize>) {
        match row {
            Some(r) => {
                self.highlights.remove(&r);
            }
            None => self.highlights.clear(),
        }
    }

    pub fn semantic_highlights(&self, row: usize) -> &[Highlight] {
        self.highlights.get(&row).map(Vec::as_slice).unwrap_or(&[])
    }

    // ---- primitive mutations -------------------------------------------------

    /// Insert `text` at `at` and return the cursor after the inserted text.
    /// Embedded newlines split the line; the whole insertion is one compound.
    pub fn insert_text(&mut self, tracker: &dyn CursorTracker, at: Cursor, text: &str) -> Cursor {
        let at = self.clamp(at);
        if !text.contains('\n') {
            let n = text.chars().count();
            self.perform(
                tracker,
                EditOp::InsertText {
                    at,
                    text: text.to_string(),
                },
            );
            return self.clamp(Cursor::at(at.col() + n, at.row()));
        }
        self.start_compound(tracker);
        let mut pos = at;
        for (i, piece) in text.split('\n').enumerate() {
            if i > 0 {
                self.perform(tracker, EditOp::SplitLine { at: pos });
                pos = Cursor::at(0, pos.row() + 1);
            }
            if !piece.is_empty() {
                self.perform(
                    tracker,
                    EditOp::InsertText {
                        at: pos,
                        text: piece.to_string(),
                    },
                );
                pos = Cursor::at(pos.col() + piece.chars().count(), pos.row());
            }
        }
        self.stop_compound();
        self.clamp(pos)
    }

    pub fn split_line(&mut self, tracker: &dyn CursorTracker, at: Cursor) {
        self.perform(tracker, EditOp::SplitLine { at });
    }

    pub fn join_next_row(&mut self, tracker: &dyn CursorTracker, row: usize) {
        self.perform(tracker, EditOp::JoinNextRow { row });
    }

    pub fn insert_line(&mut self, tracker: &dyn CursorTracker, row: usize, text: &str) {
        self.perform(
            tracker,
            EditOp::InsertLine {
                row,
                text: text.to_string(),
            },
        );
    }

    pub fn delete_line(&mut self, tracker: &dyn CursorTracker, row: usize) {
        self.perform(tracker, EditOp::DeleteLine { row });
    }

    /// Remove columns `[from, to)` of `row`; `to == None` deletes to the end
    /// of the line.
    pub fn delete_block(
        &mut self,
        tracker: &dyn CursorTracker,
        row: usize,
        from: usize,
        to: Option<usize>,
    ) -> Result<(), DocumentError> {
        if let Some(to) = to
            && to < from
        {
            return Err(DocumentError::InvalidBlock { from, to });
        }
        self.perform(tracker, EditOp::DeleteBlock { row, from, to });
        Ok(())
    }

    /// Delete the char under `at`, or join the next row at end of line.
    pub fn delete(&mut self, tracker: &dyn CursorTracker, at: Cursor) {
        let at = self.clamp(at);
        let (col, row) = (at.col(), at.row());
        if col < self.line_len(row) {
            self.perform(
                tracker,
                EditOp::DeleteBlock {
                    row,
                    from: col,
                    to: Some(col + 1),
                },
            );
        } else if row + 1 < self.lines.len() {
            self.perform(tracker, EditOp::JoinNextRow { row });
        }
    }

    /// Delete the char before `at`, joining with the previous row at column
    /// 0. Returns the new cursor.
    pub fn backspace(&mut self, tracker: &dyn CursorTracker, at: Cursor) -> Cursor {
        let at = self.clamp(at);
        let (col, row) = (at.col(), at.row());
        if col > 0 {
            self.perform(
                tracker,
                EditOp::DeleteBlock {
                    row,
                    from: col - 1,
                    to: Some(col),
                },
            );
            Cursor::at(col - 1, row)
        } else if row > 0 {
            let len = self.line_len(row - 1);
            self.perform(tracker, EditOp::JoinNextRow { row: row - 1 });
            Cursor::at(len, row - 1)
        } else {
            at
        }
    }

    /// Overwrite `count` chars at `at` with `text`.
    pub fn replace_text(
        &mut self,
        tracker: &dyn CursorTracker,
        at: Cursor,
        text: &str,
        count: usize,
    ) {
        self.perform(
            tracker,
            EditOp::ReplaceText {
                at,
                text: text.to_string(),
                count,
            },
        );
    }

    pub fn start_compound(&mut self, tracker: &dyn CursorTracker) {
        if !self.undoing {
            self.undo.start_compound(tracker.capture_cursor());
        }
    }

    pub fn stop_compound(&mut self) {
        if !self.undoing {
            self.undo.stop_compound();
        }
    }

    /// Revert the most recent edit or compound. Returns whether anything was
    /// replayed.
    pub fn undo(&mut self, tracker: &mut dyn CursorTracker) -> bool {
        let mut depth = 0usize;
        let mut replayed = false;
        self.undoing = true;
        while let Some(entry) = self.undo.pop() {
            match entry {
                UndoEntry::CompoundStop => depth += 1,
                UndoEntry::CompoundStart { cursor } => {
                    if depth == 0 {
                        trace!(target: "state.undo", "unbalanced_start_discarded");
                        continue;
                    }
                    depth -= 1;
                    if depth == 0 {
                        tracker.restore_cursor(cursor);
                        break;
                    }
                }
                UndoEntry::Edit { cursor, op } => {
                    if let Some((_, change)) = self.apply(op) {
                        replayed = true;
                        self.notify(change);
                    }
                    if depth == 0 {
                        tracker.restore_cursor(cursor);
                        break;
                    }
                }
            }
        }
        self.undoing = false;
        if replayed {
            self.modified = true;
        }
        debug!(target: "state.undo", replayed, remaining = self.undo.len(), "undo");
        replayed
    }

    /// Apply `op`, record its inverse unless replaying, notify listeners.
    fn perform(&mut self, tracker: &dyn CursorTracker, op: EditOp) {
        let cursor = tracker.capture_cursor();
        let Some((inverse, change)) = self.apply(op) else {
            return;
        };
        if !self.undoing {
            self.undo.record(cursor, inverse);
        }
        self.modified = true;
        self.notify(change);
    }

    /// Execute one operation. Returns its inverse and change scope, or `None`
    /// when the operation did nothing.
    fn apply(&mut self, op: EditOp) -> Option<(EditOp, RowChange)> {
        let rows = self.lines.len();
        match op {
            EditOp::InsertText { at, text } => {
                let row = at.row();
                if row >= rows || text.is_empty() {
                    return None;
                }
                let line = &mut self.lines[row];
                let col = at.col().min(line.logical_len());
                line.insert(col, &text);
                let n = text.chars().count();
                Some((
                    EditOp::DeleteBlock {
                        row,
                        from: col,
                        to: Some(col + n),
                    },
                    RowChange::Row(row),
                ))
            }
            EditOp::SplitLine { at } => {
                let row = at.row();
                if row >= rows {
                    return None;
                }
                let line = &mut self.lines[row];
                let col = at.col().min(line.logical_len());
                let tail = line.split(col);
                self.lines.insert(row + 1, tail);
                Some((EditOp::JoinNextRow { row }, RowChange::All))
            }
            EditOp::JoinNextRow { row } => {
                if row + 1 >= rows {
                    return None;
                }
                let next = self.lines.remove(row + 1);
                let line = &mut self.lines[row];
                let len = line.logical_len();
                line.extend(&next);
                Some((
                    EditOp::SplitLine {
                        at: Cursor::at(len, row),
                    },
                    RowChange::All,
                ))
            }
            EditOp::InsertLine { row, text } => {
                let row = row.min(rows);
                self.lines.insert(row, VisualLine::new(&text, self.tab_width));
                Some((EditOp::DeleteLine { row }, RowChange::All))
            }
            EditOp::DeleteLine { row } => {
                if row >= rows {
                    return None;
                }
                if rows == 1 {
                    // a document always keeps one line
                    let old = self.lines[0].logical_text().to_string();
                    if old.is_empty() {
                        return None;
                    }
                    self.lines[0].set_text("");
                    return Some((
                        EditOp::InsertText {
                            at: Cursor::origin(),
                            text: old,
                        },
                        RowChange::Row(0),
                    ));
                }
                let old = self.lines.remove(row);
                Some((
                    EditOp::InsertLine {
                        row,
                        text: old.logical_text().to_string(),
                    },
                    RowChange::All,
                ))
            }
            EditOp::DeleteBlock { row, from, to } => {
                if row >= rows {
                    return None;
                }
                let line = &mut self.lines[row];
                let len = line.logical_len();
                let to = to.unwrap_or(len).min(len);
                let from = from.min(len);
                if to <= from {
                    return None;
                }
                let removed = line.erase(from, to - from);
                Some((
                    EditOp::InsertText {
                        at: Cursor::at(from, row),
                        text: removed,
                    },
                    RowChange::Row(row),
                ))
            }
            EditOp::ReplaceText { at, text, count } => {
                let row = at.row();
                if row >= rows {
                    return None;
                }
                let line = &mut self.lines[row];
                let col = at.col().min(line.logical_len());
                if text.is_empty() && (count == 0 || col == line.logical_len()) {
                    return None;
                }
                let removed = line.erase(col, count);
                line.insert(col, &text);
                Some((
                    EditOp::ReplaceText {
                        at: Cursor::at(col, row),
                        count: text.chars().count(),
                        text: removed,
                    },
                    RowChange::Row(row),
                ))
            }
        }
    }
}
