use core_state::{Document, DocumentError};
use core_text::{Cursor, Point, Range, is_word_char};
use tracing::{trace, warn};

use super::{Tab, TabState, View};

impl View {
    /// Delete the selected text, leaving the cursor at the selection start.
    /// Returns whether anything was selected.
    pub fn delete_selection(&mut self) -> bool {
        let Some(range) = self.selection() else {
            self.tab_mut().state.selection = None;
            return false;
        };
        let (start, stop) = range.ordered();
        let Tab { doc, state } = &mut self.tabs[self.active];
        doc.start_compound(state);
        let result = remove_range(doc, state, start, stop);
        doc.stop_compound();
        if let Err(e) = result {
            warn!(target: "model.view", error = %e, "delete_selection_failed");
        }
        state.cursor = doc.clamp(start);
        state.selection = None;
        trace!(target: "model.view", ?start, ?stop, "selection_deleted");
        self.sync_sticky();
        self.ensure_visible();
        true
    }

    /// Type one character. In overwrite mode the character under the cursor
    /// is replaced; `}` on a line holding only indentation drops one level.
    pub fn insert_char(&mut self, c: char) {
        if self.read_only {
            return;
        }
        self.begin_edit();
        if c == '}' {
            self.unindent_for_brace();
        }
        let overwrite = self.overwrite;
        let Tab { doc, state } = &mut self.tabs[self.active];
        let at = state.cursor;
        let mut buf = [0u8; 4];
        let text = c.encode_utf8(&mut buf);
        if overwrite && at.col() < doc.line_len(at.row()) {
            doc.replace_text(state, at, text, 1);
            state.cursor = doc.clamp(at + Point::new(1, 0));
        } else {
            state.cursor = doc.insert_text(state, at, text);
        }
        self.end_edit();
    }

    /// Insert a string at the cursor; newlines split the line.
    pub fn insert_text(&mut self, text: &str) {
        if self.read_only || text.is_empty() {
            return;
        }
        self.begin_edit();
        let Tab { doc, state } = &mut self.tabs[self.active];
        state.cursor = doc.insert_text(state, state.cursor, text);
        self.end_edit();
    }

    /// Add `text` as new rows at the end of the document and follow it with
    /// the cursor. Works on read-only views; used for log style panes.
    pub fn append(&mut self, text: &str) {
        let Tab { doc, state } = &mut self.tabs[self.active];
        let end = doc.end();
        let mut chunk = String::with_capacity(text.len() + 2);
        if end.col() > 0 {
            chunk.push('\n');
        }
        for line in text.split('\n') {
            chunk.push_str(line.strip_suffix('\r').unwrap_or(line));
            chunk.push('\n');
        }
        state.cursor = doc.insert_text(state, end, &chunk);
        state.selection = None;
        self.sync_sticky();
        self.ensure_visible();
    }

    /// Empty the active document and move the cursor home.
    pub fn clear_document(&mut self) {
        let Tab { doc, state } = &mut self.tabs[self.active];
        doc.clear();
        *state = TabState::default();
        self.sync_sticky();
        self.ensure_visible();
    }

    /// Split the line at the cursor and carry the leading whitespace over.
    pub fn enter(&mut self) {
        if self.read_only {
            return;
        }
        self.begin_edit();
        let Tab { doc, state } = &mut self.tabs[self.active];
        let at = state.cursor;
        let indent: String = doc
            .row(at.row())
            .map(|l| l.indentation().chars().take(at.col()).collect())
            .unwrap_or_default();
        doc.split_line(state, at);
        let next = Cursor::at(0, at.row() + 1);
        state.cursor = if indent.is_empty() {
            next
        } else {
            doc.insert_text(state, next, &indent)
        };
        self.end_edit();
    }

    pub fn delete(&mut self) {
        if self.read_only || self.delete_selection() {
            return;
        }
        let Tab { doc, state } = &mut self.tabs[self.active];
        doc.delete(state, state.cursor);
        state.cursor = doc.clamp(state.cursor);
        self.sync_sticky();
        self.ensure_visible();
    }

    pub fn backspace(&mut self) {
        if self.read_only || self.delete_selection() {
            return;
        }
        let Tab { doc, state } = &mut self.tabs[self.active];
        state.cursor = doc.backspace(state, state.cursor);
        self.sync_sticky();
        self.ensure_visible();
    }

    /// With a selection, indent every selected row by one tab; otherwise
    /// insert a tab at the cursor.
    pub fn indent(&mut self) {
        if self.read_only {
            return;
        }
        let Some(range) = self.selection() else {
            self.insert_char('\t');
            return;
        };
        let rows = self.block_rows(range);
        let Tab { doc, state } = &mut self.tabs[self.active];
        doc.start_compound(state);
        for row in rows.clone() {
            doc.insert_text(state, Cursor::at(0, row), "\t");
        }
        doc.stop_compound();
        shift_range(state, rows, 1);
        trace!(target: "model.view", "block_indented");
        self.ensure_visible();
    }

    /// With a selection, strip one leading tab from every selected row;
    /// otherwise strip one indent level (a tab or up to tab-width spaces)
    /// from the cursor row.
    pub fn backtab(&mut self) {
        if self.read_only {
            return;
        }
        match self.selection() {
            Some(range) => {
                let rows = self.block_rows(range);
                let Tab { doc, state } = &mut self.tabs[self.active];
                doc.start_compound(state);
                let mut stripped = Vec::new();
                for row in rows {
                    if doc.row(row).is_some_and(|l| l.char_at(0) == Some('\t')) {
                        if let Err(e) = doc.delete_block(state, row, 0, Some(1)) {
                            warn!(target: "model.view", error = %e, "block_delete_rejected");
                        }
                        stripped.push(row);
                    }
                }
                doc.stop_compound();
                for row in stripped {
                    shift_range(state, row..=row, -1);
                }
            }
            None => {
                let tab_width = self.tab_width;
                let Tab { doc, state } = &mut self.tabs[self.active];
                let row = state.cursor.row();
                let n = doc
                    .row(row)
                    .map(|l| indent_unit(l.indentation(), tab_width))
                    .unwrap_or(0);
                if n > 0 {
                    if let Err(e) = doc.delete_block(state, row, 0, Some(n)) {
                        warn!(target: "model.view", error = %e, "block_delete_rejected");
                    }
                    state.cursor = doc.clamp(Cursor::at(state.cursor.col().saturating_sub(n), row));
                }
            }
        }
        self.sync_sticky();
        self.ensure_visible();
    }

    /// Word fragment immediately before the cursor.
    pub fn recent_word(&self) -> String {
        let cursor = self.cursor();
        let Some(line) = self.doc().row(cursor.row()) else {
            return String::new();
        };
        let before: Vec<char> = line.slice(0, cursor.col()).chars().collect();
        let start = before
            .iter()
            .rposition(|c| !is_word_char(*c))
            .map_or(0, |i| i + 1);
        before[start..].iter().collect()
    }

    /// Replace the word fragment before the cursor with `word`.
    pub fn complete(&mut self, word: &str) {
        if self.read_only {
            return;
        }
        let n = self.recent_word().chars().count();
        let Tab { doc, state } = &mut self.tabs[self.active];
        let at = state.cursor;
        doc.start_compound(state);
        if n > 0
            && let Err(e) = doc.delete_block(state, at.row(), at.col() - n, Some(at.col()))
        {
            warn!(target: "model.view", error = %e, "block_delete_rejected");
        }
        state.cursor = doc.insert_text(state, Cursor::at(at.col() - n, at.row()), word);
        doc.stop_compound();
        self.sync_sticky();
        self.ensure_visible();
    }

    fn begin_edit(&mut self) {
        let Tab { doc, state } = &mut self.tabs[self.active];
        doc.start_compound(state);
        self.delete_selection();
    }

    fn end_edit(&mut self) {
        self.tab_mut().doc.stop_compound();
        self.sync_sticky();
        self.ensure_visible();
    }

    /// Drop one indent level before a `}` typed right after the inherited
    /// indentation.
    fn unindent_for_brace(&mut self) {
        let tab_width = self.tab_width;
        let Tab { doc, state } = &mut self.tabs[self.active];
        let at = state.cursor;
        let Some(line) = doc.row(at.row()) else {
            return;
        };
        let before = line.slice(0, at.col());
        if before.is_empty() || before != line.indentation() {
            return;
        }
        let n = trailing_indent_unit(before, tab_width);
        if n > 0 {
            if let Err(e) = doc.delete_block(state, at.row(), at.col() - n, Some(at.col())) {
                warn!(target: "model.view", error = %e, "block_delete_rejected");
            }
            state.cursor = Cursor::at(at.col() - n, at.row());
        }
    }

    /// Rows affected by a block indent: the first row is skipped when the
    /// selection starts at its end, the last when it stops at column 0.
    fn block_rows(&self, range: Range) -> std::ops::RangeInclusive<usize> {
        let (start, stop) = range.ordered();
        let mut first = start.row();
        if start.col() >= self.doc().line_len(first) {
            first += 1;
        }
        let mut last = stop.row() as isize;
        if stop.col() == 0 {
            last -= 1;
        }
        if last < first as isize {
            // empty inclusive range
            return 1..=0;
        }
        first..=last as usize
    }
}

fn remove_range(
    doc: &mut Document,
    state: &TabState,
    start: Point,
    stop: Point,
) -> Result<(), DocumentError> {
    if start.y == stop.y {
        return doc.delete_block(state, start.row(), start.col(), Some(stop.col()));
    }
    doc.delete_block(state, start.row(), start.col(), None)?;
    doc.delete_block(state, stop.row(), 0, Some(stop.col()))?;
    for _ in start.row() + 1..stop.row() {
        doc.delete_line(state, start.row() + 1);
    }
    doc.join_next_row(state, start.row());
    Ok(())
}

/// Length of one leading indent level: a tab, or up to `tab_width` spaces.
fn indent_unit(indent: &str, tab_width: usize) -> usize {
    if indent.starts_with('\t') {
        return 1;
    }
    indent.chars().take_while(|c| *c == ' ').take(tab_width).count()
}

/// Length of the last indent level in `indent`.
fn trailing_indent_unit(indent: &str, tab_width: usize) -> usize {
    if indent.ends_with('\t') {
        return 1;
    }
    indent.chars().rev().take_while(|c| *c == ' ').take(tab_width).count()
}

/// Move selection endpoints on `rows` by `delta` columns (never below 0).
fn shift_range(state: &mut TabState, rows: std::ops::RangeInclusive<usize>, delta: i32) {
    let shift = |p: &mut Point| {
        if rows.contains(&p.row()) && (delta > 0 || p.x > 0) {
            p.x = (p.x + delta).max(0);
        }
    };
    if let Some(sel) = state.selection.as_mut() {
        shift(&mut sel.anchor);
        shift(&mut sel.active);
        state.cursor = sel.active;
    } else {
        shift(&mut state.cursor);
    }
}
