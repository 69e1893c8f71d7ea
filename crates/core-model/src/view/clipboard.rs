use core_text::Cursor;
use tracing::trace;

use super::{Tab, View};

/// System clipboard collaborator.
pub trait Clipboard {
    fn copy(&mut self, text: &str);
    fn paste(&self) -> String;
}

/// Process-local clipboard.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryClipboard {
    text: String,
}

impl MemoryClipboard {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Clipboard for MemoryClipboard {
    fn copy(&mut self, text: &str) {
        self.text = text.to_string();
    }

    fn paste(&self) -> String {
        self.text.clone()
    }
}

impl View {
    /// Selected text with rows joined by `\n`; empty without a selection.
    pub fn selection_text(&self) -> String {
        let Some(range) = self.selection() else {
            return String::new();
        };
        let (start, stop) = range.ordered();
        let doc = self.doc();
        let mut parts = Vec::new();
        for row in start.row()..=stop.row() {
            let Some(line) = doc.row(row) else { break };
            let from = if row == start.row() { start.col() } else { 0 };
            let to = if row == stop.row() {
                stop.col()
            } else {
                line.logical_len()
            };
            parts.push(line.slice(from, to));
        }
        parts.join("\n")
    }

    pub fn copy(&self, clipboard: &mut dyn Clipboard) -> bool {
        if self.selection().is_none() {
            return false;
        }
        let text = self.selection_text();
        trace!(target: "model.view", chars = text.chars().count(), "copied");
        clipboard.copy(&text);
        true
    }

    pub fn cut(&mut self, clipboard: &mut dyn Clipboard) -> bool {
        if self.read_only || !self.copy(clipboard) {
            return false;
        }
        self.delete_selection()
    }

    /// Replace the selection with the clipboard text. Lines are separated
    /// by plain splits rather than `enter`, so no indentation is carried
    /// over and a cut followed by a paste reproduces the text exactly.
    pub fn paste(&mut self, clipboard: &dyn Clipboard) {
        if self.read_only {
            return;
        }
        let text = clipboard.paste();
        let Tab { doc, state } = &mut self.tabs[self.active];
        doc.start_compound(state);
        self.delete_selection();
        let Tab { doc, state } = &mut self.tabs[self.active];
        let mut at = state.cursor;
        for (i, piece) in text.split('\n').enumerate() {
            if i > 0 {
                doc.split_line(state, at);
                at = Cursor::at(0, at.row() + 1);
            }
            at = doc.insert_text(state, at, piece.trim_end_matches('\r'));
        }
        doc.stop_compound();
        state.cursor = doc.clamp(at);
        trace!(target: "model.view", cursor = ?state.cursor, "pasted");
        self.sync_sticky();
        self.ensure_visible();
    }
}
