//! One logical line of text plus its cached visual layout.
//!
//! The cache is two tables rebuilt eagerly after every mutation:
//! * `tokens`: text runs separated by tab tokens,
//! * `columns`: visual start column of every logical position, with one
//!   trailing entry for the end of line (`columns.len() == logical_len + 1`).
//!
//! Readers never observe a stale cache because every mutating method ends in
//! `relayout()`.

use crate::style::{Highlight, StyleId};
use crate::token::VisualToken;
use crate::width::{byte_offset, char_width, tab_stop};

pub const DEFAULT_TAB_WIDTH: usize = 4;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisualLine {
    text: String,
    tab_width: usize,
    len: usize,
    tokens: Vec<VisualToken>,
    columns: Vec<usize>,
}

impl Default for VisualLine {
    fn default() -> Self {
        Self::new("", DEFAULT_TAB_WIDTH)
    }
}

impl VisualLine {
    pub fn new(text: &str, tab_width: usize) -> Self {
        let mut line = Self {
            text: text.to_string(),
            tab_width: tab_width.max(1),
            len: 0,
            tokens: Vec::new(),
            columns: Vec::new(),
        };
        line.relayout();
        line
    }

    fn relayout(&mut self) {
        self.tokens.clear();
        self.columns.clear();
        let mut col = 0usize;
        let mut run = String::new();
        let mut run_col = 0usize;
        let mut run_logical = 0usize;
        let mut n = 0usize;
        for c in self.text.chars() {
            self.columns.push(col);
            if c == '\t' {
                if !run.is_empty() {
                    self.tokens
                        .push(VisualToken::text_run(run_col, &run, run_logical));
                    run.clear();
                }
                let next = tab_stop(col, self.tab_width);
                self.tokens.push(VisualToken::tab(col, next - col, n));
                col = next;
            } else {
                if run.is_empty() {
                    run_col = col;
                    run_logical = n;
                }
                run.push(c);
                col += char_width(c);
            }
            n += 1;
        }
        if !run.is_empty() {
            self.tokens
                .push(VisualToken::text_run(run_col, &run, run_logical));
        }
        self.columns.push(col);
        self.len = n;
    }

    pub fn tab_width(&self) -> usize {
        self.tab_width
    }

    pub fn set_tab_width(&mut self, tab_width: usize) {
        self.tab_width = tab_width.max(1);
        self.relayout();
    }

    /// Number of logical characters.
    pub fn logical_len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Visual width of the whole line in cells.
    pub fn visual_len(&self) -> usize {
        self.columns.last().copied().unwrap_or(0)
    }

    pub fn logical_text(&self) -> &str {
        &self.text
    }

    /// Text as it appears on screen, tabs expanded to spaces.
    pub fn visual_text(&self) -> String {
        self.tokens.iter().map(|t| t.text.as_str()).collect()
    }

    pub fn tokens(&self) -> &[VisualToken] {
        &self.tokens
    }

    pub fn char_at(&self, i: usize) -> Option<char> {
        self.text.chars().nth(i)
    }

    /// Logical substring `[from, to)`, both clamped to the line.
    pub fn slice(&self, from: usize, to: usize) -> &str {
        let a = byte_offset(&self.text, from.min(self.len));
        let b = byte_offset(&self.text, to.min(self.len)).max(a);
        &self.text[a..b]
    }

    /// Visual column of logical index `i`; indices past the end clamp to the
    /// end of line.
    pub fn visual_index(&self, i: usize) -> usize {
        self.columns[i.min(self.len)]
    }

    /// Last logical index whose visual start is at or before column `v`.
    pub fn logical_index(&self, v: usize) -> usize {
        self.columns.partition_point(|&c| c <= v).saturating_sub(1)
    }

    /// Leading spaces and tabs.
    pub fn indentation(&self) -> &str {
        let end = self
            .text
            .find(|c: char| c != ' ' && c != '\t')
            .unwrap_or(self.text.len());
        &self.text[..end]
    }

    pub fn set_text(&mut self, text: &str) {
        self.text.clear();
        self.text.push_str(text);
        self.relayout();
    }

    pub fn insert(&mut self, at: usize, text: &str) {
        let b = byte_offset(&self.text, at.min(self.len));
        self.text.insert_str(b, text);
        self.relayout();
    }

    /// Remove `count` characters starting at `at`; clamps to the line end.
    pub fn erase(&mut self, at: usize, count: usize) -> String {
        let a = byte_offset(&self.text, at.min(self.len));
        let b = byte_offset(&self.text, at.saturating_add(count).min(self.len));
        let removed: String = self.text.drain(a..b).collect();
        self.relayout();
        removed
    }

    /// Truncate at `at` and return the tail as a new line.
    pub fn split(&mut self, at: usize) -> VisualLine {
        let b = byte_offset(&self.text, at.min(self.len));
        let tail = self.text.split_off(b);
        self.relayout();
        VisualLine::new(&tail, self.tab_width)
    }

    pub fn extend(&mut self, other: &VisualLine) {
        self.text.push_str(&other.text);
        self.relayout();
    }

    /// Tokens covering the whole line split at every overlay boundary.
    /// Overlays need not be sorted; overlapping overlays are resolved in
    /// column order with earlier ones winning.
    pub fn highlight(&self, overlays: &[Highlight]) -> Vec<VisualToken> {
        let mut sorted: Vec<Highlight> = overlays.iter().filter(|h| h.len > 0).copied().collect();
        sorted.sort_by_key(|h| h.col);
        let mut out = Vec::with_capacity(self.tokens.len() + sorted.len() * 2);
        for token in &self.tokens {
            let (start, end) = (token.logical, token.logical_end());
            let mut p = start;
            for h in sorted.iter().filter(|h| h.col < end && h.end() > start) {
                let a = h.col.max(p);
                let b = h.end().min(end);
                if a > p {
                    out.push(token.slice(p - start, a - start));
                }
                if b > a {
                    out.push(token.slice(a - start, b - start).with_style(h.style));
                    p = b;
                }
            }
            if p < end {
                out.push(token.slice(p - start, end - start));
            }
        }
        out
    }

    /// Tokens with every character in default text style.
    pub fn plain_tokens(&self) -> Vec<VisualToken> {
        self.tokens
            .iter()
            .map(|t| t.clone().with_style(StyleId::TEXT))
            .collect()
    }
}
