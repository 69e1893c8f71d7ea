//! Search and replace over the active document.
//!
//! Matching runs per row on the logical text. Columns reported to the rest
//! of the view are char indices; the regex engine works in bytes, so every
//! match is converted at the boundary.

use core_text::{Cursor, Range, width::byte_offset};
use regex::{Regex, RegexBuilder};
use thiserror::Error;
use tracing::{debug, trace, warn};

use super::{Tab, View};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FindAction {
    #[default]
    Find,
    Replace,
    ReplaceAll,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FindOptions {
    pub find: String,
    pub replace: String,
    pub action: FindAction,
    pub case_sensitive: bool,
    pub whole_word: bool,
    pub regex: bool,
}

impl FindOptions {
    pub fn find(pattern: impl Into<String>) -> Self {
        Self {
            find: pattern.into(),
            case_sensitive: true,
            ..Self::default()
        }
    }

    pub fn replace(pattern: impl Into<String>, with: impl Into<String>, all: bool) -> Self {
        Self {
            replace: with.into(),
            action: if all {
                FindAction::ReplaceAll
            } else {
                FindAction::Replace
            },
            ..Self::find(pattern)
        }
    }
}

#[derive(Debug, Error)]
pub enum FindError {
    #[error("invalid search pattern `{pattern}`: {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },
}

/// Compiled search: the regex plus the whole-word filter.
struct Matcher<'a> {
    re: Regex,
    opts: &'a FindOptions,
}

impl<'a> Matcher<'a> {
    fn new(opts: &'a FindOptions) -> Result<Self, FindError> {
        let pattern = if opts.regex {
            opts.find.clone()
        } else {
            regex::escape(&opts.find)
        };
        let re = RegexBuilder::new(&pattern)
            .case_insensitive(!opts.case_sensitive)
            .build()
            .map_err(|source| FindError::InvalidPattern {
                pattern: opts.find.clone(),
                source,
            })?;
        Ok(Self { re, opts })
    }

    /// First match in `text` starting at char column `from`, as a char
    /// column range. Empty matches are skipped.
    fn find_in(&self, text: &str, from: usize) -> Option<(usize, usize)> {
        let mut pos = byte_offset(text, from);
        while pos <= text.len() {
            let m = self.re.find_at(text, pos)?;
            let whole = !self.opts.whole_word || is_whole_word(text, m.start(), m.end());
            if m.start() < m.end() && whole {
                let start = text[..m.start()].chars().count();
                let end = start + text[m.start()..m.end()].chars().count();
                return Some((start, end));
            }
            pos = m.start() + text[m.start()..].chars().next().map_or(1, char::len_utf8);
        }
        None
    }

    /// Text replacing the match that starts at char column `start` of `text`.
    /// Regex searches expand `$n` group references.
    fn replacement(&self, text: &str, start: usize) -> String {
        if !self.opts.regex {
            return self.opts.replace.clone();
        }
        let mut out = String::new();
        if let Some(caps) = self.re.captures_at(text, byte_offset(text, start)) {
            caps.expand(&self.opts.replace, &mut out);
        }
        out
    }
}

fn is_whole_word(text: &str, start: usize, end: usize) -> bool {
    let before = text[..start].chars().next_back();
    let after = text[end..].chars().next();
    !before.is_some_and(char::is_alphanumeric) && !after.is_some_and(char::is_alphanumeric)
}

impl View {
    /// Run `opts.action`. Returns the number of matches found or replaced.
    pub fn find_replace(&mut self, opts: &FindOptions) -> Result<usize, FindError> {
        match opts.action {
            FindAction::Find => self.find_next(opts).map(usize::from),
            FindAction::Replace => self.replace_next(opts).map(usize::from),
            FindAction::ReplaceAll => self.replace_all(opts),
        }
    }

    /// Select the next match after the cursor, wrapping once to the top.
    pub fn find_next(&mut self, opts: &FindOptions) -> Result<bool, FindError> {
        let matcher = Matcher::new(opts)?;
        let found = self.locate(&matcher, self.cursor());
        match found {
            Some((row, start, end)) => {
                self.select(Range::new(Cursor::at(start, row), Cursor::at(end, row)));
                debug!(target: "model.find", pattern = %opts.find, row, start, "match_found");
                Ok(true)
            }
            None => {
                debug!(target: "model.find", pattern = %opts.find, "no_match");
                Ok(false)
            }
        }
    }

    /// Replace one match: the selected one if the selection is a match,
    /// otherwise the next one after the cursor.
    pub fn replace_next(&mut self, opts: &FindOptions) -> Result<bool, FindError> {
        if self.read_only {
            return Ok(false);
        }
        let matcher = Matcher::new(opts)?;
        let target = self
            .selected_match(&matcher)
            .or_else(|| self.locate(&matcher, self.cursor()));
        let Some((row, start, end)) = target else {
            return Ok(false);
        };
        let Tab { doc, state } = &mut self.tabs[self.active];
        let text = doc.row(row).map(|l| l.logical_text().to_string()).unwrap_or_default();
        let with = matcher.replacement(&text, start);
        doc.start_compound(state);
        if let Err(e) = doc.delete_block(state, row, start, Some(end)) {
            warn!(target: "model.find", error = %e, "block_delete_rejected");
        }
        let after = doc.insert_text(state, Cursor::at(start, row), &with);
        doc.stop_compound();
        state.cursor = after;
        state.selection = None;
        trace!(target: "model.find", row, start, "replaced");
        self.sync_sticky();
        self.ensure_visible();
        Ok(true)
    }

    /// Replace every match in one pass over the document as a single undo
    /// step. Returns the number of replacements.
    pub fn replace_all(&mut self, opts: &FindOptions) -> Result<usize, FindError> {
        if self.read_only {
            return Ok(0);
        }
        let matcher = Matcher::new(opts)?;
        let Tab { doc, state } = &mut self.tabs[self.active];
        let mut count = 0;
        doc.start_compound(state);
        for row in 0..doc.row_count() {
            let Some(text) = doc.row(row).map(|l| l.logical_text().to_string()) else {
                continue;
            };
            let mut out = String::new();
            let mut copied = 0;
            let before = count;
            while let Some((start, end)) = matcher.find_in(&text, copied) {
                out.extend(text.chars().skip(copied).take(start - copied));
                out.push_str(&matcher.replacement(&text, start));
                copied = end;
                count += 1;
            }
            if count == before {
                continue;
            }
            out.extend(text.chars().skip(copied));
            let old_len = text.chars().count();
            doc.replace_text(state, Cursor::at(0, row), &out, old_len);
        }
        doc.stop_compound();
        state.cursor = doc.clamp(state.cursor);
        state.selection = None;
        debug!(target: "model.find", pattern = %opts.find, count, "replaced_all");
        self.sync_sticky();
        self.ensure_visible();
        Ok(count)
    }

    /// Search forward from `from`, wrapping once back to the start row.
    fn locate(&self, matcher: &Matcher<'_>, from: Cursor) -> Option<(usize, usize, usize)> {
        let doc = self.doc();
        let rows = doc.row_count();
        let origin = from.row().min(rows.saturating_sub(1));
        let text_of = |row: usize| doc.row(row).map(|l| l.logical_text()).unwrap_or("");
        if let Some((s, e)) = matcher.find_in(text_of(origin), from.col()) {
            return Some((origin, s, e));
        }
        for row in (origin + 1..rows).chain(0..origin) {
            if let Some((s, e)) = matcher.find_in(text_of(row), 0) {
                return Some((row, s, e));
            }
        }
        matcher
            .find_in(text_of(origin), 0)
            .filter(|(s, _)| *s < from.col())
            .map(|(s, e)| (origin, s, e))
    }

    /// The selection, when it covers exactly one match on a single row.
    fn selected_match(&self, matcher: &Matcher<'_>) -> Option<(usize, usize, usize)> {
        let (start, stop) = self.selection()?.ordered();
        if start.row() != stop.row() {
            return None;
        }
        let text = self.doc().row(start.row())?.logical_text();
        matcher
            .find_in(text, start.col())
            .filter(|&(s, e)| s == start.col() && e == stop.col())
            .map(|(s, e)| (start.row(), s, e))
    }
}
