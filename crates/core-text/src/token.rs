//! Styled runs of visual text.
//!
//! A token maps a contiguous logical range of a line onto a contiguous span
//! of screen cells. Text tokens map characters one to one; a tab token is an
//! atomic run of spaces standing for a single logical character and is never
//! split internally.

use crate::style::StyleId;
use crate::width::{byte_offset, char_width, str_width};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisualToken {
    /// Visual start column. Negative after translation by a scroll offset.
    pub col: i32,
    pub text: String,
    /// Logical (char) index of the first character covered.
    pub logical: usize,
    pub logical_len: usize,
    pub style: StyleId,
    pub tab: bool,
}

impl VisualToken {
    /// Plain text run; every char is one logical position.
    pub fn text_run(col: usize, text: &str, logical: usize) -> Self {
        Self {
            col: col as i32,
            text: text.to_string(),
            logical,
            logical_len: text.chars().count(),
            style: StyleId::TEXT,
            tab: false,
        }
    }

    /// Tab expanded to `width` spaces.
    pub fn tab(col: usize, width: usize, logical: usize) -> Self {
        Self {
            col: col as i32,
            text: " ".repeat(width),
            logical,
            logical_len: 1,
            style: StyleId::TEXT,
            tab: true,
        }
    }

    /// Blank padding run with no logical extent.
    pub fn blank(col: i32, width: usize, style: StyleId) -> Self {
        Self {
            col,
            text: " ".repeat(width),
            logical: 0,
            logical_len: 0,
            style,
            tab: false,
        }
    }

    pub fn width(&self) -> i32 {
        str_width(&self.text) as i32
    }

    pub fn end(&self) -> i32 {
        self.col + self.width()
    }

    pub fn logical_end(&self) -> usize {
        self.logical + self.logical_len
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn with_style(mut self, style: StyleId) -> Self {
        self.style = style;
        self
    }

    /// Translate horizontally (scrolling by `offset` columns passes `-offset`).
    pub fn moved(mut self, delta: i32) -> Self {
        self.col += delta;
        self
    }

    /// Split at logical offset `n` relative to the token start. A tab token
    /// goes entirely to the left half unless `n == 0`.
    pub fn split_at(&self, n: usize) -> (VisualToken, VisualToken) {
        let n = n.min(self.logical_len);
        if self.tab {
            let empty = |col: i32, logical: usize| VisualToken {
                col,
                text: String::new(),
                logical,
                logical_len: 0,
                style: self.style,
                tab: false,
            };
            return if n == 0 {
                (empty(self.col, self.logical), self.clone())
            } else {
                (self.clone(), empty(self.end(), self.logical_end()))
            };
        }
        let b = byte_offset(&self.text, n);
        let (l, r) = self.text.split_at(b);
        let left = VisualToken {
            col: self.col,
            text: l.to_string(),
            logical: self.logical,
            logical_len: n,
            style: self.style,
            tab: false,
        };
        let right = VisualToken {
            col: self.col + str_width(l) as i32,
            text: r.to_string(),
            logical: self.logical + n,
            logical_len: self.logical_len - n,
            style: self.style,
            tab: false,
        };
        (left, right)
    }

    /// Sub-token covering relative logical offsets `[from, to)`.
    pub fn slice(&self, from: usize, to: usize) -> VisualToken {
        let (_, right) = self.split_at(from);
        let (mid, _) = right.split_at(to.saturating_sub(from));
        mid
    }

    /// Restrict to the cells `[0, width)`. A wide glyph straddling either
    /// edge is replaced by spaces for its visible cells. `None` when nothing
    /// remains visible.
    pub fn clip(&self, width: i32) -> Option<VisualToken> {
        if self.col >= width || self.end() <= 0 || width <= 0 {
            return None;
        }
        if self.col >= 0 && self.end() <= width {
            return Some(self.clone());
        }
        let mut text = String::new();
        let mut first: Option<(i32, usize)> = None;
        let mut kept = 0usize;
        let mut cell = self.col;
        for (i, c) in self.text.chars().enumerate() {
            let w = char_width(c) as i32;
            let (start, stop) = (cell, cell + w);
            cell = stop;
            let visible_from = start.max(0);
            let visible_to = stop.min(width);
            if w == 0 {
                if (0..width).contains(&start) && first.is_some() {
                    text.push(c);
                }
                continue;
            }
            if visible_to <= visible_from {
                continue;
            }
            if first.is_none() {
                first = Some((visible_from, i));
            }
            if start >= 0 && stop <= width {
                text.push(c);
            } else {
                text.extend(std::iter::repeat_n(' ', (visible_to - visible_from) as usize));
            }
            kept += 1;
        }
        let (col, offset) = first?;
        Some(VisualToken {
            col,
            text,
            logical: if self.tab {
                self.logical
            } else {
                self.logical + offset
            },
            logical_len: if self.tab { 1 } else { kept },
            style: self.style,
            tab: self.tab,
        })
    }
}
