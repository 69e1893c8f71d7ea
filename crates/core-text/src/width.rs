//! Display width and character classification.
//!
//! Every cell-width decision in the workspace flows through [`char_width`] or
//! [`tab_stop`] so the visual column tables, token clipping and the renderer
//! agree on how many terminal cells a character occupies.
//!
//! Width policy:
//! * Tabs advance to the next multiple of the tab width (see [`tab_stop`]).
//! * Control characters other than tab have no printable form; they are
//!   given width 1 so the cursor can still land on them.
//! * Everything else uses `unicode-width`: wide CJK glyphs take two cells,
//!   combining marks take none.

use unicode_width::UnicodeWidthChar;

/// Cell width of a single non-tab character.
pub fn char_width(c: char) -> usize {
    if c.is_control() {
        return 1;
    }
    c.width().unwrap_or(0)
}

/// Visual column reached after a tab that starts at `col`.
pub fn tab_stop(col: usize, tab_width: usize) -> usize {
    let tw = tab_width.max(1);
    (col / tw + 1) * tw
}

/// Total cell width of `text` when it starts at visual column `start`.
pub fn str_width_from(text: &str, start: usize, tab_width: usize) -> usize {
    let mut col = start;
    for c in text.chars() {
        if c == '\t' {
            col = tab_stop(col, tab_width);
        } else {
            col += char_width(c);
        }
    }
    col - start
}

/// Cell width of tab-free text.
pub fn str_width(text: &str) -> usize {
    text.chars().map(char_width).sum()
}

/// Word characters are alphanumeric or underscore.
pub fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Byte offset of the `idx`th char in `s`, clamped to `s.len()`.
pub fn byte_offset(s: &str, idx: usize) -> usize {
    s.char_indices().nth(idx).map(|(b, _)| b).unwrap_or(s.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tabs_align_to_next_stop() {
        assert_eq!(tab_stop(0, 4), 4);
        assert_eq!(tab_stop(3, 4), 4);
        assert_eq!(tab_stop(4, 4), 8);
        assert_eq!(tab_stop(5, 8), 8);
        // zero tab width is treated as one
        assert_eq!(tab_stop(2, 0), 3);
    }

    #[test]
    fn wide_and_zero_width_chars() {
        assert_eq!(char_width('a'), 1);
        assert_eq!(char_width('世'), 2);
        assert_eq!(char_width('\u{0301}'), 0);
        assert_eq!(str_width("a世b"), 4);
    }

    #[test]
    fn width_with_tabs_depends_on_start_column() {
        assert_eq!(str_width_from("\tx", 0, 4), 5);
        assert_eq!(str_width_from("\tx", 2, 4), 3);
    }

    #[test]
    fn word_classification() {
        assert!(is_word_char('a'));
        assert!(is_word_char('_'));
        assert!(is_word_char('7'));
        assert!(!is_word_char(' '));
        assert!(!is_word_char('.'));
    }

    #[test]
    fn byte_offsets_follow_char_boundaries() {
        assert_eq!(byte_offset("a世b", 0), 0);
        assert_eq!(byte_offset("a世b", 2), 4);
        assert_eq!(byte_offset("a世b", 9), 5);
    }
}
