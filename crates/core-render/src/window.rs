//! A rectangular pane surface with optional border chrome.
//!
//! Coordinates handed to [`Window::set_cursor`] and [`Window::write_text`]
//! are local to the inner area (inside the border when there is one). Output
//! never escapes the inner area: text is clipped on both sides, wide glyphs
//! cut by an edge become spaces.

use core_terminal::Screen;
use core_text::{Point, Rect, StyleId, VisualToken, width::str_width};
use tracing::trace;

/// Identity of a window registered with a window manager.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WindowId(pub u32);

/// A pane that can be placed by a window manager.
pub trait DockedWindow {
    fn window_id(&self) -> WindowId;
    /// `(0, 0)` for the primary window; `(w, 0)` docks to the side with width
    /// `w`; `(0, h)` docks to the bottom with height `h`.
    fn requested_size(&self) -> Point;
    fn set_rect(&mut self, rect: Rect);
}

const TOP_LEFT: &str = "┌";
const TOP_RIGHT: &str = "┐";
const BOTTOM_LEFT: &str = "└";
const BOTTOM_RIGHT: &str = "┘";
const HORIZONTAL: char = '─';
const VERTICAL: &str = "│";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Window {
    rect: Rect,
    requested: Point,
    border: bool,
    focused: bool,
    title: String,
    footnote: String,
    cursor: Point,
}

impl Window {
    pub fn new(requested: Point) -> Self {
        Self {
            rect: Rect::from_parts(Point::origin(), requested),
            requested,
            border: true,
            focused: false,
            title: String::new(),
            footnote: String::new(),
            cursor: Point::origin(),
        }
    }

    /// Window placed at a fixed rect; requests that rect's size.
    pub fn with_rect(rect: Rect) -> Self {
        Self {
            rect,
            ..Self::new(rect.size)
        }
    }

    pub fn rect(&self) -> Rect {
        self.rect
    }

    pub fn set_rect(&mut self, rect: Rect) {
        self.rect = rect;
    }

    pub fn requested_size(&self) -> Point {
        self.requested
    }

    pub fn set_requested_size(&mut self, requested: Point) {
        self.requested = requested;
    }

    pub fn has_border(&self) -> bool {
        self.border
    }

    pub fn set_border(&mut self, border: bool) {
        self.border = border;
    }

    pub fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
    }

    pub fn is_focused(&self) -> bool {
        self.focused
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    pub fn footnote(&self) -> &str {
        &self.footnote
    }

    pub fn set_footnote(&mut self, footnote: impl Into<String>) {
        self.footnote = footnote.into();
    }

    fn inset(&self) -> i32 {
        if self.border { 1 } else { 0 }
    }

    /// Inner width in cells, never negative.
    pub fn width(&self) -> i32 {
        (self.rect.width() - 2 * self.inset()).max(0)
    }

    /// Inner height in cells, never negative.
    pub fn height(&self) -> i32 {
        (self.rect.height() - 2 * self.inset()).max(0)
    }

    /// Inner area in screen coordinates.
    pub fn inner_rect(&self) -> Rect {
        Rect::from_parts(
            self.rect.pos + Point::new(self.inset(), self.inset()),
            Point::new(self.width(), self.height()),
        )
    }

    /// Per-axis visibility of a local point: `(x in range, y in range)`.
    pub fn contains_axes(&self, p: Point) -> (bool, bool) {
        (
            0 <= p.x && p.x < self.width(),
            0 <= p.y && p.y < self.height(),
        )
    }

    pub fn contains(&self, p: Point) -> bool {
        let (x, y) = self.contains_axes(p);
        x && y
    }

    pub fn cursor(&self) -> Point {
        self.cursor
    }

    /// Set the local cursor used by the next `write_text`.
    pub fn set_cursor(&mut self, p: Point) {
        self.cursor = p;
    }

    /// Local point converted to screen coordinates.
    pub fn to_screen(&self, p: Point) -> Point {
        self.rect.pos + Point::new(self.inset(), self.inset()) + p
    }

    /// Write `text` at the local cursor, clipped to the inner area, and
    /// advance the cursor by the text's width.
    pub fn write_text(&mut self, screen: &mut dyn Screen, text: &str, style: StyleId) {
        let start = self.cursor;
        self.cursor.x += str_width(text) as i32;
        if start.y < 0 || start.y >= self.height() {
            return;
        }
        let token = VisualToken::text_run(0, text, 0).moved(start.x);
        if let Some(visible) = token.clip(self.width()) {
            screen.move_to(self.to_screen(Point::new(visible.col, start.y)));
            screen.write(&visible.text, style);
        }
    }

    /// Write an already positioned token (local visual column) on row `y`.
    pub fn write_token(&mut self, screen: &mut dyn Screen, y: i32, token: &VisualToken) {
        self.cursor = Point::new(token.col, y);
        self.write_text(screen, &token.text, token.style);
    }

    /// Blank the inner area.
    pub fn clear(&mut self, screen: &mut dyn Screen, style: StyleId) {
        let blank = " ".repeat(self.width() as usize);
        for y in 0..self.height() {
            screen.move_to(self.to_screen(Point::new(0, y)));
            screen.write(&blank, style);
        }
    }

    /// Draw the border with the title on the top edge and the footnote on
    /// the bottom edge. No-op without a border or with a degenerate rect.
    pub fn render(&self, screen: &mut dyn Screen) {
        if !self.border {
            return;
        }
        if self.rect.width() < 2 || self.rect.height() < 2 {
            trace!(target: "render.window", rect = ?self.rect, "frame_skipped");
            return;
        }
        let style = if self.focused {
            StyleId::BORDER_FOCUS
        } else {
            StyleId::BORDER
        };
        let inner = (self.rect.width() - 2) as usize;
        let top = self.edge_line(&self.title, inner, false);
        let bottom = self.edge_line(&self.footnote, inner, true);
        let (x0, y0) = (self.rect.pos.x, self.rect.pos.y);
        let (x1, y1) = (self.rect.right() - 1, self.rect.bottom() - 1);

        screen.move_to(Point::new(x0, y0));
        screen.write(TOP_LEFT, style);
        write_edge(screen, &top, style);
        screen.write(TOP_RIGHT, style);
        for y in y0 + 1..y1 {
            screen.move_to(Point::new(x0, y));
            screen.write(VERTICAL, style);
            screen.move_to(Point::new(x1, y));
            screen.write(VERTICAL, style);
        }
        screen.move_to(Point::new(x0, y1));
        screen.write(BOTTOM_LEFT, style);
        write_edge(screen, &bottom, style);
        screen.write(BOTTOM_RIGHT, style);
    }

    /// Horizontal edge of `len` cells carrying `label`, left aligned or
    /// right aligned. The label is dropped when it does not fit.
    fn edge_line(&self, label: &str, len: usize, right: bool) -> Vec<(String, bool)> {
        let text = if label.is_empty() {
            String::new()
        } else {
            format!(" {label} ")
        };
        let w = str_width(&text);
        if w == 0 || w + 2 > len {
            return vec![(HORIZONTAL.to_string().repeat(len), false)];
        }
        let pad = len - w;
        let (before, after) = if right { (pad - 1, 1) } else { (1, pad - 1) };
        vec![
            (HORIZONTAL.to_string().repeat(before), false),
            (text, true),
            (HORIZONTAL.to_string().repeat(after), false),
        ]
    }
}

fn write_edge(screen: &mut dyn Screen, parts: &[(String, bool)], style: StyleId) {
    for (text, is_label) in parts {
        let s = if *is_label { StyleId::TITLE } else { style };
        screen.write(text, s);
    }
}
