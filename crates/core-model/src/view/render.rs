use core_terminal::Screen;
use core_text::{Highlight, Point, StyleId, VisualToken};

use super::View;

impl View {
    /// Draw the window chrome and every visible row of the active tab.
    pub fn render(&mut self, screen: &mut dyn Screen) {
        let title = self.title();
        let cursor = self.cursor();
        self.window.set_title(title);
        self.window
            .set_footnote(format!("{}:{}", cursor.row() + 1, cursor.col() + 1));
        self.window.render(screen);

        let (w, h) = (self.window.width(), self.window.height());
        let offset = self.offset();
        for y in 0..h {
            let row = (offset.y + y) as usize;
            let mut covered = 0;
            for token in self.row_tokens(row) {
                let token = token.moved(-offset.x);
                if token.end() <= 0 || token.col >= w {
                    continue;
                }
                covered = covered.max(token.end().min(w));
                self.window.write_token(screen, y, &token);
            }
            if covered < w {
                let blank = VisualToken::blank(covered, (w - covered) as usize, StyleId::BACKGROUND);
                self.window.write_token(screen, y, &blank);
            }
        }
        let local = self.cursor_local();
        self.window.set_cursor(local);
    }

    /// Move the terminal cursor onto this view's cursor when it is visible.
    pub fn place_cursor(&self, screen: &mut dyn Screen) {
        let local = self.cursor_local();
        if self.window.contains(local) {
            screen.move_to(self.window.to_screen(local));
            screen.show_cursor(true);
        } else {
            screen.show_cursor(false);
        }
    }

    /// Window title: the label if one is set, else the document title, a
    /// modified marker and the tab position when more than one tab is open.
    pub fn title(&self) -> String {
        if let Some(label) = &self.label {
            return label.clone();
        }
        let doc = self.doc();
        let mut title = doc.title();
        if doc.is_modified() {
            title.push_str(" *");
        }
        if self.tabs.len() > 1 {
            title.push_str(&format!(" [{}/{}]", self.active + 1, self.tabs.len()));
        }
        title
    }

    /// Cursor in window-local cells.
    fn cursor_local(&self) -> Point {
        let cursor = self.cursor();
        let vx = self
            .doc()
            .row(cursor.row())
            .map(|l| l.visual_index(cursor.col()))
            .unwrap_or(0) as i32;
        Point::new(vx, cursor.y) - self.offset()
    }

    /// Tokens of `row` with the selection overlay when the selection touches
    /// the row, else the semantic overlay. Empty past the last row.
    fn row_tokens(&self, row: usize) -> Vec<VisualToken> {
        let doc = self.doc();
        let Some(line) = doc.row(row) else {
            return Vec::new();
        };
        if let Some(sel) = self.selection() {
            let (start, stop) = sel.ordered();
            if (start.row()..=stop.row()).contains(&row) {
                let from = if row == start.row() { start.col() } else { 0 };
                let to = if row == stop.row() {
                    stop.col()
                } else {
                    line.logical_len()
                };
                let overlay = Highlight::new(from, to.saturating_sub(from), StyleId::SELECTION);
                return line.highlight(&[overlay]);
            }
        }
        line.highlight(doc.semantic_highlights(row))
    }
}
