//! Output pane: a read-only log docked at the bottom.
//!
//! Build tools and other collaborators push text through
//! `ExternalMessage::Output`. `NextError` walks the log for compiler style
//! `path:row:col: error` lines and asks the application to open each one in
//! turn, starting over after the last.

use std::path::{Path, PathBuf};

use core_actions::{Action, ActionContext, ActionHandler, Handled};
use core_events::ExternalMessage;
use core_model::View;
use core_render::{DockedWindow, WindowId};
use core_terminal::Screen;
use core_text::{Point, Rect};
use regex::Regex;
use tracing::{debug, trace, warn};

use crate::{DockedPane, GlobalActionTarget, GlobalResponse, Location, Renderable};

pub const OUTPUT_HEIGHT: i32 = 10;
pub const ERROR_PATTERN: &str = r"^([/.\w]+):(\d+):(\d+): error";

#[derive(Debug)]
pub struct OutputPane {
    view: View,
    error_index: usize,
    pattern: Option<Regex>,
    source_root: Option<PathBuf>,
}

impl OutputPane {
    pub fn new(id: WindowId, tab_width: usize) -> Self {
        let mut view = View::new(id, Point::new(0, OUTPUT_HEIGHT), tab_width);
        view.set_read_only(true);
        view.set_label("Output");
        let pattern = match Regex::new(ERROR_PATTERN) {
            Ok(re) => Some(re),
            Err(e) => {
                warn!(target: "plugin.output", error = %e, "error_pattern_invalid");
                None
            }
        };
        Self {
            view,
            error_index: 0,
            pattern,
            source_root: None,
        }
    }

    /// Recognise error lines with `pattern` instead. The first three groups
    /// capture path, row and column.
    pub fn with_error_pattern(mut self, pattern: &str) -> Result<Self, regex::Error> {
        self.pattern = Some(Regex::new(pattern)?);
        Ok(self)
    }

    /// Only open errors under `root`; relative paths are resolved against it.
    pub fn with_source_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.source_root = Some(root.into());
        self
    }

    pub fn view(&self) -> &View {
        &self.view
    }

    pub fn clear(&mut self) {
        self.view.clear_document();
        self.error_index = 0;
    }

    pub fn add_text(&mut self, text: &str) {
        self.view.append(text);
    }

    /// Next error line after the previous one. Returns `None` when the log
    /// is exhausted (the scan restarts on the following call) or when the
    /// matched path lies outside the source root.
    pub fn next_error(&mut self) -> Option<Location> {
        let pattern = self.pattern.as_ref()?;
        let doc = self.view.doc();
        while self.error_index < doc.row_count() {
            let row = self.error_index;
            self.error_index += 1;
            let Some(line) = doc.row(row) else {
                continue;
            };
            let Some(caps) = pattern.captures(line.logical_text()) else {
                continue;
            };
            let (Some(path), Ok(line_no), Ok(col_no)) = (
                caps.get(1).map(|m| m.as_str()),
                caps.get(2).map_or("", |m| m.as_str()).parse::<usize>(),
                caps.get(3).map_or("", |m| m.as_str()).parse::<usize>(),
            ) else {
                return None;
            };
            let path = self.resolve(Path::new(path));
            self.view.set_cursor(Point::at(0, row));
            let Some(path) = path else {
                trace!(target: "plugin.output", row, "error_outside_source_root");
                return None;
            };
            debug!(target: "plugin.output", path = %path.display(), line = line_no, "next_error");
            return Some(Location {
                path,
                row: line_no.saturating_sub(1),
                col: col_no.saturating_sub(1),
            });
        }
        self.error_index = 0;
        None
    }

    fn resolve(&self, path: &Path) -> Option<PathBuf> {
        match &self.source_root {
            None => Some(path.to_path_buf()),
            Some(root) if path.is_relative() => Some(root.join(path)),
            Some(root) => path.starts_with(root).then(|| path.to_path_buf()),
        }
    }
}

impl DockedWindow for OutputPane {
    fn window_id(&self) -> WindowId {
        self.view.window_id()
    }

    fn requested_size(&self) -> Point {
        self.view.requested_size()
    }

    fn set_rect(&mut self, rect: Rect) {
        self.view.set_rect(rect);
    }
}

impl Renderable for OutputPane {
    fn render(&mut self, screen: &mut dyn Screen) {
        self.view.render(screen);
    }

    fn place_cursor(&self, screen: &mut dyn Screen) {
        self.view.place_cursor(screen);
    }
}

impl ActionHandler for OutputPane {
    fn handle_action(&mut self, action: &Action, ctx: &mut ActionContext<'_>) -> Handled {
        match action {
            // tab and file commands target the editor views
            Action::FileNew
            | Action::FileOpen
            | Action::FileSave
            | Action::FileSaveAs
            | Action::CloseTab
            | Action::NextTab
            | Action::PrevTab
            | Action::Find
            | Action::FindNext => Handled::No,
            _ => self.view.handle_action(action, ctx),
        }
    }
}

impl GlobalActionTarget for OutputPane {
    fn global_action(&mut self, action: &Action) -> GlobalResponse {
        if *action != Action::NextError {
            return GlobalResponse::Ignored;
        }
        match self.next_error() {
            Some(location) => GlobalResponse::Open(location),
            None => GlobalResponse::Handled,
        }
    }
}

impl DockedPane for OutputPane {
    fn name(&self) -> &'static str {
        "output"
    }

    fn on_message(&mut self, msg: &ExternalMessage) -> bool {
        match msg {
            ExternalMessage::Output(text) => {
                self.add_text(text);
                true
            }
            _ => false,
        }
    }

    fn set_focused(&mut self, focused: bool) {
        self.view.set_focused(focused);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_terminal::MemoryScreen;
    use pretty_assertions::assert_eq;

    const LOG: &str = "\
building...
src/main.rs:12:5: error: expected `;`
src/main.rs:14:1: warning: unused
/usr/include/stdio.h:3:1: error: bad
lib/util.rs:1:9: error: unresolved import
done";

    fn pane() -> OutputPane {
        let mut p = OutputPane::new(WindowId(7), 4);
        p.set_rect(Rect::new(0, 10, 40, 10));
        p
    }

    fn loc(path: &str, row: usize, col: usize) -> Option<Location> {
        Some(Location {
            path: PathBuf::from(path),
            row,
            col,
        })
    }

    #[test]
    fn docks_at_the_bottom() {
        assert_eq!(pane().requested_size(), Point::new(0, OUTPUT_HEIGHT));
        assert!(pane().view().is_read_only());
    }

    #[test]
    fn output_messages_append_lines() {
        let mut p = pane();
        assert!(p.on_message(&ExternalMessage::Output("one\ntwo".into())));
        assert!(p.on_message(&ExternalMessage::Output("three".into())));
        let rows: Vec<String> = p
            .view()
            .doc()
            .rows()
            .map(|l| l.logical_text().to_string())
            .collect();
        assert_eq!(rows, vec!["one", "two", "three", ""]);
        assert!(!p.on_message(&ExternalMessage::ClearHighlights {
            path: PathBuf::from("x")
        }));
    }

    #[test]
    fn next_error_walks_matches_and_wraps() {
        let mut p = pane();
        p.add_text(LOG);
        assert_eq!(p.next_error(), loc("src/main.rs", 11, 4));
        assert_eq!(p.view().cursor(), Point::new(0, 1));
        assert_eq!(p.next_error(), loc("/usr/include/stdio.h", 2, 0));
        assert_eq!(p.next_error(), loc("lib/util.rs", 0, 8));
        assert_eq!(p.next_error(), None);
        assert_eq!(p.next_error(), loc("src/main.rs", 11, 4));
    }

    #[test]
    fn source_root_filters_and_resolves() {
        let mut p = pane().with_source_root("/work");
        p.add_text(LOG);
        assert_eq!(p.next_error(), loc("/work/src/main.rs", 11, 4));
        assert_eq!(p.next_error(), None);
        assert_eq!(p.next_error(), loc("/work/lib/util.rs", 0, 8));
    }

    #[test]
    fn global_next_error_requests_open() {
        let mut p = pane();
        p.add_text("a.rs:2:3: error: x");
        assert_eq!(p.global_action(&Action::Undo), GlobalResponse::Ignored);
        assert_eq!(
            p.global_action(&Action::NextError),
            GlobalResponse::Open(Location {
                path: PathBuf::from("a.rs"),
                row: 1,
                col: 2
            })
        );
        assert_eq!(p.global_action(&Action::NextError), GlobalResponse::Handled);
    }

    #[test]
    fn renders_with_its_label() {
        let mut p = pane();
        p.add_text("hello");
        let mut screen = MemoryScreen::new(40, 20);
        p.render(&mut screen);
        assert!(screen.row_text(10).contains("Output"));
        assert!(screen.row_text(11).contains("hello"));
    }

    #[test]
    fn custom_pattern() {
        let mut p = pane().with_error_pattern(r"^E (\S+) (\d+) (\d+)").unwrap();
        p.add_text("E x.c 4 2");
        assert_eq!(p.next_error(), loc("x.c", 3, 1));
        assert!(pane().with_error_pattern("(").is_err());
    }
}
