//! The editor application: panes, layout and the event loop.
//!
//! The main view is the primary docked window; the output pane docks below
//! it and the bottom terminal row is the status line. Each key is
//! translated to an action and offered to the focused pane, then to the
//! application shell, then to the plugins as a global action.

use std::io;
use std::path::Path;
use std::time::Duration;

use anyhow::Result;
use core_actions::{
    Action, ActionContext, ActionHandler, Handled, KeyTranslator, MacroRecorder, dispatch,
};
use core_config::EditorContext;
use core_events::{ExternalMessage, ExternalQueue, ExternalSender, KeyEvent};
use core_model::{FindOptions, MemoryClipboard, View, ViewEvent, WindowManager};
use core_plugin::{DockedPane, GlobalActionTarget, GlobalResponse, Location, OutputPane, Renderable};
use core_render::{DockedWindow, WindowId};
use core_state::{Document, DocumentError};
use core_terminal::Screen;
use core_text::width::str_width;
use core_text::{Point, Rect, StyleId};
use tracing::{debug, info, trace, warn};

use crate::prompt::LinePrompt;

const POLL: Duration = Duration::from_millis(100);
const MAIN_ID: WindowId = WindowId(1);
const OUTPUT_ID: WindowId = WindowId(2);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Focus {
    Main,
    Output,
}

/// Application-level actions, last in the focus chain.
#[derive(Debug, Default)]
struct Shell {
    macros: MacroRecorder,
    exit_requested: bool,
    next_view: bool,
    toggle_output: bool,
}

impl ActionHandler for Shell {
    fn handle_action(&mut self, action: &Action, _ctx: &mut ActionContext<'_>) -> Handled {
        match action {
            Action::FileExit => self.exit_requested = true,
            Action::NextView => self.next_view = true,
            Action::ToggleOutput => self.toggle_output = true,
            Action::MacroRecord => self.macros.toggle(),
            _ => return Handled::No,
        }
        Handled::Yes
    }
}

pub struct App<S: Screen> {
    screen: S,
    ctx: EditorContext,
    wm: WindowManager,
    main: View,
    output: OutputPane,
    focus: Focus,
    keys: KeyTranslator,
    shell: Shell,
    clipboard: MemoryClipboard,
    find: FindOptions,
    status: Option<String>,
    external: ExternalQueue,
    sender: ExternalSender,
    size: Point,
    quit: bool,
}

impl<S: Screen> App<S> {
    pub fn new(screen: S, ctx: EditorContext) -> Result<Self> {
        let (sender, external) = ExternalQueue::channel();
        let mut main = View::new(MAIN_ID, Point::origin(), ctx.tab_width);
        main.set_focused(true);
        let output = OutputPane::new(OUTPUT_ID, ctx.tab_width);
        let mut wm = WindowManager::new(Rect::default());
        wm.add_window(main.window_id(), main.requested_size())?;
        wm.add_window(output.window_id(), output.requested_size())?;
        let keys = KeyTranslator::new(ctx.keymap.clone());
        let mut app = Self {
            screen,
            ctx,
            wm,
            main,
            output,
            focus: Focus::Main,
            keys,
            shell: Shell::default(),
            clipboard: MemoryClipboard::new(),
            find: FindOptions::default(),
            status: None,
            external,
            sender,
            size: Point::new(-1, -1),
            quit: false,
        };
        app.sync_size()?;
        Ok(app)
    }

    /// Handle for collaborators that feed highlights or output text.
    pub fn sender(&self) -> ExternalSender {
        self.sender.clone()
    }

    pub fn screen(&self) -> &S {
        &self.screen
    }

    pub fn main_view(&self) -> &View {
        &self.main
    }

    pub fn output(&self) -> &OutputPane {
        &self.output
    }

    pub fn context(&self) -> &EditorContext {
        &self.ctx
    }

    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    pub fn is_output_visible(&self) -> bool {
        !self.wm.is_hidden(OUTPUT_ID)
    }

    pub fn is_running(&self) -> bool {
        !self.quit
    }

    /// Open `path` in the main view. A missing file starts a new document
    /// that will be written there on save.
    pub fn open_file(&mut self, path: &Path) {
        match Document::open(path, self.ctx.tab_width) {
            Ok(doc) => self.main.open_document(doc),
            Err(DocumentError::Load { source, .. }) if source.kind() == io::ErrorKind::NotFound => {
                let mut doc = Document::new(self.ctx.tab_width);
                doc.set_path(Some(path.to_path_buf()));
                self.main.open_document(doc);
                self.status = Some(format!("new file {}", path.display()));
            }
            Err(e) => {
                warn!(target: "runtime", path = %path.display(), error = %e, "open_failed");
                self.status = Some(e.to_string());
            }
        }
        self.report_view_events();
    }

    pub fn run(&mut self) -> Result<()> {
        info!(target: "runtime", "event_loop_started");
        while !self.quit {
            self.tick()?;
        }
        info!(target: "runtime", "event_loop_finished");
        Ok(())
    }

    /// One loop iteration: refit, draw, wait for one key, apply external
    /// results.
    pub fn tick(&mut self) -> Result<()> {
        self.sync_size()?;
        self.render()?;
        if let Some(key) = self.screen.read_key(POLL)? {
            self.handle_key(&key);
        }
        self.drain_external();
        Ok(())
    }

    pub fn handle_key(&mut self, key: &KeyEvent) {
        let Some(action) = self.keys.translate(key) else {
            trace!(target: "runtime", %key, "key_unbound");
            return;
        };
        self.status = None;
        if action == Action::MacroPlay {
            let actions = self.shell.macros.playback();
            debug!(target: "runtime", count = actions.len(), "macro_playback");
            for a in &actions {
                self.run_action(a);
            }
            return;
        }
        self.shell.macros.record(&action);
        self.run_action(&action);
    }

    fn run_action(&mut self, action: &Action) {
        let mut prompt = LinePrompt::new(&mut self.screen);
        let mut ctx = ActionContext::new(
            &mut self.clipboard,
            &mut prompt,
            &mut self.find,
            self.ctx.tab_width,
        );
        let focused: &mut dyn ActionHandler = match self.focus {
            Focus::Main => &mut self.main,
            Focus::Output => &mut self.output,
        };
        let handled = dispatch(&mut [focused, &mut self.shell], action, &mut ctx);
        if let Some(status) = ctx.status.take() {
            self.status = Some(status);
        }
        if !handled.is_yes() {
            match self.output.global_action(action) {
                GlobalResponse::Open(location) => self.open_location(&location),
                GlobalResponse::Handled => {}
                GlobalResponse::Ignored => {
                    trace!(target: "runtime", %action, "action_unhandled");
                }
            }
        }
        if std::mem::take(&mut self.shell.toggle_output) {
            self.toggle_output();
        }
        if std::mem::take(&mut self.shell.next_view) {
            self.cycle_focus();
        }
        if std::mem::take(&mut self.shell.exit_requested) {
            self.request_exit();
        }
        self.report_view_events();
    }

    fn open_location(&mut self, location: &Location) {
        self.open_file(&location.path);
        if self.main.doc().path() == Some(location.path.as_path()) {
            self.main.set_cursor(Point::at(location.col, location.row));
            self.set_focus(Focus::Main);
        }
    }

    fn request_exit(&mut self) {
        let mut prompt = LinePrompt::new(&mut self.screen);
        match self.main.close_all(&mut prompt) {
            Ok(true) => {
                info!(target: "runtime", "exit_confirmed");
                self.quit = true;
            }
            Ok(false) => {}
            Err(e) => {
                warn!(target: "runtime", error = %e, "exit_save_failed");
                self.status = Some(e.to_string());
            }
        }
    }

    /// Hide or show the output pane. Hiding it hands its rows to the main
    /// view and moves focus there.
    fn toggle_output(&mut self) {
        let result = if self.wm.is_hidden(OUTPUT_ID) {
            self.wm.show_window(OUTPUT_ID)
        } else {
            self.wm.hide_window(OUTPUT_ID)
        };
        if let Err(e) = result {
            warn!(target: "runtime", error = %e, "output_toggle_failed");
            return;
        }
        let hidden = self.wm.is_hidden(OUTPUT_ID);
        if hidden && self.focus == Focus::Output {
            self.set_focus(Focus::Main);
        }
        self.wm.apply(&mut [&mut self.main, &mut self.output]);
        debug!(target: "runtime", hidden, "output_toggled");
    }

    fn cycle_focus(&mut self) {
        let next = match self.focus {
            Focus::Main if !self.wm.is_hidden(OUTPUT_ID) => Focus::Output,
            _ => Focus::Main,
        };
        self.set_focus(next);
    }

    fn set_focus(&mut self, focus: Focus) {
        self.focus = focus;
        self.main.set_focused(focus == Focus::Main);
        DockedPane::set_focused(&mut self.output, focus == Focus::Output);
    }

    fn drain_external(&mut self) {
        for msg in self.external.drain() {
            match msg {
                ExternalMessage::SemanticHighlights { path, row, ranges } => {
                    self.main.apply_semantic_highlights(&path, row, ranges);
                }
                ExternalMessage::ClearHighlights { path } => {
                    self.main.clear_semantic_highlights(&path);
                }
                other => {
                    if !self.output.on_message(&other) {
                        trace!(target: "runtime", ?other, "external_message_dropped");
                    }
                }
            }
        }
    }

    fn report_view_events(&mut self) {
        for event in self.main.take_events() {
            match event {
                ViewEvent::DocumentFocused(path) => {
                    debug!(target: "runtime", path = ?path, "document_focused");
                }
                ViewEvent::DocumentClosed(path) => {
                    debug!(target: "runtime", path = ?path, "document_closed");
                }
            }
        }
    }

    /// Re-tile when the terminal size changed. The last row is kept for the
    /// status line.
    fn sync_size(&mut self) -> Result<()> {
        let size = self.screen.size();
        if size == self.size {
            return Ok(());
        }
        self.size = size;
        self.ctx.terminal = size;
        self.wm
            .set_bounds(Rect::new(0, 0, size.x, (size.y - 1).max(0)))?;
        self.wm.apply(&mut [&mut self.main, &mut self.output]);
        debug!(target: "runtime", width = size.x, height = size.y, "layout_applied");
        Ok(())
    }

    pub fn render(&mut self) -> Result<()> {
        self.main.render(&mut self.screen);
        if !self.wm.is_hidden(OUTPUT_ID) {
            Renderable::render(&mut self.output, &mut self.screen);
        }
        self.draw_status();
        match self.focus {
            Focus::Main => self.main.place_cursor(&mut self.screen),
            Focus::Output => Renderable::place_cursor(&self.output, &mut self.screen),
        }
        self.screen.flush()
    }

    fn draw_status(&mut self) {
        let size = self.screen.size();
        if size.y < 1 {
            return;
        }
        let mut right = String::new();
        if self.shell.macros.is_recording() {
            right.push_str("REC  ");
        }
        right.push_str(if self.main.is_overwrite() { "OVR" } else { "INS" });
        right.push(' ');
        let left = self.status.clone().unwrap_or_default();
        let width = size.x.max(0) as usize;
        let used = str_width(&left) + str_width(&right);
        let style = if self.status.is_some() {
            StyleId::ERROR
        } else {
            StyleId::FOCUS
        };
        self.screen.move_to(Point::new(0, size.y - 1));
        self.screen.write(&left, style);
        if used <= width {
            self.screen.write(&" ".repeat(width - used), StyleId::FOCUS);
            self.screen.write(&right, StyleId::FOCUS);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_terminal::MemoryScreen;
    use pretty_assertions::assert_eq;

    fn app(keys: &[&str]) -> App<MemoryScreen> {
        let mut screen = MemoryScreen::new(60, 24);
        for k in keys {
            screen.push_key(k.parse().unwrap());
        }
        App::new(screen, EditorContext::default()).unwrap()
    }

    fn pump(app: &mut App<MemoryScreen>, n: usize) {
        for _ in 0..n {
            app.tick().unwrap();
        }
    }

    fn lines(view: &View) -> Vec<String> {
        view.doc().rows().map(|l| l.logical_text().to_string()).collect()
    }

    #[test]
    fn layout_leaves_a_status_row() {
        let app = app(&[]);
        assert_eq!(app.wm.rect(MAIN_ID), Some(Rect::new(0, 0, 60, 13)));
        assert_eq!(app.wm.rect(OUTPUT_ID), Some(Rect::new(0, 13, 60, 10)));
        assert_eq!(app.context().terminal, Point::new(60, 24));
    }

    #[test]
    fn keys_edit_the_main_view() {
        let mut app = app(&["h", "i", "enter", "x"]);
        pump(&mut app, 4);
        assert_eq!(lines(app.main_view()), vec!["hi", "x"]);
        assert!(app.screen().row_text(1).contains("hi"));
        assert!(app.screen().row_text(23).ends_with("INS "));
    }

    #[test]
    fn next_view_moves_focus_and_edits_stay_out_of_output() {
        let mut app = app(&["f6", "z", "f6", "y"]);
        pump(&mut app, 4);
        assert_eq!(lines(app.main_view()), vec!["y"]);
        assert_eq!(lines(app.output().view()), vec![""]);
    }

    #[test]
    fn hiding_output_returns_rows_and_focus_to_main() {
        let mut app = app(&["f6", "f2"]);
        pump(&mut app, 2);
        assert_eq!(app.focus, Focus::Main);
        assert_eq!(app.wm.rect(MAIN_ID), Some(Rect::new(0, 0, 60, 23)));
        assert_eq!(app.wm.rect(OUTPUT_ID).map(|r| r.area()), Some(0));
        // focus stays on main while the output pane is hidden
        app.cycle_focus();
        assert_eq!(app.focus, Focus::Main);
    }

    #[test]
    fn output_messages_and_next_error() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("lib.rs");
        std::fs::write(&file, "one\ntwo\nthree").unwrap();
        let mut app = app(&["f4"]);
        let log = format!("{}:3:2: error: oops", file.display());
        assert!(app.sender().send(ExternalMessage::Output(log)));
        app.drain_external();
        pump(&mut app, 1);
        assert_eq!(app.main_view().doc().path(), Some(file.as_path()));
        assert_eq!(app.main_view().cursor(), Point::new(1, 2));
    }

    #[test]
    fn exit_asks_about_modified_documents() {
        let mut app = app(&["a", "ctrl+q", "esc", "ctrl+q", "n"]);
        pump(&mut app, 2);
        assert!(app.is_running());
        pump(&mut app, 1);
        assert!(!app.is_running());
    }

    #[test]
    fn macro_record_and_play() {
        let mut app = app(&["ctrl+r", "a", "b", "ctrl+r", "ctrl+p", "ctrl+p"]);
        pump(&mut app, 6);
        assert_eq!(lines(app.main_view()), vec!["ababab"]);
    }

    #[test]
    fn missing_file_starts_a_new_document() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("new.txt");
        let mut app = app(&[]);
        app.open_file(&path);
        assert_eq!(app.main_view().doc().path(), Some(path.as_path()));
        assert!(app.status().is_some_and(|s| s.starts_with("new file")));
    }
}
