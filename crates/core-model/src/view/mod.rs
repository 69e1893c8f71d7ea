//! Per-pane editing engine.
//!
//! A `View` holds an ordered list of [`Tab`]s, each pairing a [`Document`]
//! with its cursor, selection and scroll offset. Only the active tab is
//! edited or drawn. The work is split by concern:
//! * `movement` - cursor motions, selection extension, scrolling;
//! * `edit` - text entry, indentation, selection deletion, completion;
//! * `clipboard` - copy / cut / paste through a [`Clipboard`];
//! * `find` - search and replace;
//! * `render` - drawing rows through the pane's window;
//! * `tabs` - opening, switching and closing documents.
//!
//! The sticky column (`last_x`) is a visual column: vertical motions land on
//! the character covering that cell, so moving across lines with different
//! tab layouts keeps the cursor in the same screen column.

mod clipboard;
mod edit;
mod find;
mod movement;
mod render;
mod tabs;

use std::path::PathBuf;

use core_render::{DockedWindow, Window, WindowId};
use core_state::{CursorTracker, Document, DocumentError};
use core_text::{Cursor, Point, Range, Rect};

pub use clipboard::{Clipboard, MemoryClipboard};
pub use find::{FindAction, FindError, FindOptions};
pub use movement::Motion;
pub use tabs::{SaveChoice, SavePrompt};

/// Cursor, selection and scroll offset of one tab.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TabState {
    pub cursor: Cursor,
    pub selection: Option<Range>,
    /// Visual column and row shown at the window's top-left cell.
    pub offset: Point,
}

impl CursorTracker for TabState {
    fn capture_cursor(&self) -> Cursor {
        self.cursor
    }

    fn restore_cursor(&mut self, cursor: Cursor) {
        self.cursor = cursor;
        self.selection = None;
    }
}

#[derive(Debug)]
pub struct Tab {
    pub doc: Document,
    pub state: TabState,
}

impl Tab {
    pub fn new(doc: Document) -> Self {
        Self {
            doc,
            state: TabState::default(),
        }
    }

    /// Untitled, unmodified and empty: safe to replace without asking.
    pub fn is_pristine(&self) -> bool {
        self.doc.path().is_none()
            && !self.doc.is_modified()
            && self.doc.row_count() == 1
            && self.doc.line_len(0) == 0
    }
}

/// Notifications for collaborators tracking which documents a view shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewEvent {
    DocumentFocused(Option<PathBuf>),
    DocumentClosed(Option<PathBuf>),
}

#[derive(Debug)]
pub struct View {
    id: WindowId,
    window: Window,
    tabs: Vec<Tab>,
    active: usize,
    tab_width: usize,
    overwrite: bool,
    read_only: bool,
    label: Option<String>,
    last_x: usize,
    events: Vec<ViewEvent>,
}

impl View {
    /// View with a single empty untitled tab.
    pub fn new(id: WindowId, requested: Point, tab_width: usize) -> Self {
        Self::with_document(id, requested, Document::new(tab_width))
    }

    pub fn with_document(id: WindowId, requested: Point, doc: Document) -> Self {
        let tab_width = doc.tab_width();
        Self {
            id,
            window: Window::new(requested),
            tabs: vec![Tab::new(doc)],
            active: 0,
            tab_width,
            overwrite: false,
            read_only: false,
            label: None,
            last_x: 0,
            events: Vec::new(),
        }
    }

    pub fn id(&self) -> WindowId {
        self.id
    }

    pub fn window(&self) -> &Window {
        &self.window
    }

    pub fn window_mut(&mut self) -> &mut Window {
        &mut self.window
    }

    pub fn tab_width(&self) -> usize {
        self.tab_width
    }

    pub fn tabs(&self) -> &[Tab] {
        &self.tabs
    }

    pub fn tab_count(&self) -> usize {
        self.tabs.len()
    }

    pub fn active_index(&self) -> usize {
        self.active
    }

    pub fn tab(&self) -> &Tab {
        &self.tabs[self.active]
    }

    pub fn tab_mut(&mut self) -> &mut Tab {
        &mut self.tabs[self.active]
    }

    pub fn doc(&self) -> &Document {
        &self.tab().doc
    }

    pub fn doc_mut(&mut self) -> &mut Document {
        &mut self.tab_mut().doc
    }

    pub fn cursor(&self) -> Cursor {
        self.tab().state.cursor
    }

    /// Current selection, `None` when nothing (or an empty range) is selected.
    pub fn selection(&self) -> Option<Range> {
        self.tab().state.selection.filter(|r| !r.is_empty())
    }

    pub fn offset(&self) -> Point {
        self.tab().state.offset
    }

    pub fn is_overwrite(&self) -> bool {
        self.overwrite
    }

    /// Switch between insert and overwrite text entry.
    pub fn toggle_insert_mode(&mut self) {
        self.overwrite = !self.overwrite;
    }

    pub fn is_read_only(&self) -> bool {
        self.read_only
    }

    pub fn set_read_only(&mut self, read_only: bool) {
        self.read_only = read_only;
    }

    /// Fixed window title replacing the document title.
    pub fn set_label(&mut self, label: impl Into<String>) {
        self.label = Some(label.into());
    }

    pub fn set_focused(&mut self, focused: bool) {
        self.window.set_focused(focused);
    }

    pub fn is_focused(&self) -> bool {
        self.window.is_focused()
    }

    /// Drain pending tab notifications.
    pub fn take_events(&mut self) -> Vec<ViewEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn save(&mut self, path: Option<&std::path::Path>) -> Result<(), DocumentError> {
        self.doc_mut().save(path)
    }

    /// Revert the last edit (or compound edit) of the active document.
    pub fn undo(&mut self) -> bool {
        let Tab { doc, state } = &mut self.tabs[self.active];
        let replayed = doc.undo(state);
        state.cursor = doc.clamp(state.cursor);
        self.sync_sticky();
        self.ensure_visible();
        replayed
    }

    /// Place the cursor directly (clamped), dropping any selection.
    pub fn set_cursor(&mut self, p: Cursor) {
        let Tab { doc, state } = &mut self.tabs[self.active];
        state.cursor = doc.clamp(p);
        state.selection = None;
        self.sync_sticky();
        self.ensure_visible();
    }

    /// Replace the selection; the cursor follows its active end.
    pub fn select(&mut self, range: Range) {
        let Tab { doc, state } = &mut self.tabs[self.active];
        let range = Range::new(doc.clamp(range.anchor), doc.clamp(range.active));
        state.cursor = range.active;
        state.selection = Some(range);
        self.sync_sticky();
        self.ensure_visible();
    }

    pub(crate) fn sync_sticky(&mut self) {
        let Tab { doc, state } = &self.tabs[self.active];
        self.last_x = doc
            .row(state.cursor.row())
            .map(|line| line.visual_index(state.cursor.col()))
            .unwrap_or(0);
    }

    /// Refit every tab's cursor after the document changed underneath it
    /// (listeners, external appends).
    pub fn revalidate(&mut self) {
        for tab in &mut self.tabs {
            tab.state.cursor = tab.doc.clamp(tab.state.cursor);
            if let Some(sel) = tab.state.selection.as_mut() {
                sel.anchor = tab.doc.clamp(sel.anchor);
                sel.active = tab.doc.clamp(sel.active);
            }
        }
        self.ensure_visible();
    }
}

impl DockedWindow for View {
    fn window_id(&self) -> WindowId {
        self.id
    }

    fn requested_size(&self) -> Point {
        self.window.requested_size()
    }

    fn set_rect(&mut self, rect: Rect) {
        self.window.set_rect(rect);
        self.ensure_visible();
    }
}
