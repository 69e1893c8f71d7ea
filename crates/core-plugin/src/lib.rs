//! Pane plugins.
//!
//! A plugin is a pane docked next to the editor views. It advertises its
//! capabilities through small traits instead of a common base type:
//! * [`Renderable`]: draws itself and places the terminal cursor;
//! * [`GlobalActionTarget`]: sees actions nobody in the focus chain took;
//! * [`DockedPane`]: the full set, plus external messages, for panes owned
//!   by the application.

use std::path::PathBuf;

use core_actions::{Action, ActionHandler};
use core_events::ExternalMessage;
use core_model::View;
use core_render::DockedWindow;
use core_terminal::Screen;

mod output;

pub use output::{ERROR_PATTERN, OUTPUT_HEIGHT, OutputPane};

pub trait Renderable {
    fn render(&mut self, screen: &mut dyn Screen);
    fn place_cursor(&self, screen: &mut dyn Screen);
}

impl Renderable for View {
    fn render(&mut self, screen: &mut dyn Screen) {
        View::render(self, screen);
    }

    fn place_cursor(&self, screen: &mut dyn Screen) {
        View::place_cursor(self, screen);
    }
}

/// Zero-based position in a file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    pub path: PathBuf,
    pub row: usize,
    pub col: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GlobalResponse {
    Ignored,
    Handled,
    /// Handled; the application should show this location in the main view.
    Open(Location),
}

pub trait GlobalActionTarget {
    fn global_action(&mut self, action: &Action) -> GlobalResponse;
}

pub trait DockedPane: DockedWindow + Renderable + ActionHandler + GlobalActionTarget {
    fn name(&self) -> &'static str;

    /// Offer an external message. Returns whether the pane consumed it.
    fn on_message(&mut self, _msg: &ExternalMessage) -> bool {
        false
    }

    fn set_focused(&mut self, focused: bool);
}
