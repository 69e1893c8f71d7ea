//! Pane-level editor model.
//!
//! * [`View`] owns a set of document tabs and turns cursor motions, edits,
//!   clipboard and search requests into `Document` operations, then draws the
//!   visible rows through its [`Window`](core_render::Window).
//! * [`WindowManager`] tiles the registered windows inside the terminal
//!   bounds: one primary window, side docks to its right, bottom docks below.
//!
//! Invariants (after every public call):
//! * a view always has at least one tab and `active < tabs.len()`;
//! * every tab's cursor is a valid position in its document;
//! * visible window rects produced by the manager tile the bounds exactly.

mod layout;
pub mod view;

pub use layout::{LayoutError, WindowManager};
pub use view::{
    Clipboard, FindAction, FindError, FindOptions, MemoryClipboard, Motion, SaveChoice,
    SavePrompt, Tab, TabState, View, ViewEvent,
};
