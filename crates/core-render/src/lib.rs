//! Window surfaces drawn through a [`core_terminal::Screen`].

pub mod window;

pub use window::{DockedWindow, Window, WindowId};
