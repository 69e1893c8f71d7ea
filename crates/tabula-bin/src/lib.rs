//! tabula: a small tabbed terminal text editor.

pub mod app;
pub mod prompt;

pub use app::App;
