//! Text primitives shared by the editor crates: cell geometry, style ids,
//! display width rules and the logical-to-visual line model.

pub mod geom;
pub mod line;
pub mod style;
pub mod token;
pub mod width;

pub use geom::{Point, Range, Rect};
pub use line::{DEFAULT_TAB_WIDTH, VisualLine};
pub use style::{Highlight, StyleId};
pub use token::VisualToken;
pub use width::{char_width, is_word_char};

/// Document position as (column, row), both logical indices.
pub type Cursor = Point;
