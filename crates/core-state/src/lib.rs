//! Document state: the line buffer, its reversible edit log, file I/O and
//! change notification.

pub mod document;
pub mod error;
pub mod io;
pub mod undo;

pub use document::{Document, ListenerId, ModificationListener, RowChange};
pub use error::DocumentError;
pub use io::{DecodedText, LineEnding, decode_lines};
pub use undo::{CursorTracker, EditOp, UndoEntry, UndoLog};
