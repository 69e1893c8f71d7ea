//! Editor actions and their dispatch.
//!
//! Keys become [`Action`]s through a [`KeyTranslator`]; the event loop then
//! offers each action to a chain of [`ActionHandler`]s. `View` is the main
//! handler and its implementation lives here so the model crate stays free
//! of the action vocabulary.

mod action;
mod dispatch;
mod key_translator;
mod macros;
mod view_handler;

pub use action::{Action, UnknownAction};
pub use dispatch::{ActionContext, ActionHandler, Handled, Prompt, dispatch};
pub use key_translator::KeyTranslator;
pub use macros::MacroRecorder;
