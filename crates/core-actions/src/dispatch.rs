//! Focus-chain dispatch.
//!
//! Panes implement [`ActionHandler`]. The event loop builds the chain from
//! the focused pane outwards (focused pane, then the application) and
//! [`dispatch`] offers the action to each in turn until one reports
//! [`Handled::Yes`].

use std::path::PathBuf;

use core_model::{Clipboard, FindOptions, SavePrompt};
use tracing::trace;

use crate::Action;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Handled {
    Yes,
    No,
}

impl Handled {
    pub fn is_yes(self) -> bool {
        self == Handled::Yes
    }
}

impl From<bool> for Handled {
    fn from(b: bool) -> Self {
        if b { Handled::Yes } else { Handled::No }
    }
}

/// Dialog collaborator for actions that need input from the user.
pub trait Prompt: SavePrompt {
    /// Options for a new search, seeded with the previous ones. `None`
    /// cancels.
    fn find_options(&mut self, previous: &FindOptions) -> Option<FindOptions>;
    /// File to open. `None` cancels.
    fn open_path(&mut self) -> Option<PathBuf>;
}

/// Everything a handler may touch besides itself.
pub struct ActionContext<'a> {
    pub clipboard: &'a mut dyn Clipboard,
    pub prompt: &'a mut dyn Prompt,
    /// Last search, reused by `FindNext`.
    pub find: &'a mut FindOptions,
    pub tab_width: usize,
    /// One-line feedback for the status bar.
    pub status: Option<String>,
    pub quit: bool,
}

impl<'a> ActionContext<'a> {
    pub fn new(
        clipboard: &'a mut dyn Clipboard,
        prompt: &'a mut dyn Prompt,
        find: &'a mut FindOptions,
        tab_width: usize,
    ) -> Self {
        Self {
            clipboard,
            prompt,
            find,
            tab_width,
            status: None,
            quit: false,
        }
    }

    pub fn set_status(&mut self, text: impl Into<String>) {
        self.status = Some(text.into());
    }
}

pub trait ActionHandler {
    fn handle_action(&mut self, action: &Action, ctx: &mut ActionContext<'_>) -> Handled;
}

/// Offer `action` along `chain`; the first handler returning `Yes` wins.
pub fn dispatch(
    chain: &mut [&mut dyn ActionHandler],
    action: &Action,
    ctx: &mut ActionContext<'_>,
) -> Handled {
    for (depth, handler) in chain.iter_mut().enumerate() {
        if handler.handle_action(action, ctx).is_yes() {
            trace!(target: "actions.dispatch", %action, depth, "handled");
            return Handled::Yes;
        }
    }
    trace!(target: "actions.dispatch", %action, "unhandled");
    Handled::No
}


#[cfg(test)]
mod tests {
    use super::test_support::ScriptedPrompt;
    use super::*;
    use core_model::MemoryClipboard;

    struct Recorder {
        accepts: bool,
        seen: Vec<Action>,
    }

    impl ActionHandler for Recorder {
        fn handle_action(&mut self, action: &Action, _ctx: &mut ActionContext<'_>) -> Handled {
            self.seen.push(*action);
            self.accepts.into()
        }
    }

    #[test]
    fn first_handler_to_accept_wins() {
        let mut clip = MemoryClipboard::new();
        let mut prompt = ScriptedPrompt::default();
        let mut find = FindOptions::default();
        let mut ctx = ActionContext::new(&mut clip, &mut prompt, &mut find, 4);
        let mut a = Recorder { accepts: false, seen: vec![] };
        let mut b = Recorder { accepts: true, seen: vec![] };
        let mut c = Recorder { accepts: true, seen: vec![] };
        let handled = dispatch(&mut [&mut a, &mut b, &mut c], &Action::Undo, &mut ctx);
        assert_eq!(handled, Handled::Yes);
        assert_eq!(a.seen, vec![Action::Undo]);
        assert_eq!(b.seen, vec![Action::Undo]);
        assert!(c.seen.is_empty());
    }

    #[test]
    fn unhandled_when_nobody_accepts() {
        let mut clip = MemoryClipboard::new();
        let mut prompt = ScriptedPrompt::default();
        let mut find = FindOptions::default();
        let mut ctx = ActionContext::new(&mut clip, &mut prompt, &mut find, 4);
        let mut a = Recorder { accepts: false, seen: vec![] };
        assert_eq!(dispatch(&mut [&mut a], &Action::FileExit, &mut ctx), Handled::No);
        assert_eq!(dispatch(&mut [], &Action::FileExit, &mut ctx), Handled::No);
    }
}
