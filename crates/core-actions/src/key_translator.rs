//! KeyTranslator: key chord -> Action.
//!
//! Bound chords resolve through the keymap and its action names; anything
//! else that carries a printable character becomes `InsertChar`. Keymap
//! entries naming an unknown action are reported once and then ignored.

use std::cell::RefCell;
use std::collections::HashSet;

use core_config::Keymap;
use core_events::KeyEvent;
use tracing::warn;

use crate::Action;

#[derive(Debug, Default)]
pub struct KeyTranslator {
    keymap: Keymap,
    reported: RefCell<HashSet<String>>,
}

impl KeyTranslator {
    pub fn new(keymap: Keymap) -> Self {
        Self {
            keymap,
            reported: RefCell::default(),
        }
    }

    pub fn keymap(&self) -> &Keymap {
        &self.keymap
    }

    pub fn translate(&self, key: &KeyEvent) -> Option<Action> {
        if let Some(name) = self.keymap.lookup(key) {
            match name.parse::<Action>() {
                Ok(action) => return Some(action),
                Err(e) => {
                    if self.reported.borrow_mut().insert(name.to_string()) {
                        warn!(target: "actions.dispatch", chord = %key, error = %e, "keymap_action_unknown");
                    }
                }
            }
        }
        key.printable().map(Action::InsertChar)
    }
}
