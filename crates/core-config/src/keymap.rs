//! Key chord to action-name bindings.
//!
//! Action names stay strings at this layer; `core-actions` parses them into
//! its `Action` enum so the config crate does not depend on the action set.

use std::collections::{BTreeMap, HashMap};

use core_events::KeyEvent;
use tracing::warn;

const DEFAULT_BINDINGS: &[(&str, &str)] = &[
    ("left", "move_left"),
    ("right", "move_right"),
    ("up", "move_up"),
    ("down", "move_down"),
    ("pageup", "move_pgup"),
    ("pagedown", "move_pgdn"),
    ("home", "move_home"),
    ("end", "move_end"),
    ("ctrl+left", "move_word_left"),
    ("ctrl+right", "move_word_right"),
    ("ctrl+home", "move_bod"),
    ("ctrl+end", "move_eod"),
    ("shift+left", "select_left"),
    ("shift+right", "select_right"),
    ("shift+up", "select_up"),
    ("shift+down", "select_down"),
    ("shift+pageup", "select_pgup"),
    ("shift+pagedown", "select_pgdn"),
    ("shift+home", "select_home"),
    ("shift+end", "select_end"),
    ("ctrl+shift+left", "select_word_left"),
    ("ctrl+shift+right", "select_word_right"),
    ("ctrl+shift+home", "select_bod"),
    ("ctrl+shift+end", "select_eod"),
    ("backtab", "backtab"),
    ("tab", "tab"),
    ("enter", "enter"),
    ("backspace", "backspace"),
    ("delete", "delete"),
    ("insert", "toggle_insert"),
    ("esc", "escape"),
    ("ctrl+c", "copy"),
    ("ctrl+x", "cut"),
    ("ctrl+v", "paste"),
    ("ctrl+z", "undo"),
    ("ctrl+f", "find"),
    ("f3", "find_next"),
    ("ctrl+n", "file_new"),
    ("ctrl+s", "file_save"),
    ("f12", "file_save_as"),
    ("ctrl+o", "file_open"),
    ("ctrl+w", "close_tab"),
    ("ctrl+pagedown", "next_tab"),
    ("ctrl+pageup", "prev_tab"),
    ("f4", "next_error"),
    ("f6", "next_view"),
    ("f2", "toggle_output"),
    ("ctrl+q", "file_exit"),
    ("ctrl+r", "macro_record"),
    ("ctrl+p", "macro_play"),
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Keymap {
    bindings: HashMap<KeyEvent, String>,
}

impl Default for Keymap {
    fn default() -> Self {
        let mut bindings = HashMap::with_capacity(DEFAULT_BINDINGS.len());
        for (chord, action) in DEFAULT_BINDINGS {
            if let Ok(key) = chord.parse::<KeyEvent>() {
                bindings.insert(key, (*action).to_string());
            }
        }
        Self { bindings }
    }
}

impl Keymap {
    pub fn empty() -> Self {
        Self {
            bindings: HashMap::new(),
        }
    }

    /// Default bindings with `overrides` (chord name -> action name) applied
    /// on top. An empty action name unbinds the chord. Unparseable chords are
    /// skipped with a warning.
    pub fn with_overrides(overrides: &BTreeMap<String, String>) -> Self {
        let mut map = Self::default();
        for (chord, action) in overrides {
            match chord.parse::<KeyEvent>() {
                Ok(key) if action.is_empty() => {
                    map.bindings.remove(&key);
                }
                Ok(key) => map.bind(key, action),
                Err(e) => {
                    warn!(target: "config", chord = chord.as_str(), error = %e, "keymap_chord_invalid")
                }
            }
        }
        map
    }

    pub fn bind(&mut self, key: KeyEvent, action: &str) {
        self.bindings.insert(key, action.to_string());
    }

    pub fn lookup(&self, key: &KeyEvent) -> Option<&str> {
        self.bindings.get(key).map(String::as_str)
    }

    /// First chord bound to `action` in chord-name order (used for menu hints).
    pub fn chord_for(&self, action: &str) -> Option<String> {
        let mut names: Vec<String> = self
            .bindings
            .iter()
            .filter(|(_, a)| a.as_str() == action)
            .map(|(k, _)| k.chord_name())
            .collect();
        names.sort();
        names.into_iter().next()
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_events::{KeyCode, KeyModifiers};

    #[test]
    fn every_default_chord_parses() {
        assert_eq!(Keymap::default().len(), DEFAULT_BINDINGS.len());
    }

    #[test]
    fn defaults_cover_core_bindings() {
        let km = Keymap::default();
        assert_eq!(km.lookup(&KeyEvent::ctrl('s')), Some("file_save"));
        assert_eq!(
            km.lookup(&KeyEvent::new(KeyCode::Left, KeyModifiers::SHIFT)),
            Some("select_left")
        );
        assert_eq!(km.lookup(&KeyEvent::plain(KeyCode::Enter)), Some("enter"));
        assert_eq!(km.chord_for("undo").as_deref(), Some("ctrl+z"));
    }

    #[test]
    fn overrides_replace_and_unbind() {
        let mut o = BTreeMap::new();
        o.insert("ctrl+s".to_string(), "file_save_as".to_string());
        o.insert("ctrl+q".to_string(), String::new());
        o.insert("nonsense+key".to_string(), "undo".to_string());
        let km = Keymap::with_overrides(&o);
        assert_eq!(km.lookup(&KeyEvent::ctrl('s')), Some("file_save_as"));
        assert_eq!(km.lookup(&KeyEvent::ctrl('q')), None);
        assert_eq!(km.len(), DEFAULT_BINDINGS.len() - 1);
    }
}
