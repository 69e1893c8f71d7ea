//! The editor's action vocabulary.
//!
//! Every key binding resolves to an [`Action`]. The string names are the ones
//! used in the `[keymap]` section of `tabula.toml`.

use std::fmt;
use std::str::FromStr;

use core_model::Motion;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Move(Motion),
    Select(Motion),
    InsertChar(char),
    Enter,
    Tab,
    BackTab,
    Backspace,
    Delete,
    ToggleInsert,
    Escape,
    Copy,
    Cut,
    Paste,
    Undo,
    Find,
    FindNext,
    FileNew,
    FileOpen,
    FileSave,
    FileSaveAs,
    CloseTab,
    NextTab,
    PrevTab,
    NextError,
    NextView,
    ToggleOutput,
    FileExit,
    MacroRecord,
    MacroPlay,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown action `{0}`")]
pub struct UnknownAction(pub String);

const MOTIONS: &[(&str, Motion)] = &[
    ("left", Motion::Left),
    ("right", Motion::Right),
    ("up", Motion::Up),
    ("down", Motion::Down),
    ("pgup", Motion::PageUp),
    ("pgdn", Motion::PageDown),
    ("home", Motion::Home),
    ("end", Motion::End),
    ("word_left", Motion::WordLeft),
    ("word_right", Motion::WordRight),
    ("bod", Motion::DocStart),
    ("eod", Motion::DocEnd),
];

const SIMPLE: &[(&str, Action)] = &[
    ("enter", Action::Enter),
    ("tab", Action::Tab),
    ("backtab", Action::BackTab),
    ("backspace", Action::Backspace),
    ("delete", Action::Delete),
    ("toggle_insert", Action::ToggleInsert),
    ("escape", Action::Escape),
    ("copy", Action::Copy),
    ("cut", Action::Cut),
    ("paste", Action::Paste),
    ("undo", Action::Undo),
    ("find", Action::Find),
    ("find_next", Action::FindNext),
    ("file_new", Action::FileNew),
    ("file_open", Action::FileOpen),
    ("file_save", Action::FileSave),
    ("file_save_as", Action::FileSaveAs),
    ("close_tab", Action::CloseTab),
    ("next_tab", Action::NextTab),
    ("prev_tab", Action::PrevTab),
    ("next_error", Action::NextError),
    ("next_view", Action::NextView),
    ("toggle_output", Action::ToggleOutput),
    ("file_exit", Action::FileExit),
    ("macro_record", Action::MacroRecord),
    ("macro_play", Action::MacroPlay),
];

fn motion_name(m: Motion) -> &'static str {
    MOTIONS
        .iter()
        .find(|(_, mm)| *mm == m)
        .map_or("", |(name, _)| *name)
}

impl Action {
    /// Keymap name of the action. Typed characters have no binding name and
    /// render as `insert_char:<c>`.
    pub fn name(&self) -> String {
        match self {
            Action::Move(m) => format!("move_{}", motion_name(*m)),
            Action::Select(m) => format!("select_{}", motion_name(*m)),
            Action::InsertChar(c) => format!("insert_char:{c}"),
            other => SIMPLE
                .iter()
                .find(|(_, a)| a == other)
                .map_or_else(String::new, |(name, _)| (*name).to_string()),
        }
    }

    /// Whether the action changes document text.
    pub fn is_edit(&self) -> bool {
        matches!(
            self,
            Action::InsertChar(_)
                | Action::Enter
                | Action::Tab
                | Action::BackTab
                | Action::Backspace
                | Action::Delete
                | Action::Cut
                | Action::Paste
                | Action::Undo
        )
    }
}

impl FromStr for Action {
    type Err = UnknownAction;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Some(rest) = s.strip_prefix("move_")
            && let Some((_, m)) = MOTIONS.iter().find(|(n, _)| *n == rest)
        {
            return Ok(Action::Move(*m));
        }
        if let Some(rest) = s.strip_prefix("select_")
            && let Some((_, m)) = MOTIONS.iter().find(|(n, _)| *n == rest)
        {
            return Ok(Action::Select(*m));
        }
        if let Some(rest) = s.strip_prefix("insert_char:") {
            let mut chars = rest.chars();
            if let (Some(c), None) = (chars.next(), chars.next()) {
                return Ok(Action::InsertChar(c));
            }
        }
        SIMPLE
            .iter()
            .find(|(n, _)| *n == s)
            .map(|(_, a)| *a)
            .ok_or_else(|| UnknownAction(s.to_string()))
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name())
    }
}
