//! crossterm key events to editor key events.

use core_events::{KeyCode, KeyEvent, KeyModifiers};
use crossterm::event::{
    KeyCode as CKeyCode, KeyEvent as CKeyEvent, KeyEventKind as CKeyEventKind,
    KeyModifiers as CKeyModifiers,
};

/// Map a crossterm key press. Releases and keys the editor has no use for
/// (media, lock keys, bare modifiers) yield `None`.
pub fn map_key_event(event: &CKeyEvent) -> Option<KeyEvent> {
    if matches!(event.kind, CKeyEventKind::Release) {
        return None;
    }
    let mut mods = map_mods(event.modifiers);
    let code = match event.code {
        CKeyCode::Char(c) => {
            // shift is already reflected in the character
            if !mods.intersects(KeyModifiers::CTRL | KeyModifiers::ALT) {
                mods.remove(KeyModifiers::SHIFT);
            }
            if mods.contains(KeyModifiers::CTRL) {
                KeyCode::Char(c.to_ascii_lowercase())
            } else {
                KeyCode::Char(c)
            }
        }
        CKeyCode::Enter => KeyCode::Enter,
        CKeyCode::Esc => KeyCode::Esc,
        CKeyCode::Backspace => KeyCode::Backspace,
        CKeyCode::Tab => KeyCode::Tab,
        CKeyCode::BackTab => {
            mods.remove(KeyModifiers::SHIFT);
            KeyCode::BackTab
        }
        CKeyCode::Up => KeyCode::Up,
        CKeyCode::Down => KeyCode::Down,
        CKeyCode::Left => KeyCode::Left,
        CKeyCode::Right => KeyCode::Right,
        CKeyCode::Home => KeyCode::Home,
        CKeyCode::End => KeyCode::End,
        CKeyCode::PageUp => KeyCode::PageUp,
        CKeyCode::PageDown => KeyCode::PageDown,
        CKeyCode::Insert => KeyCode::Insert,
        CKeyCode::Delete => KeyCode::Delete,
        CKeyCode::F(n) => KeyCode::F(n),
        CKeyCode::Null
        | CKeyCode::CapsLock
        | CKeyCode::ScrollLock
        | CKeyCode::NumLock
        | CKeyCode::PrintScreen
        | CKeyCode::Pause
        | CKeyCode::Menu
        | CKeyCode::KeypadBegin
        | CKeyCode::Media(_)
        | CKeyCode::Modifier(_) => return None,
    };
    Some(KeyEvent { code, mods })
}

pub fn map_mods(mods: CKeyModifiers) -> KeyModifiers {
    let mut out = KeyModifiers::empty();
    if mods.contains(CKeyModifiers::CONTROL) {
        out |= KeyModifiers::CTRL;
    }
    if mods.intersects(CKeyModifiers::ALT | CKeyModifiers::META) {
        out |= KeyModifiers::ALT;
    }
    if mods.contains(CKeyModifiers::SHIFT) {
        out |= KeyModifiers::SHIFT;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyEventState as CKeyEventState;

    fn key_event(code: CKeyCode, modifiers: CKeyModifiers, kind: CKeyEventKind) -> CKeyEvent {
        CKeyEvent {
            code,
            modifiers,
            kind,
            state: CKeyEventState::empty(),
        }
    }

    #[test]
    fn shifted_char_drops_shift() {
        let ev = key_event(CKeyCode::Char('A'), CKeyModifiers::SHIFT, CKeyEventKind::Press);
        assert_eq!(map_key_event(&ev), Some(KeyEvent::plain(KeyCode::Char('A'))));
    }

    #[test]
    fn ctrl_char_is_lowercased() {
        let ev = key_event(
            CKeyCode::Char('S'),
            CKeyModifiers::CONTROL | CKeyModifiers::SHIFT,
            CKeyEventKind::Press,
        );
        let k = map_key_event(&ev).unwrap();
        assert_eq!(k.code, KeyCode::Char('s'));
        assert_eq!(k.mods, KeyModifiers::CTRL | KeyModifiers::SHIFT);
    }

    #[test]
    fn shift_arrow_keeps_shift() {
        let ev = key_event(CKeyCode::Left, CKeyModifiers::SHIFT, CKeyEventKind::Press);
        assert_eq!(map_key_event(&ev).unwrap().chord_name(), "shift+left");
    }

    #[test]
    fn backtab_is_normalized() {
        let ev = key_event(CKeyCode::BackTab, CKeyModifiers::SHIFT, CKeyEventKind::Press);
        assert_eq!(map_key_event(&ev), Some(KeyEvent::plain(KeyCode::BackTab)));
    }

    #[test]
    fn release_and_media_keys_are_ignored() {
        let rel = key_event(CKeyCode::Char('a'), CKeyModifiers::NONE, CKeyEventKind::Release);
        assert_eq!(map_key_event(&rel), None);
        let caps = key_event(CKeyCode::CapsLock, CKeyModifiers::NONE, CKeyEventKind::Press);
        assert_eq!(map_key_event(&caps), None);
    }
}
