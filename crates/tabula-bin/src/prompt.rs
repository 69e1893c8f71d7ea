//! Dialogs drawn on the status row.
//!
//! Each question takes over the bottom row of the screen and reads keys
//! until it is answered. `Esc` cancels every prompt.

use std::path::PathBuf;
use std::time::Duration;

use core_actions::Prompt;
use core_events::{KeyCode, KeyEvent};
use core_model::{FindAction, FindOptions, SaveChoice, SavePrompt};
use core_terminal::Screen;
use core_text::width::str_width;
use core_text::{Point, StyleId};
use tracing::warn;

const POLL: Duration = Duration::from_millis(250);

pub struct LinePrompt<'a> {
    screen: &'a mut dyn Screen,
}

impl<'a> LinePrompt<'a> {
    pub fn new(screen: &'a mut dyn Screen) -> Self {
        Self { screen }
    }

    fn draw(&mut self, text: &str) {
        let size = self.screen.size();
        let y = size.y - 1;
        if y < 0 {
            return;
        }
        self.screen.move_to(Point::new(0, y));
        self.screen.write(text, StyleId::FOCUS);
        let used = str_width(text) as i32;
        if used < size.x {
            self.screen.write(&" ".repeat((size.x - used) as usize), StyleId::FOCUS);
        }
        self.screen.move_to(Point::new(used.min(size.x - 1).max(0), y));
        self.screen.show_cursor(true);
        if let Err(e) = self.screen.flush() {
            warn!(target: "runtime", error = %e, "prompt_flush_failed");
        }
    }

    fn next_key(&mut self) -> Option<KeyEvent> {
        loop {
            match self.screen.read_key(POLL) {
                Ok(Some(key)) => return Some(key),
                Ok(None) => continue,
                Err(e) => {
                    warn!(target: "runtime", error = %e, "prompt_read_failed");
                    return None;
                }
            }
        }
    }

    /// Edit one line of text. `None` when cancelled.
    pub fn read_line(&mut self, label: &str, initial: &str) -> Option<String> {
        let mut text = initial.to_string();
        loop {
            self.draw(&format!("{label}{text}"));
            let key = self.next_key()?;
            match key.code {
                KeyCode::Enter => return Some(text),
                KeyCode::Esc => return None,
                KeyCode::Backspace => {
                    text.pop();
                }
                _ => {
                    if let Some(c) = key.printable() {
                        text.push(c);
                    }
                }
            }
        }
    }
}

impl SavePrompt for LinePrompt<'_> {
    fn ask_save(&mut self, title: &str) -> SaveChoice {
        loop {
            self.draw(&format!("Save changes to {title}? (y/n, esc cancels)"));
            let Some(key) = self.next_key() else {
                return SaveChoice::Cancel;
            };
            match (key.code, key.printable()) {
                (_, Some('y' | 'Y')) => return SaveChoice::Save,
                (_, Some('n' | 'N')) => return SaveChoice::Discard,
                (KeyCode::Esc, _) => return SaveChoice::Cancel,
                _ => {}
            }
        }
    }

    fn save_path(&mut self, title: &str) -> Option<PathBuf> {
        self.read_line(&format!("Save {title} as: "), "")
            .filter(|s| !s.is_empty())
            .map(PathBuf::from)
    }
}

impl Prompt for LinePrompt<'_> {
    /// Asks for the pattern, then for a replacement. Cancelling the second
    /// question searches only; answering it replaces every match.
    fn find_options(&mut self, previous: &FindOptions) -> Option<FindOptions> {
        let find = self.read_line("Find: ", &previous.find)?;
        if find.is_empty() {
            return None;
        }
        let mut opts = FindOptions {
            find,
            action: FindAction::Find,
            ..previous.clone()
        };
        if let Some(with) = self.read_line("Replace with (esc to find): ", &previous.replace) {
            opts.replace = with;
            opts.action = FindAction::ReplaceAll;
        }
        Some(opts)
    }

    fn open_path(&mut self) -> Option<PathBuf> {
        self.read_line("Open: ", "")
            .filter(|s| !s.is_empty())
            .map(PathBuf::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_terminal::MemoryScreen;

    fn screen(keys: &str) -> MemoryScreen {
        let mut s = MemoryScreen::new(40, 5);
        for chord in keys.split(' ').filter(|k| !k.is_empty()) {
            s.push_key(chord.parse().unwrap());
        }
        s
    }

    #[test]
    fn read_line_edits_and_confirms() {
        let mut s = screen("a b c backspace d enter");
        let mut p = LinePrompt::new(&mut s);
        assert_eq!(p.read_line("Open: ", "x"), Some("xabd".to_string()));
        assert!(s.row_text(4).starts_with("Open: xabd"));
    }

    #[test]
    fn escape_cancels() {
        let mut s = screen("a esc");
        let mut p = LinePrompt::new(&mut s);
        assert_eq!(p.open_path(), None);
    }

    #[test]
    fn save_question_ignores_other_keys() {
        let mut s = screen("q n");
        let mut p = LinePrompt::new(&mut s);
        assert_eq!(p.ask_save("a.txt"), SaveChoice::Discard);
        let mut s = screen("esc");
        let mut p = LinePrompt::new(&mut s);
        assert_eq!(p.ask_save("a.txt"), SaveChoice::Cancel);
    }

    #[test]
    fn find_then_optional_replace() {
        let mut s = screen("f o o enter esc");
        let mut p = LinePrompt::new(&mut s);
        let opts = p.find_options(&FindOptions::default()).unwrap();
        assert_eq!(opts.find, "foo");
        assert_eq!(opts.action, FindAction::Find);

        let mut s = screen("enter b a r enter");
        let mut p = LinePrompt::new(&mut s);
        let opts = p.find_options(&FindOptions::find("foo")).unwrap();
        assert_eq!(opts.replace, "bar");
        assert_eq!(opts.action, FindAction::ReplaceAll);
    }
}
