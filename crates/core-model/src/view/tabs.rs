use std::path::{Path, PathBuf};

use core_state::{Document, DocumentError};
use core_text::Highlight;
use tracing::{debug, trace};

use super::{Tab, View, ViewEvent};

/// Answer to "save changes before closing?".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveChoice {
    Save,
    Discard,
    Cancel,
}

/// Asks the user what to do with a modified document.
pub trait SavePrompt {
    fn ask_save(&mut self, title: &str) -> SaveChoice;

    /// Destination for an untitled document. `None` cancels.
    fn save_path(&mut self, _title: &str) -> Option<PathBuf> {
        None
    }
}

impl<F: FnMut(&str) -> SaveChoice> SavePrompt for F {
    fn ask_save(&mut self, title: &str) -> SaveChoice {
        self(title)
    }
}

impl View {
    /// Show `doc` in a tab. A document whose path is already open focuses
    /// the existing tab instead; a pristine untitled tab is replaced.
    pub fn open_document(&mut self, doc: Document) {
        if let Some(path) = doc.path()
            && let Some(index) = self.find_tab(path)
        {
            self.switch_to(index);
            return;
        }
        debug!(target: "model.view", title = %doc.title(), "document_opened");
        if self.tab().is_pristine() {
            self.tabs[self.active] = Tab::new(doc);
        } else {
            self.tabs.push(Tab::new(doc));
            self.active = self.tabs.len() - 1;
        }
        self.focused_changed();
    }

    pub fn new_document(&mut self) {
        self.tabs.push(Tab::new(Document::new(self.tab_width)));
        self.active = self.tabs.len() - 1;
        self.focused_changed();
    }

    /// Index of the tab showing `path`.
    pub fn find_tab(&self, path: &Path) -> Option<usize> {
        self.tabs
            .iter()
            .position(|t| t.doc.path().is_some_and(|p| p == path))
    }

    pub fn switch_to(&mut self, index: usize) -> bool {
        if index >= self.tabs.len() {
            return false;
        }
        if index != self.active {
            self.active = index;
            self.focused_changed();
        }
        true
    }

    pub fn next_tab(&mut self) {
        let index = (self.active + 1) % self.tabs.len();
        self.switch_to(index);
    }

    pub fn prev_tab(&mut self) {
        let index = (self.active + self.tabs.len() - 1) % self.tabs.len();
        self.switch_to(index);
    }

    /// Close the active tab. A modified document is offered for saving
    /// first. Returns `Ok(false)` when the user cancelled.
    pub fn close_tab(&mut self, prompt: &mut dyn SavePrompt) -> Result<bool, DocumentError> {
        let active = self.active;
        if !save_before_close(&mut self.tabs[active].doc, prompt)? {
            return Ok(false);
        }
        let closed = self.tabs.remove(self.active);
        let path = closed.doc.path().map(Path::to_path_buf);
        debug!(target: "model.view", title = %closed.doc.title(), "document_closed");
        self.events.push(ViewEvent::DocumentClosed(path));
        if self.tabs.is_empty() {
            self.tabs.push(Tab::new(Document::new(self.tab_width)));
        }
        if self.active >= self.tabs.len() {
            self.active = 0;
        }
        self.focused_changed();
        Ok(true)
    }

    /// Ask every tab in turn, for shutdown. Returns `Ok(false)` as soon as
    /// one prompt is cancelled.
    pub fn close_all(&mut self, prompt: &mut dyn SavePrompt) -> Result<bool, DocumentError> {
        for tab in &mut self.tabs {
            if !save_before_close(&mut tab.doc, prompt)? {
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// Store semantic highlights for `row` of the tab showing `path`.
    /// Unknown paths are ignored.
    pub fn apply_semantic_highlights(&mut self, path: &Path, row: usize, ranges: Vec<Highlight>) {
        let Some(index) = self.find_tab(path) else {
            trace!(target: "model.view", path = %path.display(), "highlights_for_closed_document");
            return;
        };
        self.tabs[index].doc.set_semantic_highlights(row, ranges);
    }

    pub fn clear_semantic_highlights(&mut self, path: &Path) {
        if let Some(index) = self.find_tab(path) {
            self.tabs[index].doc.clear_semantic_highlights(None);
        }
    }

    fn focused_changed(&mut self) {
        let path = self.doc().path().map(Path::to_path_buf);
        self.events.push(ViewEvent::DocumentFocused(path));
        self.sync_sticky();
        self.ensure_visible();
    }
}

/// Offer a modified document for saving. An untitled one asks for a
/// destination; declining it cancels the close.
fn save_before_close(
    doc: &mut Document,
    prompt: &mut dyn SavePrompt,
) -> Result<bool, DocumentError> {
    if !doc.is_modified() {
        return Ok(true);
    }
    let title = doc.title();
    match prompt.ask_save(&title) {
        SaveChoice::Discard => Ok(true),
        SaveChoice::Cancel => Ok(false),
        SaveChoice::Save if doc.path().is_some() => doc.save(None).map(|()| true),
        SaveChoice::Save => match prompt.save_path(&title) {
            Some(path) => doc.save(Some(path.as_path())).map(|()| true),
            None => {
                debug!(target: "model.view", %title, "save_as_cancelled");
                Ok(false)
            }
        },
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use super::*;
    use core_text::{Point, StyleId};
    use std::path::PathBuf;

    fn doc_at(path: &str, text: &str) -> Document {
        let mut doc = Document::from_text(text, 4);
        doc.set_path(Some(PathBuf::from(path)));
        doc
    }

    #[test]
    fn opening_into_pristine_tab_replaces_it() {
        let mut view = View::new(core_render::WindowId(1), Point::new(0, 0), 4);
        view.open_document(doc_at("/tmp/a.rs", "a"));
        assert_eq!(view.tab_count(), 1);
        assert_eq!(
            view.take_events(),
            vec![ViewEvent::DocumentFocused(Some(PathBuf::from("/tmp/a.rs")))]
        );
    }

    #[test]
    fn reopening_a_path_switches_to_it() {
        let mut view = view_with("scratch", 20, 5);
        view.open_document(doc_at("/tmp/a.rs", "a"));
        view.open_document(doc_at("/tmp/b.rs", "b"));
        assert_eq!(view.tab_count(), 3);
        view.open_document(doc_at("/tmp/a.rs", "stale"));
        assert_eq!(view.tab_count(), 3);
        assert_eq!(view.active_index(), 1);
        assert_eq!(lines(&view), vec!["a"]);
    }

    #[test]
    fn tab_cycling_wraps() {
        let mut view = view_with("one", 20, 5);
        view.new_document();
        view.new_document();
        assert_eq!(view.active_index(), 2);
        view.next_tab();
        assert_eq!(view.active_index(), 0);
        view.prev_tab();
        assert_eq!(view.active_index(), 2);
        assert!(!view.switch_to(7));
    }

    #[test]
    fn closing_modified_tab_respects_prompt() {
        let mut view = view_with("x", 20, 5);
        view.insert_char('y');
        let mut cancel = |_: &str| SaveChoice::Cancel;
        assert!(!view.close_tab(&mut cancel).unwrap());
        assert_eq!(lines(&view), vec!["yx"]);

        let mut asked = Vec::new();
        let mut discard = |title: &str| {
            asked.push(title.to_string());
            SaveChoice::Discard
        };
        assert!(view.close_tab(&mut discard).unwrap());
        assert_eq!(asked, vec!["untitled".to_string()]);
        // the last tab leaves an empty untitled one behind
        assert_eq!(view.tab_count(), 1);
        assert!(view.tab().is_pristine());
    }

    struct SaveAs(Option<PathBuf>);

    impl SavePrompt for SaveAs {
        fn ask_save(&mut self, _title: &str) -> SaveChoice {
            SaveChoice::Save
        }

        fn save_path(&mut self, _title: &str) -> Option<PathBuf> {
            self.0.take()
        }
    }

    #[test]
    fn saving_an_untitled_tab_on_close_asks_for_a_path() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("kept.txt");

        let mut view = view_with("x", 20, 5);
        view.insert_char('y');
        assert!(!view.close_tab(&mut SaveAs(None)).unwrap());
        assert_eq!(lines(&view), vec!["yx"]);

        view.new_document();
        view.switch_to(0);
        assert!(view.close_tab(&mut SaveAs(Some(target.clone()))).unwrap());
        assert_eq!(view.tab_count(), 1);
        assert_eq!(std::fs::read_to_string(&target).unwrap(), "yx");
    }

    #[test]
    fn closing_moves_focus_to_next_tab_and_reports_events() {
        let mut view = view_with("scratch", 20, 5);
        view.open_document(doc_at("/tmp/a.rs", "a"));
        view.open_document(doc_at("/tmp/b.rs", "b"));
        view.switch_to(1);
        view.take_events();
        let mut never = |_: &str| SaveChoice::Cancel;
        assert!(view.close_tab(&mut never).unwrap());
        assert_eq!(lines(&view), vec!["b"]);
        assert_eq!(
            view.take_events(),
            vec![
                ViewEvent::DocumentClosed(Some(PathBuf::from("/tmp/a.rs"))),
                ViewEvent::DocumentFocused(Some(PathBuf::from("/tmp/b.rs"))),
            ]
        );
        assert!(view.close_tab(&mut never).unwrap());
        assert_eq!(lines(&view), vec!["scratch"]);
    }

    #[test]
    fn highlights_for_unknown_paths_are_ignored() {
        let mut view = view_with("scratch", 20, 5);
        view.open_document(doc_at("/tmp/a.rs", "fn main"));
        let ranges = vec![Highlight::new(0, 2, StyleId::semantic(6))];
        view.apply_semantic_highlights(Path::new("/tmp/zzz.rs"), 0, ranges.clone());
        view.apply_semantic_highlights(Path::new("/tmp/a.rs"), 0, ranges.clone());
        assert_eq!(view.doc().semantic_highlights(0), ranges.as_slice());
        view.clear_semantic_highlights(Path::new("/tmp/a.rs"));
        assert!(view.doc().semantic_highlights(0).is_empty());
    }
}
