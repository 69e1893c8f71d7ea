//! Actions applied to a [`View`].

use core_model::{FindAction, FindOptions, SavePrompt, View};
use core_state::Document;
use tracing::{debug, warn};

use crate::dispatch::{ActionContext, ActionHandler, Handled};
use crate::Action;

impl ActionHandler for View {
    fn handle_action(&mut self, action: &Action, ctx: &mut ActionContext<'_>) -> Handled {
        if self.is_read_only() && action.is_edit() {
            return Handled::No;
        }
        match *action {
            Action::Move(m) => self.move_cursor(m, false),
            Action::Select(m) => self.move_cursor(m, true),
            Action::InsertChar(c) => self.insert_char(c),
            Action::Enter => self.enter(),
            Action::Tab => self.indent(),
            Action::BackTab => self.backtab(),
            Action::Backspace => self.backspace(),
            Action::Delete => self.delete(),
            Action::ToggleInsert => self.toggle_insert_mode(),
            Action::Escape => {
                if self.selection().is_none() {
                    return Handled::No;
                }
                let cursor = self.cursor();
                self.set_cursor(cursor);
            }
            Action::Copy => {
                self.copy(ctx.clipboard);
            }
            Action::Cut => {
                self.cut(ctx.clipboard);
            }
            Action::Paste => self.paste(ctx.clipboard),
            Action::Undo => {
                if !self.undo() {
                    ctx.set_status("nothing to undo");
                }
            }
            Action::Find => {
                let Some(opts) = ctx.prompt.find_options(ctx.find) else {
                    return Handled::Yes;
                };
                *ctx.find = opts.clone();
                run_find(self, &opts, ctx);
            }
            Action::FindNext => {
                if ctx.find.find.is_empty() {
                    return Handled::No;
                }
                let opts = FindOptions {
                    action: FindAction::Find,
                    ..ctx.find.clone()
                };
                run_find(self, &opts, ctx);
            }
            Action::FileNew => self.new_document(),
            Action::FileOpen => {
                let Some(path) = ctx.prompt.open_path() else {
                    return Handled::Yes;
                };
                match Document::open(&path, ctx.tab_width) {
                    Ok(doc) => self.open_document(doc),
                    Err(e) => {
                        warn!(target: "actions.dispatch", error = %e, "open_failed");
                        ctx.set_status(e.to_string());
                    }
                }
            }
            Action::FileSave => save(self, ctx, false),
            Action::FileSaveAs => save(self, ctx, true),
            Action::CloseTab => match self.close_tab(ctx.prompt) {
                Ok(_) => {}
                Err(e) => {
                    warn!(target: "actions.dispatch", error = %e, "close_failed");
                    ctx.set_status(e.to_string());
                }
            },
            Action::NextTab => self.next_tab(),
            Action::PrevTab => self.prev_tab(),
            Action::NextError
            | Action::NextView
            | Action::ToggleOutput
            | Action::FileExit
            | Action::MacroRecord
            | Action::MacroPlay => return Handled::No,
        }
        Handled::Yes
    }
}

fn run_find(view: &mut View, opts: &FindOptions, ctx: &mut ActionContext<'_>) {
    match view.find_replace(opts) {
        Ok(0) => ctx.set_status(format!("`{}` not found", opts.find)),
        Ok(n) if opts.action == FindAction::ReplaceAll => ctx.set_status(format!("{n} replaced")),
        Ok(_) => {}
        Err(e) => ctx.set_status(e.to_string()),
    }
}

/// Save the active document. Untitled documents, and every document when
/// `ask` is set, are saved to a path from the prompt.
fn save(view: &mut View, ctx: &mut ActionContext<'_>, ask: bool) {
    let result = if !ask && view.doc().path().is_some() {
        view.save(None)
    } else {
        let title = view.doc().title();
        let Some(path) = ctx.prompt.save_path(&title) else {
            return;
        };
        view.save(Some(path.as_path()))
    };
    match result {
        Ok(()) => {
            debug!(target: "actions.dispatch", title = %view.doc().title(), "saved");
            ctx.set_status(format!("saved {}", view.doc().title()));
        }
        Err(e) => {
            warn!(target: "actions.dispatch", error = %e, "save_failed");
            ctx.set_status(e.to_string());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatch::test_support::ScriptedPrompt;
    use core_model::{Clipboard, MemoryClipboard, Motion, SaveChoice};
    use core_render::{DockedWindow, WindowId};
    use core_text::{Point, Rect};
    use pretty_assertions::assert_eq;

    fn view(text: &str) -> View {
        let mut v = View::with_document(WindowId(1), Point::origin(), Document::from_text(text, 4));
        v.set_rect(Rect::new(0, 0, 40, 10));
        v
    }

    fn lines(v: &View) -> Vec<String> {
        v.doc().rows().map(|l| l.logical_text().to_string()).collect()
    }

    struct Fixture {
        clip: MemoryClipboard,
        prompt: ScriptedPrompt,
        find: FindOptions,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                clip: MemoryClipboard::new(),
                prompt: ScriptedPrompt::default(),
                find: FindOptions::default(),
            }
        }

        fn run(&mut self, v: &mut View, actions: &[Action]) -> Option<String> {
            let mut ctx = ActionContext::new(&mut self.clip, &mut self.prompt, &mut self.find, 4);
            for a in actions {
                v.handle_action(a, &mut ctx);
            }
            ctx.status
        }
    }

    #[test]
    fn typing_and_motions() {
        let mut v = view("");
        let mut fx = Fixture::new();
        fx.run(
            &mut v,
            &[
                Action::InsertChar('a'),
                Action::InsertChar('b'),
                Action::Move(Motion::Left),
                Action::Enter,
            ],
        );
        assert_eq!(lines(&v), vec!["a", "b"]);
    }

    #[test]
    fn select_copy_paste() {
        let mut v = view("word rest");
        let mut fx = Fixture::new();
        fx.run(
            &mut v,
            &[
                Action::Select(Motion::WordRight),
                Action::Copy,
                Action::Move(Motion::End),
                Action::Paste,
            ],
        );
        assert_eq!(fx.clip.paste(), "word");
        assert_eq!(lines(&v), vec!["word restword"]);
    }

    #[test]
    fn escape_collapses_selection_only_when_present() {
        let mut v = view("abc");
        let mut fx = Fixture::new();
        let mut ctx = ActionContext::new(&mut fx.clip, &mut fx.prompt, &mut fx.find, 4);
        assert_eq!(v.handle_action(&Action::Escape, &mut ctx), Handled::No);
        v.handle_action(&Action::Select(Motion::End), &mut ctx);
        assert_eq!(v.handle_action(&Action::Escape, &mut ctx), Handled::Yes);
        assert_eq!(v.selection(), None);
        assert_eq!(v.cursor(), Point::new(3, 0));
    }

    #[test]
    fn find_then_find_next_reuses_options() {
        let mut v = view("ab ab ab");
        let mut fx = Fixture::new();
        fx.prompt.find = Some(FindOptions::find("ab"));
        fx.run(&mut v, &[Action::Find, Action::FindNext]);
        assert_eq!(v.cursor(), Point::new(5, 0));
        assert_eq!(fx.find.find, "ab");
    }

    #[test]
    fn find_reports_missing_text() {
        let mut v = view("abc");
        let mut fx = Fixture::new();
        fx.prompt.find = Some(FindOptions::find("zzz"));
        let status = fx.run(&mut v, &[Action::Find]);
        assert_eq!(status.as_deref(), Some("`zzz` not found"));
    }

    #[test]
    fn save_untitled_asks_for_a_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.txt");
        let mut v = view("");
        let mut fx = Fixture::new();
        fx.prompt.save_as = Some(path.clone());
        fx.run(&mut v, &[Action::InsertChar('z'), Action::FileSave]);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "z");
        assert!(!v.doc().is_modified());
        assert_eq!(v.doc().path(), Some(path.as_path()));
    }

    #[test]
    fn save_as_moves_a_titled_document() {
        let dir = tempfile::tempdir().unwrap();
        let first = dir.path().join("a.txt");
        let second = dir.path().join("b.txt");
        std::fs::write(&first, "one").unwrap();
        let mut v = view("");
        v.open_document(Document::open(&first, 4).unwrap());
        let mut fx = Fixture::new();
        fx.prompt.save_as = Some(second.clone());
        let status = fx.run(&mut v, &[Action::FileSaveAs]);
        assert_eq!(std::fs::read_to_string(&second).unwrap(), "one");
        assert_eq!(v.doc().path(), Some(second.as_path()));
        assert_eq!(status.as_deref(), Some("saved b.txt"));

        // cancelling the path question leaves the document alone
        let status = fx.run(&mut v, &[Action::FileSaveAs]);
        assert_eq!(status, None);
        assert_eq!(v.doc().path(), Some(second.as_path()));
    }

    #[test]
    fn close_tab_saves_untitled_through_the_path_prompt() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("kept.txt");
        let mut v = view("");
        let mut fx = Fixture::new();
        fx.prompt.save = Some(SaveChoice::Save);
        fx.prompt.save_as = Some(path.clone());
        let status = fx.run(&mut v, &[Action::InsertChar('k'), Action::CloseTab]);
        assert_eq!(status, None);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "k");
        assert_eq!(v.tab_count(), 1);
        assert!(v.tab().is_pristine());
    }

    #[test]
    fn tab_action_indents_the_selected_rows() {
        let mut v = view("a\nb");
        let mut fx = Fixture::new();
        fx.run(&mut v, &[Action::Select(Motion::DocEnd), Action::Tab]);
        assert_eq!(lines(&v), vec!["\ta", "\tb"]);
    }

    #[test]
    fn open_failure_sets_status() {
        let dir = tempfile::tempdir().unwrap();
        let mut v = view("");
        let mut fx = Fixture::new();
        fx.prompt.open = Some(dir.path().join("missing.txt"));
        let status = fx.run(&mut v, &[Action::FileOpen]);
        assert!(status.is_some());
        assert_eq!(v.tab_count(), 1);
    }

    #[test]
    fn close_tab_goes_through_the_prompt() {
        let mut v = view("x");
        let mut fx = Fixture::new();
        fx.prompt.save = Some(SaveChoice::Discard);
        fx.run(&mut v, &[Action::FileNew, Action::InsertChar('q'), Action::CloseTab]);
        assert_eq!(fx.prompt.asked, vec!["untitled".to_string()]);
        assert_eq!(v.tab_count(), 1);
        assert_eq!(lines(&v), vec!["x"]);
    }

    #[test]
    fn read_only_view_passes_edits_on() {
        let mut v = view("log");
        v.set_read_only(true);
        let mut fx = Fixture::new();
        let mut ctx = ActionContext::new(&mut fx.clip, &mut fx.prompt, &mut fx.find, 4);
        assert_eq!(v.handle_action(&Action::InsertChar('x'), &mut ctx), Handled::No);
        assert_eq!(v.handle_action(&Action::Move(Motion::End), &mut ctx), Handled::Yes);
        assert_eq!(v.handle_action(&Action::NextError, &mut ctx), Handled::No);
    }
}
