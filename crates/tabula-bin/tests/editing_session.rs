use core_config::EditorContext;
use core_events::{ExternalMessage, KeyCode, KeyEvent};
use core_terminal::MemoryScreen;
use core_text::{Highlight, StyleId};
use pretty_assertions::assert_eq;
use tabula::App;

fn app_with_keys(keys: &[&str]) -> App<MemoryScreen> {
    let mut screen = MemoryScreen::new(50, 20);
    for k in keys {
        screen.push_key(k.parse().unwrap());
    }
    App::new(screen, EditorContext::default()).unwrap()
}

fn pump(app: &mut App<MemoryScreen>, n: usize) {
    for _ in 0..n {
        app.tick().unwrap();
    }
}

#[test]
fn edit_and_save_an_existing_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("notes.txt");
    std::fs::write(&path, "alpha\nbeta\n").unwrap();

    let mut app = app_with_keys(&["ctrl+end", "!", "ctrl+s"]);
    app.open_file(&path);
    pump(&mut app, 3);

    assert_eq!(std::fs::read_to_string(&path).unwrap(), "alpha\nbeta!");
    assert!(!app.main_view().doc().is_modified());
    assert_eq!(app.status(), Some("saved notes.txt"));
}

#[test]
fn save_as_through_the_status_prompt() {
    let dir = tempfile::tempdir().unwrap();
    let target = dir.path().join("out.txt");
    let mut screen = MemoryScreen::new(50, 20);
    for k in ["o", "k", "ctrl+s"] {
        screen.push_key(k.parse().unwrap());
    }
    for c in target.display().to_string().chars() {
        screen.push_key(KeyEvent::plain(KeyCode::Char(c)));
    }
    screen.push_key(KeyEvent::plain(KeyCode::Enter));

    let mut app = App::new(screen, EditorContext::default()).unwrap();
    pump(&mut app, 3);
    assert_eq!(std::fs::read_to_string(&target).unwrap(), "ok");
    assert_eq!(app.main_view().doc().path(), Some(target.as_path()));
}

#[test]
fn semantic_highlights_reach_the_screen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("main.rs");
    std::fs::write(&path, "fn main() {}").unwrap();

    let mut app = app_with_keys(&[]);
    app.open_file(&path);
    let keyword = StyleId::semantic(6);
    assert!(app.sender().send(ExternalMessage::SemanticHighlights {
        path: path.clone(),
        row: 0,
        ranges: vec![Highlight::new(0, 2, keyword)],
    }));
    // drained after the first frame, drawn by the second
    pump(&mut app, 2);
    assert_eq!(app.screen().style_at(1, 1), Some(keyword));
    assert_eq!(app.screen().style_at(4, 1), Some(StyleId::TEXT));

    // messages for documents that are not open are dropped
    assert!(app.sender().send(ExternalMessage::ClearHighlights {
        path: dir.path().join("other.rs"),
    }));
    pump(&mut app, 2);
    assert_eq!(app.screen().style_at(1, 1), Some(keyword));
}

fn shows_output(app: &App<MemoryScreen>) -> bool {
    (0..20).any(|y| app.screen().row_text(y).contains("Output"))
}

#[test]
fn output_pane_can_be_hidden_and_shown() {
    let mut app = app_with_keys(&["f2", "f2"]);

    pump(&mut app, 1);
    assert!(app.screen().row_text(9).contains("Output"));
    assert!(!app.is_output_visible());

    // the main view takes over the freed rows
    pump(&mut app, 1);
    assert!(!shows_output(&app));
    assert!(app.is_output_visible());

    pump(&mut app, 1);
    assert!(app.screen().row_text(9).contains("Output"));
}
