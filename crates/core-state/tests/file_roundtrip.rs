//! Load / save behavior against real files.

use core_state::{Document, DocumentError};
use core_text::Cursor;
use pretty_assertions::assert_eq;
use std::io::Write;

fn rows(doc: &Document) -> Vec<String> {
    doc.rows().map(|l| l.logical_text().to_string()).collect()
}

#[test]
fn load_strips_terminators_and_save_joins_with_lf() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("sample.txt");
    {
        let mut f = std::fs::File::create(&path).unwrap();
        write!(f, "line1\r\nline2\nline3\r\n").unwrap();
    }
    let mut doc = Document::open(&path, 4).unwrap();
    assert_eq!(rows(&doc), vec!["line1", "line2", "line3"]);
    assert!(!doc.is_modified());
    assert_eq!(doc.path(), Some(path.as_path()));

    let out = dir.path().join("out.txt");
    doc.save(Some(&out)).unwrap();
    assert_eq!(std::fs::read_to_string(&out).unwrap(), "line1\nline2\nline3");
    assert_eq!(doc.path(), Some(out.as_path()));
}

#[test]
fn empty_file_yields_single_empty_line() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("empty.txt");
    std::fs::write(&path, "").unwrap();
    let doc = Document::open(&path, 4).unwrap();
    assert_eq!(doc.row_count(), 1);
    assert_eq!(doc.text(), "");
}

#[test]
fn round_trip_preserves_lines() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("rt.txt");
    let original = "fn main() {\n\tprintln!(\"hi\");\n}\n\n// end";
    std::fs::write(&path, original).unwrap();
    let mut doc = Document::open(&path, 4).unwrap();
    let c = Cursor::origin();
    doc.insert_text(&c, Cursor::new(6, 4), "x");
    doc.save(None).unwrap();
    let reloaded = Document::open(&path, 4).unwrap();
    assert_eq!(rows(&reloaded), rows(&doc));
    assert_eq!(reloaded.text(), "fn main() {\n\tprintln!(\"hi\");\n}\n\n// endx");
}

#[test]
fn missing_file_is_a_load_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = Document::open(dir.path().join("nope.txt"), 4).unwrap_err();
    assert!(matches!(err, DocumentError::Load { .. }));
}

#[test]
fn invalid_utf8_is_a_load_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bin.dat");
    std::fs::write(&path, [0x66, 0xff, 0xfe, 0x0a]).unwrap();
    assert!(matches!(
        Document::open(&path, 4),
        Err(DocumentError::Load { .. })
    ));
}

#[test]
fn save_without_path_fails() {
    let mut doc = Document::from_text("x", 4);
    assert!(matches!(doc.save(None), Err(DocumentError::NoPath)));
}

#[test]
fn unmodified_save_to_current_path_is_noop() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("keep.txt");
    std::fs::write(&path, "a\nb\n").unwrap();
    let mut doc = Document::open(&path, 4).unwrap();
    doc.save(None).unwrap();
    // file untouched: trailing newline still present
    assert_eq!(std::fs::read_to_string(&path).unwrap(), "a\nb\n");
}

#[test]
fn save_failure_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let mut doc = Document::from_text("x", 4);
    let target = dir.path().join("missing-dir").join("f.txt");
    assert!(matches!(
        doc.save(Some(&target)),
        Err(DocumentError::Save { .. })
    ));
    assert!(doc.path().is_none());
}
