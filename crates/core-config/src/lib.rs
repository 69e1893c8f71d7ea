//! Configuration loading and parsing.
//!
//! Parses `tabula.toml` (or an override path supplied by the binary):
//!
//! ```toml
//! [editor]
//! tab_width = 4
//!
//! [colors]
//! text = { fg = 252, bg = 235 }
//! function = { fg = 186, bg = 235 }
//!
//! [keymap]
//! "ctrl+s" = "file_save"
//! "ctrl+q" = ""          # unbind
//! ```
//!
//! Every section is optional. Unknown fields are ignored and a file that fails
//! to parse falls back to defaults, so a broken config never keeps the editor
//! from starting. The raw `tab_width` is retained; the effective value is
//! clamped to `1..=16` by [`Config::apply`], which also builds the
//! [`EditorContext`] handed to the rest of the editor.

pub mod keymap;
pub mod palette;

use std::collections::BTreeMap;
use std::{fs, path::PathBuf};

use anyhow::Result;
use core_text::{DEFAULT_TAB_WIDTH, Point};
use serde::Deserialize;
use tracing::{info, warn};

pub use keymap::Keymap;
pub use palette::{ColorPair, Palette};

pub const CONFIG_FILE_NAME: &str = "tabula.toml";
pub const MIN_TAB_WIDTH: usize = 1;
pub const MAX_TAB_WIDTH: usize = 16;

#[derive(Debug, Deserialize, Clone)]
pub struct EditorConfig {
    #[serde(default = "EditorConfig::default_tab_width")]
    pub tab_width: usize,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            tab_width: Self::default_tab_width(),
        }
    }
}

impl EditorConfig {
    const fn default_tab_width() -> usize {
        DEFAULT_TAB_WIDTH
    }
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct ConfigFile {
    #[serde(default)]
    pub editor: EditorConfig,
    #[serde(default)]
    pub colors: BTreeMap<String, ColorPair>,
    #[serde(default)]
    pub keymap: BTreeMap<String, String>,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub raw: Option<String>,
    pub file: ConfigFile,
    pub effective_tab_width: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            raw: None,
            file: ConfigFile::default(),
            effective_tab_width: DEFAULT_TAB_WIDTH,
        }
    }
}

/// Read-only settings shared by every pane, built once at startup.
#[derive(Debug, Clone)]
pub struct EditorContext {
    pub tab_width: usize,
    pub palette: Palette,
    pub keymap: Keymap,
    /// Terminal size in cells.
    pub terminal: Point,
}

impl Default for EditorContext {
    fn default() -> Self {
        Config::default().apply(Point::new(80, 24))
    }
}

/// Config path: `tabula.toml` in the working directory if present, else the
/// platform config directory (XDG / AppData Roaming).
pub fn discover() -> PathBuf {
    let local = PathBuf::from(CONFIG_FILE_NAME);
    if local.exists() {
        return local;
    }
    if let Some(dir) = dirs::config_dir() {
        return dir.join("tabula").join(CONFIG_FILE_NAME);
    }
    local
}

pub fn load_from(path: Option<PathBuf>) -> Result<Config> {
    let path = path.unwrap_or_else(discover);
    let Ok(content) = fs::read_to_string(&path) else {
        return Ok(Config::default());
    };
    match toml::from_str::<ConfigFile>(&content) {
        Ok(file) => Ok(Config {
            raw: Some(content),
            file,
            effective_tab_width: DEFAULT_TAB_WIDTH,
        }),
        Err(e) => {
            warn!(target: "config", path = %path.display(), error = %e, "config_parse_failed_using_defaults");
            Ok(Config::default())
        }
    }
}

impl Config {
    /// Clamp the tab width into range and return the effective value.
    pub fn effective_tab_width(&mut self) -> usize {
        let raw = self.file.editor.tab_width;
        let clamped = raw.clamp(MIN_TAB_WIDTH, MAX_TAB_WIDTH);
        if clamped != raw {
            info!(
                target: "config",
                raw,
                clamped,
                min = MIN_TAB_WIDTH,
                max = MAX_TAB_WIDTH,
                "tab_width_clamped"
            );
        }
        self.effective_tab_width = clamped;
        clamped
    }

    /// Build the editor context for a terminal of `terminal` cells.
    pub fn apply(mut self, terminal: Point) -> EditorContext {
        let tab_width = self.effective_tab_width();
        EditorContext {
            tab_width,
            palette: Palette::with_overrides(&self.file.colors),
            keymap: Keymap::with_overrides(&self.file.keymap),
            terminal,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_events::KeyEvent;
    use core_text::StyleId;
    use std::io::Write;
    use std::path::PathBuf;
    use std::sync::{Arc, Mutex, MutexGuard};
    use tracing::Level;
    use tracing::subscriber::with_default;
    use tracing_subscriber::fmt::MakeWriter;

    #[derive(Clone)]
    struct BufferWriter {
        inner: Arc<Mutex<Vec<u8>>>,
    }

    impl BufferWriter {
        fn new() -> (Self, Arc<Mutex<Vec<u8>>>) {
            let buf = Arc::new(Mutex::new(Vec::new()));
            (Self { inner: buf.clone() }, buf)
        }
    }

    struct LockedWriter<'a> {
        guard: MutexGuard<'a, Vec<u8>>,
    }

    impl<'a> Write for LockedWriter<'a> {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.guard.extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    impl<'a> MakeWriter<'a> for BufferWriter {
        type Writer = LockedWriter<'a>;

        fn make_writer(&'a self) -> Self::Writer {
            LockedWriter {
                guard: self.inner.lock().expect("log buffer poisoned"),
            }
        }
    }

    fn write_config(body: &str) -> tempfile::NamedTempFile {
        let tmp = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(tmp.path(), body).unwrap();
        tmp
    }

    #[test]
    fn default_config_when_missing_file() {
        let cfg = load_from(Some(PathBuf::from("__nonexistent_hopefully__.toml"))).unwrap();
        assert_eq!(cfg.file.editor.tab_width, 4);
        assert!(cfg.raw.is_none());
    }

    #[test]
    fn parses_tab_width() {
        let tmp = write_config("[editor]\ntab_width = 8\n");
        let cfg = load_from(Some(tmp.path().to_path_buf())).unwrap();
        let ctx = cfg.apply(Point::new(100, 30));
        assert_eq!(ctx.tab_width, 8);
        assert_eq!(ctx.terminal, Point::new(100, 30));
    }

    #[test]
    fn parse_error_falls_back_to_defaults() {
        let tmp = write_config("[editor\ntab_width = = 3");
        let cfg = load_from(Some(tmp.path().to_path_buf())).unwrap();
        assert_eq!(cfg.file.editor.tab_width, 4);
        assert!(cfg.file.keymap.is_empty());
    }

    #[test]
    fn zero_tab_width_clamps_to_one() {
        let tmp = write_config("[editor]\ntab_width = 0\n");
        let mut cfg = load_from(Some(tmp.path().to_path_buf())).unwrap();
        assert_eq!(cfg.effective_tab_width(), 1);
    }

    #[test]
    fn colors_and_keymap_sections_apply() {
        let tmp = write_config(
            "[colors]\ntext = { fg = 1, bg = 2 }\n\n[keymap]\n\"ctrl+k\" = \"cut\"\n",
        );
        let cfg = load_from(Some(tmp.path().to_path_buf())).unwrap();
        let ctx = cfg.apply(Point::new(80, 24));
        assert_eq!(ctx.palette.get(StyleId::TEXT), ColorPair::new(1, 2));
        assert_eq!(ctx.keymap.lookup(&KeyEvent::ctrl('k')), Some("cut"));
        assert_eq!(ctx.keymap.lookup(&KeyEvent::ctrl('s')), Some("file_save"));
    }

    #[test]
    fn clamp_logging_uses_config_target() {
        let tmp = write_config("[editor]\ntab_width = 40\n");
        let mut cfg = load_from(Some(tmp.path().to_path_buf())).unwrap();
        let (writer, buffer) = BufferWriter::new();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(Level::INFO)
            .with_target(true)
            .with_ansi(false)
            .without_time()
            .with_writer(writer)
            .finish();

        let eff = with_default(subscriber, || cfg.effective_tab_width());

        let log_output = String::from_utf8(buffer.lock().unwrap().clone()).unwrap();
        assert!(log_output.contains("INFO config:"));
        assert!(log_output.contains("tab_width_clamped"));
        assert_eq!(eff, MAX_TAB_WIDTH);
        assert_eq!(cfg.effective_tab_width, MAX_TAB_WIDTH);
    }
}
