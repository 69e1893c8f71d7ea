use std::collections::{BTreeMap, HashMap};

use core_text::StyleId;
use serde::Deserialize;
use tracing::warn;

/// Foreground / background as ANSI 256-color indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct ColorPair {
    pub fg: u8,
    pub bg: u8,
}

impl ColorPair {
    pub const fn new(fg: u8, bg: u8) -> Self {
        Self { fg, bg }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette {
    colors: HashMap<StyleId, ColorPair>,
}

impl Default for Palette {
    fn default() -> Self {
        let mut colors = HashMap::new();
        colors.insert(StyleId::BACKGROUND, ColorPair::new(7, 0));
        colors.insert(StyleId::TEXT, ColorPair::new(252, 235));
        colors.insert(StyleId::SELECTION, ColorPair::new(235, 110));
        colors.insert(StyleId::FOCUS, ColorPair::new(231, 24));
        colors.insert(StyleId::BORDER, ColorPair::new(244, 235));
        colors.insert(StyleId::BORDER_FOCUS, ColorPair::new(117, 235));
        colors.insert(StyleId::TITLE, ColorPair::new(231, 235));
        colors.insert(StyleId::ERROR, ColorPair::new(196, 235));
        let semantic_fg: [u8; StyleId::SEMANTIC_COUNT as usize] = [
            81, 242, 81, 81, 81, 141, 186, 208, 186, 146, 223, 152, 81, 117, 252,
        ];
        for (i, fg) in semantic_fg.iter().enumerate() {
            colors.insert(StyleId::semantic(i as u16), ColorPair::new(*fg, 235));
        }
        Self { colors }
    }
}

impl Palette {
    /// Defaults overridden by `[colors]` entries keyed by style name or id.
    pub fn with_overrides(overrides: &BTreeMap<String, ColorPair>) -> Self {
        let mut palette = Self::default();
        for (name, pair) in overrides {
            match StyleId::from_name(name) {
                Some(id) => {
                    palette.colors.insert(id, *pair);
                }
                None => warn!(target: "config", name = name.as_str(), "palette_style_unknown"),
            }
        }
        palette
    }

    /// Colors for `style`; unknown styles fall back to plain text.
    pub fn get(&self, style: StyleId) -> ColorPair {
        self.colors
            .get(&style)
            .or_else(|| self.colors.get(&StyleId::TEXT))
            .copied()
            .unwrap_or(ColorPair::new(7, 0))
    }
}
