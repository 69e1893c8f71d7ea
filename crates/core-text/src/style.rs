/// Palette slot attached to every token and written cell. The terminal layer
/// resolves ids to colors through the configured palette.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct StyleId(pub u16);

impl StyleId {
    /// Background / padding cells.
    pub const BACKGROUND: StyleId = StyleId(0);
    pub const TEXT: StyleId = StyleId(1);
    pub const SELECTION: StyleId = StyleId(2);
    pub const FOCUS: StyleId = StyleId(3);
    pub const BORDER: StyleId = StyleId(4);
    pub const BORDER_FOCUS: StyleId = StyleId(5);
    pub const TITLE: StyleId = StyleId(6);
    pub const ERROR: StyleId = StyleId(7);
    /// First id reserved for semantic token types reported by a highlighter.
    pub const SEMANTIC_BASE: u16 = 16;
    pub const SEMANTIC_COUNT: u16 = 15;

    /// Style for semantic token type `kind`; kinds past the reserved block
    /// fall back to plain text.
    pub fn semantic(kind: u16) -> StyleId {
        if kind < Self::SEMANTIC_COUNT {
            StyleId(Self::SEMANTIC_BASE + kind)
        } else {
            StyleId::TEXT
        }
    }

    pub fn is_semantic(self) -> bool {
        (Self::SEMANTIC_BASE..Self::SEMANTIC_BASE + Self::SEMANTIC_COUNT).contains(&self.0)
    }

    /// Style for a semantic token type name as reported by a language server.
    pub fn semantic_named(name: &str) -> Option<StyleId> {
        SEMANTIC_TYPES
            .iter()
            .position(|t| *t == name)
            .map(|i| StyleId::semantic(i as u16))
    }

    /// Resolve a palette key: a number, a base style name or a semantic type
    /// name.
    pub fn from_name(name: &str) -> Option<StyleId> {
        if let Ok(n) = name.parse::<u16>() {
            return Some(StyleId(n));
        }
        let base = match name {
            "background" => StyleId::BACKGROUND,
            "text" => StyleId::TEXT,
            "selection" => StyleId::SELECTION,
            "focus" => StyleId::FOCUS,
            "border" => StyleId::BORDER,
            "border_focus" => StyleId::BORDER_FOCUS,
            "title" => StyleId::TITLE,
            "error" => StyleId::ERROR,
            other => return Self::semantic_named(other),
        };
        Some(base)
    }
}

/// Semantic token types in palette order.
pub const SEMANTIC_TYPES: [&str; StyleId::SEMANTIC_COUNT as usize] = [
    "class",
    "comment",
    "concept",
    "dependent",
    "enum",
    "enumMember",
    "function",
    "macro",
    "method",
    "namespace",
    "parameter",
    "property",
    "type",
    "typeParameter",
    "variable",
];

/// Overlay range on one line: `len` logical characters from `col` drawn
/// with `style`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Highlight {
    pub col: usize,
    pub len: usize,
    pub style: StyleId,
}

impl Highlight {
    pub fn new(col: usize, len: usize, style: StyleId) -> Self {
        Self { col, len, style }
    }

    pub fn end(&self) -> usize {
        self.col + self.len
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn semantic_ids_stay_in_reserved_block() {
        assert_eq!(StyleId::semantic(0), StyleId(16));
        assert!(StyleId::semantic(14).is_semantic());
        assert_eq!(StyleId::semantic(99), StyleId::TEXT);
        assert!(!StyleId::TEXT.is_semantic());
    }

    #[test]
    fn names_resolve_to_ids() {
        assert_eq!(StyleId::from_name("selection"), Some(StyleId::SELECTION));
        assert_eq!(StyleId::from_name("12"), Some(StyleId(12)));
        assert_eq!(StyleId::from_name("function"), Some(StyleId(22)));
        assert_eq!(StyleId::semantic_named("variable"), Some(StyleId(30)));
        assert_eq!(StyleId::from_name("nope"), None);
    }
}
