//! Define the reserved keyword vocabulary for the Slither language.
//!
//! This module is the single source of truth for reserved words: a stable identifier
//! ([`KeywordId`]) plus a const metadata table ([`KEYWORDS`]) that records canonical spellings
//! and categories.
//!
//! ## Notes
//! - Lookup via [`from_str`] is **case-sensitive**.
//! - Word operators (`and`, `or`, `not`, `in`, `is`, ...) are *not* keywords; they live in
//!   [`crate::lang::operators`] and are lexed as operator tokens.
//! - Literal words (`True`, `False`, `None`) live in [`crate::lang::atoms`].
//!
//! ## Examples
//! ```rust
//! use slither_core::lang::keywords::{self, KeywordId};
//!
//! assert_eq!(keywords::from_str("def"), Some(KeywordId::Def));
//! assert_eq!(keywords::from_str("and"), None);
//! ```

/// Stable identifier for every reserved keyword.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeywordId {
    // Control flow / statements
    If,
    Elif,
    Else,
    While,
    Do,
    For,
    Break,
    Continue,
    Return,
    Pass,
    Switch,
    Case,
    Default,
    Try,
    Except,
    Finally,
    Raise,

    // Definitions / declarations
    Def,
    Class,
    Nonlocal,
    Del,
    New,

    // Imports
    Import,
    From,
    As,
}

/// High-level grouping for documentation and tooling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeywordCategory {
    ControlFlow,
    Definition,
    Import,
}

/// Metadata for a keyword.
#[derive(Debug, Clone, Copy)]
pub struct KeywordInfo {
    pub id: KeywordId,
    pub canonical: &'static str,
    pub category: KeywordCategory,
    /// Whether the keyword introduces a statement that ends with a `:` header.
    pub opens_block: bool,
}

/// Registry of all keywords.
pub const KEYWORDS: &[KeywordInfo] = &[
    // Control flow / statements
    info(KeywordId::If, "if", KeywordCategory::ControlFlow, true),
    info(KeywordId::Elif, "elif", KeywordCategory::ControlFlow, true),
    info(KeywordId::Else, "else", KeywordCategory::ControlFlow, true),
    info(KeywordId::While, "while", KeywordCategory::ControlFlow, true),
    info(KeywordId::Do, "do", KeywordCategory::ControlFlow, true),
    info(KeywordId::For, "for", KeywordCategory::ControlFlow, true),
    info(KeywordId::Break, "break", KeywordCategory::ControlFlow, false),
    info(KeywordId::Continue, "continue", KeywordCategory::ControlFlow, false),
    info(KeywordId::Return, "return", KeywordCategory::ControlFlow, false),
    info(KeywordId::Pass, "pass", KeywordCategory::ControlFlow, false),
    info(KeywordId::Switch, "switch", KeywordCategory::ControlFlow, true),
    info(KeywordId::Case, "case", KeywordCategory::ControlFlow, true),
    info(KeywordId::Default, "default", KeywordCategory::ControlFlow, true),
    info(KeywordId::Try, "try", KeywordCategory::ControlFlow, true),
    info(KeywordId::Except, "except", KeywordCategory::ControlFlow, true),
    info(KeywordId::Finally, "finally", KeywordCategory::ControlFlow, true),
    info(KeywordId::Raise, "raise", KeywordCategory::ControlFlow, false),
    // Definitions / declarations
    info(KeywordId::Def, "def", KeywordCategory::Definition, true),
    info(KeywordId::Class, "class", KeywordCategory::Definition, true),
    info(KeywordId::Nonlocal, "nonlocal", KeywordCategory::Definition, false),
    info(KeywordId::Del, "del", KeywordCategory::Definition, false),
    info(KeywordId::New, "new", KeywordCategory::Definition, false),
    // Imports
    info(KeywordId::Import, "import", KeywordCategory::Import, false),
    info(KeywordId::From, "from", KeywordCategory::Import, false),
    info(KeywordId::As, "as", KeywordCategory::Import, false),
];

/// Canonical spelling.
pub fn as_str(id: KeywordId) -> &'static str {
    info_for(id).canonical
}

/// Category.
pub fn category(id: KeywordId) -> KeywordCategory {
    info_for(id).category
}

/// Full metadata.
///
/// ## Panics
/// - If the registry is missing an entry for `id` (this indicates a programming error).
pub fn info_for(id: KeywordId) -> &'static KeywordInfo {
    KEYWORDS.iter().find(|k| k.id == id).expect("keyword info missing")
}

/// Lookup by spelling.
///
/// ## Returns
/// - `Some(KeywordId)` if the spelling is a reserved keyword.
/// - `None` otherwise (including word operators and atoms).
pub fn from_str(s: &str) -> Option<KeywordId> {
    KEYWORDS.iter().find(|k| k.canonical == s).map(|k| k.id)
}

// --- helpers -----------------------------------------------------------------

const fn info(id: KeywordId, canonical: &'static str, category: KeywordCategory, opens_block: bool) -> KeywordInfo {
    KeywordInfo {
        id,
        canonical,
        category,
        opens_block,
    }
}
