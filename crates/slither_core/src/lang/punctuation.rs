//! Punctuation vocabulary.
//!
//! This module defines the non-operator punctuation tokens used by the lexer/parser: delimiters,
//! separators and the member-access dot.
//!
//! ## Notes
//! - Lookup via [`from_str`] / [`from_char`] is exact.
//! - Every punctuation token is a single character.
//!
//! ## Examples
//! ```rust
//! use slither_core::lang::punctuation::{self, PunctuationId};
//!
//! assert_eq!(punctuation::from_char(':'), Some(PunctuationId::Colon));
//! assert_eq!(punctuation::as_str(PunctuationId::LBrace), "{");
//! assert_eq!(punctuation::closing_for(PunctuationId::LParen), Some(PunctuationId::RParen));
//! ```

/// Broad syntactic grouping for punctuation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PunctuationCategory {
    /// Brackets and braces.
    Delimiter,
    /// Separators like `,`, `:` and `;`.
    Separator,
    /// Member access.
    Access,
}

/// Stable identifier for punctuation tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PunctuationId {
    Comma,
    Colon,
    Semicolon,
    Dot,
    LParen,
    RParen,
    LBracket,
    RBracket,
    LBrace,
    RBrace,
}

/// Metadata for a punctuation token.
#[derive(Debug, Clone, Copy)]
pub struct PunctuationInfo {
    pub id: PunctuationId,
    pub canonical: char,
    pub category: PunctuationCategory,
}

/// Registry of all punctuation tokens.
pub const PUNCTUATION: &[PunctuationInfo] = &[
    info(PunctuationId::Comma, ',', PunctuationCategory::Separator),
    info(PunctuationId::Colon, ':', PunctuationCategory::Separator),
    info(PunctuationId::Semicolon, ';', PunctuationCategory::Separator),
    info(PunctuationId::Dot, '.', PunctuationCategory::Access),
    info(PunctuationId::LParen, '(', PunctuationCategory::Delimiter),
    info(PunctuationId::RParen, ')', PunctuationCategory::Delimiter),
    info(PunctuationId::LBracket, '[', PunctuationCategory::Delimiter),
    info(PunctuationId::RBracket, ']', PunctuationCategory::Delimiter),
    info(PunctuationId::LBrace, '{', PunctuationCategory::Delimiter),
    info(PunctuationId::RBrace, '}', PunctuationCategory::Delimiter),
];

/// Full metadata.
///
/// ## Panics
/// - If the registry is missing an entry for `id` (this indicates a programming error).
pub fn info_for(id: PunctuationId) -> &'static PunctuationInfo {
    PUNCTUATION
        .iter()
        .find(|p| p.id == id)
        .expect("punctuation info missing")
}

/// Canonical spelling.
pub fn as_str(id: PunctuationId) -> &'static str {
    match id {
        PunctuationId::Comma => ",",
        PunctuationId::Colon => ":",
        PunctuationId::Semicolon => ";",
        PunctuationId::Dot => ".",
        PunctuationId::LParen => "(",
        PunctuationId::RParen => ")",
        PunctuationId::LBracket => "[",
        PunctuationId::RBracket => "]",
        PunctuationId::LBrace => "{",
        PunctuationId::RBrace => "}",
    }
}

/// Lookup by character.
pub fn from_char(c: char) -> Option<PunctuationId> {
    PUNCTUATION.iter().find(|p| p.canonical == c).map(|p| p.id)
}

/// Lookup by spelling.
pub fn from_str(s: &str) -> Option<PunctuationId> {
    let mut chars = s.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => from_char(c),
        _ => None,
    }
}

/// Return `true` for `(`, `[` and `{`.
pub fn is_opening(id: PunctuationId) -> bool {
    closing_for(id).is_some()
}

/// Return `true` for `)`, `]` and `}`.
pub fn is_closing(id: PunctuationId) -> bool {
    matches!(id, PunctuationId::RParen | PunctuationId::RBracket | PunctuationId::RBrace)
}

/// Matching closer for an opening delimiter.
pub fn closing_for(id: PunctuationId) -> Option<PunctuationId> {
    match id {
        PunctuationId::LParen => Some(PunctuationId::RParen),
        PunctuationId::LBracket => Some(PunctuationId::RBracket),
        PunctuationId::LBrace => Some(PunctuationId::RBrace),
        _ => None,
    }
}

// --- helpers -----------------------------------------------------------------

const fn info(id: PunctuationId, canonical: char, category: PunctuationCategory) -> PunctuationInfo {
    PunctuationInfo { id, canonical, category }
}
