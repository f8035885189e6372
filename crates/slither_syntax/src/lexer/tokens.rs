//! Token types for the Slither lexer.
//!
//! The lexer uses **registry-backed IDs** for language vocabulary:
//! - `Keyword(KeywordId)` for reserved words
//! - `Operator(OperatorId)` for operators (including word-operators like `and`)
//! - `Punctuation(PunctuationId)` for punctuation tokens
//! - `Atom(AtomId)` for `True`/`False`/`None`
//!
//! ## Notes
//! - Comments never appear as tokens; they ride along on the next token in `comments_before`.
//! - Use `crate::token_helpers` for ergonomic token matching at call sites.

use std::fmt;

use crate::ast::Span;
use slither_core::lang::atoms::{self, AtomId};
use slither_core::lang::keywords::{self, KeywordId};
use slither_core::lang::operators::{self, OperatorId};
use slither_core::lang::punctuation::{self, PunctuationId};

// ============================================================================
// TOKEN TYPES
// ============================================================================

/// Kind of token produced by the lexer.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    // ========== Keyword / operator / punctuation (ID-based) ==========
    Keyword(KeywordId),
    Operator(OperatorId),
    Punctuation(PunctuationId),
    Atom(AtomId),

    // ========== Identifiers and Literals ==========
    Name(String),
    Number(f64),
    String(String),
    RegExp { pattern: String, flags: String },

    // ========== Layout ==========
    /// Synthetic block-open marker.
    Indent,
    /// Synthetic block-close marker.
    Dedent,

    // ========== Special ==========
    Shebang(String),
    Eof,
}

/// Opaque id of the source file a token came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct FileId(pub u32);

/// A positioned token.
///
/// `line` is 1-based and `col` 0-based; `span` holds absolute byte offsets.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
    pub line: usize,
    pub col: usize,
    /// A newline separates this token from the previous one.
    pub nlb: bool,
    pub comments_before: Vec<String>,
    pub file: FileId,
}

impl Token {
    /// Construct a token with no comments at line 1, column 0.
    pub fn new(kind: TokenKind, span: Span) -> Self {
        Self {
            kind,
            span,
            line: 1,
            col: 0,
            nlb: false,
            comments_before: Vec::new(),
            file: FileId::default(),
        }
    }

    pub fn is_eof(&self) -> bool {
        matches!(self.kind, TokenKind::Eof)
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::Keyword(k) => write!(f, "keyword '{}'", keywords::as_str(*k)),
            TokenKind::Operator(o) => write!(f, "operator '{}'", operators::as_str(*o)),
            TokenKind::Punctuation(p) => write!(f, "'{}'", punctuation::as_str(*p)),
            TokenKind::Atom(a) => write!(f, "'{}'", atoms::as_str(*a)),
            TokenKind::Name(n) => write!(f, "name '{n}'"),
            TokenKind::Number(n) => write!(f, "number {n}"),
            TokenKind::String(s) => write!(f, "string {s:?}"),
            TokenKind::RegExp { pattern, flags } => write!(f, "regexp /{pattern}/{flags}"),
            TokenKind::Indent => write!(f, "indent"),
            TokenKind::Dedent => write!(f, "dedent"),
            TokenKind::Shebang(_) => write!(f, "shebang"),
            TokenKind::Eof => write!(f, "end of file"),
        }
    }
}

/// Resolve an identifier spelling to a keyword id, if reserved.
pub fn keyword_id(name: &str) -> Option<KeywordId> {
    keywords::from_str(name)
}
