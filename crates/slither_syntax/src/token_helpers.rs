//! Token predicates used by the parser and the lexer's regexp/division decision.
//!
//! Keywords, operators and punctuation are carried as registry ids, so call sites compare ids
//! instead of spellings.

use crate::lexer::{Token, TokenKind};
use slither_core::lang::keywords::KeywordId;
use slither_core::lang::operators::OperatorId;
use slither_core::lang::punctuation::PunctuationId;

impl TokenKind {
    /// Keyword id of a keyword token.
    pub fn keyword_id(&self) -> Option<KeywordId> {
        match self {
            TokenKind::Keyword(id) => Some(*id),
            _ => None,
        }
    }

    /// Whether this is keyword `id`.
    pub fn is_keyword(&self, id: KeywordId) -> bool {
        matches!(self, TokenKind::Keyword(k) if *k == id)
    }

    /// Operator id of an operator token.
    pub fn operator_id(&self) -> Option<OperatorId> {
        match self {
            TokenKind::Operator(id) => Some(*id),
            _ => None,
        }
    }

    /// Whether this is operator `id`.
    pub fn is_operator(&self, id: OperatorId) -> bool {
        matches!(self, TokenKind::Operator(o) if *o == id)
    }

    /// Whether this is punctuation `id`.
    pub fn is_punctuation(&self, id: PunctuationId) -> bool {
        matches!(self, TokenKind::Punctuation(p) if *p == id)
    }

    /// Return the identifier text, if this is a name token.
    pub fn name(&self) -> Option<&str> {
        match self {
            TokenKind::Name(n) => Some(n),
            _ => None,
        }
    }

    /// Return `true` if this token is a synthetic block marker.
    pub fn is_layout(&self) -> bool {
        matches!(self, TokenKind::Indent | TokenKind::Dedent)
    }

    /// Return `true` if a `/` after this token starts a regular expression rather than a division.
    pub fn allows_regexp(&self) -> bool {
        match self {
            TokenKind::Name(_)
            | TokenKind::Number(_)
            | TokenKind::String(_)
            | TokenKind::RegExp { .. }
            | TokenKind::Atom(_) => false,
            TokenKind::Punctuation(p) => !matches!(
                p,
                PunctuationId::RParen | PunctuationId::RBracket | PunctuationId::RBrace
            ),
            TokenKind::Operator(o) => !matches!(o, OperatorId::PlusPlus | OperatorId::MinusMinus),
            _ => true,
        }
    }
}

impl Token {
    pub fn keyword_id(&self) -> Option<KeywordId> {
        self.kind.keyword_id()
    }

    pub fn operator_id(&self) -> Option<OperatorId> {
        self.kind.operator_id()
    }
}
