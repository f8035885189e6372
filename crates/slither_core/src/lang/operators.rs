//! Operator vocabulary.
//!
//! This module defines the canonical operator set (symbol operators like `+` and word operators
//! like `and`) along with precedence, associativity, fixity and the JavaScript spelling the code
//! generator emits.
//!
//! ## Notes
//! - Lookup via [`from_str`] is **case-sensitive**.
//! - Word operators have [`OperatorInfo::is_keyword_spelling`] set; the lexer only treats them as
//!   operators when they are not preceded by a member-access dot.
//! - [`RESERVED_SPELLINGS`] lists spellings the lexer recognises (so greedy scanning stays
//!   consistent) but rejects, because only the generator may produce them.
//!
//! ## Examples
//! ```rust
//! use slither_core::lang::operators::{self, OperatorId, precedence};
//!
//! assert_eq!(operators::from_str("+"), Some(OperatorId::Plus));
//! assert_eq!(operators::info_for(OperatorId::Plus).precedence, precedence::ADDITIVE);
//! assert!(operators::is_reserved("==="));
//! ```

/// Binary precedence levels, lowest to highest. `0` means "not a binary operator".
pub mod precedence {
    pub const NONE: u8 = 0;
    pub const OR: u8 = 1;
    pub const AND: u8 = 2;
    pub const BIT_OR: u8 = 3;
    pub const BIT_XOR: u8 = 4;
    pub const BIT_AND: u8 = 5;
    pub const EQUALITY: u8 = 6;
    pub const RELATIONAL: u8 = 7;
    pub const SHIFT: u8 = 8;
    pub const ADDITIVE: u8 = 9;
    pub const MULTIPLICATIVE: u8 = 10;
    pub const EXPONENT: u8 = 11;
}

/// Define how operators associate when chained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Associativity {
    Left,
    Right,
    None,
}

/// Define the syntactic position(s) an operator may appear in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Fixity {
    /// Binary operator only.
    Infix,
    /// Binary operator that may also be used as a unary prefix (`-x`, `+x`).
    InfixOrPrefix,
    /// Unary prefix only (`not`, `~`, `typeof`, decorator `@`).
    Prefix,
    /// Increment/decrement: prefix or postfix.
    Update,
    /// Assignment (`=`, `+=`, ...).
    Assign,
}

/// Stable identifier for every operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperatorId {
    // Arithmetic
    Plus,
    Minus,
    Star,
    StarStar,
    Slash,
    SlashSlash,
    Percent,

    // Bitwise
    Amp,
    Pipe,
    Caret,
    Tilde,
    Shl,
    Shr,
    UShr,

    // Comparison
    EqEq,
    NotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,

    // Update / markers
    PlusPlus,
    MinusMinus,
    At,

    // Assignment
    Assign,
    PlusEq,
    MinusEq,
    StarEq,
    StarStarEq,
    SlashEq,
    SlashSlashEq,
    PercentEq,
    AmpEq,
    PipeEq,
    CaretEq,
    ShlEq,
    ShrEq,
    UShrEq,

    // Word operators
    And,
    Or,
    Not,
    In,
    Is,
    InstanceOf,
    TypeOf,
}

/// Metadata for an operator.
///
/// ## Notes
/// - `precedence` is one of the [`precedence`] levels; higher binds tighter.
/// - `js` is the spelling emitted for the operator when it maps one-to-one onto JavaScript; `None`
///   means the generator lowers it to a call (`//`, `**`, `in`).
#[derive(Debug, Clone, Copy)]
pub struct OperatorInfo {
    pub id: OperatorId,
    pub spelling: &'static str,
    pub precedence: u8,
    pub associativity: Associativity,
    pub fixity: Fixity,
    pub is_keyword_spelling: bool,
    pub js: Option<&'static str>,
}

/// Registry of all operators.
pub const OPERATORS: &[OperatorInfo] = &[
    // Arithmetic
    bin(OperatorId::Plus, "+", precedence::ADDITIVE, Fixity::InfixOrPrefix, "+"),
    bin(OperatorId::Minus, "-", precedence::ADDITIVE, Fixity::InfixOrPrefix, "-"),
    bin(OperatorId::Star, "*", precedence::MULTIPLICATIVE, Fixity::Infix, "*"),
    OperatorInfo {
        id: OperatorId::StarStar,
        spelling: "**",
        precedence: precedence::EXPONENT,
        associativity: Associativity::Right,
        fixity: Fixity::Infix,
        is_keyword_spelling: false,
        js: None,
    },
    bin(OperatorId::Slash, "/", precedence::MULTIPLICATIVE, Fixity::Infix, "/"),
    OperatorInfo {
        id: OperatorId::SlashSlash,
        spelling: "//",
        precedence: precedence::MULTIPLICATIVE,
        associativity: Associativity::Left,
        fixity: Fixity::Infix,
        is_keyword_spelling: false,
        js: None,
    },
    bin(OperatorId::Percent, "%", precedence::MULTIPLICATIVE, Fixity::Infix, "%"),
    // Bitwise
    bin(OperatorId::Amp, "&", precedence::BIT_AND, Fixity::Infix, "&"),
    bin(OperatorId::Pipe, "|", precedence::BIT_OR, Fixity::Infix, "|"),
    bin(OperatorId::Caret, "^", precedence::BIT_XOR, Fixity::Infix, "^"),
    unary(OperatorId::Tilde, "~", Fixity::Prefix, false, "~"),
    bin(OperatorId::Shl, "<<", precedence::SHIFT, Fixity::Infix, "<<"),
    bin(OperatorId::Shr, ">>", precedence::SHIFT, Fixity::Infix, ">>"),
    bin(OperatorId::UShr, ">>>", precedence::SHIFT, Fixity::Infix, ">>>"),
    // Comparison
    bin(OperatorId::EqEq, "==", precedence::EQUALITY, Fixity::Infix, "==="),
    bin(OperatorId::NotEq, "!=", precedence::EQUALITY, Fixity::Infix, "!=="),
    bin(OperatorId::Lt, "<", precedence::RELATIONAL, Fixity::Infix, "<"),
    bin(OperatorId::LtEq, "<=", precedence::RELATIONAL, Fixity::Infix, "<="),
    bin(OperatorId::Gt, ">", precedence::RELATIONAL, Fixity::Infix, ">"),
    bin(OperatorId::GtEq, ">=", precedence::RELATIONAL, Fixity::Infix, ">="),
    // Update / markers
    unary(OperatorId::PlusPlus, "++", Fixity::Update, false, "++"),
    unary(OperatorId::MinusMinus, "--", Fixity::Update, false, "--"),
    unary(OperatorId::At, "@", Fixity::Prefix, false, "@"),
    // Assignment
    assign(OperatorId::Assign, "=", "="),
    assign(OperatorId::PlusEq, "+=", "+="),
    assign(OperatorId::MinusEq, "-=", "-="),
    assign(OperatorId::StarEq, "*=", "*="),
    assign(OperatorId::StarStarEq, "**=", "="),
    assign(OperatorId::SlashEq, "/=", "/="),
    assign(OperatorId::SlashSlashEq, "//=", "="),
    assign(OperatorId::PercentEq, "%=", "%="),
    assign(OperatorId::AmpEq, "&=", "&="),
    assign(OperatorId::PipeEq, "|=", "|="),
    assign(OperatorId::CaretEq, "^=", "^="),
    assign(OperatorId::ShlEq, "<<=", "<<="),
    assign(OperatorId::ShrEq, ">>=", ">>="),
    assign(OperatorId::UShrEq, ">>>=", ">>>="),
    // Word operators (keyword spellings)
    word(OperatorId::And, "and", precedence::AND, Fixity::Infix, Some("&&")),
    word(OperatorId::Or, "or", precedence::OR, Fixity::Infix, Some("||")),
    word(OperatorId::Not, "not", precedence::NONE, Fixity::Prefix, Some("!")),
    word(OperatorId::In, "in", precedence::RELATIONAL, Fixity::Infix, None),
    word(OperatorId::Is, "is", precedence::EQUALITY, Fixity::Infix, Some("===")),
    word(
        OperatorId::InstanceOf,
        "instanceof",
        precedence::RELATIONAL,
        Fixity::Infix,
        Some("instanceof"),
    ),
    word(OperatorId::TypeOf, "typeof", precedence::NONE, Fixity::Prefix, Some("typeof")),
];

/// Spellings that the lexer recognises while scanning greedily but refuses to produce.
///
/// The generator emits these from their surface equivalents (`==`, `!=`, `and`, `or`, `not`).
pub const RESERVED_SPELLINGS: &[&str] = &["===", "!==", "&&", "||", "!"];

/// Characters that may start or continue a symbol operator.
pub const OPERATOR_CHARS: &str = "+-*/%=&|^~<>!@";

/// Return the full metadata entry for an operator.
///
/// ## Panics
/// - If the registry is missing an entry for `id` (this indicates a programming error).
pub fn info_for(id: OperatorId) -> &'static OperatorInfo {
    OPERATORS.iter().find(|o| o.id == id).expect("operator info missing")
}

/// Return the source spelling of an operator.
pub fn as_str(id: OperatorId) -> &'static str {
    info_for(id).spelling
}

/// Binary precedence of an operator ([`precedence::NONE`] for non-binary operators).
pub fn precedence_of(id: OperatorId) -> u8 {
    info_for(id).precedence
}

/// Resolve an operator spelling (symbol or word) to its identifier.
pub fn from_str(spelling: &str) -> Option<OperatorId> {
    OPERATORS.iter().find(|o| o.spelling == spelling).map(|o| o.id)
}

/// Resolve a *word* operator spelling (`and`, `in`, ...).
pub fn word_from_str(spelling: &str) -> Option<OperatorId> {
    OPERATORS
        .iter()
        .find(|o| o.is_keyword_spelling && o.spelling == spelling)
        .map(|o| o.id)
}

/// Return `true` if `spelling` is reserved for generator use.
pub fn is_reserved(spelling: &str) -> bool {
    RESERVED_SPELLINGS.contains(&spelling)
}

/// Return `true` if `candidate` is a known symbol-operator spelling (including reserved ones).
///
/// The lexer uses this to extend an operator greedily one character at a time.
pub fn is_known_symbol(candidate: &str) -> bool {
    is_reserved(candidate)
        || OPERATORS
            .iter()
            .any(|o| !o.is_keyword_spelling && o.spelling == candidate)
}

/// Return `true` if `c` may appear in a symbol operator.
pub fn is_operator_char(c: char) -> bool {
    OPERATOR_CHARS.contains(c)
}

// --- helpers -----------------------------------------------------------------

const fn bin(id: OperatorId, spelling: &'static str, precedence: u8, fixity: Fixity, js: &'static str) -> OperatorInfo {
    OperatorInfo {
        id,
        spelling,
        precedence,
        associativity: Associativity::Left,
        fixity,
        is_keyword_spelling: false,
        js: Some(js),
    }
}

const fn unary(
    id: OperatorId,
    spelling: &'static str,
    fixity: Fixity,
    is_keyword_spelling: bool,
    js: &'static str,
) -> OperatorInfo {
    OperatorInfo {
        id,
        spelling,
        precedence: precedence::NONE,
        associativity: Associativity::Right,
        fixity,
        is_keyword_spelling,
        js: Some(js),
    }
}

const fn assign(id: OperatorId, spelling: &'static str, js: &'static str) -> OperatorInfo {
    OperatorInfo {
        id,
        spelling,
        precedence: precedence::NONE,
        associativity: Associativity::Right,
        fixity: Fixity::Assign,
        is_keyword_spelling: false,
        js: Some(js),
    }
}

const fn word(
    id: OperatorId,
    spelling: &'static str,
    precedence: u8,
    fixity: Fixity,
    js: Option<&'static str>,
) -> OperatorInfo {
    OperatorInfo {
        id,
        spelling,
        precedence,
        associativity: Associativity::Left,
        fixity,
        is_keyword_spelling: true,
        js,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_precedence_orders_or_lowest_exponent_highest() {
        assert!(precedence_of(OperatorId::Or) < precedence_of(OperatorId::And));
        assert!(precedence_of(OperatorId::And) < precedence_of(OperatorId::Pipe));
        assert!(precedence_of(OperatorId::EqEq) < precedence_of(OperatorId::Lt));
        assert!(precedence_of(OperatorId::Plus) < precedence_of(OperatorId::Star));
        assert!(precedence_of(OperatorId::Star) < precedence_of(OperatorId::StarStar));
    }

    #[test]
    fn test_greedy_prefixes_are_known() {
        // Every symbol spelling must be reachable by extending a known prefix one char at a time.
        for o in OPERATORS.iter().filter(|o| !o.is_keyword_spelling) {
            for end in 1..=o.spelling.len() {
                assert!(
                    is_known_symbol(&o.spelling[..end]),
                    "prefix {:?} of {:?} is not a known operator",
                    &o.spelling[..end],
                    o.spelling
                );
            }
        }
    }

    #[test]
    fn test_reserved_spellings() {
        assert!(is_reserved("&&"));
        assert!(is_known_symbol("!=="));
        assert!(!is_reserved("=="));
        assert_eq!(from_str("==="), None);
    }

    #[test]
    fn test_word_lookup() {
        assert_eq!(word_from_str("and"), Some(OperatorId::And));
        assert_eq!(word_from_str("+"), None);
        assert_eq!(info_for(OperatorId::In).js, None);
    }
}
