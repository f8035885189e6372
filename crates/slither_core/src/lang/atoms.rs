//! Atom vocabulary: reserved literal words.
//!
//! Atoms lex as their own token kind (neither names nor keywords) and print as a fixed
//! JavaScript spelling.
//!
//! ## Examples
//! ```rust
//! use slither_core::lang::atoms::{self, AtomId};
//!
//! assert_eq!(atoms::from_str("None"), Some(AtomId::None));
//! assert_eq!(atoms::js_spelling(AtomId::None), "null");
//! ```

/// Stable identifier for every atom.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AtomId {
    True,
    False,
    None,
}

/// Metadata for an atom.
#[derive(Debug, Clone, Copy)]
pub struct AtomInfo {
    pub id: AtomId,
    pub canonical: &'static str,
    pub js: &'static str,
}

/// Registry of all atoms.
pub const ATOMS: &[AtomInfo] = &[
    AtomInfo {
        id: AtomId::True,
        canonical: "True",
        js: "true",
    },
    AtomInfo {
        id: AtomId::False,
        canonical: "False",
        js: "false",
    },
    AtomInfo {
        id: AtomId::None,
        canonical: "None",
        js: "null",
    },
];

/// Canonical (source) spelling.
pub fn as_str(id: AtomId) -> &'static str {
    info_for(id).canonical
}

/// JavaScript spelling emitted by the generator.
pub fn js_spelling(id: AtomId) -> &'static str {
    info_for(id).js
}

/// Full metadata.
///
/// ## Panics
/// - If the registry is missing an entry for `id` (this indicates a programming error).
pub fn info_for(id: AtomId) -> &'static AtomInfo {
    ATOMS.iter().find(|a| a.id == id).expect("atom info missing")
}

/// Lookup by source spelling.
pub fn from_str(s: &str) -> Option<AtomId> {
    ATOMS.iter().find(|a| a.canonical == s).map(|a| a.id)
}
