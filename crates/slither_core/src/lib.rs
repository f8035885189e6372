//! Provide the canonical language vocabulary for the Slither compiler.
//!
//! This crate is intentionally small and dependency-free. The lexer, parser and code generator all
//! consult the same tables, so spellings, precedence levels and runtime-helper names live in exactly
//! one place.
//!
//! ## Notes
//!
//! - This is a “vocabulary” crate: **no IO**, no global state, and no AST types.
//! - Registries are `const` tables keyed by stable ids (`KeywordId`, `OperatorId`, `HelperId`, ...).

pub mod lang;
