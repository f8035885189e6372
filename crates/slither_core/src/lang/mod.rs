//! Slither language vocabulary registries.
//!
//! This module is the “front door” for language-level vocabulary: reserved keywords, atoms,
//! operators, punctuation and the runtime helper library ("baselib") keys.
//!
//! The design goal is to avoid stringly-typed checks scattered across the compiler.
//! Callers work with **stable IDs** (e.g. `KeywordId`, `OperatorId`) and look up
//! spellings/metadata via registry tables.
//!
//! ## Examples
//! ```rust
//! use slither_core::lang::keywords::{self, KeywordId};
//!
//! assert_eq!(keywords::from_str("elif"), Some(KeywordId::Elif));
//! assert_eq!(keywords::as_str(KeywordId::Elif), "elif");
//! ```

pub mod atoms;
pub mod helpers;
pub mod keywords;
pub mod operators;
pub mod punctuation;
