//! Shared syntax frontend for the Slither language: lexer, parser, AST, diagnostics.
//!
//! This crate is reused by the compiler and its debugging subcommands (`--lex`, `--parse`).
//!
//! ## Notes
//! - This crate is “syntax-only”: module loading, scope analysis and code generation live in the
//!   root `slither` crate. Imports reach the outside world through [`parser::ImportHook`].
//! - Vocabulary identity (keywords/operators/punctuation/helpers) comes from `slither_core::lang`.
//!
//! ## Examples
//! ```rust
//! use slither_syntax::{lexer, parser};
//!
//! let tokens = lexer::lex("x = 1\n").unwrap();
//! assert_eq!(tokens.len(), 4);
//! let module = parser::parse("x = 1\n", &parser::ParseOptions::default()).unwrap();
//! assert_eq!(module.body.len(), 1);
//! ```

pub mod ast;
pub mod diagnostics;
pub mod lexer;
pub mod parser;
pub mod token_helpers;
