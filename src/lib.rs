#![forbid(unsafe_code)]
//! Slither Programming Language Compiler
//!
//! Slither is a Python-like, indentation-sensitive language that compiles to JavaScript. This
//! crate provides the compiler: frontend (module resolution, scope analysis on top of the
//! `slither_syntax` lexer and parser), backend (JavaScript generation) and the CLI.
//!
//! ## Panic Policy
//!
//! This codebase follows explicit error handling:
//!
//! - **Production code**: Use `Result` or `Option` with `?` / `ok_or` / `map_err`. The `cli` and `backend` modules
//!   enforce `#![deny(clippy::unwrap_used)]`.
//!
//! - **Test code**: `.unwrap()` and `.expect()` are acceptable in tests.
//!
//! - **True invariants**: If a panic represents a compiler bug (logic error), use `.expect("INVARIANT: reason")` with a
//!   clear explanation.
//!
//! ## Examples
//! ```rust
//! use slither::{CompileOptions, compile};
//!
//! let out = compile("x = a // b\n", &CompileOptions::default()).unwrap();
//! assert_eq!(out.code, "var x;x=Math.floor(a/b)");
//! ```

pub mod backend;
pub mod cli;
pub mod compile;
pub mod frontend;

pub use frontend::ast;
pub use frontend::diagnostics;
pub use frontend::lexer;
pub use frontend::parser;

pub use compile::{CompileOptions, CompileOutput, Compiler, compile};
