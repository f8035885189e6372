//! Slither Compiler Frontend
//!
//! This module contains all frontend components:
//! - `lexer`: tokenization of source code
//! - `parser`: parsing source into an AST
//! - `ast`: abstract syntax tree definitions and visitors
//! - `diagnostics`: structured errors and warnings
//! - `module`: module loading, caching and import-cycle detection
//! - `scope`: hoisted variables, callables and exports per scope

// Syntax components are provided by the shared slither_syntax crate.
pub use slither_syntax::{ast, diagnostics, lexer, parser};

// Compiler-specific pieces remain local.
pub mod module;
pub mod scope;
