//! Parser for the Slither programming language
//!
//! Converts source text into a [`Module`] using recursive descent for statements and precedence
//! climbing for expressions. Parsing is single pass and aborts on the first error.
//!
//! ## Examples
//!
//! ```rust
//! use slither_syntax::parser::{self, ParseOptions};
//!
//! let source = "def add(a, b):\n    return a + b\n";
//! let module = parser::parse(source, &ParseOptions::default()).unwrap();
//! assert_eq!(module.body.len(), 1);
//! ```

use crate::ast::*;
use crate::diagnostics::{CompileError, LineIndex, Warning, errors};
use crate::lexer::{FileId, Lexer, Token, TokenKind};
use slither_core::lang::atoms;
use slither_core::lang::helpers::{self, HelperId};
use slither_core::lang::keywords::{self, KeywordId};
use slither_core::lang::operators::{self, Fixity, OperatorId, precedence};
use slither_core::lang::punctuation::PunctuationId;

// NOTE: This module is split across multiple files using `include!` to keep all parser
// methods in the same Rust module (preserving privacy + call patterns) while avoiding
// a single large source file.

include!("parser/core.rs");
include!("parser/helpers.rs");
include!("parser/stmts.rs");
include!("parser/decl.rs");
include!("parser/imports.rs");
include!("parser/expr.rs");
include!("parser/util.rs");
include!("parser/api.rs");
include!("parser/tests.rs");
