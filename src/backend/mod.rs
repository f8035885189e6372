//! JavaScript backend
//!
//! Turns analyzed modules into JavaScript text. The pipeline is:
//! 1. [`codegen::generate`] walks the entry module and its dependencies
//! 2. [`output::OutputStream`] writes tokens, deferring semicolons and tracking positions
//! 3. [`position_map::PositionMap`] records generated-to-source mappings when enabled
//!
//! ## Module Organization
//!
//! - `codegen/` - AST walking and per-construct emission
//! - `config.rs` - Output options
//! - `output.rs` - Token-level writer
//! - `parens.rs` - Precedence table for parenthesization
//! - `numbers.rs` - Shortest numeric literal formatting
//! - `baselib.rs` - Runtime helper sources
//! - `position_map.rs` - Version 3 position map encoding

pub mod baselib;
pub mod codegen;
pub mod config;
pub mod numbers;
pub mod output;
pub mod parens;
pub mod position_map;

pub use codegen::{GeneratedCode, ProgramUnit, generate, generate_module};
pub use config::OutputConfig;
pub use position_map::PositionMap;
