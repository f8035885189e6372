//! CLI module for the Slither compiler
//!
//! This module provides the command-line interface for the compiler.
//!
//! ## Commands
//!
//! - `build <file>` - Compile to JavaScript (stdout, or `-o <file>`)
//! - `--lex <file>` - Dump tokens (debug)
//! - `--parse <file>` - Dump the AST (debug)
//!
//! ## Design
//!
//! The CLI uses clap for argument parsing with derive macros.
//! Command functions return `CliResult<T>` instead of calling `process::exit`.
//! Only the top-level `run()` function handles errors and exits.

// Enforce explicit error handling - no panicking in production code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

pub mod commands;

use std::fmt;
use std::path::PathBuf;
use std::process;

use clap::{Args, Parser, Subcommand};

use crate::compile::CompileOptions;

// ============================================================================
// CLI Error handling
// ============================================================================

/// Exit code for CLI operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExitCode(pub i32);

impl ExitCode {
    pub const SUCCESS: ExitCode = ExitCode(0);
    pub const FAILURE: ExitCode = ExitCode(1);
}

/// Error type for CLI operations.
///
/// Contains a user-facing message and an exit code. The CLI entry point
/// catches these errors, prints the message, and exits with the code.
#[derive(Debug)]
pub struct CliError {
    /// User-facing error message (already formatted for display)
    pub message: String,
    /// Exit code to return to the shell
    pub exit_code: ExitCode,
}

impl CliError {
    /// Create a new CLI error with a message and exit code.
    pub fn new(message: impl Into<String>, exit_code: ExitCode) -> Self {
        Self {
            message: message.into(),
            exit_code,
        }
    }

    /// Create a failure error (exit code 1).
    pub fn failure(message: impl Into<String>) -> Self {
        Self::new(message, ExitCode::FAILURE)
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

const VERSION: &str = env!("CARGO_PKG_VERSION");

// ============================================================================
// Clap CLI definition
// ============================================================================

/// The Slither compiler: Python-like source in, JavaScript out
#[derive(Parser, Debug)]
#[command(name = "slither")]
#[command(version = VERSION)]
#[command(about = "Compile Slither sources to JavaScript", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    // Debug/development flags
    /// Tokenize only (debug)
    #[arg(long = "lex", value_name = "FILE")]
    pub lex_file: Option<PathBuf>,

    /// Parse only (debug)
    #[arg(long = "parse", value_name = "FILE", conflicts_with = "lex_file")]
    pub parse_file: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Compile a file to JavaScript
    Build(BuildArgs),
}

/// Flags of `slither build`.
#[derive(Args, Debug, Clone)]
pub struct BuildArgs {
    /// Source file to compile
    #[arg(value_name = "FILE")]
    pub file: PathBuf,
    /// Output file (default: stdout)
    #[arg(short = 'o', long = "output", value_name = "OUT")]
    pub output: Option<PathBuf>,
    /// Indent and space the output for reading
    #[arg(long)]
    pub beautify: bool,
    /// Compile every module in strict mode
    #[arg(long)]
    pub strict: bool,
    /// Bind methods to their instance in constructors
    #[arg(long = "auto-bind")]
    pub auto_bind: bool,
    /// Leave runtime helpers out of the output
    #[arg(long = "omit-baselib")]
    pub omit_baselib: bool,
    /// Escape non-ASCII characters in names and strings
    #[arg(long = "ascii-only")]
    pub ascii_only: bool,
    /// Break compact output after a statement once a line exceeds N columns
    #[arg(long = "max-line-len", value_name = "N")]
    pub max_line_len: Option<usize>,
    /// Keep leading `#` comments as `//` comments
    #[arg(long)]
    pub comments: bool,
    /// Write a position map next to the output (`<OUT>.map`)
    #[arg(long = "source-map", requires = "output")]
    pub source_map: bool,
    /// Additional import search directory (repeatable)
    #[arg(short = 'I', long = "lib-dir", value_name = "DIR")]
    pub lib_dirs: Vec<PathBuf>,
}

impl BuildArgs {
    /// Compile options for these flags; imports are searched next to the entry file first.
    pub fn compile_options(&self) -> CompileOptions {
        let base_dir = self
            .file
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("."));
        let mut options = CompileOptions::default()
            .with_filename(self.file.display().to_string())
            .with_base_dir(base_dir)
            .with_beautify(self.beautify)
            .with_strict(self.strict)
            .with_auto_bind(self.auto_bind)
            .with_omit_baselib(self.omit_baselib)
            .with_ascii_only(self.ascii_only)
            .with_comments(self.comments)
            .with_source_map(self.source_map);
        if let Some(len) = self.max_line_len {
            options = options.with_max_line_len(len);
        }
        for dir in &self.lib_dirs {
            options = options.with_lib_dir(dir.clone());
        }
        options
    }
}

// ============================================================================
// CLI entry point
// ============================================================================

/// Main CLI entry point.
///
/// This is the only place where `process::exit` is called. All command
/// implementations return `CliResult` and errors are handled here.
pub fn run() {
    let cli = Cli::parse();

    match execute(cli) {
        Ok(exit_code) => {
            if exit_code.0 != 0 {
                process::exit(exit_code.0);
            }
        }
        Err(e) => {
            if !e.message.is_empty() {
                eprintln!("{}", e.message);
            }
            process::exit(e.exit_code.0);
        }
    }
}

/// Execute the CLI command and return result.
fn execute(cli: Cli) -> CliResult<ExitCode> {
    // Handle debug flags first
    if let Some(file) = cli.lex_file {
        return commands::lex_file(&file);
    }
    if let Some(file) = cli.parse_file {
        return commands::parse_file(&file);
    }

    match cli.command {
        Some(Command::Build(args)) => commands::build_file(&args),
        // No command - show help
        None => Err(CliError::failure("Usage: slither build <FILE> (see --help)")),
    }
}

// ============================================================================
// Tests
// ============================================================================
