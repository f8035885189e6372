//! Diagnostics and error reporting for Slither.
//!
//! Fatal conditions are [`CompileError`] values (lexical, syntax and import errors). They abort
//! the current parse: there is no recovery mode. Non-fatal conditions are [`Warning`]s gathered in
//! a [`Diagnostics`] collector that also forwards them to an optional caller-supplied sink.

use std::fmt;

use crate::ast::Span;

/// Error category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed literal, illegal character, bad indentation.
    Lexical,
    /// Token mismatch, invalid assignment target, bad label/loop usage.
    Syntax,
    /// Cyclic import or module not found.
    Import,
}

impl ErrorKind {
    fn code(self) -> &'static str {
        match self {
            ErrorKind::Lexical => "slither::lexical",
            ErrorKind::Syntax => "slither::syntax",
            ErrorKind::Import => "slither::import",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::Lexical => write!(f, "lexical error"),
            ErrorKind::Syntax => write!(f, "syntax error"),
            ErrorKind::Import => write!(f, "import error"),
        }
    }
}

/// A fatal compile error with location information.
///
/// ## Notes
/// - `line` is 1-based, `col` is 0-based, `offset` is the absolute byte offset of the error.
/// - `is_eof` distinguishes "ran out of input" from "unexpected token here".
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{kind}: {message} (line: {line}, col: {col}, pos: {offset})")]
pub struct CompileError {
    pub kind: ErrorKind,
    pub message: String,
    pub file: Option<String>,
    pub line: usize,
    pub col: usize,
    pub offset: usize,
    pub span: Span,
    pub is_eof: bool,
    pub notes: Vec<String>,
    pub hints: Vec<String>,
}

impl CompileError {
    pub fn new(kind: ErrorKind, message: impl Into<String>, span: Span) -> Self {
        Self {
            kind,
            message: message.into(),
            file: None,
            line: 0,
            col: 0,
            offset: span.start,
            span,
            is_eof: false,
            notes: Vec::new(),
            hints: Vec::new(),
        }
    }

    pub fn lexical(message: impl Into<String>, span: Span) -> Self {
        Self::new(ErrorKind::Lexical, message, span)
    }

    pub fn syntax(message: impl Into<String>, span: Span) -> Self {
        Self::new(ErrorKind::Syntax, message, span)
    }

    pub fn import(message: impl Into<String>, span: Span) -> Self {
        Self::new(ErrorKind::Import, message, span)
    }

    /// Attach a 1-based line and 0-based column.
    pub fn at(mut self, line: usize, col: usize) -> Self {
        self.line = line;
        self.col = col;
        self
    }

    /// Attach the source file name, unless one is already set.
    pub fn in_file(mut self, file: impl Into<String>) -> Self {
        if self.file.is_none() {
            self.file = Some(file.into());
        }
        self
    }

    /// Mark the error as "ran out of input".
    pub fn eof(mut self) -> Self {
        self.is_eof = true;
        self
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }

    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hints.push(hint.into());
        self
    }
}

impl miette::Diagnostic for CompileError {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        Some(Box::new(self.kind.code()))
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        if self.hints.is_empty() {
            None
        } else {
            Some(Box::new(self.hints.join("\n")))
        }
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = miette::LabeledSpan> + '_>> {
        let len = self.span.end.saturating_sub(self.span.start);
        let label = miette::LabeledSpan::at(self.span.start..self.span.start + len, self.message.clone());
        Some(Box::new(std::iter::once(label)))
    }
}

// ============================================================================
// Warnings
// ============================================================================

/// A non-fatal diagnostic (unmapped position, unknown import name, ...).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Warning {
    pub message: String,
    pub file: Option<String>,
    pub span: Option<Span>,
}

impl Warning {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            file: None,
            span: None,
        }
    }

    pub fn with_file(mut self, file: impl Into<String>) -> Self {
        self.file = Some(file.into());
        self
    }

    pub fn with_span(mut self, span: Span) -> Self {
        self.span = Some(span);
        self
    }
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "WARN: {}", self.message)?;
        match (&self.file, self.span) {
            (Some(file), Some(span)) => write!(f, " [{file}:{}]", span.start),
            (Some(file), None) => write!(f, " [{file}]"),
            (None, Some(span)) => write!(f, " [pos {}]", span.start),
            (None, None) => Ok(()),
        }
    }
}

/// Callback receiving formatted warning text.
pub type WarningSink = Box<dyn FnMut(&str)>;

/// Collects warnings and forwards each one to an optional sink as it arrives.
#[derive(Default)]
pub struct Diagnostics {
    warnings: Vec<Warning>,
    sink: Option<WarningSink>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a collector that also forwards to `sink`.
    pub fn with_sink(sink: WarningSink) -> Self {
        Self {
            warnings: Vec::new(),
            sink: Some(sink),
        }
    }

    pub fn warn(&mut self, warning: Warning) {
        let text = warning.to_string();
        tracing::warn!("{}", text);
        if let Some(sink) = self.sink.as_mut() {
            sink(&text);
        }
        self.warnings.push(warning);
    }

    pub fn warnings(&self) -> &[Warning] {
        &self.warnings
    }

    pub fn into_warnings(self) -> Vec<Warning> {
        self.warnings
    }
}

impl fmt::Debug for Diagnostics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Diagnostics")
            .field("warnings", &self.warnings)
            .field("sink", &self.sink.is_some())
            .finish()
    }
}

// ============================================================================
// Line index
// ============================================================================

/// Maps byte offsets to (1-based line, 0-based column) pairs.
#[derive(Debug, Clone)]
pub struct LineIndex {
    line_starts: Vec<usize>,
}

impl LineIndex {
    pub fn new(source: &str) -> Self {
        let mut line_starts = vec![0];
        line_starts.extend(source.match_indices('\n').map(|(i, _)| i + 1));
        Self { line_starts }
    }

    /// Line and column for `offset`. Columns count bytes.
    pub fn line_col(&self, offset: usize) -> (usize, usize) {
        let line = match self.line_starts.binary_search(&offset) {
            Ok(i) => i,
            Err(i) => i - 1,
        };
        (line + 1, offset - self.line_starts[line])
    }
}

/// Print an error with source context.
pub fn print_error(source: &str, error: &CompileError) {
    let file_name = error.file.as_deref().unwrap_or("<input>");
    let (line_num, col_num) = if error.line > 0 {
        (error.line, error.col)
    } else {
        LineIndex::new(source).line_col(error.offset.min(source.len()))
    };
    let line_text = source.lines().nth(line_num.saturating_sub(1)).unwrap_or("");

    let red = "\x1b[31m";
    let cyan = "\x1b[36m";
    let bold = "\x1b[1m";
    let reset = "\x1b[0m";

    eprintln!(
        "{bold}{red}{kind}{reset}{bold}: {message}{reset}",
        kind = error.kind,
        message = error.message,
    );
    eprintln!("  {cyan}-->{reset} {file_name}:{line_num}:{col_num}");

    let width = line_num.to_string().len();
    eprintln!("  {cyan}{:>width$} |{reset}", "");
    eprintln!("  {cyan}{line_num:>width$} |{reset} {line_text}");
    let underline = error.span.end.saturating_sub(error.span.start).clamp(1, line_text.len().max(1));
    eprintln!(
        "  {cyan}{:>width$} |{reset} {}{red}{}{reset}",
        "",
        " ".repeat(col_num),
        "^".repeat(underline),
    );
    for note in &error.notes {
        eprintln!("  {cyan}= note:{reset} {note}");
    }
    for hint in &error.hints {
        eprintln!("  {cyan}= hint:{reset} {hint}");
    }
    eprintln!();
}

// ============================================================================
// Error catalog
// ============================================================================

/// Constructors for common errors with consistent wording.
pub mod errors {
    use super::*;

    pub fn unexpected_token(found: &str, span: Span) -> CompileError {
        CompileError::syntax(format!("Unexpected token {found}"), span)
    }

    pub fn expected(what: &str, found: &str, span: Span) -> CompileError {
        CompileError::syntax(format!("Expected {what}, found {found}"), span)
    }

    pub fn invalid_assignment(span: Span) -> CompileError {
        CompileError::syntax("Invalid assignment target", span)
            .with_hint("Only names, attributes, indexes, slices and [a, b] lists can be assigned to")
    }

    pub fn outside_loop(stmt: &str, span: Span) -> CompileError {
        CompileError::syntax(format!("'{stmt}' outside of a loop"), span)
    }

    pub fn undefined_label(stmt: &str, label: &str, span: Span) -> CompileError {
        CompileError::syntax(format!("Label '{label}' referenced by '{stmt}' is not defined"), span)
    }

    pub fn duplicate_label(label: &str, span: Span) -> CompileError {
        CompileError::syntax(format!("Label '{label}' is already defined"), span)
    }

    pub fn cyclic_import(module: &str, importer: &str, span: Span) -> CompileError {
        CompileError::import(
            format!("Detected a recursive import of '{module}' while importing it from '{importer}'"),
            span,
        )
        .with_note(format!("'{module}' is still being imported further up the import chain"))
    }

    pub fn module_not_found(module: &str, roots: &[String], span: Span) -> CompileError {
        let err = CompileError::import(format!("Failed to import the module '{module}'"), span);
        if roots.is_empty() {
            err
        } else {
            err.with_note(format!("searched: {}", roots.join(", ")))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn test_line_index() {
        let idx = LineIndex::new("ab\ncd\n\nef");
        assert_eq!(idx.line_col(0), (1, 0));
        assert_eq!(idx.line_col(1), (1, 1));
        assert_eq!(idx.line_col(3), (2, 0));
        assert_eq!(idx.line_col(7), (4, 0));
        assert_eq!(idx.line_col(8), (4, 1));
    }

    #[test]
    fn test_sink_receives_warnings() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let captured = Rc::clone(&seen);
        let mut diags = Diagnostics::with_sink(Box::new(move |w| captured.borrow_mut().push(w.to_string())));
        diags.warn(Warning::new("no mapping").with_file("a.pyj"));
        assert_eq!(diags.warnings().len(), 1);
        assert_eq!(seen.borrow().as_slice(), ["WARN: no mapping [a.pyj]"]);
    }

    #[test]
    fn test_error_display_carries_position() {
        let err = CompileError::syntax("Unexpected token", Span::new(4, 5)).at(2, 1).eof();
        assert_eq!(err.to_string(), "syntax error: Unexpected token (line: 2, col: 1, pos: 4)");
        assert!(err.is_eof);
    }
}
