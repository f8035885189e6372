//! Lexer for the Slither programming language
//!
//! Handles tokenization including:
//! - Keywords, atoms (`True`/`False`/`None`) and identifiers
//! - Word operators (`and`, `or`, `not`, `in`, `is`, ...) which turn back into names after `.`
//! - Numeric literals (decimal, hex, octal), strings (single and triple quoted) and regexps
//! - Greedy symbol-operator scanning with a reserved set rejected outright
//! - Indentation-based blocks (INDENT/DEDENT tokens)
//! - Comments, attached to the next token rather than emitted
//!
//! ## Module Structure
//!
//! - `tokens` - Token types (TokenKind, Token, FileId)
//! - `strings` - String and regexp scanning
//! - `numbers` - Numeric literal scanning
//! - `indent` - INDENT/DEDENT handling

mod indent;
mod numbers;
mod strings;
pub mod tokens;

pub use numbers::parse_number;
pub use tokens::{FileId, Token, TokenKind, keyword_id};

use std::collections::VecDeque;

use crate::ast::Span;
use crate::diagnostics::CompileError;
use slither_core::lang::operators::{self, OperatorId};
use slither_core::lang::punctuation::{self, PunctuationId};
use slither_core::lang::{atoms, keywords};

// ============================================================================
// LEXER STATE
// ----------------------------------------------------------------------------
// [Start of line] → measure whitespace prefix → compare with indent stack
//                                               ↓
//                      previous token was ':' → push prefix, emit INDENT
//                      prefix of top          → pop levels, emit DEDENT per level
//                      anything else          → lexical error
//
// Inside brackets newlines are insignificant and no prefix is measured.
// ============================================================================

/// Streaming lexer for Slither source code.
///
/// Call [`Lexer::next_token`] until it returns [`TokenKind::Eof`]; after that it keeps returning
/// `Eof`. [`Lexer::peek`] gives one token of lookahead.
pub struct Lexer<'a> {
    source: &'a str,
    pos: usize,
    line: usize,
    col: usize,
    file: FileId,
    /// Whitespace prefixes of the open blocks; the bottom entry is the empty prefix.
    indent_stack: Vec<String>,
    /// Synthetic tokens waiting to be handed out.
    pending: VecDeque<Token>,
    peeked: Option<Token>,
    /// Bracket depth for implicit line continuation (parens, brackets, braces)
    bracket_depth: usize,
    at_line_start: bool,
    newline_before: bool,
    comments: Vec<String>,
    /// Kind of the last token handed out; drives regexp/division and `.`-name decisions.
    prev: Option<TokenKind>,
}

impl<'a> Lexer<'a> {
    /// Create a new lexer for the given source code.
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            pos: 0,
            line: 1,
            col: 0,
            file: FileId::default(),
            indent_stack: vec![String::new()],
            pending: VecDeque::new(),
            peeked: None,
            bracket_depth: 0,
            at_line_start: true,
            newline_before: false,
            comments: Vec::new(),
            prev: None,
        }
    }

    /// Tag every produced token with `file`.
    pub fn with_file(mut self, file: FileId) -> Self {
        self.file = file;
        self
    }

    /// Produce the next token.
    ///
    /// ## Parameters
    /// - `force_regexp`: treat a `/` at this position as the start of a regular expression even
    ///   if the previous token would make it a division.
    ///
    /// ## Errors
    /// Returns a lexical [`CompileError`] for malformed literals, illegal characters, reserved
    /// operators and inconsistent indentation.
    pub fn next_token(&mut self, force_regexp: bool) -> Result<Token, CompileError> {
        if let Some(tok) = self.peeked.take() {
            if force_regexp && is_slash(&tok.kind) {
                return self.rescan_regexp(&tok);
            }
            return Ok(tok);
        }
        self.scan(force_regexp)
    }

    /// Return the next token without consuming it.
    pub fn peek(&mut self) -> Result<&Token, CompileError> {
        let tok = match self.peeked.take() {
            Some(tok) => tok,
            None => self.scan(false)?,
        };
        Ok(self.peeked.insert(tok))
    }

    /// Re-read an already produced `/` or `/=` token as a regular expression.
    ///
    /// ## Notes
    /// - `tok` must be the most recently produced token and nothing may have been peeked past
    ///   it; the parser calls this when it finds a division operator where an operand belongs.
    pub fn rescan_regexp(&mut self, tok: &Token) -> Result<Token, CompileError> {
        self.peeked = None;
        self.pending.clear();
        self.pos = tok.span.start;
        self.line = tok.line;
        self.col = tok.col;
        self.newline_before = tok.nlb;
        self.comments = tok.comments_before.clone();
        let kind = self.scan_regexp()?;
        Ok(self.make_token(kind, tok.span.start, tok.line, tok.col))
    }

    // ========================================================================
    // Core character handling
    // ========================================================================

    /// The full source text being scanned.
    pub fn source(&self) -> &'a str {
        self.source
    }

    /// The source text, detached from the borrow of `self`.
    fn src(&self) -> &'a str {
        self.source
    }

    fn peek_char(&self) -> Option<char> {
        self.src()[self.pos..].chars().next()
    }

    fn peek_char_at(&self, n: usize) -> Option<char> {
        self.src()[self.pos..].chars().nth(n)
    }

    fn starts_with(&self, s: &str) -> bool {
        self.source[self.pos..].starts_with(s)
    }

    fn advance(&mut self) -> Option<char> {
        let c = self.peek_char()?;
        self.pos += c.len_utf8();
        if c == '\n' {
            self.line += 1;
            self.col = 0;
        } else {
            self.col += 1;
        }
        Some(c)
    }

    fn advance_to(&mut self, target: usize) {
        while self.pos < target && self.advance().is_some() {}
    }

    fn error(&self, message: impl Into<String>, start: usize, line: usize, col: usize) -> CompileError {
        CompileError::lexical(message, Span::new(start, self.pos.max(start))).at(line, col)
    }

    fn make_token(&mut self, kind: TokenKind, start: usize, line: usize, col: usize) -> Token {
        match kind {
            TokenKind::Punctuation(PunctuationId::LParen | PunctuationId::LBracket | PunctuationId::LBrace) => {
                self.bracket_depth += 1;
            }
            TokenKind::Punctuation(PunctuationId::RParen | PunctuationId::RBracket | PunctuationId::RBrace) => {
                self.bracket_depth = self.bracket_depth.saturating_sub(1);
            }
            _ => {}
        }
        self.prev = Some(kind.clone());
        Token {
            kind,
            span: Span::new(start, self.pos),
            line,
            col,
            nlb: std::mem::replace(&mut self.newline_before, false),
            comments_before: std::mem::take(&mut self.comments),
            file: self.file,
        }
    }

    fn synthetic(&self, kind: TokenKind, at: usize) -> Token {
        Token {
            kind,
            span: Span::new(at, at),
            line: self.line,
            col: self.col,
            nlb: true,
            comments_before: Vec::new(),
            file: self.file,
        }
    }

    // ========================================================================
    // Main scanning dispatch
    // ========================================================================

    fn scan(&mut self, force_regexp: bool) -> Result<Token, CompileError> {
        if let Some(tok) = self.pending.pop_front() {
            self.prev = Some(tok.kind.clone());
            return Ok(tok);
        }
        if self.prev.is_none() && self.pos == 0 && self.starts_with("#!") {
            return Ok(self.scan_shebang());
        }

        self.skip_trivia()?;
        if let Some(tok) = self.pending.pop_front() {
            self.prev = Some(tok.kind.clone());
            return Ok(tok);
        }

        let (start, line, col) = (self.pos, self.line, self.col);
        let Some(c) = self.peek_char() else {
            return self.finish();
        };

        let kind = match c {
            '"' | '\'' => self.scan_string(c)?,
            '0'..='9' => self.scan_number()?,
            '.' if self.peek_char_at(1).is_some_and(|n| n.is_ascii_digit()) && self.value_expected() => {
                self.scan_number()?
            }
            '/' if force_regexp || self.value_expected() => self.scan_regexp()?,
            c if is_ident_start(c) => self.scan_word(),
            c if operators::is_operator_char(c) => self.scan_operator()?,
            c => match punctuation::from_char(c) {
                Some(p) => {
                    self.advance();
                    TokenKind::Punctuation(p)
                }
                None => {
                    self.advance();
                    return Err(self.error(format!("Unexpected character '{c}'"), start, line, col));
                }
            },
        };
        Ok(self.make_token(kind, start, line, col))
    }

    /// Whether the next token starts an operand (as opposed to following one).
    fn value_expected(&self) -> bool {
        self.prev.as_ref().is_none_or(TokenKind::allows_regexp)
    }

    fn finish(&mut self) -> Result<Token, CompileError> {
        if matches!(self.prev, Some(TokenKind::Punctuation(PunctuationId::Colon))) && self.bracket_depth == 0 {
            return Err(self
                .error("Expected an indented block", self.pos, self.line, self.col)
                .eof());
        }
        while self.indent_stack.len() > 1 {
            self.indent_stack.pop();
            let dedent = self.synthetic(TokenKind::Dedent, self.pos);
            self.pending.push_back(dedent);
        }
        let mut eof = self.synthetic(TokenKind::Eof, self.pos);
        eof.comments_before = std::mem::take(&mut self.comments);
        self.pending.push_back(eof);
        let tok = self.pending.pop_front().unwrap_or_else(|| self.synthetic(TokenKind::Eof, self.pos));
        self.prev = Some(tok.kind.clone());
        Ok(tok)
    }

    // ========================================================================
    // Trivia: whitespace, newlines, comments
    // ========================================================================

    fn skip_trivia(&mut self) -> Result<(), CompileError> {
        loop {
            if self.at_line_start && self.bracket_depth == 0 {
                self.at_line_start = false;
                let prefix_start = self.pos;
                while matches!(self.peek_char(), Some(' ' | '\t' | '\x0c')) {
                    self.advance();
                }
                // Blank and comment-only lines do not take part in indentation.
                if !matches!(self.peek_char(), None | Some('\n' | '\r' | '#')) {
                    let prefix = self.source[prefix_start..self.pos].to_string();
                    self.handle_indentation(&prefix, prefix_start)?;
                }
            }
            match self.peek_char() {
                Some(' ' | '\t' | '\x0c' | '\r' | '\u{feff}') => {
                    self.advance();
                }
                Some('\n') => {
                    self.advance();
                    self.newline_before = true;
                    if self.bracket_depth == 0 {
                        self.at_line_start = true;
                    }
                }
                Some('\\') if matches!(self.peek_char_at(1), Some('\n')) => {
                    self.advance();
                    self.advance();
                }
                Some('\\') if self.starts_with("\\\r\n") => {
                    self.advance_to(self.pos + 3);
                }
                Some('#') => self.skip_comment()?,
                _ => return Ok(()),
            }
        }
    }

    fn skip_comment(&mut self) -> Result<(), CompileError> {
        let (start, line, col) = (self.pos, self.line, self.col);
        if self.starts_with("###") {
            self.advance_to(self.pos + 3);
            let rest = &self.src()[self.pos..];
            let Some(end) = rest.find("###") else {
                self.advance_to(self.source.len());
                return Err(self.error("Unterminated multiline comment", start, line, col).eof());
            };
            let text = rest[..end].trim().to_string();
            self.advance_to(self.pos + end + 3);
            self.comments.push(text);
        } else {
            self.advance();
            let rest = &self.src()[self.pos..];
            let end = rest.find('\n').unwrap_or(rest.len());
            let text = rest[..end].trim_end_matches('\r').trim().to_string();
            self.advance_to(self.pos + end);
            self.comments.push(text);
        }
        Ok(())
    }

    fn scan_shebang(&mut self) -> Token {
        let rest = &self.src()[self.pos..];
        let end = rest.find('\n').unwrap_or(rest.len());
        let text = rest[..end].trim_end_matches('\r').to_string();
        self.advance_to(end);
        self.make_token(TokenKind::Shebang(text), 0, 1, 0)
    }

    // ========================================================================
    // Words and operators
    // ========================================================================

    fn scan_word(&mut self) -> TokenKind {
        let start = self.pos;
        while self.peek_char().is_some_and(is_ident_continue) {
            self.advance();
        }
        let word = &self.src()[start..self.pos];
        if matches!(self.prev, Some(TokenKind::Punctuation(PunctuationId::Dot))) {
            return TokenKind::Name(word.to_string());
        }
        if let Some(atom) = atoms::from_str(word) {
            TokenKind::Atom(atom)
        } else if let Some(kw) = keywords::from_str(word) {
            TokenKind::Keyword(kw)
        } else if let Some(op) = operators::word_from_str(word) {
            TokenKind::Operator(op)
        } else {
            TokenKind::Name(word.to_string())
        }
    }

    fn scan_operator(&mut self) -> Result<TokenKind, CompileError> {
        let (start, line, col) = (self.pos, self.line, self.col);
        let mut end = start + self.peek_char().map_or(1, char::len_utf8);
        while let Some(next) = self.src()[end..].chars().next() {
            if operators::is_known_symbol(&self.src()[start..end + next.len_utf8()]) {
                end += next.len_utf8();
            } else {
                break;
            }
        }
        self.advance_to(end);
        let spelling = &self.src()[start..end];
        if operators::is_reserved(spelling) {
            let err = self.error(format!("Reserved operator '{spelling}'"), start, line, col);
            return Err(match reserved_replacement(spelling) {
                Some(repl) => err.with_hint(format!("use '{repl}' instead")),
                None => err,
            });
        }
        operators::from_str(spelling)
            .map(TokenKind::Operator)
            .ok_or_else(|| self.error(format!("Unknown operator '{spelling}'"), start, line, col))
    }
}

/// Tokenize a whole source string.
///
/// The returned vector always ends with an `Eof` token.
#[tracing::instrument(skip_all, fields(len = source.len()))]
pub fn lex(source: &str) -> Result<Vec<Token>, CompileError> {
    let mut lexer = Lexer::new(source);
    let mut tokens = Vec::new();
    loop {
        let tok = lexer.next_token(false)?;
        let done = tok.is_eof();
        tokens.push(tok);
        if done {
            break;
        }
    }
    tracing::debug!(count = tokens.len(), "lexed");
    Ok(tokens)
}

fn is_slash(kind: &TokenKind) -> bool {
    kind.is_operator(OperatorId::Slash) || kind.is_operator(OperatorId::SlashEq)
}

fn is_ident_start(c: char) -> bool {
    c.is_alphabetic() || c == '_' || c == '$'
}

fn is_ident_continue(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '$'
}

fn reserved_replacement(spelling: &str) -> Option<&'static str> {
    match spelling {
        "===" => Some("=="),
        "!==" => Some("!="),
        "&&" => Some("and"),
        "||" => Some("or"),
        "!" => Some("not"),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::ErrorKind;
    use slither_core::lang::atoms::AtomId;
    use slither_core::lang::keywords::KeywordId;

    fn kinds(source: &str) -> Vec<TokenKind> {
        lex(source).unwrap().into_iter().map(|t| t.kind).collect()
    }

    fn name(n: &str) -> TokenKind {
        TokenKind::Name(n.to_string())
    }

    fn punct(p: PunctuationId) -> TokenKind {
        TokenKind::Punctuation(p)
    }

    #[test]
    fn test_simple_assignment() {
        assert_eq!(
            kinds("x = 1\n"),
            vec![name("x"), TokenKind::Operator(OperatorId::Assign), TokenKind::Number(1.0), TokenKind::Eof]
        );
    }

    #[test]
    fn test_block_open_and_close() {
        let k = kinds("if a:\n    b\nc\n");
        assert_eq!(
            k,
            vec![
                TokenKind::Keyword(KeywordId::If),
                name("a"),
                punct(PunctuationId::Colon),
                TokenKind::Indent,
                name("b"),
                TokenKind::Dedent,
                name("c"),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_function_token_stream() {
        let dump: Vec<String> = kinds("def f(a):\n    return a + 1\n")
            .iter()
            .map(ToString::to_string)
            .collect();
        insta::assert_snapshot!(dump.join("\n"), @r"
keyword 'def'
name 'f'
'('
name 'a'
')'
':'
indent
keyword 'return'
name 'a'
operator '+'
number 1
dedent
end of file
");
    }

    #[test]
    fn test_dedent_closes_exactly_matching_levels() {
        let src = "if a:\n  if b:\n    if c:\n      x\n  y\nz\n";
        let k = kinds(src);
        let y = k.iter().position(|t| *t == name("y")).unwrap();
        let x = k.iter().position(|t| *t == name("x")).unwrap();
        let dedents = k[x..y].iter().filter(|t| **t == TokenKind::Dedent).count();
        assert_eq!(dedents, 2);
        let z = k.iter().position(|t| *t == name("z")).unwrap();
        assert_eq!(k[y..z].iter().filter(|t| **t == TokenKind::Dedent).count(), 1);
    }

    #[test]
    fn test_dedent_between_levels_is_error() {
        let err = lex("if a:\n    if b:\n        x\n  y\n").unwrap_err();
        assert_eq!(err.kind, ErrorKind::Lexical);
        assert_eq!(err.line, 4);
    }

    #[test]
    fn test_indent_without_header_is_error() {
        let err = lex("a\n    b\n").unwrap_err();
        assert!(err.message.contains("Unexpected indent"));
    }

    #[test]
    fn test_header_without_body_is_error() {
        let err = lex("if a:\nb\n").unwrap_err();
        assert!(err.message.contains("indented block"));
        assert!(lex("if a:").unwrap_err().is_eof);
    }

    #[test]
    fn test_brackets_suppress_layout() {
        let k = kinds("f(a,\n      b)\n");
        assert!(!k.contains(&TokenKind::Indent));
        let toks = lex("f(a,\n  b)\n").unwrap();
        assert!(toks[4].nlb, "b follows a newline");
    }

    #[test]
    fn test_word_operators_and_dot_names() {
        let k = kinds("a and not b\nx.and\n");
        assert_eq!(k[1], TokenKind::Operator(OperatorId::And));
        assert_eq!(k[2], TokenKind::Operator(OperatorId::Not));
        assert_eq!(k[6], name("and"));
        assert_eq!(kinds("x.while")[2], name("while"));
        assert_eq!(kinds("None")[0], TokenKind::Atom(AtomId::None));
    }

    #[test]
    fn test_greedy_operators() {
        let k = kinds("a >>>= b ** c // d\n");
        assert_eq!(k[1], TokenKind::Operator(OperatorId::UShrEq));
        assert_eq!(k[3], TokenKind::Operator(OperatorId::StarStar));
        assert_eq!(k[5], TokenKind::Operator(OperatorId::SlashSlash));
    }

    #[test]
    fn test_reserved_operators_rejected() {
        for src in ["a && b", "a || b", "!a", "a === b", "a !== b"] {
            let err = lex(src).unwrap_err();
            assert_eq!(err.kind, ErrorKind::Lexical, "{src}");
            assert!(err.message.starts_with("Reserved operator"), "{src}");
        }
    }

    #[test]
    fn test_comments_attach_to_next_token() {
        let toks = lex("# first\n# second\nx = 1 # trailing\ny\n").unwrap();
        assert_eq!(toks[0].comments_before, ["first", "second"]);
        assert_eq!(toks[3].comments_before, ["trailing"]);
        let toks = lex("### block\ncomment ###\nz\n").unwrap();
        assert_eq!(toks[0].comments_before, ["block\ncomment"]);
    }

    #[test]
    fn test_unterminated_block_comment() {
        let err = lex("### never closed\nx\n").unwrap_err();
        assert!(err.is_eof);
    }

    #[test]
    fn test_regexp_versus_division() {
        let k = kinds("a = /ab+c/gi\nb = a / 2\n");
        assert_eq!(
            k[2],
            TokenKind::RegExp {
                pattern: "ab+c".into(),
                flags: "gi".into()
            }
        );
        assert_eq!(k[6], TokenKind::Operator(OperatorId::Slash));
    }

    #[test]
    fn test_force_regexp_rescans() {
        let mut lexer = Lexer::new("x /a/");
        lexer.next_token(false).unwrap();
        let slash = lexer.next_token(false).unwrap();
        assert_eq!(slash.kind, TokenKind::Operator(OperatorId::Slash));
        let re = lexer.rescan_regexp(&slash).unwrap();
        assert_eq!(
            re.kind,
            TokenKind::RegExp {
                pattern: "a".into(),
                flags: String::new()
            }
        );
        assert!(lexer.next_token(false).unwrap().is_eof());
    }

    #[test]
    fn test_peek_does_not_consume() {
        let mut lexer = Lexer::new("a b");
        assert_eq!(lexer.peek().unwrap().kind, name("a"));
        assert_eq!(lexer.next_token(false).unwrap().kind, name("a"));
        assert_eq!(lexer.next_token(false).unwrap().kind, name("b"));
    }

    #[test]
    fn test_positions() {
        let toks = lex("a\nbb.c").unwrap();
        assert_eq!((toks[0].line, toks[0].col), (1, 0));
        assert_eq!((toks[1].line, toks[1].col), (2, 0));
        assert_eq!(toks[2].span, Span::new(4, 5));
        assert_eq!((toks[3].line, toks[3].col), (2, 3));
    }

    #[test]
    fn test_shebang() {
        let toks = lex("#!/usr/bin/env node\nx\n").unwrap();
        assert_eq!(toks[0].kind, TokenKind::Shebang("#!/usr/bin/env node".into()));
        assert_eq!(toks[1].kind, name("x"));
    }

    #[test]
    fn test_eof_repeats() {
        let mut lexer = Lexer::new("if a:\n  b\n");
        let mut last = Vec::new();
        for _ in 0..8 {
            last.push(lexer.next_token(false).unwrap().kind);
        }
        assert_eq!(last[last.len() - 1], TokenKind::Eof);
        assert_eq!(last[last.len() - 2], TokenKind::Eof);
    }
}
