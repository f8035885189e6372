/// Token-stream helpers.
///
/// This chunk contains the low-level primitives used throughout parsing:
/// - Consuming and peeking tokens (`advance`, `peek_token`)
/// - Matching / expecting keywords, operators, and punctuation
/// - Bracket-depth bookkeeping and statement termination
/// - Error construction at the current token
impl<'a> Parser<'a> {
    // ========================================================================
    // Helpers
    // ========================================================================

    /// Return `true` if the current token is [`TokenKind::Eof`].
    fn is_at_end(&self) -> bool {
        self.token.is_eof()
    }

    /// Consume the current token and return it.
    fn advance(&mut self) -> Result<Token, CompileError> {
        let next = self
            .lexer
            .next_token(false)
            .map_err(|e| locate(self.options.filename.as_deref(), e))?;
        if !self.token.kind.is_layout() {
            self.prev_end = self.token.span.end;
        }
        match self.token.kind {
            TokenKind::Punctuation(PunctuationId::LParen | PunctuationId::LBracket | PunctuationId::LBrace) => {
                self.state.bracket_depth += 1;
            }
            TokenKind::Punctuation(PunctuationId::RParen | PunctuationId::RBracket | PunctuationId::RBrace) => {
                self.state.bracket_depth = self.state.bracket_depth.saturating_sub(1);
            }
            _ => {}
        }
        Ok(std::mem::replace(&mut self.token, next))
    }

    /// Return a copy of the token after the current one.
    fn peek_token(&mut self) -> Result<Token, CompileError> {
        match self.lexer.peek() {
            Ok(tok) => Ok(tok.clone()),
            Err(e) => Err(locate(self.options.filename.as_deref(), e)),
        }
    }

    /// Start offset of the current token.
    fn start(&self) -> usize {
        self.token.span.start
    }

    /// Span from `start` to the end of the last consumed token.
    fn span_from(&self, start: usize) -> Span {
        Span::new(start, self.prev_end.max(start))
    }

    fn check_keyword(&self, id: KeywordId) -> bool {
        self.token.kind.is_keyword(id)
    }

    fn check_punct(&self, id: PunctuationId) -> bool {
        self.token.kind.is_punctuation(id)
    }

    fn check_op(&self, id: OperatorId) -> bool {
        self.token.kind.is_operator(id)
    }

    fn match_keyword(&mut self, id: KeywordId) -> Result<bool, CompileError> {
        if self.check_keyword(id) {
            self.advance()?;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    fn match_punct(&mut self, id: PunctuationId) -> Result<bool, CompileError> {
        if self.check_punct(id) {
            self.advance()?;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    fn match_op(&mut self, id: OperatorId) -> Result<bool, CompileError> {
        if self.check_op(id) {
            self.advance()?;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    fn expect_punct(&mut self, id: PunctuationId, what: &str) -> Result<Token, CompileError> {
        if self.check_punct(id) {
            self.advance()
        } else {
            Err(self.expected(what))
        }
    }

    fn expect_keyword(&mut self, id: KeywordId, what: &str) -> Result<Token, CompileError> {
        if self.check_keyword(id) {
            self.advance()
        } else {
            Err(self.expected(what))
        }
    }

    fn expect_op(&mut self, id: OperatorId, what: &str) -> Result<Token, CompileError> {
        if self.check_op(id) {
            self.advance()
        } else {
            Err(self.expected(what))
        }
    }

    /// Consume a name token and return its text.
    fn expect_name(&mut self, what: &str) -> Result<Ident, CompileError> {
        match &self.token.kind {
            TokenKind::Name(n) => {
                let n = n.clone();
                self.advance()?;
                Ok(n)
            }
            _ => Err(self.expected(what)),
        }
    }

    // ========================================================================
    // Layout and termination
    // ========================================================================

    /// Whether a newline before the current token ends the construct being parsed.
    fn at_line_break(&self) -> bool {
        self.token.nlb && self.state.bracket_depth == 0
    }

    /// Whether the current token closes a block or an enclosing bracket.
    fn at_block_end(&self) -> bool {
        matches!(
            self.token.kind,
            TokenKind::Dedent
                | TokenKind::Eof
                | TokenKind::Punctuation(
                    PunctuationId::RParen | PunctuationId::RBracket | PunctuationId::RBrace | PunctuationId::Comma
                )
        )
    }

    /// Whether a simple statement may end before the current token.
    fn at_statement_end(&self) -> bool {
        self.at_line_break() || self.at_block_end() || self.check_punct(PunctuationId::Semicolon)
    }

    /// Finish a simple statement: consume a `;` or require a line break / block end.
    fn end_statement(&mut self) -> Result<(), CompileError> {
        if self.match_punct(PunctuationId::Semicolon)? {
            return Ok(());
        }
        if self.at_line_break() || self.at_block_end() || self.token.nlb {
            return Ok(());
        }
        Err(self.unexpected())
    }

    // ========================================================================
    // Errors
    // ========================================================================

    /// Syntax error positioned at the current token.
    fn error_here(&self, message: impl Into<String>) -> CompileError {
        let err = CompileError::syntax(message, self.token.span).at(self.token.line, self.token.col);
        let err = if self.is_at_end() { err.eof() } else { err };
        locate(self.options.filename.as_deref(), err)
    }

    /// Error positioned at its own span. Synthetic spans fall back to the current token.
    fn error_at(&self, err: CompileError) -> CompileError {
        let (line, col) = if err.span.is_synthetic() {
            (self.token.line, self.token.col)
        } else {
            let source = self.lexer.source();
            LineIndex::new(source).line_col(err.span.start.min(source.len()))
        };
        locate(self.options.filename.as_deref(), err.at(line, col))
    }

    fn unexpected(&self) -> CompileError {
        if self.is_at_end() {
            self.error_here("Unexpected end of file")
        } else {
            self.error_at(errors::unexpected_token(&self.token.kind.to_string(), self.token.span))
        }
    }

    fn expected(&self, what: &str) -> CompileError {
        let err = self.error_at(errors::expected(what, &self.token.kind.to_string(), self.token.span));
        if self.is_at_end() { err.eof() } else { err }
    }
}
