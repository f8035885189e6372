/// Statement parsing.
///
/// Covers blocks, directives, control flow, labels and the small keyword statements. Declarations
/// live in `decl.rs`, imports in `imports.rs`.
impl<'a> Parser<'a> {
    // ========================================================================
    // Blocks
    // ========================================================================

    /// Parse one statement; `None` for an empty `;`.
    fn statement(&mut self) -> Result<Option<Spanned<Stmt>>, CompileError> {
        let start = self.start();
        self.record_comments();
        if self.match_punct(PunctuationId::Semicolon)? {
            return Ok(None);
        }

        let node = if let Some(kw) = self.token.keyword_id() {
            self.keyword_statement(kw)?
        } else if self.check_op(OperatorId::At) {
            self.decorator_list()?;
            if !self.check_keyword(KeywordId::Def) && !self.check_keyword(KeywordId::Class) {
                return Err(self.expected("'def' or 'class' after decorators"));
            }
            return self.statement();
        } else if self.is_label()? {
            self.labeled_statement()?
        } else {
            match self.token.kind {
                TokenKind::Indent => {
                    return Err(self
                        .error_here("Unexpected indent")
                        .with_hint("Indent only after a line ending in ':'"));
                }
                TokenKind::Dedent | TokenKind::Eof => return Err(self.unexpected()),
                _ => self.expression_statement()?,
            }
        };
        Ok(Some(Spanned::new(node, self.span_from(start))))
    }

    fn keyword_statement(&mut self, kw: KeywordId) -> Result<Stmt, CompileError> {
        match kw {
            KeywordId::If => self.if_statement(),
            KeywordId::While => self.while_statement(),
            KeywordId::Do => self.do_while_statement(),
            KeywordId::For => self.for_statement(),
            KeywordId::Try => self.try_statement(),
            KeywordId::Switch => self.switch_statement(),
            KeywordId::Return => self.return_statement(),
            KeywordId::Raise => self.raise_statement(),
            KeywordId::Break | KeywordId::Continue => self.jump_statement(kw),
            KeywordId::Def => Ok(Stmt::Function(self.function_def(FunctionKind::Statement)?)),
            KeywordId::Class => Ok(Stmt::Class(self.class_def()?)),
            KeywordId::Import | KeywordId::From => self.import_statement(),
            KeywordId::Del => self.del_statement(),
            KeywordId::Nonlocal => self.nonlocal_statement(),
            KeywordId::Pass => {
                self.advance()?;
                self.end_statement()?;
                Ok(Stmt::Pass)
            }
            KeywordId::New => self.expression_statement(),
            KeywordId::Elif
            | KeywordId::Else
            | KeywordId::Except
            | KeywordId::Finally
            | KeywordId::Case
            | KeywordId::Default
            | KeywordId::As => Err(self.unexpected()),
        }
    }

    /// Parse `: <block>`.
    fn block(&mut self) -> Result<Body, CompileError> {
        self.expect_punct(PunctuationId::Colon, "':'")?;
        self.block_body()
    }

    /// Parse an indented block, or the statements that follow a `:` on the same line.
    fn block_body(&mut self) -> Result<Body, CompileError> {
        if matches!(self.token.kind, TokenKind::Indent) {
            self.advance()?;
            return self.statements_until_dedent();
        }
        if self.at_line_break() || self.is_at_end() {
            return Err(self.error_here("Expected an indented block"));
        }
        let mut body = Vec::new();
        loop {
            if let Some(stmt) = self.statement()? {
                body.push(stmt);
            }
            if self.token.nlb || self.at_block_end() {
                break;
            }
        }
        Ok(body)
    }

    fn statements_until_dedent(&mut self) -> Result<Body, CompileError> {
        let mut body = Vec::new();
        while !matches!(self.token.kind, TokenKind::Dedent | TokenKind::Eof) {
            if let Some(stmt) = self.statement()? {
                body.push(stmt);
            }
        }
        if matches!(self.token.kind, TokenKind::Dedent) {
            self.advance()?;
        }
        Ok(body)
    }

    /// Leading string statements of a module or function body.
    fn directives(&mut self) -> Result<Vec<Spanned<Stmt>>, CompileError> {
        let mut out = Vec::new();
        while let TokenKind::String(text) = &self.token.kind {
            let text = text.clone();
            let next = self.peek_token()?;
            let alone = next.nlb
                || next.is_eof()
                || matches!(next.kind, TokenKind::Dedent)
                || next.kind.is_punctuation(PunctuationId::Semicolon);
            if !alone {
                break;
            }
            let start = self.start();
            self.advance()?;
            self.match_punct(PunctuationId::Semicolon)?;
            out.push(Spanned::new(Stmt::Directive(text), self.span_from(start)));
        }
        Ok(out)
    }

    // ========================================================================
    // Control flow
    // ========================================================================

    /// `if`/`elif`/`else`; an `elif` becomes a nested `If` in `orelse`.
    fn if_statement(&mut self) -> Result<Stmt, CompileError> {
        self.advance()?;
        let test = self.expression(false)?;
        let body = self.block()?;
        let orelse = if self.check_keyword(KeywordId::Elif) {
            let start = self.start();
            let nested = self.if_statement()?;
            vec![Spanned::new(nested, self.span_from(start))]
        } else if self.match_keyword(KeywordId::Else)? {
            self.block()?
        } else {
            Vec::new()
        };
        Ok(Stmt::If { test, body, orelse })
    }

    fn loop_body(&mut self) -> Result<Body, CompileError> {
        self.state.loop_depth += 1;
        let body = self.block();
        self.state.loop_depth -= 1;
        body
    }

    fn while_statement(&mut self) -> Result<Stmt, CompileError> {
        self.advance()?;
        let test = self.expression(false)?;
        let body = self.loop_body()?;
        Ok(Stmt::While { test, body })
    }

    /// `do: <block>` followed by `.while <cond>`.
    fn do_while_statement(&mut self) -> Result<Stmt, CompileError> {
        self.advance()?;
        let body = self.loop_body()?;
        self.expect_punct(PunctuationId::Dot, "'.while' after a do block")?;
        match &self.token.kind {
            TokenKind::Name(n) if n == "while" => {
                self.advance()?;
            }
            _ => return Err(self.expected("'.while' after a do block")),
        }
        let test = self.expression(false)?;
        self.end_statement()?;
        Ok(Stmt::DoWhile { body, test })
    }

    fn for_statement(&mut self) -> Result<Stmt, CompileError> {
        self.advance()?;
        if matches!(&self.token.kind, TokenKind::Name(n) if n == "JS") {
            let next = self.peek_token()?;
            if next.kind.is_punctuation(PunctuationId::LParen) {
                let header = self.verbatim_text()?;
                let body = self.loop_body()?;
                return Ok(Stmt::ForJs { header, body });
            }
        }

        let target = self.for_target()?;
        self.expect_op(OperatorId::In, "'in'")?;
        let iter = self.expression(false)?;
        if iter.node.lowered_range(&target.node).is_none() {
            self.mark(HelperId::Iterable);
        }
        let body = self.loop_body()?;
        Ok(Stmt::ForIn { target, iter, body })
    }

    /// Loop variable(s) of a `for` loop or comprehension: a name, attribute or tuple.
    fn for_target(&mut self) -> Result<Spanned<Expr>, CompileError> {
        let start = self.start();
        let first = self.postfix_expr()?;
        if !self.check_punct(PunctuationId::Comma) {
            return self.into_target(first);
        }
        let mut items = vec![first];
        while self.match_punct(PunctuationId::Comma)? {
            items.push(self.postfix_expr()?);
        }
        self.into_target(Spanned::new(Expr::Array(items), self.span_from(start)))
    }

    fn try_statement(&mut self) -> Result<Stmt, CompileError> {
        let try_span = self.token.span;
        self.advance()?;
        let body = self.block()?;

        let mut handlers: Vec<ExceptHandler> = Vec::new();
        while self.check_keyword(KeywordId::Except) {
            if handlers.last().is_some_and(|h| h.types.is_empty()) {
                return Err(self.error_here("A bare 'except:' must be the last handler"));
            }
            let start = self.start();
            self.advance()?;
            let mut types = Vec::new();
            let mut name = None;
            if !self.check_punct(PunctuationId::Colon) {
                loop {
                    types.push(self.binary(precedence::NONE)?);
                    if !self.match_punct(PunctuationId::Comma)? {
                        break;
                    }
                }
                if self.match_keyword(KeywordId::As)? {
                    name = Some(self.expect_name("exception variable name")?);
                }
            }
            self.state.except_depth += 1;
            let handler_body = self.block();
            self.state.except_depth -= 1;
            handlers.push(ExceptHandler {
                types,
                name,
                body: handler_body?,
                span: self.span_from(start),
            });
        }

        let finalbody = if self.match_keyword(KeywordId::Finally)? {
            Some(self.block()?)
        } else {
            None
        };
        if handlers.is_empty() && finalbody.is_none() {
            return Err(self.error_at(CompileError::syntax("Missing except/finally blocks", try_span)));
        }
        Ok(Stmt::Try {
            body,
            handlers,
            finalbody,
        })
    }

    fn switch_statement(&mut self) -> Result<Stmt, CompileError> {
        self.advance()?;
        let discriminant = self.expression(false)?;
        self.expect_punct(PunctuationId::Colon, "':'")?;
        if !matches!(self.token.kind, TokenKind::Indent) {
            return Err(self.error_here("Expected an indented block of 'case' clauses"));
        }
        self.advance()?;

        self.state.switch_depth += 1;
        let mut cases = Vec::new();
        while !matches!(self.token.kind, TokenKind::Dedent | TokenKind::Eof) {
            let start = self.start();
            self.record_comments();
            let test = if self.match_keyword(KeywordId::Case)? {
                Some(self.expression(false)?)
            } else if self.match_keyword(KeywordId::Default)? {
                None
            } else {
                return Err(self.expected("'case' or 'default'"));
            };
            let body = self.block()?;
            cases.push(SwitchCase {
                test,
                body,
                span: self.span_from(start),
            });
        }
        self.state.switch_depth -= 1;
        if matches!(self.token.kind, TokenKind::Dedent) {
            self.advance()?;
        }
        Ok(Stmt::Switch { discriminant, cases })
    }

    fn return_statement(&mut self) -> Result<Stmt, CompileError> {
        if self.state.function_depth == 0 {
            return Err(self.error_here("'return' outside of function"));
        }
        self.advance()?;
        let value = if self.at_statement_end() {
            None
        } else {
            Some(self.expression_list()?)
        };
        self.end_statement()?;
        Ok(Stmt::Return(value))
    }

    fn raise_statement(&mut self) -> Result<Stmt, CompileError> {
        let span = self.token.span;
        self.advance()?;
        let value = if self.at_statement_end() {
            if self.state.except_depth == 0 {
                return Err(self.error_at(CompileError::syntax("Bare 'raise' outside of an except block", span)));
            }
            Spanned::new(Expr::Name(CAUGHT_EXCEPTION.to_string()), span)
        } else {
            self.expression(false)?
        };
        self.end_statement()?;
        Ok(Stmt::Raise(value))
    }

    /// `break` / `continue` with an optional label on the same line.
    fn jump_statement(&mut self, kw: KeywordId) -> Result<Stmt, CompileError> {
        let span = self.token.span;
        let word = keywords::as_str(kw);
        self.advance()?;
        let label = match &self.token.kind {
            TokenKind::Name(n) if !self.token.nlb => {
                let n = n.clone();
                self.advance()?;
                Some(n)
            }
            _ => None,
        };
        match &label {
            Some(l) if !self.state.labels.contains(l) => {
                return Err(self.error_at(errors::undefined_label(word, l, span)));
            }
            Some(_) => {}
            None => {
                let in_target = match kw {
                    KeywordId::Break => self.state.loop_depth > 0 || self.state.switch_depth > 0,
                    _ => self.state.loop_depth > 0,
                };
                if !in_target {
                    return Err(self.error_at(errors::outside_loop(word, span)));
                }
            }
        }
        self.end_statement()?;
        Ok(match kw {
            KeywordId::Break => Stmt::Break(label),
            _ => Stmt::Continue(label),
        })
    }

    /// `label: <statement>` on a single line.
    fn labeled_statement(&mut self) -> Result<Stmt, CompileError> {
        let span = self.token.span;
        let label = self.expect_name("label")?;
        self.expect_punct(PunctuationId::Colon, "':'")?;
        if self.state.labels.contains(&label) {
            return Err(self.error_at(errors::duplicate_label(&label, span)));
        }
        self.state.labels.push(label.clone());
        let body = self.statement();
        self.state.labels.pop();
        match body? {
            Some(body) => Ok(Stmt::Labeled {
                label,
                body: Box::new(body),
            }),
            None => Err(self.expected("a statement after the label")),
        }
    }

    // ========================================================================
    // Simple statements
    // ========================================================================

    fn del_statement(&mut self) -> Result<Stmt, CompileError> {
        self.advance()?;
        let target = self.expression(false)?;
        if !matches!(target.node, Expr::Name(_) | Expr::Dot { .. } | Expr::Index { .. }) {
            return Err(self.error_at(CompileError::syntax("Cannot delete this expression", target.span)));
        }
        self.end_statement()?;
        Ok(Stmt::Del(target))
    }

    fn nonlocal_statement(&mut self) -> Result<Stmt, CompileError> {
        self.advance()?;
        let mut names = vec![self.expect_name("name")?];
        while self.match_punct(PunctuationId::Comma)? {
            names.push(self.expect_name("name")?);
        }
        self.end_statement()?;
        Ok(Stmt::Nonlocal(names))
    }

    /// Expression statement, including assignments and `a, b = ...` unpacking.
    fn expression_statement(&mut self) -> Result<Stmt, CompileError> {
        let start = self.start();
        let first = self.maybe_assign(true)?;
        if self.state.bracket_depth > 0 || !self.check_punct(PunctuationId::Comma) {
            self.end_statement()?;
            return Ok(Stmt::Expr(first));
        }

        let mut items = vec![first];
        while self.match_punct(PunctuationId::Comma)? {
            items.push(self.conditional()?);
        }
        let expr = if self.check_op(OperatorId::Assign) {
            let target = self.into_target(Spanned::new(Expr::Array(items), self.span_from(start)))?;
            self.advance()?;
            let value = self.expression_list()?;
            Spanned::new(
                Expr::Assign {
                    op: OperatorId::Assign,
                    target: Box::new(target),
                    value: Box::new(value),
                },
                self.span_from(start),
            )
        } else {
            Spanned::new(Expr::Seq(items), self.span_from(start))
        };
        self.end_statement()?;
        Ok(Stmt::Expr(expr))
    }

    /// Parse `@decorator` lines into the pending decorator list.
    fn decorator_list(&mut self) -> Result<(), CompileError> {
        while self.match_op(OperatorId::At)? {
            let decorator = self.postfix_expr()?;
            self.state.decorators.push(decorator);
        }
        Ok(())
    }
}
