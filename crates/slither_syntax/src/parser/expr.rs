/// Expression parsing.
///
/// Precedence climbing over the operator table in `slither_core`, with the prefix, postfix and
/// primary forms handled by recursive descent.
///
/// ## Notes
/// - `**` is right-associative; everything else is left-associative.
/// - Runs of comparison operators at one precedence level form a [`Expr::ChainedCompare`].
/// - A newline outside brackets ends the expression before any binary or postfix operator.
impl<'a> Parser<'a> {
    /// Expression with optional top-level commas, which form an [`Expr::Seq`].
    fn expression(&mut self, commas: bool) -> Result<Spanned<Expr>, CompileError> {
        let start = self.start();
        let first = self.maybe_assign(false)?;
        if !commas || !self.check_punct(PunctuationId::Comma) {
            return Ok(first);
        }
        let mut items = vec![first];
        while self.match_punct(PunctuationId::Comma)? {
            if self.check_punct(PunctuationId::RParen) {
                break;
            }
            items.push(self.maybe_assign(false)?);
        }
        Ok(Spanned::new(Expr::Seq(items), self.span_from(start)))
    }

    /// Right-hand side that may be a bare comma list, e.g. `return a, b` or `x = 1, 2`.
    ///
    /// Outside brackets the list becomes an array literal.
    fn expression_list(&mut self) -> Result<Spanned<Expr>, CompileError> {
        let start = self.start();
        let first = self.maybe_assign(true)?;
        if self.state.bracket_depth > 0 || !self.check_punct(PunctuationId::Comma) {
            return Ok(first);
        }
        let mut items = vec![first];
        while self.match_punct(PunctuationId::Comma)? {
            if self.at_statement_end() {
                break;
            }
            items.push(self.conditional()?);
        }
        Ok(Spanned::new(Expr::Array(items), self.span_from(start)))
    }

    /// Conditional expression, optionally followed by an assignment operator.
    fn maybe_assign(&mut self, rhs_list: bool) -> Result<Spanned<Expr>, CompileError> {
        let start = self.start();
        let left = self.conditional()?;
        let op = match self.token.operator_id() {
            Some(op) if operators::info_for(op).fixity == Fixity::Assign && !self.at_line_break() => op,
            _ => return Ok(left),
        };
        let target = self.into_target(left)?;
        if matches!(target.node, Expr::Unpack(_) | Expr::Slice { .. }) && op != OperatorId::Assign {
            return Err(self.error_at(errors::invalid_assignment(target.span)));
        }
        self.advance()?;
        let value = if rhs_list {
            self.expression_list()?
        } else {
            self.maybe_assign(false)?
        };
        Ok(Spanned::new(
            Expr::Assign {
                op,
                target: Box::new(target),
                value: Box::new(value),
            },
            self.span_from(start),
        ))
    }

    /// `then if test else orelse`
    fn conditional(&mut self) -> Result<Spanned<Expr>, CompileError> {
        let start = self.start();
        let then = self.binary(precedence::NONE)?;
        if !self.check_keyword(KeywordId::If) || self.at_line_break() {
            return Ok(then);
        }
        self.advance()?;
        let test = self.binary(precedence::NONE)?;
        self.expect_keyword(KeywordId::Else, "'else' in conditional expression")?;
        let orelse = self.conditional()?;
        Ok(Spanned::new(
            Expr::Conditional {
                test: Box::new(test),
                then: Box::new(then),
                orelse: Box::new(orelse),
            },
            self.span_from(start),
        ))
    }

    /// Binary operators binding tighter than `min_prec`.
    fn binary(&mut self, min_prec: u8) -> Result<Spanned<Expr>, CompileError> {
        let start = self.start();
        let mut left = self.unary()?;
        // Precedence of the comparison that produced `left` in this loop, if any.
        let mut last_compare: Option<u8> = None;

        while let Some((op, negated)) = self.binary_operator()? {
            let prec = operators::precedence_of(op);
            if prec <= min_prec {
                break;
            }
            self.advance()?;
            if negated {
                self.advance()?;
            }
            let right_min = if op == OperatorId::StarStar { prec - 1 } else { prec };
            let right = self.binary(right_min)?;
            if op == OperatorId::In {
                self.mark(HelperId::In);
            }
            let span = self.span_from(start);

            let chains = is_comparison(op) && !negated && last_compare == Some(prec);
            left = if chains {
                Spanned::new(chain_comparison(left, op, right), span)
            } else if negated && op == OperatorId::In {
                let test = Expr::binary(op, left, right);
                Spanned::new(
                    Expr::UnaryPrefix {
                        op: OperatorId::Not,
                        operand: Box::new(test),
                    },
                    span,
                )
            } else if negated {
                Spanned::new(Expr::binary(OperatorId::NotEq, left, right).node, span)
            } else {
                Spanned::new(Expr::binary(op, left, right).node, span)
            };
            last_compare = (is_comparison(op) && !negated).then_some(prec);
        }
        Ok(left)
    }

    /// The binary operator at the current token, if one continues the expression.
    ///
    /// The flag is set for the two-token forms `not in` and `is not`.
    fn binary_operator(&mut self) -> Result<Option<(OperatorId, bool)>, CompileError> {
        if self.at_line_break() {
            return Ok(None);
        }
        let Some(op) = self.token.operator_id() else {
            return Ok(None);
        };
        match op {
            OperatorId::Not => {
                let next = self.peek_token()?;
                Ok(next.kind.is_operator(OperatorId::In).then_some((OperatorId::In, true)))
            }
            OperatorId::Is => {
                let next = self.peek_token()?;
                Ok(Some((OperatorId::Is, next.kind.is_operator(OperatorId::Not))))
            }
            _ if operators::precedence_of(op) > precedence::NONE => Ok(Some((op, false))),
            _ => Ok(None),
        }
    }

    fn unary(&mut self) -> Result<Spanned<Expr>, CompileError> {
        let start = self.start();
        if let Some(op) = self.token.operator_id().filter(|op| *op != OperatorId::At) {
            let fixity = operators::info_for(op).fixity;
            if matches!(fixity, Fixity::Prefix | Fixity::InfixOrPrefix | Fixity::Update) {
                self.advance()?;
                let operand = self.unary()?;
                if fixity == Fixity::Update && !is_updatable(&operand.node) {
                    return Err(self.error_at(errors::invalid_assignment(operand.span)));
                }
                return Ok(Spanned::new(
                    Expr::UnaryPrefix {
                        op,
                        operand: Box::new(operand),
                    },
                    self.span_from(start),
                ));
            }
        }

        let expr = self.postfix_expr()?;
        let op = match self.token.operator_id() {
            Some(op @ (OperatorId::PlusPlus | OperatorId::MinusMinus)) if !self.token.nlb => op,
            _ => return Ok(expr),
        };
        if !is_updatable(&expr.node) {
            return Err(self.error_at(errors::invalid_assignment(expr.span)));
        }
        self.advance()?;
        Ok(Spanned::new(
            Expr::UnaryPostfix {
                op,
                operand: Box::new(expr),
            },
            self.span_from(start),
        ))
    }

    /// Primary expression followed by attribute access, subscripts and calls.
    fn postfix_expr(&mut self) -> Result<Spanned<Expr>, CompileError> {
        let start = self.start();
        let mut expr = self.primary()?;
        loop {
            if self.at_line_break() {
                break;
            }
            if self.match_punct(PunctuationId::Dot)? {
                let property = self.expect_name("property name")?;
                expr = Spanned::new(
                    Expr::Dot {
                        object: Box::new(expr),
                        property,
                    },
                    self.span_from(start),
                );
            } else if self.check_punct(PunctuationId::LBracket) {
                let node = self.subscript(expr)?;
                expr = Spanned::new(node, self.span_from(start));
            } else if self.check_punct(PunctuationId::LParen) {
                let args = self.call_args()?;
                let node = self.classify_call(expr, args);
                expr = Spanned::new(node, self.span_from(start));
            } else {
                break;
            }
        }
        Ok(expr)
    }

    /// `[index]` or `[lower:upper:step]`.
    fn subscript(&mut self, object: Spanned<Expr>) -> Result<Expr, CompileError> {
        self.advance()?;
        let lower = if self.check_punct(PunctuationId::Colon) {
            None
        } else {
            Some(Box::new(self.expression(false)?))
        };
        if !self.match_punct(PunctuationId::Colon)? {
            self.expect_punct(PunctuationId::RBracket, "']'")?;
            return match lower {
                Some(index) => Ok(Expr::Index {
                    object: Box::new(object),
                    index,
                }),
                None => Err(self.expected("an index")),
            };
        }

        let upper = if self.check_punct(PunctuationId::Colon) || self.check_punct(PunctuationId::RBracket) {
            None
        } else {
            Some(Box::new(self.expression(false)?))
        };
        let step = if self.match_punct(PunctuationId::Colon)? && !self.check_punct(PunctuationId::RBracket) {
            Some(Box::new(self.expression(false)?))
        } else {
            None
        };
        self.expect_punct(PunctuationId::RBracket, "']'")?;
        if step.is_some() {
            self.mark(HelperId::Eslice);
        }
        Ok(Expr::Slice {
            object: Box::new(object),
            lower,
            upper,
            step,
        })
    }

    fn call_args(&mut self) -> Result<Vec<Spanned<Expr>>, CompileError> {
        self.expect_punct(PunctuationId::LParen, "'('")?;
        let mut args = Vec::new();
        while !self.check_punct(PunctuationId::RParen) {
            args.push(self.maybe_assign(false)?);
            if !self.match_punct(PunctuationId::Comma)? {
                break;
            }
        }
        self.expect_punct(PunctuationId::RParen, "')'")?;
        Ok(args)
    }

    fn primary(&mut self) -> Result<Spanned<Expr>, CompileError> {
        let start = self.start();
        let node = match self.token.kind.clone() {
            TokenKind::Number(n) => {
                self.advance()?;
                Expr::Number(n)
            }
            TokenKind::String(s) => {
                self.advance()?;
                let mut text = s;
                // Adjacent literals concatenate.
                while let TokenKind::String(more) = &self.token.kind {
                    if self.at_line_break() {
                        break;
                    }
                    text.push_str(more);
                    self.advance()?;
                }
                Expr::Str(text)
            }
            TokenKind::RegExp { pattern, flags } => {
                self.advance()?;
                Expr::RegExp { pattern, flags }
            }
            TokenKind::Operator(OperatorId::Slash | OperatorId::SlashEq) => {
                // A slash where a value is expected starts a regular expression.
                self.token = self
                    .lexer
                    .rescan_regexp(&self.token)
                    .map_err(|e| locate(self.options.filename.as_deref(), e))?;
                return self.primary();
            }
            TokenKind::Atom(atom) => {
                self.advance()?;
                Expr::Atom(atom)
            }
            TokenKind::Name(n) if n == "JS" && self.peek_token()?.kind.is_punctuation(PunctuationId::LParen) => {
                Expr::Verbatim(self.verbatim_text()?)
            }
            TokenKind::Name(n) => {
                self.advance()?;
                Expr::Name(n)
            }
            TokenKind::Punctuation(PunctuationId::LParen) => self.parenthesized()?,
            TokenKind::Punctuation(PunctuationId::LBracket) => self.array_or_comprehension()?,
            TokenKind::Punctuation(PunctuationId::LBrace) => self.object_literal()?,
            TokenKind::Keyword(KeywordId::Def) => Expr::Function(Box::new(self.function_def(FunctionKind::Literal)?)),
            TokenKind::Keyword(KeywordId::New) => self.new_expr()?,
            _ => return Err(self.unexpected()),
        };
        Ok(Spanned::new(node, self.span_from(start)))
    }

    /// `JS("code")`: the string is emitted as-is.
    fn verbatim_text(&mut self) -> Result<String, CompileError> {
        self.advance()?;
        self.expect_punct(PunctuationId::LParen, "'('")?;
        let text = match &self.token.kind {
            TokenKind::String(s) => s.clone(),
            _ => return Err(self.expected("a string literal inside JS()")),
        };
        self.advance()?;
        self.expect_punct(PunctuationId::RParen, "')'")?;
        Ok(text)
    }

    /// `(expr)`, `(a, b)` tuple (an array), or `()`.
    fn parenthesized(&mut self) -> Result<Expr, CompileError> {
        self.advance()?;
        if self.match_punct(PunctuationId::RParen)? {
            return Ok(Expr::Array(Vec::new()));
        }
        let inner = self.expression(true)?;
        self.expect_punct(PunctuationId::RParen, "')'")?;
        Ok(match inner.node {
            Expr::Seq(items) => Expr::Array(items),
            other => other,
        })
    }

    fn array_or_comprehension(&mut self) -> Result<Expr, CompileError> {
        self.advance()?;
        if self.match_punct(PunctuationId::RBracket)? {
            return Ok(Expr::Array(Vec::new()));
        }
        let first = self.maybe_assign(false)?;

        if self.match_keyword(KeywordId::For)? {
            let target = self.for_target()?;
            self.expect_op(OperatorId::In, "'in'")?;
            let iter = self.binary(precedence::NONE)?;
            let condition = if self.match_keyword(KeywordId::If)? {
                Some(Box::new(self.conditional()?))
            } else {
                None
            };
            self.expect_punct(PunctuationId::RBracket, "']'")?;
            self.mark(HelperId::Iterable);
            return Ok(Expr::ListComp {
                element: Box::new(first),
                target: Box::new(target),
                iter: Box::new(iter),
                condition,
            });
        }

        let mut items = vec![first];
        while self.match_punct(PunctuationId::Comma)? {
            if self.check_punct(PunctuationId::RBracket) {
                break;
            }
            items.push(self.maybe_assign(false)?);
        }
        self.expect_punct(PunctuationId::RBracket, "']'")?;
        Ok(Expr::Array(items))
    }

    /// `{key: value, get name(): ..., set name(v): ...}`
    fn object_literal(&mut self) -> Result<Expr, CompileError> {
        self.advance()?;
        let mut props = Vec::new();
        while !self.check_punct(PunctuationId::RBrace) {
            let accessor = match self.token.kind.name() {
                Some("get") => Some(true),
                Some("set") => Some(false),
                _ => None,
            };
            let accessor = match accessor {
                Some(is_get) if matches!(self.peek_token()?.kind, TokenKind::Name(_)) => Some(is_get),
                _ => None,
            };
            if let Some(is_get) = accessor {
                props.push(self.accessor(is_get)?);
            } else {
                let key = self.property_key()?;
                self.expect_punct(PunctuationId::Colon, "':' after property name")?;
                let value = self.maybe_assign(false)?;
                props.push(ObjectProp::KeyVal { key, value });
            }
            if !self.match_punct(PunctuationId::Comma)? {
                break;
            }
        }
        self.expect_punct(PunctuationId::RBrace, "'}'")?;
        Ok(Expr::Object(props))
    }

    /// Object literal key: a name, string, number, or any keyword spelled as a name.
    fn property_key(&mut self) -> Result<PropKey, CompileError> {
        let key = match &self.token.kind {
            TokenKind::Name(n) => PropKey::Name(n.clone()),
            TokenKind::String(s) => PropKey::Str(s.clone()),
            TokenKind::Number(n) => PropKey::Number(*n),
            TokenKind::Keyword(k) => PropKey::Name(keywords::as_str(*k).to_string()),
            TokenKind::Atom(a) => PropKey::Name(atoms::as_str(*a).to_string()),
            TokenKind::Operator(op) if operators::info_for(*op).is_keyword_spelling => {
                PropKey::Name(operators::as_str(*op).to_string())
            }
            _ => return Err(self.expected("property name")),
        };
        self.advance()?;
        Ok(key)
    }

    fn accessor(&mut self, is_get: bool) -> Result<ObjectProp, CompileError> {
        let start = self.start();
        self.advance()?;
        let name = self.expect_name("property name")?;
        let params_span = self.token.span;
        let (params, rest) = self.parameters()?;
        let arity = params.len() + usize::from(rest.is_some());
        let expected = if is_get { 0 } else { 1 };
        if arity != expected {
            let kind = if is_get { "A getter" } else { "A setter" };
            let message = format!("{kind} takes exactly {expected} parameter(s)");
            return Err(self.error_at(CompileError::syntax(message, params_span)));
        }
        let body = self.function_body()?;
        let func = FunctionDef {
            name: Some(name.clone()),
            params,
            rest,
            body,
            span: self.span_from(start),
            ..FunctionDef::default()
        };
        Ok(if is_get {
            ObjectProp::Getter { name, func }
        } else {
            ObjectProp::Setter { name, func }
        })
    }

    /// `new Callee(args)`; the argument list is optional.
    fn new_expr(&mut self) -> Result<Expr, CompileError> {
        self.advance()?;
        let start = self.start();
        let mut callee = self.primary()?;
        while !self.at_line_break() && self.match_punct(PunctuationId::Dot)? {
            let property = self.expect_name("property name")?;
            callee = Spanned::new(
                Expr::Dot {
                    object: Box::new(callee),
                    property,
                },
                self.span_from(start),
            );
        }
        let args = if self.check_punct(PunctuationId::LParen) && !self.at_line_break() {
            self.call_args()?
        } else {
            Vec::new()
        };
        Ok(Expr::New {
            callee: Box::new(callee),
            args,
        })
    }
}

fn is_comparison(op: OperatorId) -> bool {
    matches!(
        op,
        OperatorId::Lt | OperatorId::LtEq | OperatorId::Gt | OperatorId::GtEq | OperatorId::EqEq | OperatorId::NotEq
    )
}

fn is_updatable(expr: &Expr) -> bool {
    matches!(expr, Expr::Name(_) | Expr::Dot { .. } | Expr::Index { .. })
}

/// Extend `left` (a comparison or chain) with one more comparison.
fn chain_comparison(left: Spanned<Expr>, op: OperatorId, right: Spanned<Expr>) -> Expr {
    match left.node {
        Expr::Binary {
            op: first,
            left: a,
            right: b,
        } => Expr::ChainedCompare {
            operands: vec![*a, *b, right],
            ops: vec![first, op],
        },
        Expr::ChainedCompare { mut operands, mut ops } => {
            operands.push(right);
            ops.push(op);
            Expr::ChainedCompare { operands, ops }
        }
        other => Expr::binary(op, Spanned::new(other, left.span), right).node,
    }
}
