/// Declarations: functions, methods, parameters and classes.
///
/// Entering a function body resets loop, switch, label and `except` context; the enclosing
/// context is restored on exit.

/// Where a `def` appears.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FunctionKind {
    /// `def name(...):` statement.
    Statement,
    /// `def(...):` expression; the name is optional.
    Literal,
    /// Method in a class body; takes a receiver unless `@staticmethod`.
    Method,
}

impl<'a> Parser<'a> {
    fn function_def(&mut self, kind: FunctionKind) -> Result<FunctionDef, CompileError> {
        let start = self.start();
        let mut decorators = match kind {
            FunctionKind::Literal => Vec::new(),
            _ => std::mem::take(&mut self.state.decorators),
        };
        self.expect_keyword(KeywordId::Def, "'def'")?;

        let name = match &self.token.kind {
            TokenKind::Name(n) => {
                let n = n.clone();
                self.advance()?;
                Some(n)
            }
            _ if kind == FunctionKind::Literal => None,
            _ => return Err(self.expected("function name")),
        };

        let is_static = kind == FunctionKind::Method && {
            let before = decorators.len();
            decorators.retain(|d| !matches!(&d.node, Expr::Name(n) if n == "staticmethod"));
            decorators.len() != before
        };

        let params_span = self.token.span;
        let (mut params, rest) = self.parameters()?;
        let receiver = if kind == FunctionKind::Method && !is_static {
            if params.is_empty() {
                let method = name.as_deref().unwrap_or("<anonymous>");
                return Err(self.error_at(
                    CompileError::syntax(format!("Method '{method}' must take a receiver parameter"), params_span)
                        .with_hint("Add `self` as the first parameter, or decorate it with @staticmethod"),
                ));
            }
            Some(params.remove(0).name)
        } else {
            None
        };

        let body = self.function_body()?;
        Ok(FunctionDef {
            name,
            params,
            rest,
            body,
            decorators,
            receiver,
            is_static,
            scope: ScopeRecord::default(),
            span: self.span_from(start),
        })
    }

    /// `(a, b=1, *rest)`
    fn parameters(&mut self) -> Result<(Vec<Param>, Option<Ident>), CompileError> {
        self.expect_punct(PunctuationId::LParen, "'('")?;
        let mut params: Vec<Param> = Vec::new();
        let mut rest = None;
        while !self.check_punct(PunctuationId::RParen) {
            if rest.is_some() {
                return Err(self.error_here("The *rest parameter must be the last parameter"));
            }
            let start = self.start();
            if self.match_op(OperatorId::Star)? {
                rest = Some(self.expect_name("parameter name")?);
            } else {
                let name = self.expect_name("parameter name")?;
                if params.iter().any(|p| p.name == name) {
                    return Err(self.error_at(CompileError::syntax(
                        format!("Duplicate parameter '{name}'"),
                        self.span_from(start),
                    )));
                }
                let default = if self.match_op(OperatorId::Assign)? {
                    Some(self.conditional()?)
                } else {
                    if params.iter().any(|p| p.default.is_some()) {
                        return Err(self.error_at(CompileError::syntax(
                            "Non-default parameter follows a default parameter",
                            self.span_from(start),
                        )));
                    }
                    None
                };
                params.push(Param {
                    name,
                    default,
                    span: self.span_from(start),
                });
            }
            if !self.match_punct(PunctuationId::Comma)? {
                break;
            }
        }
        self.expect_punct(PunctuationId::RParen, "')'")?;
        Ok((params, rest))
    }

    fn enter_function(&mut self) -> FunctionContext {
        self.state.function_depth += 1;
        FunctionContext {
            labels: std::mem::take(&mut self.state.labels),
            loop_depth: std::mem::take(&mut self.state.loop_depth),
            switch_depth: std::mem::take(&mut self.state.switch_depth),
            except_depth: std::mem::take(&mut self.state.except_depth),
        }
    }

    fn leave_function(&mut self, saved: FunctionContext) {
        self.state.function_depth -= 1;
        self.state.labels = saved.labels;
        self.state.loop_depth = saved.loop_depth;
        self.state.switch_depth = saved.switch_depth;
        self.state.except_depth = saved.except_depth;
    }

    /// `: <body>` of a function; an indented body may open with directives.
    fn function_body(&mut self) -> Result<Body, CompileError> {
        self.expect_punct(PunctuationId::Colon, "':'")?;
        let saved = self.enter_function();
        let body = self.function_block();
        self.leave_function(saved);
        body
    }

    fn function_block(&mut self) -> Result<Body, CompileError> {
        if !matches!(self.token.kind, TokenKind::Indent) {
            return self.block_body();
        }
        self.advance()?;
        let mut body = self.directives()?;
        body.extend(self.statements_until_dedent()?);
        Ok(body)
    }

    fn class_def(&mut self) -> Result<ClassDef, CompileError> {
        let start = self.start();
        let decorators = std::mem::take(&mut self.state.decorators);
        self.expect_keyword(KeywordId::Class, "'class'")?;
        let name = self.expect_name("class name")?;

        let mut bases = Vec::new();
        if self.match_punct(PunctuationId::LParen)? {
            while !self.check_punct(PunctuationId::RParen) {
                bases.push(self.conditional()?);
                if !self.match_punct(PunctuationId::Comma)? {
                    break;
                }
            }
            self.expect_punct(PunctuationId::RParen, "')'")?;
        }
        if !bases.is_empty() {
            self.mark(HelperId::Extends);
        }
        if bases.len() > 1 {
            self.mark(HelperId::Mixin);
        }

        // Visible inside its own body, e.g. for `Name.static_method()` calls.
        let local = self.state.class_stack.is_empty();
        self.state.known_classes.entry(name.clone()).or_default();
        self.state.class_stack.push(name.clone());
        self.expect_punct(PunctuationId::Colon, "':'")?;
        let members = self.class_body();
        self.state.class_stack.pop();
        let members = members?;

        let mut info = ClassInfo::default();
        let mut init = None;
        let mut body = Vec::new();
        for member in members {
            let Spanned { node, span } = member;
            match node {
                Stmt::Function(f) if f.name.as_deref() == Some("__init__") => {
                    if init.is_some() {
                        return Err(self.error_at(CompileError::syntax(
                            format!("Class '{name}' defines __init__ twice"),
                            span,
                        )));
                    }
                    init = Some(Box::new(f));
                }
                Stmt::Function(f) => {
                    if let Some(method) = &f.name {
                        if f.is_static {
                            info.static_methods.push(method.clone());
                        } else {
                            info.bound_methods.insert(method.clone(), self.options.auto_bind);
                        }
                    }
                    body.push(Spanned::new(Stmt::Function(f), span));
                }
                other => body.push(Spanned::new(other, span)),
            }
        }
        if info.bound_methods.values().any(|bound| *bound) {
            self.mark(HelperId::Bind);
        }
        self.register_class(&name, info.clone(), local);

        Ok(ClassDef {
            name,
            bases,
            init,
            body,
            decorators,
            info,
            scope: ScopeRecord::default(),
            span: self.span_from(start),
        })
    }

    fn class_body(&mut self) -> Result<Body, CompileError> {
        let mut body = Vec::new();
        if !matches!(self.token.kind, TokenKind::Indent) {
            if self.at_line_break() || self.is_at_end() {
                return Err(self.error_here("Expected an indented block"));
            }
            loop {
                if let Some(member) = self.class_member()? {
                    body.push(member);
                }
                if self.token.nlb || self.at_block_end() {
                    return Ok(body);
                }
            }
        }

        self.advance()?;
        body.extend(self.directives()?);
        while !matches!(self.token.kind, TokenKind::Dedent | TokenKind::Eof) {
            if let Some(member) = self.class_member()? {
                body.push(member);
            }
        }
        if matches!(self.token.kind, TokenKind::Dedent) {
            self.advance()?;
        }
        Ok(body)
    }

    /// A statement in a class body; `def` here declares a method.
    fn class_member(&mut self) -> Result<Option<Spanned<Stmt>>, CompileError> {
        let start = self.start();
        self.record_comments();
        if self.check_op(OperatorId::At) {
            self.decorator_list()?;
            if !self.check_keyword(KeywordId::Def) && !self.check_keyword(KeywordId::Class) {
                return Err(self.expected("'def' or 'class' after decorators"));
            }
        }
        if self.check_keyword(KeywordId::Def) {
            let method = self.function_def(FunctionKind::Method)?;
            return Ok(Some(Spanned::new(Stmt::Function(method), self.span_from(start))));
        }
        self.statement()
    }
}
