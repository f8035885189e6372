/// Parser utilities: comment capture, baselib flags, assignment targets and call classification.
impl<'a> Parser<'a> {
    /// Remember the leading comments of the statement starting at the current token.
    fn record_comments(&mut self) {
        if !self.token.comments_before.is_empty() {
            self.module
                .comments
                .entry(self.token.span.start)
                .or_default()
                .extend(self.token.comments_before.iter().cloned());
        }
    }

    /// Flag a runtime helper as used by this module.
    fn mark(&mut self, helper: HelperId) {
        self.module.baselib.mark(helper);
    }

    fn warn(&mut self, warning: Warning) {
        let warning = match &self.options.filename {
            Some(f) => warning.with_file(f.clone()),
            None => warning,
        };
        match self.hook.as_deref_mut() {
            Some(hook) => hook.warn(warning),
            None => tracing::warn!("{}", warning),
        }
    }

    /// Whether the current name token starts a `label:` statement.
    fn is_label(&mut self) -> Result<bool, CompileError> {
        if !matches!(self.token.kind, TokenKind::Name(_)) {
            return Ok(false);
        }
        let next = self.peek_token()?;
        Ok(next.kind.is_punctuation(PunctuationId::Colon))
    }

    /// Turn a parsed expression into an assignment target.
    ///
    /// `[a, b]` array literals become [`Expr::Unpack`]; anything that cannot be assigned to is a
    /// syntax error.
    fn into_target(&self, expr: Spanned<Expr>) -> Result<Spanned<Expr>, CompileError> {
        let Spanned { node, span } = expr;
        let node = match node {
            Expr::Array(items) | Expr::Unpack(items) => {
                let items = items
                    .into_iter()
                    .map(|i| self.into_target(i))
                    .collect::<Result<Vec<_>, _>>()?;
                Expr::Unpack(items)
            }
            Expr::Slice { step: Some(_), .. } => {
                return Err(self
                    .error_at(errors::invalid_assignment(span))
                    .with_note("Slices with a step cannot be assigned to"));
            }
            other if other.is_assignable() => other,
            _ => return Err(self.error_at(errors::invalid_assignment(span))),
        };
        Ok(Spanned::new(node, span))
    }

    /// Decide how a call is generated.
    ///
    /// - a call to a known class is a constructor call
    /// - `Cls.method(...)` on a known class is a static call or a prototype call
    /// - calls to builtin helper names flag the helper
    fn classify_call(&mut self, callee: Spanned<Expr>, args: Vec<Spanned<Expr>>) -> Expr {
        let path = callee.node.dotted_path();
        if let Some(path) = &path {
            if self.state.known_classes.contains_key(path) {
                return Expr::New {
                    callee: Box::new(callee),
                    args,
                };
            }
            if path == "Symbol.for" {
                self.mark(HelperId::SymbolFor);
                let helper = Spanned::new(Expr::Name(helpers::js_name(HelperId::SymbolFor).to_string()), callee.span);
                return Expr::Call {
                    callee: Box::new(helper),
                    args,
                };
            }
        }

        let static_call = match &callee.node {
            Expr::Dot { object, property } => object
                .node
                .dotted_path()
                .and_then(|p| self.state.known_classes.get(&p))
                .map(|info| info.is_static(property)),
            _ => None,
        };
        if let Some(is_static) = static_call {
            if let Expr::Dot { object, property } = callee.node {
                return Expr::ClassCall {
                    class: object,
                    method: property,
                    is_static,
                    args,
                };
            }
        }

        if let Expr::Name(name) = &callee.node {
            if let Some(helper) = helpers::from_trigger(name) {
                self.mark(helper);
            }
        }
        Expr::Call {
            callee: Box::new(callee),
            args,
        }
    }

    /// Register a class under `name` for the rest of this parse.
    fn register_class(&mut self, name: &str, info: ClassInfo, local: bool) {
        self.state.known_classes.insert(name.to_string(), info.clone());
        if local {
            self.module.classes.insert(name.to_string(), info);
        }
    }
}
