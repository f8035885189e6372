/// Import statements.
///
/// Every import is resolved through the [`ImportHook`] while parsing, so the imported module's
/// exports and classes are known before the rest of this module is read.
impl<'a> Parser<'a> {
    /// `import a.b [as m]` or `from a.b import x [as y], ...`.
    fn import_statement(&mut self) -> Result<Stmt, CompileError> {
        if self.match_keyword(KeywordId::From)? {
            return self.from_import();
        }
        self.advance()?;
        let (module, span) = self.module_path()?;
        let alias = if self.match_keyword(KeywordId::As)? {
            Some(self.expect_name("module alias")?)
        } else {
            None
        };
        if self.check_punct(PunctuationId::Comma) {
            return Err(self
                .error_here("Only one module may be imported per 'import' statement")
                .with_hint("Put each import on its own line"));
        }

        let imported = self.resolve_import(&module, span)?;
        let prefix = alias.clone().unwrap_or_else(|| module.clone());
        for (class, info) in imported.classes {
            self.register_class(&format!("{prefix}.{class}"), info, false);
        }
        self.end_statement()?;
        Ok(Stmt::Import(ImportStmt {
            module,
            alias,
            names: Vec::new(),
            is_from: false,
        }))
    }

    fn from_import(&mut self) -> Result<Stmt, CompileError> {
        let (module, span) = self.module_path()?;
        self.expect_keyword(KeywordId::Import, "'import'")?;
        let parenthesized = self.match_punct(PunctuationId::LParen)?;

        let mut names = Vec::new();
        loop {
            let start = self.start();
            let name = self.expect_name("imported name")?;
            let alias = if self.match_keyword(KeywordId::As)? {
                Some(self.expect_name("import alias")?)
            } else {
                None
            };
            names.push(ImportName {
                name,
                alias,
                span: self.span_from(start),
            });
            if !self.match_punct(PunctuationId::Comma)? {
                break;
            }
            if parenthesized && self.check_punct(PunctuationId::RParen) {
                break;
            }
        }
        if parenthesized {
            self.expect_punct(PunctuationId::RParen, "')'")?;
        }

        let imported = self.resolve_import(&module, span)?;
        for name in &names {
            if !imported.exports.contains(&name.name) {
                self.warn(
                    Warning::new(format!("'{}' is not exported by module '{}'", name.name, module)).with_span(name.span),
                );
            }
            if let Some(info) = imported.classes.get(&name.name) {
                self.register_class(name.local(), info.clone(), false);
            }
        }
        self.end_statement()?;
        Ok(Stmt::Import(ImportStmt {
            module,
            alias: None,
            names,
            is_from: true,
        }))
    }

    /// Dotted module id such as `pkg.sub.mod`.
    fn module_path(&mut self) -> Result<(String, Span), CompileError> {
        let start = self.start();
        let mut path = self.expect_name("module name")?;
        while self.match_punct(PunctuationId::Dot)? {
            path.push('.');
            path.push_str(&self.expect_name("module name")?);
        }
        Ok((path, self.span_from(start)))
    }

    fn resolve_import(&mut self, module: &str, span: Span) -> Result<ImportedModule, CompileError> {
        if !self.module.submodules.iter().any(|m| m == module) {
            self.module.submodules.push(module.to_string());
        }
        let importer = self.module.id.clone();
        let result = match self.hook.as_deref_mut() {
            Some(hook) => hook.import_module(module, &importer, span),
            None => Err(errors::module_not_found(module, &[], span)),
        };
        // Errors from the imported file already carry their own position.
        result.map_err(|e| if e.line == 0 { self.error_at(e) } else { e })
    }
}
