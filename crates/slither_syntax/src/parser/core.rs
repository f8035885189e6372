/// Parser core types.
///
/// This chunk defines [`ParseOptions`], the [`ImportHook`] seam through which imports reach the
/// module resolver, the mutable [`ParseState`] record, and the [`Parser`] itself.
///
/// ## Notes
/// - This file is `include!`'d into `crate::parser` to keep all parser methods in a
///   single module while avoiding a single “god file”.

/// Options for one parser invocation.
#[derive(Debug, Clone)]
pub struct ParseOptions {
    /// Treat the module as strict even without a `"use strict"` directive.
    pub strict: bool,
    pub filename: Option<String>,
    /// Rebind non-static methods to their instance in each constructor.
    pub auto_bind: bool,
    /// Dotted id of the module being parsed.
    pub module_id: String,
    /// Classes compiled elsewhere that calls in this module should know about.
    pub classes: ClassRegistry,
    pub file: FileId,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            strict: false,
            filename: None,
            auto_bind: false,
            module_id: "__main__".to_string(),
            classes: ClassRegistry::new(),
            file: FileId::default(),
        }
    }
}

impl ParseOptions {
    pub fn with_filename(mut self, filename: impl Into<String>) -> Self {
        self.filename = Some(filename.into());
        self
    }

    pub fn with_module_id(mut self, id: impl Into<String>) -> Self {
        self.module_id = id.into();
        self
    }

    pub fn with_auto_bind(mut self, auto_bind: bool) -> Self {
        self.auto_bind = auto_bind;
        self
    }

    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    pub fn with_classes(mut self, classes: ClassRegistry) -> Self {
        self.classes = classes;
        self
    }
}

/// What an imported module contributes to the importer's parse.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ImportedModule {
    pub id: String,
    pub exports: Vec<Ident>,
    pub classes: ClassRegistry,
}

/// Resolves imports while a module is being parsed.
///
/// Implemented by the module resolver in the root crate. The parser calls
/// [`ImportHook::import_module`] the moment it meets an import statement, so a cyclic or missing
/// import aborts the enclosing parse.
pub trait ImportHook {
    /// Resolve `module_id` on behalf of `importer`.
    ///
    /// ## Errors
    /// - An import error for cycles or modules that cannot be found.
    /// - Any lexical/syntax error raised while parsing the imported module.
    fn import_module(&mut self, module_id: &str, importer: &str, span: Span) -> Result<ImportedModule, CompileError>;

    /// Receive a non-fatal diagnostic raised during parsing.
    fn warn(&mut self, warning: Warning) {
        tracing::warn!("{}", warning);
    }
}

/// Mutable parse-time context threaded through every parser function.
#[derive(Debug, Default)]
pub struct ParseState {
    /// Enclosing class names, innermost last.
    pub class_stack: Vec<Ident>,
    /// Active statement labels, innermost last.
    pub labels: Vec<Ident>,
    pub loop_depth: usize,
    pub switch_depth: usize,
    pub function_depth: usize,
    /// Number of enclosing `except` handlers; a bare `raise` needs at least one.
    pub except_depth: usize,
    /// Decorators waiting for the `def`/`class` they apply to.
    pub decorators: Vec<Spanned<Expr>>,
    /// Every class visible to this module: local, imported (possibly dotted) and external.
    pub known_classes: ClassRegistry,
    /// Open brackets around the current token; newlines only end statements at depth zero.
    pub bracket_depth: usize,
}

/// Saved loop/label context, restored when leaving a function body.
struct FunctionContext {
    labels: Vec<Ident>,
    loop_depth: usize,
    switch_depth: usize,
    except_depth: usize,
}

/// Recursive-descent parser over a streaming [`Lexer`].
pub struct Parser<'a> {
    lexer: Lexer<'a>,
    /// Current (not yet consumed) token.
    token: Token,
    /// End offset of the last consumed non-layout token.
    prev_end: usize,
    options: &'a ParseOptions,
    hook: Option<&'a mut dyn ImportHook>,
    state: ParseState,
    module: Module,
}

impl<'a> Parser<'a> {
    /// Create a parser and read the first token.
    ///
    /// ## Errors
    /// Returns a lexical error if the very first token is malformed.
    pub fn new(
        source: &'a str,
        options: &'a ParseOptions,
        hook: Option<&'a mut dyn ImportHook>,
    ) -> Result<Self, CompileError> {
        let mut lexer = Lexer::new(source).with_file(options.file);
        let token = lexer
            .next_token(false)
            .map_err(|e| locate(options.filename.as_deref(), e))?;
        let state = ParseState {
            known_classes: options.classes.clone(),
            ..ParseState::default()
        };
        let module = Module {
            id: options.module_id.clone(),
            filename: options.filename.clone(),
            strict: options.strict,
            ..Module::default()
        };
        Ok(Self {
            lexer,
            token,
            prev_end: 0,
            options,
            hook,
            state,
            module,
        })
    }

    /// Parse the whole input into a [`Module`].
    ///
    /// ## Errors
    /// Returns the first lexical, syntax or import error; there is no recovery.
    pub fn parse_module(mut self) -> Result<Module, CompileError> {
        if let TokenKind::Shebang(line) = &self.token.kind {
            self.module.shebang = Some(line.clone());
            self.advance()?;
        }

        let mut body = self.directives()?;
        self.module.directives = body
            .iter()
            .filter_map(|s| match &s.node {
                Stmt::Directive(text) => Some(text.clone()),
                _ => None,
            })
            .collect();
        if self.module.directives.iter().any(|d| d == "use strict") {
            self.module.strict = true;
        }

        while !self.is_at_end() {
            if let Some(stmt) = self.statement()? {
                body.push(stmt);
            }
        }
        self.module.body = body;
        Ok(self.module)
    }
}

/// Attach the file name to an error raised while parsing it.
fn locate(filename: Option<&str>, err: CompileError) -> CompileError {
    match filename {
        Some(f) => err.in_file(f),
        None => err,
    }
}
