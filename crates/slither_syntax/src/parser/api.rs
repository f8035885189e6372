/// Parse `source` into a [`Module`] without an import resolver.
///
/// Any `import` statement fails with a module-not-found error; use [`parse_with_hook`] to resolve
/// imports.
///
/// ## Errors
/// Returns the first lexical or syntax error.
#[tracing::instrument(skip_all, fields(module = %options.module_id, bytes = source.len()))]
pub fn parse(source: &str, options: &ParseOptions) -> Result<Module, CompileError> {
    Parser::new(source, options, None)?.parse_module()
}

/// Parse `source`, resolving imports through `hook` as they are encountered.
///
/// ## Errors
/// Returns the first lexical, syntax or import error, including errors raised while parsing an
/// imported module.
#[tracing::instrument(skip_all, fields(module = %options.module_id, bytes = source.len()))]
pub fn parse_with_hook<'a>(
    source: &'a str,
    options: &'a ParseOptions,
    hook: Option<&'a mut dyn ImportHook>,
) -> Result<Module, CompileError> {
    Parser::new(source, options, hook)?.parse_module()
}
