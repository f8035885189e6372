//! Compiler entry point
//!
//! [`compile`] takes the source text of an entry module and produces the complete JavaScript
//! program: the entry module, every module it imports (transitively), and the runtime helpers
//! they use.

use std::path::PathBuf;

use crate::backend::baselib;
use crate::backend::codegen::{self, ProgramUnit};
use crate::backend::config::OutputConfig;
use crate::backend::position_map::PositionMap;
use crate::frontend::ast::ClassRegistry;
use crate::frontend::diagnostics::{CompileError, Diagnostics, Warning, WarningSink};
use crate::frontend::module::{FsLoader, ModuleLoader, ModuleResolver};
use crate::frontend::parser::ParseOptions;

/// Options for one compilation.
#[derive(Debug, Clone)]
pub struct CompileOptions {
    /// Treat every module as strict (also enabled per module by `"use strict"`).
    pub strict: bool,
    /// Rebind non-static methods to the instance in each constructor.
    pub auto_bind: bool,
    /// Leave runtime helper definitions out of the output.
    pub omit_baselib: bool,
    pub beautify: bool,
    pub indent_width: usize,
    pub ascii_only: bool,
    pub max_line_len: usize,
    /// Re-emit leading source comments as `//` comments.
    pub comments: bool,
    /// Record a position map alongside the generated code.
    pub source_map: bool,
    pub module_id: String,
    /// Name of the entry file, used in diagnostics and the position map.
    pub filename: Option<String>,
    /// Searched first for imports.
    pub base_dir: PathBuf,
    /// Searched in order after `base_dir`.
    pub lib_dirs: Vec<PathBuf>,
    /// Classes compiled separately that calls in this program should know about.
    pub classes: ClassRegistry,
}

impl Default for CompileOptions {
    fn default() -> Self {
        let output = OutputConfig::default();
        Self {
            strict: false,
            auto_bind: false,
            omit_baselib: false,
            beautify: output.beautify,
            indent_width: output.indent_width,
            ascii_only: output.ascii_only,
            max_line_len: output.max_line_len,
            comments: false,
            source_map: false,
            module_id: ParseOptions::default().module_id,
            filename: None,
            base_dir: PathBuf::from("."),
            lib_dirs: Vec::new(),
            classes: ClassRegistry::new(),
        }
    }
}

impl CompileOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    pub fn with_auto_bind(mut self, auto_bind: bool) -> Self {
        self.auto_bind = auto_bind;
        self
    }

    pub fn with_omit_baselib(mut self, omit: bool) -> Self {
        self.omit_baselib = omit;
        self
    }

    pub fn with_beautify(mut self, beautify: bool) -> Self {
        self.beautify = beautify;
        self
    }

    pub fn with_indent_width(mut self, width: usize) -> Self {
        self.indent_width = width;
        self
    }

    pub fn with_ascii_only(mut self, ascii_only: bool) -> Self {
        self.ascii_only = ascii_only;
        self
    }

    pub fn with_max_line_len(mut self, len: usize) -> Self {
        self.max_line_len = len;
        self
    }

    pub fn with_comments(mut self, comments: bool) -> Self {
        self.comments = comments;
        self
    }

    pub fn with_source_map(mut self, source_map: bool) -> Self {
        self.source_map = source_map;
        self
    }

    pub fn with_module_id(mut self, id: impl Into<String>) -> Self {
        self.module_id = id.into();
        self
    }

    pub fn with_filename(mut self, filename: impl Into<String>) -> Self {
        self.filename = Some(filename.into());
        self
    }

    pub fn with_base_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.base_dir = dir.into();
        self
    }

    pub fn with_lib_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.lib_dirs.push(dir.into());
        self
    }

    pub fn with_classes(mut self, classes: ClassRegistry) -> Self {
        self.classes = classes;
        self
    }

    fn parse_options(&self) -> ParseOptions {
        let mut options = ParseOptions::default()
            .with_module_id(self.module_id.clone())
            .with_strict(self.strict)
            .with_auto_bind(self.auto_bind)
            .with_classes(self.classes.clone());
        if let Some(filename) = &self.filename {
            options = options.with_filename(filename.clone());
        }
        options
    }

    /// Dependency parses share everything but the id, file name and external classes.
    fn dependency_options(&self) -> ParseOptions {
        ParseOptions::default()
            .with_strict(self.strict)
            .with_auto_bind(self.auto_bind)
    }

    fn output_config(&self) -> OutputConfig {
        OutputConfig::default()
            .with_beautify(self.beautify)
            .with_indent_width(self.indent_width)
            .with_ascii_only(self.ascii_only)
            .with_max_line_len(self.max_line_len)
            .with_comments(self.comments)
            .with_source_map(self.source_map)
            .with_strict(self.strict)
            .with_omit_baselib(self.omit_baselib)
    }

    fn search_roots(&self) -> Vec<PathBuf> {
        std::iter::once(self.base_dir.clone())
            .chain(self.lib_dirs.iter().cloned())
            .collect()
    }
}

/// Result of a successful compilation.
#[derive(Debug, Clone)]
pub struct CompileOutput {
    pub code: String,
    pub position_map: Option<PositionMap>,
    /// Keys of the runtime helpers the program uses, in emission order.
    pub baselib_usage: Vec<&'static str>,
    /// Ids of the imported modules, in emission order.
    pub modules: Vec<String>,
    pub warnings: Vec<Warning>,
}

/// A configured compiler: where imports come from and where warnings go.
pub struct Compiler {
    loader: Box<dyn ModuleLoader>,
    sink: Option<WarningSink>,
}

impl Default for Compiler {
    fn default() -> Self {
        Self::new()
    }
}

impl Compiler {
    /// A compiler that loads imports from the filesystem.
    pub fn new() -> Self {
        Self {
            loader: Box::new(FsLoader::new()),
            sink: None,
        }
    }

    pub fn with_loader(mut self, loader: impl ModuleLoader + 'static) -> Self {
        self.loader = Box::new(loader);
        self
    }

    /// Forward each warning's text to `sink` as it is reported.
    pub fn with_warning_sink(mut self, sink: WarningSink) -> Self {
        self.sink = Some(sink);
        self
    }

    /// Compile `source` as the entry module.
    ///
    /// ## Errors
    /// Returns the first lexical, syntax or import error in the program. Warnings never fail a
    /// compilation; they are returned in [`CompileOutput::warnings`].
    #[tracing::instrument(skip_all, fields(module = %options.module_id))]
    pub fn compile(self, source: &str, options: &CompileOptions) -> Result<CompileOutput, CompileError> {
        let diagnostics = match self.sink {
            Some(sink) => Diagnostics::with_sink(sink),
            None => Diagnostics::new(),
        };
        let mut resolver = ModuleResolver::new(self.loader, options.search_roots())
            .with_options(options.dependency_options())
            .with_diagnostics(diagnostics);

        let entry = resolver.resolve_entry(source, &options.parse_options())?;
        let (deps, mut diagnostics) = resolver.into_parts();

        let units: Vec<ProgramUnit<'_>> = deps
            .iter()
            .map(|dep| ProgramUnit {
                module: &dep.module,
                source: &dep.source,
            })
            .collect();
        let config = options.output_config().with_strict(options.strict || entry.strict);
        let generated = codegen::generate(
            ProgramUnit {
                module: &entry,
                source,
            },
            &units,
            config,
            &mut diagnostics,
        );

        let baselib_usage = baselib::usage_keys(&generated.baselib);
        tracing::debug!(helpers = ?baselib_usage, modules = deps.len(), "compiled program");
        Ok(CompileOutput {
            code: generated.code,
            position_map: generated.position_map,
            baselib_usage,
            modules: deps.iter().map(|d| d.module.id.clone()).collect(),
            warnings: diagnostics.into_warnings(),
        })
    }
}

/// Compile `source` with imports loaded from the filesystem.
///
/// ## Errors
/// See [`Compiler::compile`].
pub fn compile(source: &str, options: &CompileOptions) -> Result<CompileOutput, CompileError> {
    Compiler::new().compile(source, options)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frontend::module::MemoryLoader;

    #[test]
    fn test_output_config_follows_options() {
        let options = CompileOptions::default()
            .with_beautify(true)
            .with_indent_width(2)
            .with_source_map(true)
            .with_omit_baselib(true);
        let config = options.output_config();
        assert!(config.beautify);
        assert_eq!(config.indent_width, 2);
        assert!(config.source_map);
        assert!(config.omit_baselib);
    }

    #[test]
    fn test_search_roots_put_base_dir_first() {
        let options = CompileOptions::default().with_base_dir("src").with_lib_dir("lib");
        assert_eq!(options.search_roots(), vec![PathBuf::from("src"), PathBuf::from("lib")]);
    }

    #[test]
    fn test_compile_reports_helpers() {
        let out = compile("x = a in b\n", &CompileOptions::default()).unwrap();
        assert_eq!(out.baselib_usage, vec!["in"]);
        assert!(out.code.starts_with("function _$sl_in("), "{}", out.code);
        assert!(out.code.ends_with("x=_$sl_in(a,b)"), "{}", out.code);
    }

    #[test]
    fn test_compile_lists_imported_modules() {
        let loader = MemoryLoader::new()
            .with_module("util", "def helper():\n    return 1\n")
            .with_module("app", "from util import helper\n");
        let out = Compiler::new()
            .with_loader(loader)
            .compile("import app\n", &CompileOptions::default())
            .unwrap();
        assert_eq!(out.modules, vec!["util".to_string(), "app".to_string()]);
        assert!(out.warnings.is_empty());
    }

    #[test]
    fn test_strict_directive_is_printed_once() {
        let out = compile("\"use strict\"\nx = 8\n", &CompileOptions::default()).unwrap();
        assert_eq!(out.code, "\"use strict\";var x;x=8");
    }
}
