//! Module resolution for multi-file Slither programs
//!
//! Resolves dotted import paths like `import pkg.util` to source text through a [`ModuleLoader`],
//! parses every module exactly once, and rejects import cycles.
//!
//! The [`ModuleResolver`] is the parser's [`ImportHook`]: an import statement is resolved the
//! moment it is parsed, so the imported module's exports and classes are available for the rest
//! of the importing module.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use super::ast::{Module, Span};
use super::diagnostics::{CompileError, Diagnostics, Warning, errors};
use super::lexer::FileId;
use super::parser::{self, ImportHook, ImportedModule, ParseOptions};
use super::scope;

/// File extension of Slither sources.
pub const SOURCE_EXTENSION: &str = "pyj";

/// Source text returned by a [`ModuleLoader`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedSource {
    pub source: String,
    /// Name reported in diagnostics and position maps.
    pub filename: String,
}

/// Maps a dotted module id to its source text.
pub trait ModuleLoader {
    /// Load `module_id`, searching `roots` in order; `None` when no root has it.
    fn load(&mut self, module_id: &str, roots: &[PathBuf]) -> Option<LoadedSource>;
}

/// Loads modules from disk.
///
/// `pkg.mod` is looked up under each root as `pkg/mod/__init__.pyj`, then `pkg/mod.pyj`.
#[derive(Debug, Default, Clone)]
pub struct FsLoader;

impl FsLoader {
    pub fn new() -> Self {
        Self
    }

    /// Candidate files for `module_id` under `root`, most specific first.
    pub fn candidates(root: &Path, module_id: &str) -> [PathBuf; 2] {
        let mut base = root.to_path_buf();
        for segment in module_id.split('.') {
            base.push(segment);
        }
        let package = base.join(format!("__init__.{SOURCE_EXTENSION}"));
        let file = base.with_extension(SOURCE_EXTENSION);
        [package, file]
    }
}

impl ModuleLoader for FsLoader {
    fn load(&mut self, module_id: &str, roots: &[PathBuf]) -> Option<LoadedSource> {
        roots
            .iter()
            .flat_map(|root| Self::candidates(root, module_id))
            .find_map(|path| {
                let source = fs::read_to_string(&path).ok()?;
                tracing::debug!(module = module_id, path = %path.display(), "loaded module source");
                Some(LoadedSource {
                    source,
                    filename: path.display().to_string(),
                })
            })
    }
}

/// In-memory loader keyed by module id, for embedding and tests.
#[derive(Debug, Default, Clone)]
pub struct MemoryLoader {
    modules: HashMap<String, String>,
}

impl MemoryLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_module(mut self, module_id: impl Into<String>, source: impl Into<String>) -> Self {
        self.modules.insert(module_id.into(), source.into());
        self
    }
}

impl ModuleLoader for MemoryLoader {
    fn load(&mut self, module_id: &str, _roots: &[PathBuf]) -> Option<LoadedSource> {
        self.modules.get(module_id).map(|source| LoadedSource {
            source: source.clone(),
            filename: format!("{}.{SOURCE_EXTENSION}", module_id.replace('.', "/")),
        })
    }
}

/// A parsed and analyzed module together with the text it was parsed from.
#[derive(Debug, Clone)]
pub struct ResolvedModule {
    pub module: Module,
    pub source: String,
}

/// Collects every module a compilation needs.
///
/// Holds the per-compilation module cache (fully imported modules) and the cycle guard (modules
/// whose import is still in progress). One resolver serves one compilation.
pub struct ModuleResolver {
    loader: Box<dyn ModuleLoader>,
    roots: Vec<PathBuf>,
    /// Template for dependency parses (strict, auto-bind, external classes).
    options: ParseOptions,
    /// Fully imported modules in dependency-first order.
    resolved: Vec<ResolvedModule>,
    index: HashMap<String, usize>,
    /// Import chain currently being parsed, outermost first.
    loading: Vec<String>,
    next_file: u32,
    diagnostics: Diagnostics,
}

impl ModuleResolver {
    pub fn new(loader: Box<dyn ModuleLoader>, roots: Vec<PathBuf>) -> Self {
        Self {
            loader,
            roots,
            options: ParseOptions::default(),
            resolved: Vec::new(),
            index: HashMap::new(),
            loading: Vec::new(),
            next_file: 1,
            diagnostics: Diagnostics::new(),
        }
    }

    /// Parse options applied to every imported module (the module id and file name are replaced).
    pub fn with_options(mut self, options: ParseOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_diagnostics(mut self, diagnostics: Diagnostics) -> Self {
        self.diagnostics = diagnostics;
        self
    }

    /// Parse and analyze the entry module, resolving its imports transitively.
    ///
    /// ## Errors
    /// Returns the first lexical, syntax or import error in the entry module or any module it
    /// imports.
    #[tracing::instrument(skip_all, fields(module = %options.module_id))]
    pub fn resolve_entry(&mut self, source: &str, options: &ParseOptions) -> Result<Module, CompileError> {
        self.loading.push(options.module_id.clone());
        let result = parser::parse_with_hook(source, options, Some(&mut *self));
        self.loading.pop();
        let mut module = result?;
        scope::analyze_module(&mut module);
        module.import_order = self.resolved.len();
        Ok(module)
    }

    /// Resolve a module by id, loading it if it is not cached yet.
    ///
    /// ## Errors
    /// Returns an import error when the module cannot be found, or any error from parsing it.
    #[tracing::instrument(skip_all, fields(module = module_id))]
    pub fn resolve(&mut self, module_id: &str) -> Result<&ResolvedModule, CompileError> {
        self.import_module(module_id, "<root>", Span::default())?;
        let idx = self.index[module_id];
        Ok(&self.resolved[idx])
    }

    /// Modules resolved so far, dependencies before their importers.
    pub fn modules(&self) -> &[ResolvedModule] {
        &self.resolved
    }

    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    /// Take ownership of the resolved modules and collected warnings.
    pub fn into_parts(self) -> (Vec<ResolvedModule>, Diagnostics) {
        (self.resolved, self.diagnostics)
    }

    fn search_roots(&self) -> Vec<String> {
        self.roots.iter().map(|r| r.display().to_string()).collect()
    }
}

impl ImportHook for ModuleResolver {
    fn import_module(&mut self, module_id: &str, importer: &str, span: Span) -> Result<ImportedModule, CompileError> {
        if let Some(&idx) = self.index.get(module_id) {
            tracing::debug!(module = module_id, importer, "module cache hit");
            let module = &self.resolved[idx].module;
            return Ok(ImportedModule {
                id: module.id.clone(),
                exports: module.exports.clone(),
                classes: module.classes.clone(),
            });
        }
        if self.loading.iter().any(|m| m == module_id) {
            return Err(errors::cyclic_import(module_id, importer, span));
        }

        tracing::debug!(module = module_id, importer, "module cache miss");
        let Some(loaded) = self.loader.load(module_id, &self.roots) else {
            return Err(errors::module_not_found(module_id, &self.search_roots(), span));
        };

        let mut options = self
            .options
            .clone()
            .with_module_id(module_id)
            .with_filename(loaded.filename.clone());
        options.file = FileId(self.next_file);
        self.next_file += 1;

        self.loading.push(module_id.to_string());
        let result = parser::parse_with_hook(&loaded.source, &options, Some(&mut *self));
        self.loading.pop();
        let mut module = result?;

        scope::analyze_module(&mut module);
        module.import_order = self.resolved.len();
        let imported = ImportedModule {
            id: module.id.clone(),
            exports: module.exports.clone(),
            classes: module.classes.clone(),
        };
        self.index.insert(module_id.to_string(), self.resolved.len());
        self.resolved.push(ResolvedModule {
            module,
            source: loaded.source,
        });
        Ok(imported)
    }

    fn warn(&mut self, warning: Warning) {
        self.diagnostics.warn(warning);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolver(loader: MemoryLoader) -> ModuleResolver {
        ModuleResolver::new(Box::new(loader), Vec::new())
    }

    #[test]
    fn test_fs_candidates_prefer_packages() {
        let [package, file] = FsLoader::candidates(Path::new("lib"), "pkg.util");
        assert_eq!(package, Path::new("lib/pkg/util/__init__.pyj"));
        assert_eq!(file, Path::new("lib/pkg/util.pyj"));
    }

    #[test]
    fn test_dependencies_come_first() {
        let loader = MemoryLoader::new()
            .with_module("a", "import b\ndef fa():\n    return b.fb()\n")
            .with_module("b", "def fb():\n    return 1\n");
        let mut resolver = resolver(loader);
        let entry = resolver
            .resolve_entry("import a\nimport b\n", &ParseOptions::default())
            .unwrap();
        let ids: Vec<_> = resolver.modules().iter().map(|m| m.module.id.as_str()).collect();
        assert_eq!(ids, ["b", "a"]);
        assert_eq!(entry.import_order, 2);
        assert_eq!(resolver.modules()[1].module.exports, vec!["fa".to_string()]);
    }

    #[test]
    fn test_cycle_names_both_modules() {
        let loader = MemoryLoader::new()
            .with_module("a", "import b\n")
            .with_module("b", "import a\n");
        let err = resolver(loader)
            .resolve_entry("import a\n", &ParseOptions::default())
            .unwrap_err();
        assert!(err.message.contains("'a'"), "{}", err.message);
        assert!(err.message.contains("'b'"), "{}", err.message);
        assert_eq!(err.file.as_deref(), Some("b.pyj"));
    }

    #[test]
    fn test_missing_module_lists_roots() {
        let mut resolver = ModuleResolver::new(Box::new(MemoryLoader::new()), vec![PathBuf::from("lib")]);
        let err = resolver.resolve("nowhere").unwrap_err();
        assert!(err.message.contains("'nowhere'"));
        assert!(err.notes.iter().any(|n| n.contains("lib")));
    }

    #[test]
    fn test_imported_classes_are_constructed() {
        let loader = MemoryLoader::new().with_module("shapes", "class Square:\n    def area(self):\n        return 4\n");
        let mut resolver = resolver(loader);
        let entry = resolver
            .resolve_entry("import shapes\ns = shapes.Square()\n", &ParseOptions::default())
            .unwrap();
        let printed = format!("{:?}", entry.body[1].node);
        assert!(printed.contains("New"), "{printed}");
    }
}
