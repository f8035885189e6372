//! Whole-program layout and imports.
//!
//! Output order: shebang, entry directives, runtime helpers, the module table, each imported
//! module wrapped in its own function scope (dependencies first), then the entry module's body.

use std::collections::BTreeSet;

use slither_syntax::ast::*;
use slither_syntax::diagnostics::Diagnostics;

use super::Generator;
use crate::backend::baselib;
use crate::backend::config::OutputConfig;
use crate::backend::output::OutputStream;
use crate::backend::position_map::PositionMap;

/// Shared namespace table every module publishes its exports into.
const MODULES_TABLE: &str = "_$sl_modules";

const USE_STRICT: &str = "use strict";

/// A module to print together with the text it was parsed from.
#[derive(Debug, Clone, Copy)]
pub struct ProgramUnit<'a> {
    pub module: &'a Module,
    pub source: &'a str,
}

/// Generated program text.
#[derive(Debug, Clone)]
pub struct GeneratedCode {
    pub code: String,
    pub position_map: Option<PositionMap>,
    /// Helpers referenced anywhere in the program.
    pub baselib: BaselibUsage,
}

/// Print `entry` preceded by its dependencies, which must be in emission order.
#[tracing::instrument(skip_all, fields(module = %entry.module.id, deps = deps.len()))]
pub fn generate(
    entry: ProgramUnit<'_>,
    deps: &[ProgramUnit<'_>],
    config: OutputConfig,
    diagnostics: &mut Diagnostics,
) -> GeneratedCode {
    let mut usage = entry.module.baselib.clone();
    for dep in deps {
        usage.extend(&dep.module.baselib);
    }

    let mut generator = Generator::new(OutputStream::new(config), diagnostics);
    generator.program(entry, deps, &usage);
    let (code, position_map) = generator.into_output().finish();
    GeneratedCode {
        code,
        position_map,
        baselib: usage,
    }
}

/// Print a single module with no dependencies.
pub fn generate_module(module: &Module, source: &str, config: OutputConfig, diagnostics: &mut Diagnostics) -> GeneratedCode {
    generate(ProgramUnit { module, source }, &[], config, diagnostics)
}

impl<'a> Generator<'a> {
    fn program(&mut self, entry: ProgramUnit<'a>, deps: &[ProgramUnit<'a>], usage: &BaselibUsage) {
        if let Some(shebang) = &entry.module.shebang {
            self.out.print_raw(shebang);
            self.out.print_raw("\n");
        }

        let directives = &entry.module.directives;
        if entry.module.strict && !directives.iter().any(|d| d == USE_STRICT) {
            self.directive(USE_STRICT);
        }
        for directive in directives {
            self.directive(directive);
        }

        if !self.out.config().omit_baselib && !usage.is_empty() {
            self.out.print_raw(&baselib::emit(usage));
        }

        if !deps.is_empty() {
            self.module_table(deps);
            for dep in deps {
                self.wrapped_module(*dep);
            }
        }

        self.enter_module(entry.module, entry.source);
        let body_start = entry
            .module
            .body
            .iter()
            .take_while(|s| matches!(s.node, Stmt::Directive(_)))
            .count();
        self.body(&entry.module.body[body_start..]);
    }

    fn directive(&mut self, text: &str) {
        self.line(|g| {
            g.out.print_string(text);
            g.out.semicolon();
        });
    }

    /// `var _$sl_modules = {};` plus one table per module id and package prefix, linked to their
    /// parents so `pkg.sub.name` resolves through the package table.
    fn module_table(&mut self, deps: &[ProgramUnit<'_>]) {
        let mut tables = BTreeSet::new();
        for dep in deps {
            let id = dep.module.id.as_str();
            for (i, _) in id.match_indices('.') {
                tables.insert(&id[..i]);
            }
            tables.insert(id);
        }

        self.line(|g| {
            g.keyword("var");
            g.out.print(MODULES_TABLE);
            g.out.operator("=");
            g.out.print("{}");
            g.out.semicolon();
        });
        for id in &tables {
            self.line(|g| {
                g.module_ref(id);
                g.out.operator("=");
                g.out.print("{}");
                g.out.semicolon();
            });
        }
        for id in &tables {
            let Some((parent, child)) = id.rsplit_once('.') else {
                continue;
            };
            self.line(|g| {
                g.module_ref(parent);
                g.out.print("[");
                g.out.print_string(child);
                g.out.print("]");
                g.out.operator("=");
                g.module_ref(id);
                g.out.semicolon();
            });
        }
    }

    /// `(function() { body; exports })();`
    fn wrapped_module(&mut self, unit: ProgramUnit<'a>) {
        tracing::debug!(module = %unit.module.id, "emitting imported module");
        self.enter_module(unit.module, unit.source);
        self.line(|g| {
            g.out.print("(function()");
            g.out.space();
            g.braces(|g| {
                g.body(&unit.module.body);
                for export in &unit.module.exports {
                    g.line(|g| {
                        g.module_ref(&unit.module.id);
                        g.out.print(".");
                        g.out.print_name(export);
                        g.out.operator("=");
                        g.out.print_name(export);
                        g.out.semicolon();
                    });
                }
            });
            g.out.print(")()");
            g.out.semicolon();
        });
    }

    fn module_ref(&mut self, id: &str) {
        self.out.print(MODULES_TABLE);
        self.out.print("[");
        self.out.print_string(id);
        self.out.print("]");
    }

    /// `import a.b` binds `a`; `import a.b as m` binds `m`; `from a.b import x` binds `x`.
    pub(super) fn import_statement(&mut self, import: &ImportStmt) {
        if import.is_from {
            self.comma_list(&import.names, |g, name| {
                g.out.print_name(name.local());
                g.out.operator("=");
                g.module_ref(&import.module);
                g.out.print(".");
                g.out.print_name(&name.name);
            });
        } else {
            let (local, id) = match &import.alias {
                Some(alias) => (alias.as_str(), import.module.as_str()),
                None => {
                    let root = import.module.split('.').next().unwrap_or(&import.module);
                    (root, root)
                }
            };
            self.out.print_name(local);
            self.out.operator("=");
            self.module_ref(id);
        }
        self.out.semicolon();
    }
}
