//! JavaScript code generation.
//!
//! [`Generator`] walks analyzed modules and prints them through an [`OutputStream`]. The
//! per-kind rules live in focused submodules, each adding methods to the generator:
//!
//! - [`statements`]: statement emission, blocks, loops, exception handling
//! - [`expressions`]: expression emission, operator lowering, parenthesization
//! - [`declarations`]: functions, methods and classes
//! - [`modules`]: imports, the module table and whole-program layout
//!
//! ## Notes
//! - Parenthesization decisions come from [`crate::backend::parens`]; the generator never
//!   parenthesizes ad hoc.
//! - Position mappings are recorded for statements, names, literals, calls and functions. A node
//!   whose span lies outside its source is skipped with a warning.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

mod declarations;
mod expressions;
mod modules;
mod statements;

pub use modules::{GeneratedCode, ProgramUnit, generate, generate_module};

use slither_syntax::ast::{Body, Module, Span, Stmt};
use slither_syntax::diagnostics::{Diagnostics, LineIndex, Warning};

use super::output::OutputStream;

/// The module currently being printed.
struct SourceContext<'a> {
    module: &'a Module,
    /// Index in the position map's `sources`, when a map is being recorded.
    index: Option<u32>,
    lines: LineIndex,
    len: usize,
}

/// Stateful AST printer.
pub struct Generator<'a> {
    out: OutputStream,
    diagnostics: &'a mut Diagnostics,
    ctx: Option<SourceContext<'a>>,
    /// `for` loop nesting within the current function, used to name loop temporaries.
    loop_depth: usize,
}

impl<'a> Generator<'a> {
    pub fn new(out: OutputStream, diagnostics: &'a mut Diagnostics) -> Self {
        Self {
            out,
            diagnostics,
            ctx: None,
            loop_depth: 0,
        }
    }

    /// Print `module`'s statements from now on, mapping positions against `source`.
    fn enter_module(&mut self, module: &'a Module, source: &str) {
        let name = module
            .filename
            .clone()
            .unwrap_or_else(|| format!("<{}>", module.id));
        let index = self.out.add_source(&name);
        self.ctx = Some(SourceContext {
            module,
            index,
            lines: LineIndex::new(source),
            len: source.len(),
        });
        self.loop_depth = 0;
    }

    /// Record a position mapping for the next printed token.
    fn map_node(&mut self, span: Span, name: Option<&str>) {
        if !self.out.has_position_map() || span.is_synthetic() {
            return;
        }
        let Some(ctx) = &self.ctx else {
            return;
        };
        let Some(index) = ctx.index else {
            return;
        };
        if span.start > ctx.len {
            let file = ctx.module.filename.clone().unwrap_or_else(|| ctx.module.id.clone());
            self.diagnostics.warn(
                Warning::new(format!("Unable to map position {} for the position map", span.start))
                    .with_file(file)
                    .with_span(span),
            );
            return;
        }
        let (line, col) = ctx.lines.line_col(span.start);
        self.out.add_mapping(index, (line - 1) as u32, col as u32, name);
    }

    /// Leading source comments of the statement starting at `offset`.
    fn comments_at(&self, offset: usize) -> Vec<String> {
        match &self.ctx {
            Some(ctx) if self.out.config().comments => ctx.module.comments.get(&offset).cloned().unwrap_or_default(),
            _ => Vec::new(),
        }
    }

    // ------------------------------------------------------------------------
    // Layout helpers
    // ------------------------------------------------------------------------

    /// One statement on its own line.
    fn line(&mut self, f: impl FnOnce(&mut Self)) {
        self.out.indent();
        f(self);
        self.out.newline();
    }

    /// `{ ... }` around statements printed by `f`, each on its own line.
    fn braces(&mut self, f: impl FnOnce(&mut Self)) {
        self.out.print("{");
        self.out.newline();
        self.out.push_indent();
        f(self);
        self.out.pop_indent();
        self.out.indent();
        self.out.print("}");
    }

    fn parens(&mut self, f: impl FnOnce(&mut Self)) {
        self.out.print("(");
        f(self);
        self.out.print(")");
    }

    /// Print `items` separated by commas.
    fn comma_list<T>(&mut self, items: &[T], mut f: impl FnMut(&mut Self, &T)) {
        for (i, item) in items.iter().enumerate() {
            if i > 0 {
                self.out.comma();
            }
            f(self, item);
        }
    }

    /// Print a keyword followed by optional whitespace.
    fn keyword(&mut self, kw: &str) {
        self.out.print(kw);
        self.out.space();
    }

    /// Consume the generator, returning its output stream.
    pub fn into_output(self) -> OutputStream {
        self.out
    }
}

/// Whether a statement prints anything.
fn emits_code(stmt: &Stmt) -> bool {
    match stmt {
        Stmt::Pass | Stmt::Nonlocal(_) => false,
        Stmt::Var(names) => !names.is_empty(),
        _ => true,
    }
}

fn has_code(body: &Body) -> bool {
    body.iter().any(|s| emits_code(&s.node))
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use slither_syntax::ast::{Expr, Spanned};

    use super::*;
    use crate::backend::config::OutputConfig;

    fn name_statement(name: &str, span: Span) -> Spanned<Stmt> {
        Spanned::new(Stmt::Expr(Spanned::synthetic(Expr::Name(name.to_string()))), span)
    }

    #[test]
    fn test_unmappable_position_warns_and_is_skipped() {
        let module = Module {
            id: "__main__".to_string(),
            filename: Some("app.pyj".to_string()),
            body: vec![name_statement("y", Span::new(0, 1)), name_statement("x", Span::new(40, 41))],
            ..Module::default()
        };
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink_seen = Rc::clone(&seen);
        let mut diagnostics = Diagnostics::with_sink(Box::new(move |text: &str| sink_seen.borrow_mut().push(text.to_string())));

        let out = generate_module(
            &module,
            "y\n",
            OutputConfig::default().with_omit_baselib(true).with_source_map(true),
            &mut diagnostics,
        );

        assert_eq!(out.code, "y;x");
        assert_eq!(diagnostics.warnings().len(), 1);
        let warning = &diagnostics.warnings()[0];
        assert!(warning.message.contains("Unable to map position 40"), "{}", warning.message);
        assert_eq!(warning.file.as_deref(), Some("app.pyj"));
        assert_eq!(warning.span, Some(Span::new(40, 41)));
        assert_eq!(seen.borrow().len(), 1);

        let Some(map) = out.position_map else {
            panic!("position map was requested");
        };
        let mappings = map.mappings();
        assert_eq!(mappings.len(), 1);
        assert_eq!((mappings[0].original_line, mappings[0].original_column), (0, 0));
    }
}
