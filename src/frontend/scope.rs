//! Scope analysis: hoisted variables, callables and exports.
//!
//! Runs once per module after parsing. For every function, class and the module itself it
//! records a [`ScopeRecord`]:
//!
//! - `vars`: names assigned anywhere in the scope (excluding nested function/class bodies),
//!   minus parameters, `nonlocal` names and callables. Function and module scopes get these
//!   hoisted into a single [`Stmt::Var`] after their leading directives.
//! - `callables`: names bound by `def`/`class` statements at this level. A module's callables
//!   are its exports.
//! - `classes`: nested class declarations.
//!
//! The analyzer works bottom-up: nested scopes are finished before their parent is collected.

use super::ast::visit::{self, Visitor};
use super::ast::visit_mut::{self, VisitMut};
use super::ast::*;

/// Temporary holding the value being destructured by a tuple assignment or tuple loop target.
pub const UNPACK_TEMP: &str = "_$sl_Unpack";

/// Temporary holding the shared middle operand of a chained comparison.
pub const COND_TEMP: &str = "_$sl_cond_temp";

/// Temporary holding the evaluated stop bound of a counting `for` loop at nesting `depth`.
pub fn range_end_temp(depth: usize) -> String {
    format!("_$sl_End{depth}")
}

/// Analyze every scope in `module`, filling scope records, exports and hoisted declarations.
#[tracing::instrument(skip_all, fields(module = %module.id))]
pub fn analyze_module(module: &mut Module) {
    let mut analyzer = ScopeAnalyzer;
    visit_mut::walk_body_mut(&mut analyzer, &mut module.body);

    let scope = collect_scope(&module.body, &[]);
    hoist(&mut module.body, &scope.vars);
    module.exports = scope.callables.clone();
    tracing::debug!(vars = scope.vars.len(), exports = module.exports.len(), "module scope analyzed");
    module.scope = scope;
}

/// Compute the scope record for a statement list whose own bindings include `bound`.
pub fn collect_scope(body: &Body, bound: &[Ident]) -> ScopeRecord {
    let mut collector = ScopeCollector::default();
    visit::walk_body(&mut collector, body);
    collector.finish(bound)
}

/// Whether a chained comparison operand can be repeated without re-evaluating anything.
pub fn is_bare_operand(expr: &Expr) -> bool {
    matches!(expr, Expr::Name(_) | Expr::Number(_) | Expr::Str(_) | Expr::Atom(_))
}

/// Insert `var ...;` after the leading directives of `body`.
fn hoist(body: &mut Body, vars: &[Ident]) {
    if vars.is_empty() {
        return;
    }
    let at = body
        .iter()
        .position(|s| !matches!(s.node, Stmt::Directive(_)))
        .unwrap_or(body.len());
    body.insert(at, Spanned::synthetic(Stmt::Var(vars.to_vec())));
}

/// Transformer attaching scope records to every function and class.
struct ScopeAnalyzer;

impl VisitMut for ScopeAnalyzer {
    fn visit_function_mut(&mut self, func: &mut FunctionDef) {
        visit_mut::walk_function_mut(self, func);

        let mut bound: Vec<Ident> = func.params.iter().map(|p| p.name.clone()).collect();
        bound.extend(func.rest.iter().cloned());
        bound.extend(func.receiver.iter().cloned());
        let scope = collect_scope(&func.body, &bound);
        hoist(&mut func.body, &scope.vars);
        func.scope = scope;
    }

    fn visit_class_mut(&mut self, class: &mut ClassDef) {
        visit_mut::walk_class_mut(self, class);
        // Class-level assignments become prototype attributes rather than variables.
        class.scope = collect_scope(&class.body, &[]);
    }
}

/// Collects the bindings of a single scope; nested function and class bodies are opaque.
#[derive(Debug, Default)]
struct ScopeCollector {
    vars: Vec<Ident>,
    callables: Vec<Ident>,
    classes: std::collections::BTreeMap<Ident, Span>,
    nonlocals: Vec<Ident>,
    uses_dynamic: bool,
    /// `for` loop nesting, matching the generator's loop temporaries.
    loop_depth: usize,
}

impl ScopeCollector {
    fn declare(&mut self, name: &str) {
        if !self.vars.iter().any(|v| v == name) {
            self.vars.push(name.to_string());
        }
    }

    fn callable(&mut self, name: &str) {
        if !self.callables.iter().any(|c| c == name) {
            self.callables.push(name.to_string());
        }
    }

    /// Record the names an assignment or loop target binds, and walk the parts it evaluates.
    fn bind_target(&mut self, target: &Spanned<Expr>) {
        match &target.node {
            Expr::Name(name) => self.declare(name),
            Expr::Unpack(items) => {
                self.declare(UNPACK_TEMP);
                for item in items {
                    self.bind_target(item);
                }
            }
            _ => self.visit_expr(target),
        }
    }

    fn finish(self, bound: &[Ident]) -> ScopeRecord {
        let excluded = |name: &Ident| {
            self.nonlocals.contains(name) || bound.contains(name) || self.callables.contains(name)
        };
        let vars = self.vars.iter().filter(|v| !excluded(v)).cloned().collect();
        ScopeRecord {
            vars,
            callables: self.callables,
            classes: self.classes,
            nonlocals: self.nonlocals,
            uses_dynamic: self.uses_dynamic,
        }
    }
}

impl Visitor for ScopeCollector {
    fn visit_stmt(&mut self, stmt: &Spanned<Stmt>) {
        match &stmt.node {
            Stmt::Function(func) => {
                if let Some(name) = &func.name {
                    self.callable(name);
                }
                self.visit_function(func);
            }
            Stmt::Class(class) => {
                self.callable(&class.name);
                self.classes.insert(class.name.clone(), class.span);
                self.visit_class(class);
            }
            Stmt::ForIn { target, iter, body } => {
                self.loop_depth += 1;
                if let Some(args) = iter.node.lowered_range(&target.node) {
                    let stop = if args.len() == 1 { &args[0] } else { &args[1] };
                    if !is_bare_operand(&stop.node) {
                        self.declare(&range_end_temp(self.loop_depth));
                    }
                }
                self.bind_target(target);
                self.visit_expr(iter);
                visit::walk_body(self, body);
                self.loop_depth -= 1;
            }
            Stmt::Try {
                body,
                handlers,
                finalbody,
            } => {
                visit::walk_body(self, body);
                for handler in handlers {
                    if let Some(name) = &handler.name {
                        self.declare(name);
                    }
                    for ty in &handler.types {
                        self.visit_expr(ty);
                    }
                    visit::walk_body(self, &handler.body);
                }
                if let Some(finalbody) = finalbody {
                    visit::walk_body(self, finalbody);
                }
            }
            Stmt::Import(import) => {
                for name in import.bound_names() {
                    self.declare(&name);
                }
            }
            Stmt::Nonlocal(names) => {
                for name in names {
                    if !self.nonlocals.contains(name) {
                        self.nonlocals.push(name.clone());
                    }
                }
            }
            _ => visit::walk_stmt(self, stmt),
        }
    }

    fn visit_expr(&mut self, expr: &Spanned<Expr>) {
        match &expr.node {
            Expr::Assign { target, value, .. } => {
                self.bind_target(target);
                self.visit_expr(value);
            }
            Expr::ChainedCompare { operands, .. } => {
                let inner = &operands[1..operands.len().saturating_sub(1)];
                if inner.iter().any(|o| !is_bare_operand(&o.node)) {
                    self.declare(COND_TEMP);
                }
                visit::walk_expr(self, expr);
            }
            Expr::Verbatim(_) => self.uses_dynamic = true,
            // The comprehension target is local to the generated closure.
            Expr::ListComp {
                element,
                iter,
                condition,
                ..
            } => {
                self.visit_expr(iter);
                if let Some(condition) = condition {
                    self.visit_expr(condition);
                }
                self.visit_expr(element);
            }
            _ => visit::walk_expr(self, expr),
        }
    }

    // Decorators, defaults and bases are evaluated in the enclosing scope; bodies are not.
    fn visit_function(&mut self, func: &FunctionDef) {
        for d in &func.decorators {
            self.visit_expr(d);
        }
        for p in &func.params {
            if let Some(default) = &p.default {
                self.visit_expr(default);
            }
        }
    }

    fn visit_class(&mut self, class: &ClassDef) {
        for d in &class.decorators {
            self.visit_expr(d);
        }
        for b in &class.bases {
            self.visit_expr(b);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frontend::parser::{ParseOptions, parse};

    fn analyzed(source: &str) -> Module {
        let mut module = parse(source, &ParseOptions::default()).unwrap();
        analyze_module(&mut module);
        module
    }

    fn first_function(module: &Module) -> &FunctionDef {
        module
            .body
            .iter()
            .find_map(|s| match &s.node {
                Stmt::Function(f) => Some(f),
                _ => None,
            })
            .unwrap()
    }

    #[test]
    fn test_module_vars_are_hoisted_after_directives() {
        let module = analyzed("\"use strict\"\nx = 1\ny = x\nx = 2\n");
        assert_eq!(module.scope.vars, ["x", "y"]);
        assert!(matches!(module.body[0].node, Stmt::Directive(_)));
        assert_eq!(module.body[1].node, Stmt::Var(vec!["x".into(), "y".into()]));
    }

    #[test]
    fn test_exports_are_top_level_callables() {
        let module = analyzed("def f():\n    def inner():\n        pass\nclass C:\n    pass\nv = 1\n");
        assert_eq!(module.exports, ["f", "C"]);
        assert_eq!(module.scope.vars, ["v"]);
        assert!(module.scope.classes.contains_key("C"));
    }

    #[test]
    fn test_function_scope_excludes_params_and_nested_bodies() {
        let module = analyzed("def f(a, *rest):\n    a = 1\n    b = 2\n    def g():\n        c = 3\n    return b\n");
        let f = first_function(&module);
        assert_eq!(f.scope.vars, ["b"]);
        assert_eq!(f.scope.callables, ["g"]);
        assert_eq!(f.body[0].node, Stmt::Var(vec!["b".into()]));
        let Stmt::Function(g) = &f.body[3].node else {
            panic!("expected nested def, got {:?}", f.body[3].node);
        };
        assert_eq!(g.scope.vars, ["c"]);
    }

    #[test]
    fn test_nonlocal_names_are_not_redeclared() {
        let module = analyzed("def outer():\n    n = 0\n    def bump():\n        nonlocal n\n        n += 1\n");
        let outer = first_function(&module);
        assert_eq!(outer.scope.vars, ["n"]);
        let inner = outer
            .body
            .iter()
            .find_map(|s| match &s.node {
                Stmt::Function(f) => Some(f),
                _ => None,
            })
            .unwrap();
        assert!(inner.scope.vars.is_empty());
        assert_eq!(inner.scope.nonlocals, ["n"]);
    }

    #[test]
    fn test_tuple_targets_declare_unpack_temp() {
        let module = analyzed("a, b = 1, 2\nfor k, v in pairs:\n    pass\n");
        assert_eq!(module.scope.vars, [UNPACK_TEMP, "a", "b", "k", "v"]);
    }

    #[test]
    fn test_chained_compare_temp_only_for_complex_middle() {
        assert_eq!(analyzed("x = a < b < c\n").scope.vars, ["x"]);
        assert_eq!(analyzed("x = a < f(b) < c\n").scope.vars, [COND_TEMP, "x"]);
    }

    #[test]
    fn test_counting_loop_declares_end_temp_for_computed_stop() {
        assert_eq!(analyzed("for i in range(n):\n    pass\n").scope.vars, ["i"]);
        let module = analyzed("for i in range(len(xs)):\n    for j in range(1, len(ys)):\n        pass\n");
        assert_eq!(module.scope.vars, ["_$sl_End1", "i", "_$sl_End2", "j"]);
    }

    #[test]
    fn test_comprehension_target_stays_local() {
        let module = analyzed("ys = [x * 2 for x in xs]\n");
        assert_eq!(module.scope.vars, ["ys"]);
    }

    #[test]
    fn test_handler_names_and_imports_are_bound() {
        let module = analyzed("try:\n    risky()\nexcept Error as e:\n    log(e)\n");
        assert_eq!(module.scope.vars, ["e"]);
    }

    #[test]
    fn test_verbatim_marks_dynamic_scope() {
        assert!(analyzed("JS('eval(x)')\n").scope.uses_dynamic);
        assert!(!analyzed("x = 1\n").scope.uses_dynamic);
    }

    #[test]
    fn test_class_scope_lists_attributes_and_methods() {
        let module = analyzed("class C:\n    size = 3\n    def area(self):\n        return self.size\n");
        let Stmt::Class(class) = &module.body[0].node else {
            panic!("expected class");
        };
        assert_eq!(class.scope.vars, ["size"]);
        assert_eq!(class.scope.callables, ["area"]);
        assert!(!class.body.iter().any(|s| matches!(s.node, Stmt::Var(_))));
    }
}
