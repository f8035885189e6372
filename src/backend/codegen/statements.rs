//! Statement emission
//!
//! Every statement prints without its leading indentation or trailing newline; [`Generator::body`]
//! adds those so the same code serves blocks, module bodies and nested statements.

use slither_core::lang::helpers::{self, HelperId};
use slither_syntax::ast::*;

use super::{Generator, emits_code, has_code};
use crate::backend::parens::{self, level};
use crate::frontend::scope::{is_bare_operand, range_end_temp};

impl Generator<'_> {
    /// Print each statement of `body` on its own line.
    pub(super) fn body(&mut self, body: &[Spanned<Stmt>]) {
        for stmt in body.iter().filter(|s| emits_code(&s.node)) {
            self.line(|g| {
                for comment in g.comments_at(stmt.span.start) {
                    for text in comment.lines() {
                        g.out.comment(text);
                    }
                }
                g.statement(stmt);
            });
        }
    }

    /// `{ ... }`, or `{}` when nothing in `body` prints.
    pub(super) fn block(&mut self, body: &Body) {
        if has_code(body) {
            self.braces(|g| g.body(body));
        } else {
            self.out.print("{}");
        }
    }

    pub(super) fn statement(&mut self, stmt: &Spanned<Stmt>) {
        self.map_node(stmt.span, None);
        match &stmt.node {
            Stmt::Expr(expr) => {
                if parens::statement_needs_parens(expr) {
                    self.parens(|g| g.expr(expr, 0));
                } else {
                    self.expr(expr, 0);
                }
                self.out.semicolon();
            }
            Stmt::Directive(text) => {
                self.out.print_string(text);
                self.out.semicolon();
            }
            Stmt::Var(names) => {
                self.out.print("var");
                self.out.space();
                self.comma_list(names, |g, name| g.out.print_name(name));
                self.out.semicolon();
            }
            Stmt::If { test, body, orelse } => self.if_statement(test, body, orelse),
            Stmt::While { test, body } => {
                self.keyword("while");
                self.parens(|g| g.expr(test, 0));
                self.out.space();
                self.block(body);
            }
            Stmt::DoWhile { body, test } => {
                self.keyword("do");
                self.block(body);
                self.out.space();
                self.keyword("while");
                self.parens(|g| g.expr(test, 0));
                self.out.semicolon();
            }
            Stmt::ForIn { target, iter, body } => self.for_in(target, iter, body),
            Stmt::ForJs { header, body } => {
                self.keyword("for");
                self.parens(|g| g.out.print(header));
                self.out.space();
                self.block(body);
            }
            Stmt::Try {
                body,
                handlers,
                finalbody,
            } => self.try_statement(body, handlers, finalbody.as_ref()),
            Stmt::Switch { discriminant, cases } => self.switch_statement(discriminant, cases),
            Stmt::Return(value) => {
                self.out.print("return");
                if let Some(value) = value {
                    self.out.space();
                    self.expr(value, 0);
                }
                self.out.semicolon();
            }
            Stmt::Raise(value) => {
                self.keyword("throw");
                self.expr(value, 0);
                self.out.semicolon();
            }
            Stmt::Break(label) => self.jump("break", label.as_deref()),
            Stmt::Continue(label) => self.jump("continue", label.as_deref()),
            Stmt::Labeled { label, body } => {
                self.out.print_name(label);
                self.out.colon();
                self.statement(body);
            }
            Stmt::Import(import) => self.import_statement(import),
            Stmt::Class(class) => self.class_statement(class),
            Stmt::Function(func) => self.function_statement(func),
            Stmt::Del(target) => {
                self.keyword("delete");
                self.expr(target, level::UNARY);
                self.out.semicolon();
            }
            Stmt::Nonlocal(_) | Stmt::Pass => {}
        }
    }

    fn jump(&mut self, keyword: &str, label: Option<&str>) {
        self.out.print(keyword);
        if let Some(label) = label {
            self.out.space();
            self.out.print_name(label);
        }
        self.out.semicolon();
    }

    fn if_statement(&mut self, test: &Spanned<Expr>, body: &Body, orelse: &Body) {
        self.keyword("if");
        self.parens(|g| g.expr(test, 0));
        self.out.space();
        self.block(body);
        match orelse.as_slice() {
            [] => {}
            [only] if matches!(only.node, Stmt::If { .. }) => {
                self.out.space();
                self.keyword("else");
                self.statement(only);
            }
            _ if !has_code(orelse) => {}
            _ => {
                self.out.space();
                self.keyword("else");
                self.block(orelse);
            }
        }
    }

    /// Counting loop for `range(...)`, otherwise an indexed loop over the iterable helper.
    fn for_in(&mut self, target: &Spanned<Expr>, iter: &Spanned<Expr>, body: &Body) {
        self.loop_depth += 1;
        let depth = self.loop_depth;
        match iter.node.lowered_range(&target.node) {
            Some(args) => self.range_loop(target, args, depth, body),
            None => self.iterable_loop(target, iter, depth, body),
        }
        self.loop_depth -= 1;
    }

    fn range_loop(&mut self, target: &Spanned<Expr>, args: &[Spanned<Expr>], depth: usize, body: &Body) {
        let (start, stop, step) = match args {
            [stop] => (None, stop, None),
            [start, stop] => (Some(start), stop, None),
            [start, stop, step, ..] => (Some(start), stop, step.node.numeric_value()),
            [] => return,
        };
        let end = (!is_bare_operand(&stop.node)).then(|| range_end_temp(depth));
        let descending = step.is_some_and(|s| s < 0.0);

        self.keyword("for");
        self.out.print("(");
        self.expr(target, level::CALL);
        self.out.operator("=");
        match start {
            Some(start) => self.assign_expr(start),
            None => self.out.print("0"),
        }
        if let Some(end) = &end {
            self.out.comma();
            self.out.print_name(end);
            self.out.operator("=");
            self.assign_expr(stop);
        }
        self.out.force_semicolon();
        self.out.space();

        self.expr(target, level::CALL);
        self.out.operator(if descending { ">" } else { "<" });
        match &end {
            Some(end) => self.out.print_name(end),
            None => self.expr(stop, level::SHIFT),
        }
        self.out.force_semicolon();
        self.out.space();

        self.expr(target, level::CALL);
        match step {
            None => self.out.print("++"),
            Some(step) if step == 1.0 => self.out.print("++"),
            Some(step) if step == -1.0 => self.out.print("--"),
            Some(step) => {
                self.out.operator("+=");
                self.out.print_number(step);
            }
        }
        self.out.print(")");
        self.out.space();
        self.block(body);
    }

    fn iterable_loop(&mut self, target: &Spanned<Expr>, iter: &Spanned<Expr>, depth: usize, body: &Body) {
        let index = format!("_$sl_Index{depth}");
        let items = format!("_$sl_Iter{depth}");

        self.keyword("for");
        self.out.print("(");
        self.keyword("var");
        self.out.print(&index);
        self.out.operator("=");
        self.out.print("0");
        self.out.comma();
        self.out.print(&items);
        self.out.operator("=");
        self.out.print(helpers::js_name(HelperId::Iterable));
        self.parens(|g| g.assign_expr(iter));
        self.out.force_semicolon();
        self.out.space();
        self.out.print(&index);
        self.out.operator("<");
        self.out.print(&format!("{items}.length"));
        self.out.force_semicolon();
        self.out.space();
        self.out.print(&format!("{index}++)"));
        self.out.space();
        self.braces(|g| {
            g.line(|g| {
                g.bind_loop_target(target, |g| g.out.print(&format!("{items}[{index}]")));
                g.out.semicolon();
            });
            g.body(body);
        });
    }

    /// A single `catch` binding the exception, dispatching on handler types with `instanceof`.
    fn try_statement(&mut self, body: &Body, handlers: &[ExceptHandler], finalbody: Option<&Body>) {
        self.keyword("try");
        self.block(body);
        if !handlers.is_empty() {
            self.out.space();
            self.keyword("catch");
            self.parens(|g| g.out.print(CAUGHT_EXCEPTION));
            self.out.space();
            self.braces(|g| match handlers {
                [only] if only.types.is_empty() => g.handler_body(only),
                _ => g.line(|g| g.handler_chain(handlers)),
            });
        }
        if let Some(finalbody) = finalbody {
            self.out.space();
            self.keyword("finally");
            self.block(finalbody);
        }
    }

    fn handler_chain(&mut self, handlers: &[ExceptHandler]) {
        for (i, handler) in handlers.iter().enumerate() {
            if i > 0 {
                self.out.space();
                self.keyword("else");
            }
            if handler.types.is_empty() {
                self.braces(|g| g.handler_body(handler));
                return;
            }
            self.keyword("if");
            self.parens(|g| {
                for (j, ty) in handler.types.iter().enumerate() {
                    if j > 0 {
                        g.out.operator("||");
                    }
                    g.out.print(CAUGHT_EXCEPTION);
                    g.out.operator("instanceof");
                    g.expr(ty, level::RELATIONAL + 1);
                }
            });
            self.out.space();
            self.braces(|g| g.handler_body(handler));
        }
        // No catch-all: anything unmatched propagates.
        self.out.space();
        self.keyword("else");
        self.braces(|g| {
            g.line(|g| {
                g.keyword("throw");
                g.out.print(CAUGHT_EXCEPTION);
                g.out.semicolon();
            })
        });
    }

    fn handler_body(&mut self, handler: &ExceptHandler) {
        if let Some(name) = &handler.name {
            self.line(|g| {
                g.out.print_name(name);
                g.out.operator("=");
                g.out.print(CAUGHT_EXCEPTION);
                g.out.semicolon();
            });
        }
        self.body(&handler.body);
    }

    fn switch_statement(&mut self, discriminant: &Spanned<Expr>, cases: &[SwitchCase]) {
        self.keyword("switch");
        self.parens(|g| g.expr(discriminant, 0));
        self.out.space();
        self.braces(|g| {
            for case in cases {
                g.line(|g| match &case.test {
                    Some(test) => {
                        g.keyword("case");
                        g.expr(test, 0);
                        g.out.print(":");
                    }
                    None => g.out.print("default:"),
                });
                g.out.push_indent();
                g.body(&case.body);
                g.out.pop_indent();
            }
        });
    }
}
