//! Function, method and class emission

use slither_core::lang::helpers::{self, HelperId};
use slither_core::lang::operators::OperatorId;
use slither_syntax::ast::*;

use super::Generator;
use crate::backend::parens::level;

/// Constructor method name hoisted into a class's init slot.
const INIT: &str = "__init__";

impl Generator<'_> {
    /// `function f(...) {...}`, or `var f = dec(function f(...) {...});` when decorated.
    pub(super) fn function_statement(&mut self, func: &FunctionDef) {
        let Some(name) = func.name.as_deref() else {
            self.function_value(func);
            self.out.semicolon();
            return;
        };
        if func.decorators.is_empty() {
            self.map_node(func.span, Some(name));
            self.function_value(func);
            return;
        }
        self.keyword("var");
        self.out.print_name(name);
        self.out.operator("=");
        self.decorated(&func.decorators, |g| g.function_value(func));
        self.out.semicolon();
    }

    /// A function expression (named when the definition has a name).
    pub(super) fn function_value(&mut self, func: &FunctionDef) {
        self.out.print("function");
        if let Some(name) = &func.name {
            self.out.print_name(name);
        }
        self.function_signature_and_body(func);
    }

    /// `(params) { prologue; body }`.
    ///
    /// The prologue binds the receiver, fills in defaults and collects rest arguments, after any
    /// leading directives.
    pub(super) fn function_signature_and_body(&mut self, func: &FunctionDef) {
        self.out.print("(");
        self.comma_list(&func.params, |g, p| g.out.print_name(&p.name));
        self.out.print(")");
        self.out.space();

        let directives = func
            .body
            .iter()
            .take_while(|s| matches!(s.node, Stmt::Directive(_)))
            .count();
        let (leading, rest) = func.body.split_at(directives);
        let has_prologue =
            func.receiver.is_some() || func.rest.is_some() || func.params.iter().any(|p| p.default.is_some());
        if !has_prologue && !super::has_code(&func.body) {
            self.out.print("{}");
            return;
        }

        let saved_depth = std::mem::replace(&mut self.loop_depth, 0);
        self.braces(|g| {
            g.body(leading);
            if let Some(receiver) = &func.receiver {
                g.line(|g| {
                    g.keyword("var");
                    g.out.print_name(receiver);
                    g.out.operator("=");
                    g.out.print("this");
                    g.out.semicolon();
                });
            }
            for param in &func.params {
                if let Some(default) = &param.default {
                    g.line(|g| {
                        g.keyword("if");
                        g.parens(|g| {
                            g.out.print_name(&param.name);
                            g.out.operator("===");
                            g.print_undefined();
                        });
                        g.out.space();
                        g.out.print_name(&param.name);
                        g.out.operator("=");
                        g.assign_expr(default);
                        g.out.semicolon();
                    });
                }
            }
            if let Some(rest_name) = &func.rest {
                g.line(|g| {
                    g.keyword("var");
                    g.out.print_name(rest_name);
                    g.out.operator("=");
                    g.out.print("[].slice.call(arguments");
                    g.out.comma();
                    g.out.print(&func.params.len().to_string());
                    g.out.print(")");
                    g.out.semicolon();
                });
            }
            g.body(rest);
        });
        self.loop_depth = saved_depth;
    }

    /// `d1(d2(value))` for decorators listed `@d1 @d2`.
    fn decorated(&mut self, decorators: &[Spanned<Expr>], value: impl FnOnce(&mut Self)) {
        for decorator in decorators {
            self.expr(decorator, level::CALL);
            self.out.print("(");
        }
        value(self);
        for _ in decorators {
            self.out.print(")");
        }
    }

    /// Constructor function, inheritance wiring, then one assignment per member.
    pub(super) fn class_statement(&mut self, class: &ClassDef) {
        let name = class.name.as_str();
        self.map_node(class.span, Some(name));
        self.out.print("function");
        self.out.print_name(name);
        self.out.print("()");
        self.out.space();
        self.constructor_body(class);

        let mut bases = class.bases.iter();
        if let Some(base) = bases.next() {
            self.next_statement(|g| {
                g.out.print(helpers::js_name(HelperId::Extends));
                g.out.print("(");
                g.out.print_name(name);
                g.out.comma();
                g.assign_expr(base);
                g.out.print(")");
                g.out.semicolon();
            });
        }
        for mixin in bases {
            self.next_statement(|g| {
                g.out.print(helpers::js_name(HelperId::Mixin));
                g.out.print("(");
                g.out.print_name(name);
                g.out.print(".prototype");
                g.out.comma();
                g.expr(mixin, level::CALL);
                g.out.print(".prototype)");
                g.out.semicolon();
            });
        }

        if let Some(init) = &class.init {
            self.next_statement(|g| {
                g.member_assignment(name, INIT, false);
                g.function_value(init);
                g.out.semicolon();
            });
        }
        for member in &class.body {
            self.class_member(name, member);
        }

        if !class.decorators.is_empty() {
            self.next_statement(|g| {
                g.out.print_name(name);
                g.out.operator("=");
                g.decorated(&class.decorators, |g| g.out.print_name(name));
                g.out.semicolon();
            });
        }
    }

    /// Rebind auto-bound methods, then run `__init__` or the base constructor.
    fn constructor_body(&mut self, class: &ClassDef) {
        let bound: Vec<&str> = class.bound_methods().collect();
        let base = class.bases.first();
        if bound.is_empty() && class.init.is_none() && base.is_none() {
            self.out.print("{}");
            return;
        }
        self.braces(|g| {
            for method in &bound {
                g.line(|g| {
                    g.out.print("this.");
                    g.out.print_name(method);
                    g.out.operator("=");
                    g.out.print(helpers::js_name(HelperId::Bind));
                    g.out.print("(this.");
                    g.out.print_name(method);
                    g.out.comma();
                    g.out.print("this)");
                    g.out.semicolon();
                });
            }
            if class.init.is_some() {
                g.line(|g| {
                    g.out.print_name(&class.name);
                    g.out.print(&format!(".prototype.{INIT}.apply(this"));
                    g.out.comma();
                    g.out.print("arguments)");
                    g.out.semicolon();
                });
            } else if let Some(base) = base {
                g.line(|g| {
                    g.expr(base, level::CALL);
                    g.out.print(".apply(this");
                    g.out.comma();
                    g.out.print("arguments)");
                    g.out.semicolon();
                });
            }
        });
    }

    fn class_member(&mut self, class: &str, member: &Spanned<Stmt>) {
        match &member.node {
            Stmt::Function(method) => {
                let Some(method_name) = method.name.as_deref() else {
                    return;
                };
                self.next_statement(|g| {
                    g.map_node(method.span, Some(method_name));
                    g.member_assignment(class, method_name, method.is_static);
                    g.decorated(&method.decorators, |g| g.function_value(method));
                    g.out.semicolon();
                });
            }
            Stmt::Expr(expr) => match class_attribute(expr) {
                Some((attr, value)) => self.next_statement(|g| {
                    g.map_node(member.span, Some(attr));
                    g.member_assignment(class, attr, false);
                    g.assign_expr(value);
                    g.out.semicolon();
                }),
                None => self.next_statement(|g| g.statement(member)),
            },
            Stmt::Class(nested) => {
                self.next_statement(|g| g.class_statement(nested));
                self.next_statement(|g| {
                    g.member_assignment(class, &nested.name, false);
                    g.out.print_name(&nested.name);
                    g.out.semicolon();
                });
            }
            Stmt::Directive(_) | Stmt::Pass | Stmt::Nonlocal(_) | Stmt::Var(_) => {}
            _ => self.next_statement(|g| g.statement(member)),
        }
    }

    /// `Class.prototype.name = ` or, for static members, `Class.name = `.
    fn member_assignment(&mut self, class: &str, member: &str, is_static: bool) {
        self.out.print_name(class);
        if !is_static {
            self.out.print(".prototype");
        }
        self.out.print(".");
        self.out.print_name(member);
        self.out.operator("=");
    }

    /// Start another top-level statement within a statement that expands to several.
    fn next_statement(&mut self, f: impl FnOnce(&mut Self)) {
        self.out.newline();
        self.out.indent();
        f(self);
    }
}

/// `name = value` at class level, which defines a prototype attribute.
fn class_attribute(expr: &Spanned<Expr>) -> Option<(&str, &Spanned<Expr>)> {
    match &expr.node {
        Expr::Assign {
            op: OperatorId::Assign,
            target,
            value,
        } => match &target.node {
            Expr::Name(attr) => Some((attr.as_str(), value.as_ref())),
            _ => None,
        },
        _ => None,
    }
}
