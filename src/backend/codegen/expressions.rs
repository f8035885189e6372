//! Expression emission
//!
//! Handles every expression kind, including the lowered forms: chained comparisons, `//`, `**`,
//! membership tests, slices, tuple unpacking and list comprehensions.

use slither_core::lang::atoms;
use slither_core::lang::helpers::{self, HelperId};
use slither_core::lang::operators::{self, OperatorId};
use slither_syntax::ast::*;

use super::Generator;
use crate::backend::parens::{self, level};
use crate::frontend::scope::{COND_TEMP, UNPACK_TEMP, is_bare_operand};

/// Upper slice bound used when a slice assignment has no explicit end.
const SPLICE_ALL: &str = "9e9";

/// One side of a comparison inside an expanded chain.
#[derive(Clone, Copy)]
enum Operand<'e> {
    Expr(&'e Spanned<Expr>),
    /// Re-read the chain temporary.
    Temp,
    /// Evaluate into the chain temporary: `(_$sl_cond_temp = expr)`.
    StoreTemp(&'e Spanned<Expr>),
}

impl Generator<'_> {
    /// Print `expr`, parenthesized when its precedence is below `min`.
    pub(super) fn expr(&mut self, expr: &Spanned<Expr>, min: u8) {
        if parens::needs_parens(&expr.node, min) {
            self.parens(|g| g.expr_inner(expr));
        } else {
            self.expr_inner(expr);
        }
    }

    /// Print an expression in a position that accepts anything but a comma list.
    pub(super) fn assign_expr(&mut self, expr: &Spanned<Expr>) {
        self.expr(expr, level::ASSIGN);
    }

    fn expr_inner(&mut self, expr: &Spanned<Expr>) {
        match &expr.node {
            Expr::Name(name) => {
                self.map_node(expr.span, Some(name));
                self.out.print_name(name);
            }
            Expr::Number(value) => {
                self.map_node(expr.span, None);
                self.out.print_number(*value);
            }
            Expr::Str(value) => {
                self.map_node(expr.span, None);
                self.out.print_string(value);
            }
            Expr::RegExp { pattern, flags } => {
                self.map_node(expr.span, None);
                self.out.print(&format!("/{pattern}/{flags}"));
            }
            Expr::Atom(atom) => self.out.print(atoms::js_spelling(*atom)),
            Expr::Verbatim(code) => self.out.print(code),
            Expr::Array(items) | Expr::Unpack(items) => {
                self.out.print("[");
                self.comma_list(items, |g, item| g.assign_expr(item));
                self.out.print("]");
            }
            Expr::Object(props) => self.object(props),
            Expr::Function(func) => {
                self.map_node(func.span, func.name.as_deref());
                self.function_value(func);
            }
            Expr::Call { callee, args } => {
                self.map_node(expr.span, None);
                self.expr(callee, level::CALL);
                self.call_args(args);
            }
            Expr::ClassCall {
                class,
                method,
                is_static,
                args,
            } => {
                self.map_node(expr.span, Some(method));
                self.expr(class, level::CALL);
                if *is_static {
                    self.out.print(".");
                    self.out.print_name(method);
                } else {
                    self.out.print(".prototype.");
                    self.out.print_name(method);
                    self.out.print(".call");
                }
                self.call_args(args);
            }
            Expr::New { callee, args } => {
                self.map_node(expr.span, None);
                self.out.print("new");
                self.out.space();
                if parens::needs_parens_as_new_callee(&callee.node) {
                    self.parens(|g| g.expr_inner(callee));
                } else {
                    self.expr(callee, level::CALL);
                }
                self.call_args(args);
            }
            Expr::Dot { object, property } => {
                self.member_object(object);
                self.out.print(".");
                self.map_node(expr.span, Some(property));
                self.out.print_name(property);
            }
            Expr::Index { object, index } => {
                self.member_object(object);
                self.out.print("[");
                self.expr(index, 0);
                self.out.print("]");
            }
            Expr::Slice {
                object,
                lower,
                upper,
                step,
            } => self.slice(object, lower.as_deref(), upper.as_deref(), step.as_deref()),
            Expr::Seq(items) => self.comma_list(items, |g, item| g.assign_expr(item)),
            Expr::UnaryPrefix { op, operand } => {
                self.out.print(js_operator(*op));
                self.expr(operand, level::UNARY);
            }
            Expr::UnaryPostfix { op, operand } => {
                self.expr(operand, level::POSTFIX);
                self.out.print(js_operator(*op));
            }
            Expr::Binary { op, left, right } => self.binary(*op, Operand::Expr(left), Operand::Expr(right)),
            Expr::ChainedCompare { operands, ops } => self.chained_compare(operands, ops),
            Expr::Conditional { test, then, orelse } => {
                self.expr(test, level::CONDITIONAL + 1);
                self.out.operator("?");
                self.assign_expr(then);
                self.out.operator(":");
                self.assign_expr(orelse);
            }
            Expr::Assign { op, target, value } => self.assignment(*op, target, value),
            Expr::ListComp {
                element,
                target,
                iter,
                condition,
            } => self.list_comprehension(element, target, iter, condition.as_deref()),
        }
    }

    fn call_args(&mut self, args: &[Spanned<Expr>]) {
        self.out.print("(");
        self.comma_list(args, |g, arg| g.assign_expr(arg));
        self.out.print(")");
    }

    fn member_object(&mut self, object: &Spanned<Expr>) {
        if parens::needs_parens_as_member_object(&object.node) {
            self.parens(|g| g.expr_inner(object));
        } else {
            self.expr_inner(object);
        }
    }

    /// Call a runtime helper by its generated name.
    fn helper_call(&mut self, id: HelperId, args: &[Operand<'_>]) {
        self.out.print(helpers::js_name(id));
        self.out.print("(");
        self.comma_list(args, |g, arg| g.operand(*arg, level::ASSIGN));
        self.out.print(")");
    }

    fn operand(&mut self, operand: Operand<'_>, min: u8) {
        match operand {
            Operand::Expr(e) => self.expr(e, min),
            Operand::Temp => self.out.print_name(COND_TEMP),
            Operand::StoreTemp(e) => self.parens(|g| {
                g.out.print_name(COND_TEMP);
                g.out.operator("=");
                g.assign_expr(e);
            }),
        }
    }

    fn binary(&mut self, op: OperatorId, left: Operand<'_>, right: Operand<'_>) {
        match op {
            OperatorId::In => self.helper_call(HelperId::In, &[left, right]),
            OperatorId::StarStar => {
                self.out.print("Math.pow(");
                self.operand(left, level::ASSIGN);
                self.out.comma();
                self.operand(right, level::ASSIGN);
                self.out.print(")");
            }
            OperatorId::SlashSlash => {
                self.out.print("Math.floor(");
                self.operand(left, level::MULTIPLICATIVE);
                self.out.operator("/");
                self.operand(right, level::MULTIPLICATIVE + 1);
                self.out.print(")");
            }
            _ => {
                let (left_min, right_min) = parens::operand_levels(op);
                self.operand(left, left_min);
                self.out.operator(js_operator(op));
                self.operand(right, right_min);
            }
        }
    }

    /// `a < b < c` → `a < b && b < c`, caching a non-trivial shared operand in a temporary.
    fn chained_compare(&mut self, operands: &[Spanned<Expr>], ops: &[OperatorId]) {
        let last = operands.len().saturating_sub(1);
        for (i, op) in ops.iter().enumerate() {
            if i > 0 {
                self.out.operator("&&");
            }
            let left = match &operands[i] {
                e if i == 0 || is_bare_operand(&e.node) => Operand::Expr(e),
                _ => Operand::Temp,
            };
            let right = match &operands[i + 1] {
                e if i + 1 == last || is_bare_operand(&e.node) => Operand::Expr(e),
                e => Operand::StoreTemp(e),
            };
            self.binary(*op, left, right);
        }
    }

    fn assignment(&mut self, op: OperatorId, target: &Spanned<Expr>, value: &Spanned<Expr>) {
        match (&target.node, op) {
            (Expr::Unpack(items), _) => self.unpack_assignment(items, |g| g.assign_expr(value)),
            (
                Expr::Slice {
                    object,
                    lower,
                    upper,
                    step: None,
                },
                _,
            ) => self.splice(object, lower.as_deref(), upper.as_deref(), value),
            (_, OperatorId::StarStarEq | OperatorId::SlashSlashEq) => {
                let lowered = if op == OperatorId::StarStarEq {
                    OperatorId::StarStar
                } else {
                    OperatorId::SlashSlash
                };
                self.expr(target, level::CALL);
                self.out.operator("=");
                self.binary(lowered, Operand::Expr(target), Operand::Expr(value));
            }
            _ => {
                self.expr(target, level::CALL);
                self.out.operator(js_operator(op));
                self.assign_expr(value);
            }
        }
    }

    /// `_$sl_Unpack = value, a = _$sl_Unpack[0], b = _$sl_Unpack[1]`; nested targets index
    /// deeper into the temporary.
    pub(super) fn unpack_assignment(&mut self, items: &[Spanned<Expr>], value: impl FnOnce(&mut Self)) {
        self.out.print_name(UNPACK_TEMP);
        self.out.operator("=");
        value(self);
        self.unpack_items(items, &mut Vec::new());
    }

    fn unpack_items(&mut self, items: &[Spanned<Expr>], path: &mut Vec<usize>) {
        for (i, item) in items.iter().enumerate() {
            path.push(i);
            match &item.node {
                Expr::Unpack(nested) => self.unpack_items(nested, path),
                _ => {
                    self.out.comma();
                    self.expr(item, level::CALL);
                    self.out.operator("=");
                    self.out.print_name(UNPACK_TEMP);
                    for idx in path.iter() {
                        self.out.print(&format!("[{idx}]"));
                    }
                }
            }
            path.pop();
        }
    }

    /// `a[lo:hi]` → `a.slice(lo, hi)`; with a step, the extended-slice helper.
    fn slice(
        &mut self,
        object: &Spanned<Expr>,
        lower: Option<&Spanned<Expr>>,
        upper: Option<&Spanned<Expr>>,
        step: Option<&Spanned<Expr>>,
    ) {
        if let Some(step) = step {
            self.out.print(helpers::js_name(HelperId::Eslice));
            self.out.print("(");
            self.assign_expr(object);
            self.out.comma();
            self.assign_expr(step);
            match (lower, upper) {
                (None, None) => {}
                (Some(lower), None) => {
                    self.out.comma();
                    self.assign_expr(lower);
                }
                (lower, Some(upper)) => {
                    self.out.comma();
                    match lower {
                        Some(lower) => self.assign_expr(lower),
                        None => self.print_undefined(),
                    }
                    self.out.comma();
                    self.assign_expr(upper);
                }
            }
            self.out.print(")");
            return;
        }

        self.member_object(object);
        self.out.print(".slice(");
        match lower {
            Some(lower) => self.assign_expr(lower),
            None => self.out.print("0"),
        }
        if let Some(upper) = upper {
            self.out.comma();
            self.assign_expr(upper);
        }
        self.out.print(")");
    }

    /// `a[lo:hi] = v` → `[].splice.apply(a, [lo, hi - lo].concat(v))`.
    fn splice(
        &mut self,
        object: &Spanned<Expr>,
        lower: Option<&Spanned<Expr>>,
        upper: Option<&Spanned<Expr>>,
        value: &Spanned<Expr>,
    ) {
        self.out.print("[].splice.apply(");
        self.assign_expr(object);
        self.out.comma();
        self.out.print("[");
        match lower {
            Some(lower) => self.assign_expr(lower),
            None => self.out.print("0"),
        }
        self.out.comma();
        match (upper, lower) {
            (Some(upper), Some(lower)) => {
                self.expr(upper, level::ADDITIVE);
                self.out.operator("-");
                self.expr(lower, level::ADDITIVE + 1);
            }
            (Some(upper), None) => self.assign_expr(upper),
            (None, _) => self.out.print(SPLICE_ALL),
        }
        self.out.print("].concat(");
        self.assign_expr(value);
        self.out.print("))");
    }

    pub(super) fn print_undefined(&mut self) {
        self.out.print("void");
        self.out.space();
        self.out.print("0");
    }

    fn object(&mut self, props: &[ObjectProp]) {
        self.out.print("{");
        self.comma_list(props, |g, prop| match prop {
            ObjectProp::KeyVal { key, value } => {
                g.property_key(key);
                g.out.colon();
                g.assign_expr(value);
            }
            ObjectProp::Getter { name, func } => {
                g.keyword("get");
                g.out.print_name(name);
                g.function_signature_and_body(func);
            }
            ObjectProp::Setter { name, func } => {
                g.keyword("set");
                g.out.print_name(name);
                g.function_signature_and_body(func);
            }
        });
        self.out.print("}");
    }

    fn property_key(&mut self, key: &PropKey) {
        match key {
            PropKey::Name(name) => self.out.print_name(name),
            PropKey::Str(s) => self.out.print_string(s),
            PropKey::Number(n) if !n.is_finite() => self.out.print_string(&non_finite_key(*n)),
            PropKey::Number(n) => self.out.print_number(*n),
        }
    }

    /// `[e for x in xs if c]` as an immediately invoked function building the result array.
    fn list_comprehension(
        &mut self,
        element: &Spanned<Expr>,
        target: &Spanned<Expr>,
        iter: &Spanned<Expr>,
        condition: Option<&Spanned<Expr>>,
    ) {
        let mut locals = vec![
            "_$sl_Idx".to_string(),
            "_$sl_Iter".to_string(),
            "_$sl_Result".to_string(),
        ];
        target_names(target, &mut locals);

        self.out.print("(function()");
        self.out.space();
        self.braces(|g| {
            g.line(|g| {
                g.keyword("var");
                g.comma_list(&locals, |g, name| {
                    g.out.print_name(name);
                    match name.as_str() {
                        "_$sl_Iter" => {
                            g.out.operator("=");
                            g.helper_call(HelperId::Iterable, &[Operand::Expr(iter)]);
                        }
                        "_$sl_Result" => {
                            g.out.operator("=");
                            g.out.print("[]");
                        }
                        _ => {}
                    }
                });
                g.out.semicolon();
            });
            g.line(|g| {
                g.keyword("for");
                g.out.print("(_$sl_Idx");
                g.out.operator("=");
                g.out.print("0");
                g.out.force_semicolon();
                g.out.space();
                g.out.print("_$sl_Idx");
                g.out.operator("<");
                g.out.print("_$sl_Iter.length");
                g.out.force_semicolon();
                g.out.space();
                g.out.print("_$sl_Idx++)");
                g.out.space();
                g.braces(|g| {
                    g.line(|g| {
                        g.bind_loop_target(target, |g| g.out.print("_$sl_Iter[_$sl_Idx]"));
                        g.out.semicolon();
                    });
                    let push = |g: &mut Self| {
                        g.out.print("_$sl_Result.push(");
                        g.assign_expr(element);
                        g.out.print(")");
                        g.out.semicolon();
                    };
                    match condition {
                        Some(condition) => g.line(|g| {
                            g.keyword("if");
                            g.parens(|g| g.expr(condition, 0));
                            g.out.space();
                            g.braces(|g| g.line(push));
                        }),
                        None => g.line(push),
                    }
                });
            });
            g.line(|g| {
                g.out.print("return");
                g.out.space();
                g.out.print("_$sl_Result");
                g.out.semicolon();
            });
        });
        self.out.print(").call(this)");
    }

    /// Assign the current loop element (printed by `value`) to a `for` target.
    pub(super) fn bind_loop_target(&mut self, target: &Spanned<Expr>, value: impl FnOnce(&mut Self)) {
        match &target.node {
            Expr::Unpack(items) => self.unpack_assignment(items, value),
            _ => {
                self.expr(target, level::CALL);
                self.out.operator("=");
                value(self);
            }
        }
    }
}

/// Names a comprehension target binds, in order.
fn target_names(target: &Spanned<Expr>, names: &mut Vec<String>) {
    match &target.node {
        Expr::Name(n) => names.push(n.clone()),
        Expr::Unpack(items) => {
            if !names.iter().any(|n| n == UNPACK_TEMP) {
                names.push(UNPACK_TEMP.to_string());
            }
            for item in items {
                target_names(item, names);
            }
        }
        _ => {}
    }
}

/// Property name JavaScript derives from a non-finite numeric key.
fn non_finite_key(n: f64) -> String {
    if n.is_nan() {
        "NaN".to_string()
    } else if n > 0.0 {
        "Infinity".to_string()
    } else {
        "-Infinity".to_string()
    }
}

/// JavaScript spelling of an operator.
pub(super) fn js_operator(op: OperatorId) -> &'static str {
    let info = operators::info_for(op);
    info.js.unwrap_or(info.spelling)
}
