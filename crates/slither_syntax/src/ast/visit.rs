//! Read-only traversal.
//!
//! Override the `visit_*` hooks you care about and call the matching `walk_*` function to keep
//! descending. The default hooks walk everything, including nested function and class bodies.

use super::*;

pub trait Visitor {
    fn visit_module(&mut self, module: &Module) {
        walk_body(self, &module.body);
    }

    fn visit_stmt(&mut self, stmt: &Spanned<Stmt>) {
        walk_stmt(self, stmt);
    }

    fn visit_expr(&mut self, expr: &Spanned<Expr>) {
        walk_expr(self, expr);
    }

    fn visit_function(&mut self, func: &FunctionDef) {
        walk_function(self, func);
    }

    fn visit_class(&mut self, class: &ClassDef) {
        walk_class(self, class);
    }
}

pub fn walk_body<V: Visitor + ?Sized>(v: &mut V, body: &Body) {
    for stmt in body {
        v.visit_stmt(stmt);
    }
}

pub fn walk_stmt<V: Visitor + ?Sized>(v: &mut V, stmt: &Spanned<Stmt>) {
    match &stmt.node {
        Stmt::Expr(e) | Stmt::Raise(e) | Stmt::Del(e) => v.visit_expr(e),
        Stmt::Return(e) => {
            if let Some(e) = e {
                v.visit_expr(e);
            }
        }
        Stmt::If { test, body, orelse } => {
            v.visit_expr(test);
            walk_body(v, body);
            walk_body(v, orelse);
        }
        Stmt::While { test, body } | Stmt::DoWhile { body, test } => {
            v.visit_expr(test);
            walk_body(v, body);
        }
        Stmt::ForIn { target, iter, body } => {
            v.visit_expr(target);
            v.visit_expr(iter);
            walk_body(v, body);
        }
        Stmt::ForJs { body, .. } => walk_body(v, body),
        Stmt::Try {
            body,
            handlers,
            finalbody,
        } => {
            walk_body(v, body);
            for h in handlers {
                for t in &h.types {
                    v.visit_expr(t);
                }
                walk_body(v, &h.body);
            }
            if let Some(f) = finalbody {
                walk_body(v, f);
            }
        }
        Stmt::Switch { discriminant, cases } => {
            v.visit_expr(discriminant);
            for case in cases {
                if let Some(t) = &case.test {
                    v.visit_expr(t);
                }
                walk_body(v, &case.body);
            }
        }
        Stmt::Labeled { body, .. } => v.visit_stmt(body),
        Stmt::Class(c) => v.visit_class(c),
        Stmt::Function(f) => v.visit_function(f),
        Stmt::Directive(_)
        | Stmt::Var(_)
        | Stmt::Break(_)
        | Stmt::Continue(_)
        | Stmt::Import(_)
        | Stmt::Nonlocal(_)
        | Stmt::Pass => {}
    }
}

pub fn walk_function<V: Visitor + ?Sized>(v: &mut V, func: &FunctionDef) {
    for d in &func.decorators {
        v.visit_expr(d);
    }
    for p in &func.params {
        if let Some(d) = &p.default {
            v.visit_expr(d);
        }
    }
    walk_body(v, &func.body);
}

pub fn walk_class<V: Visitor + ?Sized>(v: &mut V, class: &ClassDef) {
    for d in &class.decorators {
        v.visit_expr(d);
    }
    for b in &class.bases {
        v.visit_expr(b);
    }
    if let Some(init) = &class.init {
        v.visit_function(init);
    }
    walk_body(v, &class.body);
}

pub fn walk_expr<V: Visitor + ?Sized>(v: &mut V, expr: &Spanned<Expr>) {
    match &expr.node {
        Expr::Name(_)
        | Expr::Number(_)
        | Expr::Str(_)
        | Expr::RegExp { .. }
        | Expr::Atom(_)
        | Expr::Verbatim(_) => {}
        Expr::Array(items) | Expr::Seq(items) | Expr::Unpack(items) => {
            for i in items {
                v.visit_expr(i);
            }
        }
        Expr::ChainedCompare { operands, .. } => {
            for i in operands {
                v.visit_expr(i);
            }
        }
        Expr::Object(props) => {
            for p in props {
                match p {
                    ObjectProp::KeyVal { value, .. } => v.visit_expr(value),
                    ObjectProp::Getter { func, .. } | ObjectProp::Setter { func, .. } => v.visit_function(func),
                }
            }
        }
        Expr::Function(f) => v.visit_function(f),
        Expr::Call { callee, args } | Expr::New { callee, args } => {
            v.visit_expr(callee);
            for a in args {
                v.visit_expr(a);
            }
        }
        Expr::ClassCall { class, args, .. } => {
            v.visit_expr(class);
            for a in args {
                v.visit_expr(a);
            }
        }
        Expr::Dot { object, .. } => v.visit_expr(object),
        Expr::Index { object, index } => {
            v.visit_expr(object);
            v.visit_expr(index);
        }
        Expr::Slice {
            object,
            lower,
            upper,
            step,
        } => {
            v.visit_expr(object);
            for part in [lower, upper, step].into_iter().flatten() {
                v.visit_expr(part);
            }
        }
        Expr::UnaryPrefix { operand, .. } | Expr::UnaryPostfix { operand, .. } => v.visit_expr(operand),
        Expr::Binary { left, right, .. } => {
            v.visit_expr(left);
            v.visit_expr(right);
        }
        Expr::Conditional { test, then, orelse } => {
            v.visit_expr(test);
            v.visit_expr(then);
            v.visit_expr(orelse);
        }
        Expr::Assign { target, value, .. } => {
            v.visit_expr(target);
            v.visit_expr(value);
        }
        Expr::ListComp {
            element,
            target,
            iter,
            condition,
        } => {
            v.visit_expr(iter);
            v.visit_expr(target);
            if let Some(c) = condition {
                v.visit_expr(c);
            }
            v.visit_expr(element);
        }
    }
}
