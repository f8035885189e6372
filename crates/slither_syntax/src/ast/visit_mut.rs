//! In-place transformation.
//!
//! Mirrors [`super::visit`] with `&mut` access so a pass can rewrite nodes as it walks. The scope
//! analyzer uses this to attach scope records and insert hoisted declarations.

use super::*;

pub trait VisitMut {
    fn visit_module_mut(&mut self, module: &mut Module) {
        walk_body_mut(self, &mut module.body);
    }

    fn visit_stmt_mut(&mut self, stmt: &mut Spanned<Stmt>) {
        walk_stmt_mut(self, stmt);
    }

    fn visit_expr_mut(&mut self, expr: &mut Spanned<Expr>) {
        walk_expr_mut(self, expr);
    }

    fn visit_function_mut(&mut self, func: &mut FunctionDef) {
        walk_function_mut(self, func);
    }

    fn visit_class_mut(&mut self, class: &mut ClassDef) {
        walk_class_mut(self, class);
    }
}

pub fn walk_body_mut<V: VisitMut + ?Sized>(v: &mut V, body: &mut Body) {
    for stmt in body {
        v.visit_stmt_mut(stmt);
    }
}

pub fn walk_stmt_mut<V: VisitMut + ?Sized>(v: &mut V, stmt: &mut Spanned<Stmt>) {
    match &mut stmt.node {
        Stmt::Expr(e) | Stmt::Raise(e) | Stmt::Del(e) => v.visit_expr_mut(e),
        Stmt::Return(e) => {
            if let Some(e) = e {
                v.visit_expr_mut(e);
            }
        }
        Stmt::If { test, body, orelse } => {
            v.visit_expr_mut(test);
            walk_body_mut(v, body);
            walk_body_mut(v, orelse);
        }
        Stmt::While { test, body } | Stmt::DoWhile { body, test } => {
            v.visit_expr_mut(test);
            walk_body_mut(v, body);
        }
        Stmt::ForIn { target, iter, body } => {
            v.visit_expr_mut(target);
            v.visit_expr_mut(iter);
            walk_body_mut(v, body);
        }
        Stmt::ForJs { body, .. } => walk_body_mut(v, body),
        Stmt::Try {
            body,
            handlers,
            finalbody,
        } => {
            walk_body_mut(v, body);
            for h in handlers {
                for t in &mut h.types {
                    v.visit_expr_mut(t);
                }
                walk_body_mut(v, &mut h.body);
            }
            if let Some(f) = finalbody {
                walk_body_mut(v, f);
            }
        }
        Stmt::Switch { discriminant, cases } => {
            v.visit_expr_mut(discriminant);
            for case in cases {
                if let Some(t) = &mut case.test {
                    v.visit_expr_mut(t);
                }
                walk_body_mut(v, &mut case.body);
            }
        }
        Stmt::Labeled { body, .. } => v.visit_stmt_mut(body),
        Stmt::Class(c) => v.visit_class_mut(c),
        Stmt::Function(f) => v.visit_function_mut(f),
        Stmt::Directive(_)
        | Stmt::Var(_)
        | Stmt::Break(_)
        | Stmt::Continue(_)
        | Stmt::Import(_)
        | Stmt::Nonlocal(_)
        | Stmt::Pass => {}
    }
}

pub fn walk_function_mut<V: VisitMut + ?Sized>(v: &mut V, func: &mut FunctionDef) {
    for d in &mut func.decorators {
        v.visit_expr_mut(d);
    }
    for p in &mut func.params {
        if let Some(d) = &mut p.default {
            v.visit_expr_mut(d);
        }
    }
    walk_body_mut(v, &mut func.body);
}

pub fn walk_class_mut<V: VisitMut + ?Sized>(v: &mut V, class: &mut ClassDef) {
    for d in &mut class.decorators {
        v.visit_expr_mut(d);
    }
    for b in &mut class.bases {
        v.visit_expr_mut(b);
    }
    if let Some(init) = &mut class.init {
        v.visit_function_mut(init);
    }
    walk_body_mut(v, &mut class.body);
}

pub fn walk_expr_mut<V: VisitMut + ?Sized>(v: &mut V, expr: &mut Spanned<Expr>) {
    match &mut expr.node {
        Expr::Name(_)
        | Expr::Number(_)
        | Expr::Str(_)
        | Expr::RegExp { .. }
        | Expr::Atom(_)
        | Expr::Verbatim(_) => {}
        Expr::Array(items) | Expr::Seq(items) | Expr::Unpack(items) => {
            for i in items {
                v.visit_expr_mut(i);
            }
        }
        Expr::ChainedCompare { operands, .. } => {
            for i in operands {
                v.visit_expr_mut(i);
            }
        }
        Expr::Object(props) => {
            for p in props {
                match p {
                    ObjectProp::KeyVal { value, .. } => v.visit_expr_mut(value),
                    ObjectProp::Getter { func, .. } | ObjectProp::Setter { func, .. } => v.visit_function_mut(func),
                }
            }
        }
        Expr::Function(f) => v.visit_function_mut(f),
        Expr::Call { callee, args } | Expr::New { callee, args } => {
            v.visit_expr_mut(callee);
            for a in args {
                v.visit_expr_mut(a);
            }
        }
        Expr::ClassCall { class, args, .. } => {
            v.visit_expr_mut(class);
            for a in args {
                v.visit_expr_mut(a);
            }
        }
        Expr::Dot { object, .. } => v.visit_expr_mut(object),
        Expr::Index { object, index } => {
            v.visit_expr_mut(object);
            v.visit_expr_mut(index);
        }
        Expr::Slice {
            object,
            lower,
            upper,
            step,
        } => {
            v.visit_expr_mut(object);
            for part in [lower, upper, step].into_iter().flatten() {
                v.visit_expr_mut(part);
            }
        }
        Expr::UnaryPrefix { operand, .. } | Expr::UnaryPostfix { operand, .. } => v.visit_expr_mut(operand),
        Expr::Binary { left, right, .. } => {
            v.visit_expr_mut(left);
            v.visit_expr_mut(right);
        }
        Expr::Conditional { test, then, orelse } => {
            v.visit_expr_mut(test);
            v.visit_expr_mut(then);
            v.visit_expr_mut(orelse);
        }
        Expr::Assign { target, value, .. } => {
            v.visit_expr_mut(target);
            v.visit_expr_mut(value);
        }
        Expr::ListComp {
            element,
            target,
            iter,
            condition,
        } => {
            v.visit_expr_mut(iter);
            v.visit_expr_mut(target);
            if let Some(c) = condition {
                v.visit_expr_mut(c);
            }
            v.visit_expr_mut(element);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Renamer;

    impl VisitMut for Renamer {
        fn visit_expr_mut(&mut self, expr: &mut Spanned<Expr>) {
            if let Expr::Name(n) = &mut expr.node {
                n.push('_');
            }
            walk_expr_mut(self, expr);
        }
    }

    #[test]
    fn test_transform_rewrites_in_place() {
        let mut e = Expr::binary(
            OperatorId::Star,
            Spanned::new(Expr::Name("x".into()), Span::new(0, 1)),
            Spanned::new(Expr::Name("y".into()), Span::new(4, 5)),
        );
        Renamer.visit_expr_mut(&mut e);
        let Expr::Binary { left, right, .. } = &e.node else {
            panic!("expected binary");
        };
        assert_eq!(left.node, Expr::Name("x_".into()));
        assert_eq!(right.node, Expr::Name("y_".into()));
    }
}
