//! Property-based tests for the Slither compiler
//!
//! These tests use proptest to verify invariants across many randomly
//! generated inputs, catching edge cases that hand-written tests might miss.

use proptest::prelude::*;
use slither::ast::{Expr, Stmt};
use slither::backend::numbers::format_number;
use slither::parser::{self, ParseOptions};
use slither::{CompileOptions, compile};

// =============================================================================
// Arithmetic expression trees
// =============================================================================

const BINARY_OPS: &[&str] = &["+", "-", "*", "/", "%", "<<", ">>", "&", "^", "|"];
const UNARY_OPS: &[&str] = &["-", "~"];

#[derive(Debug, Clone)]
enum Tree {
    Name(&'static str),
    Unary(&'static str, Box<Tree>),
    Binary(&'static str, Box<Tree>, Box<Tree>),
}

impl Tree {
    /// Source text with every compound node parenthesized.
    fn source(&self) -> String {
        match self {
            Tree::Name(n) => (*n).to_string(),
            Tree::Unary(op, operand) => format!("({op}{})", operand.source()),
            Tree::Binary(op, l, r) => format!("({} {op} {})", l.source(), r.source()),
        }
    }
}

fn tree_strategy() -> impl Strategy<Value = Tree> {
    let leaf = prop::sample::select(vec!["a", "b", "c", "d"]).prop_map(Tree::Name);
    leaf.prop_recursive(4, 24, 2, |inner| {
        prop_oneof![
            (prop::sample::select(UNARY_OPS.to_vec()), inner.clone())
                .prop_map(|(op, t)| Tree::Unary(op, Box::new(t))),
            (prop::sample::select(BINARY_OPS.to_vec()), inner.clone(), inner)
                .prop_map(|(op, l, r)| Tree::Binary(op, Box::new(l), Box::new(r))),
        ]
    })
}

/// Operator structure of an expression, ignoring spans and parentheses.
fn shape(expr: &Expr) -> String {
    match expr {
        Expr::Name(n) => n.clone(),
        Expr::UnaryPrefix { op, operand } => format!("({op:?} {})", shape(&operand.node)),
        Expr::Binary { op, left, right } => {
            format!("({} {op:?} {})", shape(&left.node), shape(&right.node))
        }
        other => format!("<{other:?}>"),
    }
}

/// Right-hand side of the single assignment in `source`.
fn assigned_shape(source: &str) -> String {
    let module = parser::parse(source, &ParseOptions::default()).expect("parse failed");
    match &module.body[0].node {
        Stmt::Expr(e) => match &e.node {
            Expr::Assign { value, .. } => shape(&value.node),
            other => panic!("expected an assignment, got {other:?}"),
        },
        other => panic!("expected an expression statement, got {other:?}"),
    }
}

/// Compact JavaScript for `x = <expr>`, minus the hoisted declaration.
fn compiled_rhs(expr_source: &str) -> String {
    let options = CompileOptions::default().with_omit_baselib(true);
    let out = compile(&format!("x = {expr_source}\n"), &options).expect("compile failed");
    out.code
        .strip_prefix("var x;x=")
        .unwrap_or_else(|| panic!("unexpected output: {}", out.code))
        .to_string()
}

proptest! {
    /// Printing inserts exactly the parentheses needed to keep the tree's structure.
    #[test]
    fn printed_expressions_reparse_to_the_same_tree(tree in tree_strategy()) {
        let source = tree.source();
        let js = compiled_rhs(&source);
        prop_assert_eq!(
            assigned_shape(&format!("x = {source}\n")),
            assigned_shape(&format!("x = {js}\n")),
            "source: {}, printed: {}", source, js
        );
    }

    /// Printed arithmetic is a fixed point of the compiler.
    #[test]
    fn printing_is_idempotent(tree in tree_strategy()) {
        let js = compiled_rhs(&tree.source());
        prop_assert_eq!(compiled_rhs(&js), js);
    }
}

// =============================================================================
// Parenthesization
// =============================================================================

/// Binding strength of the infix operators; higher binds tighter.
fn rank(op: &str) -> u8 {
    match op {
        "|" => 1,
        "^" => 2,
        "&" => 3,
        "<<" | ">>" => 4,
        "+" | "-" => 5,
        "*" | "/" | "%" => 6,
        other => panic!("unranked operator {other}"),
    }
}

proptest! {
    /// A right operand keeps its parentheses exactly when it does not bind tighter than its parent.
    #[test]
    fn right_operands_are_parenthesized_by_precedence(
        outer in prop::sample::select(BINARY_OPS.to_vec()),
        inner in prop::sample::select(BINARY_OPS.to_vec()),
    ) {
        let js = compiled_rhs(&format!("a {outer} (b {inner} c)"));
        let expected = if rank(inner) > rank(outer) {
            format!("a{outer}b{inner}c")
        } else {
            format!("a{outer}(b{inner}c)")
        };
        prop_assert_eq!(js, expected);
    }

    /// A left operand needs parentheses only when it binds looser than its parent.
    #[test]
    fn left_operands_are_parenthesized_by_precedence(
        outer in prop::sample::select(BINARY_OPS.to_vec()),
        inner in prop::sample::select(BINARY_OPS.to_vec()),
    ) {
        let js = compiled_rhs(&format!("(a {inner} b) {outer} c"));
        let expected = if rank(inner) >= rank(outer) {
            format!("a{inner}b{outer}c")
        } else {
            format!("(a{inner}b){outer}c")
        };
        prop_assert_eq!(js, expected);
    }
}

// =============================================================================
// Numeric literals
// =============================================================================

/// Value of a JavaScript numeric literal as printed by the generator.
fn parse_js_number(text: &str) -> f64 {
    match text.strip_prefix("0x") {
        Some(hex) => u64::from_str_radix(hex, 16).expect("bad hex literal") as f64,
        None => text.parse().expect("bad decimal literal"),
    }
}

proptest! {
    /// Integer literals keep their value and are never longer than plain decimal.
    #[test]
    fn integers_round_trip(n in 0u64..(1u64 << 53)) {
        let value = n as f64;
        let text = format_number(value, true);
        prop_assert_eq!(parse_js_number(&text), value);
        prop_assert!(text.len() <= n.to_string().len(), "{} longer than {}", text, n);
    }

    /// Finite non-negative doubles keep their exact value.
    #[test]
    fn doubles_round_trip(value in 0f64..1e30) {
        let text = format_number(value, true);
        prop_assert_eq!(parse_js_number(&text), value, "printed {}", text);
    }

    /// Strict spelling never produces a legacy octal literal.
    #[test]
    fn strict_numbers_are_never_octal(n in 8u64..1_000_000) {
        let text = format_number(n as f64, true);
        prop_assert!(!(text.len() > 1 && text.starts_with('0') && !text.starts_with("0x")), "{}", text);
    }
}
