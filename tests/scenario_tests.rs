//! Behavioral scenarios
//!
//! These tests check what generated code *does* rather than how it is spelled: a tiny evaluator
//! runs compiled comparison expressions, and call/slice shapes are read back from the output
//! with the Slither parser.

use std::collections::HashMap;

use slither::ast::{Expr, Spanned, Stmt};
use slither::parser::{self, ParseOptions};
use slither::{CompileOptions, compile};

fn compact(source: &str) -> String {
    compile(source, &CompileOptions::default().with_omit_baselib(true))
        .expect("compile failed")
        .code
}

// ============================================================================
// Evaluator for compiled comparison expressions
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq)]
enum Value {
    Num(f64),
    Bool(bool),
}

impl Value {
    fn truthy(self) -> bool {
        match self {
            Value::Num(n) => n != 0.0 && !n.is_nan(),
            Value::Bool(b) => b,
        }
    }

    fn num(self) -> f64 {
        match self {
            Value::Num(n) => n,
            Value::Bool(b) => f64::from(u8::from(b)),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Tok {
    Num(f64),
    Name(String),
    Op(&'static str),
}

fn tokenize(src: &str) -> Vec<Tok> {
    const OPS: &[&str] = &["<=", ">=", "&&", "||", "<", ">", "?", ":", "(", ")", "=", ",", "+", "-"];
    let mut toks = Vec::new();
    let mut rest = src;
    while let Some(c) = rest.chars().next() {
        if c.is_whitespace() {
            rest = &rest[c.len_utf8()..];
        } else if c.is_ascii_digit() || c == '.' {
            let len = rest.find(|ch: char| !(ch.is_ascii_digit() || ch == '.')).unwrap_or(rest.len());
            toks.push(Tok::Num(rest[..len].parse().unwrap()));
            rest = &rest[len..];
        } else if c.is_alphabetic() || c == '_' || c == '$' {
            let len = rest
                .find(|ch: char| !(ch.is_alphanumeric() || ch == '_' || ch == '$'))
                .unwrap_or(rest.len());
            toks.push(Tok::Name(rest[..len].to_string()));
            rest = &rest[len..];
        } else {
            let op = OPS
                .iter()
                .find(|op| rest.starts_with(**op))
                .unwrap_or_else(|| panic!("unexpected input at {rest:?}"));
            toks.push(Tok::Op(*op));
            rest = &rest[op.len()..];
        }
    }
    toks
}

/// Evaluates the compact-output subset used by conditional and comparison code. `same(v)` is
/// the identity function.
struct Eval<'a> {
    toks: Vec<Tok>,
    pos: usize,
    env: &'a mut HashMap<String, Value>,
}

impl Eval<'_> {
    fn peek(&self) -> Option<&Tok> {
        self.toks.get(self.pos)
    }

    fn peek_op(&self, op: &str) -> bool {
        matches!(self.peek(), Some(Tok::Op(o)) if *o == op)
    }

    fn eat(&mut self, op: &str) -> bool {
        let hit = self.peek_op(op);
        if hit {
            self.pos += 1;
        }
        hit
    }

    fn assign(&mut self) -> Value {
        if let (Some(Tok::Name(name)), Some(Tok::Op("="))) = (self.toks.get(self.pos), self.toks.get(self.pos + 1)) {
            let name = name.clone();
            self.pos += 2;
            let value = self.assign();
            self.env.insert(name, value);
            return value;
        }
        self.conditional()
    }

    fn conditional(&mut self) -> Value {
        let test = self.or();
        if !self.eat("?") {
            return test;
        }
        let then = self.assign();
        assert!(self.eat(":"), "expected ':'");
        let orelse = self.assign();
        if test.truthy() { then } else { orelse }
    }

    fn or(&mut self) -> Value {
        let mut left = self.and();
        while self.eat("||") {
            let right = self.and();
            left = if left.truthy() { left } else { right };
        }
        left
    }

    // Both sides are always evaluated; only temporaries have side effects.
    fn and(&mut self) -> Value {
        let mut left = self.relational();
        while self.eat("&&") {
            let right = self.relational();
            left = if left.truthy() { right } else { left };
        }
        left
    }

    fn relational(&mut self) -> Value {
        let mut left = self.additive();
        loop {
            let op = match self.peek() {
                Some(Tok::Op(op @ ("<" | "<=" | ">" | ">="))) => *op,
                _ => return left,
            };
            self.pos += 1;
            let right = self.additive();
            let (l, r) = (left.num(), right.num());
            left = Value::Bool(match op {
                "<" => l < r,
                "<=" => l <= r,
                ">" => l > r,
                _ => l >= r,
            });
        }
    }

    fn additive(&mut self) -> Value {
        let mut left = self.primary();
        loop {
            if self.eat("+") {
                left = Value::Num(left.num() + self.primary().num());
            } else if self.eat("-") {
                left = Value::Num(left.num() - self.primary().num());
            } else {
                return left;
            }
        }
    }

    fn primary(&mut self) -> Value {
        let tok = self.toks[self.pos].clone();
        self.pos += 1;
        match tok {
            Tok::Num(n) => Value::Num(n),
            Tok::Op("(") => {
                let value = self.assign();
                assert!(self.eat(")"), "expected ')'");
                value
            }
            Tok::Name(name) if self.peek_op("(") => {
                assert_eq!(name, "same", "unknown function");
                self.pos += 1;
                let value = self.assign();
                assert!(self.eat(")"), "expected ')'");
                value
            }
            Tok::Name(name) => *self.env.get(&name).unwrap_or_else(|| panic!("unbound {name}")),
            other => panic!("unexpected token {other:?}"),
        }
    }
}

/// Run compiled statements and return the final value of `x`.
fn run(js: &str, bindings: &[(&str, f64)]) -> Value {
    let mut env: HashMap<String, Value> = bindings
        .iter()
        .map(|(name, v)| (name.to_string(), Value::Num(*v)))
        .collect();
    for stmt in js.split(';').filter(|s| !s.is_empty() && !s.starts_with("var ")) {
        let mut eval = Eval {
            toks: tokenize(stmt),
            pos: 0,
            env: &mut env,
        };
        eval.assign();
        assert_eq!(eval.pos, eval.toks.len(), "trailing input in {stmt}");
    }
    env["x"]
}

#[test]
fn test_chained_comparison_in_conditional_expression() {
    let js = compact("x = 1 if a < b < c else 2\n");
    assert_eq!(run(&js, &[("a", 1.0), ("b", 2.0), ("c", 3.0)]), Value::Num(1.0));
    assert_eq!(run(&js, &[("a", 1.0), ("b", 3.0), ("c", 2.0)]), Value::Num(2.0));
}

#[test]
fn test_chained_comparison_evaluates_middle_operand_once() {
    let js = compact("x = 1 if a < same(b) + 1 <= c else 2\n");
    assert!(js.contains("_$sl_cond_temp="), "{js}");
    assert_eq!(run(&js, &[("a", 1.0), ("b", 2.0), ("c", 3.0)]), Value::Num(1.0));
    assert_eq!(run(&js, &[("a", 1.0), ("b", 2.0), ("c", 2.0)]), Value::Num(2.0));
    assert_eq!(run(&js, &[("a", 4.0), ("b", 2.0), ("c", 9.0)]), Value::Num(2.0));
}

#[test]
fn test_nested_chained_comparisons_share_the_temporary_safely() {
    // The inner chain finishes with the temporary before the outer chain stores into it.
    let js = compact("x = 1 if same(a < same(b) < c) < same(d) < e else 2\n");
    assert_eq!(js.matches("_$sl_cond_temp=").count(), 2, "{js}");
    let env = [("a", 1.0), ("b", 2.0), ("c", 3.0), ("d", 2.0), ("e", 3.0)];
    assert_eq!(run(&js, &env), Value::Num(1.0));
    let env = [("a", 1.0), ("b", 2.0), ("c", 3.0), ("d", 0.0), ("e", 3.0)];
    assert_eq!(run(&js, &env), Value::Num(2.0));
}

#[test]
fn test_sequential_chains_in_one_expression() {
    let js = compact("x = 1 if a < same(b) < c and c < same(d) < e else 2\n");
    let env = [("a", 1.0), ("b", 2.0), ("c", 3.0), ("d", 4.0), ("e", 5.0)];
    assert_eq!(run(&js, &env), Value::Num(1.0));
    let env = [("a", 1.0), ("b", 2.0), ("c", 3.0), ("d", 9.0), ("e", 5.0)];
    assert_eq!(run(&js, &env), Value::Num(2.0));
}

// ============================================================================
// Reading generated code back
// ============================================================================

/// Parse a generated statement with the Slither parser and return its expression.
fn reparse(js: &str) -> Spanned<Expr> {
    let module = parser::parse(&format!("{js}\n"), &ParseOptions::default()).expect("reparse failed");
    match module.body.into_iter().next().map(|s| s.node) {
        Some(Stmt::Expr(e)) => e,
        other => panic!("expected an expression statement, got {other:?}"),
    }
}

/// Dotted property path of a call's callee, and the call's arguments.
fn call_path(expr: &Expr) -> (Vec<String>, Vec<Expr>) {
    fn path(expr: &Expr, out: &mut Vec<String>) {
        match expr {
            Expr::Name(n) => out.push(n.clone()),
            Expr::Dot { object, property } => {
                path(&object.node, out);
                out.push(property.clone());
            }
            other => panic!("not a property path: {other:?}"),
        }
    }
    match expr {
        Expr::Call { callee, args } => {
            let mut out = Vec::new();
            path(&callee.node, &mut out);
            (out, args.iter().map(|a| a.node.clone()).collect())
        }
        other => panic!("expected a call, got {other:?}"),
    }
}

/// Top-level statements after the last class or function body.
fn trailing_statements(js: &str) -> Vec<&str> {
    let tail = js.rsplit('}').next().unwrap_or(js);
    tail.split(';').filter(|s| !s.is_empty()).collect()
}

#[test]
fn test_static_and_instance_calls_take_different_property_paths() {
    let source = concat!(
        "class Counter:\n",
        "    @staticmethod\n",
        "    def create():\n",
        "        return 0\n",
        "    def bump(self):\n",
        "        return 1\n",
        "c = Counter()\n",
        "c.bump()\n",
        "Counter.create()\n",
        "Counter.bump(c)\n",
    );
    let js = compact(source);
    let stmts = trailing_statements(&js);
    assert_eq!(stmts.len(), 4, "{js}");

    let (path, args) = call_path(&reparse(stmts[1]).node);
    assert_eq!(path, ["c", "bump"]);
    assert!(args.is_empty());

    let (path, args) = call_path(&reparse(stmts[2]).node);
    assert_eq!(path, ["Counter", "create"]);
    assert!(args.is_empty());

    let (path, args) = call_path(&reparse(stmts[3]).node);
    assert_eq!(path, ["Counter", "prototype", "bump", "call"]);
    assert_eq!(args, vec![Expr::Name("c".to_string())]);
}

/// Apply a generated slice expression to `arr`, following the runtime's definitions.
fn apply_slice(expr: &Expr, arr: &[i32]) -> Vec<i32> {
    let number = |e: &Expr| e.numeric_value().expect("numeric bound") as i64;
    let (path, args) = call_path(expr);
    match path.as_slice() {
        [_, method] if method == "slice" => {
            let lo = args.first().map_or(0, number) as usize;
            let hi = args.get(1).map_or(arr.len() as i64, number) as usize;
            arr[lo..hi.min(arr.len())].to_vec()
        }
        [helper] if helper == "_$sl_eslice" => {
            let mut items = arr.to_vec();
            let mut step = number(&args[1]);
            let mut start = args.get(2).map(number);
            let mut end = args.get(3).map(number);
            if step < 0 {
                step = -step;
                items.reverse();
                let len = items.len() as i64;
                start = start.map(|s| len - s - 1);
                end = end.map(|e| len - e - 1);
            }
            let start = start.unwrap_or(0);
            let end = end.unwrap_or(items.len() as i64);
            (start..end)
                .step_by(step as usize)
                .filter_map(|i| items.get(i as usize).copied())
                .collect()
        }
        other => panic!("not a slice: {other:?}"),
    }
}

fn sliced(source: &str, arr: &[i32]) -> Vec<i32> {
    let js = compact(source);
    let rhs = js.strip_prefix("var y;y=").unwrap_or_else(|| panic!("unexpected output {js}"));
    apply_slice(&reparse(rhs).node, arr)
}

#[test]
fn test_bounded_slice_extracts_a_range() {
    let arr = [10, 11, 12, 13, 14, 15];
    assert_eq!(sliced("y = arr[1:4]\n", &arr), vec![11, 12, 13]);
    assert_eq!(sliced("y = arr[2:]\n", &arr), vec![12, 13, 14, 15]);
}

#[test]
fn test_stepped_slice_extracts_every_other_element() {
    let arr = [10, 11, 12, 13, 14, 15];
    assert_eq!(sliced("y = arr[1:4:2]\n", &arr), vec![11, 13]);
    assert_eq!(sliced("y = arr[::-1]\n", &arr), vec![15, 14, 13, 12, 11, 10]);
}

#[test]
fn test_stepped_slice_ships_its_helper() {
    let out = compile("y = arr[1:4:2]\n", &CompileOptions::default()).unwrap();
    assert!(out.code.starts_with("function _$sl_eslice("), "{}", out.code);
}
