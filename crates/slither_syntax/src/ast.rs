//! Abstract Syntax Tree definitions for Slither.
//!
//! The tree is a closed set of tagged variants: [`Stmt`] for statements and [`Expr`] for
//! expressions, each wrapped in [`Spanned`] so every node carries the byte range of its first and
//! last token. Nodes own their children; there is no sharing and there are no back-references.
//! Cloning a node clones the whole subtree.
//!
//! Generic traversal lives in [`visit`] (read-only) and [`visit_mut`] (in-place transformation).

pub mod visit;
pub mod visit_mut;

use std::collections::BTreeMap;
use std::collections::BTreeSet;

use slither_core::lang::atoms::AtomId;
use slither_core::lang::helpers::HelperId;
use slither_core::lang::operators::OperatorId;

/// Source location span (byte offsets)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn merge(self, other: Span) -> Span {
        Span {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }

    /// Span used for nodes the compiler synthesizes; such nodes have no source position.
    pub const SYNTHETIC: Span = Span {
        start: usize::MAX,
        end: usize::MAX,
    };

    pub fn is_synthetic(&self) -> bool {
        self.start == usize::MAX
    }
}

/// A node with source location
#[derive(Debug, Clone, PartialEq)]
pub struct Spanned<T> {
    pub node: T,
    pub span: Span,
}

impl<T> Spanned<T> {
    pub fn new(node: T, span: Span) -> Self {
        Self { node, span }
    }

    pub fn synthetic(node: T) -> Self {
        Self {
            node,
            span: Span::SYNTHETIC,
        }
    }
}

pub type Ident = String;

/// Name bound to the caught exception inside generated `catch` clauses; a bare `raise` re-raises it.
pub const CAUGHT_EXCEPTION: &str = "_$sl_Exception";

/// A statement list.
pub type Body = Vec<Spanned<Stmt>>;

// ============================================================================
// Module unit
// ============================================================================

/// One parsed source file.
///
/// Created by a single parser invocation. The scope analyzer fills `scope` and `exports`; nothing
/// mutates the unit once code generation starts.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Module {
    /// Dotted module id (`"__main__"` for the entry module).
    pub id: String,
    pub filename: Option<String>,
    pub shebang: Option<String>,
    /// Leading string-literal directives (`"use strict"`, docstrings).
    pub directives: Vec<String>,
    pub body: Body,
    /// Names exported to importers (top-level functions and classes).
    pub exports: Vec<Ident>,
    /// Ids of directly imported modules, in order of first import.
    pub submodules: Vec<String>,
    /// Position in the dependency-first emission order; assigned by the resolver.
    pub import_order: usize,
    pub baselib: BaselibUsage,
    /// Classes declared in this module.
    pub classes: ClassRegistry,
    pub strict: bool,
    pub scope: ScopeRecord,
    /// Leading `#` comments keyed by the start offset of the statement they precede.
    pub comments: BTreeMap<usize, Vec<String>>,
}

/// Runtime helpers referenced by a module.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BaselibUsage {
    used: BTreeSet<HelperId>,
}

impl BaselibUsage {
    pub fn mark(&mut self, id: HelperId) {
        self.used.insert(id);
    }

    pub fn contains(&self, id: HelperId) -> bool {
        self.used.contains(&id)
    }

    pub fn is_empty(&self) -> bool {
        self.used.is_empty()
    }

    pub fn extend(&mut self, other: &BaselibUsage) {
        self.used.extend(other.used.iter().copied());
    }

    /// Helpers in registry (emission) order.
    pub fn iter(&self) -> impl Iterator<Item = HelperId> + '_ {
        self.used.iter().copied()
    }
}

/// What a class declaration contributes to call generation.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ClassInfo {
    pub static_methods: Vec<Ident>,
    /// Method name → whether the constructor rebinds it to the instance.
    pub bound_methods: BTreeMap<Ident, bool>,
}

impl ClassInfo {
    pub fn is_static(&self, method: &str) -> bool {
        self.static_methods.iter().any(|m| m == method)
    }
}

/// Class name (possibly dotted, e.g. `pkg.Widget`) → class info.
pub type ClassRegistry = BTreeMap<String, ClassInfo>;

/// Names bound in one function, class or module scope.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ScopeRecord {
    /// Locally assigned names, hoisted into a single `var` declaration.
    pub vars: Vec<Ident>,
    /// Names bound to function or class statements at this level.
    pub callables: Vec<Ident>,
    /// Nested class declarations by name.
    pub classes: BTreeMap<Ident, Span>,
    pub nonlocals: Vec<Ident>,
    /// Whether the scope contains verbatim `JS(...)` code that may bind names we cannot see.
    pub uses_dynamic: bool,
}

// ============================================================================
// Statements
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    Expr(Spanned<Expr>),
    /// Bare string literal in directive position.
    Directive(String),
    /// Hoisted declaration synthesized by the scope analyzer.
    Var(Vec<Ident>),
    If {
        test: Spanned<Expr>,
        body: Body,
        orelse: Body,
    },
    While {
        test: Spanned<Expr>,
        body: Body,
    },
    DoWhile {
        body: Body,
        test: Spanned<Expr>,
    },
    ForIn {
        /// `Name` or `Unpack`.
        target: Spanned<Expr>,
        iter: Spanned<Expr>,
        body: Body,
    },
    /// `for JS("init; cond; step"):`
    ForJs {
        header: String,
        body: Body,
    },
    Try {
        body: Body,
        handlers: Vec<ExceptHandler>,
        finalbody: Option<Body>,
    },
    Switch {
        discriminant: Spanned<Expr>,
        cases: Vec<SwitchCase>,
    },
    Return(Option<Spanned<Expr>>),
    /// `raise x`; a bare `raise` re-raises the caught exception variable.
    Raise(Spanned<Expr>),
    Break(Option<Ident>),
    Continue(Option<Ident>),
    Labeled {
        label: Ident,
        body: Box<Spanned<Stmt>>,
    },
    Import(ImportStmt),
    Class(ClassDef),
    Function(FunctionDef),
    Del(Spanned<Expr>),
    Nonlocal(Vec<Ident>),
    Pass,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExceptHandler {
    /// Empty for a catch-all `except:`.
    pub types: Vec<Spanned<Expr>>,
    pub name: Option<Ident>,
    pub body: Body,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SwitchCase {
    /// `None` for `default:`.
    pub test: Option<Spanned<Expr>>,
    pub body: Body,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ImportStmt {
    /// Dotted module id as written.
    pub module: String,
    pub alias: Option<Ident>,
    /// `from m import a, b as c`; empty for `import m`.
    pub names: Vec<ImportName>,
    pub is_from: bool,
}

impl ImportStmt {
    /// Local names this statement binds.
    pub fn bound_names(&self) -> Vec<Ident> {
        if self.is_from {
            self.names.iter().map(|n| n.local().to_string()).collect()
        } else if let Some(alias) = &self.alias {
            vec![alias.clone()]
        } else {
            let first = self.module.split('.').next().unwrap_or(&self.module);
            vec![first.to_string()]
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ImportName {
    pub name: Ident,
    pub alias: Option<Ident>,
    pub span: Span,
}

impl ImportName {
    pub fn local(&self) -> &str {
        self.alias.as_deref().unwrap_or(&self.name)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Param {
    pub name: Ident,
    pub default: Option<Spanned<Expr>>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct FunctionDef {
    /// `None` for anonymous function literals.
    pub name: Option<Ident>,
    pub params: Vec<Param>,
    /// Trailing `*rest` parameter.
    pub rest: Option<Ident>,
    pub body: Body,
    pub decorators: Vec<Spanned<Expr>>,
    /// Receiver parameter name for methods (`self`); it is not part of `params`.
    pub receiver: Option<Ident>,
    pub is_static: bool,
    pub scope: ScopeRecord,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ClassDef {
    pub name: Ident,
    pub bases: Vec<Spanned<Expr>>,
    /// The `__init__` method, hoisted out of `body`.
    pub init: Option<Box<FunctionDef>>,
    /// Methods, class attributes, nested classes and directives.
    pub body: Body,
    pub decorators: Vec<Spanned<Expr>>,
    pub info: ClassInfo,
    pub scope: ScopeRecord,
    pub span: Span,
}

impl ClassDef {
    /// Methods rebound to each instance by the constructor.
    pub fn bound_methods(&self) -> impl Iterator<Item = &str> {
        self.info
            .bound_methods
            .iter()
            .filter(|(_, bound)| **bound)
            .map(|(name, _)| name.as_str())
    }
}

// ============================================================================
// Expressions
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Name(Ident),
    Number(f64),
    Str(String),
    RegExp {
        pattern: String,
        flags: String,
    },
    Atom(AtomId),
    /// `JS("code")` passthrough.
    Verbatim(String),
    Array(Vec<Spanned<Expr>>),
    Object(Vec<ObjectProp>),
    Function(Box<FunctionDef>),
    Call {
        callee: Box<Spanned<Expr>>,
        args: Vec<Spanned<Expr>>,
    },
    /// `Cls.method(args)` where `Cls` is a known class.
    ClassCall {
        class: Box<Spanned<Expr>>,
        method: Ident,
        is_static: bool,
        args: Vec<Spanned<Expr>>,
    },
    /// Constructor call: `new X(...)` or a call to a known class.
    New {
        callee: Box<Spanned<Expr>>,
        args: Vec<Spanned<Expr>>,
    },
    Dot {
        object: Box<Spanned<Expr>>,
        property: Ident,
    },
    Index {
        object: Box<Spanned<Expr>>,
        index: Box<Spanned<Expr>>,
    },
    Slice {
        object: Box<Spanned<Expr>>,
        lower: Option<Box<Spanned<Expr>>>,
        upper: Option<Box<Spanned<Expr>>>,
        step: Option<Box<Spanned<Expr>>>,
    },
    Seq(Vec<Spanned<Expr>>),
    UnaryPrefix {
        op: OperatorId,
        operand: Box<Spanned<Expr>>,
    },
    UnaryPostfix {
        op: OperatorId,
        operand: Box<Spanned<Expr>>,
    },
    Binary {
        op: OperatorId,
        left: Box<Spanned<Expr>>,
        right: Box<Spanned<Expr>>,
    },
    /// `a < b < c`: `operands.len() == ops.len() + 1`.
    ChainedCompare {
        operands: Vec<Spanned<Expr>>,
        ops: Vec<OperatorId>,
    },
    Conditional {
        test: Box<Spanned<Expr>>,
        then: Box<Spanned<Expr>>,
        orelse: Box<Spanned<Expr>>,
    },
    Assign {
        op: OperatorId,
        target: Box<Spanned<Expr>>,
        value: Box<Spanned<Expr>>,
    },
    /// Destructuring target `[a, b]` / `a, b`.
    Unpack(Vec<Spanned<Expr>>),
    ListComp {
        element: Box<Spanned<Expr>>,
        target: Box<Spanned<Expr>>,
        iter: Box<Spanned<Expr>>,
        condition: Option<Box<Spanned<Expr>>>,
    },
}

impl Expr {
    /// Whether the expression may appear on the left of `=`.
    pub fn is_assignable(&self) -> bool {
        match self {
            Expr::Name(_) | Expr::Dot { .. } | Expr::Index { .. } | Expr::Slice { .. } => true,
            Expr::Unpack(items) => items.iter().all(|i| i.node.is_assignable()),
            _ => false,
        }
    }

    /// Dotted path for `a`, `a.b`, `a.b.c`; `None` for anything else.
    pub fn dotted_path(&self) -> Option<String> {
        match self {
            Expr::Name(n) => Some(n.clone()),
            Expr::Dot { object, property } => object.node.dotted_path().map(|p| format!("{p}.{property}")),
            _ => None,
        }
    }

    /// Value of a numeric literal, including a negated one.
    pub fn numeric_value(&self) -> Option<f64> {
        match self {
            Expr::Number(n) => Some(*n),
            Expr::UnaryPrefix {
                op: OperatorId::Minus,
                operand,
            } => operand.node.numeric_value().map(|n| -n),
            _ => None,
        }
    }

    /// Arguments of a `range(...)` call that a `for` loop can lower to a counting loop.
    ///
    /// A step must be a non-zero numeric literal so the loop direction is known.
    pub fn range_loop_args(&self) -> Option<&[Spanned<Expr>]> {
        let Expr::Call { callee, args } = self else {
            return None;
        };
        let is_range = matches!(&callee.node, Expr::Name(n) if n == "range");
        if !is_range || args.is_empty() || args.len() > 3 {
            return None;
        }
        if args.len() == 3 && args[2].node.numeric_value().is_none_or(|step| step == 0.0) {
            return None;
        }
        Some(args)
    }

    /// `range(...)` arguments when a `for` loop binding `target` over `self` counts instead of
    /// iterating an array.
    pub fn lowered_range(&self, target: &Expr) -> Option<&[Spanned<Expr>]> {
        match target {
            Expr::Name(_) => self.range_loop_args(),
            _ => None,
        }
    }

    pub fn binary(op: OperatorId, left: Spanned<Expr>, right: Spanned<Expr>) -> Spanned<Expr> {
        let span = left.span.merge(right.span);
        Spanned::new(
            Expr::Binary {
                op,
                left: Box::new(left),
                right: Box::new(right),
            },
            span,
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum PropKey {
    Name(Ident),
    Str(String),
    Number(f64),
}

#[derive(Debug, Clone, PartialEq)]
pub enum ObjectProp {
    KeyVal { key: PropKey, value: Spanned<Expr> },
    Getter { name: Ident, func: FunctionDef },
    Setter { name: Ident, func: FunctionDef },
}

#[cfg(test)]
mod tests {
    use super::*;

    fn name(n: &str) -> Spanned<Expr> {
        Spanned::new(Expr::Name(n.to_string()), Span::new(0, n.len()))
    }

    #[test]
    fn test_dotted_path() {
        let dot = Expr::Dot {
            object: Box::new(Spanned::new(
                Expr::Dot {
                    object: Box::new(name("a")),
                    property: "b".into(),
                },
                Span::new(0, 3),
            )),
            property: "C".into(),
        };
        assert_eq!(dot.dotted_path().as_deref(), Some("a.b.C"));
        assert_eq!(Expr::Number(1.0).dotted_path(), None);
    }

    #[test]
    fn test_assignable_targets() {
        assert!(Expr::Name("x".into()).is_assignable());
        assert!(Expr::Unpack(vec![name("a"), name("b")]).is_assignable());
        assert!(!Expr::Number(1.0).is_assignable());
        assert!(!Expr::Unpack(vec![name("a"), Spanned::new(Expr::Number(1.0), Span::default())]).is_assignable());
    }

    #[test]
    fn test_import_bound_names() {
        let import = ImportStmt {
            module: "pkg.util".into(),
            alias: None,
            names: Vec::new(),
            is_from: false,
        };
        assert_eq!(import.bound_names(), vec!["pkg".to_string()]);
    }
}
