//! Parenthesization.
//!
//! Every expression has the JavaScript precedence of the form it prints as, which can differ
//! from its source form: `a // b` prints as a call, `a < b < c` as a conjunction. A child needs
//! parentheses when its printed precedence is below the minimum its position in the parent
//! allows.

use slither_core::lang::operators::OperatorId;
use slither_syntax::ast::{Expr, Spanned};

/// JavaScript precedence levels, lowest to highest.
pub mod level {
    pub const SEQUENCE: u8 = 1;
    pub const ASSIGN: u8 = 2;
    pub const CONDITIONAL: u8 = 3;
    pub const OR: u8 = 4;
    pub const AND: u8 = 5;
    pub const BIT_OR: u8 = 6;
    pub const BIT_XOR: u8 = 7;
    pub const BIT_AND: u8 = 8;
    pub const EQUALITY: u8 = 9;
    pub const RELATIONAL: u8 = 10;
    pub const SHIFT: u8 = 11;
    pub const ADDITIVE: u8 = 12;
    pub const MULTIPLICATIVE: u8 = 13;
    pub const UNARY: u8 = 15;
    pub const POSTFIX: u8 = 16;
    pub const CALL: u8 = 18;
    pub const PRIMARY: u8 = 20;
}

/// Printed precedence of a binary operator.
pub fn binary_level(op: OperatorId) -> u8 {
    match op {
        OperatorId::Or => level::OR,
        OperatorId::And => level::AND,
        OperatorId::Pipe => level::BIT_OR,
        OperatorId::Caret => level::BIT_XOR,
        OperatorId::Amp => level::BIT_AND,
        OperatorId::EqEq | OperatorId::NotEq | OperatorId::Is => level::EQUALITY,
        OperatorId::Lt | OperatorId::LtEq | OperatorId::Gt | OperatorId::GtEq | OperatorId::InstanceOf => {
            level::RELATIONAL
        }
        OperatorId::Shl | OperatorId::Shr | OperatorId::UShr => level::SHIFT,
        OperatorId::Plus | OperatorId::Minus => level::ADDITIVE,
        OperatorId::Star | OperatorId::Slash | OperatorId::Percent => level::MULTIPLICATIVE,
        // Lowered to helper or `Math` calls.
        OperatorId::StarStar | OperatorId::SlashSlash | OperatorId::In => level::CALL,
        _ => level::PRIMARY,
    }
}

/// Whether an assignment prints as a sequence rather than a single assignment.
fn assign_is_sequence(target: &Expr) -> bool {
    matches!(target, Expr::Unpack(_))
}

/// Printed precedence of `expr`.
pub fn precedence(expr: &Expr) -> u8 {
    match expr {
        Expr::Seq(_) => level::SEQUENCE,
        Expr::Assign { target, .. } if assign_is_sequence(&target.node) => level::SEQUENCE,
        Expr::Assign { target, .. } if matches!(target.node, Expr::Slice { .. }) => level::CALL,
        Expr::Assign { .. } => level::ASSIGN,
        Expr::Conditional { .. } => level::CONDITIONAL,
        Expr::ChainedCompare { .. } => level::AND,
        Expr::Binary { op, .. } => binary_level(*op),
        Expr::UnaryPrefix { .. } => level::UNARY,
        Expr::UnaryPostfix { .. } => level::POSTFIX,
        Expr::Call { .. }
        | Expr::ClassCall { .. }
        | Expr::New { .. }
        | Expr::Dot { .. }
        | Expr::Index { .. }
        | Expr::Slice { .. }
        | Expr::ListComp { .. } => level::CALL,
        Expr::Number(n) if !n.is_finite() => level::MULTIPLICATIVE,
        Expr::Name(_)
        | Expr::Number(_)
        | Expr::Str(_)
        | Expr::RegExp { .. }
        | Expr::Atom(_)
        | Expr::Verbatim(_)
        | Expr::Array(_)
        | Expr::Unpack(_)
        | Expr::Object(_)
        | Expr::Function(_) => level::PRIMARY,
    }
}

/// Whether `expr` must be wrapped to appear where precedence `min` is required.
pub fn needs_parens(expr: &Expr, min: u8) -> bool {
    precedence(expr) < min
}

/// Minimum precedences for the two operands of a binary operator printed infix.
///
/// `&&` and `||` are associative, so an equal-precedence right operand prints bare.
pub fn operand_levels(op: OperatorId) -> (u8, u8) {
    let p = binary_level(op);
    match op {
        OperatorId::And | OperatorId::Or => (p, p),
        _ => (p, p + 1),
    }
}

/// Whether `expr` is the object of a member access and would misparse without parentheses
/// (`1.toString()`).
pub fn needs_parens_as_member_object(expr: &Expr) -> bool {
    match expr {
        Expr::Number(n) if n.is_finite() => n.fract() == 0.0,
        other => needs_parens(other, level::CALL),
    }
}

/// Whether a `new` callee contains a call, which would otherwise bind the `new`'s argument list.
pub fn needs_parens_as_new_callee(expr: &Expr) -> bool {
    match expr {
        Expr::Call { .. } | Expr::ClassCall { .. } | Expr::Slice { .. } | Expr::ListComp { .. } => true,
        Expr::Binary { op, .. } if binary_level(*op) == level::CALL => true,
        Expr::Dot { object, .. } | Expr::Index { object, .. } => needs_parens_as_new_callee(&object.node),
        other => needs_parens(other, level::CALL),
    }
}

/// The leftmost leaf printed for `expr`, following the operands that print first.
pub fn leftmost(expr: &Spanned<Expr>) -> &Spanned<Expr> {
    match &expr.node {
        Expr::Binary { op, left, .. } if binary_level(*op) != level::CALL => leftmost(left),
        Expr::Assign { target, .. } if !assign_is_sequence(&target.node) && !matches!(target.node, Expr::Slice { .. }) => {
            leftmost(target)
        }
        Expr::Conditional { test, .. } => leftmost(test),
        Expr::Call { callee, .. } => leftmost(callee),
        Expr::ClassCall { class, .. } => leftmost(class),
        Expr::Dot { object, .. } | Expr::Index { object, .. } => leftmost(object),
        Expr::Slice { object, step: None, .. } => leftmost(object),
        Expr::UnaryPostfix { operand, .. } => leftmost(operand),
        Expr::ChainedCompare { operands, .. } => operands.first().map_or(expr, leftmost),
        Expr::Seq(items) => items.first().map_or(expr, leftmost),
        _ => expr,
    }
}

/// Whether an expression statement must be wrapped so it does not start with `function` or `{`.
pub fn statement_needs_parens(expr: &Spanned<Expr>) -> bool {
    matches!(leftmost(expr).node, Expr::Function(_) | Expr::Object(_))
}
