//! Constant arithmetic evaluation for compile-time sizes.
//!
//! Folds the size expression of a fixed-size array type to an integer
//! when it is statically known. Anything that cannot be folded -- a
//! symbolic parameter, a float literal, an overflow, a division by a
//! folded zero -- yields `None`, and the consumer simply emits no guard.

use reef_ast::{BinaryOp, Expr, ExprKind, UnaryOp};

/// Fold a size expression to an integer, or `None` when unknown.
///
/// Only integer literals and `+ - * /` over foldable operands fold.
/// Division truncates toward zero, the same rule the emitted integer
/// cast formulas apply, so a folded size always agrees with what the
/// generated program would compute.
pub fn eval_size(expr: &Expr) -> Option<i64> {
    match &expr.kind {
        ExprKind::Num(text) => text.parse::<i64>().ok(),
        ExprKind::Unary {
            op: UnaryOp::Neg,
            operand,
        } => eval_size(operand)?.checked_neg(),
        ExprKind::Binary { op, lhs, rhs } => {
            let l = eval_size(lhs)?;
            let r = eval_size(rhs)?;
            match op {
                BinaryOp::Add => l.checked_add(r),
                BinaryOp::Sub => l.checked_sub(r),
                BinaryOp::Mul => l.checked_mul(r),
                BinaryOp::Div => l.checked_div(r),
                _ => None,
            }
        }
        _ => None,
    }
}
