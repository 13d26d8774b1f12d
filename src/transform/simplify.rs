use crate::error::RollError;
use crate::types::expr::{BinOp, BinaryOp, Expr};
use crate::types::expr_rewriter::ExprVisitor;

/// Canonicalises dice so that equal-sided chains collapse.
///
/// * `Value(x)` becomes `x`
/// * `RollOne(s)` becomes `RollN(1, s)`
/// * `RollN(a, s) + RollN(b, s)` becomes `RollN(a + b, s)` when both counts are literals
///
/// Children are rewritten first, so a left-leaning chain such as
/// `d6 + d6 + 2d6` folds all the way down to `4d6`.
pub struct Simplifier;

impl ExprVisitor for Simplifier {
    fn visit_expr_self(&mut self, e: &mut Expr) -> Result<(), RollError> {
        let new_val = match e {
            Expr::Value(inner) => Some(inner.take()),
            Expr::RollOne { sides } => Some(Expr::roll_n(Expr::literal(1), sides.take())),
            Expr::Binary(bin_op) => merge_dice(bin_op),
            Expr::Token(_)
            | Expr::Literal(_)
            | Expr::RollN { .. }
            | Expr::Critical(_)
            | Expr::Advantage(_)
            | Expr::Disadvantage(_)
            | Expr::WeaponRef(_)
            | Expr::SpellRef(_) => None, // nothing to simplify
        };
        if let Some(val) = new_val {
            *e = val;
        }
        Ok(())
    }
}

fn merge_dice(bin_op: &mut BinaryOp) -> Option<Expr> {
    if bin_op.op != BinOp::Add {
        return None;
    }
    match (&mut *bin_op.lhs, &mut *bin_op.rhs) {
        (
            Expr::RollN {
                count: lhs_count,
                sides: lhs_sides,
            },
            Expr::RollN {
                count: rhs_count,
                sides: rhs_sides,
            },
        ) if lhs_sides == rhs_sides => match (&**lhs_count, &**rhs_count) {
            (Expr::Literal(a), Expr::Literal(b)) => Some(Expr::roll_n(
                Expr::literal(a.saturating_add(*b)),
                lhs_sides.take(),
            )),
            _ => None,
        },
        _ => None,
    }
}

// ==========================================
// Entry point
// ==========================================

pub fn simplify(expr: Expr) -> Result<Expr, RollError> {
    let mut expr = expr;
    Simplifier.visit_expr(&mut expr)?;
    Ok(expr)
}
