use super::expr::*;
use crate::error::RollError;

// ==========================================
// Traversal helper (mutable visitor pattern)
// ==========================================

/// Bottom-up rewriting over [`Expr`].
///
/// `visit_expr` visits every child first, then the node itself, so by the time
/// `visit_expr_self` runs the children are already rewritten. A pass overrides
/// `visit_expr_self` and may replace `*e` outright.
pub trait ExprVisitor {
    fn visit_expr(&mut self, e: &mut Expr) -> Result<(), RollError> {
        self.visit_expr_children(e)?;
        self.visit_expr_self(e)
    }

    fn visit_expr_self(&mut self, _e: &mut Expr) -> Result<(), RollError> {
        Ok(())
    }

    fn visit_expr_children(&mut self, e: &mut Expr) -> Result<(), RollError> {
        match e {
            Expr::Token(_) | Expr::Literal(_) | Expr::WeaponRef(_) => Ok(()), // leaves
            Expr::Binary(BinaryOp { lhs, rhs, .. }) => {
                self.visit_expr(lhs)?;
                self.visit_expr(rhs)
            }
            Expr::RollOne { sides } => self.visit_expr(sides),
            Expr::RollN { count, sides } => {
                self.visit_expr(count)?;
                self.visit_expr(sides)
            }
            Expr::Critical(inner)
            | Expr::Advantage(inner)
            | Expr::Disadvantage(inner)
            | Expr::Value(inner) => self.visit_expr(inner),
            Expr::SpellRef(spell) => match &mut spell.level {
                Some(level) => self.visit_expr(level),
                None => Ok(()),
            },
        }
    }
}
