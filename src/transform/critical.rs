use crate::error::RollError;
use crate::types::expr::{BinOp, Expr};
use crate::types::expr_rewriter::ExprVisitor;

/// Removes `Critical`, `Advantage` and `Disadvantage` wrappers.
///
/// A critical hit doubles the dice count of every roll underneath it; flat
/// modifiers are untouched. Advantage (disadvantage) turns every roll
/// underneath it into the max (min) of two independent copies of that roll.
/// Nested advantage multiplies the tree, so copies share a node budget.
pub struct CritRewriter {
    budget: usize,
}

/// Most nodes advantage and disadvantage may copy in one tree.
pub const MAX_DUPLICATED_NODES: usize = 100_000;

impl CritRewriter {
    pub fn new() -> Self {
        CritRewriter {
            budget: MAX_DUPLICATED_NODES,
        }
    }
}

impl Default for CritRewriter {
    fn default() -> Self {
        Self::new()
    }
}

impl ExprVisitor for CritRewriter {
    fn visit_expr_self(&mut self, e: &mut Expr) -> Result<(), RollError> {
        let new_val = match e {
            Expr::Critical(inner) => {
                let mut inner = inner.take();
                DiceDoubler.visit_expr(&mut inner)?;
                tracing::debug!(%inner, "critical hit doubled the dice");
                Some(inner)
            }
            Expr::Advantage(inner) => {
                let mut inner = inner.take();
                DiceDuplicator::new(BinOp::Max, &mut self.budget).visit_expr(&mut inner)?;
                Some(inner)
            }
            Expr::Disadvantage(inner) => {
                let mut inner = inner.take();
                DiceDuplicator::new(BinOp::Min, &mut self.budget).visit_expr(&mut inner)?;
                Some(inner)
            }
            Expr::Token(_)
            | Expr::Literal(_)
            | Expr::Binary(_)
            | Expr::RollOne { .. }
            | Expr::RollN { .. }
            | Expr::WeaponRef(_)
            | Expr::SpellRef(_)
            | Expr::Value(_) => None,
        };
        if let Some(val) = new_val {
            *e = val;
        }
        Ok(())
    }
}

// ==========================================
// Helper visitors
// ==========================================

struct DiceDoubler;

impl ExprVisitor for DiceDoubler {
    fn visit_expr_self(&mut self, e: &mut Expr) -> Result<(), RollError> {
        let new_val = match e {
            Expr::RollN { count, .. } => {
                **count = match count.take() {
                    Expr::Literal(n) => Expr::literal(n.saturating_mul(2)),
                    other => Expr::binary(Expr::literal(2), BinOp::Mul, other),
                };
                None
            }
            // Simplification normally removes these first
            Expr::RollOne { sides } => Some(Expr::roll_n(Expr::literal(2), sides.take())),
            _ => None,
        };
        if let Some(val) = new_val {
            *e = val;
        }
        Ok(())
    }
}

struct DiceDuplicator<'a> {
    op: BinOp,
    budget: &'a mut usize,
}

impl<'a> DiceDuplicator<'a> {
    fn new(op: BinOp, budget: &'a mut usize) -> Self {
        DiceDuplicator { op, budget }
    }
}

impl ExprVisitor for DiceDuplicator<'_> {
    fn visit_expr_self(&mut self, e: &mut Expr) -> Result<(), RollError> {
        if e.is_dice() {
            *self.budget = self
                .budget
                .checked_sub(e.node_count())
                .ok_or_else(|| RollError::impossible_dice("Sorry, I couldn't roll that many dice."))?;
            let roll = e.take();
            *e = Expr::binary(roll.clone(), self.op, roll);
        }
        Ok(())
    }
}

// ==========================================
// Entry point
// ==========================================

pub fn rewrite_critical(expr: Expr) -> Result<Expr, RollError> {
    let mut expr = expr;
    CritRewriter::new().visit_expr(&mut expr)?;
    Ok(expr)
}
