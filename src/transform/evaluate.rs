use crate::dice_source::DiceSource;
use crate::error::RollError;
use crate::types::expr::{BinaryOp, Expr};

/// Reduces a fully rewritten tree to a total, rolling dice as it meets them.
///
/// Operands are evaluated depth first, left before right, so the recorded
/// faces come out in the order the dice appear in the tree.
pub struct Evaluator<D: DiceSource> {
    dice: D,
    rolls: Vec<i64>,
    dice_count_limit: u64,
}

impl<D: DiceSource> Evaluator<D> {
    pub fn new(dice: D, dice_count_limit: u64) -> Self {
        Self {
            dice,
            rolls: Vec::new(),
            dice_count_limit,
        }
    }

    pub fn evaluate(&mut self, e: &Expr) -> Result<i64, RollError> {
        match e {
            Expr::Literal(n) => Ok(*n),
            Expr::Binary(BinaryOp { lhs, op, rhs }) => {
                let lhs = self.evaluate(lhs)?;
                let rhs = self.evaluate(rhs)?;
                Ok(op.apply(lhs, rhs))
            }
            Expr::RollOne { sides } => {
                let sides = self.evaluate(sides)?;
                self.roll_dice(1, sides)
            }
            Expr::RollN { count, sides } => {
                let count = self.evaluate(count)?;
                let sides = self.evaluate(sides)?;
                self.roll_dice(count, sides)
            }
            Expr::Value(inner) => self.evaluate(inner),
            Expr::Token(_)
            | Expr::Critical(_)
            | Expr::Advantage(_)
            | Expr::Disadvantage(_)
            | Expr::WeaponRef(_)
            | Expr::SpellRef(_) => Err(RollError::internal(format!(
                "`{}` reached evaluation unresolved",
                e
            ))),
        }
    }

    fn roll_dice(&mut self, count: i64, sides: i64) -> Result<i64, RollError> {
        if count <= 0 {
            return Err(RollError::impossible_dice(format!(
                "Sorry, I couldn't roll {} dice.",
                count
            )));
        }
        if sides <= 0 {
            return Err(RollError::impossible_dice(format!(
                "Sorry, I couldn't roll a {} sided die.",
                sides
            )));
        }
        let total_dice = (self.rolls.len() as u64).saturating_add(count as u64);
        if total_dice > self.dice_count_limit {
            return Err(RollError::impossible_dice(format!(
                "Sorry, I couldn't roll {} dice.",
                total_dice
            )));
        }

        let mut sum: i64 = 0;
        for _ in 0..count {
            let face = self.dice.roll_die(sides);
            tracing::debug!(sides, face, "rolled");
            self.rolls.push(face);
            sum = sum.saturating_add(face);
        }
        Ok(sum)
    }

    /// Faces rolled, in the order they were drawn.
    pub fn into_rolls(self) -> Vec<i64> {
        self.rolls
    }
}

// ==========================================
// Entry point
// ==========================================

/// Evaluates `expr`, returning the total and every face rolled.
pub fn evaluate<D: DiceSource>(
    expr: &Expr,
    dice: D,
    dice_count_limit: u64,
) -> Result<(i64, Vec<i64>), RollError> {
    let mut evaluator = Evaluator::new(dice, dice_count_limit);
    let total = evaluator.evaluate(expr)?;
    Ok((total, evaluator.into_rolls()))
}
