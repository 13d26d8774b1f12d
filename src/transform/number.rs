use crate::error::RollError;
use crate::knowledge::KnowledgeBase;
use crate::types::expr::{Expr, Token};
use crate::types::expr_rewriter::ExprVisitor;

/// Turns integer and named-die tokens into literals.
pub struct NumberNormalizer<'a> {
    knowledge: &'a KnowledgeBase,
}

impl<'a> NumberNormalizer<'a> {
    pub fn new(knowledge: &'a KnowledgeBase) -> Self {
        Self { knowledge }
    }
}

impl ExprVisitor for NumberNormalizer<'_> {
    fn visit_expr_self(&mut self, e: &mut Expr) -> Result<(), RollError> {
        match e {
            Expr::Token(Token::Int(n)) => *e = Expr::Literal(*n),
            Expr::Token(Token::NamedDie(name)) => {
                // The grammar only accepts names from the same knowledge base
                let die = self.knowledge.named_die(name).ok_or_else(|| {
                    RollError::recognition(format!("Sorry, I don't know what {} is", name))
                })?;
                *e = Expr::Literal(die.sides);
            }
            Expr::Literal(_)
            | Expr::Binary(_)
            | Expr::RollOne { .. }
            | Expr::RollN { .. }
            | Expr::Critical(_)
            | Expr::Advantage(_)
            | Expr::Disadvantage(_)
            | Expr::WeaponRef(_)
            | Expr::SpellRef(_)
            | Expr::Value(_) => {}
        }
        Ok(())
    }
}

// ==========================================
// Entry point
// ==========================================

pub fn normalize_numbers(expr: Expr, knowledge: &KnowledgeBase) -> Result<Expr, RollError> {
    let mut expr = expr;
    NumberNormalizer::new(knowledge).visit_expr(&mut expr)?;
    Ok(expr)
}
