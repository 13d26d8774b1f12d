use super::number::normalize_numbers;
use crate::config::RollConfig;
use crate::error::RollError;
use crate::grammar::Grammar;
use crate::knowledge::{KnowledgeBase, Spell};
use crate::types::expr::{Expr, SpellRef};
use crate::types::expr_rewriter::ExprVisitor;
use regex::Regex;
use std::sync::LazyLock;

// `NdM` with an optional flat `+K`, e.g. "8d6" or "10d6 + 40"
static DICE_PATTERN: LazyLock<Result<Regex, regex::Error>> =
    LazyLock::new(|| Regex::new(r"\d+d\d+( *[+] *\d+)?"));

fn find_dice(text: &str) -> Result<Option<&str>, RollError> {
    match &*DICE_PATTERN {
        Ok(pattern) => Ok(pattern.find(text).map(|m| m.as_str())),
        Err(e) => Err(RollError::internal(e)),
    }
}

/// Replaces weapon and spell references with the dice they deal.
///
/// Damage text is parsed with the same [`Grammar`], number-normalised, and
/// resolved again in case it names further weapons or spells.
pub struct KnowledgeResolver<'a> {
    grammar: &'a Grammar,
    knowledge: &'a KnowledgeBase,
    config: &'a RollConfig,
    depth: u32,
}

impl<'a> KnowledgeResolver<'a> {
    pub fn new(grammar: &'a Grammar, knowledge: &'a KnowledgeBase, config: &'a RollConfig) -> Self {
        Self {
            grammar,
            knowledge,
            config,
            depth: 0,
        }
    }

    fn nested(&self) -> Self {
        Self {
            depth: self.depth + 1,
            ..*self
        }
    }

    // Parses damage text from a record and resolves whatever it refers to
    fn expand(&self, dice_spec: &str) -> Result<Expr, RollError> {
        let expr = self.grammar.parse_subexpression(dice_spec)?;
        let mut expr = normalize_numbers(expr, self.knowledge)?;
        self.nested().visit_expr(&mut expr)?;
        tracing::debug!(%expr, "expanded");
        Ok(expr)
    }

    fn check_depth(&self, name: &str) -> Result<(), RollError> {
        if self.depth >= self.config.expansion_depth_limit {
            return Err(RollError::recognition(format!(
                "Sorry, {} refers to other weapons or spells too deeply",
                name
            )));
        }
        Ok(())
    }

    fn resolve_weapon(&self, name: &str) -> Result<Expr, RollError> {
        let weapon = self
            .knowledge
            .weapon(name)
            .ok_or_else(|| RollError::recognition(format!("Sorry, I don't know what {} is", name)))?;
        self.check_depth(&weapon.name)?;
        let dice_spec = weapon.damage_dice.as_str();
        let _span = tracing::debug_span!("parse_weapon", name = %weapon.name, dice_spec).entered();
        self.expand(dice_spec)
    }

    fn resolve_spell(&self, spell_ref: &SpellRef) -> Result<Expr, RollError> {
        let spell = self.knowledge.spell(&spell_ref.name).ok_or_else(|| {
            RollError::recognition(format!("Sorry, I don't know what {} is", spell_ref.name))
        })?;
        self.check_depth(&spell.name)?;
        let level = match spell_ref.level.as_deref() {
            None => spell.level,
            Some(Expr::Literal(level)) => *level,
            Some(other) => {
                return Err(RollError::internal(format!(
                    "spell level `{}` was not normalised",
                    other
                )));
            }
        };

        let base_spec = find_dice(&spell.desc)?.ok_or_else(|| {
            RollError::impossible_spell(format!(
                "Sorry, I couldn't find the damage dice for {}",
                spell.name
            ))
        })?;
        check_castable(spell, level, self.config.spell_level_limit)?;

        let base = {
            let _span =
                tracing::debug_span!("parse_spell", name = %spell.name, dice_spec = base_spec)
                    .entered();
            self.expand(base_spec)?
        };
        // Naming a level, even the base one, requires the scaling dice
        if spell_ref.level.is_none() {
            return Ok(base);
        }

        let extra_spec = find_dice(&spell.higher_level)?.ok_or_else(|| {
            RollError::impossible_spell(format!(
                "Sorry, I couldn't determine the additional damage dice for {}",
                spell.name
            ))
        })?;
        let extra = {
            let _span = tracing::debug_span!(
                "parse_spell_additional",
                name = %spell.name,
                dice_spec = extra_spec
            )
            .entered();
            self.expand(extra_spec)?
        };
        Ok((spell.level..level).fold(base, |acc, _| Expr::add(acc, extra.clone())))
    }
}

fn check_castable(spell: &Spell, level: i64, limit: i64) -> Result<(), RollError> {
    if level < spell.level {
        return Err(RollError::impossible_spell(format!(
            "Sorry, {} is level {}, so I can't cast it at level {}",
            spell.name, spell.level, level
        )));
    }
    if level > limit {
        return Err(RollError::impossible_spell(format!(
            "Sorry, I can't cast {} above level {}",
            spell.name, limit
        )));
    }
    Ok(())
}

impl ExprVisitor for KnowledgeResolver<'_> {
    fn visit_expr_self(&mut self, e: &mut Expr) -> Result<(), RollError> {
        let resolved = match e {
            Expr::WeaponRef(name) => self.resolve_weapon(name)?,
            Expr::SpellRef(spell_ref) => self.resolve_spell(spell_ref)?,
            Expr::Token(_)
            | Expr::Literal(_)
            | Expr::Binary(_)
            | Expr::RollOne { .. }
            | Expr::RollN { .. }
            | Expr::Critical(_)
            | Expr::Advantage(_)
            | Expr::Disadvantage(_)
            | Expr::Value(_) => return Ok(()),
        };
        *e = resolved;
        Ok(())
    }
}

// ==========================================
// Entry point
// ==========================================

pub fn resolve_knowledge(
    expr: Expr,
    grammar: &Grammar,
    knowledge: &KnowledgeBase,
    config: &RollConfig,
) -> Result<Expr, RollError> {
    let mut expr = expr;
    KnowledgeResolver::new(grammar, knowledge, config).visit_expr(&mut expr)?;
    Ok(expr)
}
