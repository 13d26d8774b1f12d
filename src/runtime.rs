use crate::config::RollConfig;
use crate::dice_source::{DiceSource, RandomDice};
use crate::error::{KnowledgeError, RollError};
use crate::grammar::Grammar;
use crate::knowledge::KnowledgeBase;
use crate::transform::{
    evaluate, normalize_numbers, resolve_knowledge, rewrite_critical, simplify,
};
use crate::types::expr::Expr;
use serde::Serialize;
use std::sync::LazyLock;
use tsify::Tsify;

// ==========================================
// Roll results
// ==========================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Tsify)]
#[tsify(into_wasm_abi)]
pub struct RollOutcome {
    pub total: i64,
    /// Every face rolled, in the order the dice appear in the request.
    pub rolls: Vec<i64>,
}

impl RollOutcome {
    /// "You rolled a total of 7 from 3 and 4"
    pub fn narration(&self) -> String {
        format!("You rolled a total of {}{}", self.total, describe(&self.rolls))
    }
}

/// Lists the faces behind a total: `" from 1, 2 and 3"`.
///
/// A single roll (or none) needs no explanation, so that gives an empty string.
pub fn describe(rolls: &[i64]) -> String {
    match rolls {
        [] | [_] => String::new(),
        [init @ .., last] => {
            let init: Vec<String> = init.iter().map(i64::to_string).collect();
            format!(" from {} and {}", init.join(", "), last)
        }
    }
}

// ==========================================
// Dice roller
// ==========================================

/// Parses dice specs and runs them through every pass.
///
/// The grammar is built from the knowledge base once, up front. A roller is
/// immutable afterwards and can be shared between threads.
#[derive(Debug, Clone)]
pub struct DiceRoller {
    knowledge: KnowledgeBase,
    grammar: Grammar,
    config: RollConfig,
}

impl DiceRoller {
    pub fn new(knowledge: KnowledgeBase) -> Self {
        Self::with_config(knowledge, RollConfig::default())
    }

    pub fn with_config(knowledge: KnowledgeBase, config: RollConfig) -> Self {
        let grammar = Grammar::new(&knowledge);
        Self {
            knowledge,
            grammar,
            config,
        }
    }

    pub fn knowledge(&self) -> &KnowledgeBase {
        &self.knowledge
    }

    pub fn grammar(&self) -> &Grammar {
        &self.grammar
    }

    pub fn config(&self) -> &RollConfig {
        &self.config
    }

    /// Parses `spec` and runs every rewriting pass, stopping short of rolling.
    pub fn compile(&self, spec: &str) -> Result<Expr, RollError> {
        let expr = {
            let _span = tracing::debug_span!("initial_parse").entered();
            let expr = self.grammar.parse(spec)?;
            tracing::debug!(%expr, "parsed");
            expr
        };
        let expr = normalize_numbers(expr, &self.knowledge)?;
        let expr = {
            let _span = tracing::debug_span!("dnd_knowledge").entered();
            resolve_knowledge(expr, &self.grammar, &self.knowledge, &self.config)?
        };
        let expr = simplify(expr)?;
        let expr = {
            let _span = tracing::debug_span!("crit_transform").entered();
            rewrite_critical(expr)?
        };
        let expr = simplify(expr)?;
        tracing::debug!(%expr, "compiled");
        Ok(expr)
    }

    /// Rolls `spec` with thread-local randomness.
    pub fn roll(&self, spec: &str) -> Result<RollOutcome, RollError> {
        self.roll_with(spec, RandomDice::new())
    }

    /// Rolls `spec`, taking faces from `dice`.
    pub fn roll_with(&self, spec: &str, dice: impl DiceSource) -> Result<RollOutcome, RollError> {
        tracing::info!(spec, "rolling");
        let expr = self.compile(spec)?;
        let (total, rolls) = {
            let _span = tracing::debug_span!("final_eval").entered();
            evaluate(&expr, dice, self.config.dice_count_limit)?
        };
        tracing::info!(spec, total, dice = rolls.len(), "rolled");
        Ok(RollOutcome { total, rolls })
    }
}

// ==========================================
// Default roller
// ==========================================

static DEFAULT_ROLLER: LazyLock<Result<DiceRoller, KnowledgeError>> =
    LazyLock::new(|| KnowledgeBase::builtin().map(DiceRoller::new));

/// The roller behind [`roll`], built from the built-in ruleset on first use.
pub fn default_roller() -> Result<&'static DiceRoller, RollError> {
    DEFAULT_ROLLER
        .as_ref()
        .map_err(|e| RollError::internal(format!("built-in ruleset is unusable: {}", e)))
}

/// Rolls `spec` with the built-in ruleset, returning the total and every face rolled.
pub fn roll(spec: &str) -> Result<(i64, Vec<i64>), RollError> {
    let outcome = default_roller()?.roll(spec)?;
    Ok((outcome.total, outcome.rolls))
}
