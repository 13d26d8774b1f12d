//! Natural-language dice rolling for D&D.
//!
//! A request such as `"critical longsword plus 3"` or `"fireball at 5th level"`
//! is parsed by a grammar whose names come from a [`KnowledgeBase`], rewritten
//! by a series of passes (numbers, weapons and spells, simplification,
//! critical hits and advantage), and finally rolled.

pub mod bindings;
pub mod config;
pub mod dice_source;
pub mod error;
pub mod grammar;
pub mod knowledge;
pub mod runtime;
pub mod transform;
pub mod types;

pub use config::RollConfig;
pub use dice_source::{DiceSource, RandomDice, ScriptedDice};
pub use error::{KnowledgeError, RollError};
pub use grammar::Grammar;
pub use knowledge::KnowledgeBase;
pub use runtime::{DiceRoller, RollOutcome, default_roller, describe, roll};
pub use types::expr::Expr;
