use serde::{Deserialize, Serialize};
use std::str::FromStr;
use tsify::Tsify;

pub const DICE_COUNT_LIMIT_VAR: &str = "CRITDICE_DICE_COUNT_LIMIT";
pub const EXPANSION_DEPTH_LIMIT_VAR: &str = "CRITDICE_EXPANSION_DEPTH_LIMIT";
pub const SPELL_LEVEL_LIMIT_VAR: &str = "CRITDICE_SPELL_LEVEL_LIMIT";

/// Resource limits applied to every roll.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Tsify)]
#[tsify(from_wasm_abi)]
#[serde(rename_all = "camelCase", default)]
pub struct RollConfig {
    /// Total dice a single roll may draw.
    pub dice_count_limit: u64,
    /// How deeply weapon and spell damage text may refer to further weapons or spells.
    pub expansion_depth_limit: u32,
    /// Highest level a spell may be cast at.
    pub spell_level_limit: i64,
}

impl Default for RollConfig {
    fn default() -> Self {
        Self {
            dice_count_limit: 10_000,
            expansion_depth_limit: 16,
            spell_level_limit: 20,
        }
    }
}

impl RollConfig {
    /// Defaults, overridden by any `CRITDICE_*` limit variables that are set.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Like [`RollConfig::from_env`], reading variables through `lookup`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();
        override_from(&lookup, DICE_COUNT_LIMIT_VAR, &mut config.dice_count_limit);
        override_from(
            &lookup,
            EXPANSION_DEPTH_LIMIT_VAR,
            &mut config.expansion_depth_limit,
        );
        override_from(&lookup, SPELL_LEVEL_LIMIT_VAR, &mut config.spell_level_limit);
        config
    }
}

fn override_from<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, slot: &mut T)
where
    T: FromStr + std::fmt::Display,
{
    let Some(raw) = lookup(key) else {
        return;
    };
    match raw.trim().parse() {
        Ok(value) => *slot = value,
        Err(_) => tracing::warn!(key, value = %raw, default = %slot, "ignoring unparsable limit"),
    }
}
