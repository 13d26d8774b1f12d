use crate::error::KnowledgeError;
use serde::{Deserialize, Serialize};
use std::path::Path;

// ==========================================
// Records
// ==========================================

/// A die known by a name instead of a number of sides.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedDie {
    pub name: String,
    pub sides: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Weapon {
    pub name: String,
    /// Dice text such as `1d8` or a flat `1`, parsed as a `sum`.
    pub damage_dice: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Spell {
    pub name: String,
    #[serde(rename = "level_int")]
    pub level: i64,
    /// Free text; the first `NdM[+K]` in it is the base damage.
    pub desc: String,
    /// Free text; the first `NdM[+K]` in it is added once per level above base.
    #[serde(default)]
    pub higher_level: String,
}

pub const NAMED_DICE: &[(&str, i64)] = &[
    ("coin", 2),
    ("pyramid", 4),
    ("cube", 6),
    ("tetrahedron", 8),
    ("octahedron", 8),
    ("decahedron", 10),
    ("dodecahedron", 12),
    ("icosahedron", 20),
    ("saving throw", 20),
    ("skill check", 20),
    ("to hit", 20),
    ("death saving throw", 20),
    ("percentile", 100),
    ("percent", 100),
];

const BUILTIN_WEAPONS: &str = include_str!("../data/weapons.json");
const BUILTIN_SPELLS: &str = include_str!("../data/spells.json");

// ==========================================
// Knowledge base
// ==========================================

/// Immutable ruleset tables. Build once, then share freely.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KnowledgeBase {
    named_dice: Vec<NamedDie>,
    weapons: Vec<Weapon>,
    spells: Vec<Spell>,
}

impl KnowledgeBase {
    pub fn new(named_dice: Vec<NamedDie>, weapons: Vec<Weapon>, spells: Vec<Spell>) -> Self {
        Self {
            named_dice,
            weapons,
            spells,
        }
    }

    /// The standard named dice plus the weapon and spell data shipped with the crate.
    pub fn builtin() -> Result<Self, KnowledgeError> {
        Self::from_json(BUILTIN_WEAPONS, BUILTIN_SPELLS)
    }

    /// Parses weapon and spell JSON arrays; named dice come from [`NAMED_DICE`].
    pub fn from_json(weapons_json: &str, spells_json: &str) -> Result<Self, KnowledgeError> {
        let weapons = serde_json::from_str(weapons_json).map_err(|source| KnowledgeError::Json {
            what: "weapon",
            source,
        })?;
        let spells = serde_json::from_str(spells_json).map_err(|source| KnowledgeError::Json {
            what: "spell",
            source,
        })?;
        Ok(Self::new(default_named_dice(), weapons, spells))
    }

    /// Reads `weapons.json` and `spells.json` from `dir`.
    pub fn load(dir: impl AsRef<Path>) -> Result<Self, KnowledgeError> {
        let dir = dir.as_ref();
        let read = |file: &str| {
            let path = dir.join(file);
            std::fs::read_to_string(&path).map_err(|source| KnowledgeError::Io { path, source })
        };
        let weapons = read("weapons.json")?;
        let spells = read("spells.json")?;
        tracing::debug!(dir = %dir.display(), "loading knowledge base");
        Self::from_json(&weapons, &spells)
    }

    pub fn named_dice(&self) -> &[NamedDie] {
        &self.named_dice
    }

    pub fn weapons(&self) -> &[Weapon] {
        &self.weapons
    }

    pub fn spells(&self) -> &[Spell] {
        &self.spells
    }

    pub fn named_die(&self, name: &str) -> Option<&NamedDie> {
        self.named_dice
            .iter()
            .find(|d| d.name.eq_ignore_ascii_case(name))
    }

    pub fn weapon(&self, name: &str) -> Option<&Weapon> {
        self.weapons.iter().find(|w| w.name.eq_ignore_ascii_case(name))
    }

    pub fn spell(&self, name: &str) -> Option<&Spell> {
        self.spells.iter().find(|s| s.name.eq_ignore_ascii_case(name))
    }
}

pub fn default_named_dice() -> Vec<NamedDie> {
    NAMED_DICE
        .iter()
        .map(|&(name, sides)| NamedDie {
            name: name.to_string(),
            sides,
        })
        .collect()
}
