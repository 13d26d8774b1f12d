use std::path::PathBuf;
use thiserror::Error;

// ==========================================
// Roll errors
// ==========================================

/// Everything that can stop a dice spec from producing a result.
///
/// The first three variants are "unfulfillable request" kinds: the input could
/// not produce a result and the message is fit to show to the person asking.
/// [`RollError::Internal`] means the pipeline itself was misused.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RollError {
    /// The text does not match the grammar, or names something unknown.
    #[error("{0}")]
    Recognition(String),
    /// A spell was asked for below its level, or its data has no usable dice.
    #[error("{0}")]
    ImpossibleSpell(String),
    /// A resolved roll had a non-positive count or side count.
    #[error("{0}")]
    ImpossibleDice(String),
    #[error("internal error: {0}")]
    Internal(String),
}

impl RollError {
    pub fn recognition(msg: impl ToString) -> Self {
        Self::Recognition(msg.to_string())
    }

    pub fn impossible_spell(msg: impl ToString) -> Self {
        Self::ImpossibleSpell(msg.to_string())
    }

    pub fn impossible_dice(msg: impl ToString) -> Self {
        Self::ImpossibleDice(msg.to_string())
    }

    pub fn internal(msg: impl ToString) -> Self {
        Self::Internal(msg.to_string())
    }

    /// True when the caller should apologise rather than treat this as a bug.
    pub fn is_unfulfillable(&self) -> bool {
        !matches!(self, Self::Internal(_))
    }
}

// ==========================================
// Knowledge base loading errors
// ==========================================

#[derive(Error, Debug)]
pub enum KnowledgeError {
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed {what} data: {source}")]
    Json {
        what: &'static str,
        #[source]
        source: serde_json::Error,
    },
}
