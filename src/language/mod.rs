pub mod core;
pub mod difficulty;
pub mod formatter;
pub mod selector;

use crate::error::TypetestError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

// Re-export the main types for convenience
pub use self::core::{WordCorpus, Words};
pub use difficulty::{DifficultyProfile, LengthBounds, NEVER_PUNCTUATE};
pub use formatter::{PunctuationFormatter, TextFormatter};
pub use selector::{RandomSelector, WordSelector};

/// Languages with a bundled word list
#[derive(
    Debug,
    Copy,
    Clone,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    strum_macros::Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Language {
    Ru,
    En,
}

impl Language {
    pub const ALL: [Language; 2] = [Language::Ru, Language::En];
}

impl FromStr for Language {
    type Err = TypetestError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "ru" => Ok(Language::Ru),
            "en" => Ok(Language::En),
            other => Err(TypetestError::InvalidLanguage(other.to_string())),
        }
    }
}

/// Difficulty tiers, each backed by a [`DifficultyProfile`]
#[derive(
    Debug,
    Copy,
    Clone,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    strum_macros::Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
    Test,
}

impl Difficulty {
    pub const ALL: [Difficulty; 4] = [
        Difficulty::Easy,
        Difficulty::Medium,
        Difficulty::Hard,
        Difficulty::Test,
    ];

    /// Tiers a finished typing test may be recorded under.
    /// `test` only exists for generating calibration text.
    pub fn is_recordable(&self) -> bool {
        !matches!(self, Difficulty::Test)
    }
}

impl FromStr for Difficulty {
    type Err = TypetestError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "easy" => Ok(Difficulty::Easy),
            "medium" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            "test" => Ok(Difficulty::Test),
            other => Err(TypetestError::InvalidDifficulty(other.to_string())),
        }
    }
}
