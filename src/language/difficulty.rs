use super::Difficulty;
use serde::{Deserialize, Serialize};

/// Punctuation threshold that no uniform draw in `[0, 1)` can fall below.
/// Profiles using it emit plain spaces only.
pub const NEVER_PUNCTUATE: f64 = -1.0;

/// Inclusive word length bounds, measured in characters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LengthBounds {
    pub min: Option<usize>,
    pub max: Option<usize>,
}

impl LengthBounds {
    pub fn new(min: Option<usize>, max: Option<usize>) -> Self {
        Self { min, max }
    }

    pub fn admits(&self, word: &str) -> bool {
        let len = word.chars().count();
        if self.min.is_some_and(|min| len < min) {
            return false;
        }
        if self.max.is_some_and(|max| len > max) {
            return false;
        }
        true
    }
}

/// Generation parameters for one difficulty tier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DifficultyProfile {
    pub word_count: usize,
    pub min_word_length: Option<usize>,
    pub max_word_length: Option<usize>,
    pub punctuation_probability: f64,
    pub punctuation_marks: Vec<String>,
}

impl DifficultyProfile {
    pub fn bounds(&self) -> LengthBounds {
        LengthBounds::new(self.min_word_length, self.max_word_length)
    }

    /// Whether a uniform draw selects a punctuation mark instead of a space
    pub fn punctuates(&self, draw: f64) -> bool {
        draw < self.punctuation_probability
    }

    /// Built-in profile for a tier
    pub fn builtin(difficulty: Difficulty) -> Self {
        let marks = |list: &[&str]| list.iter().map(|m| m.to_string()).collect();
        match difficulty {
            Difficulty::Easy => Self {
                word_count: 30,
                min_word_length: None,
                max_word_length: Some(6),
                punctuation_probability: NEVER_PUNCTUATE,
                punctuation_marks: marks(&[" "]),
            },
            Difficulty::Medium => Self {
                word_count: 35,
                min_word_length: Some(3),
                max_word_length: Some(10),
                punctuation_probability: 0.15,
                punctuation_marks: marks(&[" ", ". ", ", ", "! "]),
            },
            Difficulty::Hard => Self {
                word_count: 40,
                min_word_length: Some(5),
                max_word_length: None,
                punctuation_probability: 0.3,
                punctuation_marks: marks(&[" ", "! ", " — ", ". ", ", ", "; ", ": ", "? "]),
            },
            Difficulty::Test => Self {
                word_count: 50,
                min_word_length: None,
                max_word_length: Some(5),
                punctuation_probability: 0.2,
                punctuation_marks: marks(&["! ", " - ", ". ", ", ", "; ", ": ", "? "]),
            },
        }
    }
}
