use super::difficulty::DifficultyProfile;
use rand::seq::SliceRandom;
use rand::{Rng, RngCore};

/// Trait for text formatting strategies
pub trait TextFormatter {
    /// Format a list of words into a final string
    fn format(&self, words: Vec<String>, rng: &mut dyn RngCore) -> String;
}

/// Joins words with a plain space or, with the profile's probability,
/// one of its punctuation marks. Nothing is added before the first word
/// or after the last.
pub struct PunctuationFormatter<'a> {
    profile: &'a DifficultyProfile,
}

impl<'a> PunctuationFormatter<'a> {
    pub fn new(profile: &'a DifficultyProfile) -> Self {
        Self { profile }
    }

    fn separator<'m>(&'m self, rng: &mut dyn RngCore) -> &'m str {
        let draw: f64 = rng.gen();
        if self.profile.punctuates(draw) {
            if let Some(mark) = self.profile.punctuation_marks.choose(rng) {
                return mark;
            }
        }
        " "
    }
}

impl TextFormatter for PunctuationFormatter<'_> {
    fn format(&self, words: Vec<String>, rng: &mut dyn RngCore) -> String {
        let mut words = words.into_iter();
        let mut text = match words.next() {
            Some(first) => first,
            None => return String::new(),
        };

        for word in words {
            text.push_str(self.separator(rng));
            text.push_str(&word);
        }
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::language::Difficulty;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn words(list: &[&str]) -> Vec<String> {
        list.iter().map(|w| w.to_string()).collect()
    }

    #[test]
    fn test_empty_and_single_word() {
        let profile = DifficultyProfile::builtin(Difficulty::Hard);
        let formatter = PunctuationFormatter::new(&profile);
        let mut rng = StdRng::seed_from_u64(3);

        assert_eq!(formatter.format(Vec::new(), &mut rng), "");
        assert_eq!(formatter.format(words(&["alone"]), &mut rng), "alone");
    }

    #[test]
    fn test_easy_is_space_separated_for_any_seed() {
        let profile = DifficultyProfile::builtin(Difficulty::Easy);
        let formatter = PunctuationFormatter::new(&profile);
        let input = words(&["one", "two", "three", "four", "five", "six"]);

        for seed in 0..500 {
            let mut rng = StdRng::seed_from_u64(seed);
            assert_eq!(
                formatter.format(input.clone(), &mut rng),
                "one two three four five six"
            );
        }
    }

    #[test]
    fn test_certain_punctuation_uses_only_profile_marks() {
        let profile = DifficultyProfile {
            word_count: 3,
            min_word_length: None,
            max_word_length: None,
            punctuation_probability: 1.0,
            punctuation_marks: words(&["; "]),
        };
        let formatter = PunctuationFormatter::new(&profile);
        let mut rng = StdRng::seed_from_u64(11);

        assert_eq!(formatter.format(words(&["a", "b", "c"]), &mut rng), "a; b; c");
    }

    #[test]
    fn test_no_separator_at_edges() {
        let profile = DifficultyProfile::builtin(Difficulty::Test);
        let formatter = PunctuationFormatter::new(&profile);

        for seed in 0..100 {
            let mut rng = StdRng::seed_from_u64(seed);
            let text = formatter.format(words(&["first", "middle", "last"]), &mut rng);
            assert!(text.starts_with("first"), "{text}");
            assert!(text.ends_with("last"), "{text}");
        }
    }

    #[test]
    fn test_hard_profile_eventually_punctuates() {
        let profile = DifficultyProfile::builtin(Difficulty::Hard);
        let formatter = PunctuationFormatter::new(&profile);
        let input: Vec<String> = (0..40).map(|i| format!("word{i}")).collect();
        let mut rng = StdRng::seed_from_u64(5);

        let text = formatter.format(input, &mut rng);
        assert!(text.chars().any(|c| matches!(c, '!' | '—' | '.' | ',' | ';' | ':' | '?')));
    }
}
