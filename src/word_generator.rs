use crate::{
    config::Config,
    error::Result,
    language::{
        Difficulty, DifficultyProfile, Language, PunctuationFormatter, RandomSelector,
        TextFormatter, WordCorpus, WordSelector,
    },
};
use rand::RngCore;

/// What to generate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextRequest {
    pub language: Language,
    pub difficulty: Difficulty,
    /// Overrides the profile's word count
    pub word_count: Option<usize>,
}

impl TextRequest {
    pub fn new(language: Language, difficulty: Difficulty) -> Self {
        Self {
            language,
            difficulty,
            word_count: None,
        }
    }

    /// Parse raw query keys, e.g. `("ru", "easy")`
    pub fn from_keys(language: &str, difficulty: &str) -> Result<Self> {
        Ok(Self::new(language.parse()?, difficulty.parse()?))
    }

    pub fn with_word_count(mut self, word_count: usize) -> Self {
        self.word_count = Some(word_count);
        self
    }
}

/// Handles all practice text generation
pub struct TextGenerator<'a> {
    config: &'a Config,
}

impl<'a> TextGenerator<'a> {
    pub fn new(config: &'a Config) -> Self {
        Self { config }
    }

    /// Resolve profile and corpus for the request, then generate
    pub fn generate_text(&self, request: &TextRequest, rng: &mut dyn RngCore) -> Result<String> {
        let profile = self.config.profile(request.difficulty)?;
        let corpus = WordCorpus::open(self.config.corpus_path(request.language)?)?;
        let text = generate(&corpus, profile, request.word_count, rng)?;

        tracing::debug!(
            language = %request.language,
            difficulty = %request.difficulty,
            chars = text.chars().count(),
            "generated practice text"
        );
        Ok(text)
    }
}

/// Sample words from `corpus` within the profile's length bounds and join
/// them with the profile's punctuation policy. A population smaller than
/// the requested count yields all of it.
pub fn generate(
    corpus: &WordCorpus,
    profile: &DifficultyProfile,
    word_count: Option<usize>,
    rng: &mut dyn RngCore,
) -> Result<String> {
    // Step 1: enumerate the filtered population
    let mut population = corpus.population(profile.bounds())?;

    // Step 2: sample without replacement
    let count = word_count.unwrap_or(profile.word_count);
    let words = RandomSelector.select_words(&mut population, count, rng);

    // Step 3: join with spaces or punctuation
    Ok(PunctuationFormatter::new(profile).format(words, rng))
}
