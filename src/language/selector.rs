use rand::seq::SliceRandom;
use rand::RngCore;

/// Trait for different word selection strategies
pub trait WordSelector {
    /// Pick up to `count` words from the filtered population
    fn select_words(
        &self,
        population: &mut [String],
        count: usize,
        rng: &mut dyn RngCore,
    ) -> Vec<String>;
}

/// Uniform sampling without replacement.
/// Returns every word when the population is smaller than `count`.
pub struct RandomSelector;

impl WordSelector for RandomSelector {
    fn select_words(
        &self,
        population: &mut [String],
        count: usize,
        rng: &mut dyn RngCore,
    ) -> Vec<String> {
        let amount = count.min(population.len());
        let (chosen, _rest) = population.partial_shuffle(rng, amount);
        chosen.to_vec()
    }
}
