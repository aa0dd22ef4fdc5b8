//! Evolution configuration.
//!
//! [`EvolutionConfig`] holds all parameters that control the evolutionary
//! loop.

use super::mutation::Mutation;
use super::selection::Selection;

/// Configuration for one evolutionary test-generation run.
///
/// # Defaults
///
/// ```
/// use evoguard::ga::EvolutionConfig;
///
/// let config = EvolutionConfig::default();
/// assert_eq!(config.population_size, 20);
/// assert_eq!(config.max_generations, 100);
/// ```
///
/// # Builder Pattern
///
/// ```
/// use evoguard::ga::{EvolutionConfig, Mutation, Selection};
///
/// let config = EvolutionConfig::default()
///     .with_population_size(50)
///     .with_selection(Selection::Rank)
///     .with_mutation(Mutation::Gaussian(0.1))
///     .with_seed(42);
/// ```
#[derive(Debug, Clone)]
pub struct EvolutionConfig {
    /// Number of individuals per generation. Constant across the run.
    pub population_size: usize,

    /// Generation budget: the run terminates after this many generations
    /// even without full coverage.
    pub max_generations: usize,

    /// Probability of recombining a parent pair (0.0–1.0). When crossover
    /// does not fire, the pair is copied verbatim.
    pub crossover_rate: f64,

    /// Per-gene (or per-call, depending on the strategy) mutation
    /// probability (0.0–1.0).
    pub mutation_rate: f64,

    /// Parent-selection strategy.
    pub selection: Selection,

    /// Perturbation strategy.
    pub mutation: Mutation,

    /// Random seed for reproducibility. `None` seeds from the OS.
    pub seed: Option<u64>,
}

impl Default for EvolutionConfig {
    fn default() -> Self {
        Self {
            population_size: 20,
            max_generations: 100,
            crossover_rate: 0.8,
            mutation_rate: 0.1,
            selection: Selection::default(),
            mutation: Mutation::default(),
            seed: None,
        }
    }
}

impl EvolutionConfig {
    /// Sets the population size.
    pub fn with_population_size(mut self, n: usize) -> Self {
        self.population_size = n;
        self
    }

    /// Sets the generation budget.
    pub fn with_max_generations(mut self, n: usize) -> Self {
        self.max_generations = n;
        self
    }

    /// Sets the crossover rate (clamped to 0.0–1.0).
    pub fn with_crossover_rate(mut self, rate: f64) -> Self {
        self.crossover_rate = rate.clamp(0.0, 1.0);
        self
    }

    /// Sets the mutation rate (clamped to 0.0–1.0).
    pub fn with_mutation_rate(mut self, rate: f64) -> Self {
        self.mutation_rate = rate.clamp(0.0, 1.0);
        self
    }

    /// Sets the selection strategy.
    pub fn with_selection(mut self, selection: Selection) -> Self {
        self.selection = selection;
        self
    }

    /// Sets the mutation strategy.
    pub fn with_mutation(mut self, mutation: Mutation) -> Self {
        self.mutation = mutation;
        self
    }

    /// Sets the random seed for reproducibility.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// The reference experiment parameters: population 3, 50 generations,
    /// crossover 0.8, mutation 0.1, binary tournament, bit-flip mutation.
    ///
    /// Small on purpose — guard satisfaction is a cheap fitness signal and
    /// the sample graphs are tiny, so a minimal population with strong
    /// elitism converges in a handful of generations.
    pub fn reference() -> Self {
        Self {
            population_size: 3,
            max_generations: 50,
            crossover_rate: 0.8,
            mutation_rate: 0.1,
            selection: Selection::Tournament(2),
            mutation: Mutation::BitFlip,
            seed: None,
        }
    }

    /// Validates the configuration.
    ///
    /// Returns `Err` with a description if any parameter is invalid.
    pub fn validate(&self) -> Result<(), String> {
        if self.population_size == 0 {
            return Err("population_size must be at least 1".into());
        }
        if self.max_generations == 0 {
            return Err("max_generations must be at least 1".into());
        }
        if !(0.0..=1.0).contains(&self.crossover_rate) {
            return Err("crossover_rate must be within 0.0..=1.0".into());
        }
        if !(0.0..=1.0).contains(&self.mutation_rate) {
            return Err("mutation_rate must be within 0.0..=1.0".into());
        }
        if let Mutation::Gaussian(sigma) = self.mutation {
            if !sigma.is_finite() || sigma < 0.0 {
                return Err("gaussian sigma must be finite and non-negative".into());
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = EvolutionConfig::default();
        assert_eq!(config.population_size, 20);
        assert_eq!(config.max_generations, 100);
        assert!((config.crossover_rate - 0.8).abs() < 1e-10);
        assert!((config.mutation_rate - 0.1).abs() < 1e-10);
        assert_eq!(config.selection, Selection::Tournament(2));
        assert_eq!(config.mutation, Mutation::BitFlip);
        assert!(config.seed.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder_pattern() {
        let config = EvolutionConfig::default()
            .with_population_size(50)
            .with_max_generations(200)
            .with_crossover_rate(0.6)
            .with_mutation_rate(0.05)
            .with_selection(Selection::Rank)
            .with_mutation(Mutation::Swap)
            .with_seed(42);

        assert_eq!(config.population_size, 50);
        assert_eq!(config.max_generations, 200);
        assert!((config.crossover_rate - 0.6).abs() < 1e-10);
        assert!((config.mutation_rate - 0.05).abs() < 1e-10);
        assert_eq!(config.selection, Selection::Rank);
        assert_eq!(config.mutation, Mutation::Swap);
        assert_eq!(config.seed, Some(42));
    }

    #[test]
    fn test_reference_preset() {
        let config = EvolutionConfig::reference();
        assert_eq!(config.population_size, 3);
        assert_eq!(config.max_generations, 50);
        assert!((config.crossover_rate - 0.8).abs() < 1e-10);
        assert!((config.mutation_rate - 0.1).abs() < 1e-10);
        assert_eq!(config.selection, Selection::Tournament(2));
        assert_eq!(config.mutation, Mutation::BitFlip);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_preset_chainable() {
        let config = EvolutionConfig::reference()
            .with_mutation(Mutation::Gaussian(0.1))
            .with_seed(7);
        assert_eq!(config.population_size, 3);
        assert_eq!(config.mutation, Mutation::Gaussian(0.1));
        assert_eq!(config.seed, Some(7));
    }

    #[test]
    fn test_clamp_rates() {
        let config = EvolutionConfig::default()
            .with_crossover_rate(1.5)
            .with_mutation_rate(-0.5);
        assert!((config.crossover_rate - 1.0).abs() < 1e-10);
        assert!((config.mutation_rate - 0.0).abs() < 1e-10);
    }

    #[test]
    fn test_validate_zero_population() {
        let config = EvolutionConfig::default().with_population_size(0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_zero_generations() {
        let config = EvolutionConfig::default().with_max_generations(0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_bad_sigma() {
        let config = EvolutionConfig::default().with_mutation(Mutation::Gaussian(-1.0));
        assert!(config.validate().is_err());
        let config = EvolutionConfig::default().with_mutation(Mutation::Gaussian(f64::NAN));
        assert!(config.validate().is_err());
    }
}
