//! Parent-selection strategies.
//!
//! Selection turns the current population and its fitness values into a new
//! population of parents. Different strategies trade selection pressure
//! against diversity; all of them preserve population size and return
//! independent copies, never aliases into the input.
//!
//! # References
//!
//! - Blickle & Thiele (1996), "A Comparison of Selection Schemes used in
//!   Evolutionary Algorithms"
//! - Baker (1987), "Reducing Bias and Inefficiency in the Selection
//!   Algorithm" (stochastic universal sampling)

use rand::Rng;

/// Parent-selection strategy.
///
/// All strategies assume **maximization**: fitness here is coverage
/// cardinality plus one, so every value is at least 1 and "bigger is better".
///
/// # Examples
///
/// ```
/// use evoguard::ga::Selection;
///
/// // Binary tournament (light pressure, the default)
/// let sel = Selection::Tournament(2);
///
/// // Keep the best individual verbatim, fill the rest at random
/// let sel = Selection::Elitism(1);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Selection {
    /// Fitness-proportionate (roulette wheel) selection.
    ///
    /// Each slot is filled by one spin: probability of an individual is its
    /// fitness share of the total. Susceptible to super-individual dominance
    /// when fitness variance is high.
    ///
    /// # Complexity
    /// O(n) per slot (cumulative scan)
    RouletteWheel,

    /// Tournament selection: sample `k` individuals with replacement, keep
    /// the fittest.
    ///
    /// Higher `k` = stronger selection pressure.
    /// - k=2: light pressure (the default here)
    /// - k=3-5: moderate pressure
    ///
    /// # Complexity
    /// O(k) per slot
    Tournament(usize),

    /// Stochastic universal sampling (SUS).
    ///
    /// One random offset, `n` equally spaced pointers, a single pass over
    /// the cumulative-fitness curve — a lower-variance alternative to
    /// spinning the roulette wheel `n` times.
    ///
    /// # Complexity
    /// O(n) per generation
    StochasticUniversalSampling,

    /// Elitist selection: the top `elite_size` individuals are kept
    /// verbatim, the remaining slots are filled uniformly at random (with
    /// replacement) from the whole population.
    Elitism(usize),

    /// Rank-based selection.
    ///
    /// Individuals are sorted ascending by fitness and assigned ranks
    /// `1..=n` (1 = worst); selection probability is proportional to rank,
    /// not raw fitness. Dampens the influence of fitness outliers.
    ///
    /// # Complexity
    /// O(n log n) per generation (sort), O(n) per slot
    Rank,

    /// Truncation selection with threshold `θ`.
    ///
    /// Only the top `max(1, ceil(n·θ))` individuals are eligible; slots are
    /// filled uniformly (with replacement) from that pool. θ=0.3 is the
    /// conventional default.
    Truncation(f64),
}

impl Default for Selection {
    fn default() -> Self {
        Selection::Tournament(2)
    }
}

impl Selection {
    /// All six strategies with their conventional parameters.
    pub const ALL: [Selection; 6] = [
        Selection::RouletteWheel,
        Selection::Tournament(2),
        Selection::StochasticUniversalSampling,
        Selection::Elitism(1),
        Selection::Rank,
        Selection::Truncation(0.3),
    ];

    /// Stable label for experiment records.
    pub fn name(&self) -> &'static str {
        match self {
            Selection::RouletteWheel => "roulette_wheel",
            Selection::Tournament(_) => "tournament",
            Selection::StochasticUniversalSampling => "stochastic_universal_sampling",
            Selection::Elitism(_) => "elitism",
            Selection::Rank => "rank",
            Selection::Truncation(_) => "truncation",
        }
    }

    /// Selects a full new population of parents.
    ///
    /// Returns exactly `population.len()` independent copies.
    ///
    /// # Panics
    /// Panics if `population` is empty or the lengths disagree.
    pub fn apply<T: Clone, R: Rng>(
        &self,
        population: &[T],
        fitnesses: &[usize],
        rng: &mut R,
    ) -> Vec<T> {
        assert!(
            !population.is_empty(),
            "cannot select from empty population"
        );
        assert_eq!(
            population.len(),
            fitnesses.len(),
            "population and fitness lengths must match"
        );

        match self {
            Selection::RouletteWheel => roulette_wheel(population, fitnesses, rng),
            Selection::Tournament(k) => tournament(population, fitnesses, *k, rng),
            Selection::StochasticUniversalSampling => sus(population, fitnesses, rng),
            Selection::Elitism(elite_size) => elitism(population, fitnesses, *elite_size, rng),
            Selection::Rank => rank(population, fitnesses, rng),
            Selection::Truncation(threshold) => truncation(population, fitnesses, *threshold, rng),
        }
    }
}

fn roulette_wheel<T: Clone, R: Rng>(population: &[T], fitnesses: &[usize], rng: &mut R) -> Vec<T> {
    let n = population.len();
    let total: usize = fitnesses.iter().sum();
    if total == 0 {
        // Degenerate all-zero fitness: fall back to uniform sampling.
        return (0..n)
            .map(|_| population[rng.random_range(0..n)].clone())
            .collect();
    }

    let mut selected = Vec::with_capacity(n);
    for _ in 0..n {
        let r: f64 = rng.random_range(0.0..1.0);
        let mut cumulative = 0.0;
        // Floating-point tails select the last individual, so the returned
        // population never comes up short.
        let mut chosen = n - 1;
        for (i, &f) in fitnesses.iter().enumerate() {
            cumulative += f as f64 / total as f64;
            if r <= cumulative {
                chosen = i;
                break;
            }
        }
        selected.push(population[chosen].clone());
    }
    selected
}

fn tournament<T: Clone, R: Rng>(
    population: &[T],
    fitnesses: &[usize],
    k: usize,
    rng: &mut R,
) -> Vec<T> {
    let n = population.len();
    let k = k.max(1);

    (0..n)
        .map(|_| {
            let mut best = rng.random_range(0..n);
            for _ in 1..k {
                let idx = rng.random_range(0..n);
                if fitnesses[idx] > fitnesses[best] {
                    best = idx;
                }
            }
            population[best].clone()
        })
        .collect()
}

fn sus<T: Clone, R: Rng>(population: &[T], fitnesses: &[usize], rng: &mut R) -> Vec<T> {
    let n = population.len();
    let total: usize = fitnesses.iter().sum();
    if total == 0 {
        return (0..n)
            .map(|_| population[rng.random_range(0..n)].clone())
            .collect();
    }

    let spacing = total as f64 / n as f64;
    let start: f64 = rng.random_range(0.0..spacing);

    let mut selected = Vec::with_capacity(n);
    let mut idx = 0;
    let mut cumulative = fitnesses[0] as f64;
    for k in 0..n {
        let pointer = start + k as f64 * spacing;
        while cumulative < pointer && idx + 1 < n {
            idx += 1;
            cumulative += fitnesses[idx] as f64;
        }
        selected.push(population[idx].clone());
    }
    selected
}

fn elitism<T: Clone, R: Rng>(
    population: &[T],
    fitnesses: &[usize],
    elite_size: usize,
    rng: &mut R,
) -> Vec<T> {
    let n = population.len();
    let elite_size = elite_size.min(n);

    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by_key(|&i| std::cmp::Reverse(fitnesses[i]));

    let mut selected: Vec<T> = order[..elite_size]
        .iter()
        .map(|&i| population[i].clone())
        .collect();
    while selected.len() < n {
        selected.push(population[rng.random_range(0..n)].clone());
    }
    selected
}

fn rank<T: Clone, R: Rng>(population: &[T], fitnesses: &[usize], rng: &mut R) -> Vec<T> {
    let n = population.len();

    // Ascending by fitness: order[0] is the worst and holds rank 1.
    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by_key(|&i| fitnesses[i]);

    let total_rank = n * (n + 1) / 2;
    (0..n)
        .map(|_| {
            let r = rng.random_range(0..total_rank);
            let mut cumulative = 0;
            let mut chosen = order[n - 1];
            for (rank0, &idx) in order.iter().enumerate() {
                cumulative += rank0 + 1;
                if r < cumulative {
                    chosen = idx;
                    break;
                }
            }
            population[chosen].clone()
        })
        .collect()
}

fn truncation<T: Clone, R: Rng>(
    population: &[T],
    fitnesses: &[usize],
    threshold: f64,
    rng: &mut R,
) -> Vec<T> {
    let n = population.len();
    let cutoff = ((n as f64 * threshold).ceil() as usize).clamp(1, n);

    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by_key(|&i| std::cmp::Reverse(fitnesses[i]));
    let pool = &order[..cutoff];

    (0..n)
        .map(|_| population[pool[rng.random_range(0..cutoff)]].clone())
        .collect()
}
