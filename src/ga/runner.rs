//! The generational evolution loop.
//!
//! [`EvolutionRunner`] orchestrates the full process:
//! initialization → evaluation → selection → crossover → mutation → repeat,
//! until every transition guard is covered or the generation budget runs out.

use super::config::EvolutionConfig;
use super::crossover::crossover;
use super::mutation::MutationContext;
use super::types::{Individual, Population};
use crate::graph::{coverage, domain, StateGraph};
use crate::oracle::MutationOracle;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, info};

/// Result of one evolutionary run.
#[derive(Debug, Clone)]
pub struct EvolutionResult {
    /// The best individual observed across all generations.
    pub best: Individual,

    /// Its fitness: covered transitions plus one.
    pub best_fitness: usize,

    /// 1-based index of the generation that reached full coverage, or the
    /// generation budget when coverage was not reached.
    pub generations: usize,

    /// Whether every transition guard was exercised.
    pub full_coverage: bool,

    /// Best-ever fitness after each evaluated generation; monotonically
    /// non-decreasing.
    pub fitness_history: Vec<usize>,
}

/// Executes the evolutionary loop.
///
/// # Usage
///
/// ```no_run
/// use evoguard::ga::{EvolutionConfig, EvolutionRunner};
/// use evoguard::graph::StateGraph;
///
/// let graph = StateGraph::from_json("...").unwrap();
/// let config = EvolutionConfig::reference().with_seed(42);
/// let result = EvolutionRunner::run(&graph, &config);
/// println!("coverage {} in {} generations", result.best_fitness, result.generations);
/// ```
pub struct EvolutionRunner;

impl EvolutionRunner {
    /// Runs the loop without a mutation oracle; the model-guided strategy
    /// degrades to identity.
    ///
    /// # Panics
    /// Panics if the configuration is invalid (call
    /// [`EvolutionConfig::validate`] first to get a descriptive error).
    pub fn run(graph: &StateGraph, config: &EvolutionConfig) -> EvolutionResult {
        Self::run_with_oracle(graph, config, None)
    }

    /// Runs the loop with an optional model collaborator for the
    /// model-guided mutation strategy.
    pub fn run_with_oracle(
        graph: &StateGraph,
        config: &EvolutionConfig,
        oracle: Option<&dyn MutationOracle>,
    ) -> EvolutionResult {
        config.validate().expect("invalid EvolutionConfig");

        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };

        let specs = domain::extract(graph);
        let target = graph.transition_count() + 1;
        let ctx = MutationContext { graph, oracle };

        // Initial population from the domain-free sampler: the search starts
        // over the full default range, not inside the known-satisfying region.
        let mut population: Population = (0..config.population_size)
            .map(|_| Individual::random_unbounded(&specs, &mut rng))
            .collect();

        let mut best = population[0].clone();
        let mut best_fitness = 0usize;
        let mut fitness_history = Vec::with_capacity(config.max_generations);

        for gen in 0..config.max_generations {
            let fitnesses: Vec<usize> = population
                .iter()
                .map(|ind| coverage::fitness(graph, ind.genes()))
                .collect();

            // Best-ever replacement is strict: ties never evict the
            // incumbent.
            let mut gen_best = 0;
            for (i, &f) in fitnesses.iter().enumerate() {
                if f > fitnesses[gen_best] {
                    gen_best = i;
                }
            }
            if fitnesses[gen_best] > best_fitness {
                best = population[gen_best].clone();
                best_fitness = fitnesses[gen_best];
            }
            fitness_history.push(best_fitness);

            debug!(
                generation = gen + 1,
                current_best = fitnesses[gen_best],
                best_ever = best_fitness,
                "generation evaluated"
            );

            if best_fitness == target {
                info!(generations = gen + 1, "full transition coverage reached");
                return EvolutionResult {
                    best,
                    best_fitness,
                    generations: gen + 1,
                    full_coverage: true,
                    fitness_history,
                };
            }

            let parents = config.selection.apply(&population, &fitnesses, &mut rng);

            let mut next: Population = Vec::with_capacity(config.population_size);
            for i in (0..parents.len()).step_by(2) {
                let p1 = &parents[i];
                // Odd parent counts wrap the last pairing back to the first
                // parent.
                let p2 = if i + 1 < parents.len() {
                    &parents[i + 1]
                } else {
                    &parents[0]
                };
                let (c1, c2) = crossover(p1, p2, &specs, config.crossover_rate, &mut rng);
                next.push(
                    config
                        .mutation
                        .apply(&c1, &specs, config.mutation_rate, &ctx, &mut rng),
                );
                if next.len() < config.population_size {
                    next.push(config.mutation.apply(
                        &c2,
                        &specs,
                        config.mutation_rate,
                        &ctx,
                        &mut rng,
                    ));
                }
            }
            next.truncate(config.population_size);

            // Elitist reinsertion: the best individual so far survives every
            // generation in slot 0.
            next[0] = best.clone();
            population = next;
        }

        info!(
            budget = config.max_generations,
            best_fitness, "generation budget exhausted"
        );
        EvolutionResult {
            best,
            best_fitness,
            generations: config.max_generations,
            full_coverage: false,
            fitness_history,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ga::{Mutation, Selection};
    use crate::graph::testkit::{power_graph, POWER_GRAPH_JSON};
    use crate::graph::GraphDoc;

    #[test]
    fn test_reference_run_reaches_full_coverage() {
        // Population 3, 50 generations, crossover 0.8, mutation 0.1,
        // tournament selection, bit-flip mutation: the 4-transition power
        // graph converges to fitness 5 well inside the budget.
        let graph = power_graph();
        let config = EvolutionConfig::reference().with_seed(42);

        let result = EvolutionRunner::run(&graph, &config);

        assert!(result.full_coverage, "expected full coverage within budget");
        assert_eq!(result.best_fitness, 5);
        assert!(result.generations <= 50);
        assert_eq!(
            coverage::fitness(&graph, result.best.genes()),
            result.best_fitness
        );
    }

    #[test]
    fn test_fitness_bounds() {
        let graph = power_graph();
        let config = EvolutionConfig::reference().with_max_generations(5).with_seed(3);
        let result = EvolutionRunner::run(&graph, &config);
        assert!(result.best_fitness >= 1);
        assert!(result.best_fitness <= graph.transition_count() + 1);
    }

    fn graph_with_unsatisfiable_transition() -> StateGraph {
        // Extend the power graph with a transition whose guard is
        // contradictory, so full coverage is impossible and runs always
        // exhaust their budget.
        let mut doc: GraphDoc = serde_json::from_str(POWER_GRAPH_JSON).unwrap();
        let mut dead = doc.transitions[0].clone();
        dead.id = "T9".to_string();
        dead.from = "S3".to_string();
        dead.to = "S1".to_string();
        dead.guard = "x > 500 && x < 100".to_string();
        dead.guard_type = [("x".to_string(), "int".to_string())].into();
        doc.transitions.push(dead);
        StateGraph::from_doc(doc).unwrap()
    }

    #[test]
    fn test_best_ever_fitness_is_monotone() {
        let graph = graph_with_unsatisfiable_transition();
        let config = EvolutionConfig::default()
            .with_population_size(4)
            .with_max_generations(100)
            .with_selection(Selection::RouletteWheel)
            .with_mutation(Mutation::Gaussian(0.1))
            .with_seed(42);

        let result = EvolutionRunner::run(&graph, &config);

        assert_eq!(result.fitness_history.len(), 100);
        for window in result.fitness_history.windows(2) {
            assert!(
                window[1] >= window[0],
                "best-ever fitness decreased: {} -> {}",
                window[0],
                window[1]
            );
        }
    }

    #[test]
    fn test_budget_exhaustion_reports_budget() {
        let graph = graph_with_unsatisfiable_transition();
        let config = EvolutionConfig::reference().with_max_generations(10).with_seed(1);
        let result = EvolutionRunner::run(&graph, &config);

        assert!(!result.full_coverage);
        assert_eq!(result.generations, 10);
        // The dead transition caps coverage at 4 of 5.
        assert!(result.best_fitness <= 5);
    }

    #[test]
    fn test_all_strategy_pairs_run() {
        let graph = power_graph();
        for selection in Selection::ALL {
            for mutation in Mutation::ALL {
                let config = EvolutionConfig::reference()
                    .with_max_generations(10)
                    .with_selection(selection)
                    .with_mutation(mutation)
                    .with_seed(42);
                let result = EvolutionRunner::run(&graph, &config);
                assert!(
                    (1..=10).contains(&result.generations),
                    "{}/{} returned bad generation count {}",
                    selection.name(),
                    mutation.name(),
                    result.generations
                );
                assert!(result.best_fitness >= 1);
            }
        }
    }

    #[test]
    fn test_seeded_runs_are_reproducible() {
        let graph = power_graph();
        let config = EvolutionConfig::reference().with_seed(1234);
        let a = EvolutionRunner::run(&graph, &config);
        let b = EvolutionRunner::run(&graph, &config);
        assert_eq!(a.generations, b.generations);
        assert_eq!(a.best_fitness, b.best_fitness);
        assert_eq!(a.fitness_history, b.fitness_history);
        assert_eq!(a.best, b.best);
    }

    #[test]
    fn test_population_size_one() {
        // Degenerate but legal: the elitism slot is the whole population.
        let graph = power_graph();
        let config = EvolutionConfig::reference()
            .with_population_size(1)
            .with_max_generations(20)
            .with_seed(42);
        let result = EvolutionRunner::run(&graph, &config);
        assert!(result.best_fitness >= 1);
    }

    #[test]
    #[should_panic(expected = "invalid EvolutionConfig")]
    fn test_invalid_config_panics() {
        let graph = power_graph();
        let config = EvolutionConfig::default().with_population_size(0);
        EvolutionRunner::run(&graph, &config);
    }
}
