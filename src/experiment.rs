//! Strategy-matrix experiments.
//!
//! For comparing operator pairings, every selection × mutation combination
//! is run `rounds` times on the same graph and the generation counts are
//! averaged into one [`ExperimentRecord`] per pair. Runs share no state —
//! each gets its own RNG and population — which makes the matrix
//! embarrassingly parallel; with the `parallel` cargo feature the pairs fan
//! out across a rayon pool.

use crate::ga::{EvolutionConfig, EvolutionRunner, Mutation, Selection};
use crate::graph::StateGraph;
use crate::oracle::MutationOracle;
#[cfg(feature = "parallel")]
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::info;

/// Outcome of one selection × mutation pairing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExperimentRecord {
    pub graph_id: String,
    pub selection_strategy: String,
    pub mutation_strategy: String,
    /// Mean 1-based generation count to full coverage; runs that exhaust
    /// the budget contribute the budget value.
    pub average_generations_to_full_coverage: f64,
}

/// Runs the full strategy matrix on one graph.
///
/// Each pairing executes `rounds` independent runs of `base` (with the
/// pair's strategies substituted) and averages the generation counts. When
/// `base` carries a seed, every run derives a distinct seed from it so the
/// whole matrix stays reproducible; otherwise runs seed from the OS.
pub fn run_matrix(
    graph: &StateGraph,
    selections: &[Selection],
    mutations: &[Mutation],
    rounds: usize,
    base: &EvolutionConfig,
    oracle: Option<&dyn MutationOracle>,
) -> Vec<ExperimentRecord> {
    let rounds = rounds.max(1);

    let pairs: Vec<(usize, Selection, Mutation)> = selections
        .iter()
        .flat_map(|&sel| mutations.iter().map(move |&mu| (sel, mu)))
        .enumerate()
        .map(|(i, (sel, mu))| (i, sel, mu))
        .collect();

    let run_pair = |&(pair_index, selection, mutation): &(usize, Selection, Mutation)| {
        let mut total_generations = 0usize;
        for round in 0..rounds {
            let mut config = base
                .clone()
                .with_selection(selection)
                .with_mutation(mutation);
            if let Some(seed) = base.seed {
                config.seed = Some(seed + (pair_index * rounds + round) as u64);
            }
            let result = EvolutionRunner::run_with_oracle(graph, &config, oracle);
            total_generations += result.generations;
        }

        let record = ExperimentRecord {
            graph_id: graph.graph_id().to_string(),
            selection_strategy: selection.name().to_string(),
            mutation_strategy: mutation.name().to_string(),
            average_generations_to_full_coverage: total_generations as f64 / rounds as f64,
        };
        info!(
            graph_id = %record.graph_id,
            selection = %record.selection_strategy,
            mutation = %record.mutation_strategy,
            avg_generations = record.average_generations_to_full_coverage,
            "experiment pairing finished"
        );
        record
    };

    #[cfg(feature = "parallel")]
    {
        pairs.par_iter().map(run_pair).collect()
    }
    #[cfg(not(feature = "parallel"))]
    {
        pairs.iter().map(run_pair).collect()
    }
}
