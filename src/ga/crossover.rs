//! Uniform crossover over scoped guard variables.

use super::types::Individual;
use crate::graph::domain::VariableSpec;
use rand::Rng;

/// Recombines two parents into two children.
///
/// With probability `1 - rate` the parents are returned as unmodified
/// copies. Otherwise each variable independently swaps between the two
/// children with probability 0.5. A variable unexpectedly absent from either
/// parent is skipped for that gene — localized and non-fatal, matching the
/// crate-wide per-gene error policy.
pub fn crossover<R: Rng>(
    parent1: &Individual,
    parent2: &Individual,
    specs: &[VariableSpec],
    rate: f64,
    rng: &mut R,
) -> (Individual, Individual) {
    let mut child1 = parent1.clone();
    let mut child2 = parent2.clone();

    if rng.random_range(0.0..1.0) > rate {
        return (child1, child2);
    }

    for spec in specs {
        if rng.random_range(0.0..1.0) < 0.5 {
            let (Some(a), Some(b)) = (child1.get(&spec.var), child2.get(&spec.var)) else {
                continue;
            };
            child1.set(spec.var.clone(), b);
            child2.set(spec.var.clone(), a);
        }
    }

    (child1, child2)
}
