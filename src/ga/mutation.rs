//! Perturbation strategies.
//!
//! Every strategy shares one contract: it receives an individual, the
//! variable specs, and a per-gene (or per-call) mutation rate, and returns a
//! **new** individual. No strategy ever introduces a variable absent from
//! its input, and none mutates the input in place — a parent selected into
//! several offspring slots must stay intact.

use super::types::Individual;
use crate::graph::domain::{VariableSpec, DEFAULT_MAX, DEFAULT_MIN};
use crate::graph::StateGraph;
use crate::guard::{Value, VarType};
use crate::oracle::{format_constraints, parse_assignment, MutationOracle};
use rand::Rng;
use rand_distr::StandardNormal;
use tracing::{debug, warn};

/// Shared context for mutation: the graph (for constraint formatting) and
/// the optional model collaborator.
pub struct MutationContext<'a> {
    pub graph: &'a StateGraph,
    pub oracle: Option<&'a dyn MutationOracle>,
}

/// Mutation strategy.
///
/// # Examples
///
/// ```
/// use evoguard::ga::Mutation;
///
/// // Gaussian noise with the conventional σ
/// let m = Mutation::Gaussian(0.1);
///
/// // Delegate proposals to the model collaborator
/// let m = Mutation::ModelGuided;
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Mutation {
    /// Per gene with probability `rate`: negate booleans, flip the sign of
    /// numeric values.
    BitFlip,

    /// Per gene with probability `rate`: resample uniformly from the fixed
    /// default range for the declared type.
    Uniform,

    /// Per gene with probability `rate`: add Gaussian noise with the given
    /// σ. Integers take the noise scaled ×100 and truncated; booleans are
    /// left untouched. σ = 0.1 is the conventional default.
    Gaussian(f64),

    /// With probability `rate` (once per call): exchange the values of two
    /// distinct variables of the same declared type, chosen uniformly among
    /// all such pairs. Identity when no same-typed pair exists.
    Swap,

    /// With probability `rate` (once per call): ask the model collaborator
    /// for an assignment proposal and overlay it onto the individual.
    /// Identity on any collaborator or parse failure, or when no
    /// collaborator is configured.
    ModelGuided,
}

impl Default for Mutation {
    fn default() -> Self {
        Mutation::BitFlip
    }
}

impl Mutation {
    /// All five strategies with their conventional parameters.
    pub const ALL: [Mutation; 5] = [
        Mutation::BitFlip,
        Mutation::Uniform,
        Mutation::Gaussian(0.1),
        Mutation::Swap,
        Mutation::ModelGuided,
    ];

    /// Stable label for experiment records.
    pub fn name(&self) -> &'static str {
        match self {
            Mutation::BitFlip => "bit_flip",
            Mutation::Uniform => "uniform",
            Mutation::Gaussian(_) => "gaussian",
            Mutation::Swap => "swap",
            Mutation::ModelGuided => "model",
        }
    }

    /// Applies the strategy, returning a new individual.
    pub fn apply<R: Rng>(
        &self,
        individual: &Individual,
        specs: &[VariableSpec],
        rate: f64,
        ctx: &MutationContext<'_>,
        rng: &mut R,
    ) -> Individual {
        match self {
            Mutation::BitFlip => bit_flip(individual, specs, rate, rng),
            Mutation::Uniform => uniform(individual, specs, rate, rng),
            Mutation::Gaussian(sigma) => gaussian(individual, specs, rate, *sigma, rng),
            Mutation::Swap => swap(individual, specs, rate, rng),
            Mutation::ModelGuided => model_guided(individual, specs, rate, ctx, rng),
        }
    }
}

fn bit_flip<R: Rng>(
    individual: &Individual,
    specs: &[VariableSpec],
    rate: f64,
    rng: &mut R,
) -> Individual {
    let mut mutated = individual.clone();
    for spec in specs {
        if rng.random_range(0.0..1.0) < rate {
            let Some(value) = mutated.get(&spec.var) else {
                continue;
            };
            let flipped = match value {
                Value::Bool(b) => Value::Bool(!b),
                Value::Int(i) => Value::Int(-i),
                Value::Float(f) => Value::Float(-f),
            };
            mutated.set(spec.var.clone(), flipped);
        }
    }
    mutated
}

fn uniform<R: Rng>(
    individual: &Individual,
    specs: &[VariableSpec],
    rate: f64,
    rng: &mut R,
) -> Individual {
    let mut mutated = individual.clone();
    for spec in specs {
        if rng.random_range(0.0..1.0) < rate {
            if mutated.get(&spec.var).is_none() {
                continue;
            }
            let resampled = match spec.ty {
                VarType::Bool => Value::Bool(rng.random_bool(0.5)),
                VarType::Int => {
                    Value::Int(rng.random_range(DEFAULT_MIN as i64..=DEFAULT_MAX as i64))
                }
                VarType::Float => Value::Float(rng.random_range(DEFAULT_MIN..=DEFAULT_MAX)),
            };
            mutated.set(spec.var.clone(), resampled);
        }
    }
    mutated
}

fn gaussian<R: Rng>(
    individual: &Individual,
    specs: &[VariableSpec],
    rate: f64,
    sigma: f64,
    rng: &mut R,
) -> Individual {
    let mut mutated = individual.clone();
    for spec in specs {
        if rng.random_range(0.0..1.0) < rate {
            let Some(value) = mutated.get(&spec.var) else {
                continue;
            };
            let noise: f64 = rng.sample::<f64, _>(StandardNormal) * sigma;
            let perturbed = match value {
                // Booleans carry no magnitude to perturb.
                Value::Bool(_) => continue,
                Value::Int(i) => Value::Int(i + (noise * 100.0) as i64),
                Value::Float(f) => Value::Float(f + noise),
            };
            mutated.set(spec.var.clone(), perturbed);
        }
    }
    mutated
}

fn swap<R: Rng>(
    individual: &Individual,
    specs: &[VariableSpec],
    rate: f64,
    rng: &mut R,
) -> Individual {
    let mut mutated = individual.clone();
    if rng.random_range(0.0..1.0) >= rate {
        return mutated;
    }

    let pairs: Vec<(usize, usize)> = (0..specs.len())
        .flat_map(|i| ((i + 1)..specs.len()).map(move |j| (i, j)))
        .filter(|&(i, j)| specs[i].ty == specs[j].ty)
        .collect();
    if pairs.is_empty() {
        return mutated;
    }

    let (i, j) = pairs[rng.random_range(0..pairs.len())];
    let (Some(a), Some(b)) = (mutated.get(&specs[i].var), mutated.get(&specs[j].var)) else {
        return mutated;
    };
    mutated.set(specs[i].var.clone(), b);
    mutated.set(specs[j].var.clone(), a);
    mutated
}

fn model_guided<R: Rng>(
    individual: &Individual,
    specs: &[VariableSpec],
    rate: f64,
    ctx: &MutationContext<'_>,
    rng: &mut R,
) -> Individual {
    let mut mutated = individual.clone();
    if rng.random_range(0.0..1.0) >= rate {
        return mutated;
    }
    let Some(oracle) = ctx.oracle else {
        debug!("no mutation oracle configured; keeping individual unchanged");
        return mutated;
    };

    let constraints = format_constraints(ctx.graph);
    match oracle.propose(&constraints) {
        Ok(response) => match parse_assignment(&response, specs) {
            Some(proposal) => {
                for (var, value) in proposal {
                    // Overlay only genes the individual already carries.
                    if mutated.get(&var).is_some() {
                        mutated.set(var, value);
                    }
                }
                mutated
            }
            None => {
                warn!("mutation oracle response was not parseable; keeping individual");
                mutated
            }
        },
        Err(err) => {
            warn!(%err, "mutation oracle unavailable; keeping individual");
            mutated
        }
    }
}
