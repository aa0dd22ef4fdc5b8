//! Evolutionary test-generation engine.
//!
//! The engine evolves candidate assignments of guard variables until every
//! transition of a [`StateGraph`](crate::graph::StateGraph) has been
//! exercised. Fitness is the covered-transition count plus one, computed by
//! the [coverage tracer](crate::graph::coverage).
//!
//! # Key Types
//!
//! - [`Individual`] / [`Population`]: candidate assignments and collections
//!   thereof; strictly value-semantic.
//! - [`Selection`]: six interchangeable parent-selection strategies.
//! - [`Mutation`]: five interchangeable perturbation strategies, one of
//!   which delegates to an external generative collaborator.
//! - [`EvolutionConfig`]: parameters of the loop (builder-style).
//! - [`EvolutionRunner`]: the generational loop with best-ever elitism.
//!
//! # References
//!
//! - Holland (1975), *Adaptation in Natural and Artificial Systems*
//! - Goldberg (1989), *Genetic Algorithms in Search, Optimization, and
//!   Machine Learning*

mod config;
mod crossover;
mod mutation;
mod runner;
mod selection;
mod types;

pub use config::EvolutionConfig;
pub use crossover::crossover;
pub use mutation::{Mutation, MutationContext};
pub use runner::{EvolutionResult, EvolutionRunner};
pub use selection::Selection;
pub use types::{Fitness, Individual, Population};
