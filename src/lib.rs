//! Evolutionary test-input generation for guard-labeled state-transition
//! graphs.
//!
//! Given a directed graph of states whose transitions are gated by boolean
//! guard expressions over typed variables (the shape used for safety-critical
//! subsystem models, e.g. aircraft electrical or fuel systems), this crate
//! evolves candidate variable assignments with a genetic algorithm until every
//! transition guard has been exercised.
//!
//! # Modules
//!
//! - [`guard`]: parsing and fail-closed evaluation of the guard expression
//!   language (`ident op value` terms joined by `&&`/`||`).
//! - [`graph`]: the state-graph model, per-transition variable domain
//!   extraction, and the depth-first coverage tracer that defines fitness.
//! - [`ga`]: individuals, populations, six selection strategies, five
//!   mutation strategies, uniform crossover, and the generational evolution
//!   loop with best-ever elitism.
//! - [`oracle`]: the optional model-guided mutation collaborator — a remote
//!   text-generation service asked to propose guard-satisfying assignments.
//! - [`experiment`]: selection × mutation strategy-matrix runs with averaged
//!   generations-to-coverage, for comparing operator pairings.
//!
//! # Pipeline
//!
//! A [`graph::StateGraph`] is built once from a JSON document and validated;
//! [`graph::domain::extract`] derives a transition-scoped variable domain per
//! guard term; [`ga::EvolutionRunner`] then drives
//! initialization → evaluation → selection → crossover → mutation until full
//! transition coverage or generation-budget exhaustion.
//!
//! Guard evaluation is total and fail-closed: a guard that cannot be judged
//! true is treated as not satisfied, never as an error. The only fatal error
//! class is a malformed input graph, rejected at construction time.

pub mod experiment;
pub mod ga;
pub mod graph;
pub mod guard;
pub mod oracle;
