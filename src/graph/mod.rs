//! State-graph model, variable-domain extraction, and coverage tracing.
//!
//! A [`StateGraph`] is built once from an external JSON document, validated
//! eagerly (a malformed graph is the only fatal error class in this crate),
//! and read-only afterwards.
//!
//! [`domain::extract`] derives one [`domain::VariableSpec`] per guard
//! variable *per transition*: the same signal name constrained differently in
//! two transitions gets two independent domains, keyed by
//! [`domain::ScopedVar`].
//!
//! [`coverage::cover`] answers the fitness question: given one assignment of
//! values to every scoped variable, which transitions are reachable and
//! satisfiable from the initial state?

pub mod coverage;
pub mod domain;
mod model;

pub use coverage::{cover, fitness, CoverageResult};
pub use domain::{ScopedVar, VariableSpec};
pub use model::{
    GraphDoc, GraphError, State, StateGraph, StateTiming, Transition, TransitionTiming,
};
