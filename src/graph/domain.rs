//! Transition-scoped variable domains.
//!
//! Each transition's guard is scanned for `ident op value` terms and every
//! referenced variable gets its own domain, scoped to the owning transition.
//! Scoping matters: a signal like `fuel_quantity` may be constrained to
//! `<= 300` in one transition and `<= 50` in another — sharing one domain
//! would conflate the two.

use super::model::StateGraph;
use crate::guard::{CmpOp, VarType};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Default lower bound when a guard never constrains a variable from below.
pub const DEFAULT_MIN: f64 = -1000.0;
/// Default upper bound when a guard never constrains a variable from above.
pub const DEFAULT_MAX: f64 = 1000.0;

/// Composite key of a guard variable and its owning transition.
///
/// The string form `name_transitionId` (via [`Display`](fmt::Display)) is a
/// presentation detail used for export and for the mutation-oracle exchange;
/// internally the two components stay separate.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ScopedVar {
    pub transition: String,
    pub name: String,
}

impl ScopedVar {
    pub fn new(transition: impl Into<String>, name: impl Into<String>) -> ScopedVar {
        ScopedVar {
            transition: transition.into(),
            name: name.into(),
        }
    }
}

impl fmt::Display for ScopedVar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.name, self.transition)
    }
}

/// Type and inclusive numeric interval of one scoped guard variable.
///
/// Bounds are meaningless for `bool` variables and stay at the defaults.
/// Contradictory guards can leave `min > max`; that degenerate interval is
/// preserved here and repaired at sampling time, never treated as an error.
#[derive(Debug, Clone, PartialEq)]
pub struct VariableSpec {
    pub var: ScopedVar,
    pub ty: VarType,
    pub min: f64,
    pub max: f64,
}

impl VariableSpec {
    fn new(var: ScopedVar, ty: VarType) -> VariableSpec {
        VariableSpec {
            var,
            ty,
            min: DEFAULT_MIN,
            max: DEFAULT_MAX,
        }
    }

    /// Tightens the interval with one relational constraint.
    ///
    /// `==` pins both bounds to the value, overriding anything seen before;
    /// `>`/`>=` raise `min` only when the value is tighter; `<`/`<=` lower
    /// `max` only when the value is tighter.
    fn tighten(&mut self, op: CmpOp, value: f64) {
        match op {
            CmpOp::Eq => {
                self.min = value;
                self.max = value;
            }
            CmpOp::Gt | CmpOp::Ge => {
                if value > self.min {
                    self.min = value;
                }
            }
            CmpOp::Lt | CmpOp::Le => {
                if value < self.max {
                    self.max = value;
                }
            }
        }
    }
}

/// Derives the scoped variable domains of every transition in the graph.
///
/// Specs appear in transition declaration order, then in order of first
/// appearance within each guard. Graph validation has already guaranteed
/// that every scanned variable carries a declared type.
pub fn extract(graph: &StateGraph) -> Vec<VariableSpec> {
    let mut specs: Vec<VariableSpec> = Vec::new();

    for transition in graph.transitions() {
        let base = specs.len();
        for term in crate::guard::scan_terms(&transition.guard) {
            let Some(&ty) = transition.guard_type.get(&term.var) else {
                continue;
            };
            let idx = specs[base..]
                .iter()
                .position(|s| s.var.name == term.var)
                .map(|i| base + i)
                .unwrap_or_else(|| {
                    specs.push(VariableSpec::new(
                        ScopedVar::new(&transition.id, &term.var),
                        ty,
                    ));
                    specs.len() - 1
                });

            if ty != VarType::Bool {
                if let Some(value) = term.value.and_then(|v| v.as_f64()) {
                    specs[idx].tighten(term.op, value);
                }
            }
        }
    }

    specs
}
