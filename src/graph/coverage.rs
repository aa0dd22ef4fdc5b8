//! Depth-first transition-coverage tracing.
//!
//! Coverage answers: under one concrete assignment of every scoped guard
//! variable, which transitions can fire on some path from the initial state?
//! The covered-edge *set* is the fitness signal for the evolutionary search.

use super::domain::ScopedVar;
use super::model::{StateGraph, Transition};
use crate::guard::{evaluate_expr, Value};
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

/// Set of transition ids satisfied by one assignment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CoverageResult {
    covered: BTreeSet<String>,
}

impl CoverageResult {
    /// Covered transition ids.
    pub fn covered(&self) -> &BTreeSet<String> {
        &self.covered
    }

    pub fn covered_count(&self) -> usize {
        self.covered.len()
    }

    pub fn contains(&self, transition_id: &str) -> bool {
        self.covered.contains(transition_id)
    }
}

/// Traces coverage of `graph` under one scoped assignment.
///
/// Exploration starts at the initial state and recurses through every
/// outgoing transition whose guard is satisfied. A transition already taken
/// on the *current path* is skipped — that per-path set is what makes cyclic
/// graphs terminate — but the same transition reached via a different path
/// still lands in the global covered set exactly once.
pub fn cover(graph: &StateGraph, assignment: &BTreeMap<ScopedVar, Value>) -> CoverageResult {
    let mut covered = BTreeSet::new();
    let mut on_path = HashSet::new();
    dfs(
        graph,
        assignment,
        &graph.initial_state().id,
        &mut on_path,
        &mut covered,
    );
    CoverageResult { covered }
}

/// Coverage cardinality plus one.
///
/// The `+1` keeps every individual's fitness positive so that
/// fitness-proportional selection never divides by zero. The maximum is
/// `graph.transition_count() + 1`.
pub fn fitness(graph: &StateGraph, assignment: &BTreeMap<ScopedVar, Value>) -> usize {
    cover(graph, assignment).covered_count() + 1
}

fn dfs(
    graph: &StateGraph,
    assignment: &BTreeMap<ScopedVar, Value>,
    state_id: &str,
    on_path: &mut HashSet<String>,
    covered: &mut BTreeSet<String>,
) {
    for transition in graph.outgoing(state_id) {
        if on_path.contains(&transition.id) {
            continue;
        }
        if satisfied(transition, assignment) {
            covered.insert(transition.id.clone());
            on_path.insert(transition.id.clone());
            dfs(graph, assignment, &transition.to, on_path, covered);
            on_path.remove(&transition.id);
        }
    }
}

/// Evaluates a transition's guard under the assignment, with the
/// transition-scoped genes exposed under their base names.
fn satisfied(transition: &Transition, assignment: &BTreeMap<ScopedVar, Value>) -> bool {
    let Some(expr) = transition.guard_expr() else {
        return false;
    };
    let bindings: HashMap<String, Value> = assignment
        .iter()
        .filter(|(var, _)| var.transition == transition.id)
        .map(|(var, value)| (var.name.clone(), *value))
        .collect();
    evaluate_expr(expr, &bindings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::testkit::power_graph;
    use crate::graph::{GraphDoc, StateGraph};

    fn assignment(pairs: &[(&str, &str, Value)]) -> BTreeMap<ScopedVar, Value> {
        pairs
            .iter()
            .map(|(tid, name, v)| (ScopedVar::new(*tid, *name), *v))
            .collect()
    }

    fn satisfying_assignment() -> BTreeMap<ScopedVar, Value> {
        assignment(&[
            ("T1", "engine_start", Value::Bool(true)),
            ("T2", "voltage_stable", Value::Bool(true)),
            ("T2", "frequency_error", Value::Float(0.3)),
            ("T3", "voltage_value", Value::Float(300.0)),
            ("T4", "manual_reset", Value::Bool(true)),
        ])
    }

    #[test]
    fn test_full_coverage() {
        let graph = power_graph();
        let result = cover(&graph, &satisfying_assignment());
        assert_eq!(result.covered_count(), 4);
        for id in ["T1", "T2", "T3", "T4"] {
            assert!(result.contains(id), "expected {id} covered");
        }
        assert_eq!(fitness(&graph, &satisfying_assignment()), 5);
    }

    #[test]
    fn test_unreachable_transitions_not_covered() {
        // T1's guard fails, so nothing past S1 is reachable even though the
        // downstream guards would be satisfied.
        let graph = power_graph();
        let mut genes = satisfying_assignment();
        genes.insert(ScopedVar::new("T1", "engine_start"), Value::Bool(false));
        let result = cover(&graph, &genes);
        assert_eq!(result.covered_count(), 0);
        assert_eq!(fitness(&graph, &genes), 1);
    }

    #[test]
    fn test_partial_coverage() {
        let graph = power_graph();
        let mut genes = satisfying_assignment();
        genes.insert(ScopedVar::new("T2", "voltage_stable"), Value::Bool(false));
        let result = cover(&graph, &genes);
        let expected: BTreeSet<String> = ["T1".to_string()].into();
        assert_eq!(result.covered(), &expected);
    }

    #[test]
    fn test_missing_gene_fails_closed() {
        let graph = power_graph();
        let mut genes = satisfying_assignment();
        genes.remove(&ScopedVar::new("T3", "voltage_value"));
        let result = cover(&graph, &genes);
        assert_eq!(result.covered_count(), 3);
        assert!(!result.contains("T3"));
    }

    #[test]
    fn test_self_loop_terminates() {
        // 2-state graph with an always-true self-loop: the per-path visited
        // set must stop the recursion after one lap.
        let doc: GraphDoc = serde_json::from_str(
            r#"{
                "states": [
                    {"id": "A", "name": "a"},
                    {"id": "B", "name": "b"}
                ],
                "transitions": [
                    {"id": "L", "from": "A", "to": "A", "guard": "true"},
                    {"id": "T", "from": "A", "to": "B", "guard": "true"}
                ]
            }"#,
        )
        .unwrap();
        let graph = StateGraph::from_doc(doc).unwrap();
        let result = cover(&graph, &BTreeMap::new());
        assert_eq!(result.covered_count(), 2);
    }

    #[test]
    fn test_cycle_covered_once() {
        // T4 loops back to S2; the cycle is walked once per path and the
        // covered set still holds each transition exactly once.
        let graph = power_graph();
        let result = cover(&graph, &satisfying_assignment());
        assert_eq!(result.covered().len(), result.covered_count());
    }

    #[test]
    fn test_same_signal_name_scoped_per_transition() {
        // Two transitions constrain `q` differently; only T1's scoped gene
        // satisfies its own guard.
        let doc: GraphDoc = serde_json::from_str(
            r#"{
                "states": [
                    {"id": "A", "name": "a"},
                    {"id": "B", "name": "b"},
                    {"id": "C", "name": "c"}
                ],
                "transitions": [
                    {"id": "T1", "from": "A", "to": "B", "guard": "q <= 300",
                     "guard_type": {"q": "int"}},
                    {"id": "T2", "from": "B", "to": "C", "guard": "q <= 50",
                     "guard_type": {"q": "int"}}
                ]
            }"#,
        )
        .unwrap();
        let graph = StateGraph::from_doc(doc).unwrap();
        let genes = assignment(&[
            ("T1", "q", Value::Int(285)),
            ("T2", "q", Value::Int(285)),
        ]);
        let result = cover(&graph, &genes);
        assert!(result.contains("T1"));
        assert!(!result.contains("T2"));
    }
}
