//! Graph document layer, core model, and construction-time validation.

use crate::guard::{scan_terms, Expr, VarType};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};
use thiserror::Error;
use tracing::debug;

/// Malformed input graph.
///
/// This is the sole fatal error class in the crate: a graph that fails these
/// checks would invalidate every downstream coverage computation, so it is
/// rejected before any evolution starts.
#[derive(Debug, Error)]
pub enum GraphError {
    #[error("graph has no states; an initial state is required")]
    EmptyGraph,

    #[error("duplicate state id `{0}`")]
    DuplicateState(String),

    #[error("duplicate transition id `{0}`")]
    DuplicateTransition(String),

    #[error("transition `{transition}` references unknown state `{state}`")]
    UnknownState { transition: String, state: String },

    #[error(
        "transition `{transition}`: guard variable `{var}` is missing from the guard_type map"
    )]
    UndeclaredVariable { transition: String, var: String },

    #[error("transition `{transition}`: variable `{var}` has unknown type `{ty}`")]
    UnknownType {
        transition: String,
        var: String,
        ty: String,
    },

    #[error("invalid graph document: {0}")]
    Document(#[from] serde_json::Error),
}

/// Per-state timing metadata from the graph document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct StateTiming {
    #[serde(default)]
    pub duration: f64,
    #[serde(default)]
    pub start_time: f64,
}

/// Per-transition timing metadata from the graph document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct TransitionTiming {
    #[serde(default)]
    pub trigger_time: f64,
}

/// One state of the model. Immutable after graph construction.
#[derive(Debug, Clone)]
pub struct State {
    pub id: String,
    pub name: String,
    pub description: String,
    /// Severity level; lower is more nominal.
    pub level: u32,
    pub out_action: String,
    pub timing: StateTiming,
}

/// One guarded transition. Immutable after graph construction.
#[derive(Debug, Clone)]
pub struct Transition {
    pub id: String,
    pub from: String,
    pub to: String,
    /// Raw guard text as written in the document.
    pub guard: String,
    pub description: String,
    /// Declared type of every guard variable, by base name.
    pub guard_type: BTreeMap<String, VarType>,
    pub timing: TransitionTiming,
    expr: Option<Expr>,
}

impl Transition {
    /// The parsed guard, or `None` when the guard text does not parse.
    ///
    /// An unparseable guard is not an error: it simply can never be
    /// satisfied, per the fail-closed evaluation contract.
    pub fn guard_expr(&self) -> Option<&Expr> {
        self.expr.as_ref()
    }
}

/// JSON document form of a state graph, as emitted by the external graph
/// producer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphDoc {
    #[serde(default)]
    pub graph_id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub func_desc: Option<String>,
    pub states: Vec<StateDoc>,
    pub transitions: Vec<TransitionDoc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StateDoc {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub level: u32,
    #[serde(default)]
    pub out_action: String,
    #[serde(default)]
    pub timing: StateTiming,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransitionDoc {
    pub id: String,
    pub from: String,
    pub to: String,
    pub guard: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub guard_type: BTreeMap<String, String>,
    #[serde(default)]
    pub timing: TransitionTiming,
}

/// Directed graph of states and guarded transitions.
///
/// Built once from a [`GraphDoc`] and read-only thereafter. The initial
/// state is the first state in declaration order.
#[derive(Debug, Clone)]
pub struct StateGraph {
    graph_id: String,
    name: String,
    states: Vec<State>,
    transitions: Vec<Transition>,
    /// state id → indices into `transitions`, in declaration order.
    outgoing: HashMap<String, Vec<usize>>,
}

impl StateGraph {
    /// Parses and validates a JSON graph document.
    pub fn from_json(text: &str) -> Result<StateGraph, GraphError> {
        let doc: GraphDoc = serde_json::from_str(text)?;
        StateGraph::from_doc(doc)
    }

    /// Validates a graph document and builds the model.
    pub fn from_doc(doc: GraphDoc) -> Result<StateGraph, GraphError> {
        if doc.states.is_empty() {
            return Err(GraphError::EmptyGraph);
        }

        let mut state_ids = HashSet::new();
        let states: Vec<State> = doc
            .states
            .into_iter()
            .map(|s| {
                if !state_ids.insert(s.id.clone()) {
                    return Err(GraphError::DuplicateState(s.id));
                }
                Ok(State {
                    id: s.id,
                    name: s.name,
                    description: s.description,
                    level: s.level,
                    out_action: s.out_action,
                    timing: s.timing,
                })
            })
            .collect::<Result<_, _>>()?;

        let mut transition_ids = HashSet::new();
        let mut transitions = Vec::with_capacity(doc.transitions.len());
        let mut outgoing: HashMap<String, Vec<usize>> = HashMap::new();

        for t in doc.transitions {
            if !transition_ids.insert(t.id.clone()) {
                return Err(GraphError::DuplicateTransition(t.id));
            }
            for endpoint in [&t.from, &t.to] {
                if !state_ids.contains(endpoint) {
                    return Err(GraphError::UnknownState {
                        transition: t.id.clone(),
                        state: endpoint.clone(),
                    });
                }
            }

            let mut guard_type = BTreeMap::new();
            for (var, ty) in t.guard_type {
                let Some(parsed) = VarType::parse(&ty) else {
                    return Err(GraphError::UnknownType {
                        transition: t.id,
                        var,
                        ty,
                    });
                };
                guard_type.insert(var, parsed);
            }

            // Every variable referenced by the guard must carry a declared
            // type, otherwise the input graph is malformed.
            for term in scan_terms(&t.guard) {
                if !guard_type.contains_key(&term.var) {
                    return Err(GraphError::UndeclaredVariable {
                        transition: t.id,
                        var: term.var,
                    });
                }
            }

            let expr = match Expr::parse(&t.guard) {
                Ok(expr) => Some(expr),
                Err(err) => {
                    debug!(
                        transition = %t.id,
                        guard = %t.guard,
                        %err,
                        "guard does not parse; transition can never fire"
                    );
                    None
                }
            };

            outgoing
                .entry(t.from.clone())
                .or_default()
                .push(transitions.len());
            transitions.push(Transition {
                id: t.id,
                from: t.from,
                to: t.to,
                guard: t.guard,
                description: t.description,
                guard_type,
                timing: t.timing,
                expr,
            });
        }

        debug!(
            states = states.len(),
            transitions = transitions.len(),
            "state graph constructed"
        );

        Ok(StateGraph {
            graph_id: doc.graph_id.unwrap_or_default(),
            name: doc.name.unwrap_or_default(),
            states,
            transitions,
            outgoing,
        })
    }

    pub fn graph_id(&self) -> &str {
        &self.graph_id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn states(&self) -> &[State] {
        &self.states
    }

    pub fn transitions(&self) -> &[Transition] {
        &self.transitions
    }

    pub fn transition_count(&self) -> usize {
        self.transitions.len()
    }

    /// The designated initial state: first in declaration order.
    pub fn initial_state(&self) -> &State {
        &self.states[0]
    }

    /// Outgoing transitions of a state, in declaration order.
    pub fn outgoing(&self, state_id: &str) -> impl Iterator<Item = &Transition> {
        self.outgoing
            .get(state_id)
            .into_iter()
            .flatten()
            .map(|&i| &self.transitions[i])
    }
}
