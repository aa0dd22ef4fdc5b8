//! Model-guided mutation collaborator.
//!
//! The model-guided mutation strategy delegates to an external generative
//! model: every transition's guard is formatted together with its scoped
//! variable types, the collaborator proposes an assignment, and the proposal
//! is parsed back into typed gene values. The interface is deliberately
//! narrow — formatted constraints in, raw response text out — and every
//! failure on this path (transport, timeout, malformed response) degrades to
//! an identity mutation so evolutionary progress never stalls on a remote
//! service.
//!
//! [`HttpOracle`] is the production implementation, speaking the
//! OpenAI-compatible chat-completions protocol of a locally hosted model
//! server.

mod http;

pub use http::{HttpOracle, OracleConfig};

use crate::graph::domain::{ScopedVar, VariableSpec};
use crate::graph::StateGraph;
use crate::guard::{Value, VarType};
use std::collections::BTreeMap;
use thiserror::Error;

/// Collaborator failure. Never fatal to the engine: callers fall back to an
/// identity mutation.
#[derive(Debug, Error)]
pub enum OracleError {
    #[error("oracle transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("oracle returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("oracle response contained no choices")]
    EmptyResponse,
}

/// External source of assignment proposals.
///
/// Implementations receive the formatted guard constraints of the whole
/// graph and return the raw response text; parsing and coercion stay on the
/// engine side so any collaborator that can produce a JSON object works.
pub trait MutationOracle: Send + Sync {
    fn propose(&self, constraints: &str) -> Result<String, OracleError>;
}

/// Formats every transition's guard and scoped variable types into the
/// constraint request submitted to the collaborator.
///
/// One line per transition:
/// `<scoped guard text> 变量类型为：{'var_T1': 'type', ...}` — guard
/// identifiers are rewritten to their `name_transitionId` form so the
/// collaborator answers in scoped names directly.
pub fn format_constraints(graph: &StateGraph) -> String {
    graph
        .transitions()
        .iter()
        .map(|t| {
            let scoped_guard = scope_guard_text(&t.guard, &t.id);
            let type_map = format_type_map(&t.guard_type, &t.id);
            format!("{scoped_guard} 变量类型为：{type_map}")
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Rewrites identifier tokens of a guard to their transition-scoped form.
///
/// Word-boundary aware: `a` inside `max` is left alone. Literals (`true`,
/// `false`, numbers) are not identifiers and pass through unchanged.
fn scope_guard_text(guard: &str, transition_id: &str) -> String {
    let chars: Vec<char> = guard.chars().collect();
    let mut out = String::with_capacity(guard.len() + 8);
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        if c.is_ascii_alphabetic() || c == '_' {
            let start = i;
            while i < chars.len() && (chars[i].is_ascii_alphanumeric() || chars[i] == '_') {
                i += 1;
            }
            let word: String = chars[start..i].iter().collect();
            if word == "true" || word == "false" {
                out.push_str(&word);
            } else {
                out.push_str(&word);
                out.push('_');
                out.push_str(transition_id);
            }
        } else {
            out.push(c);
            i += 1;
        }
    }

    out
}

fn format_type_map(guard_type: &BTreeMap<String, VarType>, transition_id: &str) -> String {
    let entries: Vec<String> = guard_type
        .iter()
        .map(|(name, ty)| format!("'{name}_{transition_id}': '{ty}'"))
        .collect();
    format!("{{{}}}", entries.join(", "))
}

/// Parses a collaborator response into typed gene values.
///
/// The response is expected to be a JSON object keyed by scoped variable
/// name, possibly wrapped in a fenced code block (the first fence is
/// extracted before parsing). Boolean values may arrive as the literal
/// strings `"True"`/`"False"`. Keys that match no known spec and values
/// that cannot be coerced to the declared type are dropped; `None` is
/// returned only when the response is not parseable JSON at all.
pub fn parse_assignment(
    response: &str,
    specs: &[VariableSpec],
) -> Option<BTreeMap<ScopedVar, Value>> {
    let payload = extract_fenced(response);
    let parsed: serde_json::Value = serde_json::from_str(payload.trim()).ok()?;
    let object = parsed.as_object()?;

    let mut assignment = BTreeMap::new();
    for spec in specs {
        let Some(raw) = object.get(&spec.var.to_string()) else {
            continue;
        };
        if let Some(value) = coerce(raw, spec.ty) {
            assignment.insert(spec.var.clone(), value);
        }
    }
    Some(assignment)
}

/// Extracts the body of the first fenced code block, if any.
fn extract_fenced(text: &str) -> &str {
    for fence in ["```json", "```"] {
        if let Some(start) = text.find(fence) {
            let body = &text[start + fence.len()..];
            if let Some(end) = body.find("```") {
                return &body[..end];
            }
        }
    }
    text
}

fn coerce(raw: &serde_json::Value, ty: VarType) -> Option<Value> {
    match ty {
        VarType::Bool => match raw {
            serde_json::Value::Bool(b) => Some(Value::Bool(*b)),
            serde_json::Value::String(s) => match s.as_str() {
                "True" | "true" => Some(Value::Bool(true)),
                "False" | "false" => Some(Value::Bool(false)),
                _ => None,
            },
            _ => None,
        },
        VarType::Int => raw
            .as_i64()
            .or_else(|| raw.as_f64().map(|f| f as i64))
            .map(Value::Int),
        VarType::Float => raw.as_f64().map(Value::Float),
    }
}
