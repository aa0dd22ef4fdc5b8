//! Typed scalar values for guard variables.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Declared type of a guard variable.
///
/// Graph documents declare each guard variable's type in the transition's
/// `guard_type` map as one of the strings `"bool"`, `"int"`, `"float"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VarType {
    Bool,
    Int,
    Float,
}

impl VarType {
    /// Parses the document form of a type name.
    pub fn parse(s: &str) -> Option<VarType> {
        match s {
            "bool" => Some(VarType::Bool),
            "int" => Some(VarType::Int),
            "float" => Some(VarType::Float),
            _ => None,
        }
    }

    /// The document form of this type name.
    pub fn as_str(&self) -> &'static str {
        match self {
            VarType::Bool => "bool",
            VarType::Int => "int",
            VarType::Float => "float",
        }
    }
}

impl fmt::Display for VarType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A concrete guard-variable value.
///
/// `Int` and `Float` compare numerically with cross-type promotion; `Bool`
/// supports equality only. Comparisons between a boolean and a number are
/// evaluation errors (and therefore fail closed).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Bool(bool),
    Int(i64),
    Float(f64),
}

impl Value {
    /// The declared type this value inhabits.
    pub fn var_type(&self) -> VarType {
        match self {
            Value::Bool(_) => VarType::Bool,
            Value::Int(_) => VarType::Int,
            Value::Float(_) => VarType::Float,
        }
    }

    /// Numeric view of this value, or `None` for booleans.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Bool(_) => None,
            Value::Int(i) => Some(*i as f64),
            Value::Float(f) => Some(*f),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Bool(b) => write!(f, "{b}"),
            Value::Int(i) => write!(f, "{i}"),
            Value::Float(x) => write!(f, "{x}"),
        }
    }
}
