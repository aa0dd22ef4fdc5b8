//! Fail-closed guard evaluation.

use super::parser::{CmpOp, Expr, Operand};
use super::value::Value;
use std::collections::HashMap;

/// Evaluates a guard string against a binding table.
///
/// Total and fail-closed: parse errors, unknown identifiers, and type
/// mismatches all yield `false`. Connectives short-circuit, so
/// `a == true || b > 5` is satisfied by `a = true` even when `b` is unbound.
///
/// # Examples
///
/// ```
/// use evoguard::guard::{evaluate, Value};
/// use std::collections::HashMap;
///
/// let mut bindings = HashMap::new();
/// bindings.insert("voltage_value".to_string(), Value::Float(300.0));
/// assert!(evaluate("voltage_value > 250 || voltage_value < 80", &bindings));
/// assert!(!evaluate("voltage_value < 80", &bindings));
/// assert!(!evaluate("missing == true", &bindings));
/// ```
pub fn evaluate(guard: &str, bindings: &HashMap<String, Value>) -> bool {
    match Expr::parse(guard) {
        Ok(expr) => evaluate_expr(&expr, bindings),
        Err(_) => false,
    }
}

/// Evaluates an already-parsed guard expression, fail-closed.
pub fn evaluate_expr(expr: &Expr, bindings: &HashMap<String, Value>) -> bool {
    eval(expr, bindings).unwrap_or(false)
}

fn eval(expr: &Expr, bindings: &HashMap<String, Value>) -> Option<bool> {
    match expr {
        Expr::Lit(b) => Some(*b),
        Expr::Cmp { lhs, op, rhs } => {
            let lhs = *bindings.get(lhs)?;
            let rhs = match rhs {
                Operand::Value(v) => *v,
                Operand::Var(name) => *bindings.get(name)?,
            };
            compare(lhs, *op, rhs)
        }
        Expr::And(a, b) => {
            if !eval(a, bindings)? {
                return Some(false);
            }
            eval(b, bindings)
        }
        Expr::Or(a, b) => {
            if eval(a, bindings)? {
                return Some(true);
            }
            eval(b, bindings)
        }
    }
}

/// Compares two values, or `None` on a type mismatch.
///
/// Booleans support equality only; numbers compare via promotion to `f64`.
fn compare(lhs: Value, op: CmpOp, rhs: Value) -> Option<bool> {
    if let (Value::Bool(a), Value::Bool(b)) = (lhs, rhs) {
        return match op {
            CmpOp::Eq => Some(a == b),
            _ => None,
        };
    }
    let a = lhs.as_f64()?;
    let b = rhs.as_f64()?;
    Some(match op {
        CmpOp::Eq => a == b,
        CmpOp::Ge => a >= b,
        CmpOp::Le => a <= b,
        CmpOp::Gt => a > b,
        CmpOp::Lt => a < b,
    })
}
