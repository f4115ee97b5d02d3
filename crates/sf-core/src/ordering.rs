//! Ordinal comparison used by the sortedness checks.

use crate::value::{parse_numeric, Number, Value};
use std::cmp::Ordering;

fn numeric_view(v: &Value) -> Option<Number> {
    match v {
        Value::Text(s) => parse_numeric(s),
        other => other.as_number(),
    }
}

fn render_number(n: Number) -> String {
    match n {
        Number::Int(i) => i.to_string(),
        Number::Float(f) => f.to_string(),
    }
}

/// Compare two values. `None` means the pair has no defined order
/// (distinct references, NaN, composites with different key sets).
pub fn compare(a: &Value, b: &Value) -> Option<Ordering> {
    match (a, b) {
        (Value::Ref(x), Value::Ref(y)) if x.same_instance(y) => Some(Ordering::Equal),
        (Value::Ref(_), _) | (_, Value::Ref(_)) => None,
        (Value::Composite(x), Value::Composite(y)) => {
            match x.len().cmp(&y.len()) {
                Ordering::Equal => {}
                unequal => return Some(unequal),
            }
            for (k, v) in x.entries() {
                match compare(v, y.get(k)?)? {
                    Ordering::Equal => continue,
                    unequal => return Some(unequal),
                }
            }
            Some(Ordering::Equal)
        }
        (Value::Composite(_), _) => Some(Ordering::Greater),
        (_, Value::Composite(_)) => Some(Ordering::Less),
        (Value::Null, Value::Text(s)) => Some("".cmp(s.as_str())),
        (Value::Text(s), Value::Null) => Some(s.as_str().cmp("")),
        (Value::Bool(_) | Value::Null, _) | (_, Value::Bool(_) | Value::Null) => {
            Some(a.is_truthy().cmp(&b.is_truthy()))
        }
        _ => match (numeric_view(a), numeric_view(b)) {
            (Some(x), Some(y)) => x.compare(y),
            _ => {
                let left = a.as_str().map(str::to_string).or_else(|| a.as_number().map(render_number))?;
                let right = b.as_str().map(str::to_string).or_else(|| b.as_number().map(render_number))?;
                Some(left.cmp(&right))
            }
        },
    }
}

/// `a <= b` under [`compare`]; unordered pairs are never `<=`.
pub fn less_or_equal(a: &Value, b: &Value) -> bool {
    matches!(compare(a, b), Some(Ordering::Less | Ordering::Equal))
}

/// `a >= b` under [`compare`]; unordered pairs are never `>=`.
pub fn greater_or_equal(a: &Value, b: &Value) -> bool {
    matches!(compare(a, b), Some(Ordering::Greater | Ordering::Equal))
}
