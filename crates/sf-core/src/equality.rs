//! Equivalence of arbitrarily tagged values.
//!
//! Dispatch, in precedence order:
//! 1. references: identity (strict) or same class + loosely equal fields (loose)
//! 2. composites: same key set, values compared type-exactly, regardless of mode
//! 3. scalars: same tag and value (strict) or coercing comparison (loose)

use crate::value::{parse_numeric, Composite, Number, Reference, Value};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EqualityMode {
    /// Same type tag and same value; references by instance identity.
    #[default]
    Strict,
    /// Numeric/text coercion for scalars; references by class and fields.
    Loose,
}

/// Decide whether `a` and `b` are equivalent under `mode`. Total and pure.
pub fn equivalent(a: &Value, b: &Value, mode: EqualityMode) -> bool {
    match (a, b) {
        (Value::Ref(x), Value::Ref(y)) => references_equivalent(x, y, mode),
        (Value::Ref(_), _) | (_, Value::Ref(_)) => false,
        (Value::Composite(x), Value::Composite(y)) => composites_equivalent(x, y),
        (Value::Composite(_), _) | (_, Value::Composite(_)) => false,
        _ => match mode {
            EqualityMode::Strict => strict_scalar_eq(a, b),
            EqualityMode::Loose => loose_scalar_eq(a, b),
        },
    }
}

fn references_equivalent(x: &Reference, y: &Reference, mode: EqualityMode) -> bool {
    if x.same_instance(y) {
        return true;
    }
    match mode {
        EqualityMode::Strict => false,
        EqualityMode::Loose => {
            x.class() == y.class()
                && x.fields().len() == y.fields().len()
                && x.fields().iter().all(|(name, v)| {
                    y.field(name)
                        .is_some_and(|w| equivalent(v, w, EqualityMode::Loose))
                })
        }
    }
}

// The outer mode never reaches inside a composite.
fn composites_equivalent(x: &Composite, y: &Composite) -> bool {
    x.len() == y.len()
        && x.entries().iter().all(|(k, v)| {
            y.get(k)
                .is_some_and(|w| equivalent(v, w, EqualityMode::Strict))
        })
}

fn strict_scalar_eq(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Int(x), Value::Int(y)) => x == y,
        (Value::Float(x), Value::Float(y)) => x == y,
        (Value::Text(x), Value::Text(y)) => x == y,
        (Value::Bool(x), Value::Bool(y)) => x == y,
        (Value::Null, Value::Null) => true,
        _ => false,
    }
}

fn numbers_eq(x: Number, y: Number) -> bool {
    x.compare(y) == Some(Ordering::Equal)
}

fn number_text_eq(n: Number, s: &str) -> bool {
    match parse_numeric(s) {
        Some(m) => numbers_eq(n, m),
        // Empty text coerces to zero; other non-numeric text never matches a number.
        None => s.is_empty() && numbers_eq(n, Number::Int(0)),
    }
}

fn loose_scalar_eq(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Null, Value::Null) => true,
        (Value::Bool(x), other) | (other, Value::Bool(x)) => *x == other.is_truthy(),
        (Value::Null, Value::Text(s)) | (Value::Text(s), Value::Null) => s.is_empty(),
        (Value::Null, other) | (other, Value::Null) => !other.is_truthy(),
        (Value::Text(x), Value::Text(y)) => match (parse_numeric(x), parse_numeric(y)) {
            (Some(m), Some(n)) => numbers_eq(m, n),
            _ => x == y,
        },
        (Value::Text(s), other) | (other, Value::Text(s)) => match other.as_number() {
            Some(n) => number_text_eq(n, s),
            None => false,
        },
        _ => match (a.as_number(), b.as_number()) {
            (Some(x), Some(y)) => numbers_eq(x, y),
            _ => false,
        },
    }
}
