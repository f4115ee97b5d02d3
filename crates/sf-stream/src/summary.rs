//! Terminal consumers that reduce a sequence to a single answer.
//!
//! All of them stop pulling as soon as the answer is known, and return the
//! first upstream error they meet.

use crate::unique::Representatives;
use sf_core::{equivalent, greater_or_equal, less_or_equal, EqualityMode, Result, Value};

fn holds_for_adjacent<I>(items: I, relation: fn(&Value, &Value) -> bool) -> Result<bool>
where
    I: Iterator<Item = Result<Value>>,
{
    let mut prev: Option<Value> = None;
    for item in items {
        let current = item?;
        if let Some(p) = &prev {
            if !relation(p, &current) {
                return Ok(false);
            }
        }
        prev = Some(current);
    }
    Ok(true)
}

/// Every adjacent pair satisfies `previous <= current`.
pub fn is_sorted<I: Iterator<Item = Result<Value>>>(items: I) -> Result<bool> {
    holds_for_adjacent(items, less_or_equal)
}

/// Every adjacent pair satisfies `previous >= current`.
pub fn is_reversed<I: Iterator<Item = Result<Value>>>(items: I) -> Result<bool> {
    holds_for_adjacent(items, greater_or_equal)
}

/// Same length and strictly equivalent items in the same order.
pub fn same_with<I, O>(items: I, other: O) -> Result<bool>
where
    I: Iterator<Item = Result<Value>>,
    O: IntoIterator,
    O::Item: Into<Value>,
{
    let mut items = items;
    let mut other = other.into_iter();
    loop {
        match (items.next(), other.next()) {
            (None, None) => return Ok(true),
            (Some(a), Some(b)) => {
                if !equivalent(&a?, &b.into(), EqualityMode::Strict) {
                    return Ok(false);
                }
            }
            (Some(a), None) => {
                a?;
                return Ok(false);
            }
            (None, Some(_)) => return Ok(false),
        }
    }
}

/// Same length, content ignored.
pub fn same_count_with<I, O>(items: I, other: O) -> Result<bool>
where
    I: Iterator<Item = Result<Value>>,
    O: IntoIterator,
{
    let mut count = 0usize;
    for item in items {
        item?;
        count += 1;
    }
    Ok(other.into_iter().count() == count)
}

pub fn all_match<I, F>(items: I, mut predicate: F) -> Result<bool>
where
    I: Iterator<Item = Result<Value>>,
    F: FnMut(&Value) -> anyhow::Result<bool>,
{
    for item in items {
        if !predicate(&item?)? {
            return Ok(false);
        }
    }
    Ok(true)
}

pub fn any_match<I, F>(items: I, mut predicate: F) -> Result<bool>
where
    I: Iterator<Item = Result<Value>>,
    F: FnMut(&Value) -> anyhow::Result<bool>,
{
    for item in items {
        if predicate(&item?)? {
            return Ok(true);
        }
    }
    Ok(false)
}

/// No two items are equivalent under `mode`.
pub fn all_unique<I>(items: I, mode: EqualityMode) -> Result<bool>
where
    I: Iterator<Item = Result<Value>>,
{
    let mut reps = Representatives::new(mode);
    for item in items {
        if !reps.admit(&item?) {
            return Ok(false);
        }
    }
    Ok(true)
}
