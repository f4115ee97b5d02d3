//! Uniqueness filter: yields each value not equivalent to any earlier one.
//!
//! Representatives are kept for the whole history of the sequence and
//! compared by linear scan, so the filter is O(n²) in time and O(n) in
//! memory. In strict mode, hashable scalars can optionally be looked up in
//! a hash set keyed by their exact tag and value, which gives the same
//! answer without the scan.

use sf_core::{equivalent, EqualityMode, Result, UniqueConfig, Value};
use std::collections::HashSet;
use tracing::trace;

/// Exact strict-mode identity of a hashable scalar.
#[derive(Debug, PartialEq, Eq, Hash)]
enum ScalarKey {
    Int(i64),
    Text(String),
    Bool(bool),
    Null,
}

impl ScalarKey {
    // Floats are left out: NaN and signed zero do not hash consistently
    // with their equality.
    fn of(value: &Value) -> Option<Self> {
        match value {
            Value::Int(i) => Some(ScalarKey::Int(*i)),
            Value::Text(s) => Some(ScalarKey::Text(s.clone())),
            Value::Bool(b) => Some(ScalarKey::Bool(*b)),
            Value::Null => Some(ScalarKey::Null),
            _ => None,
        }
    }
}

/// Growing list of previously accepted values.
#[derive(Debug)]
pub struct Representatives {
    mode: EqualityMode,
    seen: Vec<Value>,
    scalars: Option<HashSet<ScalarKey>>,
}

impl Representatives {
    pub fn new(mode: EqualityMode) -> Self {
        Self::with_config(&UniqueConfig::new(mode))
    }

    pub fn with_config(config: &UniqueConfig) -> Self {
        Self {
            mode: config.mode,
            seen: Vec::new(),
            scalars: config.uses_fast_path().then(HashSet::new),
        }
    }

    pub fn mode(&self) -> EqualityMode {
        self.mode
    }

    /// Record `value` if it is new. Returns false for a duplicate.
    pub fn admit(&mut self, value: &Value) -> bool {
        if let Some(scalars) = self.scalars.as_mut() {
            if let Some(key) = ScalarKey::of(value) {
                let fresh = scalars.insert(key);
                if !fresh {
                    trace!(scanned = 0, "duplicate discarded");
                }
                return fresh;
            }
        }
        if let Some(pos) = self.seen.iter().position(|r| equivalent(value, r, self.mode)) {
            trace!(scanned = pos + 1, "duplicate discarded");
            return false;
        }
        self.seen.push(value.clone());
        true
    }

    /// Number of representatives stored.
    pub fn len(&self) -> usize {
        self.seen.len() + self.scalars.as_ref().map_or(0, HashSet::len)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Lazily drop values equivalent to an earlier one.
pub fn unique_filter<S>(source: S, mode: EqualityMode) -> impl Iterator<Item = Value>
where
    S: IntoIterator,
    S::Item: Into<Value>,
{
    let mut reps = Representatives::new(mode);
    source
        .into_iter()
        .map(Into::<Value>::into)
        .filter(move |v| reps.admit(v))
}

/// Pipeline stage form of [`unique_filter`]. Errors pass through and are
/// never recorded.
pub struct Distinct<I> {
    upstream: I,
    reps: Representatives,
}

impl<I> Distinct<I> {
    pub fn new(upstream: I, config: &UniqueConfig) -> Self {
        Self { upstream, reps: Representatives::with_config(config) }
    }

    pub fn representatives(&self) -> &Representatives {
        &self.reps
    }
}

impl<I: Iterator<Item = Result<Value>>> Iterator for Distinct<I> {
    type Item = Result<Value>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            match self.upstream.next()? {
                Ok(v) if self.reps.admit(&v) => return Some(Ok(v)),
                Ok(_) => continue,
                Err(e) => return Some(Err(e)),
            }
        }
    }
}
