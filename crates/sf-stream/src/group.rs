//! Grouping by a derived key.
//!
//! Group membership is only known once the upstream ends, so the stage
//! drains its whole upstream on the first pull. Stages chained after it see
//! an already materialized sequence. Never use it on an infinite source.

use sf_core::{equivalent, EqualityMode, Result, Value};
use std::mem;
use tracing::debug;

/// Items sharing one key, in arrival order.
#[derive(Debug, Clone, PartialEq)]
pub struct Group {
    pub key: Value,
    pub items: Vec<Value>,
}

/// Drain `upstream` into groups ordered by first-seen key. Keys are matched
/// with strict equivalence.
pub fn collect_groups<I, F>(upstream: I, mut key_fn: F) -> Result<Vec<Group>>
where
    I: Iterator<Item = Result<Value>>,
    F: FnMut(&Value) -> anyhow::Result<Value>,
{
    let mut groups: Vec<Group> = Vec::new();
    let mut total = 0usize;
    for item in upstream {
        let item = item?;
        let key = key_fn(&item)?;
        total += 1;
        match groups.iter_mut().find(|g| equivalent(&g.key, &key, EqualityMode::Strict)) {
            Some(group) => group.items.push(item),
            None => groups.push(Group { key, items: vec![item] }),
        }
    }
    debug!(groups = groups.len(), items = total, "group_by drained upstream");
    Ok(groups)
}

enum State<I, F> {
    Pending { upstream: I, key_fn: F },
    Draining(std::vec::IntoIter<Group>),
    Done,
}

/// Yields each group's items as a list, in first-seen key order.
pub struct GroupBy<I, F> {
    state: State<I, F>,
}

impl<I, F> GroupBy<I, F> {
    pub fn new(upstream: I, key_fn: F) -> Self {
        Self { state: State::Pending { upstream, key_fn } }
    }
}

impl<I, F> Iterator for GroupBy<I, F>
where
    I: Iterator<Item = Result<Value>>,
    F: FnMut(&Value) -> anyhow::Result<Value>,
{
    type Item = Result<Value>;

    fn next(&mut self) -> Option<Self::Item> {
        self.state = match mem::replace(&mut self.state, State::Done) {
            State::Pending { upstream, key_fn } => match collect_groups(upstream, key_fn) {
                Ok(groups) => State::Draining(groups.into_iter()),
                Err(e) => return Some(Err(e)),
            },
            other => other,
        };
        match &mut self.state {
            State::Draining(groups) => groups.next().map(|g| Ok(Value::list(g.items))),
            _ => None,
        }
    }
}
