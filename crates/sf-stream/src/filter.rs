//! Stateless predicate stages: filter, take-while, drop-while, compress.

use sf_core::{Result, Value};

/// Keeps items whose predicate result equals `keep`.
pub struct Filter<I, F> {
    upstream: I,
    predicate: F,
    keep: bool,
}

impl<I, F> Filter<I, F> {
    /// Yield items where the predicate holds.
    pub fn when_true(upstream: I, predicate: F) -> Self {
        Self { upstream, predicate, keep: true }
    }

    /// Yield items where the predicate does not hold.
    pub fn when_false(upstream: I, predicate: F) -> Self {
        Self { upstream, predicate, keep: false }
    }
}

impl<I, F> Iterator for Filter<I, F>
where
    I: Iterator<Item = Result<Value>>,
    F: FnMut(&Value) -> anyhow::Result<bool>,
{
    type Item = Result<Value>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let item = match self.upstream.next()? {
                Ok(v) => v,
                Err(e) => return Some(Err(e)),
            };
            match (self.predicate)(&item) {
                Ok(hit) if hit == self.keep => return Some(Ok(item)),
                Ok(_) => continue,
                Err(e) => return Some(Err(e.into())),
            }
        }
    }
}

/// Yields while the predicate holds; the first failing item ends the stage
/// for good.
pub struct TakeWhile<I, F> {
    upstream: I,
    predicate: F,
    done: bool,
}

impl<I, F> TakeWhile<I, F> {
    pub fn new(upstream: I, predicate: F) -> Self {
        Self { upstream, predicate, done: false }
    }
}

impl<I, F> Iterator for TakeWhile<I, F>
where
    I: Iterator<Item = Result<Value>>,
    F: FnMut(&Value) -> anyhow::Result<bool>,
{
    type Item = Result<Value>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let item = match self.upstream.next()? {
            Ok(v) => v,
            Err(e) => return Some(Err(e)),
        };
        match (self.predicate)(&item) {
            Ok(true) => Some(Ok(item)),
            Ok(false) => {
                self.done = true;
                None
            }
            Err(e) => Some(Err(e.into())),
        }
    }
}

/// Discards while the predicate holds, then passes everything through
/// without consulting it again.
pub struct DropWhile<I, F> {
    upstream: I,
    predicate: F,
    dropping: bool,
}

impl<I, F> DropWhile<I, F> {
    pub fn new(upstream: I, predicate: F) -> Self {
        Self { upstream, predicate, dropping: true }
    }
}

impl<I, F> Iterator for DropWhile<I, F>
where
    I: Iterator<Item = Result<Value>>,
    F: FnMut(&Value) -> anyhow::Result<bool>,
{
    type Item = Result<Value>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let item = match self.upstream.next()? {
                Ok(v) => v,
                Err(e) => return Some(Err(e)),
            };
            if !self.dropping {
                return Some(Ok(item));
            }
            match (self.predicate)(&item) {
                Ok(true) => continue,
                Ok(false) => {
                    self.dropping = false;
                    return Some(Ok(item));
                }
                Err(e) => return Some(Err(e.into())),
            }
        }
    }
}

/// Yields a data item when the selector at the same position is truthy.
/// Ends at the shorter of the two sequences.
pub struct Compress<I, S> {
    upstream: I,
    selectors: S,
}

impl<I, S> Compress<I, S> {
    pub fn new(upstream: I, selectors: S) -> Self {
        Self { upstream, selectors }
    }
}

impl<I, S> Iterator for Compress<I, S>
where
    I: Iterator<Item = Result<Value>>,
    S: Iterator<Item = Value>,
{
    type Item = Result<Value>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            // An upstream error does not consume a selector.
            let item = match self.upstream.next()? {
                Ok(v) => v,
                Err(e) => return Some(Err(e)),
            };
            if self.selectors.next()?.is_truthy() {
                return Some(Ok(item));
            }
        }
    }
}
