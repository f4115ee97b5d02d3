//! Slicing stage.

use sf_core::{Result, SeqError, Value};

/// Items at positions `start, start + step, ...`, at most `count` of them.
/// Stops pulling upstream once `count` items have been yielded, so it is
/// safe on infinite sources.
pub struct Slice<I> {
    upstream: I,
    start: usize,
    count: Option<usize>,
    step: usize,
    position: usize,
    emitted: usize,
}

impl<I> Slice<I> {
    pub fn new(upstream: I, start: usize, count: Option<usize>, step: usize) -> Result<Self> {
        if step == 0 {
            return Err(SeqError::InvalidArgument("slice step must be at least 1".into()));
        }
        Ok(Self { upstream, start, count, step, position: 0, emitted: 0 })
    }

    /// First `n` items.
    pub fn limit(upstream: I, n: usize) -> Self {
        Self { upstream, start: 0, count: Some(n), step: 1, position: 0, emitted: 0 }
    }
}

impl<I: Iterator<Item = Result<Value>>> Iterator for Slice<I> {
    type Item = Result<Value>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.count.is_some_and(|c| self.emitted >= c) {
            return None;
        }
        loop {
            let index = self.position;
            let item = self.upstream.next()?;
            self.position += 1;
            let v = match item {
                Ok(v) => v,
                Err(e) => return Some(Err(e)),
            };
            if index >= self.start && (index - self.start) % self.step == 0 {
                self.emitted += 1;
                return Some(Ok(v));
            }
        }
    }
}
