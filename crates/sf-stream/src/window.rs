//! Windowing stages.

use sf_core::{Result, SeqError, Value};
use std::mem;

/// `(previous, current)` for every adjacent pair, as a two-element list.
pub struct Pairwise<I> {
    upstream: I,
    prev: Option<Value>,
}

impl<I> Pairwise<I> {
    pub fn new(upstream: I) -> Self {
        Self { upstream, prev: None }
    }
}

impl<I: Iterator<Item = Result<Value>>> Iterator for Pairwise<I> {
    type Item = Result<Value>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let current = match self.upstream.next()? {
                Ok(v) => v,
                Err(e) => return Some(Err(e)),
            };
            if let Some(prev) = self.prev.replace(current.clone()) {
                return Some(Ok(Value::list([prev, current])));
            }
        }
    }
}

/// Non-overlapping windows of `size`; the final window may be shorter.
pub struct Chunkwise<I> {
    upstream: I,
    size: usize,
    buffer: Vec<Value>,
    exhausted: bool,
}

impl<I> Chunkwise<I> {
    pub fn new(upstream: I, size: usize) -> Result<Self> {
        if size == 0 {
            return Err(SeqError::InvalidArgument("chunk size must be at least 1".into()));
        }
        Ok(Self { upstream, size, buffer: Vec::with_capacity(size), exhausted: false })
    }
}

impl<I: Iterator<Item = Result<Value>>> Iterator for Chunkwise<I> {
    type Item = Result<Value>;

    fn next(&mut self) -> Option<Self::Item> {
        while !self.exhausted && self.buffer.len() < self.size {
            match self.upstream.next() {
                Some(Ok(v)) => self.buffer.push(v),
                // Partial chunk stays buffered for the next pull.
                Some(Err(e)) => return Some(Err(e)),
                None => self.exhausted = true,
            }
        }
        if self.buffer.is_empty() {
            return None;
        }
        let chunk = mem::replace(&mut self.buffer, Vec::with_capacity(self.size));
        Some(Ok(Value::list(chunk)))
    }
}
