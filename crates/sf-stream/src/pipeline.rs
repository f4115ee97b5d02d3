//! Stream builder: chains stages over one single-pass source.
//!
//! Every chain method consumes the stream and returns a new one that owns
//! it, so each stage exclusively owns its upstream. Nothing is pulled until
//! a terminal method runs or the stream is iterated directly.

use crate::filter::{Compress, DropWhile, Filter, TakeWhile};
use crate::group::{collect_groups, Group, GroupBy};
use crate::running::{Aggregate, Running};
use crate::slice::Slice;
use crate::summary;
use crate::unique::Distinct;
use sf_core::{EqualityMode, Number, Result, UniqueConfig, Value};
use tracing::debug;

/// Lazy sequence of values with chainable stages.
pub struct Stream<'a> {
    inner: Box<dyn Iterator<Item = Result<Value>> + 'a>,
}

impl<'a> Stream<'a> {
    /// Wrap any source of values. The source is pulled at most once.
    pub fn of<S>(source: S) -> Self
    where
        S: IntoIterator,
        S::IntoIter: 'a,
        S::Item: Into<Value>,
    {
        Self::wrap(source.into_iter().map(|v| -> Result<Value> { Ok(v.into()) }))
    }

    /// Wrap a source whose pulls can fail.
    pub fn of_results<S>(source: S) -> Self
    where
        S: IntoIterator<Item = Result<Value>>,
        S::IntoIter: 'a,
    {
        Self::wrap(source.into_iter())
    }

    fn wrap(iter: impl Iterator<Item = Result<Value>> + 'a) -> Self {
        Self { inner: Box::new(iter) }
    }

    // ---- stateless stages ----

    pub fn filter_true<F>(self, mut predicate: F) -> Self
    where
        F: FnMut(&Value) -> bool + 'a,
    {
        self.try_filter_true(move |v| Ok(predicate(v)))
    }

    pub fn try_filter_true<F>(self, predicate: F) -> Self
    where
        F: FnMut(&Value) -> anyhow::Result<bool> + 'a,
    {
        Self::wrap(Filter::when_true(self.inner, predicate))
    }

    pub fn filter_false<F>(self, mut predicate: F) -> Self
    where
        F: FnMut(&Value) -> bool + 'a,
    {
        self.try_filter_false(move |v| Ok(predicate(v)))
    }

    pub fn try_filter_false<F>(self, predicate: F) -> Self
    where
        F: FnMut(&Value) -> anyhow::Result<bool> + 'a,
    {
        Self::wrap(Filter::when_false(self.inner, predicate))
    }

    pub fn take_while<F>(self, mut predicate: F) -> Self
    where
        F: FnMut(&Value) -> bool + 'a,
    {
        self.try_take_while(move |v| Ok(predicate(v)))
    }

    pub fn try_take_while<F>(self, predicate: F) -> Self
    where
        F: FnMut(&Value) -> anyhow::Result<bool> + 'a,
    {
        Self::wrap(TakeWhile::new(self.inner, predicate))
    }

    pub fn drop_while<F>(self, mut predicate: F) -> Self
    where
        F: FnMut(&Value) -> bool + 'a,
    {
        self.try_drop_while(move |v| Ok(predicate(v)))
    }

    pub fn try_drop_while<F>(self, predicate: F) -> Self
    where
        F: FnMut(&Value) -> anyhow::Result<bool> + 'a,
    {
        Self::wrap(DropWhile::new(self.inner, predicate))
    }

    /// Keep items whose positional selector is truthy; truncates to the
    /// shorter sequence.
    pub fn compress<S>(self, selectors: S) -> Self
    where
        S: IntoIterator,
        S::IntoIter: 'a,
        S::Item: Into<Value>,
    {
        Self::wrap(Compress::new(self.inner, selectors.into_iter().map(|s| -> Value { s.into() })))
    }

    pub fn map<F>(self, mut f: F) -> Self
    where
        F: FnMut(Value) -> Value + 'a,
    {
        self.try_map(move |v| Ok(f(v)))
    }

    pub fn try_map<F>(self, mut f: F) -> Self
    where
        F: FnMut(Value) -> anyhow::Result<Value> + 'a,
    {
        Self::wrap(self.inner.map(move |item: Result<Value>| -> Result<Value> { Ok(f(item?)?) }))
    }

    /// Drop items equivalent to an earlier one.
    pub fn distinct(self, mode: EqualityMode) -> Self {
        self.distinct_with(&UniqueConfig::new(mode))
    }

    pub fn distinct_with(self, config: &UniqueConfig) -> Self {
        debug!(mode = ?config.mode, fast_path = config.uses_fast_path(), "distinct stage");
        Self::wrap(Distinct::new(self.inner, config))
    }

    // ---- slicing and windows ----

    pub fn limit(self, n: usize) -> Self {
        Self::wrap(Slice::limit(self.inner, n))
    }

    pub fn slice(self, start: usize, count: Option<usize>, step: usize) -> Result<Self> {
        Ok(Self::wrap(Slice::new(self.inner, start, count, step)?))
    }

    pub fn pairwise(self) -> Self {
        Self::wrap(crate::window::Pairwise::new(self.inner))
    }

    pub fn chunkwise(self, size: usize) -> Result<Self> {
        Ok(Self::wrap(crate::window::Chunkwise::new(self.inner, size)?))
    }

    // ---- grouping ----

    /// Yields each group's items as a list, in first-seen key order. Drains
    /// the whole upstream on the first pull.
    pub fn group_by<F>(self, mut key_fn: F) -> Self
    where
        F: FnMut(&Value) -> Value + 'a,
    {
        self.try_group_by(move |v| Ok(key_fn(v)))
    }

    pub fn try_group_by<F>(self, key_fn: F) -> Self
    where
        F: FnMut(&Value) -> anyhow::Result<Value> + 'a,
    {
        Self::wrap(GroupBy::new(self.inner, key_fn))
    }

    // ---- running aggregates ----

    fn running(self, aggregate: Aggregate) -> Self {
        Self::wrap(Running::new(self.inner, aggregate))
    }

    fn running_from(self, aggregate: Aggregate, seed: Number) -> Self {
        Self::wrap(Running::seeded(self.inner, aggregate, seed))
    }

    pub fn running_total(self) -> Self {
        self.running(Aggregate::Total)
    }

    pub fn running_product(self) -> Self {
        self.running(Aggregate::Product)
    }

    pub fn running_average(self) -> Self {
        self.running(Aggregate::Average)
    }

    pub fn running_max(self) -> Self {
        self.running(Aggregate::Max)
    }

    pub fn running_min(self) -> Self {
        self.running(Aggregate::Min)
    }

    pub fn running_difference(self) -> Self {
        self.running(Aggregate::Difference)
    }

    pub fn running_total_from(self, seed: impl Into<Number>) -> Self {
        self.running_from(Aggregate::Total, seed.into())
    }

    pub fn running_product_from(self, seed: impl Into<Number>) -> Self {
        self.running_from(Aggregate::Product, seed.into())
    }

    pub fn running_average_from(self, seed: impl Into<Number>) -> Self {
        self.running_from(Aggregate::Average, seed.into())
    }

    pub fn running_max_from(self, seed: impl Into<Number>) -> Self {
        self.running_from(Aggregate::Max, seed.into())
    }

    pub fn running_min_from(self, seed: impl Into<Number>) -> Self {
        self.running_from(Aggregate::Min, seed.into())
    }

    pub fn running_difference_from(self, seed: impl Into<Number>) -> Self {
        self.running_from(Aggregate::Difference, seed.into())
    }

    // ---- terminals ----

    pub fn to_array(self) -> Result<Vec<Value>> {
        self.inner.collect()
    }

    /// Key to items, in first-seen key order.
    pub fn to_groups<F>(self, mut key_fn: F) -> Result<Vec<Group>>
    where
        F: FnMut(&Value) -> Value,
    {
        collect_groups(self.inner, move |v| Ok(key_fn(v)))
    }

    pub fn is_sorted(self) -> Result<bool> {
        summary::is_sorted(self.inner)
    }

    pub fn is_reversed(self) -> Result<bool> {
        summary::is_reversed(self.inner)
    }

    pub fn same_with<O>(self, other: O) -> Result<bool>
    where
        O: IntoIterator,
        O::Item: Into<Value>,
    {
        summary::same_with(self.inner, other)
    }

    pub fn same_count_with<O: IntoIterator>(self, other: O) -> Result<bool> {
        summary::same_count_with(self.inner, other)
    }

    pub fn all_match<F>(self, mut predicate: F) -> Result<bool>
    where
        F: FnMut(&Value) -> bool,
    {
        summary::all_match(self.inner, move |v| Ok(predicate(v)))
    }

    pub fn any_match<F>(self, mut predicate: F) -> Result<bool>
    where
        F: FnMut(&Value) -> bool,
    {
        summary::any_match(self.inner, move |v| Ok(predicate(v)))
    }

    pub fn none_match<F>(self, predicate: F) -> Result<bool>
    where
        F: FnMut(&Value) -> bool,
    {
        self.any_match(predicate).map(|hit| !hit)
    }

    pub fn all_unique(self, mode: EqualityMode) -> Result<bool> {
        summary::all_unique(self.inner, mode)
    }
}

impl<'a> Iterator for Stream<'a> {
    type Item = Result<Value>;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }
}
