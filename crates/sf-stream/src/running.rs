//! Running aggregates: one numeric accumulator, yielded after every item.
//!
//! Integer arithmetic stays integral while it is exact (no overflow, exact
//! division) and falls back to float otherwise.

use sf_core::{Number, Result, SeqError, Value};
use tracing::warn;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Aggregate {
    Total,
    Product,
    Average,
    Max,
    Min,
    /// Starts at zero and subtracts each item.
    Difference,
}

impl Aggregate {
    pub fn stage_name(self) -> &'static str {
        match self {
            Self::Total => "running_total",
            Self::Product => "running_product",
            Self::Average => "running_average",
            Self::Max => "running_max",
            Self::Min => "running_min",
            Self::Difference => "running_difference",
        }
    }
}

fn add(a: Number, b: Number) -> Number {
    match (a, b) {
        (Number::Int(x), Number::Int(y)) => x.checked_add(y).map_or(Number::Float(x as f64 + y as f64), Number::Int),
        _ => Number::Float(a.as_f64() + b.as_f64()),
    }
}

fn sub(a: Number, b: Number) -> Number {
    match (a, b) {
        (Number::Int(x), Number::Int(y)) => x.checked_sub(y).map_or(Number::Float(x as f64 - y as f64), Number::Int),
        _ => Number::Float(a.as_f64() - b.as_f64()),
    }
}

fn mul(a: Number, b: Number) -> Number {
    match (a, b) {
        (Number::Int(x), Number::Int(y)) => x.checked_mul(y).map_or(Number::Float(x as f64 * y as f64), Number::Int),
        _ => Number::Float(a.as_f64() * b.as_f64()),
    }
}

fn div(a: Number, b: Number) -> Number {
    match (a, b) {
        (Number::Int(x), Number::Int(y)) if y != 0 && x.checked_rem(y) == Some(0) => Number::Int(x / y),
        _ => Number::Float(a.as_f64() / b.as_f64()),
    }
}

/// Accumulator state shared by every aggregate kind.
#[derive(Debug, Clone)]
struct Accumulator {
    aggregate: Aggregate,
    current: Option<Number>,
    // Average only: the mean is the running sum over the count.
    sum: Option<Number>,
    count: i64,
}

impl Accumulator {
    fn new(aggregate: Aggregate) -> Self {
        Self { aggregate, current: None, sum: None, count: 0 }
    }

    /// The seed becomes the accumulator as is and counts as one item.
    fn seed(&mut self, seed: Number) {
        self.current = Some(seed);
        self.sum = Some(seed);
        self.count = 1;
    }

    fn fold(&mut self, n: Number) -> Number {
        self.count += 1;
        let next = match (self.aggregate, self.current) {
            (Aggregate::Average, _) => {
                let sum = self.sum.map_or(n, |s| add(s, n));
                self.sum = Some(sum);
                div(sum, Number::Int(self.count))
            }
            (Aggregate::Difference, None) => sub(Number::Int(0), n),
            (_, None) => n,
            (Aggregate::Total, Some(acc)) => add(acc, n),
            (Aggregate::Product, Some(acc)) => mul(acc, n),
            (Aggregate::Difference, Some(acc)) => sub(acc, n),
            (Aggregate::Max, Some(acc)) => match n.compare(acc) {
                Some(std::cmp::Ordering::Greater) => n,
                _ => acc,
            },
            (Aggregate::Min, Some(acc)) => match n.compare(acc) {
                Some(std::cmp::Ordering::Less) => n,
                _ => acc,
            },
        };
        self.current = Some(next);
        next
    }
}

pub struct Running<I> {
    upstream: I,
    acc: Accumulator,
    pending_seed: Option<Number>,
}

impl<I> Running<I> {
    pub fn new(upstream: I, aggregate: Aggregate) -> Self {
        Self { upstream, acc: Accumulator::new(aggregate), pending_seed: None }
    }

    /// Start from `seed` instead of the first item. The seed is yielded
    /// before any upstream item.
    pub fn seeded(upstream: I, aggregate: Aggregate, seed: Number) -> Self {
        Self { upstream, acc: Accumulator::new(aggregate), pending_seed: Some(seed) }
    }
}

impl<I: Iterator<Item = Result<Value>>> Iterator for Running<I> {
    type Item = Result<Value>;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(seed) = self.pending_seed.take() {
            self.acc.seed(seed);
            return Some(Ok(seed.into_value()));
        }
        let item = match self.upstream.next()? {
            Ok(v) => v,
            Err(e) => return Some(Err(e)),
        };
        let Some(n) = item.as_number() else {
            let stage = self.acc.aggregate.stage_name();
            warn!(stage, found = item.type_name(), "non-numeric value in running aggregate");
            return Some(Err(SeqError::type_mismatch(stage, "number", item.type_name())));
        };
        Some(Ok(self.acc.fold(n).into_value()))
    }
}
