//! Seqflow streams: lazy, single-pass sequence transformations.
//!
//! Stages:
//! - filtering: `filter_true`, `filter_false`, `take_while`, `drop_while`, `compress`
//! - uniqueness: `distinct` (see [`unique_filter`] for the standalone form)
//! - slicing and windows: `limit`, `slice`, `pairwise`, `chunkwise`
//! - grouping: `group_by` (drains its upstream)
//! - running aggregates: total, product, average, max, min, difference
//!
//! Terminals: `to_array`, `to_groups`, `is_sorted`, `is_reversed`,
//! `same_with`, `same_count_with`, `all_match`, `any_match`, `none_match`,
//! `all_unique`.

pub mod filter;
pub mod group;
pub mod pipeline;
pub mod running;
pub mod slice;
pub mod summary;
pub mod unique;
pub mod window;

pub use group::Group;
pub use pipeline::Stream;
pub use running::Aggregate;
pub use unique::{unique_filter, Representatives};

pub use sf_core::{EqualityMode, Result, SeqError, Value};
