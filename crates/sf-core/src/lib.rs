//! Seqflow core: tagged values and the equality engine.
//!
//! - [`Value`]: integer, float, text, boolean, null, composite, reference
//! - [`equivalent`]: strict / loose equivalence of two values
//! - [`compare`]: ordinal comparison for sortedness checks

pub mod config;
pub mod equality;
pub mod error;
pub mod ordering;
pub mod value;

pub use config::{SeqflowConfig, UniqueConfig};
pub use equality::{equivalent, EqualityMode};
pub use error::{Result, SeqError};
pub use ordering::{compare, greater_or_equal, less_or_equal};
pub use value::{parse_numeric, Composite, Key, Number, Object, Reference, Value};
