//! A counted, ordered multiset backed by a red-black tree with
//! order-statistic augmentation.
//!
//! Components, leaves first: [`comparator`] (the injected strict total
//! order), [`node`] (arena-indexed node layout), [`tree`] (the balanced
//! tree engine plus `Floor`/`Ceiling`/rank queries), [`iter`] (the
//! bidirectional distinct-key cursor), and [`json`] (the `{key: count}`
//! serialization surface). [`error`] holds the one recoverable error kind
//! the JSON adapter can produce.

pub mod comparator;
pub mod error;
pub mod iter;
pub(crate) mod node;
pub mod tree;

mod json;

pub use comparator::{float_comparator, ord_comparator, NonNan};
pub use error::MultisetError;
pub use iter::{DistinctKeys, Iter};
pub use json::{FromJsonKey, ToKeyString};
pub use tree::Tree;
