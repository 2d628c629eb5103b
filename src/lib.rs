//! # ordered-multiset
//!
//! A counted, ordered multiset: each distinct key maps to a positive
//! multiplicity, backed by a red-black tree augmented with per-subtree
//! occurrence counts. Insertion, deletion, membership, ordered
//! enumeration, floor/ceiling, and rank queries all run in O(log n).
//!
//! The tree engine is the whole of this crate; see [`multiset::tree`] for
//! the core and [`multiset::iter`] for the bidirectional order-statistic
//! iterator. [`Tree::to_json`]/[`Tree::from_json`] provide the JSON
//! round-trip surface.

pub mod multiset;

pub use multiset::{
    float_comparator, ord_comparator, DistinctKeys, FromJsonKey, Iter, MultisetError, NonNan,
    ToKeyString, Tree,
};
