//! Comparators (Section 4.A).
//!
//! The tree is generic over any `Fn(&K, &K) -> Ordering` inducing a strict
//! total order; it performs no validation of that order, same as the
//! original: a non-total comparator is undefined behaviour, not a checked
//! error. `Tree::new` covers the built-in integral and lexicographic-string
//! cases via `Ord::cmp` directly. Floating-point keys need the caller to
//! rule out NaN — either by supplying a comparator that panics on it
//! (`float_comparator` below) or by storing keys as `NonNan`, which makes
//! the exclusion a constructor-time check instead of a runtime panic.

use std::cmp::Ordering;

/// `cmp(a, b)` for any `Ord` key — the integral/string built-in comparator.
pub fn ord_comparator<T: Ord>(a: &T, b: &T) -> Ordering {
    a.cmp(b)
}

/// `cmp(a, b)` for `f64` keys.
///
/// # Panics
/// Panics if either key is NaN — per the spec, comparator totality on NaN
/// is the caller's responsibility, not something the tree defends against.
pub fn float_comparator(a: &f64, b: &f64) -> Ordering {
    a.partial_cmp(b).expect("NaN key passed through float_comparator")
}

/// A finite `f64` wrapper that rules out NaN at construction time rather
/// than at comparison time, so `Tree<NonNan, _>::new()` can use plain `Ord`
/// instead of a caller-supplied comparator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NonNan(f64);

impl NonNan {
    /// Returns `None` if `value` is NaN.
    pub fn new(value: f64) -> Option<Self> {
        if value.is_nan() {
            None
        } else {
            Some(NonNan(value))
        }
    }

    pub fn get(self) -> f64 {
        self.0
    }
}

impl Eq for NonNan {}

impl PartialOrd for NonNan {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for NonNan {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.partial_cmp(&other.0).expect("NonNan value was NaN")
    }
}
