//! JSON adapter (Section 4.F) — the external-collaborator surface that
//! round-trips a tree through a `{stringified-key: count}` object, the
//! same shape `containers.JSONSerializer`/`JSONDeserializer` describe in
//! the original.

use std::cmp::Ordering;

use super::error::MultisetError;
use super::tree::Tree;

/// Converts a key to the string used as its JSON object key.
///
/// Blanket-implemented for any `Display` key, which covers the integral,
/// floating-point, and string built-ins from Section 4.A without
/// requiring a bespoke impl per key type.
pub trait ToKeyString {
    fn to_key_string(&self) -> String;
}

impl<T: std::fmt::Display> ToKeyString for T {
    fn to_key_string(&self) -> String {
        self.to_string()
    }
}

/// Parses a JSON object key back into `Self`.
///
/// The original decodes every object key as a `float64` regardless of the
/// key's real type — a coincidence of its decoder's dynamic typing, not a
/// requirement (Section 9). A static rewrite parameterizes on this trait
/// instead, and implements it for the key types the built-in comparators
/// already cover.
pub trait FromJsonKey: Sized {
    fn from_json_key(s: &str) -> Result<Self, MultisetError>;
}

macro_rules! impl_from_json_key_numeric {
    ($($t:ty),+) => {
        $(
            impl FromJsonKey for $t {
                fn from_json_key(s: &str) -> Result<Self, MultisetError> {
                    s.parse::<$t>()
                        .map_err(|_| MultisetError::InvalidKey(s.to_string()))
                }
            }
        )+
    };
}

impl_from_json_key_numeric!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize, f64, f32);

impl FromJsonKey for String {
    fn from_json_key(s: &str) -> Result<Self, MultisetError> {
        Ok(s.to_string())
    }
}

impl<K, C> Tree<K, C>
where
    C: Fn(&K, &K) -> Ordering,
{
    /// Serializes the tree to a JSON object mapping each stored key's
    /// string form to its multiplicity.
    pub fn to_json(&self) -> Result<String, MultisetError>
    where
        K: ToKeyString,
    {
        let mut map = serde_json::Map::new();
        let mut cur = self.cursor();
        while cur.next() {
            map.insert(
                cur.key().to_key_string(),
                serde_json::Value::from(cur.count()),
            );
        }
        Ok(serde_json::to_string(&serde_json::Value::Object(map))?)
    }

    /// Populates the tree from a JSON object of `{key: count}` pairs.
    ///
    /// On success, the tree is cleared first and then repopulated — `data`
    /// is fully parsed and validated before any mutation, so a malformed
    /// payload leaves the tree unchanged (Section 7).
    pub fn from_json(&mut self, data: &str) -> Result<(), MultisetError>
    where
        K: FromJsonKey + Clone,
    {
        let value: serde_json::Value = serde_json::from_str(data)?;
        let obj = value
            .as_object()
            .ok_or_else(|| MultisetError::InvalidKey("expected a JSON object".to_string()))?;

        let mut parsed = Vec::with_capacity(obj.len());
        for (key_str, count_value) in obj {
            let key = K::from_json_key(key_str)?;
            let count = count_value.as_u64().ok_or_else(|| {
                MultisetError::InvalidKey(format!(
                    "count for key {key_str:?} is not a non-negative integer"
                ))
            })?;
            parsed.push((key, count));
        }

        self.clear();
        for (key, count) in parsed {
            for _ in 0..count {
                self.put(key.clone());
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::super::tree::Tree;

    #[test]
    fn round_trip_preserves_size_and_keys() {
        let mut t = Tree::new();
        for k in ["c", "b", "a"] {
            t.put(k.to_string());
        }
        let json = t.to_json().unwrap();

        let mut t2: Tree<String, _> = Tree::new();
        t2.from_json(&json).unwrap();
        assert_eq!(t2.size(), 3);
        assert_eq!(t2.keys(), vec!["a", "b", "c"]);
    }

    #[test]
    fn round_trip_preserves_counts() {
        let mut t = Tree::new();
        for k in [1, 1, 1, 2, 2, 3] {
            t.put(k);
        }
        let json = t.to_json().unwrap();

        let mut t2: Tree<i64, _> = Tree::new();
        t2.from_json(&json).unwrap();
        assert_eq!(t2.size(), t.size());
        assert_eq!(t2.keys(), t.keys());
    }

    #[test]
    fn from_json_leaves_tree_unchanged_on_decode_failure() {
        let mut t = Tree::new();
        t.put(1);
        t.put(2);
        let err = t.from_json("not json").unwrap_err();
        assert!(matches!(err, super::MultisetError::Json(_)));
        assert_eq!(t.size(), 2);
    }

    #[test]
    fn from_json_rejects_non_integer_counts() {
        let mut t: Tree<i64, _> = Tree::new();
        let err = t.from_json(r#"{"1": "two"}"#).unwrap_err();
        assert!(matches!(err, super::MultisetError::InvalidKey(_)));
    }
}
