//! Errors surfaced by the JSON adapter (Section 4.F).

use std::fmt;

/// Recoverable failures of the multiset's external interfaces.
///
/// Key-absent conditions on `get`/`remove`/`floor`/`ceiling` are not errors —
/// they are signalled by returning `false`/`None`, per the container's
/// propagation policy. This enum only covers the JSON round-trip.
#[derive(Debug)]
pub enum MultisetError {
    /// The input was not valid JSON, or not an object of `{key: count}` pairs.
    Json(serde_json::Error),
    /// An object key could not be parsed into the target key type, or a
    /// count value was not a non-negative integer.
    InvalidKey(String),
}

impl fmt::Display for MultisetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MultisetError::Json(e) => write!(f, "JSON decode failed: {e}"),
            MultisetError::InvalidKey(s) => write!(f, "invalid key: {s}"),
        }
    }
}

impl std::error::Error for MultisetError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            MultisetError::Json(e) => Some(e),
            MultisetError::InvalidKey(_) => None,
        }
    }
}

impl From<serde_json::Error> for MultisetError {
    fn from(e: serde_json::Error) -> Self {
        MultisetError::Json(e)
    }
}
