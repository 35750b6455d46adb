//! Opaque object-storage key type.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The key addressing one blob in the object store.
///
/// A `StorageKey` is derived deterministically from file identity when the
/// file is first stored and is immutable for the life of the metadata row.
/// Folder membership is deliberately not encoded: moving a file between
/// folders never touches the stored blob.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StorageKey(String);

impl StorageKey {
    /// Wrap an already-derived key string.
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// Return the key as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume the key, returning the inner string.
    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for StorageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for StorageKey {
    fn from(key: String) -> Self {
        Self(key)
    }
}

impl AsRef<str> for StorageKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_matches_inner() {
        let key = StorageKey::new("abc/report.pdf");
        assert_eq!(key.to_string(), "abc/report.pdf");
        assert_eq!(key.as_str(), "abc/report.pdf");
    }
}
