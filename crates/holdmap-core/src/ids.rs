//! Identifier types shared by the storage layer and the numeric pipeline.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Traded product identifier (storage primary key).
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
pub struct ProductId(pub u64);

impl ProductId {
    /// Create a new product ID.
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    /// Get the raw key.
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for ProductId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

/// Office-holder identifier.
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
pub struct HolderId(pub u64);

impl HolderId {
    /// Create a new holder ID.
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    /// Get the raw key.
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for HolderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for HolderId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(ProductId::new(17).to_string(), "17");
        assert_eq!(HolderId::from(3u64).to_string(), "3");
    }

    #[test]
    fn test_ordering() {
        let mut ids = vec![HolderId(9), HolderId(2), HolderId(5)];
        ids.sort();
        assert_eq!(ids, vec![HolderId(2), HolderId(5), HolderId(9)]);
    }

    #[test]
    fn test_serde_transparent_shape() {
        let json = serde_json::to_string(&ProductId(42)).unwrap();
        assert_eq!(json, "42");
    }
}
