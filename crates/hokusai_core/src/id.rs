//! Opaque identifier newtypes.
//!
//! All ids are client-generated v4 UUIDs: 128 bits of cryptographically
//! strong randomness, collision-free for our purposes, and mintable without
//! a round trip to the backend.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a panel, immutable once created.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
    derive_more::Display,
)]
#[serde(transparent)]
pub struct PanelId(Uuid);

impl PanelId {
    /// Mint a fresh random id.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for PanelId {
    fn default() -> Self {
        Self::new()
    }
}

/// Identifier scoping one panel collection and one analysis.
///
/// Created once per user visit; durable across reloads of the same client
/// but not portable across devices.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
    derive_more::Display,
)]
#[serde(transparent)]
pub struct SessionId(Uuid);

impl SessionId {
    /// Mint a fresh random id.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

/// Identifier for a saved story analysis.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
    derive_more::Display,
)]
#[serde(transparent)]
pub struct AnalysisId(Uuid);

impl AnalysisId {
    /// Mint a fresh random id.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for AnalysisId {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn panel_ids_are_unique() {
        let a = PanelId::new();
        let b = PanelId::new();
        assert_ne!(a, b);
    }

    #[test]
    fn ids_serialize_transparently() {
        let id = SessionId::new();
        let json = serde_json::to_string(&id).unwrap();
        // A bare UUID string, not a wrapper object.
        assert!(json.starts_with('"') && json.ends_with('"'));
        let back: SessionId = serde_json::from_str(&json).unwrap();
        assert_eq!(id, back);
    }
}
