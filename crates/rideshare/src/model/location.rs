/// A named place the rider can pick as origin or destination.
///
/// # Actor Framework
/// Managed by a [`ResourceActor`](actor_framework::ResourceActor); see
/// [`location_actor`](crate::location_actor) for the seeded registry.
use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Type-safe identifier for Locations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct LocationId(pub u32);

impl From<u32> for LocationId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl Display for LocationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "location_{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub id: LocationId,
    pub address: String,
    /// Free text, not unique.
    pub label: String,
}

/// Payload for adding a location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationCreate {
    pub address: String,
    pub label: String,
}

impl LocationCreate {
    pub fn new(address: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            label: label.into(),
        }
    }
}

/// Replaces both fields of a stored location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationUpdate {
    pub address: String,
    pub label: String,
}
