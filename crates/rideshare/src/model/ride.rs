/// A ride request and its authorization state.
///
/// # Actor Framework
/// Managed by a [`ResourceActor`](actor_framework::ResourceActor). State changes
/// go through [`RideAction`](crate::ride_actor::RideAction); the payment calls
/// themselves happen in [`RideClient`](crate::clients::RideClient).
///
/// ```text
/// Quoted ──► Authorized ──► Cancelling ──► Cancelled
///    │            ▲              │
///    ▼            └──────────────┘ (refund failed)
/// Rejected
/// ```
use crate::model::{Location, MethodId};
use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Type-safe identifier for ride requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RideId(pub u32);

impl From<u32> for RideId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl Display for RideId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ride_{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RideStatus {
    Quoted,
    Authorized,
    Rejected,
    /// Refund in flight; a second cancel is a no-op.
    Cancelling,
    Cancelled,
}

impl Display for RideStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            RideStatus::Quoted => "quoted",
            RideStatus::Authorized => "authorized",
            RideStatus::Rejected => "rejected",
            RideStatus::Cancelling => "cancelling",
            RideStatus::Cancelled => "cancelled",
        };
        f.write_str(name)
    }
}

/// Why a ride was or was not authorized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AuthorizationReason {
    Approved,
    MissingPaymentMethod,
    InvalidPaymentMethod,
    InvalidAmount,
    ChargeDeclined,
}

/// The one charge a ride may carry.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Charge {
    pub method: MethodId,
    pub amount: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RideRequest {
    pub id: RideId,
    pub destination: String,
    pub distance_miles: f64,
    pub cost: f64,
    pub method: Option<MethodId>,
    pub status: RideStatus,
    /// Set once the authorization decision is made.
    pub reason: Option<AuthorizationReason>,
    pub charge: Option<Charge>,
}

/// Payload for recording a new request.
#[derive(Debug, Clone, PartialEq)]
pub struct RideRequestCreate {
    pub destination: String,
    pub distance_miles: f64,
    pub cost: f64,
    pub method: Option<MethodId>,
}

/// Derived price estimate between two locations. Never stored.
#[derive(Debug, Clone, PartialEq)]
pub struct RideQuote {
    pub origin: Location,
    pub destination: Location,
    pub distance_miles: f64,
    pub price_per_mile: f64,
    pub total_cost: f64,
}

/// Outcome of a ride request, returned to the caller.
#[derive(Debug, Clone, PartialEq)]
pub struct RideAuthorization {
    pub ride: RideRequest,
    pub authorized: bool,
    pub reason: AuthorizationReason,
}

impl RideAuthorization {
    pub fn from_ride(ride: RideRequest, reason: AuthorizationReason) -> Self {
        Self {
            authorized: ride.status == RideStatus::Authorized,
            ride,
            reason,
        }
    }
}
