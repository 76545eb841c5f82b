//! Error types for the ride request orchestrator.

use crate::error::ErrorKind;
use crate::model::{RideId, RideStatus};
use crate::payment_actor::PaymentError;
use actor_framework::FrameworkError;
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum RideError {
    #[error("Ride not found: {0}")]
    NotFound(String),

    /// The ride is not in a state that allows `action`.
    #[error("Cannot {action} {ride} while {from}")]
    InvalidTransition {
        ride: RideId,
        from: RideStatus,
        action: &'static str,
    },

    /// The refund was refused; the ride stays authorized.
    #[error("Refund failed: {0}")]
    RefundFailed(#[source] PaymentError),

    /// The payment registry could not be consulted at all.
    #[error("Payment registry error: {0}")]
    Payment(#[source] PaymentError),

    #[error("Ride registry unavailable: {0}")]
    Unavailable(String),
}

impl RideError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            RideError::NotFound(_) => ErrorKind::NotFound,
            RideError::InvalidTransition { .. } => ErrorKind::Conflict,
            RideError::RefundFailed(e) | RideError::Payment(e) => e.kind(),
            RideError::Unavailable(_) => ErrorKind::StorageUnavailable,
        }
    }

    pub fn from_framework(e: FrameworkError) -> Self {
        match e {
            FrameworkError::NotFound(id) => RideError::NotFound(id),
            other => other
                .into_entity_error::<RideError>()
                .unwrap_or_else(|e| RideError::Unavailable(e.to_string())),
        }
    }
}
