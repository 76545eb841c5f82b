//! State transitions for a [`RideRequest`](crate::model::RideRequest).
//!
//! Each action moves the ride along one edge of its state machine; anything
//! else is rejected with [`RideError::InvalidTransition`](super::RideError::InvalidTransition).

use crate::model::{AuthorizationReason, Charge, RideRequest};

#[derive(Debug, Clone, PartialEq)]
pub enum RideAction {
    /// Quoted → Authorized, recording the charge that was made.
    Authorize(Charge),
    /// Quoted → Rejected.
    Reject(AuthorizationReason),
    /// Authorized → Cancelling. Any other state is left alone.
    BeginCancel,
    /// Cancelling → Cancelled, after the refund succeeded.
    FinishCancel,
    /// Cancelling → Authorized, after the refund failed.
    AbortCancel,
}

#[derive(Debug, Clone, PartialEq)]
pub enum RideActionResult {
    /// The transition happened; the new state.
    Updated(RideRequest),
    /// `BeginCancel` claimed the ride; the caller must refund this charge.
    RefundDue(Charge),
    /// `BeginCancel` found nothing to refund.
    Unchanged(RideRequest),
}
