//! # Ride Actor
//!
//! Session record of every ride request and where it stands in the
//! authorization state machine.
//!
//! ## Structure
//!
//! - [`entity`] - [`ActorEntity`](actor_framework::ActorEntity) implementation for [`RideRequest`]
//! - [`error`] - [`RideError`]
//! - [`actions`] - [`RideAction`] and [`RideActionResult`]
//! - [`new()`] - creates the actor and its generic client
//!
//! ## Custom Actions
//!
//! The actor only records decisions. The decisions themselves, and the
//! payment calls behind them, are made by
//! [`RideClient`](crate::clients::RideClient):
//!
//! ```rust,ignore
//! let outcome = rides.request_ride("44 State Rd", 18.55, 5.3, Some(method)).await?;
//! assert!(outcome.authorized);
//!
//! let ride = rides.cancel_ride_request(outcome.ride.id).await?;
//! assert_eq!(ride.status, RideStatus::Cancelled);
//! ```
//!
//! `BeginCancel` claims an authorized ride by moving it to `Cancelling`
//! before any refund is attempted, so two concurrent cancels can never both
//! refund.

pub mod actions;
pub mod entity;
pub mod error;

pub use actions::*;
pub use error::*;

use crate::model::RideRequest;
use actor_framework::{ResourceActor, ResourceClient};

/// Creates a new ride actor and its client.
pub fn new(buffer_size: usize) -> (ResourceActor<RideRequest>, ResourceClient<RideRequest>) {
    ResourceActor::new(buffer_size)
}
