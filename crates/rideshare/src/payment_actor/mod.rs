//! # Payment Actor
//!
//! Session-scoped registry of payment methods.
//!
//! ## Structure
//!
//! - [`entity`] - [`ActorEntity`](actor_framework::ActorEntity) implementation for [`PaymentMethod`]
//! - [`error`] - [`PaymentError`]
//! - [`processor`] - the [`PaymentProcessor`] seam and [`SimulatedProcessor`]
//! - [`new()`] - creates the actor and its generic client
//!
//! The actor only stores records. Validation happens in
//! [`PaymentClient`](crate::clients::PaymentClient) before a request is sent,
//! and processor calls are made by the client after the actor has replied, so
//! the registry is never blocked on a gateway.
//!
//! ## Usage
//!
//! ```rust,ignore
//! let (actor, generic_client) = payment_actor::new(32);
//! tokio::spawn(actor.run(()));
//! let payments = PaymentClient::new(generic_client, Arc::new(SimulatedProcessor::default()), Arc::new(SystemClock));
//!
//! let id = payments.add("4444333322221111", "123", "12/30").await?;
//! payments.authorize_charge(id, 18.55).await?;
//! ```

pub mod entity;
pub mod error;
pub mod processor;

pub use error::*;
pub use processor::*;

use crate::model::PaymentMethod;
use actor_framework::{ResourceActor, ResourceClient};

/// Creates a new, empty payment actor and its client.
pub fn new(buffer_size: usize) -> (ResourceActor<PaymentMethod>, ResourceClient<PaymentMethod>) {
    ResourceActor::new(buffer_size)
}
