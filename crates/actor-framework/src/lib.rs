//! # Actor Framework
//!
//! Building blocks for the ride-booking registries: every registry (payment
//! methods, saved locations, ride requests) is a [`ResourceActor`] that owns
//! its records inside one Tokio task and answers requests sent through a
//! cloneable [`ResourceClient`].
//!
//! ## Why actors for registries?
//!
//! A registry is shared by every request handler in the process. Running it as
//! an actor gives each registry exactly one writer, so concurrent additions
//! never interleave and there is no lock to forget. Cross-registry work (a ride
//! that needs a payment method and a price) is coordinated by the caller
//! through the clients, never by one actor reaching into another's state.
//!
//! **Further Reading**:
//! - [Actors in Rust](https://ryhl.io/blog/actors-with-tokio/) - Practical guide to implementing actors with Tokio
//!
//! ## Layers
//!
//! 1. **Entity** ([`ActorEntity`]) - the record type and its rules
//! 2. **Runtime** ([`ResourceActor`]) - the task that owns the records
//! 3. **Interface** ([`ResourceClient`], [`ActorClient`]) - typed request/reply
//!
//! ## Example
//!
//! ```rust
//! use actor_framework::{ActorEntity, ResourceActor};
//! use async_trait::async_trait;
//!
//! #[derive(Clone, Debug)]
//! struct Stop {
//!     id: u32,
//!     label: String,
//! }
//!
//! #[derive(Debug)] struct StopCreate { label: String }
//! #[derive(Debug)] enum StopAction {}
//! #[derive(Debug)] struct StopError;
//!
//! impl std::fmt::Display for StopError {
//!     fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result { write!(f, "stop error") }
//! }
//! impl std::error::Error for StopError {}
//!
//! #[async_trait]
//! impl ActorEntity for Stop {
//!     type Id = u32;
//!     type Create = StopCreate;
//!     type Update = String;
//!     type Action = StopAction;
//!     type ActionResult = ();
//!     type Context = ();
//!     type Error = StopError;
//!
//!     fn from_create_params(id: u32, params: StopCreate) -> Result<Self, Self::Error> {
//!         Ok(Self { id, label: params.label })
//!     }
//!
//!     async fn on_update(&mut self, label: String, _ctx: &()) -> Result<(), Self::Error> {
//!         self.label = label;
//!         Ok(())
//!     }
//!
//!     async fn handle_action(&mut self, action: StopAction, _: &()) -> Result<(), Self::Error> {
//!         match action {}
//!     }
//! }
//!
//! #[tokio::main]
//! async fn main() {
//!     let seed = vec![StopCreate { label: "Home".into() }];
//!     let (actor, client) = ResourceActor::<Stop>::with_seed(10, seed).unwrap();
//!     tokio::spawn(actor.run(()));
//!
//!     let id = client.create(StopCreate { label: "Work".into() }).await.unwrap();
//!     assert_eq!(id, 2);
//!
//!     let labels: Vec<String> = client.list().await.unwrap().into_iter().map(|s| s.label).collect();
//!     assert_eq!(labels, ["Home", "Work"]);
//! }
//! ```
//!
//! ## Context Injection
//!
//! Dependencies arrive through [`ResourceActor::run`], not the constructor,
//! so all actors can be created first and wired afterwards.
//!
//! ## Concurrency Model
//!
//! - Each actor runs in its own Tokio task
//! - Requests to one actor are processed sequentially
//! - Different actors run in parallel
//! - A request whose caller gave up is still applied; only the reply is lost
//!
//! ## Testing
//!
//! [`mock::MockClient`] answers a real `ResourceClient` from scripted replies,
//! so client logic can be tested without spawning the actor.

pub mod actor;
pub mod client;
pub mod client_trait;
pub mod entity;
pub mod error;
pub mod message;
pub mod mock;

pub use actor::ResourceActor;
pub use client::ResourceClient;
pub use client_trait::ActorClient;
pub use entity::ActorEntity;
pub use error::FrameworkError;
pub use message::{ResourceRequest, Response};
