//! # ActorEntity Trait
//!
//! The contract every registry record (payment method, saved location, ride
//! request, …) implements so a single generic [`ResourceActor`](crate::ResourceActor)
//! can own and mutate it.
//!
//! Associated types pin each operation to its payload: a `PaymentMethod`
//! actor only accepts `PaymentDetails`, a `Location` actor only accepts
//! `LocationCreate`, and so on.
//!
//! # Provided Methods (Hooks)
//! - [`ActorEntity::on_create`]
//! - [`ActorEntity::on_delete`]
//!
//! Both default to `Ok(())`.

use async_trait::async_trait;
use std::fmt::{Debug, Display};

/// Trait that any resource entity must implement to be managed by ResourceActor.
///
/// # Ordering
/// Ids are generated from a monotonically increasing `u32` counter and the
/// store is keyed by `Ord`, so iterating the store yields records in insertion
/// order. Registries rely on this for "first added" and ordered listings.
///
/// # Async & Context
/// Hooks are `async` and receive the `Context` passed to
/// [`ResourceActor::run`](crate::ResourceActor::run), which lets dependencies be
/// wired after construction.
#[async_trait]
pub trait ActorEntity: Clone + Send + Sync + 'static {
    /// Identifier, generated by the actor from its `u32` counter.
    type Id: Eq + Ord + Clone + Send + Sync + Display + Debug + From<u32>;

    /// Payload used to create a new record.
    type Create: Send + Sync + Debug;

    /// Payload used to modify an existing record.
    type Update: Send + Sync + Debug;

    /// Resource-specific operations beyond CRUD.
    type Action: Send + Sync + Debug;

    /// Result type returned by custom actions.
    type ActionResult: Send + Sync + Debug;

    /// Runtime dependencies injected into every hook. Use `()` for none.
    type Context: Send + Sync;

    /// One error enum per actor. It crosses the channel boxed inside
    /// [`FrameworkError::EntityError`](crate::FrameworkError::EntityError).
    type Error: std::error::Error + Send + Sync + 'static;

    /// Builds the record from its id and creation payload.
    /// Runs synchronously before `on_create`.
    fn from_create_params(id: Self::Id, params: Self::Create) -> Result<Self, Self::Error>;

    // --- Lifecycle Hooks (Async) ---

    /// Called after construction, before the record is stored.
    /// An error here discards the record.
    async fn on_create(&mut self, _ctx: &Self::Context) -> Result<(), Self::Error> {
        Ok(())
    }

    /// Applies an update to a copy of the stored record; on error the copy
    /// is discarded.
    async fn on_update(
        &mut self,
        update: Self::Update,
        _ctx: &Self::Context,
    ) -> Result<(), Self::Error>;

    /// Called before the record is removed. An error keeps it in the store.
    async fn on_delete(&self, _ctx: &Self::Context) -> Result<(), Self::Error> {
        Ok(())
    }

    // --- Action Handler (Async) ---
    // Runs on a copy as well; only a successful action is committed.

    /// Handles a custom resource-specific action.
    async fn handle_action(
        &mut self,
        action: Self::Action,
        _ctx: &Self::Context,
    ) -> Result<Self::ActionResult, Self::Error>;
}
