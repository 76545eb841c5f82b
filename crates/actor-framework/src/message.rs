//! # Generic Messages
//!
//! Request envelopes exchanged between [`ResourceClient`](crate::ResourceClient)
//! and [`ResourceActor`](crate::ResourceActor). Every request carries its own
//! `oneshot` reply channel.

use crate::entity::ActorEntity;
use crate::error::FrameworkError;
use tokio::sync::oneshot;

/// Reply half of a request.
pub type Response<T> = oneshot::Sender<Result<T, FrameworkError>>;

/// Requests understood by every resource actor.
///
/// - **Create / Get / Update / Delete**: record lifecycle.
/// - **List**: every record, in insertion order.
/// - **Action**: resource-specific operation ([`ActorEntity::Action`]).
#[derive(Debug)]
pub enum ResourceRequest<T: ActorEntity> {
    Create {
        params: T::Create,
        respond_to: Response<T::Id>,
    },
    Get {
        id: T::Id,
        respond_to: Response<Option<T>>,
    },
    List {
        respond_to: Response<Vec<T>>,
    },
    Update {
        id: T::Id,
        update: T::Update,
        respond_to: Response<T>,
    },
    Delete {
        id: T::Id,
        respond_to: Response<()>,
    },
    Action {
        id: T::Id,
        action: T::Action,
        respond_to: Response<T::ActionResult>,
    },
}
