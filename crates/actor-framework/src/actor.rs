//! # Generic Actor Server
//!
//! [`ResourceActor`] is the server half of a registry. It owns the records of
//! one entity type and processes requests one at a time in its own Tokio task,
//! so a registry never needs a `Mutex` around its state: the task *is* the
//! registry's single point of mutual exclusion.

use crate::client::ResourceClient;
use crate::entity::ActorEntity;
use crate::error::FrameworkError;
use crate::message::{ResourceRequest, Response};
use std::collections::BTreeMap;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// The generic actor that manages a collection of entities.
///
/// # Usage Pattern
///
/// 1. **Create**: [`ResourceActor::new`] (or [`ResourceActor::with_seed`]) returns
///    the actor and a cloneable [`ResourceClient`].
/// 2. **Wire**: pass the entity's `Context` into [`ResourceActor::run`].
/// 3. **Run**: spawn the future returned by `run` on the runtime.
///
/// ```rust,ignore
/// let (actor, client) = ResourceActor::<Location>::with_seed(32, seeds)?;
/// tokio::spawn(actor.run(()));
/// let all = client.list().await?;
/// ```
///
/// # Implementation Details
///
/// Records live in a `BTreeMap` keyed by `T::Id`. Ids come from a `u32`
/// counter that only moves forward, so map order equals insertion order and
/// removed ids are never reused.
///
/// Updates and actions run against a copy of the record, which replaces the
/// stored one only when the hook succeeds. A rejected change leaves nothing
/// behind.
pub struct ResourceActor<T: ActorEntity> {
    receiver: mpsc::Receiver<ResourceRequest<T>>,
    store: BTreeMap<T::Id, T>,
    next_id: u32,
    entity_type: &'static str,
}

fn entity_error<E: std::error::Error + Send + Sync + 'static>(e: E) -> FrameworkError {
    FrameworkError::EntityError(Box::new(e))
}

impl<T: ActorEntity> ResourceActor<T> {
    /// Creates an empty actor and its client.
    ///
    /// `buffer_size` is the request channel capacity; callers wait when it is full.
    pub fn new(buffer_size: usize) -> (Self, ResourceClient<T>) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        // "PaymentMethod" rather than "rideshare::model::payment::PaymentMethod"
        let entity_type = std::any::type_name::<T>()
            .rsplit("::")
            .next()
            .unwrap_or("Unknown");
        let actor = Self {
            receiver,
            store: BTreeMap::new(),
            next_id: 1,
            entity_type,
        };
        (actor, ResourceClient::new(sender))
    }

    /// Creates an actor pre-populated with `seed` records, in order.
    ///
    /// Seeds go through `from_create_params` only: `on_create` needs the
    /// runtime context, which does not exist until [`ResourceActor::run`].
    pub fn with_seed(
        buffer_size: usize,
        seed: impl IntoIterator<Item = T::Create>,
    ) -> Result<(Self, ResourceClient<T>), T::Error> {
        let (mut actor, client) = Self::new(buffer_size);
        for params in seed {
            let id = actor.allocate_id();
            let item = T::from_create_params(id.clone(), params)?;
            actor.store.insert(id, item);
        }
        Ok((actor, client))
    }

    fn allocate_id(&mut self) -> T::Id {
        let id = T::Id::from(self.next_id);
        self.next_id += 1;
        id
    }

    fn reply<R>(respond_to: Response<R>, result: Result<R, FrameworkError>) {
        // The caller may have stopped waiting; that is not the actor's concern.
        let _ = respond_to.send(result);
    }

    /// Runs the actor's event loop until every client has been dropped.
    ///
    /// Requests already queued when the last client goes away are still served.
    pub async fn run(mut self, context: T::Context) {
        let entity_type = self.entity_type;
        info!(entity_type, size = self.store.len(), "Actor started");

        while let Some(request) = self.receiver.recv().await {
            match request {
                ResourceRequest::Create { params, respond_to } => {
                    let result = self.create(params, &context).await;
                    Self::reply(respond_to, result);
                }
                ResourceRequest::Get { id, respond_to } => {
                    let item = self.store.get(&id).cloned();
                    debug!(entity_type, %id, found = item.is_some(), "Get");
                    Self::reply(respond_to, Ok(item));
                }
                ResourceRequest::List { respond_to } => {
                    debug!(entity_type, size = self.store.len(), "List");
                    Self::reply(respond_to, Ok(self.store.values().cloned().collect()));
                }
                ResourceRequest::Update {
                    id,
                    update,
                    respond_to,
                } => {
                    let result = self.update(id, update, &context).await;
                    Self::reply(respond_to, result);
                }
                ResourceRequest::Delete { id, respond_to } => {
                    let result = self.delete(id, &context).await;
                    Self::reply(respond_to, result);
                }
                ResourceRequest::Action {
                    id,
                    action,
                    respond_to,
                } => {
                    let result = self.act(id, action, &context).await;
                    Self::reply(respond_to, result);
                }
            }
        }

        info!(entity_type, size = self.store.len(), "Shutdown");
    }

    /// Stored copy of `id`, or `NotFound`.
    fn staged(&self, id: &T::Id) -> Result<T, FrameworkError> {
        self.store.get(id).cloned().ok_or_else(|| {
            warn!(entity_type = self.entity_type, %id, "Not found");
            FrameworkError::NotFound(id.to_string())
        })
    }

    async fn create(
        &mut self,
        params: T::Create,
        context: &T::Context,
    ) -> Result<T::Id, FrameworkError> {
        let entity_type = self.entity_type;
        debug!(entity_type, ?params, "Create");

        let id = self.allocate_id();
        let mut item = T::from_create_params(id.clone(), params).map_err(|e| {
            warn!(entity_type, error = %e, "Create rejected");
            entity_error(e)
        })?;
        item.on_create(context).await.map_err(|e| {
            warn!(entity_type, %id, error = %e, "on_create failed");
            entity_error(e)
        })?;

        self.store.insert(id.clone(), item);
        info!(entity_type, %id, size = self.store.len(), "Created");
        Ok(id)
    }

    async fn update(
        &mut self,
        id: T::Id,
        update: T::Update,
        context: &T::Context,
    ) -> Result<T, FrameworkError> {
        let entity_type = self.entity_type;
        debug!(entity_type, %id, ?update, "Update");

        let mut item = self.staged(&id)?;
        item.on_update(update, context).await.map_err(|e| {
            warn!(entity_type, %id, error = %e, "Update rejected");
            entity_error(e)
        })?;

        self.store.insert(id.clone(), item.clone());
        info!(entity_type, %id, "Updated");
        Ok(item)
    }

    async fn delete(&mut self, id: T::Id, context: &T::Context) -> Result<(), FrameworkError> {
        let entity_type = self.entity_type;
        debug!(entity_type, %id, "Delete");

        let item = self.staged(&id)?;
        item.on_delete(context).await.map_err(|e| {
            warn!(entity_type, %id, error = %e, "on_delete failed");
            entity_error(e)
        })?;

        self.store.remove(&id);
        info!(entity_type, %id, size = self.store.len(), "Deleted");
        Ok(())
    }

    async fn act(
        &mut self,
        id: T::Id,
        action: T::Action,
        context: &T::Context,
    ) -> Result<T::ActionResult, FrameworkError> {
        let entity_type = self.entity_type;
        debug!(entity_type, %id, ?action, "Action");

        let mut item = self.staged(&id)?;
        let outcome = item.handle_action(action, context).await.map_err(|e| {
            warn!(entity_type, %id, error = %e, "Action rejected");
            entity_error(e)
        })?;

        self.store.insert(id.clone(), item);
        info!(entity_type, %id, "Action applied");
        Ok(outcome)
    }
}
