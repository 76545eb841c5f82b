//! # Mock Clients & Testing Guide
//!
//! [`MockClient`] hands out a real [`ResourceClient`] whose requests are
//! answered from a queue of scripted expectations instead of a running
//! actor. Use it to test the typed registry clients and anything built on top
//! of them.
//!
//! | | MockClient | Real actor |
//! |---|---|---|
//! | State | scripted replies | real records |
//! | Error injection | `return_err(...)` | needs a crafted state |
//! | Use case | logic *around* a client | the entity and the full system |
//!
//! ## Testing Strategies
//!
//! 1. **Pure mock**: script the replies, call the typed client, assert.
//! 2. **Single actor**: spawn `ResourceActor::new(..).run(ctx)` and drive it.
//! 3. **Actor with mocked dependencies**: a real actor whose context holds
//!    mock clients or fake trait objects.
//! 4. **Full system**: start everything through the system wiring.
//!
//! ```rust,ignore
//! let mut mock = MockClient::<Location>::new();
//! mock.expect_get(LocationId(1)).return_ok(Some(home.clone()));
//! mock.expect_get(LocationId(2)).return_ok(None);
//!
//! let locations = LocationClient::new(mock.client(), estimator);
//! let err = locations.estimate_distance(LocationId(1), LocationId(2)).await.unwrap_err();
//! assert!(matches!(err, LocationError::NotFound(_)));
//! mock.verify();
//! ```
//!
//! For step-by-step control over each reply use [`create_mock_client`] with
//! the `expect_*` helpers at the bottom of this module.

use crate::client::ResourceClient;
use crate::entity::ActorEntity;
use crate::error::FrameworkError;
use crate::message::ResourceRequest;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use tokio::sync::{mpsc, oneshot};

// =============================================================================
// EXPECTATION BUILDER API
// =============================================================================

/// One scripted request/reply pair.
enum Expectation<T: ActorEntity> {
    Create {
        response: Result<T::Id, FrameworkError>,
    },
    Get {
        id: T::Id,
        response: Result<Option<T>, FrameworkError>,
    },
    List {
        response: Result<Vec<T>, FrameworkError>,
    },
    Update {
        id: T::Id,
        response: Result<T, FrameworkError>,
    },
    Delete {
        id: T::Id,
        response: Result<(), FrameworkError>,
    },
    Action {
        id: T::Id,
        response: Result<T::ActionResult, FrameworkError>,
    },
}

impl<T: ActorEntity> Expectation<T> {
    fn describe(&self) -> String {
        match self {
            Expectation::Create { .. } => "Create".to_string(),
            Expectation::Get { id, .. } => format!("Get({id})"),
            Expectation::List { .. } => "List".to_string(),
            Expectation::Update { id, .. } => format!("Update({id})"),
            Expectation::Delete { id, .. } => format!("Delete({id})"),
            Expectation::Action { id, .. } => format!("Action({id})"),
        }
    }
}

fn describe_request<T: ActorEntity>(request: &ResourceRequest<T>) -> String {
    match request {
        ResourceRequest::Create { .. } => "Create".to_string(),
        ResourceRequest::Get { id, .. } => format!("Get({id})"),
        ResourceRequest::List { .. } => "List".to_string(),
        ResourceRequest::Update { id, .. } => format!("Update({id})"),
        ResourceRequest::Delete { id, .. } => format!("Delete({id})"),
        ResourceRequest::Action { id, .. } => format!("Action({id})"),
    }
}

type Queue<T> = Arc<Mutex<VecDeque<Expectation<T>>>>;

/// A mock client with expectation tracking for fluent testing.
///
/// Requests must arrive in the scripted order. A request that does not match
/// the next expectation gets no reply (the caller sees
/// [`FrameworkError::ActorDropped`]) and is reported by [`MockClient::verify`].
pub struct MockClient<T: ActorEntity> {
    client: ResourceClient<T>,
    expectations: Queue<T>,
    mismatches: Arc<Mutex<Vec<String>>>,
    _handle: tokio::task::JoinHandle<()>,
}

impl<T: ActorEntity> Default for MockClient<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: ActorEntity> MockClient<T> {
    /// Creates a mock with no expectations. Must be called inside a Tokio runtime.
    pub fn new() -> Self {
        let (sender, mut receiver) = mpsc::channel::<ResourceRequest<T>>(100);
        let expectations: Queue<T> = Arc::new(Mutex::new(VecDeque::new()));
        let mismatches = Arc::new(Mutex::new(Vec::new()));
        let queue = expectations.clone();
        let failures = mismatches.clone();

        let handle = tokio::spawn(async move {
            while let Some(request) = receiver.recv().await {
                let next = queue.lock().unwrap().pop_front();

                match (request, next) {
                    (ResourceRequest::Create { respond_to, .. }, Some(Expectation::Create { response })) => {
                        let _ = respond_to.send(response);
                    }
                    (ResourceRequest::Get { id, respond_to }, Some(Expectation::Get { id: want, response }))
                        if id == want =>
                    {
                        let _ = respond_to.send(response);
                    }
                    (ResourceRequest::List { respond_to }, Some(Expectation::List { response })) => {
                        let _ = respond_to.send(response);
                    }
                    (
                        ResourceRequest::Update { id, respond_to, .. },
                        Some(Expectation::Update { id: want, response }),
                    ) if id == want => {
                        let _ = respond_to.send(response);
                    }
                    (ResourceRequest::Delete { id, respond_to }, Some(Expectation::Delete { id: want, response }))
                        if id == want =>
                    {
                        let _ = respond_to.send(response);
                    }
                    (
                        ResourceRequest::Action { id, respond_to, .. },
                        Some(Expectation::Action { id: want, response }),
                    ) if id == want => {
                        let _ = respond_to.send(response);
                    }
                    (request, expected) => {
                        let expected = expected
                            .map(|e| e.describe())
                            .unwrap_or_else(|| "nothing".to_string());
                        failures.lock().unwrap().push(format!(
                            "got {} but expected {}",
                            describe_request(&request),
                            expected
                        ));
                    }
                }
            }
        });

        Self {
            client: ResourceClient::new(sender),
            expectations,
            mismatches,
            _handle: handle,
        }
    }

    /// Returns the client for use in tests.
    pub fn client(&self) -> ResourceClient<T> {
        self.client.clone()
    }

    pub fn expect_create(&mut self) -> ExpectationBuilder<T, T::Id> {
        self.builder(|response| Expectation::Create { response })
    }

    pub fn expect_get(&mut self, id: T::Id) -> ExpectationBuilder<T, Option<T>> {
        self.builder(move |response| Expectation::Get { id, response })
    }

    pub fn expect_list(&mut self) -> ExpectationBuilder<T, Vec<T>> {
        self.builder(|response| Expectation::List { response })
    }

    pub fn expect_update(&mut self, id: T::Id) -> ExpectationBuilder<T, T> {
        self.builder(move |response| Expectation::Update { id, response })
    }

    pub fn expect_delete(&mut self, id: T::Id) -> ExpectationBuilder<T, ()> {
        self.builder(move |response| Expectation::Delete { id, response })
    }

    pub fn expect_action(&mut self, id: T::Id) -> ExpectationBuilder<T, T::ActionResult> {
        self.builder(move |response| Expectation::Action { id, response })
    }

    fn builder<R>(
        &self,
        make: impl FnOnce(Result<R, FrameworkError>) -> Expectation<T> + Send + 'static,
    ) -> ExpectationBuilder<T, R> {
        ExpectationBuilder {
            expectations: self.expectations.clone(),
            make: Box::new(make),
        }
    }

    /// Panics if an expectation is unmet or a request arrived out of script.
    pub fn verify(&self) {
        let mismatches = self.mismatches.lock().unwrap();
        if !mismatches.is_empty() {
            panic!("Unexpected requests: {}", mismatches.join("; "));
        }
        let remaining = self.expectations.lock().unwrap();
        if !remaining.is_empty() {
            let pending: Vec<String> = remaining.iter().map(|e| e.describe()).collect();
            panic!("Not all expectations were met: {}", pending.join(", "));
        }
    }
}

/// Completes an expectation with its scripted reply.
pub struct ExpectationBuilder<T: ActorEntity, R> {
    expectations: Queue<T>,
    make: Box<dyn FnOnce(Result<R, FrameworkError>) -> Expectation<T> + Send>,
}

impl<T: ActorEntity, R> ExpectationBuilder<T, R> {
    /// Replies with `Ok(value)`.
    pub fn return_ok(self, value: R) {
        self.push(Ok(value));
    }

    /// Replies with `Err(error)`.
    pub fn return_err(self, error: FrameworkError) {
        self.push(Err(error));
    }

    fn push(self, response: Result<R, FrameworkError>) {
        let expectation = (self.make)(response);
        self.expectations.lock().unwrap().push_back(expectation);
    }
}

// =============================================================================
// STEP-BY-STEP HELPERS
// =============================================================================

/// Creates a client whose requests land on a receiver the test controls.
///
/// Pair it with [`expect_create`], [`expect_get`] and [`expect_action`] to
/// inspect each request payload before replying.
pub fn create_mock_client<T: ActorEntity>(
    buffer_size: usize,
) -> (ResourceClient<T>, mpsc::Receiver<ResourceRequest<T>>) {
    let (sender, receiver) = mpsc::channel(buffer_size);
    (ResourceClient::new(sender), receiver)
}

/// Next message, if it is a Create request.
pub async fn expect_create<T: ActorEntity>(
    receiver: &mut mpsc::Receiver<ResourceRequest<T>>,
) -> Option<(T::Create, oneshot::Sender<Result<T::Id, FrameworkError>>)> {
    match receiver.recv().await {
        Some(ResourceRequest::Create { params, respond_to }) => Some((params, respond_to)),
        _ => None,
    }
}

/// Next message, if it is a Get request.
pub async fn expect_get<T: ActorEntity>(
    receiver: &mut mpsc::Receiver<ResourceRequest<T>>,
) -> Option<(T::Id, oneshot::Sender<Result<Option<T>, FrameworkError>>)> {
    match receiver.recv().await {
        Some(ResourceRequest::Get { id, respond_to }) => Some((id, respond_to)),
        _ => None,
    }
}

/// Next message, if it is an Update request.
pub async fn expect_update<T: ActorEntity>(
    receiver: &mut mpsc::Receiver<ResourceRequest<T>>,
) -> Option<(T::Id, T::Update, oneshot::Sender<Result<T, FrameworkError>>)> {
    match receiver.recv().await {
        Some(ResourceRequest::Update {
            id,
            update,
            respond_to,
        }) => Some((id, update, respond_to)),
        _ => None,
    }
}

/// Next message, if it is an Action request.
pub async fn expect_action<T: ActorEntity>(
    receiver: &mut mpsc::Receiver<ResourceRequest<T>>,
) -> Option<(
    T::Id,
    T::Action,
    oneshot::Sender<Result<T::ActionResult, FrameworkError>>,
)> {
    match receiver.recv().await {
        Some(ResourceRequest::Action {
            id,
            action,
            respond_to,
        }) => Some((id, action, respond_to)),
        _ => None,
    }
}
