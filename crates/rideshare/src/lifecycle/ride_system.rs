use crate::account::{
    AccountError, AccountService, HashError, SecretHasher, SqliteCredentialStore, StoreError,
    SupportSink, TracingSupportSink,
};
use crate::clients::{LocationClient, PaymentClient, RideClient};
use crate::clock::{Clock, SystemClock};
use crate::config::RideshareConfig;
use crate::location_actor::{DistanceEstimator, FixedDistanceEstimator, LocationError};
use crate::payment_actor::{PaymentProcessor, SimulatedProcessor};
use crate::{location_actor, payment_actor, ride_actor};
use std::sync::Arc;
use thiserror::Error;
use tokio::task::JoinHandle;
use tracing::{error, info};

#[derive(Debug, Error)]
pub enum SystemError {
    #[error("Credential store failed: {0}")]
    Store(#[from] StoreError),

    #[error("Invalid hash cost: {0}")]
    HashCost(#[from] HashError),

    #[error("Account service could not start: {0}")]
    Accounts(#[from] AccountError),

    #[error("Location registry could not be seeded: {0}")]
    LocationSeed(#[from] LocationError),

    #[error("Actor task failed: {0}")]
    ActorFailed(String),
}

/// The pluggable pieces of the system.
#[derive(Clone)]
pub struct Collaborators {
    pub clock: Arc<dyn Clock>,
    pub processor: Arc<dyn PaymentProcessor>,
    pub estimator: Arc<dyn DistanceEstimator>,
    pub support: Arc<dyn SupportSink>,
}

impl Default for Collaborators {
    fn default() -> Self {
        Self {
            clock: Arc::new(SystemClock),
            processor: Arc::new(SimulatedProcessor::default()),
            estimator: Arc::new(FixedDistanceEstimator::default()),
            support: Arc::new(TracingSupportSink),
        }
    }
}

/// Owns the running services of one session.
///
/// - **Accounts**: [`AccountService`] over the SQLite credential store
/// - **Payment Actor**: session payment methods, behind [`PaymentClient`]
/// - **Location Actor**: seeded locations, behind [`LocationClient`]
/// - **Ride Actor**: ride requests, behind [`RideClient`], which charges
///   through the payment client
///
/// ```ignore
/// let system = RideshareSystem::start(&RideshareConfig::from_env()?).await?;
/// let rider = system.accounts.register("bob", "secret123", Role::Rider).await?;
/// // ...
/// system.shutdown().await?;
/// ```
pub struct RideshareSystem {
    pub accounts: AccountService,
    pub payments: PaymentClient,
    pub locations: LocationClient,
    pub rides: RideClient,
    store: SqliteCredentialStore,
    handles: Vec<JoinHandle<()>>,
}

impl RideshareSystem {
    /// Starts everything with the default collaborators.
    pub async fn start(config: &RideshareConfig) -> Result<Self, SystemError> {
        Self::start_with(config, Collaborators::default()).await
    }

    /// Opens the credential store, then creates, wires and spawns the actors.
    pub async fn start_with(
        config: &RideshareConfig,
        collaborators: Collaborators,
    ) -> Result<Self, SystemError> {
        let store = SqliteCredentialStore::open(&config.database_path).await?;
        let hasher = SecretHasher::new(config.hash_cost)?;
        let accounts = AccountService::new(Arc::new(store.clone()), hasher, collaborators.support);
        accounts.prepare().await?;

        // 1. Create actors (no dependencies)
        let capacity = config.channel_capacity;
        let (payment_actor, payment_inner) = payment_actor::new(capacity);
        let (location_actor, location_inner) = location_actor::new(capacity)?;
        let (ride_actor, ride_inner) = ride_actor::new(capacity);

        // 2. Start actors. None of them needs another actor in its context.
        let handles = vec![
            tokio::spawn(payment_actor.run(())),
            tokio::spawn(location_actor.run(())),
            tokio::spawn(ride_actor.run(())),
        ];

        // 3. Wire the typed clients
        let payments = PaymentClient::new(payment_inner, collaborators.processor, collaborators.clock)
            .with_processor_timeout(config.processor_timeout());
        let locations = LocationClient::new(location_inner, collaborators.estimator);
        let rides = RideClient::new(ride_inner, Arc::new(payments.clone()));

        info!(database = %config.database_path.display(), "System started");
        Ok(Self {
            accounts,
            payments,
            locations,
            rides,
            store,
            handles,
        })
    }

    /// Drops every client, waits for the actors to drain, then closes the store.
    ///
    /// Clones of the clients held elsewhere keep their actors alive; drop them first.
    pub async fn shutdown(self) -> Result<(), SystemError> {
        info!("Shutting down system...");
        let Self {
            accounts,
            payments,
            locations,
            rides,
            store,
            handles,
        } = self;

        drop(rides);
        drop(payments);
        drop(locations);
        drop(accounts);

        for handle in handles {
            if let Err(e) = handle.await {
                error!("Actor task failed: {:?}", e);
                return Err(SystemError::ActorFailed(e.to_string()));
            }
        }

        store.close().await;
        info!("System shutdown complete.");
        Ok(())
    }
}
