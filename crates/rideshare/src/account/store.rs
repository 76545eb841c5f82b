//! The credential store seam.
//!
//! A store persists accounts and driver profiles. Each method is one atomic
//! unit; uniqueness of the case-folded username is the store's job.

use crate::model::{Account, AccountId, DriverProfile, Role};
use async_trait::async_trait;
use thiserror::Error;

/// A validated account ready to insert.
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub username: String,
    /// Case-folded username; unique across the store.
    pub username_key: String,
    pub secret_hash: String,
    pub role: Role,
}

/// An account together with its secret hash, for authentication only.
#[derive(Debug, Clone)]
pub struct StoredAccount {
    pub account: Account,
    pub secret_hash: String,
}

/// Column-level changes; `None` leaves a column alone.
#[derive(Debug, Clone, Default)]
pub struct AccountChanges {
    pub username: Option<(String, String)>,
    pub secret_hash: Option<String>,
    pub role: Option<Role>,
}

/// New value for a driver's availability flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Availability {
    Toggle,
    Set(bool),
}

#[derive(Debug, Error)]
pub enum StoreError {
    /// The case-folded username is already taken.
    #[error("username already exists")]
    Duplicate,

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("cannot prepare database location: {0}")]
    Io(#[from] std::io::Error),

    #[error("corrupt record: {0}")]
    Corrupt(String),
}

#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Inserts the account, plus an empty driver profile for drivers.
    async fn insert(&self, account: NewAccount) -> Result<Account, StoreError>;

    async fn find_by_username(&self, username_key: &str)
        -> Result<Option<StoredAccount>, StoreError>;

    async fn find_by_id(&self, id: AccountId) -> Result<Option<Account>, StoreError>;

    /// Applies `changes`, keeping the driver profile in step with the role.
    /// `Ok(None)` when the account does not exist.
    async fn update(
        &self,
        id: AccountId,
        changes: AccountChanges,
    ) -> Result<Option<Account>, StoreError>;

    async fn driver_profile(&self, id: AccountId) -> Result<Option<DriverProfile>, StoreError>;

    async fn set_plate_number(
        &self,
        id: AccountId,
        plate_number: &str,
    ) -> Result<Option<DriverProfile>, StoreError>;

    async fn set_availability(
        &self,
        id: AccountId,
        availability: Availability,
    ) -> Result<Option<DriverProfile>, StoreError>;
}
