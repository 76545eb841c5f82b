//! Registration, authentication and profile management.

use super::hashing::SecretHasher;
use super::store::{AccountChanges, Availability, CredentialStore, NewAccount};
use super::support::{SupportSink, SupportTicket};
use super::AccountError;
use crate::error::ValidationError;
use crate::model::{Account, AccountId, DriverProfile, ProfileChanges, Role};
use chrono::Utc;
use std::sync::Arc;
use tokio::sync::OnceCell;
use tracing::{debug, info, instrument, warn};

/// Trimmed username and its case-folded uniqueness key.
fn normalize_username(raw: &str) -> Result<(String, String), ValidationError> {
    let username = raw.trim();
    if username.is_empty() {
        return Err(ValidationError::EmptyField("username"));
    }
    Ok((username.to_string(), username.to_lowercase()))
}

/// Account operations over a [`CredentialStore`].
///
/// Cheap to clone; clones share the store, hasher and support sink.
#[derive(Clone)]
pub struct AccountService {
    store: Arc<dyn CredentialStore>,
    hasher: SecretHasher,
    support: Arc<dyn SupportSink>,
    /// Verified against when the username is unknown, so both paths cost one Argon2 run.
    dummy_hash: Arc<OnceCell<String>>,
}

impl AccountService {
    pub fn new(
        store: Arc<dyn CredentialStore>,
        hasher: SecretHasher,
        support: Arc<dyn SupportSink>,
    ) -> Self {
        Self {
            store,
            hasher,
            support,
            dummy_hash: Arc::new(OnceCell::new()),
        }
    }

    async fn hash(&self, secret: &str) -> Result<String, AccountError> {
        let hasher = self.hasher.clone();
        let secret = secret.to_owned();
        tokio::task::spawn_blocking(move || hasher.hash(&secret))
            .await
            .map_err(|e| AccountError::Hashing(e.to_string()))?
            .map_err(AccountError::from)
    }

    async fn verify(&self, secret: &str, stored: String) -> Result<bool, AccountError> {
        let hasher = self.hasher.clone();
        let secret = secret.to_owned();
        tokio::task::spawn_blocking(move || hasher.verify(&secret, &stored))
            .await
            .map_err(|e| AccountError::Hashing(e.to_string()))?
            .map_err(AccountError::from)
    }

    async fn dummy_hash(&self) -> Result<String, AccountError> {
        self.dummy_hash
            .get_or_try_init(|| self.hash("unknown-account"))
            .await
            .cloned()
    }

    /// Builds the hash that unknown usernames are verified against.
    ///
    /// Run once at startup so the first failed lookup costs the same as any
    /// other. Later calls return immediately.
    pub async fn prepare(&self) -> Result<(), AccountError> {
        self.dummy_hash().await.map(|_| ())
    }

    /// Creates an account. The username is trimmed; uniqueness ignores case.
    #[instrument(skip(self, secret))]
    pub async fn register(
        &self,
        username: &str,
        secret: &str,
        role: Role,
    ) -> Result<AccountId, AccountError> {
        let (username, username_key) = normalize_username(username)?;
        if secret.is_empty() {
            return Err(ValidationError::EmptyField("secret").into());
        }

        let secret_hash = self.hash(secret).await?;
        let account = self
            .store
            .insert(NewAccount {
                username,
                username_key,
                secret_hash,
                role,
            })
            .await?;

        info!(id = %account.id, role = %account.role, "Account registered");
        Ok(account.id)
    }

    /// Checks username, secret and role together.
    ///
    /// Every failure is the same [`AccountError::InvalidCredentials`].
    #[instrument(skip(self, secret))]
    pub async fn authenticate(
        &self,
        username: &str,
        secret: &str,
        role: Role,
    ) -> Result<AccountId, AccountError> {
        let username_key = username.trim().to_lowercase();
        let Some(stored) = self.store.find_by_username(&username_key).await? else {
            let dummy = self.dummy_hash().await?;
            self.verify(secret, dummy).await?;
            warn!("Authentication failed");
            return Err(AccountError::InvalidCredentials);
        };

        let secret_ok = self.verify(secret, stored.secret_hash).await?;
        if secret_ok && stored.account.role == role {
            info!(id = %stored.account.id, "Authenticated");
            Ok(stored.account.id)
        } else {
            warn!("Authentication failed");
            Err(AccountError::InvalidCredentials)
        }
    }

    pub async fn account(&self, id: AccountId) -> Result<Account, AccountError> {
        self.store
            .find_by_id(id)
            .await?
            .ok_or(AccountError::NotFound(id))
    }

    /// Applies the non-empty fields of `changes`.
    ///
    /// A new secret is re-hashed. Becoming a driver creates an empty driver
    /// profile; becoming a rider removes it.
    #[instrument(skip(self))]
    pub async fn update_profile(
        &self,
        id: AccountId,
        changes: ProfileChanges,
    ) -> Result<Account, AccountError> {
        let username = changes
            .username
            .as_deref()
            .map(str::trim)
            .filter(|u| !u.is_empty())
            .map(|u| (u.to_string(), u.to_lowercase()));

        let secret_hash = match changes.secret.as_deref().filter(|s| !s.is_empty()) {
            Some(secret) => Some(self.hash(secret).await?),
            None => None,
        };

        let updated = self
            .store
            .update(
                id,
                AccountChanges {
                    username,
                    secret_hash,
                    role: changes.role,
                },
            )
            .await?
            .ok_or(AccountError::NotFound(id))?;

        info!(%id, "Profile updated");
        Ok(updated)
    }

    /// Files a support ticket. Never touches account state.
    pub fn contact_support(&self, reason: &str, description: &str) {
        self.support.submit(SupportTicket {
            reason: reason.to_string(),
            description: description.to_string(),
            opened_at: Utc::now(),
        });
    }

    /// Registers the account unless the username already exists.
    ///
    /// Returns whether an account was created.
    pub async fn ensure_seed_account(
        &self,
        username: &str,
        secret: &str,
        role: Role,
    ) -> Result<bool, AccountError> {
        match self.register(username, secret, role).await {
            Ok(_) => Ok(true),
            Err(AccountError::UsernameTaken) => {
                debug!(username, "Seed account already present");
                Ok(false)
            }
            Err(e) => Err(e),
        }
    }

    // --- Driver operations ---

    async fn require_driver(&self, id: AccountId) -> Result<(), AccountError> {
        match self.account(id).await?.role {
            Role::Driver => Ok(()),
            Role::Rider => Err(AccountError::NotADriver(id)),
        }
    }

    pub async fn driver_profile(&self, id: AccountId) -> Result<DriverProfile, AccountError> {
        self.require_driver(id).await?;
        self.store
            .driver_profile(id)
            .await?
            .ok_or(AccountError::NotADriver(id))
    }

    #[instrument(skip(self))]
    pub async fn set_plate_number(
        &self,
        id: AccountId,
        plate_number: &str,
    ) -> Result<DriverProfile, AccountError> {
        self.require_driver(id).await?;
        self.store
            .set_plate_number(id, plate_number)
            .await?
            .ok_or(AccountError::NotADriver(id))
    }

    async fn set_availability(
        &self,
        id: AccountId,
        availability: Availability,
    ) -> Result<DriverProfile, AccountError> {
        self.require_driver(id).await?;
        let profile = self
            .store
            .set_availability(id, availability)
            .await?
            .ok_or(AccountError::NotADriver(id))?;
        info!(%id, available = profile.available, "Driver availability changed");
        Ok(profile)
    }

    pub async fn toggle_availability(&self, id: AccountId) -> Result<DriverProfile, AccountError> {
        self.set_availability(id, Availability::Toggle).await
    }

    /// Taking a ride makes the driver unavailable.
    pub async fn accept_ride(&self, id: AccountId) -> Result<DriverProfile, AccountError> {
        self.set_availability(id, Availability::Set(false)).await
    }

    /// Finishing a ride makes the driver available again.
    pub async fn complete_ride(&self, id: AccountId) -> Result<DriverProfile, AccountError> {
        self.set_availability(id, Availability::Set(true)).await
    }
}
