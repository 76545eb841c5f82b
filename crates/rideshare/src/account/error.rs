//! Error types for the account service.

use super::hashing::HashError;
use super::store::StoreError;
use crate::error::{ErrorKind, ValidationError};
use crate::model::AccountId;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AccountError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Username is already taken")]
    UsernameTaken,

    /// Unknown user, wrong secret and wrong role all look like this.
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Account not found: {0}")]
    NotFound(AccountId),

    #[error("{0} is not a driver")]
    NotADriver(AccountId),

    #[error("Credential store unavailable: {0}")]
    Storage(#[source] StoreError),

    #[error("Secret hashing unavailable: {0}")]
    Hashing(String),
}

impl AccountError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            AccountError::Validation(_) => ErrorKind::Validation,
            AccountError::UsernameTaken => ErrorKind::Conflict,
            AccountError::InvalidCredentials => ErrorKind::Authentication,
            AccountError::NotFound(_) => ErrorKind::NotFound,
            AccountError::NotADriver(_) => ErrorKind::AuthorizationFailure,
            AccountError::Storage(_) | AccountError::Hashing(_) => ErrorKind::StorageUnavailable,
        }
    }
}

impl From<StoreError> for AccountError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::Duplicate => AccountError::UsernameTaken,
            other => AccountError::Storage(other),
        }
    }
}

impl From<HashError> for AccountError {
    fn from(e: HashError) -> Self {
        AccountError::Hashing(e.to_string())
    }
}
