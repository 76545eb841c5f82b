//! Error taxonomy shared by every service.
//!
//! Each service has its own error enum (`AccountError`, `PaymentError`,
//! `LocationError`, `RideError`); all of them report an [`ErrorKind`] through
//! `.kind()` so callers can branch on the category without matching variants.

use thiserror::Error;

/// Coarse category of a service failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Malformed input: card format, empty fields, bad price.
    Validation,
    /// Uniqueness or state conflict, e.g. a taken username.
    Conflict,
    /// Generic credential failure. Never says which part was wrong.
    Authentication,
    NotFound,
    /// Payment or permission refused.
    AuthorizationFailure,
    /// Database, hashing infrastructure or a stopped registry.
    StorageUnavailable,
}

/// Input rejected before any state was touched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("card number must be exactly 16 digits")]
    InvalidCardNumber,

    #[error("CVV must be exactly 3 digits")]
    InvalidCvv,

    #[error("expiration must be MM/YY and not before the current month")]
    InvalidExpiration,

    #[error("{0} must not be empty")]
    EmptyField(&'static str),

    #[error("unknown role: {0}")]
    InvalidRole(String),

    #[error("price per mile must be a positive number")]
    InvalidPrice,
}

impl ValidationError {
    pub fn kind(&self) -> ErrorKind {
        ErrorKind::Validation
    }
}
