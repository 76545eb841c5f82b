//! Error types for the payment registry.

use crate::error::{ErrorKind, ValidationError};
use crate::model::MethodId;
use crate::payment_actor::ProcessorError;
use actor_framework::FrameworkError;
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum PaymentError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Payment method not found: {0}")]
    NotFound(String),

    /// Charge or refund against a method that is not in the registry.
    #[error("Invalid payment method: {0}")]
    InvalidMethod(MethodId),

    /// Amount was zero, negative or NaN.
    #[error("Invalid amount: {0}")]
    InvalidAmount(f64),

    #[error("Payment processor refused: {0}")]
    Processor(#[from] ProcessorError),

    #[error("Payment processor timed out")]
    ProcessorTimeout,

    #[error("Payment registry unavailable: {0}")]
    Unavailable(String),
}

impl PaymentError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            PaymentError::Validation(_) | PaymentError::InvalidAmount(_) => ErrorKind::Validation,
            PaymentError::NotFound(_) => ErrorKind::NotFound,
            PaymentError::InvalidMethod(_)
            | PaymentError::Processor(_)
            | PaymentError::ProcessorTimeout => ErrorKind::AuthorizationFailure,
            PaymentError::Unavailable(_) => ErrorKind::StorageUnavailable,
        }
    }

    pub fn from_framework(e: FrameworkError) -> Self {
        match e {
            FrameworkError::NotFound(id) => PaymentError::NotFound(id),
            other => other
                .into_entity_error::<PaymentError>()
                .unwrap_or_else(|e| PaymentError::Unavailable(e.to_string())),
        }
    }
}
