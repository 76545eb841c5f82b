//! Error types for the location registry.

use crate::error::{ErrorKind, ValidationError};
use actor_framework::FrameworkError;
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum LocationError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Location not found: {0}")]
    NotFound(String),

    #[error("Location registry unavailable: {0}")]
    Unavailable(String),

    #[error("Distance estimate failed: {0}")]
    Estimator(String),
}

impl LocationError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            LocationError::Validation(_) => ErrorKind::Validation,
            LocationError::NotFound(_) => ErrorKind::NotFound,
            LocationError::Unavailable(_) | LocationError::Estimator(_) => {
                ErrorKind::StorageUnavailable
            }
        }
    }

    pub fn from_framework(e: FrameworkError) -> Self {
        match e {
            FrameworkError::NotFound(id) => LocationError::NotFound(id),
            other => other
                .into_entity_error::<LocationError>()
                .unwrap_or_else(|e| LocationError::Unavailable(e.to_string())),
        }
    }
}
