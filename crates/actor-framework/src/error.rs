//! # Framework Errors
//!
//! Errors raised by the actor plumbing itself. Domain failures travel inside
//! [`FrameworkError::EntityError`] and are recovered by the typed clients with
//! [`FrameworkError::into_entity_error`].

use std::error::Error as StdError;

/// Errors that can occur within the actor framework itself.
#[derive(Debug, thiserror::Error)]
pub enum FrameworkError {
    #[error("Actor closed")]
    ActorClosed,
    #[error("Actor dropped response channel")]
    ActorDropped,
    #[error("Item not found: {0}")]
    NotFound(String),
    #[error("Entity error: {0}")]
    EntityError(Box<dyn StdError + Send + Sync>),
}

impl FrameworkError {
    /// Recovers the entity's own error type from an [`FrameworkError::EntityError`].
    ///
    /// Returns `Err(self)` unchanged for plumbing errors or when the boxed error
    /// is of a different type, so callers can fall back to their own mapping.
    pub fn into_entity_error<E>(self) -> Result<E, FrameworkError>
    where
        E: StdError + Send + Sync + 'static,
    {
        match self {
            FrameworkError::EntityError(inner) => match inner.downcast::<E>() {
                Ok(err) => Ok(*err),
                Err(other) => Err(FrameworkError::EntityError(other)),
            },
            other => Err(other),
        }
    }

    /// True when the actor behind the client is gone.
    pub fn is_disconnected(&self) -> bool {
        matches!(self, FrameworkError::ActorClosed | FrameworkError::ActorDropped)
    }
}
