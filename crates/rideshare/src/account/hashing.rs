//! Argon2id secret hashing.
//!
//! Hashes are PHC strings (`$argon2id$v=19$m=...`), so each one carries its
//! own salt and cost and stays verifiable after [`HashCost`] changes.

use argon2::password_hash::{self, PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::{Algorithm, Argon2, Params, Version};
use rand::RngCore;
use serde::Deserialize;
use thiserror::Error;

/// Argon2 cost parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct HashCost {
    /// Memory in KiB.
    pub memory_kib: u32,
    pub iterations: u32,
    pub parallelism: u32,
}

impl Default for HashCost {
    fn default() -> Self {
        Self {
            memory_kib: 1 << 12,
            iterations: 3,
            parallelism: 1,
        }
    }
}

impl HashCost {
    /// Smallest cost Argon2 accepts. For tests only.
    pub fn minimal() -> Self {
        Self {
            memory_kib: 8,
            iterations: 1,
            parallelism: 1,
        }
    }
}

#[derive(Debug, Error)]
pub enum HashError {
    #[error("invalid hash cost: {0}")]
    Cost(argon2::Error),

    #[error("hashing failed: {0}")]
    Hash(password_hash::Error),

    /// A stored hash that is not a readable PHC string.
    #[error("stored hash is malformed: {0}")]
    Malformed(password_hash::Error),
}

/// Hashes and verifies secrets with one fixed [`HashCost`].
///
/// Both operations are CPU-bound; async callers run them on
/// `tokio::task::spawn_blocking`.
#[derive(Clone)]
pub struct SecretHasher {
    argon: Argon2<'static>,
}

impl std::fmt::Debug for SecretHasher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SecretHasher").finish_non_exhaustive()
    }
}

impl SecretHasher {
    pub fn new(cost: HashCost) -> Result<Self, HashError> {
        let params = Params::new(cost.memory_kib, cost.iterations, cost.parallelism, None)
            .map_err(HashError::Cost)?;
        Ok(Self {
            argon: Argon2::new(Algorithm::Argon2id, Version::V0x13, params),
        })
    }

    /// Hashes `secret` under a fresh 16-byte random salt.
    pub fn hash(&self, secret: &str) -> Result<String, HashError> {
        let mut salt = [0u8; 16];
        rand::thread_rng().fill_bytes(&mut salt);
        let salt = SaltString::encode_b64(&salt).map_err(HashError::Hash)?;
        let hash = self
            .argon
            .hash_password(secret.as_bytes(), &salt)
            .map_err(HashError::Hash)?;
        Ok(hash.to_string())
    }

    /// Constant-time comparison of `secret` against a stored PHC string.
    pub fn verify(&self, secret: &str, stored: &str) -> Result<bool, HashError> {
        let parsed = PasswordHash::new(stored).map_err(HashError::Malformed)?;
        match self.argon.verify_password(secret.as_bytes(), &parsed) {
            Ok(()) => Ok(true),
            Err(password_hash::Error::Password) => Ok(false),
            Err(e) => Err(HashError::Hash(e)),
        }
    }
}
