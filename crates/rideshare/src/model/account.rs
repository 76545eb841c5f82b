//! Account records as returned by the [`AccountService`](crate::account::AccountService).
//!
//! These never carry the secret or its hash.

use crate::error::ValidationError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::str::FromStr;

/// Row id of an account in the credential store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct AccountId(pub i64);

impl Display for AccountId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "account_{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    Driver,
    Rider,
}

impl Role {
    /// Stored form.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Driver => "Driver",
            Role::Rider => "Rider",
        }
    }
}

impl Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = ValidationError;

    /// Case-insensitive.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "driver" => Ok(Role::Driver),
            "rider" => Ok(Role::Rider),
            _ => Err(ValidationError::InvalidRole(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Account {
    pub id: AccountId,
    /// Trimmed, case as registered.
    pub username: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

/// Present exactly when the account's role is [`Role::Driver`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DriverProfile {
    pub driver_id: AccountId,
    pub plate_number: String,
    pub available: bool,
}

/// Requested profile changes. Empty strings count as "leave unchanged".
#[derive(Default, Clone)]
pub struct ProfileChanges {
    pub username: Option<String>,
    pub secret: Option<String>,
    pub role: Option<Role>,
}

impl std::fmt::Debug for ProfileChanges {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProfileChanges")
            .field("username", &self.username)
            .field("secret", &self.secret.as_ref().map(|_| "***"))
            .field("role", &self.role)
            .finish()
    }
}
