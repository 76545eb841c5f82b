//! # Accounts
//!
//! Durable accounts live in a [`CredentialStore`], not in an actor: SQLite
//! already serializes writes, and the UNIQUE index on the case-folded
//! username decides concurrent registrations.
//!
//! ## Structure
//!
//! - [`service`] - [`AccountService`]: register, authenticate, profile and driver operations
//! - [`store`] - the [`CredentialStore`] trait and its record types
//! - [`sqlite_store`] - [`SqliteCredentialStore`]
//! - [`hashing`] - Argon2id [`SecretHasher`] and its [`HashCost`]
//! - [`support`] - [`SupportSink`] for support tickets
//! - [`error`] - [`AccountError`]
//!
//! ## Usage
//!
//! ```rust,ignore
//! let store = SqliteCredentialStore::open(Path::new("./data/app.db")).await?;
//! let accounts = AccountService::new(
//!     Arc::new(store),
//!     SecretHasher::new(HashCost::default())?,
//!     Arc::new(TracingSupportSink),
//! );
//!
//! let id = accounts.register("bob", "secret123", Role::Rider).await?;
//! assert_eq!(accounts.authenticate("BOB", "secret123", Role::Rider).await?, id);
//! ```

pub mod error;
pub mod hashing;
pub mod service;
pub mod sqlite_store;
pub mod store;
pub mod support;

pub use error::*;
pub use hashing::*;
pub use service::*;
pub use sqlite_store::*;
pub use store::*;
pub use support::*;
