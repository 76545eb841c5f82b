//! # Rideshare
//!
//! Ride requests and payment authorization for a ride-booking client, built
//! on the resource actors of [`actor_framework`].
//!
//! ## Services
//!
//! | Service | Backing | Entry point |
//! |---|---|---|
//! | Accounts and driver profiles | SQLite ([`account::SqliteCredentialStore`]) | [`account::AccountService`] |
//! | Payment methods | [`payment_actor`] | [`clients::PaymentClient`] |
//! | Locations and pricing | [`location_actor`] | [`clients::LocationClient`] |
//! | Ride requests | [`ride_actor`] | [`clients::RideClient`] |
//!
//! [`lifecycle::RideshareSystem`] starts them all from a
//! [`config::RideshareConfig`] and stops them in order.
//!
//! ## Ride states
//!
//! ```text
//! Quoted ──charge ok──▶ Authorized ──cancel──▶ Cancelling ──refund ok──▶ Cancelled
//!   │                                              │
//!   └──no method / bad amount / declined──▶ Rejected  └──refund failed──▶ Authorized
//! ```
//!
//! A ride is charged at most once. Processor calls are made by the clients,
//! never from inside an actor loop.
//!
//! ## Errors
//!
//! Each service has its own error enum; all of them map onto
//! [`error::ErrorKind`] through `.kind()`.
//!
//! ### Running the Demo
//!
//! ```bash
//! RUST_LOG=info cargo run -p rideshare
//! ```

pub mod account;
pub mod clients;
pub mod clock;
pub mod config;
pub mod error;
pub mod lifecycle;
pub mod location_actor;
pub mod model;
pub mod payment_actor;
pub mod ride_actor;
