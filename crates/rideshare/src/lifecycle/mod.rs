//! # System Lifecycle
//!
//! Starting, wiring and stopping the services.
//!
//! ## Startup
//!
//! [`RideshareSystem::start`] opens the credential store, creates each
//! registry actor with its client, spawns the actors and only then wires the
//! typed clients together (the ride client gets the payment client). Nothing
//! is global: every caller works through the clients the system hands out.
//!
//! ## Graceful Shutdown
//!
//! 1. **Drop all clients**: closes the sender side of each channel
//! 2. **Actors detect closure**: `receiver.recv()` returns `None` once the queue is drained
//! 3. **Await completion**: every actor task is joined
//! 4. **Close the store**: the SQLite pool is closed last
//!
//! The dependency graph is acyclic (rides → payments), so channel closure is
//! enough to stop every actor.
//!
//! ## Observability
//!
//! [`setup_tracing`] installs the subscriber used by the binary.

pub mod ride_system;
pub mod tracing;

pub use ride_system::*;
pub use tracing::*;
