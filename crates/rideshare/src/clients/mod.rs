//! Typed wrappers around [`ResourceClient`](actor_framework::ResourceClient).

pub mod location_client;
pub mod payment_client;
pub mod ride_client;

pub use location_client::*;
pub use payment_client::*;
pub use ride_client::*;
