//! # Location Actor
//!
//! Registry of named places, pre-populated with the three built-in locations.
//!
//! - [`entity`] - [`ActorEntity`](actor_framework::ActorEntity) implementation for [`Location`]
//! - [`error`] - [`LocationError`]
//! - [`estimator`] - [`DistanceEstimator`] and [`estimate_cost`]
//! - [`new()`] - creates the seeded actor and its generic client

pub mod entity;
pub mod error;
pub mod estimator;

pub use error::*;
pub use estimator::*;

use crate::model::{Location, LocationCreate};
use actor_framework::{ResourceActor, ResourceClient};

/// The locations every session starts with, in listing order.
pub fn default_locations() -> Vec<LocationCreate> {
    vec![
        LocationCreate::new("131 Park Ave", "School"),
        LocationCreate::new("22 Main St", "Home"),
        LocationCreate::new("44 State Rd", "Work"),
    ]
}

/// Creates a location actor seeded with [`default_locations`], and its client.
pub fn new(
    buffer_size: usize,
) -> Result<(ResourceActor<Location>, ResourceClient<Location>), LocationError> {
    ResourceActor::with_seed(buffer_size, default_locations())
}
