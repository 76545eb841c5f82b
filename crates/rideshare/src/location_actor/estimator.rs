//! Distance and cost estimation.

use super::LocationError;
use crate::model::Location;
use async_trait::async_trait;
use std::fmt::Debug;

/// Distance used until a real mapping backend exists.
pub const DEFAULT_DISTANCE_MILES: f64 = 5.3;

/// Price per mile offered by the booking screen.
pub const DEFAULT_PRICE_PER_MILE: f64 = 3.5;

/// Miles between two locations.
///
/// A routing backend may be slow or down; it reports that as
/// [`LocationError::Estimator`].
#[async_trait]
pub trait DistanceEstimator: Send + Sync + Debug {
    async fn estimate_miles(&self, from: &Location, to: &Location)
        -> Result<f64, LocationError>;
}

/// Returns the same distance for every pair.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedDistanceEstimator(pub f64);

impl Default for FixedDistanceEstimator {
    fn default() -> Self {
        Self(DEFAULT_DISTANCE_MILES)
    }
}

#[async_trait]
impl DistanceEstimator for FixedDistanceEstimator {
    async fn estimate_miles(
        &self,
        _from: &Location,
        _to: &Location,
    ) -> Result<f64, LocationError> {
        Ok(self.0)
    }
}

/// `distance_miles * price_per_mile`, nothing more.
///
/// Zero, negative and non-finite inputs pass straight through; callers that
/// take the price from user input should go through
/// [`LocationClient::quote`](crate::clients::LocationClient::quote) instead.
pub fn estimate_cost(distance_miles: f64, price_per_mile: f64) -> f64 {
    distance_miles * price_per_mile
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cost_is_distance_times_rate() {
        assert!((estimate_cost(5.3, 3.5) - 18.55).abs() < 1e-9);
        assert_eq!(estimate_cost(5.3, 0.0), 0.0);
        assert!(estimate_cost(5.3, -1.0) < 0.0);
    }
}
