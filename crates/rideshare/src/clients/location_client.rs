//! # Location Client
//!
//! Wraps a `ResourceClient<Location>` and adds distance and price estimation.
use crate::error::ValidationError;
use crate::location_actor::{estimate_cost, DistanceEstimator, LocationError};
use crate::model::{Location, LocationCreate, LocationId, LocationUpdate, RideQuote};
use actor_framework::{ActorClient, FrameworkError, ResourceClient};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, instrument};

/// Client for the location actor. `get`, `list` and `delete` come from
/// [`ActorClient`].
#[derive(Clone)]
pub struct LocationClient {
    inner: ResourceClient<Location>,
    estimator: Arc<dyn DistanceEstimator>,
}

#[async_trait]
impl ActorClient<Location> for LocationClient {
    type Error = LocationError;

    fn inner(&self) -> &ResourceClient<Location> {
        &self.inner
    }

    fn map_error(e: FrameworkError) -> Self::Error {
        LocationError::from_framework(e)
    }
}

impl LocationClient {
    pub fn new(inner: ResourceClient<Location>, estimator: Arc<dyn DistanceEstimator>) -> Self {
        Self { inner, estimator }
    }

    #[instrument(skip(self))]
    pub async fn add(&self, address: &str, label: &str) -> Result<LocationId, LocationError> {
        self.inner
            .create(LocationCreate::new(address, label))
            .await
            .map_err(LocationError::from_framework)
    }

    /// Replaces both the address and the label.
    #[instrument(skip(self))]
    pub async fn update(
        &self,
        id: LocationId,
        address: &str,
        label: &str,
    ) -> Result<Location, LocationError> {
        let update = LocationUpdate {
            address: address.to_string(),
            label: label.to_string(),
        };
        self.inner
            .update(id, update)
            .await
            .map_err(LocationError::from_framework)
    }

    pub async fn remove(&self, id: LocationId) -> Result<(), LocationError> {
        self.delete(id).await
    }

    async fn require(&self, id: LocationId) -> Result<Location, LocationError> {
        self.get(id)
            .await?
            .ok_or_else(|| LocationError::NotFound(id.to_string()))
    }

    /// Miles between two stored locations, from the configured estimator.
    #[instrument(skip(self))]
    pub async fn estimate_distance(
        &self,
        from: LocationId,
        to: LocationId,
    ) -> Result<f64, LocationError> {
        let origin = self.require(from).await?;
        let destination = self.require(to).await?;
        self.estimator.estimate_miles(&origin, &destination).await
    }

    /// See [`estimate_cost`]: no bounds check on either argument.
    pub fn estimate_cost(&self, distance_miles: f64, price_per_mile: f64) -> f64 {
        estimate_cost(distance_miles, price_per_mile)
    }

    /// Prices a trip between two stored locations.
    ///
    /// Unlike [`LocationClient::estimate_cost`], rejects a price per mile that
    /// is not a finite number above zero.
    #[instrument(skip(self))]
    pub async fn quote(
        &self,
        from: LocationId,
        to: LocationId,
        price_per_mile: f64,
    ) -> Result<RideQuote, LocationError> {
        if !price_per_mile.is_finite() || price_per_mile <= 0.0 {
            return Err(ValidationError::InvalidPrice.into());
        }

        let origin = self.require(from).await?;
        let destination = self.require(to).await?;
        let distance_miles = self.estimator.estimate_miles(&origin, &destination).await?;
        let total_cost = estimate_cost(distance_miles, price_per_mile);
        debug!(distance_miles, total_cost, "Quoted");

        Ok(RideQuote {
            origin,
            destination,
            distance_miles,
            price_per_mile,
            total_cost,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::location_actor::FixedDistanceEstimator;
    use actor_framework::mock::{create_mock_client, expect_get, MockClient};

    fn location(id: u32, address: &str, label: &str) -> Location {
        Location {
            id: LocationId(id),
            address: address.into(),
            label: label.into(),
        }
    }

    fn client_for(inner: ResourceClient<Location>) -> LocationClient {
        LocationClient::new(inner, Arc::new(FixedDistanceEstimator::default()))
    }

    #[tokio::test]
    async fn test_quote_prices_the_fixed_distance() {
        let (client, mut receiver) = create_mock_client::<Location>(10);
        let locations = client_for(client);

        let quote_task =
            tokio::spawn(async move { locations.quote(LocationId(2), LocationId(3), 3.5).await });

        let (id, responder) = expect_get(&mut receiver).await.expect("Expected Get");
        assert_eq!(id, LocationId(2));
        responder
            .send(Ok(Some(location(2, "22 Main St", "Home"))))
            .unwrap();

        let (id, responder) = expect_get(&mut receiver).await.expect("Expected Get");
        assert_eq!(id, LocationId(3));
        responder
            .send(Ok(Some(location(3, "44 State Rd", "Work"))))
            .unwrap();

        let quote = quote_task.await.unwrap().unwrap();
        assert_eq!(quote.distance_miles, 5.3);
        assert!((quote.total_cost - 18.55).abs() < 1e-9);
        assert_eq!(quote.destination.label, "Work");
    }

    #[tokio::test]
    async fn test_quote_rejects_bad_price_before_lookup() {
        let mock = MockClient::<Location>::new();
        let locations = client_for(mock.client());

        for price in [0.0, -3.5, f64::NAN, f64::INFINITY] {
            let err = locations
                .quote(LocationId(1), LocationId(2), price)
                .await
                .unwrap_err();
            assert_eq!(err, LocationError::Validation(ValidationError::InvalidPrice));
        }
        mock.verify();
    }

    #[tokio::test]
    async fn test_distance_to_missing_location_is_not_found() {
        let mut mock = MockClient::<Location>::new();
        mock.expect_get(LocationId(1))
            .return_ok(Some(location(1, "131 Park Ave", "School")));
        mock.expect_get(LocationId(7)).return_ok(None);

        let locations = client_for(mock.client());
        let err = locations
            .estimate_distance(LocationId(1), LocationId(7))
            .await
            .unwrap_err();
        assert_eq!(err, LocationError::NotFound("location_7".into()));
        mock.verify();
    }

    #[derive(Debug)]
    struct OfflineRouter;

    #[async_trait]
    impl DistanceEstimator for OfflineRouter {
        async fn estimate_miles(
            &self,
            _from: &Location,
            _to: &Location,
        ) -> Result<f64, LocationError> {
            Err(LocationError::Estimator("routing service offline".into()))
        }
    }

    #[tokio::test]
    async fn test_estimator_failure_reaches_the_caller() {
        let mut mock = MockClient::<Location>::new();
        for _ in 0..2 {
            mock.expect_get(LocationId(2))
                .return_ok(Some(location(2, "22 Main St", "Home")));
            mock.expect_get(LocationId(3))
                .return_ok(Some(location(3, "44 State Rd", "Work")));
        }
        let locations = LocationClient::new(mock.client(), Arc::new(OfflineRouter));

        let err = locations
            .estimate_distance(LocationId(2), LocationId(3))
            .await
            .unwrap_err();
        assert_eq!(err, LocationError::Estimator("routing service offline".into()));
        assert_eq!(err.kind(), crate::error::ErrorKind::StorageUnavailable);

        let err = locations
            .quote(LocationId(2), LocationId(3), 3.5)
            .await
            .unwrap_err();
        assert!(matches!(err, LocationError::Estimator(_)));
        mock.verify();
    }

    #[test]
    fn test_estimate_cost_accepts_any_rate() {
        let (client, _receiver) = create_mock_client::<Location>(1);
        let locations = client_for(client);
        assert_eq!(locations.estimate_cost(5.3, 0.0), 0.0);
        assert!(locations.estimate_cost(5.3, -2.0) < 0.0);
    }
}
