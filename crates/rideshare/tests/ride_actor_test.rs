//! Real ride actor, fake payment registry.
//!
//! The registry counts every charge and refund so the tests can check when
//! the processor would have been reached.

use actor_framework::ActorClient;
use async_trait::async_trait;
use rideshare::clients::{PaymentRegistry, RideClient};
use rideshare::model::{AuthorizationReason, MethodId, PaymentMethod, RideId, RideStatus};
use rideshare::payment_actor::{PaymentError, ProcessorError};
use rideshare::ride_actor::RideError;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;

struct FakeRegistry {
    charge_result: Result<(), PaymentError>,
    refund_result: Result<(), PaymentError>,
    refund_delay: Duration,
    charges: AtomicUsize,
    refunds: AtomicUsize,
}

impl FakeRegistry {
    fn approving() -> Self {
        Self {
            charge_result: Ok(()),
            refund_result: Ok(()),
            refund_delay: Duration::ZERO,
            charges: AtomicUsize::new(0),
            refunds: AtomicUsize::new(0),
        }
    }

    fn charging(result: Result<(), PaymentError>) -> Self {
        Self {
            charge_result: result,
            ..Self::approving()
        }
    }

    fn charges(&self) -> usize {
        self.charges.load(Ordering::SeqCst)
    }

    fn refunds(&self) -> usize {
        self.refunds.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PaymentRegistry for FakeRegistry {
    async fn add(&self, _: &str, _: &str, _: &str) -> Result<MethodId, PaymentError> {
        Ok(MethodId(1))
    }

    async fn update(&self, _: MethodId, _: &str, _: &str, _: &str) -> Result<(), PaymentError> {
        Ok(())
    }

    async fn remove(&self, _: MethodId) -> Result<(), PaymentError> {
        Ok(())
    }

    async fn get(&self, _: MethodId) -> Result<Option<PaymentMethod>, PaymentError> {
        Ok(None)
    }

    async fn list(&self) -> Result<Vec<PaymentMethod>, PaymentError> {
        Ok(Vec::new())
    }

    async fn first(&self) -> Result<Option<MethodId>, PaymentError> {
        Ok(Some(MethodId(7)))
    }

    async fn authorize_charge(&self, _: MethodId, _: f64) -> Result<(), PaymentError> {
        self.charges.fetch_add(1, Ordering::SeqCst);
        self.charge_result.clone()
    }

    async fn authorize_refund(&self, _: MethodId, _: f64) -> Result<(), PaymentError> {
        self.refunds.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(self.refund_delay).await;
        self.refund_result.clone()
    }
}

fn start(registry: Arc<FakeRegistry>) -> (RideClient, JoinHandle<()>) {
    let (actor, inner) = rideshare::ride_actor::new(16);
    let handle = tokio::spawn(actor.run(()));
    (RideClient::new(inner, registry), handle)
}

async fn stop(rides: RideClient, handle: JoinHandle<()>) {
    drop(rides);
    handle.await.unwrap();
}

#[tokio::test]
async fn test_missing_method_is_rejected_without_charging() {
    let registry = Arc::new(FakeRegistry::approving());
    let (rides, handle) = start(registry.clone());

    let outcome = rides.request_ride("44 State Rd", 18.55, 5.3, None).await.unwrap();

    assert!(!outcome.authorized);
    assert_eq!(outcome.reason, AuthorizationReason::MissingPaymentMethod);
    assert_eq!(outcome.ride.status, RideStatus::Rejected);
    assert_eq!(registry.charges(), 0);

    let stored = rides.get(outcome.ride.id).await.unwrap().unwrap();
    assert_eq!(stored.status, RideStatus::Rejected);

    stop(rides, handle).await;
}

#[tokio::test]
async fn test_non_positive_cost_is_rejected_without_charging() {
    let registry = Arc::new(FakeRegistry::approving());
    let (rides, handle) = start(registry.clone());

    for cost in [0.0, -4.0, f64::NAN] {
        let outcome = rides
            .request_ride("44 State Rd", cost, 5.3, Some(MethodId(1)))
            .await
            .unwrap();
        assert!(!outcome.authorized, "cost {cost} was authorized");
        assert_eq!(outcome.reason, AuthorizationReason::InvalidAmount);
    }
    assert_eq!(registry.charges(), 0);

    stop(rides, handle).await;
}

#[tokio::test]
async fn test_approved_charge_authorizes_once() {
    let registry = Arc::new(FakeRegistry::approving());
    let (rides, handle) = start(registry.clone());

    let outcome = rides
        .request_ride("44 State Rd", 18.55, 5.3, Some(MethodId(1)))
        .await
        .unwrap();

    assert!(outcome.authorized);
    assert_eq!(outcome.reason, AuthorizationReason::Approved);
    assert_eq!(registry.charges(), 1);

    let charge = outcome.ride.charge.expect("authorized ride keeps its charge");
    assert_eq!(charge.method, MethodId(1));
    assert_eq!(charge.amount, 18.55);

    stop(rides, handle).await;
}

#[tokio::test]
async fn test_charge_failures_map_to_rejection_reasons() {
    let cases = [
        (
            PaymentError::Processor(ProcessorError::Declined("insufficient funds".into())),
            AuthorizationReason::ChargeDeclined,
        ),
        (PaymentError::ProcessorTimeout, AuthorizationReason::ChargeDeclined),
        (
            PaymentError::InvalidMethod(MethodId(9)),
            AuthorizationReason::InvalidPaymentMethod,
        ),
    ];

    for (error, expected) in cases {
        let registry = Arc::new(FakeRegistry::charging(Err(error)));
        let (rides, handle) = start(registry.clone());

        let outcome = rides
            .request_ride("44 State Rd", 18.55, 5.3, Some(MethodId(9)))
            .await
            .unwrap();

        assert!(!outcome.authorized);
        assert_eq!(outcome.reason, expected);
        assert_eq!(outcome.ride.status, RideStatus::Rejected);
        assert!(outcome.ride.charge.is_none());
        assert_eq!(registry.charges(), 1);

        stop(rides, handle).await;
    }
}

#[tokio::test]
async fn test_unreachable_registry_leaves_ride_quoted() {
    let registry = Arc::new(FakeRegistry::charging(Err(PaymentError::Unavailable(
        "actor stopped".into(),
    ))));
    let (rides, handle) = start(registry);

    let err = rides
        .request_ride("44 State Rd", 18.55, 5.3, Some(MethodId(1)))
        .await
        .unwrap_err();
    assert!(matches!(err, RideError::Payment(PaymentError::Unavailable(_))));

    let stored = rides.list().await.unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].status, RideStatus::Quoted);

    stop(rides, handle).await;
}

#[tokio::test]
async fn test_default_method_is_the_registry_first() {
    let registry = Arc::new(FakeRegistry::approving());
    let (rides, handle) = start(registry.clone());

    let outcome = rides
        .request_ride_with_default_method("22 Main St", 10.0, 2.0)
        .await
        .unwrap();

    assert!(outcome.authorized);
    assert_eq!(outcome.ride.method, Some(MethodId(7)));

    stop(rides, handle).await;
}

#[tokio::test]
async fn test_cancel_refunds_exactly_once() {
    let registry = Arc::new(FakeRegistry::approving());
    let (rides, handle) = start(registry.clone());

    let outcome = rides
        .request_ride("44 State Rd", 18.55, 5.3, Some(MethodId(1)))
        .await
        .unwrap();

    let cancelled = rides.cancel_ride_request(outcome.ride.id).await.unwrap();
    assert_eq!(cancelled.status, RideStatus::Cancelled);
    assert_eq!(registry.refunds(), 1);

    // Already cancelled: nothing happens.
    let again = rides.cancel_ride_request(outcome.ride.id).await.unwrap();
    assert_eq!(again.status, RideStatus::Cancelled);
    assert_eq!(registry.refunds(), 1);

    stop(rides, handle).await;
}

#[tokio::test]
async fn test_concurrent_cancels_refund_once() {
    let registry = Arc::new(FakeRegistry {
        refund_delay: Duration::from_millis(50),
        ..FakeRegistry::approving()
    });
    let (rides, handle) = start(registry.clone());

    let outcome = rides
        .request_ride("44 State Rd", 18.55, 5.3, Some(MethodId(1)))
        .await
        .unwrap();
    let id = outcome.ride.id;

    let (first, second) = tokio::join!(rides.cancel_ride_request(id), rides.cancel_ride_request(id));
    let mut statuses = [first.unwrap().status, second.unwrap().status];
    statuses.sort_by_key(|s| s.to_string());

    assert_eq!(statuses, [RideStatus::Cancelled, RideStatus::Cancelling]);
    assert_eq!(registry.refunds(), 1);

    let stored = rides.get(id).await.unwrap().unwrap();
    assert_eq!(stored.status, RideStatus::Cancelled);

    stop(rides, handle).await;
}

#[tokio::test]
async fn test_failed_refund_restores_authorized() {
    let registry = Arc::new(FakeRegistry {
        refund_result: Err(PaymentError::Processor(ProcessorError::Unavailable(
            "gateway down".into(),
        ))),
        ..FakeRegistry::approving()
    });
    let (rides, handle) = start(registry.clone());

    let outcome = rides
        .request_ride("44 State Rd", 18.55, 5.3, Some(MethodId(1)))
        .await
        .unwrap();

    let err = rides.cancel_ride_request(outcome.ride.id).await.unwrap_err();
    assert!(matches!(err, RideError::RefundFailed(PaymentError::Processor(_))));

    let stored = rides.get(outcome.ride.id).await.unwrap().unwrap();
    assert_eq!(stored.status, RideStatus::Authorized);
    assert!(stored.charge.is_some());

    stop(rides, handle).await;
}

#[tokio::test]
async fn test_cancel_of_unauthorized_rides_is_a_no_op() {
    let registry = Arc::new(FakeRegistry::approving());
    let (rides, handle) = start(registry.clone());

    let rejected = rides.request_ride("44 State Rd", 18.55, 5.3, None).await.unwrap();
    let unchanged = rides.cancel_ride_request(rejected.ride.id).await.unwrap();
    assert_eq!(unchanged.status, RideStatus::Rejected);
    assert_eq!(registry.refunds(), 0);

    let err = rides.cancel_ride_request(RideId(99)).await.unwrap_err();
    assert!(matches!(err, RideError::NotFound(_)));

    stop(rides, handle).await;
}
