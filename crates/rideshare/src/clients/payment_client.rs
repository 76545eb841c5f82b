//! # Payment Client
//!
//! The session's payment registry. Wraps a `ResourceClient<PaymentMethod>`,
//! validates card input against a [`Clock`] before anything is stored, and
//! gates every processor call.
use crate::clock::Clock;
use crate::model::{MethodId, PaymentDetails, PaymentMethod};
use crate::payment_actor::{PaymentError, PaymentProcessor, ProcessorContext};
use actor_framework::ResourceClient;
use async_trait::async_trait;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

/// Operations the ride orchestrator and the UI need from a payment registry.
///
/// Implemented by [`PaymentClient`]; tests substitute their own.
#[async_trait]
pub trait PaymentRegistry: Send + Sync {
    /// Validates (card number, then CVV, then expiration) and stores a method.
    async fn add(&self, card_number: &str, cvv: &str, expiration: &str)
        -> Result<MethodId, PaymentError>;

    /// Validates like [`PaymentRegistry::add`] and replaces the stored fields.
    async fn update(
        &self,
        id: MethodId,
        card_number: &str,
        cvv: &str,
        expiration: &str,
    ) -> Result<(), PaymentError>;

    async fn remove(&self, id: MethodId) -> Result<(), PaymentError>;

    async fn get(&self, id: MethodId) -> Result<Option<PaymentMethod>, PaymentError>;

    /// All methods, oldest first.
    async fn list(&self) -> Result<Vec<PaymentMethod>, PaymentError>;

    /// The oldest method still registered.
    async fn first(&self) -> Result<Option<MethodId>, PaymentError>;

    /// Charges `amount` to a registered method.
    ///
    /// The method must exist and `amount` must be greater than zero; only
    /// then is the processor called.
    async fn authorize_charge(&self, id: MethodId, amount: f64) -> Result<(), PaymentError>;

    /// Refunds `amount`, with the same preconditions as a charge.
    async fn authorize_refund(&self, id: MethodId, amount: f64) -> Result<(), PaymentError>;
}

/// Client for the payment actor.
#[derive(Clone)]
pub struct PaymentClient {
    inner: ResourceClient<PaymentMethod>,
    processor: Arc<dyn PaymentProcessor>,
    clock: Arc<dyn Clock>,
    processor_timeout: Option<Duration>,
}

impl PaymentClient {
    pub fn new(
        inner: ResourceClient<PaymentMethod>,
        processor: Arc<dyn PaymentProcessor>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            inner,
            processor,
            clock,
            processor_timeout: None,
        }
    }

    /// Abandon processor calls that take longer than `timeout`.
    pub fn with_processor_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.processor_timeout = timeout;
        self
    }

    fn parse(&self, card_number: &str, cvv: &str, expiration: &str) -> Result<PaymentDetails, PaymentError> {
        Ok(PaymentDetails::parse(
            card_number,
            cvv,
            expiration,
            self.clock.today(),
        )?)
    }

    /// Looks up the method a charge or refund is aimed at.
    async fn method_for(&self, id: MethodId, amount: f64) -> Result<PaymentMethod, PaymentError> {
        let method = self
            .inner
            .get(id)
            .await
            .map_err(PaymentError::from_framework)?
            .ok_or(PaymentError::InvalidMethod(id))?;

        // NaN fails this comparison too.
        if !(amount > 0.0) {
            return Err(PaymentError::InvalidAmount(amount));
        }
        Ok(method)
    }

    /// Runs a processor call under the configured deadline.
    ///
    /// Called after the actor has replied; no registry request is pending
    /// while the gateway works.
    async fn call_processor<F>(&self, ctx: ProcessorContext, call: F) -> Result<(), PaymentError>
    where
        F: Future<Output = Result<(), crate::payment_actor::ProcessorError>>,
    {
        let outcome = match ctx.deadline {
            Some(deadline) => tokio::time::timeout_at(deadline, call)
                .await
                .map_err(|_| PaymentError::ProcessorTimeout)?,
            None => call.await,
        };
        outcome.map_err(PaymentError::from)
    }
}

#[async_trait]
impl PaymentRegistry for PaymentClient {
    #[instrument(skip_all)]
    async fn add(
        &self,
        card_number: &str,
        cvv: &str,
        expiration: &str,
    ) -> Result<MethodId, PaymentError> {
        let details = self.parse(card_number, cvv, expiration)?;
        debug!(card = %details.card_number, "Adding payment method");
        let id = self
            .inner
            .create(details)
            .await
            .map_err(PaymentError::from_framework)?;
        info!(%id, "Payment method added");
        Ok(id)
    }

    #[instrument(skip(self, card_number, cvv, expiration))]
    async fn update(
        &self,
        id: MethodId,
        card_number: &str,
        cvv: &str,
        expiration: &str,
    ) -> Result<(), PaymentError> {
        let details = self.parse(card_number, cvv, expiration)?;
        self.inner
            .update(id, details)
            .await
            .map_err(PaymentError::from_framework)?;
        Ok(())
    }

    #[instrument(skip(self))]
    async fn remove(&self, id: MethodId) -> Result<(), PaymentError> {
        self.inner
            .delete(id)
            .await
            .map_err(PaymentError::from_framework)
    }

    #[instrument(skip(self))]
    async fn get(&self, id: MethodId) -> Result<Option<PaymentMethod>, PaymentError> {
        self.inner.get(id).await.map_err(PaymentError::from_framework)
    }

    #[instrument(skip(self))]
    async fn list(&self) -> Result<Vec<PaymentMethod>, PaymentError> {
        self.inner.list().await.map_err(PaymentError::from_framework)
    }

    #[instrument(skip(self))]
    async fn first(&self) -> Result<Option<MethodId>, PaymentError> {
        Ok(self.list().await?.first().map(|m| m.id))
    }

    #[instrument(skip(self))]
    async fn authorize_charge(&self, id: MethodId, amount: f64) -> Result<(), PaymentError> {
        let method = self.method_for(id, amount).await?;
        let ctx = ProcessorContext::with_timeout(self.processor_timeout);
        let result = self
            .call_processor(ctx, self.processor.charge(&method, amount, &ctx))
            .await;
        match &result {
            Ok(()) => info!(card = %method.card_number, "Charge approved"),
            Err(e) => warn!(card = %method.card_number, error = %e, "Charge failed"),
        }
        result
    }

    #[instrument(skip(self))]
    async fn authorize_refund(&self, id: MethodId, amount: f64) -> Result<(), PaymentError> {
        let method = self.method_for(id, amount).await?;
        let ctx = ProcessorContext::with_timeout(self.processor_timeout);
        let result = self
            .call_processor(ctx, self.processor.refund(&method, amount, &ctx))
            .await;
        match &result {
            Ok(()) => info!(card = %method.card_number, "Refund approved"),
            Err(e) => warn!(card = %method.card_number, error = %e, "Refund failed"),
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use crate::error::ValidationError;
    use crate::payment_actor::{ProcessorError, SimulatedProcessor};
    use actor_framework::mock::{create_mock_client, expect_create, MockClient};
    use actor_framework::FrameworkError;
    use chrono::NaiveDate;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Debug, Default)]
    struct CountingProcessor {
        charges: AtomicUsize,
    }

    #[async_trait]
    impl PaymentProcessor for CountingProcessor {
        async fn charge(
            &self,
            _method: &PaymentMethod,
            _amount: f64,
            _ctx: &ProcessorContext,
        ) -> Result<(), ProcessorError> {
            self.charges.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }

        async fn refund(
            &self,
            _method: &PaymentMethod,
            _amount: f64,
            _ctx: &ProcessorContext,
        ) -> Result<(), ProcessorError> {
            Ok(())
        }
    }

    #[derive(Debug)]
    struct StalledProcessor;

    #[async_trait]
    impl PaymentProcessor for StalledProcessor {
        async fn charge(
            &self,
            _method: &PaymentMethod,
            _amount: f64,
            _ctx: &ProcessorContext,
        ) -> Result<(), ProcessorError> {
            std::future::pending().await
        }

        async fn refund(
            &self,
            _method: &PaymentMethod,
            _amount: f64,
            _ctx: &ProcessorContext,
        ) -> Result<(), ProcessorError> {
            std::future::pending().await
        }
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 17).unwrap()
    }

    fn stored_method(id: u32) -> PaymentMethod {
        let details = PaymentDetails::parse("4444333322221111", "123", "11/26", today()).unwrap();
        PaymentMethod::new(MethodId(id), details)
    }

    fn client_with(
        inner: ResourceClient<PaymentMethod>,
        processor: Arc<dyn PaymentProcessor>,
    ) -> PaymentClient {
        PaymentClient::new(inner, processor, Arc::new(FixedClock(today())))
    }

    #[tokio::test]
    async fn test_invalid_card_never_reaches_the_actor() {
        let mock = MockClient::<PaymentMethod>::new();
        let payments = client_with(mock.client(), Arc::new(SimulatedProcessor::default()));

        let err = payments.add("1234", "123", "11/26").await.unwrap_err();
        assert_eq!(err, PaymentError::Validation(ValidationError::InvalidCardNumber));
        assert_eq!(err.kind(), crate::error::ErrorKind::Validation);

        let err = payments.add("4444333322221111", "123", "09/26").await.unwrap_err();
        assert_eq!(err, PaymentError::Validation(ValidationError::InvalidExpiration));

        mock.verify();
    }

    #[tokio::test]
    async fn test_add_sends_parsed_details() {
        let (client, mut receiver) = create_mock_client::<PaymentMethod>(10);
        let payments = client_with(client, Arc::new(SimulatedProcessor::default()));

        let add_task =
            tokio::spawn(async move { payments.add("4444333322221111", "123", "10/26").await });

        let (details, responder) = expect_create(&mut receiver)
            .await
            .expect("Expected Create request");
        assert_eq!(details.card_number.last4(), "1111");
        assert_eq!(details.expiration.month(), 10);
        responder.send(Ok(MethodId(1))).unwrap();

        assert_eq!(add_task.await.unwrap().unwrap(), MethodId(1));
    }

    #[tokio::test]
    async fn test_charge_against_unknown_method_skips_processor() {
        let processor = Arc::new(CountingProcessor::default());
        let mut mock = MockClient::<PaymentMethod>::new();
        mock.expect_get(MethodId(9)).return_ok(None);

        let payments = client_with(mock.client(), processor.clone());
        let err = payments.authorize_charge(MethodId(9), 10.0).await.unwrap_err();

        assert_eq!(err, PaymentError::InvalidMethod(MethodId(9)));
        assert_eq!(processor.charges.load(Ordering::SeqCst), 0);
        mock.verify();
    }

    #[tokio::test]
    async fn test_non_positive_amount_skips_processor() {
        let processor = Arc::new(CountingProcessor::default());
        let mut mock = MockClient::<PaymentMethod>::new();
        for amount in [0.0, -5.0, f64::NAN] {
            mock.expect_get(MethodId(1)).return_ok(Some(stored_method(1)));
            let payments = client_with(mock.client(), processor.clone());
            let err = payments.authorize_charge(MethodId(1), amount).await.unwrap_err();
            assert!(matches!(err, PaymentError::InvalidAmount(_)));
        }
        assert_eq!(processor.charges.load(Ordering::SeqCst), 0);
        mock.verify();
    }

    #[tokio::test]
    async fn test_valid_charge_calls_processor_once() {
        let processor = Arc::new(CountingProcessor::default());
        let mut mock = MockClient::<PaymentMethod>::new();
        mock.expect_get(MethodId(1)).return_ok(Some(stored_method(1)));

        let payments = client_with(mock.client(), processor.clone());
        payments.authorize_charge(MethodId(1), 18.55).await.unwrap();

        assert_eq!(processor.charges.load(Ordering::SeqCst), 1);
        mock.verify();
    }

    #[tokio::test]
    async fn test_stalled_processor_times_out() {
        let mut mock = MockClient::<PaymentMethod>::new();
        mock.expect_get(MethodId(1)).return_ok(Some(stored_method(1)));

        let payments = client_with(mock.client(), Arc::new(StalledProcessor))
            .with_processor_timeout(Some(Duration::from_millis(20)));
        let err = payments.authorize_charge(MethodId(1), 18.55).await.unwrap_err();

        assert_eq!(err, PaymentError::ProcessorTimeout);
        assert_eq!(err.kind(), crate::error::ErrorKind::AuthorizationFailure);
    }

    #[tokio::test]
    async fn test_stopped_registry_reports_storage_unavailable() {
        let mut mock = MockClient::<PaymentMethod>::new();
        mock.expect_list().return_err(FrameworkError::ActorClosed);

        let payments = client_with(mock.client(), Arc::new(SimulatedProcessor::default()));
        let err = payments.first().await.unwrap_err();
        assert_eq!(err.kind(), crate::error::ErrorKind::StorageUnavailable);
    }
}
