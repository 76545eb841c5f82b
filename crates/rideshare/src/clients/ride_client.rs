//! # Ride Client
//!
//! The ride request orchestrator. Records each request in the ride actor,
//! decides whether it may be charged, and drives the payment registry.
//!
//! The ride actor is never waiting on the payment registry: every state
//! change is a separate, short request, and the charge itself is issued
//! between them.
use super::PaymentRegistry;
use crate::model::{
    AuthorizationReason, Charge, MethodId, RideAuthorization, RideId, RideQuote, RideRequest,
    RideRequestCreate,
};
use crate::payment_actor::PaymentError;
use crate::ride_actor::{RideAction, RideActionResult, RideError};
use actor_framework::{ActorClient, FrameworkError, ResourceClient};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{error, info, instrument, warn};

/// Client for the ride actor. `get` (ride lookup) and `list` come from
/// [`ActorClient`].
#[derive(Clone)]
pub struct RideClient {
    inner: ResourceClient<RideRequest>,
    payments: Arc<dyn PaymentRegistry>,
}

#[async_trait]
impl ActorClient<RideRequest> for RideClient {
    type Error = RideError;

    fn inner(&self) -> &ResourceClient<RideRequest> {
        &self.inner
    }

    fn map_error(e: FrameworkError) -> Self::Error {
        RideError::from_framework(e)
    }
}

impl RideClient {
    pub fn new(inner: ResourceClient<RideRequest>, payments: Arc<dyn PaymentRegistry>) -> Self {
        Self { inner, payments }
    }

    async fn act(&self, id: RideId, action: RideAction) -> Result<RideActionResult, RideError> {
        self.inner
            .perform_action(id, action)
            .await
            .map_err(RideError::from_framework)
    }

    /// Performs a transition that must answer with the updated ride.
    async fn transition(&self, id: RideId, action: RideAction) -> Result<RideRequest, RideError> {
        match self.act(id, action).await? {
            RideActionResult::Updated(ride) => Ok(ride),
            other => Err(RideError::Unavailable(format!(
                "unexpected reply from {id}: {other:?}"
            ))),
        }
    }

    async fn settle(
        &self,
        id: RideId,
        action: RideAction,
        reason: AuthorizationReason,
    ) -> Result<RideAuthorization, RideError> {
        let ride = self.transition(id, action).await?;
        Ok(RideAuthorization::from_ride(ride, reason))
    }

    /// Records a ride request and authorizes its payment.
    ///
    /// - no method: rejected with `MissingPaymentMethod`, no charge attempted
    /// - `cost <= 0` (or NaN): rejected with `InvalidAmount`, no charge attempted
    /// - otherwise exactly one charge; the outcome decides authorization
    ///
    /// Declines are reported in the returned [`RideAuthorization`], not as
    /// errors. `Err` means a registry could not be reached.
    #[instrument(skip(self))]
    pub async fn request_ride(
        &self,
        destination: &str,
        cost: f64,
        distance_miles: f64,
        method: Option<MethodId>,
    ) -> Result<RideAuthorization, RideError> {
        let params = RideRequestCreate {
            destination: destination.to_string(),
            distance_miles,
            cost,
            method,
        };
        let id = self
            .inner
            .create(params)
            .await
            .map_err(RideError::from_framework)?;

        let Some(method) = method else {
            info!(%id, "Rejected: no payment method");
            return self
                .settle(
                    id,
                    RideAction::Reject(AuthorizationReason::MissingPaymentMethod),
                    AuthorizationReason::MissingPaymentMethod,
                )
                .await;
        };

        if !(cost > 0.0) {
            info!(%id, cost, "Rejected: non-positive cost");
            return self
                .settle(
                    id,
                    RideAction::Reject(AuthorizationReason::InvalidAmount),
                    AuthorizationReason::InvalidAmount,
                )
                .await;
        }

        let reason = match self.payments.authorize_charge(method, cost).await {
            Ok(()) => {
                let charge = Charge {
                    method,
                    amount: cost,
                };
                return self.record_authorization(id, charge).await;
            }
            Err(PaymentError::InvalidMethod(_)) | Err(PaymentError::NotFound(_)) => {
                AuthorizationReason::InvalidPaymentMethod
            }
            Err(PaymentError::InvalidAmount(_)) => AuthorizationReason::InvalidAmount,
            Err(e @ (PaymentError::Processor(_) | PaymentError::ProcessorTimeout)) => {
                warn!(%id, error = %e, "Charge declined");
                AuthorizationReason::ChargeDeclined
            }
            // The request stays Quoted: nothing was charged.
            Err(e) => return Err(RideError::Payment(e)),
        };

        info!(%id, ?reason, "Rejected");
        self.settle(id, RideAction::Reject(reason), reason).await
    }

    /// Stores an approved charge on the ride. If the ride actor cannot take
    /// it, the charge is refunded before the error is returned.
    async fn record_authorization(
        &self,
        id: RideId,
        charge: Charge,
    ) -> Result<RideAuthorization, RideError> {
        match self
            .settle(id, RideAction::Authorize(charge), AuthorizationReason::Approved)
            .await
        {
            Ok(outcome) => {
                info!(%id, method = %charge.method, cost = charge.amount, "Authorized");
                Ok(outcome)
            }
            Err(e) => {
                warn!(%id, error = %e, "Charge could not be recorded, refunding");
                if let Err(refund) = self
                    .payments
                    .authorize_refund(charge.method, charge.amount)
                    .await
                {
                    error!(
                        %id,
                        error = %refund,
                        amount = charge.amount,
                        "Refund of unrecorded charge failed"
                    );
                }
                Err(e)
            }
        }
    }

    /// Requests a ride priced by `quote`, to the quote's destination address.
    pub async fn submit_quote(
        &self,
        quote: &RideQuote,
        method: Option<MethodId>,
    ) -> Result<RideAuthorization, RideError> {
        self.request_ride(
            &quote.destination.address,
            quote.total_cost,
            quote.distance_miles,
            method,
        )
        .await
    }

    /// Like [`RideClient::request_ride`], paying with the oldest registered method.
    pub async fn request_ride_with_default_method(
        &self,
        destination: &str,
        cost: f64,
        distance_miles: f64,
    ) -> Result<RideAuthorization, RideError> {
        let method = self.payments.first().await.map_err(RideError::Payment)?;
        self.request_ride(destination, cost, distance_miles, method)
            .await
    }

    /// Cancels an authorized ride and refunds its charge.
    ///
    /// Quoted, rejected, cancelling and cancelled rides are returned unchanged.
    /// If the refund fails the ride goes back to `Authorized` and the error
    /// is returned.
    #[instrument(skip(self))]
    pub async fn cancel_ride_request(&self, id: RideId) -> Result<RideRequest, RideError> {
        let charge = match self.act(id, RideAction::BeginCancel).await? {
            RideActionResult::RefundDue(charge) => charge,
            RideActionResult::Updated(ride) | RideActionResult::Unchanged(ride) => {
                return Ok(ride)
            }
        };

        match self
            .payments
            .authorize_refund(charge.method, charge.amount)
            .await
        {
            Ok(()) => {
                info!(%id, amount = charge.amount, "Cancelled and refunded");
                self.transition(id, RideAction::FinishCancel).await
            }
            Err(e) => {
                warn!(%id, error = %e, "Refund failed, ride stays authorized");
                if let Err(abort) = self.act(id, RideAction::AbortCancel).await {
                    error!(%id, error = %abort, "Ride left cancelling after failed refund");
                }
                Err(RideError::RefundFailed(e))
            }
        }
    }
}
