//! [`ActorEntity`] implementation for [`RideRequest`].
//!
//! Requests are immutable apart from their state; all changes go through
//! [`RideAction`]. There is no generic update.

use super::{RideAction, RideActionResult, RideError};
use crate::model::{AuthorizationReason, RideId, RideRequest, RideRequestCreate, RideStatus};
use actor_framework::ActorEntity;
use async_trait::async_trait;
use std::convert::Infallible;

impl RideRequest {
    fn transition_error(&self, action: &'static str) -> RideError {
        RideError::InvalidTransition {
            ride: self.id,
            from: self.status,
            action,
        }
    }
}

#[async_trait]
impl ActorEntity for RideRequest {
    type Id = RideId;
    type Create = RideRequestCreate;
    type Update = Infallible;
    type Action = RideAction;
    type ActionResult = RideActionResult;
    type Context = ();
    type Error = RideError;

    /// Every request starts out `Quoted`.
    fn from_create_params(id: RideId, params: RideRequestCreate) -> Result<Self, Self::Error> {
        Ok(Self {
            id,
            destination: params.destination,
            distance_miles: params.distance_miles,
            cost: params.cost,
            method: params.method,
            status: RideStatus::Quoted,
            reason: None,
            charge: None,
        })
    }

    async fn on_update(
        &mut self,
        update: Infallible,
        _ctx: &Self::Context,
    ) -> Result<(), Self::Error> {
        match update {}
    }

    async fn handle_action(
        &mut self,
        action: RideAction,
        _ctx: &Self::Context,
    ) -> Result<RideActionResult, Self::Error> {
        match action {
            RideAction::Authorize(charge) => {
                if self.status != RideStatus::Quoted {
                    return Err(self.transition_error("authorize"));
                }
                self.status = RideStatus::Authorized;
                self.reason = Some(AuthorizationReason::Approved);
                self.charge = Some(charge);
                Ok(RideActionResult::Updated(self.clone()))
            }
            RideAction::Reject(reason) => {
                if self.status != RideStatus::Quoted {
                    return Err(self.transition_error("reject"));
                }
                self.status = RideStatus::Rejected;
                self.reason = Some(reason);
                Ok(RideActionResult::Updated(self.clone()))
            }
            RideAction::BeginCancel => match (self.status, self.charge) {
                (RideStatus::Authorized, Some(charge)) => {
                    self.status = RideStatus::Cancelling;
                    Ok(RideActionResult::RefundDue(charge))
                }
                (RideStatus::Authorized, None) => {
                    self.status = RideStatus::Cancelled;
                    Ok(RideActionResult::Updated(self.clone()))
                }
                _ => Ok(RideActionResult::Unchanged(self.clone())),
            },
            RideAction::FinishCancel => {
                if self.status != RideStatus::Cancelling {
                    return Err(self.transition_error("finish cancelling"));
                }
                self.status = RideStatus::Cancelled;
                Ok(RideActionResult::Updated(self.clone()))
            }
            RideAction::AbortCancel => {
                if self.status != RideStatus::Cancelling {
                    return Err(self.transition_error("abort cancelling"));
                }
                self.status = RideStatus::Authorized;
                Ok(RideActionResult::Updated(self.clone()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Charge, MethodId};

    fn quoted() -> RideRequest {
        RideRequest::from_create_params(
            RideId(1),
            RideRequestCreate {
                destination: "44 State Rd".into(),
                distance_miles: 5.3,
                cost: 18.55,
                method: Some(MethodId(1)),
            },
        )
        .unwrap()
    }

    fn charge() -> Charge {
        Charge {
            method: MethodId(1),
            amount: 18.55,
        }
    }

    #[tokio::test]
    async fn authorize_then_cancel_walks_the_happy_path() {
        let mut ride = quoted();
        assert_eq!(ride.status, RideStatus::Quoted);

        ride.handle_action(RideAction::Authorize(charge()), &())
            .await
            .unwrap();
        assert_eq!(ride.status, RideStatus::Authorized);
        assert_eq!(ride.reason, Some(AuthorizationReason::Approved));

        let step = ride.handle_action(RideAction::BeginCancel, &()).await.unwrap();
        assert_eq!(step, RideActionResult::RefundDue(charge()));
        assert_eq!(ride.status, RideStatus::Cancelling);

        ride.handle_action(RideAction::FinishCancel, &()).await.unwrap();
        assert_eq!(ride.status, RideStatus::Cancelled);
    }

    #[tokio::test]
    async fn second_begin_cancel_does_not_claim_the_refund() {
        let mut ride = quoted();
        ride.handle_action(RideAction::Authorize(charge()), &())
            .await
            .unwrap();
        ride.handle_action(RideAction::BeginCancel, &()).await.unwrap();

        let again = ride.handle_action(RideAction::BeginCancel, &()).await.unwrap();
        assert!(matches!(again, RideActionResult::Unchanged(r) if r.status == RideStatus::Cancelling));
    }

    #[tokio::test]
    async fn aborted_cancel_restores_authorization() {
        let mut ride = quoted();
        ride.handle_action(RideAction::Authorize(charge()), &())
            .await
            .unwrap();
        ride.handle_action(RideAction::BeginCancel, &()).await.unwrap();
        ride.handle_action(RideAction::AbortCancel, &()).await.unwrap();
        assert_eq!(ride.status, RideStatus::Authorized);
        assert_eq!(ride.charge, Some(charge()));
    }

    #[tokio::test]
    async fn rejected_ride_cannot_be_authorized() {
        let mut ride = quoted();
        ride.handle_action(
            RideAction::Reject(AuthorizationReason::MissingPaymentMethod),
            &(),
        )
        .await
        .unwrap();

        let err = ride
            .handle_action(RideAction::Authorize(charge()), &())
            .await
            .unwrap_err();
        assert_eq!(
            err,
            RideError::InvalidTransition {
                ride: RideId(1),
                from: RideStatus::Rejected,
                action: "authorize",
            }
        );
        assert_eq!(ride.status, RideStatus::Rejected);
        assert!(ride.charge.is_none());
    }

    #[tokio::test]
    async fn cancelling_a_quoted_or_rejected_ride_is_a_no_op() {
        let mut ride = quoted();
        let step = ride.handle_action(RideAction::BeginCancel, &()).await.unwrap();
        assert!(matches!(step, RideActionResult::Unchanged(_)));
        assert_eq!(ride.status, RideStatus::Quoted);
    }
}
