//! [`ActorEntity`] implementation for [`PaymentMethod`].
//!
//! Card data is validated by [`PaymentDetails::parse`](crate::model::PaymentDetails::parse)
//! before it is sent, so creation and updates cannot fail here.

use super::PaymentError;
use crate::model::{MethodId, PaymentDetails, PaymentMethod};
use actor_framework::ActorEntity;
use async_trait::async_trait;
use std::convert::Infallible;

#[async_trait]
impl ActorEntity for PaymentMethod {
    type Id = MethodId;
    type Create = PaymentDetails;
    type Update = PaymentDetails;
    type Action = Infallible;
    type ActionResult = ();
    type Context = ();
    type Error = PaymentError;

    fn from_create_params(id: MethodId, details: PaymentDetails) -> Result<Self, Self::Error> {
        Ok(PaymentMethod::new(id, details))
    }

    /// Replaces all card fields in place; the id is kept.
    async fn on_update(
        &mut self,
        details: PaymentDetails,
        _ctx: &Self::Context,
    ) -> Result<(), Self::Error> {
        self.card_number = details.card_number;
        self.cvv = details.cvv;
        self.expiration = details.expiration;
        Ok(())
    }

    async fn handle_action(
        &mut self,
        action: Infallible,
        _ctx: &Self::Context,
    ) -> Result<(), Self::Error> {
        match action {}
    }
}
