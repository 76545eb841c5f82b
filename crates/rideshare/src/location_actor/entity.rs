//! [`ActorEntity`] implementation for [`Location`].

use super::LocationError;
use crate::model::{Location, LocationCreate, LocationId, LocationUpdate};
use actor_framework::ActorEntity;
use async_trait::async_trait;
use std::convert::Infallible;

#[async_trait]
impl ActorEntity for Location {
    type Id = LocationId;
    type Create = LocationCreate;
    type Update = LocationUpdate;
    type Action = Infallible;
    type ActionResult = ();
    type Context = ();
    type Error = LocationError;

    fn from_create_params(id: LocationId, params: LocationCreate) -> Result<Self, Self::Error> {
        Ok(Self {
            id,
            address: params.address,
            label: params.label,
        })
    }

    async fn on_update(
        &mut self,
        update: LocationUpdate,
        _ctx: &Self::Context,
    ) -> Result<(), Self::Error> {
        self.address = update.address;
        self.label = update.label;
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
