//! Demo session: a rider signs in, registers a card, prices a trip from Home
//! to Work, books it and cancels it again.

use actor_framework::ActorClient;
use anyhow::{anyhow, Context};
use chrono::{Local, Months};
use rideshare::clients::PaymentRegistry;
use rideshare::config::RideshareConfig;
use rideshare::lifecycle::{setup_tracing, RideshareSystem};
use rideshare::model::Role;
use rideshare::ride_actor::RideError;
use tracing::{error, info, Instrument};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    setup_tracing();

    let config = RideshareConfig::from_env()?;
    info!("Starting rideshare session");
    let system = RideshareSystem::start(&config).await?;

    if system
        .accounts
        .ensure_seed_account("bob", "secret123", Role::Rider)
        .await?
    {
        info!("Seed account created");
    }

    let span = tracing::info_span!("sign_in");
    let rider = async {
        system
            .accounts
            .authenticate("bob", "secret123", Role::Rider)
            .await
    }
    .instrument(span)
    .await?;
    info!(%rider, "Signed in");

    let expiration = Local::now()
        .date_naive()
        .checked_add_months(Months::new(1))
        .ok_or_else(|| anyhow!("no month after today"))?
        .format("%m/%y")
        .to_string();
    let method = system
        .payments
        .add("4444333322221111", "123", &expiration)
        .await?;
    info!(%method, "Card registered");

    let locations = system.locations.list().await?;
    let find = |label: &str| {
        locations
            .iter()
            .find(|l| l.label == label)
            .map(|l| l.id)
            .with_context(|| format!("no location labelled {label}"))
    };
    let quote = system
        .locations
        .quote(find("Home")?, find("Work")?, config.default_price_per_mile)
        .await?;
    info!(
        distance_miles = quote.distance_miles,
        total_cost = quote.total_cost,
        "Trip priced"
    );

    let span = tracing::info_span!("ride_request");
    let outcome = async {
        let default_method = system.payments.first().await.map_err(RideError::Payment)?;
        system.rides.submit_quote(&quote, default_method).await
    }
    .instrument(span)
    .await?;

    if outcome.authorized {
        info!(ride = %outcome.ride.id, "Ride authorized");
        match system.rides.cancel_ride_request(outcome.ride.id).await {
            Ok(ride) => info!(ride = %ride.id, status = %ride.status, "Ride cancelled"),
            Err(e) => error!(error = %e, "Cancellation failed"),
        }
    } else {
        error!(reason = ?outcome.reason, "Ride rejected");
    }

    system.shutdown().await?;
    info!("Session finished");
    Ok(())
}
