//! The payment gateway seam.
//!
//! The registry decides *whether* a charge may be attempted; a
//! [`PaymentProcessor`] performs it. [`SimulatedProcessor`] stands in for a
//! real gateway.

use crate::model::PaymentMethod;
use async_trait::async_trait;
use std::fmt::Debug;
use std::time::Duration;
use thiserror::Error;
use tokio::time::Instant;
use tracing::info;

/// Per-call options handed to the processor.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProcessorContext {
    /// The registry abandons the call at this instant.
    pub deadline: Option<Instant>,
}

impl ProcessorContext {
    pub fn with_timeout(timeout: Option<Duration>) -> Self {
        Self {
            deadline: timeout.map(|t| Instant::now() + t),
        }
    }
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ProcessorError {
    #[error("declined: {0}")]
    Declined(String),

    #[error("gateway unavailable: {0}")]
    Unavailable(String),
}

#[async_trait]
pub trait PaymentProcessor: Send + Sync + Debug {
    async fn charge(
        &self,
        method: &PaymentMethod,
        amount: f64,
        ctx: &ProcessorContext,
    ) -> Result<(), ProcessorError>;

    async fn refund(
        &self,
        method: &PaymentMethod,
        amount: f64,
        ctx: &ProcessorContext,
    ) -> Result<(), ProcessorError>;
}

/// A sandbox gateway.
///
/// Approves every positive amount, except on cards registered with
/// [`SimulatedProcessor::declining`], which the issuer turns down the way a
/// gateway's test cards do.
#[derive(Debug, Default, Clone)]
pub struct SimulatedProcessor {
    declined: Vec<(String, String)>,
}

impl SimulatedProcessor {
    /// Declines every charge and refund on this card number and CVV.
    pub fn declining(mut self, card_number: &str, cvv: &str) -> Self {
        self.declined.push((card_number.to_string(), cvv.to_string()));
        self
    }

    fn settle(
        &self,
        kind: &'static str,
        method: &PaymentMethod,
        amount: f64,
    ) -> Result<(), ProcessorError> {
        if !(amount > 0.0) {
            return Err(ProcessorError::Declined(format!(
                "amount {amount} is not positive"
            )));
        }

        let card = method.card_number.expose();
        let cvv = method.cvv.expose();
        if self.declined.iter().any(|(n, c)| n == card && c == cvv) {
            info!(kind, method = %method.id, card = %method.card_number, "Simulated decline");
            return Err(ProcessorError::Declined(format!(
                "issuer declined card {}",
                method.card_number
            )));
        }

        info!(
            kind,
            method = %method.id,
            card = %method.card_number,
            amount,
            "Simulated settlement"
        );
        Ok(())
    }
}

#[async_trait]
impl PaymentProcessor for SimulatedProcessor {
    async fn charge(
        &self,
        method: &PaymentMethod,
        amount: f64,
        _ctx: &ProcessorContext,
    ) -> Result<(), ProcessorError> {
        self.settle("charge", method, amount)
    }

    async fn refund(
        &self,
        method: &PaymentMethod,
        amount: f64,
        _ctx: &ProcessorContext,
    ) -> Result<(), ProcessorError> {
        self.settle("refund", method, amount)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{MethodId, PaymentDetails};
    use chrono::NaiveDate;

    fn card(number: &str, cvv: &str) -> PaymentMethod {
        let today = NaiveDate::from_ymd_opt(2026, 10, 1).unwrap();
        let details = PaymentDetails::parse(number, cvv, "12/27", today).unwrap();
        PaymentMethod::new(MethodId(1), details)
    }

    #[tokio::test]
    async fn test_sandbox_declines_only_listed_cards() {
        let processor = SimulatedProcessor::default().declining("4000000000000002", "123");
        let ctx = ProcessorContext::default();

        let err = processor
            .charge(&card("4000000000000002", "123"), 10.0, &ctx)
            .await
            .unwrap_err();
        assert_eq!(
            err,
            ProcessorError::Declined("issuer declined card ****0002".into())
        );

        // Same number with another CVV, and other cards, go through.
        assert!(processor
            .charge(&card("4000000000000002", "999"), 10.0, &ctx)
            .await
            .is_ok());
        assert!(processor
            .refund(&card("4444333322221111", "123"), 10.0, &ctx)
            .await
            .is_ok());
    }

    #[tokio::test]
    async fn test_non_positive_amounts_are_declined() {
        let processor = SimulatedProcessor::default();
        let err = processor
            .charge(&card("4444333322221111", "123"), 0.0, &ProcessorContext::default())
            .await
            .unwrap_err();
        assert!(matches!(err, ProcessorError::Declined(_)));
    }
}
