//! Support tickets.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SupportTicket {
    pub reason: String,
    pub description: String,
    pub opened_at: DateTime<Utc>,
}

/// Where support tickets go. Submission never fails from the caller's view.
pub trait SupportSink: Send + Sync {
    fn submit(&self, ticket: SupportTicket);
}

/// Emits each ticket as a structured `tracing` event.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSupportSink;

impl SupportSink for TracingSupportSink {
    fn submit(&self, ticket: SupportTicket) {
        info!(
            reason = %ticket.reason,
            description = %ticket.description,
            opened_at = %ticket.opened_at,
            "Support ticket opened"
        );
    }
}
