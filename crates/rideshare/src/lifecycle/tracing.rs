//! # Observability & Tracing
//!
//! Actor logs carry an `entity_type` field (`PaymentMethod`, `Location`,
//! `RideRequest`) instead of a module path, and client methods open spans
//! named after the operation. Card numbers appear masked; secrets never appear.
//!
//! ```bash
//! RUST_LOG=info cargo run      # lifecycle and decisions
//! RUST_LOG=debug cargo run     # every request, with payloads
//! ```

/// Installs a compact `fmt` subscriber filtered by `RUST_LOG`.
///
/// Call once per process.
pub fn setup_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .compact()
        .init();
}
