//! Payment gateway boundary
//!
//! Abstraction over external payment processors (Stripe and friends). The
//! booking core only needs three capabilities: create an intent, look up its
//! status, refund it. Amounts cross this boundary in minor currency units.
//!
//! Real processor integrations implement [`PaymentGateway`]; the bundled
//! [`SimulatedGateway`] backs development and tests.

pub mod simulated;

use async_trait::async_trait;
use thiserror::Error;

pub use simulated::SimulatedGateway;

#[derive(Debug, Clone, Error)]
pub enum GatewayError {
    #[error("Unknown payment reference: {0}")]
    UnknownReference(String),

    #[error("Payment declined: {0}")]
    Declined(String),

    #[error("Gateway timeout")]
    Timeout,

    #[error("Gateway transport error: {0}")]
    Transport(String),
}

pub type GatewayResult<T> = Result<T, GatewayError>;

/// Processor-side status of a payment intent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntentStatus {
    /// Created, awaiting the customer's payment step
    Pending,
    /// Funds captured
    Succeeded,
    /// Capture failed or was abandoned
    Failed,
}

/// A created payment intent as returned to the client.
#[derive(Debug, Clone)]
pub struct PaymentIntent {
    /// Opaque processor reference used for all later lookups
    pub reference: String,
    /// Secret the browser/app uses to complete the payment step
    pub client_secret: String,
    pub amount_minor: i64,
    pub currency: String,
}

/// Current processor-side state of an intent.
#[derive(Debug, Clone)]
pub struct IntentState {
    pub reference: String,
    pub status: IntentStatus,
    pub amount_minor: i64,
    pub currency: String,
}

#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Create a payment intent for the given amount.
    async fn create_intent(&self, amount_minor: i64, currency: &str)
        -> GatewayResult<PaymentIntent>;

    /// Look up the current state of an intent by reference.
    async fn retrieve(&self, reference: &str) -> GatewayResult<IntentState>;

    /// Refund a captured intent in full.
    async fn refund(&self, reference: &str) -> GatewayResult<()>;
}
