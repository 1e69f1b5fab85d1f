//! Simulated payment gateway for development and testing.
//!
//! Keeps intents in memory. Tests (and a local payment page) drive capture
//! explicitly via [`SimulatedGateway::capture`]; failure modes are toggled
//! per instance so the compensation paths can be exercised.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use dashmap::DashMap;
use tracing::info;

use super::{GatewayError, GatewayResult, IntentState, IntentStatus, PaymentGateway, PaymentIntent};

pub struct SimulatedGateway {
    intents: DashMap<String, IntentState>,
    refund_calls: AtomicUsize,
    fail_refunds: AtomicBool,
}

impl SimulatedGateway {
    pub fn new() -> Self {
        Self {
            intents: DashMap::new(),
            refund_calls: AtomicUsize::new(0),
            fail_refunds: AtomicBool::new(false),
        }
    }

    /// Complete the customer payment step for an intent.
    pub fn capture(&self, reference: &str) -> GatewayResult<()> {
        let mut intent = self
            .intents
            .get_mut(reference)
            .ok_or_else(|| GatewayError::UnknownReference(reference.to_string()))?;
        intent.status = IntentStatus::Succeeded;
        Ok(())
    }

    /// Register an already-captured intent (test setup shortcut).
    pub fn seed_captured(&self, reference: &str, amount_minor: i64, currency: &str) {
        self.intents.insert(
            reference.to_string(),
            IntentState {
                reference: reference.to_string(),
                status: IntentStatus::Succeeded,
                amount_minor,
                currency: currency.to_string(),
            },
        );
    }

    /// Make all subsequent refund calls fail, to exercise the
    /// unreconciled-charge alert path.
    pub fn fail_refunds(&self, fail: bool) {
        self.fail_refunds.store(fail, Ordering::SeqCst);
    }

    /// Number of refund calls observed, successful or not.
    pub fn refund_calls(&self) -> usize {
        self.refund_calls.load(Ordering::SeqCst)
    }
}

impl Default for SimulatedGateway {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PaymentGateway for SimulatedGateway {
    async fn create_intent(
        &self,
        amount_minor: i64,
        currency: &str,
    ) -> GatewayResult<PaymentIntent> {
        let reference = format!("sim_pi_{}", uuid::Uuid::new_v4().simple());
        let client_secret = format!("{}_secret_{}", reference, uuid::Uuid::new_v4().simple());

        self.intents.insert(
            reference.clone(),
            IntentState {
                reference: reference.clone(),
                status: IntentStatus::Pending,
                amount_minor,
                currency: currency.to_string(),
            },
        );

        info!(reference = %reference, amount_minor, "Simulated payment intent created");

        Ok(PaymentIntent {
            reference,
            client_secret,
            amount_minor,
            currency: currency.to_string(),
        })
    }

    async fn retrieve(&self, reference: &str) -> GatewayResult<IntentState> {
        self.intents
            .get(reference)
            .map(|e| e.value().clone())
            .ok_or_else(|| GatewayError::UnknownReference(reference.to_string()))
    }

    async fn refund(&self, reference: &str) -> GatewayResult<()> {
        self.refund_calls.fetch_add(1, Ordering::SeqCst);

        if self.fail_refunds.load(Ordering::SeqCst) {
            return Err(GatewayError::Transport(
                "simulated refund outage".to_string(),
            ));
        }

        let mut intent = self
            .intents
            .get_mut(reference)
            .ok_or_else(|| GatewayError::UnknownReference(reference.to_string()))?;

        if intent.status != IntentStatus::Succeeded {
            return Err(GatewayError::Declined(format!(
                "intent {} is not captured",
                reference
            )));
        }

        intent.status = IntentStatus::Failed;
        info!(reference = %reference, "Simulated refund issued");
        Ok(())
    }
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn intent_lifecycle() {
        let gw = SimulatedGateway::new();
        let intent = gw.create_intent(5_000, "usd").await.unwrap();

        let state = gw.retrieve(&intent.reference).await.unwrap();
        assert_eq!(state.status, IntentStatus::Pending);

        gw.capture(&intent.reference).unwrap();
        let state = gw.retrieve(&intent.reference).await.unwrap();
        assert_eq!(state.status, IntentStatus::Succeeded);

        gw.refund(&intent.reference).await.unwrap();
        assert_eq!(gw.refund_calls(), 1);
    }

    #[tokio::test]
    async fn refund_of_uncaptured_intent_is_declined() {
        let gw = SimulatedGateway::new();
        let intent = gw.create_intent(5_000, "usd").await.unwrap();

        let err = gw.refund(&intent.reference).await.unwrap_err();
        assert!(matches!(err, GatewayError::Declined(_)));
    }

    #[tokio::test]
    async fn unknown_reference_errors() {
        let gw = SimulatedGateway::new();
        assert!(matches!(
            gw.retrieve("sim_pi_missing").await.unwrap_err(),
            GatewayError::UnknownReference(_)
        ));
    }

    #[tokio::test]
    async fn refund_outage_toggle() {
        let gw = SimulatedGateway::new();
        gw.seed_captured("sim_pi_1", 5_000, "usd");
        gw.fail_refunds(true);

        let err = gw.refund("sim_pi_1").await.unwrap_err();
        assert!(matches!(err, GatewayError::Transport(_)));
        assert_eq!(gw.refund_calls(), 1);
    }
}
