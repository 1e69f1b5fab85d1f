//! Billing service
//!
//! Balance projection and the secondary payment flow used after service
//! completion: record an in-person (cash) or gateway-captured payment, and
//! create gateway intents for the outstanding balance. The processing-fee
//! surcharge is added only to the amount charged through the gateway, never
//! to the recorded amount owed toward the service.

use std::sync::Arc;

use tracing::info;

use crate::application::balance::{outstanding_balance, paid_total, processing_fee};
use crate::domain::booking::Booking;
use crate::domain::payment::Payment;
use crate::domain::{DomainError, DomainResult, RepositoryProvider};
use crate::infrastructure::gateway::{GatewayError, IntentStatus, PaymentGateway, PaymentIntent};

/// Gateway processing-fee schedule.
#[derive(Debug, Clone)]
pub struct FeeSchedule {
    /// Percentage part in basis points (290 = 2.9%)
    pub card_percent_bps: i64,
    /// Fixed part in minor currency units
    pub card_fixed_minor: i64,
}

impl Default for FeeSchedule {
    fn default() -> Self {
        Self {
            card_percent_bps: 290,
            card_fixed_minor: 30,
        }
    }
}

/// A booking's projected money state.
#[derive(Debug, Clone)]
pub struct BookingStatement {
    pub booking: Booking,
    pub paid_minor: i64,
    pub outstanding_minor: i64,
}

pub struct BillingService {
    repos: Arc<dyn RepositoryProvider>,
    gateway: Arc<dyn PaymentGateway>,
    fees: FeeSchedule,
    currency: String,
}

impl BillingService {
    pub fn new(
        repos: Arc<dyn RepositoryProvider>,
        gateway: Arc<dyn PaymentGateway>,
        fees: FeeSchedule,
        currency: impl Into<String>,
    ) -> Self {
        Self {
            repos,
            gateway,
            fees,
            currency: currency.into(),
        }
    }

    async fn load(&self, booking_id: &str) -> DomainResult<Booking> {
        self.repos
            .bookings()
            .find_by_id(booking_id)
            .await?
            .ok_or(DomainError::NotFound {
                entity: "Booking",
                field: "id",
                value: booking_id.to_string(),
            })
    }

    /// Projected state for a booking: price, total paid, outstanding.
    pub async fn statement(&self, booking_id: &str) -> DomainResult<BookingStatement> {
        let booking = self.load(booking_id).await?;
        let payments = self.repos.payments().find_for_booking(booking_id).await?;

        Ok(BookingStatement {
            paid_minor: paid_total(&payments),
            outstanding_minor: outstanding_balance(
                booking.price_minor,
                booking.deposit_minor,
                &payments,
            ),
            booking,
        })
    }

    /// Record a secondary payment toward the outstanding balance.
    ///
    /// With a `gateway_ref` the capture is verified with the gateway first
    /// (same fail-fast rule as the deposit); without one the payment is
    /// recorded as cash with a local reference.
    pub async fn record_payment(
        &self,
        booking_id: &str,
        amount_minor: i64,
        gateway_ref: Option<String>,
    ) -> DomainResult<Payment> {
        let statement = self.statement(booking_id).await?;

        if amount_minor <= 0 {
            return Err(DomainError::Validation(
                "payment amount must be positive".to_string(),
            ));
        }
        if amount_minor > statement.outstanding_minor {
            return Err(DomainError::Validation(format!(
                "payment of {} exceeds outstanding balance of {}",
                amount_minor, statement.outstanding_minor
            )));
        }

        let payment = match gateway_ref {
            Some(reference) => {
                let state = self.gateway.retrieve(&reference).await.map_err(|e| match e {
                    GatewayError::UnknownReference(r) => DomainError::PaymentNotCaptured(r),
                    other => DomainError::GatewayUnavailable(other.to_string()),
                })?;
                if state.status != IntentStatus::Succeeded {
                    return Err(DomainError::PaymentNotCaptured(reference));
                }
                Payment::captured(booking_id, amount_minor, reference)
            }
            None => Payment::cash(booking_id, amount_minor),
        };

        self.repos.payments().save(payment.clone()).await?;

        info!(
            booking_id = %booking_id,
            amount_minor,
            reference = %payment.external_ref,
            "Payment recorded"
        );

        Ok(payment)
    }

    /// Create a gateway intent for the outstanding balance plus the
    /// processing-fee surcharge.
    pub async fn create_payment_intent(&self, booking_id: &str) -> DomainResult<PaymentIntent> {
        let statement = self.statement(booking_id).await?;

        if statement.outstanding_minor == 0 {
            return Err(DomainError::Validation(
                "nothing outstanding for this booking".to_string(),
            ));
        }

        let surcharge = processing_fee(
            statement.outstanding_minor,
            self.fees.card_percent_bps,
            self.fees.card_fixed_minor,
        );
        let charge_minor = statement.outstanding_minor + surcharge;

        self.gateway
            .create_intent(charge_minor, &self.currency)
            .await
            .map_err(|e| DomainError::GatewayUnavailable(e.to_string()))
    }
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::customer::Customer;
    use crate::infrastructure::gateway::SimulatedGateway;
    use crate::infrastructure::storage::InMemoryRepositoryProvider;

    struct Fixture {
        repos: Arc<dyn RepositoryProvider>,
        gateway: Arc<SimulatedGateway>,
        billing: BillingService,
    }

    async fn fixture() -> Fixture {
        let repos: Arc<dyn RepositoryProvider> = Arc::new(InMemoryRepositoryProvider::new());
        let gateway = Arc::new(SimulatedGateway::new());
        let billing = BillingService::new(
            repos.clone(),
            gateway.clone(),
            FeeSchedule::default(),
            "usd",
        );
        Fixture {
            repos,
            gateway,
            billing,
        }
    }

    async fn seed_booking(fx: &Fixture) -> Booking {
        let customer = Customer::guest("Ada", "ada@example.com", None, true, false);
        let customer_id = customer.id.clone();
        fx.repos.customers().save(customer).await.unwrap();

        let booking = Booking::new(
            "bk-1",
            customer_id,
            "svc-1",
            None,
            None,
            chrono::NaiveDate::from_ymd_opt(2026, 5, 20).unwrap(),
            chrono::NaiveTime::from_hms_opt(10, 0, 0).unwrap(),
            8_000,
            5_000,
        );
        let deposit = Payment::captured(booking.id.clone(), 5_000, "pi_dep");
        fx.repos.bookings().reserve(booking.clone(), deposit).await.unwrap()
    }

    #[tokio::test]
    async fn statement_reflects_deposit() {
        let fx = fixture().await;
        seed_booking(&fx).await;

        let statement = fx.billing.statement("bk-1").await.unwrap();
        assert_eq!(statement.paid_minor, 5_000);
        // $80 service + $50 deposit − $50 paid
        assert_eq!(statement.outstanding_minor, 8_000);
    }

    #[tokio::test]
    async fn cash_payment_clears_balance() {
        let fx = fixture().await;
        seed_booking(&fx).await;

        let payment = fx.billing.record_payment("bk-1", 8_000, None).await.unwrap();
        assert!(payment.external_ref.starts_with("cash_"));

        let statement = fx.billing.statement("bk-1").await.unwrap();
        assert_eq!(statement.outstanding_minor, 0);
    }

    #[tokio::test]
    async fn overpayment_is_rejected() {
        let fx = fixture().await;
        seed_booking(&fx).await;

        let err = fx.billing.record_payment("bk-1", 9_000, None).await.unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[tokio::test]
    async fn gateway_payment_must_be_captured() {
        let fx = fixture().await;
        seed_booking(&fx).await;

        let intent = fx.gateway.create_intent(8_000, "usd").await.unwrap();
        let err = fx
            .billing
            .record_payment("bk-1", 8_000, Some(intent.reference.clone()))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::PaymentNotCaptured(_)));

        fx.gateway.capture(&intent.reference).unwrap();
        let payment = fx
            .billing
            .record_payment("bk-1", 8_000, Some(intent.reference))
            .await
            .unwrap();
        assert_eq!(payment.amount_minor, 8_000);
    }

    #[tokio::test]
    async fn intent_charges_outstanding_plus_surcharge() {
        let fx = fixture().await;
        seed_booking(&fx).await;

        let intent = fx.billing.create_payment_intent("bk-1").await.unwrap();
        // 8000 outstanding + 2.9% + 30
        assert_eq!(intent.amount_minor, 8_000 + 232 + 30);
    }

    #[tokio::test]
    async fn no_intent_when_nothing_outstanding() {
        let fx = fixture().await;
        seed_booking(&fx).await;
        fx.billing.record_payment("bk-1", 8_000, None).await.unwrap();

        let err = fx.billing.create_payment_intent("bk-1").await.unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }
}
