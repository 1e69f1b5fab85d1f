//! Reservation coordinator
//!
//! Orchestrates the booking saga: verify the deposit capture with the
//! payment gateway, validate the selection, then attempt the slot
//! reservation inside one storage transaction. When the reservation fails
//! after a charge was captured, the coordinator compensates with a bounded
//! refund attempt; a refund failure is escalated as an operator alert but
//! never replaces the error reported to the client.
//!
//! Saga phases: `Verifying → Reserving → Committed`, or
//! `Reserving → Compensating → Failed`. Gateway calls happen strictly
//! outside the storage transaction; only the exclusivity check and the
//! booking/payment inserts run inside it.

use std::sync::Arc;
use std::time::Duration;

use chrono::{NaiveDate, NaiveTime, Utc};
use tracing::{error, info, warn};

use crate::application::balance::quoted_price;
use crate::application::outbox::NotificationOutbox;
use crate::domain::booking::Booking;
use crate::domain::customer::Customer;
use crate::domain::notification::{Channel, NotificationKind};
use crate::domain::payment::Payment;
use crate::domain::{DomainError, DomainResult, RepositoryProvider};
use crate::infrastructure::gateway::{GatewayError, IntentStatus, PaymentGateway};
use crate::notifications::events::{BookingCreatedEvent, RefundFailedEvent};
use crate::notifications::{Event, SharedEventBus};

/// Phase of a reservation saga, used for logging and metrics labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SagaPhase {
    Verifying,
    Reserving,
    Committed,
    Compensating,
    Failed,
}

impl SagaPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Verifying => "verifying",
            Self::Reserving => "reserving",
            Self::Committed => "committed",
            Self::Compensating => "compensating",
            Self::Failed => "failed",
        }
    }
}

/// Deployment-level reservation policy.
#[derive(Debug, Clone)]
pub struct ReservationPolicy {
    /// Deposit collected on every reservation, minor currency units
    pub deposit_minor: i64,
    /// ISO 4217 currency code
    pub currency: String,
    /// Upper bound on a compensation refund attempt
    pub refund_timeout_secs: u64,
}

impl Default for ReservationPolicy {
    fn default() -> Self {
        Self {
            deposit_minor: 5_000,
            currency: "usd".to_string(),
            refund_timeout_secs: 10,
        }
    }
}

/// Who is booking.
#[derive(Debug, Clone)]
pub enum CustomerSelection {
    /// An existing customer record
    Existing { customer_id: String },
    /// Unauthenticated guest; matched to an existing record by email or
    /// created on the spot
    Guest {
        name: String,
        email: String,
        phone: Option<String>,
        email_opt_in: bool,
        sms_opt_in: bool,
    },
}

/// A reservation attempt, carrying the reference of an already-captured
/// deposit payment.
#[derive(Debug, Clone)]
pub struct ReservationRequest {
    pub customer: CustomerSelection,
    pub service_variant_id: String,
    pub stylist_id: Option<String>,
    pub promotion_code: Option<String>,
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub payment_ref: String,
}

pub struct ReservationCoordinator {
    repos: Arc<dyn RepositoryProvider>,
    gateway: Arc<dyn PaymentGateway>,
    outbox: Arc<NotificationOutbox>,
    event_bus: SharedEventBus,
    policy: ReservationPolicy,
}

impl ReservationCoordinator {
    pub fn new(
        repos: Arc<dyn RepositoryProvider>,
        gateway: Arc<dyn PaymentGateway>,
        outbox: Arc<NotificationOutbox>,
        event_bus: SharedEventBus,
        policy: ReservationPolicy,
    ) -> Self {
        Self {
            repos,
            gateway,
            outbox,
            event_bus,
            policy,
        }
    }

    /// Run the reservation saga.
    ///
    /// On success exactly one booking and its deposit payment exist. On a
    /// reservation failure after capture, a refund was attempted; the
    /// original failure is returned either way.
    pub async fn reserve(&self, request: ReservationRequest) -> DomainResult<Booking> {
        // ── Verifying: no transaction open, nothing to compensate ──
        self.verify_captured(&request.payment_ref).await?;

        let (price_minor, customer) = self.validate_selection(&request).await?;

        let booking = Booking::new(
            uuid::Uuid::new_v4().to_string(),
            customer.id.clone(),
            request.service_variant_id.clone(),
            request.stylist_id.clone(),
            request.promotion_code.clone(),
            request.date,
            request.time,
            price_minor,
            self.policy.deposit_minor,
        );
        let deposit = Payment::captured(
            booking.id.clone(),
            self.policy.deposit_minor,
            request.payment_ref.clone(),
        );

        // ── Reserving: exclusivity check + inserts in one transaction ──
        match self.repos.bookings().reserve(booking, deposit).await {
            Ok(booking) => {
                metrics::counter!("booking_reservations_total").increment(1);
                info!(
                    booking_id = %booking.id,
                    phase = SagaPhase::Committed.as_str(),
                    "Reservation committed"
                );

                self.event_bus
                    .publish(Event::BookingCreated(BookingCreatedEvent {
                        booking_id: booking.id.clone(),
                        customer_id: booking.customer_id.clone(),
                        stylist_id: booking.stylist_id.clone(),
                        date: booking.date.to_string(),
                        time: booking.time.format("%H:%M").to_string(),
                        deposit_minor: booking.deposit_minor,
                        timestamp: Utc::now(),
                    }));

                // Best-effort; a failed enqueue never rolls back the booking
                self.send_confirmations(&booking, &customer).await;

                Ok(booking)
            }
            Err(cause) => {
                if matches!(cause, DomainError::SlotConflict { .. }) {
                    metrics::counter!("booking_slot_conflicts_total").increment(1);
                }
                // ── Compensating: refund outside the aborted transaction ──
                self.compensate(&request.payment_ref, self.policy.deposit_minor, &cause)
                    .await;
                Err(cause)
            }
        }
    }

    /// Fail fast unless the gateway reports the reference as captured.
    async fn verify_captured(&self, payment_ref: &str) -> DomainResult<()> {
        let state = self.gateway.retrieve(payment_ref).await.map_err(|e| match e {
            GatewayError::UnknownReference(r) => DomainError::PaymentNotCaptured(r),
            other => DomainError::GatewayUnavailable(other.to_string()),
        })?;

        if state.status != IntentStatus::Succeeded {
            return Err(DomainError::PaymentNotCaptured(payment_ref.to_string()));
        }
        Ok(())
    }

    /// Resolve the service variant, stylist and customer; returns the quoted
    /// price and the (possibly just created) customer.
    async fn validate_selection(
        &self,
        request: &ReservationRequest,
    ) -> DomainResult<(i64, Customer)> {
        let variant = self
            .repos
            .catalog()
            .find_service_variant(&request.service_variant_id)
            .await?
            .filter(|v| v.is_active)
            .ok_or_else(|| {
                DomainError::InvalidSelection(format!(
                    "unknown service variant: {}",
                    request.service_variant_id
                ))
            })?;

        let stylist_modifier = match &request.stylist_id {
            Some(stylist_id) => {
                let stylist = self
                    .repos
                    .catalog()
                    .find_stylist(stylist_id)
                    .await?
                    .filter(|s| s.is_active)
                    .ok_or_else(|| {
                        DomainError::InvalidSelection(format!("unknown stylist: {}", stylist_id))
                    })?;
                stylist.price_modifier_minor
            }
            None => 0,
        };

        let customer = self.resolve_customer(&request.customer).await?;

        Ok((
            quoted_price(variant.price_minor, stylist_modifier),
            customer,
        ))
    }

    /// Guests are matched to an existing record by contact email, or created.
    async fn resolve_customer(&self, selection: &CustomerSelection) -> DomainResult<Customer> {
        match selection {
            CustomerSelection::Existing { customer_id } => self
                .repos
                .customers()
                .find_by_id(customer_id)
                .await?
                .ok_or_else(|| {
                    DomainError::InvalidSelection(format!("unknown customer: {}", customer_id))
                }),
            CustomerSelection::Guest {
                name,
                email,
                phone,
                email_opt_in,
                sms_opt_in,
            } => {
                if let Some(existing) = self.repos.customers().find_by_email(email).await? {
                    return Ok(existing);
                }
                let guest = Customer::guest(
                    name.clone(),
                    email.clone(),
                    phone.clone(),
                    *email_opt_in,
                    *sms_opt_in,
                );
                self.repos.customers().save(guest.clone()).await?;
                Ok(guest)
            }
        }
    }

    /// Attempt the refund, bounded by the policy timeout. Never changes the
    /// client-visible outcome; a failure leaves an unreconciled charge that
    /// is escalated for manual follow-up.
    async fn compensate(&self, payment_ref: &str, amount_minor: i64, cause: &DomainError) {
        info!(
            payment_ref = %payment_ref,
            phase = SagaPhase::Compensating.as_str(),
            cause = %cause,
            "Reservation failed, refunding deposit"
        );

        let refund = tokio::time::timeout(
            Duration::from_secs(self.policy.refund_timeout_secs),
            self.gateway.refund(payment_ref),
        )
        .await;

        match refund {
            Ok(Ok(())) => {
                metrics::counter!("booking_refunds_total").increment(1);
                info!(payment_ref = %payment_ref, "Deposit refunded");
            }
            Ok(Err(e)) => self.alert_unreconciled(payment_ref, amount_minor, &e.to_string()),
            Err(_) => self.alert_unreconciled(payment_ref, amount_minor, "refund timed out"),
        }
    }

    /// The one allowed bad terminal state: a captured charge with no
    /// reservation and no refund. Observable, alertable, handled manually.
    fn alert_unreconciled(&self, payment_ref: &str, amount_minor: i64, reason: &str) {
        metrics::counter!("booking_refund_failures_total").increment(1);
        error!(
            payment_ref = %payment_ref,
            amount_minor,
            reason,
            phase = SagaPhase::Failed.as_str(),
            "CRITICAL: captured charge left unreconciled, manual refund required"
        );
        self.event_bus.publish(Event::RefundFailed(RefundFailedEvent {
            booking_id: None,
            payment_ref: payment_ref.to_string(),
            amount_minor,
            reason: reason.to_string(),
            timestamp: Utc::now(),
        }));
    }

    async fn send_confirmations(&self, booking: &Booking, customer: &Customer) {
        let when = format!(
            "{} at {}",
            booking.date,
            booking.time.format("%H:%M")
        );

        if customer.email_opt_in {
            let result = self
                .outbox
                .enqueue(
                    &booking.id,
                    NotificationKind::Confirmation,
                    Channel::Email,
                    &customer.email,
                    Some("Your appointment is confirmed".to_string()),
                    &format!(
                        "Hi {}, your appointment on {} is confirmed. See you soon!",
                        customer.name, when
                    ),
                )
                .await;
            if let Err(e) = result {
                warn!(booking_id = %booking.id, "Failed to enqueue confirmation email: {}", e);
            }
        }

        if customer.can_receive_sms() {
            let phone = customer.phone.as_deref().unwrap_or_default();
            let result = self
                .outbox
                .enqueue(
                    &booking.id,
                    NotificationKind::Confirmation,
                    Channel::Sms,
                    phone,
                    None,
                    &format!("Appointment confirmed for {}.", when),
                )
                .await;
            if let Err(e) = result {
                warn!(booking_id = %booking.id, "Failed to enqueue confirmation SMS: {}", e);
            }
        }
    }
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::booking::BookingStatus;
    use crate::domain::catalog::{ServiceVariant, Stylist};
    use crate::infrastructure::gateway::SimulatedGateway;
    use crate::infrastructure::storage::InMemoryRepositoryProvider;
    use crate::notifications::create_event_bus;

    struct Fixture {
        repos: Arc<dyn RepositoryProvider>,
        gateway: Arc<SimulatedGateway>,
        coordinator: ReservationCoordinator,
        event_bus: SharedEventBus,
        variant_id: String,
        stylist_id: String,
    }

    async fn fixture() -> Fixture {
        let repos: Arc<dyn RepositoryProvider> = Arc::new(InMemoryRepositoryProvider::new());
        let gateway = Arc::new(SimulatedGateway::new());
        let event_bus = create_event_bus();
        let outbox = Arc::new(NotificationOutbox::new(repos.clone()));

        let variant = ServiceVariant::new("Knotless braids", "Braids", 8_000, 240);
        let variant_id = variant.id.clone();
        repos.catalog().save_service_variant(variant).await.unwrap();

        let stylist = Stylist::new("Imani", 0);
        let stylist_id = stylist.id.clone();
        repos.catalog().save_stylist(stylist).await.unwrap();

        let coordinator = ReservationCoordinator::new(
            repos.clone(),
            gateway.clone(),
            outbox,
            event_bus.clone(),
            ReservationPolicy::default(),
        );

        Fixture {
            repos,
            gateway,
            coordinator,
            event_bus,
            variant_id,
            stylist_id,
        }
    }

    fn guest(email: &str) -> CustomerSelection {
        CustomerSelection::Guest {
            name: "Ada".to_string(),
            email: email.to_string(),
            phone: Some("+15550100".to_string()),
            email_opt_in: true,
            sms_opt_in: true,
        }
    }

    fn request(fx: &Fixture, payment_ref: &str, email: &str) -> ReservationRequest {
        ReservationRequest {
            customer: guest(email),
            service_variant_id: fx.variant_id.clone(),
            stylist_id: Some(fx.stylist_id.clone()),
            promotion_code: None,
            date: NaiveDate::from_ymd_opt(2026, 5, 20).unwrap(),
            time: NaiveTime::from_hms_opt(10, 0, 0).unwrap(),
            payment_ref: payment_ref.to_string(),
        }
    }

    #[tokio::test]
    async fn successful_reservation_records_booking_and_deposit() {
        let fx = fixture().await;
        fx.gateway.seed_captured("pi_1", 5_000, "usd");

        let booking = fx
            .coordinator
            .reserve(request(&fx, "pi_1", "ada@example.com"))
            .await
            .unwrap();

        assert_eq!(booking.status, BookingStatus::Booked);
        assert_eq!(booking.price_minor, 8_000);

        // A booking never exists without its deposit payment
        let payments = fx.repos.payments().find_for_booking(&booking.id).await.unwrap();
        assert_eq!(payments.len(), 1);
        assert_eq!(payments[0].amount_minor, 5_000);
        assert_eq!(payments[0].external_ref, "pi_1");

        // One confirmation per consented channel
        let records = fx
            .repos
            .notifications()
            .find_for_booking(&booking.id)
            .await
            .unwrap();
        assert_eq!(records.len(), 2);
        assert!(records.iter().all(|r| r.kind == NotificationKind::Confirmation));
    }

    #[tokio::test]
    async fn uncaptured_payment_fails_fast() {
        let fx = fixture().await;
        let intent = fx.gateway.create_intent(5_000, "usd").await.unwrap();

        let err = fx
            .coordinator
            .reserve(request(&fx, &intent.reference, "ada@example.com"))
            .await
            .unwrap_err();

        assert!(matches!(err, DomainError::PaymentNotCaptured(_)));
        assert!(fx.repos.bookings().find_all().await.unwrap().is_empty());
        // Nothing to compensate: no refund attempted
        assert_eq!(fx.gateway.refund_calls(), 0);
    }

    #[tokio::test]
    async fn unknown_reference_is_not_captured() {
        let fx = fixture().await;

        let err = fx
            .coordinator
            .reserve(request(&fx, "pi_missing", "ada@example.com"))
            .await
            .unwrap_err();

        assert!(matches!(err, DomainError::PaymentNotCaptured(_)));
    }

    #[tokio::test]
    async fn invalid_selection_is_rejected() {
        let fx = fixture().await;
        fx.gateway.seed_captured("pi_1", 5_000, "usd");

        let mut req = request(&fx, "pi_1", "ada@example.com");
        req.service_variant_id = "nope".to_string();

        let err = fx.coordinator.reserve(req).await.unwrap_err();
        assert!(matches!(err, DomainError::InvalidSelection(_)));
        assert!(fx.repos.bookings().find_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn losing_a_slot_race_refunds_the_deposit() {
        let fx = fixture().await;
        fx.gateway.seed_captured("pi_1", 5_000, "usd");
        fx.gateway.seed_captured("pi_2", 5_000, "usd");

        fx.coordinator
            .reserve(request(&fx, "pi_1", "ada@example.com"))
            .await
            .unwrap();

        let err = fx
            .coordinator
            .reserve(request(&fx, "pi_2", "grace@example.com"))
            .await
            .unwrap_err();

        assert!(matches!(err, DomainError::SlotConflict { .. }));
        assert_eq!(fx.gateway.refund_calls(), 1);

        // Only the winner's booking exists
        assert_eq!(fx.repos.bookings().find_all().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn refund_failure_keeps_original_error_and_alerts() {
        let fx = fixture().await;
        fx.gateway.seed_captured("pi_1", 5_000, "usd");
        fx.gateway.seed_captured("pi_2", 5_000, "usd");

        let mut subscriber = fx.event_bus.subscribe();

        fx.coordinator
            .reserve(request(&fx, "pi_1", "ada@example.com"))
            .await
            .unwrap();
        fx.gateway.fail_refunds(true);

        let err = fx
            .coordinator
            .reserve(request(&fx, "pi_2", "grace@example.com"))
            .await
            .unwrap_err();

        // The client still sees the conflict, not the refund failure
        assert!(matches!(err, DomainError::SlotConflict { .. }));

        // The unreconciled charge is escalated on the event bus
        let mut saw_refund_failed = false;
        while let Ok(Some(msg)) = tokio::time::timeout(
            std::time::Duration::from_millis(100),
            subscriber.recv(),
        )
        .await
        {
            if msg.event.event_type() == "refund_failed" {
                saw_refund_failed = true;
                break;
            }
        }
        assert!(saw_refund_failed);
    }

    #[tokio::test]
    async fn cancelled_slot_can_be_rebooked() {
        let fx = fixture().await;
        fx.gateway.seed_captured("pi_1", 5_000, "usd");
        fx.gateway.seed_captured("pi_2", 5_000, "usd");

        let booking = fx
            .coordinator
            .reserve(request(&fx, "pi_1", "ada@example.com"))
            .await
            .unwrap();
        fx.repos
            .bookings()
            .update_status(&booking.id, BookingStatus::Cancelled)
            .await
            .unwrap();

        // Identical slot, different customer: succeeds
        assert!(fx
            .coordinator
            .reserve(request(&fx, "pi_2", "grace@example.com"))
            .await
            .is_ok());
    }

    #[tokio::test]
    async fn guest_is_matched_by_email_on_repeat_booking() {
        let fx = fixture().await;
        fx.gateway.seed_captured("pi_1", 5_000, "usd");
        fx.gateway.seed_captured("pi_2", 5_000, "usd");

        let first = fx
            .coordinator
            .reserve(request(&fx, "pi_1", "ada@example.com"))
            .await
            .unwrap();

        let mut req = request(&fx, "pi_2", "ada@example.com");
        req.time = NaiveTime::from_hms_opt(15, 0, 0).unwrap();
        let second = fx.coordinator.reserve(req).await.unwrap();

        assert_eq!(first.customer_id, second.customer_id);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_attempts_for_one_slot_admit_at_most_one() {
        let fx = Arc::new(fixture().await);
        fx.gateway.seed_captured("pi_1", 5_000, "usd");
        fx.gateway.seed_captured("pi_2", 5_000, "usd");

        let a = {
            let fx = fx.clone();
            let req = request(&fx, "pi_1", "ada@example.com");
            tokio::spawn(async move { fx.coordinator.reserve(req).await })
        };
        let b = {
            let fx = fx.clone();
            let req = request(&fx, "pi_2", "grace@example.com");
            tokio::spawn(async move { fx.coordinator.reserve(req).await })
        };

        let (a, b) = (a.await.unwrap(), b.await.unwrap());
        let successes = [&a, &b].iter().filter(|r| r.is_ok()).count();
        assert_eq!(successes, 1);

        let loser = if a.is_err() { a } else { b };
        assert!(matches!(
            loser.unwrap_err(),
            DomainError::SlotConflict { .. }
        ));
        // The loser's charge was compensated
        assert_eq!(fx.gateway.refund_calls(), 1);
        assert_eq!(fx.repos.bookings().find_all().await.unwrap().len(), 1);
    }
}
