//! In-memory repository provider for development and testing
//!
//! Mirrors the SeaORM provider's semantics, including slot exclusivity: the
//! check-then-insert pair in `reserve` runs under one lock, so concurrent
//! reservation attempts for the same key serialize exactly as they do on the
//! database transaction.

use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use dashmap::DashMap;

use crate::domain::booking::{Booking, BookingRepository, BookingStatus, SlotKey, SlotOwner};
use crate::domain::catalog::{CatalogRepository, ServiceVariant, Stylist};
use crate::domain::customer::{Customer, CustomerRepository};
use crate::domain::notification::{
    Channel, NotificationKind, NotificationRecord, NotificationRepository,
};
use crate::domain::payment::{Payment, PaymentRepository};
use crate::domain::{DomainError, DomainResult, RepositoryProvider};

pub struct InMemoryStore {
    bookings: DashMap<String, Booking>,
    payments: DashMap<String, Payment>,
    customers: DashMap<String, Customer>,
    variants: DashMap<String, ServiceVariant>,
    stylists: DashMap<String, Stylist>,
    notifications: DashMap<String, NotificationRecord>,
    /// Serializes reserve/assign check-then-insert pairs
    slot_lock: Mutex<()>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self {
            bookings: DashMap::new(),
            payments: DashMap::new(),
            customers: DashMap::new(),
            variants: DashMap::new(),
            stylists: DashMap::new(),
            notifications: DashMap::new(),
            slot_lock: Mutex::new(()),
        }
    }

    fn slot_conflict_exists(&self, key: &SlotKey, exclude: Option<&str>) -> bool {
        self.bookings.iter().any(|entry| {
            let b = entry.value();
            if Some(b.id.as_str()) == exclude || !b.status.blocks_slot() {
                return false;
            }
            if b.date != key.date || b.time != key.time {
                return false;
            }
            match &key.owner {
                SlotOwner::Stylist(stylist_id) => b.stylist_id.as_deref() == Some(stylist_id.as_str()),
                SlotOwner::Customer(customer_id) => b.customer_id == *customer_id,
            }
        })
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

fn conflict_for(key: &SlotKey) -> DomainError {
    DomainError::SlotConflict {
        date: key.date.to_string(),
        time: key.time.format("%H:%M").to_string(),
    }
}

// ── BookingRepository ───────────────────────────────────────────

#[async_trait]
impl BookingRepository for InMemoryStore {
    async fn reserve(&self, booking: Booking, deposit: Payment) -> DomainResult<Booking> {
        if deposit.booking_id != booking.id {
            return Err(DomainError::Validation(
                "Deposit payment does not reference the booking".to_string(),
            ));
        }

        let _guard = self.slot_lock.lock().unwrap_or_else(|e| e.into_inner());

        let key = booking.slot_key();
        if self.slot_conflict_exists(&key, None) {
            return Err(conflict_for(&key));
        }

        self.bookings.insert(booking.id.clone(), booking.clone());
        self.payments.insert(deposit.id.clone(), deposit);
        Ok(booking)
    }

    async fn find_by_id(&self, id: &str) -> DomainResult<Option<Booking>> {
        Ok(self.bookings.get(id).map(|b| b.clone()))
    }

    async fn find_all(&self) -> DomainResult<Vec<Booking>> {
        Ok(self.bookings.iter().map(|e| e.value().clone()).collect())
    }

    async fn find_scheduled_on(&self, date: NaiveDate) -> DomainResult<Vec<Booking>> {
        Ok(self
            .bookings
            .iter()
            .filter(|e| e.value().date == date)
            .map(|e| e.value().clone())
            .collect())
    }

    async fn update_status(&self, id: &str, status: BookingStatus) -> DomainResult<()> {
        let mut booking = self.bookings.get_mut(id).ok_or(DomainError::NotFound {
            entity: "Booking",
            field: "id",
            value: id.to_string(),
        })?;
        booking.status = status;
        booking.updated_at = Utc::now();
        Ok(())
    }

    async fn assign_stylist(&self, id: &str, stylist_id: &str) -> DomainResult<Booking> {
        let _guard = self.slot_lock.lock().unwrap_or_else(|e| e.into_inner());

        let (date, time) = {
            let booking = self.bookings.get(id).ok_or(DomainError::NotFound {
                entity: "Booking",
                field: "id",
                value: id.to_string(),
            })?;
            (booking.date, booking.time)
        };

        let key = SlotKey {
            owner: SlotOwner::Stylist(stylist_id.to_string()),
            date,
            time,
        };
        if self.slot_conflict_exists(&key, Some(id)) {
            return Err(conflict_for(&key));
        }

        let mut booking = self.bookings.get_mut(id).ok_or(DomainError::NotFound {
            entity: "Booking",
            field: "id",
            value: id.to_string(),
        })?;
        booking.stylist_id = Some(stylist_id.to_string());
        booking.updated_at = Utc::now();
        Ok(booking.clone())
    }
}

// ── PaymentRepository ───────────────────────────────────────────

#[async_trait]
impl PaymentRepository for InMemoryStore {
    async fn save(&self, payment: Payment) -> DomainResult<()> {
        self.payments.insert(payment.id.clone(), payment);
        Ok(())
    }

    async fn find_for_booking(&self, booking_id: &str) -> DomainResult<Vec<Payment>> {
        let mut payments: Vec<Payment> = self
            .payments
            .iter()
            .filter(|e| e.value().booking_id == booking_id)
            .map(|e| e.value().clone())
            .collect();
        payments.sort_by_key(|p| p.created_at);
        Ok(payments)
    }
}

// ── CustomerRepository ──────────────────────────────────────────

#[async_trait]
impl CustomerRepository for InMemoryStore {
    async fn save(&self, customer: Customer) -> DomainResult<()> {
        if self
            .customers
            .iter()
            .any(|e| e.value().email == customer.email)
        {
            return Err(DomainError::Storage(format!(
                "customer email already exists: {}",
                customer.email
            )));
        }
        self.customers.insert(customer.id.clone(), customer);
        Ok(())
    }

    async fn find_by_id(&self, id: &str) -> DomainResult<Option<Customer>> {
        Ok(self.customers.get(id).map(|c| c.clone()))
    }

    async fn find_by_email(&self, email: &str) -> DomainResult<Option<Customer>> {
        Ok(self
            .customers
            .iter()
            .find(|e| e.value().email == email)
            .map(|e| e.value().clone()))
    }
}

// ── CatalogRepository ───────────────────────────────────────────

#[async_trait]
impl CatalogRepository for InMemoryStore {
    async fn save_service_variant(&self, variant: ServiceVariant) -> DomainResult<()> {
        self.variants.insert(variant.id.clone(), variant);
        Ok(())
    }

    async fn find_service_variant(&self, id: &str) -> DomainResult<Option<ServiceVariant>> {
        Ok(self.variants.get(id).map(|v| v.clone()))
    }

    async fn list_service_variants(&self) -> DomainResult<Vec<ServiceVariant>> {
        Ok(self.variants.iter().map(|e| e.value().clone()).collect())
    }

    async fn save_stylist(&self, stylist: Stylist) -> DomainResult<()> {
        self.stylists.insert(stylist.id.clone(), stylist);
        Ok(())
    }

    async fn find_stylist(&self, id: &str) -> DomainResult<Option<Stylist>> {
        Ok(self.stylists.get(id).map(|s| s.clone()))
    }

    async fn list_stylists(&self) -> DomainResult<Vec<Stylist>> {
        Ok(self.stylists.iter().map(|e| e.value().clone()).collect())
    }
}

// ── NotificationRepository ──────────────────────────────────────

#[async_trait]
impl NotificationRepository for InMemoryStore {
    async fn append(&self, record: NotificationRecord) -> DomainResult<NotificationRecord> {
        // Same uniqueness the database index enforces
        let duplicate = self.notifications.iter().any(|e| {
            let n = e.value();
            n.booking_id == record.booking_id
                && n.kind == record.kind
                && n.channel == record.channel
        });
        if duplicate {
            return Err(DomainError::Storage(format!(
                "duplicate notification for booking {} ({}, {})",
                record.booking_id, record.kind, record.channel
            )));
        }

        self.notifications.insert(record.id.clone(), record.clone());
        Ok(record)
    }

    async fn exists_for(
        &self,
        booking_id: &str,
        kind: NotificationKind,
        channel: Channel,
    ) -> DomainResult<bool> {
        Ok(self.notifications.iter().any(|e| {
            let n = e.value();
            n.booking_id == booking_id && n.kind == kind && n.channel == channel
        }))
    }

    async fn find_for_booking(&self, booking_id: &str) -> DomainResult<Vec<NotificationRecord>> {
        let mut records: Vec<NotificationRecord> = self
            .notifications
            .iter()
            .filter(|e| e.value().booking_id == booking_id)
            .map(|e| e.value().clone())
            .collect();
        records.sort_by_key(|r| r.created_at);
        Ok(records)
    }
}

// ── RepositoryProvider ──────────────────────────────────────────

/// In-memory provider exposing the shared store through every repository
/// accessor.
pub struct InMemoryRepositoryProvider {
    store: InMemoryStore,
}

impl InMemoryRepositoryProvider {
    pub fn new() -> Self {
        Self {
            store: InMemoryStore::new(),
        }
    }
}

impl Default for InMemoryRepositoryProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl RepositoryProvider for InMemoryRepositoryProvider {
    fn bookings(&self) -> &dyn BookingRepository {
        &self.store
    }

    fn payments(&self) -> &dyn PaymentRepository {
        &self.store
    }

    fn customers(&self) -> &dyn CustomerRepository {
        &self.store
    }

    fn catalog(&self) -> &dyn CatalogRepository {
        &self.store
    }

    fn notifications(&self) -> &dyn NotificationRepository {
        &self.store
    }
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveTime};

    fn booking_at(id: &str, customer: &str, stylist: Option<&str>, hour: u32) -> Booking {
        Booking::new(
            id,
            customer,
            "svc-1",
            stylist.map(String::from),
            None,
            NaiveDate::from_ymd_opt(2026, 5, 20).unwrap(),
            NaiveTime::from_hms_opt(hour, 0, 0).unwrap(),
            8_000,
            5_000,
        )
    }

    fn deposit_for(booking: &Booking) -> Payment {
        Payment::captured(booking.id.clone(), booking.deposit_minor, "pi_test")
    }

    #[tokio::test]
    async fn reserve_then_conflict() {
        let store = InMemoryStore::new();
        let first = booking_at("bk-1", "cust-1", Some("sty-1"), 10);
        store.reserve(first.clone(), deposit_for(&first)).await.unwrap();

        let second = booking_at("bk-2", "cust-2", Some("sty-1"), 10);
        let err = store.reserve(second.clone(), deposit_for(&second)).await;
        assert!(matches!(err, Err(DomainError::SlotConflict { .. })));
    }

    #[tokio::test]
    async fn cancelled_booking_frees_slot() {
        let store = InMemoryStore::new();
        let first = booking_at("bk-1", "cust-1", Some("sty-1"), 10);
        store.reserve(first.clone(), deposit_for(&first)).await.unwrap();
        store
            .update_status("bk-1", BookingStatus::Cancelled)
            .await
            .unwrap();

        let second = booking_at("bk-2", "cust-2", Some("sty-1"), 10);
        assert!(store.reserve(second.clone(), deposit_for(&second)).await.is_ok());
    }

    #[tokio::test]
    async fn customer_cannot_double_book_without_stylist() {
        let store = InMemoryStore::new();
        let first = booking_at("bk-1", "cust-1", None, 10);
        store.reserve(first.clone(), deposit_for(&first)).await.unwrap();

        let second = booking_at("bk-2", "cust-1", None, 10);
        let err = store.reserve(second.clone(), deposit_for(&second)).await;
        assert!(matches!(err, Err(DomainError::SlotConflict { .. })));
    }

    #[tokio::test]
    async fn assign_stylist_rechecks_conflicts() {
        let store = InMemoryStore::new();
        let taken = booking_at("bk-1", "cust-1", Some("sty-1"), 10);
        store.reserve(taken.clone(), deposit_for(&taken)).await.unwrap();

        let other = booking_at("bk-2", "cust-2", Some("sty-2"), 10);
        store.reserve(other.clone(), deposit_for(&other)).await.unwrap();

        let err = store.assign_stylist("bk-2", "sty-1").await;
        assert!(matches!(err, Err(DomainError::SlotConflict { .. })));

        // Moving to a free stylist works
        let updated = store.assign_stylist("bk-2", "sty-3").await.unwrap();
        assert_eq!(updated.stylist_id.as_deref(), Some("sty-3"));
    }

    #[tokio::test]
    async fn notification_uniqueness_enforced() {
        let store = InMemoryStore::new();
        let record = NotificationRecord::new(
            "bk-1",
            NotificationKind::Reminder,
            Channel::Email,
            "a@example.com",
            None,
            "reminder",
        );
        store.append(record.clone()).await.unwrap();

        let dup = NotificationRecord::new(
            "bk-1",
            NotificationKind::Reminder,
            Channel::Email,
            "a@example.com",
            None,
            "reminder again",
        );
        assert!(store.append(dup).await.is_err());
    }
}
