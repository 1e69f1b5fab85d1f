//! Booking repository interface

use async_trait::async_trait;
use chrono::NaiveDate;

use super::model::{Booking, BookingStatus};
use crate::domain::payment::Payment;
use crate::domain::DomainResult;

#[async_trait]
pub trait BookingRepository: Send + Sync {
    /// Atomically reserve a slot: re-check the exclusivity rule for the
    /// booking's slot key and insert the booking together with its deposit
    /// payment, all inside one storage transaction.
    ///
    /// Fails with [`crate::domain::DomainError::SlotConflict`] when a
    /// non-cancelled booking already claims the key; in that case nothing is
    /// written.
    async fn reserve(&self, booking: Booking, deposit: Payment) -> DomainResult<Booking>;

    /// Find booking by ID
    async fn find_by_id(&self, id: &str) -> DomainResult<Option<Booking>>;

    /// Find all bookings (any status)
    async fn find_all(&self) -> DomainResult<Vec<Booking>>;

    /// All bookings scheduled on a calendar date (any status)
    async fn find_scheduled_on(&self, date: NaiveDate) -> DomainResult<Vec<Booking>>;

    /// Persist a status change
    async fn update_status(&self, id: &str, status: BookingStatus) -> DomainResult<()>;

    /// Atomically re-check exclusivity for the new stylist (excluding the
    /// booking itself) and persist the assignment.
    async fn assign_stylist(&self, id: &str, stylist_id: &str) -> DomainResult<Booking>;
}
