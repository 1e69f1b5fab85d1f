//! Payment repository interface

use async_trait::async_trait;

use super::model::Payment;
use crate::domain::DomainResult;

#[async_trait]
pub trait PaymentRepository: Send + Sync {
    /// Record a payment against a booking
    async fn save(&self, payment: Payment) -> DomainResult<()>;

    /// All payments recorded for a booking, oldest first
    async fn find_for_booking(&self, booking_id: &str) -> DomainResult<Vec<Payment>>;
}
