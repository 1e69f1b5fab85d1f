//! Repository provider
//!
//! One trait aggregating per-aggregate repository accessors, so services and
//! handlers receive a single injected handle instead of ambient storage.

use crate::domain::booking::BookingRepository;
use crate::domain::catalog::CatalogRepository;
use crate::domain::customer::CustomerRepository;
use crate::domain::notification::NotificationRepository;
use crate::domain::payment::PaymentRepository;

pub trait RepositoryProvider: Send + Sync {
    fn bookings(&self) -> &dyn BookingRepository;

    fn payments(&self) -> &dyn PaymentRepository;

    fn customers(&self) -> &dyn CustomerRepository;

    fn catalog(&self) -> &dyn CatalogRepository;

    fn notifications(&self) -> &dyn NotificationRepository;
}
