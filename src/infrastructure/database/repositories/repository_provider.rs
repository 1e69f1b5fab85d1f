//! SeaORM implementation of RepositoryProvider

use sea_orm::DatabaseConnection;

use crate::domain::booking::BookingRepository;
use crate::domain::catalog::CatalogRepository;
use crate::domain::customer::CustomerRepository;
use crate::domain::notification::NotificationRepository;
use crate::domain::payment::PaymentRepository;
use crate::domain::RepositoryProvider;

use super::booking_repository::SeaOrmBookingRepository;
use super::catalog_repository::SeaOrmCatalogRepository;
use super::customer_repository::SeaOrmCustomerRepository;
use super::notification_repository::SeaOrmNotificationRepository;
use super::payment_repository::SeaOrmPaymentRepository;

/// Unified repository provider backed by SeaORM.
///
/// Holds one connection pool and exposes per-aggregate repository accessors.
///
/// ```ignore
/// let repos = SeaOrmRepositoryProvider::new(db.clone());
/// let booking = repos.bookings().find_by_id("…").await?;
/// let payments = repos.payments().find_for_booking("…").await?;
/// ```
pub struct SeaOrmRepositoryProvider {
    bookings: SeaOrmBookingRepository,
    payments: SeaOrmPaymentRepository,
    customers: SeaOrmCustomerRepository,
    catalog: SeaOrmCatalogRepository,
    notifications: SeaOrmNotificationRepository,
}

impl SeaOrmRepositoryProvider {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            bookings: SeaOrmBookingRepository::new(db.clone()),
            payments: SeaOrmPaymentRepository::new(db.clone()),
            customers: SeaOrmCustomerRepository::new(db.clone()),
            catalog: SeaOrmCatalogRepository::new(db.clone()),
            notifications: SeaOrmNotificationRepository::new(db),
        }
    }
}

impl RepositoryProvider for SeaOrmRepositoryProvider {
    fn bookings(&self) -> &dyn BookingRepository {
        &self.bookings
    }

    fn payments(&self) -> &dyn PaymentRepository {
        &self.payments
    }

    fn customers(&self) -> &dyn CustomerRepository {
        &self.customers
    }

    fn catalog(&self) -> &dyn CatalogRepository {
        &self.catalog
    }

    fn notifications(&self) -> &dyn NotificationRepository {
        &self.notifications
    }
}
