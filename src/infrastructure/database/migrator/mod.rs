//! Database migrations module

pub use sea_orm_migration::prelude::*;

mod m20250601_000001_create_customers;
mod m20250601_000002_create_stylists;
mod m20250601_000003_create_service_variants;
mod m20250601_000004_create_bookings;
mod m20250601_000005_create_payments;
mod m20250601_000006_create_notifications;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250601_000001_create_customers::Migration),
            Box::new(m20250601_000002_create_stylists::Migration),
            Box::new(m20250601_000003_create_service_variants::Migration),
            Box::new(m20250601_000004_create_bookings::Migration),
            Box::new(m20250601_000005_create_payments::Migration),
            Box::new(m20250601_000006_create_notifications::Migration),
        ]
    }
}
