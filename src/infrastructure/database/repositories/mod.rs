//! SeaORM repository implementations

pub mod booking_repository;
pub mod catalog_repository;
pub mod customer_repository;
pub mod notification_repository;
pub mod payment_repository;
pub mod repository_provider;

pub use repository_provider::SeaOrmRepositoryProvider;
