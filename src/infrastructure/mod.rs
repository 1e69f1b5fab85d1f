//! External concerns: persistence, payment gateway, in-memory storage.

pub mod database;
pub mod gateway;
pub mod storage;

pub use database::{init_database, DatabaseConfig, SeaOrmRepositoryProvider};
pub use gateway::{PaymentGateway, SimulatedGateway};
