//! # Salon Booking Service
//!
//! Appointment booking backend with deposit collection through an external
//! payment gateway.
//!
//! ## Architecture
//!
//! The project follows Clean Architecture principles:
//!
//! - **domain**: Core business entities, repository traits and domain rules
//! - **application**: The reservation saga, booking lifecycle, billing,
//!   notification outbox and reminder scheduler
//! - **infrastructure**: External concerns (database, payment gateway,
//!   in-memory storage)
//! - **interfaces**: REST API with Swagger documentation
//! - **notifications**: Real-time event broadcasting for UI/ops subscribers
//! - **support**: Errors, graceful shutdown, time helpers

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod interfaces;
pub mod notifications;
pub mod support;

pub use config::{default_config_path, AppConfig};

// Re-export database types for easy access
pub use infrastructure::{init_database, DatabaseConfig, SeaOrmRepositoryProvider};

// Re-export API router
pub use interfaces::http::create_api_router;

// Re-export notifications
pub use notifications::{create_event_bus, Event, EventBus, SharedEventBus};
