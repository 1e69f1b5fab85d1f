//! Real-time event broadcasting
//!
//! Booking lifecycle and operational events published over a tokio broadcast
//! channel for UI and ops subscribers.

pub mod event_bus;
pub mod events;

pub use event_bus::{create_event_bus, EventBus, EventSubscriber, SharedEventBus};
pub use events::{Event, EventMessage};
