//! Business logic: the reservation saga, booking lifecycle, billing,
//! notification outbox and the reminder scheduler.

pub mod balance;
pub mod billing;
pub mod lifecycle;
pub mod outbox;
pub mod reminders;
pub mod reservation;

pub use billing::{BillingService, BookingStatement, FeeSchedule};
pub use lifecycle::BookingLifecycle;
pub use outbox::NotificationOutbox;
pub use reminders::{ReminderConfig, ReminderScheduler};
pub use reservation::{
    CustomerSelection, ReservationCoordinator, ReservationPolicy, ReservationRequest,
};
