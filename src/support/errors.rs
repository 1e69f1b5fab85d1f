use thiserror::Error;

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Not found: {entity} with {field}={value}")]
    NotFound {
        entity: &'static str,
        field: &'static str,
        value: String,
    },

    #[error("Validation: {0}")]
    Validation(String),

    #[error("Payment {0} is not captured")]
    PaymentNotCaptured(String),

    #[error("Invalid selection: {0}")]
    InvalidSelection(String),

    #[error("Slot already booked for {date} at {time}")]
    SlotConflict { date: String, time: String },

    #[error("Check-in is only permitted within {window_minutes} minutes of the scheduled time")]
    OutsideCheckInWindow { window_minutes: i64 },

    #[error("Cannot transition booking from {from} to {to}")]
    InvalidStatusTransition {
        from: &'static str,
        to: &'static str,
    },

    #[error("Payment gateway unavailable: {0}")]
    GatewayUnavailable(String),

    #[error("Storage error: {0}")]
    Storage(String),
}

/// Result type for domain operations
pub type DomainResult<T> = Result<T, DomainError>;
