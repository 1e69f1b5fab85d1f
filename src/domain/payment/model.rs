//! Payment domain entity
//!
//! Amounts are integer minor currency units (cents) end to end.

use chrono::{DateTime, Utc};

/// Payment status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentStatus {
    Pending,
    Succeeded,
    Failed,
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Succeeded => "Succeeded",
            Self::Failed => "Failed",
        }
    }

    pub fn from_str(s: &str) -> Self {
        match s {
            "Pending" => Self::Pending,
            "Succeeded" => Self::Succeeded,
            "Failed" => Self::Failed,
            _ => Self::Failed,
        }
    }
}

impl std::fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A payment recorded against a booking
#[derive(Debug, Clone)]
pub struct Payment {
    /// Unique payment ID
    pub id: String,
    /// Owning booking
    pub booking_id: String,
    /// Amount in minor currency units
    pub amount_minor: i64,
    /// Gateway payment reference, or a locally generated placeholder for cash
    pub external_ref: String,
    /// Current status
    pub status: PaymentStatus,
    /// When the payment was recorded
    pub created_at: DateTime<Utc>,
}

impl Payment {
    /// A captured gateway payment (deposit or secondary card payment).
    pub fn captured(
        booking_id: impl Into<String>,
        amount_minor: i64,
        external_ref: impl Into<String>,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            booking_id: booking_id.into(),
            amount_minor,
            external_ref: external_ref.into(),
            status: PaymentStatus::Succeeded,
            created_at: Utc::now(),
        }
    }

    /// A cash payment collected in person. Cash has no processor reference,
    /// so a local placeholder is generated.
    pub fn cash(booking_id: impl Into<String>, amount_minor: i64) -> Self {
        let reference = format!("cash_{}", uuid::Uuid::new_v4());
        Self::captured(booking_id, amount_minor, reference)
    }

    pub fn is_succeeded(&self) -> bool {
        self.status == PaymentStatus::Succeeded
    }
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn captured_payment_is_succeeded() {
        let p = Payment::captured("bk-1", 5_000, "pi_123");
        assert!(p.is_succeeded());
        assert_eq!(p.amount_minor, 5_000);
        assert_eq!(p.external_ref, "pi_123");
    }

    #[test]
    fn cash_payment_gets_local_reference() {
        let p = Payment::cash("bk-1", 3_000);
        assert!(p.external_ref.starts_with("cash_"));
        assert!(p.is_succeeded());
    }

    #[test]
    fn status_roundtrip() {
        for status in &[
            PaymentStatus::Pending,
            PaymentStatus::Succeeded,
            PaymentStatus::Failed,
        ] {
            assert_eq!(&PaymentStatus::from_str(status.as_str()), status);
        }
    }

    #[test]
    fn unknown_status_is_failed() {
        assert_eq!(PaymentStatus::from_str("???"), PaymentStatus::Failed);
    }
}
