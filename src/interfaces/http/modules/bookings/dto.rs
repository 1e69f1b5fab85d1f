//! Booking DTOs

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::application::BookingStatement;
use crate::domain::payment::Payment;

/// Guest customer details supplied with a reservation
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct GuestCustomerDto {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    /// Contact email; guests are matched to existing records by this
    #[validate(email)]
    pub email: String,
    pub phone: Option<String>,
    /// Consent to email notifications
    #[serde(default = "default_true")]
    pub email_opt_in: bool,
    /// Consent to SMS notifications
    #[serde(default)]
    pub sms_opt_in: bool,
}

fn default_true() -> bool {
    true
}

/// Request to reserve a slot with an already-captured deposit payment
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateBookingRequest {
    #[validate(nested)]
    pub customer: GuestCustomerDto,
    #[validate(length(min = 1))]
    pub service_variant_id: String,
    /// Stylist to book; omit for "any stylist"
    pub stylist_id: Option<String>,
    pub promotion_code: Option<String>,
    /// Appointment date (YYYY-MM-DD)
    #[validate(length(min = 1))]
    pub date: String,
    /// Appointment time (HH:MM)
    #[validate(length(min = 1))]
    pub time: String,
    /// Gateway reference of the captured deposit payment
    #[validate(length(min = 1))]
    pub payment_reference: String,
}

/// Request to move a booking to a new status
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateStatusRequest {
    /// One of: Booked, CheckedIn, InProgress, Completed, Cancelled
    pub status: String,
}

/// Request to (re)assign a stylist
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct AssignStylistRequest {
    #[validate(length(min = 1))]
    pub stylist_id: String,
}

/// Request to record a secondary payment toward the outstanding balance
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RecordPaymentRequest {
    /// Amount toward the service, minor currency units
    #[validate(range(min = 1))]
    pub amount_minor: i64,
    /// Gateway reference for card payments; omit for cash
    pub gateway_reference: Option<String>,
}

/// Booking details with projected money state
#[derive(Debug, Serialize, ToSchema)]
pub struct BookingDto {
    pub id: String,
    pub customer_id: String,
    pub service_variant_id: String,
    pub stylist_id: Option<String>,
    pub promotion_code: Option<String>,
    pub date: String,
    pub time: String,
    pub status: String,
    pub price_minor: i64,
    pub deposit_minor: i64,
    pub paid_minor: i64,
    pub outstanding_minor: i64,
    pub created_at: String,
}

impl BookingDto {
    pub fn from_statement(statement: BookingStatement) -> Self {
        let b = statement.booking;
        Self {
            id: b.id,
            customer_id: b.customer_id,
            service_variant_id: b.service_variant_id,
            stylist_id: b.stylist_id,
            promotion_code: b.promotion_code,
            date: b.date.to_string(),
            time: b.time.format("%H:%M").to_string(),
            status: b.status.as_str().to_string(),
            price_minor: b.price_minor,
            deposit_minor: b.deposit_minor,
            paid_minor: statement.paid_minor,
            outstanding_minor: statement.outstanding_minor,
            created_at: b.created_at.to_rfc3339(),
        }
    }
}

/// A recorded payment in API responses
#[derive(Debug, Serialize, ToSchema)]
pub struct PaymentDto {
    pub id: String,
    pub amount_minor: i64,
    pub external_ref: String,
    pub status: String,
    pub created_at: String,
}

impl From<Payment> for PaymentDto {
    fn from(p: Payment) -> Self {
        Self {
            id: p.id,
            amount_minor: p.amount_minor,
            external_ref: p.external_ref,
            status: p.status.as_str().to_string(),
            created_at: p.created_at.to_rfc3339(),
        }
    }
}

/// A created payment intent for the outstanding balance
#[derive(Debug, Serialize, ToSchema)]
pub struct PaymentIntentDto {
    pub reference: String,
    pub client_secret: String,
    /// Outstanding balance plus the processing-fee surcharge
    pub amount_minor: i64,
    pub currency: String,
}
