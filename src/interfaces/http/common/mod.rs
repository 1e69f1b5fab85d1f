//! Shared HTTP plumbing: response envelope, validated JSON extractor and
//! domain-error mapping.

pub mod validated_json;

pub use validated_json::ValidatedJson;

use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::DomainError;

/// Standard API response wrapper
///
/// Every REST endpoint returns data in this envelope.
/// On success: `{"success": true, "data": {...}}`,
/// on error: `{"success": false, "error": "description"}`.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ApiResponse<T> {
    /// `true` if the request succeeded
    pub success: bool,
    /// Payload; `null` on error
    pub data: Option<T>,
    /// Error description; `null` on success
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

/// HTTP status for a domain error.
///
/// Refund failures never surface here: the coordinator reports the original
/// reservation failure and escalates the refund problem out of band.
pub fn status_for(error: &DomainError) -> StatusCode {
    match error {
        DomainError::NotFound { .. } => StatusCode::NOT_FOUND,
        DomainError::Validation(_) | DomainError::InvalidSelection(_) => StatusCode::BAD_REQUEST,
        DomainError::PaymentNotCaptured(_) => StatusCode::PAYMENT_REQUIRED,
        DomainError::SlotConflict { .. }
        | DomainError::OutsideCheckInWindow { .. }
        | DomainError::InvalidStatusTransition { .. } => StatusCode::CONFLICT,
        DomainError::GatewayUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        DomainError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Map a domain error to the standard error response.
pub fn domain_error<T>(error: DomainError) -> (StatusCode, Json<ApiResponse<T>>) {
    (status_for(&error), Json(ApiResponse::error(error.to_string())))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn conflict_errors_map_to_409() {
        let e = DomainError::SlotConflict {
            date: "2026-05-20".into(),
            time: "10:00".into(),
        };
        assert_eq!(status_for(&e), StatusCode::CONFLICT);
    }

    #[test]
    fn payment_errors_map_to_402() {
        let e = DomainError::PaymentNotCaptured("pi_1".into());
        assert_eq!(status_for(&e), StatusCode::PAYMENT_REQUIRED);
    }

    #[test]
    fn retryable_gateway_errors_map_to_503() {
        let e = DomainError::GatewayUnavailable("boom".into());
        assert_eq!(status_for(&e), StatusCode::SERVICE_UNAVAILABLE);
    }
}
