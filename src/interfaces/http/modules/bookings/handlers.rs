//! Booking HTTP handlers

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::{NaiveDate, NaiveTime, Utc};

use crate::application::{
    BillingService, BookingLifecycle, CustomerSelection, ReservationCoordinator,
    ReservationRequest,
};
use crate::domain::booking::BookingStatus;
use crate::domain::RepositoryProvider;
use crate::interfaces::http::common::{domain_error, ApiResponse, ValidatedJson};

use super::dto::*;

/// Application state for booking handlers.
#[derive(Clone)]
pub struct BookingAppState {
    pub repos: Arc<dyn RepositoryProvider>,
    pub coordinator: Arc<ReservationCoordinator>,
    pub lifecycle: Arc<BookingLifecycle>,
    pub billing: Arc<BillingService>,
}

type HandlerResult<T> = Result<Json<ApiResponse<T>>, (StatusCode, Json<ApiResponse<T>>)>;

fn bad_request<T>(message: impl Into<String>) -> (StatusCode, Json<ApiResponse<T>>) {
    (StatusCode::BAD_REQUEST, Json(ApiResponse::error(message)))
}

fn parse_date<T>(s: &str) -> Result<NaiveDate, (StatusCode, Json<ApiResponse<T>>)> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map_err(|e| bad_request(format!("Invalid date: {}", e)))
}

fn parse_time<T>(s: &str) -> Result<NaiveTime, (StatusCode, Json<ApiResponse<T>>)> {
    NaiveTime::parse_from_str(s, "%H:%M")
        .map_err(|e| bad_request(format!("Invalid time: {}", e)))
}

fn parse_status<T>(s: &str) -> Result<BookingStatus, (StatusCode, Json<ApiResponse<T>>)> {
    match s {
        "Booked" => Ok(BookingStatus::Booked),
        "CheckedIn" => Ok(BookingStatus::CheckedIn),
        "InProgress" => Ok(BookingStatus::InProgress),
        "Completed" => Ok(BookingStatus::Completed),
        "Cancelled" => Ok(BookingStatus::Cancelled),
        other => Err(bad_request(format!("Unknown status: {}", other))),
    }
}

async fn statement_dto(
    state: &BookingAppState,
    booking_id: &str,
) -> HandlerResult<BookingDto> {
    state
        .billing
        .statement(booking_id)
        .await
        .map(|s| Json(ApiResponse::success(BookingDto::from_statement(s))))
        .map_err(domain_error)
}

#[utoipa::path(
    post,
    path = "/api/v1/bookings",
    tag = "Bookings",
    request_body = CreateBookingRequest,
    responses(
        (status = 200, description = "Reservation committed", body = ApiResponse<BookingDto>),
        (status = 402, description = "Deposit payment not captured"),
        (status = 409, description = "Slot conflict; the deposit is refunded"),
        (status = 400, description = "Invalid request")
    )
)]
pub async fn create_booking(
    State(state): State<BookingAppState>,
    ValidatedJson(request): ValidatedJson<CreateBookingRequest>,
) -> HandlerResult<BookingDto> {
    let date = parse_date(&request.date)?;
    let time = parse_time(&request.time)?;

    let booking = state
        .coordinator
        .reserve(ReservationRequest {
            customer: CustomerSelection::Guest {
                name: request.customer.name,
                email: request.customer.email,
                phone: request.customer.phone,
                email_opt_in: request.customer.email_opt_in,
                sms_opt_in: request.customer.sms_opt_in,
            },
            service_variant_id: request.service_variant_id,
            stylist_id: request.stylist_id,
            promotion_code: request.promotion_code,
            date,
            time,
            payment_ref: request.payment_reference,
        })
        .await
        .map_err(domain_error)?;

    statement_dto(&state, &booking.id).await
}

#[utoipa::path(
    get,
    path = "/api/v1/bookings",
    tag = "Bookings",
    responses(
        (status = 200, description = "All bookings", body = ApiResponse<Vec<BookingDto>>)
    )
)]
pub async fn list_bookings(
    State(state): State<BookingAppState>,
) -> HandlerResult<Vec<BookingDto>> {
    let bookings = state
        .repos
        .bookings()
        .find_all()
        .await
        .map_err(domain_error)?;

    let mut dtos = Vec::with_capacity(bookings.len());
    for booking in bookings {
        let statement = state
            .billing
            .statement(&booking.id)
            .await
            .map_err(domain_error)?;
        dtos.push(BookingDto::from_statement(statement));
    }

    Ok(Json(ApiResponse::success(dtos)))
}

#[utoipa::path(
    get,
    path = "/api/v1/bookings/{booking_id}",
    tag = "Bookings",
    params(("booking_id" = String, Path, description = "Booking ID")),
    responses(
        (status = 200, description = "Booking details", body = ApiResponse<BookingDto>),
        (status = 404, description = "Not found")
    )
)]
pub async fn get_booking(
    State(state): State<BookingAppState>,
    Path(booking_id): Path<String>,
) -> HandlerResult<BookingDto> {
    statement_dto(&state, &booking_id).await
}

#[utoipa::path(
    post,
    path = "/api/v1/bookings/{booking_id}/status",
    tag = "Bookings",
    params(("booking_id" = String, Path, description = "Booking ID")),
    request_body = UpdateStatusRequest,
    responses(
        (status = 200, description = "Status updated", body = ApiResponse<BookingDto>),
        (status = 409, description = "Invalid transition"),
        (status = 404, description = "Not found")
    )
)]
pub async fn update_status(
    State(state): State<BookingAppState>,
    Path(booking_id): Path<String>,
    Json(request): Json<UpdateStatusRequest>,
) -> HandlerResult<BookingDto> {
    let status = parse_status(&request.status)?;

    state
        .lifecycle
        .update_status(&booking_id, status)
        .await
        .map_err(domain_error)?;

    statement_dto(&state, &booking_id).await
}

#[utoipa::path(
    post,
    path = "/api/v1/bookings/{booking_id}/check-in",
    tag = "Bookings",
    params(("booking_id" = String, Path, description = "Booking ID")),
    responses(
        (status = 200, description = "Checked in", body = ApiResponse<BookingDto>),
        (status = 409, description = "Outside the check-in window"),
        (status = 404, description = "Not found")
    )
)]
pub async fn check_in(
    State(state): State<BookingAppState>,
    Path(booking_id): Path<String>,
) -> HandlerResult<BookingDto> {
    state
        .lifecycle
        .check_in(&booking_id, Utc::now())
        .await
        .map_err(domain_error)?;

    statement_dto(&state, &booking_id).await
}

#[utoipa::path(
    post,
    path = "/api/v1/bookings/{booking_id}/assign",
    tag = "Bookings",
    params(("booking_id" = String, Path, description = "Booking ID")),
    request_body = AssignStylistRequest,
    responses(
        (status = 200, description = "Stylist assigned", body = ApiResponse<BookingDto>),
        (status = 409, description = "Stylist already booked for this slot"),
        (status = 404, description = "Not found")
    )
)]
pub async fn assign_stylist(
    State(state): State<BookingAppState>,
    Path(booking_id): Path<String>,
    ValidatedJson(request): ValidatedJson<AssignStylistRequest>,
) -> HandlerResult<BookingDto> {
    state
        .lifecycle
        .assign_stylist(&booking_id, &request.stylist_id)
        .await
        .map_err(domain_error)?;

    statement_dto(&state, &booking_id).await
}

#[utoipa::path(
    get,
    path = "/api/v1/bookings/{booking_id}/payments",
    tag = "Bookings",
    params(("booking_id" = String, Path, description = "Booking ID")),
    responses(
        (status = 200, description = "Payments for the booking", body = ApiResponse<Vec<PaymentDto>>)
    )
)]
pub async fn list_payments(
    State(state): State<BookingAppState>,
    Path(booking_id): Path<String>,
) -> HandlerResult<Vec<PaymentDto>> {
    let payments = state
        .repos
        .payments()
        .find_for_booking(&booking_id)
        .await
        .map_err(domain_error)?;

    Ok(Json(ApiResponse::success(
        payments.into_iter().map(PaymentDto::from).collect(),
    )))
}

#[utoipa::path(
    post,
    path = "/api/v1/bookings/{booking_id}/payments",
    tag = "Bookings",
    params(("booking_id" = String, Path, description = "Booking ID")),
    request_body = RecordPaymentRequest,
    responses(
        (status = 200, description = "Payment recorded", body = ApiResponse<BookingDto>),
        (status = 402, description = "Gateway payment not captured"),
        (status = 400, description = "Amount exceeds outstanding balance")
    )
)]
pub async fn record_payment(
    State(state): State<BookingAppState>,
    Path(booking_id): Path<String>,
    ValidatedJson(request): ValidatedJson<RecordPaymentRequest>,
) -> HandlerResult<BookingDto> {
    state
        .billing
        .record_payment(&booking_id, request.amount_minor, request.gateway_reference)
        .await
        .map_err(domain_error)?;

    statement_dto(&state, &booking_id).await
}

#[utoipa::path(
    post,
    path = "/api/v1/bookings/{booking_id}/payment-intent",
    tag = "Bookings",
    params(("booking_id" = String, Path, description = "Booking ID")),
    responses(
        (status = 200, description = "Intent for the outstanding balance", body = ApiResponse<PaymentIntentDto>),
        (status = 400, description = "Nothing outstanding"),
        (status = 404, description = "Not found")
    )
)]
pub async fn create_payment_intent(
    State(state): State<BookingAppState>,
    Path(booking_id): Path<String>,
) -> HandlerResult<PaymentIntentDto> {
    let intent = state
        .billing
        .create_payment_intent(&booking_id)
        .await
        .map_err(domain_error)?;

    Ok(Json(ApiResponse::success(PaymentIntentDto {
        reference: intent.reference,
        client_secret: intent.client_secret,
        amount_minor: intent.amount_minor,
        currency: intent.currency,
    })))
}
