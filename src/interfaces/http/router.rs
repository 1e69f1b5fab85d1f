//! API Router with Swagger UI

use std::sync::Arc;
use std::time::Instant;

use axum::{
    routing::{get, post},
    Router,
};
use metrics_exporter_prometheus::PrometheusHandle;
use sea_orm::DatabaseConnection;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::application::{BillingService, BookingLifecycle, ReservationCoordinator};
use crate::domain::RepositoryProvider;
use crate::interfaces::http::modules::bookings::{self, BookingAppState};
use crate::interfaces::http::modules::catalog::{self, CatalogAppState};
use crate::interfaces::http::modules::health::{self, HealthState};
use crate::interfaces::http::modules::metrics::{self, MetricsState};

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        // Health
        health::handlers::health_check,
        // Bookings
        bookings::handlers::create_booking,
        bookings::handlers::list_bookings,
        bookings::handlers::get_booking,
        bookings::handlers::update_status,
        bookings::handlers::check_in,
        bookings::handlers::assign_stylist,
        bookings::handlers::list_payments,
        bookings::handlers::record_payment,
        bookings::handlers::create_payment_intent,
        // Catalog
        catalog::handlers::list_services,
        catalog::handlers::list_stylists,
    ),
    components(schemas(
        bookings::dto::CreateBookingRequest,
        bookings::dto::GuestCustomerDto,
        bookings::dto::UpdateStatusRequest,
        bookings::dto::AssignStylistRequest,
        bookings::dto::RecordPaymentRequest,
        bookings::dto::BookingDto,
        bookings::dto::PaymentDto,
        bookings::dto::PaymentIntentDto,
        catalog::dto::ServiceVariantDto,
        catalog::dto::StylistDto,
        health::handlers::HealthResponse,
        health::handlers::ComponentHealth,
    )),
    tags(
        (name = "Bookings", description = "Reservation, lifecycle and payment operations"),
        (name = "Catalog", description = "Bookable services and stylists"),
        (name = "Health", description = "Service health")
    )
)]
struct ApiDoc;

/// Build the full API router.
#[allow(clippy::too_many_arguments)]
pub fn create_api_router(
    repos: Arc<dyn RepositoryProvider>,
    coordinator: Arc<ReservationCoordinator>,
    lifecycle: Arc<BookingLifecycle>,
    billing: Arc<BillingService>,
    db: DatabaseConnection,
    prometheus_handle: PrometheusHandle,
) -> Router {
    let booking_state = BookingAppState {
        repos: repos.clone(),
        coordinator,
        lifecycle,
        billing,
    };

    let booking_routes = Router::new()
        .route(
            "/api/v1/bookings",
            post(bookings::handlers::create_booking).get(bookings::handlers::list_bookings),
        )
        .route(
            "/api/v1/bookings/{booking_id}",
            get(bookings::handlers::get_booking),
        )
        .route(
            "/api/v1/bookings/{booking_id}/status",
            post(bookings::handlers::update_status),
        )
        .route(
            "/api/v1/bookings/{booking_id}/check-in",
            post(bookings::handlers::check_in),
        )
        .route(
            "/api/v1/bookings/{booking_id}/assign",
            post(bookings::handlers::assign_stylist),
        )
        .route(
            "/api/v1/bookings/{booking_id}/payments",
            get(bookings::handlers::list_payments).post(bookings::handlers::record_payment),
        )
        .route(
            "/api/v1/bookings/{booking_id}/payment-intent",
            post(bookings::handlers::create_payment_intent),
        )
        .with_state(booking_state);

    let catalog_routes = Router::new()
        .route("/api/v1/services", get(catalog::handlers::list_services))
        .route("/api/v1/stylists", get(catalog::handlers::list_stylists))
        .with_state(CatalogAppState { repos });

    let health_routes = Router::new()
        .route("/health", get(health::handlers::health_check))
        .with_state(HealthState {
            db,
            started_at: Arc::new(Instant::now()),
        });

    let metrics_routes = Router::new()
        .route("/metrics", get(metrics::handlers::prometheus_metrics))
        .with_state(MetricsState {
            handle: prometheus_handle,
        });

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .merge(booking_routes)
        .merge(catalog_routes)
        .merge(health_routes)
        .merge(metrics_routes)
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}
