//! Catalog HTTP handlers
//!
//! Read-only; catalog management happens elsewhere. These endpoints exist so
//! booking clients can resolve valid service/stylist selections.

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;

use crate::domain::RepositoryProvider;
use crate::interfaces::http::common::{domain_error, ApiResponse};

use super::dto::*;

/// Application state for catalog handlers.
#[derive(Clone)]
pub struct CatalogAppState {
    pub repos: Arc<dyn RepositoryProvider>,
}

#[utoipa::path(
    get,
    path = "/api/v1/services",
    tag = "Catalog",
    responses(
        (status = 200, description = "Active service variants", body = ApiResponse<Vec<ServiceVariantDto>>)
    )
)]
pub async fn list_services(
    State(state): State<CatalogAppState>,
) -> Result<
    Json<ApiResponse<Vec<ServiceVariantDto>>>,
    (StatusCode, Json<ApiResponse<Vec<ServiceVariantDto>>>),
> {
    let variants = state
        .repos
        .catalog()
        .list_service_variants()
        .await
        .map_err(domain_error)?;

    Ok(Json(ApiResponse::success(
        variants
            .into_iter()
            .filter(|v| v.is_active)
            .map(ServiceVariantDto::from)
            .collect(),
    )))
}

#[utoipa::path(
    get,
    path = "/api/v1/stylists",
    tag = "Catalog",
    responses(
        (status = 200, description = "Active stylists", body = ApiResponse<Vec<StylistDto>>)
    )
)]
pub async fn list_stylists(
    State(state): State<CatalogAppState>,
) -> Result<
    Json<ApiResponse<Vec<StylistDto>>>,
    (StatusCode, Json<ApiResponse<Vec<StylistDto>>>),
> {
    let stylists = state
        .repos
        .catalog()
        .list_stylists()
        .await
        .map_err(domain_error)?;

    Ok(Json(ApiResponse::success(
        stylists
            .into_iter()
            .filter(|s| s.is_active)
            .map(StylistDto::from)
            .collect(),
    )))
}
