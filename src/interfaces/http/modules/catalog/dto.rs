//! Catalog DTOs

use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::catalog::{ServiceVariant, Stylist};

/// A bookable service variant in API responses
#[derive(Debug, Serialize, ToSchema)]
pub struct ServiceVariantDto {
    pub id: String,
    pub name: String,
    pub category: String,
    pub price_minor: i64,
    pub duration_minutes: i32,
}

impl From<ServiceVariant> for ServiceVariantDto {
    fn from(v: ServiceVariant) -> Self {
        Self {
            id: v.id,
            name: v.name,
            category: v.category,
            price_minor: v.price_minor,
            duration_minutes: v.duration_minutes,
        }
    }
}

/// A bookable stylist in API responses
#[derive(Debug, Serialize, ToSchema)]
pub struct StylistDto {
    pub id: String,
    pub name: String,
    /// Added to the variant price when this stylist is booked
    pub price_modifier_minor: i64,
}

impl From<Stylist> for StylistDto {
    fn from(s: Stylist) -> Self {
        Self {
            id: s.id,
            name: s.name,
            price_modifier_minor: s.price_modifier_minor,
        }
    }
}
