//! Service catalog entities
//!
//! Catalog management itself (admin CRUD, pricing tables) lives outside this
//! service; these records exist so reservation requests can resolve a price
//! and duration.

use chrono::{DateTime, Utc};

/// A bookable service variant (e.g. "Box braids, medium, shoulder length").
#[derive(Debug, Clone)]
pub struct ServiceVariant {
    /// Unique variant ID
    pub id: String,
    pub name: String,
    /// Category label (e.g. "Braids", "Locs")
    pub category: String,
    /// Base price in minor currency units
    pub price_minor: i64,
    /// Expected duration in minutes
    pub duration_minutes: i32,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl ServiceVariant {
    pub fn new(
        name: impl Into<String>,
        category: impl Into<String>,
        price_minor: i64,
        duration_minutes: i32,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            name: name.into(),
            category: category.into(),
            price_minor,
            duration_minutes,
            is_active: true,
            created_at: Utc::now(),
        }
    }
}

/// A stylist whose calendar slots can be reserved.
#[derive(Debug, Clone)]
pub struct Stylist {
    /// Unique stylist ID
    pub id: String,
    pub name: String,
    pub is_active: bool,
    /// Added to the variant price when this stylist is booked, minor units.
    /// Zero for most stylists; senior stylists carry a positive modifier.
    pub price_modifier_minor: i64,
    pub created_at: DateTime<Utc>,
}

impl Stylist {
    pub fn new(name: impl Into<String>, price_modifier_minor: i64) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            name: name.into(),
            is_active: true,
            price_modifier_minor,
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_variant_is_active() {
        let v = ServiceVariant::new("Knotless braids", "Braids", 18_000, 240);
        assert!(v.is_active);
        assert_eq!(v.price_minor, 18_000);
    }

    #[test]
    fn stylist_modifier_defaults_apply() {
        let s = Stylist::new("Imani", 2_500);
        assert!(s.is_active);
        assert_eq!(s.price_modifier_minor, 2_500);
    }
}
