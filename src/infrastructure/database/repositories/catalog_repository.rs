//! SeaORM implementation of CatalogRepository

use async_trait::async_trait;
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, QueryOrder, Set};

use crate::domain::catalog::{CatalogRepository, ServiceVariant, Stylist};
use crate::domain::{DomainError, DomainResult};
use crate::infrastructure::database::entities::{service_variant, stylist};

pub struct SeaOrmCatalogRepository {
    db: DatabaseConnection,
}

impl SeaOrmCatalogRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn variant_to_domain(m: service_variant::Model) -> ServiceVariant {
    ServiceVariant {
        id: m.id,
        name: m.name,
        category: m.category,
        price_minor: m.price_minor,
        duration_minutes: m.duration_minutes,
        is_active: m.is_active,
        created_at: m.created_at,
    }
}

fn stylist_to_domain(m: stylist::Model) -> Stylist {
    Stylist {
        id: m.id,
        name: m.name,
        is_active: m.is_active,
        price_modifier_minor: m.price_modifier_minor,
        created_at: m.created_at,
    }
}

fn db_err(e: sea_orm::DbErr) -> DomainError {
    DomainError::Storage(format!("Database error: {}", e))
}

#[async_trait]
impl CatalogRepository for SeaOrmCatalogRepository {
    async fn save_service_variant(&self, v: ServiceVariant) -> DomainResult<()> {
        let model = service_variant::ActiveModel {
            id: Set(v.id),
            name: Set(v.name),
            category: Set(v.category),
            price_minor: Set(v.price_minor),
            duration_minutes: Set(v.duration_minutes),
            is_active: Set(v.is_active),
            created_at: Set(v.created_at),
        };
        model.insert(&self.db).await.map_err(db_err)?;
        Ok(())
    }

    async fn find_service_variant(&self, id: &str) -> DomainResult<Option<ServiceVariant>> {
        let model = service_variant::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?;
        Ok(model.map(variant_to_domain))
    }

    async fn list_service_variants(&self) -> DomainResult<Vec<ServiceVariant>> {
        let models = service_variant::Entity::find()
            .order_by_asc(service_variant::Column::Name)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        Ok(models.into_iter().map(variant_to_domain).collect())
    }

    async fn save_stylist(&self, s: Stylist) -> DomainResult<()> {
        let model = stylist::ActiveModel {
            id: Set(s.id),
            name: Set(s.name),
            is_active: Set(s.is_active),
            price_modifier_minor: Set(s.price_modifier_minor),
            created_at: Set(s.created_at),
        };
        model.insert(&self.db).await.map_err(db_err)?;
        Ok(())
    }

    async fn find_stylist(&self, id: &str) -> DomainResult<Option<Stylist>> {
        let model = stylist::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?;
        Ok(model.map(stylist_to_domain))
    }

    async fn list_stylists(&self) -> DomainResult<Vec<Stylist>> {
        let models = stylist::Entity::find()
            .order_by_asc(stylist::Column::Name)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        Ok(models.into_iter().map(stylist_to_domain).collect())
    }
}
