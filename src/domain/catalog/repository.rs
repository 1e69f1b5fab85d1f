//! Catalog repository interface

use async_trait::async_trait;

use super::model::{ServiceVariant, Stylist};
use crate::domain::DomainResult;

#[async_trait]
pub trait CatalogRepository: Send + Sync {
    async fn save_service_variant(&self, variant: ServiceVariant) -> DomainResult<()>;

    async fn find_service_variant(&self, id: &str) -> DomainResult<Option<ServiceVariant>>;

    async fn list_service_variants(&self) -> DomainResult<Vec<ServiceVariant>>;

    async fn save_stylist(&self, stylist: Stylist) -> DomainResult<()>;

    async fn find_stylist(&self, id: &str) -> DomainResult<Option<Stylist>>;

    async fn list_stylists(&self) -> DomainResult<Vec<Stylist>>;
}
