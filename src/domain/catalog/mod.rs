pub mod model;
pub mod repository;

pub use model::{ServiceVariant, Stylist};
pub use repository::CatalogRepository;
