pub mod model;
pub mod repository;

pub use model::{Channel, NotificationKind, NotificationRecord};
pub use repository::NotificationRepository;
