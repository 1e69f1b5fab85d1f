//! SeaORM entity definitions

pub mod booking;
pub mod customer;
pub mod notification;
pub mod payment;
pub mod service_variant;
pub mod stylist;
