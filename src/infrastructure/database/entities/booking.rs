//! Booking entity

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "bookings")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    pub customer_id: String,
    pub service_variant_id: String,

    #[sea_orm(nullable)]
    pub stylist_id: Option<String>,

    #[sea_orm(nullable)]
    pub promotion_code: Option<String>,

    /// Appointment calendar date
    pub date: Date,

    /// Appointment time of day, stored to whole minutes
    pub time: Time,

    /// Booking status: Booked, CheckedIn, InProgress, Completed, Cancelled
    pub status: String,

    /// Quoted price in minor currency units
    pub price_minor: i64,

    /// Deposit collected at reservation, minor currency units
    pub deposit_minor: i64,

    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::customer::Entity",
        from = "Column::CustomerId",
        to = "super::customer::Column::Id"
    )]
    Customer,
    #[sea_orm(
        belongs_to = "super::service_variant::Entity",
        from = "Column::ServiceVariantId",
        to = "super::service_variant::Column::Id"
    )]
    ServiceVariant,
    #[sea_orm(
        belongs_to = "super::stylist::Entity",
        from = "Column::StylistId",
        to = "super::stylist::Column::Id"
    )]
    Stylist,
    #[sea_orm(has_many = "super::payment::Entity")]
    Payments,
}

impl Related<super::customer::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Customer.def()
    }
}

impl Related<super::service_variant::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ServiceVariant.def()
    }
}

impl Related<super::stylist::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Stylist.def()
    }
}

impl Related<super::payment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Payments.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
