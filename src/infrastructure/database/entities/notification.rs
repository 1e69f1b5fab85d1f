//! Notification ledger entity
//!
//! Append-only; rows are never updated after insert.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "notifications")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    /// Originating booking (correlation key, with `kind` and `channel`)
    pub booking_id: String,

    /// Notification kind: CONFIRMATION, REMINDER, THANK_YOU
    pub kind: String,

    /// Delivery channel: EMAIL, SMS
    pub channel: String,

    /// Email address or phone number
    pub destination: String,

    #[sea_orm(nullable)]
    pub subject: Option<String>,

    pub body: String,

    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
