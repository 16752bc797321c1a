//! Customer entity - A guest known to the restaurant, member or not.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Customer database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "customers")]
pub struct Model {
    /// Unique identifier
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Display name
    pub name: String,
    /// Phone number, unique across customers
    #[sea_orm(unique)]
    pub phone: String,
    /// Optional contact email
    pub email: Option<String>,
    /// Optional birthday
    pub birthday: Option<Date>,
    /// Comma-separated free-form tags
    pub tags: String,
    /// Postal address
    pub address: String,
    /// Taste preferences (e.g. "likes it spicy")
    pub preferences: String,
    /// Food allergies
    pub allergies: String,
    /// Extra notes
    pub notes: String,
    /// Number of recorded visits
    pub visits: i32,
    /// Sum of recorded visit amounts
    pub total_spent: Decimal,
    /// Average spend per visit
    pub avg_spend: Decimal,
    /// When the customer was added
    pub created_at: DateTimeUtc,
    /// When the customer was last modified
    pub updated_at: DateTimeUtc,
}

/// Defines relationships between Customer and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One customer has many visit records
    #[sea_orm(has_many = "super::visit_record::Entity")]
    VisitRecords,
    /// One customer has many logged interactions
    #[sea_orm(has_many = "super::interaction::Entity")]
    Interactions,
}

impl Related<super::visit_record::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::VisitRecords.def()
    }
}

impl Related<super::interaction::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Interactions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
