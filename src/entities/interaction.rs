//! Interaction entity - A call, complaint, compliment, request or marketing contact.

use super::enums::InteractionKind;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Interaction database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "interactions")]
pub struct Model {
    /// Unique identifier
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Customer concerned
    pub customer_id: i64,
    /// Kind of contact
    pub kind: InteractionKind,
    /// Free-form note
    pub note: String,
    /// When the interaction was logged
    pub created_at: DateTimeUtc,
    /// Employee who logged it
    pub created_by_employee_id: Option<i64>,
}

/// Defines relationships between Interaction and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each interaction belongs to one customer
    #[sea_orm(
        belongs_to = "super::customer::Entity",
        from = "Column::CustomerId",
        to = "super::customer::Column::Id",
        on_delete = "Cascade"
    )]
    Customer,
}

impl Related<super::customer::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Customer.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
