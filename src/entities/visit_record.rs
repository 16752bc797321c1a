//! Visit record entity - One dated visit by a customer.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Visit record database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "visit_records")]
pub struct Model {
    /// Unique identifier
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Customer who visited
    pub customer_id: i64,
    /// When the visit took place
    pub visit_date: DateTimeUtc,
    /// Amount spent during the visit
    pub amount: Decimal,
    /// Table used
    pub table_number: String,
    /// Server who looked after the table
    pub server: String,
    /// Number of guests
    pub party_size: i32,
    /// Free-form note
    pub note: String,
    /// When the record was created
    pub created_at: DateTimeUtc,
}

/// Defines relationships between `VisitRecord` and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each visit belongs to one customer
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
