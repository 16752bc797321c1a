//! Transaction entity - The immutable receipt of one checkout.
//!
//! Amounts are stored exactly as settled. `final_amount` is always
//! `original_amount - discount_amount` and `cash_paid` is always
//! `final_amount - paid_from_balance`.
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Transaction database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "transactions")]
pub struct Model {
    /// Unique identifier for the transaction
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Member charged, None once the member has been deleted
    pub member_id: Option<i64>,
    /// Charge before discount
    pub original_amount: Decimal,
    /// Tier discount applied
    pub discount_amount: Decimal,
    /// Charge after discount
    pub final_amount: Decimal,
    /// Portion paid from the member's stored value
    pub paid_from_balance: Decimal,
    /// Portion paid in cash
    pub cash_paid: Decimal,
    /// When the checkout happened
    pub created_at: DateTimeUtc,
    /// Employee who rang up the checkout
    pub created_by_employee_id: Option<i64>,
    /// Tier and discount summary
    pub note: String,
}

/// Defines relationships between Transaction and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each transaction belongs to at most one member
    #[sea_orm(
        belongs_to = "super::member::Entity",
        from = "Column::MemberId",
        to = "super::member::Column::Id",
        on_delete = "SetNull"
    )]
    Member,
}

impl Related<super::member::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Member.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
