//! Member entity - A registered member with a tier, stored value and benefit counters.
//!
//! The phone number is the natural key used at the front desk. Benefit counters
//! are never reset automatically; staff reset them through the ledger.

use super::enums::Tier;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Member database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "members")]
pub struct Model {
    /// Unique identifier for the member
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Display name
    pub name: String,
    /// Phone number, unique across members
    #[sea_orm(unique)]
    pub phone: String,
    /// Optional contact email
    pub email: Option<String>,
    /// Membership tier
    pub tier: Tier,
    /// Stored-value balance in dollars
    pub balance: Decimal,
    /// Generic benefit uses granted
    pub benefits_total: i32,
    /// Generic benefit uses consumed
    pub benefits_used: i32,
    /// Dessert/coffee uses since the last weekly reset
    pub dessert_coffee_used: i32,
    /// Omakase uses since the last yearly reset
    pub omakase_used: i32,
    /// Start of the membership window
    pub effective_date: DateTimeUtc,
    /// End of the membership window, open-ended when None
    pub expiry_date: Option<DateTimeUtc>,
    /// When the member was registered
    pub created_at: DateTimeUtc,
    /// Employee who registered the member
    pub created_by_employee_id: Option<i64>,
}

/// Defines relationships between Member and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One member has many checkout transactions
    #[sea_orm(has_many = "super::transaction::Entity")]
    Transactions,
}

impl Related<super::transaction::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Transactions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
