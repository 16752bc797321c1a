//! Employee entity - Staff who act on the system.
//!
//! `username` holds the staff member's chat-platform user id so that every
//! command can be attributed without a separate login.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Employee database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "employees")]
pub struct Model {
    /// Unique identifier
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Chat-platform user id, unique
    #[sea_orm(unique)]
    pub username: String,
    /// Display name
    pub name: String,
    /// When the employee was registered
    pub created_at: DateTimeUtc,
}

/// Employees are referenced by id only, no navigable relations
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
