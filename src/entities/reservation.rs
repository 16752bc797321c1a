//! Reservation entity - A table booking.
//!
//! `date` is the local wall-clock time of the booking as entered by staff.

use super::enums::ReservationStatus;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Reservation database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "reservations")]
pub struct Model {
    /// Unique identifier
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Linked customer record, if the guest is known
    pub customer_id: Option<i64>,
    /// Name the booking is under
    pub name: String,
    /// Contact phone
    pub phone: String,
    /// Optional contact email
    pub email: Option<String>,
    /// Local date and time of the booking
    pub date: DateTime,
    /// Number of guests
    pub party_size: i32,
    /// Assigned table, empty when unassigned
    pub table_number: String,
    /// Booking status
    pub status: ReservationStatus,
    /// Free-form note
    pub note: String,
    /// When the booking was taken
    pub created_at: DateTimeUtc,
    /// Employee who took the booking
    pub created_by_employee_id: Option<i64>,
}

/// Reservations reference customers loosely, no navigable relations
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
