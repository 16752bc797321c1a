//! Entity module - Contains all SeaORM entity definitions for the database.
//! These entities represent the database tables and their relationships.
//! Each entity has a Model struct for data and an Entity struct for operations.

pub mod customer;
pub mod employee;
pub mod enums;
pub mod interaction;
pub mod member;
pub mod reservation;
pub mod transaction;
pub mod visit_record;

// Re-export specific types to avoid conflicts
pub use customer::{Column as CustomerColumn, Entity as Customer, Model as CustomerModel};
pub use employee::{Column as EmployeeColumn, Entity as Employee, Model as EmployeeModel};
pub use enums::{InteractionKind, ReservationStatus, Tier};
pub use interaction::{
    Column as InteractionColumn, Entity as Interaction, Model as InteractionModel,
};
pub use member::{Column as MemberColumn, Entity as Member, Model as MemberModel};
pub use reservation::{
    Column as ReservationColumn, Entity as Reservation, Model as ReservationModel,
};
pub use transaction::{
    Column as TransactionColumn, Entity as Transaction, Model as TransactionModel,
};
pub use visit_record::{
    Column as VisitRecordColumn, Entity as VisitRecord, Model as VisitRecordModel,
};
