//! Core business logic - framework-agnostic operations on the restaurant's data.
//!
//! Nothing in here knows about the chat interface. Every function takes a
//! database connection and, where attribution or tier policy is needed, a
//! [`RequestContext`].

/// Checkout settlement and transaction history
pub mod checkout;
/// Request-scoped context (acting employee and settings)
pub mod context;
/// Customer profiles, visits and interactions
pub mod customer;
/// Headline numbers for the front desk
pub mod dashboard;
/// Membership benefit counters and stored value
pub mod ledger;
/// Member registration, edits and lookups
pub mod member;
/// Money parsing and rounding
pub mod money;
/// Table bookings
pub mod reservation;
/// Employees
pub mod staff;

pub use context::RequestContext;
