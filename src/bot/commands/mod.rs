//! Discord command implementations organized by area.

#![allow(clippy::too_long_first_doc_paragraph)]

/// Bill settlement
pub mod checkout;

/// Customer records, visits and interactions
pub mod customer;

/// General utility commands
pub mod general;

/// Membership and benefit commands
pub mod member;

/// Table booking commands
pub mod reservation;

/// Staff account commands
pub mod staff;

// Export commands
pub use checkout::*;
pub use customer::*;
pub use general::*;
pub use member::*;
pub use reservation::*;
pub use staff::*;
