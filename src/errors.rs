//! Unified error type for the ledger, the CRM records and the staff interface.

use crate::{core::ledger::Benefit, entities::Tier};
use rust_decimal::Decimal;
use thiserror::Error;

/// Every failure the crate can report.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration could not be read or parsed
    #[error("Configuration error: {message}")]
    Config {
        /// What went wrong
        message: String,
    },

    /// Underlying database failure
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// No member with the given id or phone
    #[error("Member not found: {member}")]
    MemberNotFound {
        /// Id or phone used for the lookup
        member: String,
    },

    /// No customer with the given id
    #[error("Customer not found: {id}")]
    CustomerNotFound {
        /// Customer id
        id: i64,
    },

    /// No reservation with the given id
    #[error("Reservation not found: {id}")]
    ReservationNotFound {
        /// Reservation id
        id: i64,
    },

    /// The acting chat user has no staff record
    #[error("Staff member not registered: {username}")]
    StaffNotRegistered {
        /// Chat-platform user id
        username: String,
    },

    /// Monetary amount outside the accepted range
    #[error("Invalid amount: {amount}")]
    InvalidAmount {
        /// Rejected amount
        amount: Decimal,
    },

    /// Non-monetary input rejected by validation
    #[error("Invalid input: {message}")]
    InvalidInput {
        /// Why the input was rejected
        message: String,
    },

    /// The member's tier carries no such benefit
    #[error("{benefit} is not available for {tier} members")]
    TierIneligible {
        /// Member tier
        tier: Tier,
        /// Requested benefit
        benefit: Benefit,
    },

    /// A counted benefit has already been used up for the period
    #[error("{benefit} quota of {quota} already used")]
    QuotaExceeded {
        /// Requested benefit
        benefit: Benefit,
        /// Per-period quota for the member's tier
        quota: i32,
    },

    /// All generic benefit uses have been consumed
    #[error("No benefits remaining ({used}/{total} used)")]
    BenefitExhausted {
        /// Uses granted
        total: i32,
        /// Uses consumed
        used: i32,
    },

    /// Phone number already registered
    #[error("Phone number already registered: {phone}")]
    DuplicatePhone {
        /// Conflicting phone number
        phone: String,
    },

    /// Staff username already registered
    #[error("Username already registered: {username}")]
    DuplicateUsername {
        /// Conflicting username
        username: String,
    },

    /// A guarded write lost against a concurrent change to the same member
    #[error("Member {member_id} was modified concurrently, please retry")]
    ConcurrentUpdate {
        /// Member id
        member_id: i64,
    },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Environment variable error
    #[error("Environment variable error: {0}")]
    EnvVar(#[from] std::env::VarError),

    /// Formatting error while building a reply
    #[error("Formatting error: {0}")]
    Fmt(#[from] std::fmt::Error),

    /// Serenity/Poise framework error
    #[error("Serenity/Poise framework error: {0}")]
    #[allow(clippy::enum_variant_names)]
    FrameworkError(Box<poise::serenity_prelude::Error>),
}

impl From<poise::serenity_prelude::Error> for Error {
    fn from(value: poise::serenity_prelude::Error) -> Self {
        Self::FrameworkError(Box::new(value))
    }
}

/// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;
