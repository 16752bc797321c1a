//! Enumerated column types shared by several entities.
//!
//! Each enum is stored as lowercase text so the database stays readable from
//! any SQLite client.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// Membership tier, governing discount rate and benefit eligibility.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    EnumIter,
    DeriveActiveEnum,
    Serialize,
    Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[serde(rename_all = "snake_case")]
pub enum Tier {
    /// Entry tier
    #[sea_orm(string_value = "standard")]
    Standard,
    /// Premium tier with discount and omakase benefits
    #[sea_orm(string_value = "black_diamond")]
    BlackDiamond,
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Standard => f.write_str("Standard"),
            Self::BlackDiamond => f.write_str("Black Diamond"),
        }
    }
}

impl FromStr for Tier {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .trim()
            .to_lowercase()
            .chars()
            .filter(|c| c.is_alphanumeric())
            .collect();
        match normalized.as_str() {
            "standard" => Ok(Self::Standard),
            "blackdiamond" => Ok(Self::BlackDiamond),
            _ => Err(format!("unknown tier '{s}'")),
        }
    }
}

/// Lifecycle of a table booking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[serde(rename_all = "snake_case")]
pub enum ReservationStatus {
    /// Booked and awaiting the guests
    #[sea_orm(string_value = "confirmed")]
    Confirmed,
    /// Guests are at the table
    #[sea_orm(string_value = "seated")]
    Seated,
    /// Guests have left
    #[sea_orm(string_value = "completed")]
    Completed,
    /// Guests never arrived
    #[sea_orm(string_value = "no_show")]
    NoShow,
    /// Booking withdrawn
    #[sea_orm(string_value = "cancelled")]
    Cancelled,
}

impl ReservationStatus {
    /// Statuses that still occupy a table on the day of the booking.
    #[must_use]
    pub const fn is_open(self) -> bool {
        matches!(self, Self::Confirmed | Self::Seated)
    }
}

impl fmt::Display for ReservationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Confirmed => "confirmed",
            Self::Seated => "seated",
            Self::Completed => "completed",
            Self::NoShow => "no_show",
            Self::Cancelled => "cancelled",
        };
        f.write_str(label)
    }
}

impl FromStr for ReservationStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace(['-', ' '], "_").as_str() {
            "confirmed" | "booked" => Ok(Self::Confirmed),
            "seated" => Ok(Self::Seated),
            "completed" => Ok(Self::Completed),
            "no_show" | "noshow" => Ok(Self::NoShow),
            "cancelled" | "canceled" => Ok(Self::Cancelled),
            _ => Err(format!("unknown reservation status '{s}'")),
        }
    }
}

/// Kind of contact logged against a customer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[serde(rename_all = "snake_case")]
pub enum InteractionKind {
    /// Phone call
    #[sea_orm(string_value = "call")]
    Call,
    /// Complaint
    #[sea_orm(string_value = "complaint")]
    Complaint,
    /// Compliment
    #[sea_orm(string_value = "compliment")]
    Compliment,
    /// Special request
    #[sea_orm(string_value = "request")]
    Request,
    /// Outbound marketing contact
    #[sea_orm(string_value = "marketing")]
    Marketing,
}

impl fmt::Display for InteractionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Call => "call",
            Self::Complaint => "complaint",
            Self::Compliment => "compliment",
            Self::Request => "request",
            Self::Marketing => "marketing",
        };
        f.write_str(label)
    }
}

impl FromStr for InteractionKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "call" => Ok(Self::Call),
            "complaint" => Ok(Self::Complaint),
            "compliment" => Ok(Self::Compliment),
            "request" => Ok(Self::Request),
            "marketing" => Ok(Self::Marketing),
            _ => Err(format!("unknown interaction kind '{s}'")),
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;

    #[test]
    fn test_tier_parses_loose_spellings() {
        assert_eq!("standard".parse::<Tier>().unwrap(), Tier::Standard);
        assert_eq!("Black Diamond".parse::<Tier>().unwrap(), Tier::BlackDiamond);
        assert_eq!("black-diamond".parse::<Tier>().unwrap(), Tier::BlackDiamond);
        assert_eq!("black_diamond".parse::<Tier>().unwrap(), Tier::BlackDiamond);
        assert!("gold".parse::<Tier>().is_err());
    }

    #[test]
    fn test_tier_deserializes_from_snake_case() {
        #[derive(Deserialize)]
        struct Wrapper {
            tier: Tier,
        }
        let parsed: Wrapper = toml::from_str(r#"tier = "black_diamond""#).unwrap();
        assert_eq!(parsed.tier, Tier::BlackDiamond);
    }

    #[test]
    fn test_reservation_status_open_states() {
        assert!(ReservationStatus::Confirmed.is_open());
        assert!(ReservationStatus::Seated.is_open());
        assert!(!ReservationStatus::Completed.is_open());
        assert!(!ReservationStatus::NoShow.is_open());
        assert!(!ReservationStatus::Cancelled.is_open());
        assert_eq!(
            "no-show".parse::<ReservationStatus>().unwrap(),
            ReservationStatus::NoShow
        );
    }
}
