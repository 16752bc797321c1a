//! Money helpers for the arithmetic layer.
//!
//! Amounts are `Decimal` end to end, from command input through the database
//! columns, so a receipt holds exactly the charge that was entered.

use crate::errors::{Error, Result};
use rust_decimal::prelude::*;

/// Two decimal places, half away from zero.
const DECIMAL_PLACES: u32 = 2;

/// Rounds a derived amount (an average, not a charge) to cents.
#[must_use]
pub fn round_money(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
}

/// Converts a user-entered `f64` amount into a `Decimal`.
///
/// The shortest decimal that reads back as the same `f64` is used, so `19.99`
/// becomes exactly `19.99` and `0.125` stays `0.125`.
///
/// # Errors
/// Returns `InvalidAmount` for NaN or infinite input.
pub fn parse_amount(value: f64) -> Result<Decimal> {
    if !value.is_finite() {
        return Err(Error::InvalidAmount {
            amount: Decimal::ZERO,
        });
    }
    Decimal::from_f64(value).ok_or(Error::InvalidAmount {
        amount: Decimal::ZERO,
    })
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_round_money_half_away_from_zero() {
        assert_eq!(round_money(dec!(0.005)), dec!(0.01));
        assert_eq!(round_money(dec!(0.004)), dec!(0.00));
        assert_eq!(round_money(dec!(-0.005)), dec!(-0.01));
        assert_eq!(round_money(dec!(39.998)), dec!(40.00));
    }

    #[test]
    fn test_parse_amount_keeps_entered_value() {
        assert_eq!(parse_amount(200.0).unwrap(), dec!(200));
        assert_eq!(parse_amount(19.99).unwrap(), dec!(19.99));
        assert_eq!(parse_amount(0.125).unwrap(), dec!(0.125));
        assert!(matches!(
            parse_amount(f64::NAN),
            Err(Error::InvalidAmount { amount: _ })
        ));
        assert!(matches!(
            parse_amount(f64::NEG_INFINITY),
            Err(Error::InvalidAmount { amount: _ })
        ));
    }
}
