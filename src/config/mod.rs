//! Configuration loading from config.toml
//!
//! `config.toml` carries the restaurant name, the membership window, the tier
//! table and the staff to seed on first run. Every section is optional; a
//! missing file yields the built-in defaults.

/// Database configuration and connection management
pub mod database;

/// Staff seeded from config.toml
pub mod staff;

/// Tier table: discount rates and benefit quotas per tier
pub mod tiers;

use crate::errors::{Error, Result};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::path::Path;
use tracing::{debug, warn};

pub use staff::StaffConfig;
pub use tiers::{TierPolicy, TierTable};

const DEFAULT_CONFIG_PATH: &str = "config.toml";
const DEFAULT_MEMBERSHIP_DAYS: i64 = 365;

/// Settings value object shared (read-only) by every request.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// Name shown in replies
    #[serde(default = "default_restaurant_name")]
    pub restaurant_name: String,
    /// Length of a membership window in days
    #[serde(default = "default_membership_days")]
    pub membership_days: i64,
    /// Discount rate and benefit quotas per tier
    #[serde(default)]
    pub tiers: TierTable,
    /// Staff inserted on startup when absent
    #[serde(default)]
    pub staff: Vec<StaffConfig>,
}

fn default_restaurant_name() -> String {
    "My Restaurant".to_string()
}

const fn default_membership_days() -> i64 {
    DEFAULT_MEMBERSHIP_DAYS
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            restaurant_name: default_restaurant_name(),
            membership_days: DEFAULT_MEMBERSHIP_DAYS,
            tiers: TierTable::default(),
            staff: Vec::new(),
        }
    }
}

/// Loads settings from a TOML file
///
/// # Errors
/// Returns an error if:
/// - The file cannot be read
/// - The TOML syntax is invalid
/// - `membership_days` is not positive
/// - a tier's `discount_rate` is outside 0..=1
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Settings> {
    debug!("Loading configuration from {:?}", path.as_ref());
    let contents = std::fs::read_to_string(path.as_ref()).map_err(|e| Error::Config {
        message: format!("Failed to read config file: {e}"),
    })?;

    parse_config(&contents)
}

/// Parses settings from TOML text.
pub fn parse_config(contents: &str) -> Result<Settings> {
    let settings: Settings = toml::from_str(contents).map_err(|e| Error::Config {
        message: format!("Failed to parse config.toml: {e}"),
    })?;

    if settings.membership_days <= 0 {
        return Err(Error::Config {
            message: format!(
                "membership_days must be positive, got {}",
                settings.membership_days
            ),
        });
    }

    // Discount rates are fractions of the bill
    if let Some((tier, policy)) = settings
        .tiers
        .iter()
        .find(|(_, policy)| !(Decimal::ZERO..=Decimal::ONE).contains(&policy.discount_rate))
    {
        return Err(Error::Config {
            message: format!(
                "discount_rate for {tier} must be between 0 and 1, got {}",
                policy.discount_rate
            ),
        });
    }

    Ok(settings)
}

/// Loads settings from `CONFIG_PATH` (default `./config.toml`), falling back to
/// built-in defaults when the file does not exist.
pub fn load_default_config() -> Result<Settings> {
    let path = std::env::var("CONFIG_PATH").unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
    if !Path::new(&path).exists() {
        warn!("No config file at {path}, using built-in defaults");
        return Ok(Settings::default());
    }
    load_config(path)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::entities::Tier;
    use rust_decimal_macros::dec;

    #[test]
    fn test_parse_full_config() {
        let toml_str = r#"
            restaurant_name = "Sakura"
            membership_days = 180

            [tiers.standard]
            discount_rate = 0.05
            weekly_dessert_coffee = 1

            [tiers.black_diamond]
            discount_rate = 0.25
            weekly_dessert_coffee = 2
            yearly_omakase = 3

            [[staff]]
            username = "1234"
            name = "Aiko"
        "#;

        let settings = parse_config(toml_str).unwrap();
        assert_eq!(settings.restaurant_name, "Sakura");
        assert_eq!(settings.membership_days, 180);
        assert_eq!(settings.tiers.discount_rate(Tier::Standard), dec!(0.05));
        assert_eq!(settings.tiers.discount_rate(Tier::BlackDiamond), dec!(0.25));
        assert_eq!(settings.tiers.weekly_quota(Tier::BlackDiamond), 2);
        assert_eq!(settings.tiers.yearly_quota(Tier::Standard), 0);
        assert_eq!(settings.staff.len(), 1);
        assert_eq!(settings.staff[0].name, "Aiko");
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let settings = parse_config("").unwrap();
        assert_eq!(settings.restaurant_name, "My Restaurant");
        assert_eq!(settings.membership_days, 365);
        assert_eq!(settings.tiers.discount_rate(Tier::BlackDiamond), dec!(0.20));
        assert_eq!(settings.tiers.yearly_quota(Tier::BlackDiamond), 2);
        assert!(settings.staff.is_empty());
    }

    #[test]
    fn test_rejects_non_positive_membership_days() {
        let result = parse_config("membership_days = 0");
        assert!(matches!(result, Err(Error::Config { message: _ })));
    }

    #[test]
    fn test_rejects_discount_rate_out_of_range() {
        let result = parse_config("[tiers.black_diamond]\ndiscount_rate = 1.5");
        assert!(matches!(
            result,
            Err(Error::Config { message }) if message.contains("Black Diamond")
        ));

        let result = parse_config("[tiers.standard]\ndiscount_rate = -0.1");
        assert!(matches!(result, Err(Error::Config { message: _ })));

        let settings = parse_config("[tiers.black_diamond]\ndiscount_rate = 1").unwrap();
        assert_eq!(settings.tiers.discount_rate(Tier::BlackDiamond), Decimal::ONE);
    }

    #[test]
    fn test_rejects_invalid_toml() {
        let result = parse_config("restaurant_name = ");
        assert!(matches!(result, Err(Error::Config { message: _ })));
    }
}
