//! Tier table - discount rate and counted-benefit quotas per membership tier.
//!
//! A tier missing from the table gets no discount and is ineligible for every
//! counted benefit.

use crate::entities::Tier;
use rust_decimal::Decimal;
use serde::Deserialize;
use std::collections::BTreeMap;

/// Benefits granted to one tier.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TierPolicy {
    /// Fraction of the charge taken off at checkout (0.20 = 20%)
    #[serde(default)]
    pub discount_rate: Decimal,
    /// Dessert/coffee uses allowed between weekly resets, 0 = not eligible
    #[serde(default)]
    pub weekly_dessert_coffee: i32,
    /// Omakase uses allowed between yearly resets, 0 = not eligible
    #[serde(default)]
    pub yearly_omakase: i32,
}

/// Lookup from tier to its policy.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct TierTable(BTreeMap<Tier, TierPolicy>);

impl TierTable {
    /// Builds a table from explicit entries.
    #[must_use]
    pub fn new(policies: impl IntoIterator<Item = (Tier, TierPolicy)>) -> Self {
        Self(policies.into_iter().collect())
    }

    /// Policy for a tier, None when the tier is not configured.
    #[must_use]
    pub fn policy(&self, tier: Tier) -> Option<&TierPolicy> {
        self.0.get(&tier)
    }

    /// Configured tiers and their policies, in tier order.
    pub fn iter(&self) -> impl Iterator<Item = (Tier, &TierPolicy)> {
        self.0.iter().map(|(tier, policy)| (*tier, policy))
    }

    /// Checkout discount rate for a tier.
    #[must_use]
    pub fn discount_rate(&self, tier: Tier) -> Decimal {
        self.policy(tier)
            .map_or(Decimal::ZERO, |policy| policy.discount_rate)
    }

    /// Weekly dessert/coffee quota for a tier.
    #[must_use]
    pub fn weekly_quota(&self, tier: Tier) -> i32 {
        self.policy(tier)
            .map_or(0, |policy| policy.weekly_dessert_coffee.max(0))
    }

    /// Yearly omakase quota for a tier.
    #[must_use]
    pub fn yearly_quota(&self, tier: Tier) -> i32 {
        self.policy(tier)
            .map_or(0, |policy| policy.yearly_omakase.max(0))
    }
}

impl Default for TierTable {
    fn default() -> Self {
        Self::new([
            (
                Tier::Standard,
                TierPolicy {
                    discount_rate: Decimal::ZERO,
                    weekly_dessert_coffee: 1,
                    yearly_omakase: 0,
                },
            ),
            (
                Tier::BlackDiamond,
                TierPolicy {
                    discount_rate: Decimal::new(20, 2),
                    weekly_dessert_coffee: 1,
                    yearly_omakase: 2,
                },
            ),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_default_table_matches_house_rules() {
        let table = TierTable::default();
        assert_eq!(table.discount_rate(Tier::Standard), Decimal::ZERO);
        assert_eq!(table.discount_rate(Tier::BlackDiamond), dec!(0.20));
        assert_eq!(table.weekly_quota(Tier::Standard), 1);
        assert_eq!(table.weekly_quota(Tier::BlackDiamond), 1);
        assert_eq!(table.yearly_quota(Tier::Standard), 0);
        assert_eq!(table.yearly_quota(Tier::BlackDiamond), 2);
    }

    #[test]
    fn test_missing_tier_is_ineligible() {
        let table = TierTable::new([(
            Tier::BlackDiamond,
            TierPolicy {
                discount_rate: dec!(0.10),
                weekly_dessert_coffee: 1,
                yearly_omakase: 2,
            },
        )]);
        assert!(table.policy(Tier::Standard).is_none());
        assert_eq!(table.discount_rate(Tier::Standard), Decimal::ZERO);
        assert_eq!(table.weekly_quota(Tier::Standard), 0);
        assert_eq!(table.yearly_quota(Tier::Standard), 0);
    }

    #[test]
    fn test_negative_quota_treated_as_zero() {
        let table = TierTable::new([(
            Tier::Standard,
            TierPolicy {
                discount_rate: Decimal::ZERO,
                weekly_dessert_coffee: -3,
                yearly_omakase: -1,
            },
        )]);
        assert_eq!(table.weekly_quota(Tier::Standard), 0);
        assert_eq!(table.yearly_quota(Tier::Standard), 0);
    }
}
