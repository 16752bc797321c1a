//! Membership ledger - benefit counters and stored-value balance.
//!
//! Every mutation runs inside one database transaction. Counter increments are
//! conditional updates (`col = col + 1 WHERE col < limit`) and balance writes
//! compare-and-set against the balance read inside the same transaction, so two
//! requests racing on one member can never both spend the same quota or money.
//! A lost race surfaces as `Error::ConcurrentUpdate` and leaves no trace.

use crate::{
    config::TierTable,
    entities::{Member, member},
    errors::{Error, Result},
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    TransactionTrait,
    prelude::*,
    sea_query::{Expr, SimpleExpr},
};
use std::fmt;
use tracing::{debug, info, instrument};

/// A countable member entitlement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Benefit {
    /// Generic benefit uses granted by staff
    Generic,
    /// Weekly dessert or coffee
    WeeklyDessertCoffee,
    /// Yearly chef's-choice omakase
    YearlyOmakase,
}

impl fmt::Display for Benefit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Generic => f.write_str("Benefit"),
            Self::WeeklyDessertCoffee => f.write_str("Weekly dessert/coffee"),
            Self::YearlyOmakase => f.write_str("Yearly omakase"),
        }
    }
}

/// Outcome of consuming one benefit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BenefitUse {
    /// Member who used the benefit
    pub member_id: i64,
    /// Benefit consumed
    pub benefit: Benefit,
    /// Uses consumed in the current period, including this one
    pub used: i32,
    /// Uses left in the current period
    pub remaining: i32,
}

/// Generic benefit uses left, never negative.
#[must_use]
pub fn generic_remaining(member: &member::Model) -> i32 {
    (member.benefits_total - member.benefits_used).max(0)
}

/// Dessert/coffee uses left this week; 0 for tiers without the benefit.
#[must_use]
pub fn weekly_remaining(member: &member::Model, tiers: &TierTable) -> i32 {
    (tiers.weekly_quota(member.tier) - member.dessert_coffee_used).max(0)
}

/// Omakase uses left this year; 0 for tiers without the benefit.
#[must_use]
pub fn yearly_remaining(member: &member::Model, tiers: &TierTable) -> i32 {
    (tiers.yearly_quota(member.tier) - member.omakase_used).max(0)
}

/// Whether the membership window is still open at `now`.
#[must_use]
pub fn is_active(member: &member::Model, now: DateTime<Utc>) -> bool {
    member.expiry_date.is_none_or(|expiry| now < expiry)
}

/// Loads a member or fails with `MemberNotFound`.
pub(crate) async fn find_member<C>(db: &C, member_id: i64) -> Result<member::Model>
where
    C: ConnectionTrait,
{
    Member::find_by_id(member_id)
        .one(db)
        .await?
        .ok_or_else(|| Error::MemberNotFound {
            member: member_id.to_string(),
        })
}

/// Increments `column` by one as long as it stays below `limit`.
async fn increment_guarded<C>(
    db: &C,
    member_id: i64,
    column: member::Column,
    limit: SimpleExpr,
) -> Result<()>
where
    C: ConnectionTrait,
{
    let result = Member::update_many()
        .col_expr(column, Expr::col(column).add(1))
        .filter(member::Column::Id.eq(member_id))
        .filter(Expr::col(column).lt(limit))
        .exec(db)
        .await?;

    if result.rows_affected == 0 {
        return Err(Error::ConcurrentUpdate { member_id });
    }
    Ok(())
}

/// Writes a new balance if the stored balance still equals what `member` holds.
async fn write_balance<C>(db: &C, member: &member::Model, new_balance: Decimal) -> Result<()>
where
    C: ConnectionTrait,
{
    let result = Member::update_many()
        .col_expr(member::Column::Balance, Expr::value(new_balance))
        .filter(member::Column::Id.eq(member.id))
        .filter(member::Column::Balance.eq(member.balance))
        .exec(db)
        .await?;

    if result.rows_affected == 0 {
        return Err(Error::ConcurrentUpdate {
            member_id: member.id,
        });
    }
    Ok(())
}

/// Consumes one generic benefit use.
///
/// # Errors
/// - `MemberNotFound` if the member does not exist
/// - `BenefitExhausted` if every granted use has been consumed
#[instrument(skip(db))]
pub async fn consume_generic_benefit(db: &DatabaseConnection, member_id: i64) -> Result<BenefitUse> {
    let txn = db.begin().await?;
    let member = find_member(&txn, member_id).await?;

    if member.benefits_used >= member.benefits_total {
        return Err(Error::BenefitExhausted {
            total: member.benefits_total,
            used: member.benefits_used,
        });
    }

    increment_guarded(
        &txn,
        member_id,
        member::Column::BenefitsUsed,
        Expr::col(member::Column::BenefitsTotal).into(),
    )
    .await?;
    txn.commit().await?;

    let used = member.benefits_used + 1;
    let remaining = (member.benefits_total - used).max(0);
    info!(member_id, remaining, "Generic benefit used");

    Ok(BenefitUse {
        member_id,
        benefit: Benefit::Generic,
        used,
        remaining,
    })
}

/// Consumes the member's weekly dessert/coffee.
///
/// # Errors
/// - `MemberNotFound` if the member does not exist
/// - `TierIneligible` if the member's tier has no weekly quota
/// - `QuotaExceeded` if this week's quota is used up
#[instrument(skip(db, tiers))]
pub async fn consume_weekly_dessert_coffee(
    db: &DatabaseConnection,
    tiers: &TierTable,
    member_id: i64,
) -> Result<BenefitUse> {
    consume_quota(db, tiers, member_id, Benefit::WeeklyDessertCoffee).await
}

/// Consumes one of the member's yearly omakase courses.
///
/// # Errors
/// - `MemberNotFound` if the member does not exist
/// - `TierIneligible` if the member's tier has no yearly quota
/// - `QuotaExceeded` if this year's quota is used up
#[instrument(skip(db, tiers))]
pub async fn consume_yearly_omakase(
    db: &DatabaseConnection,
    tiers: &TierTable,
    member_id: i64,
) -> Result<BenefitUse> {
    consume_quota(db, tiers, member_id, Benefit::YearlyOmakase).await
}

async fn consume_quota(
    db: &DatabaseConnection,
    tiers: &TierTable,
    member_id: i64,
    benefit: Benefit,
) -> Result<BenefitUse> {
    let txn = db.begin().await?;
    let member = find_member(&txn, member_id).await?;

    let (quota, used, column) = match benefit {
        Benefit::WeeklyDessertCoffee => (
            tiers.weekly_quota(member.tier),
            member.dessert_coffee_used,
            member::Column::DessertCoffeeUsed,
        ),
        Benefit::YearlyOmakase => (
            tiers.yearly_quota(member.tier),
            member.omakase_used,
            member::Column::OmakaseUsed,
        ),
        Benefit::Generic => {
            return Err(Error::InvalidInput {
                message: "generic benefits are not quota-based".to_string(),
            });
        }
    };

    if quota == 0 {
        return Err(Error::TierIneligible {
            tier: member.tier,
            benefit,
        });
    }
    if used >= quota {
        return Err(Error::QuotaExceeded { benefit, quota });
    }

    increment_guarded(&txn, member_id, column, Expr::value(quota)).await?;
    txn.commit().await?;

    let used = used + 1;
    let remaining = (quota - used).max(0);
    info!(member_id, %benefit, used, remaining, "Counted benefit used");

    Ok(BenefitUse {
        member_id,
        benefit,
        used,
        remaining,
    })
}

/// Clears the weekly dessert/coffee counter. Manual administrative action.
///
/// # Errors
/// Returns `MemberNotFound` if the member does not exist.
#[instrument(skip(db))]
pub async fn reset_weekly(db: &DatabaseConnection, member_id: i64) -> Result<member::Model> {
    reset_counter(db, member_id, member::Column::DessertCoffeeUsed).await
}

/// Clears the yearly omakase counter. Manual administrative action.
///
/// # Errors
/// Returns `MemberNotFound` if the member does not exist.
#[instrument(skip(db))]
pub async fn reset_yearly(db: &DatabaseConnection, member_id: i64) -> Result<member::Model> {
    reset_counter(db, member_id, member::Column::OmakaseUsed).await
}

async fn reset_counter(
    db: &DatabaseConnection,
    member_id: i64,
    column: member::Column,
) -> Result<member::Model> {
    let txn = db.begin().await?;
    find_member(&txn, member_id).await?;

    Member::update_many()
        .col_expr(column, Expr::value(0))
        .filter(member::Column::Id.eq(member_id))
        .exec(&txn)
        .await?;

    let member = find_member(&txn, member_id).await?;
    txn.commit().await?;
    info!(member_id, ?column, "Benefit counter reset");
    Ok(member)
}

/// Adds generic benefit uses to a member. Returns the uses now remaining.
///
/// # Errors
/// - `InvalidInput` if `count` is not positive
/// - `MemberNotFound` if the member does not exist
#[instrument(skip(db))]
pub async fn grant_benefits(db: &DatabaseConnection, member_id: i64, count: i32) -> Result<i32> {
    if count <= 0 {
        return Err(Error::InvalidInput {
            message: format!("benefit count must be positive, got {count}"),
        });
    }

    let txn = db.begin().await?;
    find_member(&txn, member_id).await?;

    Member::update_many()
        .col_expr(
            member::Column::BenefitsTotal,
            Expr::col(member::Column::BenefitsTotal).add(count),
        )
        .filter(member::Column::Id.eq(member_id))
        .exec(&txn)
        .await?;

    let member = find_member(&txn, member_id).await?;
    txn.commit().await?;

    let remaining = generic_remaining(&member);
    info!(member_id, count, remaining, "Benefits granted");
    Ok(remaining)
}

/// Adds stored value to a member's balance and returns the new balance.
///
/// # Errors
/// - `InvalidAmount` if `amount` is zero or negative (balance unchanged)
/// - `MemberNotFound` if the member does not exist
/// - `ConcurrentUpdate` if the balance changed underneath this request
#[instrument(skip(db))]
pub async fn top_up(db: &DatabaseConnection, member_id: i64, amount: Decimal) -> Result<Decimal> {
    if amount <= Decimal::ZERO {
        return Err(Error::InvalidAmount { amount });
    }

    let txn = db.begin().await?;
    let member = find_member(&txn, member_id).await?;

    let new_balance = member.balance + amount;
    write_balance(&txn, &member, new_balance).await?;
    txn.commit().await?;

    info!(member_id, %amount, %new_balance, "Balance topped up");
    Ok(new_balance)
}

/// Subtracts `amount` from the member's balance inside the caller's transaction.
///
/// The caller guarantees `0 <= amount <= balance`; no bound check happens here.
/// `member` must have been read through the same transaction.
pub(crate) async fn deduct_balance<C>(db: &C, member: &member::Model, amount: Decimal) -> Result<Decimal>
where
    C: ConnectionTrait,
{
    let new_balance = member.balance - amount;
    write_balance(db, member, new_balance).await?;
    debug!(member_id = member.id, %amount, %new_balance, "Balance deducted");
    Ok(new_balance)
}
