//! Checkout settlement - tier discount, balance split and the immutable receipt.
//!
//! The split itself is a pure function over `Decimal`. `settle` wraps it in a
//! database transaction so the balance deduction and the receipt insert commit
//! together or not at all.

use crate::{
    core::{
        context::RequestContext,
        ledger::{deduct_balance, find_member},
    },
    entities::{Tier, Transaction, transaction},
    errors::{Error, Result},
};
use rust_decimal::Decimal;
use sea_orm::{QueryOrder, Set, TransactionTrait, prelude::*};
use tracing::{info, instrument};

/// How one bill splits between discount, stored value and cash.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Settlement {
    /// Charge before discount
    pub original_amount: Decimal,
    /// `discount_rate * original_amount`, unrounded
    pub discount_amount: Decimal,
    /// `original_amount - discount_amount`
    pub final_amount: Decimal,
    /// Portion taken from the member's balance
    pub paid_from_balance: Decimal,
    /// `final_amount - paid_from_balance`
    pub cash_paid: Decimal,
}

/// Splits a bill for a member with `balance` at the given discount rate.
#[must_use]
pub fn compute_settlement(
    discount_rate: Decimal,
    original_amount: Decimal,
    balance: Decimal,
    use_balance: bool,
) -> Settlement {
    let discount_amount = discount_rate * original_amount;
    let final_amount = original_amount - discount_amount;

    let paid_from_balance = if use_balance && balance > Decimal::ZERO {
        balance.min(final_amount)
    } else {
        Decimal::ZERO
    };

    Settlement {
        original_amount,
        discount_amount,
        final_amount,
        paid_from_balance,
        cash_paid: final_amount - paid_from_balance,
    }
}

/// What the front desk hands back after a checkout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Receipt {
    /// Persisted transaction id
    pub transaction_id: i64,
    /// Member charged
    pub member_id: i64,
    /// Member name at the time of checkout
    pub member_name: String,
    /// Member tier at the time of checkout
    pub tier: Tier,
    /// Amount breakdown
    pub settlement: Settlement,
    /// Member balance after the deduction
    pub balance_after: Decimal,
}

/// Settles a bill for a member and records the transaction.
///
/// # Errors
/// - `InvalidAmount` if `original_amount` is negative
/// - `MemberNotFound` if the member does not exist
/// - `ConcurrentUpdate` if the balance changed while settling
#[instrument(skip(db, ctx), fields(employee_id = ctx.employee_id))]
pub async fn settle(
    db: &DatabaseConnection,
    ctx: &RequestContext,
    member_id: i64,
    original_amount: Decimal,
    use_balance: bool,
) -> Result<Receipt> {
    if original_amount < Decimal::ZERO {
        return Err(Error::InvalidAmount {
            amount: original_amount,
        });
    }
    let txn = db.begin().await?;
    let member = find_member(&txn, member_id).await?;

    let balance = member.balance;
    let rate = ctx.settings.tiers.discount_rate(member.tier);
    let settlement = compute_settlement(rate, original_amount, balance, use_balance);

    let balance_after = if use_balance && balance > Decimal::ZERO {
        deduct_balance(&txn, &member, settlement.paid_from_balance).await?
    } else {
        balance
    };

    let receipt = transaction::ActiveModel {
        member_id: Set(Some(member.id)),
        original_amount: Set(settlement.original_amount),
        discount_amount: Set(settlement.discount_amount),
        final_amount: Set(settlement.final_amount),
        paid_from_balance: Set(settlement.paid_from_balance),
        cash_paid: Set(settlement.cash_paid),
        created_at: Set(chrono::Utc::now()),
        created_by_employee_id: Set(Some(ctx.employee_id)),
        note: Set(format!(
            "{} - discount ${:.2}",
            member.tier, settlement.discount_amount
        )),
        ..Default::default()
    }
    .insert(&txn)
    .await?;

    txn.commit().await?;

    info!(
        member_id,
        transaction_id = receipt.id,
        final_amount = %settlement.final_amount,
        paid_from_balance = %settlement.paid_from_balance,
        cash_paid = %settlement.cash_paid,
        "Checkout settled"
    );

    Ok(Receipt {
        transaction_id: receipt.id,
        member_id: member.id,
        member_name: member.name,
        tier: member.tier,
        settlement,
        balance_after,
    })
}

/// Lists a member's checkout transactions, newest first.
pub async fn transactions_for_member(
    db: &DatabaseConnection,
    member_id: i64,
) -> Result<Vec<transaction::Model>> {
    Transaction::find()
        .filter(transaction::Column::MemberId.eq(member_id))
        .order_by_desc(transaction::Column::CreatedAt)
        .order_by_desc(transaction::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::entities::Member;
    use crate::test_utils::*;
    use rust_decimal_macros::dec;
    use sea_orm::{DatabaseBackend, MockDatabase};

    #[test]
    fn test_black_diamond_split() {
        let s = compute_settlement(dec!(0.20), dec!(200.00), dec!(50.00), true);
        assert_eq!(s.discount_amount, dec!(40.00));
        assert_eq!(s.final_amount, dec!(160.00));
        assert_eq!(s.paid_from_balance, dec!(50.00));
        assert_eq!(s.cash_paid, dec!(110.00));
    }

    #[test]
    fn test_standard_split_without_balance() {
        let s = compute_settlement(Decimal::ZERO, dec!(100.00), Decimal::ZERO, true);
        assert_eq!(s.discount_amount, Decimal::ZERO);
        assert_eq!(s.final_amount, dec!(100.00));
        assert_eq!(s.paid_from_balance, Decimal::ZERO);
        assert_eq!(s.cash_paid, dec!(100.00));
    }

    #[test]
    fn test_balance_not_used_when_declined() {
        let s = compute_settlement(dec!(0.20), dec!(80.00), dec!(500.00), false);
        assert_eq!(s.paid_from_balance, Decimal::ZERO);
        assert_eq!(s.cash_paid, dec!(64.00));
    }

    #[test]
    fn test_balance_covers_whole_bill() {
        let s = compute_settlement(Decimal::ZERO, dec!(35.50), dec!(100.00), true);
        assert_eq!(s.paid_from_balance, dec!(35.50));
        assert_eq!(s.cash_paid, Decimal::ZERO);
    }

    #[test]
    fn test_discount_is_exact_product() {
        let s = compute_settlement(dec!(0.20), dec!(19.99), Decimal::ZERO, false);
        assert_eq!(s.discount_amount, dec!(3.998));
        assert_eq!(s.final_amount, dec!(15.992));
        assert_eq!(s.cash_paid, dec!(15.992));

        let s = compute_settlement(dec!(0.20), dec!(0.125), Decimal::ZERO, false);
        assert_eq!(s.original_amount, dec!(0.125));
        assert_eq!(s.discount_amount, dec!(0.025));
    }

    #[test]
    fn test_split_invariants_hold() {
        let balances = [dec!(0), dec!(0.01), dec!(12.34), dec!(99.99), dec!(1000)];
        let amounts = [dec!(0), dec!(0.05), dec!(19.99), dec!(150.00), dec!(873.21)];
        for rate in [Decimal::ZERO, dec!(0.20)] {
            for &balance in &balances {
                for &amount in &amounts {
                    for use_balance in [true, false] {
                        let s = compute_settlement(rate, amount, balance, use_balance);
                        assert_eq!(s.final_amount, s.original_amount - s.discount_amount);
                        assert_eq!(s.cash_paid, s.final_amount - s.paid_from_balance);
                        assert!(s.paid_from_balance >= Decimal::ZERO);
                        assert!(s.paid_from_balance <= balance.min(s.final_amount));
                        assert!(s.cash_paid >= Decimal::ZERO);
                    }
                }
            }
        }
    }

    #[tokio::test]
    async fn test_settle_rejects_negative_amount() -> Result<()> {
        let db = MockDatabase::new(DatabaseBackend::Sqlite).into_connection();
        let ctx = test_context();

        let result = settle(&db, &ctx, 1, dec!(-0.01), true).await;
        assert!(matches!(
            result.unwrap_err(),
            Error::InvalidAmount { amount } if amount == dec!(-0.01)
        ));
        Ok(())
    }

    #[tokio::test]
    async fn test_settle_black_diamond_with_balance() -> Result<()> {
        let db = setup_test_db().await?;
        let ctx = test_context();
        let member = create_test_member(&db, "Rin", Tier::BlackDiamond, dec!(50.00)).await?;

        let receipt = settle(&db, &ctx, member.id, dec!(200.00), true).await?;
        assert_eq!(receipt.settlement.discount_amount, dec!(40.00));
        assert_eq!(receipt.settlement.final_amount, dec!(160.00));
        assert_eq!(receipt.settlement.paid_from_balance, dec!(50.00));
        assert_eq!(receipt.settlement.cash_paid, dec!(110.00));
        assert_eq!(receipt.balance_after, Decimal::ZERO);
        assert_eq!(receipt.member_name, "Rin");
        assert_eq!(receipt.tier, Tier::BlackDiamond);

        let reloaded = Member::find_by_id(member.id).one(&db).await?.unwrap();
        assert_eq!(reloaded.balance, Decimal::ZERO);

        let history = transactions_for_member(&db, member.id).await?;
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].id, receipt.transaction_id);
        assert_eq!(history[0].cash_paid, dec!(110.00));
        assert_eq!(history[0].note, "Black Diamond - discount $40.00");
        assert_eq!(history[0].created_by_employee_id, Some(ctx.employee_id));
        Ok(())
    }

    #[tokio::test]
    async fn test_settle_records_unrounded_amounts() -> Result<()> {
        let db = setup_test_db().await?;
        let ctx = test_context();
        let member = create_test_member(&db, "Yui", Tier::BlackDiamond, Decimal::ZERO).await?;

        let receipt = settle(&db, &ctx, member.id, dec!(19.99), false).await?;
        assert_eq!(receipt.settlement.original_amount, dec!(19.99));
        assert_eq!(receipt.settlement.discount_amount, dec!(3.998));
        assert_eq!(receipt.settlement.final_amount, dec!(15.992));

        let history = transactions_for_member(&db, member.id).await?;
        assert_eq!(history[0].original_amount, dec!(19.99));
        assert_eq!(history[0].discount_amount, dec!(3.998));
        assert_eq!(history[0].final_amount, dec!(15.992));
        assert_eq!(history[0].cash_paid, dec!(15.992));
        Ok(())
    }

    #[tokio::test]
    async fn test_settle_standard_no_balance() -> Result<()> {
        let db = setup_test_db().await?;
        let ctx = test_context();
        let member = create_test_member(&db, "Ken", Tier::Standard, Decimal::ZERO).await?;

        let receipt = settle(&db, &ctx, member.id, dec!(100.00), true).await?;
        assert_eq!(receipt.settlement.discount_amount, Decimal::ZERO);
        assert_eq!(receipt.settlement.final_amount, dec!(100.00));
        assert_eq!(receipt.settlement.paid_from_balance, Decimal::ZERO);
        assert_eq!(receipt.settlement.cash_paid, dec!(100.00));
        assert_eq!(receipt.balance_after, Decimal::ZERO);

        let history = transactions_for_member(&db, member.id).await?;
        assert_eq!(history[0].note, "Standard - discount $0.00");
        Ok(())
    }

    #[tokio::test]
    async fn test_settle_keeps_balance_when_declined() -> Result<()> {
        let db = setup_test_db().await?;
        let ctx = test_context();
        let member = create_test_member(&db, "Mei", Tier::Standard, dec!(75.00)).await?;

        let receipt = settle(&db, &ctx, member.id, dec!(30.00), false).await?;
        assert_eq!(receipt.settlement.cash_paid, dec!(30.00));
        assert_eq!(receipt.balance_after, dec!(75.00));

        let reloaded = Member::find_by_id(member.id).one(&db).await?.unwrap();
        assert_eq!(reloaded.balance, dec!(75.00));
        Ok(())
    }

    #[tokio::test]
    async fn test_settle_missing_member_has_no_side_effects() -> Result<()> {
        let db = setup_test_db().await?;
        let ctx = test_context();

        let result = settle(&db, &ctx, 404, dec!(10.00), true).await;
        assert!(matches!(
            result.unwrap_err(),
            Error::MemberNotFound { member } if member == "404"
        ));

        assert_eq!(Transaction::find().count(&db).await?, 0);
        Ok(())
    }

    #[tokio::test]
    async fn test_history_newest_first() -> Result<()> {
        let db = setup_test_db().await?;
        let ctx = test_context();
        let member = create_test_member(&db, "Aoi", Tier::Standard, Decimal::ZERO).await?;
        let other = create_test_member(&db, "Sho", Tier::Standard, Decimal::ZERO).await?;

        let first = settle(&db, &ctx, member.id, dec!(10.00), false).await?;
        settle(&db, &ctx, other.id, dec!(99.00), false).await?;
        let second = settle(&db, &ctx, member.id, dec!(20.00), false).await?;

        let history = transactions_for_member(&db, member.id).await?;
        let ids: Vec<i64> = history.iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![second.transaction_id, first.transaction_id]);
        Ok(())
    }

    #[tokio::test]
    async fn test_two_settlements_never_overspend() -> Result<()> {
        let db = setup_test_db().await?;
        let ctx = test_context();
        let member = create_test_member(&db, "Rin", Tier::Standard, dec!(50.00)).await?;

        let (a, b) = tokio::join!(
            settle(&db, &ctx, member.id, dec!(30.00), true),
            settle(&db, &ctx, member.id, dec!(30.00), true),
        );

        let mut spent = Decimal::ZERO;
        for receipt in [a, b].into_iter().flatten() {
            spent += receipt.settlement.paid_from_balance;
        }
        assert!(spent <= dec!(50.00));

        let reloaded = Member::find_by_id(member.id).one(&db).await?.unwrap();
        assert_eq!(reloaded.balance, dec!(50.00) - spent);
        assert!(reloaded.balance >= Decimal::ZERO);

        let recorded: Decimal = transactions_for_member(&db, member.id)
            .await?
            .iter()
            .map(|t| t.paid_from_balance)
            .sum();
        assert_eq!(recorded, spent);
        Ok(())
    }
}
