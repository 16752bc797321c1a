//! Front-desk dashboard - headline counts for the start of a shift, plus the
//! customer analytics the manager looks at.

use crate::{
    core::{
        money::round_money,
        reservation::{todays_reservations, upcoming_reservations},
    },
    entities::{Customer, Member, customer, member, reservation},
    errors::Result,
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::{Condition, QueryOrder, QuerySelect, prelude::*};

/// How many recently joined members the summary lists.
const RECENT_MEMBERS: u64 = 5;
/// How many top spenders and upcoming bookings the summary lists.
const TOP_N: u64 = 10;

/// Snapshot of the restaurant at one point in time.
#[derive(Debug, Clone)]
pub struct DashboardSummary {
    /// Registered members
    pub member_count: u64,
    /// Members whose window is open
    pub active_member_count: u64,
    /// Known customers
    pub customer_count: u64,
    /// Sum of all member balances
    pub total_stored_value: Decimal,
    /// Visits across all customers
    pub total_visits: i64,
    /// Spend across all customers
    pub total_revenue: Decimal,
    /// Mean of the customers' average spend, rounded to cents
    pub average_spend: Decimal,
    /// Highest-spending customers, biggest first
    pub top_customers: Vec<customer::Model>,
    /// Confirmed or seated bookings today, in time order
    pub todays_reservations: Vec<reservation::Model>,
    /// Confirmed or seated bookings from now on, soonest first
    pub upcoming_reservations: Vec<reservation::Model>,
    /// Most recently effective members
    pub recent_members: Vec<member::Model>,
}

/// Builds the dashboard as of `now`.
pub async fn summary(db: &DatabaseConnection, now: DateTime<Utc>) -> Result<DashboardSummary> {
    let member_count = Member::find().count(db).await?;
    let active_member_count = Member::find()
        .filter(
            Condition::any()
                .add(member::Column::ExpiryDate.is_null())
                .add(member::Column::ExpiryDate.gt(now)),
        )
        .count(db)
        .await?;
    let customer_count = Customer::find().count(db).await?;

    let balances: Vec<Decimal> = Member::find()
        .select_only()
        .column(member::Column::Balance)
        .into_tuple()
        .all(db)
        .await?;
    let total_stored_value = balances.into_iter().sum();

    let spending: Vec<(i32, Decimal, Decimal)> = Customer::find()
        .select_only()
        .column(customer::Column::Visits)
        .column(customer::Column::TotalSpent)
        .column(customer::Column::AvgSpend)
        .into_tuple()
        .all(db)
        .await?;
    let total_visits = spending.iter().map(|(visits, _, _)| i64::from(*visits)).sum();
    let total_revenue = spending.iter().map(|(_, total, _)| *total).sum();
    let average_spend = if spending.is_empty() {
        Decimal::ZERO
    } else {
        let sum: Decimal = spending.iter().map(|(_, _, avg)| *avg).sum();
        round_money(sum / Decimal::from(spending.len()))
    };

    let top_customers = Customer::find()
        .order_by_desc(customer::Column::TotalSpent)
        .limit(TOP_N)
        .all(db)
        .await?;

    let todays_reservations = todays_reservations(db, now.date_naive()).await?;
    let upcoming_reservations = upcoming_reservations(db, now.naive_utc(), TOP_N).await?;
    let recent_members = Member::find()
        .order_by_desc(member::Column::EffectiveDate)
        .limit(RECENT_MEMBERS)
        .all(db)
        .await?;

    Ok(DashboardSummary {
        member_count,
        active_member_count,
        customer_count,
        total_stored_value,
        total_visits,
        total_revenue,
        average_spend,
        top_customers,
        todays_reservations,
        upcoming_reservations,
        recent_members,
    })
}
