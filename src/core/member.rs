//! Member registry - registration, edits, lookups and customer upgrades.
//!
//! Ledger counters and the balance are only mutated through `core::ledger` and
//! `core::checkout`; the one exception is the explicit staff edit in
//! [`update_member`], which may correct a balance by hand.

use crate::{
    core::{
        context::RequestContext,
        ledger::find_member,
    },
    entities::{Customer, Member, Tier, member},
    errors::{Error, Result},
};
use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use sea_orm::{Condition, QueryOrder, Set, TransactionTrait, prelude::*};
use tracing::{info, instrument};

/// Input for [`register_member`].
#[derive(Debug, Clone)]
pub struct NewMember {
    /// Display name
    pub name: String,
    /// Phone number, must be unique
    pub phone: String,
    /// Optional email
    pub email: Option<String>,
    /// Membership tier
    pub tier: Tier,
    /// Stored value at registration
    pub opening_balance: Decimal,
    /// Start of the membership window, now when None
    pub effective_date: Option<DateTime<Utc>>,
}

/// Staff edit of a member record. `None` leaves a field unchanged.
#[derive(Debug, Clone, Default)]
pub struct MemberUpdate {
    /// New display name
    pub name: Option<String>,
    /// New phone number, duplicate-checked
    pub phone: Option<String>,
    /// New email
    pub email: Option<String>,
    /// New tier
    pub tier: Option<Tier>,
    /// Corrected balance
    pub balance: Option<Decimal>,
    /// New start of the membership window
    pub effective_date: Option<DateTime<Utc>>,
    /// New end of the membership window
    pub expiry_date: Option<DateTime<Utc>>,
}

fn require_text(field: &str, value: &str) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(Error::InvalidInput {
            message: format!("{field} cannot be empty"),
        });
    }
    Ok(trimmed.to_string())
}

async fn ensure_phone_free<C>(db: &C, phone: &str, except_id: Option<i64>) -> Result<()>
where
    C: ConnectionTrait,
{
    let mut query = Member::find().filter(member::Column::Phone.eq(phone));
    if let Some(id) = except_id {
        query = query.filter(member::Column::Id.ne(id));
    }
    if query.one(db).await?.is_some() {
        return Err(Error::DuplicatePhone {
            phone: phone.to_string(),
        });
    }
    Ok(())
}

/// Registers a new member. Counters start at zero and the membership runs for
/// the configured number of days from the effective date.
///
/// # Errors
/// - `InvalidInput` for an empty name or phone
/// - `InvalidAmount` for a negative opening balance
/// - `DuplicatePhone` if the phone is already registered
#[instrument(skip(db, ctx, new_member), fields(phone = %new_member.phone))]
pub async fn register_member(
    db: &DatabaseConnection,
    ctx: &RequestContext,
    new_member: NewMember,
) -> Result<member::Model> {
    let name = require_text("name", &new_member.name)?;
    let phone = require_text("phone", &new_member.phone)?;
    if new_member.opening_balance < Decimal::ZERO {
        return Err(Error::InvalidAmount {
            amount: new_member.opening_balance,
        });
    }

    let txn = db.begin().await?;
    ensure_phone_free(&txn, &phone, None).await?;

    let now = Utc::now();
    let effective_date = new_member.effective_date.unwrap_or(now);
    let expiry_date = effective_date + Duration::days(ctx.settings.membership_days);

    let member = member::ActiveModel {
        name: Set(name),
        phone: Set(phone),
        email: Set(new_member.email.filter(|e| !e.trim().is_empty())),
        tier: Set(new_member.tier),
        balance: Set(new_member.opening_balance),
        benefits_total: Set(0),
        benefits_used: Set(0),
        dessert_coffee_used: Set(0),
        omakase_used: Set(0),
        effective_date: Set(effective_date),
        expiry_date: Set(Some(expiry_date)),
        created_at: Set(now),
        created_by_employee_id: Set(Some(ctx.employee_id)),
        ..Default::default()
    }
    .insert(&txn)
    .await?;

    txn.commit().await?;
    info!(member_id = member.id, tier = %member.tier, "Member registered");
    Ok(member)
}

/// Applies a staff edit to a member.
///
/// # Errors
/// - `MemberNotFound` if the member does not exist
/// - `InvalidInput` for an empty name or phone
/// - `InvalidAmount` for a negative balance
/// - `DuplicatePhone` if the new phone belongs to another member
#[instrument(skip(db, update))]
pub async fn update_member(
    db: &DatabaseConnection,
    member_id: i64,
    update: MemberUpdate,
) -> Result<member::Model> {
    if let Some(balance) = update.balance.filter(|b| *b < Decimal::ZERO) {
        return Err(Error::InvalidAmount { amount: balance });
    }

    let txn = db.begin().await?;
    let member = find_member(&txn, member_id).await?;
    let mut active: member::ActiveModel = member.into();

    if let Some(name) = update.name {
        active.name = Set(require_text("name", &name)?);
    }
    if let Some(phone) = update.phone {
        let phone = require_text("phone", &phone)?;
        ensure_phone_free(&txn, &phone, Some(member_id)).await?;
        active.phone = Set(phone);
    }
    if let Some(email) = update.email {
        let email = email.trim().to_string();
        active.email = Set((!email.is_empty()).then_some(email));
    }
    if let Some(tier) = update.tier {
        active.tier = Set(tier);
    }
    if let Some(balance) = update.balance {
        active.balance = Set(balance);
    }
    if let Some(effective_date) = update.effective_date {
        active.effective_date = Set(effective_date);
    }
    if let Some(expiry_date) = update.expiry_date {
        active.expiry_date = Set(Some(expiry_date));
    }

    let updated = active.update(&txn).await?;
    txn.commit().await?;
    info!(member_id, "Member updated");
    Ok(updated)
}

/// Fetches a member by id.
///
/// # Errors
/// Returns `MemberNotFound` if the member does not exist.
pub async fn get_member(db: &DatabaseConnection, member_id: i64) -> Result<member::Model> {
    find_member(db, member_id).await
}

/// Looks up a member by exact phone number.
pub async fn find_member_by_phone(
    db: &DatabaseConnection,
    phone: &str,
) -> Result<Option<member::Model>> {
    Member::find()
        .filter(member::Column::Phone.eq(phone.trim()))
        .one(db)
        .await
        .map_err(Into::into)
}

/// Members whose name or phone contains `term`, ordered by name. An empty term
/// lists every member.
pub async fn search_members(db: &DatabaseConnection, term: &str) -> Result<Vec<member::Model>> {
    let term = term.trim();
    let mut query = Member::find();
    if !term.is_empty() {
        query = query.filter(
            Condition::any()
                .add(member::Column::Name.contains(term))
                .add(member::Column::Phone.contains(term)),
        );
    }
    query
        .order_by_asc(member::Column::Name)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Deletes a member. Their transactions stay, detached from the member.
///
/// # Errors
/// Returns `MemberNotFound` if the member does not exist.
#[instrument(skip(db))]
pub async fn delete_member(db: &DatabaseConnection, member_id: i64) -> Result<member::Model> {
    let member = find_member(db, member_id).await?;
    Member::delete_by_id(member_id).exec(db).await?;
    info!(member_id, phone = %member.phone, "Member deleted");
    Ok(member)
}

/// Creates a member from an existing customer's contact details, with zero balance.
///
/// # Errors
/// - `CustomerNotFound` if the customer does not exist
/// - `DuplicatePhone` if a member already uses the customer's phone
#[instrument(skip(db, ctx))]
pub async fn upgrade_customer(
    db: &DatabaseConnection,
    ctx: &RequestContext,
    customer_id: i64,
    tier: Tier,
) -> Result<member::Model> {
    let customer = Customer::find_by_id(customer_id)
        .one(db)
        .await?
        .ok_or(Error::CustomerNotFound { id: customer_id })?;

    register_member(
        db,
        ctx,
        NewMember {
            name: customer.name,
            phone: customer.phone,
            email: customer.email,
            tier,
            opening_balance: Decimal::ZERO,
            effective_date: None,
        },
    )
    .await
}
