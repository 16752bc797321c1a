//! Shared test utilities.
//!
//! Helpers for an in-memory database and fixtures with sensible defaults.

use crate::{
    config::Settings,
    core::{
        RequestContext,
        customer::{NewCustomer, create_customer},
        member::{NewMember, register_member},
    },
    entities::{Tier, customer, member},
    errors::Result,
};
use rust_decimal::Decimal;
use sea_orm::DatabaseConnection;
use std::sync::{
    Arc,
    atomic::{AtomicU32, Ordering},
};

static NEXT_PHONE: AtomicU32 = AtomicU32::new(1);

/// Creates an in-memory `SQLite` database with all tables initialized.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// Context for employee 1 with default settings.
pub fn test_context() -> RequestContext {
    RequestContext::new(1, Arc::new(Settings::default()))
}

/// Registers a member with a unique phone number.
///
/// # Defaults
/// * `email`: None
/// * `effective_date`: now
pub async fn create_test_member(
    db: &DatabaseConnection,
    name: &str,
    tier: Tier,
    balance: Decimal,
) -> Result<member::Model> {
    let phone = format!("090-{:04}", NEXT_PHONE.fetch_add(1, Ordering::Relaxed));
    register_member(
        db,
        &test_context(),
        NewMember {
            name: name.to_string(),
            phone,
            email: None,
            tier,
            opening_balance: balance,
            effective_date: None,
        },
    )
    .await
}

/// Creates a customer with only name and phone filled in.
pub async fn create_test_customer(
    db: &DatabaseConnection,
    name: &str,
    phone: &str,
) -> Result<customer::Model> {
    create_customer(
        db,
        NewCustomer {
            name: name.to_string(),
            phone: phone.to_string(),
            ..Default::default()
        },
    )
    .await
}

/// An unsaved member model for pure-function tests.
pub fn sample_member(tier: Tier) -> member::Model {
    let now = chrono::Utc::now();
    member::Model {
        id: 1,
        name: "Sample".to_string(),
        phone: "000-0000".to_string(),
        email: None,
        tier,
        balance: Decimal::ZERO,
        benefits_total: 0,
        benefits_used: 0,
        dessert_coffee_used: 0,
        omakase_used: 0,
        effective_date: now,
        expiry_date: None,
        created_at: now,
        created_by_employee_id: None,
    }
}
