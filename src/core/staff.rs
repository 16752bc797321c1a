//! Staff - employees who act on the system, and the per-request context built
//! from them.

use crate::{
    config::{Settings, StaffConfig},
    core::context::RequestContext,
    entities::{Employee, employee},
    errors::{Error, Result},
};
use sea_orm::{QueryOrder, Set, prelude::*};
use std::sync::Arc;
use tracing::{debug, info, instrument};

/// Registers an employee under a chat-platform user id.
///
/// # Errors
/// - `InvalidInput` for an empty username or name
/// - `DuplicateUsername` if the username is taken
#[instrument(skip(db))]
pub async fn register_staff(
    db: &DatabaseConnection,
    username: &str,
    name: &str,
) -> Result<employee::Model> {
    let username = username.trim();
    let name = name.trim();
    if username.is_empty() || name.is_empty() {
        return Err(Error::InvalidInput {
            message: "staff username and name are required".to_string(),
        });
    }

    if find_staff(db, username).await?.is_some() {
        return Err(Error::DuplicateUsername {
            username: username.to_string(),
        });
    }

    let staff = employee::ActiveModel {
        username: Set(username.to_string()),
        name: Set(name.to_string()),
        created_at: Set(chrono::Utc::now()),
        ..Default::default()
    }
    .insert(db)
    .await?;

    info!(employee_id = staff.id, "Staff registered");
    Ok(staff)
}

/// Looks up an employee by username.
pub async fn find_staff(db: &DatabaseConnection, username: &str) -> Result<Option<employee::Model>> {
    Employee::find()
        .filter(employee::Column::Username.eq(username.trim()))
        .one(db)
        .await
        .map_err(Into::into)
}

/// All employees, by name.
pub async fn list_staff(db: &DatabaseConnection) -> Result<Vec<employee::Model>> {
    Employee::find()
        .order_by_asc(employee::Column::Name)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Builds the context for one request made by `username`.
///
/// # Errors
/// Returns `StaffNotRegistered` if no employee has that username.
pub async fn request_context(
    db: &DatabaseConnection,
    username: &str,
    settings: Arc<Settings>,
) -> Result<RequestContext> {
    let staff = find_staff(db, username)
        .await?
        .ok_or_else(|| Error::StaffNotRegistered {
            username: username.to_string(),
        })?;
    Ok(RequestContext::new(staff.id, settings))
}

/// Inserts configured staff whose username is not yet registered.
/// Returns how many were added.
pub async fn seed_staff(db: &DatabaseConnection, staff: &[StaffConfig]) -> Result<usize> {
    let mut added = 0;
    for entry in staff {
        if find_staff(db, &entry.username).await?.is_some() {
            debug!(username = %entry.username, "Staff already registered, skipping");
            continue;
        }
        register_staff(db, &entry.username, &entry.name).await?;
        added += 1;
    }

    if added > 0 {
        info!("Seeded {} staff member(s) from config", added);
    }
    Ok(added)
}
