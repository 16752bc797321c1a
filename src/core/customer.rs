//! Customer records - guest profiles, visit history and logged interactions.
//!
//! Visit statistics (`visits`, `total_spent`, `avg_spend`) are denormalised on
//! the customer row and updated in the same transaction as the visit itself.

use crate::{
    core::{
        context::RequestContext,
        money::round_money,
    },
    entities::{
        Customer, Interaction, InteractionKind, VisitRecord, customer, interaction, visit_record,
    },
    errors::{Error, Result},
};
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::{Condition, QueryOrder, Set, TransactionTrait, prelude::*};
use tracing::{info, instrument};

/// Input for [`create_customer`].
#[derive(Debug, Clone, Default)]
pub struct NewCustomer {
    /// Display name
    pub name: String,
    /// Phone number, must be unique
    pub phone: String,
    /// Optional email
    pub email: Option<String>,
    /// Optional birthday
    pub birthday: Option<NaiveDate>,
    /// Comma-separated tags
    pub tags: String,
    /// Postal address
    pub address: String,
    /// Taste preferences
    pub preferences: String,
    /// Food allergies
    pub allergies: String,
    /// Extra notes
    pub notes: String,
}

/// Partial edit of a customer profile. `None` leaves a field unchanged.
#[derive(Debug, Clone, Default)]
#[allow(missing_docs)]
pub struct CustomerUpdate {
    pub name: Option<String>,
    /// Duplicate-checked against other customers
    pub phone: Option<String>,
    /// An empty string clears the email
    pub email: Option<String>,
    pub birthday: Option<NaiveDate>,
    pub tags: Option<String>,
    pub address: Option<String>,
    pub preferences: Option<String>,
    pub allergies: Option<String>,
    pub notes: Option<String>,
}

/// Input for [`add_visit_record`].
#[derive(Debug, Clone)]
pub struct NewVisit {
    /// When the visit happened, now when None
    pub visit_date: Option<DateTime<Utc>>,
    /// Amount spent
    pub amount: Decimal,
    /// Table the party sat at
    pub table_number: String,
    /// Server who looked after the table
    pub server: String,
    /// Number of guests, at least 1
    pub party_size: i32,
    /// Free-form note
    pub note: String,
}

impl Default for NewVisit {
    fn default() -> Self {
        Self {
            visit_date: None,
            amount: Decimal::ZERO,
            table_number: String::new(),
            server: String::new(),
            party_size: 1,
            note: String::new(),
        }
    }
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

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

async fn find_customer<C>(db: &C, customer_id: i64) -> Result<customer::Model>
where
    C: ConnectionTrait,
{
    Customer::find_by_id(customer_id)
        .one(db)
        .await?
        .ok_or(Error::CustomerNotFound { id: customer_id })
}

async fn ensure_phone_free<C>(db: &C, phone: &str, except_id: Option<i64>) -> Result<()>
where
    C: ConnectionTrait,
{
    let mut query = Customer::find().filter(customer::Column::Phone.eq(phone));
    if let Some(id) = except_id {
        query = query.filter(customer::Column::Id.ne(id));
    }
    if query.one(db).await?.is_some() {
        return Err(Error::DuplicatePhone {
            phone: phone.to_string(),
        });
    }
    Ok(())
}

/// Adds a customer with empty visit statistics.
///
/// # Errors
/// - `InvalidInput` for an empty name or phone
/// - `DuplicatePhone` if another customer has the phone
#[instrument(skip(db, new_customer), fields(phone = %new_customer.phone))]
pub async fn create_customer(
    db: &DatabaseConnection,
    new_customer: NewCustomer,
) -> Result<customer::Model> {
    let name = require_text("name", &new_customer.name)?;
    let phone = require_text("phone", &new_customer.phone)?;

    let txn = db.begin().await?;
    ensure_phone_free(&txn, &phone, None).await?;

    let now = Utc::now();
    let customer = customer::ActiveModel {
        name: Set(name),
        phone: Set(phone),
        email: Set(non_empty(new_customer.email)),
        birthday: Set(new_customer.birthday),
        tags: Set(new_customer.tags),
        address: Set(new_customer.address),
        preferences: Set(new_customer.preferences),
        allergies: Set(new_customer.allergies),
        notes: Set(new_customer.notes),
        visits: Set(0),
        total_spent: Set(Decimal::ZERO),
        avg_spend: Set(Decimal::ZERO),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(&txn)
    .await?;

    txn.commit().await?;
    info!(customer_id = customer.id, "Customer created");
    Ok(customer)
}

/// Edits a customer profile. Visit statistics are untouched.
///
/// # Errors
/// - `CustomerNotFound` if the customer does not exist
/// - `InvalidInput` for an empty name or phone
/// - `DuplicatePhone` if another customer has the new phone
#[instrument(skip(db, update))]
pub async fn update_customer(
    db: &DatabaseConnection,
    customer_id: i64,
    update: CustomerUpdate,
) -> Result<customer::Model> {
    let txn = db.begin().await?;
    let mut active: customer::ActiveModel = find_customer(&txn, customer_id).await?.into();

    if let Some(name) = update.name {
        active.name = Set(require_text("name", &name)?);
    }
    if let Some(phone) = update.phone {
        let phone = require_text("phone", &phone)?;
        ensure_phone_free(&txn, &phone, Some(customer_id)).await?;
        active.phone = Set(phone);
    }
    if update.email.is_some() {
        active.email = Set(non_empty(update.email));
    }
    if let Some(birthday) = update.birthday {
        active.birthday = Set(Some(birthday));
    }
    if let Some(tags) = update.tags {
        active.tags = Set(tags);
    }
    if let Some(address) = update.address {
        active.address = Set(address);
    }
    if let Some(preferences) = update.preferences {
        active.preferences = Set(preferences);
    }
    if let Some(allergies) = update.allergies {
        active.allergies = Set(allergies);
    }
    if let Some(notes) = update.notes {
        active.notes = Set(notes);
    }
    active.updated_at = Set(Utc::now());

    let updated = active.update(&txn).await?;
    txn.commit().await?;
    Ok(updated)
}

/// Fetches a customer by id.
///
/// # Errors
/// Returns `CustomerNotFound` if the customer does not exist.
pub async fn get_customer(db: &DatabaseConnection, customer_id: i64) -> Result<customer::Model> {
    find_customer(db, customer_id).await
}

/// Customers whose name or phone contains `term`, ordered by name.
pub async fn search_customers(
    db: &DatabaseConnection,
    term: &str,
) -> Result<Vec<customer::Model>> {
    let term = term.trim();
    let mut query = Customer::find();
    if !term.is_empty() {
        query = query.filter(
            Condition::any()
                .add(customer::Column::Name.contains(term))
                .add(customer::Column::Phone.contains(term)),
        );
    }
    query
        .order_by_asc(customer::Column::Name)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Deletes a customer along with their visits and interactions.
///
/// # Errors
/// Returns `CustomerNotFound` if the customer does not exist.
#[instrument(skip(db))]
pub async fn delete_customer(db: &DatabaseConnection, customer_id: i64) -> Result<customer::Model> {
    let txn = db.begin().await?;
    let customer = find_customer(&txn, customer_id).await?;

    VisitRecord::delete_many()
        .filter(visit_record::Column::CustomerId.eq(customer_id))
        .exec(&txn)
        .await?;
    Interaction::delete_many()
        .filter(interaction::Column::CustomerId.eq(customer_id))
        .exec(&txn)
        .await?;
    Customer::delete_by_id(customer_id).exec(&txn).await?;

    txn.commit().await?;
    info!(customer_id, "Customer deleted");
    Ok(customer)
}

/// Counts a walk-in visit without a detailed record.
///
/// A positive `spend` folds into the running average; zero only bumps the count.
///
/// # Errors
/// - `InvalidAmount` for a negative spend
/// - `CustomerNotFound` if the customer does not exist
#[instrument(skip(db))]
pub async fn record_quick_visit(
    db: &DatabaseConnection,
    customer_id: i64,
    spend: Decimal,
) -> Result<customer::Model> {
    if spend < Decimal::ZERO {
        return Err(Error::InvalidAmount { amount: spend });
    }

    let txn = db.begin().await?;
    let customer = find_customer(&txn, customer_id).await?;

    let visits = customer.visits + 1;
    let avg_spend = if spend > Decimal::ZERO {
        let previous = customer.avg_spend * Decimal::from(visits - 1);
        round_money((previous + spend) / Decimal::from(visits))
    } else {
        customer.avg_spend
    };

    let mut active: customer::ActiveModel = customer.into();
    active.visits = Set(visits);
    active.avg_spend = Set(avg_spend);
    active.updated_at = Set(Utc::now());
    let updated = active.update(&txn).await?;

    txn.commit().await?;
    info!(customer_id, visits, "Quick visit recorded");
    Ok(updated)
}

/// Records a detailed visit and refreshes the customer's statistics.
///
/// # Errors
/// - `InvalidAmount` for a negative amount
/// - `InvalidInput` for a party size below 1
/// - `CustomerNotFound` if the customer does not exist
#[instrument(skip(db, visit))]
pub async fn add_visit_record(
    db: &DatabaseConnection,
    customer_id: i64,
    visit: NewVisit,
) -> Result<visit_record::Model> {
    if visit.amount < Decimal::ZERO {
        return Err(Error::InvalidAmount {
            amount: visit.amount,
        });
    }
    if visit.party_size < 1 {
        return Err(Error::InvalidInput {
            message: format!("party size must be at least 1, got {}", visit.party_size),
        });
    }

    let txn = db.begin().await?;
    let customer = find_customer(&txn, customer_id).await?;
    let now = Utc::now();
    let amount = visit.amount;

    let record = visit_record::ActiveModel {
        customer_id: Set(customer_id),
        visit_date: Set(visit.visit_date.unwrap_or(now)),
        amount: Set(amount),
        table_number: Set(visit.table_number),
        server: Set(visit.server),
        party_size: Set(visit.party_size),
        note: Set(visit.note),
        created_at: Set(now),
        ..Default::default()
    }
    .insert(&txn)
    .await?;

    let visits = customer.visits + 1;
    let total_spent = customer.total_spent + amount;
    let avg_spend = round_money(total_spent / Decimal::from(visits));

    let mut active: customer::ActiveModel = customer.into();
    active.visits = Set(visits);
    active.total_spent = Set(total_spent);
    active.avg_spend = Set(avg_spend);
    active.updated_at = Set(now);
    active.update(&txn).await?;

    txn.commit().await?;
    info!(customer_id, visit_id = record.id, %amount, "Visit recorded");
    Ok(record)
}

/// A customer's visit records, newest first.
pub async fn list_visits(
    db: &DatabaseConnection,
    customer_id: i64,
) -> Result<Vec<visit_record::Model>> {
    VisitRecord::find()
        .filter(visit_record::Column::CustomerId.eq(customer_id))
        .order_by_desc(visit_record::Column::VisitDate)
        .order_by_desc(visit_record::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Logs a contact with a customer, attributed to the acting employee.
///
/// # Errors
/// Returns `CustomerNotFound` if the customer does not exist.
#[instrument(skip(db, ctx, note))]
pub async fn add_interaction(
    db: &DatabaseConnection,
    ctx: &RequestContext,
    customer_id: i64,
    kind: InteractionKind,
    note: String,
) -> Result<interaction::Model> {
    find_customer(db, customer_id).await?;

    let interaction = interaction::ActiveModel {
        customer_id: Set(customer_id),
        kind: Set(kind),
        note: Set(note),
        created_at: Set(Utc::now()),
        created_by_employee_id: Set(Some(ctx.employee_id)),
        ..Default::default()
    }
    .insert(db)
    .await?;

    info!(customer_id, %kind, "Interaction logged");
    Ok(interaction)
}

/// A customer's logged interactions, newest first.
pub async fn list_interactions(
    db: &DatabaseConnection,
    customer_id: i64,
) -> Result<Vec<interaction::Model>> {
    Interaction::find()
        .filter(interaction::Column::CustomerId.eq(customer_id))
        .order_by_desc(interaction::Column::CreatedAt)
        .order_by_desc(interaction::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::test_utils::*;
    use chrono::{Duration, TimeZone};
    use rust_decimal_macros::dec;

    #[tokio::test]
    async fn test_create_and_duplicate_phone() -> Result<()> {
        let db = setup_test_db().await?;
        let customer = create_test_customer(&db, "Hana", "555-1000").await?;
        assert_eq!(customer.visits, 0);
        assert_eq!(customer.total_spent, Decimal::ZERO);

        let result = create_test_customer(&db, "Other", "555-1000").await;
        assert!(matches!(
            result.unwrap_err(),
            Error::DuplicatePhone { phone } if phone == "555-1000"
        ));

        let result = create_customer(
            &db,
            NewCustomer {
                name: "Nameless".to_string(),
                ..Default::default()
            },
        )
        .await;
        assert!(matches!(result.unwrap_err(), Error::InvalidInput { message: _ }));
        Ok(())
    }

    #[tokio::test]
    async fn test_update_customer_profile() -> Result<()> {
        let db = setup_test_db().await?;
        let customer = create_test_customer(&db, "Hana", "555-1001").await?;
        create_test_customer(&db, "Taro", "555-1002").await?;

        let birthday = NaiveDate::from_ymd_opt(1990, 4, 2).unwrap();
        let updated = update_customer(
            &db,
            customer.id,
            CustomerUpdate {
                allergies: Some("shellfish".to_string()),
                birthday: Some(birthday),
                tags: Some("vip,regular".to_string()),
                ..Default::default()
            },
        )
        .await?;
        assert_eq!(updated.allergies, "shellfish");
        assert_eq!(updated.birthday, Some(birthday));
        assert_eq!(updated.phone, "555-1001");

        let clash = update_customer(
            &db,
            customer.id,
            CustomerUpdate {
                phone: Some("555-1002".to_string()),
                ..Default::default()
            },
        )
        .await;
        assert!(matches!(clash.unwrap_err(), Error::DuplicatePhone { phone: _ }));
        Ok(())
    }

    #[tokio::test]
    async fn test_quick_visit_running_average() -> Result<()> {
        let db = setup_test_db().await?;
        let customer = create_test_customer(&db, "Hana", "555-1003").await?;

        let c = record_quick_visit(&db, customer.id, dec!(100)).await?;
        assert_eq!(c.visits, 1);
        assert_eq!(c.avg_spend, dec!(100.00));

        let c = record_quick_visit(&db, customer.id, dec!(50)).await?;
        assert_eq!(c.visits, 2);
        assert_eq!(c.avg_spend, dec!(75.00));

        // Zero spend counts the visit but leaves the average alone
        let c = record_quick_visit(&db, customer.id, Decimal::ZERO).await?;
        assert_eq!(c.visits, 3);
        assert_eq!(c.avg_spend, dec!(75.00));

        let c = record_quick_visit(&db, customer.id, dec!(30)).await?;
        assert_eq!(c.visits, 4);
        // (75 * 3 + 30) / 4
        assert_eq!(c.avg_spend, dec!(63.75));

        assert!(matches!(
            record_quick_visit(&db, customer.id, dec!(-1)).await.unwrap_err(),
            Error::InvalidAmount { amount: _ }
        ));
        Ok(())
    }

    #[tokio::test]
    async fn test_visit_records_update_totals() -> Result<()> {
        let db = setup_test_db().await?;
        let customer = create_test_customer(&db, "Hana", "555-1004").await?;
        let earlier = Utc.with_ymd_and_hms(2025, 1, 10, 19, 0, 0).unwrap();

        add_visit_record(
            &db,
            customer.id,
            NewVisit {
                visit_date: Some(earlier),
                amount: dec!(120.00),
                party_size: 2,
                table_number: "A3".to_string(),
                ..Default::default()
            },
        )
        .await?;
        let latest = add_visit_record(
            &db,
            customer.id,
            NewVisit {
                visit_date: Some(earlier + Duration::days(7)),
                amount: dec!(80.00),
                ..Default::default()
            },
        )
        .await?;

        let reloaded = get_customer(&db, customer.id).await?;
        assert_eq!(reloaded.visits, 2);
        assert_eq!(reloaded.total_spent, dec!(200.00));
        assert_eq!(reloaded.avg_spend, dec!(100.00));

        let visits = list_visits(&db, customer.id).await?;
        assert_eq!(visits.len(), 2);
        assert_eq!(visits[0].id, latest.id);
        assert_eq!(visits[1].table_number, "A3");
        Ok(())
    }

    #[tokio::test]
    async fn test_visit_record_validation() -> Result<()> {
        let db = setup_test_db().await?;
        let customer = create_test_customer(&db, "Hana", "555-1005").await?;

        let result = add_visit_record(
            &db,
            customer.id,
            NewVisit {
                party_size: 0,
                ..Default::default()
            },
        )
        .await;
        assert!(matches!(result.unwrap_err(), Error::InvalidInput { message: _ }));

        let result = add_visit_record(
            &db,
            customer.id,
            NewVisit {
                amount: dec!(-5),
                ..Default::default()
            },
        )
        .await;
        assert!(matches!(result.unwrap_err(), Error::InvalidAmount { amount: _ }));

        assert!(list_visits(&db, customer.id).await?.is_empty());
        assert_eq!(get_customer(&db, customer.id).await?.visits, 0);

        let missing = add_visit_record(&db, 404, NewVisit::default()).await;
        assert!(matches!(missing.unwrap_err(), Error::CustomerNotFound { id: 404 }));
        Ok(())
    }

    #[tokio::test]
    async fn test_interactions_and_cascade_delete() -> Result<()> {
        let db = setup_test_db().await?;
        let ctx = test_context();
        let customer = create_test_customer(&db, "Hana", "555-1006").await?;

        add_interaction(&db, &ctx, customer.id, InteractionKind::Call, "Asked about parking".to_string())
            .await?;
        let second = add_interaction(
            &db,
            &ctx,
            customer.id,
            InteractionKind::Compliment,
            "Loved the uni".to_string(),
        )
        .await?;
        add_visit_record(&db, customer.id, NewVisit::default()).await?;

        let logged = list_interactions(&db, customer.id).await?;
        assert_eq!(logged.len(), 2);
        assert_eq!(logged[0].id, second.id);
        assert_eq!(logged[0].created_by_employee_id, Some(ctx.employee_id));

        delete_customer(&db, customer.id).await?;
        assert!(list_interactions(&db, customer.id).await?.is_empty());
        assert!(list_visits(&db, customer.id).await?.is_empty());
        assert!(matches!(
            get_customer(&db, customer.id).await.unwrap_err(),
            Error::CustomerNotFound { id: _ }
        ));
        Ok(())
    }

    #[tokio::test]
    async fn test_search_customers() -> Result<()> {
        let db = setup_test_db().await?;
        create_test_customer(&db, "Hana", "555-2001").await?;
        create_test_customer(&db, "Taro", "555-2002").await?;
        create_test_customer(&db, "Hanako", "777-2003").await?;

        assert_eq!(search_customers(&db, "").await?.len(), 3);
        let names: Vec<String> = search_customers(&db, "Hana")
            .await?
            .into_iter()
            .map(|c| c.name)
            .collect();
        assert_eq!(names, vec!["Hana", "Hanako"]);
        assert_eq!(search_customers(&db, "2002").await?[0].name, "Taro");
        Ok(())
    }
}
