//! Reservations - table bookings, the status workflow and calendar views.
//!
//! Booking times are local wall-clock `NaiveDateTime`s; the restaurant only
//! ever works in its own time zone.

use crate::{
    core::context::RequestContext,
    entities::{Customer, Reservation, ReservationStatus, reservation},
    errors::{Error, Result},
};
use chrono::{Months, NaiveDate, NaiveDateTime};
use sea_orm::{Condition, QueryOrder, QuerySelect, Set, prelude::*};
use serde::Serialize;
use tracing::{info, instrument};

/// Maximum rows returned by [`list_reservations`].
pub const LIST_LIMIT: u64 = 50;

/// Input for [`create_reservation`].
#[derive(Debug, Clone)]
pub struct NewReservation {
    /// Known customer making the booking, if any
    pub customer_id: Option<i64>,
    /// Name on the booking
    pub name: String,
    /// Contact phone
    pub phone: String,
    /// Optional contact email
    pub email: Option<String>,
    /// Local date and time of the booking
    pub date: NaiveDateTime,
    /// Number of guests, at least 1
    pub party_size: i32,
    /// Assigned table, empty when unassigned
    pub table_number: String,
    /// Free-form note
    pub note: String,
}

/// Edit of a booking. `None` leaves a field unchanged.
#[derive(Debug, Clone, Default)]
#[allow(missing_docs)]
pub struct ReservationUpdate {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub date: Option<NaiveDateTime>,
    pub party_size: Option<i32>,
    pub table_number: Option<String>,
    pub status: Option<ReservationStatus>,
    pub note: Option<String>,
}

/// Filter for [`list_reservations`].
#[derive(Debug, Clone, Default)]
pub struct ReservationFilter {
    /// Name or phone substring
    pub search: Option<String>,
    /// Only bookings on this day
    pub date: Option<NaiveDate>,
}

/// One booking as shown on the month calendar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CalendarEvent {
    /// Reservation id
    pub id: i64,
    /// `"<name> (<party> guests)"`
    pub title: String,
    /// Booking time
    pub start: NaiveDateTime,
    /// Contact phone
    pub phone: String,
    /// Current status
    pub status: ReservationStatus,
    /// Assigned table, `-` when unassigned
    pub table: String,
}

impl From<&reservation::Model> for CalendarEvent {
    fn from(r: &reservation::Model) -> Self {
        Self {
            id: r.id,
            title: format!("{} ({} guests)", r.name, r.party_size),
            start: r.date,
            phone: r.phone.clone(),
            status: r.status,
            table: if r.table_number.trim().is_empty() {
                "-".to_string()
            } else {
                r.table_number.clone()
            },
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

fn check_party_size(party_size: i32) -> Result<()> {
    if party_size < 1 {
        return Err(Error::InvalidInput {
            message: format!("party size must be at least 1, got {party_size}"),
        });
    }
    Ok(())
}

/// Half-open `[start, end)` covering one calendar day.
fn day_bounds(day: NaiveDate) -> (NaiveDateTime, NaiveDateTime) {
    let start = day.and_time(chrono::NaiveTime::MIN);
    (start, start + chrono::Duration::days(1))
}

/// Books a table. New bookings start out confirmed.
///
/// # Errors
/// - `InvalidInput` for an empty name or phone, or a party size below 1
/// - `CustomerNotFound` if `customer_id` names an unknown customer
#[instrument(skip(db, ctx, new_reservation), fields(date = %new_reservation.date))]
pub async fn create_reservation(
    db: &DatabaseConnection,
    ctx: &RequestContext,
    new_reservation: NewReservation,
) -> Result<reservation::Model> {
    let name = require_text("name", &new_reservation.name)?;
    let phone = require_text("phone", &new_reservation.phone)?;
    check_party_size(new_reservation.party_size)?;

    if let Some(customer_id) = new_reservation.customer_id {
        if Customer::find_by_id(customer_id).one(db).await?.is_none() {
            return Err(Error::CustomerNotFound { id: customer_id });
        }
    }

    let booking = reservation::ActiveModel {
        customer_id: Set(new_reservation.customer_id),
        name: Set(name),
        phone: Set(phone),
        email: Set(new_reservation.email.filter(|e| !e.trim().is_empty())),
        date: Set(new_reservation.date),
        party_size: Set(new_reservation.party_size),
        table_number: Set(new_reservation.table_number.trim().to_string()),
        status: Set(ReservationStatus::Confirmed),
        note: Set(new_reservation.note),
        created_at: Set(chrono::Utc::now()),
        created_by_employee_id: Set(Some(ctx.employee_id)),
        ..Default::default()
    }
    .insert(db)
    .await?;

    info!(reservation_id = booking.id, party_size = booking.party_size, "Reservation created");
    Ok(booking)
}

/// Fetches a booking by id.
///
/// # Errors
/// Returns `ReservationNotFound` if the booking does not exist.
pub async fn get_reservation(
    db: &DatabaseConnection,
    reservation_id: i64,
) -> Result<reservation::Model> {
    Reservation::find_by_id(reservation_id)
        .one(db)
        .await?
        .ok_or(Error::ReservationNotFound { id: reservation_id })
}

/// Edits a booking.
///
/// # Errors
/// - `ReservationNotFound` if the booking does not exist
/// - `InvalidInput` for an empty name or phone, or a party size below 1
#[instrument(skip(db, update))]
pub async fn edit_reservation(
    db: &DatabaseConnection,
    reservation_id: i64,
    update: ReservationUpdate,
) -> Result<reservation::Model> {
    if let Some(party_size) = update.party_size {
        check_party_size(party_size)?;
    }
    let mut active: reservation::ActiveModel = get_reservation(db, reservation_id).await?.into();

    if let Some(name) = update.name {
        active.name = Set(require_text("name", &name)?);
    }
    if let Some(phone) = update.phone {
        active.phone = Set(require_text("phone", &phone)?);
    }
    if let Some(email) = update.email {
        let email = email.trim().to_string();
        active.email = Set((!email.is_empty()).then_some(email));
    }
    if let Some(date) = update.date {
        active.date = Set(date);
    }
    if let Some(party_size) = update.party_size {
        active.party_size = Set(party_size);
    }
    if let Some(table_number) = update.table_number {
        active.table_number = Set(table_number.trim().to_string());
    }
    if let Some(status) = update.status {
        active.status = Set(status);
    }
    if let Some(note) = update.note {
        active.note = Set(note);
    }

    let updated = active.update(db).await?;
    info!(reservation_id, "Reservation edited");
    Ok(updated)
}

/// Moves a booking through the status workflow, optionally (re)assigning a table.
///
/// # Errors
/// Returns `ReservationNotFound` if the booking does not exist.
#[instrument(skip(db))]
pub async fn update_reservation_status(
    db: &DatabaseConnection,
    reservation_id: i64,
    status: ReservationStatus,
    table_number: Option<String>,
) -> Result<reservation::Model> {
    let mut active: reservation::ActiveModel = get_reservation(db, reservation_id).await?.into();
    active.status = Set(status);
    if let Some(table_number) = table_number {
        active.table_number = Set(table_number.trim().to_string());
    }

    let updated = active.update(db).await?;
    info!(reservation_id, %status, "Reservation status changed");
    Ok(updated)
}

/// Deletes a booking.
///
/// # Errors
/// Returns `ReservationNotFound` if the booking does not exist.
#[instrument(skip(db))]
pub async fn delete_reservation(
    db: &DatabaseConnection,
    reservation_id: i64,
) -> Result<reservation::Model> {
    let booking = get_reservation(db, reservation_id).await?;
    Reservation::delete_by_id(reservation_id).exec(db).await?;
    info!(reservation_id, "Reservation deleted");
    Ok(booking)
}

/// Bookings matching `filter`, latest booking time first, at most [`LIST_LIMIT`].
pub async fn list_reservations(
    db: &DatabaseConnection,
    filter: &ReservationFilter,
) -> Result<Vec<reservation::Model>> {
    let mut query = Reservation::find();

    if let Some(term) = filter.search.as_deref().map(str::trim).filter(|t| !t.is_empty()) {
        query = query.filter(
            Condition::any()
                .add(reservation::Column::Name.contains(term))
                .add(reservation::Column::Phone.contains(term)),
        );
    }
    if let Some(day) = filter.date {
        let (start, end) = day_bounds(day);
        query = query
            .filter(reservation::Column::Date.gte(start))
            .filter(reservation::Column::Date.lt(end));
    }

    query
        .order_by_desc(reservation::Column::Date)
        .limit(LIST_LIMIT)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Every booking in the given month, as calendar events in time order.
///
/// # Errors
/// Returns `InvalidInput` for a month outside 1..=12.
pub async fn month_calendar(
    db: &DatabaseConnection,
    year: i32,
    month: u32,
) -> Result<Vec<CalendarEvent>> {
    let first = NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(|| Error::InvalidInput {
        message: format!("invalid month {year}-{month:02}"),
    })?;
    let next = first
        .checked_add_months(Months::new(1))
        .ok_or_else(|| Error::InvalidInput {
            message: format!("month {year}-{month:02} is out of range"),
        })?;

    let bookings = Reservation::find()
        .filter(reservation::Column::Date.gte(first.and_time(chrono::NaiveTime::MIN)))
        .filter(reservation::Column::Date.lt(next.and_time(chrono::NaiveTime::MIN)))
        .order_by_asc(reservation::Column::Date)
        .all(db)
        .await?;

    Ok(bookings.iter().map(CalendarEvent::from).collect())
}

/// Confirmed or seated bookings on `today`, in time order.
pub async fn todays_reservations(
    db: &DatabaseConnection,
    today: NaiveDate,
) -> Result<Vec<reservation::Model>> {
    let (start, end) = day_bounds(today);
    Reservation::find()
        .filter(reservation::Column::Date.gte(start))
        .filter(reservation::Column::Date.lt(end))
        .filter(
            reservation::Column::Status
                .is_in([ReservationStatus::Confirmed, ReservationStatus::Seated]),
        )
        .order_by_asc(reservation::Column::Date)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Confirmed or seated bookings from `from` onwards, soonest first.
pub async fn upcoming_reservations(
    db: &DatabaseConnection,
    from: NaiveDateTime,
    limit: u64,
) -> Result<Vec<reservation::Model>> {
    Reservation::find()
        .filter(reservation::Column::Date.gte(from))
        .filter(
            reservation::Column::Status
                .is_in([ReservationStatus::Confirmed, ReservationStatus::Seated]),
        )
        .order_by_asc(reservation::Column::Date)
        .limit(limit)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Parses a `YYYY-MM-DD` date filter; anything unparsable means no filter.
#[must_use]
pub fn parse_date_filter(input: Option<&str>) -> Option<NaiveDate> {
    input
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .and_then(|s| NaiveDate::parse_from_str(s, "%Y-%m-%d").ok())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::test_utils::*;

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, 0)
            .unwrap()
    }

    fn booking(name: &str, date: NaiveDateTime) -> NewReservation {
        NewReservation {
            customer_id: None,
            name: name.to_string(),
            phone: format!("555-{}", name.len()),
            email: None,
            date,
            party_size: 2,
            table_number: String::new(),
            note: String::new(),
        }
    }

    #[tokio::test]
    async fn test_create_defaults_to_confirmed() -> Result<()> {
        let db = setup_test_db().await?;
        let ctx = test_context();

        let r = create_reservation(&db, &ctx, booking("Tanaka", at(2025, 6, 1, 19, 0))).await?;
        assert_eq!(r.status, ReservationStatus::Confirmed);
        assert_eq!(r.created_by_employee_id, Some(ctx.employee_id));
        assert_eq!(get_reservation(&db, r.id).await?.name, "Tanaka");
        Ok(())
    }

    #[tokio::test]
    async fn test_create_validation() -> Result<()> {
        let db = setup_test_db().await?;
        let ctx = test_context();

        let mut bad = booking("Tanaka", at(2025, 6, 1, 19, 0));
        bad.party_size = 0;
        assert!(matches!(
            create_reservation(&db, &ctx, bad).await.unwrap_err(),
            Error::InvalidInput { message: _ }
        ));

        let mut unknown = booking("Tanaka", at(2025, 6, 1, 19, 0));
        unknown.customer_id = Some(77);
        assert!(matches!(
            create_reservation(&db, &ctx, unknown).await.unwrap_err(),
            Error::CustomerNotFound { id: 77 }
        ));

        assert!(list_reservations(&db, &ReservationFilter::default()).await?.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_status_workflow_and_edit() -> Result<()> {
        let db = setup_test_db().await?;
        let ctx = test_context();
        let r = create_reservation(&db, &ctx, booking("Sato", at(2025, 6, 2, 18, 30))).await?;

        let seated =
            update_reservation_status(&db, r.id, ReservationStatus::Seated, Some("B2".to_string()))
                .await?;
        assert_eq!(seated.status, ReservationStatus::Seated);
        assert_eq!(seated.table_number, "B2");

        let edited = edit_reservation(
            &db,
            r.id,
            ReservationUpdate {
                party_size: Some(4),
                note: Some("birthday".to_string()),
                ..Default::default()
            },
        )
        .await?;
        assert_eq!(edited.party_size, 4);
        assert_eq!(edited.table_number, "B2");

        assert!(matches!(
            update_reservation_status(&db, 999, ReservationStatus::Cancelled, None)
                .await
                .unwrap_err(),
            Error::ReservationNotFound { id: 999 }
        ));

        delete_reservation(&db, r.id).await?;
        assert!(get_reservation(&db, r.id).await.is_err());
        Ok(())
    }

    #[tokio::test]
    async fn test_list_filters_by_day_and_search() -> Result<()> {
        let db = setup_test_db().await?;
        let ctx = test_context();
        create_reservation(&db, &ctx, booking("Ito", at(2025, 6, 3, 12, 0))).await?;
        create_reservation(&db, &ctx, booking("Kato", at(2025, 6, 3, 20, 0))).await?;
        create_reservation(&db, &ctx, booking("Ito", at(2025, 6, 4, 0, 0))).await?;

        let day = NaiveDate::from_ymd_opt(2025, 6, 3);
        let on_day = list_reservations(
            &db,
            &ReservationFilter {
                search: None,
                date: day,
            },
        )
        .await?;
        let names: Vec<&str> = on_day.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["Kato", "Ito"]);

        let ito = list_reservations(
            &db,
            &ReservationFilter {
                search: Some("Ito".to_string()),
                date: None,
            },
        )
        .await?;
        assert_eq!(ito.len(), 2);
        assert_eq!(ito[0].date, at(2025, 6, 4, 0, 0));
        Ok(())
    }

    #[tokio::test]
    async fn test_list_is_capped() -> Result<()> {
        let db = setup_test_db().await?;
        let ctx = test_context();
        for i in 0..55 {
            let date = at(2025, 7, 1, 10, 0) + chrono::Duration::minutes(i);
            create_reservation(&db, &ctx, booking("Walk", date)).await?;
        }

        let all = list_reservations(&db, &ReservationFilter::default()).await?;
        assert_eq!(all.len(), 50);
        assert_eq!(all[0].date, at(2025, 7, 1, 10, 54));
        Ok(())
    }

    #[test]
    fn test_unparsable_date_filter_is_ignored() {
        assert_eq!(parse_date_filter(Some("2025-06-03")), NaiveDate::from_ymd_opt(2025, 6, 3));
        assert_eq!(parse_date_filter(Some("06/03/2025")), None);
        assert_eq!(parse_date_filter(Some("  ")), None);
        assert_eq!(parse_date_filter(None), None);
    }

    #[tokio::test]
    async fn test_month_calendar_window() -> Result<()> {
        let db = setup_test_db().await?;
        let ctx = test_context();
        create_reservation(&db, &ctx, booking("Before", at(2025, 11, 30, 23, 59))).await?;
        let mut first = booking("First", at(2025, 12, 1, 0, 0));
        first.table_number = "C1".to_string();
        let first = create_reservation(&db, &ctx, first).await?;
        create_reservation(&db, &ctx, booking("Last", at(2025, 12, 31, 22, 0))).await?;
        create_reservation(&db, &ctx, booking("After", at(2026, 1, 1, 0, 0))).await?;

        let events = month_calendar(&db, 2025, 12).await?;
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].id, first.id);
        assert_eq!(events[0].title, "First (2 guests)");
        assert_eq!(events[0].table, "C1");
        assert_eq!(events[1].table, "-");

        assert!(matches!(
            month_calendar(&db, 2025, 13).await.unwrap_err(),
            Error::InvalidInput { message: _ }
        ));
        Ok(())
    }

    #[tokio::test]
    async fn test_todays_reservations_only_open() -> Result<()> {
        let db = setup_test_db().await?;
        let ctx = test_context();
        let today = NaiveDate::from_ymd_opt(2025, 8, 15).unwrap();

        let late = create_reservation(&db, &ctx, booking("Late", at(2025, 8, 15, 21, 0))).await?;
        let early = create_reservation(&db, &ctx, booking("Early", at(2025, 8, 15, 11, 0))).await?;
        let gone = create_reservation(&db, &ctx, booking("Gone", at(2025, 8, 15, 13, 0))).await?;
        create_reservation(&db, &ctx, booking("Tomorrow", at(2025, 8, 16, 12, 0))).await?;

        update_reservation_status(&db, early.id, ReservationStatus::Seated, None).await?;
        update_reservation_status(&db, gone.id, ReservationStatus::Cancelled, None).await?;

        let ids: Vec<i64> = todays_reservations(&db, today)
            .await?
            .iter()
            .map(|r| r.id)
            .collect();
        assert_eq!(ids, vec![early.id, late.id]);
        Ok(())
    }

    #[tokio::test]
    async fn test_upcoming_reservations_skip_past_and_closed() -> Result<()> {
        let db = setup_test_db().await?;
        let ctx = test_context();

        create_reservation(&db, &ctx, booking("Past", at(2025, 8, 14, 19, 0))).await?;
        let later = create_reservation(&db, &ctx, booking("Later", at(2025, 8, 20, 19, 0))).await?;
        let soon = create_reservation(&db, &ctx, booking("Soon", at(2025, 8, 15, 18, 0))).await?;
        let off = create_reservation(&db, &ctx, booking("Off", at(2025, 8, 16, 12, 0))).await?;
        update_reservation_status(&db, off.id, ReservationStatus::NoShow, None).await?;

        let from = at(2025, 8, 15, 12, 0);
        let ids: Vec<i64> = upcoming_reservations(&db, from, 10)
            .await?
            .iter()
            .map(|r| r.id)
            .collect();
        assert_eq!(ids, vec![soon.id, later.id]);

        assert_eq!(upcoming_reservations(&db, from, 1).await?.len(), 1);
        Ok(())
    }
}
