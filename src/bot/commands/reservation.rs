//! Reservation Discord commands - `/reservation` and its subcommands.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::{BotData, handlers::autocomplete, staff_context},
        core::reservation::{
            self, NewReservation, ReservationFilter, ReservationUpdate, parse_date_filter,
        },
        entities::{ReservationModel, ReservationStatus},
        errors::{Error, Result},
    };
    use chrono::{Datelike, Local, NaiveDateTime};
    use std::fmt::Write;

    fn parse_when(date: &str, time: &str) -> Result<NaiveDateTime> {
        NaiveDateTime::parse_from_str(&format!("{} {}", date.trim(), time.trim()), "%Y-%m-%d %H:%M")
            .map_err(|_| Error::InvalidInput {
                message: format!("'{date} {time}' is not a YYYY-MM-DD HH:MM time"),
            })
    }

    fn parse_status(input: &str) -> Result<ReservationStatus> {
        input.parse().map_err(|message| Error::InvalidInput { message })
    }

    fn booking_line(r: &ReservationModel) -> String {
        format!(
            "• #{} {} **{}** ({}) - {} guest(s), table {} [{}]",
            r.id,
            r.date.format("%Y-%m-%d %H:%M"),
            r.name,
            r.phone,
            r.party_size,
            if r.table_number.is_empty() {
                "-"
            } else {
                r.table_number.as_str()
            },
            r.status
        )
    }

    /// Parent command for table bookings.
    #[poise::command(
        slash_command,
        subcommands(
            "reservation_add",
            "reservation_list",
            "reservation_today",
            "reservation_calendar",
            "reservation_status",
            "reservation_edit",
            "reservation_delete"
        )
    )]
    pub async fn reservation(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        ctx.say("Use a `/reservation` subcommand, e.g. `/reservation add` or `/reservation today`.")
            .await?;
        Ok(())
    }

    /// Books a table.
    #[poise::command(slash_command, rename = "add")]
    pub async fn reservation_add(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Name on the booking"] name: String,
        #[description = "Contact phone"] phone: String,
        #[description = "Date YYYY-MM-DD"] date: String,
        #[description = "Time HH:MM"] time: String,
        #[description = "Party size (default: 1)"] party_size: Option<i32>,
        #[description = "Table"] table: Option<String>,
        #[description = "Email"] email: Option<String>,
        #[description = "Known customer"]
        #[autocomplete = "autocomplete::autocomplete_customer"]
        customer_id: Option<i64>,
        #[description = "Note"] note: Option<String>,
    ) -> Result<()> {
        let staff = staff_context(ctx).await?;
        let booking = reservation::create_reservation(
            &ctx.data().database,
            &staff,
            NewReservation {
                customer_id,
                name,
                phone,
                email,
                date: parse_when(&date, &time)?,
                party_size: party_size.unwrap_or(1),
                table_number: table.unwrap_or_default(),
                note: note.unwrap_or_default(),
            },
        )
        .await?;
        ctx.say(format!("📅 Booked:\n{}", booking_line(&booking)))
            .await?;
        Ok(())
    }

    /// Lists bookings, newest first (at most 50).
    #[poise::command(slash_command, rename = "list")]
    pub async fn reservation_list(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Name or phone fragment"] search: Option<String>,
        #[description = "Only this day, YYYY-MM-DD"] date: Option<String>,
    ) -> Result<()> {
        let filter = ReservationFilter {
            search,
            date: parse_date_filter(date.as_deref()),
        };
        let bookings = reservation::list_reservations(&ctx.data().database, &filter).await?;

        if bookings.is_empty() {
            ctx.say("📅 No reservations found.").await?;
            return Ok(());
        }
        let mut response = format!("📅 **{} reservation(s)**\n", bookings.len());
        for r in bookings.iter().take(20) {
            writeln!(response, "{}", booking_line(r))?;
        }
        ctx.say(response).await?;
        Ok(())
    }

    /// Shows today's confirmed and seated bookings.
    #[poise::command(slash_command, rename = "today")]
    pub async fn reservation_today(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let today = Local::now().date_naive();
        let bookings = reservation::todays_reservations(&ctx.data().database, today).await?;

        let mut response = format!("📅 **Today ({})**\n", today.format("%Y-%m-%d"));
        if bookings.is_empty() {
            response.push_str("_No open bookings_\n");
        }
        for r in &bookings {
            writeln!(response, "{}", booking_line(r))?;
        }
        ctx.say(response).await?;
        Ok(())
    }

    /// Shows every booking in a month.
    #[poise::command(slash_command, rename = "calendar")]
    pub async fn reservation_calendar(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Year (default: this year)"] year: Option<i32>,
        #[description = "Month 1-12 (default: this month)"] month: Option<u32>,
    ) -> Result<()> {
        let now = Local::now();
        let year = year.unwrap_or_else(|| now.year());
        let month = month.unwrap_or_else(|| now.month());
        let events = reservation::month_calendar(&ctx.data().database, year, month).await?;

        let mut response = format!("🗓️ **{year}-{month:02}** - {} booking(s)\n", events.len());
        for e in events.iter().take(40) {
            writeln!(
                response,
                "• {} {} - table {} [{}]",
                e.start.format("%d %H:%M"),
                e.title,
                e.table,
                e.status
            )?;
        }
        ctx.say(response).await?;
        Ok(())
    }

    /// Changes a booking's status and optionally its table.
    #[poise::command(slash_command, rename = "status")]
    pub async fn reservation_status(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Reservation id"] reservation_id: i64,
        #[description = "New status"]
        #[autocomplete = "autocomplete::autocomplete_status"]
        status: String,
        #[description = "Table"] table: Option<String>,
    ) -> Result<()> {
        staff_context(ctx).await?;
        let status = parse_status(&status)?;
        let updated = reservation::update_reservation_status(
            &ctx.data().database,
            reservation_id,
            status,
            table,
        )
        .await?;
        ctx.say(format!("✅ Updated:\n{}", booking_line(&updated)))
            .await?;
        Ok(())
    }

    /// Edits a booking.
    #[poise::command(slash_command, rename = "edit")]
    pub async fn reservation_edit(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Reservation id"] reservation_id: i64,
        #[description = "Name"] name: Option<String>,
        #[description = "Phone"] phone: Option<String>,
        #[description = "Date YYYY-MM-DD (with time)"] date: Option<String>,
        #[description = "Time HH:MM (with date)"] time: Option<String>,
        #[description = "Party size"] party_size: Option<i32>,
        #[description = "Table"] table: Option<String>,
        #[description = "Status"]
        #[autocomplete = "autocomplete::autocomplete_status"]
        status: Option<String>,
        #[description = "Email"] email: Option<String>,
        #[description = "Note"] note: Option<String>,
    ) -> Result<()> {
        staff_context(ctx).await?;
        let date = match (date, time) {
            (Some(d), Some(t)) => Some(parse_when(&d, &t)?),
            _ => None,
        };
        let updated = reservation::edit_reservation(
            &ctx.data().database,
            reservation_id,
            ReservationUpdate {
                name,
                phone,
                email,
                date,
                party_size,
                table_number: table,
                status: status.as_deref().map(parse_status).transpose()?,
                note,
            },
        )
        .await?;
        ctx.say(format!("✅ Updated:\n{}", booking_line(&updated)))
            .await?;
        Ok(())
    }

    /// Deletes a booking.
    #[poise::command(slash_command, rename = "delete")]
    pub async fn reservation_delete(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Reservation id"] reservation_id: i64,
    ) -> Result<()> {
        staff_context(ctx).await?;
        let removed = reservation::delete_reservation(&ctx.data().database, reservation_id).await?;
        ctx.say(format!("🗑️ Deleted reservation #{} for **{}**.", removed.id, removed.name))
            .await?;
        Ok(())
    }
}

// Re-export all commands
pub use inner::*;
