//! Customer Discord commands - `/customer` and its subcommands.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::{BotData, handlers::autocomplete, staff_context},
        core::{
            customer::{self, CustomerUpdate, NewCustomer, NewVisit},
            money::parse_amount,
        },
        entities::InteractionKind,
        errors::{Error, Result},
    };
    use chrono::{NaiveDate, NaiveDateTime};
    use std::fmt::Write;

    fn parse_birthday(input: Option<String>) -> Result<Option<NaiveDate>> {
        input
            .map(|s| {
                NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").map_err(|_| Error::InvalidInput {
                    message: format!("'{s}' is not a YYYY-MM-DD date"),
                })
            })
            .transpose()
    }

    /// Parent command for customer records.
    #[poise::command(
        slash_command,
        subcommands(
            "customer_add",
            "customer_info",
            "customer_search",
            "customer_edit",
            "customer_delete",
            "customer_visit",
            "customer_record_visit",
            "customer_visits",
            "customer_note",
            "customer_notes"
        )
    )]
    pub async fn customer(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        ctx.say("Use a `/customer` subcommand, e.g. `/customer add` or `/customer visit`.")
            .await?;
        Ok(())
    }

    /// Adds a customer.
    #[poise::command(slash_command, rename = "add")]
    pub async fn customer_add(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Name"] name: String,
        #[description = "Phone number"] phone: String,
        #[description = "Email"] email: Option<String>,
        #[description = "Birthday YYYY-MM-DD"] birthday: Option<String>,
        #[description = "Comma-separated tags"] tags: Option<String>,
        #[description = "Allergies"] allergies: Option<String>,
        #[description = "Preferences"] preferences: Option<String>,
        #[description = "Address"] address: Option<String>,
    ) -> Result<()> {
        staff_context(ctx).await?;
        let created = customer::create_customer(
            &ctx.data().database,
            NewCustomer {
                name,
                phone,
                email,
                birthday: parse_birthday(birthday)?,
                tags: tags.unwrap_or_default(),
                address: address.unwrap_or_default(),
                preferences: preferences.unwrap_or_default(),
                allergies: allergies.unwrap_or_default(),
                notes: String::new(),
            },
        )
        .await?;

        ctx.say(format!(
            "✅ Added customer **{}** ({}) with ID {}.",
            created.name, created.phone, created.id
        ))
        .await?;
        Ok(())
    }

    /// Shows a customer profile.
    #[poise::command(slash_command, rename = "info")]
    pub async fn customer_info(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Customer"]
        #[autocomplete = "autocomplete::autocomplete_customer"]
        customer_id: i64,
    ) -> Result<()> {
        let c = customer::get_customer(&ctx.data().database, customer_id).await?;

        let mut response = format!("🙋 **{}** ({})\n", c.name, c.phone);
        if let Some(email) = &c.email {
            writeln!(response, "✉️ {email}")?;
        }
        if let Some(birthday) = c.birthday {
            writeln!(response, "🎂 {}", birthday.format("%Y-%m-%d"))?;
        }
        if !c.tags.is_empty() {
            writeln!(response, "🏷️ {}", c.tags)?;
        }
        if !c.allergies.is_empty() {
            writeln!(response, "⚠️ Allergies: {}", c.allergies)?;
        }
        if !c.preferences.is_empty() {
            writeln!(response, "🍽️ Preferences: {}", c.preferences)?;
        }
        writeln!(
            response,
            "📈 Visits: {} | Total: ${:.2} | Average: ${:.2}",
            c.visits,
            c.total_spent,
            c.avg_spend
        )?;
        ctx.say(response).await?;
        Ok(())
    }

    /// Finds customers by name or phone.
    #[poise::command(slash_command, rename = "search")]
    pub async fn customer_search(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Name or phone fragment (empty lists everyone)"] term: Option<String>,
    ) -> Result<()> {
        let found =
            customer::search_customers(&ctx.data().database, term.as_deref().unwrap_or(""))
                .await?;
        if found.is_empty() {
            ctx.say("🔍 No customers found.").await?;
            return Ok(());
        }

        let mut response = format!("🔍 **{} customer(s)**\n", found.len());
        for c in found.iter().take(25) {
            writeln!(
                response,
                "• #{} **{}** ({}) - {} visit(s)",
                c.id, c.name, c.phone, c.visits
            )?;
        }
        ctx.say(response).await?;
        Ok(())
    }

    /// Edits a customer profile.
    #[poise::command(slash_command, rename = "edit")]
    pub async fn customer_edit(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Customer"]
        #[autocomplete = "autocomplete::autocomplete_customer"]
        customer_id: i64,
        #[description = "Name"] name: Option<String>,
        #[description = "Phone"] phone: Option<String>,
        #[description = "Email"] email: Option<String>,
        #[description = "Birthday YYYY-MM-DD"] birthday: Option<String>,
        #[description = "Comma-separated tags"] tags: Option<String>,
        #[description = "Allergies"] allergies: Option<String>,
        #[description = "Preferences"] preferences: Option<String>,
        #[description = "Address"] address: Option<String>,
        #[description = "Notes"] notes: Option<String>,
    ) -> Result<()> {
        staff_context(ctx).await?;
        let updated = customer::update_customer(
            &ctx.data().database,
            customer_id,
            CustomerUpdate {
                name,
                phone,
                email,
                birthday: parse_birthday(birthday)?,
                tags,
                address,
                preferences,
                allergies,
                notes,
            },
        )
        .await?;
        ctx.say(format!("✅ Updated customer **{}**.", updated.name))
            .await?;
        Ok(())
    }

    /// Deletes a customer and their history.
    #[poise::command(slash_command, rename = "delete")]
    pub async fn customer_delete(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Customer"]
        #[autocomplete = "autocomplete::autocomplete_customer"]
        customer_id: i64,
    ) -> Result<()> {
        staff_context(ctx).await?;
        let removed = customer::delete_customer(&ctx.data().database, customer_id).await?;
        ctx.say(format!("🗑️ Deleted customer **{}**.", removed.name))
            .await?;
        Ok(())
    }

    /// Counts a quick visit, optionally with the amount spent.
    #[poise::command(slash_command, rename = "visit")]
    pub async fn customer_visit(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Customer"]
        #[autocomplete = "autocomplete::autocomplete_customer"]
        customer_id: i64,
        #[description = "Amount spent (default: 0)"] spend: Option<f64>,
    ) -> Result<()> {
        staff_context(ctx).await?;
        let spend = parse_amount(spend.unwrap_or(0.0))?;
        let c = customer::record_quick_visit(&ctx.data().database, customer_id, spend).await?;
        ctx.say(format!(
            "✅ Visit recorded for **{}**. Total visits: {}",
            c.name, c.visits
        ))
        .await?;
        Ok(())
    }

    /// Records a detailed visit.
    #[poise::command(slash_command, rename = "record_visit")]
    pub async fn customer_record_visit(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Customer"]
        #[autocomplete = "autocomplete::autocomplete_customer"]
        customer_id: i64,
        #[description = "Amount spent"] amount: f64,
        #[description = "Party size (default: 1)"] party_size: Option<i32>,
        #[description = "Table"] table: Option<String>,
        #[description = "Server"] server: Option<String>,
        #[description = "Visit time YYYY-MM-DD HH:MM (default: now)"] when: Option<String>,
        #[description = "Note"] note: Option<String>,
    ) -> Result<()> {
        staff_context(ctx).await?;
        let visit_date = when
            .map(|s| {
                NaiveDateTime::parse_from_str(s.trim(), "%Y-%m-%d %H:%M")
                    .map(|dt| dt.and_utc())
                    .map_err(|_| Error::InvalidInput {
                        message: format!("'{s}' is not a YYYY-MM-DD HH:MM time"),
                    })
            })
            .transpose()?;

        let visit = customer::add_visit_record(
            &ctx.data().database,
            customer_id,
            NewVisit {
                visit_date,
                amount: parse_amount(amount)?,
                table_number: table.unwrap_or_default(),
                server: server.unwrap_or_default(),
                party_size: party_size.unwrap_or(1),
                note: note.unwrap_or_default(),
            },
        )
        .await?;
        ctx.say(format!(
            "✅ Visit #{} recorded (${:.2}).",
            visit.id,
            visit.amount
        ))
        .await?;
        Ok(())
    }

    /// Lists a customer's visits.
    #[poise::command(slash_command, rename = "visits")]
    pub async fn customer_visits(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Customer"]
        #[autocomplete = "autocomplete::autocomplete_customer"]
        customer_id: i64,
    ) -> Result<()> {
        let db = &ctx.data().database;
        let c = customer::get_customer(db, customer_id).await?;
        let visits = customer::list_visits(db, customer_id).await?;

        let mut response = format!("📒 **Visits for {}**\n", c.name);
        if visits.is_empty() {
            response.push_str("_No visits recorded_\n");
        }
        for v in visits.iter().take(20) {
            writeln!(
                response,
                "• {} - ${:.2}, {} guest(s), table {} {}",
                v.visit_date.format("%Y-%m-%d %H:%M"),
                v.amount,
                v.party_size,
                if v.table_number.is_empty() { "-" } else { v.table_number.as_str() },
                v.note
            )?;
        }
        ctx.say(response).await?;
        Ok(())
    }

    /// Logs a call, complaint, compliment, request or marketing contact.
    #[poise::command(slash_command, rename = "note")]
    pub async fn customer_note(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Customer"]
        #[autocomplete = "autocomplete::autocomplete_customer"]
        customer_id: i64,
        #[description = "call, complaint, compliment, request or marketing"] kind: String,
        #[description = "What happened"] note: String,
    ) -> Result<()> {
        let staff = staff_context(ctx).await?;
        let kind: InteractionKind = kind
            .parse()
            .map_err(|message| Error::InvalidInput { message })?;
        customer::add_interaction(&ctx.data().database, &staff, customer_id, kind, note).await?;
        ctx.say(format!("📝 Logged {kind} for customer #{customer_id}."))
            .await?;
        Ok(())
    }

    /// Lists a customer's logged interactions.
    #[poise::command(slash_command, rename = "notes")]
    pub async fn customer_notes(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Customer"]
        #[autocomplete = "autocomplete::autocomplete_customer"]
        customer_id: i64,
    ) -> Result<()> {
        let db = &ctx.data().database;
        let c = customer::get_customer(db, customer_id).await?;
        let logged = customer::list_interactions(db, customer_id).await?;

        let mut response = format!("📝 **Interactions with {}**\n", c.name);
        if logged.is_empty() {
            response.push_str("_Nothing logged_\n");
        }
        for i in logged.iter().take(20) {
            writeln!(
                response,
                "• {} [{}] {}",
                i.created_at.format("%Y-%m-%d"),
                i.kind,
                i.note
            )?;
        }
        ctx.say(response).await?;
        Ok(())
    }
}

// Re-export all commands
pub use inner::*;
