//! Member Discord commands - `/member` and its subcommands.
//!
//! Members are addressed by phone number, the natural key at the front desk.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::{BotData, handlers::autocomplete, staff_context},
        core::{
            checkout, ledger,
            member::{self, MemberUpdate, NewMember},
            money::parse_amount,
        },
        entities::{MemberModel, Tier},
        errors::{Error, Result},
    };
    use chrono::{NaiveDate, Utc};
    use sea_orm::DatabaseConnection;
    use std::fmt::Write;

    async fn member_by_phone(db: &DatabaseConnection, phone: &str) -> Result<MemberModel> {
        member::find_member_by_phone(db, phone)
            .await?
            .ok_or_else(|| Error::MemberNotFound {
                member: phone.to_string(),
            })
    }

    fn parse_tier(input: Option<&str>) -> Result<Tier> {
        input.map_or(Ok(Tier::Standard), |s| {
            s.parse().map_err(|message| Error::InvalidInput { message })
        })
    }

    fn parse_day(input: &str) -> Result<chrono::DateTime<Utc>> {
        NaiveDate::parse_from_str(input.trim(), "%Y-%m-%d")
            .map(|d| d.and_time(chrono::NaiveTime::MIN).and_utc())
            .map_err(|_| Error::InvalidInput {
                message: format!("'{input}' is not a YYYY-MM-DD date"),
            })
    }

    /// Formats a member card: tier, balance, window and benefit counts.
    fn member_card(m: &MemberModel, tiers: &crate::config::TierTable) -> Result<String> {
        let mut out = format!("👤 **{}** ({})\n", m.name, m.phone);
        writeln!(out, "🏷️ Tier: {}", m.tier)?;
        writeln!(out, "💰 Balance: ${:.2}", m.balance)?;
        let expiry = m
            .expiry_date
            .map_or_else(|| "open-ended".to_string(), |d| d.format("%Y-%m-%d").to_string());
        writeln!(
            out,
            "📅 {} → {} ({})",
            m.effective_date.format("%Y-%m-%d"),
            expiry,
            if ledger::is_active(m, Utc::now()) {
                "active"
            } else {
                "expired"
            }
        )?;
        writeln!(
            out,
            "🎁 Benefits left: {} | ☕ Dessert/coffee this week: {} | 🍣 Omakase this year: {}",
            ledger::generic_remaining(m),
            ledger::weekly_remaining(m, tiers),
            ledger::yearly_remaining(m, tiers)
        )?;
        Ok(out)
    }

    /// Parent command for member management.
    #[poise::command(
        slash_command,
        subcommands(
            "member_register",
            "member_info",
            "member_search",
            "member_edit",
            "member_delete",
            "member_topup",
            "member_grant",
            "member_benefit",
            "member_dessert",
            "member_omakase",
            "member_reset_weekly",
            "member_reset_yearly",
            "member_history",
            "member_upgrade"
        )
    )]
    pub async fn member(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        ctx.say("Use a `/member` subcommand, e.g. `/member info` or `/member topup`.")
            .await?;
        Ok(())
    }

    /// Registers a new member.
    #[poise::command(slash_command, rename = "register")]
    pub async fn member_register(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Member name"] name: String,
        #[description = "Phone number"] phone: String,
        #[description = "Tier (default: Standard)"]
        #[autocomplete = "autocomplete::autocomplete_tier"]
        tier: Option<String>,
        #[description = "Opening balance (default: 0)"] balance: Option<f64>,
        #[description = "Email"] email: Option<String>,
        #[description = "Effective date YYYY-MM-DD (default: today)"] effective_date: Option<
            String,
        >,
    ) -> Result<()> {
        let staff = staff_context(ctx).await?;
        let tier = parse_tier(tier.as_deref())?;
        let opening_balance = parse_amount(balance.unwrap_or(0.0))?;
        let effective_date = effective_date.as_deref().map(parse_day).transpose()?;

        let created = member::register_member(
            &ctx.data().database,
            &staff,
            NewMember {
                name,
                phone,
                email,
                tier,
                opening_balance,
                effective_date,
            },
        )
        .await?;

        ctx.say(format!(
            "✅ Registered **{}** as a {} member (ID {}).\n{}",
            created.name,
            created.tier,
            created.id,
            member_card(&created, &ctx.data().settings.tiers)?
        ))
        .await?;
        Ok(())
    }

    /// Shows a member's tier, balance and remaining benefits.
    #[poise::command(slash_command, rename = "info")]
    pub async fn member_info(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Member phone"]
        #[autocomplete = "autocomplete::autocomplete_member_phone"]
        phone: String,
    ) -> Result<()> {
        let m = member_by_phone(&ctx.data().database, &phone).await?;
        ctx.say(member_card(&m, &ctx.data().settings.tiers)?).await?;
        Ok(())
    }

    /// Lists members whose name or phone contains the search text.
    #[poise::command(slash_command, rename = "search")]
    pub async fn member_search(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Name or phone fragment (empty lists everyone)"] term: Option<String>,
    ) -> Result<()> {
        let found = member::search_members(&ctx.data().database, term.as_deref().unwrap_or(""))
            .await?;
        if found.is_empty() {
            ctx.say("🔍 No members found.").await?;
            return Ok(());
        }

        let mut response = format!("🔍 **{} member(s)**\n", found.len());
        for m in found.iter().take(25) {
            writeln!(
                response,
                "• **{}** ({}) - {} - ${:.2}",
                m.name,
                m.phone,
                m.tier,
                m.balance
            )?;
        }
        ctx.say(response).await?;
        Ok(())
    }

    /// Edits a member's details.
    #[poise::command(slash_command, rename = "edit")]
    pub async fn member_edit(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Member phone"]
        #[autocomplete = "autocomplete::autocomplete_member_phone"]
        phone: String,
        #[description = "New name"] name: Option<String>,
        #[description = "New phone"] new_phone: Option<String>,
        #[description = "New email"] email: Option<String>,
        #[description = "New tier"]
        #[autocomplete = "autocomplete::autocomplete_tier"]
        tier: Option<String>,
        #[description = "Corrected balance"] balance: Option<f64>,
        #[description = "New effective date YYYY-MM-DD"] effective_date: Option<String>,
        #[description = "New expiry date YYYY-MM-DD"] expiry_date: Option<String>,
    ) -> Result<()> {
        staff_context(ctx).await?;
        let db = &ctx.data().database;
        let m = member_by_phone(db, &phone).await?;

        let update = MemberUpdate {
            name,
            phone: new_phone,
            email,
            tier: tier.as_deref().map(|t| parse_tier(Some(t))).transpose()?,
            balance: balance.map(parse_amount).transpose()?,
            effective_date: effective_date.as_deref().map(parse_day).transpose()?,
            expiry_date: expiry_date.as_deref().map(parse_day).transpose()?,
        };
        let updated = member::update_member(db, m.id, update).await?;

        ctx.say(format!(
            "✅ Member updated.\n{}",
            member_card(&updated, &ctx.data().settings.tiers)?
        ))
        .await?;
        Ok(())
    }

    /// Deletes a member. Past receipts are kept.
    #[poise::command(slash_command, rename = "delete")]
    pub async fn member_delete(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Member phone"]
        #[autocomplete = "autocomplete::autocomplete_member_phone"]
        phone: String,
    ) -> Result<()> {
        staff_context(ctx).await?;
        let db = &ctx.data().database;
        let m = member_by_phone(db, &phone).await?;
        member::delete_member(db, m.id).await?;
        ctx.say(format!("🗑️ Deleted member **{}** ({}).", m.name, m.phone))
            .await?;
        Ok(())
    }

    /// Adds stored value to a member's balance.
    #[poise::command(slash_command, rename = "topup")]
    pub async fn member_topup(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Member phone"]
        #[autocomplete = "autocomplete::autocomplete_member_phone"]
        phone: String,
        #[description = "Amount to add"] amount: f64,
    ) -> Result<()> {
        staff_context(ctx).await?;
        let db = &ctx.data().database;
        let m = member_by_phone(db, &phone).await?;
        let amount = parse_amount(amount)?;

        let balance = ledger::top_up(db, m.id, amount).await?;
        ctx.say(format!(
            "💰 Added ${amount:.2} to **{}**. New balance: **${balance:.2}**",
            m.name
        ))
        .await?;
        Ok(())
    }

    /// Grants generic benefit uses to a member.
    #[poise::command(slash_command, rename = "grant")]
    pub async fn member_grant(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Member phone"]
        #[autocomplete = "autocomplete::autocomplete_member_phone"]
        phone: String,
        #[description = "Number of uses to grant"] count: i32,
    ) -> Result<()> {
        staff_context(ctx).await?;
        let db = &ctx.data().database;
        let m = member_by_phone(db, &phone).await?;
        let remaining = ledger::grant_benefits(db, m.id, count).await?;
        ctx.say(format!(
            "🎁 Granted {count} benefit use(s) to **{}**. Remaining: {remaining}",
            m.name
        ))
        .await?;
        Ok(())
    }

    /// Uses one generic benefit.
    #[poise::command(slash_command, rename = "benefit")]
    pub async fn member_benefit(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Member phone"]
        #[autocomplete = "autocomplete::autocomplete_member_phone"]
        phone: String,
    ) -> Result<()> {
        staff_context(ctx).await?;
        let db = &ctx.data().database;
        let m = member_by_phone(db, &phone).await?;
        let used = ledger::consume_generic_benefit(db, m.id).await?;
        ctx.say(format!(
            "🎁 Benefit used for **{}**. Remaining: {}",
            m.name, used.remaining
        ))
        .await?;
        Ok(())
    }

    /// Uses this week's dessert or coffee.
    #[poise::command(slash_command, rename = "dessert")]
    pub async fn member_dessert(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Member phone"]
        #[autocomplete = "autocomplete::autocomplete_member_phone"]
        phone: String,
    ) -> Result<()> {
        staff_context(ctx).await?;
        let data = ctx.data();
        let m = member_by_phone(&data.database, &phone).await?;
        let used =
            ledger::consume_weekly_dessert_coffee(&data.database, &data.settings.tiers, m.id)
                .await?;
        ctx.say(format!(
            "☕ Dessert/coffee served to **{}**. Left this week: {}",
            m.name, used.remaining
        ))
        .await?;
        Ok(())
    }

    /// Uses one of this year's omakase courses.
    #[poise::command(slash_command, rename = "omakase")]
    pub async fn member_omakase(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Member phone"]
        #[autocomplete = "autocomplete::autocomplete_member_phone"]
        phone: String,
    ) -> Result<()> {
        staff_context(ctx).await?;
        let data = ctx.data();
        let m = member_by_phone(&data.database, &phone).await?;
        let used =
            ledger::consume_yearly_omakase(&data.database, &data.settings.tiers, m.id).await?;
        ctx.say(format!(
            "🍣 Omakase served to **{}**. Left this year: {}",
            m.name, used.remaining
        ))
        .await?;
        Ok(())
    }

    /// Resets the weekly dessert/coffee counter.
    #[poise::command(slash_command, rename = "reset_weekly")]
    pub async fn member_reset_weekly(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Member phone"]
        #[autocomplete = "autocomplete::autocomplete_member_phone"]
        phone: String,
    ) -> Result<()> {
        staff_context(ctx).await?;
        let db = &ctx.data().database;
        let m = member_by_phone(db, &phone).await?;
        ledger::reset_weekly(db, m.id).await?;
        ctx.say(format!("🔄 Weekly dessert/coffee reset for **{}**.", m.name))
            .await?;
        Ok(())
    }

    /// Resets the yearly omakase counter.
    #[poise::command(slash_command, rename = "reset_yearly")]
    pub async fn member_reset_yearly(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Member phone"]
        #[autocomplete = "autocomplete::autocomplete_member_phone"]
        phone: String,
    ) -> Result<()> {
        staff_context(ctx).await?;
        let db = &ctx.data().database;
        let m = member_by_phone(db, &phone).await?;
        ledger::reset_yearly(db, m.id).await?;
        ctx.say(format!("🔄 Yearly omakase reset for **{}**.", m.name))
            .await?;
        Ok(())
    }

    /// Shows a member's recent checkouts.
    #[poise::command(slash_command, rename = "history")]
    pub async fn member_history(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Member phone"]
        #[autocomplete = "autocomplete::autocomplete_member_phone"]
        phone: String,
    ) -> Result<()> {
        let db = &ctx.data().database;
        let m = member_by_phone(db, &phone).await?;
        let history = checkout::transactions_for_member(db, m.id).await?;

        if history.is_empty() {
            ctx.say(format!("🧾 **{}** has no checkouts yet.", m.name))
                .await?;
            return Ok(());
        }

        let mut response = format!("🧾 **Checkouts for {}**\n", m.name);
        for t in history.iter().take(15) {
            writeln!(
                response,
                "• #{} {} - ${:.2} → ${:.2} (balance ${:.2}, cash ${:.2}) {}",
                t.id,
                t.created_at.format("%Y-%m-%d %H:%M"),
                t.original_amount,
                t.final_amount,
                t.paid_from_balance,
                t.cash_paid,
                t.note
            )?;
        }
        ctx.say(response).await?;
        Ok(())
    }

    /// Turns an existing customer into a member.
    #[poise::command(slash_command, rename = "upgrade")]
    pub async fn member_upgrade(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Customer"]
        #[autocomplete = "autocomplete::autocomplete_customer"]
        customer_id: i64,
        #[description = "Tier (default: Standard)"]
        #[autocomplete = "autocomplete::autocomplete_tier"]
        tier: Option<String>,
    ) -> Result<()> {
        let staff = staff_context(ctx).await?;
        let tier = parse_tier(tier.as_deref())?;
        let created =
            member::upgrade_customer(&ctx.data().database, &staff, customer_id, tier).await?;
        ctx.say(format!(
            "⭐ **{}** is now a {} member (ID {}).",
            created.name, created.tier, created.id
        ))
        .await?;
        Ok(())
    }
}

// Re-export all commands
pub use inner::*;
