//! General Discord commands - ping, help and the front-desk dashboard.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::BotData,
        core::dashboard,
        errors::{Error, Result},
    };
    use std::fmt::Write;

    /// Responds with "Pong!" to test bot connectivity.
    #[poise::command(slash_command, prefix_command)]
    pub async fn ping(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        ctx.say("Pong!").await?;
        Ok(())
    }

    /// Displays help information about available commands.
    #[poise::command(slash_command, prefix_command)]
    pub async fn help(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let help_text = format!(
            "**{} Front Desk Help**\n\n\
            **Checkout**\n\
            • `/checkout <phone> <amount> [use_balance]` - Settles a member's bill.\n\n\
            **Members**\n\
            • `/member register|info|search|edit|delete|upgrade` - Manage memberships.\n\
            • `/member topup|history` - Stored balance.\n\
            • `/member benefit|dessert|omakase|grant` - Redeem or grant benefits.\n\
            • `/member reset_weekly|reset_yearly` - Reset quota counters.\n\n\
            **Customers**\n\
            • `/customer add|info|search|edit|delete` - Customer records.\n\
            • `/customer visit|record_visit|visits|note|notes` - Visits and interactions.\n\n\
            **Reservations**\n\
            • `/reservation add|list|today|calendar|status|edit|delete`\n\n\
            **Utility**\n\
            • `/dashboard` - Today at a glance.\n\
            • `/staff register|list` - Staff accounts.\n\
            • `/ping` - Checks if the bot is responsive.\n\
            • `/help` - Shows this help message.",
            ctx.data().settings.restaurant_name
        );

        ctx.say(help_text).await?;
        Ok(())
    }

    /// Shows member, customer and reservation headlines plus customer analytics.
    #[poise::command(slash_command, prefix_command)]
    pub async fn dashboard(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let data = ctx.data();
        let s = dashboard::summary(&data.database, chrono::Utc::now()).await?;

        let mut response = format!("📊 **{}**\n", data.settings.restaurant_name);
        writeln!(
            response,
            "👑 Members: {} ({} active)",
            s.member_count, s.active_member_count
        )?;
        writeln!(response, "🙋 Customers: {}", s.customer_count)?;
        writeln!(response, "💰 Stored value: ${:.2}", s.total_stored_value)?;
        writeln!(
            response,
            "📈 Visits: {} | Revenue: ${:.2} | Average spend: ${:.2}",
            s.total_visits, s.total_revenue, s.average_spend
        )?;

        writeln!(response, "\n**Today's reservations**")?;
        if s.todays_reservations.is_empty() {
            writeln!(response, "_None_")?;
        }
        for r in &s.todays_reservations {
            writeln!(
                response,
                "• {} **{}** - {} guest(s) [{}]",
                r.date.format("%H:%M"),
                r.name,
                r.party_size,
                r.status
            )?;
        }

        writeln!(response, "\n**Upcoming reservations**")?;
        if s.upcoming_reservations.is_empty() {
            writeln!(response, "_None_")?;
        }
        for r in &s.upcoming_reservations {
            writeln!(
                response,
                "• {} **{}** - {} guest(s)",
                r.date.format("%Y-%m-%d %H:%M"),
                r.name,
                r.party_size
            )?;
        }

        writeln!(response, "\n**Top customers**")?;
        for c in &s.top_customers {
            writeln!(
                response,
                "• **{}** - ${:.2} over {} visit(s)",
                c.name, c.total_spent, c.visits
            )?;
        }

        writeln!(response, "\n**Recent members**")?;
        for m in &s.recent_members {
            writeln!(
                response,
                "• **{}** ({}) since {}",
                m.name,
                m.tier,
                m.effective_date.format("%Y-%m-%d")
            )?;
        }

        ctx.say(response).await?;
        Ok(())
    }
}

// Re-export all commands
pub use inner::*;
