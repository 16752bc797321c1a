//! Staff Discord commands - `/staff register` and `/staff list`.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::{BotData, staff_context},
        core::staff,
        errors::{Error, Result},
    };
    use poise::serenity_prelude as serenity;
    use std::fmt::Write;

    /// Parent command for employee accounts.
    #[poise::command(slash_command, subcommands("staff_register", "staff_list"))]
    pub async fn staff(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        ctx.say("Use `/staff register` or `/staff list`.").await?;
        Ok(())
    }

    /// Registers a Discord user as staff. Only existing staff may do this.
    #[poise::command(slash_command, rename = "register")]
    pub async fn staff_register(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Discord user"] user: serenity::User,
        #[description = "Display name"] name: String,
    ) -> Result<()> {
        staff_context(ctx).await?;
        let employee =
            staff::register_staff(&ctx.data().database, &user.id.to_string(), &name).await?;
        ctx.say(format!(
            "✅ Registered **{}** as staff (employee #{}).",
            employee.name, employee.id
        ))
        .await?;
        Ok(())
    }

    /// Lists registered staff.
    #[poise::command(slash_command, rename = "list")]
    pub async fn staff_list(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let employees = staff::list_staff(&ctx.data().database).await?;
        if employees.is_empty() {
            ctx.say("👥 No staff registered. Add some under `[[staff]]` in the config file.")
                .await?;
            return Ok(());
        }

        let mut response = String::from("👥 **Staff**\n");
        for e in &employees {
            writeln!(response, "• #{} **{}** (<@{}>)", e.id, e.name, e.username)?;
        }
        ctx.say(response).await?;
        Ok(())
    }
}

// Re-export all commands
pub use inner::*;
