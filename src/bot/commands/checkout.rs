//! Checkout Discord command - `/checkout`.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::{BotData, handlers::autocomplete, staff_context},
        core::{checkout, member, money::parse_amount},
        errors::{Error, Result},
    };
    use std::fmt::Write;

    /// Settles a member's bill, applying the tier discount and optionally the stored balance.
    #[poise::command(slash_command, prefix_command)]
    pub async fn checkout(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Member phone"]
        #[autocomplete = "autocomplete::autocomplete_member_phone"]
        phone: String,
        #[description = "Bill total before discount"] amount: f64,
        #[description = "Pay from stored balance? (default: true)"] use_balance: Option<bool>,
    ) -> Result<()> {
        let staff = staff_context(ctx).await?;
        let db = &ctx.data().database;
        let amount = parse_amount(amount)?;

        let Some(m) = member::find_member_by_phone(db, &phone).await? else {
            ctx.say(format!(
                "❌ No member with phone '{phone}'. Use `/member search` to look them up."
            ))
            .await?;
            return Ok(());
        };

        let receipt = checkout::settle(db, &staff, m.id, amount, use_balance.unwrap_or(true)).await?;
        let s = &receipt.settlement;

        let mut response = format!(
            "🧾 **Receipt #{}** - {} ({})\n",
            receipt.transaction_id, receipt.member_name, receipt.tier
        );
        writeln!(response, "Original: ${:.2}", s.original_amount)?;
        writeln!(response, "Discount: -${:.2}", s.discount_amount)?;
        writeln!(response, "**Total: ${:.2}**", s.final_amount)?;
        writeln!(response, "Paid from balance: ${:.2}", s.paid_from_balance)?;
        writeln!(response, "Cash due: **${:.2}**", s.cash_paid)?;
        write!(response, "Remaining balance: ${:.2}", receipt.balance_after)?;

        ctx.say(response).await?;
        Ok(())
    }
}

// Re-export all commands
pub use inner::*;
