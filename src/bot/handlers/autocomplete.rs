//! Autocomplete handlers for Discord slash command parameters.
//!
//! Suggestions are capped at 25 entries, Discord's limit.

use crate::{
    bot::BotData,
    core::{customer, member},
    entities::{ReservationStatus, Tier},
    errors::Error,
};
use sea_orm::Iterable;

const MAX_SUGGESTIONS: usize = 25;

/// Suggests member phone numbers whose name or phone matches the input.
///
/// Returned values are the bare phone numbers so they can be passed straight
/// back as the command argument.
pub async fn autocomplete_member_phone(
    ctx: poise::Context<'_, BotData, Error>,
    partial: &str,
) -> Vec<poise::serenity_prelude::AutocompleteChoice> {
    let db = &ctx.data().database;
    let Ok(members) = member::search_members(db, partial).await else {
        return Vec::new();
    };

    members
        .into_iter()
        .take(MAX_SUGGESTIONS)
        .map(|m| {
            poise::serenity_prelude::AutocompleteChoice::new(
                format!("{} ({}) - {}", m.name, m.phone, m.tier),
                m.phone,
            )
        })
        .collect()
}

/// Suggests customer ids by name or phone.
pub async fn autocomplete_customer(
    ctx: poise::Context<'_, BotData, Error>,
    partial: &str,
) -> Vec<poise::serenity_prelude::AutocompleteChoice> {
    let db = &ctx.data().database;
    let Ok(customers) = customer::search_customers(db, partial).await else {
        return Vec::new();
    };

    customers
        .into_iter()
        .take(MAX_SUGGESTIONS)
        .map(|c| {
            poise::serenity_prelude::AutocompleteChoice::new(
                format!("{} ({})", c.name, c.phone),
                c.id,
            )
        })
        .collect()
}

/// Suggests tier names.
pub async fn autocomplete_tier(
    _ctx: poise::Context<'_, BotData, Error>,
    partial: &str,
) -> Vec<String> {
    let partial_lower = partial.to_lowercase();
    Tier::iter()
        .map(|t| t.to_string())
        .filter(|t| t.to_lowercase().contains(&partial_lower))
        .collect()
}

/// Suggests reservation statuses.
pub async fn autocomplete_status(
    _ctx: poise::Context<'_, BotData, Error>,
    partial: &str,
) -> Vec<String> {
    let partial_lower = partial.to_lowercase();
    ReservationStatus::iter()
        .map(|s| s.to_string())
        .filter(|s| s.contains(&partial_lower))
        .collect()
}
