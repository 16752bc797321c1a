//! Bot layer - the front-desk interface as Discord slash commands
//!
//! Commands translate chat input into calls on `crate::core` and format the
//! results. Every command that changes data first resolves the calling Discord
//! user to a registered employee; that employee is recorded on whatever the
//! command creates.

/// Discord command implementations (members, checkout, customers, reservations, staff, general)
pub mod commands;
/// Discord interaction handlers (autocomplete, etc.)
pub mod handlers;

use crate::{
    config::Settings,
    core::{RequestContext, staff},
    errors::{Error, Result},
};
use poise::serenity_prelude as serenity;
use sea_orm::DatabaseConnection;
use std::sync::Arc;
use tracing::{error, info, instrument};

/// Shared data available to all bot commands.
pub struct BotData {
    /// Database connection for all database operations
    pub database: DatabaseConnection,
    /// Settings loaded at startup, shared by every request
    pub settings: Arc<Settings>,
}

impl BotData {
    /// Creates the shared command data.
    #[must_use]
    pub const fn new(database: DatabaseConnection, settings: Arc<Settings>) -> Self {
        Self { database, settings }
    }
}

/// Poise context used by every command
pub type Context<'a> = poise::Context<'a, BotData, Error>;

/// Resolves the calling Discord user to a staff member.
///
/// # Errors
/// Returns `StaffNotRegistered` if the caller has no employee record.
pub async fn staff_context(ctx: Context<'_>) -> Result<RequestContext> {
    let data = ctx.data();
    staff::request_context(
        &data.database,
        &ctx.author().id.to_string(),
        Arc::clone(&data.settings),
    )
    .await
}

async fn on_error(error: poise::FrameworkError<'_, BotData, Error>) {
    match error {
        poise::FrameworkError::Setup { error, .. } => {
            error!("Failed to start bot: {:?}", error);
        }
        poise::FrameworkError::Command { error, ctx, .. } => {
            error!("Error in command `{}`: {:?}", ctx.command().name, error);
            if let Err(e) = ctx.say(format!("❌ {error}")).await {
                error!("Failed to send error message: {}", e);
            }
        }
        error => {
            if let Err(e) = poise::builtins::on_error(error).await {
                error!("Error while handling error: {}", e);
            }
        }
    }
}

/// Connects to Discord and serves commands until the client stops.
///
/// # Errors
/// Returns an error if the token is missing or the client fails.
#[instrument(skip(database, settings))]
pub async fn run_bot(database: DatabaseConnection, settings: Arc<Settings>) -> Result<()> {
    let token = std::env::var("DISCORD_BOT_TOKEN")?;

    let framework = poise::Framework::builder()
        .options(poise::FrameworkOptions {
            commands: vec![
                commands::ping(),
                commands::help(),
                commands::dashboard(),
                commands::member(),
                commands::checkout(),
                commands::customer(),
                commands::reservation(),
                commands::staff(),
            ],
            on_error: |error| Box::pin(on_error(error)),
            ..Default::default()
        })
        .setup(move |ctx, ready, framework| {
            Box::pin(async move {
                info!("Logged in as {}", ready.user.name);
                info!("Registering commands globally...");
                poise::builtins::register_globally(ctx, &framework.options().commands).await?;
                Ok(BotData::new(database, settings))
            })
        })
        .build();

    let intents = serenity::GatewayIntents::non_privileged();

    info!("Setting up Serenity client for Poise framework...");
    let mut client = serenity::Client::builder(&token, intents)
        .framework(framework)
        .await?;

    info!("Starting bot client...");
    client.start().await?;
    Ok(())
}

pub use commands::*;
pub use handlers::*;
