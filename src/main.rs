use std::sync::Arc;
use table_ledger::{
    bot,
    config::{self, database},
    core::staff,
    errors::Result,
};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Initialize tracing (as early as possible)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // 2. Load .env file; env vars can also be set externally
    dotenvy::dotenv().ok();

    // 3. Settings: tier table, staff roster, membership length
    let settings = config::load_default_config()
        .inspect_err(|e| error!("Failed to load configuration: {}", e))?;
    info!(
        "Loaded configuration for {} ({} staff)",
        settings.restaurant_name,
        settings.staff.len()
    );

    // 4. Database
    let db = database::create_connection()
        .await
        .inspect_err(|e| error!("Failed to connect to database: {}", e))?;
    database::create_tables(&db).await?;

    // 5. Make sure configured staff can act on day one
    let seeded = staff::seed_staff(&db, &settings.staff).await?;
    info!("{seeded} staff member(s) seeded");

    // 6. Run the bot
    bot::run_bot(db, Arc::new(settings))
        .await
        .inspect_err(|e| error!("Bot stopped with error: {}", e))
}
