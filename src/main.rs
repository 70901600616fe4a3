use dotenvy::dotenv;
use fuel_buddy::{
    bot,
    config::{database, settings},
    core::company,
    errors::{Error, Result},
};
use std::env;
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
    dotenv().ok();
    info!("Attempted to load .env file.");

    // 3. Load the application settings (config.toml, or defaults)
    let app_settings = settings::load_app_settings()
        .inspect_err(|e| error!("Failed to load settings: {}", e))?;

    // 4. Connect to the database and create missing tables
    let db = database::create_connection()
        .await
        .inspect_err(|e| error!("Failed to connect to database: {}", e))?;
    database::create_tables(&db)
        .await
        .inspect(|()| info!("Database initialized successfully."))
        .inspect_err(|e| error!("Failed to create tables: {}", e))?;

    // 5. Seed companies and stations from config.toml
    let seeded = company::seed_companies(&db, &app_settings.companies)
        .await
        .inspect_err(|e| error!("Failed to seed companies: {}", e))?;
    info!("Seeded {} new companies.", seeded);

    // 6. Run the bot
    let token = env::var("DISCORD_BOT_TOKEN")
        .inspect_err(|e| error!("DISCORD_BOT_TOKEN not found: {}", e))
        .map_err(Error::EnvVar)?;
    let alert_channel = settings::get_alert_channel_id();
    if alert_channel.is_none() {
        info!("ALERT_CHANNEL_ID not set; high-severity alerts will not be posted.");
    }

    bot::run_bot(token, db, app_settings.jobs, alert_channel).await
}
