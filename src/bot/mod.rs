//! Bot layer - Discord-specific interface and command handlers
//!
//! This module provides the Discord interface for FuelBuddy, including all slash
//! commands, autocomplete handlers, alert notifications, the daily-jobs ticker and
//! bot context management.

/// Discord command implementations (stations, pumps, staff, shifts, entries, reports)
pub mod commands;
/// Discord interaction handlers (autocomplete, notifications, scheduled jobs)
pub mod handlers;

use crate::{
    config::settings::JobSettings,
    errors::{Error, Result},
};
use poise::serenity_prelude as serenity;
use sea_orm::DatabaseConnection;
use tracing::{error, info, instrument};

/// Shared data available to all bot commands.
/// This structure holds the database connection, the job tuning and the channel
/// high-severity alerts are posted to.
pub struct BotData {
    /// Database connection for all database operations
    pub database: DatabaseConnection,
    /// Daily job tuning, used by `/daily_jobs`
    pub jobs: JobSettings,
    /// Discord channel ID for high-severity alert notifications
    pub alert_channel: Option<u64>,
}

impl BotData {
    /// Creates a new `BotData` instance.
    #[must_use]
    pub const fn new(
        database: DatabaseConnection,
        jobs: JobSettings,
        alert_channel: Option<u64>,
    ) -> Self {
        Self {
            database,
            jobs,
            alert_channel,
        }
    }
}

/// Every slash command the bot registers.
#[must_use]
pub fn all_commands() -> Vec<poise::Command<BotData, Error>> {
    vec![
        commands::ping(),
        commands::help(),
        commands::register_company(),
        commands::companies(),
        commands::station(),
        commands::pump(),
        commands::staff(),
        commands::shift(),
        commands::fuel_entry(),
        commands::entries(),
        commands::alerts(),
        commands::resolve_alert(),
        commands::expense(),
        commands::financials(),
        commands::dashboard(),
        commands::report(),
        commands::insights(),
        commands::audit(),
        commands::daily_jobs(),
    ]
}

async fn on_error(error: poise::FrameworkError<'_, BotData, Error>) {
    match error {
        poise::FrameworkError::Setup { error, .. } => {
            error!("Failed to start bot: {:?}", error);
        }
        poise::FrameworkError::Command { error, ctx, .. } => {
            error!("Error in command `{}`: {:?}", ctx.command().name, error);
            if let Err(e) = ctx.say(format!("❌ An error occurred: {error}")).await {
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

/// Builds the poise framework and runs the Discord client until it stops.
///
/// On ready, commands are registered globally and the daily-jobs ticker is spawned.
///
/// # Errors
/// Returns an error if the client cannot be created or the gateway connection fails.
#[instrument(skip(token, database, jobs))]
pub async fn run_bot(
    token: String,
    database: DatabaseConnection,
    jobs: JobSettings,
    alert_channel: Option<u64>,
) -> Result<()> {
    let framework = poise::Framework::builder()
        .options(poise::FrameworkOptions {
            commands: all_commands(),
            on_error: |error| Box::pin(on_error(error)),
            ..Default::default()
        })
        .setup(move |ctx, ready, framework| {
            Box::pin(async move {
                info!("Logged in as {}", ready.user.name);
                info!("Registering commands globally...");
                poise::builtins::register_globally(ctx, &framework.options().commands).await?;

                handlers::scheduler::spawn_daily_jobs_ticker(
                    ctx.http.clone(),
                    database.clone(),
                    jobs.clone(),
                    alert_channel,
                );

                Ok(BotData::new(database, jobs, alert_channel))
            })
        })
        .build();

    let intents = serenity::GatewayIntents::GUILD_MESSAGES
        | serenity::GatewayIntents::DIRECT_MESSAGES
        | serenity::GatewayIntents::MESSAGE_CONTENT;

    info!("Setting up Serenity client for Poise framework...");
    let mut client = serenity::ClientBuilder::new(&token, intents)
        .framework(framework)
        .await
        .inspect_err(|e| error!("Error creating client: {:?}", e))?;

    info!("Starting bot client...");
    client
        .start()
        .await
        .inspect_err(|e| error!("Client error: {:?}", e))?;
    Ok(())
}

pub use commands::*;
pub use handlers::*;
