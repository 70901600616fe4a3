//! Background ticker for the daily jobs.
//!
//! The ticker only asks whether the jobs are due; the `system_state` date marker
//! keeps them to one run per UTC date.

use crate::{
    bot::handlers::notify,
    config::settings::{JobSettings, MAX_TICK_MINUTES},
    core::jobs,
};
use poise::serenity_prelude as serenity;
use sea_orm::DatabaseConnection;
use std::{sync::Arc, time::Duration};
use tracing::{error, info};

/// Ticker period for `tick_minutes`, clamped to between one minute and one day.
#[must_use]
pub fn tick_period(tick_minutes: u64) -> Duration {
    Duration::from_secs(tick_minutes.clamp(1, MAX_TICK_MINUTES) * 60)
}

/// Spawns a tokio task that checks every `tick_minutes` whether the daily jobs are due
/// and runs them, posting the summary to the alert channel.
pub fn spawn_daily_jobs_ticker(
    http: Arc<serenity::Http>,
    database: DatabaseConnection,
    settings: JobSettings,
    alert_channel: Option<u64>,
) {
    let period = tick_period(settings.tick_minutes);
    info!(?period, "Starting daily jobs ticker");

    tokio::spawn(async move {
        let mut interval = tokio::time::interval(period);
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        loop {
            interval.tick().await;
            match jobs::run_daily_jobs(&database, &settings, chrono::Utc::now()).await {
                Ok(Some(result)) => {
                    let summary = jobs::format_daily_jobs_summary(&result);
                    info!("{summary}");
                    let message = format!("🗓️ **Daily jobs complete**\n```\n{summary}```");
                    if let Err(e) =
                        notify::post_to_alert_channel(&http, alert_channel, &message).await
                    {
                        error!("Failed to post daily jobs summary: {}", e);
                    }
                }
                Ok(None) => {}
                Err(e) => error!("Daily jobs failed: {}", e),
            }
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tick_period_is_clamped() {
        assert_eq!(tick_period(15), Duration::from_secs(15 * 60));
        assert_eq!(tick_period(0), Duration::from_secs(60));
        assert_eq!(tick_period(u64::MAX), Duration::from_secs(MAX_TICK_MINUTES * 60));
    }
}
