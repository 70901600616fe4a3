//! Alert notifications - posts high-severity alerts and job summaries to the
//! configured alert channel.

use crate::{core::alert, entities::alert as alert_entity, errors::Result};
use poise::serenity_prelude as serenity;
use tracing::{debug, info};

/// Message posted to the alert channel for a high-severity alert.
#[must_use]
pub fn format_alert_notification(station_name: &str, raised: &alert_entity::Model) -> String {
    format!(
        "🚨 **High variance at {station_name}**\n{}\nAlert #{} | severity {} | resolve with `/resolve_alert {}`",
        raised.message, raised.id, raised.severity, raised.id
    )
}

/// Posts the alert to `channel` when it needs a notification.
///
/// Returns whether a message was sent. Without a configured channel nothing is posted.
pub async fn notify_alert(
    http: &serenity::Http,
    channel: Option<u64>,
    station_name: &str,
    raised: &alert_entity::Model,
) -> Result<bool> {
    if !alert::needs_notification(raised) {
        return Ok(false);
    }
    let Some(channel_id) = channel else {
        debug!(alert_id = raised.id, "No alert channel configured; skipping notification");
        return Ok(false);
    };

    serenity::ChannelId::new(channel_id)
        .say(http, format_alert_notification(station_name, raised))
        .await?;
    info!(alert_id = raised.id, channel_id, "Posted high-severity alert");
    Ok(true)
}

/// Posts free text to the alert channel, if one is configured.
pub async fn post_to_alert_channel(
    http: &serenity::Http,
    channel: Option<u64>,
    message: &str,
) -> Result<()> {
    if let Some(channel_id) = channel {
        serenity::ChannelId::new(channel_id).say(http, message).await?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::Severity;
    use chrono::Utc;

    #[test]
    fn test_format_alert_notification() {
        let raised = alert_entity::Model {
            id: 12,
            station_id: 1,
            entry_id: 3,
            message: alert::alert_message(-64.0, "night"),
            variance: -64.0,
            severity: Severity::High,
            resolved: false,
            auto_closed: false,
            created_at: Utc::now(),
            closed_at: None,
        };

        let text = format_alert_notification("Skyline Main", &raised);
        assert!(text.starts_with("🚨 **High variance at Skyline Main**"));
        assert!(text.contains("Anomaly detected: Variance of -64.00L in shift night"));
        assert!(text.contains("`/resolve_alert 12`"));
    }
}
