//! Fuel entry Discord commands - submitting readings and following up on alerts.
//!
//! `/fuel_entry` is the main pipeline: readings go through variance classification,
//! the entry and its alert are stored, and high-severity alerts are posted to the
//! alert channel.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::{
            BotData,
            commands::utils::{self, StationScope},
            handlers::{autocomplete, notify},
        },
        core::{access, alert, fuel_entry, report, shift, station, variance},
        entities::Severity,
        errors::{Error, Result},
    };
    use std::fmt::Write;
    use tracing::warn;

    /// Entries listed by `/entries`.
    const ENTRY_LIST_LIMIT: usize = 10;
    /// Alerts listed by `/alerts`.
    const ALERT_LIST_LIMIT: usize = 15;

    /// Submits the stock readings of a shift.
    ///
    /// Expected closing stock, variance, revenue and severity are computed from the
    /// readings. Medium and high variance raise an alert; high variance is also posted
    /// to the alert channel.
    #[poise::command(slash_command)]
    #[allow(clippy::too_many_arguments)]
    pub async fn fuel_entry(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Station"]
        #[autocomplete = "autocomplete::autocomplete_station_name"]
        station: String,
        #[description = "Shift label"]
        #[autocomplete = "autocomplete::autocomplete_shift_label"]
        shift: String,
        #[description = "Opening stock (litres)"] opening_stock: f64,
        #[description = "Closing stock (litres)"] closing_stock: f64,
        #[description = "Litres sold"] sold_litres: f64,
        #[description = "Price per litre"] price_per_litre: f64,
        #[description = "Business date YYYY-MM-DD (default: today)"] date: Option<String>,
    ) -> Result<()> {
        let Some(member) = utils::current_member(ctx).await? else {
            return Ok(());
        };
        let Some(target) = utils::resolve_station(ctx, &member, &station).await? else {
            return Ok(());
        };
        let entry_date = match utils::parse_date_or_today(date.as_deref()) {
            Ok(d) => d,
            Err(e) => return utils::reply_failure(ctx, e).await,
        };
        let db = &ctx.data().database;

        let Some(target_shift) = shift::get_shift_by_label(db, target.id, &shift).await? else {
            ctx.say(format!(
                "❌ Shift '{shift}' not found at **{}**. Use `/shift list`.",
                target.name
            ))
            .await?;
            return Ok(());
        };

        ctx.defer().await?;

        let new_entry = fuel_entry::NewFuelEntry {
            station_id: target.id,
            shift_id: target_shift.id,
            entry_date,
            readings: variance::Readings {
                opening_stock,
                closing_stock,
                sold_litres,
                price_per_litre,
            },
        };
        let outcome = match fuel_entry::submit_fuel_entry(db, &member.id, new_entry).await {
            Ok(outcome) => outcome,
            Err(e) => return utils::reply_failure(ctx, e).await,
        };
        let entry = &outcome.entry;

        let mut response = format!(
            "✅ **Entry #{} recorded** for {} / {}\n\n",
            entry.id, target.name, target_shift.label
        );
        writeln!(
            &mut response,
            "Expected closing: {:.2}L | Actual: {:.2}L",
            entry.expected_closing_stock, entry.closing_stock
        )?;
        writeln!(
            &mut response,
            "Variance: **{}** {} | Severity: **{}**",
            report::format_litres(entry.variance),
            report::loss_class(entry.variance).marker(),
            entry.severity
        )?;
        writeln!(&mut response, "Revenue: {:.2}", entry.revenue)?;
        if entry.fraud_flag {
            writeln!(
                &mut response,
                "\n⚠️ **Fraud suspected**: variance exceeds {:.0}L.",
                variance::FRAUD_VARIANCE_THRESHOLD
            )?;
        }
        if let Some(raised) = &outcome.alert {
            writeln!(&mut response, "\n🚨 Alert #{} raised: {}", raised.id, raised.message)?;
        }

        ctx.say(response).await?;

        if let Some(raised) = &outcome.alert {
            if let Err(e) =
                notify::notify_alert(ctx.http(), ctx.data().alert_channel, &target.name, raised)
                    .await
            {
                warn!(alert_id = raised.id, "Failed to post alert notification: {}", e);
            }
        }
        Ok(())
    }

    /// Shows recent fuel entries. Owners see the whole company by default.
    #[poise::command(slash_command)]
    pub async fn entries(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Station (default: yours, or all for owners)"]
        #[autocomplete = "autocomplete::autocomplete_station_name"]
        station: Option<String>,
    ) -> Result<()> {
        let Some(member) = utils::current_member(ctx).await? else {
            return Ok(());
        };
        let db = &ctx.data().database;

        let (title, rows) = match utils::resolve_station_scope(ctx, &member, station.as_deref())
            .await?
        {
            StationScope::Company => (
                "all stations".to_string(),
                fuel_entry::get_company_entries(db, member.company_id).await?,
            ),
            StationScope::Station(target) => (
                target.name.clone(),
                fuel_entry::get_station_entries(db, target.id).await?,
            ),
            StationScope::Unavailable => return Ok(()),
        };

        if rows.is_empty() {
            ctx.say(format!("📋 No entries for {title} yet.")).await?;
            return Ok(());
        }

        let mut response = format!("📋 **Recent entries - {title}**\n\n");
        for entry in rows.iter().take(ENTRY_LIST_LIMIT) {
            writeln!(&mut response, "{}", report::format_entry_summary(entry))?;
        }
        if rows.len() > ENTRY_LIST_LIMIT {
            writeln!(
                &mut response,
                "\n_…and {} older entries_",
                rows.len() - ENTRY_LIST_LIMIT
            )?;
        }

        ctx.say(response).await?;
        Ok(())
    }

    /// Shows variance alerts, newest first.
    #[poise::command(slash_command)]
    pub async fn alerts(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Station (default: yours, or all for owners)"]
        #[autocomplete = "autocomplete::autocomplete_station_name"]
        station: Option<String>,
        #[description = "Only unresolved alerts (default: true)"] open_only: Option<bool>,
    ) -> Result<()> {
        let Some(member) = utils::current_member(ctx).await? else {
            return Ok(());
        };
        let db = &ctx.data().database;

        let (title, mut rows) = match utils::resolve_station_scope(
            ctx,
            &member,
            station.as_deref(),
        )
        .await?
        {
            StationScope::Company => (
                "all stations".to_string(),
                alert::get_company_alerts(db, member.company_id).await?,
            ),
            StationScope::Station(target) => (
                target.name.clone(),
                alert::get_station_alerts(db, target.id).await?,
            ),
            StationScope::Unavailable => return Ok(()),
        };
        if open_only.unwrap_or(true) {
            rows.retain(|a| !a.resolved);
        }

        if rows.is_empty() {
            ctx.say(format!("✅ No alerts for {title}.")).await?;
            return Ok(());
        }

        let mut response = format!("🚨 **Alerts - {title}**\n\n");
        for a in rows.iter().take(ALERT_LIST_LIMIT) {
            let marker = match a.severity {
                Severity::High => "🔴",
                Severity::Medium => "🟡",
                Severity::Low => "🟢",
            };
            let state = if a.auto_closed {
                " (auto-closed)"
            } else if a.resolved {
                " (resolved)"
            } else {
                ""
            };
            writeln!(
                &mut response,
                "{marker} **#{}** {} | {}{state}",
                a.id,
                a.created_at.format("%Y-%m-%d %H:%M"),
                a.message
            )?;
        }

        ctx.say(response).await?;
        Ok(())
    }

    /// Marks an alert as resolved.
    #[poise::command(slash_command)]
    pub async fn resolve_alert(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Alert ID"] alert_id: i64,
    ) -> Result<()> {
        let Some(member) = utils::member_with_role(ctx, access::MANAGEMENT_ROLES).await? else {
            return Ok(());
        };
        let db = &ctx.data().database;

        let Some(existing) = alert::get_alert_by_id(db, alert_id).await? else {
            return utils::reply_failure(ctx, Error::not_found("Alert", alert_id)).await;
        };
        let scope_ok = match station::get_station_by_id(db, existing.station_id).await? {
            Some(alert_station) => access::can_view_station(&member, &alert_station),
            None => false,
        };
        if !scope_ok {
            // Alerts of other stations or tenants are reported as missing.
            return utils::reply_failure(ctx, Error::not_found("Alert", alert_id)).await;
        }

        match alert::resolve_alert(db, &member.id, alert_id).await {
            Ok(resolved) => {
                ctx.say(format!("✅ Alert #{} resolved.", resolved.id)).await?;
                Ok(())
            }
            Err(e) => utils::reply_failure(ctx, e).await,
        }
    }
}

// Re-export all commands
pub use inner::*;
