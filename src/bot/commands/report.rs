//! Reporting Discord commands - dashboard, reports, insights, audit trail and the
//! daily jobs.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::{
            BotData,
            commands::utils::{self, StationScope},
            handlers::autocomplete,
        },
        core::{access, alert, audit, fuel_entry, insight, jobs, report},
        entities::UserRole,
        errors::{Error, Result},
    };
    use std::fmt::Write;

    /// Largest page accepted by `/audit`.
    const MAX_AUDIT_ROWS: u64 = 50;

    /// Shows system stock, today's sales and variance, and open alerts.
    #[poise::command(slash_command)]
    pub async fn dashboard(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Station (default: yours, or all for owners)"]
        #[autocomplete = "autocomplete::autocomplete_station_name"]
        station: Option<String>,
    ) -> Result<()> {
        use poise::serenity_prelude as serenity;

        let Some(member) = utils::current_member(ctx).await? else {
            return Ok(());
        };
        let db = &ctx.data().database;

        let (title, entries, alerts) =
            match utils::resolve_station_scope(ctx, &member, station.as_deref()).await? {
                StationScope::Company => (
                    "All stations".to_string(),
                    fuel_entry::get_company_entries(db, member.company_id).await?,
                    alert::get_company_alerts(db, member.company_id).await?,
                ),
                StationScope::Station(target) => (
                    target.name.clone(),
                    fuel_entry::get_station_entries(db, target.id).await?,
                    alert::get_station_alerts(db, target.id).await?,
                ),
                StationScope::Unavailable => return Ok(()),
            };

        let today = chrono::Utc::now().date_naive();
        let summary = report::dashboard_summary(&entries, &alerts, today);

        let activity = if summary.recent_alerts.is_empty() {
            "_No open alerts_".to_string()
        } else {
            summary
                .recent_alerts
                .iter()
                .map(|line| format!("• {line}"))
                .collect::<Vec<_>>()
                .join("\n")
        };

        let dashboard_embed = serenity::CreateEmbed::default()
            .title(format!("⛽ Dashboard - {title}"))
            .description(format!("As of {}", today.format("%Y-%m-%d")))
            .color(0x00E6_7E22)
            .field("System Stock", format!("{:.2} L", summary.system_stock), true)
            .field(
                "Dispensed Today",
                format!("{:.2} L", summary.dispensed_today),
                true,
            )
            .field(
                "Total Variance",
                format!("{:.2} L", summary.variance_today),
                true,
            )
            .field("Open Alerts", summary.open_alerts.to_string(), true)
            .field("Recent Activity", activity, false);

        ctx.send(poise::CreateReply::default().embed(dashboard_embed))
            .await?;
        Ok(())
    }

    /// Shows totals and the seven most recent entries with their loss class.
    #[poise::command(slash_command)]
    pub async fn report(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Station (default: yours, or all for owners)"]
        #[autocomplete = "autocomplete::autocomplete_station_name"]
        station: Option<String>,
    ) -> Result<()> {
        let Some(member) = utils::current_member(ctx).await? else {
            return Ok(());
        };
        let db = &ctx.data().database;

        let (title, entries) =
            match utils::resolve_station_scope(ctx, &member, station.as_deref()).await? {
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

        let summary = report::entries_report(&entries);
        let mut response = format!("📊 **Report - {title}**\n\n");
        writeln!(&mut response, "Total sold: {:.2}L", summary.total_sold)?;
        writeln!(
            &mut response,
            "Total variance: {}",
            report::format_litres(summary.total_variance)
        )?;
        writeln!(&mut response)?;

        if summary.recent.is_empty() {
            response.push_str("_No entries yet_\n");
        } else {
            response.push_str("**Last entries (oldest first):**\n");
            for entry in &summary.recent {
                let class = report::loss_class(entry.variance);
                writeln!(
                    &mut response,
                    "{} {} | sold {:.2}L | variance {} | {}",
                    class.marker(),
                    entry.entry_date,
                    entry.sold_litres,
                    report::format_litres(entry.variance),
                    class
                )?;
            }
        }

        ctx.say(response).await?;
        Ok(())
    }

    /// Shows your company's smart insights for a day.
    ///
    /// Insights are generated by the daily jobs for the previous day, so that is the
    /// default.
    #[poise::command(slash_command)]
    pub async fn insights(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Date YYYY-MM-DD (default: yesterday)"] date: Option<String>,
    ) -> Result<()> {
        let Some(member) = utils::member_with_role(ctx, access::MANAGEMENT_ROLES).await? else {
            return Ok(());
        };
        let insight_date = match date.as_deref().map(str::trim).filter(|d| !d.is_empty()) {
            Some(text) => match utils::parse_date_or_today(Some(text)) {
                Ok(d) => d,
                Err(e) => return utils::reply_failure(ctx, e).await,
            },
            None => chrono::Utc::now().date_naive() - chrono::Duration::days(1),
        };
        let db = &ctx.data().database;

        let rows = insight::get_company_insights(
            db,
            member.company_id,
            insight_date,
            insight::COMPANY_INSIGHT_LIMIT,
        )
        .await?;

        if rows.is_empty() {
            ctx.say(format!("💡 No insights for {insight_date}."))
                .await?;
            return Ok(());
        }

        let mut response = format!("💡 **Smart insights - {insight_date}**\n\n");
        for row in rows {
            writeln!(
                &mut response,
                "[{}] **{}** {}",
                row.priority.to_uppercase(),
                row.insight_type,
                row.message
            )?;
        }

        ctx.say(response).await?;
        Ok(())
    }

    /// Shows the most recent audit events (owners only).
    #[poise::command(slash_command)]
    pub async fn audit(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Number of events (default 15, max 50)"] limit: Option<u64>,
    ) -> Result<()> {
        if utils::member_with_role(ctx, &[UserRole::Owner])
            .await?
            .is_none()
        {
            return Ok(());
        }
        let db = &ctx.data().database;
        let rows =
            audit::get_recent_audit_logs(db, limit.unwrap_or(15).clamp(1, MAX_AUDIT_ROWS)).await?;

        if rows.is_empty() {
            ctx.say("📜 The audit trail is empty.").await?;
            return Ok(());
        }

        let mut response = String::from("📜 **Audit trail**\n```\n");
        for row in &rows {
            writeln!(&mut response, "{}", audit::format_audit_line(row))?;
        }
        response.push_str("```");

        ctx.say(response).await?;
        Ok(())
    }

    /// Runs the daily jobs now: insights, yesterday's report and stale-alert cleanup.
    ///
    /// The jobs run at most once per day, whether triggered here or by the ticker.
    #[poise::command(slash_command)]
    pub async fn daily_jobs(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        if utils::member_with_role(ctx, &[UserRole::Owner])
            .await?
            .is_none()
        {
            return Ok(());
        }
        let db = &ctx.data().database;

        // Acknowledge command quickly
        ctx.defer().await?;

        match jobs::run_daily_jobs(db, &ctx.data().jobs, chrono::Utc::now()).await? {
            Some(result) => {
                let summary = jobs::format_daily_jobs_summary(&result);
                ctx.say(format!("✅ **Daily jobs complete!**\n\n```\n{summary}\n```"))
                    .await?;
            }
            None => {
                ctx.say("ℹ️ Daily jobs already ran today. Nothing to do.")
                    .await?;
            }
        }

        Ok(())
    }
}

// Re-export all commands
pub use inner::*;
