//! Daily maintenance jobs
//!
//! Generates smart insights and the daily report for the previous (completed) day,
//! and closes stale alerts. The last run date is tracked in the `system_state`
//! table so the jobs run at most once per UTC date, no matter how often the ticker
//! or the `/daily_jobs` command fires.

use crate::{
    config::settings::JobSettings,
    core::{alert, insight, report, system_state},
    entities::daily_report,
    errors::{Error, Result},
};
use chrono::{DateTime, Duration, NaiveDate, Utc};
use sea_orm::DatabaseConnection;
use tracing::{info, instrument};

const LAST_DAILY_JOBS_KEY: &str = "last_daily_jobs";

/// Represents the result of one run of the daily jobs.
#[derive(Debug, Clone)]
pub struct DailyJobsResult {
    /// UTC date the jobs ran for
    pub run_date: NaiveDate,
    /// Number of insights generated for the day before `run_date`
    pub insights_generated: usize,
    /// Report stored for the day before `run_date`
    pub report: daily_report::Model,
    /// Number of stale alerts closed
    pub alerts_auto_closed: u64,
}

/// Retrieves the date of the last daily jobs run.
///
/// # Returns
/// * `Ok(Some(date))` - Last run date if one was recorded
/// * `Ok(None)` - The jobs never ran
pub async fn get_last_run_date(db: &DatabaseConnection) -> Result<Option<NaiveDate>> {
    match system_state::get_value(db, LAST_DAILY_JOBS_KEY).await? {
        Some(value) => NaiveDate::parse_from_str(&value, "%Y-%m-%d")
            .map(Some)
            .map_err(|e| Error::Config {
                message: format!("Failed to parse last daily jobs date: {e}"),
            }),
        None => Ok(None),
    }
}

/// Checks whether the jobs still have to run for the date of `now`.
pub async fn is_daily_run_needed(db: &DatabaseConnection, now: DateTime<Utc>) -> Result<bool> {
    let today = now.date_naive();
    Ok(get_last_run_date(db)
        .await?
        .is_none_or(|last| last < today))
}

/// Runs the daily jobs unless they already ran for the date of `now`.
///
/// 1. Smart insights for yesterday
/// 2. Daily report for yesterday
/// 3. Auto-close of alerts older than the configured age
/// 4. Records today's date in `system_state`
///
/// # Returns
/// * `Ok(Some(result))` - The jobs ran
/// * `Ok(None)` - Already ran today
#[instrument(skip(db, settings))]
pub async fn run_daily_jobs(
    db: &DatabaseConnection,
    settings: &JobSettings,
    now: DateTime<Utc>,
) -> Result<Option<DailyJobsResult>> {
    if !is_daily_run_needed(db, now).await? {
        return Ok(None);
    }

    let today = now.date_naive();
    let yesterday = today - Duration::days(1);

    let insights =
        insight::generate_insights(db, yesterday, settings.insight_variance_threshold).await?;
    let daily = report::generate_daily_report(db, yesterday).await?;
    let closed = alert::auto_close_old_alerts(db, now, settings.auto_close_after_days).await?;

    system_state::set_value(db, LAST_DAILY_JOBS_KEY, &today.format("%Y-%m-%d").to_string())
        .await?;

    info!(
        %today,
        insights = insights.len(),
        closed,
        "Daily jobs completed"
    );

    Ok(Some(DailyJobsResult {
        run_date: today,
        insights_generated: insights.len(),
        report: daily,
        alerts_auto_closed: closed,
    }))
}

/// Formats a daily jobs result into a human-readable summary string.
#[must_use]
pub fn format_daily_jobs_summary(result: &DailyJobsResult) -> String {
    use std::fmt::Write;

    let mut summary = format!("Daily Jobs - {}\n", result.run_date.format("%Y-%m-%d"));

    // write! is infallible when writing to String
    let _ = writeln!(
        summary,
        "  Insights generated: {}",
        result.insights_generated
    );
    let _ = writeln!(
        summary,
        "  Report for {}: {} entries | revenue {:.2} | |variance| {:.2}L | sold {:.2}L | {} alerts",
        result.report.report_date,
        result.report.entry_count,
        result.report.total_revenue,
        result.report.total_variance,
        result.report.total_litres_sold,
        result.report.alert_count
    );
    let _ = writeln!(
        summary,
        "  Alerts auto-closed: {}",
        result.alerts_auto_closed
    );

    summary
}
