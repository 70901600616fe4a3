//! Report generation business logic.
//!
//! This module builds the dashboard, entry and financial summaries shown by the bot,
//! and persists the per-date daily report. The summary builders are pure functions
//! over already-loaded records so the bot layer decides which entries a user may see.

use crate::{
    core::{expense, fuel_entry as entry_ops},
    entities::{DailyReport, alert, daily_report, fuel_entry},
    errors::Result,
};
use chrono::{NaiveDate, Utc};
use sea_orm::{Set, TransactionTrait, prelude::*};
use std::fmt;
use tracing::info;

/// Number of alert lines shown on the dashboard.
pub const DASHBOARD_ALERT_LINES: usize = 5;

/// Number of entries in the reports chart window.
pub const REPORT_CHART_WINDOW: usize = 7;

/// Headline figures for the dashboard.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardSummary {
    /// Closing stock of the newest entry, 0 when there are none
    pub system_stock: f64,
    /// Litres sold on `today`
    pub dispensed_today: f64,
    /// Signed sum of the variance of `today`'s entries
    pub variance_today: f64,
    /// Unresolved alerts
    pub open_alerts: usize,
    /// `"HH:MM:SS: message"` for the most recent alerts, newest first
    pub recent_alerts: Vec<String>,
}

/// Totals and chart window for the reports view.
#[derive(Debug, Clone)]
pub struct EntriesReport {
    /// Sum of litres sold
    pub total_sold: f64,
    /// Signed sum of variance
    pub total_variance: f64,
    /// The most recent entries, oldest first
    pub recent: Vec<fuel_entry::Model>,
}

/// Revenue against costs for one station.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FinancialSummary {
    /// Sum of entry revenue
    pub total_revenue: f64,
    /// Sum of expense amounts
    pub total_expenses: f64,
    /// `total_revenue - total_expenses`
    pub net_profit: f64,
}

/// Display class for a variance in the reports table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LossClass {
    /// `|variance|` of at most 5 litres
    Normal,
    /// `|variance|` above 5 litres
    Warning,
    /// `|variance|` above 15 litres
    Critical,
}

impl LossClass {
    /// Lowercase label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::Warning => "warning",
            Self::Critical => "critical",
        }
    }

    /// Emoji marker used in Discord output.
    #[must_use]
    pub const fn marker(self) -> &'static str {
        match self {
            Self::Normal => "🟢",
            Self::Warning => "🟡",
            Self::Critical => "🔴",
        }
    }
}

impl fmt::Display for LossClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classifies a variance for display: above 15L is critical, above 5L a warning.
#[must_use]
pub fn loss_class(variance: f64) -> LossClass {
    let magnitude = variance.abs();
    if magnitude > 15.0 {
        LossClass::Critical
    } else if magnitude > 5.0 {
        LossClass::Warning
    } else {
        LossClass::Normal
    }
}

fn newest_first(entries: &[fuel_entry::Model]) -> Vec<&fuel_entry::Model> {
    let mut sorted: Vec<&fuel_entry::Model> = entries.iter().collect();
    sorted.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
    sorted
}

/// Builds the dashboard figures from the entries and alerts visible to a user.
#[must_use]
pub fn dashboard_summary(
    entries: &[fuel_entry::Model],
    alerts: &[alert::Model],
    today: NaiveDate,
) -> DashboardSummary {
    let system_stock = newest_first(entries)
        .first()
        .map_or(0.0, |newest| newest.closing_stock);

    let (dispensed_today, variance_today) = entries
        .iter()
        .filter(|e| e.entry_date == today)
        .fold((0.0, 0.0), |(sold, variance), e| {
            (sold + e.sold_litres, variance + e.variance)
        });

    let mut open: Vec<&alert::Model> = alerts.iter().filter(|a| !a.resolved).collect();
    open.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));

    let recent_alerts = open
        .iter()
        .take(DASHBOARD_ALERT_LINES)
        .map(|a| format!("{}: {}", a.created_at.format("%H:%M:%S"), a.message))
        .collect();

    DashboardSummary {
        system_stock,
        dispensed_today,
        variance_today,
        open_alerts: open.len(),
        recent_alerts,
    }
}

/// Totals over `entries` plus the chart window of the most recent ones.
#[must_use]
pub fn entries_report(entries: &[fuel_entry::Model]) -> EntriesReport {
    let total_sold = entries.iter().map(|e| e.sold_litres).sum();
    let total_variance = entries.iter().map(|e| e.variance).sum();

    let mut recent: Vec<fuel_entry::Model> = newest_first(entries)
        .into_iter()
        .take(REPORT_CHART_WINDOW)
        .cloned()
        .collect();
    recent.reverse();

    EntriesReport {
        total_sold,
        total_variance,
        recent,
    }
}

/// Revenue from all of a station's entries against all of its expenses.
pub async fn financial_summary(
    db: &DatabaseConnection,
    station_id: i64,
) -> Result<FinancialSummary> {
    let total_revenue: f64 = entry_ops::get_station_entries(db, station_id)
        .await?
        .iter()
        .map(|e| e.revenue)
        .sum();
    let total_expenses: f64 = expense::get_station_expenses(db, station_id)
        .await?
        .iter()
        .map(|e| e.amount)
        .sum();

    Ok(FinancialSummary {
        total_revenue,
        total_expenses,
        net_profit: total_revenue - total_expenses,
    })
}

/// Computes and stores the totals for every entry of `date`.
///
/// Regenerating a date replaces the previous report for it.
pub async fn generate_daily_report(
    db: &DatabaseConnection,
    date: NaiveDate,
) -> Result<daily_report::Model> {
    let txn = db.begin().await?;
    let entries = entry_ops::get_entries_for_date(&txn, date).await?;

    let mut total_revenue = 0.0;
    let mut total_variance = 0.0;
    let mut total_litres_sold = 0.0;
    let mut alert_count = 0_i64;
    for entry in &entries {
        total_revenue += entry.revenue;
        total_variance += entry.variance.abs();
        total_litres_sold += entry.sold_litres;
        if entry.severity.raises_alert() {
            alert_count += 1;
        }
    }
    let entry_count = i64::try_from(entries.len()).unwrap_or(i64::MAX);

    DailyReport::delete_many()
        .filter(daily_report::Column::ReportDate.eq(date))
        .exec(&txn)
        .await?;
    let report = daily_report::ActiveModel {
        report_date: Set(date),
        entry_count: Set(entry_count),
        total_revenue: Set(total_revenue),
        total_variance: Set(total_variance),
        total_litres_sold: Set(total_litres_sold),
        alert_count: Set(alert_count),
        generated_at: Set(Utc::now()),
        ..Default::default()
    }
    .insert(&txn)
    .await?;
    txn.commit().await?;

    info!(%date, entry_count, alert_count, "Generated daily report");
    Ok(report)
}

/// Retrieves the stored report for a date.
pub async fn get_daily_report(
    db: &DatabaseConnection,
    date: NaiveDate,
) -> Result<Option<daily_report::Model>> {
    DailyReport::find()
        .filter(daily_report::Column::ReportDate.eq(date))
        .one(db)
        .await
        .map_err(Into::into)
}

/// Formats a signed litre amount like `"+12.50L"` or `"-3.00L"`.
#[must_use]
pub fn format_litres(amount: f64) -> String {
    if amount >= 0.0 {
        format!("+{amount:.2}L")
    } else {
        format!("-{:.2}L", amount.abs())
    }
}

/// One-line summary of an entry for Discord lists.
#[must_use]
pub fn format_entry_summary(entry: &fuel_entry::Model) -> String {
    let class = loss_class(entry.variance);
    let fraud = if entry.fraud_flag { " ⚠️ fraud suspected" } else { "" };
    format!(
        "{} #{} | {} | sold {:.2}L | variance {} | {}{fraud}",
        class.marker(),
        entry.id,
        entry.entry_date,
        entry.sold_litres,
        format_litres(entry.variance),
        entry.severity,
    )
}
