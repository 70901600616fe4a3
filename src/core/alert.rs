//! Alert business logic - raising, listing and closing variance alerts.

use crate::{
    core::audit,
    entities::{Alert, Severity, Station, alert, fuel_entry, station},
    errors::{Error, Result},
};
use chrono::{DateTime, Duration, Utc};
use sea_orm::{QueryOrder, Set, TransactionTrait, prelude::*};
use tracing::info;

/// Alerts older than this many days are closed by the daily jobs.
pub const DEFAULT_AUTO_CLOSE_DAYS: i64 = 7;

/// Builds the human-readable alert message for an entry.
#[must_use]
pub fn alert_message(variance: f64, shift_label: &str) -> String {
    format!("Anomaly detected: Variance of {variance:.2}L in shift {shift_label}")
}

/// Only high-severity alerts are pushed to the notification channel.
#[must_use]
pub fn needs_notification(raised: &alert::Model) -> bool {
    raised.severity == Severity::High
}

/// Inserts the alert for a freshly stored entry.
///
/// Takes any connection so it can run inside the submission transaction.
pub(crate) async fn raise_for_entry<C>(
    db: &C,
    entry: &fuel_entry::Model,
    shift_label: &str,
) -> Result<alert::Model>
where
    C: ConnectionTrait,
{
    alert::ActiveModel {
        station_id: Set(entry.station_id),
        entry_id: Set(entry.id),
        message: Set(alert_message(entry.variance, shift_label)),
        variance: Set(entry.variance),
        severity: Set(entry.severity),
        resolved: Set(false),
        auto_closed: Set(false),
        created_at: Set(entry.created_at),
        closed_at: Set(None),
        ..Default::default()
    }
    .insert(db)
    .await
    .map_err(Into::into)
}

/// Retrieves an alert by ID.
pub async fn get_alert_by_id(
    db: &DatabaseConnection,
    alert_id: i64,
) -> Result<Option<alert::Model>> {
    Alert::find_by_id(alert_id).one(db).await.map_err(Into::into)
}

/// Retrieves all alerts of a station, newest first.
pub async fn get_station_alerts(
    db: &DatabaseConnection,
    station_id: i64,
) -> Result<Vec<alert::Model>> {
    Alert::find()
        .filter(alert::Column::StationId.eq(station_id))
        .order_by_desc(alert::Column::CreatedAt)
        .order_by_desc(alert::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Retrieves all alerts across a company's stations, newest first.
pub async fn get_company_alerts(
    db: &DatabaseConnection,
    company_id: i64,
) -> Result<Vec<alert::Model>> {
    Alert::find()
        .inner_join(Station)
        .filter(station::Column::CompanyId.eq(company_id))
        .order_by_desc(alert::Column::CreatedAt)
        .order_by_desc(alert::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Retrieves the unresolved alerts of a station, newest first.
pub async fn get_open_alerts(
    db: &DatabaseConnection,
    station_id: i64,
) -> Result<Vec<alert::Model>> {
    Alert::find()
        .filter(alert::Column::StationId.eq(station_id))
        .filter(alert::Column::Resolved.eq(false))
        .order_by_desc(alert::Column::CreatedAt)
        .order_by_desc(alert::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Marks an alert as resolved by a user.
///
/// # Errors
/// Returns an error if the alert does not exist or is already resolved.
pub async fn resolve_alert(
    db: &DatabaseConnection,
    actor_id: &str,
    alert_id: i64,
) -> Result<alert::Model> {
    let existing = get_alert_by_id(db, alert_id)
        .await?
        .ok_or_else(|| Error::not_found("Alert", alert_id))?;
    if existing.resolved {
        return Err(Error::AlreadyResolved { alert_id });
    }

    let txn = db.begin().await?;
    let mut active_model: alert::ActiveModel = existing.into();
    active_model.resolved = Set(true);
    active_model.closed_at = Set(Some(Utc::now()));
    let updated = active_model.update(&txn).await?;

    audit::record(
        &txn,
        actor_id,
        "alert.resolved",
        "alert",
        Some(alert_id.to_string()),
        updated.message.clone(),
    )
    .await?;
    txn.commit().await?;

    info!(alert_id, actor_id, "Alert resolved");
    Ok(updated)
}

/// Closes every unresolved alert created more than `max_age_days` before `now`.
///
/// Returns the number of alerts closed. All updates share one transaction.
///
/// # Errors
/// Returns [`Error::Config`] if `max_age_days` reaches outside the representable
/// date range.
pub async fn auto_close_old_alerts(
    db: &DatabaseConnection,
    now: DateTime<Utc>,
    max_age_days: i64,
) -> Result<u64> {
    let cutoff = Duration::try_days(max_age_days)
        .and_then(|age| now.checked_sub_signed(age))
        .ok_or_else(|| Error::Config {
            message: format!("auto-close age of {max_age_days} days is out of range"),
        })?;

    let txn = db.begin().await?;
    let stale = Alert::find()
        .filter(alert::Column::Resolved.eq(false))
        .filter(alert::Column::CreatedAt.lt(cutoff))
        .all(&txn)
        .await?;

    let mut closed = 0_u64;
    for old in stale {
        let alert_id = old.id;
        let mut active_model: alert::ActiveModel = old.into();
        active_model.resolved = Set(true);
        active_model.auto_closed = Set(true);
        active_model.closed_at = Set(Some(now));
        active_model.update(&txn).await?;

        audit::record(
            &txn,
            audit::SYSTEM_ACTOR,
            "alert.auto_closed",
            "alert",
            Some(alert_id.to_string()),
            format!("older than {max_age_days} days"),
        )
        .await?;
        closed += 1;
    }
    txn.commit().await?;

    if closed > 0 {
        info!(closed, max_age_days, "Auto-closed stale alerts");
    }
    Ok(closed)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::test_utils::*;

    #[test]
    fn test_alert_message_format() {
        assert_eq!(
            alert_message(-50.0, "night"),
            "Anomaly detected: Variance of -50.00L in shift night"
        );
        assert_eq!(
            alert_message(16.456, "A"),
            "Anomaly detected: Variance of 16.46L in shift A"
        );
    }

    #[tokio::test]
    async fn test_only_high_alerts_need_notification() -> Result<()> {
        let db = setup_test_db().await?;
        let fixture = create_station_fixture(&db).await?;

        let medium = submit_test_entry(&db, &fixture, 1000.0, 930.0, 50.0, 1.0).await?;
        let high = submit_test_entry(&db, &fixture, 1000.0, 880.0, 50.0, 1.0).await?;
        assert!(!needs_notification(&medium.alert.unwrap()));
        assert!(needs_notification(&high.alert.unwrap()));
        Ok(())
    }

    #[tokio::test]
    async fn test_resolve_alert() -> Result<()> {
        let db = setup_test_db().await?;
        let fixture = create_station_fixture(&db).await?;
        let outcome = submit_test_entry(&db, &fixture, 1000.0, 930.0, 50.0, 1.0).await?;
        let raised = outcome.alert.unwrap();

        assert_eq!(get_open_alerts(&db, fixture.station.id).await?.len(), 1);

        let resolved = resolve_alert(&db, &fixture.owner.id, raised.id).await?;
        assert!(resolved.resolved);
        assert!(!resolved.auto_closed);
        assert!(resolved.closed_at.is_some());
        assert!(get_open_alerts(&db, fixture.station.id).await?.is_empty());

        let again = resolve_alert(&db, &fixture.owner.id, raised.id).await;
        assert!(matches!(again, Err(Error::AlreadyResolved { .. })));

        let missing = resolve_alert(&db, &fixture.owner.id, 9999).await;
        assert!(matches!(missing, Err(Error::NotFound { .. })));

        let trail = audit::get_audit_logs_for_resource(&db, "alert", &raised.id.to_string()).await?;
        assert_eq!(trail.len(), 1);
        assert_eq!(trail[0].action, "alert.resolved");
        Ok(())
    }

    #[tokio::test]
    async fn test_company_alerts_span_stations() -> Result<()> {
        let db = setup_test_db().await?;
        let fixture = create_station_fixture(&db).await?;
        let second_station = create_test_station(&db, fixture.company.id, "Ring Road").await?;
        let second_shift =
            create_test_shift(&db, second_station.id, &fixture.staff.id, "evening").await?;

        submit_test_entry(&db, &fixture, 1000.0, 930.0, 50.0, 1.0).await?;
        crate::core::fuel_entry::submit_fuel_entry(
            &db,
            &fixture.staff.id,
            crate::core::fuel_entry::NewFuelEntry {
                station_id: second_station.id,
                shift_id: second_shift.id,
                entry_date: test_date(),
                readings: crate::core::variance::Readings {
                    opening_stock: 500.0,
                    closing_stock: 400.0,
                    sold_litres: 20.0,
                    price_per_litre: 1.0,
                },
            },
        )
        .await?;

        assert_eq!(get_station_alerts(&db, fixture.station.id).await?.len(), 1);
        assert_eq!(get_station_alerts(&db, second_station.id).await?.len(), 1);
        let company_alerts = get_company_alerts(&db, fixture.company.id).await?;
        assert_eq!(company_alerts.len(), 2);
        assert_eq!(company_alerts[0].station_id, second_station.id, "newest first");
        Ok(())
    }

    #[tokio::test]
    async fn test_auto_close_old_alerts() -> Result<()> {
        let db = setup_test_db().await?;
        let fixture = create_station_fixture(&db).await?;
        let old = submit_test_entry(&db, &fixture, 1000.0, 930.0, 50.0, 1.0).await?;
        let fresh = submit_test_entry(&db, &fixture, 1000.0, 930.0, 50.0, 1.0).await?;

        // Age the first alert by ten days.
        let old_alert = old.alert.unwrap();
        let mut aged: alert::ActiveModel = old_alert.clone().into();
        aged.created_at = Set(old_alert.created_at - Duration::days(10));
        aged.update(&db).await?;

        let closed = auto_close_old_alerts(&db, Utc::now(), DEFAULT_AUTO_CLOSE_DAYS).await?;
        assert_eq!(closed, 1);

        let reloaded = get_alert_by_id(&db, old_alert.id).await?.unwrap();
        assert!(reloaded.resolved);
        assert!(reloaded.auto_closed);
        let untouched = get_alert_by_id(&db, fresh.alert.unwrap().id).await?.unwrap();
        assert!(!untouched.resolved);

        // A second sweep has nothing left to do.
        assert_eq!(
            auto_close_old_alerts(&db, Utc::now(), DEFAULT_AUTO_CLOSE_DAYS).await?,
            0
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_auto_close_rejects_out_of_range_age() -> Result<()> {
        let db = setup_test_db().await?;

        let result = auto_close_old_alerts(&db, Utc::now(), 1_000_000_000).await;
        assert!(matches!(result, Err(Error::Config { .. })));
        let result = auto_close_old_alerts(&db, Utc::now(), i64::MAX).await;
        assert!(matches!(result, Err(Error::Config { .. })));
        Ok(())
    }
}
