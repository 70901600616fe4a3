//! Fuel entry business logic - the variance-detection and alerting pipeline.
//!
//! Submitting an entry validates the readings, classifies the variance, and writes the
//! entry, its alert (for medium and high severity) and the audit events in one database
//! transaction. Entries are immutable afterwards.

use crate::{
    core::{alert, audit, variance},
    entities::{FuelEntry, Shift, Station, alert as alert_entity, fuel_entry, shift, station},
    errors::{Error, Result},
};
use chrono::NaiveDate;
use sea_orm::{QueryOrder, Set, TransactionTrait, prelude::*};
use tracing::{info, instrument, warn};

/// Readings submitted by staff for one shift.
#[derive(Debug, Clone)]
pub struct NewFuelEntry {
    /// Station the readings were taken at
    pub station_id: i64,
    /// Shift the readings belong to
    pub shift_id: i64,
    /// Business date of the readings
    pub entry_date: NaiveDate,
    /// Stock readings
    pub readings: variance::Readings,
}

/// Everything written by one submission.
#[derive(Debug, Clone)]
pub struct SubmissionOutcome {
    /// The stored entry
    pub entry: fuel_entry::Model,
    /// The alert raised for the entry, if its severity is not low
    pub alert: Option<alert_entity::Model>,
}

fn validate_readings(readings: &variance::Readings) -> Result<()> {
    for value in [
        readings.opening_stock,
        readings.closing_stock,
        readings.sold_litres,
        readings.price_per_litre,
    ] {
        if !value.is_finite() || value < 0.0 {
            return Err(Error::InvalidAmount { amount: value });
        }
    }
    Ok(())
}

async fn load_submission_targets(
    db: &DatabaseConnection,
    station_id: i64,
    shift_id: i64,
) -> Result<(station::Model, shift::Model)> {
    let target_station = Station::find_by_id(station_id)
        .one(db)
        .await?
        .ok_or_else(|| Error::not_found("Station", station_id))?;
    if !target_station.is_active {
        return Err(Error::validation(format!(
            "Station '{}' is inactive and cannot accept entries",
            target_station.name
        )));
    }

    let target_shift = Shift::find_by_id(shift_id)
        .one(db)
        .await?
        .ok_or_else(|| Error::not_found("Shift", shift_id))?;
    if target_shift.station_id != station_id {
        return Err(Error::validation(format!(
            "Shift '{}' does not belong to station '{}'",
            target_shift.label, target_station.name
        )));
    }

    Ok((target_station, target_shift))
}

/// Submits one shift's readings.
///
/// # Arguments
/// * `actor_id` - Discord user ID of the submitter
/// * `new_entry` - The readings and where they belong
///
/// # Errors
/// Returns an error if:
/// - A reading is negative or not finite
/// - The station does not exist or is inactive
/// - The shift does not exist or belongs to another station
/// - Any database write fails (nothing is written in that case)
#[instrument(skip(db, new_entry), fields(station_id = new_entry.station_id, shift_id = new_entry.shift_id))]
pub async fn submit_fuel_entry(
    db: &DatabaseConnection,
    actor_id: &str,
    new_entry: NewFuelEntry,
) -> Result<SubmissionOutcome> {
    validate_readings(&new_entry.readings)?;
    let (_, target_shift) =
        load_submission_targets(db, new_entry.station_id, new_entry.shift_id).await?;

    let report = variance::analyze(&new_entry.readings);
    let readings = new_entry.readings;

    let txn = db.begin().await?;

    let entry = fuel_entry::ActiveModel {
        station_id: Set(new_entry.station_id),
        shift_id: Set(new_entry.shift_id),
        entry_date: Set(new_entry.entry_date),
        opening_stock: Set(readings.opening_stock),
        closing_stock: Set(readings.closing_stock),
        sold_litres: Set(readings.sold_litres),
        price_per_litre: Set(readings.price_per_litre),
        expected_closing_stock: Set(report.expected_closing_stock),
        variance: Set(report.variance),
        revenue: Set(report.revenue),
        severity: Set(report.severity),
        fraud_flag: Set(report.fraud_flag),
        created_by: Set(actor_id.to_string()),
        created_at: Set(chrono::Utc::now()),
        ..Default::default()
    }
    .insert(&txn)
    .await?;

    audit::record(
        &txn,
        actor_id,
        "fuel_entry.created",
        "fuel_entry",
        Some(entry.id.to_string()),
        format!(
            "variance {:.2}L, severity {}",
            entry.variance, entry.severity
        ),
    )
    .await?;

    let raised = if entry.severity.raises_alert() {
        Some(alert::raise_for_entry(&txn, &entry, &target_shift.label).await?)
    } else {
        None
    };

    if entry.fraud_flag {
        audit::record(
            &txn,
            actor_id,
            "fuel_entry.fraud_suspected",
            "fuel_entry",
            Some(entry.id.to_string()),
            format!(
                "|variance| {:.2}L exceeds {:.0}L",
                entry.variance.abs(),
                variance::FRAUD_VARIANCE_THRESHOLD
            ),
        )
        .await?;
    }

    txn.commit().await?;

    if entry.fraud_flag {
        warn!(
            entry_id = entry.id,
            variance = entry.variance,
            "Suspected fraud on fuel entry"
        );
    }
    info!(
        entry_id = entry.id,
        severity = %entry.severity,
        "Fuel entry recorded"
    );

    Ok(SubmissionOutcome {
        entry,
        alert: raised,
    })
}

/// Retrieves a fuel entry by ID.
pub async fn get_fuel_entry_by_id(
    db: &DatabaseConnection,
    entry_id: i64,
) -> Result<Option<fuel_entry::Model>> {
    FuelEntry::find_by_id(entry_id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Retrieves all entries of a station, newest first.
pub async fn get_station_entries(
    db: &DatabaseConnection,
    station_id: i64,
) -> Result<Vec<fuel_entry::Model>> {
    FuelEntry::find()
        .filter(fuel_entry::Column::StationId.eq(station_id))
        .order_by_desc(fuel_entry::Column::CreatedAt)
        .order_by_desc(fuel_entry::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Retrieves all entries across a company's stations, newest first (owner view).
pub async fn get_company_entries(
    db: &DatabaseConnection,
    company_id: i64,
) -> Result<Vec<fuel_entry::Model>> {
    FuelEntry::find()
        .inner_join(Station)
        .filter(station::Column::CompanyId.eq(company_id))
        .order_by_desc(fuel_entry::Column::CreatedAt)
        .order_by_desc(fuel_entry::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Retrieves every entry for one business date, across all companies.
pub async fn get_entries_for_date<C>(db: &C, date: NaiveDate) -> Result<Vec<fuel_entry::Model>>
where
    C: ConnectionTrait,
{
    FuelEntry::find()
        .filter(fuel_entry::Column::EntryDate.eq(date))
        .order_by_asc(fuel_entry::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;
    use crate::entities::{Alert, AuditLog, Severity, UserRole};
    use crate::test_utils::*;

    #[tokio::test]
    async fn test_low_variance_entry_raises_no_alert() -> Result<()> {
        let db = setup_test_db().await?;
        let fixture = create_station_fixture(&db).await?;

        let outcome = submit_test_entry(&db, &fixture, 1000.0, 940.0, 50.0, 2.5).await?;
        assert_eq!(outcome.entry.expected_closing_stock, 950.0);
        assert_eq!(outcome.entry.variance, -10.0);
        assert_eq!(outcome.entry.revenue, 125.0);
        assert_eq!(outcome.entry.severity, Severity::Low);
        assert!(!outcome.entry.fraud_flag);
        assert!(outcome.alert.is_none());

        assert_eq!(Alert::find().count(&db).await?, 0);
        let trail =
            audit::get_audit_logs_for_resource(&db, "fuel_entry", &outcome.entry.id.to_string())
                .await?;
        assert_eq!(trail.len(), 1);
        assert_eq!(trail[0].action, "fuel_entry.created");
        Ok(())
    }

    #[tokio::test]
    async fn test_medium_and_high_entries_raise_alerts() -> Result<()> {
        let db = setup_test_db().await?;
        let fixture = create_station_fixture(&db).await?;

        let medium = submit_test_entry(&db, &fixture, 1000.0, 930.0, 50.0, 1.0).await?;
        assert_eq!(medium.entry.severity, Severity::Medium);
        let medium_alert = medium.alert.unwrap();
        assert_eq!(medium_alert.entry_id, medium.entry.id);
        assert_eq!(medium_alert.severity, Severity::Medium);
        assert!(!medium_alert.resolved);
        assert_eq!(
            medium_alert.message,
            "Anomaly detected: Variance of -20.00L in shift morning"
        );

        let high = submit_test_entry(&db, &fixture, 1000.0, 900.0, 50.0, 1.0).await?;
        assert_eq!(high.entry.variance, -50.0);
        assert_eq!(high.entry.severity, Severity::High);
        assert!(!high.entry.fraud_flag);
        assert_eq!(high.alert.unwrap().variance, -50.0);

        assert_eq!(Alert::find().count(&db).await?, 2);
        Ok(())
    }

    #[tokio::test]
    async fn test_fraud_flag_is_audited() -> Result<()> {
        let db = setup_test_db().await?;
        let fixture = create_station_fixture(&db).await?;

        let outcome = submit_test_entry(&db, &fixture, 1000.0, 830.0, 50.0, 1.0).await?;
        assert_eq!(outcome.entry.variance, -120.0);
        assert!(outcome.entry.fraud_flag);
        assert_eq!(outcome.entry.severity, Severity::High);

        let trail =
            audit::get_audit_logs_for_resource(&db, "fuel_entry", &outcome.entry.id.to_string())
                .await?;
        let actions: Vec<&str> = trail.iter().map(|row| row.action.as_str()).collect();
        assert_eq!(actions, vec!["fuel_entry.created", "fuel_entry.fraud_suspected"]);
        Ok(())
    }

    #[tokio::test]
    async fn test_invalid_readings_write_nothing() -> Result<()> {
        let db = setup_test_db().await?;
        let fixture = create_station_fixture(&db).await?;
        let audit_rows_before = AuditLog::find().count(&db).await?;

        let negative = submit_test_entry(&db, &fixture, -1.0, 940.0, 50.0, 2.5).await;
        assert!(matches!(negative, Err(Error::InvalidAmount { .. })));

        let nan = submit_test_entry(&db, &fixture, 1000.0, f64::NAN, 50.0, 2.5).await;
        assert!(matches!(nan, Err(Error::InvalidAmount { .. })));

        assert_eq!(FuelEntry::find().count(&db).await?, 0);
        assert_eq!(AuditLog::find().count(&db).await?, audit_rows_before);
        Ok(())
    }

    #[tokio::test]
    async fn test_shift_must_match_station() -> Result<()> {
        let db = setup_test_db().await?;
        let fixture = create_station_fixture(&db).await?;
        let other_station = create_test_station(&db, fixture.company.id, "Ring Road").await?;

        let result = submit_fuel_entry(
            &db,
            &fixture.staff.id,
            NewFuelEntry {
                station_id: other_station.id,
                shift_id: fixture.shift.id,
                entry_date: test_date(),
                readings: variance::Readings::default(),
            },
        )
        .await;
        assert!(matches!(result, Err(Error::Validation { .. })));

        let missing = submit_fuel_entry(
            &db,
            &fixture.staff.id,
            NewFuelEntry {
                station_id: fixture.station.id,
                shift_id: 9999,
                entry_date: test_date(),
                readings: variance::Readings::default(),
            },
        )
        .await;
        assert!(matches!(missing, Err(Error::NotFound { .. })));
        Ok(())
    }

    #[tokio::test]
    async fn test_inactive_station_rejects_entries() -> Result<()> {
        let db = setup_test_db().await?;
        let fixture = create_station_fixture(&db).await?;
        crate::core::station::set_station_active(&db, &fixture.owner.id, fixture.station.id, false)
            .await?;

        let result = submit_test_entry(&db, &fixture, 1000.0, 940.0, 50.0, 2.5).await;
        assert!(matches!(result, Err(Error::Validation { .. })));
        Ok(())
    }

    #[tokio::test]
    async fn test_entry_queries() -> Result<()> {
        let db = setup_test_db().await?;
        let fixture = create_station_fixture(&db).await?;
        let (other_company, _) = create_test_company(&db, "owner-2").await?;
        let other_station = create_test_station(&db, other_company.id, "Elsewhere").await?;
        let other_staff =
            create_test_user(&db, "staff-2", other_company.id, UserRole::Staff, Some(other_station.id))
                .await?;
        let other_shift = create_test_shift(&db, other_station.id, &other_staff.id, "day").await?;

        let first = submit_test_entry(&db, &fixture, 1000.0, 940.0, 50.0, 2.5).await?;
        let second = submit_test_entry(&db, &fixture, 940.0, 880.0, 60.0, 2.5).await?;
        submit_fuel_entry(
            &db,
            &other_staff.id,
            NewFuelEntry {
                station_id: other_station.id,
                shift_id: other_shift.id,
                entry_date: test_date(),
                readings: variance::Readings {
                    opening_stock: 10.0,
                    closing_stock: 10.0,
                    sold_litres: 0.0,
                    price_per_litre: 1.0,
                },
            },
        )
        .await?;

        let station_entries = get_station_entries(&db, fixture.station.id).await?;
        assert_eq!(station_entries.len(), 2);
        assert_eq!(station_entries[0].id, second.entry.id, "newest first");
        assert_eq!(station_entries[1].id, first.entry.id);

        let company_entries = get_company_entries(&db, fixture.company.id).await?;
        assert_eq!(company_entries.len(), 2);

        let dated = get_entries_for_date(&db, test_date()).await?;
        assert_eq!(dated.len(), 3);

        let fetched = get_fuel_entry_by_id(&db, first.entry.id).await?;
        assert_eq!(fetched.map(|e| e.variance), Some(-10.0));
        Ok(())
    }
}
