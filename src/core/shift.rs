//! Shift business logic - work windows that fuel entries are submitted against.
//!
//! Toggling a shift stamps `started_at` / `ended_at`, and meter readings derive the
//! litres dispensed for the window.

use crate::{
    core::audit,
    entities::{Shift, shift},
    errors::{Error, Result},
};
use sea_orm::{QueryOrder, Set, prelude::*};
use tracing::info;

/// Creates a new, active shift at a station.
///
/// # Errors
/// Returns an error if the label or staff ID is empty, or the station already has a
/// shift with the same label.
pub async fn create_shift(
    db: &DatabaseConnection,
    actor_id: &str,
    station_id: i64,
    staff_id: &str,
    label: &str,
) -> Result<shift::Model> {
    let label = label.trim();
    if label.is_empty() {
        return Err(Error::validation("Shift label cannot be empty"));
    }
    if staff_id.trim().is_empty() {
        return Err(Error::validation("A staff member is required for a shift"));
    }
    if get_shift_by_label(db, station_id, label).await?.is_some() {
        return Err(Error::validation(format!(
            "Shift '{label}' already exists at this station"
        )));
    }

    let now = chrono::Utc::now();
    let created = shift::ActiveModel {
        station_id: Set(station_id),
        staff_id: Set(staff_id.trim().to_string()),
        label: Set(label.to_string()),
        opening_meter: Set(0.0),
        closing_meter: Set(0.0),
        total_dispensed: Set(0.0),
        started_at: Set(Some(now)),
        ended_at: Set(None),
        is_active: Set(true),
        created_at: Set(now),
        ..Default::default()
    }
    .insert(db)
    .await?;

    audit::record(
        db,
        actor_id,
        "shift.created",
        "shift",
        Some(created.id.to_string()),
        format!("{} for {}", created.label, created.staff_id),
    )
    .await?;

    info!("Created shift '{}' at station {}", created.label, station_id);
    Ok(created)
}

/// Retrieves all shifts of a station, newest first.
pub async fn get_station_shifts(
    db: &DatabaseConnection,
    station_id: i64,
) -> Result<Vec<shift::Model>> {
    Shift::find()
        .filter(shift::Column::StationId.eq(station_id))
        .order_by_desc(shift::Column::CreatedAt)
        .order_by_desc(shift::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Retrieves the active shifts of a station, newest first.
pub async fn get_active_shifts(
    db: &DatabaseConnection,
    station_id: i64,
) -> Result<Vec<shift::Model>> {
    Shift::find()
        .filter(shift::Column::StationId.eq(station_id))
        .filter(shift::Column::IsActive.eq(true))
        .order_by_desc(shift::Column::CreatedAt)
        .order_by_desc(shift::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Retrieves a shift by ID.
pub async fn get_shift_by_id(
    db: &DatabaseConnection,
    shift_id: i64,
) -> Result<Option<shift::Model>> {
    Shift::find_by_id(shift_id).one(db).await.map_err(Into::into)
}

/// Finds a station's shift by label, ignoring case.
pub async fn get_shift_by_label(
    db: &DatabaseConnection,
    station_id: i64,
    label: &str,
) -> Result<Option<shift::Model>> {
    let wanted = label.trim().to_lowercase();
    Ok(get_station_shifts(db, station_id)
        .await?
        .into_iter()
        .find(|s| s.label.to_lowercase() == wanted))
}

/// Activates or deactivates a shift, stamping the start or end time.
pub async fn set_shift_active(
    db: &DatabaseConnection,
    actor_id: &str,
    shift_id: i64,
    is_active: bool,
) -> Result<shift::Model> {
    let existing = get_shift_by_id(db, shift_id)
        .await?
        .ok_or_else(|| Error::not_found("Shift", shift_id))?;

    let now = chrono::Utc::now();
    let mut active_model: shift::ActiveModel = existing.into();
    active_model.is_active = Set(is_active);
    if is_active {
        active_model.started_at = Set(Some(now));
        active_model.ended_at = Set(None);
    } else {
        active_model.ended_at = Set(Some(now));
    }
    let updated = active_model.update(db).await?;

    audit::record(
        db,
        actor_id,
        if is_active { "shift.activated" } else { "shift.deactivated" },
        "shift",
        Some(shift_id.to_string()),
        String::new(),
    )
    .await?;
    Ok(updated)
}

/// Records pump meter readings for a shift and derives the litres dispensed.
///
/// # Errors
/// Returns an error if a reading is negative or not finite, or the closing reading is
/// below the opening reading.
pub async fn record_meter_readings(
    db: &DatabaseConnection,
    actor_id: &str,
    shift_id: i64,
    opening_meter: f64,
    closing_meter: f64,
) -> Result<shift::Model> {
    for reading in [opening_meter, closing_meter] {
        if !reading.is_finite() || reading < 0.0 {
            return Err(Error::InvalidAmount { amount: reading });
        }
    }
    if closing_meter < opening_meter {
        return Err(Error::validation(format!(
            "Closing meter {closing_meter:.2} is below opening meter {opening_meter:.2}"
        )));
    }

    let existing = get_shift_by_id(db, shift_id)
        .await?
        .ok_or_else(|| Error::not_found("Shift", shift_id))?;

    let mut active_model: shift::ActiveModel = existing.into();
    active_model.opening_meter = Set(opening_meter);
    active_model.closing_meter = Set(closing_meter);
    active_model.total_dispensed = Set(closing_meter - opening_meter);
    let updated = active_model.update(db).await?;

    audit::record(
        db,
        actor_id,
        "shift.meters_recorded",
        "shift",
        Some(shift_id.to_string()),
        format!("{opening_meter:.2} -> {closing_meter:.2}"),
    )
    .await?;
    Ok(updated)
}
