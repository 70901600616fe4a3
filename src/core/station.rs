//! Station business logic - creating, listing and (de)activating stations.

use crate::{
    core::audit,
    entities::{Station, station},
    errors::{Error, Result},
};
use sea_orm::{QueryOrder, Set, prelude::*};
use tracing::info;

/// Shortest accepted station name, after trimming.
pub const MIN_STATION_NAME_LEN: usize = 3;

/// Creates a new, active station for a company.
///
/// # Errors
/// Returns an error if:
/// - The name is shorter than [`MIN_STATION_NAME_LEN`] characters or the city is empty
/// - The company already has a station with the same name
/// - The database insert fails
pub async fn create_station(
    db: &DatabaseConnection,
    actor_id: &str,
    company_id: i64,
    name: &str,
    city: &str,
) -> Result<station::Model> {
    let name = name.trim();
    let city = city.trim();

    if name.chars().count() < MIN_STATION_NAME_LEN {
        return Err(Error::validation(format!(
            "Station name must be at least {MIN_STATION_NAME_LEN} characters"
        )));
    }
    if city.is_empty() {
        return Err(Error::validation("Station city cannot be empty"));
    }
    if get_station_by_name(db, company_id, name).await?.is_some() {
        return Err(Error::validation(format!("Station '{name}' already exists")));
    }

    let created = station::ActiveModel {
        company_id: Set(company_id),
        name: Set(name.to_string()),
        city: Set(city.to_string()),
        is_active: Set(true),
        created_at: Set(chrono::Utc::now()),
        ..Default::default()
    }
    .insert(db)
    .await?;

    audit::record(
        db,
        actor_id,
        "station.created",
        "station",
        Some(created.id.to_string()),
        format!("{} ({})", created.name, created.city),
    )
    .await?;

    info!("Created station '{}' for company {}", created.name, company_id);
    Ok(created)
}

/// Retrieves all stations of a company, newest first.
pub async fn get_stations_for_company(
    db: &DatabaseConnection,
    company_id: i64,
) -> Result<Vec<station::Model>> {
    Station::find()
        .filter(station::Column::CompanyId.eq(company_id))
        .order_by_desc(station::Column::CreatedAt)
        .order_by_desc(station::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Retrieves a station by ID.
pub async fn get_station_by_id(
    db: &DatabaseConnection,
    station_id: i64,
) -> Result<Option<station::Model>> {
    Station::find_by_id(station_id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Finds a company's station by name, ignoring case.
pub async fn get_station_by_name(
    db: &DatabaseConnection,
    company_id: i64,
    name: &str,
) -> Result<Option<station::Model>> {
    let wanted = name.trim().to_lowercase();
    Ok(get_stations_for_company(db, company_id)
        .await?
        .into_iter()
        .find(|s| s.name.to_lowercase() == wanted))
}

/// Activates or deactivates a station. Inactive stations reject fuel entries.
pub async fn set_station_active(
    db: &DatabaseConnection,
    actor_id: &str,
    station_id: i64,
    is_active: bool,
) -> Result<station::Model> {
    let existing = get_station_by_id(db, station_id)
        .await?
        .ok_or_else(|| Error::not_found("Station", station_id))?;

    let mut active_model: station::ActiveModel = existing.into();
    active_model.is_active = Set(is_active);
    let updated = active_model.update(db).await?;

    audit::record(
        db,
        actor_id,
        if is_active { "station.activated" } else { "station.deactivated" },
        "station",
        Some(station_id.to_string()),
        String::new(),
    )
    .await?;
    Ok(updated)
}
