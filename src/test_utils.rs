//! Shared test utilities for `FuelBuddy`.
//!
//! This module provides common helper functions for setting up test databases
//! and creating test records with sensible defaults.

use crate::{
    core::{company, fuel_entry, shift, station, user, variance},
    entities::{self, UserRole},
    errors::Result,
};
use chrono::NaiveDate;
use sea_orm::DatabaseConnection;

/// Creates an in-memory `SQLite` database with all tables initialized.
/// This is the standard setup for all integration tests.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// Business date used for test entries.
#[must_use]
pub fn test_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 3, 1).unwrap_or_default()
}

/// Registers a test company owned by `owner_id`.
///
/// # Defaults
/// * company name: "Test Petroleum ({owner_id})"
/// * owner name: "Owner {owner_id}"
/// * region: None
pub async fn create_test_company(
    db: &DatabaseConnection,
    owner_id: &str,
) -> Result<(entities::company::Model, entities::user::Model)> {
    company::register_company(
        db,
        owner_id,
        &format!("Owner {owner_id}"),
        &format!("Test Petroleum ({owner_id})"),
        None,
    )
    .await
}

/// Creates a test station in the city "Lagos".
pub async fn create_test_station(
    db: &DatabaseConnection,
    company_id: i64,
    name: &str,
) -> Result<entities::station::Model> {
    station::create_station(db, "test-admin", company_id, name, "Lagos").await
}

/// Registers a test user with no email or phone.
pub async fn create_test_user(
    db: &DatabaseConnection,
    id: &str,
    company_id: i64,
    role: UserRole,
    station_id: Option<i64>,
) -> Result<entities::user::Model> {
    user::register_user(
        db,
        "test-admin",
        user::NewUser {
            id: id.to_string(),
            name: format!("User {id}"),
            email: None,
            phone: None,
            role,
            company_id,
            station_id,
        },
    )
    .await
}

/// Creates an active test shift.
pub async fn create_test_shift(
    db: &DatabaseConnection,
    station_id: i64,
    staff_id: &str,
    label: &str,
) -> Result<entities::shift::Model> {
    shift::create_shift(db, "test-admin", station_id, staff_id, label).await
}

/// A company with one station, one staff member and one active shift.
pub struct StationFixture {
    pub company: entities::company::Model,
    pub owner: entities::user::Model,
    pub station: entities::station::Model,
    pub staff: entities::user::Model,
    pub shift: entities::shift::Model,
}

/// Builds a [`StationFixture`]: owner "owner-1", station "Skyline Main",
/// staff "staff-1" and shift "morning".
pub async fn create_station_fixture(db: &DatabaseConnection) -> Result<StationFixture> {
    let (company, owner) = create_test_company(db, "owner-1").await?;
    let station = create_test_station(db, company.id, "Skyline Main").await?;
    let staff = create_test_user(db, "staff-1", company.id, UserRole::Staff, Some(station.id)).await?;
    let shift = create_test_shift(db, station.id, &staff.id, "morning").await?;
    Ok(StationFixture {
        company,
        owner,
        station,
        staff,
        shift,
    })
}

/// Submits an entry for the fixture's station and shift on [`test_date`].
pub async fn submit_test_entry(
    db: &DatabaseConnection,
    fixture: &StationFixture,
    opening_stock: f64,
    closing_stock: f64,
    sold_litres: f64,
    price_per_litre: f64,
) -> Result<fuel_entry::SubmissionOutcome> {
    fuel_entry::submit_fuel_entry(
        db,
        &fixture.staff.id,
        fuel_entry::NewFuelEntry {
            station_id: fixture.station.id,
            shift_id: fixture.shift.id,
            entry_date: test_date(),
            readings: variance::Readings {
                opening_stock,
                closing_stock,
                sold_litres,
                price_per_litre,
            },
        },
    )
    .await
}
