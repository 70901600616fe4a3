//! Core business logic - framework-agnostic operations over the database.
//!
//! Every function here takes a `sea_orm` connection and returns [`crate::errors::Result`],
//! so the same logic backs the Discord commands, the daily jobs and the tests.

/// Role and station-scope checks
pub mod access;
/// Variance alerts
pub mod alert;
/// Append-only audit trail
pub mod audit;
/// Tenant registration and seeding
pub mod company;
/// Station running costs
pub mod expense;
/// Fuel entry submission pipeline
pub mod fuel_entry;
/// Smart insights
pub mod insight;
/// Daily maintenance jobs
pub mod jobs;
/// Pumps and staff assignments
pub mod pump;
/// Dashboard, reports and financials
pub mod report;
/// Shifts and meter readings
pub mod shift;
/// Stations
pub mod station;
/// Key/value markers
pub mod system_state;
/// User profiles and roles
pub mod user;
/// Stock variance classification
pub mod variance;
