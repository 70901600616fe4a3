//! Database configuration module for `FuelBuddy`.
//!
//! This module handles `SQLite` database connection and table creation using `SeaORM`.
//! Tables are generated from the entity definitions with `Schema::create_table_from_entity`,
//! so the schema always matches the Rust structs without hand-written SQL.

use crate::entities::{
    Alert, AuditLog, Company, DailyReport, Expense, FuelEntry, Insight, Pump, PumpStaff, Shift,
    Station, SystemState, User,
};
use crate::errors::Result;
use sea_orm::{
    ConnectionTrait, Database, DatabaseConnection, EntityTrait, Schema, sea_query::TableCreateStatement,
};
use std::path::Path;
use tracing::{debug, info, instrument};

/// Default location of the database file, created on first run.
pub const DEFAULT_DATABASE_URL: &str = "sqlite://data/fuel_buddy.sqlite?mode=rwc";

/// Gets the database URL from the `DATABASE_URL` environment variable or returns
/// the default `SQLite` path.
#[must_use]
pub fn get_database_url() -> String {
    std::env::var("DATABASE_URL").unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string())
}

/// Establishes a connection to the `SQLite` database named by `DATABASE_URL`.
///
/// Falls back to a default local `SQLite` file if no environment variable is set.
#[instrument]
pub async fn create_connection() -> Result<DatabaseConnection> {
    let database_url = get_database_url();
    if let Some(parent) = sqlite_file_parent(&database_url) {
        std::fs::create_dir_all(parent)?;
    }
    debug!("Connecting to database at {}", database_url);
    Database::connect(&database_url).await.map_err(Into::into)
}

/// Directory holding the `SQLite` file named by `url`, if it is a file URL with one.
fn sqlite_file_parent(url: &str) -> Option<&Path> {
    let path = url.strip_prefix("sqlite://")?;
    let path = path.split('?').next()?;
    Path::new(path)
        .parent()
        .filter(|parent| !parent.as_os_str().is_empty())
}

fn create_statement<E: EntityTrait>(schema: &Schema, entity: E) -> TableCreateStatement {
    let mut statement = schema.create_table_from_entity(entity);
    statement.if_not_exists();
    statement
}

/// Creates all tables that do not exist yet.
///
/// Parent tables are created before the tables that reference them.
pub async fn create_tables(db: &DatabaseConnection) -> Result<()> {
    let builder = db.get_database_backend();
    let schema = Schema::new(builder);

    let statements = [
        create_statement(&schema, Company),
        create_statement(&schema, Station),
        create_statement(&schema, User),
        create_statement(&schema, Pump),
        create_statement(&schema, PumpStaff),
        create_statement(&schema, Shift),
        create_statement(&schema, FuelEntry),
        create_statement(&schema, Alert),
        create_statement(&schema, Expense),
        create_statement(&schema, AuditLog),
        create_statement(&schema, Insight),
        create_statement(&schema, DailyReport),
        create_statement(&schema, SystemState),
    ];

    for statement in &statements {
        db.execute(builder.build(statement)).await?;
    }

    info!("Database tables ensured ({} tables).", statements.len());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{
        alert::Model as AlertModel, company::Model as CompanyModel,
        fuel_entry::Model as FuelEntryModel, system_state::Model as SystemStateModel,
    };
    use sea_orm::QuerySelect;

    #[tokio::test]
    async fn test_create_tables() -> Result<()> {
        let db = Database::connect("sqlite::memory:").await?;
        create_tables(&db).await?;

        // Test that tables exist by querying them
        let _: Vec<CompanyModel> = Company::find().limit(1).all(&db).await?;
        let _: Vec<FuelEntryModel> = FuelEntry::find().limit(1).all(&db).await?;
        let _: Vec<AlertModel> = Alert::find().limit(1).all(&db).await?;
        let _: Vec<SystemStateModel> = SystemState::find().limit(1).all(&db).await?;

        Ok(())
    }

    #[tokio::test]
    async fn test_create_tables_is_idempotent() -> Result<()> {
        let db = Database::connect("sqlite::memory:").await?;
        create_tables(&db).await?;
        create_tables(&db).await?;
        Ok(())
    }

    #[test]
    fn test_default_database_url_is_sqlite() {
        assert!(DEFAULT_DATABASE_URL.starts_with("sqlite://"));
    }

    #[test]
    fn test_sqlite_file_parent() {
        assert_eq!(
            sqlite_file_parent(DEFAULT_DATABASE_URL),
            Some(Path::new("data"))
        );
        assert_eq!(sqlite_file_parent("sqlite://fuel.sqlite?mode=rwc"), None);
        assert_eq!(sqlite_file_parent("sqlite::memory:"), None);
    }
}
