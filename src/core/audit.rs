//! Audit trail - append-only log of state changes.
//!
//! `record` accepts any connection, so callers write the audit row inside the same
//! database transaction as the change it describes.

use crate::{
    entities::{AuditLog, audit_log},
    errors::Result,
};
use sea_orm::{QueryOrder, QuerySelect, Set, prelude::*};
use tracing::debug;

/// Actor recorded for changes made by the scheduled jobs.
pub const SYSTEM_ACTOR: &str = "system";

/// Appends one audit row.
///
/// # Arguments
/// * `actor_id` - Discord user ID, or [`SYSTEM_ACTOR`]
/// * `action` - Dotted action name (e.g., `"alert.resolved"`)
/// * `resource_type` - Kind of record touched
/// * `resource_id` - ID of the record touched, if any
/// * `details` - Free-form details
pub async fn record<C>(
    db: &C,
    actor_id: &str,
    action: &str,
    resource_type: &str,
    resource_id: Option<String>,
    details: String,
) -> Result<audit_log::Model>
where
    C: ConnectionTrait,
{
    debug!(actor_id, action, resource_type, ?resource_id, "recording audit event");
    let row = audit_log::ActiveModel {
        actor_id: Set(actor_id.to_string()),
        action: Set(action.to_string()),
        resource_type: Set(resource_type.to_string()),
        resource_id: Set(resource_id),
        details: Set(details),
        created_at: Set(chrono::Utc::now()),
        ..Default::default()
    };
    row.insert(db).await.map_err(Into::into)
}

/// Retrieves the most recent audit rows, newest first.
pub async fn get_recent_audit_logs(
    db: &DatabaseConnection,
    limit: u64,
) -> Result<Vec<audit_log::Model>> {
    AuditLog::find()
        .order_by_desc(audit_log::Column::Id)
        .limit(limit)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Retrieves every audit row for one record, oldest first.
pub async fn get_audit_logs_for_resource(
    db: &DatabaseConnection,
    resource_type: &str,
    resource_id: &str,
) -> Result<Vec<audit_log::Model>> {
    AuditLog::find()
        .filter(audit_log::Column::ResourceType.eq(resource_type))
        .filter(audit_log::Column::ResourceId.eq(resource_id))
        .order_by_asc(audit_log::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Formats an audit row as a single display line.
#[must_use]
pub fn format_audit_line(row: &audit_log::Model) -> String {
    let target = row.resource_id.as_ref().map_or_else(
        || row.resource_type.clone(),
        |id| format!("{} #{id}", row.resource_type),
    );
    format!(
        "{} | {} | {} | {}{}",
        row.created_at.format("%Y-%m-%d %H:%M"),
        row.actor_id,
        row.action,
        target,
        if row.details.is_empty() {
            String::new()
        } else {
            format!(" ({})", row.details)
        }
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::setup_test_db;
    use sea_orm::TransactionTrait;

    #[tokio::test]
    async fn test_record_and_fetch_recent() -> Result<()> {
        let db = setup_test_db().await?;

        record(&db, "u1", "station.created", "station", Some("1".into()), String::new()).await?;
        record(&db, "u2", "alert.resolved", "alert", Some("7".into()), "manual".into()).await?;

        let recent = get_recent_audit_logs(&db, 10).await?;
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0].action, "alert.resolved");
        assert_eq!(recent[1].action, "station.created");

        let limited = get_recent_audit_logs(&db, 1).await?;
        assert_eq!(limited.len(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_record_inside_transaction() -> Result<()> {
        let db = setup_test_db().await?;

        let txn = db.begin().await?;
        record(&txn, SYSTEM_ACTOR, "alert.auto_closed", "alert", Some("3".into()), String::new())
            .await?;
        txn.rollback().await?;
        assert!(get_recent_audit_logs(&db, 10).await?.is_empty());

        let txn = db.begin().await?;
        record(&txn, SYSTEM_ACTOR, "alert.auto_closed", "alert", Some("3".into()), String::new())
            .await?;
        txn.commit().await?;

        let rows = get_audit_logs_for_resource(&db, "alert", "3").await?;
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].actor_id, SYSTEM_ACTOR);
        Ok(())
    }

    #[tokio::test]
    async fn test_format_audit_line() -> Result<()> {
        let db = setup_test_db().await?;
        let row = record(&db, "u1", "pump.deleted", "pump", Some("4".into()), "Pump 4".into())
            .await?;
        let line = format_audit_line(&row);
        assert!(line.contains("u1 | pump.deleted | pump #4 (Pump 4)"));
        Ok(())
    }
}
