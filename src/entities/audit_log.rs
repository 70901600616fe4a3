//! Audit log entity - append-only record of who changed what.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Audit log database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "audit_logs")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Discord user ID of the actor, or `"system"` for scheduled jobs
    pub actor_id: String,
    /// Dotted action name (e.g., `"fuel_entry.created"`)
    pub action: String,
    /// Kind of record the action touched (e.g., `"alert"`)
    pub resource_type: String,
    /// ID of the touched record, when there is one
    pub resource_id: Option<String>,
    /// Free-form details
    pub details: String,
    pub created_at: DateTimeUtc,
}

/// Audit rows are intentionally unlinked so they survive any deletion
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
