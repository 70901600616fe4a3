//! System state entity - key/value markers for the scheduled jobs
//! (e.g., the last date the daily jobs ran).

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// System state database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "system_state")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    /// Marker name (e.g., `"last_daily_jobs"`)
    #[sea_orm(unique)]
    pub key: String,
    /// Marker value stored as text
    pub value: String,
    /// When the marker last changed
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
