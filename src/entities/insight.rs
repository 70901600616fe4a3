//! Insight entity - date-scoped observations produced by the daily jobs.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Insight database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "insights")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Company the insight is shown to
    pub company_id: i64,
    /// Station the insight is about
    pub station_id: i64,
    /// Machine-readable kind (e.g., `"HIGH_VARIANCE_ALERT"`)
    pub insight_type: String,
    pub message: String,
    /// `"high"`, `"medium"` or `"low"`
    pub priority: String,
    /// Business date the insight covers
    pub insight_date: Date,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
