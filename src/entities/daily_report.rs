//! Daily report entity - persisted totals for one business date.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Daily report database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "daily_reports")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Business date the totals cover; one report per date
    #[sea_orm(unique)]
    pub report_date: Date,
    /// Number of fuel entries on the date
    pub entry_count: i64,
    /// Sum of entry revenue
    pub total_revenue: f64,
    /// Sum of absolute entry variance
    pub total_variance: f64,
    /// Sum of litres sold
    pub total_litres_sold: f64,
    /// Entries that raised an alert
    pub alert_count: i64,
    pub generated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
