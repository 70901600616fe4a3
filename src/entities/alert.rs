//! Alert entity - raised for every fuel entry whose severity is not low.
//!
//! Only the resolution fields (`resolved`, `auto_closed`, `closed_at`) ever change
//! after insert.

use super::sea_orm_active_enums::Severity;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Alert database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "alerts")]
pub struct Model {
    /// Unique identifier for the alert
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Station the anomaly was seen at
    pub station_id: i64,
    /// Fuel entry that triggered the alert
    #[sea_orm(unique)]
    pub entry_id: i64,
    /// Human-readable description
    pub message: String,
    /// Copy of the entry variance
    pub variance: f64,
    /// Copy of the entry severity
    pub severity: Severity,
    /// Whether the alert has been closed
    pub resolved: bool,
    /// Closed by the stale-alert sweep rather than by a user
    pub auto_closed: bool,
    /// When the alert was raised
    pub created_at: DateTimeUtc,
    /// When the alert was closed
    pub closed_at: Option<DateTimeUtc>,
}

/// Defines relationships between Alert and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each alert belongs to one station
    #[sea_orm(
        belongs_to = "super::station::Entity",
        from = "Column::StationId",
        to = "super::station::Column::Id"
    )]
    Station,
    /// Each alert belongs to one fuel entry
    #[sea_orm(
        belongs_to = "super::fuel_entry::Entity",
        from = "Column::EntryId",
        to = "super::fuel_entry::Column::Id"
    )]
    FuelEntry,
}

impl Related<super::station::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Station.def()
    }
}

impl Related<super::fuel_entry::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::FuelEntry.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
