//! Shift entity - a bounded work window at a station.
//!
//! Fuel entries are always submitted against a shift. Only active shifts accept
//! submissions from the bot.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Shift database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "shifts")]
pub struct Model {
    /// Unique identifier for the shift
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Station the shift runs at
    pub station_id: i64,
    /// Discord user ID of the staff member on duty
    pub staff_id: String,
    /// Short label staff use to pick the shift (e.g., "morning-a")
    pub label: String,
    /// Pump meter reading at the start of the shift
    pub opening_meter: f64,
    /// Pump meter reading at the end of the shift
    pub closing_meter: f64,
    /// Litres dispensed according to the meters
    pub total_dispensed: f64,
    /// When the shift was last activated
    pub started_at: Option<DateTimeUtc>,
    /// When the shift was last deactivated
    pub ended_at: Option<DateTimeUtc>,
    /// Whether the shift is currently operational
    pub is_active: bool,
    /// When the shift was created
    pub created_at: DateTimeUtc,
}

/// Defines relationships between Shift and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each shift belongs to one station
    #[sea_orm(
        belongs_to = "super::station::Entity",
        from = "Column::StationId",
        to = "super::station::Column::Id"
    )]
    Station,
    /// One shift has many fuel entries
    #[sea_orm(has_many = "super::fuel_entry::Entity")]
    FuelEntries,
}

impl Related<super::station::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Station.def()
    }
}

impl Related<super::fuel_entry::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::FuelEntries.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
