//! Fuel entry entity - one shift's stock readings with the derived variance.
//!
//! Entries are written once by `core::fuel_entry::submit_fuel_entry` and never
//! updated. `expected_closing_stock`, `variance`, `revenue`, `severity` and
//! `fraud_flag` are stored so reports never have to recompute them.

use super::sea_orm_active_enums::Severity;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Fuel entry database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "fuel_entries")]
pub struct Model {
    /// Unique identifier for the entry
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Station the readings were taken at
    pub station_id: i64,
    /// Shift the readings belong to
    pub shift_id: i64,
    /// Business date of the readings
    pub entry_date: Date,
    /// Tank stock at the start of the shift, in litres
    pub opening_stock: f64,
    /// Tank stock at the end of the shift, in litres
    pub closing_stock: f64,
    /// Litres sold during the shift
    pub sold_litres: f64,
    /// Selling price per litre
    pub price_per_litre: f64,
    /// `opening_stock - sold_litres`
    pub expected_closing_stock: f64,
    /// `closing_stock - expected_closing_stock`
    pub variance: f64,
    /// `sold_litres * price_per_litre`
    pub revenue: f64,
    /// Classification of `|variance|`
    pub severity: Severity,
    /// Set when `|variance|` exceeds the fraud threshold
    pub fraud_flag: bool,
    /// Discord user ID of the submitter
    pub created_by: String,
    /// When the entry was submitted
    pub created_at: DateTimeUtc,
}

/// Defines relationships between `FuelEntry` and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each entry belongs to one station
    #[sea_orm(
        belongs_to = "super::station::Entity",
        from = "Column::StationId",
        to = "super::station::Column::Id"
    )]
    Station,
    /// Each entry belongs to one shift
    #[sea_orm(
        belongs_to = "super::shift::Entity",
        from = "Column::ShiftId",
        to = "super::shift::Column::Id"
    )]
    Shift,
    /// An entry has at most one alert
    #[sea_orm(has_one = "super::alert::Entity")]
    Alert,
}

impl Related<super::station::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Station.def()
    }
}

impl Related<super::shift::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Shift.def()
    }
}

impl Related<super::alert::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Alert.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
