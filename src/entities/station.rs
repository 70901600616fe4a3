//! Station entity - a physical fuel station belonging to a company.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Station database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "stations")]
pub struct Model {
    /// Unique identifier for the station
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Owning company
    pub company_id: i64,
    /// Human-readable station name (e.g., "Skyline Main Station")
    pub name: String,
    /// City or location label
    pub city: String,
    /// Inactive stations reject new fuel entries
    pub is_active: bool,
    /// When the station was registered
    pub created_at: DateTimeUtc,
}

/// Defines relationships between Station and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each station belongs to one company
    #[sea_orm(
        belongs_to = "super::company::Entity",
        from = "Column::CompanyId",
        to = "super::company::Column::Id"
    )]
    Company,
    /// One station has many shifts
    #[sea_orm(has_many = "super::shift::Entity")]
    Shifts,
    /// One station has many fuel entries
    #[sea_orm(has_many = "super::fuel_entry::Entity")]
    FuelEntries,
    /// One station has many alerts
    #[sea_orm(has_many = "super::alert::Entity")]
    Alerts,
    /// One station has many expenses
    #[sea_orm(has_many = "super::expense::Entity")]
    Expenses,
}

impl Related<super::company::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Company.def()
    }
}

impl Related<super::shift::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Shifts.def()
    }
}

impl Related<super::fuel_entry::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::FuelEntries.def()
    }
}

impl Related<super::alert::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Alerts.def()
    }
}

impl Related<super::expense::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Expenses.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
