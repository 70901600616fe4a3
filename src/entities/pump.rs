//! Pump entity - a dispenser managed by one user and worked by assigned staff.
//!
//! Pumps belong to a company and are usually linked to a station. The assigned
//! staff list lives in the `pump_staff` table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Pump database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "pumps")]
pub struct Model {
    /// Unique identifier for the pump
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Owning company
    pub company_id: i64,
    /// Parent station, if linked
    pub station_id: Option<i64>,
    /// Pump label (e.g., "Pump 3 - Diesel")
    pub name: String,
    /// Discord user ID of the responsible manager
    pub manager_id: String,
    /// Location override; inherits from the station when unset
    pub location: Option<String>,
    /// Whether the pump is in service
    pub is_active: bool,
    /// When the pump was created
    pub created_at: DateTimeUtc,
    /// When the pump was last modified
    pub updated_at: DateTimeUtc,
}

/// Defines relationships between Pump and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each pump belongs to one company
    #[sea_orm(
        belongs_to = "super::company::Entity",
        from = "Column::CompanyId",
        to = "super::company::Column::Id"
    )]
    Company,
    /// One pump has many staff assignments
    #[sea_orm(has_many = "super::pump_staff::Entity")]
    Staff,
}

impl Related<super::company::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Company.def()
    }
}

impl Related<super::pump_staff::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Staff.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
