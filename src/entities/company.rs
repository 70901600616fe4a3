//! Company entity - the tenant boundary.
//!
//! A company is owned by one user and owns stations and pumps. Every other record
//! is reachable from a company through its station.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Company database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "companies")]
pub struct Model {
    /// Unique identifier for the company
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Display name of the company
    pub name: String,
    /// Discord user ID of the owner
    pub owner_id: String,
    /// Optional operating region
    pub region: Option<String>,
    /// Paused companies are hidden from the overview
    pub is_active: bool,
    /// When the company was registered
    pub created_at: DateTimeUtc,
}

/// Defines relationships between Company and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One company has many stations
    #[sea_orm(has_many = "super::station::Entity")]
    Stations,
    /// One company has many pumps
    #[sea_orm(has_many = "super::pump::Entity")]
    Pumps,
    /// One company has many users
    #[sea_orm(has_many = "super::user::Entity")]
    Users,
}

impl Related<super::station::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Stations.def()
    }
}

impl Related<super::pump::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Pumps.def()
    }
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Users.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
