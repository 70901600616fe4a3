//! User entity - a member of a company, keyed by Discord user ID.
//!
//! The role decides what the user may see and change. Deactivating a user locks
//! them out of every command without deleting their history.

use super::sea_orm_active_enums::UserRole;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// User database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
    /// Discord user ID
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    /// Display name
    pub name: String,
    /// Optional contact email
    pub email: Option<String>,
    /// Optional phone number for notifications
    pub phone: Option<String>,
    /// Role inside the company
    pub role: UserRole,
    /// Company the user belongs to
    pub company_id: i64,
    /// Home station, if assigned
    pub station_id: Option<i64>,
    /// Inactive users cannot run commands
    pub is_active: bool,
    /// When the user was registered
    pub created_at: DateTimeUtc,
}

/// Defines relationships between User and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each user belongs to one company
    #[sea_orm(
        belongs_to = "super::company::Entity",
        from = "Column::CompanyId",
        to = "super::company::Column::Id"
    )]
    Company,
}

impl Related<super::company::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Company.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
