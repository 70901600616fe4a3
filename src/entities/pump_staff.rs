//! Pump staff entity - assignment of a user to a pump.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Pump assignment database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "pump_staff")]
pub struct Model {
    /// Unique identifier
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Assigned pump
    pub pump_id: i64,
    /// Discord user ID of the assigned staff member
    pub user_id: String,
}

/// Each assignment points at one pump
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each assignment belongs to one pump
    #[sea_orm(
        belongs_to = "super::pump::Entity",
        from = "Column::PumpId",
        to = "super::pump::Column::Id"
    )]
    Pump,
}

impl Related<super::pump::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Pump.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
