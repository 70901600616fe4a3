//! Expense entity - station running costs used for net profit.

use super::sea_orm_active_enums::ExpenseCategory;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Expense database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "expenses")]
pub struct Model {
    /// Unique identifier for the expense
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Station the cost was incurred at
    pub station_id: i64,
    /// Bookkeeping category
    pub category: ExpenseCategory,
    /// Amount paid, always positive
    pub amount: f64,
    /// Free-form note
    pub description: String,
    /// Business date of the expense
    pub expense_date: Date,
    /// Discord user ID of whoever logged it
    pub created_by: String,
    /// When the expense was logged
    pub created_at: DateTimeUtc,
}

/// Defines relationships between Expense and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each expense belongs to one station
    #[sea_orm(
        belongs_to = "super::station::Entity",
        from = "Column::StationId",
        to = "super::station::Column::Id"
    )]
    Station,
}

impl Related<super::station::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Station.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
