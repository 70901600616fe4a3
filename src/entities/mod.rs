//! Entity module - Contains all SeaORM entity definitions for the database.
//! These entities represent the database tables and their relationships.
//! Each entity has a Model struct for data and an Entity struct for operations.

pub mod alert;
pub mod audit_log;
pub mod company;
pub mod daily_report;
pub mod expense;
pub mod fuel_entry;
pub mod insight;
pub mod pump;
pub mod pump_staff;
pub mod sea_orm_active_enums;
pub mod shift;
pub mod station;
pub mod system_state;
pub mod user;

// Re-export specific types to avoid conflicts
pub use alert::{Column as AlertColumn, Entity as Alert, Model as AlertModel};
pub use audit_log::{Column as AuditLogColumn, Entity as AuditLog, Model as AuditLogModel};
pub use company::{Column as CompanyColumn, Entity as Company, Model as CompanyModel};
pub use daily_report::{
    Column as DailyReportColumn, Entity as DailyReport, Model as DailyReportModel,
};
pub use expense::{Column as ExpenseColumn, Entity as Expense, Model as ExpenseModel};
pub use fuel_entry::{Column as FuelEntryColumn, Entity as FuelEntry, Model as FuelEntryModel};
pub use insight::{Column as InsightColumn, Entity as Insight, Model as InsightModel};
pub use pump::{Column as PumpColumn, Entity as Pump, Model as PumpModel};
pub use pump_staff::{Column as PumpStaffColumn, Entity as PumpStaff, Model as PumpStaffModel};
pub use sea_orm_active_enums::{ExpenseCategory, Severity, UserRole};
pub use shift::{Column as ShiftColumn, Entity as Shift, Model as ShiftModel};
pub use station::{Column as StationColumn, Entity as Station, Model as StationModel};
pub use system_state::{
    Column as SystemStateColumn, Entity as SystemState, Model as SystemStateModel,
};
pub use user::{Column as UserColumn, Entity as User, Model as UserModel};
