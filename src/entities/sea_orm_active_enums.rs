//! String-backed enums shared by several entities.
//!
//! These are stored as plain text columns so the `SQLite` schema stays readable
//! from any client.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// Severity of a stock variance, ordered from least to most serious.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    EnumIter,
    DeriveActiveEnum,
    Serialize,
    Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Within normal metering tolerance
    #[sea_orm(string_value = "low")]
    Low,
    /// Worth a look, raises an alert
    #[sea_orm(string_value = "medium")]
    Medium,
    /// Raises an alert and a push notification
    #[sea_orm(string_value = "high")]
    High,
}

impl Severity {
    /// Lowercase label used in messages and storage.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }

    /// Whether an entry with this severity produces an alert.
    #[must_use]
    pub const fn raises_alert(self) -> bool {
        !matches!(self, Self::Low)
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Role of a user inside their company.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    /// Owns the company, sees every station
    #[sea_orm(string_value = "owner")]
    Owner,
    /// Runs a station
    #[sea_orm(string_value = "manager")]
    Manager,
    /// Operates pumps and submits shift readings
    #[sea_orm(string_value = "staff")]
    Staff,
}

impl UserRole {
    /// Lowercase label used in messages and storage.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Owner => "owner",
            Self::Manager => "manager",
            Self::Staff => "staff",
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UserRole {
    type Err = crate::errors::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "owner" => Ok(Self::Owner),
            "manager" => Ok(Self::Manager),
            "staff" => Ok(Self::Staff),
            other => Err(crate::errors::Error::validation(format!(
                "unknown role '{other}' (expected owner, manager or staff)"
            ))),
        }
    }
}

/// Bookkeeping category of a station expense.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[serde(rename_all = "lowercase")]
pub enum ExpenseCategory {
    /// Electricity and other utilities
    #[sea_orm(string_value = "electricity")]
    Electricity,
    /// Maintenance and repairs
    #[sea_orm(string_value = "maintenance")]
    Maintenance,
    /// Staff salaries
    #[sea_orm(string_value = "salary")]
    Salary,
    /// Anything else
    #[sea_orm(string_value = "other")]
    Other,
}

impl ExpenseCategory {
    /// Lowercase label used in messages and storage.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Electricity => "electricity",
            Self::Maintenance => "maintenance",
            Self::Salary => "salary",
            Self::Other => "other",
        }
    }
}

impl fmt::Display for ExpenseCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExpenseCategory {
    type Err = crate::errors::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "electricity" | "utilities" => Ok(Self::Electricity),
            "maintenance" | "repairs" => Ok(Self::Maintenance),
            "salary" | "salaries" => Ok(Self::Salary),
            "other" => Ok(Self::Other),
            other => Err(crate::errors::Error::validation(format!(
                "unknown expense category '{other}'"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_ordering() {
        assert!(Severity::Low < Severity::Medium);
        assert!(Severity::Medium < Severity::High);
        assert!(!Severity::Low.raises_alert());
        assert!(Severity::Medium.raises_alert());
        assert!(Severity::High.raises_alert());
    }

    #[test]
    fn test_parse_role() {
        assert_eq!("Manager".parse::<UserRole>().ok(), Some(UserRole::Manager));
        assert_eq!(" staff ".parse::<UserRole>().ok(), Some(UserRole::Staff));
        assert!("super-admin".parse::<UserRole>().is_err());
    }

    #[test]
    fn test_parse_expense_category() {
        assert_eq!(
            "utilities".parse::<ExpenseCategory>().ok(),
            Some(ExpenseCategory::Electricity)
        );
        assert_eq!(
            "SALARY".parse::<ExpenseCategory>().ok(),
            Some(ExpenseCategory::Salary)
        );
        assert!("fuel".parse::<ExpenseCategory>().is_err());
    }
}
