//! Discord command implementations organized by category.

#![allow(clippy::too_long_first_doc_paragraph)]

/// Company registration and listing
pub mod company;

/// Expenses and financials
pub mod expense;

/// Fuel entries and alerts
pub mod fuel;

/// General utility commands
pub mod general;

/// Pump management commands
pub mod pump;

/// Dashboard, reports, insights, audit and daily jobs
pub mod report;

/// Shift management commands
pub mod shift;

/// Staff management commands
pub mod staff;

/// Station management commands
pub mod station;

/// Shared command helpers
pub(crate) mod utils;

// Export commands
pub use company::*;
pub use expense::*;
pub use fuel::*;
pub use general::*;
pub use pump::*;
pub use report::*;
pub use shift::*;
pub use staff::*;
pub use station::*;
