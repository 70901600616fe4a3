//! Discord interaction handlers
//!
//! This module provides handlers for Discord interactions such as autocomplete,
//! alert notifications and the background daily-jobs ticker.

/// Autocomplete handlers for station names and shift labels
pub mod autocomplete;
/// Posting high-severity alerts to the alert channel
pub mod notify;
/// Background ticker for the daily jobs
pub mod scheduler;
