//! Application settings loaded from `config.toml`.
//!
//! The file is optional: every section has defaults, so a fresh checkout runs
//! without one. Seed companies listed here are created on startup when missing.

use crate::errors::{Error, Result};
use serde::Deserialize;
use std::path::Path;
use tracing::{debug, info};

/// Default location of the settings file.
pub const DEFAULT_CONFIG_PATH: &str = "config.toml";

/// Upper bound for `jobs.auto_close_after_days` (ten years).
pub const MAX_AUTO_CLOSE_DAYS: i64 = 3650;

/// Upper bound for `jobs.tick_minutes` (one day).
pub const MAX_TICK_MINUTES: u64 = 24 * 60;

/// Configuration structure representing the entire config.toml file
#[derive(Debug, Default, Deserialize, Clone)]
pub struct AppSettings {
    /// Scheduled job tuning
    #[serde(default)]
    pub jobs: JobSettings,
    /// Companies to seed on first run
    #[serde(default)]
    pub companies: Vec<CompanySeed>,
}

/// Tuning for the daily jobs.
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct JobSettings {
    /// Unresolved alerts older than this many days are closed automatically
    pub auto_close_after_days: i64,
    /// Absolute variance above which a smart insight is generated
    pub insight_variance_threshold: f64,
    /// How often the background ticker checks whether the daily jobs are due
    pub tick_minutes: u64,
}

impl Default for JobSettings {
    fn default() -> Self {
        Self {
            auto_close_after_days: 7,
            insight_variance_threshold: 75.0,
            tick_minutes: 60,
        }
    }
}

/// A company to create on startup together with its owner profile.
#[derive(Debug, Deserialize, Clone)]
pub struct CompanySeed {
    /// Company display name
    pub name: String,
    /// Discord user ID of the owner
    pub owner_id: String,
    /// Display name of the owner
    pub owner_name: String,
    /// Optional operating region
    #[serde(default)]
    pub region: Option<String>,
    /// Stations to create under the company
    #[serde(default)]
    pub stations: Vec<StationSeed>,
}

/// A station to create under a seeded company.
#[derive(Debug, Deserialize, Clone)]
pub struct StationSeed {
    /// Station name
    pub name: String,
    /// City or location label
    pub city: String,
}

/// Loads settings from a TOML file.
///
/// # Errors
/// Returns an error if the file cannot be read or the TOML is invalid.
pub fn load_settings<P: AsRef<Path>>(path: P) -> Result<AppSettings> {
    let path_ref = path.as_ref();
    debug!("Attempting to load configuration from: {:?}", path_ref);
    let contents = std::fs::read_to_string(path_ref).map_err(|e| Error::Config {
        message: format!("Failed to read config file {}: {e}", path_ref.display()),
    })?;

    parse_settings(&contents)
}

/// Parses settings from TOML text.
///
/// # Errors
/// Returns an error if the TOML is invalid or a value fails validation.
pub fn parse_settings(contents: &str) -> Result<AppSettings> {
    let settings: AppSettings = toml::from_str(contents).map_err(|e| Error::Config {
        message: format!("Failed to parse config.toml: {e}"),
    })?;

    if !(1..=MAX_AUTO_CLOSE_DAYS).contains(&settings.jobs.auto_close_after_days) {
        return Err(Error::Config {
            message: format!("jobs.auto_close_after_days must be between 1 and {MAX_AUTO_CLOSE_DAYS}"),
        });
    }
    if !settings.jobs.insight_variance_threshold.is_finite()
        || settings.jobs.insight_variance_threshold < 0.0
    {
        return Err(Error::Config {
            message: "jobs.insight_variance_threshold must be a non-negative number".to_string(),
        });
    }
    if !(1..=MAX_TICK_MINUTES).contains(&settings.jobs.tick_minutes) {
        return Err(Error::Config {
            message: format!("jobs.tick_minutes must be between 1 and {MAX_TICK_MINUTES}"),
        });
    }

    Ok(settings)
}

/// Loads settings from `FUEL_BUDDY_CONFIG` (or `./config.toml`), falling back to
/// defaults when the file does not exist.
///
/// # Errors
/// Returns an error if the file exists but cannot be parsed.
pub fn load_app_settings() -> Result<AppSettings> {
    let path = std::env::var("FUEL_BUDDY_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
    if Path::new(&path).exists() {
        let settings = load_settings(&path)?;
        info!(
            "Loaded configuration from {} ({} seed companies)",
            path,
            settings.companies.len()
        );
        Ok(settings)
    } else {
        info!("No configuration file at {}, using defaults", path);
        Ok(AppSettings::default())
    }
}

/// Reads the optional alert notification channel from `ALERT_CHANNEL_ID`.
#[must_use]
pub fn get_alert_channel_id() -> Option<u64> {
    std::env::var("ALERT_CHANNEL_ID")
        .ok()
        .and_then(|raw| raw.trim().parse().ok())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;

    #[test]
    fn test_parse_full_settings() {
        let toml_str = r#"
            [jobs]
            auto_close_after_days = 3
            insight_variance_threshold = 60.0
            tick_minutes = 15

            [[companies]]
            name = "Skyline Fuels"
            owner_id = "1001"
            owner_name = "Amina"
            region = "North"

            [[companies.stations]]
            name = "Skyline Main"
            city = "Islamabad"

            [[companies.stations]]
            name = "Skyline Ring Road"
            city = "Rawalpindi"
        "#;

        let settings = parse_settings(toml_str).unwrap();
        assert_eq!(settings.jobs.auto_close_after_days, 3);
        assert_eq!(settings.jobs.insight_variance_threshold, 60.0);
        assert_eq!(settings.jobs.tick_minutes, 15);
        assert_eq!(settings.companies.len(), 1);
        assert_eq!(settings.companies[0].region.as_deref(), Some("North"));
        assert_eq!(settings.companies[0].stations.len(), 2);
        assert_eq!(settings.companies[0].stations[1].city, "Rawalpindi");
    }

    #[test]
    fn test_empty_settings_use_defaults() {
        let settings = parse_settings("").unwrap();
        assert_eq!(settings.jobs.auto_close_after_days, 7);
        assert_eq!(settings.jobs.insight_variance_threshold, 75.0);
        assert_eq!(settings.jobs.tick_minutes, 60);
        assert!(settings.companies.is_empty());
    }

    #[test]
    fn test_partial_jobs_section_keeps_other_defaults() {
        let settings = parse_settings("[jobs]\nauto_close_after_days = 14\n").unwrap();
        assert_eq!(settings.jobs.auto_close_after_days, 14);
        assert_eq!(settings.jobs.insight_variance_threshold, 75.0);
    }

    #[test]
    fn test_rejects_out_of_range_job_values() {
        assert!(matches!(
            parse_settings("[jobs]\nauto_close_after_days = 1000000000\n"),
            Err(Error::Config { .. })
        ));
        assert!(matches!(
            parse_settings("[jobs]\ntick_minutes = 18446744073709551615\n"),
            Err(Error::Config { .. })
        ));
        assert!(matches!(
            parse_settings("[jobs]\ntick_minutes = 1441\n"),
            Err(Error::Config { .. })
        ));
        let at_limits = parse_settings("[jobs]\nauto_close_after_days = 3650\ntick_minutes = 1440\n")
            .unwrap();
        assert_eq!(at_limits.jobs.auto_close_after_days, MAX_AUTO_CLOSE_DAYS);
        assert_eq!(at_limits.jobs.tick_minutes, MAX_TICK_MINUTES);
    }

    #[test]
    fn test_rejects_invalid_values() {
        assert!(matches!(
            parse_settings("[jobs]\nauto_close_after_days = 0\n"),
            Err(Error::Config { .. })
        ));
        assert!(matches!(
            parse_settings("[jobs]\ntick_minutes = 0\n"),
            Err(Error::Config { .. })
        ));
        assert!(matches!(
            parse_settings("[jobs]\ninsight_variance_threshold = -1.0\n"),
            Err(Error::Config { .. })
        ));
        assert!(matches!(
            parse_settings("not = [valid"),
            Err(Error::Config { .. })
        ));
    }

    #[test]
    fn test_load_settings_missing_file() {
        let result = load_settings("definitely/not/here.toml");
        assert!(matches!(result, Err(Error::Config { .. })));
    }
}
