//! Environment-driven configuration

use chrono::NaiveDate;
use std::env;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

use crate::models::readings::DateRange;
use crate::models::region::Region;

pub const DEFAULT_PORT: u16 = 3001;
pub const DEFAULT_DATA_DIR: &str = "data";
const DEFAULT_REAL_TODAY: (i32, u32, u32) = (2026, 2, 13);
const DEFAULT_START: (i32, u32, u32) = (2026, 1, 17);
const DEFAULT_END: (i32, u32, u32) = (2026, 2, 20);

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{key} must be a YYYY-MM-DD date, got '{value}'")]
    InvalidDate { key: String, value: String },

    #[error("{key} must be a non-negative integer, got '{value}'")]
    InvalidNumber { key: String, value: String },

    #[error("EXPLAIN_MIN_DELAY_MS ({min}) exceeds EXPLAIN_MAX_DELAY_MS ({max})")]
    InvalidDelayWindow { min: u64, max: u64 },
}

/// Get the deployment environment name (`APP_ENV`, defaults to `sandbox`)
pub fn get_environment() -> String {
    env::var("APP_ENV").unwrap_or_else(|_| "sandbox".to_string())
}

pub fn get_port() -> u16 {
    env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(DEFAULT_PORT)
}

/// Random per-chunk delay window for streamed explanations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExplainPacing {
    pub min_delay: Duration,
    pub max_delay: Duration,
}

impl ExplainPacing {
    /// No delay between chunks
    pub fn immediate() -> Self {
        Self {
            min_delay: Duration::ZERO,
            max_delay: Duration::ZERO,
        }
    }
}

impl Default for ExplainPacing {
    fn default() -> Self {
        Self {
            min_delay: Duration::from_millis(80),
            max_delay: Duration::from_millis(200),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DashboardConfig {
    pub data_dir: PathBuf,
    /// Actual readings never extend past this date
    pub real_today: NaiveDate,
    pub default_region: Region,
    pub default_range: DateRange,
    pub explain_pacing: ExplainPacing,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            real_today: ymd(DEFAULT_REAL_TODAY),
            default_region: Region::default(),
            default_range: DateRange::new(ymd(DEFAULT_START), ymd(DEFAULT_END)),
            explain_pacing: ExplainPacing::default(),
        }
    }
}

impl DashboardConfig {
    /// Read overrides from the process environment on top of the defaults
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as [`DashboardConfig::from_env`] with an explicit variable source
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(dir) = lookup("DATA_DIR") {
            config.data_dir = PathBuf::from(dir);
        }
        if let Some(raw) = lookup("REAL_TODAY") {
            config.real_today = parse_date("REAL_TODAY", &raw)?;
        }
        if let Some(raw) = lookup("DEFAULT_START_DATE") {
            config.default_range.start = parse_date("DEFAULT_START_DATE", &raw)?;
        }
        if let Some(raw) = lookup("DEFAULT_END_DATE") {
            config.default_range.end = parse_date("DEFAULT_END_DATE", &raw)?;
        }

        let min = match lookup("EXPLAIN_MIN_DELAY_MS") {
            Some(raw) => parse_millis("EXPLAIN_MIN_DELAY_MS", &raw)?,
            None => config.explain_pacing.min_delay,
        };
        let max = match lookup("EXPLAIN_MAX_DELAY_MS") {
            Some(raw) => parse_millis("EXPLAIN_MAX_DELAY_MS", &raw)?,
            None => config.explain_pacing.max_delay,
        };
        if min > max {
            return Err(ConfigError::InvalidDelayWindow {
                min: min.as_millis() as u64,
                max: max.as_millis() as u64,
            });
        }
        config.explain_pacing = ExplainPacing {
            min_delay: min,
            max_delay: max,
        };

        Ok(config)
    }
}

pub fn parse_date(key: &str, raw: &str) -> Result<NaiveDate, ConfigError> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").map_err(|_| ConfigError::InvalidDate {
        key: key.to_string(),
        value: raw.to_string(),
    })
}

fn parse_millis(key: &str, raw: &str) -> Result<Duration, ConfigError> {
    raw.trim()
        .parse::<u64>()
        .map(Duration::from_millis)
        .map_err(|_| ConfigError::InvalidNumber {
            key: key.to_string(),
            value: raw.to_string(),
        })
}

fn ymd((y, m, d): (i32, u32, u32)) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap_or_default()
}
