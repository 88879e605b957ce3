use serde::Serialize;
use std::env;

use crate::models::MeasurementType;

/// ---------------------------------------------------------------------------
/// Configuration Constants
/// ---------------------------------------------------------------------------

pub const DEFAULT_DATABASE_URL: &str = "sqlite://cycle-planner.db?mode=rwc";
pub const DEFAULT_MAX_REPS: u32 = 10;
pub const DEFAULT_MAX_SECONDS: u32 = 30;

const DATABASE_URL_VAR: &str = "CYCLE_DATABASE_URL";
const DEFAULT_MAX_REPS_VAR: &str = "CYCLE_DEFAULT_MAX_REPS";
const DEFAULT_MAX_SECONDS_VAR: &str = "CYCLE_DEFAULT_MAX_SECONDS";

/// ---------------------------------------------------------------------------
/// Engine Configuration
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
  pub database_url: String,
  /// Stand-in max for rep exercises with no established max or default
  pub default_max_reps: u32,
  pub default_max_seconds: u32,
}

impl Default for EngineConfig {
  fn default() -> Self {
    Self {
      database_url: DEFAULT_DATABASE_URL.to_string(),
      default_max_reps: DEFAULT_MAX_REPS,
      default_max_seconds: DEFAULT_MAX_SECONDS,
    }
  }
}

impl EngineConfig {
  /// Load from the process environment, reading a `.env` file first if present
  pub fn from_env() -> Result<Self, ConfigError> {
    dotenvy::dotenv().ok();
    Self::from_vars()
  }

  fn from_vars() -> Result<Self, ConfigError> {
    let defaults = Self::default();
    Ok(Self {
      database_url: env::var(DATABASE_URL_VAR).unwrap_or(defaults.database_url),
      default_max_reps: read_positive(DEFAULT_MAX_REPS_VAR)?.unwrap_or(defaults.default_max_reps),
      default_max_seconds: read_positive(DEFAULT_MAX_SECONDS_VAR)?
        .unwrap_or(defaults.default_max_seconds),
    })
  }

  pub fn fallback_max(&self, measurement: MeasurementType) -> u32 {
    match measurement {
      MeasurementType::Reps => self.default_max_reps,
      MeasurementType::Time => self.default_max_seconds,
    }
  }
}

fn read_positive(name: &str) -> Result<Option<u32>, ConfigError> {
  match env::var(name) {
    Ok(raw) => match raw.trim().parse::<u32>() {
      Ok(value) if value > 0 => Ok(Some(value)),
      _ => Err(ConfigError::InvalidValue {
        name: name.to_string(),
        value: raw,
      }),
    },
    Err(_) => Ok(None),
  }
}

/// ---------------------------------------------------------------------------
/// Error Handling
/// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
  #[error("Invalid value for {name}: {value:?} (expected a positive integer)")]
  InvalidValue { name: String, value: String },
}

impl Serialize for ConfigError {
  fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
  where
    S: serde::Serializer,
  {
    serializer.serialize_str(&self.to_string())
  }
}
