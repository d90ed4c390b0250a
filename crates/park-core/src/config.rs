//! # Ledger Configuration
//!
//! Tunables for a ledger run, loaded from YAML. Every field has a default,
//! so an empty document (or no file at all) yields [`ParkConfig::default`].
//!
//! ```yaml
//! max_lots: 20
//! vehicle_buckets: 100
//! max_load_factor: 0.75
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Default maximum number of concurrent lots.
pub const DEFAULT_MAX_LOTS: usize = 20;

/// Default initial bucket count of the vehicle index.
pub const DEFAULT_VEHICLE_BUCKETS: usize = 100;

/// Default load factor above which the vehicle index doubles.
pub const DEFAULT_MAX_LOAD_FACTOR: f64 = 0.75;

/// Tunables for a ledger run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ParkConfig {
    /// Maximum number of lots that may exist at once.
    pub max_lots: usize,
    /// Initial bucket count of the vehicle index.
    pub vehicle_buckets: usize,
    /// The vehicle index doubles before an insertion when
    /// `count / buckets` exceeds this value.
    pub max_load_factor: f64,
}

impl Default for ParkConfig {
    fn default() -> Self {
        Self {
            max_lots: DEFAULT_MAX_LOTS,
            vehicle_buckets: DEFAULT_VEHICLE_BUCKETS,
            max_load_factor: DEFAULT_MAX_LOAD_FACTOR,
        }
    }
}

impl ParkConfig {
    /// Parse and validate a YAML document.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        let config: Self = if yaml.trim().is_empty() {
            Self::default()
        } else {
            serde_yaml::from_str(yaml)?
        };
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a YAML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let yaml = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml_str(&yaml)
    }

    /// Check field ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_lots == 0 {
            return Err(ConfigError::Invalid {
                field: "max_lots",
                reason: "must be at least 1".to_string(),
            });
        }
        if self.vehicle_buckets == 0 {
            return Err(ConfigError::Invalid {
                field: "vehicle_buckets",
                reason: "must be at least 1".to_string(),
            });
        }
        if !(self.max_load_factor.is_finite() && self.max_load_factor > 0.0) {
            return Err(ConfigError::Invalid {
                field: "max_load_factor",
                reason: format!("must be a positive number, got {}", self.max_load_factor),
            });
        }
        Ok(())
    }
}
