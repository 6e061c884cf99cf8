//! `OasysDB` Configuration Module
//!
//! Database-wide settings via `oasysdb.toml`, environment variables,
//! and runtime overrides. Per-collection parameters live in
//! [`crate::collection::Config`] instead.
//!
//! # Priority (highest to lowest)
//!
//! 1. Runtime overrides (API)
//! 2. Environment variables (`OASYSDB_*`, nested keys joined by `__`)
//! 3. Configuration file (`oasysdb.toml`)
//! 4. Default values

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Largest vector dimension any configuration may allow.
const DIMENSION_CEILING: usize = 65_536;

/// Configuration errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to parse configuration.
    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    /// Invalid configuration value.
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue {
        /// Configuration key that failed validation.
        key: String,
        /// Validation error message.
        message: String,
    },
}

/// Storage configuration section.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Sync written files to disk before an operation returns.
    pub sync_writes: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self { sync_writes: true }
    }
}

/// Limits configuration section.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LimitsConfig {
    /// Maximum vector dimension of a stored collection.
    pub max_dimension: usize,
    /// Maximum number of collections in one database.
    pub max_collections: usize,
    /// Maximum number of records in one stored collection.
    pub max_records_per_collection: usize,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_dimension: 4096,
            max_collections: 1000,
            max_records_per_collection: 10_000_000,
        }
    }
}

/// Main `OasysDB` configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct OasysConfig {
    /// Storage configuration.
    pub storage: StorageConfig,
    /// Limits configuration.
    pub limits: LimitsConfig,
}

impl OasysConfig {
    /// Loads configuration from default sources.
    ///
    /// Priority: defaults < file < environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration parsing fails.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from_path("oasysdb.toml")
    }

    /// Loads configuration from a specific file path.
    ///
    /// A missing file is not an error; defaults and environment still apply.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration parsing fails.
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let figment = Figment::new()
            .merge(Serialized::defaults(Self::default()))
            .merge(Toml::file(path.as_ref()))
            .merge(Env::prefixed("OASYSDB_").split("__"));

        figment
            .extract()
            .map_err(|e| ConfigError::ParseError(e.to_string()))
    }

    /// Creates a configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if parsing fails.
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        let figment = Figment::new()
            .merge(Serialized::defaults(Self::default()))
            .merge(Toml::string(toml_str));

        figment
            .extract()
            .map_err(|e| ConfigError::ParseError(e.to_string()))
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration value is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let limits = &self.limits;

        if limits.max_dimension == 0 || limits.max_dimension > DIMENSION_CEILING {
            return Err(ConfigError::InvalidValue {
                key: "limits.max_dimension".to_string(),
                message: format!(
                    "value {} is out of range [1, {DIMENSION_CEILING}]",
                    limits.max_dimension
                ),
            });
        }

        if limits.max_collections == 0 {
            return Err(ConfigError::InvalidValue {
                key: "limits.max_collections".to_string(),
                message: "value must be at least 1".to_string(),
            });
        }

        if limits.max_records_per_collection == 0 {
            return Err(ConfigError::InvalidValue {
                key: "limits.max_records_per_collection".to_string(),
                message: "value must be at least 1".to_string(),
            });
        }

        Ok(())
    }

    /// Serializes the configuration to TOML.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::ParseError(e.to_string()))
    }
}
