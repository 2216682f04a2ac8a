//! Configuration management for the dashboard.
//!
//! Handles loading configuration from TOML files and environment variables.
//! The result is resolved once at startup into an immutable [`AthenaSettings`]
//! that is passed by reference to everything that runs queries.

use crate::athena::S3Location;
use crate::error::{DashError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

const DEFAULT_REGION: &str = "ap-south-1";
const DEFAULT_DATABASE: &str = "ccdataset";
const DEFAULT_OUTPUT_LOCATION: &str = "s3://dku-project/Athena Output/";

/// Main configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Query service settings.
    #[serde(default)]
    pub athena: AthenaConfig,

    /// Presentation settings.
    #[serde(default)]
    pub dashboard: DashboardConfig,
}

/// Query service configuration as written in the config file.
///
/// Unset fields fall back to environment variables, then built-in defaults.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct AthenaConfig {
    /// AWS region (e.g., "ap-south-1").
    pub region: Option<String>,

    /// Logical database queries run against.
    pub database: Option<String>,

    /// S3 prefix the service stages results under. Must end with '/'.
    pub output_location: Option<String>,

    /// Athena workgroup; the account default when unset.
    pub workgroup: Option<String>,

    /// Delay between status checks, in milliseconds.
    pub poll_interval_ms: Option<u64>,
}

/// Dashboard presentation configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardConfig {
    /// Page title.
    #[serde(default = "default_title")]
    pub title: String,

    /// Which visualization catalog to render: "overview" or "detailed".
    #[serde(default = "default_catalog")]
    pub catalog: String,
}

fn default_title() -> String {
    "Retail Performance Dashboard".to_string()
}

fn default_catalog() -> String {
    "overview".to_string()
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            title: default_title(),
            catalog: default_catalog(),
        }
    }
}

/// Resolved, validated query service settings.
#[derive(Debug, Clone, PartialEq)]
pub struct AthenaSettings {
    pub region: String,
    pub database: String,
    pub output_location: S3Location,
    pub workgroup: Option<String>,
    pub poll_interval: Duration,
}

impl AthenaSettings {
    /// Returns a display-safe summary for the header bar.
    pub fn display_string(&self) -> String {
        format!("{} @ {}", self.database, self.region)
    }
}

impl AthenaConfig {
    /// Merges another config into this one, with the other taking precedence.
    pub fn merge(&mut self, other: &AthenaConfig) {
        if other.region.is_some() {
            self.region = other.region.clone();
        }
        if other.database.is_some() {
            self.database = other.database.clone();
        }
        if other.output_location.is_some() {
            self.output_location = other.output_location.clone();
        }
        if other.workgroup.is_some() {
            self.workgroup = other.workgroup.clone();
        }
        if other.poll_interval_ms.is_some() {
            self.poll_interval_ms = other.poll_interval_ms;
        }
    }

    /// Applies environment variables (AWS_REGION, ATHENA_DATABASE, etc.) as defaults.
    pub fn apply_env_defaults(&mut self) {
        self.apply_defaults_from(|key| std::env::var(key).ok());
    }

    /// Fills unset fields from `lookup`, keyed by environment variable name.
    pub fn apply_defaults_from(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if self.region.is_none() {
            self.region = lookup("AWS_REGION").or_else(|| lookup("AWS_DEFAULT_REGION"));
        }
        if self.database.is_none() {
            self.database = lookup("ATHENA_DATABASE");
        }
        if self.output_location.is_none() {
            self.output_location = lookup("ATHENA_OUTPUT_LOCATION");
        }
        if self.workgroup.is_none() {
            self.workgroup = lookup("ATHENA_WORKGROUP");
        }
    }

    /// Fills built-in defaults and validates the result.
    pub fn resolve(&self) -> Result<AthenaSettings> {
        let region = self.region.as_deref().unwrap_or(DEFAULT_REGION).trim();
        if region.is_empty() {
            return Err(DashError::config("athena.region must not be empty"));
        }

        let database = self.database.as_deref().unwrap_or(DEFAULT_DATABASE).trim();
        if database.is_empty() {
            return Err(DashError::config("athena.database must not be empty"));
        }

        let raw_location = self
            .output_location
            .as_deref()
            .unwrap_or(DEFAULT_OUTPUT_LOCATION);
        let output_location: S3Location = raw_location.parse().map_err(DashError::config)?;
        if !raw_location.ends_with('/') {
            return Err(DashError::config(format!(
                "athena.output_location '{raw_location}' must end with '/'"
            )));
        }

        let poll_interval_ms = self.poll_interval_ms.unwrap_or(1000);
        if poll_interval_ms == 0 {
            return Err(DashError::config("athena.poll_interval_ms must be positive"));
        }

        Ok(AthenaSettings {
            region: region.to_string(),
            database: database.to_string(),
            output_location,
            workgroup: self.workgroup.clone().filter(|w| !w.trim().is_empty()),
            poll_interval: Duration::from_millis(poll_interval_ms),
        })
    }
}

impl Config {
    /// Returns the default config file path for the current platform.
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("retail-dash")
            .join("config.toml")
    }

    /// Loads configuration from a TOML file. A missing file yields defaults.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .map_err(|e| DashError::config(format!("Failed to read config file: {e}")))?;

        Self::parse_toml(&content, path)
    }

    /// Parses configuration from a TOML string.
    fn parse_toml(content: &str, path: &Path) -> Result<Self> {
        toml::from_str(content).map_err(|e| {
            DashError::config(format!(
                "Configuration error in {}:\n  {}",
                path.display(),
                e
            ))
        })
    }
}
