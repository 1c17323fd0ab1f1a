//! Application configuration loaded from config.toml.
//!
//! The file holds the leave policy and the initial roster. Secrets such as the
//! Discord token and the database URL stay in the environment (`.env`).

use crate::errors::{Error, Result};
use serde::Deserialize;
use std::path::Path;

/// Database configuration and connection management
pub mod database;

/// Leave policy settings
pub mod policy;

/// Roster seeding from config.toml
pub mod roster;

/// Default location of the configuration file.
pub const DEFAULT_CONFIG_PATH: &str = "config.toml";

/// Configuration structure representing the entire config.toml file
#[derive(Debug, Default, Deserialize)]
pub struct AppConfig {
    /// Workflow rules
    #[serde(default)]
    pub policy: policy::LeavePolicy,
    /// Roster written into an empty database on startup
    #[serde(default)]
    pub users: Vec<roster::RosterEntry>,
}

/// Loads application configuration from a TOML file
///
/// # Errors
/// Returns an error if:
/// - The file cannot be read
/// - The TOML syntax is invalid
/// - Required fields are missing
/// - A `[policy]` value is out of range
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<AppConfig> {
    let path_ref = path.as_ref();
    tracing::debug!("Attempting to load configuration from: {:?}", path_ref);
    let contents = std::fs::read_to_string(path_ref).map_err(|e| Error::Config {
        message: format!("Failed to read config file {}: {e}", path_ref.display()),
    })?;

    parse_config(&contents).map_err(|e| Error::Config {
        message: format!("Invalid config file {}: {e}", path_ref.display()),
    })
}

/// Loads the configuration named by `LEAVE_DESK_CONFIG`, or ./config.toml
pub fn load_default_config() -> Result<AppConfig> {
    let path = std::env::var("LEAVE_DESK_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
    load_config(path)
}

fn parse_config(contents: &str) -> Result<AppConfig> {
    let config: AppConfig = toml::from_str(contents).map_err(|e| Error::Config {
        message: e.to_string(),
    })?;
    config.policy.validate()?;
    Ok(config)
}
