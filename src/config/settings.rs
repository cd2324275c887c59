//! Application settings loaded from `config.toml`.
//!
//! Every field has a default, so a missing file or a partial file is fine.
//! The database location can be overridden from the environment or the command
//! line after loading.

use crate::config::database::DEFAULT_DATABASE_URL;
use crate::core::DEFAULT_CART_CAPACITY;
use crate::errors::{Error, Result};
use serde::Deserialize;
use std::path::Path;
use tracing::{debug, info};

/// Configuration structure representing the entire config.toml file
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct AppConfig {
    /// `SeaORM` connection URL of the ledger database
    pub database_url: String,
    /// Maximum number of entries in a cart
    pub cart_capacity: usize,
    /// Admin inserted at startup when absent, so a fresh database can be administered
    pub bootstrap_admin: Option<BootstrapAdmin>,
}

/// The first admin of a fresh database
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct BootstrapAdmin {
    /// Member number
    pub id: i64,
    /// Display name
    pub name: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database_url: DEFAULT_DATABASE_URL.to_string(),
            cart_capacity: DEFAULT_CART_CAPACITY,
            bootstrap_admin: None,
        }
    }
}

impl AppConfig {
    /// Rejects settings the ledger cannot run with.
    pub fn validate(self) -> Result<Self> {
        if self.cart_capacity == 0 {
            return Err(Error::Config {
                message: "cart_capacity must be at least 1".to_string(),
            });
        }
        if self.database_url.trim().is_empty() {
            return Err(Error::Config {
                message: "database_url cannot be empty".to_string(),
            });
        }
        if let Some(admin) = &self.bootstrap_admin {
            if admin.id <= 0 || admin.name.trim().is_empty() {
                return Err(Error::Config {
                    message: "bootstrap_admin needs a positive id and a name".to_string(),
                });
            }
        }
        Ok(self)
    }
}

/// Parses and validates configuration from TOML text.
pub fn parse_config(contents: &str) -> Result<AppConfig> {
    let config: AppConfig = toml::from_str(contents).map_err(|e| Error::Config {
        message: format!("Failed to parse config.toml: {e}"),
    })?;
    config.validate()
}

/// Loads configuration from a TOML file
///
/// # Errors
/// Returns an error if:
/// - The file cannot be read
/// - The TOML syntax is invalid
/// - A setting is out of range
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<AppConfig> {
    let path_ref = path.as_ref();
    debug!("Attempting to load configuration from: {:?}", path_ref);
    let contents = std::fs::read_to_string(path_ref).map_err(|e| Error::Config {
        message: format!("Failed to read config file {}: {e}", path_ref.display()),
    })?;
    parse_config(&contents)
}

/// Like [`load_config`], but falls back to the defaults when `path` does not
/// exist.
pub fn load_config_or_default<P: AsRef<Path>>(path: P) -> Result<AppConfig> {
    let path_ref = path.as_ref();
    if !path_ref.exists() {
        info!(
            "No configuration file at {}, using defaults",
            path_ref.display()
        );
        return Ok(AppConfig::default());
    }
    load_config(path_ref)
}
