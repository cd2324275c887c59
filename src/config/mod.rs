/// Database connection and table creation
pub mod database;

/// Application settings from config.toml
pub mod settings;

pub use settings::{AppConfig, BootstrapAdmin, load_config, load_config_or_default};
