//! # MaxiMarket Settings
//!
//! Application configuration: store defaults, project discovery and
//! shopping list preferences, persisted as JSON or TOML.

pub mod config;
pub mod error;

pub use config::{Config, ProjectSettings, ShoppingSettings, StoreSettings};
pub use error::{ConfigError, SettingsError, SettingsResult};
