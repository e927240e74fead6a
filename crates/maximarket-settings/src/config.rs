//! Configuration for MaxiMarket
//!
//! Configuration is organized into logical sections:
//! - Store defaults (entrance cell, grid size for new projects)
//! - Project discovery (search directories, catalog location)
//! - Shopping list preferences
//!
//! Files are JSON or TOML, chosen by extension.

use std::path::{Path, PathBuf};

use maximarket_core::{Cell, GridDimensions, DEFAULT_COLS, DEFAULT_ROWS};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{ConfigError, SettingsResult};

/// Application directory name under the platform config directory.
const APP_DIR: &str = "maximarket";

/// Store layout defaults
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreSettings {
    /// Row count for new projects
    pub default_rows: u32,
    /// Column count for new projects
    pub default_cols: u32,
    /// Entrance cell used when a project does not set its own
    pub start_point: Cell,
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self {
            default_rows: DEFAULT_ROWS,
            default_cols: DEFAULT_COLS,
            start_point: Cell::new(28, 21),
        }
    }
}

/// Project discovery settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectSettings {
    /// Directories scanned (non-recursively) for project files
    pub search_dirs: Vec<PathBuf>,
    /// Product catalog file
    pub catalog_path: PathBuf,
    /// File names in the search directories that are never projects
    pub excluded_files: Vec<String>,
}

impl Default for ProjectSettings {
    fn default() -> Self {
        let mut search_dirs = vec![PathBuf::from(".")];
        if let Some(dir) = Config::default_projects_dir() {
            search_dirs.push(dir);
        }

        Self {
            search_dirs,
            catalog_path: PathBuf::from("Ressources").join("produits_selectionnes.json"),
            excluded_files: vec!["produits_selectionnes.json".to_string()],
        }
    }
}

/// Shopping list preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShoppingSettings {
    /// Size of randomly generated lists
    pub random_list_size: usize,
    /// Store name printed on exports when the project names none
    pub default_store_name: String,
}

impl Default for ShoppingSettings {
    fn default() -> Self {
        Self {
            random_list_size: 10,
            default_store_name: "MaxiMarket".to_string(),
        }
    }
}

/// Complete application configuration
///
/// Aggregates all settings sections and provides file I/O operations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub store: StoreSettings,
    pub projects: ProjectSettings,
    pub shopping: ShoppingSettings,
}

impl Config {
    /// Create new config with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Platform config file location (`<config dir>/maximarket/config.toml`).
    pub fn default_path() -> SettingsResult<PathBuf> {
        dirs::config_dir()
            .map(|dir| dir.join(APP_DIR).join("config.toml"))
            .ok_or_else(|| {
                crate::error::SettingsError::ConfigDirectory(
                    "no configuration directory on this platform".to_string(),
                )
            })
    }

    /// Platform directory for project files, if the platform has one.
    pub fn default_projects_dir() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(APP_DIR).join("projets"))
    }

    /// Load config from file (JSON or TOML)
    pub fn load_from_file(path: &Path) -> SettingsResult<Self> {
        let format = Format::from_path(path)?;
        let content = std::fs::read_to_string(path)?;

        let config: Self = match format {
            Format::Json => serde_json::from_str(&content)?,
            Format::Toml => toml::from_str(&content)?,
        };

        config.validate()?;
        debug!(path = %path.display(), "config loaded");
        Ok(config)
    }

    /// Load config from file, falling back to defaults when it does not exist.
    pub fn load_or_default(path: &Path) -> SettingsResult<Self> {
        if path.exists() {
            Self::load_from_file(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Save config to file (JSON or TOML)
    pub fn save_to_file(&self, path: &Path) -> SettingsResult<()> {
        self.validate()?;

        let content = match Format::from_path(path)? {
            Format::Json => serde_json::to_string_pretty(self)?,
            Format::Toml => toml::to_string_pretty(self)?,
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        GridDimensions::new(self.store.default_rows, self.store.default_cols).map_err(|_| {
            ConfigError::ValueOutOfRange {
                key: "store.default_rows/default_cols".to_string(),
                value: format!("{}x{}", self.store.default_rows, self.store.default_cols),
            }
        })?;

        let start = self.store.start_point;
        if start.x < 0 || start.y < 0 {
            return Err(ConfigError::ValueOutOfRange {
                key: "store.start_point".to_string(),
                value: start.to_string(),
            });
        }

        if self.shopping.random_list_size == 0 {
            return Err(ConfigError::ValueOutOfRange {
                key: "shopping.random_list_size".to_string(),
                value: "0".to_string(),
            });
        }

        Ok(())
    }

    /// Grid size for new projects.
    pub fn default_dimensions(&self) -> GridDimensions {
        GridDimensions::new(self.store.default_rows, self.store.default_cols).unwrap_or_default()
    }
}

#[derive(Debug, Clone, Copy)]
enum Format {
    Json,
    Toml,
}

impl Format {
    fn from_path(path: &Path) -> Result<Self, ConfigError> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Ok(Self::Json),
            Some("toml") => Ok(Self::Toml),
            other => Err(ConfigError::UnsupportedFormat(
                other.unwrap_or("<none>").to_string(),
            )),
        }
    }
}
