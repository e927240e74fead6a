//! # MaxiMarket
//!
//! Store floor mapping, product placement and shopping route planning.
//!
//! An operator lays a grid over a store plan image, places the products the
//! store sells in grid cells, and gets a walking order for a shopping list
//! starting from the store entrance.
//!
//! ## Architecture
//!
//! MaxiMarket is organized as a workspace with multiple crates:
//!
//! 1. **maximarket-core** - Grid geometry, placement index, catalog, shopping lists, routing
//! 2. **maximarket-project** - Project files, discovery and the editing session
//! 3. **maximarket-settings** - Application configuration
//! 4. **maximarket** - Re-exports, logging setup and the command line tool

pub use maximarket_core::{
    distance, CatalogError, Category, Cell, ChangeFilter, GridDimensions, GridError, GridGeometry,
    ListError, PlacementChange, PlacementError, PlacementIndex, PlacementObservers,
    ProductCatalog, Route, RouteOptimizer, ShoppingList, Stop, SubscriptionId, DEFAULT_COLS,
    DEFAULT_ROWS,
};

pub use maximarket_project::{
    LoadedProject, Project, ProjectError, ProjectResult, ProjectStore, ProjectSummary,
    StoreSession, ValidationError,
};

pub use maximarket_settings::{
    Config, ConfigError, ProjectSettings, SettingsError, ShoppingSettings, StoreSettings,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Build date (set at compile time)
pub const BUILD_DATE: &str = env!("BUILD_DATE");

/// Initialize logging with the default configuration
///
/// Sets up structured logging with:
/// - Console output on stderr
/// - RUST_LOG environment variable support, INFO by default
///
/// Fails if a global subscriber is already installed.
pub fn init_logging() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let env_filter = EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into());

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_level(true)
        .with_line_number(true);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()?;

    Ok(())
}
