//! # MaxiMarket Core
//!
//! Core model for mapping a store floor to a grid and planning shopping routes.
//!
//! ```text
//! GridGeometry     pixel <-> cell conversion over the plan image
//! PlacementIndex   cell <-> product, one to one
//! ProductCatalog   categories and the active product set
//! ShoppingList     ordered, duplicate-free selection
//! RouteOptimizer   nearest-neighbor visiting order
//! ```
//!
//! Everything here is synchronous and free of I/O except the explicit
//! load/save helpers on the catalog and shopping list.

pub mod catalog;
pub mod error;
pub mod events;
pub mod geometry;
pub mod placement;
pub mod route;
pub mod shopping;

pub use catalog::{Category, ProductCatalog};
pub use error::{CatalogError, Error, GridError, ListError, PlacementError, Result};
pub use events::{ChangeFilter, PlacementObservers, SubscriptionId};
pub use geometry::{Cell, GridDimensions, GridGeometry, DEFAULT_COLS, DEFAULT_ROWS};
pub use placement::{PlacementChange, PlacementIndex};
pub use route::{distance, Route, RouteOptimizer, Stop};
pub use shopping::ShoppingList;
