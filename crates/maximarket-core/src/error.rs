//! Error handling for MaxiMarket core
//!
//! Provides error types for every layer of the core model:
//! - Grid errors (dimensions, pixel sizes, plan image probing)
//! - Placement errors (consistency of the cell/product index)
//! - Catalog errors (loading the product catalog)
//! - Shopping list errors (export and list files)
//!
//! All error types use `thiserror` for ergonomic error handling.

use crate::geometry::Cell;
use std::path::PathBuf;
use thiserror::Error;

/// Grid error type
///
/// Raised when a grid or its pixel mapping cannot be built.
#[derive(Error, Debug)]
pub enum GridError {
    /// Row or column count is zero
    #[error("Invalid grid dimensions: {rows} rows x {cols} columns")]
    InvalidDimensions {
        /// Requested row count.
        rows: u32,
        /// Requested column count.
        cols: u32,
    },

    /// Pixel size is negative or not finite
    #[error("Invalid pixel size: {width} x {height}")]
    InvalidPixelSize {
        /// Requested pixel width.
        width: f64,
        /// Requested pixel height.
        height: f64,
    },

    /// Cell lies outside the grid
    #[error("Cell {cell} is outside the {rows} x {cols} grid")]
    OutOfBounds {
        /// The rejected cell.
        cell: Cell,
        /// Grid row count.
        rows: u32,
        /// Grid column count.
        cols: u32,
    },

    /// The plan image could not be probed
    #[error("Cannot read plan image {path}: {reason}")]
    Image {
        /// Path of the plan image.
        path: PathBuf,
        /// Decoder message.
        reason: String,
    },
}

/// Placement error type
///
/// Consistency failures of the placement index. These never mutate the index.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PlacementError {
    /// Product is not part of the active product set
    #[error("Product '{product}' is not sold in this store")]
    UnknownProduct {
        /// The rejected product name.
        product: String,
    },

    /// Target cell already holds another product
    #[error("Cell {cell} is already occupied by '{occupant}'")]
    OccupiedCell {
        /// The requested cell.
        cell: Cell,
        /// The product currently in that cell.
        occupant: String,
    },

    /// Product has no placement
    #[error("Product '{product}' is not placed")]
    NotPlaced {
        /// The product that was looked up.
        product: String,
    },
}

/// Catalog error type
#[derive(Error, Debug)]
pub enum CatalogError {
    /// Catalog file does not exist
    #[error("Catalog not found: {0}")]
    NotFound(PathBuf),

    /// Catalog JSON does not have the category -> products shape
    #[error("Malformed catalog: {0}")]
    Malformed(String),

    /// I/O error while reading the catalog
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Shopping list error type
#[derive(Error, Debug)]
pub enum ListError {
    /// I/O error while reading or writing a list
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Main error type for MaxiMarket core
///
/// A unified error type that can represent any error from the core model.
#[derive(Error, Debug)]
pub enum Error {
    /// Grid error
    #[error(transparent)]
    Grid(#[from] GridError),

    /// Placement error
    #[error(transparent)]
    Placement(#[from] PlacementError),

    /// Catalog error
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    /// Shopping list error
    #[error(transparent)]
    List(#[from] ListError),
}

impl Error {
    /// Check if this is a placement consistency error
    pub fn is_placement_error(&self) -> bool {
        matches!(self, Error::Placement(_))
    }

    /// Check if this is a grid error
    pub fn is_grid_error(&self) -> bool {
        matches!(self, Error::Grid(_))
    }

    /// Check if a referenced file was missing
    pub fn is_not_found(&self) -> bool {
        match self {
            Error::Catalog(CatalogError::NotFound(_)) => true,
            Error::Catalog(CatalogError::Io(e)) | Error::List(ListError::Io(e)) => {
                e.kind() == std::io::ErrorKind::NotFound
            }
            _ => false,
        }
    }
}

/// Result type using Error
pub type Result<T> = std::result::Result<T, Error>;
