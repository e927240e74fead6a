//! Error types for the project crate.
//!
//! This module provides structured error types for project persistence,
//! validation and session editing.

use std::io;
use std::path::PathBuf;

use maximarket_core::{Cell, GridError, PlacementError};
use thiserror::Error;

use crate::store::LoadedProject;

/// Errors that can occur during project operations.
#[derive(Error, Debug)]
pub enum ProjectError {
    /// The project file does not exist.
    #[error("Project not found: {0}")]
    ProjectNotFound(PathBuf),

    /// The project loaded but its plan image is missing.
    ///
    /// Carries the parsed project so the caller can supply another plan with
    /// [`LoadedProject::with_plan`].
    #[error("Plan image not found: {path}")]
    PlanNotFound {
        path: PathBuf,
        project: Box<LoadedProject>,
    },

    /// The project file content is invalid.
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// An edit would break the one-to-one placement index.
    #[error("Placement error: {0}")]
    Consistency(#[from] PlacementError),

    /// A grid constraint was violated.
    #[error("Grid error: {0}")]
    Grid(#[from] GridError),

    /// I/O error during file operations.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Writing the project file failed; the previous file is unchanged.
    #[error("Failed to save project to {path}: {reason}")]
    SaveFailed { path: PathBuf, reason: String },
}

impl ProjectError {
    /// True when the caller can repair the situation and retry, such as
    /// pointing a project at a relocated plan image.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, ProjectError::PlanNotFound { .. })
    }

    /// Check if a referenced file was missing
    pub fn is_not_found(&self) -> bool {
        match self {
            ProjectError::ProjectNotFound(_) | ProjectError::PlanNotFound { .. } => true,
            ProjectError::Io(e) => e.kind() == io::ErrorKind::NotFound,
            _ => false,
        }
    }
}

/// Errors related to project file validation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// The file is not JSON or has the wrong shape.
    #[error("Malformed project file: {0}")]
    Malformed(String),

    /// A required field is missing or empty.
    #[error("Missing required field: {0}")]
    MissingField(String),

    /// A placement key is not of the form "x,y".
    #[error("Invalid cell key: '{0}'")]
    InvalidCellKey(String),

    /// A placement value is not a product name.
    #[error("Invalid product for cell '{key}'")]
    InvalidProduct { key: String },

    /// Grid row or column count is zero.
    #[error("Invalid grid size: {rows} rows x {cols} columns")]
    InvalidGrid { rows: u32, cols: u32 },

    /// The same product appears in two cells.
    #[error("Product '{product}' is placed at both {first} and {second}")]
    DuplicatePlacement {
        product: String,
        first: Cell,
        second: Cell,
    },

    /// A placed product is not part of the store's product set.
    #[error("Placed product '{0}' is not sold in this store")]
    InactivePlacement(String),
}

/// Result type alias for project operations.
pub type ProjectResult<T> = Result<T, ProjectError>;
