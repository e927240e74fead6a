//! # MaxiMarket Project
//!
//! Store projects on disk and the session used to edit them.
//!
//! - [`Project`]: the store description, its grid and placements
//! - [`ProjectStore`]: load, atomic save and discovery of project files
//! - [`StoreSession`]: the owned editing state with placement observers

pub mod error;
pub mod project;
pub mod session;
pub mod store;

pub use error::{ProjectError, ProjectResult, ValidationError};
pub use project::{Project, DATE_FORMAT};
pub use session::StoreSession;
pub use store::{LoadedProject, ProjectStore, ProjectSummary};
