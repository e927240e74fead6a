//! The project aggregate and its JSON file format.
//!
//! A project describes one store: who mapped it, where the plan image lives,
//! the grid laid over the plan, the products sold there and where each of
//! them sits on the grid.
//!
//! The file format keeps the keys of the existing project files
//! (`nom_projet`, `chemin_plan`, `placements` with `"x,y"` keys, ...). Cells
//! only take their text form here.

use std::path::PathBuf;

use chrono::Local;
use maximarket_core::{Cell, GridDimensions, PlacementIndex, ProductCatalog};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::warn;

use crate::error::ValidationError;

/// Timestamp format of `date_creation`.
pub const DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// A store mapping project.
#[derive(Debug, Clone, PartialEq)]
pub struct Project {
    pub name: String,
    pub author: String,
    /// Creation time, formatted with [`DATE_FORMAT`].
    pub created_at: String,
    pub store_name: String,
    pub store_address: String,
    /// Plan image, relative to the project file's directory unless absolute.
    pub plan_path: PathBuf,
    pub grid: GridDimensions,
    /// Products sold in this store, in selection order.
    pub active_products: Vec<String>,
    pub placements: PlacementIndex,
    /// Entrance override; the configured default applies when `None`.
    pub start_point: Option<Cell>,
}

impl Project {
    /// Creates an empty project stamped with the current local time.
    pub fn new(
        name: impl Into<String>,
        author: impl Into<String>,
        store_name: impl Into<String>,
        store_address: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        let name = name.into();
        let store_name = store_name.into();
        if name.trim().is_empty() {
            return Err(ValidationError::MissingField("nom_projet".to_string()));
        }
        if store_name.trim().is_empty() {
            return Err(ValidationError::MissingField("nom_magasin".to_string()));
        }

        Ok(Self {
            name,
            author: author.into(),
            created_at: Local::now().format(DATE_FORMAT).to_string(),
            store_name,
            store_address: store_address.into(),
            plan_path: PathBuf::new(),
            grid: GridDimensions::default(),
            active_products: Vec::new(),
            placements: PlacementIndex::new(),
            start_point: None,
        })
    }

    /// Sets the plan image path.
    pub fn with_plan_path(mut self, plan_path: impl Into<PathBuf>) -> Self {
        self.plan_path = plan_path.into();
        self
    }

    /// Sets the grid size.
    pub fn with_grid(mut self, grid: GridDimensions) -> Self {
        self.grid = grid;
        self
    }

    /// `"{name}.json"`
    pub fn default_file_name(&self) -> String {
        format!("{}.json", self.name)
    }

    /// A catalog whose active set is this project's product list.
    pub fn active_catalog(&self) -> ProductCatalog {
        let mut catalog = ProductCatalog::new();
        catalog.set_active_products(self.active_products.iter().cloned());
        catalog
    }

    /// Checks the fields a project file must carry to load again.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::MissingField("nom_projet".to_string()));
        }
        if self.plan_path.as_os_str().is_empty() {
            return Err(ValidationError::MissingField("chemin_plan".to_string()));
        }
        let catalog = self.active_catalog();
        if let Some((_, product)) = self
            .placements
            .iter()
            .find(|(_, product)| !catalog.is_active(product))
        {
            return Err(ValidationError::InactivePlacement(product.to_string()));
        }
        Ok(())
    }

    /// Parses a project file.
    pub fn from_json_str(content: &str) -> Result<Self, ValidationError> {
        let file: ProjectFile =
            serde_json::from_str(content).map_err(|e| ValidationError::Malformed(e.to_string()))?;
        Self::try_from(file)
    }

    /// Pretty-printed project file, placements ordered by cell.
    pub fn to_json_string(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&ProjectFile::from(self))
    }
}

fn default_rows() -> u32 {
    maximarket_core::DEFAULT_ROWS
}

fn default_cols() -> u32 {
    maximarket_core::DEFAULT_COLS
}

/// On-disk layout of a project file.
#[derive(Debug, Serialize, Deserialize)]
struct ProjectFile {
    nom_projet: Option<String>,
    #[serde(default)]
    auteur: String,
    #[serde(default)]
    date_creation: String,
    #[serde(default)]
    nom_magasin: String,
    #[serde(default)]
    adresse_magasin: String,
    chemin_plan: Option<String>,
    #[serde(default = "default_rows")]
    nb_rangs: u32,
    #[serde(default = "default_cols")]
    nb_rayons: u32,
    #[serde(default)]
    produits_magasin: Vec<String>,
    #[serde(default)]
    placements: Map<String, Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    point_depart: Option<String>,
}

impl From<&Project> for ProjectFile {
    fn from(project: &Project) -> Self {
        let placements = project
            .placements
            .iter()
            .map(|(cell, product)| (cell.to_key(), Value::String(product.to_string())))
            .collect();

        Self {
            nom_projet: Some(project.name.clone()),
            auteur: project.author.clone(),
            date_creation: project.created_at.clone(),
            nom_magasin: project.store_name.clone(),
            adresse_magasin: project.store_address.clone(),
            chemin_plan: Some(project.plan_path.to_string_lossy().into_owned()),
            nb_rangs: project.grid.rows(),
            nb_rayons: project.grid.cols(),
            produits_magasin: project.active_products.clone(),
            placements,
            point_depart: project.start_point.map(|cell| cell.to_key()),
        }
    }
}

fn required(value: Option<String>, key: &str) -> Result<String, ValidationError> {
    value
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| ValidationError::MissingField(key.to_string()))
}

impl TryFrom<ProjectFile> for Project {
    type Error = ValidationError;

    fn try_from(file: ProjectFile) -> Result<Self, Self::Error> {
        let name = required(file.nom_projet, "nom_projet")?;
        let plan_path = required(file.chemin_plan, "chemin_plan")?;
        let grid = GridDimensions::new(file.nb_rangs, file.nb_rayons).map_err(|_| {
            ValidationError::InvalidGrid {
                rows: file.nb_rangs,
                cols: file.nb_rayons,
            }
        })?;
        let start_point = file
            .point_depart
            .map(|key| Cell::parse_key(&key).ok_or(ValidationError::InvalidCellKey(key)))
            .transpose()?;

        let mut catalog = ProductCatalog::new();
        catalog.set_active_products(file.produits_magasin);

        let mut placements = PlacementIndex::new();
        for (key, value) in file.placements {
            let cell =
                Cell::parse_key(&key).ok_or_else(|| ValidationError::InvalidCellKey(key.clone()))?;
            let Value::String(product) = value else {
                return Err(ValidationError::InvalidProduct { key });
            };
            if !catalog.is_active(&product) {
                warn!(product = %product, %cell, "dropping placement of a product not sold in this store");
                continue;
            }
            if let Some(first) = placements.position_of(&product) {
                return Err(ValidationError::DuplicatePlacement {
                    product,
                    first,
                    second: cell,
                });
            }
            // Two spellings of one key ("1,2" and "1, 2") land here.
            placements
                .place(&product, cell, &catalog)
                .map_err(|e| ValidationError::Malformed(e.to_string()))?;
        }

        Ok(Self {
            name,
            author: file.auteur,
            created_at: file.date_creation,
            store_name: file.nom_magasin,
            store_address: file.adresse_magasin,
            plan_path: PathBuf::from(plan_path),
            grid,
            active_products: catalog.active_products().to_vec(),
            placements,
            start_point,
        })
    }
}
