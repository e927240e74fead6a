//! The editing session for one store project.
//!
//! A [`StoreSession`] owns everything an editor works on: the project with
//! its placements, the product catalog, the current shopping list and the
//! placement observers. Callers hold the session and pass it where needed;
//! there is no shared global state.

use std::path::{Path, PathBuf};

use maximarket_core::{
    CatalogError, Cell, ChangeFilter, GridDimensions, GridGeometry, PlacementChange,
    PlacementError, PlacementIndex, PlacementObservers, ProductCatalog, Route, RouteOptimizer,
    ShoppingList, SubscriptionId,
};
use maximarket_settings::Config;
use rand::Rng;
use tracing::{debug, info, warn};

use crate::error::ProjectResult;
use crate::project::Project;
use crate::store::{parent_dir, LoadedProject, ProjectStore};

/// Loads the configured catalog, falling back to an empty one.
fn load_catalog(config: &Config) -> ProductCatalog {
    match ProductCatalog::load(&config.projects.catalog_path) {
        Ok(catalog) => catalog,
        Err(CatalogError::NotFound(path)) => {
            debug!(path = %path.display(), "no product catalog, starting empty");
            ProductCatalog::new()
        }
        Err(e) => {
            warn!(error = %e, "product catalog unreadable, starting empty");
            ProductCatalog::new()
        }
    }
}

/// An open store project and its editing state.
#[derive(Debug)]
pub struct StoreSession {
    project: Project,
    project_path: Option<PathBuf>,
    plan_path: PathBuf,
    catalog: ProductCatalog,
    list: ShoppingList,
    default_start: Cell,
    default_store_name: String,
    random_list_size: usize,
    store: ProjectStore,
    observers: PlacementObservers,
    modified: bool,
}

impl StoreSession {
    fn build(
        project: Project,
        project_path: Option<PathBuf>,
        plan_path: PathBuf,
        config: &Config,
    ) -> Self {
        let mut catalog = load_catalog(config);
        catalog.set_active_products(project.active_products.iter().cloned());

        Self {
            project,
            project_path,
            plan_path,
            catalog,
            list: ShoppingList::new(),
            default_start: config.store.start_point,
            default_store_name: config.shopping.default_store_name.clone(),
            random_list_size: config.shopping.random_list_size,
            store: ProjectStore::from_config(config),
            observers: PlacementObservers::new(),
            modified: false,
        }
    }

    /// Starts a session on a project that has not been saved yet.
    ///
    /// The grid takes the configured default size; change it afterwards with
    /// [`resize_grid`](Self::resize_grid).
    pub fn new_project(mut project: Project, config: &Config) -> Self {
        project.grid = config.default_dimensions();
        let plan_path = project.plan_path.clone();
        let mut session = Self::build(project, None, plan_path, config);
        session.modified = true;
        session
    }

    /// Opens a project file.
    pub fn open(path: impl AsRef<Path>, config: &Config) -> ProjectResult<Self> {
        let loaded = ProjectStore::from_config(config).load(path)?;
        Ok(Self::from_loaded(loaded, config))
    }

    /// Starts a session from an already loaded project, such as one repaired
    /// with [`LoadedProject::with_plan`].
    pub fn from_loaded(loaded: LoadedProject, config: &Config) -> Self {
        let project_path = loaded.project_path().to_path_buf();
        let plan_path = loaded.plan_path().to_path_buf();
        let relocated = loaded.is_relocated();

        let mut session = Self::build(loaded.into_project(), Some(project_path), plan_path, config);
        session.modified = relocated;
        session
    }

    pub fn project(&self) -> &Project {
        &self.project
    }

    pub fn catalog(&self) -> &ProductCatalog {
        &self.catalog
    }

    pub fn placements(&self) -> &PlacementIndex {
        &self.project.placements
    }

    pub fn shopping_list(&self) -> &ShoppingList {
        &self.list
    }

    pub fn grid(&self) -> GridDimensions {
        self.project.grid
    }

    /// Where the project was last loaded from or saved to.
    pub fn project_path(&self) -> Option<&Path> {
        self.project_path.as_deref()
    }

    /// The plan image on disk.
    pub fn plan_path(&self) -> &Path {
        &self.plan_path
    }

    /// Whether the project differs from its file.
    pub fn is_modified(&self) -> bool {
        self.modified
    }

    /// Pixel mapping for the plan image, read from the image header.
    pub fn geometry(&self) -> ProjectResult<GridGeometry> {
        Ok(GridGeometry::from_image(&self.plan_path, self.project.grid)?)
    }

    /// Replaces the catalog's categories, keeping the active product set.
    pub fn set_catalog(&mut self, catalog: ProductCatalog) {
        let active = self.catalog.active_products().to_vec();
        self.catalog = catalog;
        self.catalog.set_active_products(active);
    }

    /// Reassigns the products sold in the store.
    ///
    /// Every placement is cleared and shopping list entries that are no longer
    /// sold are dropped. Returns whether the product set changed.
    pub fn select_products(&mut self, products: impl IntoIterator<Item = String>) -> bool {
        let changed = self.catalog.set_active_products(products);
        self.project.active_products = self.catalog.active_products().to_vec();

        let cleared = self.project.placements.clear();
        self.record(&cleared);
        self.modified = true;

        let catalog = &self.catalog;
        self.list.retain(|product| catalog.is_active(product));

        info!(
            products = self.project.active_products.len(),
            changed, "store products selected"
        );
        changed
    }

    /// Places `product` in `cell`, moving it if it was placed elsewhere.
    pub fn place(&mut self, product: &str, cell: Cell) -> ProjectResult<PlacementChange> {
        self.project.grid.check(cell)?;
        let change = self.project.placements.place(product, cell, &self.catalog)?;
        self.record(&change);
        Ok(change)
    }

    /// Vacates `cell`.
    pub fn remove(&mut self, cell: Cell) -> Option<PlacementChange> {
        let change = self.project.placements.remove(cell)?;
        self.record(&change);
        Some(change)
    }

    /// Vacates the cell held by `product`.
    pub fn remove_product(&mut self, product: &str) -> ProjectResult<PlacementChange> {
        let change = self.project.placements.remove_product(product)?;
        self.record(&change);
        Ok(change)
    }

    /// Moves an already placed product to `cell`.
    pub fn move_product(&mut self, product: &str, cell: Cell) -> ProjectResult<PlacementChange> {
        if !self.project.placements.is_placed(product) {
            return Err(PlacementError::NotPlaced {
                product: product.to_string(),
            }
            .into());
        }
        self.place(product, cell)
    }

    pub fn clear_placements(&mut self) -> PlacementChange {
        let change = self.project.placements.clear();
        self.record(&change);
        change
    }

    /// Changes the grid size.
    ///
    /// Placements are kept even when they fall outside the new grid; they are
    /// returned here, skipped by routing, and removed by
    /// [`prune_out_of_bounds`](Self::prune_out_of_bounds).
    pub fn resize_grid(&mut self, dims: GridDimensions) -> Vec<(Cell, String)> {
        if dims != self.project.grid {
            self.project.grid = dims;
            self.modified = true;
        }
        let orphans = self.project.placements.out_of_bounds(dims);
        if !orphans.is_empty() {
            warn!(count = orphans.len(), grid = %dims, "placements outside the grid");
        }
        orphans
    }

    /// Removes placements that lie outside the current grid.
    pub fn prune_out_of_bounds(&mut self) -> Vec<PlacementChange> {
        let changes = self.project.placements.prune_out_of_bounds(self.project.grid);
        for change in &changes {
            self.record(change);
        }
        changes
    }

    /// Entrance cell used for routing.
    pub fn start_point(&self) -> Cell {
        self.project.start_point.unwrap_or(self.default_start)
    }

    /// Overrides the entrance for this store, or reverts to the configured
    /// default with `None`.
    pub fn set_start_point(&mut self, start: Option<Cell>) -> ProjectResult<()> {
        if let Some(cell) = start {
            self.project.grid.check(cell)?;
        }
        if self.project.start_point != start {
            self.project.start_point = start;
            self.modified = true;
        }
        Ok(())
    }

    /// Adds a product sold in the store to the shopping list. Returns `false`
    /// if it was already listed.
    pub fn add_to_list(&mut self, product: &str) -> ProjectResult<bool> {
        if !self.catalog.is_active(product) {
            return Err(PlacementError::UnknownProduct {
                product: product.to_string(),
            }
            .into());
        }
        Ok(self.list.add(product))
    }

    pub fn remove_from_list(&mut self, product: &str) -> bool {
        self.list.remove(product)
    }

    pub fn clear_list(&mut self) {
        self.list.clear();
    }

    /// Replaces the shopping list, dropping products not sold in the store.
    /// Returns the dropped products.
    pub fn set_shopping_list(&mut self, list: ShoppingList) -> Vec<String> {
        let dropped: Vec<String> = list
            .products()
            .iter()
            .filter(|p| !self.catalog.is_active(p))
            .cloned()
            .collect();
        self.list = list;
        let catalog = &self.catalog;
        self.list.retain(|product| catalog.is_active(product));
        if !dropped.is_empty() {
            debug!(count = dropped.len(), "unsold products dropped from list");
        }
        dropped
    }

    /// Replaces the shopping list with `count` random products sold in the
    /// store.
    pub fn random_list<R: Rng + ?Sized>(&mut self, count: usize, rng: &mut R) -> &ShoppingList {
        self.list = ShoppingList::random(self.catalog.active_products(), count, rng);
        &self.list
    }

    /// Configured size for random lists.
    pub fn default_random_list_size(&self) -> usize {
        self.random_list_size
    }

    /// Shopping list as text, headed with the store name.
    ///
    /// Projects without a store name use the configured default.
    pub fn export_list_text(&self) -> String {
        let store_name = if self.project.store_name.trim().is_empty() {
            &self.default_store_name
        } else {
            &self.project.store_name
        };
        self.list.export_text(store_name)
    }

    /// Visiting order for the current shopping list.
    pub fn compute_route(&self) -> Route {
        RouteOptimizer::new(self.start_point())
            .within(self.project.grid)
            .optimize(&self.list, &self.project.placements)
    }

    /// Saves to the current file, or to `"{name}.json"` for a new project.
    /// Returns the path written.
    pub fn save(&mut self) -> ProjectResult<PathBuf> {
        let path = self
            .project_path
            .clone()
            .unwrap_or_else(|| PathBuf::from(self.project.default_file_name()));
        self.save_as(&path)?;
        Ok(path)
    }

    /// Saves to `path` and makes it the session's file.
    ///
    /// The plan path is stored relative to the new directory when the plan
    /// lives there, and made absolute when a relative path would break.
    /// On failure the session is unchanged.
    pub fn save_as(&mut self, path: impl AsRef<Path>) -> ProjectResult<()> {
        let path = path.as_ref();
        let mut project = self.project.clone();

        let old_dir = self
            .project_path
            .as_deref()
            .map(parent_dir)
            .unwrap_or_else(|| Path::new("."));
        let new_dir = parent_dir(path);
        if let Ok(relative) = self.plan_path.strip_prefix(new_dir) {
            project.plan_path = relative.to_path_buf();
        } else if project.plan_path.is_relative() && old_dir != new_dir {
            project.plan_path = std::path::absolute(&self.plan_path)?;
        }

        self.store.save(&project, path)?;

        self.project = project;
        self.project_path = Some(path.to_path_buf());
        self.modified = false;
        Ok(())
    }

    /// Registers a handler run after every placement mutation.
    pub fn on_placement_changed<F>(&mut self, handler: F) -> SubscriptionId
    where
        F: FnMut(&PlacementChange) + 'static,
    {
        self.observers.subscribe(ChangeFilter::MutationsOnly, handler)
    }

    /// Registers a handler with an explicit filter.
    pub fn subscribe<F>(&mut self, filter: ChangeFilter, handler: F) -> SubscriptionId
    where
        F: FnMut(&PlacementChange) + 'static,
    {
        self.observers.subscribe(filter, handler)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.observers.unsubscribe(id)
    }

    fn record(&mut self, change: &PlacementChange) {
        if change.is_mutation() {
            self.modified = true;
        }
        self.observers.publish(change);
    }
}
