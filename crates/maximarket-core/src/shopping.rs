//! Shopping lists: ordered, duplicate-free product selections.
//!
//! Lists can be exported as plain text for printing and saved to or loaded
//! from a small JSON document (`{"nom": ..., "produits": [...]}`).

use std::path::Path;

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ListError;

/// Name given to a list that was never named.
pub const DEFAULT_LIST_NAME: &str = "Nouvelle liste";

/// Name given to a loaded list file that carries no name.
pub const LOADED_LIST_NAME: &str = "Liste chargée";

/// Width of the dashed separator in text exports.
const SEPARATOR_WIDTH: usize = 40;

/// Ordered set of product names to buy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "ListFile")]
pub struct ShoppingList {
    #[serde(rename = "nom")]
    name: String,
    #[serde(rename = "produits")]
    products: Vec<String>,
}

/// List document as written on disk, before repeats are collapsed.
#[derive(Deserialize)]
struct ListFile {
    #[serde(default = "loaded_list_name")]
    nom: String,
    #[serde(default)]
    produits: Vec<String>,
}

impl From<ListFile> for ShoppingList {
    fn from(file: ListFile) -> Self {
        let mut list = Self::from_products(file.produits);
        list.name = file.nom;
        list
    }
}

fn loaded_list_name() -> String {
    LOADED_LIST_NAME.to_string()
}

impl Default for ShoppingList {
    fn default() -> Self {
        Self::new()
    }
}

impl ShoppingList {
    pub fn new() -> Self {
        Self::with_name(DEFAULT_LIST_NAME)
    }

    pub fn with_name(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            products: Vec::new(),
        }
    }

    /// Builds a list from `products`, silently skipping repeats.
    pub fn from_products(products: impl IntoIterator<Item = String>) -> Self {
        let mut list = Self::new();
        for product in products {
            list.add(product);
        }
        list
    }

    /// Picks `count` distinct products at random from `candidates`.
    ///
    /// Asking for more products than there are candidates returns all of them
    /// in random order.
    pub fn random<R: Rng + ?Sized>(candidates: &[String], count: usize, rng: &mut R) -> Self {
        let mut unique = candidates.to_vec();
        unique.sort();
        unique.dedup();
        let n = count.min(unique.len());
        Self::from_products(unique.choose_multiple(rng, n).cloned())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// Appends `product`. Returns `false` if it was already on the list.
    pub fn add(&mut self, product: impl Into<String>) -> bool {
        let product = product.into();
        if self.contains(&product) {
            return false;
        }
        self.products.push(product);
        true
    }

    /// Removes `product`. Returns `false` if it was not on the list.
    pub fn remove(&mut self, product: &str) -> bool {
        let before = self.products.len();
        self.products.retain(|p| p != product);
        self.products.len() != before
    }

    /// Keeps only the products for which `keep` returns true.
    pub fn retain(&mut self, mut keep: impl FnMut(&str) -> bool) {
        self.products.retain(|p| keep(p));
    }

    pub fn clear(&mut self) {
        self.products.clear();
    }

    pub fn contains(&self, product: &str) -> bool {
        self.products.iter().any(|p| p == product)
    }

    pub fn products(&self) -> &[String] {
        &self.products
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    /// Plain-text rendering for printing.
    pub fn export_text(&self, store_name: &str) -> String {
        let mut out = format!("Liste de courses - {}\n", store_name);
        out.push_str(&"-".repeat(SEPARATOR_WIDTH));
        out.push('\n');
        for product in &self.products {
            out.push_str(product);
            out.push('\n');
        }
        out
    }

    /// Writes [`ShoppingList::export_text`] to `path`.
    pub fn write_text(&self, path: impl AsRef<Path>, store_name: &str) -> Result<(), ListError> {
        std::fs::write(path.as_ref(), self.export_text(store_name))?;
        debug!(path = %path.as_ref().display(), items = self.len(), "shopping list exported");
        Ok(())
    }

    /// Saves the list as JSON.
    pub fn save_json(&self, path: impl AsRef<Path>) -> Result<(), ListError> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path.as_ref(), json)?;
        Ok(())
    }

    /// Loads a list saved with [`ShoppingList::save_json`].
    ///
    /// Repeated entries in the file are collapsed.
    pub fn load_json(path: impl AsRef<Path>) -> Result<Self, ListError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Ok(serde_json::from_str(&content)?)
    }
}
