//! Product catalog
//!
//! This module provides:
//! - The catalog of known products, grouped by category
//! - The active product set: the subset sold in the current store
//!
//! Catalog files are JSON objects mapping a category name to an array of
//! product names. Category and product order from the file is preserved.

use std::collections::HashSet;
use std::path::Path;

use serde_json::Value;
use tracing::{debug, warn};

use crate::error::CatalogError;

/// A named group of products.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
    pub name: String,
    pub products: Vec<String>,
}

/// Known products plus the active subset for one store.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductCatalog {
    categories: Vec<Category>,
    active: Vec<String>,
    active_lookup: HashSet<String>,
}

impl ProductCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads categories from a catalog file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(CatalogError::NotFound(path.to_path_buf()));
        }
        let content = std::fs::read_to_string(path)?;
        let catalog = Self::from_json_str(&content)?;
        debug!(
            path = %path.display(),
            categories = catalog.categories.len(),
            "catalog loaded"
        );
        Ok(catalog)
    }

    /// Parses a catalog from its JSON text.
    pub fn from_json_str(content: &str) -> Result<Self, CatalogError> {
        let value: Value =
            serde_json::from_str(content).map_err(|e| CatalogError::Malformed(e.to_string()))?;
        let Value::Object(map) = value else {
            return Err(CatalogError::Malformed(
                "expected an object of category -> products".to_string(),
            ));
        };

        let mut categories = Vec::with_capacity(map.len());
        for (name, products) in map {
            let Value::Array(items) = products else {
                return Err(CatalogError::Malformed(format!(
                    "category '{}' is not an array",
                    name
                )));
            };
            let products = items
                .into_iter()
                .map(|item| match item {
                    Value::String(s) => Ok(s),
                    other => Err(CatalogError::Malformed(format!(
                        "category '{}' contains a non-string entry: {}",
                        name, other
                    ))),
                })
                .collect::<Result<Vec<_>, _>>()?;
            categories.push(Category { name, products });
        }

        Ok(Self {
            categories,
            ..Self::default()
        })
    }

    /// Category names in file order.
    pub fn categories(&self) -> impl Iterator<Item = &str> + '_ {
        self.categories.iter().map(|c| c.name.as_str())
    }

    /// Products of `category`, empty if the category is unknown.
    pub fn products_in(&self, category: &str) -> &[String] {
        self.categories
            .iter()
            .find(|c| c.name == category)
            .map(|c| c.products.as_slice())
            .unwrap_or(&[])
    }

    /// Every known product, sorted and de-duplicated.
    pub fn all_products(&self) -> Vec<String> {
        let mut all: Vec<String> = self
            .categories
            .iter()
            .flat_map(|c| c.products.iter().cloned())
            .collect();
        all.sort();
        all.dedup();
        all
    }

    /// First category listing `product`.
    pub fn category_of(&self, product: &str) -> Option<&str> {
        self.categories
            .iter()
            .find(|c| c.products.iter().any(|p| p == product))
            .map(|c| c.name.as_str())
    }

    pub fn contains(&self, product: &str) -> bool {
        self.category_of(product).is_some()
    }

    /// Replaces the active product set.
    ///
    /// Duplicates are dropped, first occurrence wins. Products unknown to the
    /// catalog are accepted (projects may outlive catalog edits) but logged.
    /// Returns whether the set differs from the previous one.
    pub fn set_active_products(&mut self, products: impl IntoIterator<Item = String>) -> bool {
        let mut lookup = HashSet::new();
        let mut active = Vec::new();
        for product in products {
            if lookup.insert(product.clone()) {
                active.push(product);
            }
        }

        if !self.categories.is_empty() {
            for product in active.iter().filter(|p| !self.contains(p)) {
                warn!(product = %product, "active product is not in the catalog");
            }
        }

        let changed = active != self.active;
        self.active = active;
        self.active_lookup = lookup;
        changed
    }

    /// Active products in selection order.
    pub fn active_products(&self) -> &[String] {
        &self.active
    }

    pub fn is_active(&self, product: &str) -> bool {
        self.active_lookup.contains(product)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CATALOG: &str = r#"{
        "Légumes": ["Carottes", "Poireaux"],
        "Fruits": ["Pommes", "Bananes"],
        "Boissons": ["Eau", "Jus d'orange", "Pommes"]
    }"#;

    #[test]
    fn test_category_order_is_preserved() {
        let catalog = ProductCatalog::from_json_str(CATALOG).unwrap();
        let categories: Vec<&str> = catalog.categories().collect();
        assert_eq!(categories, vec!["Légumes", "Fruits", "Boissons"]);
        assert_eq!(catalog.products_in("Fruits"), ["Pommes", "Bananes"]);
        assert!(catalog.products_in("Surgelés").is_empty());
    }

    #[test]
    fn test_all_products_sorted_and_unique() {
        let catalog = ProductCatalog::from_json_str(CATALOG).unwrap();
        assert_eq!(
            catalog.all_products(),
            vec!["Bananes", "Carottes", "Eau", "Jus d'orange", "Poireaux", "Pommes"]
        );
        assert_eq!(catalog.category_of("Pommes"), Some("Fruits"));
    }

    #[test]
    fn test_malformed_catalogs() {
        assert!(matches!(
            ProductCatalog::from_json_str("[1, 2]"),
            Err(CatalogError::Malformed(_))
        ));
        assert!(matches!(
            ProductCatalog::from_json_str(r#"{"Fruits": "Pommes"}"#),
            Err(CatalogError::Malformed(_))
        ));
        assert!(matches!(
            ProductCatalog::from_json_str(r#"{"Fruits": [1]}"#),
            Err(CatalogError::Malformed(_))
        ));
        assert!(ProductCatalog::from_json_str("{").is_err());
    }

    #[test]
    fn test_missing_file() {
        let err = ProductCatalog::load("/nonexistent/produits.json").unwrap_err();
        assert!(matches!(err, CatalogError::NotFound(_)));
    }

    #[test]
    fn test_active_set_dedups_and_keeps_order() {
        let mut catalog = ProductCatalog::from_json_str(CATALOG).unwrap();
        let changed = catalog.set_active_products(
            ["Eau", "Pommes", "Eau", "Carottes"]
                .into_iter()
                .map(String::from),
        );
        assert!(changed);
        assert_eq!(catalog.active_products(), ["Eau", "Pommes", "Carottes"]);
        assert!(catalog.is_active("Pommes"));
        assert!(!catalog.is_active("Bananes"));

        let changed = catalog.set_active_products(
            ["Eau", "Pommes", "Carottes"].into_iter().map(String::from),
        );
        assert!(!changed);
    }
}
