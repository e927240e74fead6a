//! Placement index: which product sits in which grid cell.
//!
//! The index is bidirectional. The forward map is ordered by cell so iteration
//! and serialization are deterministic; the reverse map gives constant-time
//! product lookups. Every mutation updates both sides together, so a product is
//! never bound to two cells and a cell never holds two products.

use std::collections::{BTreeMap, HashMap};
use std::fmt;

use tracing::debug;

use crate::catalog::ProductCatalog;
use crate::error::PlacementError;
use crate::geometry::{Cell, GridDimensions};

/// Describes the effect of a placement mutation.
///
/// Returned by the mutating operations of [`PlacementIndex`] and handed to
/// placement observers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlacementChange {
    /// Product now occupies `cell`. `previous` is the cell it was moved from.
    Placed {
        product: String,
        cell: Cell,
        previous: Option<Cell>,
    },
    /// Product was already in `cell`; nothing changed.
    Unchanged { product: String, cell: Cell },
    /// `cell` was vacated.
    Removed { product: String, cell: Cell },
    /// Every placement was dropped.
    Cleared { count: usize },
}

impl PlacementChange {
    /// Whether the index contents changed.
    pub fn is_mutation(&self) -> bool {
        match self {
            Self::Unchanged { .. } => false,
            Self::Cleared { count } => *count > 0,
            _ => true,
        }
    }
}

impl fmt::Display for PlacementChange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Placed {
                product,
                cell,
                previous: Some(from),
            } => write!(f, "Moved '{}' from {} to {}", product, from, cell),
            Self::Placed { product, cell, .. } => write!(f, "Placed '{}' at {}", product, cell),
            Self::Unchanged { product, cell } => write!(f, "'{}' already at {}", product, cell),
            Self::Removed { product, cell } => write!(f, "Removed '{}' from {}", product, cell),
            Self::Cleared { count } => write!(f, "Cleared {} placements", count),
        }
    }
}

/// Bidirectional cell <-> product index.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlacementIndex {
    by_cell: BTreeMap<Cell, String>,
    by_product: HashMap<String, Cell>,
}

impl PlacementIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Places `product` in `cell`.
    ///
    /// Fails with [`PlacementError::UnknownProduct`] if the product is not in
    /// the catalog's active set, and with [`PlacementError::OccupiedCell`] if
    /// another product holds the cell; the occupant must be removed first.
    /// A product already placed elsewhere is moved: its old cell is vacated.
    pub fn place(
        &mut self,
        product: &str,
        cell: Cell,
        catalog: &ProductCatalog,
    ) -> Result<PlacementChange, PlacementError> {
        if !catalog.is_active(product) {
            return Err(PlacementError::UnknownProduct {
                product: product.to_string(),
            });
        }

        if let Some(occupant) = self.by_cell.get(&cell) {
            if occupant == product {
                return Ok(PlacementChange::Unchanged {
                    product: product.to_string(),
                    cell,
                });
            }
            return Err(PlacementError::OccupiedCell {
                cell,
                occupant: occupant.clone(),
            });
        }

        let previous = self.by_product.insert(product.to_string(), cell);
        if let Some(old) = previous {
            self.by_cell.remove(&old);
        }
        self.by_cell.insert(cell, product.to_string());
        debug!(product, %cell, ?previous, "product placed");

        Ok(PlacementChange::Placed {
            product: product.to_string(),
            cell,
            previous,
        })
    }

    /// Vacates `cell`. Returns `None` when it was already empty.
    pub fn remove(&mut self, cell: Cell) -> Option<PlacementChange> {
        let product = self.by_cell.remove(&cell)?;
        self.by_product.remove(&product);
        debug!(product = %product, %cell, "placement removed");
        Some(PlacementChange::Removed { product, cell })
    }

    /// Vacates the cell held by `product`.
    pub fn remove_product(&mut self, product: &str) -> Result<PlacementChange, PlacementError> {
        let cell = self
            .position_of(product)
            .ok_or_else(|| PlacementError::NotPlaced {
                product: product.to_string(),
            })?;
        self.remove(cell).ok_or_else(|| PlacementError::NotPlaced {
            product: product.to_string(),
        })
    }

    /// Drops every placement.
    pub fn clear(&mut self) -> PlacementChange {
        let count = self.by_cell.len();
        self.by_cell.clear();
        self.by_product.clear();
        PlacementChange::Cleared { count }
    }

    /// Cell holding `product`, if any.
    pub fn position_of(&self, product: &str) -> Option<Cell> {
        self.by_product.get(product).copied()
    }

    /// Product in `cell`, if any.
    pub fn product_at(&self, cell: Cell) -> Option<&str> {
        self.by_cell.get(&cell).map(String::as_str)
    }

    pub fn is_placed(&self, product: &str) -> bool {
        self.by_product.contains_key(product)
    }

    pub fn len(&self) -> usize {
        self.by_cell.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_cell.is_empty()
    }

    /// Iterates placements ordered by cell (x, then y).
    pub fn iter(&self) -> impl Iterator<Item = (Cell, &str)> + '_ {
        self.by_cell.iter().map(|(cell, product)| (*cell, product.as_str()))
    }

    /// Placements whose cell lies outside `dims`, in cell order.
    pub fn out_of_bounds(&self, dims: GridDimensions) -> Vec<(Cell, String)> {
        self.by_cell
            .iter()
            .filter(|(cell, _)| !dims.contains(**cell))
            .map(|(cell, product)| (*cell, product.clone()))
            .collect()
    }

    /// Removes placements outside `dims` and returns one change per removal.
    pub fn prune_out_of_bounds(&mut self, dims: GridDimensions) -> Vec<PlacementChange> {
        self.out_of_bounds(dims)
            .into_iter()
            .filter_map(|(cell, _)| self.remove(cell))
            .collect()
    }
}
