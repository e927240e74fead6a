//! Shopping route planning.
//!
//! Orders the placed products of a shopping list into a walking sequence with
//! the nearest-neighbor heuristic: starting at the store entrance, repeatedly
//! walk to the closest product not yet collected. Distances are straight lines
//! between cell coordinates; aisles and walls are ignored.
//!
//! The result is deterministic. When two products are equally close, the one
//! appearing first in the shopping list wins.

use std::fmt;

use tracing::debug;

use crate::geometry::{Cell, GridDimensions};
use crate::placement::PlacementIndex;
use crate::shopping::ShoppingList;

/// Euclidean distance between two cells.
pub fn distance(a: Cell, b: Cell) -> f64 {
    a.distance_to(&b)
}

/// One stop of a route.
#[derive(Debug, Clone, PartialEq)]
pub struct Stop {
    pub product: String,
    pub cell: Cell,
    /// Distance walked from the previous stop (or the start point).
    pub leg_distance: f64,
}

/// A computed visiting order.
#[derive(Debug, Clone, PartialEq)]
pub struct Route {
    start: Cell,
    stops: Vec<Stop>,
    skipped: Vec<String>,
}

impl Route {
    /// The entrance the route starts from. Not itself a stop.
    pub fn start(&self) -> Cell {
        self.start
    }

    pub fn stops(&self) -> &[Stop] {
        &self.stops
    }

    /// Products of the list that could not be visited because they have no
    /// reachable placement, in list order.
    pub fn skipped(&self) -> &[String] {
        &self.skipped
    }

    pub fn len(&self) -> usize {
        self.stops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stops.is_empty()
    }

    /// `(product, cell)` pairs in visiting order.
    pub fn pairs(&self) -> impl Iterator<Item = (&str, Cell)> + '_ {
        self.stops.iter().map(|s| (s.product.as_str(), s.cell))
    }

    /// `(from, to, distance)` for every leg, starting at the entrance.
    pub fn legs(&self) -> Vec<(Cell, Cell, f64)> {
        let mut from = self.start;
        self.stops
            .iter()
            .map(|stop| {
                let leg = (from, stop.cell, stop.leg_distance);
                from = stop.cell;
                leg
            })
            .collect()
    }

    /// Sum of all leg distances.
    pub fn total_distance(&self) -> f64 {
        self.stops.iter().map(|s| s.leg_distance).sum()
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Start {}", self.start)?;
        for stop in &self.stops {
            write!(f, " -> {} {}", stop.product, stop.cell)?;
        }
        write!(f, " | {:.2} cells", self.total_distance())
    }
}

/// Greedy nearest-neighbor route planner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RouteOptimizer {
    start: Cell,
    bounds: Option<GridDimensions>,
}

impl RouteOptimizer {
    /// Planner starting at `start`, the store entrance.
    pub fn new(start: Cell) -> Self {
        Self { start, bounds: None }
    }

    /// Ignores placements outside `dims` (left behind by a grid shrink).
    pub fn within(mut self, dims: GridDimensions) -> Self {
        self.bounds = Some(dims);
        self
    }

    pub fn start(&self) -> Cell {
        self.start
    }

    /// Orders the placed products of `list`.
    ///
    /// Products without a placement are left out of the stops and reported in
    /// [`Route::skipped`]. Runs in O(n^2) over the placed products.
    pub fn optimize(&self, list: &ShoppingList, index: &PlacementIndex) -> Route {
        let mut remaining: Vec<(&str, Cell)> = Vec::with_capacity(list.len());
        let mut skipped = Vec::new();
        for product in list.products() {
            match index.position_of(product) {
                Some(cell) if self.bounds.map_or(true, |dims| dims.contains(cell)) => {
                    remaining.push((product.as_str(), cell));
                }
                _ => skipped.push(product.clone()),
            }
        }

        let mut stops = Vec::with_capacity(remaining.len());
        let mut current = self.start;
        while !remaining.is_empty() {
            let mut best = 0;
            let mut best_distance = distance(current, remaining[0].1);
            for (i, (_, cell)) in remaining.iter().enumerate().skip(1) {
                let d = distance(current, *cell);
                // Strict comparison keeps the earliest candidate on ties.
                if d < best_distance {
                    best = i;
                    best_distance = d;
                }
            }

            // `remove` keeps list order for the tie-break on later steps.
            let (product, cell) = remaining.remove(best);
            stops.push(Stop {
                product: product.to_string(),
                cell,
                leg_distance: best_distance,
            });
            current = cell;
        }

        let route = Route {
            start: self.start,
            stops,
            skipped,
        };
        debug!(
            stops = route.len(),
            skipped = route.skipped.len(),
            total = route.total_distance(),
            "route computed"
        );
        route
    }
}
