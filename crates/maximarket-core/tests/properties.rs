use std::collections::HashSet;

use maximarket_core::{Cell, PlacementIndex, ProductCatalog, RouteOptimizer, ShoppingList};
use proptest::prelude::*;

const PRODUCTS: [&str; 6] = ["Pommes", "Lait", "Pain", "Eau", "Riz", "Café"];

fn catalog() -> ProductCatalog {
    let mut catalog = ProductCatalog::new();
    catalog.set_active_products(PRODUCTS.iter().map(|p| p.to_string()));
    catalog
}

#[derive(Debug, Clone)]
enum Op {
    Place(usize, i32, i32),
    Remove(i32, i32),
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        3 => (0..PRODUCTS.len(), 0i32..5, 0i32..5).prop_map(|(p, x, y)| Op::Place(p, x, y)),
        1 => (0i32..5, 0i32..5).prop_map(|(x, y)| Op::Remove(x, y)),
    ]
}

fn assert_consistent(index: &PlacementIndex) {
    let mut products = HashSet::new();
    for (cell, product) in index.iter() {
        assert!(products.insert(product.to_string()), "{} placed twice", product);
        assert_eq!(index.position_of(product), Some(cell));
        assert_eq!(index.product_at(cell), Some(product));
    }
    for product in PRODUCTS {
        if let Some(cell) = index.position_of(product) {
            assert_eq!(index.product_at(cell), Some(product));
        }
    }
    assert_eq!(products.len(), index.len());
}

/// Distinct cells for up to six products, plus a shuffled shopping list that
/// may mention products with no placement.
fn scenario() -> impl Strategy<Value = (Vec<(usize, Cell)>, Vec<usize>, Cell)> {
    let cells = proptest::collection::hash_set((0i32..47, 0i32..24), 0..=PRODUCTS.len());
    let list = Just((0..PRODUCTS.len()).collect::<Vec<_>>()).prop_shuffle();
    let start = (0i32..47, 0i32..24).prop_map(Cell::from);
    (cells, list, start).prop_map(|(cells, list, start)| {
        let placements = cells
            .into_iter()
            .enumerate()
            .map(|(i, c)| (i, Cell::from(c)))
            .collect();
        (placements, list, start)
    })
}

fn build(placements: &[(usize, Cell)], list: &[usize]) -> (PlacementIndex, ShoppingList) {
    let catalog = catalog();
    let mut index = PlacementIndex::new();
    for (product, cell) in placements {
        index.place(PRODUCTS[*product], *cell, &catalog).unwrap();
    }
    let list = ShoppingList::from_products(list.iter().map(|i| PRODUCTS[*i].to_string()));
    (index, list)
}

proptest! {
    /// Invariant: no product in two cells and no cell with two products,
    /// whatever sequence of place/remove calls is applied.
    #[test]
    fn placement_stays_one_to_one(ops in proptest::collection::vec(op_strategy(), 0..60)) {
        let catalog = catalog();
        let mut index = PlacementIndex::new();
        for op in ops {
            match op {
                Op::Place(p, x, y) => {
                    let cell = Cell::new(x, y);
                    let before = index.product_at(cell).map(str::to_string);
                    match index.place(PRODUCTS[p], cell, &catalog) {
                        Ok(_) => prop_assert_eq!(index.product_at(cell), Some(PRODUCTS[p])),
                        Err(_) => prop_assert_eq!(index.product_at(cell).map(str::to_string), before),
                    }
                }
                Op::Remove(x, y) => {
                    index.remove(Cell::new(x, y));
                    prop_assert!(index.product_at(Cell::new(x, y)).is_none());
                }
            }
            assert_consistent(&index);
        }
    }

    /// Invariant: every stop is a placed list member, every unplaced member is
    /// absent, and nothing is visited twice.
    #[test]
    fn route_is_complete((placements, order, start) in scenario()) {
        let (index, list) = build(&placements, &order);
        let route = RouteOptimizer::new(start).optimize(&list, &index);

        let mut visited = HashSet::new();
        for (product, cell) in route.pairs() {
            prop_assert!(list.contains(product));
            prop_assert_eq!(index.position_of(product), Some(cell));
            prop_assert!(visited.insert(product.to_string()));
        }
        for product in list.products() {
            prop_assert_eq!(visited.contains(product), index.is_placed(product));
        }
        prop_assert_eq!(route.len() + route.skipped().len(), list.len());
    }

    /// Invariant: each step walks to a closest unvisited product.
    #[test]
    fn route_steps_are_greedy((placements, order, start) in scenario()) {
        let (index, list) = build(&placements, &order);
        let route = RouteOptimizer::new(start).optimize(&list, &index);

        let mut current = start;
        for (i, stop) in route.stops().iter().enumerate() {
            let chosen = current.distance_to(&stop.cell);
            for later in &route.stops()[i + 1..] {
                prop_assert!(chosen <= current.distance_to(&later.cell));
            }
            current = stop.cell;
        }
    }

    /// Invariant: identical inputs give identical routes.
    #[test]
    fn route_is_deterministic((placements, order, start) in scenario()) {
        let (index, list) = build(&placements, &order);
        let optimizer = RouteOptimizer::new(start);
        let first = optimizer.optimize(&list, &index);
        let second = optimizer.optimize(&list, &index.clone());
        prop_assert_eq!(first.to_string(), second.to_string());
        prop_assert_eq!(first, second);
    }
}
