//! Placement observers.
//!
//! A synchronous handler registry: the owner of a [`crate::PlacementIndex`]
//! publishes each [`PlacementChange`] after applying it, and every subscribed
//! handler runs inline, in subscription order, before `publish` returns.

use std::fmt;

use tracing::debug;
use uuid::Uuid;

use crate::placement::PlacementChange;

/// Subscription handle for unsubscribing from placement changes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(Uuid);

impl SubscriptionId {
    fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Sub({})", &self.0.to_string()[..8])
    }
}

/// Which changes a handler wants to see
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ChangeFilter {
    /// Every published change, including no-ops.
    #[default]
    All,
    /// Only changes that altered the index.
    MutationsOnly,
}

impl ChangeFilter {
    pub fn matches(&self, change: &PlacementChange) -> bool {
        match self {
            ChangeFilter::All => true,
            ChangeFilter::MutationsOnly => change.is_mutation(),
        }
    }
}

type ChangeHandler = Box<dyn FnMut(&PlacementChange)>;

/// Registry of placement change handlers.
#[derive(Default)]
pub struct PlacementObservers {
    handlers: Vec<(SubscriptionId, ChangeFilter, ChangeHandler)>,
}

impl PlacementObservers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `handler` and returns its subscription id.
    pub fn subscribe<F>(&mut self, filter: ChangeFilter, handler: F) -> SubscriptionId
    where
        F: FnMut(&PlacementChange) + 'static,
    {
        let id = SubscriptionId::new();
        self.handlers.push((id, filter, Box::new(handler)));
        debug!("Subscription {} added", id);
        id
    }

    /// Returns true if the subscription was found and removed.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.handlers.len();
        self.handlers.retain(|(sub, _, _)| *sub != id);
        let removed = self.handlers.len() != before;
        if removed {
            debug!("Subscription {} removed", id);
        }
        removed
    }

    /// Runs every matching handler with `change`.
    pub fn publish(&mut self, change: &PlacementChange) {
        for (_, filter, handler) in self.handlers.iter_mut() {
            if filter.matches(change) {
                handler(change);
            }
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.handlers.len()
    }
}

impl fmt::Debug for PlacementObservers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PlacementObservers")
            .field("subscribers", &self.handlers.len())
            .finish()
    }
}
