//! Explicit cache for "starting from" price hints.

use std::collections::HashMap;

use crate::calculator::{min_base_by_tier, PriceSchedule, TierPrices};
use crate::model::PricingMatrix;

/// Minimum base price per tier, memoized per data-source identity.
///
/// Owned by the caller. Sheet contents change outside the process, so
/// callers refresh or invalidate an entry when they reload that source.
#[derive(Debug, Clone, Default)]
pub struct MinPriceCache {
    entries: HashMap<String, TierPrices>,
}

impl MinPriceCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, source: &str) -> Option<TierPrices> {
        self.entries.get(source).copied()
    }

    /// Recompute from a freshly built matrix and store it.
    pub fn refresh(&mut self, source: &str, matrix: &PricingMatrix, schedule: &PriceSchedule) -> TierPrices {
        let prices = min_base_by_tier(matrix, schedule);
        self.entries.insert(source.to_string(), prices);
        prices
    }

    /// Cached value, or build the matrix with `load` and cache the result.
    pub fn get_or_refresh<F>(&mut self, source: &str, schedule: &PriceSchedule, load: F) -> TierPrices
    where
        F: FnOnce() -> PricingMatrix,
    {
        if let Some(prices) = self.get(source) {
            return prices;
        }
        let matrix = load();
        self.refresh(source, &matrix, schedule)
    }

    /// Drop one source's entry. Returns whether it was present.
    pub fn invalidate(&mut self, source: &str) -> bool {
        self.entries.remove(source).is_some()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
