//! Menu filters (category + price window)

use super::catalog::{CatalogItem, ItemKind};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Category value that matches everything
pub const ALL_CATEGORIES: &str = "all";

/// Quick price presets
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum PriceRange {
    #[default]
    All,
    Budget,
    Mid,
    Premium,
}

impl PriceRange {
    /// Inclusive price window of a preset for the given menu
    pub fn bounds(&self, kind: ItemKind) -> (Decimal, Decimal) {
        let d = |v: i64| Decimal::from(v);
        match (kind, self) {
            (ItemKind::Food, PriceRange::All) => (d(0), d(30)),
            (ItemKind::Food, PriceRange::Budget) => (d(0), d(15)),
            (ItemKind::Food, PriceRange::Mid) => (d(15), d(20)),
            (ItemKind::Food, PriceRange::Premium) => (d(20), d(30)),
            (ItemKind::Drink, PriceRange::All) => (d(0), d(15)),
            (ItemKind::Drink, PriceRange::Budget) => (d(0), d(5)),
            (ItemKind::Drink, PriceRange::Mid) => (d(5), d(8)),
            (ItemKind::Drink, PriceRange::Premium) => (d(8), d(15)),
        }
    }
}

/// Filter state of one menu screen
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MenuFilter {
    pub kind: ItemKind,
    pub category: String,
    pub price_min: Decimal,
    pub price_max: Decimal,
    pub range: PriceRange,
}

impl MenuFilter {
    /// Default filter: every category, full price window
    pub fn new(kind: ItemKind) -> Self {
        let (price_min, price_max) = PriceRange::All.bounds(kind);
        Self {
            kind,
            category: ALL_CATEGORIES.to_string(),
            price_min,
            price_max,
            range: PriceRange::All,
        }
    }

    /// Select a category; the price preset goes back to `All`
    pub fn set_category(&mut self, category: impl Into<String>) {
        self.category = category.into();
        self.set_range(PriceRange::All);
    }

    /// Apply a quick price preset
    pub fn set_range(&mut self, range: PriceRange) {
        let (min, max) = range.bounds(self.kind);
        self.price_min = min;
        self.price_max = max;
        self.range = range;
    }

    /// Custom price window
    pub fn set_price_window(&mut self, min: Decimal, max: Decimal) {
        self.price_min = min.min(max);
        self.price_max = max.max(min);
        self.range = PriceRange::All;
    }

    pub fn reset(&mut self) {
        *self = Self::new(self.kind);
    }

    pub fn matches(&self, item: &CatalogItem) -> bool {
        if self.category != ALL_CATEGORIES && item.category != self.category {
            return false;
        }
        item.price >= self.price_min && item.price <= self.price_max
    }

    /// Keep matching items, preserving catalog order
    pub fn apply(&self, items: Vec<CatalogItem>) -> Vec<CatalogItem> {
        items.into_iter().filter(|i| self.matches(i)).collect()
    }
}
