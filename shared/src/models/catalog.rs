//! Catalog Model
//!
//! Read-only menu data. Prices are `Decimal` in currency units.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// 菜单类别 (食物 / 饮品)
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ItemKind {
    Food,
    Drink,
}

impl ItemKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ItemKind::Food => "food",
            ItemKind::Drink => "drink",
        }
    }
}

/// Option group selection mode
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum SelectionMode {
    /// Exactly one choice (radio)
    #[default]
    Single,
    /// Any subset of choices (checkbox)
    Multiple,
}

/// A selectable add-on inside an option group
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Choice {
    pub name: String,
    /// Surcharge in currency units (>= 0)
    #[serde(default)]
    pub surcharge: Decimal,
}

impl Choice {
    pub fn new(name: impl Into<String>, surcharge: Decimal) -> Self {
        Self {
            name: name.into(),
            surcharge,
        }
    }
}

/// Named set of choices attached to a catalog item
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OptionGroup {
    pub name: String,
    #[serde(default)]
    pub mode: SelectionMode,
    #[serde(default)]
    pub required: bool,
    pub choices: Vec<Choice>,
}

impl OptionGroup {
    /// Look up a choice by name
    pub fn choice(&self, name: &str) -> Option<&Choice> {
        self.choices.iter().find(|c| c.name == name)
    }
}

/// Menu item as served by the catalog
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CatalogItem {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub image: String,
    /// Base price before option surcharges
    pub price: Decimal,
    pub kind: ItemKind,
    /// Category key, e.g. "mains" or "hot"
    pub category: String,
    /// Option groups, in display order
    #[serde(default)]
    pub options: Vec<OptionGroup>,
}

impl CatalogItem {
    /// Whether the item has anything to customize
    pub fn has_options(&self) -> bool {
        !self.options.is_empty()
    }

    /// Look up an option group by name
    pub fn group(&self, name: &str) -> Option<&OptionGroup> {
        self.options.iter().find(|g| g.name == name)
    }
}
