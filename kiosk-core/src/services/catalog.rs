//! Catalog Provider
//!
//! Read-only source of menu items. [`StaticCatalog`] keeps everything in
//! memory; it is either the built-in demo menu or loaded from a JSON array of
//! [`CatalogItem`].

use rust_decimal::Decimal;
use shared::error::{KioskError, KioskResult};
use shared::models::{CatalogItem, Choice, ItemKind, OptionGroup, SelectionMode};
use std::collections::HashSet;
use std::path::Path;

pub trait CatalogProvider: Send + Sync {
    /// Items of one kind, in display order
    fn list_items(&self, kind: ItemKind) -> Vec<CatalogItem>;

    fn find_item(&self, id: i64) -> Option<CatalogItem>;

    /// Distinct categories of one kind, in order of first appearance
    fn categories(&self, kind: ItemKind) -> Vec<String> {
        let mut seen = HashSet::new();
        self.list_items(kind)
            .into_iter()
            .filter_map(|item| seen.insert(item.category.clone()).then_some(item.category))
            .collect()
    }
}

#[derive(Debug, Clone, Default)]
pub struct StaticCatalog {
    items: Vec<CatalogItem>,
}

impl StaticCatalog {
    pub fn new(items: Vec<CatalogItem>) -> KioskResult<Self> {
        let mut ids = HashSet::new();
        for item in &items {
            if !ids.insert(item.id) {
                return Err(KioskError::DataLoad(format!("duplicate item id {}", item.id)));
            }
            if item.price.is_sign_negative() {
                return Err(KioskError::DataLoad(format!(
                    "item {} has a negative price",
                    item.id
                )));
            }
            let negative_surcharge = item
                .options
                .iter()
                .flat_map(|g| g.choices.iter())
                .any(|c| c.surcharge.is_sign_negative());
            if negative_surcharge {
                return Err(KioskError::DataLoad(format!(
                    "item {} has a negative surcharge",
                    item.id
                )));
            }
        }
        Ok(Self { items })
    }

    pub fn from_json(json: &str) -> KioskResult<Self> {
        let items: Vec<CatalogItem> =
            serde_json::from_str(json).map_err(|e| KioskError::DataLoad(e.to_string()))?;
        Self::new(items)
    }

    pub fn load(path: impl AsRef<Path>) -> KioskResult<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .map_err(|e| KioskError::DataLoad(format!("{}: {}", path.display(), e)))?;
        let catalog = Self::from_json(&json)?;
        tracing::info!(path = %path.display(), items = catalog.len(), "Catalog loaded");
        Ok(catalog)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Small demo menu used when no catalog file is configured
    pub fn builtin() -> Self {
        let size = || OptionGroup {
            name: "Size".into(),
            mode: SelectionMode::Single,
            required: true,
            choices: vec![
                Choice::new("Small", Decimal::ZERO),
                Choice::new("Medium", Decimal::new(50, 2)),
                Choice::new("Large", Decimal::new(100, 2)),
            ],
        };
        let items = vec![
            item(1, "Spring Rolls", ItemKind::Food, "appetizers", 650, vec![]),
            item(
                2,
                "Chicken Wings",
                ItemKind::Food,
                "appetizers",
                895,
                vec![OptionGroup {
                    name: "Sauce".into(),
                    mode: SelectionMode::Single,
                    required: true,
                    choices: vec![
                        Choice::new("BBQ", Decimal::ZERO),
                        Choice::new("Buffalo", Decimal::ZERO),
                        Choice::new("Honey Garlic", Decimal::new(50, 2)),
                    ],
                }],
            ),
            item(
                3,
                "Classic Burger",
                ItemKind::Food,
                "mains",
                1450,
                vec![
                    OptionGroup {
                        name: "Doneness".into(),
                        mode: SelectionMode::Single,
                        required: true,
                        choices: vec![
                            Choice::new("Medium Rare", Decimal::ZERO),
                            Choice::new("Medium", Decimal::ZERO),
                            Choice::new("Well Done", Decimal::ZERO),
                        ],
                    },
                    OptionGroup {
                        name: "Extras".into(),
                        mode: SelectionMode::Multiple,
                        required: false,
                        choices: vec![
                            Choice::new("Cheese", Decimal::new(100, 2)),
                            Choice::new("Bacon", Decimal::new(150, 2)),
                            Choice::new("Avocado", Decimal::new(200, 2)),
                        ],
                    },
                ],
            ),
            item(4, "Margherita Pizza", ItemKind::Food, "mains", 1200, vec![]),
            item(5, "Grilled Salmon", ItemKind::Food, "mains", 2250, vec![]),
            item(6, "Chocolate Cake", ItemKind::Food, "desserts", 750, vec![]),
            item(7, "Cappuccino", ItemKind::Drink, "hot", 400, vec![size()]),
            item(8, "Green Tea", ItemKind::Drink, "hot", 300, vec![]),
            item(
                9,
                "Iced Lemonade",
                ItemKind::Drink,
                "cold",
                450,
                vec![OptionGroup {
                    name: "Ice".into(),
                    mode: SelectionMode::Single,
                    required: false,
                    choices: vec![
                        Choice::new("Regular Ice", Decimal::ZERO),
                        Choice::new("Light Ice", Decimal::ZERO),
                        Choice::new("No Ice", Decimal::ZERO),
                    ],
                }],
            ),
            item(10, "Sparkling Water", ItemKind::Drink, "cold", 250, vec![]),
            item(11, "Craft Beer", ItemKind::Drink, "alcoholic", 750, vec![]),
            item(12, "House Red Wine", ItemKind::Drink, "alcoholic", 950, vec![]),
        ];
        Self { items }
    }
}

fn item(
    id: i64,
    name: &str,
    kind: ItemKind,
    category: &str,
    price_cents: i64,
    options: Vec<OptionGroup>,
) -> CatalogItem {
    CatalogItem {
        id,
        name: name.to_string(),
        description: String::new(),
        image: format!("/images/{}.jpg", name.to_lowercase().replace(' ', "-")),
        price: Decimal::new(price_cents, 2),
        kind,
        category: category.to_string(),
        options,
    }
}

impl CatalogProvider for StaticCatalog {
    fn list_items(&self, kind: ItemKind) -> Vec<CatalogItem> {
        self.items.iter().filter(|i| i.kind == kind).cloned().collect()
    }

    fn find_item(&self, id: i64) -> Option<CatalogItem> {
        self.items.iter().find(|i| i.id == id).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_menu_is_valid() {
        let builtin = StaticCatalog::builtin();
        let checked = StaticCatalog::new(builtin.items.clone()).unwrap();
        assert_eq!(checked.len(), builtin.len());
        assert!(!builtin.list_items(ItemKind::Food).is_empty());
        assert!(!builtin.list_items(ItemKind::Drink).is_empty());
        assert!(builtin.find_item(3).unwrap().has_options());
        assert!(builtin.find_item(999).is_none());
    }

    #[test]
    fn test_categories_in_first_seen_order() {
        let catalog = StaticCatalog::builtin();
        assert_eq!(
            catalog.categories(ItemKind::Food),
            vec!["appetizers", "mains", "desserts"]
        );
        assert_eq!(
            catalog.categories(ItemKind::Drink),
            vec!["hot", "cold", "alcoholic"]
        );
    }

    #[test]
    fn test_from_json() {
        let catalog = StaticCatalog::from_json(
            r#"[{"id": 1, "name": "Soup", "price": 5.5, "kind": "food", "category": "appetizers"}]"#,
        )
        .unwrap();
        assert_eq!(catalog.find_item(1).unwrap().price, Decimal::new(55, 1));
    }

    #[test]
    fn test_rejects_bad_data() {
        assert!(matches!(
            StaticCatalog::from_json("{not json"),
            Err(KioskError::DataLoad(_))
        ));
        let dup = r#"[
            {"id": 1, "name": "A", "price": "1", "kind": "food", "category": "mains"},
            {"id": 1, "name": "B", "price": "2", "kind": "food", "category": "mains"}
        ]"#;
        assert!(StaticCatalog::from_json(dup).is_err());
        let negative = r#"[{"id": 1, "name": "A", "price": "-1", "kind": "food", "category": "mains"}]"#;
        assert!(StaticCatalog::from_json(negative).is_err());
    }

    #[test]
    fn test_load_missing_file() {
        assert!(matches!(
            StaticCatalog::load("/definitely/not/here.json"),
            Err(KioskError::DataLoad(_))
        ));
    }
}
