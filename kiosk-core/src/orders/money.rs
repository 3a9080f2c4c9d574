//! Money calculation utilities using rust_decimal for precision
//!
//! Pure functions, no state. Everything is computed at full precision;
//! rounding to 2 decimal places happens only in the presentation helpers
//! ([`round_money`], [`format_price`]) so many lines never accumulate drift.

use rust_decimal::prelude::*;
use shared::models::CatalogItem;
use shared::order::{CartLine, OrderSummary, SelectedOption};
use std::collections::HashMap;

/// Rounding for displayed money values (2 decimal places, half away from zero)
const DECIMAL_PLACES: u32 = 2;

/// Chosen choice names per option group name
pub type Selections = HashMap<String, Vec<String>>;

/// Sum of the surcharges of the named choices inside one group
fn group_surcharge(item: &CatalogItem, group: &str, chosen: &[String]) -> Decimal {
    let Some(group) = item.group(group) else {
        return Decimal::ZERO;
    };
    chosen
        .iter()
        .filter_map(|name| group.choice(name))
        .map(|c| c.surcharge)
        .sum()
}

/// Calculate the unit price of an item with the given selections
///
/// Formula: base_price + Σ surcharge of every chosen choice
///
/// Unknown groups/choices contribute nothing. Unsatisfied required groups do
/// not stop the calculation; keeping such a line out of the cart is the
/// wizard's job.
pub fn unit_price(item: &CatalogItem, selections: &Selections) -> Decimal {
    let options_modifier: Decimal = item
        .options
        .iter()
        .filter_map(|g| selections.get(&g.name).map(|chosen| (g, chosen)))
        .map(|(g, chosen)| group_surcharge(item, &g.name, chosen))
        .sum();

    item.price + options_modifier
}

/// Build the denormalized per-group selections stored on a cart line
///
/// Groups follow the item's display order; groups without any selection are
/// skipped.
pub fn selected_options(item: &CatalogItem, selections: &Selections) -> Vec<SelectedOption> {
    item.options
        .iter()
        .filter_map(|g| {
            let chosen: Vec<String> = selections
                .get(&g.name)?
                .iter()
                .filter(|name| g.choice(name).is_some())
                .cloned()
                .collect();
            if chosen.is_empty() {
                return None;
            }
            let surcharge = group_surcharge(item, &g.name, &chosen);
            Some(SelectedOption {
                group: g.name.clone(),
                choices: chosen,
                surcharge,
            })
        })
        .collect()
}

/// Recalculate order totals from cart lines
///
/// - subtotal = Σ(unit_price × quantity)
/// - tax = subtotal × tax_rate
/// - total = subtotal + tax
/// - item_count = Σ quantity
pub fn summarize(lines: &[CartLine], tax_rate: Decimal) -> OrderSummary {
    let subtotal: Decimal = lines.iter().map(CartLine::line_total).sum();
    let item_count: i64 = lines.iter().map(|l| i64::from(l.quantity)).sum();
    let tax = subtotal * tax_rate;

    OrderSummary {
        subtotal,
        tax,
        total: subtotal + tax,
        item_count,
    }
}

/// Round a money value for display
#[inline]
pub fn round_money(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
}

/// Format a price for display, always with 2 decimals (e.g. `$12.50`)
pub fn format_price(value: Decimal) -> String {
    let mut rounded = round_money(value);
    rounded.rescale(DECIMAL_PLACES);
    format!("${}", rounded)
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::models::{Choice, ItemKind, OptionGroup, SelectionMode};
    use shared::order::LineId;

    fn money(cents: i64) -> Decimal {
        Decimal::new(cents, 2)
    }

    fn burger() -> CatalogItem {
        CatalogItem {
            id: 1,
            name: "Burger".into(),
            description: "Beef burger".into(),
            image: "burger.jpg".into(),
            price: money(1000),
            kind: ItemKind::Food,
            category: "mains".into(),
            options: vec![
                OptionGroup {
                    name: "Size".into(),
                    mode: SelectionMode::Single,
                    required: true,
                    choices: vec![
                        Choice::new("Regular", Decimal::ZERO),
                        Choice::new("Large", money(250)),
                    ],
                },
                OptionGroup {
                    name: "Extras".into(),
                    mode: SelectionMode::Multiple,
                    required: false,
                    choices: vec![
                        Choice::new("Cheese", money(100)),
                        Choice::new("Bacon", money(150)),
                    ],
                },
            ],
        }
    }

    fn line(unit_cents: i64, quantity: i32) -> CartLine {
        CartLine {
            id: LineId::from_raw(unit_cents as u64 * 100 + quantity as u64),
            item_id: 1,
            name: "x".into(),
            description: String::new(),
            image: String::new(),
            base_price: money(unit_cents),
            unit_price: money(unit_cents),
            quantity,
            options: vec![],
            note: None,
            kind: ItemKind::Food,
        }
    }

    #[test]
    fn test_unit_price_without_options_is_base() {
        let item = burger();
        assert_eq!(unit_price(&item, &Selections::new()), money(1000));
    }

    #[test]
    fn test_unit_price_sums_all_groups() {
        let item = burger();
        let mut sel = Selections::new();
        sel.insert("Size".into(), vec!["Large".into()]);
        sel.insert("Extras".into(), vec!["Cheese".into(), "Bacon".into()]);
        assert_eq!(unit_price(&item, &sel), money(1500));
    }

    #[test]
    fn test_unit_price_ignores_unknown_names() {
        let item = burger();
        let mut sel = Selections::new();
        sel.insert("Sauce".into(), vec!["Ketchup".into()]);
        sel.insert("Extras".into(), vec!["Gold leaf".into(), "Cheese".into()]);
        assert_eq!(unit_price(&item, &sel), money(1100));
    }

    #[test]
    fn test_selected_options_follow_group_order() {
        let item = burger();
        let mut sel = Selections::new();
        sel.insert("Extras".into(), vec!["Bacon".into()]);
        sel.insert("Size".into(), vec!["Regular".into()]);
        let opts = selected_options(&item, &sel);
        assert_eq!(opts.len(), 2);
        assert_eq!(opts[0].group, "Size");
        assert_eq!(opts[0].surcharge, Decimal::ZERO);
        assert_eq!(opts[1].group, "Extras");
        assert_eq!(opts[1].surcharge, money(150));
    }

    #[test]
    fn test_selected_options_skip_empty_groups() {
        let item = burger();
        let mut sel = Selections::new();
        sel.insert("Extras".into(), vec![]);
        assert!(selected_options(&item, &sel).is_empty());
    }

    #[test]
    fn test_summarize_empty_cart() {
        let summary = summarize(&[], money(10));
        assert_eq!(summary, OrderSummary::default());
        assert!(summary.is_empty());
    }

    #[test]
    fn test_summarize_totals() {
        let lines = vec![line(1000, 2), line(350, 3)];
        let rate = Decimal::new(10, 2);
        let summary = summarize(&lines, rate);
        assert_eq!(summary.subtotal, money(3050));
        assert_eq!(summary.tax, money(305));
        assert_eq!(summary.total, summary.subtotal * (Decimal::ONE + rate));
        assert_eq!(summary.item_count, 5);
        // pure: same input, same output
        assert_eq!(summarize(&lines, rate), summary);
    }

    #[test]
    fn test_full_precision_until_display() {
        // 3 × 0.333 with 7% tax would drift if rounded per line
        let mut l = line(0, 3);
        l.unit_price = Decimal::new(333, 3);
        let summary = summarize(&[l.clone(), l], Decimal::new(7, 2));
        assert_eq!(summary.subtotal, Decimal::new(1998, 3));
        assert_eq!(summary.tax, Decimal::new(13986, 5));
        assert_eq!(summary.rounded().subtotal, money(200));
        assert_eq!(summary.rounded().tax, money(14));
    }

    #[test]
    fn test_format_price() {
        assert_eq!(format_price(money(1250)), "$12.50");
        assert_eq!(format_price(Decimal::new(12345, 3)), "$12.35");
        assert_eq!(format_price(Decimal::from(7)), "$7.00");
    }
}
