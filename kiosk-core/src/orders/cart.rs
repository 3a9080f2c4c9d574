//! Cart Store
//!
//! Ordered list of cart lines. Identity is the generated [`LineId`]; two lines
//! merge only when they carry the same id, never because their content looks
//! alike. Mutations never trigger navigation; callers decide what comes next.

use shared::error::{KioskError, KioskResult};
use shared::order::{CartLine, LineId};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    /// Lines in insertion order
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    pub fn get(&self, id: LineId) -> Option<&CartLine> {
        self.lines.iter().find(|l| l.id == id)
    }

    pub fn contains(&self, id: LineId) -> bool {
        self.position(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Σ quantity
    pub fn item_count(&self) -> i64 {
        self.lines.iter().map(|l| i64::from(l.quantity)).sum()
    }

    fn position(&self, id: LineId) -> Option<usize> {
        self.lines.iter().position(|l| l.id == id)
    }

    /// Add a line, merging into an existing line with the same id
    ///
    /// On merge the quantities are summed; every other field keeps the value
    /// of the first add.
    pub fn add(&mut self, line: CartLine) {
        let quantity = line.quantity.max(1);
        match self.position(line.id) {
            Some(idx) => {
                let existing = &mut self.lines[idx];
                existing.quantity = existing.quantity.saturating_add(quantity);
                tracing::debug!(line_id = %line.id, quantity = existing.quantity, "Merged cart line");
            }
            None => {
                tracing::debug!(line_id = %line.id, item_id = line.item_id, quantity, "Added cart line");
                self.lines.push(CartLine { quantity, ..line });
            }
        }
    }

    /// Set a line's quantity; `quantity <= 0` removes the line
    ///
    /// Unknown ids are ignored.
    pub fn update_quantity(&mut self, id: LineId, quantity: i32) {
        if quantity <= 0 {
            self.remove(id);
            return;
        }
        if let Some(idx) = self.position(id) {
            self.lines[idx].quantity = quantity;
        }
    }

    /// Replace the line at `id`'s position; the id is preserved
    pub fn edit(&mut self, id: LineId, replacement: CartLine) -> KioskResult<()> {
        let idx = self.position(id).ok_or(KioskError::LineNotFound(id))?;
        let quantity = replacement.quantity.max(1);
        self.lines[idx] = CartLine {
            id,
            quantity,
            ..replacement
        };
        tracing::debug!(line_id = %id, "Edited cart line");
        Ok(())
    }

    /// Remove a line; no-op if absent
    pub fn remove(&mut self, id: LineId) {
        let before = self.lines.len();
        self.lines.retain(|l| l.id != id);
        if self.lines.len() != before {
            tracing::debug!(line_id = %id, "Removed cart line");
        }
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use shared::models::ItemKind;
    use shared::util::next_line_id;
    use std::collections::HashSet;

    fn line(id: LineId, name: &str, quantity: i32) -> CartLine {
        CartLine {
            id,
            item_id: 1,
            name: name.to_string(),
            description: String::new(),
            image: String::new(),
            base_price: Decimal::from(10),
            unit_price: Decimal::from(10),
            quantity,
            options: vec![],
            note: None,
            kind: ItemKind::Food,
        }
    }

    #[test]
    fn test_add_appends_in_order() {
        let mut cart = Cart::new();
        let (a, b) = (next_line_id(), next_line_id());
        cart.add(line(a, "A", 1));
        cart.add(line(b, "B", 2));
        let names: Vec<_> = cart.lines().iter().map(|l| l.name.as_str()).collect();
        assert_eq!(names, vec!["A", "B"]);
        assert_eq!(cart.item_count(), 3);
    }

    #[test]
    fn test_add_same_id_merges_quantity_only() {
        let mut cart = Cart::new();
        let id = next_line_id();
        cart.add(line(id, "First", 2));
        cart.add(line(id, "Second", 3));
        assert_eq!(cart.len(), 1);
        let merged = cart.get(id).unwrap();
        assert_eq!(merged.quantity, 5);
        assert_eq!(merged.name, "First");
    }

    #[test]
    fn test_merge_sums_any_quantities() {
        let cases = [(1, 1), (60, 60), (99, 1), (150, 250), (1, 10_000)];
        for (first, second) in cases {
            let mut cart = Cart::new();
            let id = next_line_id();
            let original = CartLine {
                note: Some("no onions".into()),
                ..line(id, "First", first)
            };
            let mut again = line(id, "Second", second);
            again.unit_price = Decimal::from(99);
            again.kind = ItemKind::Drink;

            cart.add(original.clone());
            cart.add(again);

            assert_eq!(cart.len(), 1);
            let merged = cart.get(id).unwrap();
            assert_eq!(merged.quantity, first + second, "{first} + {second}");
            assert_eq!(
                *merged,
                CartLine {
                    quantity: first + second,
                    ..original
                }
            );
        }
    }

    #[test]
    fn test_merge_saturates_instead_of_overflowing() {
        let mut cart = Cart::new();
        let id = next_line_id();
        cart.add(line(id, "A", i32::MAX - 1));
        cart.add(line(id, "A", 5));
        assert_eq!(cart.get(id).unwrap().quantity, i32::MAX);
    }

    #[test]
    fn test_independent_adds_never_merge() {
        let mut cart = Cart::new();
        for _ in 0..5 {
            cart.add(line(next_line_id(), "Same", 1));
        }
        assert_eq!(cart.len(), 5);
        let ids: HashSet<_> = cart.lines().iter().map(|l| l.id).collect();
        assert_eq!(ids.len(), 5);
    }

    #[test]
    fn test_update_quantity_zero_equals_remove() {
        let (a, b) = (next_line_id(), next_line_id());
        let mut left = Cart::new();
        left.add(line(a, "A", 1));
        left.add(line(b, "B", 1));
        let mut right = left.clone();

        left.update_quantity(a, 0);
        right.remove(a);
        assert_eq!(left, right);

        left.update_quantity(b, -4);
        assert!(left.is_empty());
    }

    #[test]
    fn test_update_quantity_preserves_position_and_fields() {
        let mut cart = Cart::new();
        let (a, b) = (next_line_id(), next_line_id());
        cart.add(line(a, "A", 1));
        cart.add(line(b, "B", 1));
        cart.update_quantity(a, 3);
        assert_eq!(cart.lines()[0].id, a);
        assert_eq!(cart.lines()[0].quantity, 3);
        assert_eq!(cart.lines()[0].name, "A");

        cart.update_quantity(a, 10_000);
        assert_eq!(cart.lines()[0].quantity, 10_000);
        assert_eq!(cart.item_count(), 10_001);
    }

    #[test]
    fn test_update_unknown_is_noop() {
        let mut cart = Cart::new();
        cart.add(line(next_line_id(), "A", 1));
        let before = cart.clone();
        cart.update_quantity(next_line_id(), 4);
        cart.remove(next_line_id());
        assert_eq!(cart, before);
    }

    #[test]
    fn test_edit_replaces_in_place_keeping_id() {
        let mut cart = Cart::new();
        let (a, b, other) = (next_line_id(), next_line_id(), next_line_id());
        cart.add(line(a, "A", 1));
        cart.add(line(b, "B", 1));

        cart.edit(a, line(other, "A2", 4)).unwrap();
        assert_eq!(cart.lines()[0].id, a);
        assert_eq!(cart.lines()[0].name, "A2");
        assert_eq!(cart.lines()[0].quantity, 4);
        assert_eq!(cart.lines()[1].id, b);
    }

    #[test]
    fn test_edit_missing_line_fails_without_mutation() {
        let mut cart = Cart::new();
        cart.add(line(next_line_id(), "A", 1));
        let before = cart.clone();
        let missing = next_line_id();
        assert_eq!(
            cart.edit(missing, line(missing, "X", 1)),
            Err(KioskError::LineNotFound(missing))
        );
        assert_eq!(cart, before);
    }

    #[test]
    fn test_clear() {
        let mut cart = Cart::new();
        cart.add(line(next_line_id(), "A", 2));
        cart.clear();
        assert!(cart.is_empty());
        assert_eq!(cart.item_count(), 0);
    }
}
