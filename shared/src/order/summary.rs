//! Derived order totals

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// Order totals, recomputed from the cart on every read
///
/// Values are kept at full precision; call [`OrderSummary::rounded`] for
/// display.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Default)]
pub struct OrderSummary {
    pub subtotal: Decimal,
    pub tax: Decimal,
    pub total: Decimal,
    pub item_count: i64,
}

impl OrderSummary {
    pub fn is_empty(&self) -> bool {
        self.item_count == 0
    }

    /// Copy with money fields rounded to 2 decimal places (half away from zero)
    pub fn rounded(&self) -> Self {
        let r = |v: Decimal| v.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
        Self {
            subtotal: r(self.subtotal),
            tax: r(self.tax),
            total: r(self.total),
            item_count: self.item_count,
        }
    }
}
