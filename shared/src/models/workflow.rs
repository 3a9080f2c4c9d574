//! Workflow steps

use serde::{Deserialize, Serialize};
use std::fmt;

/// One screen in the fixed, linear kiosk workflow
///
/// Declaration order is the workflow order.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    Welcome,
    OrderType,
    Food,
    Drinks,
    Review,
    Payment,
}

impl Step {
    /// Full workflow, intro included
    pub const ALL: [Step; 6] = [
        Step::Welcome,
        Step::OrderType,
        Step::Food,
        Step::Drinks,
        Step::Review,
        Step::Payment,
    ];

    /// Workflow without the language / order-type intro
    pub const MENU_FLOW: [Step; 4] = [Step::Food, Step::Drinks, Step::Review, Step::Payment];

    /// Steps that require a non-empty cart
    pub fn requires_items(&self) -> bool {
        matches!(self, Step::Review | Step::Payment)
    }

    /// Intro screens are driven by explicit selection, not swipes
    pub fn is_intro(&self) -> bool {
        matches!(self, Step::Welcome | Step::OrderType)
    }

    /// Translation key of the step title
    pub fn title_key(&self) -> &'static str {
        match self {
            Step::Welcome => "welcome_title",
            Step::OrderType => "order_type_title",
            Step::Food => "food_title",
            Step::Drinks => "drinks_title",
            Step::Review => "review_order",
            Step::Payment => "payment",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Step::Welcome => "welcome",
            Step::OrderType => "order_type",
            Step::Food => "food",
            Step::Drinks => "drinks",
            Step::Review => "review",
            Step::Payment => "payment",
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_is_declaration_order() {
        let mut sorted = Step::ALL;
        sorted.sort();
        assert_eq!(sorted, Step::ALL);
        assert!(Step::Food < Step::Payment);
    }

    #[test]
    fn test_gated_steps() {
        let gated: Vec<_> = Step::ALL.iter().filter(|s| s.requires_items()).collect();
        assert_eq!(gated, vec![&Step::Review, &Step::Payment]);
    }

    #[test]
    fn test_serde_names() {
        assert_eq!(serde_json::to_string(&Step::OrderType).unwrap(), "\"order_type\"");
        assert_eq!(Step::Drinks.to_string(), "drinks");
    }
}
