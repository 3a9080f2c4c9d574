//! Cart line types

use crate::models::ItemKind;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Maximum free-text note length (characters)
pub const MAX_NOTE_CHARS: usize = 200;

/// Quantity stepper ceiling in the customization wizard
pub const MAX_QUANTITY: i32 = 99;

// ============================================================================
// Line Identity
// ============================================================================

/// Opaque cart line identity
///
/// Generated by [`crate::util::next_line_id`]; never reused within a process,
/// so two independent adds always produce two lines.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(transparent)]
pub struct LineId(u64);

impl LineId {
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    pub const fn raw(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for LineId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line-{}", self.0)
    }
}

// ============================================================================
// Cart Line
// ============================================================================

/// Chosen choices of one option group
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SelectedOption {
    /// Option group name
    pub group: String,
    /// Chosen choice names (at least one)
    pub choices: Vec<String>,
    /// Sum of the chosen choices' surcharges
    pub surcharge: Decimal,
}

/// One orderable unit in the cart
///
/// Display fields and prices are a snapshot taken when the line was built;
/// later catalog changes never touch an existing line.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CartLine {
    pub id: LineId,
    /// Source catalog item
    pub item_id: i64,
    pub name: String,
    pub description: String,
    pub image: String,
    /// Catalog base price at add time
    pub base_price: Decimal,
    /// Base price + option surcharges, fixed at creation/edit time
    pub unit_price: Decimal,
    pub quantity: i32,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<SelectedOption>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    pub kind: ItemKind,
}

impl CartLine {
    /// unit_price × quantity, full precision
    pub fn line_total(&self) -> Decimal {
        self.unit_price * Decimal::from(self.quantity)
    }

    /// Selected choices of a group, if any
    pub fn choices_for(&self, group: &str) -> Option<&[String]> {
        self.options
            .iter()
            .find(|o| o.group == group)
            .map(|o| o.choices.as_slice())
    }
}

/// Normalize a free-text note: trimmed, at most [`MAX_NOTE_CHARS`], blank → None
pub fn normalize_note(note: &str) -> Option<String> {
    let trimmed = note.trim();
    if trimmed.is_empty() {
        return None;
    }
    Some(trimmed.chars().take(MAX_NOTE_CHARS).collect())
}
