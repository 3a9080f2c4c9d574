//! Item Customization Wizard
//!
//! Bounded linear state machine scoped to one catalog item:
//!
//! ```text
//! overview → options → customize → review → commit
//!            (skipped when the item has no option groups)
//! ```
//!
//! A wizard is created fresh for every flow. Edit mode is the same machine
//! pre-seeded from an existing cart line; its commit replaces that line in
//! place instead of adding a new one.

use crate::orders::{Cart, Selections, selected_options, unit_price};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use shared::error::{KioskError, KioskResult};
use shared::models::{CatalogItem, OptionGroup, SelectionMode};
use shared::order::{CartLine, LineId, MAX_QUANTITY, normalize_note};
use shared::util::next_line_id;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum WizardStep {
    Overview,
    Options,
    Customize,
    Review,
}

/// What a commit does to the cart
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WizardMode {
    /// Add a fresh line
    New,
    /// Replace the given line, keeping its id
    Edit(LineId),
}

/// Result of a successful commit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitOutcome {
    Added(LineId),
    Updated(LineId),
}

impl CommitOutcome {
    pub fn line_id(&self) -> LineId {
        match self {
            CommitOutcome::Added(id) | CommitOutcome::Updated(id) => *id,
        }
    }
}

#[derive(Debug, Clone)]
pub struct CustomizationWizard {
    item: CatalogItem,
    mode: WizardMode,
    steps: Vec<WizardStep>,
    index: usize,
    selections: Selections,
    quantity: i32,
    note: Option<String>,
}

impl CustomizationWizard {
    /// Start a new-item flow
    pub fn new(item: CatalogItem) -> Self {
        let steps = Self::steps_for(&item);
        Self {
            item,
            mode: WizardMode::New,
            steps,
            index: 0,
            selections: Selections::new(),
            quantity: 1,
            note: None,
        }
    }

    /// Start an edit flow pre-seeded from an existing line
    ///
    /// Selections naming groups or choices the item no longer has are
    /// dropped.
    pub fn for_line(item: CatalogItem, line: &CartLine) -> Self {
        let mut wizard = Self::new(item);
        wizard.mode = WizardMode::Edit(line.id);
        wizard.quantity = line.quantity.clamp(1, MAX_QUANTITY);
        wizard.note = line.note.as_deref().and_then(normalize_note);
        for opt in &line.options {
            let Some(group) = wizard.item.group(&opt.group) else {
                continue;
            };
            let chosen: Vec<String> = opt
                .choices
                .iter()
                .filter(|c| group.choice(c).is_some())
                .cloned()
                .collect();
            if !chosen.is_empty() {
                wizard.selections.insert(opt.group.clone(), chosen);
            }
        }
        wizard
    }

    fn steps_for(item: &CatalogItem) -> Vec<WizardStep> {
        let mut steps = vec![WizardStep::Overview];
        if item.has_options() {
            steps.push(WizardStep::Options);
        }
        steps.push(WizardStep::Customize);
        steps.push(WizardStep::Review);
        steps
    }

    // ========== Queries ==========

    pub fn item(&self) -> &CatalogItem {
        &self.item
    }

    pub fn mode(&self) -> WizardMode {
        self.mode
    }

    pub fn step(&self) -> WizardStep {
        self.steps[self.index]
    }

    pub fn steps(&self) -> &[WizardStep] {
        &self.steps
    }

    pub fn quantity(&self) -> i32 {
        self.quantity
    }

    pub fn note(&self) -> Option<&str> {
        self.note.as_deref()
    }

    pub fn selections(&self) -> &Selections {
        &self.selections
    }

    pub fn is_selected(&self, group: &str, choice: &str) -> bool {
        self.selections
            .get(group)
            .is_some_and(|chosen| chosen.iter().any(|c| c == choice))
    }

    /// First required group (display order) without a selection
    pub fn missing_required(&self) -> Option<&OptionGroup> {
        self.item.options.iter().find(|g| {
            g.required && self.selections.get(&g.name).is_none_or(|c| c.is_empty())
        })
    }

    /// Live unit price for the current selections
    pub fn preview_price(&self) -> Decimal {
        unit_price(&self.item, &self.selections)
    }

    /// Live unit price × quantity
    pub fn preview_total(&self) -> Decimal {
        self.preview_price() * Decimal::from(self.quantity)
    }

    // ========== Editing ==========

    /// Select a choice: single-mode groups replace, multiple-mode groups toggle
    pub fn select_choice(&mut self, group: &str, choice: &str) -> KioskResult<()> {
        let option_group = self
            .item
            .group(group)
            .ok_or_else(|| KioskError::UnknownOptionGroup(group.to_string()))?;
        if option_group.choice(choice).is_none() {
            return Err(KioskError::UnknownChoice {
                group: group.to_string(),
                choice: choice.to_string(),
            });
        }

        let mode = option_group.mode;
        let chosen = self.selections.entry(group.to_string()).or_default();
        match mode {
            SelectionMode::Single => {
                chosen.clear();
                chosen.push(choice.to_string());
            }
            SelectionMode::Multiple => {
                if let Some(pos) = chosen.iter().position(|c| c == choice) {
                    chosen.remove(pos);
                } else {
                    chosen.push(choice.to_string());
                }
            }
        }
        if chosen.is_empty() {
            self.selections.remove(group);
        }
        Ok(())
    }

    /// Set the quantity, clamped to `1..=MAX_QUANTITY`
    pub fn set_quantity(&mut self, quantity: i32) {
        self.quantity = quantity.clamp(1, MAX_QUANTITY);
    }

    pub fn increment_quantity(&mut self) {
        self.set_quantity(self.quantity.saturating_add(1));
    }

    /// No-op at 1
    pub fn decrement_quantity(&mut self) {
        self.set_quantity(self.quantity - 1);
    }

    pub fn set_note(&mut self, note: &str) {
        self.note = normalize_note(note);
    }

    // ========== Stepping ==========

    /// Whether `next()` may leave the current step
    pub fn can_advance(&self) -> bool {
        self.step() != WizardStep::Options || self.missing_required().is_none()
    }

    /// Move one step forward
    ///
    /// Fails with `RequiredOptionMissing` on the options step while a required
    /// group is unsatisfied. At the last step this is a no-op.
    pub fn next(&mut self) -> KioskResult<WizardStep> {
        if let (WizardStep::Options, Some(group)) = (self.step(), self.missing_required()) {
            return Err(KioskError::RequiredOptionMissing(group.name.clone()));
        }
        if self.index + 1 < self.steps.len() {
            self.index += 1;
        }
        Ok(self.step())
    }

    /// Move one step back; no-op at the first step
    pub fn previous(&mut self) -> WizardStep {
        self.index = self.index.saturating_sub(1);
        self.step()
    }

    // ========== Commit ==========

    fn build_line(&self, id: LineId) -> CartLine {
        CartLine {
            id,
            item_id: self.item.id,
            name: self.item.name.clone(),
            description: self.item.description.clone(),
            image: self.item.image.clone(),
            base_price: self.item.price,
            unit_price: self.preview_price(),
            quantity: self.quantity,
            options: selected_options(&self.item, &self.selections),
            note: self.note.clone(),
            kind: self.item.kind,
        }
    }

    /// Write the configured line to the cart
    ///
    /// Only allowed on the review step. Any failure leaves both the wizard and
    /// the cart untouched.
    pub fn commit(&self, cart: &mut Cart) -> KioskResult<CommitOutcome> {
        if self.step() != WizardStep::Review {
            return Err(KioskError::WizardNotOnReview);
        }
        if let Some(group) = self.missing_required() {
            return Err(KioskError::RequiredOptionMissing(group.name.clone()));
        }

        match self.mode {
            WizardMode::New => {
                let line = self.build_line(next_line_id());
                let id = line.id;
                cart.add(line);
                Ok(CommitOutcome::Added(id))
            }
            WizardMode::Edit(id) => {
                cart.edit(id, self.build_line(id))?;
                Ok(CommitOutcome::Updated(id))
            }
        }
    }
}
