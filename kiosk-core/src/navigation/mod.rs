//! Navigation state machine
//!
//! Holds the current workflow step of the configured flow and enforces the
//! cart-empty gate. Two entry points:
//!
//! - [`Navigator::go_to`] / [`Navigator::next`]: programmatic jumps, gated or
//!   ungated depending on the integrator's [`NavPolicy`]
//! - [`Navigator::advance`] / [`Navigator::retreat`]: the swipe path, which
//!   always allows retreating and always blocks advancing into a step that
//!   needs items while the cart is empty
//!
//! The navigator never looks at the cart itself; callers pass `cart_empty`.

use serde::{Deserialize, Serialize};
use shared::error::{KioskError, KioskResult};
use shared::models::Step;
use std::str::FromStr;

/// How programmatic jumps treat an empty cart
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum NavPolicy {
    /// Moving to review/payment with an empty cart is rejected
    #[default]
    Gated,
    /// Every step is reachable; an empty cart only raises a warning
    Ungated,
}

impl FromStr for NavPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "gated" => Ok(NavPolicy::Gated),
            "ungated" => Ok(NavPolicy::Ungated),
            other => Err(format!("unknown navigation policy: {other}")),
        }
    }
}

/// Why a transition was refused
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockReason {
    CartEmpty,
}

/// Result of a transition request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavOutcome {
    /// Step changed
    Moved { from: Step, to: Step },
    /// Step changed although the cart is empty (ungated policy)
    MovedWithWarning { from: Step, to: Step },
    /// Nothing to do (already there, or past the first/last step)
    Unchanged,
    /// Refused, state untouched
    Blocked(BlockReason),
}

impl NavOutcome {
    /// Whether the current step changed
    pub fn moved(&self) -> bool {
        matches!(
            self,
            NavOutcome::Moved { .. } | NavOutcome::MovedWithWarning { .. }
        )
    }
}

/// Availability of a step in the step indicator
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StepState {
    Current,
    Available,
    Disabled,
}

#[derive(Debug, Clone)]
pub struct Navigator {
    flow: Vec<Step>,
    index: usize,
    policy: NavPolicy,
}

impl Navigator {
    /// Create a navigator positioned on the first step of the flow
    pub fn new(intro_enabled: bool, policy: NavPolicy) -> Self {
        let flow = if intro_enabled {
            Step::ALL.to_vec()
        } else {
            Step::MENU_FLOW.to_vec()
        };
        Self {
            flow,
            index: 0,
            policy,
        }
    }

    pub fn current(&self) -> Step {
        self.flow[self.index]
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn last_index(&self) -> usize {
        self.flow.len() - 1
    }

    pub fn flow(&self) -> &[Step] {
        &self.flow
    }

    pub fn policy(&self) -> NavPolicy {
        self.policy
    }

    /// First step of the flow (the state after boot or reset)
    pub fn initial(&self) -> Step {
        self.flow[0]
    }

    pub fn position_of(&self, step: Step) -> Option<usize> {
        self.flow.iter().position(|s| *s == step)
    }

    /// Go back to the initial step
    pub fn reset(&mut self) {
        self.index = 0;
    }

    fn move_to(&mut self, target: usize) -> NavOutcome {
        if target == self.index {
            return NavOutcome::Unchanged;
        }
        let from = self.current();
        self.index = target;
        let to = self.current();
        tracing::debug!(%from, %to, "Step changed");
        NavOutcome::Moved { from, to }
    }

    /// Jump to any step of the flow, applying the configured policy
    pub fn go_to(&mut self, step: Step, cart_empty: bool) -> KioskResult<NavOutcome> {
        let target = self
            .position_of(step)
            .ok_or(KioskError::StepNotInFlow(step))?;

        if target != self.index && step.requires_items() && cart_empty {
            match self.policy {
                NavPolicy::Gated => {
                    tracing::debug!(%step, "Navigation blocked: cart is empty");
                    return Ok(NavOutcome::Blocked(BlockReason::CartEmpty));
                }
                NavPolicy::Ungated => {
                    return Ok(match self.move_to(target) {
                        NavOutcome::Moved { from, to } => NavOutcome::MovedWithWarning { from, to },
                        other => other,
                    });
                }
            }
        }

        Ok(self.move_to(target))
    }

    /// Programmatic "next" button: index + 1 through [`Navigator::go_to`]
    pub fn next(&mut self, cart_empty: bool) -> NavOutcome {
        if self.index >= self.last_index() {
            return NavOutcome::Unchanged;
        }
        let step = self.flow[self.index + 1];
        self.go_to(step, cart_empty).unwrap_or(NavOutcome::Unchanged)
    }

    /// Index − 1; no-op on the first step
    pub fn previous(&mut self) -> NavOutcome {
        if self.index == 0 {
            return NavOutcome::Unchanged;
        }
        self.move_to(self.index - 1)
    }

    /// Swipe forward: blocked into a gated step while the cart is empty,
    /// whatever the policy
    pub fn advance(&mut self, cart_empty: bool) -> NavOutcome {
        if self.index >= self.last_index() {
            return NavOutcome::Unchanged;
        }
        let step = self.flow[self.index + 1];
        if step.requires_items() && cart_empty {
            tracing::debug!(%step, "Swipe blocked: cart is empty");
            return NavOutcome::Blocked(BlockReason::CartEmpty);
        }
        self.move_to(self.index + 1)
    }

    /// Swipe back: always allowed within the swipeable range
    pub fn retreat(&mut self) -> NavOutcome {
        if !self.can_swipe_back() {
            return NavOutcome::Unchanged;
        }
        self.move_to(self.index - 1)
    }

    /// Whether a backward swipe has somewhere to go (intro screens excluded)
    pub fn can_swipe_back(&self) -> bool {
        self.index > 0 && !self.flow[self.index - 1].is_intro()
    }

    /// Whether a forward swipe has somewhere to go
    pub fn can_swipe_forward(&self) -> bool {
        self.index < self.last_index()
    }

    /// Indicator state of a step
    ///
    /// Menu steps are always available. Steps that need items are disabled
    /// while the cart is empty and otherwise reachable up to one past the
    /// current step.
    pub fn step_state(&self, step: Step, cart_empty: bool) -> StepState {
        let Some(pos) = self.position_of(step) else {
            return StepState::Disabled;
        };
        if pos == self.index {
            return StepState::Current;
        }
        if !step.requires_items() {
            return StepState::Available;
        }
        if cart_empty {
            return StepState::Disabled;
        }
        if pos <= self.index + 1 {
            StepState::Available
        } else {
            StepState::Disabled
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn menu_nav(policy: NavPolicy) -> Navigator {
        Navigator::new(false, policy)
    }

    #[test]
    fn test_initial_step() {
        assert_eq!(menu_nav(NavPolicy::Gated).current(), Step::Food);
        assert_eq!(Navigator::new(true, NavPolicy::Gated).current(), Step::Welcome);
    }

    #[test]
    fn test_previous_at_first_and_next_at_last_are_noops() {
        let mut nav = menu_nav(NavPolicy::Gated);
        assert_eq!(nav.previous(), NavOutcome::Unchanged);
        assert_eq!(nav.index(), 0);

        nav.go_to(Step::Payment, false).unwrap();
        assert_eq!(nav.next(false), NavOutcome::Unchanged);
        assert_eq!(nav.advance(false), NavOutcome::Unchanged);
        assert_eq!(nav.index(), nav.last_index());
    }

    #[test]
    fn test_index_never_leaves_bounds() {
        let mut nav = Navigator::new(true, NavPolicy::Ungated);
        for i in 0..50 {
            if i % 3 == 0 {
                nav.previous();
            } else {
                nav.next(i % 2 == 0);
            }
            assert!(nav.index() <= nav.last_index());
        }
    }

    #[test]
    fn test_gated_go_to_blocks_on_empty_cart() {
        let mut nav = menu_nav(NavPolicy::Gated);
        assert_eq!(
            nav.go_to(Step::Review, true).unwrap(),
            NavOutcome::Blocked(BlockReason::CartEmpty)
        );
        assert_eq!(
            nav.go_to(Step::Payment, true).unwrap(),
            NavOutcome::Blocked(BlockReason::CartEmpty)
        );
        assert_eq!(nav.current(), Step::Food);

        let outcome = nav.go_to(Step::Payment, false).unwrap();
        assert_eq!(
            outcome,
            NavOutcome::Moved {
                from: Step::Food,
                to: Step::Payment
            }
        );
    }

    #[test]
    fn test_ungated_go_to_warns_but_moves() {
        let mut nav = menu_nav(NavPolicy::Ungated);
        let outcome = nav.go_to(Step::Review, true).unwrap();
        assert_eq!(
            outcome,
            NavOutcome::MovedWithWarning {
                from: Step::Food,
                to: Step::Review
            }
        );
        assert!(outcome.moved());
        assert_eq!(nav.current(), Step::Review);
    }

    #[test]
    fn test_advance_blocks_even_when_ungated() {
        let mut nav = menu_nav(NavPolicy::Ungated);
        nav.go_to(Step::Drinks, true).unwrap();
        assert_eq!(nav.advance(true), NavOutcome::Blocked(BlockReason::CartEmpty));
        assert_eq!(nav.current(), Step::Drinks);
        assert!(nav.advance(false).moved());
        assert_eq!(nav.current(), Step::Review);
    }

    #[test]
    fn test_retreat_always_allowed_but_not_into_intro() {
        let mut nav = Navigator::new(true, NavPolicy::Gated);
        nav.go_to(Step::Payment, false).unwrap();
        for _ in 0..3 {
            assert!(nav.retreat().moved());
        }
        assert_eq!(nav.current(), Step::Food);
        assert_eq!(nav.retreat(), NavOutcome::Unchanged);
        assert!(!nav.can_swipe_back());
        // the back button may still return to the intro
        assert!(nav.previous().moved());
        assert_eq!(nav.current(), Step::OrderType);
    }

    #[test]
    fn test_step_not_in_flow() {
        let mut nav = menu_nav(NavPolicy::Gated);
        assert_eq!(
            nav.go_to(Step::Welcome, false),
            Err(KioskError::StepNotInFlow(Step::Welcome))
        );
    }

    #[test]
    fn test_same_step_is_unchanged() {
        let mut nav = menu_nav(NavPolicy::Gated);
        assert_eq!(nav.go_to(Step::Food, true).unwrap(), NavOutcome::Unchanged);
    }

    #[test]
    fn test_step_state() {
        let mut nav = menu_nav(NavPolicy::Gated);
        assert_eq!(nav.step_state(Step::Food, true), StepState::Current);
        assert_eq!(nav.step_state(Step::Drinks, true), StepState::Available);
        assert_eq!(nav.step_state(Step::Review, true), StepState::Disabled);
        assert_eq!(nav.step_state(Step::Review, false), StepState::Disabled);

        nav.go_to(Step::Drinks, false).unwrap();
        assert_eq!(nav.step_state(Step::Review, false), StepState::Available);
        assert_eq!(nav.step_state(Step::Payment, false), StepState::Disabled);
        assert_eq!(nav.step_state(Step::Welcome, false), StepState::Disabled);
    }

    #[test]
    fn test_policy_parse() {
        assert_eq!("Ungated".parse::<NavPolicy>(), Ok(NavPolicy::Ungated));
        assert!("loose".parse::<NavPolicy>().is_err());
    }
}
