//! Swipe gesture recognition
//!
//! Turns one horizontal pointer/touch drag into a discrete navigation intent.
//!
//! Two separate computations share the tracked drag:
//!
//! - [`SwipeRecognizer::display_offset`]: cosmetic resistance applied to the
//!   drag while it is in flight (the page follows the finger, damped near a
//!   boundary)
//! - [`SwipeRecognizer::end`]: the commit decision, always made on the raw,
//!   undamped delta
//!
//! Dragging left (negative delta) means "forward".

use serde::{Deserialize, Serialize};

/// Gesture thresholds (pixels, px/ms)
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SwipeConfig {
    /// Any swipe at least this long commits, whatever its speed
    pub guaranteed_distance: f64,
    /// Normal commit distance (strictly greater than)
    pub min_distance: f64,
    /// Shortest distance a fast flick may have (strictly greater than)
    pub flick_distance: f64,
    /// Flick speed (strictly greater than), px/ms
    pub flick_velocity: f64,
    /// Offset beyond which allowed drags move at half speed
    pub soft_limit: f64,
    /// Maximum displayed offset for allowed drags
    pub max_drag: f64,
}

impl Default for SwipeConfig {
    fn default() -> Self {
        Self {
            guaranteed_distance: 50.0,
            min_distance: 50.0,
            flick_distance: 20.0,
            flick_velocity: 0.3,
            soft_limit: 100.0,
            max_drag: 200.0,
        }
    }
}

/// Which directions navigation can currently go
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SwipeBounds {
    pub can_retreat: bool,
    pub can_advance: bool,
}

/// Outcome of a finished drag
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwipeDecision {
    /// Go to the next step
    Advance,
    /// Go to the previous step
    Retreat,
    /// Not enough movement; snap back, change nothing
    BounceBack,
}

/// Drag in flight
#[derive(Debug, Clone, Copy)]
struct ActiveSwipe {
    start_x: f64,
    start_ms: i64,
    current_x: Option<f64>,
}

impl ActiveSwipe {
    fn raw_delta(&self) -> f64 {
        self.current_x.map_or(0.0, |x| x - self.start_x)
    }
}

/// Single-pointer swipe recognizer
#[derive(Debug, Clone, Default)]
pub struct SwipeRecognizer {
    config: SwipeConfig,
    active: Option<ActiveSwipe>,
}

impl SwipeRecognizer {
    pub fn new(config: SwipeConfig) -> Self {
        Self {
            config,
            active: None,
        }
    }

    pub fn config(&self) -> &SwipeConfig {
        &self.config
    }

    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    /// Raw delta (current − start) of the drag in flight
    pub fn raw_delta(&self) -> f64 {
        self.active.map_or(0.0, |s| s.raw_delta())
    }

    /// Begin tracking a drag
    ///
    /// Returns false (and ignores the event) when a drag is already in flight.
    pub fn start(&mut self, x: f64, now_ms: i64) -> bool {
        if self.active.is_some() {
            tracing::trace!("Ignoring swipe start: gesture already in flight");
            return false;
        }
        self.active = Some(ActiveSwipe {
            start_x: x,
            start_ms: now_ms,
            current_x: None,
        });
        true
    }

    /// Track pointer movement; returns the damped offset to display
    pub fn move_to(&mut self, x: f64, bounds: SwipeBounds) -> f64 {
        let Some(active) = self.active.as_mut() else {
            return 0.0;
        };
        active.current_x = Some(x);
        self.display_offset(bounds)
    }

    /// Offset the page should be drawn at, with resistance applied
    ///
    /// Never feeds back into the commit decision.
    pub fn display_offset(&self, bounds: SwipeBounds) -> f64 {
        let diff = self.raw_delta();
        if diff == 0.0 {
            return 0.0;
        }

        let blocked = if diff > 0.0 {
            !bounds.can_retreat
        } else {
            !bounds.can_advance
        };

        if blocked {
            let resistance = 1.0 - (diff.abs() / self.config.max_drag).min(0.8);
            return diff * resistance * 0.4;
        }

        let mut magnitude = diff.abs();
        if magnitude > self.config.soft_limit {
            magnitude = self.config.soft_limit + (magnitude - self.config.soft_limit) * 0.5;
        }
        magnitude.min(self.config.max_drag) * diff.signum()
    }

    /// Finish the drag and decide whether it commits
    ///
    /// Gesture state is cleared whatever the outcome.
    pub fn end(&mut self, now_ms: i64) -> SwipeDecision {
        let Some(active) = self.active.take() else {
            return SwipeDecision::BounceBack;
        };
        let Some(end_x) = active.current_x else {
            return SwipeDecision::BounceBack;
        };

        // positive = dragged left = forward
        let distance = active.start_x - end_x;
        let elapsed_ms = (now_ms - active.start_ms).max(1) as f64;
        let velocity = distance.abs() / elapsed_ms;

        let decision = if self.commits(distance, velocity) {
            if distance > 0.0 {
                SwipeDecision::Advance
            } else {
                SwipeDecision::Retreat
            }
        } else {
            SwipeDecision::BounceBack
        };

        tracing::trace!(distance, velocity, ?decision, "Swipe finished");
        decision
    }

    /// Abort the drag without a decision
    pub fn cancel(&mut self) {
        self.active = None;
    }

    fn commits(&self, distance: f64, velocity: f64) -> bool {
        let magnitude = distance.abs();
        if magnitude == 0.0 {
            return false;
        }
        let c = &self.config;
        magnitude >= c.guaranteed_distance
            || magnitude > c.min_distance
            || (magnitude > c.flick_distance && velocity > c.flick_velocity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const OPEN: SwipeBounds = SwipeBounds {
        can_retreat: true,
        can_advance: true,
    };

    fn swipe(from: f64, to: f64, elapsed_ms: i64) -> SwipeDecision {
        let mut r = SwipeRecognizer::default();
        r.start(from, 1_000);
        r.move_to(to, OPEN);
        r.end(1_000 + elapsed_ms)
    }

    #[test]
    fn test_guaranteed_distance_always_commits() {
        // very slow, both directions
        assert_eq!(swipe(300.0, 250.0, 60_000), SwipeDecision::Advance);
        assert_eq!(swipe(300.0, 350.0, 60_000), SwipeDecision::Retreat);
        assert_eq!(swipe(300.0, 100.0, 10_000), SwipeDecision::Advance);
    }

    #[test]
    fn test_fast_flick_commits() {
        // 30 px in 50 ms = 0.6 px/ms
        assert_eq!(swipe(300.0, 270.0, 50), SwipeDecision::Advance);
        assert_eq!(swipe(300.0, 330.0, 50), SwipeDecision::Retreat);
    }

    #[test]
    fn test_slow_short_drag_bounces() {
        // 30 px in 1 s = 0.03 px/ms
        assert_eq!(swipe(300.0, 270.0, 1_000), SwipeDecision::BounceBack);
        // below the flick minimum, however fast
        assert_eq!(swipe(300.0, 285.0, 5), SwipeDecision::BounceBack);
    }

    #[test]
    fn test_zero_movement_bounces() {
        assert_eq!(swipe(300.0, 300.0, 0), SwipeDecision::BounceBack);

        let mut r = SwipeRecognizer::default();
        r.start(300.0, 0);
        assert_eq!(r.end(10), SwipeDecision::BounceBack);
        assert!(!r.is_active());
    }

    #[test]
    fn test_zero_elapsed_is_not_a_division_by_zero() {
        assert_eq!(swipe(300.0, 275.0, 0), SwipeDecision::Advance);
    }

    #[test]
    fn test_second_start_is_ignored() {
        let mut r = SwipeRecognizer::default();
        assert!(r.start(300.0, 0));
        assert!(!r.start(10.0, 5));
        r.move_to(240.0, OPEN);
        assert_eq!(r.raw_delta(), -60.0);
        assert_eq!(r.end(100), SwipeDecision::Advance);
    }

    #[test]
    fn test_state_resets_after_end_and_cancel() {
        let mut r = SwipeRecognizer::default();
        r.start(0.0, 0);
        r.move_to(-80.0, OPEN);
        r.end(10);
        assert!(!r.is_active());
        assert_eq!(r.raw_delta(), 0.0);
        assert_eq!(r.end(20), SwipeDecision::BounceBack);

        r.start(0.0, 0);
        r.move_to(-80.0, OPEN);
        r.cancel();
        assert!(!r.is_active());
        assert_eq!(r.end(30), SwipeDecision::BounceBack);
    }

    #[test]
    fn test_resistance_toward_boundary_is_display_only() {
        let blocked = SwipeBounds {
            can_retreat: false,
            can_advance: true,
        };
        let mut r = SwipeRecognizer::default();
        r.start(0.0, 0);
        // 100 px toward a boundary: 100 × (1 − 0.5) × 0.4
        let offset = r.move_to(100.0, blocked);
        assert!((offset - 20.0).abs() < 1e-9);
        // the raw delta still commits
        assert_eq!(r.raw_delta(), 100.0);
        assert_eq!(r.end(10_000), SwipeDecision::Retreat);
    }

    #[test]
    fn test_resistance_saturates() {
        let blocked = SwipeBounds {
            can_retreat: true,
            can_advance: false,
        };
        let mut r = SwipeRecognizer::default();
        r.start(0.0, 0);
        // 400 px: resistance floor 0.2 → −400 × 0.2 × 0.4
        let offset = r.move_to(-400.0, blocked);
        assert!((offset + 32.0).abs() < 1e-9);
    }

    #[test]
    fn test_allowed_direction_soft_limit_and_clamp() {
        let mut r = SwipeRecognizer::default();
        r.start(0.0, 0);
        assert_eq!(r.move_to(-80.0, OPEN), -80.0);
        assert_eq!(r.move_to(-160.0, OPEN), -130.0);
        assert_eq!(r.move_to(600.0, OPEN), 200.0);
    }
}
