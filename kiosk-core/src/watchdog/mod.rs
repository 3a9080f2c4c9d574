//! Idle Watchdog
//!
//! Inactivity detection and auto-reset:
//!
//! ```text
//! active ──idle_timeout──▶ warning{n} ──n reaches 0 / start over──▶ resetting
//!   ▲                        │                                        │
//!   └──── "still here" ──────┘                                        │
//!   └──────────────── restart (after the session reset) ──────────────┘
//! ```
//!
//! The watchdog does not own a clock. Exactly one timer slot exists; the
//! driver sleeps until [`IdleWatchdog::next_deadline`] and reports the firing
//! back with the timer's token. Firings carrying a token that is no longer
//! armed are stale and ignored.

use serde::{Deserialize, Serialize};

/// Countdown granularity
const SECOND_MS: i64 = 1_000;

/// Upper bound accepted for either timeout (24 h)
pub const MAX_TIMEOUT_MS: i64 = 24 * 60 * 60 * SECOND_MS;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct WatchdogConfig {
    /// Inactivity before the warning appears
    pub idle_timeout_ms: i64,
    /// Length of the warning countdown
    pub warning_timeout_ms: i64,
}

impl Default for WatchdogConfig {
    fn default() -> Self {
        Self {
            idle_timeout_ms: 60_000,
            warning_timeout_ms: 30_000,
        }
    }
}

impl WatchdogConfig {
    /// Countdown start value in whole seconds (at least 1)
    pub fn warning_secs(&self) -> u32 {
        let secs = self.warning_timeout_ms.saturating_add(SECOND_MS - 1) / SECOND_MS;
        secs.clamp(1, i64::from(u32::MAX)) as u32
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum WatchdogState {
    Active,
    Warning { remaining_secs: u32 },
    /// Waiting for the owner to reset the session
    Resetting,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerKind {
    Idle,
    Countdown,
}

/// Generation token of an armed timer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerToken(u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArmedTimer {
    pub kind: TimerKind,
    pub deadline_ms: i64,
    pub token: TimerToken,
}

/// What a timer firing changed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WatchdogEvent {
    /// Stale token or early firing
    Ignored,
    WarningStarted { remaining_secs: u32 },
    Countdown { remaining_secs: u32 },
    /// The session must be reset, then [`IdleWatchdog::restart`] called
    ResetRequired,
}

#[derive(Debug, Clone)]
pub struct IdleWatchdog {
    config: WatchdogConfig,
    state: WatchdogState,
    timer: Option<ArmedTimer>,
    generation: u64,
}

impl IdleWatchdog {
    /// Create a stopped watchdog; call [`IdleWatchdog::start`] to arm it
    pub fn new(config: WatchdogConfig) -> Self {
        Self {
            config,
            state: WatchdogState::Active,
            timer: None,
            generation: 0,
        }
    }

    pub fn config(&self) -> &WatchdogConfig {
        &self.config
    }

    pub fn state(&self) -> WatchdogState {
        self.state
    }

    pub fn is_warning(&self) -> bool {
        matches!(self.state, WatchdogState::Warning { .. })
    }

    pub fn armed(&self) -> Option<ArmedTimer> {
        self.timer
    }

    /// Deadline of the armed timer, if any
    pub fn next_deadline(&self) -> Option<i64> {
        self.timer.map(|t| t.deadline_ms)
    }

    fn arm(&mut self, kind: TimerKind, deadline_ms: i64) {
        self.generation += 1;
        self.timer = Some(ArmedTimer {
            kind,
            deadline_ms,
            token: TimerToken(self.generation),
        });
    }

    fn disarm(&mut self) {
        self.timer = None;
    }

    /// Arm the idle timer for the first time
    pub fn start(&mut self, now_ms: i64) {
        self.restart(now_ms);
    }

    /// Back to `active` with a fresh idle timer, from any state
    pub fn restart(&mut self, now_ms: i64) {
        self.state = WatchdogState::Active;
        self.arm(
            TimerKind::Idle,
            now_ms.saturating_add(self.config.idle_timeout_ms),
        );
    }

    /// User activity: restarts the idle timer while active
    ///
    /// Ignored (returns false) while the warning is showing or a reset is
    /// pending.
    pub fn on_activity(&mut self, now_ms: i64) -> bool {
        if self.state != WatchdogState::Active {
            return false;
        }
        self.arm(
            TimerKind::Idle,
            now_ms.saturating_add(self.config.idle_timeout_ms),
        );
        true
    }

    /// "I'm still here": dismiss the warning
    pub fn still_here(&mut self, now_ms: i64) -> bool {
        if !self.is_warning() {
            return false;
        }
        tracing::debug!("Idle warning dismissed");
        self.restart(now_ms);
        true
    }

    /// "Start over": skip the rest of the countdown
    pub fn start_over(&mut self) -> bool {
        if !self.is_warning() {
            return false;
        }
        self.state = WatchdogState::Resetting;
        self.disarm();
        true
    }

    /// Handle the firing of the timer identified by `token`
    pub fn on_timer(&mut self, token: TimerToken, now_ms: i64) -> WatchdogEvent {
        let Some(timer) = self.timer else {
            return WatchdogEvent::Ignored;
        };
        if timer.token != token || now_ms < timer.deadline_ms {
            tracing::trace!(?token, "Ignoring stale watchdog timer");
            return WatchdogEvent::Ignored;
        }
        self.fire(timer)
    }

    /// Fire every timer that is due at `now_ms`
    ///
    /// For drivers without their own timer, e.g. a render loop or a test.
    pub fn tick(&mut self, now_ms: i64) -> Vec<WatchdogEvent> {
        let mut events = Vec::new();
        while let Some(timer) = self.timer {
            if timer.deadline_ms > now_ms {
                break;
            }
            events.push(self.fire(timer));
        }
        events
    }

    fn fire(&mut self, timer: ArmedTimer) -> WatchdogEvent {
        match (timer.kind, self.state) {
            (TimerKind::Idle, WatchdogState::Active) => {
                let remaining_secs = self.config.warning_secs();
                self.state = WatchdogState::Warning { remaining_secs };
                self.arm(TimerKind::Countdown, timer.deadline_ms.saturating_add(SECOND_MS));
                tracing::info!(remaining_secs, "Idle timeout, showing warning");
                WatchdogEvent::WarningStarted { remaining_secs }
            }
            (TimerKind::Countdown, WatchdogState::Warning { remaining_secs }) => {
                let remaining_secs = remaining_secs.saturating_sub(1);
                if remaining_secs == 0 {
                    self.state = WatchdogState::Resetting;
                    self.disarm();
                    tracing::info!("Idle countdown finished, resetting session");
                    WatchdogEvent::ResetRequired
                } else {
                    self.state = WatchdogState::Warning { remaining_secs };
                    self.arm(TimerKind::Countdown, timer.deadline_ms.saturating_add(SECOND_MS));
                    WatchdogEvent::Countdown { remaining_secs }
                }
            }
            // timer kind does not match the state; cannot be armed that way
            _ => {
                self.disarm();
                WatchdogEvent::Ignored
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn started() -> IdleWatchdog {
        let mut w = IdleWatchdog::new(WatchdogConfig::default());
        w.start(0);
        w
    }

    fn fire_armed(w: &mut IdleWatchdog) -> WatchdogEvent {
        let t = w.armed().unwrap();
        w.on_timer(t.token, t.deadline_ms)
    }

    #[test]
    fn test_idle_then_warning() {
        let mut w = started();
        assert_eq!(w.next_deadline(), Some(60_000));
        assert_eq!(
            fire_armed(&mut w),
            WatchdogEvent::WarningStarted { remaining_secs: 30 }
        );
        assert_eq!(w.state(), WatchdogState::Warning { remaining_secs: 30 });
        assert_eq!(w.next_deadline(), Some(61_000));
    }

    #[test]
    fn test_countdown_reaches_reset() {
        let mut w = started();
        fire_armed(&mut w);
        for expected in (1..30).rev() {
            assert_eq!(
                fire_armed(&mut w),
                WatchdogEvent::Countdown {
                    remaining_secs: expected
                }
            );
        }
        assert_eq!(fire_armed(&mut w), WatchdogEvent::ResetRequired);
        assert_eq!(w.state(), WatchdogState::Resetting);
        assert!(w.armed().is_none());

        w.restart(95_000);
        assert_eq!(w.state(), WatchdogState::Active);
        assert_eq!(w.next_deadline(), Some(155_000));
    }

    #[test]
    fn test_tick_follows_wall_clock() {
        let mut w = started();
        assert!(w.tick(59_999).is_empty());
        assert_eq!(
            w.tick(60_000),
            vec![WatchdogEvent::WarningStarted { remaining_secs: 30 }]
        );
        let events = w.tick(90_000);
        assert_eq!(events.len(), 30);
        assert_eq!(events.last(), Some(&WatchdogEvent::ResetRequired));
    }

    #[test]
    fn test_activity_restarts_idle_only_while_active() {
        let mut w = started();
        assert!(w.on_activity(30_000));
        assert_eq!(w.next_deadline(), Some(90_000));
        assert!(w.tick(60_000).is_empty());

        w.tick(90_000);
        assert!(w.is_warning());
        let armed = w.armed();
        assert!(!w.on_activity(90_500));
        assert_eq!(w.armed(), armed);
    }

    #[test]
    fn test_still_here_returns_to_active() {
        let mut w = started();
        w.tick(65_000);
        assert!(w.is_warning());
        assert!(w.still_here(65_000));
        assert_eq!(w.state(), WatchdogState::Active);
        assert_eq!(w.next_deadline(), Some(125_000));
        assert!(!w.still_here(65_000));
    }

    #[test]
    fn test_start_over_skips_countdown() {
        let mut w = started();
        assert!(!w.start_over());
        w.tick(60_000);
        assert!(w.start_over());
        assert_eq!(w.state(), WatchdogState::Resetting);
        assert!(w.next_deadline().is_none());
    }

    #[test]
    fn test_stale_token_ignored() {
        let mut w = started();
        let old = w.armed().unwrap();
        w.on_activity(10_000);
        assert_eq!(w.on_timer(old.token, 60_000), WatchdogEvent::Ignored);
        assert_eq!(w.state(), WatchdogState::Active);
        // only one slot: the replacement is the armed one
        assert_ne!(w.armed().unwrap().token, old.token);
    }

    #[test]
    fn test_early_firing_ignored() {
        let mut w = started();
        let t = w.armed().unwrap();
        assert_eq!(w.on_timer(t.token, 59_000), WatchdogEvent::Ignored);
        assert_eq!(w.armed(), Some(t));
    }

    #[test]
    fn test_huge_timeouts_saturate_instead_of_overflowing() {
        let mut w = IdleWatchdog::new(WatchdogConfig {
            idle_timeout_ms: i64::MAX,
            warning_timeout_ms: i64::MAX,
        });
        w.start(5_000);
        assert_eq!(w.next_deadline(), Some(i64::MAX));
        assert!(w.on_activity(10_000));
        assert_eq!(w.next_deadline(), Some(i64::MAX));
        assert!(w.tick(1_000_000).is_empty());

        assert!(matches!(
            fire_armed(&mut w),
            WatchdogEvent::WarningStarted { .. }
        ));
        assert_eq!(w.next_deadline(), Some(i64::MAX));
    }

    #[test]
    fn test_warning_secs_rounds_up() {
        let cfg = WatchdogConfig {
            idle_timeout_ms: 1_000,
            warning_timeout_ms: 2_500,
        };
        assert_eq!(cfg.warning_secs(), 3);
        let cfg = WatchdogConfig {
            idle_timeout_ms: 1_000,
            warning_timeout_ms: 0,
        };
        assert_eq!(cfg.warning_secs(), 1);
    }
}
