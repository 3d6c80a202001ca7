//! Polled push buttons
//!
//! A [`Button`] is sampled from the main loop. A level change must hold for
//! the debounce window before it counts; the action fires once per press.

use embassy_time::{Duration, Instant};

/// Default time a level must be stable before it is accepted
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(30);

/// Brightness change applied by one step button press
pub const BRIGHTNESS_STEP: u8 = 32;

/// What a button does when pressed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonAction {
    TogglePower,
    BrightnessUp,
    BrightnessDown,
}

#[derive(Debug, Clone)]
pub struct Button {
    action: ButtonAction,
    debounce: Duration,
    stable: bool,
    candidate: bool,
    candidate_since: Instant,
}

impl Button {
    pub const fn new(action: ButtonAction) -> Self {
        Self::with_debounce(action, DEFAULT_DEBOUNCE)
    }

    pub const fn with_debounce(action: ButtonAction, debounce: Duration) -> Self {
        Self {
            action,
            debounce,
            stable: false,
            candidate: false,
            candidate_since: Instant::from_ticks(0),
        }
    }

    pub const fn action(&self) -> ButtonAction {
        self.action
    }

    /// Sample the button level
    ///
    /// Returns the action on the debounced press edge.
    pub fn poll(&mut self, now: Instant, pressed: bool) -> Option<ButtonAction> {
        if pressed != self.candidate {
            self.candidate = pressed;
            self.candidate_since = now;
            return None;
        }
        if self.candidate == self.stable
            || now.saturating_duration_since(self.candidate_since) < self.debounce
        {
            return None;
        }

        self.stable = self.candidate;
        self.stable.then_some(self.action)
    }
}
