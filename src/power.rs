//! Power and brightness as one continuously fading level
//!
//! Handles:
//! - Global brightness setting with smooth fades
//! - Fade-in when turning on, back to the last nonzero brightness
//! - Fade-out when turning off
//! - Reversing an in-flight power fade from wherever it currently is

use embassy_time::{Duration, Instant};
use log::{debug, warn};

use crate::color::Rgb;
use crate::interpolator::Interpolator;
use crate::lock::{DEFAULT_LOCK_ATTEMPTS, Lock, with_lock};
use crate::math8::dim8;
use crate::state::{Mutation, PowerState};

#[derive(Debug)]
struct BrightnessState {
    state: PowerState,
    last_nonzero: u8,
    timer: Interpolator<u8>,
}

impl BrightnessState {
    fn set_brightness(&mut self, now: Instant, brightness: u8) -> Mutation {
        if !self.state.is_on() {
            // Dark strip: only remember the level for the next power-on
            if brightness == 0 || brightness == self.last_nonzero {
                return Mutation::Redundant;
            }
            self.last_nonzero = brightness;
            return Mutation::Applied;
        }

        if brightness == self.timer.target_value() {
            return Mutation::Redundant;
        }
        self.timer.update(now);
        if self.timer.is_active() {
            return Mutation::Busy;
        }

        if brightness != 0 {
            self.last_nonzero = brightness;
        }
        self.fade_to(now, brightness);
        Mutation::Applied
    }

    fn turn_on(&mut self, now: Instant) -> Mutation {
        if self.state.is_on() && self.timer.target_value() == self.last_nonzero {
            return Mutation::Redundant;
        }
        self.state = PowerState::On;
        self.fade_to(now, self.last_nonzero);
        Mutation::Applied
    }

    fn turn_off(&mut self, now: Instant) -> Mutation {
        if !self.state.is_on() {
            return Mutation::Redundant;
        }
        self.fade_to(now, 0);
        // Flipped only once the fade is scheduled
        self.state = PowerState::Off;
        Mutation::Applied
    }

    /// Start a fade from the live level, so a reversal never snaps
    fn fade_to(&mut self, now: Instant, target: u8) {
        let live = self.timer.current_value(now);
        self.timer.retarget(now, live, target);
    }

    fn level(&mut self, now: Instant) -> u8 {
        let level = self.timer.current_value(now);
        if !self.state.is_on() && self.timer.is_done() {
            return 0;
        }
        level
    }
}

/// Power state plus a 0-255 brightness that fades between levels
///
/// All methods take the component's own lock. Mutations report [`Mutation::Busy`]
/// when the lock cannot be taken in time; getters fall back to a dark default.
pub struct PowerBrightness {
    inner: Lock<BrightnessState>,
    lock_attempts: u32,
}

impl PowerBrightness {
    /// Create a new power/brightness pair
    ///
    /// The strip starts settled at `initial_brightness` (or dark when off).
    pub fn new(transition: Duration, initial_brightness: u8, initial_state: PowerState) -> Self {
        let level = if initial_state.is_on() {
            initial_brightness
        } else {
            0
        };
        let last_nonzero = if initial_brightness == 0 {
            u8::MAX
        } else {
            initial_brightness
        };
        Self {
            inner: Lock::new(BrightnessState {
                state: initial_state,
                last_nonzero,
                timer: Interpolator::new(transition, level, level),
            }),
            lock_attempts: DEFAULT_LOCK_ATTEMPTS,
        }
    }

    /// Override the number of lock attempts before giving up
    #[must_use]
    pub fn with_lock_attempts(mut self, attempts: u32) -> Self {
        self.lock_attempts = attempts;
        self
    }

    pub fn turn_on(&self, now: Instant) -> Mutation {
        self.mutate("turn_on", |s| s.turn_on(now))
    }

    pub fn turn_off(&self, now: Instant) -> Mutation {
        self.mutate("turn_off", |s| s.turn_off(now))
    }

    /// Fade toward a new brightness
    ///
    /// Rejected with [`Mutation::Busy`] while another brightness fade is still
    /// running.
    pub fn set_brightness(&self, now: Instant, brightness: u8) -> Mutation {
        self.mutate("set_brightness", |s| s.set_brightness(now, brightness))
    }

    /// Scale one channel by the current brightness, truncating
    pub fn dimmed(&self, now: Instant, channel: u8) -> u8 {
        dim8(channel, self.level(now))
    }

    /// Scale a color by the current brightness, truncating per channel
    pub fn dimmed_rgb(&self, now: Instant, color: Rgb) -> Rgb {
        let level = self.level(now);
        Rgb {
            r: dim8(color.r, level),
            g: dim8(color.g, level),
            b: dim8(color.b, level),
        }
    }

    /// Effective output level, forced to 0 once an off fade has finished
    pub fn level(&self, now: Instant) -> u8 {
        self.read("level", 0, |s| s.level(now))
    }

    pub fn get_state(&self) -> PowerState {
        self.read("get_state", PowerState::Off, |s| s.state)
    }

    /// Power state, or `None` when the lock stayed busy
    pub fn try_get_state(&self) -> Option<PowerState> {
        with_lock(&self.inner, self.lock_attempts, |s| s.state)
    }

    /// Currently interpolated brightness
    pub fn get_brightness(&self, now: Instant) -> u8 {
        self.read("get_brightness", 0, |s| s.timer.current_value(now))
    }

    /// Brightness the running (or last) fade is heading to
    pub fn get_target_brightness(&self) -> u8 {
        self.read("get_target_brightness", 0, |s| s.timer.target_value())
    }

    /// Last explicitly set nonzero brightness, restored by [`Self::turn_on`]
    pub fn get_last_brightness(&self) -> u8 {
        self.read("get_last_brightness", 0, |s| s.last_nonzero)
    }

    pub fn try_get_last_brightness(&self) -> Option<u8> {
        with_lock(&self.inner, self.lock_attempts, |s| s.last_nonzero)
    }

    pub fn is_transitioning(&self, now: Instant) -> bool {
        self.read("is_transitioning", false, |s| {
            s.timer.update(now);
            s.timer.is_active()
        })
    }

    fn mutate(&self, op: &str, f: impl FnOnce(&mut BrightnessState) -> Mutation) -> Mutation {
        let Some(result) = with_lock(&self.inner, self.lock_attempts, f) else {
            warn!("[PowerBrightness.{op}] lock busy, request rejected");
            return Mutation::Busy;
        };
        debug!("[PowerBrightness.{op}] {result:?}");
        result
    }

    fn read<R>(&self, op: &str, default: R, f: impl FnOnce(&mut BrightnessState) -> R) -> R {
        with_lock(&self.inner, self.lock_attempts, f).unwrap_or_else(|| {
            warn!("[PowerBrightness.{op}] lock busy, returning default");
            default
        })
    }
}

#[cfg(test)]
impl PowerBrightness {
    /// Keep the lock taken until the returned guard is dropped
    pub(crate) fn hold_lock(&self) -> Option<impl Sized + '_> {
        self.inner.try_lock().ok()
    }
}

#[cfg(test)]
mod tests {
    use embassy_time::{Duration, Instant};

    use super::*;

    #[test]
    fn test_busy_lock_fails_checked_reads() {
        let power = PowerBrightness::new(Duration::from_millis(100), 120, PowerState::On)
            .with_lock_attempts(4);
        let guard = power.hold_lock();
        assert!(guard.is_some());

        assert_eq!(power.try_get_state(), None);
        assert_eq!(power.try_get_last_brightness(), None);
        assert_eq!(power.turn_off(Instant::from_millis(0)), Mutation::Busy);

        drop(guard);
        assert_eq!(power.try_get_state(), Some(PowerState::On));
        assert_eq!(power.try_get_last_brightness(), Some(120));
    }
}
