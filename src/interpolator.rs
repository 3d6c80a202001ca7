//! Time-driven linear interpolation
//!
//! An [`Interpolator`] maps elapsed wall time onto a `[0, 1]` progress value
//! and blends a start value toward a target with it. It is used for color
//! fades, brightness fades and as the frame cadence gate.

use embassy_time::{Duration, Instant};

use crate::color::Rgb;
use crate::math8::lerp8;

/// Minimum wall time between two progress recalculations
pub const RECALC_INTERVAL: Duration = Duration::from_millis(5);

/// Values that can be linearly blended by a progress fraction
pub trait Lerp: Copy + PartialEq {
    /// Blend `start` toward `target`, `progress` is in `[0, 1]`
    fn lerp(start: Self, target: Self, progress: f64) -> Self;
}

impl Lerp for u8 {
    fn lerp(start: Self, target: Self, progress: f64) -> Self {
        lerp8(start, target, progress)
    }
}

impl Lerp for Rgb {
    /// Channels are blended independently with one shared progress, so
    /// every channel lands on its target at the same instant.
    fn lerp(start: Self, target: Self, progress: f64) -> Self {
        Rgb {
            r: lerp8(start.r, target.r, progress),
            g: lerp8(start.g, target.g, progress),
            b: lerp8(start.b, target.b, progress),
        }
    }
}

/// Linear transition from `start` to `target` over `duration`
#[derive(Debug, Clone)]
pub struct Interpolator<V: Lerp> {
    start: V,
    target: V,
    start_time: Instant,
    last_recalc: Option<Instant>,
    duration: Duration,
    progress: f64,
    done: bool,
    armed: bool,
}

impl<V: Lerp> Interpolator<V> {
    /// Create an unarmed interpolator
    ///
    /// Equal endpoints are done right away, regardless of the duration.
    pub fn new(duration: Duration, start: V, target: V) -> Self {
        let mut interpolator = Self {
            start,
            target,
            start_time: Instant::from_ticks(0),
            last_recalc: None,
            duration,
            progress: 0.0,
            done: false,
            armed: false,
        };
        interpolator.settle_if_trivial();
        interpolator
    }

    /// Create an interpolator that is already armed at `now`
    pub fn started(duration: Duration, start: V, target: V, now: Instant) -> Self {
        let mut interpolator = Self::new(duration, start, target);
        interpolator.arm(now);
        interpolator
    }

    /// Capture the start timestamp and begin the transition
    pub fn arm(&mut self, now: Instant) {
        self.start_time = now;
        self.last_recalc = None;
        self.progress = 0.0;
        self.done = false;
        self.armed = true;
        self.settle_if_trivial();
    }

    /// Restart toward a new target, keeping the current duration
    ///
    /// Pass the live value as `start` to continue without a visible jump.
    pub fn retarget(&mut self, now: Instant, start: V, target: V) {
        self.retarget_with_duration(now, start, target, self.duration);
    }

    /// Restart toward a new target with a new duration
    pub fn retarget_with_duration(
        &mut self,
        now: Instant,
        start: V,
        target: V,
        duration: Duration,
    ) {
        self.start = start;
        self.target = target;
        self.duration = duration;
        self.arm(now);
    }

    /// Recalculate progress and return the interpolated value
    pub fn current_value(&mut self, now: Instant) -> V {
        self.update(now);
        self.value()
    }

    /// Interpolated value as of the last recalculation
    pub fn value(&self) -> V {
        if self.done {
            return self.target;
        }
        V::lerp(self.start, self.target, self.progress)
    }

    pub const fn target_value(&self) -> V {
        self.target
    }

    pub const fn start_value(&self) -> V {
        self.start
    }

    pub const fn duration(&self) -> Duration {
        self.duration
    }

    /// Progress in `[0, 1]` as of the last recalculation
    pub const fn progress(&self) -> f64 {
        self.progress
    }

    pub const fn is_done(&self) -> bool {
        self.done
    }

    /// Check if the transition has been armed and is still running
    pub const fn is_active(&self) -> bool {
        self.armed && !self.done
    }

    /// Recalculate progress, at most once per [`RECALC_INTERVAL`]
    pub fn update(&mut self, now: Instant) {
        if !self.armed || self.done {
            return;
        }
        if let Some(last) = self.last_recalc {
            if now.saturating_duration_since(last) < RECALC_INTERVAL {
                return;
            }
        }
        self.recalc(now);
    }

    /// Recalculate progress right away, ignoring [`RECALC_INTERVAL`]
    ///
    /// Used where a deadline must be seen exactly, like the frame gate.
    pub fn refresh(&mut self, now: Instant) {
        if !self.armed || self.done {
            return;
        }
        self.recalc(now);
    }

    fn recalc(&mut self, now: Instant) {
        self.last_recalc = Some(now);

        let elapsed = now.saturating_duration_since(self.start_time);
        if elapsed >= self.duration {
            self.finish();
            return;
        }

        #[allow(clippy::cast_precision_loss)]
        let progress = elapsed.as_ticks() as f64 / self.duration.as_ticks() as f64;
        if progress > self.progress {
            self.progress = progress;
        }
    }

    fn settle_if_trivial(&mut self) {
        if self.start == self.target || self.duration.as_ticks() == 0 {
            self.finish();
        }
    }

    fn finish(&mut self) {
        self.progress = 1.0;
        self.done = true;
    }
}
