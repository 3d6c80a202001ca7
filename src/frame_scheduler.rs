//! Main-loop frame pacing
//!
//! Portable frame pacing without async/await or platform-specific timers.
//! The caller is responsible for sleeping between frames.

use embassy_time::{Duration, Instant};

use crate::driver::PixelDriver;
use crate::engine::{StripEngine, TickOutcome};

/// Result of a frame tick operation.
#[derive(Debug, Clone, Copy)]
pub struct FrameResult {
    /// What the engine did with this tick.
    pub outcome: TickOutcome,
    /// The deadline for the next frame.
    pub next_deadline: Instant,
    /// How long to wait until the next frame (may be zero if behind schedule).
    pub sleep_duration: Duration,
}

/// Drives [`StripEngine::tick`] at the engine's frame interval.
///
/// # Usage
///
/// ```ignore
/// let mut scheduler = FrameScheduler::new(controller.engine());
///
/// loop {
///     let result = scheduler.tick(Instant::from_millis(now_ms()));
///     sleep_ms(result.sleep_duration.as_millis());
/// }
/// ```
pub struct FrameScheduler<'a, D: PixelDriver, const MAX_LEDS: usize> {
    engine: &'a StripEngine<D, MAX_LEDS>,
    next_frame: Instant,
    frame_duration: Duration,
}

impl<'a, D: PixelDriver, const MAX_LEDS: usize> FrameScheduler<'a, D, MAX_LEDS> {
    pub fn new(engine: &'a StripEngine<D, MAX_LEDS>) -> Self {
        let frame_duration = engine.timings().frame_interval;
        Self {
            engine,
            next_frame: Instant::from_ticks(0),
            frame_duration,
        }
    }

    /// Tick the engine and return timing information.
    ///
    /// Falling behind by more than two frames resets the schedule to `now`
    /// instead of producing a burst of catch-up frames.
    pub fn tick(&mut self, now: Instant) -> FrameResult {
        let max_drift = self.frame_duration * 2;
        if now > self.next_frame + max_drift {
            self.next_frame = now;
        }

        let outcome = self.engine.tick(now);
        self.next_frame += self.frame_duration;

        FrameResult {
            outcome,
            next_deadline: self.next_frame,
            sleep_duration: self.next_frame.saturating_duration_since(now),
        }
    }
}
