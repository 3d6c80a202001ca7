//! Strip engine - the main orchestrator
//!
//! Owns the active [`ColorMode`], the [`PowerBrightness`] pair, the frame
//! gate and the pixel buffer. It is the only component that touches the
//! driver.
//!
//! Two locks guard the state:
//! - the mode lock protects which mode is active and its parameters;
//! - the data lock protects the pixel buffer, the driver and the length.
//!
//! Both are only taken through [`StripEngine::with_mode`] and
//! [`StripEngine::with_data`], whose closures see nothing but their own
//! state. A tick leaves the mode phase with a plain [`Rgb`] before the data
//! phase starts, so the mode lock is never held while the data lock is taken.

use core::cell::RefCell;

use embassy_time::Instant;
use log::{debug, warn};

use crate::color::{BLACK, Hsv, Rgb};
use crate::config::{StripConfig, TransitionTimings};
use crate::driver::PixelDriver;
use crate::interpolator::Interpolator;
use crate::lock::{Lock, with_lock};
use crate::mode::{ChangingMode, ColorMode, ColorTarget, ModeId, SolidMode, promote};
use crate::power::PowerBrightness;
use crate::state::{LightSnapshot, Mutation, PowerState};

/// Result of a frame tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// The frame gate has not elapsed yet
    NotDue,
    /// A lock stayed busy, the frame was skipped
    Busy,
    /// Pixels were written and flushed
    Rendered,
}

struct PixelData<D, const N: usize> {
    driver: D,
    pixels: [Rgb; N],
    length: u16,
}

impl<D: PixelDriver, const N: usize> PixelData<D, N> {
    fn fill(&mut self, color: Rgb) {
        for (index, pixel) in self.pixels.iter_mut().take(usize::from(self.length)).enumerate() {
            *pixel = color;
            #[allow(clippy::cast_possible_truncation)]
            self.driver.write(index as u16, color);
        }
        self.driver.flush();
    }

    /// Blank the whole live range and push it out
    fn clear(&mut self) {
        self.fill(BLACK);
    }
}

/// Engine for one physical strip of at most `MAX_LEDS` pixels
pub struct StripEngine<D: PixelDriver, const MAX_LEDS: usize> {
    timings: TransitionTimings,
    mode: Lock<ColorMode>,
    brightness: PowerBrightness,
    frame_gate: critical_section::Mutex<RefCell<Interpolator<u8>>>,
    data: Lock<PixelData<D, MAX_LEDS>>,
}

impl<D: PixelDriver, const MAX_LEDS: usize> StripEngine<D, MAX_LEDS> {
    /// Longest strip this engine can drive
    #[allow(clippy::cast_possible_truncation)]
    pub const MAX_LENGTH: u16 = if MAX_LEDS > u16::MAX as usize {
        u16::MAX
    } else {
        MAX_LEDS as u16
    };

    /// Create a new engine and configure the driver
    ///
    /// The engine boots into a solid color; a persisted transition is never
    /// resumed.
    pub fn new(mut driver: D, config: &StripConfig) -> Self {
        driver.configure(&config.driver_config(Self::MAX_LENGTH));
        let initial = config.initial;
        let length = initial.length.clamp(1, Self::MAX_LENGTH.max(1));
        let timings = config.timings;

        Self {
            timings,
            mode: Lock::new(ColorMode::solid(initial.color)),
            brightness: PowerBrightness::new(
                timings.brightness,
                initial.brightness,
                initial.state,
            )
            .with_lock_attempts(timings.lock_attempts),
            frame_gate: critical_section::Mutex::new(RefCell::new(Interpolator::new(
                timings.frame_interval,
                0,
                u8::MAX,
            ))),
            data: Lock::new(PixelData {
                driver,
                pixels: [BLACK; MAX_LEDS],
                length,
            }),
        }
    }

    pub const fn timings(&self) -> &TransitionTimings {
        &self.timings
    }

    /// Render one frame if the frame gate has elapsed
    ///
    /// This is the main render loop step. Call this continuously.
    pub fn tick(&self, now: Instant) -> TickOutcome {
        if !self.frame_due(now) {
            return TickOutcome::NotDue;
        }

        // Mode phase: advance, settle a finished fade, read the live color
        let live = self.with_mode(|mode| {
            mode.frame(now);
            if let Some(settled) = promote(mode) {
                *mode = settled;
            }
            mode.current_rgb()
        });
        let Some(live) = live else {
            warn!("[StripEngine.tick] mode lock busy, frame skipped");
            return TickOutcome::Busy;
        };

        let color = self.brightness.dimmed_rgb(now, live);

        // Data phase
        if self.with_data(|data| data.fill(color)).is_none() {
            warn!("[StripEngine.tick] data lock busy, frame skipped");
            return TickOutcome::Busy;
        }
        TickOutcome::Rendered
    }

    /// Fade toward an RGB color
    pub fn set_rgb(&self, now: Instant, rgb: Rgb) -> Mutation {
        self.change_color(now, ColorTarget::Rgb(rgb))
    }

    /// Fade toward an HSV color, interpolated in RGB space
    pub fn set_hsv(&self, now: Instant, hsv: Hsv) -> Mutation {
        self.change_color(now, ColorTarget::Hsv(hsv))
    }

    pub fn set_brightness(&self, now: Instant, brightness: u8) -> Mutation {
        self.brightness.set_brightness(now, brightness)
    }

    pub fn set_state(&self, now: Instant, state: PowerState) -> Mutation {
        match state {
            PowerState::On => self.brightness.turn_on(now),
            PowerState::Off => self.brightness.turn_off(now),
        }
    }

    /// Switch the color mode
    ///
    /// [`ModeId::Solid`] settles a running fade at its target right away.
    /// [`ModeId::Changing`] has no destination of its own and is redundant;
    /// fades start through [`Self::set_rgb`] and [`Self::set_hsv`].
    pub fn set_mode(&self, _now: Instant, mode_id: ModeId) -> Mutation {
        let result = self.with_mode(|mode| {
            if mode_id != ModeId::Solid {
                return Mutation::Redundant;
            }
            let ColorMode::Changing(changing) = mode else {
                return Mutation::Redundant;
            };
            let settled = SolidMode::from_parts(changing.target_rgb(), changing.target_hsv());
            *mode = ColorMode::Solid(settled);
            Mutation::Applied
        });
        Self::report("set_mode", result)
    }

    /// Change the number of live pixels
    ///
    /// The old range is blanked and flushed before the new length is adopted.
    pub fn set_length(&self, length: u16) -> Mutation {
        if length == 0 || length > Self::MAX_LENGTH {
            debug!("[StripEngine.set_length] {length} out of range");
            return Mutation::OutOfRange;
        }
        let result = self.with_data(|data| {
            if data.length == length {
                return Mutation::Redundant;
            }
            data.clear();
            data.length = length;
            Mutation::Applied
        });
        Self::report("set_length", result)
    }

    /// Live color, possibly mid-fade
    pub fn get_rgb(&self) -> Rgb {
        self.read_mode("get_rgb", BLACK, ColorMode::current_rgb)
    }

    pub fn get_hsv(&self) -> Hsv {
        self.read_mode("get_hsv", Hsv::default(), ColorMode::current_hsv)
    }

    /// Color the strip is heading to
    pub fn get_target_rgb(&self) -> Rgb {
        self.read_mode("get_target_rgb", BLACK, ColorMode::target_rgb)
    }

    pub fn get_target_hsv(&self) -> Hsv {
        self.read_mode("get_target_hsv", Hsv::default(), ColorMode::target_hsv)
    }

    pub fn get_mode_id(&self) -> ModeId {
        self.read_mode("get_mode_id", ModeId::Solid, ColorMode::id)
    }

    /// Mode the strip settles in once the running fade is over
    pub fn get_target_mode_id(&self) -> ModeId {
        self.read_mode("get_target_mode_id", ModeId::Solid, ColorMode::settled_id)
    }

    /// Currently interpolated brightness
    pub fn get_brightness(&self, now: Instant) -> u8 {
        self.brightness.get_brightness(now)
    }

    pub fn get_target_brightness(&self) -> u8 {
        self.brightness.get_target_brightness()
    }

    /// Brightness restored on power-on
    pub fn get_last_brightness(&self) -> u8 {
        self.brightness.get_last_brightness()
    }

    pub fn get_state(&self) -> PowerState {
        self.brightness.get_state()
    }

    /// Power state, or `None` when the lock stayed busy
    pub fn try_get_state(&self) -> Option<PowerState> {
        self.brightness.try_get_state()
    }

    pub fn try_get_last_brightness(&self) -> Option<u8> {
        self.brightness.try_get_last_brightness()
    }

    /// Power changes apply immediately, only the light level fades
    pub fn get_target_state(&self) -> PowerState {
        self.get_state()
    }

    pub fn get_length(&self) -> u16 {
        self.with_data(|data| data.length).unwrap_or_else(|| {
            warn!("[StripEngine.get_length] data lock busy");
            0
        })
    }

    /// Length changes apply immediately
    pub fn get_target_length(&self) -> u16 {
        self.get_length()
    }

    /// Final values of every field, as sinks and storage see them
    ///
    /// `None` when any lock stayed busy; a partial snapshot is never built
    /// from fallback values.
    pub fn snapshot(&self) -> Option<LightSnapshot> {
        let state = self.brightness.try_get_state()?;
        let brightness = self.brightness.try_get_last_brightness()?;
        let (color, mode) = self.with_mode(|mode| (mode.target_rgb(), mode.settled_id()))?;
        let length = self.with_data(|data| data.length)?;
        Some(LightSnapshot {
            state,
            brightness,
            color,
            mode,
            length,
        })
    }

    /// Run `f` against the driver under the data lock
    pub fn inspect_driver<R>(&self, f: impl FnOnce(&D) -> R) -> Option<R> {
        self.with_data(|data| f(&data.driver))
    }

    /// Pixels last written to the live range
    pub fn pixel(&self, index: u16) -> Option<Rgb> {
        self.with_data(|data| {
            if index < data.length {
                data.pixels.get(usize::from(index)).copied()
            } else {
                None
            }
        })
        .flatten()
    }

    fn change_color(&self, now: Instant, target: ColorTarget) -> Mutation {
        let duration = self.timings.color;
        let result = self.with_mode(|mode| {
            if target.rgb() == mode.target_rgb() {
                return Mutation::Redundant;
            }
            // Resolve the live color at `now`, it may be stale since the last tick
            mode.frame(now);
            let current = mode.current_rgb();
            *mode = ColorMode::Changing(ChangingMode::new(current, target, duration, now));
            Mutation::Applied
        });
        Self::report("set_color", result)
    }

    fn frame_due(&self, now: Instant) -> bool {
        critical_section::with(|cs| {
            let mut gate = self.frame_gate.borrow_ref_mut(cs);
            gate.refresh(now);
            if gate.is_active() {
                return false;
            }
            gate.retarget(now, 0, u8::MAX);
            true
        })
    }

    fn with_mode<R>(&self, f: impl FnOnce(&mut ColorMode) -> R) -> Option<R> {
        with_lock(&self.mode, self.timings.lock_attempts, f)
    }

    fn with_data<R>(&self, f: impl FnOnce(&mut PixelData<D, MAX_LEDS>) -> R) -> Option<R> {
        with_lock(&self.data, self.timings.lock_attempts, f)
    }

    fn read_mode<R>(&self, op: &str, default: R, f: impl FnOnce(&ColorMode) -> R) -> R {
        self.with_mode(|mode| f(mode)).unwrap_or_else(|| {
            warn!("[StripEngine.{op}] mode lock busy, returning default");
            default
        })
    }

    fn report(op: &str, result: Option<Mutation>) -> Mutation {
        let Some(result) = result else {
            warn!("[StripEngine.{op}] lock busy, request rejected");
            return Mutation::Busy;
        };
        debug!("[StripEngine.{op}] {result:?}");
        result
    }
}

#[cfg(test)]
mod tests {
    use embassy_time::Instant;

    use super::*;
    use crate::button::ButtonAction;
    use crate::controller::{LightController, Origin};
    use crate::events::{EventQueue, EventSink, StateEvent};

    struct NullDriver;

    impl PixelDriver for NullDriver {
        fn configure(&mut self, _config: &crate::driver::DriverConfig) {}
        fn write(&mut self, _index: u16, _color: Rgb) {}
        fn flush(&mut self) {}
    }

    fn engine() -> StripEngine<NullDriver, 8> {
        let mut config = StripConfig::default();
        config.timings.lock_attempts = 4;
        config.initial.length = 8;
        StripEngine::new(NullDriver, &config)
    }

    #[test]
    fn test_busy_mode_lock_rejects_commands_and_skips_frames() {
        let engine = engine();
        let now = Instant::from_millis(0);
        let guard = engine.mode.try_lock().ok();
        assert!(guard.is_some());

        assert_eq!(engine.set_rgb(now, Rgb::new(1, 2, 3)), Mutation::Busy);
        assert_eq!(engine.tick(now), TickOutcome::Busy);
        assert_eq!(engine.get_rgb(), BLACK);

        drop(guard);
        assert_eq!(engine.set_rgb(now, Rgb::new(1, 2, 3)), Mutation::Applied);
    }

    #[test]
    fn test_busy_locks_fail_snapshot() {
        let engine = engine();
        assert!(engine.snapshot().is_some());

        let mode = engine.mode.try_lock().ok();
        assert!(mode.is_some());
        assert_eq!(engine.snapshot(), None);
        drop(mode);

        let data = engine.data.try_lock().ok();
        assert!(data.is_some());
        assert_eq!(engine.snapshot(), None);
        drop(data);

        let power = engine.brightness.hold_lock();
        assert!(power.is_some());
        assert_eq!(engine.snapshot(), None);
        assert_eq!(engine.try_get_state(), None);
    }

    #[test]
    fn test_busy_engine_is_not_synced_as_state() {
        let queue = EventQueue::<8>::new();
        let events = EventSink::new(&queue);
        let mut config = StripConfig::default();
        config.timings.lock_attempts = 4;
        config.initial.color = Rgb::new(10, 20, 30);
        config.initial.length = 8;
        let mut controller =
            LightController::<NullDriver, 8, 1>::new(StripEngine::new(NullDriver, &config));
        assert!(controller.register(&events).is_ok());
        let now = Instant::from_millis(0);

        let mode = controller.engine().mode.try_lock().ok();
        let data = controller.engine().data.try_lock().ok();
        assert!(mode.is_some() && data.is_some());
        assert!(!controller.sync_all(Origin::Local));
        assert!(queue.is_empty());
        drop(mode);
        drop(data);

        let power = controller.engine().brightness.hold_lock();
        assert!(power.is_some());
        assert_eq!(controller.toggle(now, Origin::Local), Mutation::Busy);
        assert_eq!(controller.press(now, ButtonAction::BrightnessUp), Mutation::Busy);
        assert_eq!(controller.press(now, ButtonAction::TogglePower), Mutation::Busy);
        assert!(queue.is_empty());
        drop(power);

        assert!(controller.sync_all(Origin::Local));
        assert_eq!(queue.len(), 5);
        assert_eq!(queue.try_pop(), Some(StateEvent::State(PowerState::On)));
        assert_eq!(queue.try_pop(), Some(StateEvent::Brightness(255)));
        assert_eq!(queue.try_pop(), Some(StateEvent::Color(Rgb::new(10, 20, 30))));
    }

    #[test]
    fn test_busy_data_lock_rejects_length_change() {
        let engine = engine();
        let guard = engine.data.try_lock().ok();
        assert!(guard.is_some());

        assert_eq!(engine.set_length(4), Mutation::Busy);
        assert_eq!(engine.get_length(), 0);

        drop(guard);
        assert_eq!(engine.set_length(4), Mutation::Applied);
        assert_eq!(engine.get_length(), 4);
    }
}
