//! Light controller
//!
//! Entry point for every control surface. A request is validated, applied to
//! the [`StripEngine`] and, when it actually changed something, mirrored to
//! the registered sinks. The sink a change came from is masked out so it
//! never receives its own change back.

use embassy_time::Instant;
use log::{info, warn};

use crate::accessory::AccessoryChange;
use crate::button::{BRIGHTNESS_STEP, ButtonAction};
use crate::color::{Hsv, Rgb, hsv_to_rgb};
use crate::command::{Command, CommandError};
use crate::driver::PixelDriver;
use crate::engine::{StripEngine, TickOutcome};
use crate::mode::ModeId;
use crate::state::{LightSnapshot, Mutation, PowerState};
use crate::sync::{FanoutFull, SinkId, SyncFanout, SyncMask, SyncSink};

/// Where a request came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    /// CLI, buttons or anything else that is not a registered sink
    Local,
    /// A registered sink, which is excluded from the resulting sync
    Sink(SinkId),
}

/// Owner of the strip engine and of the sink fan-out
pub struct LightController<'a, D: PixelDriver, const MAX_LEDS: usize, const SINKS: usize> {
    engine: StripEngine<D, MAX_LEDS>,
    fanout: SyncFanout<'a, SINKS>,
}

impl<'a, D: PixelDriver, const MAX_LEDS: usize, const SINKS: usize>
    LightController<'a, D, MAX_LEDS, SINKS>
{
    pub const fn new(engine: StripEngine<D, MAX_LEDS>) -> Self {
        Self {
            engine,
            fanout: SyncFanout::new(),
        }
    }

    /// Register a sink; its id is what callbacks from it pass as origin
    pub fn register(&mut self, sink: &'a dyn SyncSink) -> Result<SinkId, FanoutFull> {
        self.fanout.register(sink)
    }

    pub const fn engine(&self) -> &StripEngine<D, MAX_LEDS> {
        &self.engine
    }

    pub const fn fanout(&self) -> &SyncFanout<'a, SINKS> {
        &self.fanout
    }

    /// Target state of every field, `None` while a lock is busy
    pub fn snapshot(&self) -> Option<LightSnapshot> {
        self.engine.snapshot()
    }

    /// Render a frame if one is due
    pub fn tick(&self, now: Instant) -> TickOutcome {
        self.engine.tick(now)
    }

    pub fn set_rgb(&self, now: Instant, rgb: Rgb, origin: Origin) -> Mutation {
        let result = self.engine.set_rgb(now, rgb);
        if result.is_applied() {
            self.fanout.sync_color(rgb, Self::mask(origin));
        }
        result
    }

    pub fn set_hsv(&self, now: Instant, hsv: Hsv, origin: Origin) -> Mutation {
        let result = self.engine.set_hsv(now, hsv);
        if result.is_applied() {
            self.fanout.sync_color(hsv_to_rgb(hsv), Self::mask(origin));
        }
        result
    }

    /// Set the brightness
    ///
    /// Zero powers the strip off; a nonzero value while off powers it on at
    /// that level.
    pub fn set_brightness(&self, now: Instant, brightness: u8, origin: Origin) -> Mutation {
        if brightness == 0 {
            return self.set_state(now, PowerState::Off, origin);
        }

        let mask = Self::mask(origin);
        let level = self.engine.set_brightness(now, brightness);
        if level.is_applied() {
            self.fanout.sync_brightness(brightness, mask);
        }
        if !level.is_accepted() {
            return level;
        }
        match self.engine.try_get_state() {
            Some(PowerState::Off) => {}
            Some(PowerState::On) => return level,
            None => {
                warn!("[LightController.set_brightness] power state busy, not powering on");
                return level;
            }
        }

        let power = self.engine.set_state(now, PowerState::On);
        if power.is_applied() {
            self.fanout.sync_state(PowerState::On, mask);
        }
        combine(level, power)
    }

    pub fn set_state(&self, now: Instant, state: PowerState, origin: Origin) -> Mutation {
        let result = self.engine.set_state(now, state);
        if result.is_applied() {
            self.fanout.sync_state(state, Self::mask(origin));
        }
        result
    }

    pub fn toggle(&self, now: Instant, origin: Origin) -> Mutation {
        let Some(state) = self.engine.try_get_state() else {
            warn!("[LightController.toggle] power state busy, request rejected");
            return Mutation::Busy;
        };
        self.set_state(now, state.toggled(), origin)
    }

    pub fn set_mode(&self, now: Instant, mode: ModeId, origin: Origin) -> Mutation {
        let result = self.engine.set_mode(now, mode);
        if result.is_applied() {
            self.fanout.sync_mode(mode, Self::mask(origin));
        }
        result
    }

    pub fn set_length(&self, length: u16, origin: Origin) -> Mutation {
        let result = self.engine.set_length(length);
        if result.is_applied() {
            self.fanout.sync_length(length, Self::mask(origin));
        }
        result
    }

    /// Push the complete state to every sink but the origin
    ///
    /// Skipped while the engine cannot be read consistently; returns whether
    /// the sync ran.
    pub fn sync_all(&self, origin: Origin) -> bool {
        let Some(snapshot) = self.engine.snapshot() else {
            warn!("[LightController.sync_all] engine busy, sync skipped");
            return false;
        };
        self.fanout.sync_all(&snapshot, Self::mask(origin));
        true
    }

    /// Run a parsed command
    ///
    /// A rejected mutation comes back as [`CommandError::Rejected`], whose
    /// message is meant to be echoed on the channel the command came from.
    pub fn execute(
        &self,
        now: Instant,
        command: Command,
        origin: Origin,
    ) -> Result<Mutation, CommandError> {
        let result = match command {
            Command::On => self.set_state(now, PowerState::On, origin),
            Command::Off => self.set_state(now, PowerState::Off, origin),
            Command::Toggle => self.toggle(now, origin),
            Command::Brightness(brightness) => self.set_brightness(now, brightness, origin),
            Command::Rgb(rgb) => self.set_rgb(now, rgb, origin),
            Command::Hsv(hsv) => self.set_hsv(now, hsv, origin),
            Command::Mode(mode) => self.set_mode(now, mode, origin),
            Command::Length(length) => self.set_length(length, origin),
            Command::Status => match self.engine.snapshot() {
                Some(snapshot) => {
                    info!("[LightController.execute] status: {snapshot:?}");
                    Mutation::Redundant
                }
                None => Mutation::Busy,
            },
        };

        if !result.is_accepted() {
            warn!("[LightController.execute] {command:?} rejected: {result:?}");
            return Err(CommandError::Rejected(result));
        }
        info!("[LightController.execute] {command:?}: {result:?}");
        Ok(result)
    }

    /// Parse and run one command line
    pub fn execute_line(
        &self,
        now: Instant,
        line: &str,
        origin: Origin,
    ) -> Result<Mutation, CommandError> {
        let command = Command::parse(line).inspect_err(|err| {
            warn!("[LightController.execute_line] {line:?}: {err}");
        })?;
        self.execute(now, command, origin)
    }

    /// Apply a change requested through a voice or home accessory
    pub fn apply_accessory(&self, now: Instant, change: AccessoryChange, origin: Origin) -> Mutation {
        match change {
            AccessoryChange::Power(on) => self.set_state(now, PowerState::from(on), origin),
            AccessoryChange::Brightness(brightness) => {
                self.set_brightness(now, brightness, origin)
            }
            AccessoryChange::HueSaturation { hue, saturation } => {
                self.set_hsv(now, AccessoryChange::hsv(hue, saturation), origin)
            }
        }
    }

    /// Handle a debounced button press
    pub fn press(&self, now: Instant, action: ButtonAction) -> Mutation {
        if action == ButtonAction::TogglePower {
            return self.toggle(now, Origin::Local);
        }
        let Some(last) = self.engine.try_get_last_brightness() else {
            warn!("[LightController.press] brightness busy, {action:?} ignored");
            return Mutation::Busy;
        };
        let brightness = match action {
            ButtonAction::BrightnessDown => last.saturating_sub(BRIGHTNESS_STEP).max(1),
            _ => last.saturating_add(BRIGHTNESS_STEP),
        };
        self.set_brightness(now, brightness, Origin::Local)
    }

    const fn mask(origin: Origin) -> SyncMask<SINKS> {
        match origin {
            Origin::Local => SyncMask::all(),
            Origin::Sink(sink) => SyncMask::except(sink),
        }
    }
}

/// Outcome of a request that touched both brightness and power
fn combine(first: Mutation, second: Mutation) -> Mutation {
    match (first, second) {
        (Mutation::Applied, _) | (_, Mutation::Applied) => Mutation::Applied,
        (Mutation::Redundant, other) | (other, Mutation::Redundant) => other,
        (other, _) => other,
    }
}
