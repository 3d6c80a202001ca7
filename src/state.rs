//! Plain-value state shared between the engine, the controller and sinks

use crate::color::Rgb;
use crate::mode::ModeId;

/// Power state of the strip
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PowerState {
    #[default]
    Off,
    On,
}

impl PowerState {
    pub const fn is_on(self) -> bool {
        matches!(self, Self::On)
    }

    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::On => Self::Off,
            Self::Off => Self::On,
        }
    }
}

impl From<bool> for PowerState {
    fn from(on: bool) -> Self {
        if on { Self::On } else { Self::Off }
    }
}

impl From<PowerState> for bool {
    fn from(state: PowerState) -> Self {
        state.is_on()
    }
}

/// Result of a mutation request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mutation {
    /// The state changed
    Applied,
    /// The request matched the current target, nothing changed
    Redundant,
    /// A lock could not be taken in time, or a transition is in flight
    Busy,
    /// The value is outside of what the strip supports
    OutOfRange,
}

impl Mutation {
    /// Whether the caller should treat the request as successful
    pub const fn is_accepted(self) -> bool {
        matches!(self, Self::Applied | Self::Redundant)
    }

    /// Whether sinks need to hear about it
    pub const fn is_applied(self) -> bool {
        matches!(self, Self::Applied)
    }
}

/// Final (target) values of every externally visible field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LightSnapshot {
    pub state: PowerState,
    pub brightness: u8,
    pub color: Rgb,
    pub mode: ModeId,
    pub length: u16,
}

impl Default for LightSnapshot {
    fn default() -> Self {
        Self {
            state: PowerState::On,
            brightness: 255,
            color: Rgb {
                r: 255,
                g: 255,
                b: 255,
            },
            mode: ModeId::Solid,
            length: 60,
        }
    }
}
