//! Color mode system with compile-time known mode variants
//!
//! All modes are stored in an enum to avoid heap allocations.
//! A strip is either settled on a [`SolidMode`] or fading through a
//! [`ChangingMode`]; a finished fade is promoted back to solid by
//! [`promote`].

mod changing;
mod solid;

use embassy_time::Instant;

pub use changing::{ChangingMode, ColorTarget};
pub use solid::SolidMode;

use crate::color::{Hsv, Rgb};

const MODE_NAME_SOLID: &str = "solid";
const MODE_NAME_CHANGING: &str = "changing";

const MODE_ID_SOLID: u8 = 0;
const MODE_ID_CHANGING: u8 = 1;

/// Stable mode ids, persisted and exposed to sinks.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[repr(u8)]
pub enum ModeId {
    #[default]
    Solid = MODE_ID_SOLID,
    Changing = MODE_ID_CHANGING,
}

impl ModeId {
    pub fn from_raw(value: u8) -> Option<Self> {
        Some(match value {
            MODE_ID_SOLID => Self::Solid,
            MODE_ID_CHANGING => Self::Changing,
            _ => return None,
        })
    }

    pub const fn as_raw(self) -> u8 {
        self as u8
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Solid => MODE_NAME_SOLID,
            Self::Changing => MODE_NAME_CHANGING,
        }
    }

    pub fn parse_from_str(s: &str) -> Option<Self> {
        match s {
            MODE_NAME_SOLID => Some(Self::Solid),
            MODE_NAME_CHANGING => Some(Self::Changing),
            _ => None,
        }
    }
}

/// The active color-producing behavior
#[derive(Debug, Clone)]
pub enum ColorMode {
    /// Settled single color
    Solid(SolidMode),
    /// Linear fade toward a target color
    Changing(ChangingMode),
}

impl Default for ColorMode {
    fn default() -> Self {
        Self::Solid(SolidMode::default())
    }
}

impl ColorMode {
    pub fn solid(rgb: Rgb) -> Self {
        Self::Solid(SolidMode::new(rgb))
    }

    /// Get the mode ID for external observation
    pub fn id(&self) -> ModeId {
        match self {
            Self::Solid(_) => ModeId::Solid,
            Self::Changing(_) => ModeId::Changing,
        }
    }

    /// Mode left once any running fade has finished
    pub fn settled_id(&self) -> ModeId {
        ModeId::Solid
    }

    /// Advance the mode to `now`
    pub fn frame(&mut self, now: Instant) {
        match self {
            Self::Solid(mode) => mode.frame(now),
            Self::Changing(mode) => mode.frame(now),
        }
    }

    pub fn is_done(&self) -> bool {
        match self {
            Self::Solid(mode) => mode.is_done(),
            Self::Changing(mode) => mode.is_done(),
        }
    }

    /// Live color, possibly mid-fade
    pub fn current_rgb(&self) -> Rgb {
        match self {
            Self::Solid(mode) => mode.rgb(),
            Self::Changing(mode) => mode.current_rgb(),
        }
    }

    pub fn current_hsv(&self) -> Hsv {
        match self {
            Self::Solid(mode) => mode.hsv(),
            Self::Changing(mode) => mode.current_hsv(),
        }
    }

    /// Final color, never the interpolated one
    pub fn target_rgb(&self) -> Rgb {
        match self {
            Self::Solid(mode) => mode.rgb(),
            Self::Changing(mode) => mode.target_rgb(),
        }
    }

    pub fn target_hsv(&self) -> Hsv {
        match self {
            Self::Solid(mode) => mode.hsv(),
            Self::Changing(mode) => mode.target_hsv(),
        }
    }
}

/// Settle a finished fade
///
/// Returns the [`SolidMode`] replacing a done [`ChangingMode`], `None` when
/// the mode should stay as it is.
pub fn promote(mode: &ColorMode) -> Option<ColorMode> {
    match mode {
        ColorMode::Changing(changing) if changing.is_done() => {
            Some(ColorMode::Solid(SolidMode::from_parts(
                changing.target_rgb(),
                changing.target_hsv(),
            )))
        }
        _ => None,
    }
}
