use embassy_time::Duration;

use crate::driver::{ChannelOrder, DriverConfig, LedProtocol};
use crate::lock::DEFAULT_LOCK_ATTEMPTS;
use crate::state::LightSnapshot;

/// Default minimum interval between two rendered frames
pub const DEFAULT_FRAME_INTERVAL: Duration = Duration::from_millis(10);

/// Default duration of a color fade
pub const DEFAULT_COLOR_DURATION: Duration = Duration::from_millis(500);

/// Default duration of a brightness or power fade
pub const DEFAULT_BRIGHTNESS_DURATION: Duration = Duration::from_millis(300);

/// Configuration for transitions and frame pacing
#[derive(Debug, Clone, Copy)]
pub struct TransitionTimings {
    /// Duration of color change
    pub color: Duration,
    /// Duration of brightness change and power fades
    pub brightness: Duration,
    /// Minimum interval between frames
    pub frame_interval: Duration,
    /// Number of `try_lock` attempts before a lock counts as busy
    pub lock_attempts: u32,
}

impl TransitionTimings {
    pub const DEFAULT: Self = Self {
        color: DEFAULT_COLOR_DURATION,
        brightness: DEFAULT_BRIGHTNESS_DURATION,
        frame_interval: DEFAULT_FRAME_INTERVAL,
        lock_attempts: DEFAULT_LOCK_ATTEMPTS,
    };
}

impl Default for TransitionTimings {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Configuration for the strip engine
#[derive(Debug, Clone, Copy)]
pub struct StripConfig {
    /// Data pin of the strip
    pub pin: u8,
    pub protocol: LedProtocol,
    pub channel_order: ChannelOrder,
    pub timings: TransitionTimings,
    /// State to boot into, always rendered as a solid color
    pub initial: LightSnapshot,
}

impl Default for StripConfig {
    fn default() -> Self {
        Self {
            pin: 2,
            protocol: LedProtocol::default(),
            channel_order: ChannelOrder::default(),
            timings: TransitionTimings::DEFAULT,
            initial: LightSnapshot::default(),
        }
    }
}

impl StripConfig {
    /// Driver setup for a strip of at most `max_count` pixels
    pub const fn driver_config(&self, max_count: u16) -> DriverConfig {
        DriverConfig {
            pin: self.pin,
            protocol: self.protocol,
            channel_order: self.channel_order,
            max_count,
        }
    }
}
