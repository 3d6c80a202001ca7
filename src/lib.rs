#![cfg_attr(not(test), no_std)]

pub mod accessory;
pub mod button;
pub mod color;
pub mod command;
pub mod config;
pub mod controller;
pub mod driver;
pub mod engine;
pub mod events;
pub mod frame_scheduler;
pub mod interpolator;
pub mod lock;
pub mod math8;
pub mod mode;
pub mod power;
pub mod state;
pub mod storage;
pub mod sync;

pub use accessory::{AccessoryChange, AccessoryDevice, AccessorySink};
pub use button::{Button, ButtonAction};
pub use command::{Command, CommandError};
pub use config::{StripConfig, TransitionTimings};
pub use controller::{LightController, Origin};
pub use driver::{ChannelOrder, DriverConfig, LedProtocol, PixelDriver, SmartLedsDriver};
pub use engine::{StripEngine, TickOutcome};
pub use events::{EventQueue, EventSink, StateEvent};
pub use frame_scheduler::FrameScheduler;
pub use interpolator::{Interpolator, Lerp};
pub use mode::{ChangingMode, ColorMode, ColorTarget, ModeId, SolidMode};
pub use power::PowerBrightness;
pub use state::{LightSnapshot, Mutation, PowerState};
pub use storage::{KeyValueStore, StorageSink};
pub use sync::{SinkId, SyncFanout, SyncMask, SyncSink};

pub use color::{Hsv, Rgb, hsv_to_rgb, rgb_to_hsv};
pub use embassy_time::{Duration, Instant};

/// Route `log` output through `esp-println`
#[cfg(feature = "esp32-log")]
pub fn init_logger(level: log::LevelFilter) {
    esp_println::logger::init_logger(level);
}
