//! Linear color transition
//!
//! The fade always runs in RGB space. An HSV target is converted once on
//! construction; the original HSV is kept only for reporting.

use embassy_time::{Duration, Instant};

use crate::color::{Hsv, Rgb, hsv_to_rgb, rgb_to_hsv};
use crate::interpolator::Interpolator;

/// Destination of a color change
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ColorTarget {
    Rgb(Rgb),
    Hsv(Hsv),
}

impl ColorTarget {
    /// Resolve the target into the RGB value the fade heads to
    pub fn rgb(self) -> Rgb {
        match self {
            Self::Rgb(rgb) => rgb,
            Self::Hsv(hsv) => hsv_to_rgb(hsv),
        }
    }

    pub fn hsv(self) -> Hsv {
        match self {
            Self::Rgb(rgb) => rgb_to_hsv(rgb),
            Self::Hsv(hsv) => hsv,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ChangingMode {
    timer: Interpolator<Rgb>,
    target_hsv: Hsv,
    live: Rgb,
}

impl ChangingMode {
    /// Start fading from `current` toward `target`
    pub fn new(current: Rgb, target: ColorTarget, duration: Duration, now: Instant) -> Self {
        Self {
            timer: Interpolator::started(duration, current, target.rgb(), now),
            target_hsv: target.hsv(),
            live: current,
        }
    }

    /// Resolve the interpolated color and publish it as the live color
    pub fn frame(&mut self, now: Instant) {
        self.live = self.timer.current_value(now);
    }

    pub const fn is_done(&self) -> bool {
        self.timer.is_done()
    }

    pub const fn current_rgb(&self) -> Rgb {
        self.live
    }

    pub fn current_hsv(&self) -> Hsv {
        rgb_to_hsv(self.live)
    }

    pub const fn target_rgb(&self) -> Rgb {
        self.timer.target_value()
    }

    pub const fn target_hsv(&self) -> Hsv {
        self.target_hsv
    }

    pub const fn start_rgb(&self) -> Rgb {
        self.timer.start_value()
    }

    pub const fn progress(&self) -> f64 {
        self.timer.progress()
    }
}
