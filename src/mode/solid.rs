//! Solid color mode
//!
//! Terminal state of the color machine: one color, nothing in progress.

use embassy_time::Instant;

use crate::color::{Hsv, Rgb, rgb_to_hsv};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolidMode {
    rgb: Rgb,
    hsv: Hsv,
}

impl Default for SolidMode {
    fn default() -> Self {
        Self::new(Rgb::default())
    }
}

impl SolidMode {
    pub fn new(rgb: Rgb) -> Self {
        Self {
            rgb,
            hsv: rgb_to_hsv(rgb),
        }
    }

    /// Keep an HSV value exactly as the caller gave it
    pub const fn from_parts(rgb: Rgb, hsv: Hsv) -> Self {
        Self { rgb, hsv }
    }

    pub const fn rgb(&self) -> Rgb {
        self.rgb
    }

    pub const fn hsv(&self) -> Hsv {
        self.hsv
    }

    pub fn frame(&mut self, _now: Instant) {}

    pub const fn is_done(&self) -> bool {
        true
    }
}
