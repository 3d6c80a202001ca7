//! HSV model used by UI widgets and accessories
//!
//! Hue is in degrees `[0, 360)`, saturation and value are percentages
//! `[0, 100]`. Floating point keeps the RGB round trip within one step per
//! channel, which the 8-bit `smart_leds` HSV cannot do.

use super::Rgb;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Hsv {
    pub hue: f32,
    pub saturation: f32,
    pub value: f32,
}

impl Hsv {
    pub const fn new(hue: f32, saturation: f32, value: f32) -> Self {
        Self {
            hue,
            saturation,
            value,
        }
    }
}

impl From<Rgb> for Hsv {
    fn from(rgb: Rgb) -> Self {
        rgb_to_hsv(rgb)
    }
}

impl From<Hsv> for Rgb {
    fn from(hsv: Hsv) -> Self {
        hsv_to_rgb(hsv)
    }
}

/// Convert RGB to HSV
#[allow(clippy::float_cmp)]
pub fn rgb_to_hsv(rgb: Rgb) -> Hsv {
    let r = f32::from(rgb.r) / 255.0;
    let g = f32::from(rgb.g) / 255.0;
    let b = f32::from(rgb.b) / 255.0;

    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let delta = max - min;

    let hue = if delta <= 0.0 {
        0.0
    } else if max == r {
        60.0 * libm::fmodf((g - b) / delta, 6.0)
    } else if max == g {
        60.0 * ((b - r) / delta + 2.0)
    } else {
        60.0 * ((r - g) / delta + 4.0)
    };
    let hue = if hue < 0.0 { hue + 360.0 } else { hue };

    let saturation = if max <= 0.0 { 0.0 } else { delta / max * 100.0 };

    Hsv {
        hue,
        saturation,
        value: max * 100.0,
    }
}

/// Convert HSV to RGB
///
/// Out-of-range hue wraps around the circle, saturation and value are
/// clamped to `[0, 100]`.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn hsv_to_rgb(hsv: Hsv) -> Rgb {
    let mut hue = libm::fmodf(hsv.hue, 360.0);
    if hue < 0.0 {
        hue += 360.0;
    }
    let saturation = hsv.saturation.clamp(0.0, 100.0) / 100.0;
    let value = hsv.value.clamp(0.0, 100.0) / 100.0;

    let chroma = value * saturation;
    let sector = hue / 60.0;
    let x = chroma * (1.0 - libm::fabsf(libm::fmodf(sector, 2.0) - 1.0));
    let m = value - chroma;

    let (r, g, b) = match sector as u8 {
        0 => (chroma, x, 0.0),
        1 => (x, chroma, 0.0),
        2 => (0.0, chroma, x),
        3 => (0.0, x, chroma),
        4 => (x, 0.0, chroma),
        _ => (chroma, 0.0, x),
    };

    let to_channel = |c: f32| libm::roundf((c + m) * 255.0).clamp(0.0, 255.0) as u8;
    Rgb {
        r: to_channel(r),
        g: to_channel(g),
        b: to_channel(b),
    }
}
