/// Scale an 8-bit channel by a brightness level (0-255 = 0.0-1.0)
///
/// Truncates instead of rounding, so anything below full brightness never
/// reaches the original channel value.
#[inline]
#[allow(clippy::cast_possible_truncation)]
pub const fn dim8(value: u8, brightness: u8) -> u8 {
    ((value as u16 * brightness as u16) / 255) as u8
}

/// Linear blend between two bytes by a `[0, 1]` fraction, rounded
#[inline]
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_lossless
)]
pub fn lerp8(start: u8, target: u8, progress: f64) -> u8 {
    let progress = progress.clamp(0.0, 1.0);
    let delta = f64::from(target) - f64::from(start);
    let value = libm::round(f64::from(start) + delta * progress);
    value.clamp(0.0, 255.0) as u8
}

/// Convert a 0-100 percent value into the 0-255 range
#[allow(clippy::cast_possible_truncation)]
pub const fn percent_to_u8(percent: u8) -> u8 {
    let percent = if percent > 100 { 100 } else { percent };
    ((percent as u16 * 255 + 50) / 100) as u8
}

/// Convert a 0-255 value into the 0-100 percent range
#[allow(clippy::cast_possible_truncation)]
pub const fn u8_to_percent(value: u8) -> u8 {
    ((value as u16 * 100 + 127) / 255) as u8
}
