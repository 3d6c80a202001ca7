//! Voice-assistant and home-accessory boundary
//!
//! Both protocol stacks expose a device object with power, brightness and
//! hue/saturation setters plus a change callback. [`AccessorySink`] mirrors
//! engine state onto such a device; [`AccessoryChange`] carries what the
//! remote party asked for back into the controller.

use core::cell::RefCell;

use crate::color::{Hsv, Rgb, rgb_to_hsv};
use crate::mode::ModeId;
use crate::state::PowerState;
use crate::sync::SyncSink;

/// Setter side of an emulated device
///
/// Brightness is in engine units (0-255), hue in degrees and saturation in
/// percent; implementations convert to whatever their protocol speaks.
pub trait AccessoryDevice {
    fn set_power(&mut self, on: bool);
    fn set_brightness(&mut self, brightness: u8);
    fn set_hue_saturation(&mut self, hue: f32, saturation: f32);
}

/// A change requested by the remote side of an accessory
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AccessoryChange {
    Power(bool),
    Brightness(u8),
    HueSaturation { hue: f32, saturation: f32 },
}

impl AccessoryChange {
    /// Full-value HSV for a hue/saturation request
    ///
    /// Accessories control brightness separately, so the color itself is
    /// always requested at full value.
    pub const fn hsv(hue: f32, saturation: f32) -> Hsv {
        Hsv::new(hue, saturation, 100.0)
    }
}

/// [`SyncSink`] that forwards state to an [`AccessoryDevice`]
pub struct AccessorySink<D> {
    device: critical_section::Mutex<RefCell<D>>,
}

impl<D: AccessoryDevice> AccessorySink<D> {
    pub const fn new(device: D) -> Self {
        Self {
            device: critical_section::Mutex::new(RefCell::new(device)),
        }
    }

    /// Run `f` against the wrapped device
    pub fn with_device<R>(&self, f: impl FnOnce(&mut D) -> R) -> R {
        critical_section::with(|cs| f(&mut self.device.borrow_ref_mut(cs)))
    }
}

impl<D: AccessoryDevice> SyncSink for AccessorySink<D> {
    fn sync_color(&self, color: Rgb) {
        let hsv = rgb_to_hsv(color);
        self.with_device(|device| device.set_hue_saturation(hsv.hue, hsv.saturation));
    }

    fn sync_brightness(&self, brightness: u8) {
        self.with_device(|device| device.set_brightness(brightness));
    }

    fn sync_state(&self, state: PowerState) {
        self.with_device(|device| device.set_power(state.is_on()));
    }

    fn sync_mode(&self, _mode: ModeId) {}

    fn sync_length(&self, _length: u16) {}
}
