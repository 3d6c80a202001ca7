//! Pixel driver abstraction
//!
//! The engine only ever talks to a [`PixelDriver`]. [`SmartLedsDriver`]
//! adapts any `smart_leds::SmartLedsWrite` implementation (WS2812 over RMT,
//! SPI, and so on) to it.

use log::warn;
use smart_leds::SmartLedsWrite;

use crate::color::{BLACK, Rgb};

/// Wire protocol of the strip
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LedProtocol {
    #[default]
    Ws2812,
    Sk6812,
    Ws2811,
}

/// Order in which the strip expects color channels on the wire
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChannelOrder {
    Rgb,
    #[default]
    Grb,
    Brg,
    Bgr,
    Rbg,
    Gbr,
}

impl ChannelOrder {
    /// Reorder a color so that `r, g, b` land in wire order
    pub const fn apply(self, color: Rgb) -> Rgb {
        let Rgb { r, g, b } = color;
        let (first, second, third) = match self {
            Self::Rgb => (r, g, b),
            Self::Grb => (g, r, b),
            Self::Brg => (b, r, g),
            Self::Bgr => (b, g, r),
            Self::Rbg => (r, b, g),
            Self::Gbr => (g, b, r),
        };
        Rgb {
            r: first,
            g: second,
            b: third,
        }
    }
}

/// Hardware setup passed to [`PixelDriver::configure`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DriverConfig {
    /// Data pin number
    pub pin: u8,
    pub protocol: LedProtocol,
    pub channel_order: ChannelOrder,
    /// Number of pixels the driver must be able to address
    pub max_count: u16,
}

/// Abstract LED driver trait
///
/// Implement this trait to support different hardware platforms.
/// The strip engine is generic over this trait.
pub trait PixelDriver {
    /// Prepare the hardware, called once by the engine on creation
    fn configure(&mut self, config: &DriverConfig);

    /// Stage one pixel, visible after the next [`Self::flush`]
    fn write(&mut self, index: u16, color: Rgb);

    /// Push staged pixels to the strip
    fn flush(&mut self);
}

/// [`PixelDriver`] on top of a `smart_leds` writer
///
/// Pixels are buffered and sent as one frame on flush.
pub struct SmartLedsDriver<W, const N: usize> {
    writer: W,
    buffer: [Rgb; N],
    count: usize,
    order: ChannelOrder,
}

impl<W, const N: usize> SmartLedsDriver<W, N>
where
    W: SmartLedsWrite,
    W::Color: From<Rgb>,
    W::Error: core::fmt::Debug,
{
    pub const fn new(writer: W) -> Self {
        Self {
            writer,
            buffer: [BLACK; N],
            count: N,
            order: ChannelOrder::Rgb,
        }
    }

    pub const fn writer(&self) -> &W {
        &self.writer
    }
}

impl<W, const N: usize> PixelDriver for SmartLedsDriver<W, N>
where
    W: SmartLedsWrite,
    W::Color: From<Rgb>,
    W::Error: core::fmt::Debug,
{
    fn configure(&mut self, config: &DriverConfig) {
        self.order = config.channel_order;
        self.count = usize::from(config.max_count).min(N);
    }

    fn write(&mut self, index: u16, color: Rgb) {
        if let Some(pixel) = self.buffer.get_mut(usize::from(index)) {
            *pixel = self.order.apply(color);
        }
    }

    fn flush(&mut self) {
        let frame = self.buffer.iter().take(self.count).copied();
        if let Err(err) = self.writer.write(frame) {
            warn!("[SmartLedsDriver.flush] write failed: {err:?}");
        }
    }
}
