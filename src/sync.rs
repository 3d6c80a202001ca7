//! Sync fan-out
//!
//! Broadcasts accepted state changes to a masked subset of registered sinks
//! (storage, web UI, voice assistant, home accessory, ...). Each call carries
//! a [`SyncMask`] with one flag per sink position, which is how a change
//! coming from sink `k` avoids being echoed back to sink `k`.

use heapless::Vec;
use log::debug;

use crate::color::Rgb;
use crate::mode::ModeId;
use crate::state::{LightSnapshot, PowerState};

/// Uniform contract every sink implements
///
/// Only plain values cross this boundary. Sinks that cannot represent a field
/// simply ignore the call.
pub trait SyncSink {
    fn sync_color(&self, color: Rgb);
    fn sync_brightness(&self, brightness: u8);
    fn sync_state(&self, state: PowerState);
    fn sync_mode(&self, mode: ModeId);
    fn sync_length(&self, length: u16);
}

/// Stable position of a registered sink
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SinkId(pub usize);

/// Returned by [`SyncFanout::register`] when every slot is taken
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("sync fan-out is full ({capacity} sinks)")]
pub struct FanoutFull {
    pub capacity: usize,
}

/// One flag per sink position; `true` lets the call through
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyncMask<const N: usize>([bool; N]);

impl<const N: usize> SyncMask<N> {
    pub const fn all() -> Self {
        Self([true; N])
    }

    pub const fn none() -> Self {
        Self([false; N])
    }

    /// Every sink except `sink`, used for changes that came from it
    pub const fn except(sink: SinkId) -> Self {
        let mut flags = [true; N];
        if sink.0 < N {
            flags[sink.0] = false;
        }
        Self(flags)
    }

    /// Only `sink`
    pub const fn only(sink: SinkId) -> Self {
        let mut flags = [false; N];
        if sink.0 < N {
            flags[sink.0] = true;
        }
        Self(flags)
    }

    pub fn allows(&self, index: usize) -> bool {
        self.0.get(index).copied().unwrap_or(false)
    }
}

impl<const N: usize> From<[bool; N]> for SyncMask<N> {
    fn from(flags: [bool; N]) -> Self {
        Self(flags)
    }
}

/// Ordered registry of at most `N` sinks
///
/// The fan-out borrows its sinks; it never owns the interfaces behind them.
pub struct SyncFanout<'a, const N: usize> {
    sinks: Vec<&'a dyn SyncSink, N>,
}

impl<const N: usize> Default for SyncFanout<'_, N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a, const N: usize> SyncFanout<'a, N> {
    pub const fn new() -> Self {
        Self { sinks: Vec::new() }
    }

    /// Register a sink at the next free position
    pub fn register(&mut self, sink: &'a dyn SyncSink) -> Result<SinkId, FanoutFull> {
        let id = SinkId(self.sinks.len());
        self.sinks
            .push(sink)
            .map_err(|_| FanoutFull { capacity: N })?;
        debug!("[SyncFanout.register] sink registered at {}", id.0);
        Ok(id)
    }

    pub fn len(&self) -> usize {
        self.sinks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sinks.is_empty()
    }

    pub fn sync_color(&self, color: Rgb, mask: SyncMask<N>) {
        self.each(mask, |sink| sink.sync_color(color));
    }

    pub fn sync_brightness(&self, brightness: u8, mask: SyncMask<N>) {
        self.each(mask, |sink| sink.sync_brightness(brightness));
    }

    pub fn sync_state(&self, state: PowerState, mask: SyncMask<N>) {
        self.each(mask, |sink| sink.sync_state(state));
    }

    pub fn sync_mode(&self, mode: ModeId, mask: SyncMask<N>) {
        self.each(mask, |sink| sink.sync_mode(mode));
    }

    pub fn sync_length(&self, length: u16, mask: SyncMask<N>) {
        self.each(mask, |sink| sink.sync_length(length));
    }

    /// Push every field, in order: state, brightness, color, mode, length
    ///
    /// This is five separate calls per sink, not one atomic message.
    pub fn sync_all(&self, snapshot: &LightSnapshot, mask: SyncMask<N>) {
        self.sync_state(snapshot.state, mask);
        self.sync_brightness(snapshot.brightness, mask);
        self.sync_color(snapshot.color, mask);
        self.sync_mode(snapshot.mode, mask);
        self.sync_length(snapshot.length, mask);
    }

    fn each(&self, mask: SyncMask<N>, mut f: impl FnMut(&dyn SyncSink)) {
        for (index, sink) in self.sinks.iter().enumerate() {
            if mask.allows(index) {
                f(*sink);
            }
        }
    }
}
