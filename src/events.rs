//! Push channel for unsolicited state updates
//!
//! The web transport drains an [`EventQueue`] and forwards each
//! [`StateEvent`] to connected clients. The queue is built on
//! `critical-section` and `heapless::Deque`, so sinks running in any context
//! can push into it.

use core::cell::RefCell;

use critical_section::Mutex;
use heapless::Deque;
use log::warn;

use crate::color::Rgb;
use crate::mode::ModeId;
use crate::state::PowerState;
use crate::sync::SyncSink;

/// One changed field, as pushed to the web UI
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StateEvent {
    Color(Rgb),
    Brightness(u8),
    State(PowerState),
    Mode(ModeId),
    Length(u16),
}

/// Error returned when trying to push into a full queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("event queue is full")]
pub struct QueueFull(pub StateEvent);

/// A bounded, interrupt-safe queue of state events.
pub struct EventQueue<const SIZE: usize> {
    inner: Mutex<RefCell<Deque<StateEvent, SIZE>>>,
}

impl<const SIZE: usize> EventQueue<SIZE> {
    pub const fn new() -> Self {
        Self {
            inner: Mutex::new(RefCell::new(Deque::new())),
        }
    }

    /// Returns `Err(QueueFull(event))` if the queue is full.
    pub fn try_push(&self, event: StateEvent) -> Result<(), QueueFull> {
        critical_section::with(|cs| {
            let mut queue = self.inner.borrow_ref_mut(cs);
            queue.push_back(event).map_err(QueueFull)
        })
    }

    /// Take the oldest pending event, if any.
    pub fn try_pop(&self) -> Option<StateEvent> {
        critical_section::with(|cs| self.inner.borrow_ref_mut(cs).pop_front())
    }

    pub fn len(&self) -> usize {
        critical_section::with(|cs| self.inner.borrow_ref(cs).len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<const SIZE: usize> Default for EventQueue<SIZE> {
    fn default() -> Self {
        Self::new()
    }
}

/// [`SyncSink`] that turns sync calls into [`StateEvent`]s
///
/// A full queue drops the event; the web UI catches up on its next full
/// state request.
#[derive(Clone, Copy)]
pub struct EventSink<'q, const SIZE: usize> {
    queue: &'q EventQueue<SIZE>,
}

impl<'q, const SIZE: usize> EventSink<'q, SIZE> {
    pub const fn new(queue: &'q EventQueue<SIZE>) -> Self {
        Self { queue }
    }

    fn push(&self, event: StateEvent) {
        if let Err(QueueFull(event)) = self.queue.try_push(event) {
            warn!("[EventSink] queue full, dropping {event:?}");
        }
    }
}

impl<const SIZE: usize> SyncSink for EventSink<'_, SIZE> {
    fn sync_color(&self, color: Rgb) {
        self.push(StateEvent::Color(color));
    }

    fn sync_brightness(&self, brightness: u8) {
        self.push(StateEvent::Brightness(brightness));
    }

    fn sync_state(&self, state: PowerState) {
        self.push(StateEvent::State(state));
    }

    fn sync_mode(&self, mode: ModeId) {
        self.push(StateEvent::Mode(mode));
    }

    fn sync_length(&self, length: u16) {
        self.push(StateEvent::Length(length));
    }
}
