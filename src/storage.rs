//! Persistent state
//!
//! The physical key-value store is a collaborator behind [`KeyValueStore`].
//! This module owns the key layout, restores the boot state from it and
//! provides [`StorageSink`], which mirrors state changes into the store and
//! commits them only after writes have been idle for a while.

use embassy_time::{Duration, Instant};
use log::{info, warn};

use crate::color::Rgb;
use crate::lock::{DEFAULT_LOCK_ATTEMPTS, Lock, with_lock};
use crate::mode::ModeId;
use crate::state::{LightSnapshot, PowerState};
use crate::sync::SyncSink;

pub const KEY_RED: &str = "led_r";
pub const KEY_GREEN: &str = "led_g";
pub const KEY_BLUE: &str = "led_b";
pub const KEY_BRIGHTNESS: &str = "led_brightness";
pub const KEY_STATE: &str = "led_state";
pub const KEY_MODE: &str = "led_mode";
pub const KEY_LENGTH: &str = "led_length";

/// Default write-idle time before pending writes are committed
pub const DEFAULT_COMMIT_DELAY: Duration = Duration::from_millis(2_000);

/// Typed access to a persistent key-value store
///
/// Reads return `Ok(None)` for keys that were never written.
pub trait KeyValueStore {
    type Error: core::fmt::Debug;

    /// Open the store, called once at boot
    fn init(&mut self) -> Result<(), Self::Error>;

    fn read_u8(&mut self, key: &str) -> Result<Option<u8>, Self::Error>;
    fn read_u16(&mut self, key: &str) -> Result<Option<u16>, Self::Error>;
    fn read_bool(&mut self, key: &str) -> Result<Option<bool>, Self::Error>;

    fn write_u8(&mut self, key: &str, value: u8) -> Result<(), Self::Error>;
    fn write_u16(&mut self, key: &str, value: u16) -> Result<(), Self::Error>;
    fn write_bool(&mut self, key: &str, value: bool) -> Result<(), Self::Error>;

    /// Make pending writes durable
    fn commit(&mut self) -> Result<(), Self::Error>;
}

/// Fatal boot failure; the caller is expected to restart the device
#[derive(Debug, thiserror::Error)]
pub enum BootError<E: core::fmt::Debug> {
    #[error("persistent store failed to initialize: {0:?}")]
    Init(E),
}

/// Open the store and restore the last persisted state
pub fn boot<S: KeyValueStore>(
    store: &mut S,
    defaults: &LightSnapshot,
) -> Result<LightSnapshot, BootError<S::Error>> {
    store.init().map_err(BootError::Init)?;
    let snapshot = load(store, defaults);
    info!("[storage.boot] restored {snapshot:?}");
    Ok(snapshot)
}

/// Read every persisted field, falling back to `defaults` field by field
///
/// The mode is always [`ModeId::Solid`]: boot never resumes a fade.
pub fn load<S: KeyValueStore>(store: &mut S, defaults: &LightSnapshot) -> LightSnapshot {
    let color = Rgb {
        r: read_or(store, KEY_RED, S::read_u8, defaults.color.r),
        g: read_or(store, KEY_GREEN, S::read_u8, defaults.color.g),
        b: read_or(store, KEY_BLUE, S::read_u8, defaults.color.b),
    };
    let brightness = match read_or(store, KEY_BRIGHTNESS, S::read_u8, defaults.brightness) {
        0 => defaults.brightness,
        brightness => brightness,
    };
    let state = PowerState::from(read_or(
        store,
        KEY_STATE,
        S::read_bool,
        defaults.state.is_on(),
    ));
    let length = match read_or(store, KEY_LENGTH, S::read_u16, defaults.length) {
        0 => defaults.length,
        length => length,
    };

    LightSnapshot {
        state,
        brightness,
        color,
        mode: ModeId::Solid,
        length,
    }
}

fn read_or<S: KeyValueStore, T>(
    store: &mut S,
    key: &str,
    read: fn(&mut S, &str) -> Result<Option<T>, S::Error>,
    default: T,
) -> T {
    match read(store, key) {
        Ok(Some(value)) => value,
        Ok(None) => default,
        Err(err) => {
            warn!("[storage.load] reading {key} failed: {err:?}");
            default
        }
    }
}

struct StorageState<S> {
    store: S,
    /// Bumped on every write
    generation: u32,
    committed: u32,
    seen: u32,
    quiet_since: Instant,
}

impl<S: KeyValueStore> StorageState<S> {
    fn write(&mut self, key: &str, write: impl FnOnce(&mut S, &str) -> Result<(), S::Error>) {
        if let Err(err) = write(&mut self.store, key) {
            warn!("[StorageSink] writing {key} failed, dropped: {err:?}");
            return;
        }
        self.generation = self.generation.wrapping_add(1);
    }

    fn poll(&mut self, now: Instant, delay: Duration) -> bool {
        if self.generation == self.committed {
            return false;
        }
        if self.generation != self.seen {
            self.seen = self.generation;
            self.quiet_since = now;
        }
        if now.saturating_duration_since(self.quiet_since) < delay {
            return false;
        }
        self.commit()
    }

    fn commit(&mut self) -> bool {
        self.committed = self.generation;
        match self.store.commit() {
            Ok(()) => {
                info!("[StorageSink] committed");
                true
            }
            Err(err) => {
                warn!("[StorageSink] commit failed, dropped: {err:?}");
                false
            }
        }
    }
}

/// [`SyncSink`] persisting state with a debounced commit
///
/// Call [`StorageSink::poll`] from the main loop; pending writes are committed
/// once no new write arrived for the commit delay.
pub struct StorageSink<S> {
    inner: Lock<StorageState<S>>,
    commit_delay: Duration,
}

impl<S: KeyValueStore> StorageSink<S> {
    pub fn new(store: S) -> Self {
        Self::with_commit_delay(store, DEFAULT_COMMIT_DELAY)
    }

    pub fn with_commit_delay(store: S, commit_delay: Duration) -> Self {
        Self {
            inner: Lock::new(StorageState {
                store,
                generation: 0,
                committed: 0,
                seen: 0,
                quiet_since: Instant::from_ticks(0),
            }),
            commit_delay,
        }
    }

    /// Commit pending writes if they have been idle long enough
    ///
    /// Returns `true` when a commit succeeded.
    pub fn poll(&self, now: Instant) -> bool {
        let delay = self.commit_delay;
        with_lock(&self.inner, DEFAULT_LOCK_ATTEMPTS, |state| state.poll(now, delay))
            .unwrap_or(false)
    }

    /// Commit pending writes right away
    pub fn flush(&self) -> bool {
        with_lock(&self.inner, DEFAULT_LOCK_ATTEMPTS, |state| {
            state.generation != state.committed && state.commit()
        })
        .unwrap_or(false)
    }

    /// Whether writes are waiting for a commit
    pub fn is_dirty(&self) -> bool {
        with_lock(&self.inner, DEFAULT_LOCK_ATTEMPTS, |state| {
            state.generation != state.committed
        })
        .unwrap_or(false)
    }

    /// Run `f` against the wrapped store
    pub fn with_store<R>(&self, f: impl FnOnce(&mut S) -> R) -> Option<R> {
        with_lock(&self.inner, DEFAULT_LOCK_ATTEMPTS, |state| f(&mut state.store))
    }

    fn update(&self, f: impl FnOnce(&mut StorageState<S>)) {
        if with_lock(&self.inner, DEFAULT_LOCK_ATTEMPTS, f).is_none() {
            warn!("[StorageSink] store busy, write dropped");
        }
    }
}

impl<S: KeyValueStore> SyncSink for StorageSink<S> {
    fn sync_color(&self, color: Rgb) {
        self.update(|state| {
            state.write(KEY_RED, |store, key| store.write_u8(key, color.r));
            state.write(KEY_GREEN, |store, key| store.write_u8(key, color.g));
            state.write(KEY_BLUE, |store, key| store.write_u8(key, color.b));
        });
    }

    fn sync_brightness(&self, brightness: u8) {
        self.update(|state| {
            state.write(KEY_BRIGHTNESS, |store, key| store.write_u8(key, brightness));
        });
    }

    fn sync_state(&self, power: PowerState) {
        self.update(|state| {
            state.write(KEY_STATE, |store, key| store.write_bool(key, power.is_on()));
        });
    }

    fn sync_mode(&self, mode: ModeId) {
        self.update(|state| {
            state.write(KEY_MODE, |store, key| store.write_u8(key, mode.as_raw()));
        });
    }

    fn sync_length(&self, length: u16) {
        self.update(|state| {
            state.write(KEY_LENGTH, |store, key| store.write_u16(key, length));
        });
    }
}
