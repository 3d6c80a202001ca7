//! Bounded-wait locking
//!
//! Every lock in the crate is taken through [`with_lock`]: the closure only
//! receives the guarded value, so one locked section cannot reach into another
//! lock's state, and a contended lock gives up after a fixed number of
//! attempts instead of blocking the caller.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::mutex::Mutex;

/// Default number of `try_lock` attempts before giving up
pub const DEFAULT_LOCK_ATTEMPTS: u32 = 64;

pub(crate) type Lock<T> = Mutex<CriticalSectionRawMutex, T>;

/// Run `f` on the locked value, or return `None` if the lock stayed busy
pub(crate) fn with_lock<T, R>(
    lock: &Lock<T>,
    attempts: u32,
    f: impl FnOnce(&mut T) -> R,
) -> Option<R> {
    for _ in 0..attempts.max(1) {
        if let Ok(mut guard) = lock.try_lock() {
            return Some(f(&mut guard));
        }
        core::hint::spin_loop();
    }
    None
}
