/*******************************************************************************
 *
 *    Copyright (c) 2025.
 *    3-Prism Co. Ltd.
 *
 *    All rights reserved.
 *
 ******************************************************************************/

//! # Reader-Writer Spin Lock
//!
//! A minimal reader-writer lock that never blocks in the OS: admission is a
//! CAS loop with backoff and release is a single atomic increment or
//! decrement.
//!
//! # Author
//!
//! Haixing Hu

use std::fmt;
use std::sync::atomic::{
    AtomicI32,
    Ordering,
};

use crate::atomic::spin_wait::SpinWait;

/// A reader-writer spin lock over a single state word.
///
/// # Lock State
///
/// - `0`: Unlocked.
/// - `N > 0`: Held by `N` readers.
/// - `-1`: Held by one writer.
///
/// Readers are admitted while the state is non-negative; a writer is
/// admitted only from `0`. The lock is not reentrant, has no timeouts and
/// makes no fairness guarantee: a steady stream of readers can keep a
/// writer waiting. It is meant for short critical sections, such as
/// copying a value in or out.
///
/// The lock carries no data and no guard type. [`AtomicCell`] pairs it with
/// the protected value and hands out RAII tokens; the raw `unlock_*`
/// functions are therefore `unsafe`.
///
/// # Memory Ordering
///
/// Admission uses `Acquire` and release uses `Release`, so everything done
/// inside a critical section happens-before the next admission that
/// observes its release.
///
/// [`AtomicCell`]: crate::atomic::AtomicCell
///
/// # Author
///
/// Haixing Hu
pub struct RwSpinLock {
    state: AtomicI32,
}

impl RwSpinLock {
    const UNLOCKED: i32 = 0;
    const WRITER: i32 = -1;
    const MAX_READERS: i32 = i32::MAX;

    /// Creates a new unlocked lock.
    #[inline]
    pub const fn new() -> Self {
        Self {
            state: AtomicI32::new(Self::UNLOCKED),
        }
    }

    /// Acquires the lock as a reader, spinning while a writer holds it.
    pub fn lock_shared(&self) {
        let mut spin = SpinWait::new("RwSpinLock::lock_shared");
        while !self.try_lock_shared() {
            spin.snooze();
        }
    }

    /// Tries to acquire the lock as a reader without waiting for a writer.
    ///
    /// Races with other readers are retried; only a held writer lock makes
    /// this return `false`.
    ///
    /// # Panics
    ///
    /// Panics if `i32::MAX` readers already hold the lock, which can only
    /// happen when reader tokens are leaked.
    pub fn try_lock_shared(&self) -> bool {
        let spin = SpinWait::new("RwSpinLock::try_lock_shared");
        let mut current = self.state.load(Ordering::Relaxed);
        loop {
            if current < Self::UNLOCKED {
                return false;
            }
            assert!(current != Self::MAX_READERS, "too many active read locks on RwSpinLock");
            match self.state.compare_exchange_weak(
                current,
                current + 1,
                Ordering::Acquire,
                Ordering::Relaxed,
            ) {
                Ok(_) => return true,
                Err(actual) => current = actual,
            }
            spin.spin();
        }
    }

    /// Releases one reader.
    ///
    /// # Safety
    ///
    /// The calling context must own a reader admission obtained from
    /// [`lock_shared`](Self::lock_shared) or a successful
    /// [`try_lock_shared`](Self::try_lock_shared) that has not been
    /// released yet. Releasing twice corrupts the reader count.
    #[inline]
    pub unsafe fn unlock_shared(&self) {
        let prev = self.state.fetch_sub(1, Ordering::Release);
        debug_assert!(prev > Self::UNLOCKED, "reader count underflow");
    }

    /// Acquires the lock as the single writer, spinning until no reader or
    /// writer holds it.
    pub fn lock_exclusive(&self) {
        let mut spin = SpinWait::new("RwSpinLock::lock_exclusive");
        while !self.try_lock_exclusive() {
            spin.snooze();
        }
    }

    /// Tries to acquire the lock as the single writer, without waiting.
    #[inline]
    pub fn try_lock_exclusive(&self) -> bool {
        self.state
            .compare_exchange(Self::UNLOCKED, Self::WRITER, Ordering::Acquire, Ordering::Relaxed)
            .is_ok()
    }

    /// Releases the writer.
    ///
    /// # Safety
    ///
    /// The calling context must own the writer admission obtained from
    /// [`lock_exclusive`](Self::lock_exclusive) or a successful
    /// [`try_lock_exclusive`](Self::try_lock_exclusive) that has not been
    /// released yet.
    #[inline]
    pub unsafe fn unlock_exclusive(&self) {
        let prev = self.state.fetch_add(1, Ordering::Release);
        debug_assert_eq!(prev, Self::WRITER, "writer release without writer");
    }

    /// Returns the number of readers currently holding the lock.
    ///
    /// The result is a snapshot and may be stale by the time it is used.
    #[inline]
    pub fn reader_count(&self) -> usize {
        usize::try_from(self.state.load(Ordering::Relaxed)).unwrap_or(0)
    }

    /// Returns `true` if a writer currently holds the lock.
    #[inline]
    pub fn is_locked_exclusive(&self) -> bool {
        self.state.load(Ordering::Relaxed) == Self::WRITER
    }

    /// Returns `true` if neither readers nor a writer hold the lock.
    #[inline]
    pub fn is_unlocked(&self) -> bool {
        self.state.load(Ordering::Relaxed) == Self::UNLOCKED
    }
}

impl Default for RwSpinLock {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for RwSpinLock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RwSpinLock")
            .field("state", &self.state.load(Ordering::Relaxed))
            .finish()
    }
}
