/*******************************************************************************
 *
 *    Copyright (c) 2025.
 *    3-Prism Co. Ltd.
 *
 *    All rights reserved.
 *
 ******************************************************************************/

use prism3_atomic_cell::atomic::RwSpinLock;
use std::sync::atomic::{
    AtomicUsize as StdAtomicUsize,
    Ordering,
};

use crate::harness::run_readers_writers;

#[test]
fn test_new_lock_is_unlocked() {
    let lock = RwSpinLock::new();
    assert!(lock.is_unlocked());
    assert_eq!(lock.reader_count(), 0);
    assert!(!lock.is_locked_exclusive());
    assert!(RwSpinLock::default().is_unlocked());
}

#[test]
fn test_readers_share_the_lock() {
    let lock = RwSpinLock::new();
    lock.lock_shared();
    assert!(lock.try_lock_shared());
    assert_eq!(lock.reader_count(), 2);
    assert!(!lock.try_lock_exclusive());

    // SAFETY: two reader admissions were taken above.
    unsafe {
        lock.unlock_shared();
        lock.unlock_shared();
    }
    assert!(lock.is_unlocked());
}

#[test]
fn test_writer_excludes_readers_and_writers() {
    let lock = RwSpinLock::new();
    lock.lock_exclusive();
    assert!(lock.is_locked_exclusive());
    assert_eq!(lock.reader_count(), 0);
    assert!(!lock.try_lock_shared());
    assert!(!lock.try_lock_exclusive());

    // SAFETY: the writer admission was taken above.
    unsafe { lock.unlock_exclusive() };
    assert!(lock.is_unlocked());
    assert!(lock.try_lock_exclusive());
    // SAFETY: taken by the successful `try_lock_exclusive`.
    unsafe { lock.unlock_exclusive() };
}

#[test]
fn test_debug_shows_state() {
    let lock = RwSpinLock::new();
    lock.lock_shared();
    assert_eq!(format!("{:?}", lock), "RwSpinLock { state: 1 }");
    // SAFETY: the reader admission was taken above.
    unsafe { lock.unlock_shared() };
}

struct Guarded {
    lock: RwSpinLock,
    counter: StdAtomicUsize,
}

// Writers perform a split load/store increment that only survives under
// mutual exclusion; readers check that no writer is inside with them.
#[test]
fn test_mutual_exclusion_under_contention() {
    const WRITERS: usize = 4;
    const READERS: usize = 4;
    const ITERATIONS: usize = 5_000;

    let guarded = Guarded {
        lock: RwSpinLock::new(),
        counter: StdAtomicUsize::new(0),
    };

    run_readers_writers(
        &guarded,
        READERS,
        WRITERS,
        |g, _| {
            for _ in 0..ITERATIONS {
                g.lock.lock_shared();
                assert!(!g.lock.is_locked_exclusive());
                let _ = g.counter.load(Ordering::Relaxed);
                // SAFETY: admission taken at the top of the iteration.
                unsafe { g.lock.unlock_shared() };
            }
        },
        |g, _| {
            for _ in 0..ITERATIONS {
                g.lock.lock_exclusive();
                let value = g.counter.load(Ordering::Relaxed);
                g.counter.store(value + 1, Ordering::Relaxed);
                // SAFETY: admission taken at the top of the iteration.
                unsafe { g.lock.unlock_exclusive() };
            }
        },
    );

    assert_eq!(guarded.counter.load(Ordering::Relaxed), WRITERS * ITERATIONS);
    assert!(guarded.lock.is_unlocked());
}
