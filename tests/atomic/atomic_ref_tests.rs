/*******************************************************************************
 *
 *    Copyright (c) 2025.
 *    3-Prism Co. Ltd.
 *
 *    All rights reserved.
 *
 ******************************************************************************/

use prism3_atomic_cell::atomic::{
    Atomic,
    AtomicRef,
};
use std::cell::Cell;
use std::sync::Arc;
use std::thread;

use crate::harness::run_collect;

#[derive(Debug, Clone, PartialEq, Default)]
struct Config {
    timeout: u64,
    name: String,
}

fn config(timeout: u64, name: &str) -> Arc<Config> {
    Arc::new(Config {
        timeout,
        name: name.to_string(),
    })
}

#[test]
fn test_new_get_set_swap() {
    let atomic = AtomicRef::new(config(100, "a"));
    assert_eq!(atomic.get().timeout, 100);

    atomic.set(config(200, "b"));
    assert_eq!(atomic.get().name, "b");

    let old = atomic.swap(config(300, "c"));
    assert_eq!(old.timeout, 200);
    assert_eq!(atomic.get().timeout, 300);
}

#[test]
fn test_readers_keep_their_snapshot() {
    let atomic = AtomicRef::new(config(1, "first"));
    let snapshot = atomic.get();
    atomic.set(config(2, "second"));
    assert_eq!(snapshot.name, "first");
    assert_eq!(atomic.get().name, "second");
}

#[test]
fn test_compare_set_uses_identity() {
    let atomic = AtomicRef::from_value(10);
    let current = atomic.get();

    let result = atomic.compare_set(&Arc::new(10), Arc::new(20));
    let actual = result.unwrap_err();
    assert!(Arc::ptr_eq(&actual, &current));

    assert_eq!(atomic.compare_set(&current, Arc::new(20)), Ok(()));
    assert_eq!(*atomic.get(), 20);
}

#[test]
fn test_compare_and_exchange_returns_previous() {
    let atomic = AtomicRef::from_value("x");
    let current = atomic.get();

    let previous = atomic.compare_and_exchange(&current, Arc::new("y"));
    assert!(Arc::ptr_eq(&previous, &current));
    let previous = atomic.compare_and_exchange(&current, Arc::new("z"));
    assert_eq!(*previous, "y");
    assert_eq!(*atomic.get(), "y");
}

#[test]
fn test_try_exchange_uses_value_equality() {
    let atomic = AtomicRef::new(config(5, "idle"));

    let result = atomic.try_exchange(config(6, "busy"), config(5, "idle"));
    assert!(result.was_set);
    assert_eq!(result.previous.name, "idle");
    assert_eq!(result.current.name, "busy");

    let result = atomic.try_exchange(config(7, "stopped"), config(5, "idle"));
    assert!(!result.was_set);
    assert!(Arc::ptr_eq(&result.previous, &result.current));
    assert_eq!(atomic.get().name, "busy");
}

#[test]
fn test_trait_compare_set_uses_identity() {
    let atomic = AtomicRef::from_value(1_u8);
    let current = atomic.get();

    assert!(Atomic::compare_set(&atomic, Arc::new(1), Arc::new(2)).is_err());
    assert!(Atomic::compare_set(&atomic, current, Arc::new(2)).is_ok());
    assert!(Atomic::try_exchange(&atomic, Arc::new(3), Arc::new(2)).was_set);
    assert_eq!(*atomic.get(), 3);
}

#[test]
fn test_exchange_with_and_fallible() {
    let atomic = AtomicRef::new(config(1, "a"));

    let result = atomic.exchange_with(|c| config(c.timeout + 1, &c.name));
    assert_eq!(result.previous.timeout, 1);
    assert_eq!(result.new.timeout, 2);

    let result = atomic.exchange_with_fallible(|c| {
        if c.timeout > 1 {
            Err(c.timeout)
        } else {
            Ok(config(0, "reset"))
        }
    });
    assert_eq!(result.unwrap_err(), 2);
    assert_eq!(atomic.get().timeout, 2);
}

#[test]
fn test_conditional_exchanges() {
    let atomic = AtomicRef::from_value(10_i32);

    assert!(!atomic.try_exchange_if(Arc::new(5), |old, new| new > old).was_set);
    assert!(atomic.try_exchange_if(Arc::new(15), |old, new| new > old).was_set);

    let calls = Cell::new(0);
    let result = atomic.try_exchange_with(
        |v| {
            calls.set(calls.get() + 1);
            Arc::new(**v * 2)
        },
        Arc::new(15),
    );
    assert!(result.was_set);
    assert_eq!(*result.current, 30);
    assert_eq!(calls.get(), 1);

    let result = atomic.try_exchange_with_if(|v| Arc::new(**v + 1), |_, new| **new % 2 == 0);
    assert!(!result.was_set);
    assert_eq!(*result.current, 30);
}

#[test]
fn test_spin_waits_already_satisfied() {
    let atomic = AtomicRef::from_value(4_u32);
    assert_eq!(*atomic.spin_wait_for_value(Arc::new(4)), 4);
    assert_eq!(*atomic.spin_wait_until(|v| **v == 4), 4);
    assert_eq!(*atomic.spin_wait_for_exchange(Arc::new(5), Arc::new(4)).new, 5);
    assert_eq!(*atomic.spin_wait_for_exchange_if(Arc::new(6), |old, _| **old == 5).new, 6);
    assert_eq!(*atomic.spin_wait_for_exchange_with(|v| Arc::new(**v + 1), Arc::new(6)).new, 7);
    assert_eq!(
        *atomic
            .spin_wait_for_exchange_with_if(|v| Arc::new(**v * 2), |_, new| **new == 14)
            .new,
        14
    );
}

#[test]
fn test_with_read_and_into_inner() {
    let atomic = AtomicRef::new(config(9, "cfg"));
    assert_eq!(atomic.with_read(|c| c.name.len()), 3);
    assert_eq!(atomic.into_inner().timeout, 9);
}

#[test]
fn test_default_from_clone_and_format() {
    let atomic: AtomicRef<Config> = AtomicRef::default();
    assert_eq!(*atomic.get(), Config::default());

    let atomic = AtomicRef::from(Arc::new(42));
    let copy = atomic.clone();
    atomic.set(Arc::new(43));
    assert_eq!(*copy.get(), 42);
    assert_eq!(format!("{}", atomic), "43");
    assert!(format!("{:?}", atomic).contains("43"));
}

#[test]
fn test_concurrent_updates_lose_nothing() {
    const THREADS: usize = 8;
    const ITERATIONS: usize = 1_000;

    let atomic = AtomicRef::from_value(0_usize);
    run_collect(&atomic, THREADS, |atomic, _| {
        for _ in 0..ITERATIONS {
            atomic.exchange_with(|v| Arc::new(**v + 1));
        }
    });
    assert_eq!(*atomic.get(), THREADS * ITERATIONS);
}

#[test]
fn test_try_exchange_by_value_races_single_winner() {
    const THREADS: usize = 8;

    let atomic = AtomicRef::new(config(0, "open"));
    let winners = run_collect(&atomic, THREADS, |atomic, index| {
        atomic
            .try_exchange(config(index as u64, "claimed"), config(0, "open"))
            .was_set
    });
    assert_eq!(winners.iter().filter(|won| **won).count(), 1);
    assert_eq!(atomic.get().name, "claimed");
}

#[test]
fn test_spin_wait_for_exchange_across_threads() {
    const STEPS: u32 = 20_000;

    let atomic = AtomicRef::from_value(0_u32);
    thread::scope(|s| {
        s.spawn(|| {
            for value in 1..=STEPS {
                atomic.set(Arc::new(value));
            }
        });
        let found = atomic.spin_wait_for_exchange(Arc::new(u32::MAX), Arc::new(STEPS));
        assert_eq!(*found.previous, STEPS);
    });
    assert_eq!(*atomic.get(), u32::MAX);
}
