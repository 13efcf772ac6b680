/*******************************************************************************
 *
 *    Copyright (c) 2025.
 *    3-Prism Co. Ltd.
 *
 *    All rights reserved.
 *
 ******************************************************************************/

use prism3_atomic_cell::atomic::AtomicCell;
use std::panic::{
    self,
    AssertUnwindSafe,
};
use std::sync::atomic::{
    AtomicBool as StdAtomicBool,
    Ordering,
};
use std::thread;
use std::time::Duration;

#[test]
fn test_shared_tokens_coexist() {
    let cell = AtomicCell::new([3_u32; 16]);
    let first = cell.read();
    let second = cell.read();
    assert_eq!(cell.raw_lock().reader_count(), 2);
    assert_eq!(first[0] + second[15], 6);

    drop(first);
    assert_eq!(cell.raw_lock().reader_count(), 1);
    drop(second);
    assert!(cell.raw_lock().is_unlocked());
}

#[test]
fn test_shared_token_blocks_writers_only() {
    let cell = AtomicCell::new(String::from("value"));
    let token = cell.read();
    assert!(cell.try_write().is_none());
    assert!(cell.try_read().is_some());
    assert_eq!(token.len(), 5);
    drop(token);
    assert!(cell.try_write().is_some());
}

#[test]
fn test_exclusive_token_excludes_everything() {
    let cell = AtomicCell::new(0_u64);
    let token = cell.write();
    assert!(cell.raw_lock().is_locked_exclusive());
    assert!(cell.try_read().is_none());
    assert!(cell.try_write().is_none());
    drop(token);
    assert!(cell.raw_lock().is_unlocked());
}

#[test]
fn test_in_place_mutation_is_visible_after_release() {
    let cell = AtomicCell::new(vec![1, 2, 3]);
    {
        let mut token = cell.write();
        token.push(4);
        token[0] = 10;
    }
    assert_eq!(cell.get(), vec![10, 2, 3, 4]);
}

#[test]
fn test_with_read_and_with_write() {
    let cell = AtomicCell::new((String::from("left"), String::from("right")));
    let total = cell.with_read(|(a, b)| a.len() + b.len());
    assert_eq!(total, 9);

    let previous = cell.with_write(|pair| std::mem::replace(&mut pair.0, String::from("up")));
    assert_eq!(previous, "left");
    assert_eq!(cell.with_read(|pair| pair.0.clone()), "up");
    assert!(cell.raw_lock().is_unlocked());
}

#[test]
fn test_exclusive_token_holds_off_other_threads() {
    let cell = AtomicCell::new(1_i32);
    let done = StdAtomicBool::new(false);

    thread::scope(|s| {
        let mut token = cell.write();
        s.spawn(|| {
            cell.set(3);
            done.store(true, Ordering::SeqCst);
        });
        thread::sleep(Duration::from_millis(50));
        assert!(!done.load(Ordering::SeqCst));
        *token = 2;
        drop(token);
    });

    assert!(done.load(Ordering::SeqCst));
    assert_eq!(cell.get(), 3);
}

#[test]
fn test_writer_waits_for_every_shared_token() {
    let cell = AtomicCell::new(0_u32);
    let done = StdAtomicBool::new(false);

    thread::scope(|s| {
        let tokens: Vec<_> = (0..3).map(|_| cell.read()).collect();
        assert!(tokens.iter().all(|token| **token == 0));
        s.spawn(|| {
            cell.set(1);
            done.store(true, Ordering::SeqCst);
        });

        let mut tokens = tokens;
        while tokens.len() > 1 {
            tokens.pop();
            thread::sleep(Duration::from_millis(20));
            assert!(!done.load(Ordering::SeqCst));
        }
        drop(tokens);
    });

    assert!(done.load(Ordering::SeqCst));
    assert_eq!(cell.get(), 1);
}

#[test]
fn test_token_released_on_panic() {
    let cell = AtomicCell::new(5_u8);

    let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
        let mut token = cell.write();
        *token = 6;
        panic!("writer failed");
    }));
    assert!(outcome.is_err());
    assert!(cell.raw_lock().is_unlocked());
    assert_eq!(cell.get(), 6);

    let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
        cell.with_read(|_| panic!("reader failed"));
    }));
    assert!(outcome.is_err());
    assert!(cell.raw_lock().is_unlocked());
}

#[test]
fn test_token_debug() {
    let cell = AtomicCell::new(Some(4));
    assert_eq!(format!("{:?}", cell.read()), "Some(4)");
    assert_eq!(format!("{:?}", cell.write()), "Some(4)");
}
