/*******************************************************************************
 *
 *    Copyright (c) 2025.
 *    3-Prism Co. Ltd.
 *
 *    All rights reserved.
 *
 ******************************************************************************/

use prism3_atomic_cell::atomic::{
    AtomicCell,
    AtomicWord,
};
use std::sync::atomic::{
    AtomicUsize as StdAtomicUsize,
    Ordering,
};
use std::sync::Arc;
use std::thread;

use crate::harness::{
    run_collect,
    run_readers_writers,
};

const NUM_THREADS: usize = 8;
const ITERATIONS_PER_THREAD: usize = 2_000;

// Test that concurrent maps lose no update on the word engine
#[test]
fn test_word_exchange_with_loses_no_update() {
    let counter = Arc::new(AtomicWord::new(0_usize));
    let mut handles = vec![];

    for _ in 0..NUM_THREADS {
        let counter = counter.clone();
        let handle = thread::spawn(move || {
            for _ in 0..ITERATIONS_PER_THREAD {
                counter.exchange_with(|v| v + 1);
            }
        });
        handles.push(handle);
    }

    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(counter.get(), NUM_THREADS * ITERATIONS_PER_THREAD);
}

// Test that two fields updated together never drift apart while a reader
// keeps sampling them
#[test]
fn test_cell_pair_stays_in_step() {
    const TOTAL: u64 = 300_000;

    let pair = AtomicCell::new((0_u64, 0_u64));
    run_readers_writers(
        &pair,
        1,
        1,
        |pair, _| loop {
            let (a, b) = pair.get();
            assert_eq!(a, b);
            if a == TOTAL {
                break;
            }
        },
        |pair, _| {
            for _ in 0..TOTAL {
                pair.exchange_with(|&(a, b)| (a + 1, b + 1));
            }
        },
    );

    assert_eq!(pair.get(), (TOTAL, TOTAL));
}

// Test that concurrent writers lose no update on the locked engine
#[test]
fn test_cell_exchange_with_loses_no_update() {
    let pair = AtomicCell::new((0_usize, String::new()));
    run_readers_writers(&pair, 0, NUM_THREADS, |_, _| {}, |pair, _| {
        for _ in 0..ITERATIONS_PER_THREAD {
            pair.exchange_with(|(n, tag)| {
                let tag = if tag.is_empty() { String::from("x") } else { tag.clone() };
                (n + 1, tag)
            });
        }
    });

    let (count, tag) = pair.get();
    assert_eq!(count, NUM_THREADS * ITERATIONS_PER_THREAD);
    assert_eq!(tag, "x");
}

// Test that readers never observe a partially written value
#[test]
fn test_no_torn_reads() {
    const WRITES: u64 = 5_000;

    let cell = AtomicCell::new([0_u64; 32]);
    let torn = StdAtomicUsize::new(0);

    run_readers_writers(
        &cell,
        4,
        2,
        |cell, _| {
            for _ in 0..WRITES {
                let snapshot = cell.get();
                if snapshot.iter().any(|v| *v != snapshot[0]) {
                    torn.fetch_add(1, Ordering::Relaxed);
                }
                let token = cell.read();
                if token.iter().any(|v| *v != token[0]) {
                    torn.fetch_add(1, Ordering::Relaxed);
                }
            }
        },
        |cell, index| {
            for n in 0..WRITES {
                let value = n * 2 + index as u64;
                cell.set([value; 32]);
            }
        },
    );

    assert_eq!(torn.load(Ordering::Relaxed), 0);
}

// Test that the reported (previous, new) pairs form one hand-off chain
#[test]
fn test_exchange_results_form_hand_off_chain() {
    let word = AtomicWord::new(0_u32);
    let cell = AtomicCell::new(0_u32);

    let pairs = run_collect(&(word, cell), NUM_THREADS, |(word, cell), _| {
        let mut seen = Vec::with_capacity(2 * ITERATIONS_PER_THREAD);
        for _ in 0..ITERATIONS_PER_THREAD {
            seen.push(('w', word.exchange_with(|v| v + 1).into_tuple()));
            seen.push(('c', cell.exchange_with(|v| v + 1).into_tuple()));
        }
        seen
    });

    for engine in ['w', 'c'] {
        let mut chain: Vec<(u32, u32)> = pairs
            .iter()
            .flatten()
            .filter(|(tag, _)| *tag == engine)
            .map(|(_, pair)| *pair)
            .collect();
        chain.sort_unstable();
        assert_eq!(chain.len(), NUM_THREADS * ITERATIONS_PER_THREAD);
        for (index, (previous, new)) in chain.into_iter().enumerate() {
            assert_eq!(previous, index as u32);
            assert_eq!(new, previous + 1);
        }
    }
}

// Test that exactly one of many racing threads raises the flag
#[test]
fn test_single_winner_for_try_exchange() {
    let flag = AtomicWord::new(false);
    let winners = run_collect(&flag, NUM_THREADS, |flag, _| flag.try_exchange(true, false).was_set);
    assert_eq!(winners.iter().filter(|won| **won).count(), 1);
    assert!(flag.get());
}

// Test that two threads can alternate through spin_wait_for_exchange
#[test]
fn test_ping_pong_on_word() {
    const ROUNDS: u32 = 2_000;

    let turn = AtomicWord::new(0_u32);
    run_collect(&turn, 2, |turn, index| {
        let mut value = index as u32;
        while value < ROUNDS {
            turn.spin_wait_for_exchange(value + 1, value);
            value += 2;
        }
    });

    assert_eq!(turn.get(), ROUNDS);
}

// Test the same hand-off on the locked engine, driven by spin_wait_until
#[test]
fn test_ping_pong_on_cell() {
    const ROUNDS: u64 = 1_000;

    #[derive(Debug, Clone, PartialEq)]
    struct Turn {
        round: u64,
        player: &'static str,
    }

    let turn = AtomicCell::new(Turn {
        round: 0,
        player: "ping",
    });
    run_collect(&turn, 2, |turn, index| {
        let (me, other) = if index == 0 {
            ("ping", "pong")
        } else {
            ("pong", "ping")
        };
        loop {
            let current = turn.spin_wait_until(|t| t.player == me || t.round >= ROUNDS);
            if current.round >= ROUNDS {
                break;
            }
            turn.set(Turn {
                round: current.round + 1,
                player: other,
            });
        }
    });

    assert_eq!(turn.get().round, ROUNDS);
}

// Test that a waiter wakes up on a value published by another thread
#[test]
fn test_spin_wait_for_value_across_threads() {
    let ready = AtomicWord::new(0_u8);
    let payload = AtomicCell::new(String::new());

    thread::scope(|s| {
        s.spawn(|| {
            payload.set(String::from("published"));
            ready.set(1);
        });
        assert_eq!(ready.spin_wait_for_value(1), 1);
        assert_eq!(payload.get(), "published");
    });
}

// Test that scoped readers always see both fields from the same write
#[test]
fn test_scoped_tokens_under_contention() {
    #[derive(Default)]
    struct Account {
        debit: i64,
        credit: i64,
    }

    let account = AtomicCell::new(Account::default());
    run_readers_writers(
        &account,
        3,
        3,
        |account, _| {
            for _ in 0..ITERATIONS_PER_THREAD {
                let token = account.read();
                assert_eq!(token.debit, -token.credit);
            }
        },
        |account, _| {
            for _ in 0..ITERATIONS_PER_THREAD {
                let mut token = account.write();
                token.debit -= 5;
                token.credit += 5;
            }
        },
    );

    account.with_read(|a| assert_eq!(a.credit, 3 * 5 * ITERATIONS_PER_THREAD as i64));
}

const STEPS: u32 = 50_000;

// Test that spin_wait_for_value returns the target itself, never one of
// the values stored on the way to it
#[test]
fn test_word_spin_wait_for_value_skips_intermediate_values() {
    const TARGET: u64 = 100_000;

    let word = AtomicWord::new(0_u64);
    thread::scope(|s| {
        s.spawn(|| {
            for value in 1..=TARGET {
                word.set(value);
            }
        });
        assert_eq!(word.spin_wait_for_value(TARGET), TARGET);
    });
    assert_eq!(word.get(), TARGET);
}

// Test that spin_wait_for_exchange_if keeps retrying while the predicate
// rejects the values it observes
#[test]
fn test_word_spin_wait_for_exchange_if_waits_for_predicate() {
    let word = AtomicWord::new(0_u32);
    let mut observed = Vec::new();

    thread::scope(|s| {
        s.spawn(|| {
            for value in 1..=STEPS {
                word.set(value);
            }
        });
        let result = word.spin_wait_for_exchange_if(u32::MAX, |old, _| {
            observed.push(*old);
            *old == STEPS
        });
        assert_eq!(result.into_tuple(), (STEPS, u32::MAX));
    });

    assert_eq!(observed.last(), Some(&STEPS));
    assert!(observed.iter().all(|v| *v <= STEPS));
    assert_eq!(word.get(), u32::MAX);
}

// Test that spin_wait_for_exchange_with computes its value once however
// long it waits
#[test]
fn test_word_spin_wait_for_exchange_with_maps_once() {
    let word = AtomicWord::new(0_u32);
    let mut calls = 0;

    thread::scope(|s| {
        s.spawn(|| {
            for value in 1..=STEPS {
                word.set(value);
            }
        });
        let result = word.spin_wait_for_exchange_with(
            |v| {
                calls += 1;
                v + 1
            },
            STEPS,
        );
        assert_eq!(result.into_tuple(), (STEPS, STEPS + 1));
    });

    assert_eq!(calls, 1);
    assert_eq!(word.get(), STEPS + 1);
}

// Test that a waiting map-and-predicate exchange is applied atomically
// while other threads keep incrementing
#[test]
fn test_word_spin_wait_for_exchange_with_if_under_contention() {
    const BONUS: usize = 1_000_000;
    const THRESHOLD: usize = NUM_THREADS * ITERATIONS_PER_THREAD / 2;

    let word = AtomicWord::new(0_usize);
    let results = run_collect(&word, NUM_THREADS + 1, |word, index| {
        if index == NUM_THREADS {
            let result =
                word.spin_wait_for_exchange_with_if(|v| v + BONUS, |old, _| *old >= THRESHOLD);
            return Some(result);
        }
        for _ in 0..ITERATIONS_PER_THREAD {
            word.exchange_with(|v| v + 1);
        }
        None
    });

    let result = results.into_iter().flatten().next().unwrap();
    assert!(result.previous >= THRESHOLD);
    assert!(result.previous < BONUS);
    assert_eq!(result.new, result.previous + BONUS);
    assert_eq!(word.get(), NUM_THREADS * ITERATIONS_PER_THREAD + BONUS);
}

// Test that the locked engine also returns exactly the awaited value
#[test]
fn test_cell_spin_wait_for_value_skips_intermediate_values() {
    let cell = AtomicCell::new((0_u32, String::new()));
    let target = (STEPS, STEPS.to_string());

    thread::scope(|s| {
        s.spawn(|| {
            for value in 1..=STEPS {
                cell.set((value, value.to_string()));
            }
        });
        assert_eq!(cell.spin_wait_for_value(target.clone()), target);
    });
    assert!(cell.raw_lock().is_unlocked());
}

// Test that spin_wait_for_exchange_with on the locked engine waits through
// every intermediate pair and still runs its map once
#[test]
fn test_cell_spin_wait_for_exchange_with_maps_once() {
    let cell = AtomicCell::new((0_u32, 0_u32));
    let mut calls = 0;

    thread::scope(|s| {
        s.spawn(|| {
            for value in 1..=STEPS {
                cell.set((value, value));
            }
        });
        let result = cell.spin_wait_for_exchange_with(
            |&(a, b)| {
                calls += 1;
                (a + 1, b)
            },
            (STEPS, STEPS),
        );
        assert_eq!(result.into_tuple(), ((STEPS, STEPS), (STEPS + 1, STEPS)));
    });

    assert_eq!(calls, 1);
    assert_eq!(cell.get(), (STEPS + 1, STEPS));
}

// Test that spin_wait_for_exchange_if on the locked engine only installs
// once the predicate accepts
#[test]
fn test_cell_spin_wait_for_exchange_if_waits_for_predicate() {
    let cell = AtomicCell::new((0_u32, "start"));

    thread::scope(|s| {
        s.spawn(|| {
            for value in 1..=STEPS {
                cell.set((value, "running"));
            }
        });
        let result = cell.spin_wait_for_exchange_if((0, "done"), |old, _| old.0 == STEPS);
        assert_eq!(result.previous, (STEPS, "running"));
    });

    assert_eq!(cell.get(), (0, "done"));
}

// Test that a waiting map-and-predicate exchange on the locked engine
// loses no concurrent increment
#[test]
fn test_cell_spin_wait_for_exchange_with_if_under_contention() {
    const BONUS: usize = 1_000_000;
    const THRESHOLD: usize = NUM_THREADS * ITERATIONS_PER_THREAD / 2;

    let cell = AtomicCell::new((0_usize, 0_usize));
    let results = run_collect(&cell, NUM_THREADS + 1, |cell, index| {
        if index == NUM_THREADS {
            let result = cell.spin_wait_for_exchange_with_if(
                |&(count, bonus)| (count, bonus + BONUS),
                |old, _| old.0 >= THRESHOLD,
            );
            return Some(result);
        }
        for _ in 0..ITERATIONS_PER_THREAD {
            cell.exchange_with(|&(count, bonus)| (count + 1, bonus));
        }
        None
    });

    let result = results.into_iter().flatten().next().unwrap();
    assert!(result.previous.0 >= THRESHOLD);
    assert_eq!(result.previous.1, 0);
    assert_eq!(result.new, (result.previous.0, BONUS));
    assert_eq!(cell.get(), (NUM_THREADS * ITERATIONS_PER_THREAD, BONUS));
}
