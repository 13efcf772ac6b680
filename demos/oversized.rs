/*******************************************************************************
 *
 *    Copyright (c) 2025.
 *    3-Prism Co. Ltd.
 *
 *    All rights reserved.
 *
 ******************************************************************************/
//! # Oversized Value Example
//!
//! Demonstrates atomic updates of a multi-field value and scoped in-place
//! access through tokens.

use prism3_atomic_cell::AtomicCell;
use std::thread;

#[derive(Debug, Clone, PartialEq)]
struct Config {
    name: String,
    version: u32,
    replicas: u32,
}

fn main() {
    println!("=== Oversized Value Example ===\n");

    // Example 1: Whole-value updates
    println!("1. Whole-value Updates:");
    let config = AtomicCell::new(Config {
        name: String::from("primary"),
        version: 1,
        replicas: 3,
    });
    println!("   Initial value: {:?}", config.get());

    let result = config.exchange_with(|c| Config {
        version: c.version + 1,
        replicas: c.replicas * 2,
        ..c.clone()
    });
    println!("   Updated: v{} -> v{}", result.previous.version, result.new.version);

    // Example 2: Optimistic update against a stale snapshot
    println!("\n2. Optimistic Update:");
    let stale = Config {
        name: String::from("primary"),
        version: 1,
        replicas: 3,
    };
    let attempt = config.try_exchange(
        Config {
            replicas: 1,
            ..stale.clone()
        },
        stale,
    );
    println!(
        "   Stale write accepted: {} (current version: {})",
        attempt.was_set, attempt.current.version
    );

    // Example 3: Scoped access without copying
    println!("\n3. Scoped Access:");
    {
        let token = config.read();
        println!("   Reading in place: {} has {} replicas", token.name, token.replicas);
    }
    {
        let mut token = config.write();
        token.name.push_str("-eu");
        token.version += 1;
    }
    println!("   After in-place write: {:?}", config.get());

    // Example 4: Concurrent writers keep fields in step
    println!("\n4. Concurrent Writers:");
    let pair = AtomicCell::new((0_u64, 0_u64));
    thread::scope(|s| {
        for _ in 0..4 {
            s.spawn(|| {
                for _ in 0..10_000 {
                    pair.exchange_with(|&(a, b)| (a + 1, b + 1));
                }
            });
        }
    });
    let (a, b) = pair.get();
    println!("   Final pair: ({}, {}), in step: {}", a, b, a == b);

    println!("\n=== Example completed ===");
}
