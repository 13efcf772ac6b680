/*******************************************************************************
 *
 *    Copyright (c) 2025.
 *    3-Prism Co. Ltd.
 *
 *    All rights reserved.
 *
 ******************************************************************************/
//! # Atomic Counter Example
//!
//! Demonstrates using the word engine as a thread-safe counter.

use prism3_atomic_cell::AtomicWord;
use std::sync::Arc;
use std::thread;

fn main() {
    println!("=== Atomic Counter Example ===\n");

    // Example 1: Basic counter operations
    println!("1. Basic Counter Operations:");
    let counter = AtomicWord::new(0_i32);
    println!("   Initial value: {}", counter.get());

    counter.increment();
    println!("   After increment: {}", counter.get());

    let result = counter.add(5);
    println!("   After adding 5: {} -> {}", result.previous, result.new);

    counter.decrement();
    println!("   After decrement: {}", counter.get());

    // Example 2: Multi-threaded counter
    println!("\n2. Multi-threaded Counter:");
    let counter = Arc::new(AtomicWord::new(0_i32));
    let num_threads = 10;
    let increments_per_thread = 1000;

    let mut handles = vec![];
    for i in 0..num_threads {
        let counter = counter.clone();
        let handle = thread::spawn(move || {
            for _ in 0..increments_per_thread {
                counter.increment();
            }
            println!("   Thread {} completed", i);
        });
        handles.push(handle);
    }

    for handle in handles {
        handle.join().unwrap();
    }

    println!(
        "   Final count: {} (expected: {})",
        counter.get(),
        num_threads * increments_per_thread
    );

    // Example 3: Conditional exchange
    println!("\n3. Conditional Exchange:");
    let counter = AtomicWord::new(10_i32);
    println!("   Initial value: {}", counter.get());

    for comparand in [10, 10] {
        let result = counter.try_exchange(20, comparand);
        if result.was_set {
            println!("   Exchange succeeded: value is now {}", result.current);
        } else {
            println!("   Exchange failed: actual value was {}", result.current);
        }
    }

    // Example 4: Bounded increment
    println!("\n4. Bounded Increment:");
    let slots = AtomicWord::new(0_u32);
    let limit = 3;
    for attempt in 1..=5 {
        let result = slots.try_exchange_with_if(|v| v + 1, |_, new| *new <= limit);
        println!(
            "   Attempt {}: {} (slots in use: {})",
            attempt,
            if result.was_set { "granted" } else { "refused" },
            result.current
        );
    }

    println!("\n=== Example completed ===");
}
