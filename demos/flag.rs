/*******************************************************************************
 *
 *    Copyright (c) 2025.
 *    3-Prism Co. Ltd.
 *
 *    All rights reserved.
 *
 ******************************************************************************/
//! # Atomic Boolean Flag Example
//!
//! Demonstrates using a boolean word for one-time initialization and
//! signaling between threads.

use prism3_atomic_cell::{
    AtomicCell,
    AtomicWord,
};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

fn main() {
    println!("=== Atomic Boolean Flag Example ===\n");

    // Example 1: Simple flag
    println!("1. Simple Flag:");
    let flag = AtomicWord::new(false);
    println!("   Initial value: {}", flag.get());

    flag.set(true);
    println!("   After set(true): {}", flag.get());

    flag.exchange_with(|v| !v);
    println!("   After negate: {}", flag.get());

    // Example 2: One-time initialization
    println!("\n2. One-time Initialization:");
    let initialized = Arc::new(AtomicWord::new(false));
    let mut handles = vec![];

    for i in 0..5 {
        let initialized = initialized.clone();
        let handle = thread::spawn(move || {
            if initialized.try_exchange(true, false).was_set {
                println!("   Thread {} performed initialization", i);
                thread::sleep(Duration::from_millis(100));
            } else {
                println!("   Thread {} skipped (already initialized)", i);
            }
        });
        handles.push(handle);
    }

    for handle in handles {
        handle.join().unwrap();
    }

    println!("   Final state: initialized = {}", initialized.get());

    // Example 3: Producer-Consumer signaling
    println!("\n3. Producer-Consumer Signaling:");
    let ready = Arc::new(AtomicWord::new(false));
    let data = Arc::new(AtomicCell::new(String::new()));

    let ready_clone = ready.clone();
    let data_clone = data.clone();

    // Producer thread
    let producer = thread::spawn(move || {
        println!("   Producer: preparing data...");
        thread::sleep(Duration::from_millis(100));
        data_clone.set(String::from("payload"));
        ready_clone.set(true);
        println!("   Producer: data ready!");
    });

    // Consumer thread
    let consumer = thread::spawn(move || {
        println!("   Consumer: waiting for data...");
        ready.spin_wait_for_value(true);
        println!("   Consumer: received data = {}", data.get());
    });

    producer.join().unwrap();
    consumer.join().unwrap();

    println!("\n=== Example completed ===");
}
