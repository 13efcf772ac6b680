/*******************************************************************************
 *
 *    Copyright (c) 2025.
 *    3-Prism Co. Ltd.
 *
 *    All rights reserved.
 *
 ******************************************************************************/
//! # prism3-rust-atomic-cell
//!
//! Atomic containers for values of any size and shape, used as building
//! blocks for concurrent data structures.
//!
//! Values that fit the hardware compare-and-swap width live in a lock-free
//! [`AtomicWord`]. Anything larger lives in an [`AtomicCell`], whose
//! reader-writer spin lock guarantees that no observer ever sees a torn
//! value. Shared immutable snapshots live behind an `Arc` in a lock-free
//! [`AtomicRef`]. Every engine implements the [`Atomic`] trait, so code
//! written against it works with any of them.
//!
//! ## Design Goals
//!
//! - **No torn reads**: every observer sees the whole old or the whole new
//!   value
//! - **One protocol**: conditional updates by comparand, predicate or map,
//!   each with a context form, shared by both engines
//! - **Scoped access**: RAII tokens give in-place access to large values
//!   without copying and always release the lock, even on panic
//! - **Progress**: contention only causes retries with backoff, never
//!   failures
//!
//! ## Features
//!
//! - `tracing`: emits a `trace` event when a spin wait escalates from
//!   spinning to yielding
//! - `serde`: derives `Serialize` and `Deserialize` for the result types
//!
//! ## Example
//!
//! ```rust
//! use prism3_atomic_cell::{AtomicCell, AtomicWord};
//! use std::thread;
//!
//! // Lock-free counter
//! let counter = AtomicWord::new(0_u64);
//! // Two fields that must change together
//! let pair = AtomicCell::new((0_u64, 0_u64));
//!
//! thread::scope(|s| {
//!     for _ in 0..4 {
//!         s.spawn(|| {
//!             for _ in 0..100 {
//!                 counter.increment();
//!                 pair.exchange_with(|&(a, b)| (a + 1, b + 1));
//!             }
//!         });
//!     }
//! });
//!
//! assert_eq!(counter.get(), 400);
//! assert_eq!(pair.get(), (400, 400));
//! ```
//!
//! ## Author
//!
//! Haixing Hu

#![deny(missing_docs)]
#![deny(unsafe_op_in_unsafe_fn)]

pub mod atomic;

// Re-export all atomic types and traits
pub use atomic::{
    Atomic,
    AtomicCell,
    AtomicPtr,
    AtomicRef,
    AtomicWord,
    ExchangeResult,
    ExclusiveToken,
    RwSpinLock,
    SharedToken,
    TryExchangeResult,
    Word,
    WordInteger,
};
