/*******************************************************************************
 *
 *    Copyright (c) 2025.
 *    3-Prism Co. Ltd.
 *
 *    All rights reserved.
 *
 ******************************************************************************/

//! # Atomic Containers
//!
//! Provides atomic containers for values of any size behind one shared
//! operation surface.
//!
//! # Features
//!
//! - [`AtomicWord`]: lock-free compare-and-swap engine for values that fit
//!   a machine word (`bool`, integers, raw pointers)
//! - [`AtomicCell`]: engine for values of any size, guarded by a
//!   [`RwSpinLock`]
//! - [`SharedToken`] and [`ExclusiveToken`]: scoped in-place access to the
//!   value of an [`AtomicCell`]
//! - [`AtomicPtr`]: pointer arithmetic on top of [`AtomicWord`]
//! - [`AtomicRef`]: lock-free engine for shared `Arc<T>` references
//! - [`Atomic`]: conditional updates by comparand, predicate or map, with
//!   context forms, implemented by every engine
//!
//! # Author
//!
//! Haixing Hu

mod atomic_cell;
mod atomic_ptr;
mod atomic_ref;
mod atomic_word;
mod results;
mod rw_spin_lock;
mod scoped_token;
mod spin_wait;
mod traits;
mod word;

pub use atomic_cell::AtomicCell;
pub use atomic_ptr::AtomicPtr;
pub use atomic_ref::AtomicRef;
pub use atomic_word::AtomicWord;
pub use results::{
    ExchangeResult,
    TryExchangeResult,
};
pub use rw_spin_lock::RwSpinLock;
pub use scoped_token::{
    ExclusiveToken,
    SharedToken,
};
pub use traits::Atomic;
pub use word::{
    Word,
    WordInteger,
};
