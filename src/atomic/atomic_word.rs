/*******************************************************************************
 *
 *    Copyright (c) 2025.
 *    3-Prism Co. Ltd.
 *
 *    All rights reserved.
 *
 ******************************************************************************/

//! # Atomic Word
//!
//! Provides the compare-and-swap based atomic container for values that fit
//! the hardware CAS width, with conditional updates and spin waits.
//!
//! # Author
//!
//! Haixing Hu

use std::fmt;
use std::sync::atomic::Ordering;

use crate::atomic::results::{
    ExchangeResult,
    TryExchangeResult,
};
use crate::atomic::spin_wait::SpinWait;
use crate::atomic::traits::Atomic;
use crate::atomic::word::{
    Word,
    WordInteger,
};

/// Atomic container for a single machine word.
///
/// Every operation is lock-free: updates are built from compare-and-swap
/// retry loops, and contention only ever causes a retry, never a failure.
///
/// # Memory Ordering Strategy
///
/// - **Read operations** (`get`): Use `Acquire` ordering to ensure
///   visibility of writes from other threads.
/// - **Write operations** (`set`): Use `Release` ordering to ensure writes
///   are visible to other threads.
/// - **Read-Modify-Write** (`swap`, every exchange): Use `AcqRel` on
///   success and `Acquire` on failure.
/// - **Relaxed variants** (`get_relaxed`, `set_relaxed`): No ordering, for
///   callers that synchronize by other means.
///
/// # Example
///
/// ```rust
/// use prism3_atomic_cell::AtomicWord;
/// use std::sync::Arc;
/// use std::thread;
///
/// let counter = Arc::new(AtomicWord::new(0_u32));
/// let handles: Vec<_> = (0..4)
///     .map(|_| {
///         let counter = counter.clone();
///         thread::spawn(move || {
///             for _ in 0..100 {
///                 counter.exchange_with(|v| v + 1);
///             }
///         })
///     })
///     .collect();
/// for handle in handles {
///     handle.join().unwrap();
/// }
/// assert_eq!(counter.get(), 400);
/// ```
///
/// # Author
///
/// Haixing Hu
#[repr(transparent)]
pub struct AtomicWord<T: Word> {
    inner: T::Storage,
}

impl<T: Word> AtomicWord<T> {
    /// Creates a new atomic word.
    ///
    /// # Parameters
    ///
    /// * `value` - The initial value.
    #[inline]
    pub fn new(value: T) -> Self {
        Self {
            inner: T::new_storage(value),
        }
    }

    /// Gets the current value with `Acquire` ordering.
    #[inline]
    pub fn get(&self) -> T {
        T::load(&self.inner, Ordering::Acquire)
    }

    /// Gets the current value without ordering guarantees.
    ///
    /// The read is still atomic, it just does not synchronize with other
    /// threads' writes.
    #[inline]
    pub fn get_relaxed(&self) -> T {
        T::load(&self.inner, Ordering::Relaxed)
    }

    /// Sets a new value with `Release` ordering.
    #[inline]
    pub fn set(&self, value: T) {
        T::store(&self.inner, value, Ordering::Release);
    }

    /// Sets a new value without ordering guarantees.
    #[inline]
    pub fn set_relaxed(&self, value: T) {
        T::store(&self.inner, value, Ordering::Relaxed);
    }

    /// Unconditionally installs `value`, returning the previous value.
    #[inline]
    pub fn swap(&self, value: T) -> T {
        T::swap(&self.inner, value, Ordering::AcqRel)
    }

    /// Compares and sets the value atomically.
    ///
    /// If the current value equals `current`, sets it to `new` and returns
    /// `Ok(())`. Otherwise, returns `Err(actual)` where `actual` is the
    /// current value.
    ///
    /// # Memory Ordering
    ///
    /// - **Success**: Uses `AcqRel` ordering to publish the write.
    /// - **Failure**: Uses `Acquire` ordering to see the value that
    ///   actually exists.
    #[inline]
    pub fn compare_set(&self, current: T, new: T) -> Result<(), T> {
        T::compare_exchange(&self.inner, current, new, Ordering::AcqRel, Ordering::Acquire)
            .map(|_| ())
    }

    /// Weak version of compare-and-set.
    ///
    /// May spuriously fail even when the comparison succeeds. Should be
    /// used in a loop.
    #[inline]
    pub fn compare_set_weak(&self, current: T, new: T) -> Result<(), T> {
        T::compare_exchange_weak(&self.inner, current, new, Ordering::AcqRel, Ordering::Acquire)
            .map(|_| ())
    }

    /// Compares and exchanges the value atomically, returning the value
    /// before the operation. If it equals `current`, the operation
    /// succeeded.
    #[inline]
    pub fn compare_and_exchange(&self, current: T, new: T) -> T {
        match T::compare_exchange(&self.inner, current, new, Ordering::AcqRel, Ordering::Acquire) {
            Ok(prev) => prev,
            Err(actual) => actual,
        }
    }

    /// Replaces the value with `map(current)` in a CAS loop.
    ///
    /// `map` runs once per attempt and must be a pure function of its
    /// input.
    ///
    /// # Example
    ///
    /// ```rust
    /// use prism3_atomic_cell::AtomicWord;
    ///
    /// let atomic = AtomicWord::new(10_i32);
    /// let result = atomic.exchange_with(|v| v * 2);
    /// assert_eq!((result.previous, result.new), (10, 20));
    /// ```
    #[inline]
    pub fn exchange_with<F>(&self, mut map: F) -> ExchangeResult<T>
    where
        F: FnMut(&T) -> T,
    {
        let spin = SpinWait::new("AtomicWord::exchange_with");
        let mut current = self.get();
        loop {
            let new = map(&current);
            match self.compare_set_weak(current, new) {
                Ok(()) => return ExchangeResult::new(current, new),
                Err(actual) => current = actual,
            }
            spin.spin();
        }
    }

    /// Replaces the value with `map(current)` unless `map` fails.
    #[inline]
    pub fn exchange_with_fallible<E, F>(&self, mut map: F) -> Result<ExchangeResult<T>, E>
    where
        F: FnMut(&T) -> Result<T, E>,
    {
        let spin = SpinWait::new("AtomicWord::exchange_with_fallible");
        let mut current = self.get();
        loop {
            let new = map(&current)?;
            match self.compare_set_weak(current, new) {
                Ok(()) => return Ok(ExchangeResult::new(current, new)),
                Err(actual) => current = actual,
            }
            spin.spin();
        }
    }

    /// Installs `new` if the current value equals `comparand`.
    ///
    /// A single strong CAS decides the outcome, so a rejection is never
    /// spurious.
    ///
    /// # Memory Ordering
    ///
    /// - **Success**: `AcqRel`, publishing `new`.
    /// - **Rejection**: `Acquire`, so the reported value is the one actually
    ///   stored.
    ///
    /// # Parameters
    ///
    /// * `new` - The value to install.
    /// * `comparand` - The value the word must hold.
    ///
    /// # Returns
    ///
    /// Whether the value was set, together with the observed value; on
    /// rejection `current` is that same observed value.
    ///
    /// # Example
    ///
    /// ```rust
    /// use prism3_atomic_cell::AtomicWord;
    ///
    /// let atomic = AtomicWord::new(1_u8);
    /// assert!(!atomic.try_exchange(3, 2).was_set);
    /// assert!(atomic.try_exchange(3, 1).was_set);
    /// assert_eq!(atomic.get(), 3);
    /// ```
    #[inline]
    pub fn try_exchange(&self, new: T, comparand: T) -> TryExchangeResult<T> {
        match T::compare_exchange(&self.inner, comparand, new, Ordering::AcqRel, Ordering::Acquire) {
            Ok(previous) => TryExchangeResult::set(previous, new),
            Err(actual) => TryExchangeResult::rejected(actual),
        }
    }

    /// Installs `new` if `predicate(current, new)` holds.
    ///
    /// The predicate runs again after every failed CAS, with the freshly
    /// observed value; a rejection returns immediately.
    ///
    /// # Memory Ordering
    ///
    /// `AcqRel` on success and `Acquire` on a lost race.
    ///
    /// # Parameters
    ///
    /// * `new` - The value to install.
    /// * `predicate` - Decides from the current and the new value.
    ///
    /// # Returns
    ///
    /// Whether the value was set, together with the value observed when the
    /// decision was taken.
    ///
    /// # Example
    ///
    /// ```rust
    /// use prism3_atomic_cell::AtomicWord;
    ///
    /// let high_water = AtomicWord::new(10_u32);
    /// assert!(!high_water.try_exchange_if(7, |old, new| new > old).was_set);
    /// assert!(high_water.try_exchange_if(12, |old, new| new > old).was_set);
    /// assert_eq!(high_water.get(), 12);
    /// ```
    pub fn try_exchange_if<P>(&self, new: T, mut predicate: P) -> TryExchangeResult<T>
    where
        P: FnMut(&T, &T) -> bool,
    {
        let spin = SpinWait::new("AtomicWord::try_exchange_if");
        let mut current = self.get();
        loop {
            if !predicate(&current, &new) {
                return TryExchangeResult::rejected(current);
            }
            match self.compare_set_weak(current, new) {
                Ok(()) => return TryExchangeResult::set(current, new),
                Err(actual) => current = actual,
            }
            spin.spin();
        }
    }

    /// Installs `map(comparand)` if the current value equals `comparand`.
    ///
    /// `map` runs exactly once, before the single CAS.
    ///
    /// # Parameters
    ///
    /// * `map` - Computes the new value from the comparand.
    /// * `comparand` - The value the word must hold.
    ///
    /// # Returns
    ///
    /// Whether the value was set, together with the observed value and the
    /// installed one.
    #[inline]
    pub fn try_exchange_with<F>(&self, map: F, comparand: T) -> TryExchangeResult<T>
    where
        F: FnOnce(&T) -> T,
    {
        self.try_exchange(map(&comparand), comparand)
    }

    /// Installs `map(current)` if `predicate(current, map(current))` holds.
    ///
    /// Both callbacks run once per attempt and must be pure functions of their
    /// inputs.
    ///
    /// # Parameters
    ///
    /// * `map` - Computes the candidate value from the current one.
    /// * `predicate` - Decides from the current and the candidate value.
    ///
    /// # Returns
    ///
    /// Whether the value was set, together with the observed value and the
    /// installed one.
    pub fn try_exchange_with_if<F, P>(&self, mut map: F, mut predicate: P) -> TryExchangeResult<T>
    where
        F: FnMut(&T) -> T,
        P: FnMut(&T, &T) -> bool,
    {
        let spin = SpinWait::new("AtomicWord::try_exchange_with_if");
        let mut current = self.get();
        loop {
            let new = map(&current);
            if !predicate(&current, &new) {
                return TryExchangeResult::rejected(current);
            }
            match self.compare_set_weak(current, new) {
                Ok(()) => return TryExchangeResult::set(current, new),
                Err(actual) => current = actual,
            }
            spin.spin();
        }
    }

    /// Busy-waits until the value equals `target`, then returns it.
    ///
    /// Values stored in between are skipped, so the result always equals
    /// `target`. There is no timeout.
    ///
    /// # Memory Ordering
    ///
    /// Polls with `Acquire` loads, so writes published before `target` was
    /// stored are visible once this returns.
    ///
    /// # Parameters
    ///
    /// * `target` - The value to wait for.
    ///
    /// # Returns
    ///
    /// The matching value.
    pub fn spin_wait_for_value(&self, target: T) -> T {
        self.spin_wait_until(|current| *current == target)
    }

    /// Busy-waits until `predicate(current)` holds, then returns the
    /// satisfying value.
    ///
    /// Polls spin briefly, then yield to the scheduler.
    ///
    /// # Parameters
    ///
    /// * `predicate` - Tests each observed value.
    ///
    /// # Returns
    ///
    /// The first observed value satisfying `predicate`.
    pub fn spin_wait_until<P>(&self, mut predicate: P) -> T
    where
        P: FnMut(&T) -> bool,
    {
        let mut spin = SpinWait::new("AtomicWord::spin_wait_until");
        loop {
            let current = self.get();
            if predicate(&current) {
                return current;
            }
            spin.snooze();
        }
    }

    /// Retries installing `new` until the current value equals `comparand`.
    ///
    /// # Parameters
    ///
    /// * `new` - The value to install.
    /// * `comparand` - The value the word must hold.
    ///
    /// # Returns
    ///
    /// The replaced value, equal to `comparand`, and the installed one.
    ///
    /// # Example
    ///
    /// ```rust
    /// use prism3_atomic_cell::AtomicWord;
    /// use std::thread;
    ///
    /// let turn = AtomicWord::new(0_u8);
    /// thread::scope(|s| {
    ///     s.spawn(|| turn.spin_wait_for_exchange(2, 1));
    ///     turn.set(1);
    /// });
    /// assert_eq!(turn.get(), 2);
    /// ```
    pub fn spin_wait_for_exchange(&self, new: T, comparand: T) -> ExchangeResult<T> {
        let mut spin = SpinWait::new("AtomicWord::spin_wait_for_exchange");
        loop {
            if self.compare_set(comparand, new).is_ok() {
                return ExchangeResult::new(comparand, new);
            }
            spin.snooze();
        }
    }

    /// Retries installing `new` until `predicate(current, new)` holds.
    ///
    /// # Parameters
    ///
    /// * `new` - The value to install.
    /// * `predicate` - Decides from the current and the new value.
    ///
    /// # Returns
    ///
    /// The replaced and the installed value.
    pub fn spin_wait_for_exchange_if<P>(&self, new: T, mut predicate: P) -> ExchangeResult<T>
    where
        P: FnMut(&T, &T) -> bool,
    {
        self.spin_wait_for_exchange_with_if(|_| new, |current, new| predicate(current, new))
    }

    /// Retries installing `map(comparand)` until the current value equals
    /// `comparand`.
    ///
    /// `map` runs exactly once, before the first attempt.
    ///
    /// # Parameters
    ///
    /// * `map` - Computes the new value from the comparand.
    /// * `comparand` - The value the word must hold.
    ///
    /// # Returns
    ///
    /// The replaced and the installed value.
    pub fn spin_wait_for_exchange_with<F>(&self, map: F, comparand: T) -> ExchangeResult<T>
    where
        F: FnOnce(&T) -> T,
    {
        self.spin_wait_for_exchange(map(&comparand), comparand)
    }

    /// Retries installing `map(current)` until
    /// `predicate(current, map(current))` holds.
    ///
    /// # Parameters
    ///
    /// * `map` - Computes the candidate value from the current one.
    /// * `predicate` - Decides from the current and the candidate value.
    ///
    /// # Returns
    ///
    /// The replaced and the installed value.
    pub fn spin_wait_for_exchange_with_if<F, P>(&self, mut map: F, mut predicate: P) -> ExchangeResult<T>
    where
        F: FnMut(&T) -> T,
        P: FnMut(&T, &T) -> bool,
    {
        let mut spin = SpinWait::new("AtomicWord::spin_wait_for_exchange_with_if");
        loop {
            let current = self.get();
            let new = map(&current);
            if predicate(&current, &new) && self.compare_set_weak(current, new).is_ok() {
                return ExchangeResult::new(current, new);
            }
            spin.snooze();
        }
    }

    /// Returns a mutable reference to the value.
    ///
    /// The exclusive borrow guarantees that no other thread accesses the
    /// value concurrently, so no synchronization is needed.
    #[inline]
    pub fn get_mut(&mut self) -> &mut T {
        T::get_mut(&mut self.inner)
    }

    /// Consumes the atomic word, returning the value.
    #[inline]
    pub fn into_inner(self) -> T {
        T::into_inner(self.inner)
    }

    /// Gets a reference to the underlying standard library atomic type.
    ///
    /// When using the returned reference, you have full control over
    /// memory ordering.
    #[inline]
    pub fn inner(&self) -> &T::Storage {
        &self.inner
    }
}

impl<T: WordInteger> AtomicWord<T> {
    /// Adds one, wrapping on overflow.
    ///
    /// # Example
    ///
    /// ```rust
    /// use prism3_atomic_cell::AtomicWord;
    ///
    /// let atomic = AtomicWord::new(u8::MAX);
    /// assert_eq!(atomic.increment().new, 0);
    /// ```
    #[inline]
    pub fn increment(&self) -> ExchangeResult<T> {
        self.add(T::ONE)
    }

    /// Subtracts one, wrapping on overflow.
    #[inline]
    pub fn decrement(&self) -> ExchangeResult<T> {
        self.subtract(T::ONE)
    }

    /// Adds `delta`, wrapping on overflow.
    ///
    /// # Memory Ordering
    ///
    /// A CAS loop with `AcqRel` on success and `Acquire` on a lost race.
    ///
    /// # Parameters
    ///
    /// * `delta` - The amount to add.
    ///
    /// # Returns
    ///
    /// The value before and after the addition.
    ///
    /// # Example
    ///
    /// ```rust
    /// use prism3_atomic_cell::AtomicWord;
    ///
    /// let atomic = AtomicWord::new(250_u8);
    /// assert_eq!(atomic.add(10).into_tuple(), (250, 4));
    /// ```
    #[inline]
    pub fn add(&self, delta: T) -> ExchangeResult<T> {
        self.exchange_with(|current| current.wrapping_add(delta))
    }

    /// Subtracts `delta`, wrapping on overflow.
    ///
    /// # Parameters
    ///
    /// * `delta` - The amount to subtract.
    ///
    /// # Returns
    ///
    /// The value before and after the subtraction.
    #[inline]
    pub fn subtract(&self, delta: T) -> ExchangeResult<T> {
        self.exchange_with(|current| current.wrapping_sub(delta))
    }
}

// Trait implementations: These methods forward to the struct's direct
// implementations for API consistency.

impl<T: Word> Atomic for AtomicWord<T> {
    type Value = T;

    #[inline]
    fn get(&self) -> T {
        self.get()
    }

    #[inline]
    fn set(&self, value: T) {
        self.set(value);
    }

    #[inline]
    fn swap(&self, value: T) -> T {
        self.swap(value)
    }

    #[inline]
    fn compare_set(&self, current: T, new: T) -> Result<(), T> {
        self.compare_set(current, new)
    }

    #[inline]
    fn exchange_with<F>(&self, map: F) -> ExchangeResult<T>
    where
        F: FnMut(&T) -> T,
    {
        self.exchange_with(map)
    }

    #[inline]
    fn exchange_with_fallible<E, F>(&self, map: F) -> Result<ExchangeResult<T>, E>
    where
        F: FnMut(&T) -> Result<T, E>,
    {
        self.exchange_with_fallible(map)
    }

    #[inline]
    fn try_exchange(&self, new: T, comparand: T) -> TryExchangeResult<T> {
        self.try_exchange(new, comparand)
    }

    #[inline]
    fn try_exchange_if<P>(&self, new: T, predicate: P) -> TryExchangeResult<T>
    where
        P: FnMut(&T, &T) -> bool,
    {
        self.try_exchange_if(new, predicate)
    }

    #[inline]
    fn try_exchange_with<F>(&self, map: F, comparand: T) -> TryExchangeResult<T>
    where
        F: FnOnce(&T) -> T,
    {
        self.try_exchange_with(map, comparand)
    }

    #[inline]
    fn try_exchange_with_if<F, P>(&self, map: F, predicate: P) -> TryExchangeResult<T>
    where
        F: FnMut(&T) -> T,
        P: FnMut(&T, &T) -> bool,
    {
        self.try_exchange_with_if(map, predicate)
    }

    #[inline]
    fn spin_wait_for_value(&self, target: T) -> T {
        self.spin_wait_for_value(target)
    }

    #[inline]
    fn spin_wait_until<P>(&self, predicate: P) -> T
    where
        P: FnMut(&T) -> bool,
    {
        self.spin_wait_until(predicate)
    }

    #[inline]
    fn spin_wait_for_exchange(&self, new: T, comparand: T) -> ExchangeResult<T> {
        self.spin_wait_for_exchange(new, comparand)
    }

    #[inline]
    fn spin_wait_for_exchange_if<P>(&self, new: T, predicate: P) -> ExchangeResult<T>
    where
        P: FnMut(&T, &T) -> bool,
    {
        self.spin_wait_for_exchange_if(new, predicate)
    }

    #[inline]
    fn spin_wait_for_exchange_with<F>(&self, map: F, comparand: T) -> ExchangeResult<T>
    where
        F: FnOnce(&T) -> T,
    {
        self.spin_wait_for_exchange_with(map, comparand)
    }

    #[inline]
    fn spin_wait_for_exchange_with_if<F, P>(&self, map: F, predicate: P) -> ExchangeResult<T>
    where
        F: FnMut(&T) -> T,
        P: FnMut(&T, &T) -> bool,
    {
        self.spin_wait_for_exchange_with_if(map, predicate)
    }
}

impl<T: Word + Default> Default for AtomicWord<T> {
    #[inline]
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T: Word> From<T> for AtomicWord<T> {
    #[inline]
    fn from(value: T) -> Self {
        Self::new(value)
    }
}

impl<T: Word + fmt::Debug> fmt::Debug for AtomicWord<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AtomicWord")
            .field("value", &self.get())
            .finish()
    }
}

impl<T: Word + fmt::Display> fmt::Display for AtomicWord<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.get())
    }
}
