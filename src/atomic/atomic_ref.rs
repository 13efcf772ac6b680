/*******************************************************************************
 *
 *    Copyright (c) 2025.
 *    3-Prism Co. Ltd.
 *
 *    All rights reserved.
 *
 ******************************************************************************/

//! # Atomic Reference
//!
//! Provides a lock-free atomic container for shared `Arc<T>` references,
//! with the same conditional-update surface as the other engines.
//!
//! # Author
//!
//! Haixing Hu

use std::fmt;
use std::sync::Arc;

use arc_swap::ArcSwap;

use crate::atomic::results::{
    ExchangeResult,
    TryExchangeResult,
};
use crate::atomic::spin_wait::SpinWait;
use crate::atomic::traits::Atomic;

/// Atomic container for a shared reference.
///
/// The stored `Arc<T>` is swapped as a single pointer, so every update is a
/// compare-and-swap on the allocation's address. The container keeps its
/// own strong count and releases it on replacement or drop; readers get a
/// fresh `Arc<T>` that stays valid however the container changes later.
///
/// # Identity and Equality
///
/// Two notions of "the same value" coexist here:
///
/// - [`compare_set`](Self::compare_set) and
///   [`compare_and_exchange`](Self::compare_and_exchange) compare by
///   identity (`Arc::ptr_eq`), exactly as a hardware CAS does.
/// - The comparand forms of the exchange protocol
///   ([`try_exchange`](Self::try_exchange),
///   [`spin_wait_for_value`](Self::spin_wait_for_value), ...) compare the
///   pointed-to values with `T: PartialEq`. They read the current
///   reference, check it against the comparand, then install the new
///   reference by identity CAS against the reference they read, retrying
///   if another thread replaced it in between.
///
/// # Memory Ordering Strategy
///
/// Loads, stores and swaps go through [`arc_swap::ArcSwap`], which is at
/// least as strong as `Acquire` loads, `Release` stores and `AcqRel`
/// read-modify-write operations.
///
/// # Example
///
/// ```rust
/// use prism3_atomic_cell::AtomicRef;
/// use std::sync::Arc;
///
/// #[derive(Debug, PartialEq)]
/// struct Config {
///     timeout: u64,
///     max_retries: u32,
/// }
///
/// let config = AtomicRef::new(Arc::new(Config {
///     timeout: 1000,
///     max_retries: 3,
/// }));
///
/// let result = config.exchange_with(|c| {
///     Arc::new(Config {
///         timeout: c.timeout * 2,
///         ..**c
///     })
/// });
/// assert_eq!(result.previous.timeout, 1000);
/// assert_eq!(config.get().timeout, 2000);
/// ```
///
/// # Author
///
/// Haixing Hu
pub struct AtomicRef<T> {
    inner: ArcSwap<T>,
}

impl<T> AtomicRef<T> {
    /// Creates a new atomic reference.
    ///
    /// # Parameters
    ///
    /// * `value` - The initial reference.
    #[inline]
    pub fn new(value: Arc<T>) -> Self {
        Self {
            inner: ArcSwap::new(value),
        }
    }

    /// Creates a new atomic reference owning a fresh allocation of `value`.
    ///
    /// # Parameters
    ///
    /// * `value` - The initial value.
    #[inline]
    pub fn from_value(value: T) -> Self {
        Self::new(Arc::new(value))
    }

    /// Gets the current reference.
    ///
    /// # Memory Ordering
    ///
    /// At least `Acquire`: everything written before the reference was
    /// published is visible through the returned `Arc`.
    ///
    /// # Returns
    ///
    /// A new strong reference to the current value.
    #[inline]
    pub fn get(&self) -> Arc<T> {
        self.inner.load_full()
    }

    /// Sets a new reference, releasing the container's hold on the old one.
    ///
    /// # Memory Ordering
    ///
    /// At least `Release`.
    ///
    /// # Parameters
    ///
    /// * `value` - The new reference to set.
    #[inline]
    pub fn set(&self, value: Arc<T>) {
        self.inner.store(value);
    }

    /// Swaps the current reference with a new reference, returning the old
    /// reference.
    ///
    /// # Parameters
    ///
    /// * `value` - The new reference to swap in.
    ///
    /// # Returns
    ///
    /// The old reference.
    #[inline]
    pub fn swap(&self, value: Arc<T>) -> Arc<T> {
        self.inner.swap(value)
    }

    /// Compares and sets the reference atomically, by identity.
    ///
    /// If the current reference points to the same allocation as
    /// `current`, sets it to `new` and returns `Ok(())`. Otherwise, returns
    /// `Err(actual)` where `actual` is the current reference and `new` is
    /// dropped.
    ///
    /// # Parameters
    ///
    /// * `current` - The expected current reference.
    /// * `new` - The new reference to set if current matches.
    ///
    /// # Returns
    ///
    /// `Ok(())` on success, or `Err(actual)` on failure.
    ///
    /// # Note
    ///
    /// Comparison uses pointer equality (`Arc::ptr_eq`), not value
    /// equality. An equal value in a different allocation does not match.
    ///
    /// # Example
    ///
    /// ```rust
    /// use prism3_atomic_cell::AtomicRef;
    /// use std::sync::Arc;
    ///
    /// let atomic = AtomicRef::from_value(10);
    /// let current = atomic.get();
    ///
    /// assert!(atomic.compare_set(&Arc::new(10), Arc::new(20)).is_err());
    /// assert!(atomic.compare_set(&current, Arc::new(20)).is_ok());
    /// assert_eq!(*atomic.get(), 20);
    /// ```
    #[inline]
    pub fn compare_set(&self, current: &Arc<T>, new: Arc<T>) -> Result<(), Arc<T>> {
        let previous = self.inner.compare_and_swap(current, new);
        if Arc::ptr_eq(&previous, current) {
            Ok(())
        } else {
            Err(Arc::clone(&previous))
        }
    }

    /// Compares and exchanges the reference atomically, by identity,
    /// returning the reference held before the operation.
    ///
    /// The exchange happened if the returned reference is `Arc::ptr_eq` to
    /// `current`.
    ///
    /// # Parameters
    ///
    /// * `current` - The expected current reference.
    /// * `new` - The new reference to set if current matches.
    ///
    /// # Returns
    ///
    /// The reference before the operation.
    #[inline]
    pub fn compare_and_exchange(&self, current: &Arc<T>, new: Arc<T>) -> Arc<T> {
        Arc::clone(&self.inner.compare_and_swap(current, new))
    }

    /// Replaces the reference with `map(current)` in a CAS loop.
    ///
    /// # Memory Ordering
    ///
    /// Each attempt is an identity CAS against the reference `map` was
    /// given; a lost race reloads and retries with backoff.
    ///
    /// # Parameters
    ///
    /// * `map` - Computes the new reference from the current one. It runs
    ///   once per attempt and must be a pure function of its input.
    ///
    /// # Returns
    ///
    /// The replaced and the installed reference.
    pub fn exchange_with<F>(&self, mut map: F) -> ExchangeResult<Arc<T>>
    where
        F: FnMut(&Arc<T>) -> Arc<T>,
    {
        let spin = SpinWait::new("AtomicRef::exchange_with");
        let mut current = self.get();
        loop {
            let new = map(&current);
            match self.compare_set(&current, Arc::clone(&new)) {
                Ok(()) => return ExchangeResult::new(current, new),
                Err(actual) => current = actual,
            }
            spin.spin();
        }
    }

    /// Replaces the reference with `map(current)` unless `map` fails.
    ///
    /// An `Err` from `map` is returned unchanged and leaves the container
    /// untouched.
    pub fn exchange_with_fallible<E, F>(&self, mut map: F) -> Result<ExchangeResult<Arc<T>>, E>
    where
        F: FnMut(&Arc<T>) -> Result<Arc<T>, E>,
    {
        let spin = SpinWait::new("AtomicRef::exchange_with_fallible");
        let mut current = self.get();
        loop {
            let new = map(&current)?;
            match self.compare_set(&current, Arc::clone(&new)) {
                Ok(()) => return Ok(ExchangeResult::new(current, new)),
                Err(actual) => current = actual,
            }
            spin.spin();
        }
    }

    /// Installs `new` if `predicate(current, new)` holds.
    ///
    /// The predicate is evaluated again only if another thread replaced
    /// the reference between the check and the CAS; a rejection returns
    /// immediately.
    ///
    /// # Parameters
    ///
    /// * `new` - The reference to install.
    /// * `predicate` - Decides from the current and the new reference.
    ///
    /// # Returns
    ///
    /// Whether the reference was set, together with the reference observed
    /// when the decision was taken.
    pub fn try_exchange_if<P>(&self, new: Arc<T>, mut predicate: P) -> TryExchangeResult<Arc<T>>
    where
        P: FnMut(&Arc<T>, &Arc<T>) -> bool,
    {
        let spin = SpinWait::new("AtomicRef::try_exchange_if");
        let mut current = self.get();
        loop {
            if !predicate(&current, &new) {
                return TryExchangeResult::rejected(current);
            }
            match self.compare_set(&current, Arc::clone(&new)) {
                Ok(()) => return TryExchangeResult::set(current, new),
                Err(actual) => current = actual,
            }
            spin.spin();
        }
    }

    /// Installs `map(current)` if `predicate(current, map(current))` holds.
    ///
    /// # Returns
    ///
    /// Whether the reference was set, together with the observed reference
    /// and the installed one.
    pub fn try_exchange_with_if<F, P>(&self, mut map: F, mut predicate: P) -> TryExchangeResult<Arc<T>>
    where
        F: FnMut(&Arc<T>) -> Arc<T>,
        P: FnMut(&Arc<T>, &Arc<T>) -> bool,
    {
        let spin = SpinWait::new("AtomicRef::try_exchange_with_if");
        let mut current = self.get();
        loop {
            let new = map(&current);
            if !predicate(&current, &new) {
                return TryExchangeResult::rejected(current);
            }
            match self.compare_set(&current, Arc::clone(&new)) {
                Ok(()) => return TryExchangeResult::set(current, new),
                Err(actual) => current = actual,
            }
            spin.spin();
        }
    }

    /// Busy-waits until `predicate(current)` holds, then returns the
    /// satisfying reference.
    pub fn spin_wait_until<P>(&self, mut predicate: P) -> Arc<T>
    where
        P: FnMut(&Arc<T>) -> bool,
    {
        let mut spin = SpinWait::new("AtomicRef::spin_wait_until");
        loop {
            let current = self.get();
            if predicate(&current) {
                return current;
            }
            spin.snooze();
        }
    }

    /// Retries installing `new` until `predicate(current, new)` holds.
    pub fn spin_wait_for_exchange_if<P>(&self, new: Arc<T>, predicate: P) -> ExchangeResult<Arc<T>>
    where
        P: FnMut(&Arc<T>, &Arc<T>) -> bool,
    {
        self.spin_wait_for_exchange_with_if(|_| Arc::clone(&new), predicate)
    }

    /// Retries installing `map(current)` until
    /// `predicate(current, map(current))` holds.
    pub fn spin_wait_for_exchange_with_if<F, P>(&self, mut map: F, mut predicate: P) -> ExchangeResult<Arc<T>>
    where
        F: FnMut(&Arc<T>) -> Arc<T>,
        P: FnMut(&Arc<T>, &Arc<T>) -> bool,
    {
        let mut spin = SpinWait::new("AtomicRef::spin_wait_for_exchange_with_if");
        loop {
            let current = self.get();
            let new = map(&current);
            if predicate(&current, &new) && self.compare_set(&current, Arc::clone(&new)).is_ok() {
                return ExchangeResult::new(current, new);
            }
            spin.snooze();
        }
    }

    /// Runs `f` on the current value without taking a new strong
    /// reference.
    ///
    /// The value stays alive for the duration of `f` even if another
    /// thread replaces the reference meanwhile.
    ///
    /// # Parameters
    ///
    /// * `f` - Reads the current value.
    ///
    /// # Returns
    ///
    /// The result of `f`.
    #[inline]
    pub fn with_read<R, F>(&self, f: F) -> R
    where
        F: FnOnce(&T) -> R,
    {
        let guard = self.inner.load();
        f(&guard)
    }

    /// Consumes the atomic reference, returning the stored reference.
    #[inline]
    pub fn into_inner(self) -> Arc<T> {
        self.inner.into_inner()
    }
}

impl<T: PartialEq> AtomicRef<T> {
    /// Installs `new` if the current value equals `comparand`.
    ///
    /// Equality is value equality on `T`. Because the container is
    /// swapped by identity, this reads the current reference, compares
    /// it, then installs `new` with an identity CAS against that very
    /// reference, retrying when another thread replaced it in between.
    ///
    /// # Parameters
    ///
    /// * `new` - The reference to install.
    /// * `comparand` - The value the container must hold.
    ///
    /// # Returns
    ///
    /// Whether the reference was set, together with the reference observed
    /// when the decision was taken.
    ///
    /// # Example
    ///
    /// ```rust
    /// use prism3_atomic_cell::AtomicRef;
    /// use std::sync::Arc;
    ///
    /// let atomic = AtomicRef::from_value(String::from("idle"));
    /// let result = atomic.try_exchange(Arc::new("busy".into()), Arc::new("idle".into()));
    /// assert!(result.was_set);
    /// assert_eq!(*atomic.get(), "busy");
    /// ```
    #[inline]
    pub fn try_exchange(&self, new: Arc<T>, comparand: Arc<T>) -> TryExchangeResult<Arc<T>> {
        self.try_exchange_if(new, |current, _| **current == *comparand)
    }

    /// Installs `map(comparand)` if the current value equals `comparand`.
    ///
    /// `map` runs exactly once, before the first attempt.
    #[inline]
    pub fn try_exchange_with<F>(&self, map: F, comparand: Arc<T>) -> TryExchangeResult<Arc<T>>
    where
        F: FnOnce(&Arc<T>) -> Arc<T>,
    {
        let new = map(&comparand);
        self.try_exchange(new, comparand)
    }

    /// Busy-waits until the current value equals `target`, then returns
    /// the matching reference.
    #[inline]
    pub fn spin_wait_for_value(&self, target: Arc<T>) -> Arc<T> {
        self.spin_wait_until(|current| **current == *target)
    }

    /// Retries installing `new` until the current value equals
    /// `comparand`.
    ///
    /// # Returns
    ///
    /// The replaced reference, which equals `comparand` by value, and the
    /// installed one.
    #[inline]
    pub fn spin_wait_for_exchange(&self, new: Arc<T>, comparand: Arc<T>) -> ExchangeResult<Arc<T>> {
        self.spin_wait_for_exchange_if(new, |current, _| **current == *comparand)
    }

    /// Retries installing `map(comparand)` until the current value equals
    /// `comparand`. `map` runs exactly once.
    #[inline]
    pub fn spin_wait_for_exchange_with<F>(&self, map: F, comparand: Arc<T>) -> ExchangeResult<Arc<T>>
    where
        F: FnOnce(&Arc<T>) -> Arc<T>,
    {
        let new = map(&comparand);
        self.spin_wait_for_exchange(new, comparand)
    }
}

// Trait implementations: These methods forward to the struct's direct
// implementations for API consistency. `compare_set` keeps the identity
// comparison of the inherent method.

impl<T> Atomic for AtomicRef<T> {
    type Value = Arc<T>;

    #[inline]
    fn get(&self) -> Arc<T> {
        self.get()
    }

    #[inline]
    fn set(&self, value: Arc<T>) {
        self.set(value);
    }

    #[inline]
    fn swap(&self, value: Arc<T>) -> Arc<T> {
        self.swap(value)
    }

    #[inline]
    fn compare_set(&self, current: Arc<T>, new: Arc<T>) -> Result<(), Arc<T>>
    where
        Arc<T>: PartialEq,
    {
        self.compare_set(&current, new)
    }

    #[inline]
    fn exchange_with<F>(&self, map: F) -> ExchangeResult<Arc<T>>
    where
        F: FnMut(&Arc<T>) -> Arc<T>,
    {
        self.exchange_with(map)
    }

    #[inline]
    fn exchange_with_fallible<E, F>(&self, map: F) -> Result<ExchangeResult<Arc<T>>, E>
    where
        F: FnMut(&Arc<T>) -> Result<Arc<T>, E>,
    {
        self.exchange_with_fallible(map)
    }

    #[inline]
    fn try_exchange(&self, new: Arc<T>, comparand: Arc<T>) -> TryExchangeResult<Arc<T>>
    where
        Arc<T>: PartialEq,
    {
        self.try_exchange_if(new, |current, _| *current == comparand)
    }

    #[inline]
    fn try_exchange_if<P>(&self, new: Arc<T>, predicate: P) -> TryExchangeResult<Arc<T>>
    where
        P: FnMut(&Arc<T>, &Arc<T>) -> bool,
    {
        self.try_exchange_if(new, predicate)
    }

    #[inline]
    fn try_exchange_with<F>(&self, map: F, comparand: Arc<T>) -> TryExchangeResult<Arc<T>>
    where
        F: FnOnce(&Arc<T>) -> Arc<T>,
        Arc<T>: PartialEq,
    {
        let new = map(&comparand);
        Atomic::try_exchange(self, new, comparand)
    }

    #[inline]
    fn try_exchange_with_if<F, P>(&self, map: F, predicate: P) -> TryExchangeResult<Arc<T>>
    where
        F: FnMut(&Arc<T>) -> Arc<T>,
        P: FnMut(&Arc<T>, &Arc<T>) -> bool,
    {
        self.try_exchange_with_if(map, predicate)
    }

    #[inline]
    fn spin_wait_for_value(&self, target: Arc<T>) -> Arc<T>
    where
        Arc<T>: PartialEq,
    {
        self.spin_wait_until(|current| *current == target)
    }

    #[inline]
    fn spin_wait_until<P>(&self, predicate: P) -> Arc<T>
    where
        P: FnMut(&Arc<T>) -> bool,
    {
        self.spin_wait_until(predicate)
    }

    #[inline]
    fn spin_wait_for_exchange(&self, new: Arc<T>, comparand: Arc<T>) -> ExchangeResult<Arc<T>>
    where
        Arc<T>: PartialEq,
    {
        self.spin_wait_for_exchange_if(new, |current, _| *current == comparand)
    }

    #[inline]
    fn spin_wait_for_exchange_if<P>(&self, new: Arc<T>, predicate: P) -> ExchangeResult<Arc<T>>
    where
        P: FnMut(&Arc<T>, &Arc<T>) -> bool,
    {
        self.spin_wait_for_exchange_if(new, predicate)
    }

    #[inline]
    fn spin_wait_for_exchange_with<F>(&self, map: F, comparand: Arc<T>) -> ExchangeResult<Arc<T>>
    where
        F: FnOnce(&Arc<T>) -> Arc<T>,
        Arc<T>: PartialEq,
    {
        let new = map(&comparand);
        Atomic::spin_wait_for_exchange(self, new, comparand)
    }

    #[inline]
    fn spin_wait_for_exchange_with_if<F, P>(&self, map: F, predicate: P) -> ExchangeResult<Arc<T>>
    where
        F: FnMut(&Arc<T>) -> Arc<T>,
        P: FnMut(&Arc<T>, &Arc<T>) -> bool,
    {
        self.spin_wait_for_exchange_with_if(map, predicate)
    }
}

impl<T> Clone for AtomicRef<T> {
    /// Creates an independent container that initially shares the current
    /// reference.
    fn clone(&self) -> Self {
        Self::new(self.get())
    }
}

impl<T: Default> Default for AtomicRef<T> {
    #[inline]
    fn default() -> Self {
        Self::from_value(T::default())
    }
}

impl<T> From<Arc<T>> for AtomicRef<T> {
    #[inline]
    fn from(value: Arc<T>) -> Self {
        Self::new(value)
    }
}

impl<T: fmt::Debug> fmt::Debug for AtomicRef<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AtomicRef")
            .field("value", &self.get())
            .finish()
    }
}

impl<T: fmt::Display> fmt::Display for AtomicRef<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.get())
    }
}
