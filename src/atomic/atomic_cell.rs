/*******************************************************************************
 *
 *    Copyright (c) 2025.
 *    3-Prism Co. Ltd.
 *
 *    All rights reserved.
 *
 ******************************************************************************/

//! # Atomic Cell
//!
//! Provides an atomic container for values of any size, guarded by a
//! reader-writer spin lock instead of hardware compare-and-swap.
//!
//! # Author
//!
//! Haixing Hu

use std::cell::UnsafeCell;
use std::fmt;
use std::mem;

use crate::atomic::results::{
    ExchangeResult,
    TryExchangeResult,
};
use crate::atomic::rw_spin_lock::RwSpinLock;
use crate::atomic::scoped_token::{
    ExclusiveToken,
    SharedToken,
};
use crate::atomic::spin_wait::SpinWait;
use crate::atomic::traits::Atomic;

/// Atomic container for values wider than a machine word.
///
/// Offers the same operations as [`AtomicWord`], implemented with mutual
/// exclusion: reads take the lock as a reader and copy the value out,
/// every write (including the rejection path of the `try_exchange`
/// family, which must compare against an untorn snapshot) takes the lock
/// as the writer. Observers therefore see either the whole old or the
/// whole new value, whatever the size of `T`.
///
/// [`read`](Self::read) and [`write`](Self::write) hand out scoped tokens
/// for in-place access without copying.
///
/// # Callbacks
///
/// Maps and predicates run while the lock is held. They must be short,
/// must not block and must not access the same cell. A panicking callback
/// releases the lock during unwinding and leaves the previous value in
/// place.
///
/// # Example
///
/// ```rust
/// use prism3_atomic_cell::AtomicCell;
///
/// #[derive(Clone, Copy, Debug, PartialEq)]
/// struct Span {
///     start: u64,
///     end: u64,
/// }
///
/// let span = AtomicCell::new(Span { start: 0, end: 10 });
/// let result = span.exchange_with(|s| Span { start: s.end, end: s.end + 10 });
/// assert_eq!(result.previous.end, 10);
/// assert_eq!(span.get(), Span { start: 10, end: 20 });
/// ```
///
/// [`AtomicWord`]: crate::atomic::AtomicWord
///
/// # Author
///
/// Haixing Hu
pub struct AtomicCell<T> {
    pub(crate) lock: RwSpinLock,
    pub(crate) value: UnsafeCell<T>,
}

// SAFETY: the value is only reached through the lock: shared references
// while readers hold it (requires `T: Sync`), and moves in or out while
// the writer holds it (requires `T: Send`).
unsafe impl<T: Send + Sync> Sync for AtomicCell<T> {}

impl<T> AtomicCell<T> {
    /// Creates a new atomic cell.
    ///
    /// # Parameters
    ///
    /// * `value` - The initial value.
    #[inline]
    pub const fn new(value: T) -> Self {
        Self {
            lock: RwSpinLock::new(),
            value: UnsafeCell::new(value),
        }
    }

    /// Acquires a shared token, spinning while a writer holds the lock.
    ///
    /// Any number of shared tokens may be live at once; while one is, writers
    /// wait. The token releases its admission when dropped, including during
    /// unwinding.
    ///
    /// # Memory Ordering
    ///
    /// Admission uses `Acquire`, so the token sees every write made under an
    /// exclusive token released before it.
    ///
    /// # Returns
    ///
    /// A token dereferencing to `&T`.
    ///
    /// # Example
    ///
    /// ```rust
    /// use prism3_atomic_cell::AtomicCell;
    ///
    /// let cell = AtomicCell::new(vec![1, 2, 3]);
    /// let token = cell.read();
    /// assert_eq!(token.len(), 3);
    /// ```
    #[inline]
    pub fn read(&self) -> SharedToken<'_, T> {
        SharedToken::acquire(self)
    }

    /// Acquires a shared token unless a writer holds the lock.
    ///
    /// # Returns
    ///
    /// `Some(token)` on admission, `None` while a writer holds the lock.
    #[inline]
    pub fn try_read(&self) -> Option<SharedToken<'_, T>> {
        SharedToken::try_acquire(self)
    }

    /// Acquires the exclusive token, spinning until the lock is free.
    ///
    /// While the token is live no other token exists and every other operation
    /// on the cell waits. Writes through the token become visible to all later
    /// readers once it is dropped.
    ///
    /// # Memory Ordering
    ///
    /// Admission uses `Acquire` and release uses `Release`.
    ///
    /// # Returns
    ///
    /// A token dereferencing to `&mut T`.
    ///
    /// # Example
    ///
    /// ```rust
    /// use prism3_atomic_cell::AtomicCell;
    ///
    /// let cell = AtomicCell::new(vec![1, 2, 3]);
    /// cell.write().push(4);
    /// assert_eq!(cell.get(), vec![1, 2, 3, 4]);
    /// ```
    #[inline]
    pub fn write(&self) -> ExclusiveToken<'_, T> {
        ExclusiveToken::acquire(self)
    }

    /// Acquires the exclusive token if the lock is free right now.
    ///
    /// # Returns
    ///
    /// `Some(token)` on admission, `None` if any reader or writer holds the
    /// lock.
    #[inline]
    pub fn try_write(&self) -> Option<ExclusiveToken<'_, T>> {
        ExclusiveToken::try_acquire(self)
    }

    /// Runs `f` with a shared reference to the value, holding the lock as
    /// a reader for the duration of the call.
    #[inline]
    pub fn with_read<R, F>(&self, f: F) -> R
    where
        F: FnOnce(&T) -> R,
    {
        f(&*self.read())
    }

    /// Runs `f` with a mutable reference to the value, holding the lock
    /// as the writer for the duration of the call.
    #[inline]
    pub fn with_write<R, F>(&self, f: F) -> R
    where
        F: FnOnce(&mut T) -> R,
    {
        f(&mut *self.write())
    }

    /// Sets a new value under the writer lock.
    ///
    /// The old value is dropped after the lock has been released.
    #[inline]
    pub fn set(&self, value: T) {
        let previous = mem::replace(&mut *self.write(), value);
        drop(previous);
    }

    /// Installs `value` under the writer lock, returning the previous
    /// value.
    #[inline]
    pub fn swap(&self, value: T) -> T {
        mem::replace(&mut *self.write(), value)
    }

    /// Overwrites the value without taking the lock.
    ///
    /// # Safety
    ///
    /// No other thread may access the cell during the call, and the
    /// caller must not hold a token on it.
    #[inline]
    pub unsafe fn set_unsynchronized(&self, value: T) {
        // SAFETY: exclusivity is guaranteed by the caller.
        unsafe { *self.value.get() = value }
    }

    /// Returns the lock guarding the value, for inspection.
    #[inline]
    pub fn raw_lock(&self) -> &RwSpinLock {
        &self.lock
    }

    /// Returns a mutable reference to the value.
    ///
    /// The exclusive borrow guarantees that no token exists, so the lock
    /// is not taken.
    #[inline]
    pub fn get_mut(&mut self) -> &mut T {
        self.value.get_mut()
    }

    /// Consumes the cell, returning the value.
    #[inline]
    pub fn into_inner(self) -> T {
        self.value.into_inner()
    }
}

impl<T: Clone> AtomicCell<T> {
    /// Gets a copy of the current value under the reader lock.
    #[inline]
    pub fn get(&self) -> T {
        T::clone(&self.read())
    }

    /// Gets a copy of the value without taking the lock.
    ///
    /// # Safety
    ///
    /// No other thread may write the cell during the call.
    #[inline]
    pub unsafe fn get_unsynchronized(&self) -> T {
        // SAFETY: absence of concurrent writers is guaranteed by the
        // caller.
        unsafe { T::clone(&*self.value.get()) }
    }

    /// Replaces the value with `map(current)` under the writer lock.
    ///
    /// `map` runs exactly once.
    pub fn exchange_with<F>(&self, mut map: F) -> ExchangeResult<T>
    where
        F: FnMut(&T) -> T,
    {
        let mut token = self.write();
        let new = map(&*token);
        let previous = mem::replace(&mut *token, new.clone());
        drop(token);
        ExchangeResult::new(previous, new)
    }

    /// Replaces the value with `map(current)` unless `map` fails.
    pub fn exchange_with_fallible<E, F>(&self, mut map: F) -> Result<ExchangeResult<T>, E>
    where
        F: FnMut(&T) -> Result<T, E>,
    {
        let mut token = self.write();
        let new = map(&*token)?;
        let previous = mem::replace(&mut *token, new.clone());
        drop(token);
        Ok(ExchangeResult::new(previous, new))
    }

    /// Installs `new` if `predicate(current, new)` holds.
    ///
    /// The whole decision runs under the writer lock, so the predicate sees an
    /// untorn value that cannot change before the install. It runs exactly
    /// once.
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
    /// use prism3_atomic_cell::AtomicCell;
    ///
    /// let cell = AtomicCell::new((3_u32, "three"));
    /// let result = cell.try_exchange_if((2, "two"), |old, new| new.0 > old.0);
    /// assert!(!result.was_set);
    /// assert_eq!(result.current, (3, "three"));
    /// ```
    pub fn try_exchange_if<P>(&self, new: T, mut predicate: P) -> TryExchangeResult<T>
    where
        P: FnMut(&T, &T) -> bool,
    {
        let mut token = self.write();
        if predicate(&*token, &new) {
            let previous = mem::replace(&mut *token, new.clone());
            TryExchangeResult::set(previous, new)
        } else {
            TryExchangeResult::rejected(T::clone(&token))
        }
    }

    /// Installs `map(current)` if `predicate(current, map(current))` holds.
    ///
    /// `map` and `predicate` each run exactly once under the writer lock.
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
        let mut token = self.write();
        let new = map(&*token);
        if predicate(&*token, &new) {
            let previous = mem::replace(&mut *token, new.clone());
            TryExchangeResult::set(previous, new)
        } else {
            TryExchangeResult::rejected(T::clone(&token))
        }
    }

    /// Busy-waits until `predicate(current)` holds, then returns a copy of the
    /// satisfying value.
    ///
    /// Each poll takes the lock as a reader and releases it before backing
    /// off, so writers can make progress between polls. There is no timeout.
    ///
    /// # Parameters
    ///
    /// * `predicate` - Tests each observed value.
    ///
    /// # Returns
    ///
    /// A copy of the first observed value satisfying `predicate`.
    pub fn spin_wait_until<P>(&self, mut predicate: P) -> T
    where
        P: FnMut(&T) -> bool,
    {
        let mut spin = SpinWait::new("AtomicCell::spin_wait_until");
        loop {
            let token = self.read();
            if predicate(&*token) {
                return T::clone(&token);
            }
            drop(token);
            spin.snooze();
        }
    }

    /// Retries installing `new` until `predicate(current, new)` holds.
    ///
    /// Each attempt takes the writer lock, evaluates the predicate and either
    /// installs `new` or releases the lock and backs off.
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
        let mut spin = SpinWait::new("AtomicCell::spin_wait_for_exchange_if");
        loop {
            let mut token = self.write();
            if predicate(&*token, &new) {
                let previous = mem::replace(&mut *token, new.clone());
                return ExchangeResult::new(previous, new);
            }
            drop(token);
            spin.snooze();
        }
    }

    /// Retries installing `map(current)` until
    /// `predicate(current, map(current))` holds.
    ///
    /// `map` runs once per attempt, under the writer lock.
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
        let mut spin = SpinWait::new("AtomicCell::spin_wait_for_exchange_with_if");
        loop {
            let mut token = self.write();
            let new = map(&*token);
            if predicate(&*token, &new) {
                let previous = mem::replace(&mut *token, new.clone());
                return ExchangeResult::new(previous, new);
            }
            drop(token);
            spin.snooze();
        }
    }
}

impl<T: Clone + PartialEq> AtomicCell<T> {
    /// Compares and sets the value under the writer lock.
    ///
    /// Returns `Err(actual)` if the current value differs from `current`.
    pub fn compare_set(&self, current: T, new: T) -> Result<(), T> {
        self.try_exchange(new, current).into_result().map(|_| ())
    }

    /// Installs `new` if the current value equals `comparand`.
    ///
    /// The comparison uses `T: PartialEq` under the writer lock. A rejection
    /// reports the value that was compared.
    ///
    /// # Parameters
    ///
    /// * `new` - The value to install.
    /// * `comparand` - The value the cell must hold.
    ///
    /// # Returns
    ///
    /// Whether the value was set, together with the value observed when the
    /// decision was taken.
    ///
    /// # Example
    ///
    /// ```rust
    /// use prism3_atomic_cell::AtomicCell;
    ///
    /// let cell = AtomicCell::new(String::from("idle"));
    /// let result = cell.try_exchange("busy".into(), "stopped".into());
    /// assert!(!result.was_set);
    /// assert_eq!(result.current, "idle");
    /// ```
    pub fn try_exchange(&self, new: T, comparand: T) -> TryExchangeResult<T> {
        self.try_exchange_if(new, |current, _| *current == comparand)
    }

    /// Installs `map(comparand)` if the current value equals `comparand`.
    ///
    /// `map` only runs when the comparison succeeds, and then exactly once.
    ///
    /// # Parameters
    ///
    /// * `map` - Computes the new value from the matched one.
    /// * `comparand` - The value the cell must hold.
    ///
    /// # Returns
    ///
    /// Whether the value was set, together with the observed value and the
    /// installed one.
    pub fn try_exchange_with<F>(&self, map: F, comparand: T) -> TryExchangeResult<T>
    where
        F: FnOnce(&T) -> T,
    {
        let mut token = self.write();
        if *token == comparand {
            let new = map(&*token);
            let previous = mem::replace(&mut *token, new.clone());
            TryExchangeResult::set(previous, new)
        } else {
            TryExchangeResult::rejected(T::clone(&token))
        }
    }

    /// Busy-waits until the value equals `target`, then returns a copy of it.
    ///
    /// Intermediate values are skipped; the returned value always equals
    /// `target`.
    ///
    /// # Parameters
    ///
    /// * `target` - The value to wait for.
    ///
    /// # Returns
    ///
    /// A copy of the matching value.
    pub fn spin_wait_for_value(&self, target: T) -> T {
        self.spin_wait_until(|current| *current == target)
    }

    /// Retries installing `new` until the current value equals `comparand`.
    ///
    /// # Parameters
    ///
    /// * `new` - The value to install.
    /// * `comparand` - The value the cell must hold.
    ///
    /// # Returns
    ///
    /// The replaced value, equal to `comparand`, and the installed one.
    pub fn spin_wait_for_exchange(&self, new: T, comparand: T) -> ExchangeResult<T> {
        self.spin_wait_for_exchange_if(new, |current, _| *current == comparand)
    }

    /// Retries installing `map(comparand)` until the current value equals
    /// `comparand`.
    ///
    /// `map` runs exactly once, on the attempt that matches, with the stored
    /// value.
    ///
    /// # Parameters
    ///
    /// * `map` - Computes the new value from the matched one.
    /// * `comparand` - The value the cell must hold.
    ///
    /// # Returns
    ///
    /// The replaced and the installed value.
    pub fn spin_wait_for_exchange_with<F>(&self, map: F, comparand: T) -> ExchangeResult<T>
    where
        F: FnOnce(&T) -> T,
    {
        let mut spin = SpinWait::new("AtomicCell::spin_wait_for_exchange_with");
        loop {
            let mut token = self.write();
            if *token == comparand {
                let new = map(&*token);
                let previous = mem::replace(&mut *token, new.clone());
                return ExchangeResult::new(previous, new);
            }
            drop(token);
            spin.snooze();
        }
    }
}

// Trait implementations: These methods forward to the struct's direct
// implementations for API consistency.

impl<T: Clone> Atomic for AtomicCell<T> {
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
    fn try_exchange(&self, new: T, comparand: T) -> TryExchangeResult<T>
    where
        T: PartialEq,
    {
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
        T: PartialEq,
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
    fn spin_wait_for_value(&self, target: T) -> T
    where
        T: PartialEq,
    {
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
    fn spin_wait_for_exchange(&self, new: T, comparand: T) -> ExchangeResult<T>
    where
        T: PartialEq,
    {
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
        T: PartialEq,
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

impl<T: Default> Default for AtomicCell<T> {
    #[inline]
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T> From<T> for AtomicCell<T> {
    #[inline]
    fn from(value: T) -> Self {
        Self::new(value)
    }
}

impl<T: Clone> Clone for AtomicCell<T> {
    /// Creates a new, independent cell holding a copy of the current
    /// value.
    fn clone(&self) -> Self {
        Self::new(self.get())
    }
}

impl<T: fmt::Debug> fmt::Debug for AtomicCell<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut d = f.debug_struct("AtomicCell");
        match self.try_read() {
            Some(token) => d.field("value", &&*token),
            None => d.field("value", &format_args!("<locked>")),
        };
        d.finish()
    }
}
