/*******************************************************************************
 *
 *    Copyright (c) 2025.
 *    3-Prism Co. Ltd.
 *
 *    All rights reserved.
 *
 ******************************************************************************/

//! # Atomic Traits
//!
//! Defines the operation surface shared by the CAS based [`AtomicWord`] and
//! the lock based [`AtomicCell`], so that higher-level structures can be
//! written once against either engine.
//!
//! Callbacks passed to these operations run synchronously on the calling
//! thread, possibly more than once, and must not block or touch the same
//! container again.
//!
//! [`AtomicWord`]: crate::atomic::AtomicWord
//! [`AtomicCell`]: crate::atomic::AtomicCell
//!
//! # Author
//!
//! Haixing Hu

use crate::atomic::results::{
    ExchangeResult,
    TryExchangeResult,
};

/// Common trait for all atomic containers.
///
/// Provides ordered reads and writes, unconditional and conditional
/// exchanges, and spin waits. All successful exchanges on one container are
/// linearizable.
///
/// Every operation taking a map or a predicate has a `_context` sibling
/// that threads an explicit context value through the callback. Closures
/// are already allocation-free, so the siblings simply delegate to the
/// closure form.
///
/// # Author
///
/// Haixing Hu
pub trait Atomic {
    /// The value type stored in the atomic.
    type Value;

    /// Gets the current value.
    ///
    /// Uses `Acquire` ordering (or a reader lock) by default.
    ///
    /// # Returns
    ///
    /// The current value.
    fn get(&self) -> Self::Value;

    /// Sets a new value.
    ///
    /// Uses `Release` ordering (or a writer lock) by default.
    ///
    /// # Parameters
    ///
    /// * `value` - The new value to set.
    fn set(&self, value: Self::Value);

    /// Swaps the current value with a new value, returning the old value.
    ///
    /// # Parameters
    ///
    /// * `value` - The new value to swap in.
    ///
    /// # Returns
    ///
    /// The old value.
    fn swap(&self, value: Self::Value) -> Self::Value;

    /// Compares and sets the value atomically.
    ///
    /// If the current value equals `current`, sets it to `new` and returns
    /// `Ok(())`. Otherwise, returns `Err(actual)` where `actual` is the
    /// current value.
    ///
    /// # Parameters
    ///
    /// * `current` - The expected current value.
    /// * `new` - The new value to set if current matches.
    ///
    /// # Returns
    ///
    /// `Ok(())` on success, or `Err(actual)` on failure.
    fn compare_set(&self, current: Self::Value, new: Self::Value) -> Result<(), Self::Value>
    where
        Self::Value: PartialEq,
    {
        self.try_exchange(new, current).into_result().map(|_| ())
    }

    /// Replaces the value with `map(current)`.
    ///
    /// `map` may be invoked several times under contention and must be a
    /// pure function of its input.
    ///
    /// # Parameters
    ///
    /// * `map` - Computes the new value from the current one.
    ///
    /// # Returns
    ///
    /// The replaced and the installed value.
    fn exchange_with<F>(&self, map: F) -> ExchangeResult<Self::Value>
    where
        F: FnMut(&Self::Value) -> Self::Value;

    /// Replaces the value with `map(current)` if `map` succeeds.
    ///
    /// An `Err` from `map` is returned unchanged and leaves the container
    /// untouched.
    ///
    /// # Parameters
    ///
    /// * `map` - Computes the new value from the current one, or fails.
    ///
    /// # Returns
    ///
    /// The replaced and the installed value, or the error of `map`.
    fn exchange_with_fallible<E, F>(&self, map: F) -> Result<ExchangeResult<Self::Value>, E>
    where
        F: FnMut(&Self::Value) -> Result<Self::Value, E>;

    /// Installs `new` if the current value equals `comparand`.
    ///
    /// # Parameters
    ///
    /// * `new` - The value to install.
    /// * `comparand` - The value the container must hold.
    ///
    /// # Returns
    ///
    /// Whether the value was set, together with the value observed when
    /// the decision was taken.
    fn try_exchange(
        &self,
        new: Self::Value,
        comparand: Self::Value,
    ) -> TryExchangeResult<Self::Value>
    where
        Self::Value: PartialEq;

    /// Installs `new` if `predicate(current, new)` holds.
    ///
    /// The predicate may be invoked again after a lost race; a rejection
    /// returns immediately.
    ///
    /// # Parameters
    ///
    /// * `new` - The value to install.
    /// * `predicate` - Decides from the current and the new value.
    ///
    /// # Returns
    ///
    /// Whether the value was set, together with the value observed when
    /// the decision was taken.
    fn try_exchange_if<P>(&self, new: Self::Value, predicate: P) -> TryExchangeResult<Self::Value>
    where
        P: FnMut(&Self::Value, &Self::Value) -> bool;

    /// Installs `map(comparand)` if the current value equals `comparand`.
    ///
    /// # Parameters
    ///
    /// * `map` - Computes the new value from the matched one.
    /// * `comparand` - The value the container must hold.
    ///
    /// # Returns
    ///
    /// Whether the value was set, together with the observed value and the
    /// installed one.
    fn try_exchange_with<F>(&self, map: F, comparand: Self::Value) -> TryExchangeResult<Self::Value>
    where
        F: FnOnce(&Self::Value) -> Self::Value,
        Self::Value: PartialEq;

    /// Installs `map(current)` if `predicate(current, map(current))` holds.
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
    fn try_exchange_with_if<F, P>(&self, map: F, predicate: P) -> TryExchangeResult<Self::Value>
    where
        F: FnMut(&Self::Value) -> Self::Value,
        P: FnMut(&Self::Value, &Self::Value) -> bool;

    /// Busy-waits until the value equals `target`.
    ///
    /// There is no timeout. Callers needing one should poll [`get`]
    /// themselves.
    ///
    /// [`get`]: Atomic::get
    ///
    /// # Returns
    ///
    /// The value that matched `target`.
    fn spin_wait_for_value(&self, target: Self::Value) -> Self::Value
    where
        Self::Value: PartialEq;

    /// Busy-waits until `predicate(current)` holds.
    ///
    /// # Returns
    ///
    /// The value that satisfied the predicate.
    fn spin_wait_until<P>(&self, predicate: P) -> Self::Value
    where
        P: FnMut(&Self::Value) -> bool;

    /// Retries installing `new` until the current value equals `comparand`.
    ///
    /// # Returns
    ///
    /// The replaced and the installed value.
    fn spin_wait_for_exchange(
        &self,
        new: Self::Value,
        comparand: Self::Value,
    ) -> ExchangeResult<Self::Value>
    where
        Self::Value: PartialEq;

    /// Retries installing `new` until `predicate(current, new)` holds.
    ///
    /// # Returns
    ///
    /// The replaced and the installed value.
    fn spin_wait_for_exchange_if<P>(&self, new: Self::Value, predicate: P) -> ExchangeResult<Self::Value>
    where
        P: FnMut(&Self::Value, &Self::Value) -> bool;

    /// Retries installing `map(comparand)` until the current value equals
    /// `comparand`.
    ///
    /// # Returns
    ///
    /// The replaced and the installed value.
    fn spin_wait_for_exchange_with<F>(&self, map: F, comparand: Self::Value) -> ExchangeResult<Self::Value>
    where
        F: FnOnce(&Self::Value) -> Self::Value,
        Self::Value: PartialEq;

    /// Retries installing `map(current)` until
    /// `predicate(current, map(current))` holds.
    ///
    /// # Returns
    ///
    /// The replaced and the installed value.
    fn spin_wait_for_exchange_with_if<F, P>(&self, map: F, predicate: P) -> ExchangeResult<Self::Value>
    where
        F: FnMut(&Self::Value) -> Self::Value,
        P: FnMut(&Self::Value, &Self::Value) -> bool;

    /// Context form of [`exchange_with`](Atomic::exchange_with).
    #[inline]
    fn exchange_with_context<C, F>(&self, context: C, mut map: F) -> ExchangeResult<Self::Value>
    where
        F: FnMut(&Self::Value, &C) -> Self::Value,
    {
        self.exchange_with(|current| map(current, &context))
    }

    /// Context form of [`try_exchange_if`](Atomic::try_exchange_if).
    #[inline]
    fn try_exchange_if_context<C, P>(
        &self,
        new: Self::Value,
        context: C,
        mut predicate: P,
    ) -> TryExchangeResult<Self::Value>
    where
        P: FnMut(&Self::Value, &Self::Value, &C) -> bool,
    {
        self.try_exchange_if(new, |current, new| predicate(current, new, &context))
    }

    /// Context form of [`try_exchange_with`](Atomic::try_exchange_with).
    #[inline]
    fn try_exchange_with_context<C, F>(
        &self,
        context: C,
        map: F,
        comparand: Self::Value,
    ) -> TryExchangeResult<Self::Value>
    where
        F: FnOnce(&Self::Value, &C) -> Self::Value,
        Self::Value: PartialEq,
    {
        self.try_exchange_with(|current| map(current, &context), comparand)
    }

    /// Context form of [`try_exchange_with_if`](Atomic::try_exchange_with_if).
    #[inline]
    fn try_exchange_with_if_context<C, F, P>(
        &self,
        context: C,
        mut map: F,
        mut predicate: P,
    ) -> TryExchangeResult<Self::Value>
    where
        F: FnMut(&Self::Value, &C) -> Self::Value,
        P: FnMut(&Self::Value, &Self::Value, &C) -> bool,
    {
        self.try_exchange_with_if(
            |current| map(current, &context),
            |current, new| predicate(current, new, &context),
        )
    }

    /// Context form of [`spin_wait_until`](Atomic::spin_wait_until).
    #[inline]
    fn spin_wait_until_context<C, P>(&self, context: C, mut predicate: P) -> Self::Value
    where
        P: FnMut(&Self::Value, &C) -> bool,
    {
        self.spin_wait_until(|current| predicate(current, &context))
    }

    /// Context form of
    /// [`spin_wait_for_exchange_if`](Atomic::spin_wait_for_exchange_if).
    #[inline]
    fn spin_wait_for_exchange_if_context<C, P>(
        &self,
        new: Self::Value,
        context: C,
        mut predicate: P,
    ) -> ExchangeResult<Self::Value>
    where
        P: FnMut(&Self::Value, &Self::Value, &C) -> bool,
    {
        self.spin_wait_for_exchange_if(new, |current, new| predicate(current, new, &context))
    }

    /// Context form of
    /// [`spin_wait_for_exchange_with`](Atomic::spin_wait_for_exchange_with).
    #[inline]
    fn spin_wait_for_exchange_with_context<C, F>(
        &self,
        context: C,
        map: F,
        comparand: Self::Value,
    ) -> ExchangeResult<Self::Value>
    where
        F: FnOnce(&Self::Value, &C) -> Self::Value,
        Self::Value: PartialEq,
    {
        self.spin_wait_for_exchange_with(|current| map(current, &context), comparand)
    }

    /// Context form of
    /// [`spin_wait_for_exchange_with_if`](Atomic::spin_wait_for_exchange_with_if).
    #[inline]
    fn spin_wait_for_exchange_with_if_context<C, F, P>(
        &self,
        context: C,
        mut map: F,
        mut predicate: P,
    ) -> ExchangeResult<Self::Value>
    where
        F: FnMut(&Self::Value, &C) -> Self::Value,
        P: FnMut(&Self::Value, &Self::Value, &C) -> bool,
    {
        self.spin_wait_for_exchange_with_if(
            |current| map(current, &context),
            |current, new| predicate(current, new, &context),
        )
    }
}
