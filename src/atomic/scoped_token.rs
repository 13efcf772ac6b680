/*******************************************************************************
 *
 *    Copyright (c) 2025.
 *    3-Prism Co. Ltd.
 *
 *    All rights reserved.
 *
 ******************************************************************************/

//! # Scoped Access Tokens
//!
//! RAII capabilities granting direct, in-place access to the value of an
//! [`AtomicCell`] while holding its lock.
//!
//! [`AtomicCell`]: crate::atomic::AtomicCell
//!
//! # Author
//!
//! Haixing Hu

use std::fmt;
use std::ops::{
    Deref,
    DerefMut,
};

use crate::atomic::atomic_cell::AtomicCell;

/// Read-only access to the value of an [`AtomicCell`].
///
/// Holds the cell's lock as a reader from creation until drop. Any number
/// of shared tokens may coexist, while an [`ExclusiveToken`] or any write
/// operation on the cell waits for all of them to be dropped.
///
/// While the token is alive, the owning thread must not call any write
/// operation on the same cell (nor wait for an exclusive token on it):
/// the lock is not reentrant and the call would spin forever.
///
/// # Example
///
/// ```rust
/// use prism3_atomic_cell::AtomicCell;
///
/// let cell = AtomicCell::new([7_u64; 8]);
/// let token = cell.read();
/// assert_eq!(token.iter().sum::<u64>(), 56);
/// ```
///
/// # Author
///
/// Haixing Hu
#[must_use = "the lock is released as soon as the token is dropped"]
pub struct SharedToken<'a, T> {
    cell: &'a AtomicCell<T>,
}

impl<'a, T> SharedToken<'a, T> {
    pub(crate) fn acquire(cell: &'a AtomicCell<T>) -> Self {
        cell.lock.lock_shared();
        Self { cell }
    }

    pub(crate) fn try_acquire(cell: &'a AtomicCell<T>) -> Option<Self> {
        cell.lock.try_lock_shared().then(|| Self { cell })
    }
}

impl<T> Deref for SharedToken<'_, T> {
    type Target = T;

    #[inline]
    fn deref(&self) -> &T {
        // SAFETY: the reader admission held by this token keeps every
        // writer out until `drop`.
        unsafe { &*self.cell.value.get() }
    }
}

impl<T> Drop for SharedToken<'_, T> {
    #[inline]
    fn drop(&mut self) {
        // SAFETY: the admission was taken in `acquire`/`try_acquire` and
        // `drop` runs exactly once.
        unsafe { self.cell.lock.unlock_shared() }
    }
}

impl<T: fmt::Debug> fmt::Debug for SharedToken<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&**self, f)
    }
}

/// Mutable access to the value of an [`AtomicCell`].
///
/// Holds the cell's lock as the single writer from creation until drop,
/// excluding every other token and every operation on the cell. Changes
/// made through the token become visible to the next reader admitted after
/// the drop.
///
/// The owning thread must not touch the same cell in any other way while
/// the token is alive; doing so spins forever.
///
/// # Example
///
/// ```rust
/// use prism3_atomic_cell::AtomicCell;
///
/// let cell = AtomicCell::new((0_u64, 0_u64));
/// {
///     let mut token = cell.write();
///     token.0 += 1;
///     token.1 += 1;
/// }
/// assert_eq!(cell.get(), (1, 1));
/// ```
///
/// # Author
///
/// Haixing Hu
#[must_use = "the lock is released as soon as the token is dropped"]
pub struct ExclusiveToken<'a, T> {
    cell: &'a AtomicCell<T>,
}

impl<'a, T> ExclusiveToken<'a, T> {
    pub(crate) fn acquire(cell: &'a AtomicCell<T>) -> Self {
        cell.lock.lock_exclusive();
        Self { cell }
    }

    pub(crate) fn try_acquire(cell: &'a AtomicCell<T>) -> Option<Self> {
        cell.lock.try_lock_exclusive().then(|| Self { cell })
    }
}

impl<T> Deref for ExclusiveToken<'_, T> {
    type Target = T;

    #[inline]
    fn deref(&self) -> &T {
        // SAFETY: the writer admission held by this token excludes every
        // other access until `drop`.
        unsafe { &*self.cell.value.get() }
    }
}

impl<T> DerefMut for ExclusiveToken<'_, T> {
    #[inline]
    fn deref_mut(&mut self) -> &mut T {
        // SAFETY: as for `deref`; `&mut self` prevents aliasing through
        // this token.
        unsafe { &mut *self.cell.value.get() }
    }
}

impl<T> Drop for ExclusiveToken<'_, T> {
    #[inline]
    fn drop(&mut self) {
        // SAFETY: the admission was taken in `acquire`/`try_acquire` and
        // `drop` runs exactly once.
        unsafe { self.cell.lock.unlock_exclusive() }
    }
}

impl<T: fmt::Debug> fmt::Debug for ExclusiveToken<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&**self, f)
    }
}
