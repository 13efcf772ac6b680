/*******************************************************************************
 *
 *    Copyright (c) 2025.
 *    3-Prism Co. Ltd.
 *
 *    All rights reserved.
 *
 ******************************************************************************/

//! # Atomic Pointer
//!
//! Adapts the word engine to typed raw pointers and adds pointer
//! arithmetic.
//!
//! # Author
//!
//! Haixing Hu

use std::fmt;
use std::ops::Deref;
use std::ptr;

use crate::atomic::atomic_word::AtomicWord;
use crate::atomic::results::{
    ExchangeResult,
    TryExchangeResult,
};

/// Atomic raw pointer to values of type `P`.
///
/// Dereferences to [`AtomicWord<*mut P>`](AtomicWord), so the whole
/// exchange, try-exchange and spin-wait surface is available directly.
/// On top of it, this type provides element-scaled pointer arithmetic as
/// CAS based exchanges and an integer view of the stored address, for
/// callers that track addresses rather than typed pointers.
///
/// The pointer is never dereferenced by this type. Arithmetic uses
/// wrapping semantics, so results may point outside the original
/// allocation; validity is the caller's concern when dereferencing.
///
/// # Example
///
/// ```rust
/// use prism3_atomic_cell::AtomicPtr;
///
/// let mut slots = [0_u32; 4];
/// let cursor = AtomicPtr::new(slots.as_mut_ptr());
/// let claimed = cursor.increment().previous;
/// assert_eq!(claimed, slots.as_mut_ptr());
/// assert_eq!(cursor.get(), slots.as_mut_ptr().wrapping_add(1));
/// ```
///
/// # Author
///
/// Haixing Hu
#[repr(transparent)]
pub struct AtomicPtr<P> {
    inner: AtomicWord<*mut P>,
}

impl<P> AtomicPtr<P> {
    /// Creates a new atomic pointer.
    #[inline]
    pub fn new(ptr: *mut P) -> Self {
        Self {
            inner: AtomicWord::new(ptr),
        }
    }

    /// Creates a new atomic pointer holding null.
    #[inline]
    pub fn null() -> Self {
        Self::new(ptr::null_mut())
    }

    /// Moves the pointer forward by one element.
    ///
    /// # Returns
    ///
    /// The pointer before and after the move.
    #[inline]
    pub fn increment(&self) -> ExchangeResult<*mut P> {
        self.add(1)
    }

    /// Moves the pointer back by one element.
    ///
    /// # Returns
    ///
    /// The pointer before and after the move.
    #[inline]
    pub fn decrement(&self) -> ExchangeResult<*mut P> {
        self.subtract(1)
    }

    /// Moves the pointer forward by `count` elements.
    ///
    /// The distance in bytes is `count * size_of::<P>()`. The move is a
    /// CAS loop, so concurrent moves are never lost.
    ///
    /// # Memory Ordering
    ///
    /// `AcqRel` on success and `Acquire` on a lost race, as every exchange
    /// of [`AtomicWord`].
    ///
    /// # Parameters
    ///
    /// * `count` - Number of elements to move by.
    ///
    /// # Returns
    ///
    /// The pointer before and after the move.
    ///
    /// # Example
    ///
    /// ```rust
    /// use prism3_atomic_cell::AtomicPtr;
    ///
    /// let mut buffer = [0_u64; 8];
    /// let cursor = AtomicPtr::new(buffer.as_mut_ptr());
    /// let result = cursor.add(3);
    /// assert_eq!(result.new as usize - result.previous as usize, 24);
    /// ```
    #[inline]
    pub fn add(&self, count: usize) -> ExchangeResult<*mut P> {
        self.inner.exchange_with(|current| current.wrapping_add(count))
    }

    /// Moves the pointer back by `count` elements.
    ///
    /// # Parameters
    ///
    /// * `count` - Number of elements to move by.
    ///
    /// # Returns
    ///
    /// The pointer before and after the move.
    #[inline]
    pub fn subtract(&self, count: usize) -> ExchangeResult<*mut P> {
        self.inner.exchange_with(|current| current.wrapping_sub(count))
    }

    /// Moves the pointer by a signed number of elements.
    ///
    /// # Parameters
    ///
    /// * `count` - Number of elements to move by; negative values move
    ///   the pointer back.
    ///
    /// # Returns
    ///
    /// The pointer before and after the move.
    ///
    /// # Example
    ///
    /// ```rust
    /// use prism3_atomic_cell::AtomicPtr;
    ///
    /// let mut buffer = [0_u16; 8];
    /// let cursor = AtomicPtr::new(buffer.as_mut_ptr().wrapping_add(4));
    /// cursor.offset(-3);
    /// assert_eq!(cursor.get(), buffer.as_mut_ptr().wrapping_add(1));
    /// ```
    #[inline]
    pub fn offset(&self, count: isize) -> ExchangeResult<*mut P> {
        self.inner.exchange_with(|current| current.wrapping_offset(count))
    }

    /// Gets the stored address as an integer, with `Acquire` ordering.
    #[inline]
    pub fn get_addr(&self) -> usize {
        self.inner.get() as usize
    }

    /// Stores an address given as an integer, with `Release` ordering.
    #[inline]
    pub fn set_addr(&self, addr: usize) {
        self.inner.set(addr as *mut P);
    }

    /// Swaps in an address given as an integer, returning the previous
    /// address.
    #[inline]
    pub fn swap_addr(&self, addr: usize) -> usize {
        self.inner.swap(addr as *mut P) as usize
    }

    /// Installs the address `new` if the stored address equals
    /// `comparand`.
    ///
    /// Integer view of [`AtomicWord::try_exchange`]: a single strong CAS
    /// decides the outcome.
    ///
    /// # Parameters
    ///
    /// * `new` - The address to install.
    /// * `comparand` - The address the pointer must hold.
    ///
    /// # Returns
    ///
    /// Whether the address was set, together with the observed address
    /// and the current one.
    ///
    /// # Example
    ///
    /// ```rust
    /// use prism3_atomic_cell::AtomicPtr;
    ///
    /// let ptr = AtomicPtr::<u8>::null();
    /// assert!(!ptr.try_exchange_addr(0x40, 0x10).was_set);
    /// assert!(ptr.try_exchange_addr(0x40, 0).was_set);
    /// assert_eq!(ptr.get_addr(), 0x40);
    /// ```
    #[inline]
    pub fn try_exchange_addr(&self, new: usize, comparand: usize) -> TryExchangeResult<usize> {
        let result = self.inner.try_exchange(new as *mut P, comparand as *mut P);
        TryExchangeResult {
            was_set: result.was_set,
            previous: result.previous as usize,
            current: result.current as usize,
        }
    }

    /// Replaces the stored address with `map(address)` in a CAS loop.
    ///
    /// Integer view of [`AtomicWord::exchange_with`]; `map` may run more
    /// than once under contention.
    ///
    /// # Parameters
    ///
    /// * `map` - Computes the new address from the current one.
    ///
    /// # Returns
    ///
    /// The replaced and the installed address.
    #[inline]
    pub fn exchange_addr_with<F>(&self, mut map: F) -> ExchangeResult<usize>
    where
        F: FnMut(usize) -> usize,
    {
        let result = self
            .inner
            .exchange_with(|current| map(*current as usize) as *mut P);
        ExchangeResult::new(result.previous as usize, result.new as usize)
    }

    /// Busy-waits until the stored address equals `target`.
    ///
    /// # Returns
    ///
    /// The matching address.
    #[inline]
    pub fn spin_wait_for_addr(&self, target: usize) -> usize {
        self.inner.spin_wait_for_value(target as *mut P) as usize
    }

    /// Retries installing the address `new` until the stored address
    /// equals `comparand`.
    ///
    /// # Returns
    ///
    /// The replaced and the installed address.
    #[inline]
    pub fn spin_wait_for_exchange_addr(&self, new: usize, comparand: usize) -> ExchangeResult<usize> {
        let result = self
            .inner
            .spin_wait_for_exchange(new as *mut P, comparand as *mut P);
        ExchangeResult::new(result.previous as usize, result.new as usize)
    }

    /// Returns the underlying word engine, for code generic over
    /// [`Atomic`](crate::atomic::Atomic).
    #[inline]
    pub fn as_word(&self) -> &AtomicWord<*mut P> {
        &self.inner
    }

    /// Returns a mutable reference to the pointer.
    #[inline]
    pub fn get_mut(&mut self) -> &mut *mut P {
        self.inner.get_mut()
    }

    /// Consumes the atomic pointer, returning the pointer.
    #[inline]
    pub fn into_inner(self) -> *mut P {
        self.inner.into_inner()
    }
}

impl<P> Deref for AtomicPtr<P> {
    type Target = AtomicWord<*mut P>;

    #[inline]
    fn deref(&self) -> &AtomicWord<*mut P> {
        &self.inner
    }
}

impl<P> Default for AtomicPtr<P> {
    #[inline]
    fn default() -> Self {
        Self::null()
    }
}

impl<P> From<*mut P> for AtomicPtr<P> {
    #[inline]
    fn from(ptr: *mut P) -> Self {
        Self::new(ptr)
    }
}

impl<P> fmt::Debug for AtomicPtr<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AtomicPtr")
            .field("value", &self.inner.get())
            .finish()
    }
}

impl<P> fmt::Pointer for AtomicPtr<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Pointer::fmt(&self.inner.get(), f)
    }
}
