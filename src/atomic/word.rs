/*******************************************************************************
 *
 *    Copyright (c) 2025.
 *    3-Prism Co. Ltd.
 *
 *    All rights reserved.
 *
 ******************************************************************************/

//! # Word Values
//!
//! Describes the values that fit the hardware compare-and-swap width and
//! maps each of them onto its `std::sync::atomic` storage.
//!
//! # Author
//!
//! Haixing Hu

use std::sync::atomic::{
    AtomicBool,
    AtomicI16,
    AtomicI32,
    AtomicI8,
    AtomicIsize,
    AtomicPtr,
    AtomicU16,
    AtomicU32,
    AtomicU8,
    AtomicUsize,
    Ordering,
};
#[cfg(target_has_atomic = "64")]
use std::sync::atomic::{
    AtomicI64,
    AtomicU64,
};

/// A value that the hardware can compare-and-swap in one instruction.
///
/// Comparand matching in [`AtomicWord`] is performed by the CAS itself,
/// that is bitwise on the storage. The `Eq` bound, together with the fact
/// that this trait is only implemented for types whose bit pattern is
/// canonical (`bool`, integers and thin raw pointers), keeps the bitwise
/// comparison identical to `==`.
///
/// [`AtomicWord`]: crate::atomic::AtomicWord
///
/// # Author
///
/// Haixing Hu
pub trait Word: Copy + Eq {
    /// The `std::sync::atomic` type holding the value.
    type Storage;

    /// Creates the storage holding `value`.
    fn new_storage(value: Self) -> Self::Storage;

    /// Loads the value with the given ordering.
    fn load(storage: &Self::Storage, order: Ordering) -> Self;

    /// Stores the value with the given ordering.
    fn store(storage: &Self::Storage, value: Self, order: Ordering);

    /// Swaps the value with the given ordering, returning the old value.
    fn swap(storage: &Self::Storage, value: Self, order: Ordering) -> Self;

    /// Strong compare-and-swap; `Ok(previous)` on success, `Err(actual)`
    /// otherwise.
    fn compare_exchange(
        storage: &Self::Storage,
        current: Self,
        new: Self,
        success: Ordering,
        failure: Ordering,
    ) -> Result<Self, Self>;

    /// Weak compare-and-swap, which may fail spuriously.
    fn compare_exchange_weak(
        storage: &Self::Storage,
        current: Self,
        new: Self,
        success: Ordering,
        failure: Ordering,
    ) -> Result<Self, Self>;

    /// Returns a mutable reference to the value of an unshared storage.
    fn get_mut(storage: &mut Self::Storage) -> &mut Self;

    /// Consumes the storage, returning the value.
    fn into_inner(storage: Self::Storage) -> Self;
}

/// A word value supporting wrapping integer arithmetic.
///
/// # Author
///
/// Haixing Hu
pub trait WordInteger: Word {
    /// The value `1`.
    const ONE: Self;

    /// Wrapping (modular) addition.
    fn wrapping_add(self, rhs: Self) -> Self;

    /// Wrapping (modular) subtraction.
    fn wrapping_sub(self, rhs: Self) -> Self;
}

/// Macro to implement [`Word`] for a value type and its std atomic
/// storage.
///
/// # Parameters
///
/// * `$value_type` - The value type (e.g., `i32`)
/// * `$storage_type` - The std atomic type (e.g., `AtomicI32`)
macro_rules! impl_word {
    ($value_type:ty, $storage_type:ty) => {
        impl Word for $value_type {
            type Storage = $storage_type;

            #[inline]
            fn new_storage(value: $value_type) -> $storage_type {
                <$storage_type>::new(value)
            }

            #[inline]
            fn load(storage: &$storage_type, order: Ordering) -> $value_type {
                storage.load(order)
            }

            #[inline]
            fn store(storage: &$storage_type, value: $value_type, order: Ordering) {
                storage.store(value, order);
            }

            #[inline]
            fn swap(storage: &$storage_type, value: $value_type, order: Ordering) -> $value_type {
                storage.swap(value, order)
            }

            #[inline]
            fn compare_exchange(
                storage: &$storage_type,
                current: $value_type,
                new: $value_type,
                success: Ordering,
                failure: Ordering,
            ) -> Result<$value_type, $value_type> {
                storage.compare_exchange(current, new, success, failure)
            }

            #[inline]
            fn compare_exchange_weak(
                storage: &$storage_type,
                current: $value_type,
                new: $value_type,
                success: Ordering,
                failure: Ordering,
            ) -> Result<$value_type, $value_type> {
                storage.compare_exchange_weak(current, new, success, failure)
            }

            #[inline]
            fn get_mut(storage: &mut $storage_type) -> &mut $value_type {
                storage.get_mut()
            }

            #[inline]
            fn into_inner(storage: $storage_type) -> $value_type {
                storage.into_inner()
            }
        }
    };
}

/// Macro to implement [`Word`] and [`WordInteger`] for integer types.
macro_rules! impl_word_integer {
    ($($value_type:ty => $storage_type:ty),* $(,)?) => {
        $(
            impl_word!($value_type, $storage_type);

            impl WordInteger for $value_type {
                const ONE: $value_type = 1;

                #[inline]
                fn wrapping_add(self, rhs: $value_type) -> $value_type {
                    <$value_type>::wrapping_add(self, rhs)
                }

                #[inline]
                fn wrapping_sub(self, rhs: $value_type) -> $value_type {
                    <$value_type>::wrapping_sub(self, rhs)
                }
            }
        )*
    };
}

impl_word!(bool, AtomicBool);

impl_word_integer!(
    i8 => AtomicI8,
    u8 => AtomicU8,
    i16 => AtomicI16,
    u16 => AtomicU16,
    i32 => AtomicI32,
    u32 => AtomicU32,
    isize => AtomicIsize,
    usize => AtomicUsize,
);

#[cfg(target_has_atomic = "64")]
impl_word_integer!(
    i64 => AtomicI64,
    u64 => AtomicU64,
);

impl<P> Word for *mut P {
    type Storage = AtomicPtr<P>;

    #[inline]
    fn new_storage(value: *mut P) -> AtomicPtr<P> {
        AtomicPtr::new(value)
    }

    #[inline]
    fn load(storage: &AtomicPtr<P>, order: Ordering) -> *mut P {
        storage.load(order)
    }

    #[inline]
    fn store(storage: &AtomicPtr<P>, value: *mut P, order: Ordering) {
        storage.store(value, order);
    }

    #[inline]
    fn swap(storage: &AtomicPtr<P>, value: *mut P, order: Ordering) -> *mut P {
        storage.swap(value, order)
    }

    #[inline]
    fn compare_exchange(
        storage: &AtomicPtr<P>,
        current: *mut P,
        new: *mut P,
        success: Ordering,
        failure: Ordering,
    ) -> Result<*mut P, *mut P> {
        storage.compare_exchange(current, new, success, failure)
    }

    #[inline]
    fn compare_exchange_weak(
        storage: &AtomicPtr<P>,
        current: *mut P,
        new: *mut P,
        success: Ordering,
        failure: Ordering,
    ) -> Result<*mut P, *mut P> {
        storage.compare_exchange_weak(current, new, success, failure)
    }

    #[inline]
    fn get_mut(storage: &mut AtomicPtr<P>) -> &mut *mut P {
        storage.get_mut()
    }

    #[inline]
    fn into_inner(storage: AtomicPtr<P>) -> *mut P {
        storage.into_inner()
    }
}
