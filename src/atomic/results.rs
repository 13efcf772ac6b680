/*******************************************************************************
 *
 *    Copyright (c) 2025.
 *    3-Prism Co. Ltd.
 *
 *    All rights reserved.
 *
 ******************************************************************************/

//! # Exchange Results
//!
//! Snapshot pairs returned by the update operations of every atomic
//! container in this crate.
//!
//! # Author
//!
//! Haixing Hu

/// The outcome of a successful update.
///
/// `previous` is the value that was replaced and `new` is the value that
/// was installed in its place. Both are taken at the linearization point of
/// the update, so the results of all updates on one container form a
/// hand-off chain: every `new` is the `previous` of exactly one later
/// update (or the final value).
///
/// # Author
///
/// Haixing Hu
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ExchangeResult<T> {
    /// The value replaced by the update.
    pub previous: T,
    /// The value installed by the update.
    pub new: T,
}

impl<T> ExchangeResult<T> {
    /// Creates a new result from the replaced and the installed value.
    #[inline]
    pub const fn new(previous: T, new: T) -> Self {
        Self { previous, new }
    }

    /// Converts the result into a `(previous, new)` tuple.
    #[inline]
    pub fn into_tuple(self) -> (T, T) {
        (self.previous, self.new)
    }
}

impl<T> From<ExchangeResult<T>> for (T, T) {
    #[inline]
    fn from(result: ExchangeResult<T>) -> Self {
        result.into_tuple()
    }
}

/// The outcome of a conditional update.
///
/// On success `was_set` is `true`, `previous` is the replaced value and
/// `current` is the installed value. On rejection `was_set` is `false` and
/// both `previous` and `current` hold the value observed when the
/// comparand or predicate refused the update; the container was left
/// untouched.
///
/// # Author
///
/// Haixing Hu
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TryExchangeResult<T> {
    /// Whether the new value was installed.
    pub was_set: bool,
    /// The value observed when the decision was taken.
    pub previous: T,
    /// The installed value on success, the observed value on rejection.
    pub current: T,
}

impl<T> TryExchangeResult<T> {
    /// Creates the result of an accepted update.
    #[inline]
    pub const fn set(previous: T, current: T) -> Self {
        Self {
            was_set: true,
            previous,
            current,
        }
    }

    /// Converts the result into `Ok(ExchangeResult)` on success, or
    /// `Err(observed)` carrying the value that caused the rejection.
    #[inline]
    pub fn into_result(self) -> Result<ExchangeResult<T>, T> {
        if self.was_set {
            Ok(ExchangeResult::new(self.previous, self.current))
        } else {
            Err(self.previous)
        }
    }
}

impl<T: Clone> TryExchangeResult<T> {
    /// Creates the result of a rejected update that observed `observed`.
    #[inline]
    pub fn rejected(observed: T) -> Self {
        Self {
            was_set: false,
            current: observed.clone(),
            previous: observed,
        }
    }
}

impl<T> From<ExchangeResult<T>> for TryExchangeResult<T> {
    #[inline]
    fn from(result: ExchangeResult<T>) -> Self {
        Self::set(result.previous, result.new)
    }
}
