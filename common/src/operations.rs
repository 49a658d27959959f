//! Abstract operations dispatched through a [`Handler`].

use std::marker::PhantomData;

#[cfg(doc)]
use crate::Handler;

/// Operation creating a value.
#[derive(Clone, Copy, Debug)]
pub struct Insert<T>(pub T);

/// Operation changing an existing value.
#[derive(Clone, Copy, Debug)]
pub struct Update<T>(pub T);

/// Operation removing a value.
#[derive(Clone, Copy, Debug)]
pub struct Delete<T>(pub T);

/// Operation reading a value.
#[derive(Clone, Copy, Debug)]
pub struct Select<T>(pub T);

/// Selector of `W` by `B`.
///
/// `W` only tells a [`Handler`] what is expected back, so the same `B` may
/// select different things.
#[derive(Clone, Copy, Debug)]
pub struct By<W, B> {
    /// Type of the selected value.
    _what: PhantomData<W>,

    /// Value to select by.
    by: B,
}

impl<W, B> By<W, B> {
    /// Creates a new [`By`] selecting by the provided value.
    #[must_use]
    pub fn new(by: B) -> Self {
        Self {
            _what: PhantomData,
            by,
        }
    }

    /// Returns the value this [`By`] selects by.
    #[must_use]
    pub fn inner(&self) -> &B {
        &self.by
    }

    /// Consumes this [`By`] and returns the value it selects by.
    #[must_use]
    pub fn into_inner(self) -> B {
        self.by
    }
}
