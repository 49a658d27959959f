//! [`Backend`]-related implementations.

#[cfg(feature = "http")]
pub mod http;
pub mod memory;

use derive_more::{Display, Error as StdError, From};

#[cfg(feature = "http")]
pub use self::http::Http;
pub use self::memory::Memory;

/// Backend operation.
pub use common::Handler as Backend;

/// [`Backend`] error.
#[derive(Debug, Display, From, StdError)]
pub enum Error {
    #[cfg(feature = "http")]
    /// [`Http`] error.
    #[display("HTTP error: {_0}")]
    Http(http::Error),

    /// Operation is refused by the [`Backend`].
    #[display("Rejected by backend: {_0}")]
    Rejected(Rejection),
}

impl Error {
    /// Returns the [`Rejection`] of this [`Error`], if it's the one.
    #[must_use]
    pub fn rejection(&self) -> Option<&Rejection> {
        match self {
            Self::Rejected(r) => Some(r),
            #[cfg(feature = "http")]
            Self::Http(_) => None,
        }
    }

    /// Indicates whether the operation lost a race for shared state.
    #[must_use]
    pub fn is_conflict(&self) -> bool {
        matches!(self.rejection(), Some(Rejection::Conflict(_)))
    }

    /// Indicates whether the operation targets something not existing.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self.rejection(), Some(Rejection::NotFound))
    }

    /// Indicates whether the operation is refused for the current
    /// credentials.
    #[must_use]
    pub fn is_unauthorized(&self) -> bool {
        matches!(self.rejection(), Some(Rejection::Unauthorized))
    }

    /// Indicates whether the [`Backend`] hasn't been reached at all.
    #[must_use]
    pub fn is_network(&self) -> bool {
        match self {
            #[cfg(feature = "http")]
            Self::Http(e) => e.is_network(),
            Self::Rejected(_) => false,
        }
    }
}

/// Reason of a [`Backend`] refusing an operation.
#[derive(Clone, Debug, Display, Eq, PartialEq, StdError)]
pub enum Rejection {
    /// Input is not acceptable.
    #[display("invalid input: {_0}")]
    Invalid(#[error(not(source))] String),

    /// Current credentials are missing or insufficient.
    #[display("unauthorized")]
    Unauthorized,

    /// Operation target doesn't exist.
    #[display("not found")]
    NotFound,

    /// Operation conflicts with the current state.
    #[display("conflict: {_0}")]
    Conflict(#[error(not(source))] String),

    /// Response status not expected for the operation.
    #[display("unexpected status `{_0}`")]
    Unexpected(#[error(not(source))] u16),
}
