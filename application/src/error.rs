//! [`Error`]-related definitions.

use std::fmt;

use derive_more::{Display, Error as StdError};
use service::infra::backend::{self, Rejection};
use tracerr::{Trace, Traced};

/// Defines a new error type.
#[expect(clippy::module_name_repetitions, reason = "more readable")]
#[macro_export]
macro_rules! define_error {
    (
        enum $name:ident {
            $(
                #[code = $code:literal]
                #[kind = $kind:ident]
                #[message = $message:literal]
                $variant:ident
            ),* $(,)?
        }
    ) => {
        /// Error type.
        #[derive(
            Clone,
            Copy,
            Debug,
            ::derive_more::Display,
            ::derive_more::Error
        )]
        pub enum $name {
            $(
                #[display($message)]
                #[doc = $message]
                $variant,
            )*
        }

        impl From<$name> for $crate::Error {
            fn from(err: $name) -> Self {
                match err {
                    $(
                        $name::$variant => Self {
                            code: $code,
                            kind: $crate::error::Kind::$kind,
                            message: $message.to_owned(),
                            backtrace: None,
                        },
                    )*
                }
            }
        }
    };
}

/// User-visible [`Error`].
#[derive(Clone, Debug, StdError)]
pub struct Error {
    /// [`Error`] code.
    pub code: Code,

    /// [`Kind`] of this [`Error`].
    pub kind: Kind,

    /// Backtrace of this [`Error`].
    #[error(not(backtrace))]
    pub backtrace: Option<Trace>,

    /// [`Error`] message.
    pub message: String,
}

impl Error {
    /// Create a new [`Error`] representing an internal failure.
    #[must_use]
    pub fn internal(msg: &impl ToString) -> Self {
        Self {
            code: "INTERNAL_ERROR",
            kind: Kind::Internal,
            message: msg.to_string(),
            backtrace: None,
        }
    }

    /// Appends the provided `details` to the message of this [`Error`].
    #[must_use]
    pub fn with_details(mut self, details: impl fmt::Display) -> Self {
        self.message = format!("{}: {details}", self.message);
        self
    }

    /// Returns the recovery hint for this [`Error`].
    #[must_use]
    pub fn hint(&self) -> &'static str {
        self.kind.hint()
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Self {
            code,
            kind: _,
            backtrace: _,
            message,
        } = self;

        write!(f, "[{code}]: {message}")
    }
}

/// [`Error`] code.
pub type Code = &'static str;

/// Kind of an [`Error`], telling what the user may do about it.
#[derive(Clone, Copy, Debug, Display, Eq, Hash, PartialEq)]
pub enum Kind {
    /// Provided input is not acceptable.
    Validation,

    /// Operation lost a race for the shared state.
    Conflict,

    /// Operation target doesn't exist.
    NotFound,

    /// Current session is missing or not permitted.
    Authorization,

    /// Backend is unreachable.
    Network,

    /// Anything not meant to happen.
    Internal,
}

impl Kind {
    /// Returns the recovery hint for this [`Kind`].
    #[must_use]
    pub const fn hint(self) -> &'static str {
        match self {
            Self::Validation => "check the provided input and try again",
            Self::Conflict => "refresh the data and pick another option",
            Self::NotFound => "refresh the data, it may have been removed",
            Self::Authorization => {
                "sign in again or ask an administrator for access"
            }
            Self::Network => "check the connection to the backend and retry",
            Self::Internal => "report the problem to the administrators",
        }
    }
}

/// Helper trait for converting types into [`Error`]s.
pub trait AsError {
    /// Tries to convert the type into an [`Error`].
    ///
    /// [`None`] is returned if the type cannot be converted into an [`Error`].
    fn try_as_error(&self) -> Option<Error>;

    /// Converts the type into an [`Error`].
    fn as_error(&self) -> Error
    where
        Self: fmt::Display,
    {
        self.try_as_error()
            .unwrap_or_else(|| Error::internal(&self))
    }

    /// Converts the type into an [`Error`] by consuming it.
    fn into_error(self) -> Error
    where
        Self: fmt::Display + Sized,
    {
        self.as_error()
    }
}

impl<E: AsError> AsError for Traced<E> {
    fn try_as_error(&self) -> Option<Error> {
        let mut error = self.as_ref().try_as_error()?;
        error.backtrace = Some(self.trace().clone());
        Some(error)
    }
}

impl AsError for backend::Error {
    fn try_as_error(&self) -> Option<Error> {
        define_error! {
            enum Error {
                #[code = "INVALID_INPUT"]
                #[kind = Validation]
                #[message = "Backend rejected the provided input"]
                Invalid,

                #[code = "UNAUTHORIZED"]
                #[kind = Authorization]
                #[message = "Backend refused the current `Session`"]
                Unauthorized,

                #[code = "NOT_FOUND"]
                #[kind = NotFound]
                #[message = "Requested entity does not exist"]
                NotFound,

                #[code = "CONFLICT"]
                #[kind = Conflict]
                #[message = "Operation conflicts with the current state"]
                Conflict,

                #[code = "BACKEND_UNREACHABLE"]
                #[kind = Network]
                #[message = "Backend is unreachable"]
                Unreachable,
            }
        }

        if self.is_network() {
            return Some(Error::Unreachable.into());
        }
        match self.rejection()? {
            Rejection::Invalid(details) => {
                Some(crate::Error::from(Error::Invalid).with_details(details))
            }
            Rejection::Unauthorized => Some(Error::Unauthorized.into()),
            Rejection::NotFound => Some(Error::NotFound.into()),
            Rejection::Conflict(details) => {
                Some(crate::Error::from(Error::Conflict).with_details(details))
            }
            Rejection::Unexpected(_) => None,
        }
    }
}
