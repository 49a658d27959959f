//! [`Session`] definitions.

use common::{unit, DateTimeOf};
#[cfg(doc)]
use common::DateTime;
use derive_more::Debug;
use secrecy::{ExposeSecret as _, SecretString};
use serde::{Deserialize, Serialize};

#[cfg(doc)]
use crate::domain::User;
use crate::domain::user::{self, Role};

/// Session of the current [`User`], as claimed by its [`Token`].
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Session {
    /// ID of the [`User`] this [`Session`] belongs to.
    #[serde(rename = "sub")]
    pub user_id: user::Id,

    /// [`Role`] of the [`User`] this [`Session`] belongs to.
    pub role: Role,

    /// [`DateTime`] when this [`Session`] expires.
    #[serde(rename = "exp", with = "common::datetime::serde::unix_timestamp")]
    pub expires_at: ExpirationDateTime,
}

/// Bearer access token of a [`Session`].
#[derive(Debug)]
#[debug("Token(..)")]
pub struct Token(SecretString);

impl Token {
    /// Wraps the provided raw `token`.
    ///
    /// Its contents are only checked when it's authorized.
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self(SecretString::from(token.into()))
    }

    /// Exposes the raw token.
    #[must_use]
    pub fn expose(&self) -> &str {
        self.0.expose_secret()
    }
}

impl Clone for Token {
    fn clone(&self) -> Self {
        Self::new(self.expose())
    }
}

impl From<SecretString> for Token {
    fn from(secret: SecretString) -> Self {
        Self(secret)
    }
}

/// [`DateTime`] of a [`Session`] expiration.
pub type ExpirationDateTime = DateTimeOf<(Session, unit::Expiration)>;
