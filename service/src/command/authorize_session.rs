//! [`Command`] for authorizing a [`Session`].

use derive_more::{Display, Error, From};
use jsonwebtoken::{DecodingKey, Validation};
use tracerr::Traced;

use crate::{
    domain::user::{session::Token, Session},
    Service,
};
#[cfg(doc)]
use crate::domain::User;

use super::Command;

/// [`Command`] for authorizing a [`Session`] out of its bearer [`Token`].
#[derive(Clone, Debug, From)]
pub struct AuthorizeSession {
    /// [`Session`] token to authorize.
    pub token: Token,
}

impl<B> Command<AuthorizeSession> for Service<B> {
    type Ok = Session;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: AuthorizeSession,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let AuthorizeSession { token } = cmd;

        let mut validation = Validation::default();
        validation.validate_aud = false;
        let key = if let Some(key) = &self.config().jwt_decoding_key {
            key.clone()
        } else {
            validation.insecure_disable_signature_validation();
            DecodingKey::from_secret(&[])
        };

        Ok(jsonwebtoken::decode::<Session>(token.expose(), &key, &validation)
            .map_err(tracerr::from_and_wrap!(=> E))?
            .claims)
    }
}

/// Error of [`AuthorizeSession`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`jsonwebtoken`] decoding error, including the [`Session`] being
    /// expired.
    #[display("Failed to decode a JSON Web Token: {_0}")]
    JsonWebTokenDecodeError(jsonwebtoken::errors::Error),
}

impl ExecutionError {
    /// Indicates whether the [`Session`] is well-formed, but expired, so the
    /// [`User`] is only required to sign in again.
    #[must_use]
    pub fn is_expired(&self) -> bool {
        match self {
            Self::JsonWebTokenDecodeError(e) => matches!(
                e.kind(),
                jsonwebtoken::errors::ErrorKind::ExpiredSignature,
            ),
        }
    }
}
