//! [`Context`]-related definitions.

use std::collections::BTreeSet;

use service::{
    command::{self, Command as _},
    domain::{
        user::{
            capability::capabilities_for,
            session::{Session, Token},
            Capability,
        },
        User,
    },
    query,
};

use crate::{define_error, AsError, Error, Service};

/// Application context, built once per invocation and passed explicitly.
#[derive(Debug)]
pub struct Context {
    /// [`Service`] instance.
    service: Service,

    /// Current [`Session`], if any token is provided.
    session: Option<Session>,
}

impl Context {
    /// Creates a new [`Context`] authorizing the provided [`Token`] (if any).
    ///
    /// # Errors
    ///
    /// Errors if the provided [`Token`] is invalid or expired.
    pub async fn new(
        service: Service,
        token: Option<Token>,
    ) -> Result<Self, Error> {
        let session = match token {
            Some(token) => Some(
                service
                    .execute(command::AuthorizeSession { token })
                    .await
                    .map_err(AsError::into_error)?,
            ),
            None => None,
        };

        Ok(Self { service, session })
    }

    /// Returns [`Service`] instance of this [`Context`].
    #[must_use]
    pub fn service(&self) -> &Service {
        &self.service
    }

    /// Indicates whether this [`Context`] has an authorized [`Session`].
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.session.is_some()
    }

    /// Returns the current [`Session`] of this [`Context`].
    ///
    /// # Errors
    ///
    /// Errors if no [`Session`] is authorized.
    pub fn current_session(&self) -> Result<&Session, Error> {
        self.session
            .as_ref()
            .ok_or_else(|| AuthError::AuthorizationRequired.into())
    }

    /// Fetches the [`User`] of the current [`Session`].
    ///
    /// # Errors
    ///
    /// Errors if no [`Session`] is authorized, or the [`User`] doesn't exist.
    pub async fn current_user(&self) -> Result<User, Error> {
        let my_id = self.current_session()?.user_id;
        self.service
            .execute(query::user::ById::by(my_id))
            .await
            .map_err(AsError::into_error)?
            .ok_or_else(|| AuthError::UserNotExists.into())
    }

    /// Returns the [`Capability`]s offered to the current [`Session`].
    ///
    /// Nothing is offered without a [`Session`].
    #[must_use]
    pub fn capabilities(&self) -> BTreeSet<Capability> {
        self.session
            .map(|s| capabilities_for(s.role))
            .unwrap_or_default()
    }

    /// Ensures the current [`Session`] is offered the provided
    /// [`Capability`].
    ///
    /// # Errors
    ///
    /// Errors if no [`Session`] is authorized, or its role lacks the
    /// [`Capability`].
    pub fn authorize(&self, capability: Capability) -> Result<&Session, Error> {
        let session = self.current_session()?;
        if session.role.can(capability) {
            Ok(session)
        } else {
            Err(AuthError::Forbidden.into())
        }
    }
}

define_error! {
    enum AuthError {
        #[code = "AUTHORIZATION_REQUIRED"]
        #[kind = Authorization]
        #[message = "Authorization is required"]
        AuthorizationRequired,

        #[code = "FORBIDDEN"]
        #[kind = Authorization]
        #[message = "Current `User` is not permitted to do this"]
        Forbidden,

        #[code = "SESSION_EXPIRED"]
        #[kind = Authorization]
        #[message = "`Session` has expired"]
        SessionExpired,

        #[code = "INVALID_TOKEN"]
        #[kind = Authorization]
        #[message = "Provided `Token` is invalid"]
        InvalidToken,

        #[code = "USER_NOT_EXISTS"]
        #[kind = NotFound]
        #[message = "`User` of the current `Session` does not exist"]
        UserNotExists,
    }
}

impl AsError for command::authorize_session::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        Some(if self.is_expired() {
            AuthError::SessionExpired.into()
        } else {
            AuthError::InvalidToken.into()
        })
    }
}

#[cfg(test)]
mod spec {
    use std::time::Duration;

    use jsonwebtoken::{EncodingKey, Header};
    use service::{
        domain::user::{self, session::Token, Capability, Role, Session},
        infra::{http, Http},
        Config,
    };

    use super::Context;
    use crate::{error::Kind, Service};

    fn service(secret: Option<&[u8]>) -> Service {
        let backend = Http::new(http::Config {
            base_url: "http://127.0.0.1:9/api/".parse().unwrap(),
            timeout: None,
            token: None,
        })
        .unwrap();
        Service::new(
            Config {
                jwt_decoding_key: secret
                    .map(jsonwebtoken::DecodingKey::from_secret),
                ..Config::default()
            },
            backend,
        )
    }

    fn token(role: Role, ttl: Duration, expired: bool) -> (Session, Token) {
        let now = common::DateTime::now();
        let expires_at = if expired { now - ttl } else { now + ttl };
        let session = Session {
            user_id: user::Id::new(),
            role,
            expires_at: expires_at.coerce(),
        };
        let token = jsonwebtoken::encode(
            &Header::default(),
            &session,
            &EncodingKey::from_secret(b"secret"),
        )
        .unwrap();
        (session, Token::new(token))
    }

    #[tokio::test]
    async fn anonymous_is_offered_nothing() {
        let ctx = Context::new(service(None), None).await.unwrap();

        assert!(!ctx.is_authenticated());
        assert!(ctx.capabilities().is_empty());
        let err = ctx.authorize(Capability::ViewRooms).unwrap_err();
        assert_eq!(err.code, "AUTHORIZATION_REQUIRED");
    }

    #[tokio::test]
    async fn authorizes_by_role() {
        let (session, token) =
            token(Role::Student, Duration::from_secs(600), false);
        let service = service(Some(b"secret".as_slice()));
        let ctx = Context::new(service, Some(token)).await.unwrap();

        assert_eq!(ctx.current_session().unwrap().user_id, session.user_id);
        assert!(ctx.authorize(Capability::RequestRoom).is_ok());
        let err = ctx.authorize(Capability::DecideRequests).unwrap_err();
        assert_eq!(err.code, "FORBIDDEN");
        assert_eq!(err.kind, Kind::Authorization);
    }

    #[tokio::test]
    async fn rejects_expired_session() {
        let (_, token) = token(Role::Admin, Duration::from_secs(600), true);

        let err = Context::new(service(None), Some(token))
            .await
            .unwrap_err();

        assert_eq!(err.code, "SESSION_EXPIRED");
    }

    #[tokio::test]
    async fn rejects_forged_token() {
        let (_, token) = token(Role::Admin, Duration::from_secs(600), false);

        let service = service(Some(b"other".as_slice()));
        let err = Context::new(service, Some(token)).await.unwrap_err();

        assert_eq!(err.code, "INVALID_TOKEN");
        assert!(err.backtrace.is_some());
    }
}
