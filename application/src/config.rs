//! [`Config`]-related definitions.

use std::time;

use config::{builder::DefaultState, ConfigBuilder, ConfigError};
use secrecy::{ExposeSecret as _, SecretString};
use serde::Deserialize;
use service::{domain::user::session::Token, infra::http};
use smart_default::SmartDefault;
use url::Url;

/// Application configuration.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Backend configuration.
    pub backend: Backend,

    /// Service configuration.
    pub service: Service,

    /// Log configuration.
    pub log: Log,
}

impl Config {
    /// Creates a new [`Config`] by:
    /// - loading it from the provided `path` (if any);
    /// - merging it with the environment variables (if any);
    /// - using default values for missing fields.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn new(path: impl AsRef<str>) -> Result<Self, ConfigError> {
        ConfigBuilder::<DefaultState>::default()
            .add_source(config::File::with_name(path.as_ref()).required(false))
            .add_source(config::Environment::with_prefix("CONF").separator("."))
            .build()?
            .try_deserialize()
    }
}

/// REST backend configuration.
#[derive(Clone, Debug, Deserialize, SmartDefault)]
#[serde(default)]
pub struct Backend {
    /// Base URL of the REST API.
    #[default("http://127.0.0.1:8080/api/".to_owned())]
    pub base_url: String,

    /// Timeout of a single HTTP request.
    ///
    /// No timeout is imposed, if omitted.
    #[serde(with = "humantime_serde")]
    pub timeout: Option<time::Duration>,

    /// Bearer token of the current session.
    pub token: Option<SecretString>,
}

impl Backend {
    /// Returns the [`Token`] of the current session, if any.
    #[must_use]
    pub fn token(&self) -> Option<Token> {
        self.token.clone().map(Token::from)
    }
}

impl TryFrom<Backend> for http::Config {
    type Error = url::ParseError;

    fn try_from(value: Backend) -> Result<Self, Self::Error> {
        let token = value.token();
        let Backend {
            base_url,
            timeout,
            token: _,
        } = value;

        Ok(Self {
            base_url: Url::parse(&base_url)?,
            timeout,
            token,
        })
    }
}

/// Service configuration.
#[derive(Clone, Debug, Deserialize, SmartDefault)]
#[serde(default)]
pub struct Service {
    /// [JWT] secret verifying session tokens.
    ///
    /// Tokens are only decoded, if omitted.
    ///
    /// [JWT]: https://wikipedia.org/wiki/JSON_Web_Token
    pub jwt_secret: Option<SecretString>,

    /// Number of items in a page when not requested explicitly.
    #[default(20)]
    pub page_size: usize,
}

impl From<Service> for service::Config {
    fn from(value: Service) -> Self {
        let Service {
            jwt_secret,
            page_size,
        } = value;

        Self {
            jwt_decoding_key: jwt_secret.map(|s| {
                jsonwebtoken::DecodingKey::from_secret(
                    s.expose_secret().as_bytes(),
                )
            }),
            page_size,
        }
    }
}

/// Log configuration.
#[derive(Clone, Copy, Debug, Default, Deserialize)]
#[serde(default)]
pub struct Log {
    /// Log level.
    pub level: LogLevel,
}

/// Log level.
#[derive(Clone, Copy, Debug, Default, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LogLevel {
    /// Designates very low priority, often extremely verbose, information.
    Trace,

    /// Designates lower priority information.
    Debug,

    /// Designates useful information.
    Info,

    /// Designates hazardous situations.
    #[default]
    Warn,

    /// Designates very serious errors.
    Error,
}

impl From<LogLevel> for tracing::Level {
    fn from(value: LogLevel) -> Self {
        match value {
            LogLevel::Trace => Self::TRACE,
            LogLevel::Debug => Self::DEBUG,
            LogLevel::Info => Self::INFO,
            LogLevel::Warn => Self::WARN,
            LogLevel::Error => Self::ERROR,
        }
    }
}
