//! REST [`Backend`] implementation over HTTP.

pub mod dto;

use std::time::Duration;

use common::operations::{By, Delete, Insert, Select, Update};
use derive_more::{Display, Error as StdError, From};
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::{de::DeserializeOwned, Serialize};
use tracerr::Traced;
use tracing as log;
use url::Url;

use crate::{
    domain::{
        allocation, room,
        user::{self, session::Token},
        AllocationRequest, Hostel, Room, User,
    },
    infra::{
        backend::{self, Rejection},
        Backend,
    },
};

/// [`Http`] backend configuration.
#[derive(Clone, Debug)]
pub struct Config {
    /// Base [`Url`] of the REST API, all the paths are resolved against.
    pub base_url: Url,

    /// Timeout of a single HTTP request, if any.
    pub timeout: Option<Duration>,

    /// Bearer [`Token`] to authorize HTTP requests with, if any.
    pub token: Option<Token>,
}

/// REST [`Backend`] client.
#[derive(Clone, Debug)]
pub struct Http {
    /// Underlying HTTP [`Client`].
    client: Client,

    /// Base [`Url`] of the REST API, always ending with `/`.
    base_url: Url,

    /// Bearer [`Token`] to authorize HTTP requests with.
    token: Option<Token>,
}

impl Http {
    /// Creates a new [`Http`] backend client with the provided [`Config`].
    ///
    /// # Errors
    ///
    /// If failed to build the HTTP [`Client`].
    pub fn new(conf: Config) -> Result<Self, Traced<backend::Error>> {
        let Config {
            mut base_url,
            timeout,
            token,
        } = conf;

        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(Error::Build)
            .map_err(tracerr::from_and_wrap!(=> backend::Error))?;

        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        Ok(Self {
            client,
            base_url,
            token,
        })
    }

    /// Resolves the provided `path` against the base [`Url`].
    fn url(&self, path: &str) -> Result<Url, Traced<backend::Error>> {
        self.base_url
            .join(path)
            .map_err(tracerr::from_and_wrap!(=> Error))
            .map_err(tracerr::map_from)
    }

    /// Attaches the bearer [`Token`] to the provided request, if any.
    fn authorized(&self, req: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => req.bearer_auth(token.expose()),
            None => req,
        }
    }

    /// Sends the provided request and returns the successful response body.
    async fn send(
        &self,
        req: RequestBuilder,
    ) -> Result<Vec<u8>, Traced<backend::Error>> {
        let resp = self
            .authorized(req)
            .send()
            .await
            .map_err(Error::Transport)
            .map_err(tracerr::from_and_wrap!(=> backend::Error))?;
        let status = resp.status();
        let body = resp
            .bytes()
            .await
            .map_err(Error::Transport)
            .map_err(tracerr::from_and_wrap!(=> backend::Error))?;

        if !status.is_success() {
            let rejection = classify(status, &body);
            log::debug!("backend rejected the request: {rejection}");
            return Err(tracerr::new!(backend::Error::from(rejection)));
        }
        Ok(body.to_vec())
    }

    /// Performs a `GET` request of the provided `path`.
    ///
    /// [`None`] if the backend responds with `404 Not Found`.
    async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
    ) -> Result<Option<T>, Traced<backend::Error>> {
        let url = self.url(path)?;
        log::debug!("GET {url}");

        let body = match self.send(self.client.get(url)).await {
            Err(e) if e.as_ref().is_not_found() => return Ok(None),
            res => res.map_err(tracerr::wrap!())?,
        };
        decode(&body).map(Some)
    }

    /// Performs a `GET` request of the provided collection `path`.
    async fn list<T: DeserializeOwned>(
        &self,
        path: &str,
    ) -> Result<Vec<T>, Traced<backend::Error>> {
        let url = self.url(path)?;
        log::debug!("GET {url}");

        let body = self
            .send(self.client.get(url))
            .await
            .map_err(tracerr::wrap!())?;
        decode(&body)
    }

    /// Performs a `POST` request of the provided `path` with a JSON `body`.
    async fn post<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<Vec<u8>, Traced<backend::Error>> {
        let url = self.url(path)?;
        log::debug!("POST {url}");

        self.send(self.client.post(url).json(body))
            .await
            .map_err(tracerr::wrap!())
    }
}

/// Decodes the provided JSON response `body`.
fn decode<T: DeserializeOwned>(
    body: &[u8],
) -> Result<T, Traced<backend::Error>> {
    serde_json::from_slice(body)
        .map_err(tracerr::from_and_wrap!(=> Error))
        .map_err(tracerr::map_from)
}

/// Classifies the provided unsuccessful response into a [`Rejection`].
#[must_use]
pub fn classify(status: StatusCode, body: &[u8]) -> Rejection {
    let message = || {
        serde_json::from_slice::<dto::ErrorBody>(body)
            .ok()
            .and_then(|b| b.message)
            .or_else(|| status.canonical_reason().map(ToOwned::to_owned))
            .unwrap_or_default()
    };
    match status {
        StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => {
            Rejection::Invalid(message())
        }
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            Rejection::Unauthorized
        }
        StatusCode::NOT_FOUND => Rejection::NotFound,
        StatusCode::CONFLICT => Rejection::Conflict(message()),
        _ => Rejection::Unexpected(status.as_u16()),
    }
}

/// [`Http`] backend error.
#[derive(Debug, Display, From, StdError)]
pub enum Error {
    /// Failed to build the HTTP [`Client`].
    #[display("Failed to build HTTP client: {_0}")]
    #[from(ignore)]
    Build(reqwest::Error),

    /// Failed to reach the backend or to read its response.
    #[display("Transport failure: {_0}")]
    #[from(ignore)]
    Transport(reqwest::Error),

    /// Failed to resolve an endpoint [`Url`].
    #[display("Invalid endpoint URL: {_0}")]
    Url(url::ParseError),

    /// Response body doesn't match the expected shape.
    #[display("Malformed response: {_0}")]
    Malformed(serde_json::Error),
}

impl Error {
    /// Indicates whether the backend hasn't been reached at all.
    #[must_use]
    pub fn is_network(&self) -> bool {
        matches!(self, Self::Transport(_))
    }
}

impl Backend<Select<By<Vec<Hostel>, ()>>> for Http {
    type Ok = Vec<Hostel>;
    type Err = Traced<backend::Error>;

    async fn execute(
        &self,
        _: Select<By<Vec<Hostel>, ()>>,
    ) -> Result<Self::Ok, Self::Err> {
        Ok(self
            .list::<dto::Hostel>("hostels")
            .await
            .map_err(tracerr::wrap!())?
            .into_iter()
            .map(Into::into)
            .collect())
    }
}

impl Backend<Select<By<Vec<Room>, ()>>> for Http {
    type Ok = Vec<Room>;
    type Err = Traced<backend::Error>;

    async fn execute(
        &self,
        _: Select<By<Vec<Room>, ()>>,
    ) -> Result<Self::Ok, Self::Err> {
        Ok(self
            .list::<dto::Room>("rooms")
            .await
            .map_err(tracerr::wrap!())?
            .into_iter()
            .map(Into::into)
            .collect())
    }
}

impl Backend<Select<By<Option<Room>, room::Id>>> for Http {
    type Ok = Option<Room>;
    type Err = Traced<backend::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Room>, room::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        Ok(self
            .get::<dto::Room>(&format!("rooms/{}", by.into_inner()))
            .await
            .map_err(tracerr::wrap!())?
            .map(Into::into))
    }
}

impl Backend<Select<By<Vec<AllocationRequest>, ()>>> for Http {
    type Ok = Vec<AllocationRequest>;
    type Err = Traced<backend::Error>;

    async fn execute(
        &self,
        _: Select<By<Vec<AllocationRequest>, ()>>,
    ) -> Result<Self::Ok, Self::Err> {
        Ok(self
            .list::<dto::Request>("rooms/requests")
            .await
            .map_err(tracerr::wrap!())?
            .into_iter()
            .map(Into::into)
            .collect())
    }
}

impl Backend<Select<By<Option<AllocationRequest>, allocation::Id>>> for Http
where
    Self: Backend<
        Select<By<Vec<AllocationRequest>, ()>>,
        Ok = Vec<AllocationRequest>,
        Err = Traced<backend::Error>,
    >,
{
    type Ok = Option<AllocationRequest>;
    type Err = Traced<backend::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<AllocationRequest>, allocation::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        // No single-request endpoint, so the queue is scanned.
        let id = by.into_inner();
        Ok(self
            .execute(Select(By::<Vec<AllocationRequest>, _>::new(())))
            .await
            .map_err(tracerr::wrap!())?
            .into_iter()
            .find(|r| r.id == id))
    }
}

impl Backend<Select<By<Option<User>, user::Id>>> for Http {
    type Ok = Option<User>;
    type Err = Traced<backend::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<User>, user::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        Ok(self
            .get::<dto::User>(&format!("users/{}", by.into_inner()))
            .await
            .map_err(tracerr::wrap!())?
            .map(Into::into))
    }
}

impl Backend<Insert<allocation::Submission>> for Http {
    type Ok = AllocationRequest;
    type Err = Traced<backend::Error>;

    async fn execute(
        &self,
        Insert(submission): Insert<allocation::Submission>,
    ) -> Result<Self::Ok, Self::Err> {
        let body = self
            .post("rooms/requests", &submission)
            .await
            .map_err(tracerr::wrap!())?;
        Ok(decode::<dto::Request>(&body)
            .map_err(tracerr::wrap!())?
            .into())
    }
}

impl Backend<Update<allocation::Decision>> for Http {
    type Ok = AllocationRequest;
    type Err = Traced<backend::Error>;

    async fn execute(
        &self,
        Update(decision): Update<allocation::Decision>,
    ) -> Result<Self::Ok, Self::Err> {
        let action = match decision.verdict {
            allocation::Verdict::Approve => "approve",
            allocation::Verdict::Decline => "decline",
        };
        let path = format!("rooms/requests/{}/{action}", decision.request_id);
        let body = self
            .post(&path, &serde_json::json!({}))
            .await
            .map_err(tracerr::wrap!())?;
        Ok(decode::<dto::Request>(&body)
            .map_err(tracerr::wrap!())?
            .into())
    }
}

impl Backend<Insert<room::Assignment>> for Http {
    type Ok = ();
    type Err = Traced<backend::Error>;

    async fn execute(
        &self,
        Insert(assignment): Insert<room::Assignment>,
    ) -> Result<Self::Ok, Self::Err> {
        _ = self
            .post("rooms/assign", &assignment)
            .await
            .map_err(tracerr::wrap!())?;
        Ok(())
    }
}

impl Backend<Delete<room::Occupant>> for Http {
    type Ok = ();
    type Err = Traced<backend::Error>;

    async fn execute(
        &self,
        Delete(occupant): Delete<room::Occupant>,
    ) -> Result<Self::Ok, Self::Err> {
        _ = self
            .post("rooms/unassign", &occupant)
            .await
            .map_err(tracerr::wrap!())?;
        Ok(())
    }
}

#[cfg(test)]
mod spec {
    use reqwest::StatusCode;
    use url::Url;

    use crate::infra::backend::Rejection;

    use super::{classify, Config, Http};

    #[test]
    fn classifies_statuses() {
        let body = br#"{"message": "bed is taken"}"#;

        assert_eq!(
            classify(StatusCode::CONFLICT, body),
            Rejection::Conflict("bed is taken".into()),
        );
        assert_eq!(
            classify(StatusCode::UNPROCESSABLE_ENTITY, b"<html>"),
            Rejection::Invalid("Unprocessable Entity".into()),
        );
        assert_eq!(
            classify(StatusCode::FORBIDDEN, b""),
            Rejection::Unauthorized,
        );
        assert_eq!(classify(StatusCode::NOT_FOUND, b""), Rejection::NotFound);
        assert_eq!(
            classify(StatusCode::BAD_GATEWAY, b""),
            Rejection::Unexpected(502),
        );
    }

    #[test]
    fn resolves_paths_under_base_path() {
        let http = Http::new(Config {
            base_url: Url::parse("http://localhost:5000/api").unwrap(),
            timeout: None,
            token: None,
        })
        .unwrap();

        assert_eq!(
            http.url("rooms/requests").unwrap().as_str(),
            "http://localhost:5000/api/rooms/requests",
        );
    }
}
