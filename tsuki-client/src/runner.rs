use std::{error::Error as StdError, fmt, time::Duration};

use async_trait::async_trait;
use bytes::Bytes;
use eyre::WrapErr;
use http_body_util::BodyExt;
use hyper::{
    body::Body,
    header::{HeaderMap, HeaderName, HeaderValue},
    Method, Response,
};
use serde::Serialize;
use serde_json::Value;

use crate::{ClientError, Site};

/// An http client with an explicit session lifecycle.
#[async_trait]
pub trait NetRunner: Send + Sync {
    type Session: Clone + Send;

    /// Returns the session, opening it first if it's not open yet or has
    /// been closed.
    async fn acquire(&self) -> Result<Self::Session, ClientError>;

    /// Closes the session. The next [`NetRunner::acquire`] opens a new one.
    async fn close(&self);

    /// Perform an http request.
    ///
    /// Requests that require authorization need to pass the headers through
    /// the options.
    async fn request(
        &self,
        method: HttpMethod,
        url: &str,
        options: RequestOptions,
    ) -> Result<Payload, ClientError>;

    /// Turns a response with a non-2xx status into an error.
    ///
    /// There is no success path; even a 2xx response passed to this is
    /// returned as [`ClientError::Status`].
    async fn error_handle<B>(response: Response<B>) -> ClientError
    where
        Self: Sized,
        B: Body + Send,
        B::Data: Send,
        B::Error: StdError + Send + Sync + 'static,
    {
        let status = response.status();
        let (parts, body) = response.into_parts();

        let bytes = match body.collect().await {
            Ok(collected) => collected.to_bytes(),
            Err(err) => {
                warn!(?err, %status, "Failed to collect bytes of error response");

                Bytes::new()
            }
        };

        if status.is_success() {
            return ClientError::Status {
                status,
                body: Box::from(String::from_utf8_lossy(&bytes)),
            };
        }

        ClientError::from_response(status, &parts.headers, &bytes)
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
    Patch,
}

impl From<HttpMethod> for Method {
    #[inline]
    fn from(method: HttpMethod) -> Self {
        match method {
            HttpMethod::Get => Method::GET,
            HttpMethod::Post => Method::POST,
            HttpMethod::Put => Method::PUT,
            HttpMethod::Delete => Method::DELETE,
            HttpMethod::Patch => Method::PATCH,
        }
    }
}

impl HttpMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
            Self::Patch => "PATCH",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Content of a successful response.
#[derive(Clone, Debug, PartialEq)]
pub enum Payload {
    Json(Value),
    Bytes(Bytes),
    /// The response had no body.
    Empty,
}

impl Payload {
    pub fn into_json(self) -> Option<Value> {
        match self {
            Self::Json(value) => Some(value),
            Self::Bytes(_) | Self::Empty => None,
        }
    }

    pub fn into_bytes(self) -> Option<Bytes> {
        match self {
            Self::Bytes(bytes) => Some(bytes),
            Self::Json(_) | Self::Empty => None,
        }
    }
}

/// Additional arguments for [`NetRunner::request`].
#[derive(Debug, Default)]
pub struct RequestOptions {
    pub(crate) headers: HeaderMap,
    pub(crate) json: Option<Vec<u8>>,
    pub(crate) getter: Option<Box<str>>,
    pub(crate) read_bytes: bool,
    pub(crate) timeout: Option<Duration>,
    pub(crate) site: Site,
}

impl RequestOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);

        self
    }

    /// Send the value as json body.
    pub fn json<T: Serialize + ?Sized>(mut self, body: &T) -> Result<Self, ClientError> {
        let json = serde_json::to_vec(body).wrap_err("Failed to serialize json body")?;
        self.json = Some(json);

        Ok(self)
    }

    /// Only return the value of this field of a json object response.
    pub fn getter(mut self, field: impl Into<Box<str>>) -> Self {
        self.getter = Some(field.into());

        self
    }

    /// Return the raw response body instead of parsing it as json.
    pub fn read_bytes(mut self) -> Self {
        self.read_bytes = true;

        self
    }

    /// Overwrite the client's default timeout for this request.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);

        self
    }

    pub fn site(mut self, site: Site) -> Self {
        self.site = site;

        self
    }
}
