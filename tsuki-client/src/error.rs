use eyre::Report;
use hyper::{
    header::{HeaderMap, RETRY_AFTER},
    StatusCode,
};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("status code 400 - bad request: {body}")]
    BadRequest { body: Box<str> },
    #[error("status code 401 - unauthorized")]
    Unauthorized,
    #[error("status code 403 - forbidden")]
    Forbidden,
    #[error("status code 404 - not found")]
    NotFound,
    #[error("status code 429 - ratelimited")]
    Ratelimited { retry_after: Option<u64> },
    #[error("status code {status} - server error")]
    Server { status: StatusCode, body: Box<str> },
    #[error("unexpected status code {status}")]
    Status { status: StatusCode, body: Box<str> },
    #[error("request timed out")]
    Timeout,
    #[error("missing field `{0}` in response")]
    MissingField(Box<str>),
    #[error(transparent)]
    Report(#[from] Report),
}

impl ClientError {
    /// Classifies the response of a failed request.
    ///
    /// Github signals an exhausted ratelimit with a 403 and a
    /// `x-ratelimit-remaining: 0` header so that's classified as ratelimit too.
    pub fn from_response(status: StatusCode, headers: &HeaderMap, body: &[u8]) -> Self {
        let body = || Box::from(String::from_utf8_lossy(body));

        let retry_after = || {
            headers
                .get(RETRY_AFTER)
                .and_then(|value| value.to_str().ok())
                .and_then(|value| value.trim().parse().ok())
        };

        let ratelimit_exhausted = headers
            .get("x-ratelimit-remaining")
            .is_some_and(|value| value.as_bytes() == b"0");

        match status.as_u16() {
            400 => Self::BadRequest { body: body() },
            401 => Self::Unauthorized,
            403 if ratelimit_exhausted => Self::Ratelimited {
                retry_after: retry_after(),
            },
            403 => Self::Forbidden,
            404 => Self::NotFound,
            429 => Self::Ratelimited {
                retry_after: retry_after(),
            },
            500..=599 => Self::Server {
                status,
                body: body(),
            },
            _ => Self::Status {
                status,
                body: body(),
            },
        }
    }

    /// The response status code this error was created from, if any.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::BadRequest { .. } => Some(StatusCode::BAD_REQUEST),
            Self::Unauthorized => Some(StatusCode::UNAUTHORIZED),
            Self::Forbidden => Some(StatusCode::FORBIDDEN),
            Self::NotFound => Some(StatusCode::NOT_FOUND),
            Self::Ratelimited { .. } => Some(StatusCode::TOO_MANY_REQUESTS),
            Self::Server { status, .. } | Self::Status { status, .. } => Some(*status),
            Self::Timeout | Self::MissingField(_) | Self::Report(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use hyper::header::HeaderValue;

    use super::*;

    fn classify(status: u16) -> ClientError {
        let status = StatusCode::from_u16(status).unwrap();

        ClientError::from_response(status, &HeaderMap::new(), b"body")
    }

    #[test]
    fn known_statuses() {
        assert!(matches!(classify(400), ClientError::BadRequest { body } if &*body == "body"));
        assert!(matches!(classify(401), ClientError::Unauthorized));
        assert!(matches!(classify(403), ClientError::Forbidden));
        assert!(matches!(classify(404), ClientError::NotFound));
        assert!(matches!(
            classify(429),
            ClientError::Ratelimited { retry_after: None }
        ));
        assert!(matches!(classify(502), ClientError::Server { .. }));
        assert!(matches!(classify(418), ClientError::Status { .. }));
    }

    #[test]
    fn status_is_kept() {
        for status in (300..=399).chain(400..=599) {
            let err = classify(status);
            assert_eq!(err.status().map(|status| status.as_u16()), Some(status));
        }
    }

    #[test]
    fn ratelimit_headers() {
        let mut headers = HeaderMap::new();
        headers.insert(RETRY_AFTER, HeaderValue::from_static("30"));

        let err = ClientError::from_response(StatusCode::TOO_MANY_REQUESTS, &headers, b"");
        assert!(matches!(err, ClientError::Ratelimited { retry_after: Some(30) }));

        headers.insert("x-ratelimit-remaining", HeaderValue::from_static("0"));

        let err = ClientError::from_response(StatusCode::FORBIDDEN, &headers, b"");
        assert!(matches!(err, ClientError::Ratelimited { .. }));
    }
}
