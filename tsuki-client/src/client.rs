use std::time::{Duration, Instant};

use async_trait::async_trait;
use bytes::Bytes;
use eyre::{Result as EyreResult, WrapErr};
use http_body_util::{BodyExt, Collected, Full};
use hyper::{
    header::{ACCEPT, AUTHORIZATION, CONTENT_LENGTH, CONTENT_TYPE, USER_AGENT},
    Method, Request, StatusCode,
};
use hyper_rustls::{HttpsConnector, HttpsConnectorBuilder};
use hyper_util::{
    client::legacy::{connect::HttpConnector, Builder, Client as HyperClient},
    rt::TokioExecutor,
};
use leaky_bucket_lite::LeakyBucket;
use parking_lot::RwLock;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::{
    metrics::{ClientMetrics, Failure},
    runner::RequestOptions,
    ClientError, HttpMethod, NetRunner, Payload, Site, MY_USER_AGENT,
};

pub(crate) type InnerClient = HyperClient<HttpsConnector<HttpConnector>, Body>;
pub(crate) type Body = Full<Bytes>;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

pub struct Client {
    session: RwLock<Option<InnerClient>>,
    github_auth: Option<Box<str>>,
    ratelimiters: [LeakyBucket; 2],
    timeout: Duration,
}

impl Client {
    /// Creates the client without opening a session yet.
    pub fn new(github_token: Option<&str>) -> Self {
        ClientMetrics::init();

        let ratelimiter = |per_second| {
            LeakyBucket::builder()
                .max(per_second)
                .tokens(per_second)
                .refill_interval(Duration::from_millis(1000 / per_second as u64))
                .refill_amount(1)
                .build()
        };

        let ratelimiters = [
            ratelimiter(5),  // Github
            ratelimiter(10), // Other
        ];

        let github_auth = github_token.map(|token| format!("Bearer {token}").into_boxed_str());

        Self {
            session: RwLock::new(None),
            github_auth,
            ratelimiters,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Overwrite the default timeout of 30 seconds.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;

        self
    }

    /// Whether a session is currently open.
    pub fn is_open(&self) -> bool {
        self.session.read().is_some()
    }

    /// Perform a request and deserialize the response body.
    pub async fn request_json<T: DeserializeOwned>(
        &self,
        method: HttpMethod,
        url: &str,
        options: RequestOptions,
    ) -> Result<T, ClientError> {
        let (_, bytes) = self.fetch_bytes(method, url, options).await?;

        serde_json::from_slice(&bytes)
            .wrap_err_with(|| {
                let body = String::from_utf8_lossy(&bytes);

                format!("Failed to deserialize response: {body}")
            })
            .map_err(ClientError::Report)
    }

    async fn ratelimit(&self, site: Site) {
        self.ratelimiters[site as usize].acquire_one().await
    }

    fn session(&self) -> Result<InnerClient, ClientError> {
        if let Some(ref client) = *self.session.read() {
            return Ok(client.clone());
        }

        let mut session = self.session.write();

        // another task might have opened it in the meantime
        if let Some(ref client) = *session {
            return Ok(client.clone());
        }

        let client = build_client()?;
        *session = Some(client.clone());
        debug!("Opened http session");

        Ok(client)
    }

    fn build_request(
        &self,
        method: HttpMethod,
        url: &str,
        options: &mut RequestOptions,
    ) -> EyreResult<Request<Body>> {
        let mut req = Request::builder()
            .method(Method::from(method))
            .uri(url)
            .header(USER_AGENT, MY_USER_AGENT);

        if options.site == Site::Github {
            req = req.header(ACCEPT, "application/vnd.github+json");

            if let Some(ref auth) = self.github_auth {
                req = req.header(AUTHORIZATION, auth.as_ref());
            }
        }

        if let Some(headers) = req.headers_mut() {
            headers.extend(options.headers.drain());
        }

        let body = match options.json.take() {
            Some(json) => {
                req = req
                    .header(CONTENT_TYPE, "application/json")
                    .header(CONTENT_LENGTH, json.len());

                Body::from(json)
            }
            None => Body::default(),
        };

        req.body(body).wrap_err("Failed to build request")
    }

    async fn fetch_bytes(
        &self,
        method: HttpMethod,
        url: &str,
        mut options: RequestOptions,
    ) -> Result<(StatusCode, Bytes), ClientError> {
        trace!("{method} request to url {url}");

        let req = self.build_request(method, url, &mut options)?;
        let session = self.acquire().await?;
        let site = options.site;

        self.ratelimit(site).await;

        let timeout = options.timeout.unwrap_or(self.timeout);
        let start = Instant::now();
        let res = tokio::time::timeout(timeout, send_request(session, req)).await;
        let latency = start.elapsed();

        let res = match res {
            Ok(res) => res,
            Err(_) => {
                debug!(?timeout, "{method} request to url {url} timed out");

                Err(ClientError::Timeout)
            }
        };

        match &res {
            Ok((status, _)) => ClientMetrics::response(site, method, *status, latency),
            Err(err) => match err.status() {
                Some(status) => ClientMetrics::response(site, method, status, latency),
                None => ClientMetrics::failure(site, method, Failure::from(err)),
            },
        }

        res
    }
}

#[async_trait]
impl NetRunner for Client {
    type Session = InnerClient;

    async fn acquire(&self) -> Result<Self::Session, ClientError> {
        self.session()
    }

    async fn close(&self) {
        if self.session.write().take().is_some() {
            debug!("Closed http session");
        }
    }

    async fn request(
        &self,
        method: HttpMethod,
        url: &str,
        options: RequestOptions,
    ) -> Result<Payload, ClientError> {
        let getter = options.getter.clone();
        let read_bytes = options.read_bytes;

        let (status, bytes) = self.fetch_bytes(method, url, options).await?;

        into_payload(status, bytes, getter.as_deref(), read_bytes)
    }
}

fn build_client() -> EyreResult<InnerClient> {
    let crypto_provider = rustls::crypto::ring::default_provider();

    let https = HttpsConnectorBuilder::new()
        .with_provider_and_webpki_roots(crypto_provider)
        .wrap_err("Failed to configure https connector")?
        .https_or_http()
        .enable_http1()
        .enable_http2()
        .build();

    Ok(Builder::new(TokioExecutor::new()).build(https))
}

async fn send_request(
    session: InnerClient,
    req: Request<Body>,
) -> Result<(StatusCode, Bytes), ClientError> {
    let response = session
        .request(req)
        .await
        .wrap_err("Failed to receive response")?;

    let status = response.status();

    if !status.is_success() {
        return Err(Client::error_handle(response).await);
    }

    let bytes = response
        .into_body()
        .collect()
        .await
        .map(Collected::to_bytes)
        .wrap_err("Failed to collect response bytes")?;

    Ok((status, bytes))
}

fn into_payload(
    status: StatusCode,
    bytes: Bytes,
    getter: Option<&str>,
    read_bytes: bool,
) -> Result<Payload, ClientError> {
    if read_bytes {
        return Ok(Payload::Bytes(bytes));
    }

    if status == StatusCode::NO_CONTENT || bytes.is_empty() {
        return Ok(Payload::Empty);
    }

    let json: Value = serde_json::from_slice(&bytes).wrap_err_with(|| {
        let body = String::from_utf8_lossy(&bytes);

        format!("Failed to deserialize response: {body}")
    })?;

    let Some(field) = getter else {
        return Ok(Payload::Json(json));
    };

    match json {
        Value::Object(mut map) => map
            .remove(field)
            .map(Payload::Json)
            .ok_or_else(|| ClientError::MissingField(Box::from(field))),
        _ => Err(ClientError::MissingField(Box::from(field))),
    }
}

#[cfg(test)]
mod tests {
    use std::net::SocketAddr;

    use serde_json::json;
    use tokio::{
        io::{AsyncReadExt, AsyncWriteExt},
        net::TcpListener,
    };

    use super::*;

    /// Serves a single connection, answering every request on it with the
    /// given raw response. If `response` is `None`, it never answers.
    async fn serve_once(response: Option<&'static str>) -> SocketAddr {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            let (mut stream, _) = listener.accept().await.unwrap();
            let mut buf = Vec::new();
            let mut chunk = [0; 1024];

            while !buf.windows(4).any(|window| window == b"\r\n\r\n") {
                match stream.read(&mut chunk).await {
                    Ok(0) | Err(_) => return,
                    Ok(n) => buf.extend_from_slice(&chunk[..n]),
                }
            }

            match response {
                Some(response) => {
                    let _ = stream.write_all(response.as_bytes()).await;
                    let _ = stream.shutdown().await;
                }
                None => tokio::time::sleep(Duration::from_secs(60)).await,
            }
        });

        addr
    }

    fn json_response(body: &str) -> String {
        format!(
            "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\n\
            Content-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        )
    }

    #[test]
    fn payload_getter() {
        let bytes = Bytes::from_static(br#"{"name":"tsuki","id":1}"#);

        let payload = into_payload(StatusCode::OK, bytes.clone(), Some("name"), false).unwrap();
        assert_eq!(payload, Payload::Json(json!("tsuki")));

        let payload = into_payload(StatusCode::OK, bytes.clone(), None, false).unwrap();
        assert_eq!(payload.into_json(), Some(json!({ "name": "tsuki", "id": 1 })));

        let err = into_payload(StatusCode::OK, bytes.clone(), Some("missing"), false).unwrap_err();
        assert!(matches!(err, ClientError::MissingField(field) if &*field == "missing"));

        let payload = into_payload(StatusCode::OK, bytes.clone(), Some("name"), true).unwrap();
        assert_eq!(payload.into_bytes(), Some(bytes));
    }

    #[test]
    fn payload_edge_cases() {
        let payload = into_payload(StatusCode::NO_CONTENT, Bytes::new(), None, false).unwrap();
        assert_eq!(payload, Payload::Empty);

        let bytes = Bytes::from_static(b"[1, 2, 3]");
        let err = into_payload(StatusCode::OK, bytes, Some("key"), false).unwrap_err();
        assert!(matches!(err, ClientError::MissingField(_)));

        let bytes = Bytes::from_static(b"<html></html>");
        let err = into_payload(StatusCode::OK, bytes, None, false).unwrap_err();
        assert!(matches!(err, ClientError::Report(_)));
    }

    #[tokio::test]
    async fn error_handle_never_succeeds() {
        for status in [200_u16, 204, 301, 400, 401, 403, 404, 418, 429, 500, 503] {
            let response = hyper::Response::builder()
                .status(status)
                .body(Full::new(Bytes::from_static(b"nope")))
                .unwrap();

            let err = Client::error_handle(response).await;
            assert_eq!(err.status().map(|status| status.as_u16()), Some(status));
        }
    }

    #[tokio::test]
    async fn session_lifecycle() {
        let client = Client::new(None);
        assert!(!client.is_open());

        client.acquire().await.unwrap();
        assert!(client.is_open());

        client.close().await;
        assert!(!client.is_open());

        client.acquire().await.unwrap();
        assert!(client.is_open());
    }

    #[tokio::test]
    async fn request_with_getter() {
        let response = Box::leak(json_response(r#"{"user":{"id":42},"ok":true}"#).into_boxed_str());
        let addr = serve_once(Some(response)).await;

        let client = Client::new(None);
        let url = format!("http://{addr}/");
        let options = RequestOptions::new().getter("user");

        let payload = client.request(HttpMethod::Get, &url, options).await.unwrap();
        assert_eq!(payload, Payload::Json(json!({ "id": 42 })));
    }

    #[tokio::test]
    async fn request_not_found() {
        let response = "HTTP/1.1 404 Not Found\r\nContent-Length: 0\r\nConnection: close\r\n\r\n";
        let addr = serve_once(Some(response)).await;

        let client = Client::new(None);
        let url = format!("http://{addr}/missing");

        let err = client
            .request(HttpMethod::Get, &url, RequestOptions::new())
            .await
            .unwrap_err();

        assert!(matches!(err, ClientError::NotFound));
    }

    #[tokio::test]
    async fn request_times_out() {
        let addr = serve_once(None).await;

        let client = Client::new(None);
        let url = format!("http://{addr}/");
        let options = RequestOptions::new().timeout(Duration::from_millis(100));

        let err = client
            .request(HttpMethod::Post, &url, options)
            .await
            .unwrap_err();

        assert!(matches!(err, ClientError::Timeout));
    }
}
