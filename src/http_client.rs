// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Outbound HTTP helper used by services to call each other.
//!
//! Every call goes through [`HttpClient::send`]: headers are attached, the
//! session token (if any) is sent verbatim in `Authorization`, query strings
//! are re-encoded, and any status above 399 becomes [`HttpError::Status`]
//! with the response body preserved. The typed variants add a content type
//! and decode the body as JSON or XML when it is non-empty.

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Body, Client, Method, StatusCode};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};
use url::Url;

pub const APPLICATION_JSON: &str = "application/json";
pub const TEXT_XML: &str = "text/xml";

/// Timeout applied to every outbound call.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

#[derive(Debug, Clone)]
pub struct HttpClientConfig {
    pub timeout: Duration,
    /// Skip TLS certificate verification. Off unless explicitly enabled.
    pub accept_invalid_certs: bool,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            accept_invalid_certs: false,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum HttpError {
    #[error("failed to build HTTP client: {0}")]
    Build(#[source] reqwest::Error),

    #[error("invalid URL {url}: {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("invalid authorization token: {0}")]
    InvalidToken(String),

    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("request to {url} returned status {status}")]
    Status {
        url: String,
        status: StatusCode,
        body: Vec<u8>,
    },

    #[error("response from {url} could not be decoded: {message}")]
    Decode {
        url: String,
        status: StatusCode,
        message: String,
    },
}

impl HttpError {
    /// HTTP status of the upstream response, when one was received.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            HttpError::Status { status, .. } | HttpError::Decode { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Status and undecoded body of a successful call.
#[derive(Debug, Clone)]
pub struct RawResponse {
    /// Normalized target the request was sent to.
    pub url: Url,
    pub status: StatusCode,
    pub body: Vec<u8>,
}

/// Status, raw body and decoded payload (`None` for an empty body).
#[derive(Debug, Clone)]
pub struct HttpResponse<T> {
    pub status: StatusCode,
    pub body: Vec<u8>,
    pub data: Option<T>,
}

#[derive(Debug, Clone, Copy)]
enum BodyFormat {
    Json,
    Xml,
    /// Caller supplies the multipart content type (with boundary); the
    /// response is read as JSON.
    Multipart,
}

impl BodyFormat {
    fn content_type(self) -> Option<&'static str> {
        match self {
            BodyFormat::Json => Some(APPLICATION_JSON),
            BodyFormat::Xml => Some(TEXT_XML),
            BodyFormat::Multipart => None,
        }
    }

    fn decode<T: DeserializeOwned>(self, body: &[u8]) -> Result<T, String> {
        match self {
            BodyFormat::Json | BodyFormat::Multipart => {
                serde_json::from_slice(body).map_err(|e| e.to_string())
            }
            BodyFormat::Xml => {
                let text = std::str::from_utf8(body).map_err(|e| e.to_string())?;
                quick_xml::de::from_str(text).map_err(|e| e.to_string())
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct HttpClient {
    http: Client,
}

impl HttpClient {
    pub fn new(config: &HttpClientConfig) -> Result<Self, HttpError> {
        if config.accept_invalid_certs {
            warn!("outbound TLS certificate verification is disabled");
        }

        let http = Client::builder()
            .timeout(config.timeout)
            .danger_accept_invalid_certs(config.accept_invalid_certs)
            .build()
            .map_err(HttpError::Build)?;

        Ok(Self { http })
    }

    /// Execute a request and return the raw response.
    pub async fn send(
        &self,
        method: Method,
        url: &str,
        token: Option<&str>,
        body: impl Into<Body>,
        mut headers: HeaderMap,
    ) -> Result<RawResponse, HttpError> {
        if let Some(token) = token.filter(|t| !t.is_empty()) {
            let value = HeaderValue::from_str(token)
                .map_err(|e| HttpError::InvalidToken(e.to_string()))?;
            headers.insert(AUTHORIZATION, value);
        }

        let target = normalize_url(url).map_err(|source| HttpError::InvalidUrl {
            url: url.to_string(),
            source,
        })?;

        let response = self
            .http
            .request(method.clone(), target.clone())
            .headers(headers)
            .body(body)
            .send()
            .await
            .map_err(|source| HttpError::Transport {
                url: target.to_string(),
                source,
            })?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|source| HttpError::Transport {
                url: target.to_string(),
                source,
            })?
            .to_vec();

        debug!(%method, url = %target, status = status.as_u16(), "outbound request finished");

        if status.as_u16() > 399 {
            return Err(HttpError::Status {
                url: target.to_string(),
                status,
                body,
            });
        }

        Ok(RawResponse {
            url: target,
            status,
            body,
        })
    }

    pub async fn request_json<T: DeserializeOwned>(
        &self,
        method: Method,
        url: &str,
        body: impl Into<Body>,
        headers: HeaderMap,
    ) -> Result<HttpResponse<T>, HttpError> {
        self.exchange(method, url, None, body, headers, BodyFormat::Json)
            .await
    }

    pub async fn authorized_request_json<T: DeserializeOwned>(
        &self,
        method: Method,
        url: &str,
        token: &str,
        body: impl Into<Body>,
        headers: HeaderMap,
    ) -> Result<HttpResponse<T>, HttpError> {
        self.exchange(method, url, Some(token), body, headers, BodyFormat::Json)
            .await
    }

    pub async fn request_xml<T: DeserializeOwned>(
        &self,
        method: Method,
        url: &str,
        body: impl Into<Body>,
        headers: HeaderMap,
    ) -> Result<HttpResponse<T>, HttpError> {
        self.exchange(method, url, None, body, headers, BodyFormat::Xml)
            .await
    }

    pub async fn authorized_request_xml<T: DeserializeOwned>(
        &self,
        method: Method,
        url: &str,
        token: &str,
        body: impl Into<Body>,
        headers: HeaderMap,
    ) -> Result<HttpResponse<T>, HttpError> {
        self.exchange(method, url, Some(token), body, headers, BodyFormat::Xml)
            .await
    }

    pub async fn request_multipart<T: DeserializeOwned>(
        &self,
        method: Method,
        url: &str,
        body: impl Into<Body>,
        headers: HeaderMap,
    ) -> Result<HttpResponse<T>, HttpError> {
        self.exchange(method, url, None, body, headers, BodyFormat::Multipart)
            .await
    }

    pub async fn authorized_request_multipart<T: DeserializeOwned>(
        &self,
        method: Method,
        url: &str,
        token: &str,
        body: impl Into<Body>,
        headers: HeaderMap,
    ) -> Result<HttpResponse<T>, HttpError> {
        self.exchange(method, url, Some(token), body, headers, BodyFormat::Multipart)
            .await
    }

    async fn exchange<T: DeserializeOwned>(
        &self,
        method: Method,
        url: &str,
        token: Option<&str>,
        body: impl Into<Body>,
        mut headers: HeaderMap,
        format: BodyFormat,
    ) -> Result<HttpResponse<T>, HttpError> {
        if let Some(content_type) = format.content_type() {
            headers.insert(CONTENT_TYPE, HeaderValue::from_static(content_type));
        }

        let raw = self.send(method, url, token, body, headers).await?;

        let data = if raw.body.is_empty() {
            None
        } else {
            let decoded = format
                .decode(&raw.body)
                .map_err(|message| HttpError::Decode {
                    url: raw.url.to_string(),
                    status: raw.status,
                    message,
                })?;
            Some(decoded)
        };

        Ok(HttpResponse {
            status: raw.status,
            body: raw.body,
            data,
        })
    }
}

/// Parse `raw` and re-encode its query string with pairs sorted by key.
pub fn normalize_url(raw: &str) -> Result<Url, url::ParseError> {
    let mut url = Url::parse(raw)?;
    if url.query().is_some() {
        let mut pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        pairs.sort_by(|a, b| a.0.cmp(&b.0));
        url.query_pairs_mut().clear().extend_pairs(pairs);
    }
    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        extract::RawQuery,
        http::{HeaderMap as AxumHeaders, StatusCode as AxumStatus},
        response::IntoResponse,
        routing::{get, post},
        Json, Router,
    };
    use serde::Deserialize;
    use serde_json::{json, Value};

    async fn echo(headers: AxumHeaders, body: String) -> Json<Value> {
        let header = |name: &str| {
            headers
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string)
        };
        Json(json!({
            "authorization": header("authorization"),
            "contentType": header("content-type"),
            "body": body,
        }))
    }

    async fn account_xml() -> impl IntoResponse {
        (
            [("content-type", "text/xml")],
            "<account><id>5</id><name>Main</name></account>",
        )
    }

    async fn upstream_down() -> impl IntoResponse {
        (AxumStatus::BAD_GATEWAY, "upstream down")
    }

    async fn query(RawQuery(query): RawQuery) -> String {
        query.unwrap_or_default()
    }

    async fn spawn_server() -> String {
        let app = Router::new()
            .route("/echo", post(echo))
            .route("/xml", get(account_xml))
            .route("/fail", get(upstream_down))
            .route("/empty", get(|| async { AxumStatus::NO_CONTENT }))
            .route("/query", get(query))
            .route("/not-json", get(|| async { "plain text" }));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}")
    }

    fn client() -> HttpClient {
        HttpClient::new(&HttpClientConfig::default()).unwrap()
    }

    #[derive(Debug, Deserialize)]
    #[serde(rename_all = "camelCase")]
    struct Echo {
        authorization: Option<String>,
        content_type: Option<String>,
        body: String,
    }

    #[derive(Debug, Deserialize, PartialEq)]
    struct Account {
        id: i64,
        name: String,
    }

    #[test]
    fn default_config_verifies_certificates() {
        let config = HttpClientConfig::default();
        assert!(!config.accept_invalid_certs);
        assert_eq!(config.timeout, Duration::from_secs(60));
    }

    #[test]
    fn normalize_url_sorts_query_pairs() {
        let url = normalize_url("http://svc.local/path?b=2&a=1&b=0").unwrap();
        assert_eq!(url.as_str(), "http://svc.local/path?a=1&b=2&b=0");

        let plain = normalize_url("http://svc.local/path").unwrap();
        assert_eq!(plain.query(), None);
    }

    #[test]
    fn normalize_url_rejects_garbage() {
        assert!(normalize_url("not a url").is_err());
    }

    #[tokio::test]
    async fn json_request_sets_content_type_without_token() {
        let base = spawn_server().await;
        let response: HttpResponse<Echo> = client()
            .request_json(Method::POST, &format!("{base}/echo"), r#"{"a":1}"#, HeaderMap::new())
            .await
            .unwrap();

        assert_eq!(response.status, StatusCode::OK);
        let echo = response.data.unwrap();
        assert_eq!(echo.authorization, None);
        assert_eq!(echo.content_type.as_deref(), Some(APPLICATION_JSON));
        assert_eq!(echo.body, r#"{"a":1}"#);
    }

    #[tokio::test]
    async fn authorized_request_attaches_token_verbatim() {
        let base = spawn_server().await;
        let response: HttpResponse<Echo> = client()
            .authorized_request_json(
                Method::POST,
                &format!("{base}/echo"),
                "abc.def.ghi",
                "",
                HeaderMap::new(),
            )
            .await
            .unwrap();

        assert_eq!(response.data.unwrap().authorization.as_deref(), Some("abc.def.ghi"));
    }

    #[tokio::test]
    async fn multipart_keeps_caller_content_type() {
        let base = spawn_server().await;
        let mut headers = HeaderMap::new();
        headers.insert(
            CONTENT_TYPE,
            HeaderValue::from_static("multipart/form-data; boundary=xyz"),
        );

        let response: HttpResponse<Echo> = client()
            .request_multipart(Method::POST, &format!("{base}/echo"), "--xyz--", headers)
            .await
            .unwrap();

        assert_eq!(
            response.data.unwrap().content_type.as_deref(),
            Some("multipart/form-data; boundary=xyz")
        );
    }

    #[tokio::test]
    async fn xml_response_is_decoded() {
        let base = spawn_server().await;
        let response: HttpResponse<Account> = client()
            .request_xml(Method::GET, &format!("{base}/xml"), "", HeaderMap::new())
            .await
            .unwrap();

        assert_eq!(
            response.data,
            Some(Account {
                id: 5,
                name: "Main".to_string()
            })
        );
    }

    #[tokio::test]
    async fn error_status_keeps_body() {
        let base = spawn_server().await;
        let err = client()
            .request_json::<Value>(Method::GET, &format!("{base}/fail"), "", HeaderMap::new())
            .await
            .unwrap_err();

        assert_eq!(err.status(), Some(StatusCode::BAD_GATEWAY));
        match err {
            HttpError::Status { body, .. } => assert_eq!(body, b"upstream down"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn empty_body_is_not_decoded() {
        let base = spawn_server().await;
        let response: HttpResponse<Value> = client()
            .request_json(Method::GET, &format!("{base}/empty"), "", HeaderMap::new())
            .await
            .unwrap();

        assert_eq!(response.status, StatusCode::NO_CONTENT);
        assert!(response.data.is_none());
    }

    #[tokio::test]
    async fn undecodable_body_is_decode_error() {
        let base = spawn_server().await;
        let err = client()
            .request_json::<Value>(Method::GET, &format!("{base}/not-json"), "", HeaderMap::new())
            .await
            .unwrap_err();

        assert!(matches!(err, HttpError::Decode { .. }));
        assert_eq!(err.status(), Some(StatusCode::OK));
    }

    #[tokio::test]
    async fn decode_error_reports_normalized_url() {
        let base = spawn_server().await;
        let err = client()
            .request_json::<Value>(
                Method::GET,
                &format!("{base}/not-json?z=1&a=2"),
                "",
                HeaderMap::new(),
            )
            .await
            .unwrap_err();

        match err {
            HttpError::Decode { url, .. } => {
                assert_eq!(url, format!("{base}/not-json?a=2&z=1"))
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn query_is_sent_sorted() {
        let base = spawn_server().await;
        let raw = client()
            .send(Method::GET, &format!("{base}/query?z=1&a=2"), None, "", HeaderMap::new())
            .await
            .unwrap();

        assert_eq!(raw.body, b"a=2&z=1");
        assert_eq!(raw.url.query(), Some("a=2&z=1"));
    }
}
