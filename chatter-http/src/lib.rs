//! Minimal HTTP client with safe logging and bearer/basic auth.
//!
//! - Request options: headers, `Auth`, query params, timeout
//! - Empty or urlencoded-form bodies, JSON replies
//! - Redacts sensitive query params and never logs secret values
//! - Optional *raw* request/response logging via `CHATTER_HTTP_RAW=1`
//!
//! Requests are sent once. Callers decide what a failure means; the
//! summarizer owns the only retry in the system.
//!
//! Example (no_run):
//! ```rust
//! # async fn demo() -> Result<(), chatter_http::HttpError> {
//! let client = chatter_http::HttpClient::new("https://api.example.com")?;
//! let got: serde_json::Value = client
//!     .get_json("v1/items", chatter_http::RequestOpts::default())
//!     .await?;
//! # Ok(()) }
//! ```
//!
//! Security: bearer and basic credentials are sanitized before use, and logs
//! only ever include the auth kind (bearer/basic/none).

pub use reqwest::header;

use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::{Client, Method, StatusCode, Url};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::borrow::Cow;
use std::env;
use std::time::Duration;
use thiserror::Error;

const RAW_ENV: &str = "CHATTER_HTTP_RAW";
const RAW_MAX_BODY: usize = 64 * 1024;
const SNIPPET_MAX: usize = 500;

const SECRET_PARAMS: &[&str] = &[
    "access_token",
    "authorization",
    "auth",
    "key",
    "api_key",
    "token",
    "secret",
    "client_secret",
    "bearer",
    "password",
];

fn raw_enabled() -> bool {
    matches!(
        env::var(RAW_ENV).as_deref(),
        Ok("1") | Ok("true") | Ok("yes")
    )
}

fn is_secret_param(name: &str) -> bool {
    SECRET_PARAMS
        .iter()
        .any(|s| s.eq_ignore_ascii_case(name))
}

fn redact_pairs<'a, I>(pairs: I) -> Vec<(String, String)>
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    pairs
        .into_iter()
        .map(|(k, v)| {
            let v = if is_secret_param(k) { "<redacted>" } else { v };
            (k.to_string(), v.to_string())
        })
        .collect()
}

fn redact_headers(h: &HeaderMap) -> Vec<(String, String)> {
    h.iter()
        .map(|(k, v)| {
            let key = k.as_str().to_string();
            let val = if key.eq_ignore_ascii_case("authorization") {
                "<redacted>".to_string()
            } else {
                v.to_str().unwrap_or("").to_string()
            };
            (key, val)
        })
        .collect()
}

#[derive(Debug, Error)]
pub enum HttpError {
    #[error("invalid URL: {0}")]
    Url(String),
    #[error("request build failed: {0}")]
    Build(String),
    #[error("network error: {0}")]
    Network(String),
    #[error("decode error: {0}, body_snippet: {1}")]
    Decode(String, String),
    #[error("server returned error {status}: {message}, request_id={request_id}")]
    Api {
        status: StatusCode,
        message: String,
        request_id: String,
    },
}

impl HttpError {
    /// HTTP status for [`HttpError::Api`] failures.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            HttpError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Credentials attached to a request.
///
/// ```
/// use chatter_http::Auth;
///
/// let basic = Auth::Basic { user: "id", password: "secret" };
/// assert!(matches!(basic, Auth::Basic { user: "id", .. }));
/// ```
#[derive(Clone, Debug)]
pub enum Auth<'a> {
    /// Authorization: Bearer <token>
    Bearer(&'a str),
    /// Authorization: Basic base64(user:password)
    Basic { user: &'a str, password: &'a str },
}

impl Auth<'_> {
    fn kind(&self) -> &'static str {
        match self {
            Auth::Bearer(_) => "bearer",
            Auth::Basic { .. } => "basic",
        }
    }
}

/// Per-request options.
///
/// ```
/// use chatter_http::{Auth, RequestOpts};
/// use std::time::Duration;
///
/// let opts = RequestOpts {
///     timeout: Some(Duration::from_secs(30)),
///     auth: Some(Auth::Bearer("token")),
///     ..Default::default()
/// };
///
/// assert_eq!(opts.timeout.unwrap().as_secs(), 30);
/// ```
#[derive(Clone, Debug, Default)]
pub struct RequestOpts<'a> {
    pub timeout: Option<Duration>,
    pub auth: Option<Auth<'a>>,
    pub headers: Option<HeaderMap>,
    pub query: Option<Vec<(&'a str, Cow<'a, str>)>>,
}

enum Body<'b> {
    Empty,
    Form(&'b [(&'b str, &'b str)]),
}

#[derive(Clone)]
pub struct HttpClient {
    base: Url,
    inner: Client,
    pub default_timeout: Duration,
}

impl HttpClient {
    /// Construct a client anchored to a base URL.
    ///
    /// ```no_run
    /// use chatter_http::{HttpClient, HttpError};
    /// use std::time::Duration;
    ///
    /// let client = HttpClient::new("https://api.example.com")?;
    /// assert_eq!(client.default_timeout, Duration::from_secs(15));
    /// # Ok::<(), HttpError>(())
    /// ```
    pub fn new(base: &str) -> Result<Self, HttpError> {
        Self::with_connect_timeout(base, Duration::from_secs(5))
    }

    /// Same as [`HttpClient::new`] with an explicit TCP connect timeout.
    pub fn with_connect_timeout(base: &str, connect: Duration) -> Result<Self, HttpError> {
        let base = Url::parse(base).map_err(|e| HttpError::Url(e.to_string()))?;
        let inner = Client::builder()
            .connect_timeout(connect)
            .build()
            .map_err(|e| HttpError::Build(e.to_string()))?;
        Ok(Self {
            base,
            inner,
            default_timeout: Duration::from_secs(15),
        })
    }

    pub fn with_timeout(mut self, dur: Duration) -> Self {
        self.default_timeout = dur;
        self
    }

    /// GET and decode a JSON reply.
    pub async fn get_json<T>(&self, path: &str, opts: RequestOpts<'_>) -> Result<T, HttpError>
    where
        T: DeserializeOwned,
    {
        self.send_json(Method::GET, path, Body::Empty, opts).await
    }

    /// POST an `application/x-www-form-urlencoded` body and decode a JSON reply.
    pub async fn post_form<T>(
        &self,
        path: &str,
        form: &[(&str, &str)],
        opts: RequestOpts<'_>,
    ) -> Result<T, HttpError>
    where
        T: DeserializeOwned,
    {
        self.send_json(Method::POST, path, Body::Form(form), opts)
            .await
    }

    async fn send_json<T>(
        &self,
        method: Method,
        path: &str,
        body: Body<'_>,
        opts: RequestOpts<'_>,
    ) -> Result<T, HttpError>
    where
        T: DeserializeOwned,
    {
        let url = self
            .base
            .join(path)
            .map_err(|e| HttpError::Url(e.to_string()))?;
        let timeout = opts.timeout.unwrap_or(self.default_timeout);
        let auth_kind = opts.auth.as_ref().map_or("none", Auth::kind);

        let mut rb = self
            .inner
            .request(method.clone(), url.clone())
            .timeout(timeout);

        if let Some(q) = &opts.query {
            let pairs: Vec<(&str, &str)> = q.iter().map(|(k, v)| (*k, v.as_ref())).collect();
            rb = rb.query(&pairs);
        }
        if let Body::Form(form) = &body {
            rb = rb.form(form);
        }
        if let Some(hdrs) = opts.headers {
            rb = rb.headers(hdrs);
        }
        match &opts.auth {
            Some(Auth::Bearer(tok)) => {
                rb = rb.bearer_auth(sanitize_api_key(tok)?);
            }
            Some(Auth::Basic { user, password }) => {
                rb = rb.basic_auth(sanitize_api_key(user)?, Some(sanitize_api_key(password)?));
            }
            None => {}
        }

        let redacted_q = opts
            .query
            .as_ref()
            .map(|q| redact_pairs(q.iter().map(|(k, v)| (*k, v.as_ref()))))
            .unwrap_or_default();

        let req_id = uuid::Uuid::new_v4().simple().to_string();
        let host_path = format!("{}{}", url.host_str().unwrap_or("-"), url.path());

        tracing::debug!(
            req_id=%req_id,
            method=%method,
            host_path=%host_path,
            query=?redacted_q,
            timeout_ms=timeout.as_millis() as u64,
            auth_kind,
            has_body=!matches!(body, Body::Empty),
            "http.request.start"
        );

        if raw_enabled() {
            let raw_body = match &body {
                Body::Form(form) => Some(format!("{:?}", redact_pairs(form.iter().copied()))),
                Body::Empty => None,
            };
            tracing::debug!(
                target: "http.raw",
                %req_id,
                %method,
                %host_path,
                query=?redacted_q,
                body=?raw_body,
                "request"
            );
        }

        let t0 = std::time::Instant::now();
        let sent = match rb.send().await {
            Ok(resp) => {
                let status = resp.status();
                let headers = resp.headers().clone();
                resp.bytes().await.map(|b| (status, headers, b))
            }
            Err(err) => Err(err),
        };
        let (status, headers, bytes) = sent.map_err(|err| {
            let message = err.to_string();
            tracing::warn!(req_id=%req_id, message=%message, "http.network_error");
            HttpError::Network(message)
        })?;
        let dur_ms = t0.elapsed().as_millis() as u64;

        let req_hdr_id = headers
            .get("x-request-id")
            .or_else(|| headers.get("x-correlation-id"))
            .and_then(|v| v.to_str().ok())
            .unwrap_or("-")
            .to_string();
        let remain = headers
            .get("x-rate-limit-remaining")
            .or_else(|| headers.get("x-ratelimit-remaining"))
            .and_then(|v| v.to_str().ok());

        tracing::debug!(
            req_id=%req_id,
            %status,
            duration_ms=dur_ms,
            body_len=bytes.len(),
            x_request_id=%req_hdr_id,
            rate_limit.remaining=?remain,
            "http.response.headers"
        );

        if raw_enabled() {
            let end = bytes.len().min(RAW_MAX_BODY);
            tracing::debug!(
                target: "http.raw",
                %req_id,
                %status,
                duration_ms=dur_ms,
                headers=?redact_headers(&headers),
                body=%String::from_utf8_lossy(&bytes[..end]),
                truncated=bytes.len() > RAW_MAX_BODY,
                "response"
            );
        }

        let snippet = snip_body(&bytes);

        if status.is_success() {
            return serde_json::from_slice::<T>(&bytes).map_err(|e| {
                tracing::warn!(
                    req_id=%req_id,
                    serde_line=%e.line(),
                    serde_col=%e.column(),
                    serde_err=%e,
                    body_snippet=%snippet,
                    "http.response.decode_error"
                );
                HttpError::Decode(e.to_string(), snippet)
            });
        }

        let message = extract_error_message(&bytes);
        tracing::warn!(
            req_id=%req_id,
            %status,
            message=%message,
            x_request_id=%req_hdr_id,
            body_snippet=%snippet,
            "http.error"
        );
        Err(HttpError::Api {
            status,
            message,
            request_id: req_hdr_id,
        })
    }
}

/// Best-effort human message out of an error body.
///
/// Understands Google style `{"error":{"message":..,"status":..}}`, Twitter
/// style `{"errors":[..]}` / `{"title":..,"detail":..}`, Reddit style
/// `{"message":..,"error":<code>}` and OAuth `{"error":"invalid_grant"}`.
pub fn extract_error_message(body: &[u8]) -> String {
    #[derive(Deserialize)]
    struct Nested {
        error: NestedDetail,
    }
    #[derive(Deserialize)]
    struct NestedDetail {
        #[serde(default)]
        message: String,
        #[serde(default)]
        status: String,
    }

    #[derive(Deserialize)]
    struct TwErrors {
        errors: Vec<Flat>,
    }

    #[derive(Deserialize, Default)]
    struct Flat {
        #[serde(default)]
        message: String,
        #[serde(default)]
        detail: String,
        #[serde(default)]
        title: String,
        #[serde(default)]
        error: serde_json::Value,
    }

    impl Flat {
        fn best(self) -> Option<String> {
            [self.message, self.detail, self.title]
                .into_iter()
                .find(|s| !s.is_empty())
                .or_else(|| match self.error {
                    serde_json::Value::String(s) if !s.is_empty() => Some(s),
                    serde_json::Value::Number(n) => Some(n.to_string()),
                    _ => None,
                })
        }
    }

    if let Ok(n) = serde_json::from_slice::<Nested>(body) {
        return match (n.error.status.is_empty(), n.error.message.is_empty()) {
            (false, false) => format!("{}: {}", n.error.status, n.error.message),
            (true, false) => n.error.message,
            (false, true) => n.error.status,
            (true, true) => snip_body(body),
        };
    }
    if let Ok(tw) = serde_json::from_slice::<TwErrors>(body) {
        if let Some(msg) = tw.errors.into_iter().next().and_then(Flat::best) {
            return msg;
        }
    }
    if let Ok(flat) = serde_json::from_slice::<Flat>(body) {
        if let Some(msg) = flat.best() {
            return msg;
        }
    }
    snip_body(body)
}

fn snip_body(body: &[u8]) -> String {
    let text = String::from_utf8_lossy(body);
    if text.chars().count() > SNIPPET_MAX {
        let mut snip: String = text.chars().take(SNIPPET_MAX).collect();
        snip.push_str("...");
        snip
    } else {
        text.into_owned()
    }
}

fn sanitize_api_key(raw: &str) -> Result<String, HttpError> {
    let mut s = raw
        .trim()
        .trim_matches(|c| c == '"' || c == '\'')
        .to_string();

    s.retain(|ch| !ch.is_ascii_whitespace());

    if !s.is_ascii() {
        return Err(HttpError::Build("credential contains non-ASCII bytes".into()));
    }
    if s.bytes().any(|b| b < 0x20 || b == 0x7F) {
        return Err(HttpError::Build(
            "credential contains control characters".into(),
        ));
    }

    HeaderValue::from_str(&format!("Bearer {}", s))
        .map_err(|e| HttpError::Build(format!("invalid Authorization header: {e}")))?;
    Ok(s)
}
