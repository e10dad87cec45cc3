//! HTTP client wrapper for the Frame backend.
//!
//! [`ApiClient`] owns everything every call needs: the base URL, the bearer
//! token store, the request deadline and the error classification. The
//! actual I/O goes through a [`Transport`]: [`GlooTransport`] in the
//! browser, a scripted fake in tests.
//!
//! # Error classification
//!
//! ```text
//! response received ──► 2xx ─────────────► Ok
//!                   ├─► 401 ─────────────► clear token, hook, Unauthorized
//!                   └─► other ───────────► ServerValidation / Server (detail)
//! no response ──────► network / timeout ─► probe /health ─► Network / Timeout
//!                   └─► anything else ───► Unknown
//! ```

use std::cell::RefCell;
use std::fmt;
use std::future::Future;
use std::rc::Rc;

use futures::future::{select, Either};
use gloo_net::http::Request;
use gloo_timers::future::TimeoutFuture;
use serde::de::DeserializeOwned;
use serde_json::Value;
use web_sys::{AbortController, FormData, UrlSearchParams};

use crate::config::{API_URL, HEALTH_PATH, PROBE_TIMEOUT_MS, REQUEST_TIMEOUT_MS};
use crate::error::{ApiError, ApiResult, ErrorDetail};
use crate::services::storage::{LocalTokenStore, TokenStore};

// =============================================================================
// Requests and responses
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Delete,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Delete => "DELETE",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One part of a multipart form.
#[derive(Debug, Clone, PartialEq)]
pub enum FormPart<F> {
    Text {
        name: String,
        value: String,
    },
    File {
        name: String,
        file: F,
        file_name: String,
    },
}

/// Request payload. The encoding follows the variant.
#[derive(Debug, Clone, PartialEq)]
pub enum Body<F> {
    Empty,
    /// `application/json`
    Json(Value),
    /// `application/x-www-form-urlencoded`
    Form(Vec<(String, String)>),
    /// `multipart/form-data`, boundary chosen by the browser.
    Multipart(Vec<FormPart<F>>),
}

#[derive(Debug, Clone)]
pub struct HttpRequest<F> {
    pub method: Method,
    pub url: String,
    pub bearer: Option<String>,
    pub body: Body<F>,
    pub timeout_ms: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

// =============================================================================
// Transport
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportErrorKind {
    Network,
    Timeout,
    Unknown,
}

/// A request that never produced a response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportError {
    pub kind: TransportErrorKind,
    pub message: String,
}

impl TransportError {
    pub fn new(kind: TransportErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// Classify a failure from its error text.
    pub fn from_message(message: impl Into<String>) -> Self {
        let message = message.into();
        Self {
            kind: classify_failure(&message),
            message,
        }
    }

    pub fn timed_out(timeout_ms: u32) -> Self {
        Self::new(
            TransportErrorKind::Timeout,
            format!("timeout of {}ms exceeded", timeout_ms),
        )
    }
}

/// Map a transport error message (or code) to a failure kind.
pub fn classify_failure(message: &str) -> TransportErrorKind {
    const NETWORK_MARKERS: &[&str] = &[
        "Failed to fetch",
        "NetworkError",
        "Network Error",
        "Load failed",
        "ERR_NETWORK",
        "ECONNREFUSED",
    ];

    if NETWORK_MARKERS.iter().any(|marker| message.contains(marker)) {
        return TransportErrorKind::Network;
    }
    let lower = message.to_ascii_lowercase();
    if message.contains("ETIMEDOUT") || lower.contains("timed out") || lower.contains("timeout") {
        return TransportErrorKind::Timeout;
    }
    TransportErrorKind::Unknown
}

/// Sends requests to the backend.
#[allow(async_fn_in_trait)]
pub trait Transport {
    /// Local file handle carried by multipart bodies.
    type File: Clone;

    async fn send(&self, request: HttpRequest<Self::File>) -> Result<HttpResponse, TransportError>;

    /// `true` when `url` answers with a success status.
    async fn probe(&self, url: &str) -> bool;
}

/// Browser `fetch` transport built on gloo-net.
#[derive(Debug, Clone, Copy, Default)]
pub struct GlooTransport;

impl Transport for GlooTransport {
    type File = web_sys::File;

    async fn send(&self, request: HttpRequest<web_sys::File>) -> Result<HttpResponse, TransportError> {
        let controller = AbortController::new().map_err(|e| js_failure("AbortController", e))?;
        let signal = controller.signal();

        let builder = match request.method {
            Method::Get => Request::get(&request.url),
            Method::Post => Request::post(&request.url),
            Method::Delete => Request::delete(&request.url),
        }
        .abort_signal(Some(&signal));

        let builder = match &request.bearer {
            Some(token) => builder.header("Authorization", &format!("Bearer {}", token)),
            None => builder,
        };

        let prepared = match request.body {
            Body::Empty => builder.build(),
            Body::Json(value) => builder.json(&value),
            Body::Form(pairs) => {
                let params = UrlSearchParams::new().map_err(|e| js_failure("URLSearchParams", e))?;
                for (name, value) in &pairs {
                    params.append(name, value);
                }
                builder
                    .header("Content-Type", "application/x-www-form-urlencoded")
                    .body(params)
            }
            Body::Multipart(parts) => {
                let form = FormData::new().map_err(|e| js_failure("FormData", e))?;
                for part in parts {
                    match part {
                        FormPart::Text { name, value } => form.append_with_str(&name, &value),
                        FormPart::File {
                            name,
                            file,
                            file_name,
                        } => form.append_with_blob_and_filename(&name, &file, &file_name),
                    }
                    .map_err(|e| js_failure("FormData.append", e))?;
                }
                builder.body(form)
            }
        }
        .map_err(|e| {
            TransportError::new(
                TransportErrorKind::Unknown,
                format!("Failed to build request: {}", e),
            )
        })?;

        // The deadline covers the body read as well as the headers.
        let exchange = async {
            let response = prepared
                .send()
                .await
                .map_err(|e| TransportError::from_message(e.to_string()))?;
            let status = response.status();
            let body = response
                .text()
                .await
                .map_err(|e| TransportError::from_message(e.to_string()))?;
            Ok(HttpResponse { status, body })
        };

        match with_deadline(exchange, request.timeout_ms).await {
            Some(result) => result,
            None => {
                controller.abort();
                Err(TransportError::timed_out(request.timeout_ms))
            }
        }
    }

    async fn probe(&self, url: &str) -> bool {
        match with_deadline(Request::get(url).send(), PROBE_TIMEOUT_MS).await {
            Some(Ok(response)) => response.ok(),
            _ => false,
        }
    }
}

fn js_failure(what: &str, error: wasm_bindgen::JsValue) -> TransportError {
    TransportError::new(
        TransportErrorKind::Unknown,
        format!("Failed to create {}: {:?}", what, error),
    )
}

/// Race `future` against a browser timer. `None` when the timer wins.
pub async fn with_deadline<F: Future>(future: F, timeout_ms: u32) -> Option<F::Output> {
    race_deadline(future, TimeoutFuture::new(timeout_ms)).await
}

async fn race_deadline<F, D>(future: F, deadline: D) -> Option<F::Output>
where
    F: Future,
    D: Future<Output = ()>,
{
    match select(Box::pin(future), Box::pin(deadline)).await {
        Either::Left((output, _)) => Some(output),
        Either::Right(((), _)) => None,
    }
}

// =============================================================================
// API client
// =============================================================================

type UnauthorizedHook = Rc<dyn Fn()>;

struct ClientInner<T> {
    base_url: String,
    transport: T,
    tokens: Rc<dyn TokenStore>,
    on_unauthorized: RefCell<Option<UnauthorizedHook>>,
}

/// Authenticated, classifying client for the backend REST API.
///
/// Cheap to clone; clones share the transport, token store and hook.
pub struct ApiClient<T: Transport> {
    inner: Rc<ClientInner<T>>,
}

impl<T: Transport> Clone for ApiClient<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

/// Client used by the application.
pub type WebApi = ApiClient<GlooTransport>;

impl ApiClient<GlooTransport> {
    /// Client for [`API_URL`] with the token in `localStorage`.
    pub fn browser() -> Self {
        Self::new(API_URL, GlooTransport, Rc::new(LocalTokenStore::default()))
    }
}

impl<T: Transport> ApiClient<T> {
    pub fn new(base_url: impl Into<String>, transport: T, tokens: Rc<dyn TokenStore>) -> Self {
        Self {
            inner: Rc::new(ClientInner {
                base_url: base_url.into().trim_end_matches('/').to_string(),
                transport,
                tokens,
                on_unauthorized: RefCell::new(None),
            }),
        }
    }

    pub fn tokens(&self) -> &dyn TokenStore {
        self.inner.tokens.as_ref()
    }

    /// Called after a 401 has cleared the stored token.
    pub fn set_unauthorized_hook(&self, hook: impl Fn() + 'static) {
        *self.inner.on_unauthorized.borrow_mut() = Some(Rc::new(hook));
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.inner.base_url, path)
    }

    /// Send a request and classify any failure.
    pub async fn request(&self, method: Method, path: &str, body: Body<T::File>) -> ApiResult<HttpResponse> {
        let request = HttpRequest {
            method,
            url: self.url(path),
            bearer: self.inner.tokens.load(),
            body,
            timeout_ms: REQUEST_TIMEOUT_MS,
        };
        log::debug!("{} {}", method, request.url);

        match self.inner.transport.send(request).await {
            Ok(response) if response.is_success() => Ok(response),
            Ok(response) => Err(self.reject(response)),
            Err(failure) => Err(self.classify_transport(failure).await),
        }
    }

    /// Send a request and decode the JSON response.
    pub async fn send_json<R: DeserializeOwned>(&self, method: Method, path: &str, body: Body<T::File>) -> ApiResult<R> {
        let response = self.request(method, path, body).await?;
        decode(&response)
    }

    pub async fn get_json<R: DeserializeOwned>(&self, path: &str) -> ApiResult<R> {
        self.send_json(Method::Get, path, Body::Empty).await
    }

    fn reject(&self, response: HttpResponse) -> ApiError {
        let detail = ErrorDetail::from_body(&response.body);
        if response.status == 401 {
            log::warn!("Authentication rejected, clearing stored token");
            self.inner.tokens.clear();
            let hook = self.inner.on_unauthorized.borrow().clone();
            if let Some(hook) = hook {
                hook();
            }
            return ApiError::Unauthorized {
                detail: detail.map(|d| d.to_message()),
            };
        }
        classify_response(response.status, detail)
    }

    async fn classify_transport(&self, failure: TransportError) -> ApiError {
        log::error!("No response from server ({:?}): {}", failure.kind, failure.message);
        if failure.kind == TransportErrorKind::Unknown {
            return ApiError::Unknown(failure.message);
        }

        let backend_reachable = self.inner.transport.probe(&self.url(HEALTH_PATH)).await;
        let backend = self.inner.base_url.clone();
        match failure.kind {
            TransportErrorKind::Timeout => ApiError::Timeout {
                backend,
                backend_reachable,
            },
            _ => ApiError::Network {
                backend,
                backend_reachable,
                message: failure.message,
            },
        }
    }
}

/// Classify a non-401 error response.
pub fn classify_response(status: u16, detail: Option<ErrorDetail>) -> ApiError {
    let validation = status == 422 || detail.as_ref().is_some_and(ErrorDetail::is_validation);
    let message = detail
        .map(|d| d.to_message())
        .unwrap_or_else(|| format!("Request failed with status {}", status));
    if validation {
        ApiError::ServerValidation { status, message }
    } else {
        ApiError::Server { status, message }
    }
}

/// Decode a successful JSON response.
pub fn decode<R: DeserializeOwned>(response: &HttpResponse) -> ApiResult<R> {
    serde_json::from_str(&response.body).map_err(|e| ApiError::Decode(e.to_string()))
}
