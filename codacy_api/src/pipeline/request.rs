//! Request and response values passed along the pipeline.

use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::{Method, StatusCode};
use serde_json::Value;
use tokio_util::sync::CancellationToken;
use url::Url;

/// An outgoing request as seen by pipeline stages.
#[derive(Clone, Debug)]
pub struct ApiRequest {
    pub method: Method,
    pub url: Url,
    pub headers: HeaderMap,
    /// JSON body, sent with `Content-Type: application/json`.
    pub body: Option<Value>,
    /// Cancelling this token aborts the request while it is in flight.
    pub abort_signal: Option<CancellationToken>,
}

impl ApiRequest {
    pub fn new(method: Method, url: Url) -> Self {
        Self {
            method,
            url,
            headers: HeaderMap::new(),
            body: None,
            abort_signal: None,
        }
    }

    pub fn get(url: Url) -> Self {
        Self::new(Method::GET, url)
    }

    pub fn with_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    pub fn with_json(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    pub fn with_abort_signal(mut self, token: CancellationToken) -> Self {
        self.abort_signal = Some(token);
        self
    }
}

/// A settled HTTP response with its body already read.
#[derive(Clone, Debug, PartialEq)]
pub struct HttpResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    /// Raw body text, kept for diagnostics.
    pub body_text: String,
    /// Body parsed as JSON. `None` for empty or non-JSON bodies.
    pub parsed_body: Option<Value>,
}

impl HttpResponse {
    pub fn new(status: StatusCode) -> Self {
        Self {
            status,
            headers: HeaderMap::new(),
            body_text: String::new(),
            parsed_body: None,
        }
    }

    pub fn with_json(mut self, body: Value) -> Self {
        self.body_text = body.to_string();
        self.parsed_body = Some(body);
        self
    }

    pub fn with_text(mut self, body: impl Into<String>) -> Self {
        self.body_text = body.into();
        self
    }

    /// True for statuses in `[200, 300)`.
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }
}
