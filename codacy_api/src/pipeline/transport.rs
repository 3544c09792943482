use async_trait::async_trait;
use reqwest::header::{HeaderMap, CONTENT_TYPE};
use serde_json::Value;

use super::{ApiRequest, HttpResponse, RequestPolicy};
use crate::errors::TransportError;

/// Innermost stage: performs the HTTP round-trip with `reqwest`.
///
/// Reads the whole body and parses it when the response declares a JSON
/// media type. Races the round-trip against the request's abort signal.
#[derive(Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }

    async fn round_trip(&self, request: ApiRequest) -> Result<HttpResponse, TransportError> {
        let mut builder = self
            .client
            .request(request.method, request.url)
            .headers(request.headers);
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await.map_err(|e| {
            tracing::error!("Failed to send request: {}", e);
            TransportError::send(e)
        })?;

        let status = response.status();
        let headers = response.headers().clone();
        let body_text = response.text().await.map_err(|e| {
            tracing::error!("Failed to read response body: {}", e);
            TransportError::send(e)
        })?;

        let parsed_body = deserialize_body(&headers, &body_text)?;

        Ok(HttpResponse {
            status,
            headers,
            body_text,
            parsed_body,
        })
    }
}

#[async_trait]
impl RequestPolicy for HttpTransport {
    async fn send_request(&self, mut request: ApiRequest) -> Result<HttpResponse, TransportError> {
        match request.abort_signal.take() {
            Some(token) => {
                tokio::select! {
                    biased;
                    _ = token.cancelled() => Err(TransportError::aborted()),
                    result = self.round_trip(request) => result,
                }
            }
            None => self.round_trip(request).await,
        }
    }
}

fn is_json(headers: &HeaderMap) -> bool {
    headers
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|ct| {
            let mime = ct.split(';').next().unwrap_or_default().trim();
            mime.eq_ignore_ascii_case("application/json")
                || mime.to_ascii_lowercase().ends_with("+json")
        })
        .unwrap_or(false)
}

fn deserialize_body(headers: &HeaderMap, body: &str) -> Result<Option<Value>, TransportError> {
    if body.trim().is_empty() || !is_json(headers) {
        return Ok(None);
    }
    serde_json::from_str(body).map(Some).map_err(|e| {
        let snippet: String = body.chars().take(200).collect();
        tracing::error!("Failed to parse JSON body: {} | body: {}", e, snippet);
        TransportError::parse(e)
    })
}
