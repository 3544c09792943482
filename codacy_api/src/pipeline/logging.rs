use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use tracing::Instrument;

use super::{ApiRequest, HttpResponse, RequestPolicy};
use crate::errors::TransportError;

/// Emits a span per request plus debug events for its outcome.
pub struct LoggingPolicy {
    next: Arc<dyn RequestPolicy>,
}

impl LoggingPolicy {
    pub fn new(next: Arc<dyn RequestPolicy>) -> Self {
        Self { next }
    }
}

#[async_trait]
impl RequestPolicy for LoggingPolicy {
    async fn send_request(&self, request: ApiRequest) -> Result<HttpResponse, TransportError> {
        let span = tracing::debug_span!(
            "http_request",
            method = %request.method,
            url = %request.url,
        );

        async move {
            tracing::debug!("Sending request");
            let started = Instant::now();
            let result = self.next.send_request(request).await;
            let elapsed_ms = started.elapsed().as_millis() as u64;
            match &result {
                Ok(response) => tracing::debug!(
                    status = response.status.as_u16(),
                    elapsed_ms,
                    body_len = response.body_text.len(),
                    "Received response"
                ),
                Err(e) => tracing::debug!(code = %e.code(), elapsed_ms, "Request failed: {}", e),
            }
            result
        }
        .instrument(span)
        .await
    }
}
