use std::sync::Arc;

use async_trait::async_trait;
use reqwest::header::{HeaderValue, USER_AGENT};

use super::{ApiRequest, HttpResponse, PolicyOptions, RequestPolicy};
use crate::errors::TransportError;

const DEFAULT_USER_AGENT: &str = concat!("codacy-api-rust/", env!("CARGO_PKG_VERSION"));

/// User agent sent when the client is not configured with one.
pub fn default_user_agent() -> String {
    DEFAULT_USER_AGENT.to_string()
}

/// Sets the `User-Agent` header on requests that do not carry one.
pub struct UserAgentPolicy {
    next: Arc<dyn RequestPolicy>,
    user_agent: HeaderValue,
}

impl UserAgentPolicy {
    pub fn new(next: Arc<dyn RequestPolicy>, options: &PolicyOptions) -> Self {
        let user_agent = HeaderValue::from_str(&options.user_agent).unwrap_or_else(|e| {
            tracing::warn!(
                "Invalid user agent {:?} ({}), using the default",
                options.user_agent,
                e
            );
            HeaderValue::from_static(DEFAULT_USER_AGENT)
        });
        Self { next, user_agent }
    }
}

#[async_trait]
impl RequestPolicy for UserAgentPolicy {
    async fn send_request(&self, mut request: ApiRequest) -> Result<HttpResponse, TransportError> {
        if !request.headers.contains_key(USER_AGENT) {
            request.headers.insert(USER_AGENT, self.user_agent.clone());
        }
        self.next.send_request(request).await
    }
}
