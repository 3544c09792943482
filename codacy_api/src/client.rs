//! HTTP client for the Codacy API v3.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tokio_util::sync::CancellationToken;
use url::Url;

use crate::{
    pipeline::{
        build_pipeline, default_user_agent, ApiRequest, ErrorPolicy, HttpResponse, HttpTransport,
        PolicyFactory, PolicyOptions,
    },
    query::{CursorQuery, NoQuery, Query},
    types::{Organization, PaginatedResponse, Provider, Repository, Response, User},
    Error,
};

/// Production API root.
pub const DEFAULT_BASE_URL: &str = "https://app.codacy.com/api/v3";

/// Header carrying the account API token.
const API_TOKEN_HEADER: &str = "api-token";

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Errors raised while building a [`Client`].
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("Invalid base URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },
    #[error("API token contains characters not allowed in a header")]
    InvalidToken(#[from] reqwest::header::InvalidHeaderValue),
    #[error("Failed to build HTTP client")]
    Http(#[from] reqwest::Error),
}

/// Settings for a [`Client`].
#[derive(Clone)]
pub struct ClientOptions {
    /// API root. Defaults to [`DEFAULT_BASE_URL`].
    pub base_url: String,
    /// Account API token, sent in the `api-token` header.
    pub api_token: Option<String>,
    /// Timeout for a whole request, body included.
    pub timeout: Duration,
    pub user_agent: String,
    /// Extra pipeline stages, outermost first. They run below the error
    /// policy and above the default stages.
    pub policies: Vec<Arc<dyn PolicyFactory>>,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_token: None,
            timeout: DEFAULT_TIMEOUT,
            user_agent: default_user_agent(),
            policies: Vec::new(),
        }
    }
}

impl fmt::Debug for ClientOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientOptions")
            .field("base_url", &self.base_url)
            .field("api_token", &self.api_token.as_ref().map(|_| "<redacted>"))
            .field("timeout", &self.timeout)
            .field("user_agent", &self.user_agent)
            .field("policies", &self.policies.len())
            .finish()
    }
}

impl ClientOptions {
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_api_token(mut self, token: impl Into<String>) -> Self {
        self.api_token = Some(token.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Registers an extra pipeline stage below the previously added ones.
    pub fn with_policy(mut self, factory: impl PolicyFactory + 'static) -> Self {
        self.policies.push(Arc::new(factory));
        self
    }
}

/// HTTP client for the Codacy API.
///
/// Every request goes through the error policy, so operations either return
/// their model or a classified [`Error`]. Cloning is cheap and clones share
/// the connection pool.
#[derive(Clone)]
pub struct Client {
    base_url: Url,
    policy: Arc<ErrorPolicy>,
    abort_signal: Option<CancellationToken>,
}

impl Client {
    pub fn new(options: ClientOptions) -> Result<Self, ConfigError> {
        let base_url = parse_base_url(&options.base_url)?;

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        if let Some(token) = &options.api_token {
            let mut value = HeaderValue::from_str(token)?;
            value.set_sensitive(true);
            headers.insert(API_TOKEN_HEADER, value);
        }

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(options.timeout)
            .build()?;

        let policy_options = PolicyOptions {
            user_agent: options.user_agent.clone(),
        };
        let head = build_pipeline(
            Arc::new(HttpTransport::new(http)),
            &options.policies,
            &policy_options,
        );

        tracing::debug!("Created client for {}", base_url);
        Ok(Self {
            base_url,
            policy: Arc::new(ErrorPolicy::new(head)),
            abort_signal: None,
        })
    }

    /// Creates a client with default options and a custom base URL. Used for testing with wiremock.
    pub fn with_base_url(base_url: &str) -> Result<Self, ConfigError> {
        Self::new(ClientOptions::default().with_base_url(base_url))
    }

    /// Returns a clone whose requests are aborted when `token` is cancelled.
    pub fn with_cancellation(&self, token: CancellationToken) -> Self {
        Self {
            abort_signal: Some(token),
            ..self.clone()
        }
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Builds the URL for an endpoint from raw path segments, percent-encoding each one.
    pub fn endpoint(&self, segments: &[&str], query: &impl Query) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        query.add_to_url(&url)
    }

    /// Sends a request through the pipeline.
    ///
    /// Requests without their own abort signal get the client's, if any.
    pub async fn send(&self, mut request: ApiRequest) -> Result<HttpResponse, Error> {
        if request.abort_signal.is_none() {
            request.abort_signal = self.abort_signal.clone();
        }
        self.policy.send_request(request).await
    }

    async fn get<T: DeserializeOwned>(&self, url: Url) -> Result<T, Error> {
        let response = self.send(ApiRequest::get(url)).await?;
        decode(response)
    }

    /// Fetches the authenticated user.
    pub async fn get_user(&self) -> Result<Response<User>, Error> {
        self.get(self.endpoint(&["user"], &NoQuery)).await
    }

    /// Lists the organizations the authenticated user belongs to on `provider`.
    pub async fn list_user_organizations(
        &self,
        provider: Provider,
        query: &CursorQuery,
    ) -> Result<PaginatedResponse<Organization>, Error> {
        let url = self.endpoint(&["user", "organizations", provider.as_str()], query);
        self.get(url).await
    }

    /// Fetches a single organization.
    pub async fn get_organization(
        &self,
        provider: Provider,
        organization: &str,
    ) -> Result<Response<Organization>, Error> {
        let url = self.endpoint(
            &["organizations", provider.as_str(), organization],
            &NoQuery,
        );
        self.get(url).await
    }

    /// Lists the repositories of an organization.
    pub async fn list_organization_repositories(
        &self,
        provider: Provider,
        organization: &str,
        query: &CursorQuery,
    ) -> Result<PaginatedResponse<Repository>, Error> {
        let url = self.endpoint(
            &["organizations", provider.as_str(), organization, "repositories"],
            query,
        );
        self.get(url).await
    }

    /// Fetches a single repository.
    pub async fn get_repository(
        &self,
        provider: Provider,
        organization: &str,
        repository: &str,
    ) -> Result<Response<Repository>, Error> {
        let url = self.endpoint(
            &[
                "organizations",
                provider.as_str(),
                organization,
                "repositories",
                repository,
            ],
            &NoQuery,
        );
        self.get(url).await
    }
}

fn parse_base_url(base_url: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(base_url).map_err(|e| ConfigError::InvalidBaseUrl {
        url: base_url.to_string(),
        reason: e.to_string(),
    })?;
    if url.cannot_be_a_base() {
        return Err(ConfigError::InvalidBaseUrl {
            url: base_url.to_string(),
            reason: "URL cannot be used as a base".to_string(),
        });
    }
    Ok(url)
}

/// Decodes a success response into the operation's model.
fn decode<T: DeserializeOwned>(response: HttpResponse) -> Result<T, Error> {
    let null = serde_json::Value::Null;
    let decoded = T::deserialize(response.parsed_body.as_ref().unwrap_or(&null));
    match decoded {
        Ok(value) => Ok(value),
        Err(e) => {
            tracing::error!(
                "Failed to decode response (status {}): {}",
                response.status,
                e
            );
            Err(Error::undecodable(response, e))
        }
    }
}
