//! Request pipeline: a chain of stages, each wrapping the next one.
//!
//! Stages implement [`RequestPolicy`] and are built by [`PolicyFactory`]
//! values from the stage below them plus the shared [`PolicyOptions`]. The
//! innermost stage is the [`HttpTransport`]. [`ErrorPolicy`] sits on top of
//! the whole chain and turns every outcome into a success response or a
//! classified [`Error`](crate::Error).

use std::sync::Arc;

use async_trait::async_trait;

use crate::errors::TransportError;

mod error_policy;
mod logging;
mod request;
mod transport;
mod user_agent;

pub use self::error_policy::{classify_failure, classify_response, ErrorPolicy};
pub use self::logging::LoggingPolicy;
pub use self::request::{ApiRequest, HttpResponse};
pub use self::transport::HttpTransport;
pub use self::user_agent::{default_user_agent, UserAgentPolicy};
pub use reqwest::{Method, StatusCode};

/// A single stage of the send pipeline.
#[async_trait]
pub trait RequestPolicy: Send + Sync {
    /// Sends the request on to the rest of the chain and returns its response.
    async fn send_request(&self, request: ApiRequest) -> Result<HttpResponse, TransportError>;
}

/// Settings shared by every stage built for a client.
#[derive(Clone, Debug)]
pub struct PolicyOptions {
    pub user_agent: String,
}

impl Default for PolicyOptions {
    fn default() -> Self {
        Self {
            user_agent: default_user_agent(),
        }
    }
}

/// Builds a stage on top of the next one.
pub trait PolicyFactory: Send + Sync {
    fn create(&self, next: Arc<dyn RequestPolicy>, options: &PolicyOptions)
        -> Arc<dyn RequestPolicy>;
}

impl<F> PolicyFactory for F
where
    F: Fn(Arc<dyn RequestPolicy>, &PolicyOptions) -> Arc<dyn RequestPolicy> + Send + Sync,
{
    fn create(
        &self,
        next: Arc<dyn RequestPolicy>,
        options: &PolicyOptions,
    ) -> Arc<dyn RequestPolicy> {
        self(next, options)
    }
}

/// Stages every client gets below the caller's own ones, outermost first.
fn default_factories() -> Vec<Arc<dyn PolicyFactory>> {
    let user_agent: Arc<dyn PolicyFactory> =
        Arc::new(|next: Arc<dyn RequestPolicy>, options: &PolicyOptions| {
            Arc::new(UserAgentPolicy::new(next, options)) as Arc<dyn RequestPolicy>
        });
    let logging: Arc<dyn PolicyFactory> =
        Arc::new(|next: Arc<dyn RequestPolicy>, _: &PolicyOptions| {
            Arc::new(LoggingPolicy::new(next)) as Arc<dyn RequestPolicy>
        });
    vec![user_agent, logging]
}

/// Composes `custom` stages, then the default stages, over `transport`.
///
/// The first factory in `custom` ends up outermost, directly below the
/// error policy.
pub fn build_pipeline(
    transport: Arc<dyn RequestPolicy>,
    custom: &[Arc<dyn PolicyFactory>],
    options: &PolicyOptions,
) -> Arc<dyn RequestPolicy> {
    let factories: Vec<Arc<dyn PolicyFactory>> = custom
        .iter()
        .cloned()
        .chain(default_factories())
        .collect();

    factories
        .iter()
        .rev()
        .fold(transport, |next, factory| factory.create(next, options))
}
