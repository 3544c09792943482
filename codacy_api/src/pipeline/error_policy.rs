use std::sync::Arc;

use super::{ApiRequest, HttpResponse, RequestPolicy};
use crate::errors::{Error, TransportError};
use crate::types::ErrorEnvelope;

/// Outermost pipeline stage: turns every outcome of the chain below into
/// either a success response or exactly one classified [`Error`].
///
/// Holds nothing but the next stage, so one instance serves any number of
/// concurrent requests.
///
/// Not a [`RequestPolicy`]: it returns the classified [`Error`] instead of a
/// [`TransportError`], so [`Client`](crate::Client) wraps the composed chain
/// with it directly rather than registering it as a factory.
pub struct ErrorPolicy {
    next: Arc<dyn RequestPolicy>,
}

impl ErrorPolicy {
    pub fn new(next: Arc<dyn RequestPolicy>) -> Self {
        Self { next }
    }

    pub async fn send_request(&self, request: ApiRequest) -> Result<HttpResponse, Error> {
        match self.next.send_request(request).await {
            Ok(response) => classify_response(response),
            Err(err) => Err(classify_failure(err)),
        }
    }
}

/// Classifies a failure raised before any response existed.
pub fn classify_failure(err: TransportError) -> Error {
    if err.is_aborted() {
        tracing::debug!("Request aborted by caller");
        Error::aborted(err)
    } else {
        tracing::error!("API request failed: {}", err);
        Error::transport_unavailable(err)
    }
}

/// Passes success responses through untouched and classifies everything else.
///
/// An error envelope in the body wins over the status code: a 200 carrying
/// `{error, message}` is still an error.
pub fn classify_response(response: HttpResponse) -> Result<HttpResponse, Error> {
    let envelope = response
        .parsed_body
        .as_ref()
        .and_then(ErrorEnvelope::from_body);

    if let Some(envelope) = envelope {
        let status = response.status.as_u16();
        let err = match envelope.tag() {
            Ok(tag) => Error::for_tag(tag, envelope, response),
            Err(_) => Error::unexpected(envelope, response),
        };
        tracing::warn!(
            status,
            kind = %err.kind(),
            error_type = err.error_type(),
            "API responded with an error: {}",
            err.message()
        );
        return Err(err);
    }

    if !response.is_success() {
        // the server failed without sending an error body
        let err = Error::malformed(response);
        tracing::warn!(kind = %err.kind(), "{}", err.message());
        return Err(err);
    }

    Ok(response)
}
