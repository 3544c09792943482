//! Error types for the API client.
//!
//! Every failed request surfaces as a single [`Error`] whose [`ErrorKind`]
//! tells the caller what went wrong: a condition the server reported through
//! its error envelope, a server contract violation, or a failure below the
//! HTTP layer.

use std::fmt;

use crate::pipeline::HttpResponse;
use crate::types::{ErrorEnvelope, ErrorTag, ProblemLink};

/// Error type reported for failures that did not come with a wire tag.
const API_ERROR_TYPE: &str = "ApiError";
const ABORTED_ERROR_TYPE: &str = "AbortedRequest";

const ABORTED_MESSAGE: &str = "Request was aborted.";
const UNAVAILABLE_MESSAGE: &str =
    "Codacy API was not found, is not available, or responded with an unexpected behaviour.";

/// The closed set of error kinds a request can fail with.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    BadRequest,
    Unauthorized,
    PaymentRequired,
    Forbidden,
    NotFound,
    Conflict,
    InternalServerError,
    /// The server sent an error envelope with a tag this client does not know.
    Unexpected,
    /// The server answered with a failure status but no error envelope.
    Malformed,
    /// The caller cancelled the request before it settled.
    Aborted,
    /// The API could not be reached or its answer could not be read.
    TransportUnavailable,
}

impl ErrorKind {
    pub const ALL: [ErrorKind; 11] = [
        ErrorKind::BadRequest,
        ErrorKind::Unauthorized,
        ErrorKind::PaymentRequired,
        ErrorKind::Forbidden,
        ErrorKind::NotFound,
        ErrorKind::Conflict,
        ErrorKind::InternalServerError,
        ErrorKind::Unexpected,
        ErrorKind::Malformed,
        ErrorKind::Aborted,
        ErrorKind::TransportUnavailable,
    ];

    /// Stable kebab-case identifier, e.g. `not-found`.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::BadRequest => "bad-request",
            ErrorKind::Unauthorized => "unauthorized",
            ErrorKind::PaymentRequired => "payment-required",
            ErrorKind::Forbidden => "forbidden",
            ErrorKind::NotFound => "not-found",
            ErrorKind::Conflict => "conflict",
            ErrorKind::InternalServerError => "internal-server-error",
            ErrorKind::Unexpected => "unexpected",
            ErrorKind::Malformed => "malformed",
            ErrorKind::Aborted => "aborted",
            ErrorKind::TransportUnavailable => "transport-unavailable",
        }
    }

    /// Stable error name, e.g. `NotFoundApiError`.
    pub fn name(&self) -> &'static str {
        match self {
            ErrorKind::BadRequest => "BadRequestApiError",
            ErrorKind::Unauthorized => "UnauthorizedApiError",
            ErrorKind::PaymentRequired => "PaymentRequiredApiError",
            ErrorKind::Forbidden => "ForbiddenApiError",
            ErrorKind::NotFound => "NotFoundApiError",
            ErrorKind::Conflict => "ConflictApiError",
            ErrorKind::InternalServerError => "InternalServerApiError",
            ErrorKind::Unexpected => "UnexpectedApiError",
            ErrorKind::Malformed => "MalformedApiError",
            ErrorKind::Aborted => "AbortedRequest",
            ErrorKind::TransportUnavailable => "ApiRequestFailed",
        }
    }

    /// True for failures that happened before a response existed.
    pub fn is_transport(&self) -> bool {
        matches!(self, ErrorKind::Aborted | ErrorKind::TransportUnavailable)
    }

    /// True when the server broke its own error contract.
    pub fn is_contract_violation(&self) -> bool {
        matches!(self, ErrorKind::Malformed | ErrorKind::Unexpected)
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<ErrorTag> for ErrorKind {
    fn from(tag: ErrorTag) -> Self {
        match tag {
            ErrorTag::BadRequest => ErrorKind::BadRequest,
            ErrorTag::Unauthorized => ErrorKind::Unauthorized,
            ErrorTag::PaymentRequired => ErrorKind::PaymentRequired,
            ErrorTag::Forbidden => ErrorKind::Forbidden,
            ErrorTag::NotFound => ErrorKind::NotFound,
            ErrorTag::Conflict => ErrorKind::Conflict,
            ErrorTag::InternalServerError => ErrorKind::InternalServerError,
        }
    }
}

/// Code identifying why the transport could not produce a response.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TransportErrorCode {
    /// The caller cancelled the request.
    RequestAborted,
    /// Connecting, sending, or reading the response failed.
    RequestSend,
    /// The response declared a JSON body that does not parse.
    Parse,
}

impl TransportErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransportErrorCode::RequestAborted => "REQUEST_ABORTED_ERROR",
            TransportErrorCode::RequestSend => "REQUEST_SEND_ERROR",
            TransportErrorCode::Parse => "PARSE_ERROR",
        }
    }
}

impl fmt::Display for TransportErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Failure raised by a pipeline stage before a response was obtained.
#[derive(thiserror::Error, Debug)]
#[error("{code}: {message}")]
pub struct TransportError {
    code: TransportErrorCode,
    message: String,
    #[source]
    source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl TransportError {
    pub fn new(code: TransportErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            source: None,
        }
    }

    /// Attaches the underlying error that caused this failure.
    pub fn with_source(
        mut self,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        self.source = Some(source.into());
        self
    }

    pub fn aborted() -> Self {
        Self::new(
            TransportErrorCode::RequestAborted,
            "The request was cancelled by the caller.",
        )
    }

    pub fn send(err: reqwest::Error) -> Self {
        let message = if err.is_timeout() {
            "The request timed out."
        } else if err.is_connect() {
            "Failed to connect to the server."
        } else {
            "Failed to send the request or read the response."
        };
        Self::new(TransportErrorCode::RequestSend, message).with_source(err)
    }

    pub fn parse(err: serde_json::Error) -> Self {
        Self::new(
            TransportErrorCode::Parse,
            format!("Error {} occurred while parsing the response body.", err),
        )
        .with_source(err)
    }

    pub fn code(&self) -> TransportErrorCode {
        self.code
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn is_aborted(&self) -> bool {
        self.code == TransportErrorCode::RequestAborted
    }
}

/// A classified request failure.
///
/// Carries the [`ErrorKind`], the message to show to users, the error tag it
/// originated from, and any remediation links the server supplied. Failures
/// that produced a response keep it in [`Error::raw_response`]; failures
/// below the HTTP layer keep the transport error as [`Error::cause`].
#[derive(thiserror::Error, Debug)]
#[error("{message}")]
pub struct Error {
    kind: ErrorKind,
    message: String,
    error_type: String,
    actions: Vec<ProblemLink>,
    raw_response: Option<HttpResponse>,
    #[source]
    cause: Option<TransportError>,
}

macro_rules! envelope_constructors {
    ($($(#[$doc:meta])* $fn_name:ident => $kind:ident),* $(,)?) => {
        $(
            $(#[$doc])*
            pub fn $fn_name(envelope: ErrorEnvelope, response: HttpResponse) -> Self {
                Self::from_envelope(ErrorKind::$kind, envelope, response)
            }
        )*
    };
}

impl Error {
    envelope_constructors! {
        /// The server rejected the request as invalid.
        bad_request => BadRequest,
        /// The request carried no valid credentials.
        unauthorized => Unauthorized,
        /// The operation needs a paid plan.
        payment_required => PaymentRequired,
        /// The credentials do not grant access to the resource.
        forbidden => Forbidden,
        /// The resource does not exist.
        not_found => NotFound,
        /// The request conflicts with the current state of the resource.
        conflict => Conflict,
        /// The server failed while handling the request.
        internal_server_error => InternalServerError,
        /// The envelope carried a tag outside the known set.
        unexpected => Unexpected,
    }

    fn from_envelope(kind: ErrorKind, envelope: ErrorEnvelope, response: HttpResponse) -> Self {
        Self {
            kind,
            message: envelope.message,
            error_type: envelope.error,
            actions: envelope.actions,
            raw_response: Some(response),
            cause: None,
        }
    }

    /// Builds the error for a recognized wire tag.
    pub fn for_tag(tag: ErrorTag, envelope: ErrorEnvelope, response: HttpResponse) -> Self {
        match tag {
            ErrorTag::BadRequest => Self::bad_request(envelope, response),
            ErrorTag::Unauthorized => Self::unauthorized(envelope, response),
            ErrorTag::PaymentRequired => Self::payment_required(envelope, response),
            ErrorTag::Forbidden => Self::forbidden(envelope, response),
            ErrorTag::NotFound => Self::not_found(envelope, response),
            ErrorTag::Conflict => Self::conflict(envelope, response),
            ErrorTag::InternalServerError => Self::internal_server_error(envelope, response),
        }
    }

    /// The server answered with a failure status and no error envelope.
    pub fn malformed(response: HttpResponse) -> Self {
        let message = format!(
            "The API responded with an error code {}. The result was not properly formed by the API.",
            response.status.as_u16()
        );
        Self {
            kind: ErrorKind::Malformed,
            message,
            error_type: API_ERROR_TYPE.to_string(),
            actions: Vec::new(),
            raw_response: Some(response),
            cause: None,
        }
    }

    /// A success response whose body does not match the expected model.
    pub fn undecodable(response: HttpResponse, err: serde_json::Error) -> Self {
        let message = format!(
            "The API responded with status {} but the body could not be decoded: {}",
            response.status.as_u16(),
            err
        );
        Self {
            kind: ErrorKind::Malformed,
            message,
            error_type: API_ERROR_TYPE.to_string(),
            actions: Vec::new(),
            raw_response: Some(response),
            cause: None,
        }
    }

    pub fn aborted(cause: TransportError) -> Self {
        Self {
            kind: ErrorKind::Aborted,
            message: ABORTED_MESSAGE.to_string(),
            error_type: ABORTED_ERROR_TYPE.to_string(),
            actions: Vec::new(),
            raw_response: None,
            cause: Some(cause),
        }
    }

    pub fn transport_unavailable(cause: TransportError) -> Self {
        Self {
            kind: ErrorKind::TransportUnavailable,
            message: UNAVAILABLE_MESSAGE.to_string(),
            error_type: API_ERROR_TYPE.to_string(),
            actions: Vec::new(),
            raw_response: None,
            cause: Some(cause),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Stable error name, e.g. `NotFoundApiError`.
    pub fn name(&self) -> &'static str {
        self.kind.name()
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// The wire tag this error originated from, or `ApiError`/`AbortedRequest`
    /// for failures the server did not tag.
    pub fn error_type(&self) -> &str {
        &self.error_type
    }

    pub fn actions(&self) -> &[ProblemLink] {
        &self.actions
    }

    pub fn raw_response(&self) -> Option<&HttpResponse> {
        self.raw_response.as_ref()
    }

    pub fn cause(&self) -> Option<&TransportError> {
        self.cause.as_ref()
    }

    /// Status code of the response that produced this error, if any.
    pub fn status(&self) -> Option<u16> {
        self.raw_response.as_ref().map(|r| r.status.as_u16())
    }
}
