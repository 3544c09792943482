//! Wire shape of the error bodies returned by the API.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Error discriminators the API is known to send in the `error` field.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorTag {
    BadRequest,
    Unauthorized,
    PaymentRequired,
    Forbidden,
    NotFound,
    Conflict,
    InternalServerError,
}

impl ErrorTag {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorTag::BadRequest => "BadRequest",
            ErrorTag::Unauthorized => "Unauthorized",
            ErrorTag::PaymentRequired => "PaymentRequired",
            ErrorTag::Forbidden => "Forbidden",
            ErrorTag::NotFound => "NotFound",
            ErrorTag::Conflict => "Conflict",
            ErrorTag::InternalServerError => "InternalServerError",
        }
    }
}

impl fmt::Display for ErrorTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A tag value outside the set this client was built against.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("unknown error tag `{0}`")]
pub struct UnknownErrorTag(pub String);

impl FromStr for ErrorTag {
    type Err = UnknownErrorTag;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "BadRequest" => Ok(ErrorTag::BadRequest),
            "Unauthorized" => Ok(ErrorTag::Unauthorized),
            "PaymentRequired" => Ok(ErrorTag::PaymentRequired),
            "Forbidden" => Ok(ErrorTag::Forbidden),
            "NotFound" => Ok(ErrorTag::NotFound),
            "Conflict" => Ok(ErrorTag::Conflict),
            "InternalServerError" => Ok(ErrorTag::InternalServerError),
            other => Err(UnknownErrorTag(other.to_string())),
        }
    }
}

/// Remediation hint attached to an error body.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProblemLink {
    #[serde(default)]
    pub description: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

impl ProblemLink {
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            url: None,
            extra: serde_json::Map::new(),
        }
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }
}

/// Application-level error body: `{ error, message, actions? }`.
///
/// The `error` field is kept as the raw string the server sent so that tags
/// added to the API later still reach the caller; use [`ErrorEnvelope::tag`]
/// to resolve it against the known set.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ErrorEnvelope {
    pub error: String,
    pub message: String,
    #[serde(default)]
    pub actions: Vec<ProblemLink>,
}

impl ErrorEnvelope {
    /// Reads an envelope out of a parsed body.
    ///
    /// A body is an envelope when it is a JSON object holding both an `error`
    /// and a `message` field, whatever their values. Non-string values are
    /// kept in their JSON rendering. Each object in `actions` is kept on its
    /// own; entries that are not objects are skipped.
    pub fn from_body(body: &Value) -> Option<Self> {
        let object = body.as_object()?;
        let error = object.get("error")?;
        let message = object.get("message")?;

        let actions = object
            .get("actions")
            .and_then(Value::as_array)
            .map(|actions| {
                actions
                    .iter()
                    .filter_map(|action| ProblemLink::deserialize(action).ok())
                    .collect()
            })
            .unwrap_or_default();

        Some(Self {
            error: string_or_json(error),
            message: string_or_json(message),
            actions,
        })
    }

    pub fn tag(&self) -> Result<ErrorTag, UnknownErrorTag> {
        self.error.parse()
    }
}

fn string_or_json(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
