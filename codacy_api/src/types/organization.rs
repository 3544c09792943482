use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Provider;

/// A Git provider organization (or personal account) known to Codacy.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Organization {
    /// Codacy identifier. Absent for organizations not yet added to Codacy.
    #[serde(default)]
    pub identifier: Option<i64>,

    pub remote_identifier: String,

    pub name: String,

    pub provider: Provider,

    /// `Account` for personal accounts, `Organization` otherwise.
    #[serde(rename = "type")]
    pub organization_type: String,

    #[serde(default)]
    pub avatar: Option<String>,

    #[serde(default)]
    pub created: Option<DateTime<Utc>>,

    #[serde(default)]
    pub join_mode: Option<String>,

    #[serde(default)]
    pub single_provider_login: Option<bool>,
}
