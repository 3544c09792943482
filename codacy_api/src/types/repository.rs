use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Provider;

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Branch {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub is_default: bool,
    #[serde(default)]
    pub is_enabled: bool,
    #[serde(default)]
    pub last_updated: Option<DateTime<Utc>>,
}

/// A repository as returned by the organization repository endpoints.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Repository {
    /// Codacy identifier. Absent until the repository is added to Codacy.
    #[serde(default)]
    pub repository_id: Option<i64>,

    pub provider: Provider,

    pub owner: String,

    pub name: String,

    #[serde(default)]
    pub full_path: Option<String>,

    /// `Public` or `Private`.
    pub visibility: String,

    #[serde(default)]
    pub remote_identifier: Option<String>,

    #[serde(default)]
    pub last_updated: Option<DateTime<Utc>>,

    #[serde(default)]
    pub default_branch: Option<Branch>,

    #[serde(default)]
    pub languages: Vec<String>,

    #[serde(default)]
    pub problems: Vec<serde_json::Value>,
}

impl Repository {
    /// `owner/name`, or the full path when the API supplies one.
    pub fn display_path(&self) -> String {
        match &self.full_path {
            Some(path) if !path.is_empty() => path.clone(),
            _ => format!("{}/{}", self.owner, self.name),
        }
    }
}
