use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The authenticated user, as returned by `GET /user`.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: i64,

    #[serde(default)]
    pub name: Option<String>,

    pub main_email: String,

    #[serde(default)]
    pub other_emails: Vec<String>,

    #[serde(default)]
    pub is_admin: bool,

    #[serde(default)]
    pub is_active: bool,

    #[serde(default)]
    pub created: Option<DateTime<Utc>>,
}
