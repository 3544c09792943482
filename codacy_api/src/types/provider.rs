//! Git provider identifiers used in API paths.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Git provider hosting an organization or repository.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Provider {
    #[serde(rename = "gh")]
    GitHub,
    #[serde(rename = "ghe")]
    GitHubEnterprise,
    #[serde(rename = "gl")]
    GitLab,
    #[serde(rename = "gle")]
    GitLabEnterprise,
    #[serde(rename = "bb")]
    Bitbucket,
    #[serde(rename = "bbe")]
    BitbucketEnterprise,
}

impl Provider {
    /// Short code used in URL paths, e.g. `gh`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Provider::GitHub => "gh",
            Provider::GitHubEnterprise => "ghe",
            Provider::GitLab => "gl",
            Provider::GitLabEnterprise => "gle",
            Provider::Bitbucket => "bb",
            Provider::BitbucketEnterprise => "bbe",
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Provider {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "gh" | "github" => Ok(Provider::GitHub),
            "ghe" => Ok(Provider::GitHubEnterprise),
            "gl" | "gitlab" => Ok(Provider::GitLab),
            "gle" => Ok(Provider::GitLabEnterprise),
            "bb" | "bitbucket" => Ok(Provider::Bitbucket),
            "bbe" => Ok(Provider::BitbucketEnterprise),
            other => Err(format!(
                "unknown provider '{}', expected one of gh, ghe, gl, gle, bb, bbe",
                other
            )),
        }
    }
}
