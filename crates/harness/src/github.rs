//! REST client for the code-hosting API side of hybrid checks.

use std::time::Duration;

use serde::Deserialize;
use tracing::debug;

use tekqa_common::config::GithubConfig;
use tekqa_common::{QaError, QaResult};

const USER_AGENT: &str = concat!("tekqa/", env!("CARGO_PKG_VERSION"));

/// The narrow repository shape the hybrid scenarios care about. Keeping it
/// minimal means an upstream API change fails here, with a clear message,
/// rather than somewhere in a UI assertion.
#[derive(Debug, Clone, Deserialize)]
pub struct RepoInfo {
    pub full_name: String,
    pub owner: RepoOwner,
    pub name: String,
    pub description: Option<String>,
    pub stargazers_count: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RepoOwner {
    pub login: String,
}

pub struct GithubClient {
    http: reqwest::Client,
    api_base: String,
    token: Option<String>,
}

impl GithubClient {
    pub fn new(config: &GithubConfig) -> QaResult<Self> {
        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(15))
            .build()?;
        Ok(Self {
            http,
            api_base: config.api_base.trim_end_matches('/').to_string(),
            token: config.token.clone(),
        })
    }

    /// Fetch canonical repository data. A non-2xx response is a hard failure
    /// of the calling scenario.
    pub async fn repo(&self, owner: &str, name: &str) -> QaResult<RepoInfo> {
        let url = format!("{}/repos/{owner}/{name}", self.api_base);
        debug!(%url, "fetching repository data");

        let mut request = self.http.get(&url);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(QaError::ApiStatus {
                url,
                status: status.as_u16(),
            });
        }
        Ok(response.json().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repo_info_deserializes_the_narrow_shape() {
        let raw = r#"{
            "full_name": "microsoft/playwright",
            "owner": {"login": "microsoft", "id": 6154722},
            "name": "playwright",
            "description": "Playwright is a framework for Web Testing and Automation.",
            "stargazers_count": 68000,
            "forks_count": 3700
        }"#;
        let repo: RepoInfo = serde_json::from_str(raw).unwrap();
        assert_eq!(repo.full_name, "microsoft/playwright");
        assert_eq!(repo.owner.login, "microsoft");
        assert_eq!(repo.stargazers_count, Some(68_000));
    }

    #[test]
    fn null_description_is_tolerated() {
        let raw = r#"{
            "full_name": "o/r",
            "owner": {"login": "o"},
            "name": "r",
            "description": null
        }"#;
        let repo: RepoInfo = serde_json::from_str(raw).unwrap();
        assert!(repo.description.is_none());
        assert!(repo.stargazers_count.is_none());
    }
}
