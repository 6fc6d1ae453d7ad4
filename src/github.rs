//! GitHub webhook payloads and API client for issue comments
//!
//! Supports authentication via environment variables:
//! - GITHUB_TOKEN

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::notify::{IssueCommenter, IssueRef};

pub const GITHUB_API_BASE: &str = "https://api.github.com";

const USER_AGENT: &str = concat!("kredits-bot/", env!("CARGO_PKG_VERSION"));
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Get GitHub token from environment
fn get_github_token() -> Option<String> {
    std::env::var("GITHUB_TOKEN").ok().filter(|t| !t.is_empty())
}

#[derive(Debug, Clone, Deserialize)]
pub struct GitHubIssue {
    pub number: u64,
    pub title: String,
    /// API URL of the issue
    pub url: String,
    #[serde(default)]
    pub assignees: Vec<GitHubUser>,
    #[serde(default)]
    pub labels: Vec<GitHubLabel>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GitHubUser {
    pub login: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GitHubLabel {
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GitHubRepository {
    pub name: String,
    pub owner: GitHubUser,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GitHubPullRequest {
    pub number: u64,
    #[serde(default)]
    pub merged: bool,
}

impl GitHubIssue {
    pub fn label_names(&self) -> Vec<String> {
        self.labels.iter().map(|l| l.name.clone()).collect()
    }

    pub fn assignee_logins(&self) -> Vec<String> {
        self.assignees.iter().map(|a| a.login.clone()).collect()
    }
}

/// Body of an `issues` webhook delivery. The issue is kept raw so the full
/// payload can travel with the proposal.
#[derive(Debug, Clone, Deserialize)]
pub struct IssuesPayload {
    pub action: String,
    pub issue: serde_json::Value,
    pub repository: GitHubRepository,
}

/// Body of a `pull_request` webhook delivery
#[derive(Debug, Clone, Deserialize)]
pub struct PullRequestPayload {
    pub action: String,
    pub pull_request: GitHubPullRequest,
    pub repository: GitHubRepository,
}

pub struct GitHubClient {
    client: reqwest::Client,
    api_base: String,
    token: Option<String>,
}

impl GitHubClient {
    pub fn new(api_base: impl Into<String>) -> Result<Self> {
        Self::with_token(api_base, get_github_token())
    }

    pub fn with_token(api_base: impl Into<String>, token: Option<String>) -> Result<Self> {
        if token.is_some() {
            info!("GitHub client initialized with authentication token");
        } else {
            warn!("GitHub client initialized WITHOUT token - comments will be rejected");
        }

        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .context("Failed to build GitHub HTTP client")?;

        Ok(Self {
            client,
            api_base: api_base.into().trim_end_matches('/').to_string(),
            token,
        })
    }

    fn comments_url(&self, issue: &IssueRef) -> String {
        format!(
            "{}/repos/{}/{}/issues/{}/comments",
            self.api_base,
            urlencoding::encode(&issue.owner),
            urlencoding::encode(&issue.repo),
            issue.number
        )
    }

    fn build_post(&self, url: &str) -> reqwest::RequestBuilder {
        let mut req = self
            .client
            .post(url)
            .header("User-Agent", USER_AGENT)
            .header("Accept", "application/vnd.github+json")
            .header("X-GitHub-Api-Version", "2022-11-28");

        if let Some(token) = &self.token {
            req = req.header("Authorization", format!("Bearer {}", token));
        }

        req
    }

    /// Create a comment on an issue
    pub async fn create_comment(&self, issue: &IssueRef, body: &str) -> Result<()> {
        let url = self.comments_url(issue);
        debug!("Posting comment to {}", url);

        let response = self
            .build_post(&url)
            .json(&serde_json::json!({ "body": body }))
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            anyhow::bail!("Failed to comment on {}: {} {}", issue, status, text);
        }

        Ok(())
    }
}

#[async_trait]
impl IssueCommenter for GitHubClient {
    async fn post_comment(&self, issue: &IssueRef, body: &str) -> Result<()> {
        self.create_comment(issue, body).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn issue_ref() -> IssueRef {
        IssueRef {
            owner: "67P".to_string(),
            repo: "kredits-web".to_string(),
            number: 42,
        }
    }

    #[test]
    fn test_comments_url() {
        let client = GitHubClient::with_token("https://api.github.com/", None).unwrap();
        assert_eq!(
            client.comments_url(&issue_ref()),
            "https://api.github.com/repos/67P/kredits-web/issues/42/comments"
        );
    }

    #[test]
    fn test_client_builds_with_token() {
        let client =
            GitHubClient::with_token(GITHUB_API_BASE, Some("ghp_test".to_string())).unwrap();
        assert_eq!(client.token.as_deref(), Some("ghp_test"));
        assert_eq!(client.api_base, GITHUB_API_BASE);
    }

    #[test]
    fn test_issue_helpers() {
        let issue: GitHubIssue = serde_json::from_value(serde_json::json!({
            "id": 1,
            "number": 7,
            "title": "Fix login",
            "url": "https://api.github.com/repos/67P/kredits-web/issues/7",
            "state": "closed",
            "assignees": [{ "login": "alice", "id": 10 }, { "login": "bob", "id": 11 }],
            "labels": [{ "name": "bug" }, { "name": "kredits-2" }]
        }))
        .unwrap();

        assert_eq!(issue.assignee_logins(), vec!["alice", "bob"]);
        assert_eq!(issue.label_names(), vec!["bug", "kredits-2"]);
    }

    #[test]
    fn test_minimal_pull_request_payload() {
        let payload: PullRequestPayload = serde_json::from_value(serde_json::json!({
            "action": "closed",
            "pull_request": { "number": 3 },
            "repository": { "name": "kredits-web", "owner": { "login": "67P" } }
        }))
        .unwrap();
        assert_eq!(payload.pull_request.number, 3);
        assert!(!payload.pull_request.merged);
        assert_eq!(payload.repository.owner.login, "67P");
    }
}
