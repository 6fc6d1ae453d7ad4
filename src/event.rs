//! Inbound webhook events
//!
//! Turns a raw GitHub delivery (event name + JSON body) into the event the
//! workflow understands. Only closed issues and closed pull requests are
//! distinguished; everything else is `Other` and ignored downstream.

use serde_json::Value;

use crate::error::{KreditsError, KreditsResult};
use crate::github::{GitHubIssue, IssuesPayload, PullRequestPayload};
use crate::notify::IssueRef;

/// A closed issue, as needed to build proposals and comment back
#[derive(Debug, Clone)]
pub struct IssueEvent {
    pub issue: IssueRef,
    pub assignees: Vec<String>,
    pub labels: Vec<String>,
    pub url: String,
    pub title: String,
    /// Full issue payload as delivered
    pub details: Value,
}

#[derive(Debug, Clone)]
pub struct PullRequestClosed {
    pub pull_request: IssueRef,
    pub merged: bool,
}

#[derive(Debug, Clone)]
pub enum WebhookEvent {
    IssueClosed(IssueEvent),
    PullRequestClosed(PullRequestClosed),
    Other { event: String, action: Option<String> },
}

impl WebhookEvent {
    /// Parse a delivery. `event` is the `X-GitHub-Event` header value.
    pub fn from_delivery(event: &str, body: &[u8]) -> KreditsResult<Self> {
        match event {
            "issues" => {
                let payload: IssuesPayload = parse(body)?;
                if payload.action != "closed" {
                    return Ok(Self::Other {
                        event: event.to_string(),
                        action: Some(payload.action),
                    });
                }
                IssueEvent::from_payload(payload).map(Self::IssueClosed)
            }
            "pull_request" => {
                let payload: PullRequestPayload = parse(body)?;
                if payload.action != "closed" {
                    return Ok(Self::Other {
                        event: event.to_string(),
                        action: Some(payload.action),
                    });
                }
                Ok(Self::PullRequestClosed(PullRequestClosed {
                    pull_request: IssueRef {
                        owner: payload.repository.owner.login,
                        repo: payload.repository.name,
                        number: payload.pull_request.number,
                    },
                    merged: payload.pull_request.merged,
                }))
            }
            _ => {
                let action = serde_json::from_slice::<Value>(body)
                    .ok()
                    .and_then(|v| v.get("action").and_then(Value::as_str).map(String::from));
                Ok(Self::Other {
                    event: event.to_string(),
                    action,
                })
            }
        }
    }

    pub fn name(&self) -> String {
        match self {
            Self::IssueClosed(_) => "issues.closed".to_string(),
            Self::PullRequestClosed(_) => "pull_request.closed".to_string(),
            Self::Other {
                event,
                action: Some(action),
            } => format!("{}.{}", event, action),
            Self::Other { event, action: None } => event.clone(),
        }
    }
}

impl IssueEvent {
    fn from_payload(payload: IssuesPayload) -> KreditsResult<Self> {
        let issue: GitHubIssue = serde_json::from_value(payload.issue.clone())
            .map_err(|e| KreditsError::MalformedEvent(format!("issue: {}", e)))?;

        Ok(Self {
            issue: IssueRef {
                owner: payload.repository.owner.login,
                repo: payload.repository.name,
                number: issue.number,
            },
            assignees: issue.assignee_logins(),
            labels: issue.label_names(),
            url: issue.url,
            title: issue.title,
            details: payload.issue,
        })
    }
}

fn parse<T: serde::de::DeserializeOwned>(body: &[u8]) -> KreditsResult<T> {
    serde_json::from_slice(body).map_err(|e| KreditsError::MalformedEvent(e.to_string()))
}
