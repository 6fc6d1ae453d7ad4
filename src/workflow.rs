//! Event workflow
//!
//! Reacts to closed issues by proposing kredits for every assignee:
//!
//! 1. The reward amount is derived once from the issue labels
//! 2. Each assignee runs its own pipeline: resolve contributor, submit proposal
//! 3. Each pipeline ends with exactly one comment on the issue, success or
//!    "please configure your kredits profile"
//!
//! Pipelines run concurrently and never affect each other. Closed pull
//! requests are accepted but produce no proposals.
//!
//! Redelivering the same event submits new proposals; there is no dedup.

use std::sync::Arc;

use futures::future::join_all;
use serde_json::Value;
use tracing::{debug, error, info, warn};

use crate::contributors::{resolve_contributor, ContributorDirectory};
use crate::error::KreditsResult;
use crate::event::{IssueEvent, PullRequestClosed, WebhookEvent};
use crate::notify::{CommentKind, IssueCommenter};
use crate::proposals::{submit_proposal, Ledger};
use crate::rewards::RewardTiers;

/// What happened to one assignee
#[derive(Debug, Clone)]
pub struct AssigneeOutcome {
    pub assignee: String,
    pub comment: CommentKind,
    pub comment_posted: bool,
    /// Ledger result on success
    pub result: Option<Value>,
    /// Internal error, never shown on the issue
    pub error: Option<String>,
}

impl AssigneeOutcome {
    pub fn is_success(&self) -> bool {
        self.comment == CommentKind::ProposalCreated
    }
}

#[derive(Debug, Clone)]
pub enum EventOutcome {
    Ignored {
        reason: String,
    },
    Processed {
        amount: u64,
        assignees: Vec<AssigneeOutcome>,
    },
}

pub struct KreditsWorkflow {
    rewards: RewardTiers,
    directory: Arc<dyn ContributorDirectory>,
    ledger: Arc<dyn Ledger>,
    commenter: Arc<dyn IssueCommenter>,
}

impl KreditsWorkflow {
    pub fn new(
        rewards: RewardTiers,
        directory: Arc<dyn ContributorDirectory>,
        ledger: Arc<dyn Ledger>,
        commenter: Arc<dyn IssueCommenter>,
    ) -> Self {
        Self {
            rewards,
            directory,
            ledger,
            commenter,
        }
    }

    pub async fn handle_event(&self, event: WebhookEvent) -> EventOutcome {
        match event {
            WebhookEvent::IssueClosed(issue) => self.handle_issue_closed(&issue).await,
            WebhookEvent::PullRequestClosed(pr) => self.handle_pull_request_closed(&pr),
            other => {
                debug!("Ignoring {} event", other.name());
                EventOutcome::Ignored {
                    reason: format!("unhandled event {}", other.name()),
                }
            }
        }
    }

    fn handle_pull_request_closed(&self, pr: &PullRequestClosed) -> EventOutcome {
        if !pr.merged {
            debug!("Pull request {} closed without merge", pr.pull_request);
            return EventOutcome::Ignored {
                reason: "pull request closed without merge".to_string(),
            };
        }

        info!(
            "[kredits] Pull request {} merged, no proposal is created for pull requests",
            pr.pull_request
        );
        EventOutcome::Ignored {
            reason: "merged pull requests are not rewarded".to_string(),
        }
    }

    pub async fn handle_issue_closed(&self, event: &IssueEvent) -> EventOutcome {
        let amount = self.rewards.resolve_amount(&event.labels);

        if event.assignees.is_empty() {
            info!("[kredits] Issue {} closed without assignees", event.issue);
        } else {
            info!(
                "[kredits] Issue {} closed, proposing {} kredits for {}",
                event.issue,
                amount,
                event.assignees.join(", ")
            );
        }

        let pipelines = event
            .assignees
            .iter()
            .map(|assignee| self.reward_assignee(assignee, amount, event));
        let assignees = join_all(pipelines).await;

        EventOutcome::Processed { amount, assignees }
    }

    async fn reward_assignee(
        &self,
        assignee: &str,
        amount: u64,
        event: &IssueEvent,
    ) -> AssigneeOutcome {
        let (comment, result, error) = match self.propose(assignee, amount, event).await {
            Ok(result) => (CommentKind::ProposalCreated, Some(result), None),
            Err(e) => {
                error!("[kredits] Error for {} on {}: {:#}", assignee, event.issue, e);
                (CommentKind::ConfigureProfile, None, Some(e.to_string()))
            }
        };

        let comment_posted = match self
            .commenter
            .post_comment(&event.issue, comment.body())
            .await
        {
            Ok(()) => true,
            Err(e) => {
                warn!(
                    "[kredits] Could not comment on {} for {}: {:#}",
                    event.issue, assignee, e
                );
                false
            }
        };

        AssigneeOutcome {
            assignee: assignee.to_string(),
            comment,
            comment_posted,
            result,
            error,
        }
    }

    async fn propose(&self, assignee: &str, amount: u64, event: &IssueEvent) -> KreditsResult<Value> {
        let contributor = resolve_contributor(self.directory.as_ref(), assignee).await?;
        submit_proposal(self.ledger.as_ref(), &contributor, amount, event).await
    }
}
