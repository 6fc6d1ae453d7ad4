//! Contribution proposals and their submission to the ledger

use anyhow::Result;
use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use tracing::info;

use crate::contributors::Contributor;
use crate::error::{KreditsError, KreditsResult};
use crate::event::IssueEvent;

/// Contribution kind for closed issues
pub const KIND_DEV: &str = "dev";

/// Proposal as the kredits contracts expect it
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContributionProposal {
    pub contributor_id: u64,
    pub amount: u64,
    pub contributor_ipfs_hash: String,
    pub url: String,
    pub description: String,
    pub details: Value,
    pub kind: String,
}

impl ContributionProposal {
    pub fn for_issue(contributor: &Contributor, amount: u64, event: &IssueEvent) -> Self {
        Self {
            contributor_id: contributor.id,
            amount,
            contributor_ipfs_hash: contributor.ipfs_hash.clone(),
            url: event.url.clone(),
            description: event.title.clone(),
            details: event.details.clone(),
            kind: KIND_DEV.to_string(),
        }
    }
}

/// Write side of the kredits ledger
#[async_trait]
pub trait Ledger: Send + Sync {
    /// Create a proposal, returning the ledger's result payload
    async fn create_proposal(&self, proposal: &ContributionProposal) -> Result<Value>;
}

/// Build and submit one proposal. Exactly one ledger call, no retry.
pub async fn submit_proposal(
    ledger: &dyn Ledger,
    contributor: &Contributor,
    amount: u64,
    event: &IssueEvent,
) -> KreditsResult<Value> {
    let proposal = ContributionProposal::for_issue(contributor, amount, event);

    let result = ledger
        .create_proposal(&proposal)
        .await
        .map_err(KreditsError::ProposalSubmissionFailed)?;

    info!(
        "[kredits] Proposal for contributor {} ({} kredits): {}",
        contributor.id, amount, result
    );
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::IssueRef;
    use parking_lot::Mutex;
    use serde_json::json;
    use tokio_test::{assert_err, assert_ok};

    #[derive(Default)]
    struct RecordingLedger {
        fail: bool,
        calls: Mutex<Vec<ContributionProposal>>,
    }

    #[async_trait]
    impl Ledger for RecordingLedger {
        async fn create_proposal(&self, proposal: &ContributionProposal) -> Result<Value> {
            self.calls.lock().push(proposal.clone());
            if self.fail {
                anyhow::bail!("contributor has no profile on chain");
            }
            Ok(json!({ "hash": "0xabc" }))
        }
    }

    fn contributor() -> Contributor {
        Contributor {
            id: 5,
            github_username: "alice".to_string(),
            ipfs_hash: "QmAlice".to_string(),
        }
    }

    fn event() -> IssueEvent {
        IssueEvent {
            issue: IssueRef {
                owner: "67P".to_string(),
                repo: "kredits-web".to_string(),
                number: 7,
            },
            assignees: vec!["alice".to_string()],
            labels: vec!["kredits-2".to_string()],
            url: "https://api.github.com/repos/67P/kredits-web/issues/7".to_string(),
            title: "Fix login".to_string(),
            details: json!({ "number": 7 }),
        }
    }

    #[test]
    fn test_proposal_fields() {
        let proposal = ContributionProposal::for_issue(&contributor(), 500, &event());
        let value = serde_json::to_value(&proposal).unwrap();
        assert_eq!(
            value,
            json!({
                "contributorId": 5,
                "amount": 500,
                "contributorIpfsHash": "QmAlice",
                "url": "https://api.github.com/repos/67P/kredits-web/issues/7",
                "description": "Fix login",
                "details": { "number": 7 },
                "kind": "dev"
            })
        );
    }

    #[tokio::test]
    async fn test_submit_success() {
        let ledger = RecordingLedger::default();
        let result = assert_ok!(submit_proposal(&ledger, &contributor(), 500, &event()).await);
        assert_eq!(result["hash"], "0xabc");
        assert_eq!(ledger.calls.lock().len(), 1);
    }

    #[tokio::test]
    async fn test_submit_failure_is_not_retried() {
        let ledger = RecordingLedger {
            fail: true,
            ..Default::default()
        };
        let err = assert_err!(submit_proposal(&ledger, &contributor(), 100, &event()).await);
        assert!(matches!(err, KreditsError::ProposalSubmissionFailed(_)));
        assert!(err.to_string().contains("no profile on chain"));
        assert_eq!(ledger.calls.lock().len(), 1);
    }
}
