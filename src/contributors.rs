//! Contributor lookup by GitHub username

use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{KreditsError, KreditsResult};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contributor {
    pub id: u64,
    pub github_username: String,
    /// IPFS hash of the contributor profile
    pub ipfs_hash: String,
}

/// Source of registered contributors. Read-only from the bot's point of view.
#[async_trait]
pub trait ContributorDirectory: Send + Sync {
    async fn list_contributors(&self) -> Result<Vec<Contributor>>;
}

/// Exact, case-sensitive match against an already fetched snapshot
pub fn find_contributor<'a>(
    contributors: &'a [Contributor],
    github_username: &str,
) -> Option<&'a Contributor> {
    contributors
        .iter()
        .find(|c| c.github_username == github_username)
}

/// Fetch the directory and find the contributor for a GitHub username
pub async fn resolve_contributor(
    directory: &dyn ContributorDirectory,
    github_username: &str,
) -> KreditsResult<Contributor> {
    let contributors = directory
        .list_contributors()
        .await
        .map_err(KreditsError::DirectoryUnavailable)?;

    debug!(
        "Searching {} contributors for {}",
        contributors.len(),
        github_username
    );

    find_contributor(&contributors, github_username)
        .cloned()
        .ok_or_else(|| KreditsError::ContributorNotFound(github_username.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio_test::{assert_err, assert_ok};

    struct StaticDirectory(Vec<Contributor>);

    #[async_trait]
    impl ContributorDirectory for StaticDirectory {
        async fn list_contributors(&self) -> Result<Vec<Contributor>> {
            Ok(self.0.clone())
        }
    }

    struct BrokenDirectory;

    #[async_trait]
    impl ContributorDirectory for BrokenDirectory {
        async fn list_contributors(&self) -> Result<Vec<Contributor>> {
            anyhow::bail!("connection refused")
        }
    }

    fn directory() -> StaticDirectory {
        StaticDirectory(vec![
            Contributor {
                id: 1,
                github_username: "alice".to_string(),
                ipfs_hash: "QmAlice".to_string(),
            },
            Contributor {
                id: 2,
                github_username: "bob".to_string(),
                ipfs_hash: "QmBob".to_string(),
            },
        ])
    }

    #[tokio::test]
    async fn test_resolves_registered_contributor() {
        let contributor = assert_ok!(resolve_contributor(&directory(), "bob").await);
        assert_eq!(contributor.id, 2);
        assert_eq!(contributor.ipfs_hash, "QmBob");
    }

    #[tokio::test]
    async fn test_unknown_contributor() {
        let err = assert_err!(resolve_contributor(&directory(), "carol").await);
        assert!(matches!(err, KreditsError::ContributorNotFound(ref name) if name == "carol"));
        assert_eq!(err.to_string(), "No contributor found for carol");
    }

    #[tokio::test]
    async fn test_match_is_case_sensitive() {
        let err = assert_err!(resolve_contributor(&directory(), "Alice").await);
        assert!(matches!(err, KreditsError::ContributorNotFound(_)));
    }

    #[tokio::test]
    async fn test_directory_failure() {
        let err = assert_err!(resolve_contributor(&BrokenDirectory, "alice").await);
        assert!(matches!(err, KreditsError::DirectoryUnavailable(_)));
    }

    #[test]
    fn test_find_in_snapshot() {
        let snapshot = directory().0;
        assert_eq!(find_contributor(&snapshot, "alice").map(|c| c.id), Some(1));
        assert!(find_contributor(&snapshot, "").is_none());
    }
}
