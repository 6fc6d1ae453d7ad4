//! Reporting workflow outcomes back to the issue

use std::fmt;

use anyhow::Result;
use async_trait::async_trait;

pub const SUCCESS_COMMENT: &str = "Great! a kredits proposal was created for you!";
pub const CONFIGURE_PROFILE_COMMENT: &str = "please configure your kredits profile";

/// Address of the issue a comment goes to
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct IssueRef {
    pub owner: String,
    pub repo: String,
    pub number: u64,
}

impl fmt::Display for IssueRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}#{}", self.owner, self.repo, self.number)
    }
}

/// The two things the bot ever says on an issue
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommentKind {
    ProposalCreated,
    ConfigureProfile,
}

impl CommentKind {
    pub fn body(self) -> &'static str {
        match self {
            Self::ProposalCreated => SUCCESS_COMMENT,
            Self::ConfigureProfile => CONFIGURE_PROFILE_COMMENT,
        }
    }
}

#[async_trait]
pub trait IssueCommenter: Send + Sync {
    async fn post_comment(&self, issue: &IssueRef, body: &str) -> Result<()>;
}
