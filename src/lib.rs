//! Kredits Bot - Propose kredits for closed GitHub issues
//!
//! Listens for GitHub webhook deliveries and credits the people who worked on
//! an issue once it is closed.
//!
//! # How it works
//!
//! 1. An `issues.closed` delivery arrives on `/webhook`
//! 2. The reward amount is read from the first `kredits-N` label (default 100)
//! 3. Every assignee is looked up in the kredits contributor directory
//! 4. A `dev` contribution proposal is submitted for each contributor found
//! 5. The bot comments on the issue once per assignee with the outcome
//!
//! # Known gaps
//!
//! - Redelivered events create duplicate proposals
//! - Merged pull requests are received but not rewarded

pub mod config;
pub mod contributors;
pub mod error;
pub mod event;
pub mod github;
pub mod kredits_api;
pub mod notify;
pub mod proposals;
pub mod rewards;
pub mod server;
pub mod wallet;
pub mod workflow;

pub use config::Config;
pub use contributors::{find_contributor, resolve_contributor, Contributor, ContributorDirectory};
pub use error::{KreditsError, KreditsResult};
pub use event::{IssueEvent, WebhookEvent};
pub use github::GitHubClient;
pub use kredits_api::KreditsApi;
pub use notify::{CommentKind, IssueCommenter, IssueRef};
pub use proposals::{submit_proposal, ContributionProposal, Ledger};
pub use rewards::RewardTiers;
pub use wallet::WalletInfo;
pub use workflow::{AssigneeOutcome, EventOutcome, KreditsWorkflow};
