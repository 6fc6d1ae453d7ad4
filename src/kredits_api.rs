//! Kredits gateway client
//!
//! The gateway owns the wallet, the contract bindings and IPFS. The bot only
//! reads contributors from it and hands it proposals.

use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::config::{IpfsConfig, KreditsConfig};
use crate::contributors::{Contributor, ContributorDirectory};
use crate::proposals::{ContributionProposal, Ledger};

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ProposalRequest<'a> {
    network_id: u64,
    ipfs: &'a IpfsConfig,
    proposal: &'a ContributionProposal,
}

pub struct KreditsApi {
    client: Client,
    base_url: String,
    network_id: u64,
    ipfs: IpfsConfig,
}

impl KreditsApi {
    pub fn new(config: &KreditsConfig, ipfs: &IpfsConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(DEFAULT_TIMEOUT)
            .build()
            .context("Failed to build kredits HTTP client")?;

        Ok(Self {
            client,
            base_url: config.provider_url.trim_end_matches('/').to_string(),
            network_id: config.network_id,
            ipfs: ipfs.clone(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }
}

#[async_trait]
impl ContributorDirectory for KreditsApi {
    async fn list_contributors(&self) -> Result<Vec<Contributor>> {
        let url = self.url("contributors");
        let resp = self
            .client
            .get(&url)
            .query(&[("networkId", self.network_id)])
            .send()
            .await
            .context("Failed to reach kredits provider")?;

        let status = resp.status();
        if status.is_success() {
            let contributors: Vec<Contributor> = resp.json().await?;
            debug!("Fetched {} contributors", contributors.len());
            Ok(contributors)
        } else {
            let error_text = resp.text().await.unwrap_or_else(|_| "Unknown error".into());
            Err(anyhow!(
                "Failed to fetch contributors ({}): {}",
                status,
                error_text
            ))
        }
    }
}

#[async_trait]
impl Ledger for KreditsApi {
    async fn create_proposal(&self, proposal: &ContributionProposal) -> Result<Value> {
        let url = self.url("proposals");
        let request = ProposalRequest {
            network_id: self.network_id,
            ipfs: &self.ipfs,
            proposal,
        };
        let resp = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .context("Failed to reach kredits provider")?;

        let status = resp.status();
        if status.is_success() {
            Ok(resp.json().await?)
        } else {
            let error_text = resp.text().await.unwrap_or_else(|_| "Unknown error".into());
            Err(anyhow!(
                "Proposal rejected ({}): {}",
                status,
                error_text
            ))
        }
    }
}
