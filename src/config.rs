//! Configuration management
//!
//! Loads configuration from config.toml with support for:
//! - Webhook listener binding settings
//! - GitHub API endpoint
//! - Kredits gateway endpoint, network and wallet location
//! - IPFS endpoint forwarded with every proposal
//! - Reward tiers
//!
//! `KREDITS_*` and `IPFS_API_*` environment variables win over the file.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::warn;

const DEFAULT_CONFIG: &str = include_str!("../config.toml");

/// Main configuration structure matching config.toml
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub github: GitHubConfig,
    pub kredits: KreditsConfig,
    pub ipfs: IpfsConfig,
    pub rewards: RewardsConfig,
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// GitHub API configuration (token comes from GITHUB_TOKEN)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GitHubConfig {
    pub api_url: String,
}

/// Kredits gateway configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KreditsConfig {
    pub provider_url: String,
    pub network_id: u64,
    pub wallet_path: PathBuf,
}

/// IPFS API endpoint used by the gateway to store proposal details
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IpfsConfig {
    pub host: String,
    pub port: u16,
    pub protocol: String,
}

/// Reward system configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RewardsConfig {
    /// Labels starting with this prefix select a reward tier
    pub label_prefix: String,
    /// Amount used when no tier label is present or the tier is unknown
    pub default_amount: u64,
    /// Tier suffix -> amount
    pub tiers: BTreeMap<String, u64>,
}

impl Config {
    /// Load from a config file (embedded defaults when it doesn't exist),
    /// then apply environment overrides
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        let mut config: Self = if path.exists() {
            let content = std::fs::read_to_string(path).context("Failed to read config file")?;
            toml::from_str(&content).context("Failed to parse config file")?
        } else {
            warn!(
                "Config file {} not found, using embedded defaults",
                path.display()
            );
            toml::from_str(DEFAULT_CONFIG).context("Failed to parse default config")?
        };

        config.apply_overrides(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Apply overrides from a key lookup (the process environment in practice)
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.is_empty());

        if let Some(path) = var("KREDITS_WALLET_PATH") {
            self.kredits.wallet_path = PathBuf::from(path);
        }
        if let Some(url) = var("KREDITS_PROVIDER_URL") {
            self.kredits.provider_url = url;
        }
        if let Some(id) = var("KREDITS_NETWORK_ID") {
            self.kredits.network_id = id
                .parse()
                .with_context(|| format!("KREDITS_NETWORK_ID is not a number: {}", id))?;
        }
        if let Some(host) = var("IPFS_API_HOST") {
            self.ipfs.host = host;
        }
        if let Some(port) = var("IPFS_API_PORT") {
            self.ipfs.port = port
                .parse()
                .with_context(|| format!("IPFS_API_PORT is not a port: {}", port))?;
        }
        if let Some(protocol) = var("IPFS_API_PROTOCOL") {
            self.ipfs.protocol = protocol;
        }

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        // The embedded default config ships with the crate and is covered by tests.
        toml::from_str(DEFAULT_CONFIG).unwrap_or_else(|_| Self {
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 3000,
            },
            github: GitHubConfig {
                api_url: "https://api.github.com".to_string(),
            },
            kredits: KreditsConfig {
                provider_url: "http://localhost:7545".to_string(),
                network_id: 100,
                wallet_path: PathBuf::from("./wallet.json"),
            },
            ipfs: IpfsConfig {
                host: "localhost".to_string(),
                port: 5001,
                protocol: "http".to_string(),
            },
            rewards: RewardsConfig {
                label_prefix: "kredits".to_string(),
                default_amount: 100,
                tiers: [("1", 100), ("2", 500), ("3", 1000)]
                    .into_iter()
                    .map(|(k, v)| (k.to_string(), v))
                    .collect(),
            },
        })
    }
}
