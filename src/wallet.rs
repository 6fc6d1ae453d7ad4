//! Wallet file loading
//!
//! The encrypted wallet is only inspected for its address at startup so a
//! misconfigured deployment fails fast. Decryption happens in the gateway.

use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct WalletInfo {
    address: String,
}

impl WalletInfo {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read wallet {}", path.display()))?;
        Self::parse(&content).with_context(|| format!("Invalid wallet {}", path.display()))
    }

    pub fn parse(json: &str) -> Result<Self> {
        let wallet: Self = serde_json::from_str(json)?;
        anyhow::ensure!(!wallet.address.is_empty(), "wallet has no address");
        Ok(wallet)
    }

    /// Checksum-less 0x address
    pub fn address(&self) -> String {
        if self.address.starts_with("0x") {
            self.address.clone()
        } else {
            format!("0x{}", self.address)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keystore_address() {
        let wallet =
            WalletInfo::parse(r#"{"address":"7e5f4552091a69125d5dfcb7b8c2659029395bdf","crypto":{}}"#)
                .unwrap();
        assert_eq!(wallet.address(), "0x7e5f4552091a69125d5dfcb7b8c2659029395bdf");
    }

    #[test]
    fn test_prefixed_address_kept() {
        let wallet = WalletInfo::parse(r#"{"address":"0xabc"}"#).unwrap();
        assert_eq!(wallet.address(), "0xabc");
    }

    #[test]
    fn test_invalid_wallets() {
        assert!(WalletInfo::parse("{}").is_err());
        assert!(WalletInfo::parse(r#"{"address":""}"#).is_err());
        assert!(WalletInfo::load("/nonexistent/wallet.json").is_err());
    }
}
