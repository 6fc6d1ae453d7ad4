//! Reward tiers
//!
//! An issue's reward is picked from its labels: the first label starting with
//! the configured prefix (`kredits` by default) selects a tier by its suffix,
//! so `kredits-2` means tier `2`. Anything that doesn't resolve to a known tier
//! gets the default amount.

use std::collections::BTreeMap;

use tracing::debug;

use crate::config::RewardsConfig;

pub const DEFAULT_LABEL_PREFIX: &str = "kredits";
pub const DEFAULT_AMOUNT: u64 = 100;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RewardTiers {
    label_prefix: String,
    default_amount: u64,
    tiers: BTreeMap<String, u64>,
}

impl RewardTiers {
    pub fn new(
        label_prefix: impl Into<String>,
        default_amount: u64,
        tiers: BTreeMap<String, u64>,
    ) -> Self {
        Self {
            label_prefix: label_prefix.into(),
            default_amount,
            tiers,
        }
    }

    pub fn from_config(config: &RewardsConfig) -> Self {
        Self::new(
            config.label_prefix.clone(),
            config.default_amount,
            config.tiers.clone(),
        )
    }

    /// Tier suffix of a reward label, or None when the label isn't one
    pub fn tier_of<'a>(&self, label: &'a str) -> Option<&'a str> {
        label
            .strip_prefix(self.label_prefix.as_str())
            .map(|rest| rest.trim_start_matches(['-', '_', ':', ' ']))
    }

    /// Amount for a label set. Only the first reward label counts.
    pub fn resolve_amount<I, S>(&self, labels: I) -> u64
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let tier = labels
            .into_iter()
            .find_map(|label| self.tier_of(label.as_ref()).map(str::to_string));

        match tier {
            Some(tier) => match self.tiers.get(&tier) {
                Some(amount) => *amount,
                None => {
                    debug!("Unknown reward tier {:?}, using default", tier);
                    self.default_amount
                }
            },
            None => self.default_amount,
        }
    }
}

impl Default for RewardTiers {
    fn default() -> Self {
        Self::new(
            DEFAULT_LABEL_PREFIX,
            DEFAULT_AMOUNT,
            [("1", 100), ("2", 500), ("3", 1000)]
                .into_iter()
                .map(|(k, v)| (k.to_string(), v))
                .collect(),
        )
    }
}
