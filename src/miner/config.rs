use super::errors::ConfigError;
use alloy_primitives::{Address, Bytes, U256};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Builder pool configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MinerConfig {
    /// Number of bundle-merging workers (merge depths 1..=N)
    pub max_bundle_workers: usize,
    /// Number of stake-priority bundle-merging workers (merge depths 1..=N)
    pub max_priority_workers: usize,
    /// Reward paid per block to priority workers' delegates, decimal wei
    pub priority_reward_share: Option<String>,
    /// Target block gas ceiling
    pub gas_ceiling: u64,
    /// Header extra data
    pub extra_data: Bytes,
    /// Interval between re-builds of the current candidate, in milliseconds
    pub recommit_interval_ms: u64,
    /// Block reward recipient
    pub fee_recipient: Address,
}

impl Default for MinerConfig {
    fn default() -> Self {
        Self {
            max_bundle_workers: 1,
            max_priority_workers: 0,
            priority_reward_share: None,
            gas_ceiling: 30_000_000,
            extra_data: Bytes::new(),
            recommit_interval_ms: 3_000,
            fee_recipient: Address::ZERO,
        }
    }
}

impl MinerConfig {
    /// Recommit interval as a `Duration`.
    pub fn recommit_interval(&self) -> Duration {
        Duration::from_millis(self.recommit_interval_ms)
    }

    /// Parsed priority reward share in wei.
    pub fn priority_reward_share_wei(&self) -> Result<Option<U256>, ConfigError> {
        self.priority_reward_share
            .as_deref()
            .map(|share| {
                U256::from_str_radix(share.trim(), 10)
                    .map_err(|_| ConfigError::InvalidRewardShare(share.to_string()))
            })
            .transpose()
    }

    /// Reject configurations the pool cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.recommit_interval_ms == 0 {
            return Err(ConfigError::ZeroRecommitInterval);
        }
        self.priority_reward_share_wei()?;
        Ok(())
    }

    /// Total number of workers a pool built from this config runs.
    pub fn worker_count(&self) -> usize {
        1 + self.max_bundle_workers + self.max_priority_workers
    }
}
