use super::config::MinerConfig;
use std::fmt;

/// Strategy one builder worker runs with, fixed for the worker's lifetime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuilderVariant {
    /// Merges transaction bundles into the candidate
    pub is_bundle_aware: bool,
    /// Orders bundles by auction slot and stake
    pub is_priority_aware: bool,
    /// How many bundles the worker tries to merge into one block
    pub merge_depth: usize,
    /// Per-block reward share for priority workers, decimal wei
    pub priority_reward_share: Option<String>,
}

impl BuilderVariant {
    /// The regular worker whose candidate is exposed as the pending block.
    pub fn canonical() -> Self {
        Self {
            is_bundle_aware: false,
            is_priority_aware: false,
            merge_depth: 0,
            priority_reward_share: None,
        }
    }

    /// Bundle-merging worker.
    pub fn bundle(merge_depth: usize) -> Self {
        Self { is_bundle_aware: true, merge_depth, ..Self::canonical() }
    }

    /// Stake-priority bundle-merging worker.
    pub fn priority(merge_depth: usize, priority_reward_share: Option<String>) -> Self {
        Self {
            is_bundle_aware: true,
            is_priority_aware: true,
            merge_depth,
            priority_reward_share,
        }
    }

    /// Whether this is the regular, non-bundle worker.
    pub fn is_canonical(&self) -> bool {
        !self.is_bundle_aware
    }

    /// Variants of every worker of a pool, canonical first, then bundle
    /// workers and priority workers each with merge depths counting up from 1.
    pub fn plan(config: &MinerConfig) -> Vec<Self> {
        let mut variants = Vec::with_capacity(config.worker_count());
        variants.push(Self::canonical());
        variants.extend((1..=config.max_bundle_workers).map(Self::bundle));
        variants.extend(
            (1..=config.max_priority_workers)
                .map(|depth| Self::priority(depth, config.priority_reward_share.clone())),
        );
        variants
    }
}

impl fmt::Display for BuilderVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.is_bundle_aware, self.is_priority_aware) {
            (false, _) => write!(f, "regular"),
            (true, false) => write!(f, "bundle-{}", self.merge_depth),
            (true, true) => write!(f, "priority-{}", self.merge_depth),
        }
    }
}
