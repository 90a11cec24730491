use crate::onchain::OracleError;
use thiserror::Error;

/// Invalid builder pool configuration
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// Reward share is not a decimal wei amount
    #[error("Invalid priority reward share {0:?}: expected a decimal wei amount")]
    InvalidRewardShare(String),

    /// Recommit interval must be non-zero
    #[error("Recommit interval must be greater than zero")]
    ZeroRecommitInterval,
}

/// Errors a candidate builder may report for one build attempt
#[derive(Debug, Error)]
pub enum BuildError {
    /// Reading auction or stake state failed
    #[error(transparent)]
    Oracle(#[from] OracleError),

    /// Any other failure inside the block building engine
    #[error("Candidate build failed: {0}")]
    Other(Box<dyn std::error::Error + Send + Sync>),
}
