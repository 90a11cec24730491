use alloy_primitives::{Address, StorageKey};
use thiserror::Error;

/// Boxed backend error returned by a state provider.
pub type BoxedStateError = Box<dyn std::error::Error + Send + Sync>;

/// Errors raised while reading contract storage.
///
/// Empty slots are not errors: they read as the zero word.
#[derive(Debug, Error)]
pub enum OracleError {
    /// The underlying state database failed to serve a storage read
    #[error("State read failed for {address} at {key}: {source}")]
    StateRead {
        /// Contract whose storage was read
        address: Address,
        /// Storage key that was requested
        key: StorageKey,
        /// Backend error
        #[source]
        source: BoxedStateError,
    },
}
