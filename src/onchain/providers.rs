use super::{OracleError, StorageReader};
use alloy_primitives::{Address, StorageKey, B256};

/// Wraps a Reth `StateProvider` reference to implement the `StorageReader` trait.
///
/// This is the production adapter: the provider is bound to the parent block
/// of the candidate being built, so every read sees the same immutable state.
///
/// # Usage
/// ```ignore
/// let state = provider.state_by_block_hash(parent_hash)?;
/// let reader = StateProviderStorageReader(state.as_ref());
/// let delegates = oracle.resolve_active_delegates(&reader, header.timestamp)?;
/// ```
pub struct StateProviderStorageReader<'a>(pub &'a dyn reth_storage_api::StateProvider);

impl<'a> StorageReader for StateProviderStorageReader<'a> {
    fn read_storage(&self, address: Address, key: StorageKey) -> Result<B256, OracleError> {
        let value = self
            .0
            .storage(address, key)
            .map_err(|e| OracleError::StateRead { address, key, source: Box::new(e) })?;
        Ok(value.map(|v| B256::from(v.to_be_bytes())).unwrap_or(B256::ZERO))
    }
}

/// A StorageReader that reads from a genesis configuration's alloc.
///
/// Lets the `slot-keys` binary and the tests resolve delegates and stakes
/// from a JSON state dump without a running node.
pub struct GenesisStorageReader {
    alloc: std::collections::BTreeMap<Address, alloy_genesis::GenesisAccount>,
}

impl GenesisStorageReader {
    /// Create a reader from a genesis configuration.
    pub fn from_genesis(genesis: &alloy_genesis::Genesis) -> Self {
        Self { alloc: genesis.alloc.clone() }
    }
}

impl StorageReader for GenesisStorageReader {
    fn read_storage(&self, address: Address, key: StorageKey) -> Result<B256, OracleError> {
        Ok(self
            .alloc
            .get(&address)
            .and_then(|account| account.storage.as_ref())
            .and_then(|storage| storage.get(&key).copied())
            .unwrap_or(B256::ZERO))
    }
}
