//! On-chain Storage Readers
//!
//! Reads the slot auction proxy's state straight out of contract storage,
//! without an EVM call or ABI decoding. Every key is derived from the
//! contract's Solidity storage layout:
//!
//!   slotExpiration[i] → keccak256(pad32(i) ++ pad32(1))
//!   slotDelegate[i]   → keccak256(pad32(i) ++ pad32(2))
//!   stakedBalance[a]  → keccak256(pad32(a) ++ pad32(5))
//!
//! The layout must match the deployed proxy bit-for-bit; the known-vector
//! tests below pin it.

pub mod errors;
pub mod helpers;
pub mod providers;
pub mod slots;

pub use errors::{BoxedStateError, OracleError};
pub use helpers::{
    address_key, decode_address, decode_u256, encode_address, encode_u64, mapping_slot_key,
    slot_index_key,
};
pub use providers::{GenesisStorageReader, StateProviderStorageReader};
pub use slots::auction_slots;

use alloy_primitives::{Address, StorageKey, B256};

/// Trait for reading contract storage words.
///
/// In production: implemented over the parent block's state provider (MDBX).
/// In tests: implemented by in-memory maps and `GenesisStorageReader`.
///
/// Implementations are read-only against an immutable snapshot, so one
/// reader may be shared by any number of concurrent callers.
pub trait StorageReader {
    /// Read the storage word at `key` in `address`'s storage.
    ///
    /// An unset slot reads as `B256::ZERO`. Only a backend failure is an error.
    fn read_storage(&self, address: Address, key: StorageKey) -> Result<B256, OracleError>;
}

impl<T: StorageReader + ?Sized> StorageReader for &T {
    fn read_storage(&self, address: Address, key: StorageKey) -> Result<B256, OracleError> {
        (**self).read_storage(address, key)
    }
}
