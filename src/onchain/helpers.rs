use alloy_primitives::{Address, Keccak256, StorageKey, B256, U256};

/// Compute the storage key of a Solidity mapping entry.
///
/// For `mapping(K => V)` declared at `base_slot`:
///   key = keccak256(key_padded ++ abi.encode(base_slot))
///
/// `key_bytes` must already be left-padded to 32 bytes.
pub fn mapping_slot_key(key_bytes: B256, base_slot: u64) -> StorageKey {
    let mut hasher = Keccak256::new();
    hasher.update(key_bytes.as_slice());
    hasher.update(B256::from(U256::from(base_slot).to_be_bytes()).as_slice());
    hasher.finalize()
}

/// Left-pad a small integer mapping key (e.g. an auction slot index).
pub fn slot_index_key(index: usize) -> B256 {
    B256::from(U256::from(index).to_be_bytes())
}

/// Left-pad an address mapping key.
pub fn address_key(addr: Address) -> B256 {
    addr.into_word()
}

/// Decode an address from a B256 storage value (left-padded with zeros).
pub fn decode_address(value: B256) -> Address {
    Address::from_slice(&value[12..32])
}

/// Decode a big-endian unsigned integer from a B256 storage value.
pub fn decode_u256(value: B256) -> U256 {
    U256::from_be_bytes(value.0)
}

/// Encode a u64 value into a B256 storage value.
pub fn encode_u64(value: u64) -> B256 {
    B256::from(U256::from(value).to_be_bytes())
}

/// Encode an address into a B256 storage value (left-padded).
pub fn encode_address(addr: Address) -> B256 {
    let mut bytes = [0u8; 32];
    bytes[12..32].copy_from_slice(addr.as_slice());
    B256::from(bytes)
}
