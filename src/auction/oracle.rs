use super::config::AuctionContracts;
use crate::constants::SLOTS_AMOUNT;
use crate::onchain::{
    address_key, auction_slots, decode_address, decode_u256, mapping_slot_key, slot_index_key,
    OracleError, StorageReader,
};
use alloy_primitives::{Address, StorageKey, U256};
use reth_chainspec::EthereumHardforks;
use std::collections::HashSet;
use tracing::{debug, info};

/// Precomputed storage keys of one auction slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotKeys {
    /// `slotDelegate[index]`
    pub delegate: StorageKey,
    /// `slotExpiration[index]`
    pub expire: StorageKey,
}

impl SlotKeys {
    /// Derive both keys for slot `index`.
    pub fn for_index(index: usize) -> Self {
        let key = slot_index_key(index);
        Self {
            delegate: mapping_slot_key(key, auction_slots::SLOT_DELEGATE_MAPPING),
            expire: mapping_slot_key(key, auction_slots::SLOT_EXPIRATION_MAPPING),
        }
    }
}

/// Delegates currently owning an unexpired auction slot.
///
/// `ordered` follows slot index order and keeps duplicates (one address may
/// hold several slots); `set` is the deduplicated view.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SlotDelegates {
    /// Distinct delegate addresses
    pub set: HashSet<Address>,
    /// Delegates in ascending slot order
    pub ordered: Vec<Address>,
}

impl SlotDelegates {
    /// Whether `addr` owns at least one active slot.
    pub fn contains(&self, addr: &Address) -> bool {
        self.set.contains(addr)
    }

    /// Rank of `addr`'s first slot, used for tie-breaking (lower wins).
    pub fn position(&self, addr: &Address) -> Option<usize> {
        self.ordered.iter().position(|a| a == addr)
    }

    /// No slot is active.
    pub fn is_empty(&self) -> bool {
        self.ordered.is_empty()
    }

    fn push(&mut self, addr: Address) {
        self.set.insert(addr);
        self.ordered.push(addr);
    }
}

/// Why a slot was left out of [`SlotDelegates`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SlotSkip {
    /// Header timestamp is past the slot's expiration (0 = never configured)
    Expired { expiration: U256 },
    /// The slot has no delegate yet
    Unowned,
}

/// Reads auction slot ownership and stake balances from the proxy's storage.
///
/// Built once per chain at start-up. When the chain has no proxy the oracle is
/// permanently disabled and every lookup returns an empty result.
#[derive(Debug, Clone)]
pub struct SlotOracle {
    contract: Address,
    slots: Option<[SlotKeys; SLOTS_AMOUNT]>,
}

impl SlotOracle {
    /// Build the oracle for `chain_id`, precomputing the slot keys when the
    /// chain has a proxy.
    pub fn new(chain_id: u64, contracts: &AuctionContracts) -> Self {
        match contracts.proxy_for(chain_id) {
            Some(contract) => Self::with_contract(contract),
            None => {
                debug!(chain_id, "no slot auction proxy, oracle disabled");
                Self::disabled()
            }
        }
    }

    /// Oracle reading from an explicit proxy address.
    pub fn with_contract(contract: Address) -> Self {
        if contract.is_zero() {
            return Self::disabled();
        }
        Self { contract, slots: Some(std::array::from_fn(SlotKeys::for_index)) }
    }

    /// Oracle that never reads anything.
    pub fn disabled() -> Self {
        Self { contract: Address::ZERO, slots: None }
    }

    /// Proxy address, zero when disabled.
    pub fn contract(&self) -> Address {
        self.contract
    }

    /// Precomputed slot keys, empty when disabled.
    pub fn slot_keys(&self) -> &[SlotKeys] {
        self.slots.as_ref().map(|s| s.as_slice()).unwrap_or(&[])
    }

    /// Whether lookups are meaningful: a proxy is configured and the chain has
    /// activated London at the current height.
    ///
    /// Must be re-checked per block, activation depends on height.
    pub fn is_enabled(&self, london_active: bool) -> bool {
        self.slots.is_some() && london_active
    }

    /// [`Self::is_enabled`] against a chain spec at `block_number`.
    pub fn is_enabled_at(&self, chain_spec: &impl EthereumHardforks, block_number: u64) -> bool {
        self.is_enabled(chain_spec.is_london_active_at_block(block_number))
    }

    /// Resolve the delegates of every active slot at `header_timestamp`.
    pub fn resolve_active_delegates(
        &self,
        state: &impl StorageReader,
        header_timestamp: u64,
    ) -> Result<SlotDelegates, OracleError> {
        let mut delegates = SlotDelegates::default();
        for (index, keys) in self.slot_keys().iter().enumerate() {
            match self.slot_delegate(state, header_timestamp, keys)? {
                Ok(addr) => delegates.push(addr),
                Err(SlotSkip::Expired { expiration }) => {
                    if !expiration.is_zero() {
                        info!(header = header_timestamp, %expiration, slot = index, "slot expired");
                    }
                }
                Err(SlotSkip::Unowned) => {
                    debug!(slot = index, "slot has no delegate");
                }
            }
        }
        Ok(delegates)
    }

    /// Staked balance of `addr`; zero when unset or the oracle is disabled.
    pub fn stake_balance_of(
        &self,
        state: &impl StorageReader,
        addr: Address,
    ) -> Result<U256, OracleError> {
        if self.slots.is_none() {
            return Ok(U256::ZERO);
        }
        let key = stake_balance_key(addr);
        Ok(decode_u256(state.read_storage(self.contract, key)?))
    }

    fn slot_delegate(
        &self,
        state: &impl StorageReader,
        header_timestamp: u64,
        keys: &SlotKeys,
    ) -> Result<Result<Address, SlotSkip>, OracleError> {
        let expiration = decode_u256(state.read_storage(self.contract, keys.expire)?);
        if U256::from(header_timestamp) > expiration {
            return Ok(Err(SlotSkip::Expired { expiration }));
        }

        let delegate = state.read_storage(self.contract, keys.delegate)?;
        if delegate.is_zero() {
            return Ok(Err(SlotSkip::Unowned));
        }
        Ok(Ok(decode_address(delegate)))
    }
}

/// Storage key of `stakedBalance[addr]`.
pub fn stake_balance_key(addr: Address) -> StorageKey {
    mapping_slot_key(address_key(addr), auction_slots::STAKED_BALANCE_MAPPING)
}
