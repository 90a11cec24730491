use crate::constants::{
    MAINNET_AUCTION_PROXY, MAINNET_CHAIN_ID, ROPSTEN_AUCTION_PROXY, ROPSTEN_CHAIN_ID,
};
use alloy_primitives::Address;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Chain ID → slot auction proxy address table.
///
/// Chains without an entry have no auction contract and the oracle built for
/// them stays disabled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuctionContracts {
    /// Proxy address per chain ID
    pub proxies: BTreeMap<u64, Address>,
}

impl Default for AuctionContracts {
    fn default() -> Self {
        Self {
            proxies: BTreeMap::from([
                (MAINNET_CHAIN_ID, MAINNET_AUCTION_PROXY),
                (ROPSTEN_CHAIN_ID, ROPSTEN_AUCTION_PROXY),
            ]),
        }
    }
}

impl AuctionContracts {
    /// An empty table: every chain is disabled.
    pub fn empty() -> Self {
        Self { proxies: BTreeMap::new() }
    }

    /// Add or replace the proxy for `chain_id`.
    pub fn with_proxy(mut self, chain_id: u64, proxy: Address) -> Self {
        self.proxies.insert(chain_id, proxy);
        self
    }

    /// Proxy address for `chain_id`, `None` when the chain has no auction.
    pub fn proxy_for(&self, chain_id: u64) -> Option<Address> {
        self.proxies.get(&chain_id).copied().filter(|addr| !addr.is_zero())
    }
}
