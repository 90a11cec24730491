use alloy_primitives::{address, Address};

/// Maximum gas all bundle transactions may consume in one block
pub const BUNDLE_TOTAL_GAS_LIMIT: u64 = 4_500_000;
/// Maximum gas a single auction slot may consume
pub const SLOT_GAS_LIMIT: u64 = 1_500_000;
/// Number of block-space auction slots tracked by the proxy contract
pub const SLOTS_AMOUNT: usize = 3;
/// Chain ID of Ethereum mainnet
pub const MAINNET_CHAIN_ID: u64 = 1;
/// Chain ID of the Ropsten testnet
pub const ROPSTEN_CHAIN_ID: u64 = 3;
/// Slot auction proxy on mainnet
pub const MAINNET_AUCTION_PROXY: Address = address!("9E3382cA57F4404AC7Bf435475EAe37e87D1c453");
/// Slot auction proxy on Ropsten
pub const ROPSTEN_AUCTION_PROXY: Address = address!("aa75DE4acC8590CF8299106b24656cDa2357C458");
