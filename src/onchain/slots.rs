/// Slot auction proxy contract storage layout.
///
/// Only the mapping base slots read by the builder are listed; every entry
/// lives at `keccak256(key ++ base)`.
pub mod auction_slots {
    /// slot 1: slotExpiration (mapping(uint8 => uint64))
    pub const SLOT_EXPIRATION_MAPPING: u64 = 1;
    /// slot 2: slotDelegate (mapping(uint8 => address))
    pub const SLOT_DELEGATE_MAPPING: u64 = 2;
    /// slot 5: stakedBalance (mapping(address => uint256))
    pub const STAKED_BALANCE_MAPPING: u64 = 5;
}
