//! Slot Auction Oracle
//!
//! Resolves who currently owns each block-space auction slot and how much
//! every sender has staked, by reading the auction proxy's storage at the
//! parent block:
//!
//!   parent state → SlotOracle::resolve_active_delegates → slot owners
//!   parent state → StakeAnnotator::annotate            → stake on each pending tx
//!   ↓
//!   priority-aware builder workers order bundles by delegate rank and stake
//!
//! Expired and unowned slots are normal outcomes and simply do not show up in
//! the result. Only a failing state read is an error.

pub mod config;
pub mod oracle;
pub mod stake;

pub use config::AuctionContracts;
pub use oracle::{stake_balance_key, SlotDelegates, SlotKeys, SlotOracle};
pub use stake::{StakeAnnotator, Stakeable, StakedTransaction};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::{
        MAINNET_AUCTION_PROXY, MAINNET_CHAIN_ID, ROPSTEN_AUCTION_PROXY, ROPSTEN_CHAIN_ID,
        SLOTS_AMOUNT,
    };
    use crate::onchain::{encode_address, encode_u64, OracleError, StorageReader};
    use alloy_primitives::{b256, Address, StorageKey, B256, U256};
    use reth_chainspec::{ChainSpec, MAINNET};
    use std::collections::{BTreeMap, HashMap};
    use std::sync::atomic::{AtomicUsize, Ordering};

    // =========================================================================
    // Helpers
    // =========================================================================

    #[derive(Default)]
    struct MockStorage {
        storage: BTreeMap<(Address, StorageKey), B256>,
        reads: AtomicUsize,
        fail_on: Option<StorageKey>,
    }

    impl MockStorage {
        fn set(&mut self, address: Address, key: StorageKey, value: B256) {
            self.storage.insert((address, key), value);
        }

        fn reads(&self) -> usize {
            self.reads.load(Ordering::SeqCst)
        }
    }

    impl StorageReader for MockStorage {
        fn read_storage(&self, address: Address, key: StorageKey) -> Result<B256, OracleError> {
            self.reads.fetch_add(1, Ordering::SeqCst);
            if self.fail_on == Some(key) {
                return Err(OracleError::StateRead { address, key, source: "trie node missing".into() });
            }
            Ok(self.storage.get(&(address, key)).copied().unwrap_or_default())
        }
    }

    struct FailingStorage;

    impl StorageReader for FailingStorage {
        fn read_storage(&self, address: Address, key: StorageKey) -> Result<B256, OracleError> {
            Err(OracleError::StateRead { address, key, source: "database closed".into() })
        }
    }

    fn addr(n: u8) -> Address {
        Address::with_last_byte(n)
    }

    fn ropsten() -> SlotOracle {
        SlotOracle::new(ROPSTEN_CHAIN_ID, &AuctionContracts::default())
    }

    /// Populate slot `index` with an expiration and a delegate.
    fn set_slot(
        mock: &mut MockStorage,
        oracle: &SlotOracle,
        index: usize,
        expiration: u64,
        delegate: Address,
    ) {
        let keys = oracle.slot_keys()[index];
        mock.set(oracle.contract(), keys.expire, encode_u64(expiration));
        mock.set(oracle.contract(), keys.delegate, encode_address(delegate));
    }

    // =========================================================================
    // Construction
    // =========================================================================

    #[test]
    fn test_default_table_has_two_chains() {
        let contracts = AuctionContracts::default();
        assert_eq!(contracts.proxy_for(MAINNET_CHAIN_ID), Some(MAINNET_AUCTION_PROXY));
        assert_eq!(contracts.proxy_for(ROPSTEN_CHAIN_ID), Some(ROPSTEN_AUCTION_PROXY));
        assert_eq!(contracts.proxy_for(5), None);
        assert_eq!(contracts.proxies.len(), 2);
    }

    #[test]
    fn test_ropsten_slot_keys_match_known_vectors() {
        let oracle = ropsten();
        let delegate = [
            b256!("ac33ff75c19e70fe83507db0d683fd3465c996598dc972688b7ace676c89077b"),
            b256!("e90b7bceb6e7df5418fb78d8ee546e97c83a08bbccc01a0644d599ccd2a7c2e0"),
            b256!("679795a0195a1b76cdebb7c51d74e058aee92919b8c3389af86ef24535e8a28c"),
        ];
        let expire = [
            b256!("a6eef7e35abe7026729641147f7915573c7e97b47efa546f5f6e3230263bcb49"),
            b256!("cc69885fda6bcc1a4ace058b4a62bf5e179ea78fd58a1ccd71c22cc9b688792f"),
            b256!("d9d16d34ffb15ba3a3d852f0d403e2ce1d691fb54de27ac87cd2f993f3ec330f"),
        ];

        assert_eq!(oracle.slot_keys().len(), SLOTS_AMOUNT);
        for (i, keys) in oracle.slot_keys().iter().enumerate() {
            assert_eq!(keys.delegate, delegate[i], "slot {i} delegate key");
            assert_eq!(keys.expire, expire[i], "slot {i} expire key");
            assert_eq!(*keys, SlotKeys::for_index(i));
        }
    }

    #[test]
    fn test_unknown_chain_is_disabled() {
        let oracle = SlotOracle::new(5, &AuctionContracts::default());
        assert_eq!(oracle.contract(), Address::ZERO);
        assert!(oracle.slot_keys().is_empty());
        assert!(!oracle.is_enabled(true));
    }

    #[test]
    fn test_zero_proxy_is_disabled() {
        let contracts = AuctionContracts::empty().with_proxy(7, Address::ZERO);
        assert!(!SlotOracle::new(7, &contracts).is_enabled(true));
        assert!(!SlotOracle::with_contract(Address::ZERO).is_enabled(true));
    }

    #[test]
    fn test_synthetic_chain_from_json_config() {
        let json = r#"{ "proxies": { "1337": "0x00000000000000000000000000000000000000c0" } }"#;
        let contracts: AuctionContracts = serde_json::from_str(json).unwrap();
        let oracle = SlotOracle::new(1337, &contracts);
        assert!(oracle.is_enabled(true));
        assert_eq!(oracle.contract(), addr(0xc0));

        // The default table is untouched by a second, independent oracle.
        assert!(!SlotOracle::new(1337, &AuctionContracts::default()).is_enabled(true));
    }

    #[test]
    fn test_oracles_share_keys_across_chains() {
        let mainnet = SlotOracle::new(MAINNET_CHAIN_ID, &AuctionContracts::default());
        assert_eq!(mainnet.slot_keys(), ropsten().slot_keys());
        assert_ne!(mainnet.contract(), ropsten().contract());
    }

    // =========================================================================
    // Enablement
    // =========================================================================

    #[test]
    fn test_enabled_requires_upgrade() {
        let oracle = ropsten();
        assert!(oracle.is_enabled(true));
        assert!(!oracle.is_enabled(false));
        // Re-evaluated on every call, nothing sticks.
        assert!(oracle.is_enabled(true));
    }

    #[test]
    fn test_enabled_at_follows_london_activation() {
        let spec: &ChainSpec = &MAINNET;
        let oracle = SlotOracle::new(MAINNET_CHAIN_ID, &AuctionContracts::default());
        assert!(!oracle.is_enabled_at(spec, 1));
        assert!(oracle.is_enabled_at(spec, 12_965_000));
        assert!(oracle.is_enabled_at(spec, 20_000_000));
    }

    // =========================================================================
    // Delegate resolution
    // =========================================================================

    #[test]
    fn test_resolve_all_slots_active() {
        let oracle = ropsten();
        let mut mock = MockStorage::default();
        for i in 0..SLOTS_AMOUNT {
            set_slot(&mut mock, &oracle, i, 2_000, addr(i as u8 + 1));
        }

        let delegates = oracle.resolve_active_delegates(&mock, 1_000).unwrap();
        assert_eq!(delegates.ordered, vec![addr(1), addr(2), addr(3)]);
        assert_eq!(delegates.set.len(), 3);
        assert_eq!(delegates.position(&addr(3)), Some(2));
    }

    #[test]
    fn test_never_configured_slot_is_skipped() {
        let oracle = ropsten();
        let mut mock = MockStorage::default();
        set_slot(&mut mock, &oracle, 0, 0, addr(1));
        set_slot(&mut mock, &oracle, 1, 5_000, addr(2));

        let delegates = oracle.resolve_active_delegates(&mock, 1).unwrap();
        assert_eq!(delegates.ordered, vec![addr(2)]);
        assert!(!delegates.contains(&addr(1)));
    }

    #[test]
    fn test_expired_slot_is_skipped() {
        let oracle = ropsten();
        let mut mock = MockStorage::default();
        set_slot(&mut mock, &oracle, 0, 999, addr(1));
        set_slot(&mut mock, &oracle, 1, 1_000, addr(2));

        // Expiration equal to the header timestamp is still active.
        let delegates = oracle.resolve_active_delegates(&mock, 1_000).unwrap();
        assert_eq!(delegates.ordered, vec![addr(2)]);
    }

    #[test]
    fn test_wide_expiration_word_is_not_truncated() {
        let oracle = ropsten();
        let mut mock = MockStorage::default();
        let keys = oracle.slot_keys()[0];
        mock.set(oracle.contract(), keys.expire, B256::from(U256::from(1u128 << 64).to_be_bytes()));
        mock.set(oracle.contract(), keys.delegate, encode_address(addr(9)));

        let delegates = oracle.resolve_active_delegates(&mock, u64::MAX).unwrap();
        assert_eq!(delegates.ordered, vec![addr(9)]);
    }

    #[test]
    fn test_unowned_slot_is_skipped() {
        let oracle = ropsten();
        let mut mock = MockStorage::default();
        set_slot(&mut mock, &oracle, 0, 10_000, Address::ZERO);
        set_slot(&mut mock, &oracle, 2, 10_000, addr(3));

        let delegates = oracle.resolve_active_delegates(&mock, 100).unwrap();
        assert_eq!(delegates.ordered, vec![addr(3)]);
        assert!(!delegates.contains(&Address::ZERO));
    }

    #[test]
    fn test_duplicates_kept_in_order_collapsed_in_set() {
        let oracle = ropsten();
        let mut mock = MockStorage::default();
        set_slot(&mut mock, &oracle, 0, 10_000, addr(7));
        set_slot(&mut mock, &oracle, 1, 10, addr(8));
        set_slot(&mut mock, &oracle, 2, 10_000, addr(7));

        let delegates = oracle.resolve_active_delegates(&mock, 100).unwrap();
        assert_eq!(delegates.ordered, vec![addr(7), addr(7)]);
        assert_eq!(delegates.set.len(), 1);
        assert_eq!(delegates.position(&addr(7)), Some(0));
    }

    #[test]
    fn test_disabled_oracle_resolves_nothing() {
        let oracle = SlotOracle::new(42, &AuctionContracts::default());
        let mut mock = MockStorage::default();
        let keys = SlotKeys::for_index(0);
        mock.set(ROPSTEN_AUCTION_PROXY, keys.expire, encode_u64(u64::MAX));
        mock.set(ROPSTEN_AUCTION_PROXY, keys.delegate, encode_address(addr(1)));

        let delegates = oracle.resolve_active_delegates(&mock, 1).unwrap();
        assert!(delegates.is_empty());
        assert!(delegates.set.is_empty());
        assert_eq!(mock.reads(), 0);

        // No reads means no failure either.
        assert!(oracle.resolve_active_delegates(&FailingStorage, 1).unwrap().is_empty());
    }

    #[test]
    fn test_state_read_failure_propagates() {
        let err = ropsten().resolve_active_delegates(&FailingStorage, 1).unwrap_err();
        match err {
            OracleError::StateRead { address, .. } => assert_eq!(address, ROPSTEN_AUCTION_PROXY),
        }
    }

    // =========================================================================
    // Stake balances
    // =========================================================================

    #[test]
    fn test_stake_balance_reads_mapping_entry() {
        let oracle = ropsten();
        let mut mock = MockStorage::default();
        let stake = U256::from(10u64).pow(U256::from(24));
        mock.set(oracle.contract(), stake_balance_key(addr(1)), B256::from(stake.to_be_bytes()));

        assert_eq!(oracle.stake_balance_of(&mock, addr(1)).unwrap(), stake);
        assert_eq!(oracle.stake_balance_of(&mock, addr(2)).unwrap(), U256::ZERO);
    }

    #[test]
    fn test_stake_balance_disabled_is_zero() {
        let oracle = SlotOracle::disabled();
        assert_eq!(oracle.stake_balance_of(&FailingStorage, addr(1)).unwrap(), U256::ZERO);
    }

    #[test]
    fn test_stake_balance_failure_propagates() {
        assert!(ropsten().stake_balance_of(&FailingStorage, addr(1)).is_err());
    }

    // =========================================================================
    // Annotation
    // =========================================================================

    #[test]
    fn test_annotate_reads_each_sender_once() {
        let oracle = ropsten();
        let mut mock = MockStorage::default();
        mock.set(oracle.contract(), stake_balance_key(addr(1)), encode_u64(500));
        mock.set(oracle.contract(), stake_balance_key(addr(2)), encode_u64(7));

        let mut txs: HashMap<Address, Vec<StakedTransaction<u64>>> = HashMap::new();
        txs.insert(addr(1), (0..5).map(StakedTransaction::new).collect());
        txs.insert(addr(2), vec![StakedTransaction::new(9)]);
        txs.insert(addr(3), vec![StakedTransaction::new(10), StakedTransaction::new(11)]);

        StakeAnnotator::new(&oracle).annotate(&mock, &mut txs).unwrap();

        assert_eq!(mock.reads(), 3);
        assert!(txs[&addr(1)].iter().all(|tx| tx.stake() == Some(U256::from(500))));
        assert_eq!(txs[&addr(2)][0].stake(), Some(U256::from(7)));
        assert!(txs[&addr(3)].iter().all(|tx| tx.stake() == Some(U256::ZERO)));
        assert_eq!(txs[&addr(1)][4].inner, 4);
    }

    #[test]
    fn test_annotate_does_not_cache_across_calls() {
        let oracle = ropsten();
        let mut mock = MockStorage::default();
        mock.set(oracle.contract(), stake_balance_key(addr(1)), encode_u64(1));

        let mut txs = HashMap::from([(addr(1), vec![StakedTransaction::new(())])]);
        let annotator = StakeAnnotator::new(&oracle);
        annotator.annotate(&mock, &mut txs).unwrap();
        assert_eq!(txs[&addr(1)][0].stake_or_zero(), U256::from(1));

        // A newer snapshot with a different balance must be re-read.
        let mut newer = MockStorage::default();
        newer.set(oracle.contract(), stake_balance_key(addr(1)), encode_u64(2));
        annotator.annotate(&newer, &mut txs).unwrap();
        assert_eq!(mock.reads(), 1);
        assert_eq!(newer.reads(), 1);
        assert_eq!(txs[&addr(1)][0].stake_or_zero(), U256::from(2));
    }

    #[test]
    fn test_annotate_disabled_stamps_zero() {
        let oracle = SlotOracle::disabled();
        let mut txs = HashMap::from([(addr(1), vec![StakedTransaction::new("tx")])]);
        StakeAnnotator::new(&oracle).annotate(&FailingStorage, &mut txs).unwrap();
        assert_eq!(txs[&addr(1)][0].stake(), Some(U256::ZERO));
    }

    #[test]
    fn test_annotate_failure_propagates() {
        let oracle = ropsten();
        let mut txs = HashMap::from([(addr(1), vec![StakedTransaction::new(0u8)])]);
        let result = StakeAnnotator::new(&oracle).annotate(&FailingStorage, &mut txs);
        assert!(result.is_err());
        assert_eq!(txs[&addr(1)][0].stake(), None);
    }

    #[test]
    fn test_annotate_failure_leaves_every_sender_untouched() {
        let oracle = ropsten();
        let senders: Vec<Address> = (1..=8).map(addr).collect();
        let mut old = MockStorage::default();
        let mut newer = MockStorage::default();
        for sender in &senders {
            old.set(oracle.contract(), stake_balance_key(*sender), encode_u64(1));
            newer.set(oracle.contract(), stake_balance_key(*sender), encode_u64(2));
        }
        newer.fail_on = Some(stake_balance_key(addr(5)));

        let mut txs: HashMap<Address, Vec<StakedTransaction<u8>>> = senders
            .iter()
            .map(|sender| (*sender, vec![StakedTransaction::new(0), StakedTransaction::new(1)]))
            .collect();
        let annotator = StakeAnnotator::new(&oracle);
        annotator.annotate(&old, &mut txs).unwrap();

        // The failing pass must not mix stakes from the two snapshots.
        assert!(annotator.annotate(&newer, &mut txs).is_err());
        for list in txs.values() {
            assert!(list.iter().all(|tx| tx.stake() == Some(U256::from(1))));
        }
    }
}
