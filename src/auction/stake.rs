use super::oracle::SlotOracle;
use crate::onchain::{OracleError, StorageReader};
use alloy_primitives::{Address, U256};
use std::collections::HashMap;
use std::hash::BuildHasher;

/// A pending transaction that can carry its sender's staked balance.
///
/// The builder reads the stake back when ordering priority bundles.
pub trait Stakeable {
    /// Attach `stake` to the transaction.
    fn set_stake(&mut self, stake: U256);

    /// Stake attached by the last annotation pass, if any.
    fn stake(&self) -> Option<U256>;
}

/// Wraps a pool transaction with the sender's stake.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StakedTransaction<T> {
    /// The wrapped transaction
    pub inner: T,
    stake: Option<U256>,
}

impl<T> StakedTransaction<T> {
    /// Wrap `inner` with no stake attached.
    pub fn new(inner: T) -> Self {
        Self { inner, stake: None }
    }

    /// Stake, or zero when never annotated.
    pub fn stake_or_zero(&self) -> U256 {
        self.stake.unwrap_or_default()
    }

    /// Unwrap the transaction.
    pub fn into_inner(self) -> T {
        self.inner
    }
}

impl<T> Stakeable for StakedTransaction<T> {
    fn set_stake(&mut self, stake: U256) {
        self.stake = Some(stake);
    }

    fn stake(&self) -> Option<U256> {
        self.stake
    }
}

/// Stamps each sender's staked balance onto their pending transactions.
///
/// Balances are memoized only for the duration of one [`annotate`] call, so a
/// pass against a newer snapshot always re-reads.
///
/// [`annotate`]: StakeAnnotator::annotate
#[derive(Debug, Clone, Copy)]
pub struct StakeAnnotator<'a> {
    oracle: &'a SlotOracle,
}

impl<'a> StakeAnnotator<'a> {
    /// Annotator reading stakes through `oracle`.
    pub fn new(oracle: &'a SlotOracle) -> Self {
        Self { oracle }
    }

    /// Look up each sender's stake once and attach it to all of their transactions.
    ///
    /// Every stake is read before any transaction is touched: when a state read
    /// fails, the error is returned and `txs` is left exactly as it was.
    pub fn annotate<Tx, S>(
        &self,
        state: &impl StorageReader,
        txs: &mut HashMap<Address, Vec<Tx>, S>,
    ) -> Result<(), OracleError>
    where
        Tx: Stakeable,
        S: BuildHasher,
    {
        let mut staked: HashMap<Address, U256> = HashMap::with_capacity(txs.len());
        for sender in txs.keys() {
            if !staked.contains_key(sender) {
                staked.insert(*sender, self.oracle.stake_balance_of(state, *sender)?);
            }
        }

        for (sender, list) in txs.iter_mut() {
            let stake = staked.get(sender).copied().unwrap_or_default();
            for tx in list.iter_mut() {
                tx.set_stake(stake);
            }
        }
        Ok(())
    }
}
