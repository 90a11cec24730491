use slot_auction_builder::auction::{stake_balance_key, AuctionContracts, SlotDelegates, SlotOracle};
use slot_auction_builder::cli::Cli;
use slot_auction_builder::miner::{BuilderVariant, MinerConfig};
use slot_auction_builder::onchain::{GenesisStorageReader, OracleError, StorageReader};
use slot_auction_builder::output;

use alloy_primitives::{Address, U256};
use clap::Parser;

/// Inspect the slot auction layout for a chain and, optionally, resolve
/// delegates and stakes from a genesis/state dump.
fn main() -> eyre::Result<()> {
    reth_tracing::init_test_tracing();

    let cli = Cli::parse();

    let contracts = match &cli.contracts {
        Some(path) => serde_json::from_str(&std::fs::read_to_string(path)?)?,
        None => AuctionContracts::default(),
    };
    let oracle = SlotOracle::new(cli.chain_id, &contracts);
    let enabled = oracle.is_enabled(!cli.pre_london);

    output::print_banner(cli.chain_id, oracle.contract(), enabled);
    if oracle.slot_keys().is_empty() {
        output::print_disabled_warning(cli.chain_id);
    } else {
        output::print_slot_keys(oracle.slot_keys());
    }
    for addr in &cli.address {
        output::print_stake_key(addr, &stake_balance_key(*addr));
    }

    if let Some(path) = &cli.genesis {
        let genesis: alloy_genesis::Genesis = serde_json::from_str(&std::fs::read_to_string(path)?)?;
        let reader = GenesisStorageReader::from_genesis(&genesis);

        let (delegates, stakes) =
            resolve_offline(&oracle, &reader, enabled, cli.timestamp, &cli.address)?;
        output::print_delegates(cli.timestamp, &delegates.ordered);
        for (addr, stake) in &stakes {
            output::print_stake(addr, *stake);
        }
    }

    if let Some(path) = &cli.miner_config {
        let config: MinerConfig = serde_json::from_str(&std::fs::read_to_string(path)?)?;
        config.validate()?;
        output::print_worker_plan(&BuilderVariant::plan(&config));
    }

    Ok(())
}

/// Active delegates and per-address stakes from `reader`. A disabled oracle
/// reads nothing and resolves nothing.
fn resolve_offline(
    oracle: &SlotOracle,
    reader: &impl StorageReader,
    enabled: bool,
    timestamp: u64,
    addresses: &[Address],
) -> Result<(SlotDelegates, Vec<(Address, U256)>), OracleError> {
    if !enabled {
        return Ok(Default::default());
    }
    let delegates = oracle.resolve_active_delegates(reader, timestamp)?;
    let stakes = addresses
        .iter()
        .map(|addr| Ok((*addr, oracle.stake_balance_of(reader, *addr)?)))
        .collect::<Result<Vec<_>, OracleError>>()?;
    Ok((delegates, stakes))
}
