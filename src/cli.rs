use alloy_primitives::Address;
use clap::Parser;
use std::path::PathBuf;

/// CLI arguments for the slot key inspector
#[derive(Parser, Debug)]
#[command(name = "slot-keys", about = "Inspect slot auction storage keys, delegates and stakes")]
pub struct Cli {
    /// Chain ID whose auction proxy to inspect (1 = mainnet, 3 = Ropsten)
    #[arg(long, default_value = "1")]
    pub chain_id: u64,

    /// JSON file with a `{"proxies": {"<chain id>": "<address>"}}` table
    /// replacing the built-in one.
    #[arg(long)]
    pub contracts: Option<PathBuf>,

    /// Comma-separated staker addresses to derive stake balance keys for.
    #[arg(long, value_delimiter = ',')]
    pub address: Vec<Address>,

    /// Genesis / state dump JSON to resolve delegates and stakes from offline.
    #[arg(long)]
    pub genesis: Option<PathBuf>,

    /// Header timestamp used when checking slot expiration.
    #[arg(long, default_value = "0")]
    pub timestamp: u64,

    /// Treat London as not yet active (oracle reports disabled).
    #[arg(long)]
    pub pre_london: bool,

    /// Builder pool config JSON to validate and print the worker plan for.
    #[arg(long)]
    pub miner_config: Option<PathBuf>,
}
