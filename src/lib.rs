//! # Slot Auction Builder - Multi-Strategy Block Candidate Assembly
//!
//! Block production layer for a Reth POA node that builds several competing
//! candidates per slot, one per bundling strategy, and orders transactions by
//! auction-slot ownership and stake read directly from contract storage.

pub mod auction;
pub mod cli;
pub mod constants;
pub mod miner;
pub mod onchain;
pub mod output;
