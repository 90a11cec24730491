//! Colored console output for the `slot-keys` inspector.
//!
//! Color scheme: blue+bold headers, cyan values, green success,
//! yellow warnings, dimmed secondary text.

use crate::auction::SlotKeys;
use crate::miner::BuilderVariant;
use alloy_primitives::{Address, StorageKey, U256};
use colored::Colorize;

// ── Banner & Identity ──────────────────────────────────────────────

/// Print the startup banner with the chain's auction proxy.
pub fn print_banner(chain_id: u64, contract: Address, enabled: bool) {
    println!();
    println!("{}", "=== Slot Auction Inspector ===".blue().bold());
    println!("  Chain ID:     {}", chain_id.to_string().cyan());
    if contract.is_zero() {
        println!("  Proxy:        {}", "none".dimmed());
    } else {
        println!("  Proxy:        {}", format!("{contract}").cyan());
    }
    let state = if enabled { "enabled".green().bold() } else { "disabled".yellow().bold() };
    println!("  Oracle:       {state}");
}

/// Print a warning that the chain has no auction contract.
pub fn print_disabled_warning(chain_id: u64) {
    println!(
        "  {} No slot auction proxy for chain {}; all lookups are empty",
        "WARN".yellow().bold(),
        chain_id.to_string().cyan()
    );
}

// ── Storage Keys ───────────────────────────────────────────────────

/// Print the precomputed delegate / expiration keys of every slot.
pub fn print_slot_keys(keys: &[SlotKeys]) {
    println!();
    println!("{}", "Auction slot keys".blue().bold());
    for (i, slot) in keys.iter().enumerate() {
        println!("  {} {}", "slot".dimmed(), i.to_string().cyan());
        println!("    delegate:   {}", format!("{}", slot.delegate).cyan());
        println!("    expiration: {}", format!("{}", slot.expire).cyan());
    }
}

/// Print the stake balance key of one staker.
pub fn print_stake_key(addr: &Address, key: &StorageKey) {
    println!(
        "  {} stakedBalance[{}] → {}",
        "key".dimmed(),
        format!("{addr}").cyan(),
        format!("{key}").cyan()
    );
}

// ── Resolved State ─────────────────────────────────────────────────

/// Print the delegates of all active slots in slot order.
pub fn print_delegates(timestamp: u64, ordered: &[Address]) {
    println!();
    println!(
        "{} at timestamp {}",
        "Active delegates".blue().bold(),
        timestamp.to_string().cyan()
    );
    if ordered.is_empty() {
        println!("  {}", "(none)".dimmed());
    }
    for (rank, addr) in ordered.iter().enumerate() {
        println!("    {}. {}", (rank + 1).to_string().dimmed(), format!("{addr}").cyan());
    }
}

/// Print the resolved stake of one staker.
pub fn print_stake(addr: &Address, stake: U256) {
    println!(
        "  {} {} staked {}",
        "OK".green().bold(),
        format!("{addr}").cyan(),
        stake.to_string().cyan()
    );
}

// ── Builder Pool ───────────────────────────────────────────────────

/// Print the worker plan of a builder pool config.
pub fn print_worker_plan(variants: &[BuilderVariant]) {
    println!();
    println!(
        "{} ({} workers)",
        "Builder pool".blue().bold(),
        variants.len().to_string().cyan()
    );
    for (i, variant) in variants.iter().enumerate() {
        let role = if variant.is_canonical() { "canonical".green() } else { "variant".dimmed() };
        println!("    {}. {} {}", i.to_string().dimmed(), variant.to_string().cyan(), role);
    }
}
