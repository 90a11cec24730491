//! Multi-Strategy Builder Pool
//!
//! Runs one regular worker plus a configurable number of bundle-merging and
//! stake-priority workers side by side, each building its own candidate for
//! the same slot:
//!
//!   TriggerBus (broadcast)
//!     ├─→ regular     (canonical, exposed as the pending block)
//!     ├─→ bundle-1 … bundle-N
//!     └─→ priority-1 … priority-M
//!
//! Every worker sees every trigger. Lifecycle and settings calls are fanned
//! out to all workers in order; `pending_block_and_receipts` only ever asks
//! the canonical worker.

pub mod config;
pub mod errors;
pub mod pool;
pub mod trigger;
pub mod variant;
pub mod worker;

pub use config::MinerConfig;
pub use errors::{BuildError, ConfigError};
pub use pool::{any_running, BuilderPool};
pub use trigger::{BuildTrigger, TriggerBus, TRIGGER_CHANNEL_CAPACITY};
pub use variant::BuilderVariant;
pub use worker::{
    sanitize_recommit_interval, BlockWorker, BuildJob, CandidateBlock, CandidateBuilder,
    CandidateWorker, CandidateWorkerFactory, PendingCandidate, WorkerFactory, WorkerSettings,
    MIN_RECOMMIT_INTERVAL,
};
