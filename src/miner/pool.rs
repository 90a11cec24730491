use super::config::MinerConfig;
use super::errors::ConfigError;
use super::trigger::{BuildTrigger, TriggerBus, TRIGGER_CHANNEL_CAPACITY};
use super::variant::BuilderVariant;
use super::worker::{BlockWorker, PendingCandidate, WorkerFactory};
use alloy_primitives::{Address, Bytes};
use std::time::Duration;
use tracing::info;

/// A fixed set of builder workers, one per strategy, sharing one trigger bus.
///
/// Configuration and lifecycle calls go to every worker; the pending block is
/// answered by the canonical worker alone so external polls never touch the
/// bundle workers.
#[derive(Debug)]
pub struct BuilderPool<W> {
    workers: Vec<W>,
    variants: Vec<BuilderVariant>,
    triggers: TriggerBus,
}

impl<W: BlockWorker> BuilderPool<W> {
    /// Create the canonical worker followed by the bundle and priority workers
    /// described by `config`.
    ///
    /// Fails without creating any worker when `config` does not validate.
    pub fn new<F>(config: &MinerConfig, factory: &F) -> Result<Self, ConfigError>
    where
        F: WorkerFactory<Worker = W>,
    {
        config.validate()?;

        let triggers = TriggerBus::new(TRIGGER_CHANNEL_CAPACITY);
        let variants = BuilderVariant::plan(config);
        let workers: Vec<W> = variants
            .iter()
            .map(|variant| factory.build_worker(config, variant.clone(), triggers.subscribe()))
            .collect();

        info!(
            max_bundle_workers = config.max_bundle_workers,
            max_priority_workers = config.max_priority_workers,
            workers = workers.len(),
            "creating builder pool"
        );
        Ok(Self { workers, variants, triggers })
    }

    /// The worker whose candidate is the pending block.
    pub fn canonical(&self) -> &W {
        &self.workers[0]
    }

    /// All workers, canonical first.
    pub fn workers(&self) -> &[W] {
        &self.workers
    }

    /// Variant of each worker, index-aligned with [`Self::workers`].
    pub fn variants(&self) -> &[BuilderVariant] {
        &self.variants
    }

    /// Publish a build trigger to every worker; returns how many received it.
    pub fn trigger(&self, trigger: BuildTrigger) -> usize {
        self.triggers.publish(trigger)
    }

    /// Start every worker.
    pub fn start(&self) {
        self.for_each_worker(|w| w.start());
    }

    /// Stop every worker. Does not wait for builds in progress.
    pub fn stop(&self) {
        self.for_each_worker(|w| w.stop());
    }

    /// Close every worker for good.
    pub fn close(&self) {
        self.for_each_worker(|w| w.close());
    }

    /// Whether any worker is building.
    pub fn is_running(&self) -> bool {
        any_running(&self.workers)
    }

    /// Pending block of the canonical worker. Other workers' candidates are
    /// never returned here.
    pub fn pending_block_and_receipts(&self) -> Option<PendingCandidate> {
        self.canonical().pending_block_and_receipts()
    }

    /// Set the block gas ceiling of every worker.
    pub fn set_gas_ceiling(&self, ceiling: u64) {
        self.for_each_worker(|w| w.set_gas_ceiling(ceiling));
    }

    /// Set the header extra data of every worker.
    pub fn set_extra_data(&self, extra: Bytes) {
        self.for_each_worker(|w| w.set_extra_data(extra.clone()));
    }

    /// Set the recommit interval of every worker.
    pub fn set_recommit_interval(&self, interval: Duration) {
        self.for_each_worker(|w| w.set_recommit_interval(interval));
    }

    /// Set the block reward recipient of every worker.
    pub fn set_fee_recipient(&self, recipient: Address) {
        self.for_each_worker(|w| w.set_fee_recipient(recipient));
    }

    /// Let every worker seal an empty candidate ahead of the full one.
    pub fn enable_preseal(&self) {
        self.for_each_worker(|w| w.enable_preseal());
    }

    /// Have every worker seal full candidates only.
    pub fn disable_preseal(&self) {
        self.for_each_worker(|w| w.disable_preseal());
    }

    fn for_each_worker(&self, f: impl FnMut(&W)) {
        self.workers.iter().for_each(f);
    }
}

/// True when at least one of `workers` is running; false for an empty set.
pub fn any_running<W: BlockWorker>(workers: &[W]) -> bool {
    workers.iter().any(|w| w.is_running())
}
