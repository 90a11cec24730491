use super::config::MinerConfig;
use super::errors::BuildError;
use super::trigger::BuildTrigger;
use super::variant::BuilderVariant;
use alloy_consensus::{Block, Receipt, TxEnvelope};
use alloy_primitives::{Address, Bytes};
use parking_lot::RwLock;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{broadcast, watch, Notify};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// Shortest interval at which a worker rebuilds its current candidate.
pub const MIN_RECOMMIT_INTERVAL: Duration = Duration::from_millis(100);

/// Raise `interval` to [`MIN_RECOMMIT_INTERVAL`] if it is shorter.
pub fn sanitize_recommit_interval(interval: Duration) -> Duration {
    if interval < MIN_RECOMMIT_INTERVAL {
        warn!(
            provided = ?interval,
            updated = ?MIN_RECOMMIT_INTERVAL,
            "sanitizing miner recommit interval"
        );
        return MIN_RECOMMIT_INTERVAL;
    }
    interval
}

/// Block type produced by builder workers.
pub type CandidateBlock = Block<TxEnvelope>;

/// A committed candidate block and the receipts of its transactions.
#[derive(Debug, Clone)]
pub struct PendingCandidate {
    /// The candidate block
    pub block: Arc<CandidateBlock>,
    /// Receipts in transaction order
    pub receipts: Arc<Vec<Receipt>>,
}

impl PendingCandidate {
    /// Wrap a freshly built block and its receipts.
    pub fn new(block: CandidateBlock, receipts: Vec<Receipt>) -> Self {
        Self { block: Arc::new(block), receipts: Arc::new(receipts) }
    }
}

/// Contract of a single block-building worker.
///
/// Every method signals the worker and returns promptly: none may wait for an
/// in-flight build. The pool relies on this to fan calls out sequentially
/// without a stuck worker holding up the others.
pub trait BlockWorker: Send + Sync {
    /// Resume building on incoming triggers.
    fn start(&self);
    /// Stop building. Idempotent.
    fn stop(&self);
    /// Stop permanently and release the build loop.
    fn close(&self);
    /// Whether the worker is currently building.
    fn is_running(&self) -> bool;
    /// Set the block gas ceiling used for subsequent builds.
    fn set_gas_ceiling(&self, ceiling: u64);
    /// Set the header extra data used for subsequent builds.
    fn set_extra_data(&self, extra: Bytes);
    /// Set how often the current candidate is rebuilt.
    fn set_recommit_interval(&self, interval: Duration);
    /// Set the block reward recipient.
    fn set_fee_recipient(&self, recipient: Address);
    /// Allow sealing an empty candidate ahead of the full one.
    fn enable_preseal(&self);
    /// Only ever seal full candidates.
    fn disable_preseal(&self);
    /// Latest committed candidate, without waiting on a build in progress.
    fn pending_block_and_receipts(&self) -> Option<PendingCandidate>;
}

/// Creates one worker per pool variant.
///
/// Chain spec, consensus engine and transaction pool handles are captured by
/// the factory implementation.
pub trait WorkerFactory {
    /// Worker type produced.
    type Worker: BlockWorker;

    /// Build the worker running `variant`, reading triggers from `triggers`.
    fn build_worker(
        &self,
        config: &MinerConfig,
        variant: BuilderVariant,
        triggers: broadcast::Receiver<BuildTrigger>,
    ) -> Self::Worker;
}

impl<F, W> WorkerFactory for F
where
    F: Fn(&MinerConfig, BuilderVariant, broadcast::Receiver<BuildTrigger>) -> W,
    W: BlockWorker,
{
    type Worker = W;

    fn build_worker(
        &self,
        config: &MinerConfig,
        variant: BuilderVariant,
        triggers: broadcast::Receiver<BuildTrigger>,
    ) -> W {
        self(config, variant, triggers)
    }
}

/// Mutable per-worker settings applied to each build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkerSettings {
    /// Block gas ceiling
    pub gas_ceiling: u64,
    /// Header extra data
    pub extra_data: Bytes,
    /// Rebuild interval
    pub recommit_interval: Duration,
    /// Block reward recipient
    pub fee_recipient: Address,
    /// Whether an empty candidate may be sealed first
    pub preseal: bool,
}

impl From<&MinerConfig> for WorkerSettings {
    fn from(config: &MinerConfig) -> Self {
        Self {
            gas_ceiling: config.gas_ceiling,
            extra_data: config.extra_data.clone(),
            recommit_interval: sanitize_recommit_interval(config.recommit_interval()),
            fee_recipient: config.fee_recipient,
            preseal: true,
        }
    }
}

/// Everything a [`CandidateBuilder`] needs for one build attempt.
#[derive(Debug, Clone)]
pub struct BuildJob {
    /// Trigger being served
    pub trigger: BuildTrigger,
    /// Strategy of the worker running the build
    pub variant: BuilderVariant,
    /// Settings snapshot taken when the build started
    pub settings: WorkerSettings,
}

/// Block building engine driven by a [`CandidateWorker`].
///
/// Implementations open the parent state for `job.trigger.parent_hash`,
/// annotate pending transactions with stake when `job.variant` is priority
/// aware, and assemble the candidate.
pub trait CandidateBuilder: Send + Sync + 'static {
    /// Build one candidate.
    fn build(&self, job: &BuildJob) -> Result<PendingCandidate, BuildError>;
}

impl<T: CandidateBuilder> CandidateBuilder for Arc<T> {
    fn build(&self, job: &BuildJob) -> Result<PendingCandidate, BuildError> {
        (**self).build(job)
    }
}

/// [`BlockWorker`] running its build loop as a Tokio task.
///
/// Each received trigger (and every recommit tick after the first trigger)
/// produces a build while the worker is running. Committed candidates are
/// published through a `watch` channel so readers never contend with the
/// build loop.
#[derive(Debug)]
pub struct CandidateWorker<B> {
    shared: Arc<WorkerShared<B>>,
    task: JoinHandle<()>,
}

#[derive(Debug)]
struct WorkerShared<B> {
    variant: BuilderVariant,
    builder: B,
    running: AtomicBool,
    closed: AtomicBool,
    // Set by `stop`; the loop drops the trigger it was serving.
    discard: AtomicBool,
    settings: RwLock<WorkerSettings>,
    wake: Notify,
    pending: watch::Sender<Option<PendingCandidate>>,
}

impl<B: CandidateBuilder> CandidateWorker<B> {
    /// Spawn the worker's build loop. Must be called within a Tokio runtime.
    ///
    /// The worker starts stopped. Builds run on Tokio's blocking pool, so
    /// workers sharing a runtime build concurrently.
    pub fn spawn(
        builder: B,
        variant: BuilderVariant,
        mut settings: WorkerSettings,
        triggers: broadcast::Receiver<BuildTrigger>,
    ) -> Self {
        settings.recommit_interval = sanitize_recommit_interval(settings.recommit_interval);
        let (pending, _) = watch::channel(None);
        let shared = Arc::new(WorkerShared {
            variant,
            builder,
            running: AtomicBool::new(false),
            closed: AtomicBool::new(false),
            discard: AtomicBool::new(false),
            settings: RwLock::new(settings),
            wake: Notify::new(),
            pending,
        });
        let task = tokio::spawn(build_loop(Arc::clone(&shared), triggers));
        Self { shared, task }
    }

    /// Strategy this worker runs.
    pub fn variant(&self) -> &BuilderVariant {
        &self.shared.variant
    }

    /// Current settings snapshot.
    pub fn settings(&self) -> WorkerSettings {
        self.shared.settings.read().clone()
    }

    /// Receiver notified on every committed candidate.
    pub fn subscribe_pending(&self) -> watch::Receiver<Option<PendingCandidate>> {
        self.shared.pending.subscribe()
    }

    /// Whether the build loop has exited.
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

impl<B: CandidateBuilder> BlockWorker for CandidateWorker<B> {
    fn start(&self) {
        if self.shared.closed.load(Ordering::Acquire) {
            return;
        }
        self.shared.running.store(true, Ordering::Release);
        self.shared.wake.notify_one();
    }

    fn stop(&self) {
        self.shared.discard.store(true, Ordering::Release);
        self.shared.running.store(false, Ordering::Release);
    }

    fn close(&self) {
        self.shared.close();
    }

    fn is_running(&self) -> bool {
        self.shared.running.load(Ordering::Acquire)
    }

    fn set_gas_ceiling(&self, ceiling: u64) {
        self.shared.settings.write().gas_ceiling = ceiling;
    }

    fn set_extra_data(&self, extra: Bytes) {
        self.shared.settings.write().extra_data = extra;
    }

    fn set_recommit_interval(&self, interval: Duration) {
        self.shared.settings.write().recommit_interval = sanitize_recommit_interval(interval);
        self.shared.wake.notify_one();
    }

    fn set_fee_recipient(&self, recipient: Address) {
        self.shared.settings.write().fee_recipient = recipient;
    }

    fn enable_preseal(&self) {
        self.shared.settings.write().preseal = true;
    }

    fn disable_preseal(&self) {
        self.shared.settings.write().preseal = false;
    }

    fn pending_block_and_receipts(&self) -> Option<PendingCandidate> {
        self.shared.pending.borrow().clone()
    }
}

impl<B> Drop for CandidateWorker<B> {
    fn drop(&mut self) {
        self.shared.close();
    }
}

impl<B> WorkerShared<B> {
    fn close(&self) {
        self.closed.store(true, Ordering::Release);
        self.running.store(false, Ordering::Release);
        self.wake.notify_one();
    }
}

impl<B: CandidateBuilder> WorkerShared<B> {
    fn commit(&self, trigger: BuildTrigger) {
        let job = BuildJob {
            trigger,
            variant: self.variant.clone(),
            settings: self.settings.read().clone(),
        };
        match self.builder.build(&job) {
            Ok(candidate) => {
                debug!(
                    variant = %self.variant,
                    number = candidate.block.header.number,
                    txs = candidate.block.body.transactions.len(),
                    "committed candidate"
                );
                self.pending.send_replace(Some(candidate));
            }
            Err(err) => {
                warn!(variant = %self.variant, parent = %trigger.parent_hash, %err, "candidate build failed");
            }
        }
    }
}

async fn build_loop<B: CandidateBuilder>(
    shared: Arc<WorkerShared<B>>,
    mut triggers: broadcast::Receiver<BuildTrigger>,
) {
    let mut last: Option<BuildTrigger> = None;
    while !shared.closed.load(Ordering::Acquire) {
        let recommit = shared.settings.read().recommit_interval;
        let received = tokio::select! {
            _ = shared.wake.notified() => None,
            received = triggers.recv() => match received {
                Ok(trigger) => Some(trigger),
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    warn!(variant = %shared.variant, skipped, "worker lagging behind build triggers");
                    None
                }
                Err(broadcast::error::RecvError::Closed) => {
                    debug!(variant = %shared.variant, "trigger bus closed");
                    break;
                }
            },
            _ = tokio::time::sleep(recommit), if last.is_some() => None,
        };

        if shared.discard.swap(false, Ordering::AcqRel) {
            last = None;
        }
        if let Some(trigger) = newest_trigger(&shared.variant, &mut triggers, received) {
            last = Some(trigger);
        }

        if shared.closed.load(Ordering::Acquire) || !shared.running.load(Ordering::Acquire) {
            continue;
        }
        if let Some(trigger) = last {
            let job_shared = Arc::clone(&shared);
            if let Err(err) = tokio::task::spawn_blocking(move || job_shared.commit(trigger)).await {
                warn!(variant = %shared.variant, %err, "candidate build task failed");
            }
        }
    }
    debug!(variant = %shared.variant, "build loop exited");
}

/// Skip every buffered trigger but the most recent one.
fn newest_trigger(
    variant: &BuilderVariant,
    triggers: &mut broadcast::Receiver<BuildTrigger>,
    mut newest: Option<BuildTrigger>,
) -> Option<BuildTrigger> {
    loop {
        match triggers.try_recv() {
            Ok(trigger) => newest = Some(trigger),
            Err(broadcast::error::TryRecvError::Lagged(skipped)) => {
                warn!(%variant, skipped, "worker lagging behind build triggers");
            }
            Err(broadcast::error::TryRecvError::Empty | broadcast::error::TryRecvError::Closed) => {
                return newest
            }
        }
    }
}

/// Factory spawning a [`CandidateWorker`] per variant, each with its own clone
/// of the block building engine.
#[derive(Debug, Clone)]
pub struct CandidateWorkerFactory<B> {
    builder: B,
}

impl<B: CandidateBuilder + Clone> CandidateWorkerFactory<B> {
    /// Factory cloning `builder` into every worker.
    pub fn new(builder: B) -> Self {
        Self { builder }
    }
}

impl<B: CandidateBuilder + Clone> WorkerFactory for CandidateWorkerFactory<B> {
    type Worker = CandidateWorker<B>;

    fn build_worker(
        &self,
        config: &MinerConfig,
        variant: BuilderVariant,
        triggers: broadcast::Receiver<BuildTrigger>,
    ) -> CandidateWorker<B> {
        CandidateWorker::spawn(self.builder.clone(), variant, config.into(), triggers)
    }
}
