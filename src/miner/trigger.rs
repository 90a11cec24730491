use alloy_primitives::B256;
use tokio::sync::broadcast;

/// Triggers buffered per worker before a slow worker starts lagging
pub const TRIGGER_CHANNEL_CAPACITY: usize = 16;

/// Request to (re)build a candidate on top of `parent_hash`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuildTrigger {
    /// Parent block the candidate extends
    pub parent_hash: B256,
    /// Timestamp of the candidate header
    pub timestamp: u64,
}

/// Intake channel shared by every worker of a pool.
///
/// Each worker holds its own receiver, so every published trigger is seen by
/// every worker rather than being taken by whichever polls first.
#[derive(Debug, Clone)]
pub struct TriggerBus {
    sender: broadcast::Sender<BuildTrigger>,
}

impl TriggerBus {
    /// Bus buffering up to `capacity` triggers per receiver.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    /// New receiver observing every trigger published from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<BuildTrigger> {
        self.sender.subscribe()
    }

    /// Publish `trigger` to every receiver; returns how many were reached.
    pub fn publish(&self, trigger: BuildTrigger) -> usize {
        self.sender.send(trigger).unwrap_or(0)
    }

    /// Number of live receivers.
    pub fn receiver_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for TriggerBus {
    fn default() -> Self {
        Self::new(TRIGGER_CHANNEL_CAPACITY)
    }
}
