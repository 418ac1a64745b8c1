//! Scoring event types and EventBus
//!
//! Progress reporting for batch scoring. Events are advisory: nothing in the
//! scoring contract depends on anyone listening.

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use uuid::Uuid;

/// Batch scoring events
///
/// Every event carries the `batch_id` of the run that produced it so that
/// subscribers watching several batches can tell them apart.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ScoringEvent {
    /// Batch accepted and partitioned
    BatchStarted {
        batch_id: Uuid,
        /// Reviews to score after null filtering
        total_rows: usize,
        /// Number of chunks / execution units
        worker_count: usize,
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// An execution unit began processing its chunk
    ChunkStarted {
        batch_id: Uuid,
        chunk_index: usize,
        /// Rows in this chunk
        rows: usize,
        /// 1 on first dispatch, incremented on retry
        attempt: u32,
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// Periodic per-chunk progress
    ChunkProgress {
        batch_id: Uuid,
        chunk_index: usize,
        processed: usize,
        total: usize,
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// A row could not be scored and received the fallback score
    RowFallback {
        batch_id: Uuid,
        row_index: usize,
        error: String,
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// A chunk finished (rows are in chunk order)
    ChunkCompleted {
        batch_id: Uuid,
        chunk_index: usize,
        rows: usize,
        /// Rows that fell back to the neutral score
        fallbacks: usize,
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// A chunk failed and is being dispatched again
    ChunkRetry {
        batch_id: Uuid,
        chunk_index: usize,
        /// Attempt that failed
        attempt: u32,
        reason: String,
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// Whole batch reassembled
    BatchCompleted {
        batch_id: Uuid,
        total_rows: usize,
        fallbacks: usize,
        elapsed_ms: u64,
        timestamp: chrono::DateTime<chrono::Utc>,
    },
}

impl ScoringEvent {
    /// Batch this event belongs to
    pub fn batch_id(&self) -> Uuid {
        match self {
            ScoringEvent::BatchStarted { batch_id, .. }
            | ScoringEvent::ChunkStarted { batch_id, .. }
            | ScoringEvent::ChunkProgress { batch_id, .. }
            | ScoringEvent::RowFallback { batch_id, .. }
            | ScoringEvent::ChunkCompleted { batch_id, .. }
            | ScoringEvent::ChunkRetry { batch_id, .. }
            | ScoringEvent::BatchCompleted { batch_id, .. } => *batch_id,
        }
    }
}

/// Broadcast bus for scoring events
///
/// Cheap to clone; every clone publishes to the same channel.
#[derive(Clone)]
pub struct EventBus {
    tx: broadcast::Sender<ScoringEvent>,
    capacity: usize,
}

impl EventBus {
    /// Creates a new EventBus with specified channel capacity
    ///
    /// Slow subscribers lose the oldest events once `capacity` is exceeded.
    /// A capacity of zero is raised to one.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        let (tx, _) = broadcast::channel(capacity);
        Self { tx, capacity }
    }

    /// Subscribe to all future events
    pub fn subscribe(&self) -> broadcast::Receiver<ScoringEvent> {
        self.tx.subscribe()
    }

    /// Emit an event to all subscribers
    ///
    /// Returns `Err` if no subscribers are listening.
    #[allow(clippy::result_large_err)]
    pub fn emit(
        &self,
        event: ScoringEvent,
    ) -> Result<usize, broadcast::error::SendError<ScoringEvent>> {
        self.tx.send(event)
    }

    /// Emit an event, ignoring if no subscribers are listening
    pub fn emit_lossy(&self, event: ScoringEvent) {
        let _ = self.tx.send(event);
    }

    /// Get the current number of active subscribers
    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }

    /// Get the configured channel capacity
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
