//! Batch scheduler
//!
//! Partitions the reviews into `worker_count` ordered chunks, runs one
//! [`ChunkWorker`] per chunk on its own blocking execution unit, accepts chunk
//! results in completion order, and reassembles them by `row_index`.
//!
//! # Execution units
//! Each unit builds its own oracles through the [`OracleFactory`] on its own
//! thread before scoring. Units share nothing mutable; the review sequence is
//! shared read-only.
//!
//! # Failure handling
//! - Row failures are absorbed by the worker (fallback score)
//! - A failed unit (oracle construction error or panic) is re-dispatched up to
//!   `chunk_retry_attempts` times with fresh oracles, then fails the batch
//! - The scheduler always waits for every dispatched unit before returning

use super::chunk_worker::{panic_message, ChunkOutput, ChunkWorker};
use super::partition::partition;
use crate::dataset::{ReviewTable, ScoredTable};
use crate::error::{BatchError, ScoringResult};
use crate::oracles::OracleFactory;
use crate::types::{BatchResult, Review};
use anyhow::Context;
use futures::stream::{FuturesUnordered, StreamExt};
use sentiscore_common::config::ScoringSettings;
use sentiscore_common::events::{EventBus, ScoringEvent};
use std::ops::Range;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

/// Scheduler configuration
#[derive(Debug, Clone)]
pub struct SchedulerConfig {
    /// Chunks / execution units used by [`BatchScheduler::score`] and [`BatchScheduler::score_table`]
    pub worker_count: usize,
    /// Re-dispatches allowed per failed chunk
    pub chunk_retry_attempts: u32,
    /// Rows between progress events
    pub progress_interval: usize,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        ScoringSettings::default().into()
    }
}

impl From<ScoringSettings> for SchedulerConfig {
    fn from(settings: ScoringSettings) -> Self {
        Self {
            worker_count: settings.worker_count,
            chunk_retry_attempts: settings.chunk_retry_attempts,
            progress_interval: settings.progress_interval,
        }
    }
}

/// Partition → dispatch → recombine harness
pub struct BatchScheduler {
    factory: Arc<dyn OracleFactory>,
    config: SchedulerConfig,
    event_bus: Option<EventBus>,
}

impl BatchScheduler {
    /// Create scheduler building per-unit oracles with `factory`
    pub fn new(factory: Arc<dyn OracleFactory>, config: SchedulerConfig) -> Self {
        Self {
            factory,
            config,
            event_bus: None,
        }
    }

    /// Create scheduler reporting progress on `event_bus`
    pub fn with_events(
        factory: Arc<dyn OracleFactory>,
        config: SchedulerConfig,
        event_bus: EventBus,
    ) -> Self {
        Self {
            factory,
            config,
            event_bus: Some(event_bus),
        }
    }

    /// Configured worker count
    pub fn worker_count(&self) -> usize {
        self.config.worker_count
    }

    /// Score a table of records with the configured worker count
    pub async fn score_table(&self, table: ReviewTable) -> ScoringResult<ScoredTable> {
        self.run_table(table, self.config.worker_count).await
    }

    /// Score `texts` with the configured worker count
    pub async fn score<I, S>(&self, texts: I) -> ScoringResult<BatchResult>
    where
        I: IntoIterator<Item = Option<S>>,
        S: Into<String>,
    {
        self.run(texts, self.config.worker_count).await
    }

    /// Score a table of records
    ///
    /// Fails with [`BatchError::MissingField`] before any work if the table
    /// has no `review` field. Rows with a null review are dropped.
    pub async fn run_table(&self, table: ReviewTable, worker_count: usize) -> ScoringResult<ScoredTable> {
        let (records, reviews) = table.into_reviews()?;
        let result = self.run_reviews(reviews, worker_count).await?;
        ScoredTable::assemble(records, result)
    }

    /// Score `texts`; absent texts are dropped and the rest renumbered 0..k-1
    pub async fn run<I, S>(&self, texts: I, worker_count: usize) -> ScoringResult<BatchResult>
    where
        I: IntoIterator<Item = Option<S>>,
        S: Into<String>,
    {
        self.run_reviews(Review::reindex(texts), worker_count).await
    }

    /// Score already-indexed reviews
    ///
    /// The result is ordered by `row_index` regardless of which chunk finished first.
    pub async fn run_reviews(&self, reviews: Vec<Review>, worker_count: usize) -> ScoringResult<BatchResult> {
        if worker_count == 0 {
            return Err(BatchError::InvalidWorkerCount(worker_count));
        }

        let batch_id = Uuid::new_v4();
        let start = Instant::now();
        let total_rows = reviews.len();

        info!(
            batch_id = %batch_id,
            total_rows,
            worker_count,
            "Batch scoring started"
        );
        self.emit(ScoringEvent::BatchStarted {
            batch_id,
            total_rows,
            worker_count,
            timestamp: chrono::Utc::now(),
        });

        let reviews = Arc::new(reviews);
        let mut tasks = FuturesUnordered::new();
        let mut completed: Vec<Option<ChunkOutput>> = Vec::with_capacity(worker_count);

        for (chunk_index, range) in partition(total_rows, worker_count).into_iter().enumerate() {
            if range.is_empty() {
                completed.push(Some(ChunkOutput {
                    chunk_index,
                    rows: Vec::new(),
                    failures: Vec::new(),
                }));
                continue;
            }
            completed.push(None);
            tasks.push(self.run_chunk(batch_id, chunk_index, Arc::clone(&reviews), range));
        }

        // Drain in completion order; remember the first failure but let every unit finish
        let mut first_error = None;
        while let Some(result) = tasks.next().await {
            match result {
                Ok(output) => {
                    let index = output.chunk_index;
                    completed[index] = Some(output);
                }
                Err(e) => {
                    if first_error.is_none() {
                        first_error = Some(e);
                    }
                }
            }
        }

        if let Some(e) = first_error {
            error!(batch_id = %batch_id, error = %e, "Batch scoring aborted");
            return Err(e);
        }

        let mut rows = Vec::with_capacity(total_rows);
        let mut failures = Vec::new();
        for output in completed.into_iter().flatten() {
            rows.extend(output.rows);
            failures.extend(output.failures);
        }
        rows.sort_by_key(|r| r.row_index);
        failures.sort_by_key(|f| f.row_index);

        let elapsed = start.elapsed();
        info!(
            batch_id = %batch_id,
            total_rows = rows.len(),
            fallbacks = failures.len(),
            elapsed_ms = elapsed.as_millis() as u64,
            "Batch scoring completed"
        );
        self.emit(ScoringEvent::BatchCompleted {
            batch_id,
            total_rows: rows.len(),
            fallbacks: failures.len(),
            elapsed_ms: elapsed.as_millis() as u64,
            timestamp: chrono::Utc::now(),
        });

        Ok(BatchResult {
            batch_id,
            rows,
            failures,
            elapsed,
        })
    }

    /// Run one chunk on a blocking execution unit, re-dispatching on failure
    async fn run_chunk(
        &self,
        batch_id: Uuid,
        chunk_index: usize,
        reviews: Arc<Vec<Review>>,
        range: Range<usize>,
    ) -> ScoringResult<ChunkOutput> {
        let max_attempts = self.config.chunk_retry_attempts.saturating_add(1);
        let mut attempt = 0;

        loop {
            attempt += 1;

            let factory = Arc::clone(&self.factory);
            let reviews = Arc::clone(&reviews);
            let range = range.clone();
            let event_bus = self.event_bus.clone();
            let progress_interval = self.config.progress_interval;

            let handle = tokio::task::spawn_blocking(move || -> anyhow::Result<ChunkOutput> {
                let oracles = factory
                    .build(chunk_index)
                    .with_context(|| format!("failed to build oracles for chunk {}", chunk_index))?;

                let chunk = &reviews[range];
                let mut worker = ChunkWorker::new(chunk_index, oracles).with_batch(batch_id);
                if let Some(bus) = event_bus {
                    bus.emit_lossy(ScoringEvent::ChunkStarted {
                        batch_id,
                        chunk_index,
                        rows: chunk.len(),
                        attempt,
                        timestamp: chrono::Utc::now(),
                    });
                    worker = worker.with_events(bus, progress_interval);
                }

                Ok(worker.process(chunk))
            });

            let reason = match handle.await {
                Ok(Ok(output)) => {
                    debug!(
                        batch_id = %batch_id,
                        chunk_index,
                        attempt,
                        rows = output.rows.len(),
                        "Chunk completed"
                    );
                    self.emit(ScoringEvent::ChunkCompleted {
                        batch_id,
                        chunk_index,
                        rows: output.rows.len(),
                        fallbacks: output.failures.len(),
                        timestamp: chrono::Utc::now(),
                    });
                    return Ok(output);
                }
                Ok(Err(e)) => format!("{:#}", e),
                Err(join_error) if join_error.is_panic() => {
                    format!("execution unit panicked: {}", panic_message(join_error.into_panic()))
                }
                Err(join_error) => join_error.to_string(),
            };

            if attempt >= max_attempts {
                error!(
                    batch_id = %batch_id,
                    chunk_index,
                    attempts = attempt,
                    reason = %reason,
                    "Chunk failed, retries exhausted"
                );
                return Err(BatchError::ChunkExecution {
                    chunk_index,
                    attempts: attempt,
                    reason,
                });
            }

            warn!(
                batch_id = %batch_id,
                chunk_index,
                attempt,
                reason = %reason,
                "Chunk failed, re-dispatching"
            );
            self.emit(ScoringEvent::ChunkRetry {
                batch_id,
                chunk_index,
                attempt,
                reason,
                timestamp: chrono::Utc::now(),
            });
        }
    }

    fn emit(&self, event: ScoringEvent) {
        if let Some(bus) = &self.event_bus {
            bus.emit_lossy(event);
        }
    }
}
