//! Batch workflow: partition → dispatch → recombine
//!
//! - [`partition`]: ordered, contiguous, near-equal chunking
//! - [`chunk_worker`]: scores one chunk in order, isolating row failures
//! - [`scheduler`]: runs one worker per chunk concurrently and reassembles by row index

pub mod chunk_worker;
pub mod partition;
pub mod scheduler;

pub use chunk_worker::{score_text, score_text_isolated, ChunkOutput, ChunkWorker, ScoreOutcome};
pub use partition::partition;
pub use scheduler::{BatchScheduler, SchedulerConfig};
