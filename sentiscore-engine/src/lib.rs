//! sentiscore-engine: multi-signal review sentiment scoring
//!
//! Scores free-text reviews on a 0-5 scale by fusing lexical polarity, emoji
//! sentiment, toxicity, punctuation cues and length, and scores large datasets
//! by splitting them into ordered chunks processed concurrently.
//!
//! Layers:
//! - [`oracles`]: seams for the external lexical and toxicity models
//! - [`extractors`]: raw sub-signal extraction (Tier 1)
//! - [`fusion`]: adaptive-weight combination into one score (Tier 2)
//! - [`workflow`]: chunk workers and the batch scheduler
//! - [`dataset`]: table-in / table-out boundary

pub mod dataset;
pub mod error;
pub mod extractors;
pub mod fusion;
pub mod oracles;
pub mod types;
pub mod workflow;

pub use crate::dataset::{ReviewTable, ScoredTable};
pub use crate::error::{BatchError, OracleError, RowScoringError, ScoringResult};
pub use crate::extractors::SignalExtractor;
pub use crate::fusion::{ScoreBreakdown, ScoreCombiner, WeightVector};
pub use crate::oracles::{
    LexicalPolarityOracle, OracleFactory, OracleSet, ToxicityDistribution, ToxicityOracle,
};
pub use crate::types::{BatchResult, Review, ScoredReview, SubSignals, FALLBACK_SCORE};
pub use crate::workflow::{BatchScheduler, ChunkWorker, SchedulerConfig};
