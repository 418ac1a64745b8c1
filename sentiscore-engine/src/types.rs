//! Core data model shared by extractors, fusion and the batch workflow

use serde::{Deserialize, Serialize};
use std::time::Duration;
use uuid::Uuid;

/// Sentiment score on the 0.0-5.0 scale
pub type Score = f64;

/// Lowest possible score
pub const MIN_SCORE: Score = 0.0;

/// Highest possible score
pub const MAX_SCORE: Score = 5.0;

/// Neutral score substituted when a review cannot be scored
pub const FALLBACK_SCORE: Score = 2.5;

/// One review to score
///
/// `row_index` is the review's position in the (null-filtered, renumbered)
/// dataset and survives every transformation unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Review {
    pub row_index: usize,
    pub text: String,
}

impl Review {
    pub fn new(row_index: usize, text: impl Into<String>) -> Self {
        Self {
            row_index,
            text: text.into(),
        }
    }

    /// Drop absent texts and number the survivors 0..k-1, preserving order
    pub fn reindex<I, S>(texts: I) -> Vec<Review>
    where
        I: IntoIterator<Item = Option<S>>,
        S: Into<String>,
    {
        texts
            .into_iter()
            .flatten()
            .enumerate()
            .map(|(row_index, text)| Review::new(row_index, text))
            .collect()
    }
}

/// Raw sub-signals for one text (lexical polarity comes from its own oracle)
///
/// Computed fresh for every review; never cached.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SubSignals {
    /// Unbounded emoji/emoticon sentiment sum
    pub emoji_raw: f64,
    /// Character length intensity, [0, 1]
    pub length: f64,
    /// Exclamation intensity, [0, 1]
    pub exclaim: f64,
    /// Repeated question mark penalty, [-0.3, 0]
    pub question_penalty: f64,
    /// Toxicity probability mapped to [-1, 1]
    pub toxicity_norm: f64,
}

/// A review with its final score
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredReview {
    pub row_index: usize,
    pub text: String,
    pub sentiment_score: Score,
}

/// Diagnostic for a row that received the fallback score
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RowFailure {
    pub row_index: usize,
    pub error: String,
}

/// Fully reassembled output of one batch run
#[derive(Debug, Clone)]
pub struct BatchResult {
    /// Correlation id used in logs and events
    pub batch_id: Uuid,
    /// Scored rows, ascending by `row_index`
    pub rows: Vec<ScoredReview>,
    /// Rows that fell back to [`FALLBACK_SCORE`], ascending by `row_index`
    pub failures: Vec<RowFailure>,
    /// Wall-clock time for the whole batch
    pub elapsed: Duration,
}

impl BatchResult {
    /// Scores in row order
    pub fn scores(&self) -> Vec<Score> {
        self.rows.iter().map(|r| r.sentiment_score).collect()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
