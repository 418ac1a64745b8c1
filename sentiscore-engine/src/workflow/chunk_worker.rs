//! Chunk worker
//!
//! Scores every review of one chunk in order with the execution unit's own
//! oracles. A row that fails to score gets [`FALLBACK_SCORE`]; the failure is
//! logged, reported as an event, and returned alongside the rows. It never
//! affects other rows, even when an oracle panics.

use crate::error::RowScoringError;
use crate::extractors::SignalExtractor;
use crate::fusion::ScoreCombiner;
use crate::oracles::OracleSet;
use crate::types::{Review, RowFailure, Score, ScoredReview, FALLBACK_SCORE};
use sentiscore_common::events::{EventBus, ScoringEvent};
use std::any::Any;
use std::panic::{catch_unwind, AssertUnwindSafe};
use tracing::{debug, warn};
use uuid::Uuid;

/// Recovery combinator for per-row scoring results
pub trait ScoreOutcome {
    /// The score, or [`FALLBACK_SCORE`] on any error
    fn or_fallback(self) -> Score;

    /// As [`ScoreOutcome::or_fallback`], handing the error to `report` first
    fn or_fallback_with<F>(self, report: F) -> Score
    where
        F: FnOnce(&RowScoringError);
}

impl ScoreOutcome for Result<Score, RowScoringError> {
    fn or_fallback(self) -> Score {
        self.unwrap_or(FALLBACK_SCORE)
    }

    fn or_fallback_with<F>(self, report: F) -> Score
    where
        F: FnOnce(&RowScoringError),
    {
        match self {
            Ok(score) => score,
            Err(e) => {
                report(&e);
                FALLBACK_SCORE
            }
        }
    }
}

/// Score one text: lexical oracle, sub-signal extraction, combination
pub fn score_text(
    oracles: &OracleSet,
    combiner: &ScoreCombiner,
    text: &str,
) -> Result<Score, RowScoringError> {
    let lexical = oracles.lexical.polarity(text)?;
    if !lexical.is_finite() || !(-1.0..=1.0).contains(&lexical) {
        return Err(RowScoringError::InvalidOracleOutput {
            oracle: "lexical",
            detail: format!("polarity {} outside [-1, 1]", lexical),
        });
    }

    let signals = SignalExtractor::new(oracles.toxicity.as_ref()).extract(text)?;
    Ok(combiner.combine(lexical, &signals))
}

/// As [`score_text`], turning a panic inside an oracle into [`RowScoringError::Panicked`]
pub fn score_text_isolated(
    oracles: &OracleSet,
    combiner: &ScoreCombiner,
    text: &str,
) -> Result<Score, RowScoringError> {
    catch_unwind(AssertUnwindSafe(|| score_text(oracles, combiner, text)))
        .unwrap_or_else(|payload| Err(RowScoringError::Panicked(panic_message(payload))))
}

/// Text of a panic payload
pub(crate) fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    }
}

/// Scored rows of one chunk, in chunk order
#[derive(Debug, Clone)]
pub struct ChunkOutput {
    pub chunk_index: usize,
    pub rows: Vec<ScoredReview>,
    pub failures: Vec<RowFailure>,
}

/// Applies the scoring pipeline to every row of one chunk
pub struct ChunkWorker {
    chunk_index: usize,
    batch_id: Uuid,
    oracles: OracleSet,
    combiner: ScoreCombiner,
    event_bus: Option<EventBus>,
    progress_interval: usize,
}

impl ChunkWorker {
    /// Create worker owning `oracles` for the chunk at `chunk_index`
    pub fn new(chunk_index: usize, oracles: OracleSet) -> Self {
        Self {
            chunk_index,
            batch_id: Uuid::nil(),
            oracles,
            combiner: ScoreCombiner::new(),
            event_bus: None,
            progress_interval: usize::MAX,
        }
    }

    /// Tag logs and events with the owning batch
    pub fn with_batch(mut self, batch_id: Uuid) -> Self {
        self.batch_id = batch_id;
        self
    }

    /// Report progress every `progress_interval` rows and each fallback on `event_bus`
    pub fn with_events(mut self, event_bus: EventBus, progress_interval: usize) -> Self {
        self.event_bus = Some(event_bus);
        self.progress_interval = progress_interval.max(1);
        self
    }

    /// Score `chunk` in order
    pub fn process(&self, chunk: &[Review]) -> ChunkOutput {
        debug!(
            batch_id = %self.batch_id,
            chunk_index = self.chunk_index,
            rows = chunk.len(),
            "Chunk processing started"
        );

        let total = chunk.len();
        let mut rows = Vec::with_capacity(total);
        let mut failures = Vec::new();

        for (processed, review) in chunk.iter().enumerate() {
            let sentiment_score = score_text_isolated(&self.oracles, &self.combiner, &review.text)
                .or_fallback_with(|e| {
                    warn!(
                        batch_id = %self.batch_id,
                        chunk_index = self.chunk_index,
                        row_index = review.row_index,
                        error = %e,
                        "Row scoring failed, using fallback score"
                    );
                    self.emit(ScoringEvent::RowFallback {
                        batch_id: self.batch_id,
                        row_index: review.row_index,
                        error: e.to_string(),
                        timestamp: chrono::Utc::now(),
                    });
                    failures.push(RowFailure {
                        row_index: review.row_index,
                        error: e.to_string(),
                    });
                });

            rows.push(ScoredReview {
                row_index: review.row_index,
                text: review.text.clone(),
                sentiment_score,
            });

            let done = processed + 1;
            if done % self.progress_interval == 0 || done == total {
                self.emit(ScoringEvent::ChunkProgress {
                    batch_id: self.batch_id,
                    chunk_index: self.chunk_index,
                    processed: done,
                    total,
                    timestamp: chrono::Utc::now(),
                });
            }
        }

        debug!(
            batch_id = %self.batch_id,
            chunk_index = self.chunk_index,
            rows = rows.len(),
            fallbacks = failures.len(),
            "Chunk processing completed"
        );

        ChunkOutput {
            chunk_index: self.chunk_index,
            rows,
            failures,
        }
    }

    fn emit(&self, event: ScoringEvent) {
        if let Some(bus) = &self.event_bus {
            bus.emit_lossy(event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::OracleError;
    use crate::oracles::{LexicalPolarityOracle, ToxicityDistribution, ToxicityOracle};

    struct FixedLexical(f64);

    impl LexicalPolarityOracle for FixedLexical {
        fn polarity(&self, _text: &str) -> Result<f64, OracleError> {
            Ok(self.0)
        }
    }

    /// Fails for any text containing "boom"
    struct TripwireToxicity;

    impl ToxicityOracle for TripwireToxicity {
        fn classify(&self, text: &str) -> Result<ToxicityDistribution, OracleError> {
            if text.contains("boom") {
                Err(OracleError::Toxicity("model rejected input".to_string()))
            } else {
                Ok(ToxicityDistribution::new(0.9, 0.1))
            }
        }
    }

    fn worker(lexical: f64) -> ChunkWorker {
        ChunkWorker::new(0, OracleSet::new(FixedLexical(lexical), TripwireToxicity))
    }

    #[test]
    fn test_or_fallback() {
        let ok: Result<Score, RowScoringError> = Ok(4.0);
        assert_eq!(ok.or_fallback(), 4.0);

        let err: Result<Score, RowScoringError> =
            Err(OracleError::Lexical("down".to_string()).into());
        let mut reported = None;
        assert_eq!(err.or_fallback_with(|e| reported = Some(e.to_string())), 2.5);
        assert_eq!(reported.as_deref(), Some("lexical oracle failed: down"));
    }

    #[test]
    fn test_process_preserves_chunk_order() {
        let chunk = vec![
            Review::new(10, "first"),
            Review::new(11, "second"),
            Review::new(12, "third"),
        ];
        let output = worker(0.3).process(&chunk);

        let indices: Vec<usize> = output.rows.iter().map(|r| r.row_index).collect();
        assert_eq!(indices, vec![10, 11, 12]);
        assert!(output.failures.is_empty());
    }

    #[test]
    fn test_failed_row_isolated() {
        let chunk = vec![
            Review::new(0, "fine"),
            Review::new(1, "boom"),
            Review::new(2, "fine"),
        ];
        let output = worker(0.3).process(&chunk);

        assert_eq!(output.rows[1].sentiment_score, FALLBACK_SCORE);
        assert_eq!(output.rows[0].sentiment_score, output.rows[2].sentiment_score);
        assert_ne!(output.rows[0].sentiment_score, FALLBACK_SCORE);
        assert_eq!(output.failures.len(), 1);
        assert_eq!(output.failures[0].row_index, 1);
    }

    #[test]
    fn test_out_of_range_lexical_falls_back() {
        let output = worker(1.7).process(&[Review::new(0, "text")]);
        assert_eq!(output.rows[0].sentiment_score, FALLBACK_SCORE);
        assert!(output.failures[0].error.contains("lexical"));

        let output = worker(f64::NAN).process(&[Review::new(0, "text")]);
        assert_eq!(output.rows[0].sentiment_score, FALLBACK_SCORE);
    }

    struct PanickyLexical;

    impl LexicalPolarityOracle for PanickyLexical {
        fn polarity(&self, text: &str) -> Result<f64, OracleError> {
            if text.contains("crash") {
                panic!("analyzer crashed on {:?}", text);
            }
            Ok(0.4)
        }
    }

    #[test]
    fn test_panicking_oracle_isolated_to_row() {
        let worker = ChunkWorker::new(0, OracleSet::new(PanickyLexical, TripwireToxicity));
        let chunk = vec![
            Review::new(0, "fine"),
            Review::new(1, "crash here"),
            Review::new(2, "fine"),
        ];
        let output = worker.process(&chunk);

        assert_eq!(output.rows.len(), 3);
        assert_eq!(output.rows[1].sentiment_score, FALLBACK_SCORE);
        assert_eq!(output.rows[0].sentiment_score, output.rows[2].sentiment_score);
        assert_eq!(output.failures.len(), 1);
        assert!(output.failures[0].error.contains("analyzer crashed"));
    }

    #[test]
    fn test_panic_message() {
        assert_eq!(panic_message(Box::new("static")), "static");
        assert_eq!(panic_message(Box::new(String::from("owned"))), "owned");
        assert_eq!(panic_message(Box::new(7u8)), "unknown panic payload");
    }

    #[test]
    fn test_empty_chunk() {
        let output = worker(0.5).process(&[]);
        assert!(output.rows.is_empty());
        assert!(output.failures.is_empty());
    }

    #[test]
    fn test_progress_and_fallback_events() {
        let bus = EventBus::new(64);
        let mut rx = bus.subscribe();
        let batch_id = Uuid::new_v4();
        let chunk: Vec<Review> = (0..5)
            .map(|i| Review::new(i, if i == 3 { "boom" } else { "ok" }))
            .collect();

        worker(0.2)
            .with_batch(batch_id)
            .with_events(bus, 2)
            .process(&chunk);

        let mut progress = Vec::new();
        let mut fallbacks = Vec::new();
        while let Ok(event) = rx.try_recv() {
            assert_eq!(event.batch_id(), batch_id);
            match event {
                ScoringEvent::ChunkProgress { processed, .. } => progress.push(processed),
                ScoringEvent::RowFallback { row_index, .. } => fallbacks.push(row_index),
                other => panic!("unexpected event {:?}", other),
            }
        }
        assert_eq!(progress, vec![2, 4, 5]);
        assert_eq!(fallbacks, vec![3]);
    }
}
