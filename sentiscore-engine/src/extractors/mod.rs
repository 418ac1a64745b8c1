//! Signal extraction
//!
//! Computes the non-lexical sub-signals for one review text:
//! emoji sentiment, question mark penalty, exclamation intensity,
//! length intensity, and normalized toxicity.

pub mod emoji_table;

use crate::error::RowScoringError;
use crate::oracles::ToxicityOracle;
use crate::types::SubSignals;

pub use emoji_table::{demojize, emoji_score};

/// Length (in characters) at which length intensity saturates
pub const LENGTH_SATURATION_CHARS: f64 = 500.0;

/// Exclamation marks at which exclamation intensity saturates
pub const EXCLAIM_SATURATION: f64 = 5.0;

/// Penalty per `?` beyond the first
pub const QUESTION_MARK_STEP: f64 = -0.05;

/// Floor of the question mark penalty
pub const QUESTION_MARK_FLOOR: f64 = -0.3;

/// Extracts [`SubSignals`] using the execution unit's toxicity oracle
pub struct SignalExtractor<'a> {
    toxicity: &'a dyn ToxicityOracle,
}

impl<'a> SignalExtractor<'a> {
    pub fn new(toxicity: &'a dyn ToxicityOracle) -> Self {
        Self { toxicity }
    }

    /// Compute all sub-signals for `text`
    ///
    /// Oracle failures and out-of-contract oracle output propagate to the caller.
    pub fn extract(&self, text: &str) -> Result<SubSignals, RowScoringError> {
        let emoji_raw = emoji_score(text);
        let length = length_intensity(text);
        let exclaim = exclaim_intensity(text);
        let question_penalty = question_mark_penalty(text);
        let toxicity_norm = self.toxicity_norm(text)?;

        Ok(SubSignals {
            emoji_raw,
            length,
            exclaim,
            question_penalty,
            toxicity_norm,
        })
    }

    /// Toxic-class probability mapped from [0, 1] to [-1, 1]
    fn toxicity_norm(&self, text: &str) -> Result<f64, RowScoringError> {
        let input = match self.toxicity.max_input_chars() {
            Some(limit) => truncate_chars(text, limit),
            None => text,
        };

        let distribution = self.toxicity.classify(input)?;
        distribution.validate()?;

        Ok((distribution.toxic - 0.5) * 2.0)
    }
}

/// `min(chars / 500, 1)`
pub fn length_intensity(text: &str) -> f64 {
    (text.chars().count() as f64 / LENGTH_SATURATION_CHARS).min(1.0)
}

/// `min(count('!') / 5, 1)`
pub fn exclaim_intensity(text: &str) -> f64 {
    (text.matches('!').count() as f64 / EXCLAIM_SATURATION).min(1.0)
}

/// `max(-0.05 * max(count('?') - 1, 0), -0.3)`
pub fn question_mark_penalty(text: &str) -> f64 {
    let count = text.matches('?').count() as f64;
    let penalty = QUESTION_MARK_STEP * (count - 1.0).max(0.0);
    penalty.max(QUESTION_MARK_FLOOR)
}

/// First `limit` characters of `text`, on a char boundary
fn truncate_chars(text: &str, limit: usize) -> &str {
    match text.char_indices().nth(limit) {
        Some((byte_idx, _)) => &text[..byte_idx],
        None => text,
    }
}
