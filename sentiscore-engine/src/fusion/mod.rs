// Fusion - Multi-Signal Score Combination
//
// Lexical polarity + sub-signals → one score in [0, 5]:
// emoji adjustment → weight redistribution → weighted sum → amplification → clamp/rescale

pub mod weights;

pub use weights::{SignalPresence, WeightVector, BASE_WEIGHTS};

use crate::types::{Score, SubSignals, MAX_SCORE, MIN_SCORE};
use serde::{Deserialize, Serialize};

/// Emoji multiplier when emoji and text polarity disagree
pub const EMOJI_CONFLICT_FACTOR: f64 = 0.5;

/// Emoji multiplier when they agree (or either is zero)
pub const EMOJI_AGREEMENT_FACTOR: f64 = 2.0;

/// Multiplier applied to a directionally consistent raw score
pub const AMPLIFICATION_FACTOR: f64 = 1.2;

/// Every intermediate value of one combination, for diagnostics
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub lexical: f64,
    pub emoji_adjusted: f64,
    pub weights: WeightVector,
    /// Weighted sum before amplification
    pub raw: f64,
    /// Whether the 1.2x amplification fired
    pub amplified: bool,
    /// Raw value after amplification and clamping to [-1, 1]
    pub clamped: f64,
    pub score: Score,
}

/// Fuses lexical polarity with [`SubSignals`]
///
/// Stateless and deterministic: identical inputs always produce identical scores.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScoreCombiner;

impl ScoreCombiner {
    pub fn new() -> Self {
        Self
    }

    /// Final score in [0, 5]
    pub fn combine(&self, lexical: f64, signals: &SubSignals) -> Score {
        self.combine_detailed(lexical, signals).score
    }

    /// Final score with all intermediate values
    pub fn combine_detailed(&self, lexical: f64, signals: &SubSignals) -> ScoreBreakdown {
        let emoji_adjusted = adjust_emoji(lexical, signals.emoji_raw);

        let weights = BASE_WEIGHTS.redistribute(&SignalPresence {
            length: signals.length,
            exclaim: signals.exclaim,
            emoji_adjusted,
            toxicity_norm: signals.toxicity_norm,
            question_penalty: signals.question_penalty,
        });

        // Toxicity pulls the score down; every other signal adds
        let raw = weights.w_text * lexical
            + weights.w_length * signals.length
            + weights.w_exclam * signals.exclaim
            + weights.w_emoji * emoji_adjusted
            - weights.w_toxicity * signals.toxicity_norm
            + weights.w_qm * signals.question_penalty;

        let amplified = should_amplify(lexical, emoji_adjusted, signals);
        let boosted = if amplified { raw * AMPLIFICATION_FACTOR } else { raw };

        let clamped = boosted.clamp(-1.0, 1.0);
        let score = ((clamped + 1.0) * 2.5).clamp(MIN_SCORE, MAX_SCORE);

        ScoreBreakdown {
            lexical,
            emoji_adjusted,
            weights,
            raw,
            amplified,
            clamped,
            score,
        }
    }
}

/// Dampen conflicting emoji sentiment, reinforce agreeing sentiment
fn adjust_emoji(lexical: f64, emoji_raw: f64) -> f64 {
    let conflicting = (lexical < 0.0 && emoji_raw > 0.0) || (lexical > 0.0 && emoji_raw < 0.0);
    if conflicting {
        emoji_raw * EMOJI_CONFLICT_FACTOR
    } else {
        emoji_raw * EMOJI_AGREEMENT_FACTOR
    }
}

/// Amplify only when the direction of `lexical` is backed by another signal
fn should_amplify(lexical: f64, emoji_adjusted: f64, signals: &SubSignals) -> bool {
    if lexical > 0.0 {
        emoji_adjusted > 0.0 || signals.exclaim > 0.0 || signals.toxicity_norm <= 0.0
    } else if lexical < 0.0 {
        emoji_adjusted < 0.0 || signals.toxicity_norm > 0.0 || signals.question_penalty < 0.0
    } else {
        false
    }
}
