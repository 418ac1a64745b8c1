// Weight Vector - Adaptive Redistribution
//
// Each non-text signal whose effective value is exactly zero gives its whole
// weight to the text signal. Mass moves, it is never created or destroyed.

use serde::{Deserialize, Serialize};

/// Per-signal weights used in the weighted combination
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeightVector {
    pub w_text: f64,
    pub w_length: f64,
    pub w_exclam: f64,
    pub w_emoji: f64,
    pub w_toxicity: f64,
    pub w_qm: f64,
}

/// Base weights before redistribution
pub const BASE_WEIGHTS: WeightVector = WeightVector {
    w_text: 0.45,
    w_length: 0.01,
    w_exclam: 0.05,
    w_emoji: 0.20,
    w_toxicity: 0.25,
    w_qm: 0.05,
};

/// Effective values of the five non-text signals
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SignalPresence {
    pub length: f64,
    pub exclaim: f64,
    pub emoji_adjusted: f64,
    pub toxicity_norm: f64,
    pub question_penalty: f64,
}

impl WeightVector {
    /// Sum of all six weights
    pub fn total(&self) -> f64 {
        self.w_text + self.w_length + self.w_exclam + self.w_emoji + self.w_toxicity + self.w_qm
    }

    /// Fold the weight of every zero-valued signal into `w_text`
    ///
    /// Every signal is checked independently, in the fixed order length,
    /// exclamation, emoji, toxicity, question mark.
    pub fn redistribute(mut self, signals: &SignalPresence) -> Self {
        if signals.length == 0.0 {
            self.w_text += self.w_length;
            self.w_length = 0.0;
        }
        if signals.exclaim == 0.0 {
            self.w_text += self.w_exclam;
            self.w_exclam = 0.0;
        }
        if signals.emoji_adjusted == 0.0 {
            self.w_text += self.w_emoji;
            self.w_emoji = 0.0;
        }
        if signals.toxicity_norm == 0.0 {
            self.w_text += self.w_toxicity;
            self.w_toxicity = 0.0;
        }
        if signals.question_penalty == 0.0 {
            self.w_text += self.w_qm;
            self.w_qm = 0.0;
        }
        self
    }
}

impl Default for WeightVector {
    fn default() -> Self {
        BASE_WEIGHTS
    }
}
