//! Oracle seams
//!
//! The lexical polarity analyzer and the toxicity classifier are external
//! collaborators. This module defines their contracts and the factory each
//! execution unit uses to build its own private instances.

use crate::error::{OracleError, RowScoringError};

/// Tolerance on the two class probabilities summing to 1
const DISTRIBUTION_SUM_TOLERANCE: f64 = 1e-4;

/// Lexicon/rule based analyzer returning a compound polarity in [-1, 1]
pub trait LexicalPolarityOracle {
    fn polarity(&self, text: &str) -> Result<f64, OracleError>;
}

/// Binary toxicity classifier
pub trait ToxicityOracle {
    fn classify(&self, text: &str) -> Result<ToxicityDistribution, OracleError>;

    /// Longest input (in characters) the classifier accepts
    ///
    /// Text beyond this is truncated before classification. `None` means no limit.
    fn max_input_chars(&self) -> Option<usize> {
        None
    }
}

/// Probability distribution over {non-toxic, toxic}
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ToxicityDistribution {
    pub non_toxic: f64,
    pub toxic: f64,
}

impl ToxicityDistribution {
    pub fn new(non_toxic: f64, toxic: f64) -> Self {
        Self { non_toxic, toxic }
    }

    /// Softmax over raw two-class logits `[non_toxic, toxic]`
    pub fn from_logits(logits: [f64; 2]) -> Self {
        let max = logits[0].max(logits[1]);
        let e0 = (logits[0] - max).exp();
        let e1 = (logits[1] - max).exp();
        let sum = e0 + e1;
        Self {
            non_toxic: e0 / sum,
            toxic: e1 / sum,
        }
    }

    /// Check both probabilities are finite, in [0, 1], and sum to 1
    pub fn validate(&self) -> Result<(), RowScoringError> {
        for (class, p) in [("non-toxic", self.non_toxic), ("toxic", self.toxic)] {
            if !p.is_finite() || !(0.0..=1.0).contains(&p) {
                return Err(RowScoringError::InvalidOracleOutput {
                    oracle: "toxicity",
                    detail: format!("{} probability {} outside [0, 1]", class, p),
                });
            }
        }

        let sum = self.non_toxic + self.toxic;
        if (sum - 1.0).abs() > DISTRIBUTION_SUM_TOLERANCE {
            return Err(RowScoringError::InvalidOracleOutput {
                oracle: "toxicity",
                detail: format!("class probabilities sum to {}", sum),
            });
        }

        Ok(())
    }
}

/// The oracle instances owned by one execution unit
pub struct OracleSet {
    pub lexical: Box<dyn LexicalPolarityOracle>,
    pub toxicity: Box<dyn ToxicityOracle>,
}

impl OracleSet {
    pub fn new(
        lexical: impl LexicalPolarityOracle + 'static,
        toxicity: impl ToxicityOracle + 'static,
    ) -> Self {
        Self {
            lexical: Box::new(lexical),
            toxicity: Box::new(toxicity),
        }
    }
}

/// Builds a fresh [`OracleSet`] for an execution unit
///
/// Called once per chunk attempt, on the unit's own thread, before any row is
/// scored. Instances are never shared between units. Model loading can fail
/// for many reasons, hence `anyhow`.
pub trait OracleFactory: Send + Sync {
    fn build(&self, unit_id: usize) -> anyhow::Result<OracleSet>;
}

impl<F> OracleFactory for F
where
    F: Fn(usize) -> anyhow::Result<OracleSet> + Send + Sync,
{
    fn build(&self, unit_id: usize) -> anyhow::Result<OracleSet> {
        self(unit_id)
    }
}
