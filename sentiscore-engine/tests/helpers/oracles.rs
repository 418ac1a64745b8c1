//! Deterministic oracle doubles and factories

use sentiscore_engine::{
    LexicalPolarityOracle, OracleError, OracleFactory, OracleSet, ToxicityDistribution,
    ToxicityOracle,
};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Keyword polarity: positive and negative words add ±0.4, clamped to [-1, 1]
///
/// Texts containing `LEXFAIL` make the oracle error.
pub struct KeywordLexical;

impl LexicalPolarityOracle for KeywordLexical {
    fn polarity(&self, text: &str) -> Result<f64, OracleError> {
        if text.contains("LEXFAIL") {
            return Err(OracleError::Lexical("analyzer unavailable".to_string()));
        }
        let lower = text.to_lowercase();
        let mut score = 0.0;
        for word in ["great", "love", "excellent", "good"] {
            if lower.contains(word) {
                score += 0.4;
            }
        }
        for word in ["awful", "hate", "terrible", "bad"] {
            if lower.contains(word) {
                score -= 0.4;
            }
        }
        Ok(f64::clamp(score, -1.0, 1.0))
    }
}

/// Toxic probability 0.95 for texts containing "idiot", else 0.2
///
/// Texts containing `TOXFAIL` make the oracle error.
pub struct StubToxicity;

impl ToxicityOracle for StubToxicity {
    fn classify(&self, text: &str) -> Result<ToxicityDistribution, OracleError> {
        if text.contains("TOXFAIL") {
            return Err(OracleError::Toxicity("inference failed".to_string()));
        }
        let toxic = if text.to_lowercase().contains("idiot") { 0.95 } else { 0.2 };
        Ok(ToxicityDistribution::new(1.0 - toxic, toxic))
    }
}

pub fn stub_oracles() -> OracleSet {
    OracleSet::new(KeywordLexical, StubToxicity)
}

pub fn stub_factory() -> Arc<dyn OracleFactory> {
    Arc::new(|_unit: usize| -> anyhow::Result<OracleSet> { Ok(stub_oracles()) })
}

/// Records every build and delays each unit by `delay(unit_id)`
pub struct CountingFactory {
    builds: AtomicUsize,
    unit_ids: Mutex<Vec<usize>>,
    delay: Box<dyn Fn(usize) -> Duration + Send + Sync>,
}

impl CountingFactory {
    pub fn new() -> Self {
        Self::with_delay(|_| Duration::ZERO)
    }

    pub fn with_delay(delay: impl Fn(usize) -> Duration + Send + Sync + 'static) -> Self {
        Self {
            builds: AtomicUsize::new(0),
            unit_ids: Mutex::new(Vec::new()),
            delay: Box::new(delay),
        }
    }

    pub fn builds(&self) -> usize {
        self.builds.load(Ordering::SeqCst)
    }

    /// Unit ids that built oracles, sorted
    pub fn unit_ids(&self) -> Vec<usize> {
        let mut ids = self.unit_ids.lock().unwrap().clone();
        ids.sort_unstable();
        ids
    }
}

impl OracleFactory for CountingFactory {
    fn build(&self, unit_id: usize) -> anyhow::Result<OracleSet> {
        self.builds.fetch_add(1, Ordering::SeqCst);
        self.unit_ids.lock().unwrap().push(unit_id);
        std::thread::sleep((self.delay)(unit_id));
        Ok(stub_oracles())
    }
}

/// Fails the first `failures` builds of each listed unit
pub struct FlakyFactory {
    remaining: Mutex<HashMap<usize, u32>>,
    builds: AtomicUsize,
}

impl FlakyFactory {
    pub fn new(failures: &[(usize, u32)]) -> Self {
        Self {
            remaining: Mutex::new(failures.iter().copied().collect()),
            builds: AtomicUsize::new(0),
        }
    }

    pub fn builds(&self) -> usize {
        self.builds.load(Ordering::SeqCst)
    }
}

impl OracleFactory for FlakyFactory {
    fn build(&self, unit_id: usize) -> anyhow::Result<OracleSet> {
        self.builds.fetch_add(1, Ordering::SeqCst);
        let mut remaining = self.remaining.lock().unwrap();
        if let Some(left) = remaining.get_mut(&unit_id) {
            if *left > 0 {
                *left -= 1;
                anyhow::bail!("model weights for unit {} not loaded", unit_id);
            }
        }
        Ok(stub_oracles())
    }
}

/// Panics while building oracles for `unit_id`
pub struct PanickingFactory {
    pub unit_id: usize,
    builds: AtomicUsize,
}

impl PanickingFactory {
    pub fn new(unit_id: usize) -> Self {
        Self {
            unit_id,
            builds: AtomicUsize::new(0),
        }
    }

    pub fn builds(&self) -> usize {
        self.builds.load(Ordering::SeqCst)
    }
}

impl OracleFactory for PanickingFactory {
    fn build(&self, unit_id: usize) -> anyhow::Result<OracleSet> {
        self.builds.fetch_add(1, Ordering::SeqCst);
        if unit_id == self.unit_id {
            panic!("unit {} crashed", unit_id);
        }
        Ok(stub_oracles())
    }
}
