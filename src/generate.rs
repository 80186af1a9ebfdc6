//! Generate synthetic submission scripts.
//!
//! A generated script refines a fresh buffer of the configured length
//! until it is fully processed. Each record targets a random sub-range of
//! a random unprocessed subsequence, so every record classifies as a
//! match when replayed in order. Output is reproducible from the seed.

use crate::error::{BufferError, Result};
use crate::script::ScriptRecord;
use crate::set::IntervalSet;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

/// Configuration for script generation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerateConfig {
    /// Length of the sequence the script is written for.
    pub length: usize,
    /// Random seed.
    pub seed: u64,
    /// Largest sub-range a single record may cover (0 = unlimited).
    pub granularity: usize,
}

impl Default for GenerateConfig {
    fn default() -> Self {
        Self {
            length: 100,
            seed: 42,
            granularity: 0,
        }
    }
}

impl GenerateConfig {
    pub fn new(length: usize) -> Self {
        Self {
            length,
            ..Self::default()
        }
    }

    /// Set seed (builder pattern).
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Set granularity (builder pattern).
    pub fn with_granularity(mut self, granularity: usize) -> Self {
        self.granularity = granularity;
        self
    }
}

/// Generate a script that fully processes a sequence of `config.length`.
pub fn generate(config: &GenerateConfig) -> Result<Vec<ScriptRecord>> {
    let mut set = IntervalSet::seeded(config.length)?;
    let mut rng = SmallRng::seed_from_u64(config.seed);
    let mut records = Vec::new();

    while !set.is_fully_processed() {
        let pending: Vec<(usize, usize)> = set
            .iter()
            .filter(|iv| !iv.is_processed())
            .map(|iv| (iv.start(), iv.end()))
            .collect();
        let (start, end) = pending[rng.gen_range(0..pending.len())];

        let span = end - start + 1;
        let max_len = if config.granularity == 0 {
            span
        } else {
            span.min(config.granularity)
        };
        let len = rng.gen_range(1..=max_len);
        let offset = rng.gen_range(0..=span - len);

        let record = ScriptRecord::new(
            start + offset,
            start + offset + len - 1,
            format!("R{}", records.len() + 1),
        );
        set.submit(record.start, record.end, &record.result)
            .map_err(|e| BufferError::InvariantViolation(format!("generated {}: {}", record, e)))?;
        records.push(record);
    }

    Ok(records)
}
