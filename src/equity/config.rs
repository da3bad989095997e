//! Configuration options for the equity simulator.
//!
//! Trial counts, batching, seeding and the optional adaptive stop. The
//! defaults mirror the usual interactive use: ten thousand trials split in
//! batches of a thousand, checked for cancellation after every round.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Configuration for one equity estimate.
///
/// # Example
/// ```
/// use holdem_advisor::equity::SimulationConfig;
///
/// let config = SimulationConfig::default().with_trials(50_000).with_seed(7);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Number of Monte Carlo trials requested.
    pub n_trials: u64,

    /// Trials per batch. Each batch owns its RNG and its tally, so this is
    /// also the granularity of cancellation.
    pub batch_size: u64,

    /// Batches run in parallel between two convergence/cancellation checks.
    pub batches_per_round: usize,

    /// Random seed for reproducibility.
    ///
    /// With a seed, identical inputs give identical results regardless of
    /// thread count. `None` draws a seed from entropy.
    pub seed: Option<u64>,

    /// Stop early once the standard error falls to this value.
    ///
    /// Checked between rounds only, and never before `min_trials`.
    /// `None` always runs the full trial count.
    pub target_standard_error: Option<f64>,

    /// Trials that must run before the adaptive stop may trigger.
    pub min_trials: u64,

    /// Number of worker threads.
    ///
    /// `None` uses rayon's global pool (all available cores).
    pub num_threads: Option<usize>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            n_trials: 10_000,
            batch_size: 1_000,
            batches_per_round: 8,
            seed: None,
            target_standard_error: None,
            min_trials: 1_000,
            num_threads: None,
        }
    }
}

impl SimulationConfig {
    /// Create a new SimulationConfig with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// A quick, coarse estimate for interactive use (3000 trials).
    pub fn quick() -> Self {
        Self {
            n_trials: 3_000,
            batch_size: 500,
            ..Default::default()
        }
    }

    /// A high-precision estimate: up to 200k trials, stopping at SE 0.002.
    pub fn precise() -> Self {
        Self {
            n_trials: 200_000,
            batch_size: 2_000,
            target_standard_error: Some(0.002),
            min_trials: 10_000,
            ..Default::default()
        }
    }

    /// Builder method: set the number of trials.
    pub fn with_trials(mut self, n_trials: u64) -> Self {
        self.n_trials = n_trials;
        self
    }

    /// Builder method: set the batch size.
    pub fn with_batch_size(mut self, batch_size: u64) -> Self {
        self.batch_size = batch_size;
        self
    }

    /// Builder method: set the number of batches per round.
    pub fn with_batches_per_round(mut self, batches: usize) -> Self {
        self.batches_per_round = batches;
        self
    }

    /// Builder method: set random seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Builder method: stop once the standard error reaches `target`.
    pub fn with_target_standard_error(mut self, target: f64) -> Self {
        self.target_standard_error = Some(target);
        self
    }

    /// Builder method: set the minimum trials before an adaptive stop.
    pub fn with_min_trials(mut self, min_trials: u64) -> Self {
        self.min_trials = min_trials;
        self
    }

    /// Builder method: set number of threads.
    pub fn with_threads(mut self, threads: usize) -> Self {
        self.num_threads = Some(threads);
        self
    }

    /// Number of batches needed to cover `n_trials`.
    pub fn num_batches(&self) -> u64 {
        self.n_trials.div_ceil(self.batch_size.max(1))
    }

    /// Trials run by batch `index`; the last batch may be short.
    pub(crate) fn batch_len(&self, index: u64) -> u64 {
        let start = index * self.batch_size;
        self.batch_size.min(self.n_trials.saturating_sub(start))
    }

    /// Validate the configuration and return any errors.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.n_trials == 0 {
            return Err(ConfigError::ZeroTrials);
        }

        if self.batch_size == 0 {
            return Err(ConfigError::ZeroBatchSize);
        }

        if self.batches_per_round == 0 {
            return Err(ConfigError::ZeroBatchesPerRound);
        }

        if let Some(target) = self.target_standard_error {
            if !target.is_finite() || target <= 0.0 {
                return Err(ConfigError::InvalidTargetError(target));
            }
        }

        Ok(())
    }
}
