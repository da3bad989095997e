//! Configuration for the EV engine.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

use super::action::ActionKind;

/// Tie-break and fold-clamp settings for EV decisions.
///
/// # Example
/// ```
/// use holdem_advisor::ev::{ActionKind, EvConfig};
///
/// let config = EvConfig::default();
/// assert_eq!(config.tie_break[0], ActionKind::Passive);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvConfig {
    /// EVs closer than this count as equal.
    pub tie_epsilon: f64,

    /// Preference among equal EVs, most preferred first. Must list each
    /// action kind exactly once.
    pub tie_break: Vec<ActionKind>,

    /// Lowest fold probability credited to a raise.
    pub fold_floor: f64,

    /// Highest fold probability credited to a raise.
    pub fold_ceiling: f64,
}

impl Default for EvConfig {
    fn default() -> Self {
        Self {
            tie_epsilon: 1e-9,
            tie_break: vec![ActionKind::Passive, ActionKind::Raise, ActionKind::Fold],
            fold_floor: 0.05,
            fold_ceiling: 0.95,
        }
    }
}

impl EvConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method: set the tie tolerance.
    pub fn with_tie_epsilon(mut self, epsilon: f64) -> Self {
        self.tie_epsilon = epsilon;
        self
    }

    /// Builder method: set the tie-break order.
    pub fn with_tie_break(mut self, order: [ActionKind; 3]) -> Self {
        self.tie_break = order.to_vec();
        self
    }

    /// Builder method: set the fold probability bounds.
    pub fn with_fold_bounds(mut self, floor: f64, ceiling: f64) -> Self {
        self.fold_floor = floor;
        self.fold_ceiling = ceiling;
        self
    }

    /// Position of `kind` in the tie-break order; lower wins.
    pub(crate) fn preference(&self, kind: ActionKind) -> usize {
        self.tie_break
            .iter()
            .position(|&k| k == kind)
            .unwrap_or(self.tie_break.len())
    }

    /// Clamp a modelled fold probability into the configured bounds.
    pub(crate) fn clamp_fold(&self, fold: f64) -> f64 {
        fold.clamp(self.fold_floor, self.fold_ceiling)
    }

    /// Validate the configuration and return any errors.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.tie_epsilon.is_finite() || self.tie_epsilon < 0.0 {
            return Err(ConfigError::InvalidTieEpsilon(self.tie_epsilon));
        }

        for (name, value) in [("fold_floor", self.fold_floor), ("fold_ceiling", self.fold_ceiling)] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::OutOfUnitRange { name, value });
            }
        }

        if self.fold_floor > self.fold_ceiling {
            return Err(ConfigError::InvertedFoldBounds {
                floor: self.fold_floor,
                ceiling: self.fold_ceiling,
            });
        }

        let kinds = [ActionKind::Passive, ActionKind::Raise, ActionKind::Fold];
        if self.tie_break.len() != kinds.len() || !kinds.iter().all(|k| self.tie_break.contains(k)) {
            return Err(ConfigError::IncompleteTieBreak);
        }

        Ok(())
    }
}
