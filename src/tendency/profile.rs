//! Tendency sliders and observed opponent actions.

use serde::{Deserialize, Serialize};

use crate::error::HandStateError;

/// How an opponent tends to play, as three bounded sliders.
///
/// - `looseness`: 0 plays only premium hands, 1 plays any two cards
/// - `aggression`: 0 is passive, 1 bets and continues with anything
/// - `bluff_frequency`: share of the opponent's aggression that is a bluff
/// - `fold_to_raise`: optional direct estimate of how often the opponent
///   folds to a pot-sized raise; when set it anchors the fold curve
///
/// A profile is a snapshot; it is never modified during a computation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TendencyProfile {
    pub looseness: f64,
    pub aggression: f64,
    pub bluff_frequency: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fold_to_raise: Option<f64>,
}

impl Default for TendencyProfile {
    fn default() -> Self {
        Self {
            looseness: 0.6,
            aggression: 0.5,
            bluff_frequency: 0.35,
            fold_to_raise: None,
        }
    }
}

impl TendencyProfile {
    /// Create a validated profile.
    pub fn new(looseness: f64, aggression: f64, bluff_frequency: f64) -> Result<Self, HandStateError> {
        let profile = Self {
            looseness,
            aggression,
            bluff_frequency,
            fold_to_raise: None,
        };
        profile.validate()?;
        Ok(profile)
    }

    /// Build a profile from 0-100 slider positions. Values above 100 clamp.
    pub fn from_sliders(looseness: u8, aggression: u8, bluff_frequency: u8) -> Self {
        let unit = |v: u8| v.min(100) as f64 / 100.0;
        Self {
            looseness: unit(looseness),
            aggression: unit(aggression),
            bluff_frequency: unit(bluff_frequency),
            fold_to_raise: None,
        }
    }

    /// Tight and passive: few hands, rarely bluffs.
    pub fn rock() -> Self {
        Self {
            looseness: 0.15,
            aggression: 0.2,
            bluff_frequency: 0.1,
            fold_to_raise: None,
        }
    }

    /// Loose and passive: plays and calls with too much.
    pub fn calling_station() -> Self {
        Self {
            looseness: 0.9,
            aggression: 0.15,
            bluff_frequency: 0.1,
            fold_to_raise: None,
        }
    }

    /// Loose and aggressive.
    pub fn maniac() -> Self {
        Self {
            looseness: 0.95,
            aggression: 0.95,
            bluff_frequency: 0.7,
            fold_to_raise: None,
        }
    }

    /// Builder method: set the fold-to-raise estimate.
    pub fn with_fold_to_raise(mut self, fold: f64) -> Self {
        self.fold_to_raise = Some(fold);
        self
    }

    /// Check that every slider, and the fold estimate if set, lies in [0, 1].
    pub fn validate(&self) -> Result<(), HandStateError> {
        let fold = self.fold_to_raise.map(|fold| ("fold_to_raise", fold));
        for (name, value) in [
            ("looseness", self.looseness),
            ("aggression", self.aggression),
            ("bluff_frequency", self.bluff_frequency),
        ]
        .into_iter()
        .chain(fold)
        {
            if !(0.0..=1.0).contains(&value) {
                return Err(HandStateError::TendencyOutOfRange { name, value });
            }
        }
        Ok(())
    }
}

/// An action the opponent has taken earlier in the hand.
///
/// Bet and raise sizes are fractions of the pot they were made into.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum ObservedAction {
    Check,
    Call,
    Bet { pot_fraction: f64 },
    Raise { pot_fraction: f64 },
}

impl ObservedAction {
    /// Bets and raises.
    pub fn is_aggressive(&self) -> bool {
        matches!(self, ObservedAction::Bet { .. } | ObservedAction::Raise { .. })
    }

    /// Size relative to the pot; zero for checks and calls, and for
    /// malformed negative or non-finite sizes.
    pub fn pot_fraction(&self) -> f64 {
        match *self {
            ObservedAction::Bet { pot_fraction } | ObservedAction::Raise { pot_fraction } => {
                if pot_fraction.is_finite() {
                    pot_fraction.max(0.0)
                } else {
                    0.0
                }
            }
            ObservedAction::Check | ObservedAction::Call => 0.0,
        }
    }
}
