//! EV of fold, call or check, and raises.
//!
//! Chip accounting, from the hero's side at the moment of decision:
//! `pot` holds everything already in the middle, the opponent's bet
//! included; stacks are the chips each player still has behind. EVs are
//! net results relative to folding now, so Fold is always 0.

use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::{HandStateError, Result};
use crate::tendency::{ActionFaced, TendencyModel, TendencyProfile};

use super::action::{Action, EvTable};
use super::config::EvConfig;

/// Amounts closer than this are the same bet.
const CHIP_EPSILON: f64 = 1e-9;

/// Chips behind for each player.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Stacks {
    pub hero: f64,
    pub villain: f64,
}

impl Stacks {
    pub fn new(hero: f64, villain: f64) -> Self {
        Self { hero, villain }
    }

    /// The smaller stack.
    pub fn effective(&self) -> f64 {
        self.hero.min(self.villain)
    }
}

/// The money side of a decision.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BettingSpot {
    pub pot: f64,
    pub bet_to_call: f64,
    pub stacks: Stacks,
    /// Requested raise sizes: total chips the hero would put in.
    #[serde(default)]
    pub raise_sizes: Vec<f64>,
}

impl BettingSpot {
    pub fn new(pot: f64, bet_to_call: f64, stacks: Stacks) -> Self {
        Self {
            pot,
            bet_to_call,
            stacks,
            raise_sizes: Vec::new(),
        }
    }

    /// Builder method: set the raise sizes to evaluate.
    pub fn with_raise_sizes(mut self, sizes: impl IntoIterator<Item = f64>) -> Self {
        self.raise_sizes = sizes.into_iter().collect();
        self
    }

    /// Check amounts are finite and non-negative and raise sizes positive.
    pub fn validate(&self) -> std::result::Result<(), HandStateError> {
        for (name, value) in [
            ("pot", self.pot),
            ("bet_to_call", self.bet_to_call),
            ("hero_stack", self.stacks.hero),
            ("villain_stack", self.stacks.villain),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(HandStateError::NegativeAmount { name, value });
            }
        }

        if let Some(&bad) = self.raise_sizes.iter().find(|s| !s.is_finite() || **s <= 0.0) {
            return Err(HandStateError::InvalidRaiseSize(bad));
        }

        Ok(())
    }

    /// Chips the hero actually puts in to call: the bet, or all-in if short.
    pub fn call_amount(&self) -> f64 {
        self.bet_to_call.min(self.stacks.hero)
    }

    /// Stack-to-pot ratio on the effective stack; None for an empty pot.
    pub fn spr(&self) -> Option<f64> {
        (self.pot > 0.0).then(|| self.stacks.effective() / self.pot)
    }

    /// Largest raise that can be called: the hero's stack, or enough to put
    /// the opponent all-in.
    pub fn max_raise(&self) -> f64 {
        self.stacks.hero.min(self.bet_to_call + self.stacks.villain)
    }

    /// Raise sizes after the all-in cap, smallest first. Sizes that do not
    /// exceed the bet faced are dropped and duplicates merged.
    pub fn effective_raises(&self) -> Vec<f64> {
        let cap = self.max_raise();
        let mut sizes: Vec<f64> = self
            .raise_sizes
            .iter()
            .map(|&size| size.min(cap))
            .filter(|&size| size > self.bet_to_call + CHIP_EPSILON)
            .collect();
        sizes.sort_by(f64::total_cmp);
        sizes.dedup_by(|a, b| (*a - *b).abs() <= CHIP_EPSILON);
        sizes
    }
}

/// EV of calling `to_call` into `pot` with `equity`.
pub fn ev_call(equity: f64, pot: f64, to_call: f64) -> f64 {
    equity * (pot + to_call) - (1.0 - equity) * to_call
}

/// EV of checking: the pot is realised at showdown with no further risk.
pub fn ev_check(equity: f64, pot: f64) -> f64 {
    equity * pot
}

/// EV of putting `amount` in against a bet of `bet_to_call`.
///
/// With probability `fold` the opponent gives up the pot. Otherwise the
/// opponent calls the difference and the hero, holding `called_equity`
/// against the calling hands, wins `pot + amount - bet_to_call` or loses
/// `amount`.
pub fn ev_raise(pot: f64, bet_to_call: f64, amount: f64, fold: f64, called_equity: f64) -> f64 {
    let called = called_equity * (pot + amount - bet_to_call) - (1.0 - called_equity) * amount;
    fold * pot + (1.0 - fold) * called
}

/// A raise the engine needs an equity for.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RaiseQuery {
    /// Capped raise size.
    pub amount: f64,
    /// Share of the opponent range that continues, after fold clamping.
    pub continuation: f64,
}

/// Supplies the hero's equity when a raise is called.
///
/// A plain `f64` answers every query with the same equity. The advisor
/// answers by simulating against the continuing part of the range.
pub trait CalledEquity {
    fn called_equity(&self, query: &RaiseQuery) -> Result<f64>;
}

impl CalledEquity for f64 {
    fn called_equity(&self, _query: &RaiseQuery) -> Result<f64> {
        Ok(*self)
    }
}

/// Turns an equity estimate into an EV table and a recommendation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EvEngine {
    config: EvConfig,
    model: TendencyModel,
}

impl EvEngine {
    pub fn new(config: EvConfig, model: TendencyModel) -> Self {
        Self { config, model }
    }

    pub fn config(&self) -> &EvConfig {
        &self.config
    }

    pub fn model(&self) -> &TendencyModel {
        &self.model
    }

    /// Opponent fold probability against a raise to `amount`, clamped to the
    /// configured floor and ceiling.
    pub fn fold_probability(&self, spot: &BettingSpot, amount: f64, profile: &TendencyProfile) -> f64 {
        let faced = ActionFaced::new(amount - spot.bet_to_call, spot.pot);
        self.config.clamp_fold(self.model.fold_probability(&faced, profile))
    }

    /// EV of every action available in `spot`.
    ///
    /// Fold and Call are offered when facing a bet, Check otherwise; then one
    /// row per effective raise size. `called` supplies the equity for each
    /// raise when the opponent continues.
    pub fn compute_ev<C: CalledEquity + ?Sized>(
        &self,
        spot: &BettingSpot,
        equity: f64,
        profile: &TendencyProfile,
        called: &C,
    ) -> Result<EvTable> {
        self.config.validate()?;
        spot.validate()?;
        profile.validate()?;
        check_equity(equity)?;

        let mut table = EvTable::new();
        if spot.bet_to_call > 0.0 {
            let to_call = spot.call_amount();
            // an uncalled part of the bet goes back to the opponent
            let pot = spot.pot - (spot.bet_to_call - to_call);
            table.push(Action::Fold, 0.0);
            table.push(Action::Call, ev_call(equity, pot, to_call));
        } else {
            table.push(Action::Check, ev_check(equity, spot.pot));
        }

        let effective = spot.effective_raises();
        if effective.len() < spot.raise_sizes.len() {
            debug!(
                "raise sizes {:?} reduced to {:?} (cap {:.2})",
                spot.raise_sizes,
                effective,
                spot.max_raise()
            );
        }

        for amount in effective {
            let fold = self.fold_probability(spot, amount, profile);
            let query = RaiseQuery {
                amount,
                continuation: 1.0 - fold,
            };
            let called_equity = called.called_equity(&query)?;
            check_equity(called_equity)?;
            table.push(
                Action::Raise { amount },
                ev_raise(spot.pot, spot.bet_to_call, amount, fold, called_equity),
            );
        }

        Ok(table)
    }

    /// The best action in `table`.
    ///
    /// EVs within `tie_epsilon` of the maximum are tied; ties go to the
    /// earliest kind in the tie-break order, then to the earlier row, so the
    /// smaller of two equal raises wins.
    pub fn recommend(&self, table: &EvTable) -> Option<(Action, f64)> {
        let best = table.iter().map(|&(_, ev)| ev).fold(f64::NEG_INFINITY, f64::max);
        table
            .iter()
            .enumerate()
            .filter(|&(_, &(_, ev))| best - ev <= self.config.tie_epsilon)
            .min_by_key(|&(row, &(action, _))| (self.config.preference(action.kind()), row))
            .map(|(_, &entry)| entry)
    }
}

fn check_equity(equity: f64) -> std::result::Result<(), HandStateError> {
    if (0.0..=1.0).contains(&equity) {
        Ok(())
    } else {
        Err(HandStateError::EquityOutOfRange(equity))
    }
}
