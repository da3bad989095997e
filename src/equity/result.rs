//! Simulation tallies and results.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign};

use crate::cards::Showdown;

/// Win/tie/loss counts from the hero's side.
///
/// Tallies from independent workers combine by summing, which is
/// commutative and associative, so merge order never changes a result.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tally {
    pub wins: u64,
    pub ties: u64,
    pub losses: u64,
}

impl Tally {
    /// Count one showdown.
    #[inline]
    pub fn record(&mut self, outcome: Showdown) {
        match outcome {
            Showdown::HeroWin => self.wins += 1,
            Showdown::Tie => self.ties += 1,
            Showdown::HeroLoss => self.losses += 1,
        }
    }

    /// Number of trials counted.
    #[inline]
    pub fn trials(&self) -> u64 {
        self.wins + self.ties + self.losses
    }

    /// (wins + ties / 2) / trials; zero when nothing has been counted.
    pub fn equity(&self) -> f64 {
        let n = self.trials();
        if n == 0 {
            return 0.0;
        }
        (self.wins as f64 + 0.5 * self.ties as f64) / n as f64
    }

    /// sqrt(p (1 - p) / n) around the current equity; infinite when empty.
    pub fn standard_error(&self) -> f64 {
        let n = self.trials();
        if n == 0 {
            return f64::INFINITY;
        }
        let p = self.equity();
        (p * (1.0 - p) / n as f64).sqrt()
    }
}

impl Add for Tally {
    type Output = Tally;

    fn add(self, other: Tally) -> Tally {
        Tally {
            wins: self.wins + other.wins,
            ties: self.ties + other.ties,
            losses: self.losses + other.losses,
        }
    }
}

impl AddAssign for Tally {
    fn add_assign(&mut self, other: Tally) {
        *self = *self + other;
    }
}

impl std::iter::Sum for Tally {
    fn sum<I: Iterator<Item = Tally>>(iter: I) -> Tally {
        iter.fold(Tally::default(), Add::add)
    }
}

/// How a simulation run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Completion {
    /// Every requested trial ran.
    Finished,
    /// Stopped early because the standard error reached its target.
    Converged,
    /// Stopped early on request; the tally covers the trials that ran.
    Cancelled,
}

/// Outcome of one equity estimate. Created fresh per run and never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationResult {
    tally: Tally,
    requested: u64,
    status: Completion,
}

impl SimulationResult {
    pub(crate) fn new(tally: Tally, requested: u64, status: Completion) -> Self {
        Self {
            tally,
            requested,
            status,
        }
    }

    /// Raw counts.
    pub fn tally(&self) -> Tally {
        self.tally
    }

    pub fn wins(&self) -> u64 {
        self.tally.wins
    }

    pub fn ties(&self) -> u64 {
        self.tally.ties
    }

    pub fn losses(&self) -> u64 {
        self.tally.losses
    }

    /// Trials actually completed.
    pub fn trials(&self) -> u64 {
        self.tally.trials()
    }

    /// Trials the caller asked for.
    pub fn requested(&self) -> u64 {
        self.requested
    }

    /// Equity in [0, 1], ties counting half.
    pub fn equity(&self) -> f64 {
        self.tally.equity()
    }

    /// Standard error of the equity estimate.
    pub fn standard_error(&self) -> f64 {
        self.tally.standard_error()
    }

    /// How the run ended.
    pub fn status(&self) -> Completion {
        self.status
    }

    /// False only for cancelled runs. A converged run is complete: it met
    /// the precision the caller asked for.
    pub fn is_complete(&self) -> bool {
        self.status != Completion::Cancelled
    }
}

impl fmt::Display for SimulationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "equity {:.4} ± {:.4} over {}/{} trials (W {} / T {} / L {}, {:?})",
            self.equity(),
            self.standard_error(),
            self.trials(),
            self.requested,
            self.tally.wins,
            self.tally.ties,
            self.tally.losses,
            self.status,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_equity_counts_ties_half() {
        let tally = Tally { wins: 6, ties: 2, losses: 2 };
        assert_eq!(tally.trials(), 10);
        assert!((tally.equity() - 0.7).abs() < 1e-12);
        let se = (0.7f64 * 0.3 / 10.0).sqrt();
        assert!((tally.standard_error() - se).abs() < 1e-12);
    }

    #[test]
    fn test_empty_tally() {
        let tally = Tally::default();
        assert_eq!(tally.equity(), 0.0);
        assert!(tally.standard_error().is_infinite());
    }

    #[test]
    fn test_merge_is_order_free() {
        let parts = [
            Tally { wins: 3, ties: 1, losses: 0 },
            Tally { wins: 0, ties: 0, losses: 7 },
            Tally { wins: 2, ties: 5, losses: 1 },
        ];
        let forward: Tally = parts.iter().copied().sum();
        let backward: Tally = parts.iter().rev().copied().sum();
        assert_eq!(forward, backward);
        assert_eq!(forward.trials(), 19);
    }

    #[test]
    fn test_completion_flags() {
        let tally = Tally { wins: 1, ties: 0, losses: 1 };
        assert!(SimulationResult::new(tally, 2, Completion::Finished).is_complete());
        assert!(SimulationResult::new(tally, 10, Completion::Converged).is_complete());
        assert!(!SimulationResult::new(tally, 10, Completion::Cancelled).is_complete());
    }
}
