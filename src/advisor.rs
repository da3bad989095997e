//! One decision, end to end.
//!
//! A [`Situation`] is the input snapshot: cards, street, money, and what is
//! known about the opponent. [`Advisor::decide`] builds the opponent range,
//! simulates equity, re-simulates against the continuing part of the range
//! for every raise size, and ranks the actions by EV.

use std::cell::RefCell;
use std::fmt;

use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::cards::{Board, CardSet, HandEvaluator, HandRanker, HoleCards, Street};
use crate::equity::{CancelToken, Completion, EquitySimulator, SimulationConfig, SimulationResult, Tally};
use crate::error::{EngineError, Result};
use crate::ev::{Action, BettingSpot, CalledEquity, EvConfig, EvEngine, EvTable, RaiseQuery};
use crate::range::OpponentRange;
use crate::tendency::{ObservedAction, OpponentStats, TendencyModel, TendencyProfile};

/// Everything known at the moment of decision.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Situation {
    pub hero: HoleCards,
    #[serde(default)]
    pub board: Board,
    pub street: Street,
    #[serde(flatten)]
    pub spot: BettingSpot,
    #[serde(default)]
    pub profile: TendencyProfile,
    /// Opponent actions earlier in this hand, oldest first.
    #[serde(default)]
    pub history: Vec<ObservedAction>,
    /// Explicit range in notation ("TT+, AQs+"); replaces the profile range.
    #[serde(default)]
    pub range: Option<String>,
    /// Session counts for this opponent; they refine `profile` as hands accumulate.
    #[serde(default)]
    pub stats: Option<OpponentStats>,
}

impl Situation {
    /// The profile the model uses: `profile`, refined by `stats` when present.
    pub fn effective_profile(&self) -> TendencyProfile {
        match &self.stats {
            Some(stats) => stats.profile(&self.profile),
            None => self.profile,
        }
    }
}

/// Settings for a whole decision.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdvisorConfig {
    /// Main equity simulation.
    pub simulation: SimulationConfig,
    /// Trials for each raise re-estimate; `None` reuses the main trial count.
    pub raise_trials: Option<u64>,
    pub ev: EvConfig,
    pub model: TendencyModel,
}

impl AdvisorConfig {
    /// Builder method: set the main simulation config.
    pub fn with_simulation(mut self, simulation: SimulationConfig) -> Self {
        self.simulation = simulation;
        self
    }

    /// Builder method: set trials per raise re-estimate.
    pub fn with_raise_trials(mut self, trials: u64) -> Self {
        self.raise_trials = Some(trials);
        self
    }

    /// Builder method: set the EV config.
    pub fn with_ev(mut self, ev: EvConfig) -> Self {
        self.ev = ev;
        self
    }
}

/// How one raise size was evaluated.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RaiseDetail {
    /// Capped raise size.
    pub amount: f64,
    pub fold_probability: f64,
    /// Hero equity against the hands that continue.
    pub called_equity: f64,
    /// Trials behind `called_equity`; zero when the main equity stood in.
    pub trials: u64,
    /// How the re-estimate ended; `None` when the continuing range could not
    /// be dealt and no simulation ran.
    pub status: Option<Completion>,
}

impl RaiseDetail {
    /// Whether the re-estimate was not cut short by cancellation.
    pub fn is_complete(&self) -> bool {
        self.status != Some(Completion::Cancelled)
    }
}

/// The advisor's answer for one situation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Decision {
    pub simulation: SimulationResult,
    /// Categories with weight in the opponent range used.
    pub range_size: usize,
    pub table: EvTable,
    pub recommendation: Action,
    pub expected_value: f64,
    pub raises: Vec<RaiseDetail>,
}

impl Decision {
    /// Whether every simulation behind this decision ran to completion: the
    /// main estimate and each raise re-estimate.
    pub fn is_complete(&self) -> bool {
        self.simulation.is_complete() && self.raises.iter().all(RaiseDetail::is_complete)
    }
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Equity: {:.1}% ± {:.1}%", self.simulation.equity() * 100.0, self.simulation.standard_error() * 100.0)?;
        writeln!(f, "Opponent range: {} categories", self.range_size)?;
        writeln!(f)?;
        write!(f, "{}", self.table)?;
        writeln!(f)?;
        for raise in &self.raises {
            writeln!(
                f,
                "Raise {:.2}: opponent folds ~{:.0}%, equity when called {:.1}%",
                raise.amount,
                raise.fold_probability * 100.0,
                raise.called_equity * 100.0
            )?;
        }
        write!(f, "Recommendation: {} (EV {:+.2})", self.recommendation, self.expected_value)?;
        if !self.simulation.is_complete() {
            write!(f, " [simulation cancelled after {} trials]", self.simulation.trials())?;
        } else if !self.is_complete() {
            write!(f, " [raise re-estimates cancelled]")?;
        }
        Ok(())
    }
}

/// Runs the full decision pipeline.
///
/// # Example
/// ```
/// use holdem_advisor::advisor::{Advisor, AdvisorConfig, Situation};
/// use holdem_advisor::equity::SimulationConfig;
/// use holdem_advisor::ev::{BettingSpot, Stacks};
///
/// let config = AdvisorConfig::default()
///     .with_simulation(SimulationConfig::default().with_trials(2_000).with_seed(7));
/// let advisor = Advisor::new(config);
///
/// let situation = Situation {
///     hero: "AsKs".parse().unwrap(),
///     board: "Qs 7d 2s".parse().unwrap(),
///     street: holdem_advisor::cards::Street::Flop,
///     spot: BettingSpot::new(100.0, 50.0, Stacks::new(900.0, 900.0)).with_raise_sizes([150.0]),
///     profile: Default::default(),
///     history: vec![],
///     range: None,
///     stats: None,
/// };
///
/// let decision = advisor.decide(&situation).unwrap();
/// assert_eq!(decision.table.len(), 3);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Advisor<H: HandRanker = HandEvaluator> {
    simulator: EquitySimulator<H>,
    engine: EvEngine,
    config: AdvisorConfig,
}

impl Advisor<HandEvaluator> {
    /// Create an advisor with the bundled evaluator.
    pub fn new(config: AdvisorConfig) -> Self {
        Self::with_simulator(EquitySimulator::new(), config)
    }
}

impl<H: HandRanker> Advisor<H> {
    /// Create an advisor around an existing simulator.
    pub fn with_simulator(simulator: EquitySimulator<H>, config: AdvisorConfig) -> Self {
        let engine = EvEngine::new(config.ev.clone(), config.model);
        Self {
            simulator,
            engine,
            config,
        }
    }

    /// Token that cancels the main simulation and every re-estimate.
    pub fn cancel_token(&self) -> &CancelToken {
        self.simulator.cancel_token()
    }

    pub fn config(&self) -> &AdvisorConfig {
        &self.config
    }

    /// Opponent range for `situation`: the explicit notation if given,
    /// otherwise the one implied by the profile and history.
    pub fn opponent_range(&self, situation: &Situation) -> Result<OpponentRange> {
        match &situation.range {
            Some(notation) => Ok(OpponentRange::from_notation(notation)?),
            None => Ok(self
                .config
                .model
                .build_range(&situation.effective_profile(), &situation.history)),
        }
    }

    /// Decide one situation.
    pub fn decide(&self, situation: &Situation) -> Result<Decision> {
        self.decide_with_progress(situation, |_| {})
    }

    /// Decide one situation, reporting main-simulation progress.
    pub fn decide_with_progress<F>(&self, situation: &Situation, progress: F) -> Result<Decision>
    where
        F: FnMut(&Tally) + Send,
    {
        self.config.ev.validate()?;
        situation.spot.validate()?;
        situation.profile.validate()?;
        let profile = situation.effective_profile();

        let range = self.opponent_range(situation)?;
        let simulation = self.simulator.estimate_equity_with_progress(
            situation.hero,
            &situation.board,
            &range,
            situation.street,
            &self.config.simulation,
            progress,
        )?;

        let reestimate = SubRangeEquity {
            advisor: self,
            situation,
            range: &range,
            fallback: simulation.equity(),
            details: RefCell::new(Vec::new()),
        };
        let table = self
            .engine
            .compute_ev(&situation.spot, simulation.equity(), &profile, &reestimate)?;

        // the table always holds a Fold or Check row
        let (recommendation, expected_value) = self.engine.recommend(&table).unwrap_or((Action::Fold, 0.0));
        info!("{} on {:?}: {} (EV {:+.2})", situation.hero, situation.board, recommendation, expected_value);

        Ok(Decision {
            simulation,
            range_size: range.len(),
            table,
            recommendation,
            expected_value,
            raises: reestimate.details.into_inner(),
        })
    }
}

/// Equity when a raise is called: one more simulation against the
/// continuing part of the range. This is the only nested simulation, so the
/// recursion stops at depth one.
struct SubRangeEquity<'a, H: HandRanker> {
    advisor: &'a Advisor<H>,
    situation: &'a Situation,
    range: &'a OpponentRange,
    /// Main equity, used when the sub-range cannot be simulated.
    fallback: f64,
    details: RefCell<Vec<RaiseDetail>>,
}

impl<H: HandRanker> SubRangeEquity<'_, H> {
    /// Main config with its own trial count and a seed offset per raise.
    fn config(&self, index: usize) -> SimulationConfig {
        let main = &self.advisor.config.simulation;
        SimulationConfig {
            n_trials: self.advisor.config.raise_trials.unwrap_or(main.n_trials),
            seed: main.seed.map(|seed| seed.wrapping_add(index as u64 + 1)),
            ..main.clone()
        }
    }
}

impl<H: HandRanker> CalledEquity for SubRangeEquity<'_, H> {
    fn called_equity(&self, query: &RaiseQuery) -> Result<f64> {
        let index = self.details.borrow().len();
        let blockers = self.situation.hero.mask().union(CardSet::from_cards(self.situation.board.cards()));
        let continuing = self
            .advisor
            .config
            .model
            .continuing_range(self.range, query.continuation, blockers);

        let outcome = self.advisor.simulator.estimate_equity(
            self.situation.hero,
            &self.situation.board,
            &continuing,
            self.situation.street,
            &self.config(index),
        );

        let (equity, trials, status) = match outcome {
            Ok(result) if result.trials() > 0 => (result.equity(), result.trials(), Some(result.status())),
            Ok(result) => (self.fallback, 0, Some(result.status())),
            Err(EngineError::RangeExhausted) => {
                debug!("continuing range for raise {:.2} is fully blocked", query.amount);
                (self.fallback, 0, None)
            }
            Err(e) => return Err(e),
        };
        if status == Some(Completion::Cancelled) {
            debug!("re-estimate for raise {:.2} cancelled after {} trials", query.amount, trials);
        }

        self.details.borrow_mut().push(RaiseDetail {
            amount: query.amount,
            fold_probability: 1.0 - query.continuation,
            called_equity: equity,
            trials,
            status,
        });
        Ok(equity)
    }
}
