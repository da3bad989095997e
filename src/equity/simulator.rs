//! Monte Carlo equity estimation.
//!
//! Trials are split into fixed-size batches. Every batch owns an RNG seeded
//! from the run seed and its own index, plays its trials into a private
//! [`Tally`], and the tallies are summed once per round. Because the split
//! and the seeds depend only on the configuration, a seeded run gives the
//! same answer on one thread or sixty-four.
//!
//! Between rounds the simulator reports progress, checks the adaptive stop,
//! and checks the [`CancelToken`]. Cancellation is also honoured at the start
//! of every batch.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

use log::{debug, trace, warn};
use rand::rngs::StdRng;
use rand::SeedableRng;
use rayon::prelude::*;

use crate::cards::{Board, Deck, HandEvaluator, HandRanker, HoleCards, Street};
use crate::error::{ConfigError, Result};
use crate::range::{KnownCards, OpponentRange, OpponentSampler};

use super::config::SimulationConfig;
use super::result::{Completion, SimulationResult, Tally};
use super::sampler::draw_remaining_board;

/// Shared cancellation flag.
///
/// Clones share the flag, so a token handed to another thread (a UI, a
/// timer) can stop a running simulation.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    /// A fresh, un-cancelled token.
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    /// Whether cancellation has been requested.
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }

    /// Clear the flag so the token can be reused.
    pub fn reset(&self) {
        self.0.store(false, Ordering::Relaxed);
    }
}

/// Estimates the hero's showdown equity against a weighted opponent range.
///
/// # Type Parameters
/// - `H`: The showdown ranker, [`HandEvaluator`] unless supplied
///
/// # Example
/// ```
/// use holdem_advisor::cards::{Board, Street};
/// use holdem_advisor::equity::{EquitySimulator, SimulationConfig};
/// use holdem_advisor::range::OpponentRange;
///
/// let simulator = EquitySimulator::new();
/// let hero = "AsAh".parse().unwrap();
/// let range = OpponentRange::from_notation("KK, QQ, AKs").unwrap();
/// let config = SimulationConfig::default().with_trials(2_000).with_seed(7);
///
/// let result = simulator
///     .estimate_equity(hero, &Board::new(), &range, Street::Preflop, &config)
///     .unwrap();
/// assert!(result.equity() > 0.6);
/// ```
#[derive(Debug, Clone, Default)]
pub struct EquitySimulator<H: HandRanker = HandEvaluator> {
    ranker: H,
    cancel: CancelToken,
}

impl EquitySimulator<HandEvaluator> {
    /// Create a simulator using the bundled evaluator.
    pub fn new() -> Self {
        Self::default()
    }
}

impl<H: HandRanker> EquitySimulator<H> {
    /// Create a simulator around a custom ranker.
    pub fn with_ranker(ranker: H) -> Self {
        Self {
            ranker,
            cancel: CancelToken::new(),
        }
    }

    /// Builder method: share an existing cancellation token.
    pub fn with_cancel_token(mut self, cancel: CancelToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// The token that cancels this simulator's runs.
    pub fn cancel_token(&self) -> &CancelToken {
        &self.cancel
    }

    /// The showdown ranker.
    pub fn ranker(&self) -> &H {
        &self.ranker
    }

    /// Estimate equity of `hero` on `board` against `range`.
    ///
    /// Inputs are validated before any trial runs: duplicate cards or a
    /// board that does not match `street` give `InvalidHandState`, and a
    /// range with no dealable hand gives `RangeExhausted`.
    pub fn estimate_equity(
        &self,
        hero: HoleCards,
        board: &Board,
        range: &OpponentRange,
        street: Street,
        config: &SimulationConfig,
    ) -> Result<SimulationResult> {
        self.estimate_equity_with_progress(hero, board, range, street, config, |_| {})
    }

    /// Like [`estimate_equity`](Self::estimate_equity), calling `progress`
    /// with the merged tally after every round.
    ///
    /// The callback runs on the calling thread between rounds, so it may
    /// cancel the run through the token.
    pub fn estimate_equity_with_progress<F>(
        &self,
        hero: HoleCards,
        board: &Board,
        range: &OpponentRange,
        street: Street,
        config: &SimulationConfig,
        mut progress: F,
    ) -> Result<SimulationResult>
    where
        F: FnMut(&Tally) + Send,
    {
        config.validate()?;
        let known = KnownCards::for_street(hero, board, street)?;
        let sampler = OpponentSampler::new(range, known.known_cards())?;

        let seed = match config.seed {
            Some(seed) => seed,
            None => {
                let seed = rand::random();
                debug!("no seed configured, drew {:#018x}", seed);
                seed
            }
        };

        debug!(
            "simulating {} trials: {} vs {} live categories on {:?} ({})",
            config.n_trials,
            hero,
            sampler.live_categories(),
            board,
            street,
        );

        let mut run = || self.run(&known, &sampler, seed, config, &mut progress);
        match config.num_threads {
            Some(threads) => {
                let pool = rayon::ThreadPoolBuilder::new()
                    .num_threads(threads)
                    .build()
                    .map_err(|e| ConfigError::ThreadPool(threads, e.to_string()))?;
                Ok(pool.install(run))
            }
            None => Ok(run()),
        }
    }

    fn run<F: FnMut(&Tally)>(
        &self,
        known: &KnownCards,
        sampler: &OpponentSampler,
        seed: u64,
        config: &SimulationConfig,
        progress: &mut F,
    ) -> SimulationResult {
        let start = Instant::now();
        let total_batches = config.num_batches();
        let mut tally = Tally::default();
        let mut next = 0u64;
        let mut converged = false;

        while next < total_batches && !self.cancel.is_cancelled() {
            let end = (next + config.batches_per_round as u64).min(total_batches);
            let round: Tally = (next..end)
                .into_par_iter()
                .map(|batch| {
                    if self.cancel.is_cancelled() {
                        return Tally::default();
                    }
                    self.run_batch(known, sampler, batch_seed(seed, batch), config.batch_len(batch))
                })
                .sum();

            tally += round;
            next = end;
            trace!("round done: {} trials, equity {:.4}", tally.trials(), tally.equity());
            progress(&tally);

            if let Some(target) = config.target_standard_error {
                if next < total_batches && tally.trials() >= config.min_trials && tally.standard_error() <= target {
                    converged = true;
                    break;
                }
            }
        }

        let status = if converged {
            Completion::Converged
        } else if next < total_batches || (tally.trials() < config.n_trials && self.cancel.is_cancelled()) {
            Completion::Cancelled
        } else {
            Completion::Finished
        };

        let result = SimulationResult::new(tally, config.n_trials, status);
        match status {
            Completion::Cancelled => warn!("simulation cancelled: {}", result),
            _ => debug!("{} in {:.2?}", result, start.elapsed()),
        }
        result
    }

    /// Play one batch of trials on a private RNG and tally.
    fn run_batch(&self, known: &KnownCards, sampler: &OpponentSampler, seed: u64, len: u64) -> Tally {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut tally = Tally::default();
        let hero = known.hero();
        let board = known.board().cards();
        let dead = known.known_cards();

        // KnownCards caps the board at five, so at least 43 cards remain once
        // hero, villain and board are out and every draw completes
        debug_assert!(board.len() <= 5);
        let mut undealt = 0u64;
        for _ in 0..len {
            let villain = sampler.sample(&mut rng);
            let mut deck = Deck::without(dead.union(villain.mask()));
            match draw_remaining_board(board, &mut deck, &mut rng) {
                Some(full) => tally.record(self.ranker.showdown(&hero, &villain, &full)),
                None => undealt += 1,
            }
        }
        debug_assert_eq!(undealt, 0, "board could not be completed");
        if undealt > 0 {
            warn!("{} of {} trials could not complete the board", undealt, len);
        }

        tally
    }
}

/// Seed for batch `index` of a run seeded with `seed`.
///
/// Both inputs pass through splitmix64 so nearby run seeds (the advisor
/// offsets them per raise size) do not share batch streams.
fn batch_seed(seed: u64, index: u64) -> u64 {
    splitmix64(seed ^ splitmix64(index))
}

fn splitmix64(x: u64) -> u64 {
    let mut z = x.wrapping_add(0x9E37_79B9_7F4A_7C15);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}
