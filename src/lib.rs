//! # Hold'em Advisor
//!
//! Monte Carlo equity and expected-value advice for heads-up No-Limit
//! Hold'em decisions.
//!
//! ## Features
//!
//! - **Weighted ranges**: Hand classes and explicit combos with relative weights,
//!   parsed from notation like "TT+, AQs+, A5s-A2s, 2c7d, QQ@50"
//! - **Parallel equity**: Seeded, batch-parallel Monte Carlo with adaptive
//!   stopping and cancellation
//! - **Tendency model**: Looseness, aggression and bluff frequency turned
//!   into a range and a fold-to-bet curve
//! - **EV table**: Fold / Check / Call / Raise EVs, with raise EVs using equity
//!   re-estimated against the hands that continue
//!
//! ## Quick Start
//!
//! ```
//! use holdem_advisor::cards::{Board, Street};
//! use holdem_advisor::equity::{EquitySimulator, SimulationConfig};
//! use holdem_advisor::range::OpponentRange;
//!
//! let simulator = EquitySimulator::new();
//! let range = OpponentRange::from_notation("22+, A2s+, KTs+, ATo+").unwrap();
//! let config = SimulationConfig::default().with_trials(2_000).with_seed(1);
//!
//! let result = simulator
//!     .estimate_equity("JhJd".parse().unwrap(), &Board::new(), &range, Street::Preflop, &config)
//!     .unwrap();
//! println!("{}", result);
//! ```
//!
//! ## Modules
//!
//! - [`cards`]: Cards, hole cards, boards, hand classes and showdown ranking
//! - [`range`]: Opponent ranges, notation and the opponent-hand draw
//! - [`equity`]: The Monte Carlo equity simulator
//! - [`tendency`]: Opponent tendency profile and its transforms
//! - [`ev`]: EV formulas, the EV table and recommendation
//! - [`advisor`]: The whole pipeline for one decision
//!
//! ## Architecture
//!
//! ```text
//!  Situation ──► Tendency Model ──► Opponent Range
//!                                        │
//!                                        ▼
//!                  Deck Sampler ◄── Equity Simulator ◄──┐
//!                                        │              │ depth-1 re-estimate
//!                                        ▼              │ per raise size
//!                                    EV Engine ─────────┘
//!                                        │
//!                                        ▼
//!                            EV table + recommendation
//! ```

pub mod advisor;
pub mod cards;
pub mod equity;
pub mod error;
pub mod ev;
pub mod range;
pub mod tendency;

// Re-export commonly used types at crate root for convenience
pub use advisor::{Advisor, AdvisorConfig, Decision, Situation};
pub use equity::{CancelToken, EquitySimulator, SimulationConfig, SimulationResult};
pub use error::{EngineError, Result};
pub use ev::{Action, BettingSpot, EvConfig, EvTable, Stacks};
pub use range::OpponentRange;
pub use tendency::TendencyProfile;
