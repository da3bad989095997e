//! EV decision engine.
//!
//! - `action`: `Action`, tie-break `ActionKind` and the `EvTable`
//! - `config`: `EvConfig` (tie tolerance and order, fold clamp)
//! - `engine`: Chip accounting, EV formulas and the recommendation

pub mod action;
pub mod config;
pub mod engine;

pub use action::{Action, ActionKind, EvTable};
pub use config::EvConfig;
pub use engine::{ev_call, ev_check, ev_raise, BettingSpot, CalledEquity, EvEngine, RaiseQuery, Stacks};
