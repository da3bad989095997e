//! Monte Carlo equity estimation.
//!
//! ## Modules
//!
//! - `config`: Trial count, batching, seed, adaptive stop and threads
//! - `result`: `Tally` counts and the `SimulationResult` of one run
//! - `sampler`: Board completion from a per-trial deck
//! - `simulator`: The parallel `EquitySimulator` and its `CancelToken`

pub mod config;
pub mod result;
pub mod sampler;
pub mod simulator;

pub use config::SimulationConfig;
pub use result::{Completion, SimulationResult, Tally};
pub use sampler::draw_remaining_board;
pub use simulator::{CancelToken, EquitySimulator};
