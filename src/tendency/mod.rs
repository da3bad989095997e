//! Opponent tendency model.
//!
//! - `profile`: `TendencyProfile` sliders and `ObservedAction`
//! - `stats`: `OpponentStats` counts and their mapping onto a profile
//! - `model`: Range building, fold/continue curve, bluff share, continuing sub-range

pub mod model;
pub mod profile;
pub mod stats;

pub use model::{ActionFaced, ResponseCurve, TendencyModel};
pub use profile::{ObservedAction, TendencyProfile};
pub use stats::OpponentStats;
