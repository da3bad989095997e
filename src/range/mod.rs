//! Card & range model.
//!
//! - `weighted`: `Category` and the weighted `OpponentRange`
//! - `notation`: Range notation parsing ("TT+, AQs+, A5s-A2s, 2c7d, QQ@50")
//! - `known`: `KnownCards` (hero + board) and the `OpponentSampler` draw

pub mod known;
pub mod notation;
pub mod weighted;

pub use known::{KnownCards, OpponentSampler};
pub use notation::RangeParseError;
pub use weighted::{Category, OpponentRange};
