//! Error types surfaced by the advisor.

use thiserror::Error;

use crate::cards::Card;
use crate::range::RangeParseError;

/// Malformed or inconsistent input to a single computation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum HandStateError {
    #[error("unparsable card text: {0:?}")]
    UnparsableCard(String),

    #[error("card {0} appears more than once")]
    DuplicateCard(Card),

    #[error("board has {0} cards, at most 5 allowed")]
    BoardTooLarge(usize),

    #[error("board has {actual} cards but the {street} needs {expected}")]
    BoardStreetMismatch {
        street: crate::cards::Street,
        expected: usize,
        actual: usize,
    },

    #[error("{name} must be finite and non-negative, got {value}")]
    NegativeAmount { name: &'static str, value: f64 },

    #[error("raise size must be finite and positive, got {0}")]
    InvalidRaiseSize(f64),

    #[error("equity must lie in [0, 1], got {0}")]
    EquityOutOfRange(f64),

    #[error("tendency parameter {name} must lie in [0, 1], got {value}")]
    TendencyOutOfRange { name: &'static str, value: f64 },
}

/// Errors that can occur when validating configuration.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("trial count must be at least 1")]
    ZeroTrials,

    #[error("batch size must be at least 1")]
    ZeroBatchSize,

    #[error("batches per round must be at least 1")]
    ZeroBatchesPerRound,

    #[error("target standard error {0} must be finite and positive")]
    InvalidTargetError(f64),

    #[error("tie epsilon must be finite and non-negative, got {0}")]
    InvalidTieEpsilon(f64),

    #[error("{name} {value} is out of range [0, 1]")]
    OutOfUnitRange { name: &'static str, value: f64 },

    #[error("fold floor {floor} exceeds fold ceiling {ceiling}")]
    InvertedFoldBounds { floor: f64, ceiling: f64 },

    #[error("tie-break order must list call, raise and fold exactly once")]
    IncompleteTieBreak,

    #[error("failed to build a {0}-thread worker pool: {1}")]
    ThreadPool(usize, String),
}

/// Errors returned by equity estimation and EV computation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EngineError {
    #[error("invalid hand state: {0}")]
    InvalidHandState(#[from] HandStateError),

    #[error("opponent range is exhausted: every weighted category is blocked by known cards")]
    RangeExhausted,

    #[error("invalid configuration: {0}")]
    InvalidConfig(#[from] ConfigError),

    #[error("invalid opponent range: {0}")]
    InvalidRange(#[from] RangeParseError),
}

/// Convenience alias for engine results.
pub type Result<T> = std::result::Result<T, EngineError>;
