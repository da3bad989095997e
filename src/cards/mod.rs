//! Cards, starting-hand classes and showdown ranking.
//!
//! ## Modules
//!
//! - `card`: Card, card set, hole cards, board, street and deck
//! - `class`: The 169 starting-hand classes and their preflop strength order
//! - `hand_eval`: The `HandRanker` seam and the bundled evaluator

pub mod card;
pub mod class;
pub mod hand_eval;

pub use card::{parse_cards, Board, Card, CardSet, Deck, HoleCards, Street};
pub use class::{HandClass, NUM_CLASSES, NUM_COMBOS};
pub use hand_eval::{HandCategory, HandEvaluator, HandRank, HandRanker, Showdown};
