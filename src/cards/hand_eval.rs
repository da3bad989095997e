//! Poker hand evaluation.
//!
//! Showdown ranking is an external capability to the advisor: the simulator
//! only needs a total order over 5-7 card hands and a win/tie/loss verdict.
//! [`HandRanker`] is that seam; [`HandEvaluator`] is the bundled
//! implementation, which ranks 7 cards directly from rank counts and
//! per-suit rank masks instead of trying all 21 five-card subsets.

use super::card::{Card, HoleCards};
use std::cmp::Ordering;

/// Hand rank categories, ordered from worst to best.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum HandCategory {
    HighCard = 0,
    OnePair = 1,
    TwoPair = 2,
    ThreeOfAKind = 3,
    Straight = 4,
    Flush = 5,
    FullHouse = 6,
    FourOfAKind = 7,
    StraightFlush = 8,
}

impl HandCategory {
    /// Get the category name.
    pub fn name(&self) -> &'static str {
        match self {
            HandCategory::HighCard => "High Card",
            HandCategory::OnePair => "One Pair",
            HandCategory::TwoPair => "Two Pair",
            HandCategory::ThreeOfAKind => "Three of a Kind",
            HandCategory::Straight => "Straight",
            HandCategory::Flush => "Flush",
            HandCategory::FullHouse => "Full House",
            HandCategory::FourOfAKind => "Four of a Kind",
            HandCategory::StraightFlush => "Straight Flush",
        }
    }
}

/// A hand rank that can be compared.
/// Higher values are better hands.
/// Format: category (4 bits) | kicker1 (4 bits) | kicker2 (4 bits) | ...
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HandRank(u32);

impl HandRank {
    fn new(category: HandCategory, kickers: &[u8]) -> Self {
        let mut value = (category as u32) << 20;
        for (i, &k) in kickers.iter().take(5).enumerate() {
            value |= (k as u32) << (16 - i * 4);
        }
        Self(value)
    }

    /// Get the raw rank value for comparison.
    pub fn value(&self) -> u32 {
        self.0
    }

    /// Get the hand category.
    pub fn category(&self) -> HandCategory {
        match self.0 >> 20 {
            0 => HandCategory::HighCard,
            1 => HandCategory::OnePair,
            2 => HandCategory::TwoPair,
            3 => HandCategory::ThreeOfAKind,
            4 => HandCategory::Straight,
            5 => HandCategory::Flush,
            6 => HandCategory::FullHouse,
            7 => HandCategory::FourOfAKind,
            _ => HandCategory::StraightFlush,
        }
    }
}

/// Outcome of a heads-up showdown from the hero's side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Showdown {
    HeroWin,
    Tie,
    HeroLoss,
}

/// Ranks poker hands. Implementations must be pure and thread-safe.
pub trait HandRanker: Send + Sync {
    /// Rank 5, 6 or 7 cards by their best five-card hand.
    fn rank(&self, cards: &[Card]) -> HandRank;

    /// Decide a heads-up showdown on a complete board.
    fn showdown(&self, hero: &HoleCards, villain: &HoleCards, board: &[Card; 5]) -> Showdown {
        let hand = |hole: &HoleCards| {
            [hole.card1, hole.card2, board[0], board[1], board[2], board[3], board[4]]
        };
        match self.rank(&hand(hero)).cmp(&self.rank(&hand(villain))) {
            Ordering::Greater => Showdown::HeroWin,
            Ordering::Equal => Showdown::Tie,
            Ordering::Less => Showdown::HeroLoss,
        }
    }
}

/// Bundled hand evaluator.
#[derive(Debug, Clone, Copy, Default)]
pub struct HandEvaluator;

impl HandEvaluator {
    /// Create a new hand evaluator.
    pub fn new() -> Self {
        Self
    }

    /// Find the highest straight from a rank bitmask.
    /// Returns the high card of the straight, or None if no straight.
    fn find_straight(rank_bits: u16) -> Option<u8> {
        // Ace also plays low: mirror it below the deuce at bit -1 by shifting up.
        let bits = ((rank_bits as u32) << 1) | ((rank_bits as u32 >> 12) & 1);

        (0..=9u8)
            .rev()
            .find(|&low| (bits >> low) & 0b11111 == 0b11111)
            .map(|low| low + 3)
    }

    /// Highest `n` ranks present in `bits`, best first.
    fn top_ranks(bits: u16, n: usize) -> [u8; 5] {
        let mut out = [0u8; 5];
        let mut found = 0;
        for rank in (0..13u8).rev() {
            if found == n {
                break;
            }
            if bits & (1 << rank) != 0 {
                out[found] = rank;
                found += 1;
            }
        }
        out
    }
}

impl HandRanker for HandEvaluator {
    fn rank(&self, cards: &[Card]) -> HandRank {
        debug_assert!((5..=7).contains(&cards.len()), "need 5-7 cards, got {}", cards.len());

        let mut rank_counts = [0u8; 13];
        let mut suit_masks = [0u16; 4];
        let mut rank_bits = 0u16;

        for card in cards {
            rank_counts[card.rank() as usize] += 1;
            suit_masks[card.suit() as usize] |= 1 << card.rank();
            rank_bits |= 1 << card.rank();
        }

        let flush = suit_masks.iter().copied().find(|m| m.count_ones() >= 5);

        if let Some(high) = flush.and_then(Self::find_straight) {
            return HandRank::new(HandCategory::StraightFlush, &[high]);
        }

        let mut quad = None;
        let mut trips = [0u8; 2];
        let mut num_trips = 0;
        let mut pairs = [0u8; 3];
        let mut num_pairs = 0;

        for rank in (0..13u8).rev() {
            match rank_counts[rank as usize] {
                4 if quad.is_none() => quad = Some(rank),
                3 if num_trips < 2 => {
                    trips[num_trips] = rank;
                    num_trips += 1;
                }
                2 if num_pairs < 3 => {
                    pairs[num_pairs] = rank;
                    num_pairs += 1;
                }
                _ => {}
            }
        }

        if let Some(q) = quad {
            let kicker = Self::top_ranks(rank_bits & !(1 << q), 1)[0];
            return HandRank::new(HandCategory::FourOfAKind, &[q, kicker]);
        }

        if num_trips > 0 && (num_trips > 1 || num_pairs > 0) {
            let pair = match (num_trips > 1, num_pairs > 0) {
                (true, true) => trips[1].max(pairs[0]),
                (true, false) => trips[1],
                _ => pairs[0],
            };
            return HandRank::new(HandCategory::FullHouse, &[trips[0], pair]);
        }

        if let Some(mask) = flush {
            return HandRank::new(HandCategory::Flush, &Self::top_ranks(mask, 5));
        }

        if let Some(high) = Self::find_straight(rank_bits) {
            return HandRank::new(HandCategory::Straight, &[high]);
        }

        if num_trips > 0 {
            let k = Self::top_ranks(rank_bits & !(1 << trips[0]), 2);
            return HandRank::new(HandCategory::ThreeOfAKind, &[trips[0], k[0], k[1]]);
        }

        if num_pairs >= 2 {
            let used = (1 << pairs[0]) | (1 << pairs[1]);
            let kicker = Self::top_ranks(rank_bits & !used, 1)[0];
            return HandRank::new(HandCategory::TwoPair, &[pairs[0], pairs[1], kicker]);
        }

        if num_pairs == 1 {
            let k = Self::top_ranks(rank_bits & !(1 << pairs[0]), 3);
            return HandRank::new(HandCategory::OnePair, &[pairs[0], k[0], k[1], k[2]]);
        }

        HandRank::new(HandCategory::HighCard, &Self::top_ranks(rank_bits, 5))
    }
}
