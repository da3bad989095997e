//! Known cards and the opponent-hand draw.

use rand::distributions::{Distribution, WeightedIndex};
use rand::Rng;

use crate::cards::{Board, CardSet, HoleCards, Street};
use crate::error::{EngineError, HandStateError};

use super::weighted::OpponentRange;

/// The hero's hole cards and the board: every card currently in play.
#[derive(Debug, Clone, PartialEq)]
pub struct KnownCards {
    hero: HoleCards,
    board: Board,
    mask: CardSet,
}

impl KnownCards {
    /// Validate the cards in play. Duplicates and oversized boards are rejected.
    pub fn new(hero: HoleCards, board: &Board) -> Result<Self, HandStateError> {
        if board.len() > 5 {
            return Err(HandStateError::BoardTooLarge(board.len()));
        }

        let mut mask = CardSet::EMPTY;
        for card in hero.cards().iter().chain(board.cards()) {
            if !mask.insert(*card) {
                return Err(HandStateError::DuplicateCard(*card));
            }
        }

        Ok(Self {
            hero,
            board: board.clone(),
            mask,
        })
    }

    /// Like [`KnownCards::new`], also requiring the board to match `street`.
    pub fn for_street(hero: HoleCards, board: &Board, street: Street) -> Result<Self, HandStateError> {
        let known = Self::new(hero, board)?;
        if board.len() != street.num_board_cards() {
            return Err(HandStateError::BoardStreetMismatch {
                street,
                expected: street.num_board_cards(),
                actual: board.len(),
            });
        }
        Ok(known)
    }

    /// Hero hole cards.
    pub fn hero(&self) -> HoleCards {
        self.hero
    }

    /// Board cards.
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Hero hole cards together with the board.
    pub fn known_cards(&self) -> CardSet {
        self.mask
    }

    /// The full deck minus the known cards.
    pub fn unseen_cards(&self) -> CardSet {
        self.mask.complement()
    }

    /// Draw one opponent hand from `range`, avoiding the known cards.
    ///
    /// Builds the weighted table on every call; repeated draws should go
    /// through an [`OpponentSampler`] instead.
    pub fn sample_opponent_hand<R: Rng + ?Sized>(
        &self,
        range: &OpponentRange,
        rng: &mut R,
    ) -> Result<HoleCards, EngineError> {
        Ok(OpponentSampler::new(range, self.mask)?.sample(rng))
    }
}

/// Weighted opponent-hand draw for one simulation run.
///
/// Each category's weight is scaled by the share of its combos that are
/// still live, so card removal thins a class exactly as it thins a real
/// deal. Fully blocked categories are dropped. A category is chosen by the
/// scaled weight, then one of its live combos uniformly.
#[derive(Debug, Clone)]
pub struct OpponentSampler {
    combos: Vec<Vec<HoleCards>>,
    index: WeightedIndex<f64>,
}

impl OpponentSampler {
    /// Build the draw table for `range` given the cards already in play.
    pub fn new(range: &OpponentRange, blocked: CardSet) -> Result<Self, EngineError> {
        let (combos, weights): (Vec<Vec<HoleCards>>, Vec<f64>) = range
            .entries()
            .into_iter()
            .map(|(category, weight)| {
                let live = category.unblocked_combos(blocked);
                let share = live.len() as f64 / category.num_combos() as f64;
                (live, weight * share)
            })
            .filter(|(live, _)| !live.is_empty())
            .unzip();

        let index = WeightedIndex::new(&weights).map_err(|_| EngineError::RangeExhausted)?;

        Ok(Self { combos, index })
    }

    /// Number of categories that can still be drawn.
    pub fn live_categories(&self) -> usize {
        self.combos.len()
    }

    /// Draw one opponent hand.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> HoleCards {
        let live = &self.combos[self.index.sample(rng)];
        live[rng.gen_range(0..live.len())]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::HandClass;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn known(hero: &str, board: &str) -> KnownCards {
        KnownCards::new(hero.parse().unwrap(), &board.parse().unwrap()).unwrap()
    }

    #[test]
    fn test_unseen_cards_complement_known() {
        for (hero, board) in [("AsAh", ""), ("KdQd", "2c7h9s"), ("5c5d", "AhKhQh Jh"), ("Tc9c", "2d3d4d5d6d")] {
            let k = known(hero, board);
            let unseen = k.unseen_cards();
            assert_eq!(unseen.len(), 52 - k.known_cards().len());
            assert!(!unseen.intersects(k.known_cards()));
        }
    }

    #[test]
    fn test_rejects_duplicates() {
        let hero: HoleCards = "AsAh".parse().unwrap();
        let board: Board = "As7c2d".parse().unwrap();
        assert_eq!(
            KnownCards::new(hero, &board),
            Err(HandStateError::DuplicateCard("As".parse().unwrap()))
        );

        let board: Board = "7c7c2d".parse().unwrap();
        assert!(KnownCards::new(hero, &board).is_err());
    }

    #[test]
    fn test_street_mismatch() {
        let hero: HoleCards = "AsAh".parse().unwrap();
        let board: Board = "7c2d9h".parse().unwrap();
        assert!(KnownCards::for_street(hero, &board, Street::Flop).is_ok());
        assert!(matches!(
            KnownCards::for_street(hero, &board, Street::Turn),
            Err(HandStateError::BoardStreetMismatch { expected: 4, actual: 3, .. })
        ));
    }

    #[test]
    fn test_sample_avoids_known_cards() {
        let k = known("AsAh", "Kd7c2s");
        let range = OpponentRange::random_hand();
        let sampler = OpponentSampler::new(&range, k.known_cards()).unwrap();
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..2000 {
            let hand = sampler.sample(&mut rng);
            assert!(!hand.mask().intersects(k.known_cards()));
        }
    }

    #[test]
    fn test_blocked_category_excluded() {
        let k = known("AsAh", "");
        let mut range = OpponentRange::empty();
        // explicit combo holding a card in play, plus a live class
        range.set("AsKd".parse::<HoleCards>().unwrap(), 100.0);
        range.set("KK".parse::<HandClass>().unwrap(), 1.0);

        let sampler = OpponentSampler::new(&range, k.known_cards()).unwrap();
        assert_eq!(sampler.live_categories(), 1);
        let mut rng = StdRng::seed_from_u64(5);
        for _ in 0..200 {
            assert!(sampler.sample(&mut rng).is_pair());
        }
    }

    #[test]
    fn test_range_exhausted() {
        let k = known("AsAh", "AdKs2c");
        let mut range = OpponentRange::empty();
        range.set("AsKd".parse::<HoleCards>().unwrap(), 1.0);
        range.set("AKs".parse::<HandClass>().unwrap(), 0.0);
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(
            k.sample_opponent_hand(&range, &mut rng),
            Err(EngineError::RangeExhausted)
        );

        // only one ace left: AA cannot be dealt
        let aces = OpponentRange::from_notation("AA").unwrap();
        assert_eq!(
            k.sample_opponent_hand(&aces, &mut rng),
            Err(EngineError::RangeExhausted)
        );
        assert!(matches!(
            OpponentSampler::new(&OpponentRange::empty(), k.known_cards()),
            Err(EngineError::RangeExhausted)
        ));
    }

    #[test]
    fn test_weights_drive_draw_frequency() {
        let k = known("2c3d", "");
        let mut range = OpponentRange::empty();
        range.set("AA".parse::<HandClass>().unwrap(), 3.0);
        range.set("KK".parse::<HandClass>().unwrap(), 1.0);
        let sampler = OpponentSampler::new(&range, k.known_cards()).unwrap();
        let mut rng = StdRng::seed_from_u64(9);
        let aces = (0..8000)
            .filter(|_| sampler.sample(&mut rng).card1.rank() == 12)
            .count();
        let share = aces as f64 / 8000.0;
        assert!((share - 0.75).abs() < 0.03, "AA share {}", share);
    }

    #[test]
    fn test_card_removal_matches_uniform_deal() {
        let k = known("AsAh", "");
        let sampler = OpponentSampler::new(&OpponentRange::random_hand(), k.known_cards()).unwrap();
        let mut rng = StdRng::seed_from_u64(21);
        let aces: CardSet = CardSet::from_cards(&["Ad".parse().unwrap(), "Ac".parse().unwrap()]);

        let n = 200_000;
        let mut with_ace = 0;
        let mut both_aces = 0;
        for _ in 0..n {
            let hand = sampler.sample(&mut rng);
            if hand.cards().iter().any(|c| aces.contains(*c)) {
                with_ace += 1;
            }
            if hand.mask() == aces {
                both_aces += 1;
            }
        }

        // 50 unseen cards: 1 - C(48,2)/C(50,2) and 1/C(50,2)
        let ace_share = with_ace as f64 / n as f64;
        assert!((ace_share - 97.0 / 1225.0).abs() < 0.004, "ace share {}", ace_share);
        let aa_share = both_aces as f64 / n as f64;
        assert!((aa_share - 1.0 / 1225.0).abs() < 0.0003, "AA share {}", aa_share);
    }

    #[test]
    fn test_partly_blocked_class_loses_weight() {
        let k = known("AsKd", "");
        let mut range = OpponentRange::empty();
        range.set("AA".parse::<HandClass>().unwrap(), 6.0);
        range.set("QQ".parse::<HandClass>().unwrap(), 6.0);
        let sampler = OpponentSampler::new(&range, k.known_cards()).unwrap();
        let mut rng = StdRng::seed_from_u64(3);
        let n = 20_000;
        let aces = (0..n)
            .filter(|_| sampler.sample(&mut rng).card1.rank() == 12)
            .count();
        // three live AA combos against six QQ combos
        let share = aces as f64 / n as f64;
        assert!((share - 1.0 / 3.0).abs() < 0.02, "AA share {}", share);
    }
}
