//! Card representation.
//!
//! This module provides the fundamental card types used throughout the advisor:
//! - `Card`: A single playing card with rank and suit
//! - `CardSet`: A 52-bit set of cards used for collision checks
//! - `HoleCards`: A player's two private cards
//! - `Board`: Community cards (0, 3, 4 or 5 cards)
//! - `Street`: The betting round implied by the board
//! - `Deck`: The cards still available to a single trial

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::HandStateError;

/// Rank of a card (0-12: 2-A).
pub const RANK_2: u8 = 0;
pub const RANK_3: u8 = 1;
pub const RANK_4: u8 = 2;
pub const RANK_5: u8 = 3;
pub const RANK_6: u8 = 4;
pub const RANK_7: u8 = 5;
pub const RANK_8: u8 = 6;
pub const RANK_9: u8 = 7;
pub const RANK_T: u8 = 8;
pub const RANK_J: u8 = 9;
pub const RANK_Q: u8 = 10;
pub const RANK_K: u8 = 11;
pub const RANK_A: u8 = 12;

/// Suit of a card (0-3).
pub const SUIT_CLUBS: u8 = 0;
pub const SUIT_DIAMONDS: u8 = 1;
pub const SUIT_HEARTS: u8 = 2;
pub const SUIT_SPADES: u8 = 3;

/// Rank characters for display.
pub(crate) const RANK_CHARS: [char; 13] = ['2', '3', '4', '5', '6', '7', '8', '9', 'T', 'J', 'Q', 'K', 'A'];

/// Suit characters for display.
const SUIT_CHARS: [char; 4] = ['c', 'd', 'h', 's'];

/// A single playing card.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Card {
    /// Card index 0-51: rank * 4 + suit
    id: u8,
}

impl Card {
    /// Create a new card from rank (0-12) and suit (0-3).
    #[inline]
    pub fn new(rank: u8, suit: u8) -> Self {
        debug_assert!(rank < 13, "rank must be 0-12");
        debug_assert!(suit < 4, "suit must be 0-3");
        Self { id: rank * 4 + suit }
    }

    /// Create a card from its ID (0-51).
    #[inline]
    pub fn from_id(id: u8) -> Self {
        debug_assert!(id < 52, "card id must be 0-51");
        Self { id }
    }

    /// Get the card's ID (0-51).
    #[inline]
    pub fn id(&self) -> u8 {
        self.id
    }

    /// Get the card's rank (0-12: 2-A).
    #[inline]
    pub fn rank(&self) -> u8 {
        self.id / 4
    }

    /// Get the card's suit (0-3).
    #[inline]
    pub fn suit(&self) -> u8 {
        self.id % 4
    }

    /// Single-bit mask of this card.
    #[inline]
    pub fn mask(&self) -> u64 {
        1u64 << self.id
    }

    /// Get rank character for display.
    pub fn rank_char(&self) -> char {
        RANK_CHARS[self.rank() as usize]
    }

    /// Get suit character for display.
    pub fn suit_char(&self) -> char {
        SUIT_CHARS[self.suit() as usize]
    }

    /// All 52 cards in id order.
    pub fn all() -> impl Iterator<Item = Card> {
        (0..52u8).map(Card::from_id)
    }
}

/// Parse a rank character ("2".."A", case-insensitive for letters).
pub(crate) fn parse_rank(c: char) -> Option<u8> {
    RANK_CHARS
        .iter()
        .position(|&r| r == c.to_ascii_uppercase())
        .map(|r| r as u8)
}

impl FromStr for Card {
    type Err = HandStateError;

    /// Parse a card from a string like "As", "Kh", "2c".
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let chars: Vec<char> = s.trim().chars().collect();
        if chars.len() != 2 {
            return Err(HandStateError::UnparsableCard(s.to_string()));
        }

        let rank = parse_rank(chars[0]);
        let suit = SUIT_CHARS.iter().position(|&c| c == chars[1].to_ascii_lowercase());

        match (rank, suit) {
            (Some(rank), Some(suit)) => Ok(Self::new(rank, suit as u8)),
            _ => Err(HandStateError::UnparsableCard(s.to_string())),
        }
    }
}

impl TryFrom<String> for Card {
    type Error = HandStateError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Card> for String {
    fn from(card: Card) -> Self {
        card.to_string()
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.rank_char(), self.suit_char())
    }
}

impl fmt::Debug for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self)
    }
}

/// Parse a run of cards like "AhKsQd" or "Ah Ks Qd".
pub fn parse_cards(s: &str) -> Result<Vec<Card>, HandStateError> {
    let s: String = s.chars().filter(|c| !c.is_whitespace()).collect();
    if s.len() % 2 != 0 {
        return Err(HandStateError::UnparsableCard(s));
    }
    (0..s.len())
        .step_by(2)
        .map(|i| s.get(i..i + 2).unwrap_or_default().parse())
        .collect()
}

/// A set of cards stored as a 52-bit mask.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct CardSet(u64);

impl CardSet {
    /// The empty set.
    pub const EMPTY: CardSet = CardSet(0);

    /// The full 52-card deck.
    pub const FULL: CardSet = CardSet((1u64 << 52) - 1);

    /// Create a set from cards, ignoring repeats.
    pub fn from_cards(cards: &[Card]) -> Self {
        Self(cards.iter().fold(0, |m, c| m | c.mask()))
    }

    /// Insert a card. Returns false if it was already present.
    #[inline]
    pub fn insert(&mut self, card: Card) -> bool {
        let fresh = self.0 & card.mask() == 0;
        self.0 |= card.mask();
        fresh
    }

    /// Check whether the set holds a card.
    #[inline]
    pub fn contains(&self, card: Card) -> bool {
        self.0 & card.mask() != 0
    }

    /// Check whether two sets share any card.
    #[inline]
    pub fn intersects(&self, other: CardSet) -> bool {
        self.0 & other.0 != 0
    }

    /// Cards in either set.
    #[inline]
    pub fn union(&self, other: CardSet) -> CardSet {
        CardSet(self.0 | other.0)
    }

    /// Cards of the full deck not in this set.
    #[inline]
    pub fn complement(&self) -> CardSet {
        CardSet(!self.0 & Self::FULL.0)
    }

    /// Number of cards in the set.
    #[inline]
    pub fn len(&self) -> usize {
        self.0.count_ones() as usize
    }

    /// Check if the set is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    /// Iterate cards in id order.
    pub fn iter(&self) -> impl Iterator<Item = Card> + '_ {
        Card::all().filter(move |c| self.contains(*c))
    }

    /// Raw mask.
    pub fn bits(&self) -> u64 {
        self.0
    }
}

impl fmt::Debug for CardSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

/// A player's two hole cards.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct HoleCards {
    /// First card (higher rank by convention).
    pub card1: Card,
    /// Second card.
    pub card2: Card,
}

impl HoleCards {
    /// Create hole cards, ordering by rank then suit (higher first).
    pub fn new(card1: Card, card2: Card) -> Self {
        if card1 >= card2 {
            Self { card1, card2 }
        } else {
            Self {
                card1: card2,
                card2: card1,
            }
        }
    }

    /// Check if hole cards are suited.
    pub fn is_suited(&self) -> bool {
        self.card1.suit() == self.card2.suit()
    }

    /// Check if hole cards are a pair.
    pub fn is_pair(&self) -> bool {
        self.card1.rank() == self.card2.rank()
    }

    /// Get both cards as an array.
    pub fn cards(&self) -> [Card; 2] {
        [self.card1, self.card2]
    }

    /// Both cards as a set.
    pub fn mask(&self) -> CardSet {
        CardSet(self.card1.mask() | self.card2.mask())
    }

    /// Check if a card conflicts with these hole cards.
    pub fn contains(&self, card: Card) -> bool {
        self.card1 == card || self.card2 == card
    }
}

impl FromStr for HoleCards {
    type Err = HandStateError;

    /// Parse hole cards from a string like "AhKs" or "Ah Ks".
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let cards = parse_cards(s)?;
        match cards.as_slice() {
            [c1, c2] if c1 != c2 => Ok(Self::new(*c1, *c2)),
            [c, _] => Err(HandStateError::DuplicateCard(*c)),
            _ => Err(HandStateError::UnparsableCard(s.to_string())),
        }
    }
}

impl TryFrom<String> for HoleCards {
    type Error = HandStateError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<HoleCards> for String {
    fn from(hole: HoleCards) -> Self {
        hole.to_string()
    }
}

impl fmt::Display for HoleCards {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.card1, self.card2)
    }
}

impl fmt::Debug for HoleCards {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self)
    }
}

/// Community cards on the board.
#[derive(Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Board {
    cards: Vec<Card>,
}

impl Board {
    /// Create an empty board.
    pub fn new() -> Self {
        Self { cards: Vec::with_capacity(5) }
    }

    /// Create a board from cards.
    ///
    /// Size and duplicates are checked when the board enters a simulation,
    /// not here, so partially entered boards can still be represented.
    pub fn from_cards(cards: Vec<Card>) -> Self {
        Self { cards }
    }

    /// Get the number of cards on the board.
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    /// Check if board is empty.
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Get the cards on the board.
    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    /// Add a card to the board.
    pub fn add(&mut self, card: Card) {
        debug_assert!(self.cards.len() < 5);
        self.cards.push(card);
    }

    /// Check if the board contains a specific card.
    pub fn contains(&self, card: Card) -> bool {
        self.cards.contains(&card)
    }

    /// Get the current street based on board cards.
    pub fn street(&self) -> Option<Street> {
        match self.cards.len() {
            0 => Some(Street::Preflop),
            3 => Some(Street::Flop),
            4 => Some(Street::Turn),
            5 => Some(Street::River),
            _ => None,
        }
    }
}

impl FromStr for Board {
    type Err = HandStateError;

    /// Parse a board from a string like "AhKsQd".
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let cards = parse_cards(s)?;
        if cards.len() > 5 {
            return Err(HandStateError::BoardTooLarge(cards.len()));
        }
        Ok(Self::from_cards(cards))
    }
}

impl TryFrom<String> for Board {
    type Error = HandStateError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Board> for String {
    fn from(board: Board) -> Self {
        board.to_string()
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for card in &self.cards {
            write!(f, "{}", card)?;
        }
        Ok(())
    }
}

impl fmt::Debug for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self)
    }
}

/// Street in a poker hand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Street {
    Preflop,
    Flop,
    Turn,
    River,
}

impl Street {
    /// Get the next street.
    pub fn next(&self) -> Option<Street> {
        match self {
            Street::Preflop => Some(Street::Flop),
            Street::Flop => Some(Street::Turn),
            Street::Turn => Some(Street::River),
            Street::River => None,
        }
    }

    /// Number of board cards for this street.
    pub fn num_board_cards(&self) -> usize {
        match self {
            Street::Preflop => 0,
            Street::Flop => 3,
            Street::Turn => 4,
            Street::River => 5,
        }
    }

    /// Board cards still to come before showdown.
    pub fn cards_to_come(&self) -> usize {
        5 - self.num_board_cards()
    }
}

impl fmt::Display for Street {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Street::Preflop => write!(f, "Preflop"),
            Street::Flop => write!(f, "Flop"),
            Street::Turn => write!(f, "Turn"),
            Street::River => write!(f, "River"),
        }
    }
}

/// The cards available to one trial.
///
/// Built from the unseen cards with the trial's opponent hand removed, then
/// consumed by partial shuffles. A deck is never shared between trials.
#[derive(Clone)]
pub struct Deck {
    /// Usable cards; `cards[index..size]` are still undealt.
    cards: [Card; 52],
    /// Index of next card to deal.
    index: usize,
    /// Number of usable cards in the deck (52 minus dead cards).
    size: usize,
}

impl Deck {
    /// Create a full deck in standard order.
    pub fn new() -> Self {
        Self::without(CardSet::EMPTY)
    }

    /// Create a deck with the given cards removed.
    pub fn without(dead: CardSet) -> Self {
        let mut cards = [Card::from_id(0); 52];
        let mut size = 0;
        for card in Card::all().filter(|c| !dead.contains(*c)) {
            cards[size] = card;
            size += 1;
        }
        Self { cards, index: 0, size }
    }

    /// Deal one card chosen uniformly from the undealt cards.
    pub fn deal_random<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Option<Card> {
        if self.index >= self.size {
            return None;
        }
        // one Fisher-Yates step on the undealt tail
        let pick = rng.gen_range(self.index..self.size);
        self.cards.swap(self.index, pick);
        let card = self.cards[self.index];
        self.index += 1;
        Some(card)
    }

    /// Get the number of remaining cards.
    pub fn remaining(&self) -> usize {
        self.size - self.index
    }

    /// Get remaining cards as a slice.
    pub fn remaining_cards(&self) -> &[Card] {
        &self.cards[self.index..self.size]
    }
}

impl Default for Deck {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Deck {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Deck({} remaining)", self.remaining())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_card_creation() {
        let ace_spades = Card::new(RANK_A, SUIT_SPADES);
        assert_eq!(ace_spades.rank(), RANK_A);
        assert_eq!(ace_spades.suit(), SUIT_SPADES);
        assert_eq!(ace_spades.to_string(), "As");

        let two_clubs = Card::new(RANK_2, SUIT_CLUBS);
        assert_eq!(two_clubs.rank(), RANK_2);
        assert_eq!(two_clubs.suit(), SUIT_CLUBS);
        assert_eq!(two_clubs.to_string(), "2c");
    }

    #[test]
    fn test_card_parsing() {
        assert_eq!("As".parse::<Card>().unwrap().to_string(), "As");
        assert_eq!("kh".parse::<Card>().unwrap().to_string(), "Kh");
        assert_eq!("Td".parse::<Card>().unwrap().to_string(), "Td");
        assert!("XX".parse::<Card>().is_err());
        assert!("A".parse::<Card>().is_err());
        assert!("Asd".parse::<Card>().is_err());
    }

    #[test]
    fn test_hole_cards() {
        let hc: HoleCards = "AhKs".parse().unwrap();
        assert_eq!(hc.card1.rank(), RANK_A);
        assert_eq!(hc.card2.rank(), RANK_K);
        assert!(!hc.is_suited());
        assert!(!hc.is_pair());

        let suited: HoleCards = "Ks As".parse().unwrap();
        assert!(suited.is_suited());
        assert_eq!(suited.card1.rank(), RANK_A);

        assert!("AhAh".parse::<HoleCards>().is_err());
    }

    #[test]
    fn test_board() {
        let mut board = Board::new();
        assert_eq!(board.street(), Some(Street::Preflop));

        board = "AhKsQd".parse().unwrap();
        assert_eq!(board.street(), Some(Street::Flop));

        board.add("Jc".parse().unwrap());
        assert_eq!(board.street(), Some(Street::Turn));

        board.add("Tc".parse().unwrap());
        assert_eq!(board.street(), Some(Street::River));

        let partial = Board::from_cards(parse_cards("AhKs").unwrap());
        assert_eq!(partial.street(), None);
        assert!("AhKsQdJcTc9c".parse::<Board>().is_err());
    }

    #[test]
    fn test_card_set() {
        let cards = parse_cards("As Ah Kd").unwrap();
        let mut set = CardSet::from_cards(&cards);
        assert_eq!(set.len(), 3);
        assert!(set.contains(cards[0]));
        assert!(!set.insert(cards[1]));
        assert!(set.insert("2c".parse().unwrap()));
        assert_eq!(set.complement().len(), 48);
        assert!(!set.intersects(set.complement()));
    }

    #[test]
    fn test_deck_without() {
        let dead = CardSet::from_cards(&parse_cards("AsAh").unwrap());
        let deck = Deck::without(dead);
        assert_eq!(deck.remaining(), 50);
        assert!(deck.remaining_cards().iter().all(|c| !dead.contains(*c)));
    }

    #[test]
    fn test_deck_deals_each_card_once() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut deck = Deck::new();
        let mut seen = CardSet::EMPTY;
        while let Some(card) = deck.deal_random(&mut rng) {
            assert!(seen.insert(card), "{} dealt twice", card);
        }
        assert_eq!(seen, CardSet::FULL);
        assert_eq!(deck.remaining(), 0);
    }

    #[test]
    fn test_street_progression() {
        assert_eq!(Street::Preflop.next(), Some(Street::Flop));
        assert_eq!(Street::Flop.next(), Some(Street::Turn));
        assert_eq!(Street::Turn.next(), Some(Street::River));
        assert_eq!(Street::River.next(), None);
        assert_eq!(Street::Flop.cards_to_come(), 2);
    }

    #[test]
    fn test_serde_as_strings() {
        let hole: HoleCards = serde_json::from_str("\"AsKd\"").unwrap();
        assert_eq!(hole.to_string(), "AsKd");
        let board: Board = serde_json::from_str("\"2c7d9h\"").unwrap();
        assert_eq!(board.len(), 3);
        assert_eq!(serde_json::to_string(&board).unwrap(), "\"2c7d9h\"");
    }
}
