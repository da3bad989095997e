//! Board completion for one trial.

use rand::Rng;

use crate::cards::{Card, Deck};

/// Complete `board` to five cards with cards drawn uniformly without
/// replacement from `deck`.
///
/// The deck must already exclude every card in play for the trial (hero,
/// board and the sampled opponent hand). Returns `None` when the board
/// already holds more than five cards or the deck cannot cover the gap.
pub fn draw_remaining_board<R: Rng + ?Sized>(
    board: &[Card],
    deck: &mut Deck,
    rng: &mut R,
) -> Option<[Card; 5]> {
    let needed = 5usize.checked_sub(board.len())?;
    if deck.remaining() < needed {
        return None;
    }

    let mut full = [Card::from_id(0); 5];
    full[..board.len()].copy_from_slice(board);
    for slot in &mut full[board.len()..] {
        *slot = deck.deal_random(rng)?;
    }
    Some(full)
}
