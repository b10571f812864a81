//! Placement rules for Klondike.
//!
//! These are pure predicates over cards: they know nothing about piles,
//! selections or the game phase. The controller feeds them the top card
//! of the destination (`None` for an empty pile) and the bottom-most card
//! of whatever is being moved.

use crate::card::{Card, Rank};

/// True if `moving` may be placed on a foundation whose top is `dest_top`.
///
/// An empty foundation takes only an Ace; otherwise the card must follow
/// the top card in the same suit.
pub fn can_place_on_foundation(dest_top: Option<Card>, moving: Card) -> bool {
    match dest_top {
        None => moving.rank() == Rank::Ace,
        Some(top) => {
            moving.suit() == top.suit() && moving.rank_number() == top.rank_number() + 1
        }
    }
}

/// True if `moving` may be placed on a tableau column whose top is `dest_top`.
///
/// An empty column takes only a King; otherwise the card must be one rank
/// lower and of the opposite color.
pub fn can_place_on_tableau(dest_top: Option<Card>, moving: Card) -> bool {
    match dest_top {
        None => moving.rank() == Rank::King,
        Some(top) => {
            moving.color() != top.color() && moving.rank_number() + 1 == top.rank_number()
        }
    }
}

/// True if `cards` (bottom to top, as stored in a pile) form a single run:
/// each card is one rank lower than the card beneath it and of the
/// opposite color.
pub fn is_valid_run(cards: &[Card]) -> bool {
    if cards.is_empty() {
        return false;
    }
    cards
        .windows(2)
        .all(|pair| can_place_on_tableau(Some(pair[0]), pair[1]))
}
