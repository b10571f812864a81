//! Deck factory: shuffled decks from an injectable random source.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use crate::card::{Card, standard_deck};
use crate::config::DealSource;
use crate::numbered::DealNumber;

/// A uniformly shuffled 52-card deck (Fisher-Yates via `SliceRandom`).
/// The last card is the top of the deck.
pub fn shuffled_deck<R: Rng + ?Sized>(rng: &mut R) -> Vec<Card> {
    let mut deck = standard_deck().to_vec();
    deck.shuffle(rng);
    deck
}

/// Hands out one deck per new game for a whole session.
#[derive(Clone, Debug)]
pub enum Dealer {
    Shuffled(StdRng),
    Numbered(DealNumber),
}

impl Dealer {
    pub fn from_source(source: &DealSource) -> Self {
        match source {
            DealSource::Random => Dealer::Shuffled(StdRng::from_entropy()),
            DealSource::Seeded(seed) => Dealer::Shuffled(StdRng::seed_from_u64(*seed)),
            DealSource::Numbered(number) => Dealer::Numbered(number.clone()),
        }
    }

    /// The next deck, plus the deal number when one applies.
    pub fn next_deck(&mut self) -> (Vec<Card>, Option<DealNumber>) {
        match self {
            Dealer::Shuffled(rng) => (shuffled_deck(rng), None),
            Dealer::Numbered(number) => {
                let current = number.clone();
                *number = current.successor();
                (current.deck(), Some(current))
            }
        }
    }
}
