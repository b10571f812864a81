//! A single ordered pile of cards.
//!
//! Cards are stored bottom to top (`cards.last()` is the top). Face-down
//! cards always form a prefix of the pile, so the face state of the whole
//! pile is one number: `num_face_down`. Card `i` is face up exactly when
//! `i >= num_face_down`.
//!
//! Stock keeps every card face down, waste and foundations keep every card
//! face up, and a tableau column has some face-down cards under a face-up
//! tail. The methods here only ever move the boundary at the top of the
//! pile, which is what keeps the prefix property true.

use crate::card::Card;

#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Pile {
    cards: Vec<Card>,
    num_face_down: usize,
}

impl Pile {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a pile from bottom-to-top cards with the first
    /// `num_face_down` of them face down (clamped to the pile length).
    pub fn from_cards(cards: Vec<Card>, num_face_down: usize) -> Self {
        let num_face_down = num_face_down.min(cards.len());
        Pile {
            cards,
            num_face_down,
        }
    }

    /// All cards face up.
    pub fn face_up(cards: Vec<Card>) -> Self {
        Self::from_cards(cards, 0)
    }

    /// All cards face down.
    pub fn face_down(cards: Vec<Card>) -> Self {
        let n = cards.len();
        Self::from_cards(cards, n)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    #[inline]
    pub fn num_face_down(&self) -> usize {
        self.num_face_down
    }

    #[inline]
    pub fn num_face_up(&self) -> usize {
        self.cards.len() - self.num_face_down
    }

    /// Cards bottom to top, regardless of face state.
    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn get(&self, index: usize) -> Option<Card> {
        self.cards.get(index).copied()
    }

    pub fn is_face_up(&self, index: usize) -> bool {
        index < self.cards.len() && index >= self.num_face_down
    }

    #[inline]
    pub fn top(&self) -> Option<Card> {
        self.cards.last().copied()
    }

    /// Top card if it is face up.
    pub fn top_face_up(&self) -> Option<Card> {
        if self.num_face_up() > 0 { self.top() } else { None }
    }

    /// Top card is present but face down.
    pub fn top_is_face_down(&self) -> bool {
        !self.cards.is_empty() && self.num_face_down == self.cards.len()
    }

    /// `(card, face_up)` pairs, bottom to top.
    pub fn iter(&self) -> impl Iterator<Item = (Card, bool)> + '_ {
        self.cards
            .iter()
            .enumerate()
            .map(move |(i, &c)| (c, i >= self.num_face_down))
    }

    /// Face-up cards from `start` to the top, or `None` if any of them is
    /// face down or `start` is past the top.
    pub fn face_up_tail(&self, start: usize) -> Option<&[Card]> {
        if start < self.num_face_down || start >= self.cards.len() {
            return None;
        }
        Some(&self.cards[start..])
    }

    pub fn position(&self, card: Card) -> Option<usize> {
        self.cards.iter().rposition(|&c| c == card)
    }

    pub fn contains(&self, card: Card) -> bool {
        self.position(card).is_some()
    }

    /// Push a card face up on top.
    pub fn push_face_up(&mut self, card: Card) {
        self.cards.push(card);
    }

    /// Push a card face down. Only valid while the pile is entirely face
    /// down (the stock, or a column being dealt).
    pub fn push_face_down(&mut self, card: Card) {
        debug_assert_eq!(
            self.num_face_down,
            self.cards.len(),
            "face-down card pushed over face-up cards"
        );
        self.cards.push(card);
        self.num_face_down += 1;
    }

    pub fn extend_face_up(&mut self, cards: impl IntoIterator<Item = Card>) {
        self.cards.extend(cards);
    }

    /// Pop the top card, reporting whether it was face up.
    pub fn pop(&mut self) -> Option<(Card, bool)> {
        let card = self.cards.pop()?;
        if self.num_face_down > self.cards.len() {
            self.num_face_down = self.cards.len();
            Some((card, false))
        } else {
            Some((card, true))
        }
    }

    /// Remove and return the cards from `start` to the top. The removed
    /// cards must all be face up.
    pub fn take_from(&mut self, start: usize) -> Vec<Card> {
        debug_assert!(start >= self.num_face_down, "taking face-down cards");
        let start = start.min(self.cards.len());
        self.cards.split_off(start)
    }

    /// Remove a specific card anywhere in the face-up part of the pile.
    pub fn remove_face_up(&mut self, card: Card) -> bool {
        match self.position(card) {
            Some(idx) if idx >= self.num_face_down => {
                self.cards.remove(idx);
                true
            }
            _ => false,
        }
    }

    /// Turn a face-down top card face up. Returns whether a flip happened.
    pub fn flip_top_up(&mut self) -> bool {
        if self.top_is_face_down() {
            self.num_face_down -= 1;
            true
        } else {
            false
        }
    }

    /// Turn the face-up top card face down, provided it is the only face-up
    /// card. Returns whether a flip happened.
    pub fn flip_top_down(&mut self) -> bool {
        if !self.cards.is_empty() && self.num_face_up() == 1 {
            self.num_face_down += 1;
            true
        } else {
            false
        }
    }

    pub fn clear(&mut self) {
        self.cards.clear();
        self.num_face_down = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::card::{Rank, Suit};

    fn sample() -> Pile {
        Pile::from_cards(
            vec![
                Card::new(Suit::Hearts, Rank::Ace),
                Card::new(Suit::Clubs, Rank::Two),
                Card::new(Suit::Spades, Rank::Three),
                Card::new(Suit::Diamonds, Rank::Four),
            ],
            3,
        )
    }

    #[test]
    fn face_state_is_a_prefix() {
        let pile = sample();
        assert_eq!(pile.num_face_down(), 3);
        assert_eq!(pile.num_face_up(), 1);
        let flags: Vec<bool> = pile.iter().map(|(_, up)| up).collect();
        assert_eq!(flags, vec![false, false, false, true]);
        assert_eq!(pile.top_face_up(), Some(Card::new(Suit::Diamonds, Rank::Four)));
    }

    #[test]
    fn taking_the_face_up_tail_exposes_a_face_down_top() {
        let mut pile = sample();
        assert!(pile.face_up_tail(2).is_none());
        let taken = pile.take_from(3);
        assert_eq!(taken, vec![Card::new(Suit::Diamonds, Rank::Four)]);
        assert!(pile.top_is_face_down());
        assert_eq!(pile.top_face_up(), None);

        assert!(pile.flip_top_up());
        assert!(!pile.flip_top_up());
        assert_eq!(pile.num_face_down(), 2);

        assert!(pile.flip_top_down());
        assert_eq!(pile.num_face_down(), 3);
    }

    #[test]
    fn flip_down_refuses_when_more_than_one_card_is_up() {
        let mut pile = Pile::face_up(vec![
            Card::new(Suit::Spades, Rank::Nine),
            Card::new(Suit::Hearts, Rank::Eight),
        ]);
        assert!(!pile.flip_top_down());
        assert_eq!(pile.num_face_down(), 0);
    }

    #[test]
    fn pop_reports_face_state() {
        let mut stock = Pile::face_down(vec![
            Card::new(Suit::Hearts, Rank::Ace),
            Card::new(Suit::Hearts, Rank::Two),
        ]);
        assert_eq!(stock.pop(), Some((Card::new(Suit::Hearts, Rank::Two), false)));
        assert_eq!(stock.num_face_down(), 1);

        let mut waste = Pile::face_up(vec![Card::new(Suit::Clubs, Rank::King)]);
        assert_eq!(waste.pop(), Some((Card::new(Suit::Clubs, Rank::King), true)));
        assert_eq!(waste.pop(), None);
    }

    #[test]
    fn remove_face_up_only_touches_face_up_cards() {
        let mut pile = sample();
        assert!(!pile.remove_face_up(Card::new(Suit::Hearts, Rank::Ace)));
        assert!(pile.remove_face_up(Card::new(Suit::Diamonds, Rank::Four)));
        assert_eq!(pile.len(), 3);
    }
}
