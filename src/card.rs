//! Card, Suit, Rank and Color for a standard 52-card deck.
//!
//! A `Card` is a single byte in 0..=51. The index *is* the card's
//! identity: two cards are the same card exactly when their indices match,
//! so no ids need to be generated when a deck is built.

use core::fmt;

/// Number of suits in a standard deck.
pub const NUM_SUITS: u8 = 4;
/// Number of ranks in a standard deck.
pub const NUM_RANKS: u8 = 13;
/// Number of cards in a standard deck.
pub const CARDS_PER_DECK: u8 = NUM_SUITS * NUM_RANKS;

/// A playing card, stored as
/// ```text
/// index = suit as u8 * 13 + rank as u8
/// ```
/// with rank 0 = Ace through 12 = King.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, PartialOrd, Ord)]
pub struct Card(u8);

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
#[repr(u8)]
pub enum Suit {
    Hearts = 0,
    Clubs = 1,
    Spades = 2,
    Diamonds = 3,
}

/// The two suit colors. Tableau runs must alternate between them.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Color {
    Red,
    Black,
}

/// Card rank, Ace low. `number()` gives the 1..=13 value used by the rules.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, PartialOrd, Ord)]
#[repr(u8)]
pub enum Rank {
    Ace = 0,
    Two,
    Three,
    Four,
    Five,
    Six,
    Seven,
    Eight,
    Nine,
    Ten,
    Jack,
    Queen,
    King,
}

impl Card {
    #[inline]
    pub const fn new(suit: Suit, rank: Rank) -> Self {
        Card(suit as u8 * NUM_RANKS + rank as u8)
    }

    /// Card with the given identity index, or `None` outside 0..=51.
    #[inline]
    pub fn from_index(index: u8) -> Option<Self> {
        (index < CARDS_PER_DECK).then_some(Card(index))
    }

    #[inline]
    pub fn index(self) -> u8 {
        self.0
    }

    #[inline]
    pub fn suit(self) -> Suit {
        Suit::ALL[(self.0 / NUM_RANKS) as usize]
    }

    #[inline]
    pub fn rank(self) -> Rank {
        Rank::ALL[(self.0 % NUM_RANKS) as usize]
    }

    /// Rank number in 1..=13 (Ace=1, King=13).
    #[inline]
    pub fn rank_number(self) -> u8 {
        self.rank().number()
    }

    #[inline]
    pub fn color(self) -> Color {
        self.suit().color()
    }

    /// Short code like "AH", "7C", "TD", "KS".
    pub fn short_str(self) -> String {
        format!("{}{}", self.rank().short_char(), self.suit().short_char())
    }

    /// Accessible label such as "Queen of spades".
    pub fn label(self) -> String {
        format!("{} of {}", self.rank().name(), self.suit().name())
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.short_str())
    }
}

impl Suit {
    /// All suits, in identity order.
    pub const ALL: [Suit; NUM_SUITS as usize] =
        [Suit::Hearts, Suit::Clubs, Suit::Spades, Suit::Diamonds];

    #[inline]
    pub fn color(self) -> Color {
        match self {
            Suit::Hearts | Suit::Diamonds => Color::Red,
            Suit::Clubs | Suit::Spades => Color::Black,
        }
    }

    #[inline]
    pub fn short_char(self) -> char {
        match self {
            Suit::Hearts => 'H',
            Suit::Clubs => 'C',
            Suit::Spades => 'S',
            Suit::Diamonds => 'D',
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Suit::Hearts => "hearts",
            Suit::Clubs => "clubs",
            Suit::Spades => "spades",
            Suit::Diamonds => "diamonds",
        }
    }
}

impl Rank {
    /// All ranks, Ace..King.
    pub const ALL: [Rank; NUM_RANKS as usize] = [
        Rank::Ace,
        Rank::Two,
        Rank::Three,
        Rank::Four,
        Rank::Five,
        Rank::Six,
        Rank::Seven,
        Rank::Eight,
        Rank::Nine,
        Rank::Ten,
        Rank::Jack,
        Rank::Queen,
        Rank::King,
    ];

    /// Rank from its 1..=13 number.
    pub fn from_number(number: u8) -> Option<Self> {
        match number {
            1..=13 => Some(Rank::ALL[(number - 1) as usize]),
            _ => None,
        }
    }

    #[inline]
    pub fn number(self) -> u8 {
        self as u8 + 1
    }

    pub fn short_char(self) -> char {
        match self {
            Rank::Ace => 'A',
            Rank::Ten => 'T',
            Rank::Jack => 'J',
            Rank::Queen => 'Q',
            Rank::King => 'K',
            // Two..=Nine print as their digit.
            other => char::from(b'0' + other.number()),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Rank::Ace => "Ace",
            Rank::Two => "Two",
            Rank::Three => "Three",
            Rank::Four => "Four",
            Rank::Five => "Five",
            Rank::Six => "Six",
            Rank::Seven => "Seven",
            Rank::Eight => "Eight",
            Rank::Nine => "Nine",
            Rank::Ten => "Ten",
            Rank::Jack => "Jack",
            Rank::Queen => "Queen",
            Rank::King => "King",
        }
    }
}

/// The 52 cards in identity order (suits per `Suit::ALL`, ranks Ace..King).
pub fn standard_deck() -> [Card; CARDS_PER_DECK as usize] {
    core::array::from_fn(|i| Card(i as u8))
}
