//! The full table: stock, waste, four foundations and seven tableau
//! columns, plus the addressing scheme (`PileId`) used by every command.

use core::fmt;
use core::str::FromStr;

use crate::card::{CARDS_PER_DECK, Card, Rank};
use crate::pile::Pile;

/// Number of tableau columns.
pub const NUM_COLUMNS: usize = 7;
/// Number of foundation piles.
pub const NUM_FOUNDATIONS: usize = 4;
/// Cards dealt into the tableau by the triangular deal (1 + 2 + ... + 7).
pub const TABLEAU_DEAL: usize = NUM_COLUMNS * (NUM_COLUMNS + 1) / 2;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PileRole {
    Stock,
    Waste,
    Foundation,
    Tableau,
}

/// Address of one pile. `index` is 0 for stock and waste, 0..4 for
/// foundations and 0..7 for tableau columns.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct PileId {
    pub role: PileRole,
    pub index: u8,
}

impl PileId {
    pub const STOCK: PileId = PileId {
        role: PileRole::Stock,
        index: 0,
    };
    pub const WASTE: PileId = PileId {
        role: PileRole::Waste,
        index: 0,
    };

    pub const fn foundation(index: u8) -> PileId {
        PileId {
            role: PileRole::Foundation,
            index,
        }
    }

    pub const fn tableau(index: u8) -> PileId {
        PileId {
            role: PileRole::Tableau,
            index,
        }
    }

    pub fn new(role: PileRole, index: u8) -> PileId {
        PileId { role, index }
    }

    /// Whether the index is in range for the role.
    pub fn is_valid(self) -> bool {
        let i = self.index as usize;
        match self.role {
            PileRole::Stock | PileRole::Waste => i == 0,
            PileRole::Foundation => i < NUM_FOUNDATIONS,
            PileRole::Tableau => i < NUM_COLUMNS,
        }
    }

    /// Every valid pile, stock first and tableau last.
    pub fn all() -> impl Iterator<Item = PileId> {
        [PileId::STOCK, PileId::WASTE]
            .into_iter()
            .chain((0..NUM_FOUNDATIONS as u8).map(PileId::foundation))
            .chain((0..NUM_COLUMNS as u8).map(PileId::tableau))
    }
}

/// Text form: `st`, `w`, `f1`..`f4`, `t1`..`t7` (1-based for humans).
impl fmt::Display for PileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.role {
            PileRole::Stock => f.write_str("st"),
            PileRole::Waste => f.write_str("w"),
            PileRole::Foundation => write!(f, "f{}", self.index + 1),
            PileRole::Tableau => write!(f, "t{}", self.index + 1),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParsePileError(String);

impl fmt::Display for ParsePileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unknown pile '{}' (expected st, w, f1..f4 or t1..t7)",
            self.0
        )
    }
}

impl std::error::Error for ParsePileError {}

impl FromStr for PileId {
    type Err = ParsePileError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let t = s.trim().to_ascii_lowercase();
        let err = || ParsePileError(s.trim().to_string());
        let id = match t.as_str() {
            "st" | "stock" => PileId::STOCK,
            "w" | "waste" => PileId::WASTE,
            _ => {
                let (role, digits) = match t.split_at_checked(1) {
                    Some(("f", rest)) => (PileRole::Foundation, rest),
                    Some(("t", rest)) => (PileRole::Tableau, rest),
                    _ => return Err(err()),
                };
                let n: u8 = digits.parse().map_err(|_| err())?;
                if n == 0 {
                    return Err(err());
                }
                PileId::new(role, n - 1)
            }
        };
        if id.is_valid() { Ok(id) } else { Err(err()) }
    }
}

/// A broken table invariant. Seeing one of these from the controller means
/// a bug; it is the only "corruption" the engine can suffer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LayoutError {
    WrongCardCount { found: usize },
    DuplicateCard(Card),
    FoundationOutOfOrder { foundation: usize, position: usize },
    FaceDownTableauTop { column: usize },
    FaceUpInStock,
    FaceDownOutsideStockOrTableau(PileId),
}

impl fmt::Display for LayoutError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LayoutError::WrongCardCount { found } => {
                write!(f, "table holds {found} cards, expected {CARDS_PER_DECK}")
            }
            LayoutError::DuplicateCard(card) => write!(f, "card {card} appears twice"),
            LayoutError::FoundationOutOfOrder {
                foundation,
                position,
            } => write!(
                f,
                "foundation {} breaks the ascending same-suit run at position {}",
                foundation + 1,
                position
            ),
            LayoutError::FaceDownTableauTop { column } => {
                write!(f, "column {} has a face-down top card", column + 1)
            }
            LayoutError::FaceUpInStock => f.write_str("stock holds a face-up card"),
            LayoutError::FaceDownOutsideStockOrTableau(id) => {
                write!(f, "pile {id} holds a face-down card")
            }
        }
    }
}

impl std::error::Error for LayoutError {}

/// Every pile on the table.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Layout {
    pub stock: Pile,
    pub waste: Pile,
    pub foundations: [Pile; NUM_FOUNDATIONS],
    pub tableau: [Pile; NUM_COLUMNS],
}

impl Layout {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Deal a deck into a fresh layout.
    ///
    /// Cards come off the end of `deck`: column `i` receives `i + 1` cards
    /// with only the last one face up, then the remaining cards are popped
    /// onto the stock face down.
    pub fn deal(deck: &[Card]) -> Self {
        let mut remaining = deck.to_vec();
        let mut layout = Layout::empty();

        for (col_idx, col) in layout.tableau.iter_mut().enumerate() {
            for k in 0..=col_idx {
                let Some(card) = remaining.pop() else {
                    return layout;
                };
                col.push_face_down(card);
                if k == col_idx {
                    col.flip_top_up();
                }
            }
        }

        while let Some(card) = remaining.pop() {
            layout.stock.push_face_down(card);
        }
        layout
    }

    /// Push every card that is not yet on the table onto the stock, face
    /// down, in identity order. Handy for setting up a position by hand.
    pub fn fill_stock(mut self) -> Self {
        let mut present = [false; CARDS_PER_DECK as usize];
        for (_, pile) in self.piles() {
            for &card in pile.cards() {
                present[card.index() as usize] = true;
            }
        }
        for card in crate::card::standard_deck() {
            if !present[card.index() as usize] {
                self.stock.push_face_down(card);
            }
        }
        self
    }

    pub fn pile(&self, id: PileId) -> Option<&Pile> {
        let i = id.index as usize;
        match id.role {
            PileRole::Stock if i == 0 => Some(&self.stock),
            PileRole::Waste if i == 0 => Some(&self.waste),
            PileRole::Foundation => self.foundations.get(i),
            PileRole::Tableau => self.tableau.get(i),
            _ => None,
        }
    }

    pub fn pile_mut(&mut self, id: PileId) -> Option<&mut Pile> {
        let i = id.index as usize;
        match id.role {
            PileRole::Stock if i == 0 => Some(&mut self.stock),
            PileRole::Waste if i == 0 => Some(&mut self.waste),
            PileRole::Foundation => self.foundations.get_mut(i),
            PileRole::Tableau => self.tableau.get_mut(i),
            _ => None,
        }
    }

    /// `(id, pile)` for every pile, in `PileId::all()` order.
    pub fn piles(&self) -> impl Iterator<Item = (PileId, &Pile)> + '_ {
        PileId::all().filter_map(move |id| self.pile(id).map(|p| (id, p)))
    }

    /// Move the cards from `start` to the top of `from` onto `to`.
    /// Returns the number of cards moved; 0 if either pile is missing or
    /// `start` is out of range. No rules are checked here.
    pub fn transfer(&mut self, from: PileId, start: usize, to: PileId) -> usize {
        if from == to || self.pile(to).is_none() {
            return 0;
        }
        let Some(src) = self.pile_mut(from) else {
            return 0;
        };
        if start >= src.len() {
            return 0;
        }
        let moved = src.take_from(start);
        let count = moved.len();
        if let Some(dst) = self.pile_mut(to) {
            dst.extend_face_up(moved);
        }
        count
    }

    pub fn total_cards(&self) -> usize {
        self.piles().map(|(_, p)| p.len()).sum()
    }

    /// All four foundations are topped by a King.
    pub fn is_won(&self) -> bool {
        self.foundations
            .iter()
            .all(|f| f.top().is_some_and(|c| c.rank() == Rank::King))
    }

    /// Verify every table invariant.
    pub fn check(&self) -> Result<(), LayoutError> {
        let found = self.total_cards();
        if found != CARDS_PER_DECK as usize {
            return Err(LayoutError::WrongCardCount { found });
        }

        let mut seen = [false; CARDS_PER_DECK as usize];
        for (_, pile) in self.piles() {
            for &card in pile.cards() {
                let slot = &mut seen[card.index() as usize];
                if *slot {
                    return Err(LayoutError::DuplicateCard(card));
                }
                *slot = true;
            }
        }

        for (f_idx, foundation) in self.foundations.iter().enumerate() {
            let cards = foundation.cards();
            for (pos, card) in cards.iter().enumerate() {
                let in_order = card.rank_number() as usize == pos + 1
                    && card.suit() == cards[0].suit();
                if !in_order {
                    return Err(LayoutError::FoundationOutOfOrder {
                        foundation: f_idx,
                        position: pos,
                    });
                }
            }
        }

        for (col_idx, col) in self.tableau.iter().enumerate() {
            if col.top_is_face_down() {
                return Err(LayoutError::FaceDownTableauTop { column: col_idx });
            }
        }

        if self.stock.num_face_up() > 0 {
            return Err(LayoutError::FaceUpInStock);
        }
        if self.waste.num_face_down() > 0 {
            return Err(LayoutError::FaceDownOutsideStockOrTableau(PileId::WASTE));
        }
        for (f_idx, foundation) in self.foundations.iter().enumerate() {
            if foundation.num_face_down() > 0 {
                return Err(LayoutError::FaceDownOutsideStockOrTableau(
                    PileId::foundation(f_idx as u8),
                ));
            }
        }

        Ok(())
    }
}
