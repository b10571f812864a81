//! The move log: every mutation of the table in a reversible form.
//!
//! The controller appends one `Move` per action and undo consumes the log
//! from the end. Each entry carries exactly the data needed to put the
//! table back the way it was, so `Move::revert` never has to search or
//! guess beyond finding a dealt card in the waste.

use crate::card::Card;
use crate::layout::{Layout, PileId, PileRole};

/// One reversible action.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Move {
    /// One card drawn from the stock and turned face up onto the waste.
    Deal { card: Card },

    /// The whole waste turned back over onto the empty stock.
    Recycle,

    /// `count` face-up cards taken from `from` starting at `start` and
    /// placed on `to`.
    ///
    /// `flipped_on_source` is set when taking them exposed a face-down
    /// tableau card that was then turned up.
    Transfer {
        from: PileId,
        start: usize,
        to: PileId,
        count: usize,
        flipped_on_source: bool,
    },

    /// A tableau top turned face up on its own, outside any transfer.
    Flip { column: u8 },
}

impl Move {
    /// Whether this entry is a player action that bumped the move counter.
    /// `Flip` entries are follow-ups and do not count.
    pub fn is_counted(&self) -> bool {
        !matches!(self, Move::Flip { .. })
    }

    /// Put the table back to how it was before this entry was applied.
    ///
    /// Assumes every entry recorded after this one has already been
    /// reverted.
    pub fn revert(&self, layout: &mut Layout) {
        match *self {
            Move::Deal { card } => {
                if layout.waste.remove_face_up(card) {
                    layout.stock.push_face_down(card);
                }
            }

            Move::Recycle => {
                // Popping the stock back onto the waste reverses it again,
                // which restores the waste order exactly.
                while let Some((card, _)) = layout.stock.pop() {
                    layout.waste.push_face_up(card);
                }
            }

            Move::Transfer {
                from,
                to,
                count,
                flipped_on_source,
                ..
            } => {
                let Some(dst) = layout.pile_mut(to) else {
                    return;
                };
                let start = dst.len().saturating_sub(count);
                let moved = dst.take_from(start);

                let Some(src) = layout.pile_mut(from) else {
                    return;
                };
                if flipped_on_source && from.role == PileRole::Tableau {
                    src.flip_top_down();
                }
                src.extend_face_up(moved);
            }

            Move::Flip { column } => {
                if let Some(col) = layout.tableau.get_mut(column as usize) {
                    col.flip_top_down();
                }
            }
        }
    }

    /// Human-readable one-liner, e.g. "t3 -> f1 (2 cards, flipped t3)".
    pub fn describe(&self) -> String {
        match *self {
            Move::Deal { card } => format!("Deal {card} from stock"),
            Move::Recycle => "Recycle waste into stock".to_string(),
            Move::Transfer {
                from,
                to,
                count,
                flipped_on_source,
                ..
            } => {
                let mut s = if count == 1 {
                    format!("{from} -> {to}")
                } else {
                    format!("{from} -> {to} ({count} cards)")
                };
                if flipped_on_source {
                    s.push_str(&format!(", flipped {from}"));
                }
                s
            }
            Move::Flip { column } => format!("Flip t{} top card", column + 1),
        }
    }
}

/// Append-only log of `Move`s, consumed from the end by undo.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MoveLog {
    entries: Vec<Move>,
}

impl MoveLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_deal(&mut self, card: Card) {
        self.entries.push(Move::Deal { card });
    }

    pub fn record_recycle(&mut self) {
        self.entries.push(Move::Recycle);
    }

    pub fn record_transfer(&mut self, from: PileId, start: usize, to: PileId, count: usize) {
        self.entries.push(Move::Transfer {
            from,
            start,
            to,
            count,
            flipped_on_source: false,
        });
    }

    /// Mark the most recent transfer as having flipped its source.
    pub fn mark_source_flipped(&mut self) {
        if let Some(Move::Transfer {
            flipped_on_source, ..
        }) = self.entries.last_mut()
        {
            *flipped_on_source = true;
        }
    }

    pub fn record_flip(&mut self, column: u8) {
        self.entries.push(Move::Flip { column });
    }

    pub fn pop(&mut self) -> Option<Move> {
        self.entries.pop()
    }

    pub fn last(&self) -> Option<&Move> {
        self.entries.last()
    }

    /// Index of the newest counted entry, if any.
    pub fn last_counted(&self) -> Option<usize> {
        self.entries.iter().rposition(Move::is_counted)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn entries(&self) -> &[Move] {
        &self.entries
    }
}
