//! Human-readable rendering of the table.
//!
//! Face-down cards are shown as "XX" and face-up cards with their
//! `short_str()` rank/suit code. Columns are top-justified with their 1-based
//! row number on the left, which is the position the console's `s` and `m`
//! commands take. Cards in the current selection get a trailing `*`.

use std::time::Duration;

use crate::card::Card;
use crate::game::{Phase, Selection, Snapshot};
use crate::layout::{Layout, NUM_COLUMNS, PileId};
use crate::pile::Pile;

/// `"XX"` for a face-down card, `"AH"`, `"TD"` and so on otherwise.
pub fn format_card_visible(card: Card, face_up: bool) -> String {
    if face_up {
        card.short_str()
    } else {
        "XX".to_string()
    }
}

/// Elapsed play time as `m:ss`.
pub fn format_elapsed(elapsed: Duration) -> String {
    let secs = elapsed.as_secs();
    format!("{}:{:02}", secs / 60, secs % 60)
}

/// Screen-reader style description of a pile, e.g. "t3: 5 cards, 2 face
/// down, top Queen of spades".
pub fn pile_label(id: PileId, pile: &Pile) -> String {
    match pile.top() {
        None => format!("{id}: empty"),
        Some(_) if pile.top_is_face_down() => {
            format!("{id}: {} cards, all face down", pile.len())
        }
        Some(top) if pile.num_face_down() > 0 => format!(
            "{id}: {} cards, {} face down, top {}",
            pile.len(),
            pile.num_face_down(),
            top.label()
        ),
        Some(top) => format!("{id}: {} cards, top {}", pile.len(), top.label()),
    }
}

fn is_selected(selection: Option<Selection>, id: PileId, index: usize) -> bool {
    selection.is_some_and(|s| s.pile == id && index >= s.start)
}

/// Foundations row. Only the top card of each is shown.
pub fn render_foundations(layout: &Layout, selection: Option<Selection>) -> String {
    let mut s = String::from("Foundations: ");
    for (i, pile) in layout.foundations.iter().enumerate() {
        match pile.top() {
            None => s.push_str("[  ] "),
            Some(top) => {
                let mark = if is_selected(selection, PileId::foundation(i as u8), pile.len() - 1) {
                    "*"
                } else {
                    ""
                };
                s.push_str(&format!("[{}]{mark} ", top.short_str()));
            }
        }
    }
    s.trim_end().to_string()
}

/// Stock as a count, waste as its top card and count.
pub fn render_stock_and_waste(layout: &Layout, selection: Option<Selection>) -> String {
    let mut s = String::new();

    match layout.stock.len() {
        0 => s.push_str("Stock: [empty]"),
        n => s.push_str(&format!("Stock: [{n} cards]")),
    }

    s.push_str("    ");

    match layout.waste.top() {
        None => s.push_str("Waste: [empty]"),
        Some(top) => {
            let len = layout.waste.len();
            let mark = if is_selected(selection, PileId::WASTE, len - 1) {
                "*"
            } else {
                ""
            };
            s.push_str(&format!("Waste: [{}]{mark} ({len} cards)", top.short_str()));
        }
    }

    s
}

/// All seven columns, top-justified, one four-character cell per card.
pub fn render_columns(layout: &Layout, selection: Option<Selection>) -> String {
    let mut s = String::from("Columns:\n      ");
    for col in 0..NUM_COLUMNS {
        s.push_str(&format!(" T{} ", col + 1));
    }
    s.push('\n');

    let max_height = layout.tableau.iter().map(Pile::len).max().unwrap_or(0);

    for row in 0..max_height {
        s.push_str(&format!("{:>4}  ", row + 1));
        for (col_idx, col) in layout.tableau.iter().enumerate() {
            let Some(card) = col.get(row) else {
                s.push_str("    ");
                continue;
            };
            let rep = format_card_visible(card, col.is_face_up(row));
            let id = PileId::tableau(col_idx as u8);
            if is_selected(selection, id, row) {
                s.push_str(&format!("{rep:>3}*"));
            } else {
                s.push_str(&format!("{rep:>3} "));
            }
        }
        // Cells are fixed width; drop the padding after the last one.
        let trimmed = s.trim_end_matches(' ').len();
        s.truncate(trimmed);
        s.push('\n');
    }

    s
}

/// Foundations, stock and waste, then the columns.
pub fn render_layout(layout: &Layout, selection: Option<Selection>) -> String {
    let mut s = String::new();
    s.push_str(&render_foundations(layout, selection));
    s.push('\n');
    s.push_str(&render_stock_and_waste(layout, selection));
    s.push_str("\n\n");
    s.push_str(&render_columns(layout, selection));
    s
}

/// One status line: moves, time, phase and deal number.
pub fn render_status(snapshot: &Snapshot) -> String {
    let mut s = format!(
        "Moves: {}    Time: {}",
        snapshot.move_count,
        format_elapsed(snapshot.elapsed)
    );
    match snapshot.phase {
        Phase::Dealing => s.push_str("    (no game; 'n' deals)"),
        Phase::Playing => {}
        Phase::Paused => s.push_str("    PAUSED"),
        Phase::Won => s.push_str("    YOU WIN!"),
    }
    if let Some(n) = &snapshot.deal_number {
        s.push_str(&format!("    Deal: {n}"));
    }
    s
}

pub fn render_snapshot(snapshot: &Snapshot) -> String {
    let mut s = render_status(snapshot);
    s.push('\n');
    s.push_str(&render_layout(&snapshot.layout, snapshot.selection));
    s
}
