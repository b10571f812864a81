//! Game controller: the only stateful orchestrator.
//!
//! `Game` owns the table, the move log, the clock and the current
//! selection, and exposes the command surface a presentation layer drives:
//!
//! ```text
//! Dealing -> Playing <-> Paused
//!               |
//!               v
//!              Won        (left only by undo or new_game)
//! ```
//!
//! Every command is a policy check followed by a mutation. Illegal
//! requests are not errors: they return `false` (or 0) and leave the game
//! exactly as it was. After every accepted mutation the controller flips
//! any face-down tableau top, checks the table invariants in debug builds,
//! looks for a win and queues a `GameEvent::Changed` snapshot.

use std::time::Duration;

use log::{debug, info, trace};

use crate::clock::{Clock, Stopwatch, SystemClock};
use crate::command::Command;
use crate::config::GameConfig;
use crate::deck::Dealer;
use crate::layout::{Layout, LayoutError, NUM_COLUMNS, NUM_FOUNDATIONS, PileId, PileRole};
use crate::moves::{Move, MoveLog};
use crate::numbered::DealNumber;
use crate::pile::Pile;
use crate::rules::{can_place_on_foundation, can_place_on_tableau, is_valid_run};
use crate::stats::Stats;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    /// No cards on the table yet, or a deal in progress.
    Dealing,
    Playing,
    Paused,
    Won,
}

/// A run picked up from `pile`, from `start` to the top.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Selection {
    pub pile: PileId,
    pub start: usize,
}

/// Everything a renderer needs to redraw.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Snapshot {
    pub layout: Layout,
    pub phase: Phase,
    pub move_count: u32,
    pub elapsed: Duration,
    pub selection: Option<Selection>,
    pub deal_number: Option<DealNumber>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GameEvent {
    /// The table changed; redraw from the snapshot.
    Changed(Snapshot),
    Won { moves: u32, elapsed: Duration },
    Paused,
    Resumed,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum DragState {
    Idle,
    Dragging,
}

pub struct Game<C: Clock = SystemClock> {
    config: GameConfig,
    dealer: Dealer,
    clock: C,
    layout: Layout,
    log: MoveLog,
    phase: Phase,
    move_count: u32,
    stopwatch: Stopwatch,
    selection: Option<Selection>,
    drag: DragState,
    deal_number: Option<DealNumber>,
    stats: Stats,
    /// Stats as they were before the current win, so the win can be undone.
    stats_before_win: Option<Stats>,
    events: Vec<GameEvent>,
}

impl Game<SystemClock> {
    /// A game with no cards dealt yet. Call `new_game()` to start playing.
    pub fn new(config: GameConfig) -> Self {
        Self::with_clock(config, SystemClock)
    }
}

impl<C: Clock> Game<C> {
    pub fn with_clock(config: GameConfig, clock: C) -> Self {
        let dealer = Dealer::from_source(&config.deal);
        Game {
            config,
            dealer,
            clock,
            layout: Layout::empty(),
            log: MoveLog::new(),
            phase: Phase::Dealing,
            move_count: 0,
            stopwatch: Stopwatch::new(),
            selection: None,
            drag: DragState::Idle,
            deal_number: None,
            stats: Stats::default(),
            stats_before_win: None,
            events: Vec::new(),
        }
    }

    /// Start playing from a given table instead of a fresh deal.
    ///
    /// Face-down tableau tops are turned up (and logged as `Flip`), then
    /// the table must satisfy every invariant.
    pub fn with_layout(config: GameConfig, clock: C, layout: Layout) -> Result<Self, LayoutError> {
        let mut game = Self::with_clock(config, clock);
        game.layout = layout;
        game.start_clock_and_play();
        game.expose_tableau_tops();
        game.layout.check()?;
        game.after_mutation();
        Ok(game)
    }

    // ----- Queries -----

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn pile(&self, id: PileId) -> Option<&Pile> {
        self.layout.pile(id)
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn move_count(&self) -> u32 {
        self.move_count
    }

    /// Time spent playing, excluding pauses. Reading it changes nothing.
    pub fn elapsed(&self) -> Duration {
        self.stopwatch.elapsed(self.clock.now())
    }

    pub fn elapsed_secs(&self) -> u64 {
        self.elapsed().as_secs()
    }

    pub fn selection(&self) -> Option<Selection> {
        self.selection
    }

    pub fn is_dragging(&self) -> bool {
        self.drag == DragState::Dragging
    }

    pub fn history(&self) -> &[Move] {
        self.log.entries()
    }

    pub fn stats(&self) -> &Stats {
        &self.stats
    }

    pub fn deal_number(&self) -> Option<&DealNumber> {
        self.deal_number.as_ref()
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            layout: self.layout.clone(),
            phase: self.phase,
            move_count: self.move_count,
            elapsed: self.elapsed(),
            selection: self.selection,
            deal_number: self.deal_number.clone(),
        }
    }

    /// Take every event queued since the last call.
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Whether the current selection could go onto the given pile.
    pub fn can_move_to(&self, role: PileRole, index: u8) -> bool {
        match self.selection {
            Some(sel) => {
                self.phase == Phase::Playing && self.placement_ok(sel, PileId::new(role, index))
            }
            None => false,
        }
    }

    /// Every pile the current selection could legally go to.
    pub fn legal_destinations(&self) -> Vec<PileId> {
        PileId::all()
            .filter(|id| self.can_move_to(id.role, id.index))
            .collect()
    }

    // ----- Commands -----

    /// Deal a fresh game from any phase.
    pub fn new_game(&mut self) {
        if matches!(self.phase, Phase::Playing | Phase::Paused) {
            self.stats.record_abandoned();
        }
        self.phase = Phase::Dealing;

        let (deck, number) = self.dealer.next_deck();
        self.layout = Layout::deal(&deck);
        match &number {
            Some(n) => info!("new game: deal {n}"),
            None => info!("new game"),
        }
        self.deal_number = number;
        self.start_clock_and_play();
        self.after_mutation();
    }

    /// Draw one card, or recycle the waste when the stock is empty.
    pub fn draw_from_stock(&mut self) -> bool {
        if !self.is_ready() {
            return self.reject("draw");
        }

        if let Some((card, _)) = self.layout.stock.pop() {
            self.layout.waste.push_face_up(card);
            self.log.record_deal(card);
            debug!("dealt {card} to the waste");
        } else if !self.layout.waste.is_empty() {
            while let Some((card, _)) = self.layout.waste.pop() {
                self.layout.stock.push_face_down(card);
            }
            self.log.record_recycle();
            debug!("recycled {} cards into the stock", self.layout.stock.len());
        } else {
            return self.reject("draw from empty stock and waste");
        }

        self.move_count += 1;
        self.selection = None;
        self.after_mutation();
        true
    }

    /// Pick up the run starting at `start`. An invalid request keeps the
    /// previous selection.
    pub fn select_run(&mut self, role: PileRole, index: u8, start: usize) -> bool {
        if !self.is_ready() {
            return self.reject("select");
        }
        let pile = PileId::new(role, index);
        if !self.selection_ok(pile, start) {
            return self.reject("select");
        }
        self.selection = Some(Selection { pile, start });
        true
    }

    pub fn clear_selection(&mut self) {
        self.selection = None;
    }

    /// Move the current selection onto the given pile.
    pub fn move_to(&mut self, role: PileRole, index: u8) -> bool {
        if !self.is_ready() {
            return self.reject("move");
        }
        self.commit_selection(PileId::new(role, index))
    }

    /// Send the top card of the waste or a column to the first foundation
    /// that takes it, otherwise to the first column that does.
    pub fn quick_move(&mut self, role: PileRole, index: u8) -> bool {
        if !self.is_ready() || !matches!(role, PileRole::Waste | PileRole::Tableau) {
            return self.reject("quick move");
        }
        let from = PileId::new(role, index);
        let Some(pile) = self.layout.pile(from) else {
            return self.reject("quick move");
        };
        if pile.top_face_up().is_none() {
            return self.reject("quick move");
        }
        let sel = Selection {
            pile: from,
            start: pile.len() - 1,
        };

        let targets = (0..NUM_FOUNDATIONS as u8)
            .map(PileId::foundation)
            .chain((0..NUM_COLUMNS as u8).map(PileId::tableau));
        for to in targets {
            if self.placement_ok(sel, to) {
                self.selection = Some(sel);
                return self.commit_selection(to);
            }
        }
        self.reject("quick move")
    }

    /// Revert the most recent action, along with any automatic flips
    /// logged after it. Undo is not itself logged.
    ///
    /// Also works from `Won`: the game goes back to `Playing`, the clock
    /// runs again and the recorded win is taken back out of the stats.
    pub fn undo(&mut self) -> bool {
        let undoing_win = self.phase == Phase::Won;
        if !(self.is_ready() || undoing_win) {
            return self.reject("undo");
        }
        let Some(keep) = self.log.last_counted() else {
            return self.reject("undo with empty log");
        };
        while self.log.len() > keep {
            let Some(entry) = self.log.pop() else {
                break;
            };
            trace!("undo: {}", entry.describe());
            entry.revert(&mut self.layout);
        }
        self.move_count = self.move_count.saturating_sub(1);
        self.selection = None;
        if undoing_win {
            if let Some(stats) = self.stats_before_win.take() {
                self.stats = stats;
            }
            self.stopwatch.start(self.clock.now());
            self.phase = Phase::Playing;
            info!("win taken back");
        }
        self.after_mutation();
        true
    }

    /// Greedily play waste and column tops to the foundations.
    ///
    /// Each pass looks at the waste top, then each column top left to
    /// right, and plays the first card a foundation accepts. Stops when a
    /// pass finds nothing or after `autocomplete_limit` placements. This
    /// can stall on positions that need tableau moves first. Returns the
    /// number of cards played.
    pub fn auto_complete(&mut self) -> usize {
        if !self.is_ready() {
            self.reject("auto-complete");
            return 0;
        }
        let mut played = 0;
        for _ in 0..self.config.autocomplete_limit {
            if self.phase != Phase::Playing {
                break;
            }
            let Some((from, start, to)) = self.next_foundation_play() else {
                break;
            };
            self.apply_transfer(from, start, to);
            self.selection = None;
            played += 1;
            self.after_mutation();
        }
        debug!("auto-complete played {played} cards");
        played
    }

    /// Freeze the clock. Only valid while playing.
    pub fn pause(&mut self) -> bool {
        if self.phase != Phase::Playing {
            return self.reject("pause");
        }
        self.stopwatch.stop(self.clock.now());
        self.drag = DragState::Idle;
        self.phase = Phase::Paused;
        self.events.push(GameEvent::Paused);
        debug!("paused at {:?}", self.elapsed());
        true
    }

    pub fn resume(&mut self) -> bool {
        if self.phase != Phase::Paused {
            return self.reject("resume");
        }
        self.stopwatch.start(self.clock.now());
        self.phase = Phase::Playing;
        self.events.push(GameEvent::Resumed);
        debug!("resumed");
        true
    }

    /// Start dragging the run at `start`. Only one drag at a time.
    pub fn begin_drag(&mut self, role: PileRole, index: u8, start: usize) -> bool {
        if !self.select_run(role, index, start) {
            return false;
        }
        self.drag = DragState::Dragging;
        true
    }

    /// Finish a drag over the given pile. The drag ends either way; on an
    /// illegal drop the selection is kept.
    pub fn drop_on(&mut self, role: PileRole, index: u8) -> bool {
        if self.phase != Phase::Playing || self.drag != DragState::Dragging {
            return self.reject("drop");
        }
        self.drag = DragState::Idle;
        self.commit_selection(PileId::new(role, index))
    }

    pub fn cancel_drag(&mut self) {
        self.drag = DragState::Idle;
    }

    /// Run one command. This is the single entry point for hosts that
    /// serialize input through a queue.
    pub fn dispatch(&mut self, command: Command) -> bool {
        debug!("command: {command:?}");
        match command {
            Command::NewGame => {
                self.new_game();
                true
            }
            Command::Draw => self.draw_from_stock(),
            Command::Select { pile, start } => self.select_run(pile.role, pile.index, start),
            Command::MoveTo { pile } => self.move_to(pile.role, pile.index),
            Command::Move { from, start, to } => self.select_and_move(from, start, to),
            Command::QuickMove { pile } => self.quick_move(pile.role, pile.index),
            Command::Undo => self.undo(),
            Command::AutoComplete => self.auto_complete() > 0,
            Command::Pause => self.pause(),
            Command::Resume => self.resume(),
        }
    }

    // ----- Internals -----

    /// Playing and not in the middle of a drag.
    fn is_ready(&self) -> bool {
        self.phase == Phase::Playing && self.drag == DragState::Idle
    }

    fn reject(&self, what: &str) -> bool {
        debug!("{what} rejected (phase {:?})", self.phase);
        false
    }

    fn start_clock_and_play(&mut self) {
        self.log.clear();
        self.move_count = 0;
        self.selection = None;
        self.drag = DragState::Idle;
        self.stopwatch.reset();
        self.stopwatch.start(self.clock.now());
        self.stats_before_win = None;
        self.phase = Phase::Playing;
    }

    fn selection_ok(&self, pile: PileId, start: usize) -> bool {
        let Some(p) = self.layout.pile(pile) else {
            return false;
        };
        match pile.role {
            PileRole::Stock => false,
            PileRole::Waste | PileRole::Foundation => !p.is_empty() && start + 1 == p.len(),
            PileRole::Tableau => p.face_up_tail(start).is_some_and(is_valid_run),
        }
    }

    fn placement_ok(&self, sel: Selection, to: PileId) -> bool {
        if to == sel.pile || !self.selection_ok(sel.pile, sel.start) {
            return false;
        }
        let (Some(src), Some(dst)) = (self.layout.pile(sel.pile), self.layout.pile(to)) else {
            return false;
        };
        let Some(moving) = src.face_up_tail(sel.start) else {
            return false;
        };
        match to.role {
            PileRole::Foundation => {
                moving.len() == 1 && can_place_on_foundation(dst.top(), moving[0])
            }
            PileRole::Tableau => can_place_on_tableau(dst.top(), moving[0]),
            PileRole::Stock | PileRole::Waste => false,
        }
    }

    fn commit_selection(&mut self, to: PileId) -> bool {
        let Some(sel) = self.selection else {
            return self.reject("move without selection");
        };
        if !self.placement_ok(sel, to) {
            return self.reject("move");
        }
        let count = self.apply_transfer(sel.pile, sel.start, to);
        debug!("moved {count} card(s) {} -> {to}", sel.pile);
        self.selection = None;
        self.after_mutation();
        true
    }

    fn select_and_move(&mut self, from: PileId, start: Option<usize>, to: PileId) -> bool {
        if !self.is_ready() {
            return self.reject("move");
        }
        let Some(pile) = self.layout.pile(from) else {
            return self.reject("move");
        };
        let candidates: Vec<usize> = match start {
            Some(s) => vec![s],
            None => (pile.num_face_down()..pile.len()).collect(),
        };
        for s in candidates {
            let sel = Selection {
                pile: from,
                start: s,
            };
            if self.placement_ok(sel, to) {
                self.selection = Some(sel);
                return self.commit_selection(to);
            }
        }
        self.reject("move")
    }

    /// Transfer, log and count a move with no rule checks, flipping a newly
    /// exposed tableau card and marking it on the logged entry.
    fn apply_transfer(&mut self, from: PileId, start: usize, to: PileId) -> usize {
        let count = self.layout.transfer(from, start, to);
        if count == 0 {
            return 0;
        }
        self.log.record_transfer(from, start, to, count);
        self.move_count += 1;

        if from.role == PileRole::Tableau
            && self.layout.pile_mut(from).is_some_and(Pile::flip_top_up)
        {
            self.log.mark_source_flipped();
        }
        count
    }

    fn next_foundation_play(&self) -> Option<(PileId, usize, PileId)> {
        let accepting = |card| {
            (0..NUM_FOUNDATIONS)
                .find(|&f| can_place_on_foundation(self.layout.foundations[f].top(), card))
                .map(|f| PileId::foundation(f as u8))
        };

        if let Some(card) = self.layout.waste.top() {
            if let Some(to) = accepting(card) {
                return Some((PileId::WASTE, self.layout.waste.len() - 1, to));
            }
        }
        for (t, col) in self.layout.tableau.iter().enumerate() {
            let Some(card) = col.top_face_up() else {
                continue;
            };
            if let Some(to) = accepting(card) {
                return Some((PileId::tableau(t as u8), col.len() - 1, to));
            }
        }
        None
    }

    /// Turn up any face-down tableau top, logging each as a `Flip`.
    fn expose_tableau_tops(&mut self) {
        for (t, col) in self.layout.tableau.iter_mut().enumerate() {
            if col.flip_top_up() {
                self.log.record_flip(t as u8);
                debug!("flipped t{} top card", t + 1);
            }
        }
    }

    fn after_mutation(&mut self) {
        self.expose_tableau_tops();
        debug_assert_eq!(self.layout.check(), Ok(()), "table invariant broken");

        if self.phase == Phase::Playing && self.layout.is_won() {
            let now = self.clock.now();
            self.stopwatch.stop(now);
            self.phase = Phase::Won;
            let elapsed = self.stopwatch.elapsed(now);
            self.stats_before_win = Some(self.stats.clone());
            self.stats.record_win(self.move_count, elapsed);
            info!("won in {} moves, {:?}", self.move_count, elapsed);
            let snapshot = self.snapshot();
            self.events.push(GameEvent::Changed(snapshot));
            self.events.push(GameEvent::Won {
                moves: self.move_count,
                elapsed,
            });
        } else {
            let snapshot = self.snapshot();
            self.events.push(GameEvent::Changed(snapshot));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::card::{Card, Rank, Suit};
    use crate::clock::ManualClock;

    fn c(suit: Suit, rank: Rank) -> Card {
        Card::new(suit, rank)
    }

    fn seeded(seed: u64) -> Game<ManualClock> {
        let mut game = Game::with_clock(GameConfig::seeded(seed), ManualClock::new());
        game.new_game();
        game
    }

    fn from_layout(layout: Layout) -> Game<ManualClock> {
        Game::with_layout(GameConfig::default(), ManualClock::new(), layout.fill_stock())
            .expect("test layout is valid")
    }

    /// Everything except the four kings on the foundations, kings spread
    /// over the waste and three columns.
    fn one_step_from_winning() -> Layout {
        let mut layout = Layout::empty();
        for (i, &suit) in Suit::ALL.iter().enumerate() {
            let run: Vec<Card> = Rank::ALL[..12].iter().map(|&r| c(suit, r)).collect();
            layout.foundations[i] = Pile::face_up(run);
        }
        layout.waste = Pile::face_up(vec![c(Suit::Hearts, Rank::King)]);
        layout.tableau[0] = Pile::face_up(vec![c(Suit::Clubs, Rank::King)]);
        layout.tableau[3] = Pile::face_up(vec![c(Suit::Spades, Rank::King)]);
        layout.tableau[6] = Pile::face_up(vec![c(Suit::Diamonds, Rank::King)]);
        layout
    }

    #[test]
    fn nothing_works_before_the_first_deal() {
        let mut game = Game::with_clock(GameConfig::seeded(1), ManualClock::new());
        assert_eq!(game.phase(), Phase::Dealing);
        assert!(!game.draw_from_stock());
        assert!(!game.undo());
        assert!(!game.pause());
        assert_eq!(game.auto_complete(), 0);
    }

    #[test]
    fn new_game_deals_the_triangle() {
        let game = seeded(3);
        let layout = game.layout();
        for (i, col) in layout.tableau.iter().enumerate() {
            assert_eq!(col.len(), i + 1);
            assert_eq!(col.num_face_up(), 1);
        }
        assert_eq!(layout.stock.len(), 24);
        assert_eq!(game.phase(), Phase::Playing);
        assert_eq!(game.move_count(), 0);
        assert!(game.history().is_empty());
    }

    #[test]
    fn draw_pass_recycles_in_the_same_order() {
        let mut game = seeded(11);
        let first_pass: Vec<Card> = (0..24)
            .map(|_| {
                assert!(game.draw_from_stock());
                game.layout().waste.top().unwrap()
            })
            .collect();
        assert!(game.layout().stock.is_empty());
        assert_eq!(game.move_count(), 24);

        assert!(game.draw_from_stock(), "empty stock recycles the waste");
        assert_eq!(game.history().last(), Some(&Move::Recycle));
        assert!(game.layout().waste.is_empty());
        assert_eq!(game.layout().stock.len(), 24);
        assert_eq!(game.layout().stock.num_face_down(), 24);

        let second_pass: Vec<Card> = (0..24)
            .map(|_| {
                assert!(game.draw_from_stock());
                game.layout().waste.top().unwrap()
            })
            .collect();
        assert_eq!(first_pass, second_pass);
    }

    #[test]
    fn undoing_a_recycle_restores_the_waste() {
        let mut game = seeded(12);
        for _ in 0..24 {
            game.draw_from_stock();
        }
        let before = game.layout().clone();
        assert!(game.draw_from_stock());
        assert!(game.undo());
        assert_eq!(game.layout(), &before);
        assert_eq!(game.move_count(), 24);
    }

    #[test]
    fn drawing_with_nothing_left_is_a_no_op() {
        let mut layout = Layout::empty();
        layout.tableau[0] = Pile::from_cards(crate::card::standard_deck().to_vec(), 51);
        let mut game = from_layout(layout);
        assert!(!game.draw_from_stock());
        assert_eq!(game.move_count(), 0);
    }

    #[test]
    fn move_exposing_a_hidden_card_flips_it_and_undo_hides_it() {
        let hidden = c(Suit::Clubs, Rank::Two);
        let mut layout = Layout::empty();
        layout.tableau[0] = Pile::from_cards(vec![hidden, c(Suit::Hearts, Rank::Eight)], 1);
        layout.tableau[1] = Pile::face_up(vec![c(Suit::Spades, Rank::Nine)]);
        let mut game = from_layout(layout);
        let before = game.layout().clone();

        assert!(game.select_run(PileRole::Tableau, 0, 1));
        assert!(game.move_to(PileRole::Tableau, 1));
        assert_eq!(game.layout().tableau[0].top_face_up(), Some(hidden));
        assert_eq!(game.move_count(), 1);
        assert!(matches!(
            game.history().last(),
            Some(Move::Transfer {
                flipped_on_source: true,
                count: 1,
                ..
            })
        ));
        assert_eq!(game.selection(), None);

        assert!(game.undo());
        assert_eq!(game.layout(), &before);
        assert_eq!(game.move_count(), 0);
        assert!(!game.undo(), "nothing left to undo");
    }

    #[test]
    fn three_card_run_moves_as_a_unit() {
        let run = vec![
            c(Suit::Spades, Rank::Eight),
            c(Suit::Hearts, Rank::Seven),
            c(Suit::Clubs, Rank::Six),
        ];
        let mut col = vec![c(Suit::Diamonds, Rank::Ace)];
        col.extend(run.iter().copied());
        let mut layout = Layout::empty();
        layout.tableau[2] = Pile::from_cards(col, 1);
        layout.tableau[5] = Pile::face_up(vec![c(Suit::Hearts, Rank::Nine)]);
        let mut game = from_layout(layout);

        assert!(game.select_run(PileRole::Tableau, 2, 1));
        assert!(game.move_to(PileRole::Tableau, 5));

        let dest = &game.layout().tableau[5];
        assert_eq!(&dest.cards()[1..], run.as_slice());
        assert_eq!(dest.num_face_up(), 4);
        assert_eq!(game.layout().tableau[2].top_face_up(), Some(c(Suit::Diamonds, Rank::Ace)));
    }

    #[test]
    fn selections_must_be_face_up_runs() {
        let mut layout = Layout::empty();
        layout.tableau[0] = Pile::from_cards(
            vec![
                c(Suit::Hearts, Rank::Four),
                c(Suit::Spades, Rank::Eight),
                c(Suit::Spades, Rank::Seven),
            ],
            1,
        );
        layout.waste =
            Pile::face_up(vec![c(Suit::Hearts, Rank::Two), c(Suit::Hearts, Rank::Three)]);
        let mut game = from_layout(layout);

        assert!(!game.select_run(PileRole::Tableau, 0, 0), "face-down card");
        assert!(!game.select_run(PileRole::Tableau, 0, 1), "same color run");
        assert!(game.select_run(PileRole::Tableau, 0, 2));
        assert!(!game.select_run(PileRole::Waste, 0, 0), "waste below the top");
        assert_eq!(
            game.selection(),
            Some(Selection {
                pile: PileId::tableau(0),
                start: 2
            }),
            "rejected selections keep the previous one"
        );
        assert!(game.select_run(PileRole::Waste, 0, 1));
        assert!(!game.select_run(PileRole::Stock, 0, 0));
        assert!(!game.select_run(PileRole::Tableau, 9, 0));
    }

    #[test]
    fn foundations_take_one_card_at_a_time() {
        let mut layout = Layout::empty();
        layout.foundations[0] = Pile::face_up(vec![c(Suit::Spades, Rank::Ace)]);
        layout.tableau[0] =
            Pile::face_up(vec![c(Suit::Spades, Rank::Two), c(Suit::Hearts, Rank::Ace)]);
        let mut game = from_layout(layout);

        assert!(game.select_run(PileRole::Tableau, 0, 0));
        assert!(!game.can_move_to(PileRole::Foundation, 0));
        assert!(!game.move_to(PileRole::Foundation, 0));

        assert!(game.select_run(PileRole::Tableau, 0, 1));
        assert_eq!(
            game.legal_destinations(),
            vec![PileId::foundation(1), PileId::foundation(2), PileId::foundation(3)]
        );
        assert!(game.move_to(PileRole::Foundation, 1));
        assert!(game.select_run(PileRole::Tableau, 0, 0));
        assert!(game.move_to(PileRole::Foundation, 0));
        assert_eq!(game.layout().foundations[0].len(), 2);
    }

    #[test]
    fn quick_move_prefers_foundations() {
        let mut layout = Layout::empty();
        layout.foundations[2] = Pile::face_up(vec![c(Suit::Clubs, Rank::Ace)]);
        layout.tableau[0] = Pile::face_up(vec![c(Suit::Hearts, Rank::Three)]);
        layout.tableau[4] = Pile::face_up(vec![c(Suit::Clubs, Rank::Two)]);
        let mut game = from_layout(layout);

        assert!(game.quick_move(PileRole::Tableau, 4));
        assert_eq!(game.layout().foundations[2].top(), Some(c(Suit::Clubs, Rank::Two)));
        assert!(!game.quick_move(PileRole::Tableau, 4), "empty column");
        assert!(!game.quick_move(PileRole::Foundation, 2), "foundations are not a source");
    }

    #[test]
    fn paused_games_reject_every_mutation() {
        let mut game = seeded(5);
        assert!(game.pause());
        assert!(!game.pause(), "pausing twice is a no-op");
        let before = game.snapshot();

        assert!(!game.draw_from_stock());
        assert!(!game.undo());
        assert!(!game.select_run(PileRole::Tableau, 0, 0));
        assert!(!game.quick_move(PileRole::Tableau, 0));
        assert_eq!(game.auto_complete(), 0);
        assert_eq!(game.snapshot(), before);

        assert!(game.resume());
        assert!(!game.resume());
        assert!(game.draw_from_stock());
    }

    #[test]
    fn paused_time_is_not_counted() {
        let clock = ManualClock::new();
        let mut game = Game::with_clock(GameConfig::seeded(2), clock.clone());
        game.new_game();

        clock.advance(Duration::from_secs(10));
        assert!(game.pause());
        clock.advance(Duration::from_secs(100));
        assert!(!game.pause());
        assert_eq!(game.elapsed_secs(), 10);
        assert!(game.resume());
        clock.advance(Duration::from_secs(5));
        assert_eq!(game.elapsed(), Duration::from_secs(15));
    }

    #[test]
    fn auto_complete_stops_when_nothing_plays() {
        let mut layout = Layout::empty();
        let mut deck = crate::card::standard_deck().to_vec();
        // Every ace buried, a king on top.
        let king = c(Suit::Spades, Rank::King);
        deck.retain(|&x| x != king);
        deck.push(king);
        layout.tableau[0] = Pile::from_cards(deck, 51);
        let mut game = from_layout(layout);
        let before = game.layout().clone();

        assert_eq!(game.auto_complete(), 0);
        assert_eq!(game.layout(), &before);
        assert_eq!(game.move_count(), 0);
    }

    #[test]
    fn auto_complete_finishes_a_won_position() {
        let clock = ManualClock::new();
        let mut game =
            Game::with_layout(GameConfig::default(), clock.clone(), one_step_from_winning())
                .unwrap();
        game.drain_events();
        clock.advance(Duration::from_secs(42));

        assert_eq!(game.auto_complete(), 4);
        assert_eq!(game.phase(), Phase::Won);
        assert_eq!(game.move_count(), 4);
        assert_eq!(game.stats().games_won, 1);

        let events = game.drain_events();
        assert_eq!(
            events.last(),
            Some(&GameEvent::Won {
                moves: 4,
                elapsed: Duration::from_secs(42)
            })
        );

        clock.advance(Duration::from_secs(60));
        assert_eq!(game.elapsed(), Duration::from_secs(42), "clock stops on a win");
        assert!(!game.draw_from_stock(), "won only allows undo or a new game");
        assert_eq!(game.auto_complete(), 0);

        game.new_game();
        assert_eq!(game.phase(), Phase::Playing);
        assert_eq!(game.stats().games_played, 1);
    }

    #[test]
    fn winning_move_can_be_taken_back() {
        let mut layout = Layout::empty();
        for (i, &suit) in Suit::ALL.iter().enumerate() {
            let ranks = if suit == Suit::Hearts { &Rank::ALL[..12] } else { &Rank::ALL[..] };
            layout.foundations[i] = Pile::face_up(ranks.iter().map(|&r| c(suit, r)).collect());
        }
        layout.tableau[0] = Pile::face_up(vec![c(Suit::Hearts, Rank::King)]);
        let clock = ManualClock::new();
        let mut game = Game::with_layout(GameConfig::default(), clock.clone(), layout).unwrap();
        let before = game.layout().clone();

        clock.advance(Duration::from_secs(30));
        assert!(game.select_run(PileRole::Tableau, 0, 0));
        assert!(game.move_to(PileRole::Foundation, 0));
        assert_eq!(game.phase(), Phase::Won);
        assert_eq!(game.stats().games_won, 1);

        clock.advance(Duration::from_secs(100));
        assert!(game.undo());
        assert_eq!(game.phase(), Phase::Playing);
        assert_eq!(game.layout(), &before);
        assert_eq!(game.move_count(), 0);
        assert_eq!(game.stats(), &Stats::default(), "the win is withdrawn");

        clock.advance(Duration::from_secs(5));
        assert_eq!(game.elapsed(), Duration::from_secs(35), "clock runs again");

        assert!(game.quick_move(PileRole::Tableau, 0));
        assert_eq!(game.phase(), Phase::Won);
        assert_eq!(game.stats().games_won, 1);
        assert_eq!(game.stats().best_time, Some(Duration::from_secs(35)));
    }

    #[test]
    fn auto_complete_respects_its_limit() {
        let config = GameConfig {
            autocomplete_limit: 2,
            ..GameConfig::default()
        };
        let mut game =
            Game::with_layout(config, ManualClock::new(), one_step_from_winning()).unwrap();
        assert_eq!(game.auto_complete(), 2);
        assert_eq!(game.phase(), Phase::Playing);
    }

    #[test]
    fn drags_do_not_overlap() {
        let mut layout = Layout::empty();
        layout.tableau[0] = Pile::face_up(vec![c(Suit::Hearts, Rank::Eight)]);
        layout.tableau[1] = Pile::face_up(vec![c(Suit::Spades, Rank::Nine)]);
        let mut game = from_layout(layout);

        assert!(game.begin_drag(PileRole::Tableau, 0, 0));
        assert!(game.is_dragging());
        assert!(!game.begin_drag(PileRole::Tableau, 1, 0));
        assert!(!game.move_to(PileRole::Tableau, 1), "no click moves mid-drag");

        assert!(!game.drop_on(PileRole::Tableau, 2));
        assert!(!game.is_dragging());
        assert!(game.selection().is_some());

        assert!(game.begin_drag(PileRole::Tableau, 0, 0));
        assert!(game.drop_on(PileRole::Tableau, 1));
        assert_eq!(game.layout().tableau[1].len(), 2);
        assert!(!game.drop_on(PileRole::Tableau, 1), "no drag in progress");
    }

    #[test]
    fn pausing_cancels_a_drag() {
        let mut game = seeded(8);
        let top = game.layout().tableau[6].len() - 1;
        assert!(game.begin_drag(PileRole::Tableau, 6, top));
        assert!(game.pause());
        assert!(!game.is_dragging());
    }

    #[test]
    fn installed_layouts_get_their_tops_flipped() {
        let mut layout = Layout::empty();
        layout.tableau[3] =
            Pile::face_down(vec![c(Suit::Clubs, Rank::Four), c(Suit::Hearts, Rank::Jack)]);
        let mut game = from_layout(layout);

        assert_eq!(game.layout().tableau[3].top_face_up(), Some(c(Suit::Hearts, Rank::Jack)));
        assert_eq!(game.history(), &[Move::Flip { column: 3 }]);
        assert_eq!(game.move_count(), 0);
        assert!(!game.undo(), "automatic flips alone are not undoable");
        assert_eq!(game.layout().tableau[3].num_face_up(), 1);
    }

    #[test]
    fn abandoning_a_game_counts_it() {
        let mut game = seeded(4);
        game.new_game();
        assert_eq!(game.stats().games_abandoned, 1);
        assert_eq!(game.stats().games_played, 1);
    }

    #[test]
    fn events_follow_mutations() {
        let mut game = seeded(9);
        game.drain_events();
        assert!(game.draw_from_stock());
        let events = game.drain_events();
        assert_eq!(events.len(), 1);
        let GameEvent::Changed(snapshot) = &events[0] else {
            panic!("expected a redraw event, got {events:?}");
        };
        assert_eq!(snapshot.move_count, 1);
        assert_eq!(snapshot.layout.waste.len(), 1);

        game.select_run(PileRole::Waste, 0, 0);
        assert!(game.drain_events().is_empty(), "selecting changes no pile");

        game.pause();
        game.resume();
        assert_eq!(game.drain_events(), vec![GameEvent::Paused, GameEvent::Resumed]);
    }

    #[test]
    fn dispatch_routes_commands() {
        let mut game = seeded(21);
        assert!(game.dispatch(Command::Draw));
        assert!(game.dispatch(Command::Undo));
        assert_eq!(game.move_count(), 0);
        assert!(game.dispatch(Command::Pause));
        assert!(!game.dispatch(Command::Draw));
        assert!(game.dispatch(Command::Resume));
        assert!(game.dispatch(Command::NewGame));
        assert_eq!(game.stats().games_abandoned, 1);
    }

    #[test]
    fn move_command_finds_the_run_start() {
        let mut layout = Layout::empty();
        layout.tableau[0] = Pile::from_cards(
            vec![
                c(Suit::Diamonds, Rank::Two),
                c(Suit::Clubs, Rank::Ten),
                c(Suit::Hearts, Rank::Nine),
                c(Suit::Spades, Rank::Eight),
            ],
            1,
        );
        layout.tableau[1] = Pile::face_up(vec![c(Suit::Spades, Rank::Ten)]);
        let mut game = from_layout(layout);

        let cmd = Command::Move {
            from: PileId::tableau(0),
            start: None,
            to: PileId::tableau(1),
        };
        assert!(game.dispatch(cmd));
        assert_eq!(game.layout().tableau[1].len(), 3);
        assert_eq!(game.layout().tableau[0].len(), 2);
    }
}
