//! Klondike solitaire: card model, placement rules, an undoable move log
//! and a game controller that a presentation layer drives.
//!
//! The crate has no UI of its own beyond the text console used by the
//! `klondike` binary. Everything stateful lives in [`Game`].

pub mod card;
pub mod clock;
pub mod command;
pub mod config;
pub mod console;
pub mod deck;
pub mod display;
pub mod game;
pub mod layout;
pub mod moves;
pub mod numbered;
pub mod pile;
pub mod rules;
pub mod stats;

pub use card::{Card, Color, Rank, Suit};
pub use clock::{Clock, ManualClock, SystemClock};
pub use command::Command;
pub use config::{DealSource, GameConfig};
pub use game::{Game, GameEvent, Phase, Selection, Snapshot};
pub use layout::{Layout, LayoutError, PileId, PileRole};
pub use moves::Move;
pub use numbered::DealNumber;
pub use pile::Pile;
