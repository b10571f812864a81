//! Commands accepted by the controller, as values.
//!
//! A host that receives input on several threads can push `Command`s
//! through one queue to the thread that owns the `Game` and feed them to
//! `Game::dispatch` in order. The text form is what the console reads.

use core::fmt;
use core::str::FromStr;

use crate::layout::{ParsePileError, PileId};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    NewGame,
    Draw,
    /// Select the run starting at `start` (0-based from the bottom).
    Select { pile: PileId, start: usize },
    /// Move the current selection onto `pile`.
    MoveTo { pile: PileId },
    /// Select and move in one go. Without `start`, the deepest start
    /// that yields a legal move is used.
    Move {
        from: PileId,
        start: Option<usize>,
        to: PileId,
    },
    /// Send the top card to the first pile that takes it.
    QuickMove { pile: PileId },
    Undo,
    AutoComplete,
    Pause,
    Resume,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ParseCommandError {
    Empty,
    UnknownCommand(String),
    MissingArgument(&'static str),
    BadPile(ParsePileError),
    BadPosition(String),
    TrailingInput(String),
}

impl fmt::Display for ParseCommandError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseCommandError::Empty => f.write_str("empty command"),
            ParseCommandError::UnknownCommand(c) => write!(f, "unknown command '{c}'"),
            ParseCommandError::MissingArgument(what) => write!(f, "missing {what}"),
            ParseCommandError::BadPile(e) => fmt::Display::fmt(e, f),
            ParseCommandError::BadPosition(p) => {
                write!(f, "'{p}' is not a card position (1 is the bottom card)")
            }
            ParseCommandError::TrailingInput(t) => write!(f, "unexpected '{t}'"),
        }
    }
}

impl std::error::Error for ParseCommandError {}

impl From<ParsePileError> for ParseCommandError {
    fn from(e: ParsePileError) -> Self {
        ParseCommandError::BadPile(e)
    }
}

/// 1-based position as typed by a player, to a 0-based index.
fn parse_position(token: &str) -> Result<usize, ParseCommandError> {
    match token.parse::<usize>() {
        Ok(n) if n >= 1 => Ok(n - 1),
        _ => Err(ParseCommandError::BadPosition(token.to_string())),
    }
}

impl FromStr for Command {
    type Err = ParseCommandError;

    /// `n`, `d`, `s <pile> <pos>`, `g <pile>`, `m <from> [pos] <to>`,
    /// `q <pile>`, `u`, `a`, `p`, `r`. Positions are 1-based from the
    /// bottom of the pile.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut tokens = s.split_whitespace();
        let head = tokens.next().ok_or(ParseCommandError::Empty)?;
        let args: Vec<&str> = tokens.collect();

        let pile_arg = |i: usize, what: &'static str| -> Result<PileId, ParseCommandError> {
            let token = args.get(i).ok_or(ParseCommandError::MissingArgument(what))?;
            Ok(token.parse::<PileId>()?)
        };

        let (command, used) = match head.to_ascii_lowercase().as_str() {
            "n" | "new" => (Command::NewGame, 0),
            "d" | "draw" => (Command::Draw, 0),
            "u" | "undo" => (Command::Undo, 0),
            "a" | "auto" => (Command::AutoComplete, 0),
            "p" | "pause" => (Command::Pause, 0),
            "r" | "resume" => (Command::Resume, 0),
            "s" | "select" => {
                let pile = pile_arg(0, "pile")?;
                let pos = args.get(1).ok_or(ParseCommandError::MissingArgument("position"))?;
                let start = parse_position(pos)?;
                (Command::Select { pile, start }, 2)
            }
            "g" | "go" => (
                Command::MoveTo {
                    pile: pile_arg(0, "destination pile")?,
                },
                1,
            ),
            "q" | "quick" => (
                Command::QuickMove {
                    pile: pile_arg(0, "pile")?,
                },
                1,
            ),
            "m" | "move" => {
                let from = pile_arg(0, "source pile")?;
                match args.len() {
                    0 | 1 => return Err(ParseCommandError::MissingArgument("destination pile")),
                    2 => (
                        Command::Move {
                            from,
                            start: None,
                            to: pile_arg(1, "destination pile")?,
                        },
                        2,
                    ),
                    _ => (
                        Command::Move {
                            from,
                            start: Some(parse_position(args[1])?),
                            to: pile_arg(2, "destination pile")?,
                        },
                        3,
                    ),
                }
            }
            other => return Err(ParseCommandError::UnknownCommand(other.to_string())),
        };

        if let Some(extra) = args.get(used) {
            return Err(ParseCommandError::TrailingInput(extra.to_string()));
        }
        Ok(command)
    }
}
