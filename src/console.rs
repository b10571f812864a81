//! Line-oriented text front end.
//!
//! Reads one command per line, runs it through `Game::dispatch` and
//! redraws the table after every accepted command.

use std::io::{self, BufRead, Write};

use crate::clock::Clock;
use crate::command::Command;
use crate::display::{format_elapsed, pile_label, render_snapshot};
use crate::game::{Game, GameEvent, Phase};

const HELP: &str = "\
Piles: st (stock), w (waste), f1-f4 (foundations), t1-t7 (columns).
Positions count from 1 at the bottom of a column.

  n                   new game
  d                   draw from the stock (recycles when empty)
  s <pile> <pos>      select the run starting at <pos>
  g <pile>            move the selection onto <pile>
  m <from> [pos] <to> select and move in one go
  q <pile>            send the top card wherever it fits
  u                   undo
  a                   auto-complete to the foundations
  p / r               pause / resume
  l                   list every pile in words
  h                   this help
  x                   exit";

/// Drive `game` from `input` until end of input or `x`.
pub fn run<C: Clock>(
    game: &mut Game<C>,
    input: impl BufRead,
    mut output: impl Write,
) -> io::Result<()> {
    writeln!(output, "{}", render_snapshot(&game.snapshot()))?;
    game.drain_events();

    for line in input.lines() {
        let line = line?;
        let line = line.trim();
        match line {
            "" => continue,
            "x" | "exit" | "quit" => break,
            "h" | "help" | "?" => {
                writeln!(output, "{HELP}")?;
                continue;
            }
            "l" | "list" => {
                for (id, pile) in game.layout().piles() {
                    writeln!(output, "{}", pile_label(id, pile))?;
                }
                continue;
            }
            _ => {}
        }

        let command = match line.parse::<Command>() {
            Ok(c) => c,
            Err(e) => {
                writeln!(output, "? {e} ('h' for help)")?;
                continue;
            }
        };

        if !game.dispatch(command) {
            if command == Command::AutoComplete && game.phase() == Phase::Playing {
                writeln!(output, "Nothing to play.")?;
            } else {
                writeln!(output, "Not allowed.")?;
            }
            continue;
        }

        for event in game.drain_events() {
            if let GameEvent::Won { moves, elapsed } = event {
                writeln!(
                    output,
                    "Solved in {moves} moves and {}.",
                    format_elapsed(elapsed)
                )?;
            }
        }
        writeln!(output, "{}", render_snapshot(&game.snapshot()))?;
    }

    let stats = game.stats();
    writeln!(
        output,
        "Games played: {}, won: {} ({:.0}%)",
        stats.games_played,
        stats.games_won,
        stats.win_rate() * 100.0
    )?;
    output.flush()
}
