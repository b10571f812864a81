use std::io;

use anyhow::{Context, Result};
use clap::Parser;
use env_logger::Env;
use log::info;

use klondike_desk::config::{DEFAULT_AUTOCOMPLETE_LIMIT, DealSource, GameConfig};
use klondike_desk::numbered::DealNumber;
use klondike_desk::{Game, console};

#[derive(Debug, Parser)]
#[command(author, version, about = "Play Klondike solitaire in the terminal")]
struct Cli {
    /// Seed for a reproducible sequence of shuffled deals
    #[arg(long, value_name = "N")]
    seed: Option<u64>,

    /// Start from a numbered deal, e.g. 11982 or ms11982
    #[arg(long, value_name = "NUMBER", conflicts_with = "seed")]
    deal: Option<DealNumber>,

    /// Stop auto-complete after this many placements
    #[arg(long, value_name = "N", default_value_t = DEFAULT_AUTOCOMPLETE_LIMIT)]
    autocomplete_limit: usize,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    env_logger::Builder::from_env(Env::default().default_filter_or("warn")).init();

    let deal = match (cli.deal, cli.seed) {
        (Some(number), _) => DealSource::Numbered(number),
        (None, Some(seed)) => DealSource::Seeded(seed),
        (None, None) => DealSource::Random,
    };
    let config = GameConfig {
        deal,
        autocomplete_limit: cli.autocomplete_limit,
    };
    info!("starting with {config:?}");

    let mut game = Game::new(config);
    game.new_game();

    let stdin = io::stdin();
    console::run(&mut game, stdin.lock(), io::stdout().lock()).context("console I/O failed")?;
    Ok(())
}
