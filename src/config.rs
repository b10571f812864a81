//! Session configuration.

use crate::numbered::DealNumber;

/// Greedy auto-complete gives up after this many placements. A full game
/// needs at most 52.
pub const DEFAULT_AUTOCOMPLETE_LIMIT: usize = 200;

/// Where new decks come from.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum DealSource {
    /// Fresh entropy for every session.
    #[default]
    Random,
    /// A reproducible sequence of deals.
    Seeded(u64),
    /// Numbered deals, counting up from the given number.
    Numbered(DealNumber),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GameConfig {
    pub deal: DealSource,
    pub autocomplete_limit: usize,
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig {
            deal: DealSource::Random,
            autocomplete_limit: DEFAULT_AUTOCOMPLETE_LIMIT,
        }
    }
}

impl GameConfig {
    pub fn seeded(seed: u64) -> Self {
        GameConfig {
            deal: DealSource::Seeded(seed),
            ..Self::default()
        }
    }

    pub fn numbered(number: DealNumber) -> Self {
        GameConfig {
            deal: DealSource::Numbered(number),
            ..Self::default()
        }
    }
}
