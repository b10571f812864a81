use std::time::Duration;

/// Per-session results. Nothing here outlives the process.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Stats {
    pub games_played: u64,
    pub games_won: u64,
    pub games_abandoned: u64,
    pub best_time: Option<Duration>,
    pub fewest_moves: Option<u32>,
}

impl Stats {
    pub fn record_win(&mut self, moves: u32, elapsed: Duration) {
        self.games_played += 1;
        self.games_won += 1;
        self.best_time = Some(self.best_time.map_or(elapsed, |t| t.min(elapsed)));
        self.fewest_moves = Some(self.fewest_moves.map_or(moves, |m| m.min(moves)));
    }

    pub fn record_abandoned(&mut self) {
        self.games_played += 1;
        self.games_abandoned += 1;
    }

    pub fn win_rate(&self) -> f64 {
        if self.games_played == 0 {
            0.0
        } else {
            self.games_won as f64 / self.games_played as f64
        }
    }
}
