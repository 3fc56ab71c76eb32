//! Horses and their betting odds.
use serde::{Deserialize, Serialize};

pub const HORSE_COUNT: usize = 4;
pub const INITIAL_ODDS: f64 = 2.0;
pub const MIN_ODDS: f64 = 1.2;
pub const MAX_ODDS: f64 = 5.0;
pub const ODDS_STEP: f64 = 0.1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Horse {
    /// 1-based number shown to the player.
    pub id: u8,
    pub odds: f64,
    pub wins: u32,
    pub losses: u32,
    #[serde(skip)]
    pub position: u32,
}

impl Horse {
    pub fn new(id: u8) -> Self {
        Horse {
            id,
            odds: INITIAL_ODDS,
            wins: 0,
            losses: 0,
            position: 0,
        }
    }

    /// The starting field, numbered 1 through [`HORSE_COUNT`].
    pub fn field() -> Vec<Horse> {
        (1..=HORSE_COUNT as u8).map(Horse::new).collect()
    }

    /// Shortens the odds of a winner and lengthens those of a loser, staying
    /// within [`MIN_ODDS`, `MAX_ODDS`].
    pub fn record_result(&mut self, won: bool) {
        if won {
            self.odds = round_odds(self.odds - ODDS_STEP).max(MIN_ODDS);
            self.wins += 1;
        } else {
            self.odds = round_odds(self.odds + ODDS_STEP).min(MAX_ODDS);
            self.losses += 1;
        }
    }
}

// Keeps repeated 0.1 steps from drifting (2.0 - 0.1 * 8 must land on 1.2).
fn round_odds(odds: f64) -> f64 {
    (odds * 10.0).round() / 10.0
}
