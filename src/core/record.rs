//! Betting history entries.
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A settled bet. Records are written once, after the race they were placed
/// on, and are never updated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BettingRecord {
    /// Assigned by the store on insert.
    pub id: u64,
    pub bet_usd: u32,
    pub bet_twd: i64,
    pub horse_number: u8,
    pub winner_horse_number: u8,
    pub winnings_twd: i64,
    pub balance_after: i64,
    pub timestamp: DateTime<Utc>,
}

impl BettingRecord {
    pub fn won(&self) -> bool {
        self.horse_number == self.winner_horse_number
    }

    /// Net change in balance caused by this bet.
    pub fn net_twd(&self) -> i64 {
        self.winnings_twd - self.bet_twd
    }
}
