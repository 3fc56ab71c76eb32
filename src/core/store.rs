//! Persistence abstractions for the game session and betting history

use crate::core::game::GameState;
use crate::core::record::BettingRecord;
use anyhow::Result;
use async_trait::async_trait;

#[async_trait]
pub trait GameStore: Send + Sync {
    /// Returns the saved session, or `None` for a fresh game.
    async fn load_state(&self) -> Result<Option<GameState>>;

    async fn save_state(&self, state: &GameState) -> Result<()>;

    /// Saves the post-race state and, when a bet was settled, appends its
    /// record, as a single write: either both land or neither does. The `id`
    /// of the given record is ignored and the stored copy, with its assigned
    /// id, is returned.
    async fn commit_settlement(
        &self,
        state: &GameState,
        record: Option<BettingRecord>,
    ) -> Result<Option<BettingRecord>>;

    /// All records, newest first.
    async fn records(&self) -> Result<Vec<BettingRecord>>;

    /// Returns false when no record has this id.
    async fn delete_record(&self, id: u64) -> Result<bool>;

    /// Removes every record and returns how many were removed.
    async fn clear_records(&self) -> Result<usize>;
}
