use crate::core::game::GameState;
use crate::core::record::BettingRecord;
use crate::core::store::GameStore;
use anyhow::Result;
use async_trait::async_trait;
use std::collections::BTreeMap;
use tokio::sync::Mutex;
use tracing::debug;

#[derive(Default)]
struct Inner {
    state: Option<GameState>,
    records: BTreeMap<u64, BettingRecord>,
    next_id: u64,
}

/// In-memory store. Nothing survives the process.
#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl GameStore for MemoryStore {
    async fn load_state(&self) -> Result<Option<GameState>> {
        Ok(self.inner.lock().await.state.clone())
    }

    async fn save_state(&self, state: &GameState) -> Result<()> {
        self.inner.lock().await.state = Some(state.clone());
        debug!("State SAVE");
        Ok(())
    }

    async fn commit_settlement(
        &self,
        state: &GameState,
        record: Option<BettingRecord>,
    ) -> Result<Option<BettingRecord>> {
        let mut inner = self.inner.lock().await;
        let record = record.map(|mut record| {
            inner.next_id += 1;
            record.id = inner.next_id;
            inner.records.insert(record.id, record.clone());
            record
        });
        inner.state = Some(state.clone());
        debug!("Settlement COMMIT record={:?}", record.as_ref().map(|r| r.id));
        Ok(record)
    }

    async fn records(&self) -> Result<Vec<BettingRecord>> {
        let inner = self.inner.lock().await;
        Ok(inner.records.values().rev().cloned().collect())
    }

    async fn delete_record(&self, id: u64) -> Result<bool> {
        let removed = self.inner.lock().await.records.remove(&id).is_some();
        debug!("Record DELETE id={} removed={}", id, removed);
        Ok(removed)
    }

    async fn clear_records(&self) -> Result<usize> {
        let mut inner = self.inner.lock().await;
        let count = inner.records.len();
        inner.records.clear();
        debug!("Record CLEAR count={}", count);
        Ok(count)
    }
}
