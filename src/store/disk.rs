use crate::core::game::GameState;
use crate::core::record::BettingRecord;
use crate::core::store::GameStore;
use anyhow::{Context, Result};
use async_trait::async_trait;
use fjall::{Config, Keyspace, PartitionCreateOptions, PartitionHandle, PersistMode};
use std::path::Path;
use tokio::sync::Mutex;
use tracing::debug;

const STATE_PARTITION: &str = "state";
const RECORDS_PARTITION: &str = "records";
const STATE_KEY: &str = "game";
const NEXT_ID_KEY: &str = "next_record_id";

/// Fjall-backed store. The session lives as a single JSON document in the
/// `state` partition; records are keyed by their big-endian id in `records`,
/// so iteration order is insertion order.
pub struct DiskStore {
    keyspace: Keyspace,
    state: PartitionHandle,
    records: PartitionHandle,
    // Serializes id allocation.
    id_lock: Mutex<()>,
}

impl DiskStore {
    pub fn open(path: &Path) -> Result<Self> {
        std::fs::create_dir_all(path)
            .with_context(|| format!("Failed to create data directory: {}", path.display()))?;

        let keyspace = Config::new(path.join("db"))
            .open()
            .with_context(|| format!("Failed to open game database in {}", path.display()))?;
        let state = keyspace.open_partition(STATE_PARTITION, PartitionCreateOptions::default())?;
        let records =
            keyspace.open_partition(RECORDS_PARTITION, PartitionCreateOptions::default())?;
        debug!("Opened game database at {}", path.display());

        Ok(Self {
            keyspace,
            state,
            records,
            id_lock: Mutex::new(()),
        })
    }

    /// The id the next record will get. Only advanced inside a settlement batch.
    fn peek_next_id(&self) -> Result<u64> {
        match self.state.get(NEXT_ID_KEY)? {
            Some(bytes) => {
                let raw =
                    <[u8; 8]>::try_from(&bytes[..]).context("Corrupt record id counter")?;
                Ok(u64::from_be_bytes(raw))
            }
            None => Ok(1),
        }
    }

    fn persist(&self) -> Result<()> {
        self.keyspace.persist(PersistMode::SyncAll)?;
        Ok(())
    }
}

#[async_trait]
impl GameStore for DiskStore {
    async fn load_state(&self) -> Result<Option<GameState>> {
        match self.state.get(STATE_KEY)? {
            Some(bytes) => {
                let state = serde_json::from_slice(&bytes).context("Failed to parse saved game")?;
                debug!("State LOAD");
                Ok(Some(state))
            }
            None => {
                debug!("State MISS, fresh game");
                Ok(None)
            }
        }
    }

    async fn save_state(&self, state: &GameState) -> Result<()> {
        self.state.insert(STATE_KEY, serde_json::to_vec(state)?)?;
        self.persist()?;
        debug!("State SAVE");
        Ok(())
    }

    async fn commit_settlement(
        &self,
        state: &GameState,
        record: Option<BettingRecord>,
    ) -> Result<Option<BettingRecord>> {
        let _guard = self.id_lock.lock().await;
        let mut batch = self.keyspace.batch().durability(Some(PersistMode::SyncAll));

        let record = match record {
            Some(mut record) => {
                record.id = self.peek_next_id()?;
                batch.insert(
                    &self.records,
                    record.id.to_be_bytes().to_vec(),
                    serde_json::to_vec(&record)?,
                );
                batch.insert(&self.state, NEXT_ID_KEY, (record.id + 1).to_be_bytes().to_vec());
                Some(record)
            }
            None => None,
        };
        batch.insert(&self.state, STATE_KEY, serde_json::to_vec(state)?);
        batch.commit().context("Failed to commit race settlement")?;

        debug!("Settlement COMMIT record={:?}", record.as_ref().map(|r| r.id));
        Ok(record)
    }

    async fn records(&self) -> Result<Vec<BettingRecord>> {
        self.records
            .iter()
            .rev()
            .map(|kv| {
                let (_, value) = kv?;
                serde_json::from_slice(&value).context("Failed to parse betting record")
            })
            .collect()
    }

    async fn delete_record(&self, id: u64) -> Result<bool> {
        let key = id.to_be_bytes();
        if !self.records.contains_key(key)? {
            debug!("Record DELETE id={} not found", id);
            return Ok(false);
        }
        self.records.remove(key.to_vec())?;
        self.persist()?;
        debug!("Record DELETE id={}", id);
        Ok(true)
    }

    async fn clear_records(&self) -> Result<usize> {
        let keys = self
            .records
            .keys()
            .collect::<std::result::Result<Vec<_>, _>>()?;
        let mut batch = self.keyspace.batch().durability(Some(PersistMode::SyncAll));
        for key in &keys {
            batch.remove(&self.records, key.clone());
        }
        batch.commit()?;
        debug!("Record CLEAR count={}", keys.len());
        Ok(keys.len())
    }
}
