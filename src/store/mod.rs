pub mod disk;
pub mod memory;

use crate::core::config::AppConfig;
use crate::core::store::GameStore;
use anyhow::Result;
use disk::DiskStore;
use std::sync::Arc;

/// Opens the on-disk store in the configured data directory.
pub fn open(config: &AppConfig) -> Result<Arc<dyn GameStore>> {
    let path = config.default_data_path()?;
    Ok(Arc::new(DiskStore::open(&path)?))
}
