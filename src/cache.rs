//! In-process distance cache.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::SystemTime;

use crate::error::CacheError;
use crate::model::{CacheKey, DistanceCacheRecord};
use crate::traits::DistanceCache;

/// `DistanceCache` backed by a locked map. Writes are last-write-wins.
#[derive(Debug, Default)]
pub struct MemoryDistanceCache {
    records: Mutex<HashMap<CacheKey, DistanceCacheRecord>>,
}

impl MemoryDistanceCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored records, including expired ones.
    pub fn len(&self) -> usize {
        self.records.lock().map(|records| records.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop every record that is no longer servable at `now`.
    pub fn purge_expired(&self, now: SystemTime) -> Result<usize, CacheError> {
        let mut records = self.records.lock().map_err(|_| CacheError::Poisoned)?;
        let before = records.len();
        records.retain(|_, record| record.is_fresh(now));
        Ok(before - records.len())
    }
}

impl DistanceCache for MemoryDistanceCache {
    fn get(&self, key: &CacheKey, now: SystemTime) -> Result<Option<DistanceCacheRecord>, CacheError> {
        let records = self.records.lock().map_err(|_| CacheError::Poisoned)?;
        Ok(records.get(key).filter(|record| record.is_fresh(now)).cloned())
    }

    fn upsert(&self, record: &DistanceCacheRecord) -> Result<(), CacheError> {
        let mut records = self.records.lock().map_err(|_| CacheError::Poisoned)?;
        records.insert(record.key(), record.clone());
        Ok(())
    }
}
