use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{Result, Storage, StorageError};
use crate::models::Record;

/// Volatile storage: records live only as long as the process.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    records: RwLock<HashMap<String, Record>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Storage for MemoryStorage {
    async fn store(&self, record: Record) -> Result<()> {
        let mut records = self.records.write().await;
        tracing::debug!(short_code = %record.short_code, "storing record in memory");
        records.insert(record.short_code.clone(), record);
        Ok(())
    }

    async fn get(&self, short_code: &str) -> Result<Record> {
        let records = self.records.read().await;
        records
            .get(short_code)
            .cloned()
            .ok_or_else(|| StorageError::NotFound(short_code.to_owned()))
    }
}
