use std::{
    collections::HashMap,
    io::ErrorKind,
    path::{Path, PathBuf},
};

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{Result, Storage, StorageError};
use crate::models::Record;

/// Storage backed by a single JSON document mapping short codes to records.
///
/// The whole map is rewritten in place after every `store`, while the write
/// lock is still held, so readers never see memory and disk disagree about a
/// completed write. A failed rewrite leaves the new record in memory only;
/// the next successful write or `save` brings the file back in line.
#[derive(Debug)]
pub struct FileStorage {
    path: PathBuf,
    records: RwLock<HashMap<String, Record>>,
}

impl FileStorage {
    /// Open the store at `path`, loading any records already saved there.
    ///
    /// A missing file starts an empty store. A file that exists but cannot be
    /// read or parsed is an error.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let records = load(&path).await?;
        tracing::info!(
            path = %path.display(),
            count = records.len(),
            "Loaded records from file storage"
        );
        Ok(Self {
            path,
            records: RwLock::new(records),
        })
    }

    async fn persist(&self, records: &HashMap<String, Record>) -> Result<()> {
        let bytes = serde_json::to_vec(records)?;
        tokio::fs::write(&self.path, bytes).await.map_err(|e| {
            tracing::error!(path = %self.path.display(), "Failed to write file storage: {e}");
            StorageError::Io(e)
        })
    }
}

async fn load(path: &Path) -> Result<HashMap<String, Record>> {
    let bytes = match tokio::fs::read(path).await {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(HashMap::new()),
        Err(e) => return Err(e.into()),
    };
    Ok(serde_json::from_slice(&bytes)?)
}

#[async_trait]
impl Storage for FileStorage {
    async fn store(&self, record: Record) -> Result<()> {
        let mut records = self.records.write().await;
        tracing::debug!(short_code = %record.short_code, "storing record in file storage");
        records.insert(record.short_code.clone(), record);
        self.persist(&records).await
    }

    async fn get(&self, short_code: &str) -> Result<Record> {
        let records = self.records.read().await;
        records
            .get(short_code)
            .cloned()
            .ok_or_else(|| StorageError::NotFound(short_code.to_owned()))
    }

    async fn save(&self) -> Result<()> {
        let records = self.records.write().await;
        self.persist(&records).await?;
        tracing::info!(
            path = %self.path.display(),
            count = records.len(),
            "Saved records to file storage"
        );
        Ok(())
    }
}
