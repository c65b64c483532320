pub mod file;
pub mod memory;

use std::sync::Arc;

use async_trait::async_trait;

use crate::{
    config::{AppConfig, StorageMode},
    models::Record,
};

pub use file::FileStorage;
pub use memory::MemoryStorage;

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("short code not found: {0}")]
    NotFound(String),

    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("storage serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T, E = StorageError> = std::result::Result<T, E>;

/// Persistence for shortened URLs, keyed by short code.
///
/// Implementations must be safe to share between request handlers: a
/// completed `store` is visible to every later `get`, and no caller ever
/// observes a partially written record.
#[async_trait]
pub trait Storage: Send + Sync + 'static {
    /// Insert `record`, replacing whatever was stored under the same short code.
    async fn store(&self, record: Record) -> Result<()>;

    /// Look up the record for `short_code`.
    /// Returns `Err(NotFound)` if the code was never stored.
    async fn get(&self, short_code: &str) -> Result<Record>;

    /// Flush all records to durable storage. Called once on shutdown.
    async fn save(&self) -> Result<()> {
        Ok(())
    }
}

/// Build the backend selected by `config.storage`.
///
/// For file mode this loads the existing document, so a corrupt file fails
/// here instead of being silently replaced on the next write.
pub async fn open_storage(config: &AppConfig) -> Result<Arc<dyn Storage>> {
    let storage: Arc<dyn Storage> = match config.storage {
        StorageMode::Memory => Arc::new(MemoryStorage::new()),
        StorageMode::File => Arc::new(FileStorage::open(&config.file_storage_path).await?),
    };
    Ok(storage)
}
