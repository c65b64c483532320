use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A shortened URL as persisted by every storage backend.
///
/// Serialized field names match the on-disk JSON document:
/// `{"uuid": ..., "short_url": ..., "original_url": ...}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    #[serde(rename = "uuid")]
    pub id: Uuid,
    #[serde(rename = "short_url")]
    pub short_code: String,
    pub original_url: String,
}

impl Record {
    /// Build a record with a freshly generated identifier.
    pub fn new(short_code: impl Into<String>, original_url: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            short_code: short_code.into(),
            original_url: original_url.into(),
        }
    }
}

/// Body of `POST /api/shorten`.
#[derive(Debug, Deserialize)]
pub struct ShortenRequest {
    pub url: String,
}

/// Response of `POST /api/shorten`.
#[derive(Debug, Serialize, Deserialize)]
pub struct ShortenResponse {
    pub result: String,
}
