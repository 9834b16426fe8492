//! History persistence port

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::clipboard::ClipboardItem;

/// Persistence errors
#[derive(Debug, Clone, Error)]
pub enum PersistenceError {
    #[error("Failed to read history: {0}")]
    ReadFailed(String),

    #[error("Failed to decode history: {0}")]
    DecodeFailed(String),

    #[error("Failed to encode history: {0}")]
    EncodeFailed(String),

    #[error("Failed to write history: {0}")]
    WriteFailed(String),
}

/// Port for durable storage of the ordered history (newest first)
#[async_trait]
pub trait HistoryPersistence: Send + Sync {
    /// Load the stored sequence. Missing storage yields an empty list.
    async fn load(&self) -> Result<Vec<ClipboardItem>, PersistenceError>;

    /// Replace the stored sequence with `items`.
    async fn save(&self, items: &[ClipboardItem]) -> Result<(), PersistenceError>;
}

#[async_trait]
impl<T: HistoryPersistence + ?Sized> HistoryPersistence for std::sync::Arc<T> {
    async fn load(&self) -> Result<Vec<ClipboardItem>, PersistenceError> {
        self.as_ref().load().await
    }

    async fn save(&self, items: &[ClipboardItem]) -> Result<(), PersistenceError> {
        self.as_ref().save(items).await
    }
}
